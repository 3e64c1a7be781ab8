//! Driven port for the hosted authentication service.
//!
//! The store owns session state; adapters only translate sign-up, sign-in,
//! sign-out, and session lookups into remote calls.

use async_trait::async_trait;

use crate::domain::{Credentials, SignUpDetails, User};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by authentication adapters. Display strings are shown
    /// to users unchanged.
    pub enum AuthProviderError {
        /// The auth service refused the request (bad credentials, duplicate
        /// account, expired session).
        Rejected { message: String } => "{message}",
        /// The auth service could not be reached.
        Transport { message: String } => "{message}",
        /// The auth service answered with an unexpected payload.
        Decode { message: String } => "unexpected auth response: {message}",
    }
}

/// Port for account and session operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an account. Returns the new user when the service issues one
    /// immediately.
    async fn sign_up(&self, details: &SignUpDetails) -> Result<Option<User>, AuthProviderError>;

    /// Exchange credentials for a session.
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthProviderError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), AuthProviderError>;

    /// Look up the user behind the current session, if any.
    async fn current_user(&self) -> Result<Option<User>, AuthProviderError>;
}
