//! Driving port exposing the signed-in user to workflows.

use crate::domain::User;

/// Read access to the current session.
#[cfg_attr(test, mockall::automock)]
pub trait SessionQuery: Send + Sync {
    /// The signed-in user, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<User>;
}
