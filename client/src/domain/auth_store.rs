//! Session store backed by the authentication provider.
//!
//! Holds the signed-in user and publishes changes through the shared
//! [`StoreState`] channel. Implements [`SessionQuery`] for workflows.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::ports::{AuthProvider, AuthProviderError, SessionQuery};
use crate::domain::store_state::{StateCell, StoreState};
use crate::domain::{Credentials, Error, SignUpDetails, User};

/// Authentication state and operations.
pub struct AuthStore<P: ?Sized = dyn AuthProvider> {
    provider: Arc<P>,
    state: StateCell<Option<User>>,
}

impl<P: ?Sized> AuthStore<P> {
    /// Create a store with no signed-in user.
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider,
            state: StateCell::new(),
        }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.state.read(Clone::clone)
    }

    /// Whether a user is loaded.
    pub fn is_authenticated(&self) -> bool {
        self.state.read(Option::is_some)
    }

    /// Current snapshot.
    pub fn state(&self) -> StoreState<Option<User>> {
        self.state.snapshot()
    }

    /// Watch every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<Option<User>>> {
        self.state.subscribe()
    }

    /// Reset the last error.
    pub fn clear_error(&self) {
        self.state.clear_error();
    }
}

impl<P> AuthStore<P>
where
    P: AuthProvider + ?Sized,
{
    fn map_provider_error(error: AuthProviderError) -> Error {
        match error {
            AuthProviderError::Rejected { message } => Error::unauthorized(message),
            AuthProviderError::Transport { message } => Error::service_unavailable(message),
            err @ AuthProviderError::Decode { .. } => Error::internal(err.to_string()),
        }
    }

    /// Create an account. When the provider signs the user in straight away
    /// the session user is set; otherwise it is left untouched.
    pub async fn sign_up(&self, details: &SignUpDetails) -> Result<Option<User>, Error> {
        let call = async {
            self.provider
                .sign_up(details)
                .await
                .map_err(Self::map_provider_error)
        };
        let user = self
            .state
            .track(call, |current, issued: &Option<User>| {
                if let Some(user) = issued {
                    *current = Some(user.clone());
                }
            })
            .await?;
        info!(email = %details.credentials().email(), confirmed = user.is_some(), "signed up");
        Ok(user)
    }

    /// Sign in with credentials and load the session user.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<User, Error> {
        let call = async {
            self.provider
                .sign_in(credentials)
                .await
                .map_err(Self::map_provider_error)
        };
        let user = self
            .state
            .track(call, |current, user: &User| *current = Some(user.clone()))
            .await?;
        info!(user_id = %user.id, "signed in");
        Ok(user)
    }

    /// End the session and forget the user.
    pub async fn sign_out(&self) -> Result<(), Error> {
        let call = async {
            self.provider
                .sign_out()
                .await
                .map_err(Self::map_provider_error)
        };
        self.state.track(call, |current, _: &()| *current = None).await?;
        info!("signed out");
        Ok(())
    }

    /// Rehydrate the session user. Failures are logged and leave the user
    /// unset.
    pub async fn get_current_user(&self) -> Option<User> {
        let call = async {
            self.provider
                .current_user()
                .await
                .map_err(Self::map_provider_error)
        };
        match self
            .state
            .track(call, |current, user: &Option<User>| {
                current.clone_from(user);
            })
            .await
        {
            Ok(user) => {
                debug!(signed_in = user.is_some(), "session rehydrated");
                user
            }
            Err(err) => {
                warn!(error = %err, "session lookup failed");
                None
            }
        }
    }
}

impl<P> SessionQuery for AuthStore<P>
where
    P: Send + Sync + ?Sized,
{
    fn current_user(&self) -> Option<User> {
        self.user()
    }
}
