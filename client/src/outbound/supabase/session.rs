//! Access token shared between the auth and data adapters.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use zeroize::Zeroizing;

/// The bearer token of the signed-in session, if any.
#[derive(Default)]
pub struct SessionToken {
    inner: RwLock<Option<Zeroizing<String>>>,
}

impl SessionToken {
    /// Start with a token restored from elsewhere.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::default();
        session.set(token);
        session
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Zeroizing::new(token.into()));
    }

    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    /// Copy of the current token.
    pub fn get(&self) -> Option<Zeroizing<String>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_set(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("set", &self.is_set())
            .finish()
    }
}
