//! GoTrue-backed authentication adapter.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::client::{SupabaseClient, SupabaseError, decode_json, send};
use super::dto::{
    PasswordGrantDto, SessionDto, SignUpDto, SignUpMetadataDto, SignUpOutcomeDto, UserDto,
};
use crate::domain::ports::{AuthProvider, AuthProviderError};
use crate::domain::{Credentials, SignUpDetails, User};

/// Authentication adapter for the project's GoTrue endpoints. A successful
/// sign-in stores the access token in the client's shared session.
#[derive(Clone)]
pub struct SupabaseAuth {
    client: SupabaseClient,
}

impl SupabaseAuth {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn map_error(error: SupabaseError) -> AuthProviderError {
    match error {
        SupabaseError::Transport(message) => AuthProviderError::transport(message),
        SupabaseError::Status { message, .. } => AuthProviderError::rejected(message),
        SupabaseError::Decode(message) => AuthProviderError::decode(message),
    }
}

fn into_user(dto: UserDto) -> Result<User, AuthProviderError> {
    dto.into_domain().map_err(AuthProviderError::decode)
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_up(&self, details: &SignUpDetails) -> Result<Option<User>, AuthProviderError> {
        let credentials = details.credentials();
        let payload = SignUpDto {
            email: credentials.email().as_ref(),
            password: credentials.password(),
            data: SignUpMetadataDto {
                full_name: details.full_name(),
            },
        };
        let request = self
            .client
            .request(Method::POST, "auth/v1/signup")
            .json(&payload);
        let body: Value = decode_json(send(request).await.map_err(map_error)?).map_err(map_error)?;
        let outcome = SignUpOutcomeDto::from_value(body)
            .map_err(|err| AuthProviderError::decode(err.to_string()))?;

        let user = match outcome {
            SignUpOutcomeDto::Session(session) => {
                self.client.session().set(session.access_token);
                into_user(session.user)?
            }
            SignUpOutcomeDto::PendingConfirmation(user) => {
                debug!("sign-up awaiting email confirmation");
                into_user(user)?
            }
        };
        Ok(Some(User {
            full_name: user
                .full_name
                .or_else(|| Some(details.full_name().to_owned())),
            ..user
        }))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthProviderError> {
        let payload = PasswordGrantDto {
            email: credentials.email().as_ref(),
            password: credentials.password(),
        };
        let request = self
            .client
            .request(Method::POST, "auth/v1/token")
            .query(&[("grant_type", "password")])
            .json(&payload);
        let session: SessionDto =
            decode_json(send(request).await.map_err(map_error)?).map_err(map_error)?;
        let user = into_user(session.user)?;
        self.client.session().set(session.access_token);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthProviderError> {
        if !self.client.session().is_set() {
            return Ok(());
        }
        let request = self.client.request(Method::POST, "auth/v1/logout");
        let outcome = send(request).await;
        match outcome {
            Ok(_) => {
                self.client.session().clear();
                Ok(())
            }
            Err(err) if err.is_unauthorised() => {
                self.client.session().clear();
                Ok(())
            }
            Err(err) => Err(map_error(err)),
        }
    }

    async fn current_user(&self) -> Result<Option<User>, AuthProviderError> {
        if !self.client.session().is_set() {
            return Ok(None);
        }
        let request = self.client.request(Method::GET, "auth/v1/user");
        match send(request).await {
            Ok(body) => {
                let dto: UserDto = decode_json(body).map_err(map_error)?;
                into_user(dto).map(Some)
            }
            Err(err) if err.is_unauthorised() => {
                debug!("stored session is no longer valid");
                self.client.session().clear();
                Ok(None)
            }
            Err(err) => Err(map_error(err)),
        }
    }
}
