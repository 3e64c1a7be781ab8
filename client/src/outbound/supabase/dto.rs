//! GoTrue payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Email, User, UserId};

#[derive(Debug, Serialize)]
pub(super) struct PasswordGrantDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpDto<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
    pub(super) data: SignUpMetadataDto<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct SignUpMetadataDto<'a> {
    pub(super) full_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserDto {
    pub(super) id: String,
    #[serde(default)]
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: Option<UserMetadataDto>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct UserMetadataDto {
    #[serde(default)]
    pub(super) full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionDto {
    pub(super) access_token: String,
    pub(super) user: UserDto,
}

/// Either a full session or, when email confirmation is pending, a bare user.
#[derive(Debug)]
pub(super) enum SignUpOutcomeDto {
    Session(SessionDto),
    PendingConfirmation(UserDto),
}

impl SignUpOutcomeDto {
    pub(super) fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.get("access_token").is_some() {
            serde_json::from_value(value).map(Self::Session)
        } else {
            serde_json::from_value(value).map(Self::PendingConfirmation)
        }
    }
}

impl UserDto {
    pub(super) fn into_domain(self) -> Result<User, String> {
        let id = UserId::new(&self.id).map_err(|err| err.to_string())?;
        let email = self
            .email
            .ok_or_else(|| "user has no email".to_owned())
            .and_then(|email| Email::new(email).map_err(|err| err.to_string()))?;
        let full_name = self
            .user_metadata
            .and_then(|meta| meta.full_name)
            .filter(|name| !name.trim().is_empty());
        Ok(User {
            id,
            email,
            full_name,
        })
    }
}
