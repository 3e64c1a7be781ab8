//! Shared reqwest plumbing for the Supabase REST, auth, and storage APIs.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use zeroize::Zeroizing;

use super::session::SessionToken;

/// Transport-level failure shared by every Supabase adapter. Each adapter
/// maps it onto its own port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SupabaseError {
    #[error("{0}")]
    Transport(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Decode(String),
}

impl SupabaseError {
    /// Whether the service refused the caller's credentials.
    pub fn is_unauthorised(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

/// Handle on one Supabase project.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base: Url,
    anon_key: Arc<Zeroizing<String>>,
    session: Arc<SessionToken>,
}

impl SupabaseClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        anon_key: impl Into<String>,
        session: Arc<SessionToken>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            anon_key: Arc::new(Zeroizing::new(anon_key.into())),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionToken> {
        &self.session
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base.as_str().trim_end_matches('/'))
    }

    /// Request carrying the anon key and the session (or anon) bearer token.
    pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let bearer = self
            .session
            .get()
            .unwrap_or_else(|| self.anon_key.as_ref().clone());
        self.http
            .request(method, self.url(path))
            .header("apikey", self.anon_key.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", bearer.as_str()))
    }

    /// `GET /rest/v1/<table>` with PostgREST filters.
    pub(super) async fn select<T>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::GET, &format!("rest/v1/{table}"))
            .query(&[("select", "*")])
            .query(filters);
        decode_json(send(request).await?)
    }

    /// Insert one row and return its stored representation.
    pub(super) async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::POST, &format!("rest/v1/{table}"))
            .header("Prefer", "return=representation")
            .json(row);
        let rows: Vec<T> = decode_json(send(request).await?)?;
        first_row(rows)
    }

    /// Patch matching rows and return them.
    pub(super) async fn update<B, T>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        body: &B,
    ) -> Result<Vec<T>, SupabaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .request(Method::PATCH, &format!("rest/v1/{table}"))
            .header("Prefer", "return=representation")
            .query(filters)
            .json(body);
        decode_json(send(request).await?)
    }

    pub(super) async fn delete(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<(), SupabaseError> {
        let request = self
            .request(Method::DELETE, &format!("rest/v1/{table}"))
            .query(filters);
        send(request).await.map(|_| ())
    }

    /// Store an object and return the path it was written to.
    pub(super) async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), SupabaseError> {
        let request = self
            .request(Method::POST, &format!("storage/v1/object/{bucket}/{path}"))
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        send(request).await.map(|_| ())
    }

    pub(super) fn public_object_url(&self, bucket: &str, path: &str) -> String {
        self.url(&format!("storage/v1/object/public/{bucket}/{path}"))
    }
}

/// Equality filter in PostgREST syntax.
pub(super) fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

pub(super) async fn send(request: RequestBuilder) -> Result<Vec<u8>, SupabaseError> {
    let response = request.send().await.map_err(map_transport_error)?;
    read_body(response).await
}

async fn read_body(response: Response) -> Result<Vec<u8>, SupabaseError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        let message = error_message(status, body.as_ref());
        debug!(status = status.as_u16(), message = %message, "supabase request failed");
        return Err(SupabaseError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(body.to_vec())
}

pub(super) fn decode_json<T>(body: Vec<u8>) -> Result<T, SupabaseError>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(&body).map_err(|err| SupabaseError::Decode(err.to_string()))
}

fn first_row<T>(rows: Vec<T>) -> Result<T, SupabaseError> {
    rows.into_iter()
        .next()
        .ok_or_else(|| SupabaseError::Decode("no row returned".to_owned()))
}

fn map_transport_error(error: reqwest::Error) -> SupabaseError {
    SupabaseError::Transport(error.to_string())
}

/// Message from a Supabase error body. Auth, REST, and storage use different
/// keys; the first non-empty one wins.
pub(super) fn error_message(status: StatusCode, body: &[u8]) -> String {
    const KEYS: [&str; 4] = ["msg", "message", "error_description", "error"];

    let from_json = serde_json::from_slice::<Value>(body).ok().and_then(|value| {
        KEYS.iter().find_map(|key| {
            value
                .get(key)
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
                .map(str::to_owned)
        })
    });
    from_json.unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            format!("status {}: {preview}", status.as_u16())
        }
    })
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
