//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `LAND_REGISTRY_*` environment variables or a config
//! file. [`ClientSettings::into_config`] checks them once at startup and
//! produces a [`ClientConfig`] with parsed URLs and defaults applied. With the
//! default `cloudinary` backend the three Cloudinary values are required.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};
use url::Url;
use zeroize::Zeroizing;

use crate::outbound::cloudinary::{CloudinaryCredentials, DEFAULT_API_BASE};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_FILE: &str = ".land-registry-session";

/// Environment values made only of digits arrive as numbers; Cloudinary API
/// keys always do.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Unsigned(value) => value.to_string(),
        Raw::Signed(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
    }))
}

/// Raw settings as read from the environment and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(prefix = "LAND_REGISTRY")]
pub struct ClientSettings {
    /// Supabase project URL, for example `https://xyz.supabase.co`.
    pub supabase_url: Option<String>,
    /// Public anon key of the Supabase project.
    pub supabase_anon_key: Option<String>,
    /// Cloudinary account name used in the upload path.
    #[serde(deserialize_with = "string_or_number")]
    pub cloudinary_cloud_name: Option<String>,
    /// Cloudinary API key sent with every upload.
    #[serde(deserialize_with = "string_or_number")]
    pub cloudinary_api_key: Option<String>,
    /// Cloudinary API secret used to sign uploads. Never sent or logged.
    #[serde(deserialize_with = "string_or_number")]
    pub cloudinary_api_secret: Option<String>,
    /// Override for the Cloudinary API host.
    pub cloudinary_api_base: Option<String>,
    /// Per-request timeout for every remote call.
    #[ortho_config(default = 30)]
    pub request_timeout_secs: u64,
    /// `cloudinary` (default) or `supabase-storage`.
    pub document_backend: Option<String>,
    /// Where the CLI keeps the session token between runs.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_anon_key: None,
            cloudinary_cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            cloudinary_api_base: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            document_backend: None,
            session_file: None,
        }
    }
}

/// Where registry documents are hosted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DocumentBackend {
    /// Signed uploads to the Cloudinary API.
    #[default]
    Cloudinary,
    /// Uploads into a public Supabase storage bucket.
    SupabaseStorage,
}

impl std::str::FromStr for DocumentBackend {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cloudinary" => Ok(Self::Cloudinary),
            "supabase-storage" | "supabase_storage" | "supabase" => Ok(Self::SupabaseStorage),
            other => Err(format!(
                "unknown document backend `{other}` (expected `cloudinary` or `supabase-storage`)"
            )),
        }
    }
}

/// Startup configuration errors. These are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Required settings that are absent or blank, in declaration order.
    #[error("missing configuration: {}", fields.join(", "))]
    Missing { fields: Vec<&'static str> },
    /// A setting that is present but cannot be used.
    #[error("invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Supabase project URL.
    pub supabase_url: Url,
    /// Supabase anon key, sent as `apikey` on every request.
    pub supabase_anon_key: Zeroizing<String>,
    /// Always `Some` with the Cloudinary backend. With Supabase storage it is
    /// `None` unless every Cloudinary value was supplied.
    pub cloudinary: Option<CloudinaryCredentials>,
    /// Cloudinary API host.
    pub cloudinary_api_base: Url,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Where documents are hosted.
    pub document_backend: DocumentBackend,
    /// Session token file used by the CLI.
    pub session_file: PathBuf,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigurationError> {
    let url = Url::parse(raw.trim()).map_err(|err| ConfigurationError::Invalid {
        field,
        message: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigurationError::Invalid {
            field,
            message: format!("unsupported scheme `{scheme}`"),
        }),
    }
}

impl ClientSettings {
    /// Validate the settings and apply defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Missing`] listing every absent required
    /// setting, or [`ConfigurationError::Invalid`] for unparsable values.
    /// An unknown backend is reported before missing settings, because it
    /// decides which settings are required.
    pub fn into_config(self) -> Result<ClientConfig, ConfigurationError> {
        let document_backend = match non_blank(self.document_backend.clone()) {
            Some(raw) => raw
                .parse()
                .map_err(|message| ConfigurationError::Invalid {
                    field: "document_backend",
                    message,
                })?,
            None => DocumentBackend::default(),
        };

        let missing = self.missing_fields(document_backend);
        if !missing.is_empty() {
            return Err(ConfigurationError::Missing { fields: missing });
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigurationError::Invalid {
                field: "request_timeout_secs",
                message: "must be greater than zero".to_owned(),
            });
        }
        let request_timeout = Duration::from_secs(self.request_timeout_secs);

        let supabase_url = non_blank(self.supabase_url).unwrap_or_default();
        let supabase_anon_key = non_blank(self.supabase_anon_key).unwrap_or_default();
        let cloudinary_api_base = non_blank(self.cloudinary_api_base);
        Ok(ClientConfig {
            supabase_url: parse_url("supabase_url", &supabase_url)?,
            supabase_anon_key: Zeroizing::new(supabase_anon_key),
            cloudinary: CloudinaryCredentials::from_parts(
                self.cloudinary_cloud_name,
                self.cloudinary_api_key,
                self.cloudinary_api_secret,
            ),
            cloudinary_api_base: parse_url(
                "cloudinary_api_base",
                cloudinary_api_base.as_deref().unwrap_or(DEFAULT_API_BASE),
            )?,
            request_timeout,
            document_backend,
            session_file: self
                .session_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE)),
        })
    }

    fn missing_fields(&self, backend: DocumentBackend) -> Vec<&'static str> {
        let mut required = vec![
            ("supabase_url", self.supabase_url.as_ref()),
            ("supabase_anon_key", self.supabase_anon_key.as_ref()),
        ];
        if backend == DocumentBackend::Cloudinary {
            required.extend([
                ("cloudinary_cloud_name", self.cloudinary_cloud_name.as_ref()),
                ("cloudinary_api_key", self.cloudinary_api_key.as_ref()),
                ("cloudinary_api_secret", self.cloudinary_api_secret.as_ref()),
            ]);
        }
        required
            .into_iter()
            .filter(|(_, value)| is_blank(*value))
            .map(|(field, _)| field)
            .collect()
    }
}
