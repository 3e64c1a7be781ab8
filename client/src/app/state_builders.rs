//! Builders for the CLI state from validated configuration.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use land_registry::config::{ClientConfig, DocumentBackend};
use land_registry::domain::ports::DocumentUploader;
use land_registry::inbound::cli::{CliState, CliStatePorts};
use land_registry::outbound::cloudinary::CloudinaryUploader;
use land_registry::outbound::notifications::TracingNotifier;
use land_registry::outbound::supabase::{
    DEFAULT_BUCKET, SessionToken, SupabaseAuth, SupabaseClient, SupabaseLandRepository,
    SupabaseStorageUploader, SupabaseTransferRepository,
};

fn build_uploader(
    config: &ClientConfig,
    supabase: &SupabaseClient,
    clock: Arc<dyn Clock>,
) -> io::Result<Arc<dyn DocumentUploader>> {
    match config.document_backend {
        DocumentBackend::Cloudinary => {
            let uploader = CloudinaryUploader::new(
                config.cloudinary_api_base.clone(),
                config.cloudinary.clone(),
                config.request_timeout,
                clock,
            )
            .map_err(|error| io::Error::other(format!("build Cloudinary client: {error}")))?;
            Ok(Arc::new(uploader))
        }
        DocumentBackend::SupabaseStorage => Ok(Arc::new(SupabaseStorageUploader::new(
            supabase.clone(),
            DEFAULT_BUCKET,
            clock,
        ))),
    }
}

/// Wire the Supabase adapters, the configured document uploader, and the
/// tracing notifier into a [`CliState`]. Row and auth requests share
/// `session`.
pub fn build_cli_state(config: &ClientConfig, session: Arc<SessionToken>) -> io::Result<CliState> {
    let supabase = SupabaseClient::new(
        config.supabase_url.clone(),
        config.supabase_anon_key.as_str(),
        session,
        config.request_timeout,
    )
    .map_err(|error| io::Error::other(format!("build Supabase client: {error}")))?;
    let uploader = build_uploader(config, &supabase, Arc::new(DefaultClock))?;
    info!(
        backend = ?config.document_backend,
        supabase_url = %config.supabase_url,
        "client wired"
    );

    Ok(CliState::from(CliStatePorts {
        auth: Arc::new(SupabaseAuth::new(supabase.clone())),
        lands: Arc::new(SupabaseLandRepository::new(supabase.clone())),
        transfers: Arc::new(SupabaseTransferRepository::new(supabase.clone())),
        uploader,
        notifier: Arc::new(TracingNotifier),
    }))
}
