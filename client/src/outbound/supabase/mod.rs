//! Supabase outbound adapters.
//!
//! One [`SupabaseClient`] carries the project URL, the anon key, and the
//! shared session token. The auth adapter writes the token; the row and
//! storage adapters send it as the bearer credential.

mod auth;
mod client;
mod dto;
mod lands;
mod session;
mod storage;
mod transfers;

pub use auth::SupabaseAuth;
pub use client::{SupabaseClient, SupabaseError};
pub use lands::SupabaseLandRepository;
pub use session::SessionToken;
pub use storage::{DEFAULT_BUCKET, SupabaseStorageUploader};
pub use transfers::SupabaseTransferRepository;
