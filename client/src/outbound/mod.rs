//! Outbound adapters implementing the domain's driven ports.

pub mod cloudinary;
pub mod notifications;
pub mod supabase;
