//! Object storage provider using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! Only uploads are offered. Listing and deletion answer
//! [`ProviderError::Unsupported`](crate::provider::ProviderError::Unsupported).

mod service;

pub use service::ObjectStorageProvider;
