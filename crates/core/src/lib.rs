//! Provider adapters for Photodrop.
//!
//! This crate contains everything that talks to the remote asset store, with
//! ZERO web framework dependencies.
//!
//! # Modules
//!
//! - `provider` - The `AssetProvider` trait and the values it exchanges
//! - `media` - Media CDN provider (upload, list, delete)
//! - `storage` - Object storage provider over OpenDAL (upload only)

pub mod media;
pub mod provider;
pub mod storage;

pub use media::MediaProvider;
pub use provider::{
    AssetDescriptor, AssetProvider, AssetReference, DeletionResult, MAX_LIST_RESULTS,
    ProviderError, UploadSource,
};
pub use storage::ObjectStorageProvider;
