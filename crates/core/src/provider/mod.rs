//! The asset provider abstraction.
//!
//! Request handlers only ever talk to an [`AssetProvider`]; each deployable
//! service picks one implementation at startup. Operations a provider does not
//! offer fall back to the default methods, which fail with
//! [`ProviderError::Unsupported`].

mod error;
mod types;

use async_trait::async_trait;

pub use error::ProviderError;
pub use types::{AssetDescriptor, AssetReference, DeletionResult, UploadSource};

/// Upper bound on the number of assets a single listing returns.
pub const MAX_LIST_RESULTS: usize = 500;

/// A remote store for uploaded assets.
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// Human readable provider name, used in status messages.
    fn name(&self) -> &'static str;

    /// Folder or prefix this provider writes to and lists from.
    fn namespace(&self) -> &str;

    /// Store a staged file under a name derived from `filename`.
    async fn store(
        &self,
        source: &UploadSource,
        filename: &str,
    ) -> Result<AssetReference, ProviderError>;

    /// List at most `max_results` assets whose id starts with `prefix`.
    async fn list(
        &self,
        prefix: &str,
        max_results: usize,
    ) -> Result<Vec<AssetDescriptor>, ProviderError> {
        let _ = (prefix, max_results);
        Err(ProviderError::Unsupported("listing"))
    }

    /// Delete the asset identified by `id`.
    async fn delete(&self, id: &str) -> Result<DeletionResult, ProviderError> {
        let _ = id;
        Err(ProviderError::Unsupported("deletion"))
    }
}
