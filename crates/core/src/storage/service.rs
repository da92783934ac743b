//! Object storage provider implementation using Apache OpenDAL.

use std::time::Duration;

use async_trait::async_trait;
use opendal::layers::TimeoutLayer;
use opendal::{Operator, services};
use tracing::info;

use photodrop_shared::{StorageBackend, StorageConfig};

use crate::provider::{AssetProvider, AssetReference, ProviderError, UploadSource};

/// Upload-only provider writing into an object store.
pub struct ObjectStorageProvider {
    operator: Operator,
    folder: String,
    public_base_url: Option<String>,
    backend_name: &'static str,
}

impl ObjectStorageProvider {
    /// Create a new storage provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn from_config(config: &StorageConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let operator = Self::create_operator(&config.backend)?
            .layer(TimeoutLayer::default().with_timeout(timeout));

        Ok(Self {
            operator,
            folder: config.folder.trim_matches('/').to_string(),
            public_base_url: config
                .public_base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
            backend_name: config.backend.name(),
        })
    }

    /// Create OpenDAL operator from backend config.
    fn create_operator(backend: &StorageBackend) -> Result<Operator, ProviderError> {
        let operator = match backend {
            StorageBackend::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder).map(|b| b.finish())
            }
            StorageBackend::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder).map(|b| b.finish())
            }
            StorageBackend::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| ProviderError::configuration("invalid path"))?,
                );

                Operator::new(builder).map(|b| b.finish())
            }
        };

        operator.map_err(|e| ProviderError::configuration(e.to_string()))
    }

    /// Object key for a client filename.
    ///
    /// Format: `{folder}/{sanitized_filename}`, or just the sanitized name when
    /// no folder is configured.
    #[must_use]
    pub fn object_key(&self, filename: &str) -> String {
        let name = sanitize_filename(filename);
        if self.folder.is_empty() {
            name
        } else {
            format!("{}/{}", self.folder, name)
        }
    }

    /// Backend name, for logging.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend_name
    }
}

#[async_trait]
impl AssetProvider for ObjectStorageProvider {
    fn name(&self) -> &'static str {
        "Object storage"
    }

    fn namespace(&self) -> &str {
        &self.folder
    }

    async fn store(
        &self,
        source: &UploadSource,
        filename: &str,
    ) -> Result<AssetReference, ProviderError> {
        let name = sanitize_filename(filename);
        let key = self.object_key(filename);
        let data = tokio::fs::read(&source.path).await?;

        self.operator
            .write_with(&key, data)
            .content_type(source.content_type_or_default())
            .await?;

        info!(key = %key, backend = self.backend_name, "Stored object");

        Ok(AssetReference::Stored {
            url: self
                .public_base_url
                .as_ref()
                .map(|base| format!("{base}/{key}")),
            id: key,
            name,
        })
    }
}

/// Sanitize filename for storage key.
///
/// Removes or replaces characters that could cause issues in storage paths.
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
/// A name made only of dots (`.`, `..`) would address a directory, so its
/// dots become underscores too.
fn sanitize_filename(filename: &str) -> String {
    if filename.chars().all(|c| c == '.') {
        return "_".repeat(filename.len());
    }

    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
