//! Application configuration management.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Cross-origin configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Media provider configuration (media server only).
    #[serde(default)]
    pub media: Option<MediaConfig>,
    /// Object storage configuration (storage server only).
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory where incoming uploads are staged.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

/// Cross-origin resource sharing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API with credentials.
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "deserialize_origins"
    )]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

/// Accepts either a list or a comma separated string, so origins can be set
/// from a single environment variable.
fn deserialize_origins<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        List(Vec<String>),
        Joined(String),
    }

    let origins = match Origins::deserialize(deserializer)? {
        Origins::List(list) => list,
        Origins::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };

    Ok(origins
        .into_iter()
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect())
}

/// Media CDN provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Cloud (account) name.
    pub cloud_name: String,
    /// API key.
    pub api_key: String,
    /// API secret used for request signing.
    pub api_secret: String,
    /// Folder uploads are placed in, also used as the listing prefix.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Base URL of the provider API.
    #[serde(default = "default_media_api_base_url")]
    pub api_base_url: String,
    /// Timeout for a single provider call in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_folder() -> String {
    "photodrop".to_string()
}

fn default_media_api_base_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

/// Object storage backend configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageBackend {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        #[serde(default = "default_region")]
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

fn default_region() -> String {
    "auto".to_string()
}

impl StorageBackend {
    /// Create local filesystem backend (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the backend name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Object storage provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage backend.
    pub backend: StorageBackend,
    /// Folder (key prefix) uploads are written under.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Public base URL objects can be fetched from, if any.
    #[serde(default)]
    pub public_base_url: Option<String>,
    /// Timeout for a single provider call in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl StorageConfig {
    /// Create a storage config with default settings.
    #[must_use]
    pub fn new(backend: StorageBackend) -> Self {
        Self {
            backend,
            folder: default_folder(),
            public_base_url: None,
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Set the key prefix.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Set the public base URL.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// A bare `PORT` variable takes precedence over `server.port`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PHOTODROP").separator("__"))
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Returns the media provider section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is absent.
    pub fn media(&self) -> Result<&MediaConfig, config::ConfigError> {
        self.media
            .as_ref()
            .ok_or_else(|| config::ConfigError::NotFound("media".to_string()))
    }

    /// Returns the object storage section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section is absent.
    pub fn storage(&self) -> Result<&StorageConfig, config::ConfigError> {
        self.storage
            .as_ref()
            .ok_or_else(|| config::ConfigError::NotFound("storage".to_string()))
    }
}
