//! Values exchanged with asset providers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A file staged on local disk, ready to be handed to a provider.
#[derive(Debug, Clone)]
pub struct UploadSource {
    /// Path of the staged file.
    pub path: PathBuf,
    /// Content type reported by the client, if any.
    pub content_type: Option<String>,
    /// File name reported by the client, if any.
    pub original_name: Option<String>,
    /// Size in bytes.
    pub size: u64,
}

impl UploadSource {
    /// Content type to send upstream.
    #[must_use]
    pub fn content_type_or_default(&self) -> &str {
        self.content_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }
}

/// Provider identifier for a stored object, as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AssetReference {
    /// Asset held by a media CDN.
    Media {
        /// Delivery URL (https).
        url: String,
        /// Provider public id, including the folder.
        public_id: String,
    },
    /// Object written to a file/object store.
    Stored {
        /// Object key.
        id: String,
        /// Object name as derived from the client filename.
        name: String,
        /// Public URL, when the store is publicly reachable.
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl AssetReference {
    /// The provider's opaque identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Media { public_id, .. } => public_id,
            Self::Stored { id, .. } => id,
        }
    }
}

/// One asset as reported by a provider listing.
///
/// Only the id is interpreted. Every other field is kept as the provider sent
/// it, so listings pass through without reshaping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Provider public id.
    pub public_id: String,
    /// Remaining provider fields (`secure_url`, `format`, `bytes`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Provider acknowledgement of a delete call.
///
/// A provider may acknowledge a delete of an object that does not exist
/// (`result: "not found"`); that is still a successful call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionResult {
    /// Outcome reported by the provider, e.g. `ok` or `not found`.
    pub result: String,
    /// Remaining provider fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeletionResult {
    /// Whether the provider reported that an object was removed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.result == "ok"
    }
}
