//! Router test helpers: a recording provider and request builders.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use serde_json::{Value, json};

use photodrop_core::media::public_id_for;
use photodrop_core::{
    AssetDescriptor, AssetProvider, AssetReference, DeletionResult, ProviderError, UploadSource,
};
use photodrop_shared::{AppConfig, ServerConfig};

use crate::{AppState, create_router};

/// What the fake saw when `store` was called.
#[derive(Debug, Clone)]
pub struct StoreCall {
    pub filename: String,
    pub path: PathBuf,
    pub existed: bool,
    pub size_on_disk: u64,
    pub content_type: Option<String>,
}

/// How `store` finishes once the call has been recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreBehavior {
    /// Answer from `fail_with`, or succeed.
    #[default]
    Answer,
    /// Never resolve, like a provider that stopped responding.
    Hang,
    /// Panic inside the handler.
    Panic,
}

/// Provider double that records calls and answers from canned data.
#[derive(Default)]
pub struct FakeProvider {
    pub fail_with: Option<String>,
    pub upload_only: bool,
    pub store_behavior: StoreBehavior,
    pub listing: Vec<AssetDescriptor>,
    pub deletion_result: Option<String>,
    pub stores: Mutex<Vec<StoreCall>>,
    pub lists: Mutex<Vec<(String, usize)>>,
    pub deletes: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_store_behavior(store_behavior: StoreBehavior) -> Self {
        Self {
            store_behavior,
            ..Self::default()
        }
    }

    pub fn upload_only() -> Self {
        Self {
            upload_only: true,
            ..Self::default()
        }
    }

    pub fn with_listing(count: usize) -> Self {
        let listing = (0..count)
            .map(|i| {
                serde_json::from_value(json!({
                    "public_id": format!("album/photo_{i}"),
                    "secure_url": format!("https://res.example.com/album/photo_{i}.jpg")
                }))
                .unwrap()
            })
            .collect();
        Self {
            listing,
            ..Self::default()
        }
    }

    pub fn with_deletion_result(result: &str) -> Self {
        Self {
            deletion_result: Some(result.to_string()),
            ..Self::default()
        }
    }

    pub fn store_calls(&self) -> Vec<StoreCall> {
        self.stores.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }

    fn failure(&self) -> Option<ProviderError> {
        self.fail_with
            .as_ref()
            .map(|message| ProviderError::api(401, message.clone()))
    }
}

#[async_trait]
impl AssetProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "Fake"
    }

    fn namespace(&self) -> &str {
        "album"
    }

    async fn store(
        &self,
        source: &UploadSource,
        filename: &str,
    ) -> Result<AssetReference, ProviderError> {
        let metadata = std::fs::metadata(&source.path).ok();
        self.stores.lock().unwrap().push(StoreCall {
            filename: filename.to_string(),
            path: source.path.clone(),
            existed: metadata.is_some(),
            size_on_disk: metadata.map_or(0, |m| m.len()),
            content_type: source.content_type.clone(),
        });

        match self.store_behavior {
            StoreBehavior::Answer => {}
            StoreBehavior::Hang => std::future::pending::<()>().await,
            StoreBehavior::Panic => panic!("provider blew up mid-upload"),
        }

        if let Some(err) = self.failure() {
            return Err(err);
        }

        let public_id = format!("album/{}", public_id_for(filename));
        Ok(AssetReference::Media {
            url: format!("https://res.example.com/{public_id}.jpg"),
            public_id,
        })
    }

    async fn list(
        &self,
        prefix: &str,
        max_results: usize,
    ) -> Result<Vec<AssetDescriptor>, ProviderError> {
        if self.upload_only {
            return Err(ProviderError::Unsupported("listing"));
        }
        self.lists
            .lock()
            .unwrap()
            .push((prefix.to_string(), max_results));
        if let Some(err) = self.failure() {
            return Err(err);
        }
        Ok(self.listing.clone())
    }

    async fn delete(&self, id: &str) -> Result<DeletionResult, ProviderError> {
        if self.upload_only {
            return Err(ProviderError::Unsupported("deletion"));
        }
        self.deletes.lock().unwrap().push(id.to_string());
        if let Some(err) = self.failure() {
            return Err(err);
        }
        Ok(serde_json::from_value(json!({
            "result": self.deletion_result.as_deref().unwrap_or("ok")
        }))
        .unwrap())
    }
}

/// Router wired to `provider`, staging uploads into `upload_dir`.
pub fn test_app(provider: Arc<FakeProvider>, upload_dir: &Path) -> Router {
    test_app_with_limit(provider, upload_dir, ServerConfig::default().max_upload_bytes)
}

/// Same as [`test_app`] with a custom body limit.
pub fn test_app_with_limit(
    provider: Arc<FakeProvider>,
    upload_dir: &Path,
    max_upload_bytes: usize,
) -> Router {
    let config = AppConfig {
        server: ServerConfig {
            upload_dir: upload_dir.to_path_buf(),
            max_upload_bytes,
            ..ServerConfig::default()
        },
        ..AppConfig::default()
    };
    let provider: Arc<dyn AssetProvider> = provider;
    create_router(AppState::new(provider, &config.server), &config)
}

/// One part of a multipart body.
pub enum FormPart<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

const BOUNDARY: &str = "photodrop-test-boundary";

/// `POST uri` with a multipart/form-data body built from `parts`.
pub fn multipart_request(uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            FormPart::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// `POST uri` with a raw JSON body.
pub fn json_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// `GET uri`.
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Response body parsed as JSON.
pub async fn body_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Number of entries left in a directory.
pub fn dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
