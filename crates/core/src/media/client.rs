//! Media provider backed by the Cloudinary upload and admin REST APIs.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use photodrop_shared::MediaConfig;

use super::{public_id_for, signature};
use crate::provider::{
    AssetDescriptor, AssetProvider, AssetReference, DeletionResult, MAX_LIST_RESULTS,
    ProviderError, UploadSource,
};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ResourcesResponse {
    #[serde(default)]
    resources: Vec<AssetDescriptor>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Image provider talking to a Cloudinary-compatible API.
pub struct MediaProvider {
    http: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
    api_base_url: String,
}

impl MediaProvider {
    /// Create a provider from configuration.
    ///
    /// Credentials are not checked here; a bad key surfaces as a failed
    /// provider call.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &MediaConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::configuration(e.to_string()))?;

        Ok(Self {
            http,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            folder: config.folder.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.api_base_url, self.cloud_name, path)
    }

    /// Adds `timestamp`, `api_key` and `signature` to the call parameters.
    fn signed(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        params.retain(|(_, value)| !value.is_empty());
        params.push(("timestamp", Utc::now().timestamp().to_string()));
        let signature = signature::sign(&params, &self.api_secret);
        params.push(("api_key", self.api_key.clone()));
        params.push(("signature", signature));
        params
    }
}

/// Decodes a success body, or turns the provider's error body into a
/// [`ProviderError::Api`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body,
    };

    Err(ProviderError::api(status.as_u16(), message))
}

#[async_trait]
impl AssetProvider for MediaProvider {
    fn name(&self) -> &'static str {
        "Cloudinary"
    }

    fn namespace(&self) -> &str {
        &self.folder
    }

    async fn store(
        &self,
        source: &UploadSource,
        filename: &str,
    ) -> Result<AssetReference, ProviderError> {
        let public_id = public_id_for(filename);
        let data = tokio::fs::read(&source.path).await?;

        let params = self.signed(vec![
            ("folder", self.folder.clone()),
            ("public_id", public_id.clone()),
        ]);

        let file_name = source
            .original_name
            .clone()
            .unwrap_or_else(|| filename.to_string());
        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(source.content_type_or_default())?;

        let form = params
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
            .part("file", part);

        debug!(public_id = %public_id, size = source.size, "Sending upload to media provider");

        let response = self
            .http
            .post(self.endpoint("image/upload"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = decode(response).await?;

        info!(public_id = %uploaded.public_id, "Stored asset with media provider");

        Ok(AssetReference::Media {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn list(
        &self,
        prefix: &str,
        max_results: usize,
    ) -> Result<Vec<AssetDescriptor>, ProviderError> {
        let max_results = max_results.min(MAX_LIST_RESULTS);

        let mut query = vec![("max_results", max_results.to_string())];
        if !prefix.is_empty() {
            query.push(("prefix", prefix.to_string()));
        }

        let response = self
            .http
            .get(self.endpoint("resources/image/upload"))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .query(&query)
            .send()
            .await?;
        let mut listed: ResourcesResponse = decode(response).await?;

        listed.resources.truncate(max_results);
        debug!(count = listed.resources.len(), prefix = %prefix, "Listed media assets");

        Ok(listed.resources)
    }

    async fn delete(&self, id: &str) -> Result<DeletionResult, ProviderError> {
        let params = self.signed(vec![("public_id", id.to_string())]);

        let response = self
            .http
            .post(self.endpoint("image/destroy"))
            .form(&params)
            .send()
            .await?;
        let result: DeletionResult = decode(response).await?;

        info!(
            public_id = %id,
            result = %result.result,
            removed = result.is_ok(),
            "Media provider acknowledged delete"
        );

        Ok(result)
    }
}
