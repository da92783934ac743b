//! Photodrop storage server
//!
//! Relays uploads to an object store. Listing and deletion are not offered.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photodrop_core::ObjectStorageProvider;
use photodrop_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photodrop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let storage = config
        .storage()
        .context("object storage is not configured (set PHOTODROP__STORAGE__*)")?;

    let provider =
        ObjectStorageProvider::from_config(storage).context("failed to create storage provider")?;
    info!(
        backend = provider.backend_name(),
        folder = %storage.folder,
        "Object storage configured"
    );

    photodrop_api::serve(&config, Arc::new(provider))
        .await
        .context("server error")
}
