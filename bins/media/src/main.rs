//! Photodrop media server
//!
//! Relays uploads to the media CDN and exposes listing and deletion.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photodrop_core::MediaProvider;
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
    let media = config
        .media()
        .context("media provider is not configured (set PHOTODROP__MEDIA__*)")?;

    let provider = MediaProvider::new(media).context("failed to create media provider")?;
    info!(
        cloud_name = %media.cloud_name,
        folder = %media.folder,
        "Media provider configured"
    );

    photodrop_api::serve(&config, Arc::new(provider))
        .await
        .context("server error")
}
