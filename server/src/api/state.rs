use std::sync::Arc;

use crate::config::Config;
use crate::upstream::{CatalogSource, UpstreamClient};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn CatalogSource>,
    pub placeholder_thumbnail: Arc<str>,
}

impl AppState {
    pub fn new(source: Arc<dyn CatalogSource>, placeholder_thumbnail: impl Into<Arc<str>>) -> Self {
        Self {
            source,
            placeholder_thumbnail: placeholder_thumbnail.into(),
        }
    }

    /// State backed by the real upstream API described in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = UpstreamClient::new(&config.upstream)?;
        tracing::info!("Proxying upstream content API at {}", client.base_url());
        Ok(Self::new(
            Arc::new(client),
            config.catalog.placeholder_thumbnail.as_str(),
        ))
    }
}
