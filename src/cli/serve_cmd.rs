//! Run the injection server.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, ConfigArgs};
use crate::server;
use crate::store::{ContentStore, JsonStore};

/// Resolve configuration, load the content store, and serve until ctrl-c.
pub async fn run(args: ConfigArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("meridian_seo=info".parse().unwrap()),
        )
        .init();

    let config = Config::resolve(args)?;
    info!(
        "starting meridian v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment.as_str()
    );

    let store = JsonStore::load(&config.data_dir)
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    let store: Arc<dyn ContentStore> = Arc::new(store);

    let state = server::build_state(config, store);
    server::serve(state).await
}
