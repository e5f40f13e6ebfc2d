//! Render the injected document for a single route, offline.
//!
//! Useful for eyeballing what a crawler would receive without standing up
//! the server: `meridian render /packages/rome-city-break`.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};

use crate::config::{Config, ConfigArgs};
use crate::resolver::Target;
use crate::seo;
use crate::server;
use crate::store::{ContentStore, JsonStore};

pub async fn run(args: ConfigArgs, path: &str, fragment_only: bool) -> Result<()> {
    let config = Config::resolve(args)?;
    let store = JsonStore::load(&config.data_dir)
        .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
    let store: Arc<dyn ContentStore> = Arc::new(store);
    let state = server::build_state(config, store);

    let target = Target::from_path(path).ok_or_else(|| anyhow!("no route matches {path}"))?;
    let resolved = state.resolver.resolve(&target).await;
    let Some(payload) = seo::build_payload(&state.site, &resolved) else {
        bail!("no published content for {path}");
    };

    if fragment_only {
        println!("{}", payload.head);
        println!("{}", payload.fragment);
        return Ok(());
    }

    let template_path = &state.config.template_path;
    let template = tokio::fs::read_to_string(template_path)
        .await
        .with_context(|| format!("reading shell template {}", template_path.display()))?;
    println!("{}", state.mutator.inject(&template, &payload));
    Ok(())
}
