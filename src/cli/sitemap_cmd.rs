//! Print sitemap XML to stdout.

use anyhow::{bail, Context, Result};

use crate::config::{Config, ConfigArgs};
use crate::seo::Site;
use crate::sitemap::{self, SitemapSection};
use crate::store::JsonStore;

/// With no section, print the index; with one, print that section's urlset.
pub async fn run(args: ConfigArgs, section: Option<&str>) -> Result<()> {
    let config = Config::resolve(args)?;
    let site = Site::new(&config.base_url, &config.site_name);

    let xml = match section {
        None => sitemap::sitemap_index(&site)?,
        Some(name) => {
            let Some(section) = SitemapSection::from_name(name) else {
                bail!(
                    "unknown sitemap section {name:?} (expected one of: {})",
                    SitemapSection::ALL
                        .iter()
                        .map(|s| s.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            };
            let store = JsonStore::load(&config.data_dir)
                .with_context(|| format!("loading content from {}", config.data_dir.display()))?;
            let currencies = [config.currency.as_str(), config.secondary_currency.as_str()];
            sitemap::section_xml(section, &site, &store, &currencies).await?
        }
    };

    println!("{xml}");
    Ok(())
}
