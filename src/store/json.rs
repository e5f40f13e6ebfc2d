//! JSON-file-backed store.
//!
//! Loads the admin-exported snapshots once at startup and serves every
//! lookup from memory. Layout under the data directory:
//!
//! ```text
//! packages.json        [HolidayPackage]
//! products.gbp.json    [TourProduct], one file per currency snapshot
//! products.usd.json
//! posts.json           [BlogPost]
//! faqs.json            [FaqEntry]
//! ```
//!
//! A missing file means "no records of that kind"; a file that exists but
//! fails to parse is a startup error.

use super::{BlogPost, ContentStore, FaqEntry, HolidayPackage, TourProduct};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct JsonStore {
    packages: Vec<HolidayPackage>,
    /// Currency code (lower-case) → product snapshot.
    products: HashMap<String, Vec<TourProduct>>,
    posts: Vec<BlogPost>,
    faqs: Vec<FaqEntry>,
}

impl JsonStore {
    /// Load every snapshot under `data_dir`. Product files are discovered
    /// by the `products.<currency>.json` naming convention.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let packages: Vec<HolidayPackage> = load_file(&data_dir.join("packages.json"))?;
        let posts: Vec<BlogPost> = load_file(&data_dir.join("posts.json"))?;
        let faqs: Vec<FaqEntry> = load_file(&data_dir.join("faqs.json"))?;

        let mut products = HashMap::new();
        if let Ok(entries) = std::fs::read_dir(data_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if let Some(currency) = product_file_currency(&path) {
                    let snapshot: Vec<TourProduct> = load_file(&path)?;
                    debug!(
                        "loaded {} cached products for {}",
                        snapshot.len(),
                        currency.to_uppercase()
                    );
                    products.insert(currency, snapshot);
                }
            }
        }

        debug!(
            "JsonStore loaded: {} packages, {} currencies, {} posts, {} faqs",
            packages.len(),
            products.len(),
            posts.len(),
            faqs.len()
        );

        Ok(Self {
            packages,
            products,
            posts,
            faqs,
        })
    }

    fn snapshot(&self, currency: &str) -> &[TourProduct] {
        self.products
            .get(&currency.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn load_file<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// `products.gbp.json` → `Some("gbp")`.
fn product_file_currency(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let rest = name.strip_prefix("products.")?;
    let currency = rest.strip_suffix(".json")?;
    if currency.is_empty() {
        None
    } else {
        Some(currency.to_lowercase())
    }
}

#[async_trait]
impl ContentStore for JsonStore {
    async fn cached_product(
        &self,
        id: &str,
        currency: &str,
    ) -> Result<Option<TourProduct>> {
        Ok(self.snapshot(currency).iter().find(|p| p.id == id).cloned())
    }

    async fn cached_products(&self, currency: &str) -> Result<Vec<TourProduct>> {
        Ok(self.snapshot(currency).to_vec())
    }

    async fn all_packages(&self) -> Result<Vec<HolidayPackage>> {
        Ok(self.packages.clone())
    }

    async fn package_by_slug(&self, slug: &str) -> Result<Option<HolidayPackage>> {
        Ok(self.packages.iter().find(|p| p.slug == slug).cloned())
    }

    async fn published_posts(&self) -> Result<Vec<BlogPost>> {
        let mut posts: Vec<BlogPost> =
            self.posts.iter().filter(|p| p.published).cloned().collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn published_faqs(&self) -> Result<Vec<FaqEntry>> {
        let mut faqs: Vec<FaqEntry> =
            self.faqs.iter().filter(|f| f.published).cloned().collect();
        faqs.sort_by_key(|f| f.display_order.unwrap_or(u32::MAX));
        Ok(faqs)
    }
}
