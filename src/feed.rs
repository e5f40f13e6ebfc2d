//! JSON Feed generation (jsonfeed.org version 1.1).
//!
//! Machine-readable mirrors of the main listings, for aggregators and AI
//! crawlers that prefer structured data over HTML. Travel-specific fields
//! ride in a `_meridian` extension object, as the format requires for
//! custom keys.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::resolver::view::normalize_slug;
use crate::seo::Site;
use crate::store::ContentStore;

pub const FEED_VERSION: &str = "https://jsonfeed.org/version/1.1";

#[derive(Debug, Clone, Serialize)]
pub struct JsonFeed {
    pub version: &'static str,
    pub title: String,
    pub home_page_url: String,
    pub feed_url: String,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    /// Canonical URL doubles as the stable id, per the format's advice.
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<String>,
    #[serde(rename = "_meridian", skip_serializing_if = "Option::is_none")]
    pub meridian: Option<MeridianExtension>,
}

/// Custom extension carrying the commercial fields.
#[derive(Debug, Clone, Serialize)]
pub struct MeridianExtension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_offer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_count: Option<usize>,
}

/// The published feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Tours,
    Packages,
    Destinations,
}

impl FeedKind {
    pub const ALL: [FeedKind; 3] = [FeedKind::Tours, FeedKind::Packages, FeedKind::Destinations];

    pub fn name(&self) -> &'static str {
        match self {
            FeedKind::Tours => "tours",
            FeedKind::Packages => "packages",
            FeedKind::Destinations => "destinations",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_suffix(".json").unwrap_or(name);
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Build one feed fresh from the store.
pub async fn feed(
    kind: FeedKind,
    site: &Site,
    store: &dyn ContentStore,
    currencies: &[&str],
) -> Result<JsonFeed> {
    let items = match kind {
        FeedKind::Tours => tour_items(site, store, currencies).await?,
        FeedKind::Packages => package_items(site, store).await?,
        FeedKind::Destinations => destination_items(site, store).await?,
    };
    let title = match kind {
        FeedKind::Tours => format!("{} Tours", site.name),
        FeedKind::Packages => format!("{} Holiday Packages", site.name),
        FeedKind::Destinations => format!("{} Destinations", site.name),
    };
    Ok(JsonFeed {
        version: FEED_VERSION,
        title,
        home_page_url: format!("{}/", site.base_url),
        feed_url: site.absolute(&format!("/feed/{}", kind.name())),
        items,
    })
}

async fn package_items(site: &Site, store: &dyn ContentStore) -> Result<Vec<FeedItem>> {
    let packages = store.all_packages().await.context("reading packages")?;
    Ok(packages
        .into_iter()
        .filter(|p| p.published)
        .map(|p| {
            let url = site.absolute(&format!("/packages/{}", p.slug));
            FeedItem {
                id: url.clone(),
                url,
                title: p.title,
                summary: p.summary,
                image: p.image_url,
                date_modified: p.updated_at.map(|t| t.to_rfc3339()),
                meridian: Some(MeridianExtension {
                    price: p.price.filter(|v| *v > 0.0),
                    currency: p.currency,
                    duration: p.duration,
                    destination: p.category,
                    special_offer: Some(p.special_offer),
                    package_count: None,
                }),
            }
        })
        .collect())
}

async fn tour_items(
    site: &Site,
    store: &dyn ContentStore,
    currencies: &[&str],
) -> Result<Vec<FeedItem>> {
    for currency in currencies {
        let products = store
            .cached_products(currency)
            .await
            .with_context(|| format!("reading {currency} product snapshot"))?;
        if products.is_empty() {
            continue;
        }
        return Ok(products
            .into_iter()
            .map(|p| {
                let url = site.absolute(&format!("/tour/{}", p.id));
                FeedItem {
                    id: url.clone(),
                    url,
                    title: p.name,
                    summary: p.summary,
                    image: p.image_url,
                    date_modified: p.updated_at.map(|t| t.to_rfc3339()),
                    meridian: Some(MeridianExtension {
                        price: p.price.filter(|v| *v > 0.0),
                        currency: p.currency,
                        duration: p.duration_days.map(|d| {
                            if d == 1 {
                                "1 day".to_string()
                            } else {
                                format!("{d} days")
                            }
                        }),
                        destination: p.destination,
                        special_offer: None,
                        package_count: None,
                    }),
                }
            })
            .collect());
    }
    Ok(Vec::new())
}

async fn destination_items(site: &Site, store: &dyn ContentStore) -> Result<Vec<FeedItem>> {
    let packages = store.all_packages().await.context("reading packages")?;
    let mut groups: Vec<(String, String, usize, Option<f64>, Option<String>, Option<DateTime<Utc>>)> =
        Vec::new();
    for pkg in packages.iter().filter(|p| p.published) {
        let Some(category) = pkg.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
        else {
            continue;
        };
        let slug = normalize_slug(category);
        let price = pkg.price.filter(|v| *v > 0.0);
        match groups.iter_mut().find(|(s, ..)| *s == slug) {
            Some(entry) => {
                entry.2 += 1;
                if let Some(p) = price {
                    entry.3 = Some(entry.3.map_or(p, |min: f64| min.min(p)));
                    if entry.4.is_none() {
                        entry.4 = pkg.currency.clone();
                    }
                }
                if pkg.updated_at > entry.5 {
                    entry.5 = pkg.updated_at;
                }
            }
            None => groups.push((
                slug,
                category.to_string(),
                1,
                price,
                pkg.currency.clone(),
                pkg.updated_at,
            )),
        }
    }
    groups.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));
    Ok(groups
        .into_iter()
        .map(|(slug, name, count, price, currency, updated)| {
            let url = site.absolute(&format!("/destinations/{slug}"));
            FeedItem {
                id: url.clone(),
                url,
                title: format!("{name} Holidays"),
                summary: Some(format!(
                    "{count} {}",
                    if count == 1 { "package" } else { "packages" }
                )),
                image: None,
                date_modified: updated.map(|t| t.to_rfc3339()),
                meridian: Some(MeridianExtension {
                    price,
                    currency,
                    duration: None,
                    destination: Some(name),
                    special_offer: None,
                    package_count: Some(count),
                }),
            }
        })
        .collect())
}
