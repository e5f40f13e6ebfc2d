//! Backing-store records and the read-only lookup interface.
//!
//! The persistent store itself lives outside this service. The pipeline
//! consumes it through [`ContentStore`]; every method is a read. Lookup
//! failures are ordinary `Err` values; the resolver decides whether an
//! error ends a request or just advances a fallback chain.

pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// One day of a package or tour itinerary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
}

/// An internally managed flight-plus-hotel package.
///
/// This is the richest record in the store: the destination aggregation
/// engine, the FAQ synthesizer, and the fragment builder all read from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayPackage {
    pub id: u64,
    pub slug: String,
    pub title: String,
    /// Destination name; drives `/destinations/:slug` matching.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Lead-in price per person. Non-positive values are treated as absent.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    /// Display duration, e.g. "7 nights".
    #[serde(default)]
    pub duration: Option<String>,
    /// Travel-style tags, e.g. "Beach", "Cultural".
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    /// Hotel names, first entry is the lead hotel.
    #[serde(default)]
    pub accommodations: Vec<String>,
    /// Passport, visa and health notes.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Months with scheduled departures, e.g. ["May", "June", "September"].
    #[serde(default)]
    pub departure_months: Vec<String>,
    /// Free-text important information (insurance, taxes, surcharges).
    #[serde(default)]
    pub other_info: Option<String>,
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
    /// Booking confirmation lead time, e.g. "within 24 hours".
    #[serde(default)]
    pub confirmation: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Explicit featured ranking; lower sorts first.
    #[serde(default)]
    pub display_order: Option<u32>,
    #[serde(default)]
    pub special_offer: bool,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for HolidayPackage {
    fn default() -> Self {
        Self {
            id: 0,
            slug: String::new(),
            title: String::new(),
            category: None,
            summary: None,
            description: None,
            price: None,
            currency: None,
            duration: None,
            tags: Vec::new(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            highlights: Vec::new(),
            itinerary: Vec::new(),
            accommodations: Vec::new(),
            requirements: Vec::new(),
            departure_months: Vec::new(),
            other_info: None,
            check_in: None,
            check_out: None,
            confirmation: None,
            image_url: None,
            display_order: None,
            special_offer: false,
            published: true,
            updated_at: None,
        }
    }
}

/// A third-party tour product, as cached locally or fetched live.
///
/// Already normalized to one shape regardless of which currency snapshot
/// or API response it came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TourProduct {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub inclusions: Vec<String>,
    #[serde(default)]
    pub exclusions: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A blog post. Unpublished posts are invisible to the whole pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A curated entry for the site-wide FAQ page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub display_order: Option<u32>,
    #[serde(default = "default_true")]
    pub published: bool,
}

/// Read-only lookup interface over the persistent store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// A cached third-party product by id, in one currency snapshot.
    async fn cached_product(&self, id: &str, currency: &str)
        -> anyhow::Result<Option<TourProduct>>;

    /// All cached third-party products in one currency snapshot.
    async fn cached_products(&self, currency: &str) -> anyhow::Result<Vec<TourProduct>>;

    /// Every package, published or not. Callers filter.
    async fn all_packages(&self) -> anyhow::Result<Vec<HolidayPackage>>;

    async fn package_by_slug(&self, slug: &str) -> anyhow::Result<Option<HolidayPackage>>;

    /// Published posts, most recent first.
    async fn published_posts(&self) -> anyhow::Result<Vec<BlogPost>>;

    /// A post by slug regardless of published state. Callers must check
    /// `published`; an unpublished post is indistinguishable from a miss
    /// at the HTTP surface.
    async fn post_by_slug(&self, slug: &str) -> anyhow::Result<Option<BlogPost>>;

    /// Published FAQ entries in display order.
    async fn published_faqs(&self) -> anyhow::Result<Vec<FaqEntry>>;
}
