//! Normalized view models.
//!
//! Upstream shapes are heterogeneous: cached third-party products, live
//! API payloads, internal packages, blog posts. Each becomes exactly one
//! [`PageView`] here, and nothing downstream ever touches a raw record.
//! Views live for one request and are never persisted.

use crate::pages::StaticPage;
use crate::seo::truncate_chars;
use crate::store::{BlogPost, HolidayPackage, ItineraryDay, TourProduct};
use chrono::{DateTime, Utc};

/// Source-level text caps, applied once at normalization.
pub const TITLE_CAP: usize = 160;
pub const SUMMARY_CAP: usize = 300;
pub const BODY_CAP: usize = 500;

/// Content kinds, one per cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Tour,
    Package,
    Destination,
    Blog,
    Static,
    Deals,
}

impl PageKind {
    /// Cache namespace prefix; also the snapshot subdirectory name.
    pub fn namespace(&self) -> &'static str {
        match self {
            PageKind::Tour => "tour",
            PageKind::Package => "package",
            PageKind::Destination => "destination",
            PageKind::Blog => "blog",
            PageKind::Static => "static",
            PageKind::Deals => "holiday-deals",
        }
    }

    /// Namespaced cache key, e.g. `package:rome-city-break`.
    pub fn cache_key(&self, slug: &str) -> String {
        format!("{}:{slug}", self.namespace())
    }
}

/// Canonical, read-only projection of one page's content.
#[derive(Debug, Clone)]
pub struct PageView {
    pub kind: PageKind,
    pub slug: String,
    /// Site path, e.g. `/packages/rome-city-break`.
    pub path: String,
    pub title: String,
    pub description: String,
    pub destination: Option<String>,
    pub duration_days: Option<u32>,
    /// Display duration, e.g. "7 nights" or "3 days".
    pub duration_label: Option<String>,
    pub price_from: Option<f64>,
    pub currency: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
    pub highlights: Vec<String>,
    pub itinerary: Vec<ItineraryDay>,
    pub requirements: Vec<String>,
    /// Important-information free text, capped.
    pub attention: Option<String>,
}

impl PageView {
    pub fn from_package(pkg: &HolidayPackage) -> Self {
        let duration_days = pkg.duration.as_deref().and_then(crate::aggregate::parse_nights);
        Self {
            kind: PageKind::Package,
            slug: pkg.slug.clone(),
            path: format!("/packages/{}", pkg.slug),
            title: truncate_chars(&pkg.title, TITLE_CAP),
            description: package_description(pkg),
            destination: pkg.category.clone(),
            duration_days,
            duration_label: pkg.duration.clone(),
            price_from: pkg.price.filter(|p| *p > 0.0),
            currency: pkg.currency.clone(),
            image_url: pkg.image_url.clone(),
            published_at: None,
            updated_at: pkg.updated_at,
            tags: pkg.tags.clone(),
            inclusions: pkg.inclusions.clone(),
            exclusions: pkg.exclusions.clone(),
            highlights: pkg.highlights.clone(),
            itinerary: pkg.itinerary.clone(),
            requirements: pkg.requirements.clone(),
            attention: pkg.other_info.as_deref().map(|t| truncate_chars(t, BODY_CAP)),
        }
    }

    pub fn from_product(product: &TourProduct) -> Self {
        Self {
            kind: PageKind::Tour,
            slug: product.id.clone(),
            path: format!("/tour/{}", product.id),
            title: truncate_chars(&product.name, TITLE_CAP),
            description: product_description(product),
            destination: product.destination.clone(),
            duration_days: product.duration_days,
            duration_label: product.duration_days.map(|d| {
                if d == 1 {
                    "1 day".to_string()
                } else {
                    format!("{d} days")
                }
            }),
            price_from: product.price.filter(|p| *p > 0.0),
            currency: product.currency.clone(),
            image_url: product.image_url.clone(),
            published_at: None,
            updated_at: product.updated_at,
            tags: product.tags.clone(),
            inclusions: product.inclusions.clone(),
            exclusions: product.exclusions.clone(),
            highlights: product.highlights.clone(),
            itinerary: product.itinerary.clone(),
            requirements: Vec::new(),
            attention: None,
        }
    }

    pub fn from_post(post: &BlogPost) -> Self {
        let description = post
            .excerpt
            .as_deref()
            .map(|t| truncate_chars(t, SUMMARY_CAP))
            .or_else(|| post.body.as_deref().map(|t| truncate_chars(t, SUMMARY_CAP)))
            .unwrap_or_else(|| truncate_chars(&post.title, SUMMARY_CAP));
        Self {
            kind: PageKind::Blog,
            slug: post.slug.clone(),
            path: format!("/blog/{}", post.slug),
            title: truncate_chars(&post.title, TITLE_CAP),
            description,
            destination: None,
            duration_days: None,
            duration_label: None,
            price_from: None,
            currency: None,
            image_url: post.image_url.clone(),
            published_at: post.published_at,
            updated_at: post.updated_at,
            tags: post.tags.clone(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            highlights: Vec::new(),
            itinerary: Vec::new(),
            requirements: Vec::new(),
            attention: post.body.as_deref().map(|t| truncate_chars(t, BODY_CAP)),
        }
    }

    pub fn from_static(page: &StaticPage) -> Self {
        Self {
            kind: page.kind,
            slug: page.slug.to_string(),
            path: page.path.to_string(),
            title: page.title.to_string(),
            description: page.description.to_string(),
            destination: None,
            duration_days: None,
            duration_label: None,
            price_from: None,
            currency: None,
            image_url: None,
            published_at: None,
            updated_at: None,
            tags: Vec::new(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            highlights: Vec::new(),
            itinerary: Vec::new(),
            requirements: Vec::new(),
            attention: None,
        }
    }

    /// Destination landing page view, derived from the aggregate's name.
    pub fn for_destination(slug: &str, destination: &str, description: String) -> Self {
        Self {
            kind: PageKind::Destination,
            slug: slug.to_string(),
            path: format!("/destinations/{slug}"),
            title: format!("{destination} Holidays"),
            description,
            destination: Some(destination.to_string()),
            duration_days: None,
            duration_label: None,
            price_from: None,
            currency: None,
            image_url: None,
            published_at: None,
            updated_at: None,
            tags: Vec::new(),
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            highlights: Vec::new(),
            itinerary: Vec::new(),
            requirements: Vec::new(),
            attention: None,
        }
    }

    /// Breadcrumb trail as (name, path) pairs ending at this page.
    pub fn breadcrumb_trail(&self) -> Vec<(String, String)> {
        let mut trail = vec![("Home".to_string(), "/".to_string())];
        match self.kind {
            PageKind::Tour => trail.push(("Tours".to_string(), "/tours".to_string())),
            PageKind::Package => trail.push(("Packages".to_string(), "/packages".to_string())),
            PageKind::Destination => {
                trail.push(("Destinations".to_string(), "/destinations".to_string()))
            }
            PageKind::Blog => trail.push(("Blog".to_string(), "/blog".to_string())),
            PageKind::Static | PageKind::Deals => {}
        }
        if self.path != "/" {
            trail.push((self.title.clone(), self.path.clone()));
        }
        trail
    }
}

/// A link to a sibling page, rendered in the related-items fragment.
#[derive(Debug, Clone)]
pub struct RelatedItem {
    pub title: String,
    pub path: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

/// One entry on a listing page; feeds the ItemList JSON-LD and the
/// crawlable cards.
#[derive(Debug, Clone)]
pub struct ListItem {
    pub title: String,
    pub path: String,
    pub summary: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

/// Canonical slug form: lower-case, non-alphanumeric runs collapsed to `-`.
pub fn normalize_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

fn package_description(pkg: &HolidayPackage) -> String {
    if let Some(summary) = pkg.summary.as_deref() {
        return truncate_chars(summary, SUMMARY_CAP);
    }
    if let Some(description) = pkg.description.as_deref() {
        return truncate_chars(description, SUMMARY_CAP);
    }
    // Compose from whichever facts are present; nothing is invented.
    let mut parts = vec![pkg.title.clone()];
    if let Some(duration) = pkg.duration.as_deref() {
        parts.push(format!("{duration} holiday"));
    }
    if let Some(category) = pkg.category.as_deref() {
        parts.push(format!("in {category}"));
    }
    if let Some(price) = pkg.price.filter(|p| *p > 0.0) {
        parts.push(format!(
            "from {} per person",
            crate::seo::format_price(price, pkg.currency.as_deref())
        ));
    }
    truncate_chars(&parts.join(", "), SUMMARY_CAP)
}

fn product_description(product: &TourProduct) -> String {
    if let Some(summary) = product.summary.as_deref() {
        return truncate_chars(summary, SUMMARY_CAP);
    }
    if let Some(description) = product.description.as_deref() {
        return truncate_chars(description, SUMMARY_CAP);
    }
    let mut parts = vec![product.name.clone()];
    if let Some(destination) = product.destination.as_deref() {
        parts.push(format!("in {destination}"));
    }
    truncate_chars(&parts.join(", "), SUMMARY_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_slug() {
        assert_eq!(normalize_slug("Costa del Sol"), "costa-del-sol");
        assert_eq!(normalize_slug("  Îles -- d'Or  "), "les-d-or");
        assert_eq!(normalize_slug("Italy"), "italy");
        assert_eq!(normalize_slug("A&B"), "a-b");
    }

    #[test]
    fn test_package_view_caps_and_paths() {
        let pkg = HolidayPackage {
            id: 7,
            slug: "rome-city-break".to_string(),
            title: "R".repeat(400),
            category: Some("Italy".to_string()),
            price: Some(499.0),
            currency: Some("GBP".to_string()),
            duration: Some("3 nights".to_string()),
            ..Default::default()
        };
        let view = PageView::from_package(&pkg);
        assert_eq!(view.title.chars().count(), TITLE_CAP);
        assert_eq!(view.path, "/packages/rome-city-break");
        assert_eq!(view.duration_days, Some(3));
        assert_eq!(view.price_from, Some(499.0));
    }

    #[test]
    fn test_composed_description_uses_present_fields_only() {
        let pkg = HolidayPackage {
            id: 1,
            slug: "mystery".to_string(),
            title: "Mystery Escape".to_string(),
            ..Default::default()
        };
        let view = PageView::from_package(&pkg);
        assert_eq!(view.description, "Mystery Escape");

        let pkg2 = HolidayPackage {
            duration: Some("7 nights".to_string()),
            category: Some("Greece".to_string()),
            ..pkg
        };
        let view2 = PageView::from_package(&pkg2);
        assert_eq!(view2.description, "Mystery Escape, 7 nights holiday, in Greece");
    }

    #[test]
    fn test_zero_price_becomes_absent() {
        let pkg = HolidayPackage {
            id: 1,
            slug: "p".to_string(),
            title: "P".to_string(),
            price: Some(0.0),
            ..Default::default()
        };
        assert_eq!(PageView::from_package(&pkg).price_from, None);
    }

    #[test]
    fn test_blog_view_prefers_excerpt() {
        let post = BlogPost {
            id: 1,
            slug: "guide".to_string(),
            title: "Guide".to_string(),
            excerpt: Some("A short guide.".to_string()),
            body: Some("Long body.".to_string()),
            published: true,
            ..Default::default()
        };
        let view = PageView::from_post(&post);
        assert_eq!(view.description, "A short guide.");
        assert_eq!(view.path, "/blog/guide");
    }

    #[test]
    fn test_breadcrumb_trails() {
        let pkg = HolidayPackage {
            id: 1,
            slug: "rome".to_string(),
            title: "Rome".to_string(),
            ..Default::default()
        };
        let trail = PageView::from_package(&pkg).breadcrumb_trail();
        assert_eq!(
            trail,
            vec![
                ("Home".to_string(), "/".to_string()),
                ("Packages".to_string(), "/packages".to_string()),
                ("Rome".to_string(), "/packages/rome".to_string()),
            ]
        );
    }

    #[test]
    fn test_cache_keys_are_namespaced() {
        assert_eq!(PageKind::Tour.cache_key("123"), "tour:123");
        assert_eq!(PageKind::Deals.cache_key("deals"), "holiday-deals:deals");
    }
}
