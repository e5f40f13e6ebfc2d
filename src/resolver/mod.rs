//! Path-to-content resolution.
//!
//! The resolver turns a dispatch [`Target`] into a [`Resolved`] bundle: the
//! normalized view plus everything the builders need alongside it. Its
//! surface is infallible: upstream and store errors are logged and treated
//! as misses, so a broken tier can only ever degrade a page to the next
//! tier or to `NotFound`, never to a 500.

pub mod view;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::aggregate::DestinationAggregate;
use crate::faq::{self, FaqItem};
use crate::pages::{self, StaticPage};
use crate::seo::{format_price, truncate_chars};
use crate::store::{ContentStore, FaqEntry, HolidayPackage};
use crate::tours::TourApi;
use view::{normalize_slug, ListItem, PageKind, PageView, RelatedItem, SUMMARY_CAP};

/// Related packages shown on a package page.
const RELATED_CAP: usize = 4;

/// Cards on the home and holiday-deals listings.
const FEATURED_LISTING_CAP: usize = 12;

/// A single content page: view, synthesized FAQs, related items.
#[derive(Debug, Clone)]
pub struct PageBundle {
    pub view: PageView,
    pub faqs: Vec<FaqItem>,
    pub related: Vec<RelatedItem>,
}

/// A destination page: view plus the package aggregate behind it.
#[derive(Debug, Clone)]
pub struct DestinationBundle {
    pub view: PageView,
    pub aggregate: DestinationAggregate,
    pub faqs: Vec<FaqItem>,
}

/// A listing page: view plus its cards.
#[derive(Debug, Clone)]
pub struct ListingBundle {
    pub view: PageView,
    pub items: Vec<ListItem>,
    pub faqs: Vec<FaqItem>,
}

/// Outcome of resolution. `NotFound` means the shell is served untouched.
#[derive(Debug, Clone)]
pub enum Resolved {
    Page(Box<PageBundle>),
    Destination(Box<DestinationBundle>),
    Listing(Box<ListingBundle>),
    NotFound,
}

impl Resolved {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolved::NotFound)
    }
}

/// What a request path asks for, before any store lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Third-party tour product by id.
    Tour(String),
    /// Package by slug.
    Package(String),
    /// Destination by normalized slug.
    Destination(String),
    /// Blog post by slug.
    Blog(String),
    /// Fixed page from the registry.
    Page(&'static StaticPage),
}

impl Target {
    /// Map a request path to a target. `None` means the path is not one the
    /// injector knows; the SPA shell is served untouched.
    pub fn from_path(path: &str) -> Option<Target> {
        let path = normalize_path(path);
        if let Some(page) = pages::static_page(&path) {
            return Some(Target::Page(page));
        }

        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        match segments.as_slice() {
            ["tour", id] if !id.is_empty() => Some(Target::Tour((*id).to_string())),
            ["packages", slug] if !slug.is_empty() => Some(Target::Package((*slug).to_string())),
            ["destinations", slug] if !slug.is_empty() => {
                Some(Target::Destination(normalize_slug(slug)))
            }
            ["blog", slug] if !slug.is_empty() => Some(Target::Blog((*slug).to_string())),
            // Legacy booking-engine paths: /Holidays/Italy and
            // /Holidays/Italy/rome-city-break still resolve.
            [holidays, country] if holidays.eq_ignore_ascii_case("holidays") && !country.is_empty() => {
                Some(Target::Destination(normalize_slug(country)))
            }
            [holidays, _country, slug]
                if holidays.eq_ignore_ascii_case("holidays") && !slug.is_empty() =>
            {
                Some(Target::Package((*slug).to_string()))
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> PageKind {
        match self {
            Target::Tour(_) => PageKind::Tour,
            Target::Package(_) => PageKind::Package,
            Target::Destination(_) => PageKind::Destination,
            Target::Blog(_) => PageKind::Blog,
            Target::Page(page) => page.kind,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Target::Tour(id) => id,
            Target::Package(slug) | Target::Destination(slug) | Target::Blog(slug) => slug,
            Target::Page(page) => page.slug,
        }
    }

    /// Namespaced response-cache key.
    pub fn cache_key(&self) -> String {
        self.kind().cache_key(self.slug())
    }
}

/// Trailing-slash-insensitive path form; root stays `/`.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Store-backed resolution with the tour fallback chain.
pub struct Resolver {
    store: Arc<dyn ContentStore>,
    tour_api: Option<Arc<dyn TourApi>>,
    preferred_currency: String,
    secondary_currency: String,
}

impl Resolver {
    pub fn new(
        store: Arc<dyn ContentStore>,
        tour_api: Option<Arc<dyn TourApi>>,
        preferred_currency: &str,
        secondary_currency: &str,
    ) -> Self {
        Self {
            store,
            tour_api,
            preferred_currency: preferred_currency.to_string(),
            secondary_currency: secondary_currency.to_string(),
        }
    }

    pub async fn resolve(&self, target: &Target) -> Resolved {
        match target {
            Target::Tour(id) => self.resolve_tour(id).await,
            Target::Package(slug) => self.resolve_package(slug).await,
            Target::Destination(slug) => self.resolve_destination(slug).await,
            Target::Blog(slug) => self.resolve_blog(slug).await,
            Target::Page(page) => self.resolve_page(page).await,
        }
    }

    /// Tour lookup chain: preferred-currency cache, secondary-currency
    /// cache, live API, then the package store under the same identifier.
    /// A failed tier advances the chain; it never ends the request.
    async fn resolve_tour(&self, id: &str) -> Resolved {
        for currency in [&self.preferred_currency, &self.secondary_currency] {
            match self.store.cached_product(id, currency).await {
                Ok(Some(product)) => {
                    let faqs = faq::product_faqs(&product);
                    return page(PageView::from_product(&product), faqs, Vec::new());
                }
                Ok(None) => debug!(id, currency, "tour not in cached snapshot"),
                Err(e) => warn!(id, currency, "tour snapshot read failed: {e}"),
            }
        }

        if let Some(api) = &self.tour_api {
            match api.product_details(id, &self.preferred_currency).await {
                Ok(product) => {
                    let faqs = faq::product_faqs(&product);
                    return page(PageView::from_product(&product), faqs, Vec::new());
                }
                Err(e) => warn!(id, "live tour lookup failed: {e}"),
            }
        }

        // Last tier: some tour links carry a package slug or id instead.
        if let Some(pkg) = self.package_for_identifier(id).await {
            if pkg.published {
                let faqs = faq::package_faqs(&pkg);
                let mut view = PageView::from_package(&pkg);
                // Keep the canonical on the requested tour URL.
                view.kind = PageKind::Tour;
                view.slug = id.to_string();
                view.path = format!("/tour/{id}");
                return page(view, faqs, Vec::new());
            }
        }

        debug!(id, "tour unresolved after all tiers");
        Resolved::NotFound
    }

    async fn package_for_identifier(&self, id: &str) -> Option<HolidayPackage> {
        match self.store.package_by_slug(id).await {
            Ok(Some(pkg)) => return Some(pkg),
            Ok(None) => {}
            Err(e) => warn!(id, "package lookup failed: {e}"),
        }
        let numeric: u64 = id.parse().ok()?;
        match self.store.all_packages().await {
            Ok(packages) => packages.into_iter().find(|p| p.id == numeric),
            Err(e) => {
                warn!(id, "package scan failed: {e}");
                None
            }
        }
    }

    async fn resolve_package(&self, slug: &str) -> Resolved {
        let pkg = match self.store.package_by_slug(slug).await {
            Ok(Some(pkg)) if pkg.published => pkg,
            Ok(_) => return Resolved::NotFound,
            Err(e) => {
                warn!(slug, "package lookup failed: {e}");
                return Resolved::NotFound;
            }
        };
        let faqs = faq::package_faqs(&pkg);
        let related = self.related_packages(&pkg).await;
        page(PageView::from_package(&pkg), faqs, related)
    }

    /// Published same-destination packages, featured order, capped.
    async fn related_packages(&self, pkg: &HolidayPackage) -> Vec<RelatedItem> {
        let Some(category) = pkg.category.as_deref() else {
            return Vec::new();
        };
        let mut others = match self.store.all_packages().await {
            Ok(packages) => packages,
            Err(e) => {
                warn!(slug = pkg.slug, "related lookup failed: {e}");
                return Vec::new();
            }
        };
        others.retain(|p| {
            p.published
                && p.slug != pkg.slug
                && p.category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(category))
        });
        featured_order(&mut others);
        others
            .into_iter()
            .take(RELATED_CAP)
            .map(|p| RelatedItem {
                title: p.title,
                path: format!("/packages/{}", p.slug),
                price: p.price.filter(|v| *v > 0.0),
                currency: p.currency,
            })
            .collect()
    }

    async fn resolve_destination(&self, slug: &str) -> Resolved {
        let packages = match self.store.all_packages().await {
            Ok(packages) => packages,
            Err(e) => {
                warn!(slug, "destination lookup failed: {e}");
                return Resolved::NotFound;
            }
        };
        let wanted = normalize_slug(slug);
        let matches: Vec<HolidayPackage> = packages
            .into_iter()
            .filter(|p| {
                p.published
                    && p.category
                        .as_deref()
                        .is_some_and(|c| normalize_slug(c) == wanted)
            })
            .collect();
        // Display name comes from the records, not the URL.
        let Some(display) = matches.first().and_then(|p| p.category.clone()) else {
            return Resolved::NotFound;
        };

        let aggregate = DestinationAggregate::build(&display, &matches);
        if aggregate.is_empty() {
            return Resolved::NotFound;
        }
        let description = destination_description(&aggregate);
        let faqs = faq::destination_faqs(&aggregate);
        Resolved::Destination(Box::new(DestinationBundle {
            view: PageView::for_destination(&wanted, &display, description),
            aggregate,
            faqs,
        }))
    }

    async fn resolve_blog(&self, slug: &str) -> Resolved {
        match self.store.post_by_slug(slug).await {
            Ok(Some(post)) if post.published => {
                page(PageView::from_post(&post), Vec::new(), Vec::new())
            }
            Ok(_) => Resolved::NotFound,
            Err(e) => {
                warn!(slug, "post lookup failed: {e}");
                Resolved::NotFound
            }
        }
    }

    /// Fixed pages always resolve; a store failure only empties the cards.
    async fn resolve_page(&self, fixed: &'static StaticPage) -> Resolved {
        let view = PageView::from_static(fixed);
        let (items, faqs) = match fixed.path {
            "/" | "/holiday-deals" => (self.featured_items(fixed.path).await, Vec::new()),
            "/packages" => (self.package_items().await, Vec::new()),
            "/tours" => (self.tour_items().await, Vec::new()),
            "/destinations" => (self.destination_items().await, Vec::new()),
            "/blog" => (self.blog_items().await, Vec::new()),
            "/faq" => (Vec::new(), self.curated_faqs().await),
            _ => (Vec::new(), Vec::new()),
        };
        Resolved::Listing(Box::new(ListingBundle { view, items, faqs }))
    }

    /// Cards for the home page and the deals page. Deals wants special
    /// offers only, falling back to the featured ordering when none exist.
    async fn featured_items(&self, path: &str) -> Vec<ListItem> {
        let mut packages = match self.store.all_packages().await {
            Ok(packages) => packages,
            Err(e) => {
                warn!(path, "listing lookup failed: {e}");
                return Vec::new();
            }
        };
        packages.retain(|p| p.published);
        if path == "/holiday-deals" {
            let offers: Vec<HolidayPackage> = packages
                .iter()
                .filter(|p| p.special_offer)
                .cloned()
                .collect();
            if !offers.is_empty() {
                packages = offers;
            }
        }
        featured_order(&mut packages);
        packages
            .into_iter()
            .take(FEATURED_LISTING_CAP)
            .map(package_item)
            .collect()
    }

    async fn package_items(&self) -> Vec<ListItem> {
        let mut packages = match self.store.all_packages().await {
            Ok(packages) => packages,
            Err(e) => {
                warn!("listing lookup failed: {e}");
                return Vec::new();
            }
        };
        packages.retain(|p| p.published);
        featured_order(&mut packages);
        packages.into_iter().map(package_item).collect()
    }

    /// Tour cards come from the preferred snapshot, then the secondary one
    /// when the preferred is missing or empty.
    async fn tour_items(&self) -> Vec<ListItem> {
        for currency in [&self.preferred_currency, &self.secondary_currency] {
            match self.store.cached_products(currency).await {
                Ok(products) if !products.is_empty() => {
                    return products
                        .into_iter()
                        .map(|p| ListItem {
                            title: p.name,
                            path: format!("/tour/{}", p.id),
                            summary: p.summary,
                            image_url: p.image_url,
                            price: p.price.filter(|v| *v > 0.0),
                            currency: p.currency,
                        })
                        .collect();
                }
                Ok(_) => debug!(currency, "tour snapshot empty"),
                Err(e) => warn!(currency, "tour snapshot read failed: {e}"),
            }
        }
        Vec::new()
    }

    /// One card per distinct destination, busiest first.
    async fn destination_items(&self) -> Vec<ListItem> {
        let packages = match self.store.all_packages().await {
            Ok(packages) => packages,
            Err(e) => {
                warn!("listing lookup failed: {e}");
                return Vec::new();
            }
        };
        let mut destinations: Vec<(String, String, usize, Option<f64>, Option<String>)> =
            Vec::new();
        for pkg in packages.iter().filter(|p| p.published) {
            let Some(category) = pkg.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
            else {
                continue;
            };
            let slug = normalize_slug(category);
            let price = pkg.price.filter(|v| *v > 0.0);
            match destinations.iter_mut().find(|(s, ..)| *s == slug) {
                Some(entry) => {
                    entry.2 += 1;
                    if let Some(p) = price {
                        entry.3 = Some(entry.3.map_or(p, |min: f64| min.min(p)));
                        if entry.4.is_none() {
                            entry.4 = pkg.currency.clone();
                        }
                    }
                }
                None => destinations.push((
                    slug,
                    category.to_string(),
                    1,
                    price,
                    pkg.currency.clone(),
                )),
            }
        }
        destinations.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1)));
        destinations
            .into_iter()
            .map(|(slug, name, count, price, currency)| ListItem {
                title: format!("{name} Holidays"),
                path: format!("/destinations/{slug}"),
                summary: Some(format!(
                    "{count} {}",
                    if count == 1 { "package" } else { "packages" }
                )),
                image_url: None,
                price,
                currency,
            })
            .collect()
    }

    async fn blog_items(&self) -> Vec<ListItem> {
        match self.store.published_posts().await {
            Ok(posts) => posts
                .into_iter()
                .map(|post| ListItem {
                    title: post.title,
                    path: format!("/blog/{}", post.slug),
                    summary: post.excerpt,
                    image_url: post.image_url,
                    price: None,
                    currency: None,
                })
                .collect(),
            Err(e) => {
                warn!("post listing failed: {e}");
                Vec::new()
            }
        }
    }

    async fn curated_faqs(&self) -> Vec<FaqItem> {
        match self.store.published_faqs().await {
            Ok(entries) => entries.into_iter().map(faq_item).collect(),
            Err(e) => {
                warn!("faq listing failed: {e}");
                Vec::new()
            }
        }
    }
}

fn page(view: PageView, faqs: Vec<FaqItem>, related: Vec<RelatedItem>) -> Resolved {
    Resolved::Page(Box::new(PageBundle {
        view,
        faqs,
        related,
    }))
}

fn faq_item(entry: FaqEntry) -> FaqItem {
    FaqItem {
        question: entry.question,
        answer: entry.answer,
    }
}

fn package_item(pkg: HolidayPackage) -> ListItem {
    ListItem {
        title: pkg.title,
        path: format!("/packages/{}", pkg.slug),
        summary: pkg.summary,
        image_url: pkg.image_url,
        price: pkg.price.filter(|v| *v > 0.0),
        currency: pkg.currency,
    }
}

/// Explicit ranking first (lower wins), newest update as the tiebreak.
fn featured_order(packages: &mut [HolidayPackage]) {
    packages.sort_by(|a, b| {
        let rank_a = a.display_order.unwrap_or(u32::MAX);
        let rank_b = b.display_order.unwrap_or(u32::MAX);
        rank_a.cmp(&rank_b).then_with(|| b.updated_at.cmp(&a.updated_at))
    });
}

/// Factual listing copy for a destination page.
fn destination_description(agg: &DestinationAggregate) -> String {
    let mut text = format!(
        "Compare {} {} holiday {}",
        agg.package_count,
        agg.destination,
        if agg.package_count == 1 { "package" } else { "packages" }
    );
    if let (Some(min), Some(max)) = (agg.price_min, agg.price_max) {
        text.push_str(&format!(
            ", from {} to {} per person",
            format_price(min, agg.currency.as_deref()),
            format_price(max, agg.currency.as_deref())
        ));
    }
    text.push('.');
    if !agg.top_tags.is_empty() {
        let styles: Vec<&str> = agg.top_tags.iter().take(3).map(String::as_str).collect();
        text.push_str(&format!(" Popular styles: {}.", styles.join(", ")));
    }
    truncate_chars(&text, SUMMARY_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::TourProduct;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubApi {
        product: Option<TourProduct>,
        calls: AtomicUsize,
    }

    impl StubApi {
        fn hit(product: TourProduct) -> Self {
            Self {
                product: Some(product),
                calls: AtomicUsize::new(0),
            }
        }

        fn miss() -> Self {
            Self {
                product: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TourApi for StubApi {
        async fn product_details(&self, id: &str, _currency: &str) -> anyhow::Result<TourProduct> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.product {
                Some(product) => Ok(product.clone()),
                None => anyhow::bail!("no product {id}"),
            }
        }
    }

    fn package(slug: &str, category: &str) -> HolidayPackage {
        HolidayPackage {
            id: 1,
            slug: slug.to_string(),
            title: slug.to_string(),
            category: Some(category.to_string()),
            price: Some(500.0),
            currency: Some("GBP".to_string()),
            duration: Some("7 nights".to_string()),
            ..Default::default()
        }
    }

    fn product(id: &str) -> TourProduct {
        TourProduct {
            id: id.to_string(),
            name: format!("Tour {id}"),
            price: Some(120.0),
            currency: Some("GBP".to_string()),
            ..Default::default()
        }
    }

    fn resolver(store: MemoryStore, api: Option<Arc<dyn TourApi>>) -> Resolver {
        Resolver::new(Arc::new(store), api, "GBP", "USD")
    }

    // ── Target mapping ──────────────────────────────────────────

    #[test]
    fn test_from_path_content_routes() {
        assert_eq!(
            Target::from_path("/tour/T-42"),
            Some(Target::Tour("T-42".to_string()))
        );
        assert_eq!(
            Target::from_path("/packages/rome-city-break/"),
            Some(Target::Package("rome-city-break".to_string()))
        );
        assert_eq!(
            Target::from_path("/destinations/Italy"),
            Some(Target::Destination("italy".to_string()))
        );
        assert_eq!(
            Target::from_path("/blog/packing-list"),
            Some(Target::Blog("packing-list".to_string()))
        );
        assert_eq!(Target::from_path("/checkout/basket"), None);
    }

    #[test]
    fn test_from_path_legacy_holidays_routes() {
        assert_eq!(
            Target::from_path("/Holidays/Italy"),
            Some(Target::Destination("italy".to_string()))
        );
        assert_eq!(
            Target::from_path("/Holidays/Italy/rome-city-break"),
            Some(Target::Package("rome-city-break".to_string()))
        );
    }

    #[test]
    fn test_from_path_fixed_pages() {
        let home = Target::from_path("/").unwrap();
        assert_eq!(home.cache_key(), "static:home");
        let deals = Target::from_path("/holiday-deals").unwrap();
        assert_eq!(deals.cache_key(), "holiday-deals:deals");
    }

    // ── Tour fallback chain ─────────────────────────────────────

    #[tokio::test]
    async fn test_tour_served_from_preferred_snapshot() {
        let store = MemoryStore::new().with_products("GBP", vec![product("T-1")]);
        let api: Arc<StubApi> = Arc::new(StubApi::miss());
        let r = resolver(store, Some(api.clone()));

        let resolved = r.resolve(&Target::Tour("T-1".to_string())).await;
        let Resolved::Page(bundle) = resolved else {
            panic!("expected page");
        };
        assert_eq!(bundle.view.path, "/tour/T-1");
        // The chain stopped at the first tier.
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tour_falls_through_to_live_api() {
        let store = MemoryStore::new().with_products("GBP", vec![product("other")]);
        let api: Arc<StubApi> = Arc::new(StubApi::hit(product("T-9")));
        let r = resolver(store, Some(api.clone()));

        let resolved = r.resolve(&Target::Tour("T-9".to_string())).await;
        let Resolved::Page(bundle) = resolved else {
            panic!("expected page");
        };
        assert_eq!(bundle.view.title, "Tour T-9");
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tour_last_tier_reads_package_store() {
        let store = MemoryStore::new().with_packages(vec![package("rome-city-break", "Italy")]);
        let r = resolver(store, Some(Arc::new(StubApi::miss())));

        let resolved = r.resolve(&Target::Tour("rome-city-break".to_string())).await;
        let Resolved::Page(bundle) = resolved else {
            panic!("expected page");
        };
        // Canonical stays on the requested URL.
        assert_eq!(bundle.view.kind, PageKind::Tour);
        assert_eq!(bundle.view.path, "/tour/rome-city-break");
    }

    #[tokio::test]
    async fn test_tour_numeric_id_matches_package_id() {
        let mut pkg = package("rome-city-break", "Italy");
        pkg.id = 77;
        let store = MemoryStore::new().with_packages(vec![pkg]);
        let r = resolver(store, None);

        let resolved = r.resolve(&Target::Tour("77".to_string())).await;
        assert!(matches!(resolved, Resolved::Page(_)));
    }

    #[tokio::test]
    async fn test_tour_not_found_after_all_tiers() {
        let r = resolver(MemoryStore::new(), Some(Arc::new(StubApi::miss())));
        let resolved = r.resolve(&Target::Tour("ghost".to_string())).await;
        assert!(resolved.is_not_found());
    }

    // ── Packages and related ────────────────────────────────────

    #[tokio::test]
    async fn test_package_related_same_destination_only() {
        let mut store_packages = vec![
            package("rome", "Italy"),
            package("venice", "Italy"),
            package("florence", "Italy"),
            package("paris", "France"),
        ];
        store_packages[2].published = false;
        let r = resolver(MemoryStore::new().with_packages(store_packages), None);

        let resolved = r.resolve(&Target::Package("rome".to_string())).await;
        let Resolved::Page(bundle) = resolved else {
            panic!("expected page");
        };
        let related: Vec<&str> = bundle.related.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(related, vec!["venice"]);
    }

    #[tokio::test]
    async fn test_unpublished_package_is_not_found() {
        let mut pkg = package("rome", "Italy");
        pkg.published = false;
        let r = resolver(MemoryStore::new().with_packages(vec![pkg]), None);
        assert!(r.resolve(&Target::Package("rome".to_string())).await.is_not_found());
    }

    // ── Destinations ────────────────────────────────────────────

    #[tokio::test]
    async fn test_destination_matches_category_case_insensitively() {
        let packages = vec![package("rome", "Italy"), package("venice", "ITALY")];
        let r = resolver(MemoryStore::new().with_packages(packages), None);

        let resolved = r.resolve(&Target::Destination("italy".to_string())).await;
        let Resolved::Destination(bundle) = resolved else {
            panic!("expected destination");
        };
        assert_eq!(bundle.aggregate.package_count, 2);
        assert_eq!(bundle.view.title, "Italy Holidays");
        assert!(bundle.view.description.contains("Compare 2 Italy holiday packages"));
    }

    #[tokio::test]
    async fn test_destination_without_packages_is_not_found() {
        let r = resolver(MemoryStore::new().with_packages(vec![package("rome", "Italy")]), None);
        assert!(r
            .resolve(&Target::Destination("france".to_string()))
            .await
            .is_not_found());
    }

    // ── Blog ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_unpublished_post_is_not_found() {
        let post = crate::store::BlogPost {
            id: 1,
            slug: "draft".to_string(),
            title: "Draft".to_string(),
            published: false,
            ..Default::default()
        };
        let r = resolver(MemoryStore::new().with_posts(vec![post]), None);
        assert!(r.resolve(&Target::Blog("draft".to_string())).await.is_not_found());
    }

    // ── Listings ────────────────────────────────────────────────

    #[tokio::test]
    async fn test_deals_listing_prefers_special_offers() {
        let mut offer = package("venice", "Italy");
        offer.special_offer = true;
        let packages = vec![package("rome", "Italy"), offer];
        let r = resolver(MemoryStore::new().with_packages(packages), None);

        let deals = Target::from_path("/holiday-deals").unwrap();
        let Resolved::Listing(bundle) = r.resolve(&deals).await else {
            panic!("expected listing");
        };
        let titles: Vec<&str> = bundle.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["venice"]);
    }

    #[tokio::test]
    async fn test_destinations_listing_counts_packages() {
        let packages = vec![
            package("rome", "Italy"),
            package("venice", "Italy"),
            package("paris", "France"),
        ];
        let r = resolver(MemoryStore::new().with_packages(packages), None);

        let target = Target::from_path("/destinations").unwrap();
        let Resolved::Listing(bundle) = r.resolve(&target).await else {
            panic!("expected listing");
        };
        assert_eq!(bundle.items[0].title, "Italy Holidays");
        assert_eq!(bundle.items[0].summary.as_deref(), Some("2 packages"));
        assert_eq!(bundle.items[0].path, "/destinations/italy");
        assert_eq!(bundle.items[1].title, "France Holidays");
    }

    #[tokio::test]
    async fn test_faq_page_uses_curated_entries() {
        let entries = vec![crate::store::FaqEntry {
            question: "Can I pay a deposit?".to_string(),
            answer: "Yes.".to_string(),
            display_order: Some(1),
            published: true,
        }];
        let r = resolver(MemoryStore::new().with_faqs(entries), None);

        let target = Target::from_path("/faq").unwrap();
        let Resolved::Listing(bundle) = r.resolve(&target).await else {
            panic!("expected listing");
        };
        assert_eq!(bundle.faqs.len(), 1);
        assert_eq!(bundle.faqs[0].question, "Can I pay a deposit?");
    }
}
