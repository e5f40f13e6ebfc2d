//! Destination aggregation: roll many package records into one summary.
//!
//! Everything here is derived, request-scoped, and recomputed from the
//! package list on demand; nothing is persisted. Basic counting and order
//! statistics only.

use crate::store::HolidayPackage;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Fixed night-count bucket boundaries: (label, min, max inclusive).
pub const DURATION_BUCKETS: &[(&str, u32, Option<u32>)] = &[
    ("1–4 nights", 1, Some(4)),
    ("5–7 nights", 5, Some(7)),
    ("8–10 nights", 8, Some(10)),
    ("11–14 nights", 11, Some(14)),
    ("15+ nights", 15, None),
];

/// Share of packages an inclusion must appear in to count as "typical".
const INCLUSION_MIN_SHARE: f64 = 0.20;

const TOP_TAGS_CAP: usize = 8;
const TOP_INCLUSIONS_CAP: usize = 10;
const TOP_HOTELS_CAP: usize = 5;
const FEATURED_CAP: usize = 10;
const TYPICAL_DURATIONS_CAP: usize = 2;

/// One duration bucket with its tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationBucket {
    pub label: &'static str,
    pub count: usize,
}

/// A normalized inclusion phrase with the number of packages carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedInclusion {
    pub phrase: String,
    pub count: usize,
}

/// Projection of a package chosen for the featured subset.
#[derive(Debug, Clone)]
pub struct FeaturedPackage {
    pub slug: String,
    pub title: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub duration: Option<String>,
    pub image_url: Option<String>,
    pub special_offer: bool,
}

/// Destination-level summary computed from the matching package set.
///
/// Invariants: `price_min <= price_median <= price_max` whenever all three
/// are present, and the bucket counts sum to the number of packages whose
/// duration string yielded a parseable night count.
#[derive(Debug, Clone, Default)]
pub struct DestinationAggregate {
    pub destination: String,
    pub package_count: usize,
    pub price_min: Option<f64>,
    pub price_median: Option<f64>,
    pub price_max: Option<f64>,
    /// Currency shared by the priced packages, when unambiguous.
    pub currency: Option<String>,
    /// Ranked tag list, deduplicated, capped at 8.
    pub top_tags: Vec<String>,
    /// All five fixed buckets, in boundary order, zero counts included.
    pub duration_buckets: Vec<DurationBucket>,
    /// Labels of up to two buckets holding at least two packages each,
    /// ranked by count.
    pub typical_durations: Vec<String>,
    /// Normalized phrases present in at least 20% of packages, by count
    /// descending, capped at 10.
    pub top_inclusions: Vec<RankedInclusion>,
    /// Lead hotels ranked by how many packages use them, capped at 5.
    pub top_hotels: Vec<String>,
    /// Distinct departure months in calendar order.
    pub departure_months: Vec<String>,
    pub special_offer_count: usize,
    /// Display-ordered subset, capped at 10.
    pub featured: Vec<FeaturedPackage>,
}

impl DestinationAggregate {
    /// Whether the aggregate is worth rendering at all. Zero qualifying
    /// packages is equivalent to NotFound for every caller.
    pub fn is_empty(&self) -> bool {
        self.package_count == 0
    }

    /// Build the summary over an already-matched, already-published set.
    pub fn build(destination: &str, packages: &[HolidayPackage]) -> Self {
        if packages.is_empty() {
            return Self {
                destination: destination.to_string(),
                duration_buckets: empty_buckets(),
                ..Default::default()
            };
        }

        let (price_min, price_median, price_max) = price_stats(packages);
        let duration_buckets = bucket_durations(packages);
        let typical_durations = typical_durations(&duration_buckets);

        Self {
            destination: destination.to_string(),
            package_count: packages.len(),
            price_min,
            price_median,
            price_max,
            currency: shared_currency(packages),
            top_tags: top_tags(packages),
            duration_buckets,
            typical_durations,
            top_inclusions: top_inclusions(packages),
            top_hotels: top_hotels(packages),
            departure_months: departure_months(packages),
            special_offer_count: packages.iter().filter(|p| p.special_offer).count(),
            featured: featured(packages),
        }
    }
}

fn empty_buckets() -> Vec<DurationBucket> {
    DURATION_BUCKETS
        .iter()
        .map(|bucket| DurationBucket {
            label: bucket.0,
            count: 0,
        })
        .collect()
}

/// Extract the night count from a display duration like "7 nights".
///
/// Takes the first run of digits; zero is not a parseable stay length.
pub fn parse_nights(duration: &str) -> Option<u32> {
    let digits: String = duration
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// Normalize an inclusion phrase: trim, lower-case, collapse whitespace.
pub fn normalize_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn price_stats(packages: &[HolidayPackage]) -> (Option<f64>, Option<f64>, Option<f64>) {
    let mut prices: Vec<f64> = packages
        .iter()
        .filter_map(|p| p.price)
        .filter(|price| *price > 0.0)
        .collect();
    if prices.is_empty() {
        return (None, None, None);
    }
    prices.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let min = prices[0];
    let max = prices[prices.len() - 1];
    let median = if prices.len() % 2 == 1 {
        prices[prices.len() / 2]
    } else {
        // Even count: midpoint mean, rounded to the nearest whole unit.
        let lower = prices[prices.len() / 2 - 1];
        let upper = prices[prices.len() / 2];
        ((lower + upper) / 2.0).round()
    };

    (Some(min), Some(median), Some(max))
}

fn shared_currency(packages: &[HolidayPackage]) -> Option<String> {
    let mut currencies: HashSet<&str> = HashSet::new();
    for package in packages {
        if package.price.is_some() {
            if let Some(code) = package.currency.as_deref() {
                currencies.insert(code);
            }
        }
    }
    if currencies.len() == 1 {
        currencies.into_iter().next().map(str::to_string)
    } else {
        None
    }
}

fn top_tags(packages: &[HolidayPackage]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for package in packages {
        for tag in &package.tags {
            let tag = tag.trim();
            if !tag.is_empty() {
                *counts.entry(tag).or_default() += 1;
            }
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(TOP_TAGS_CAP)
        .map(|(tag, _)| tag.to_string())
        .collect()
}

fn bucket_durations(packages: &[HolidayPackage]) -> Vec<DurationBucket> {
    let mut buckets = empty_buckets();
    for nights in packages
        .iter()
        .filter_map(|p| p.duration.as_deref())
        .filter_map(parse_nights)
    {
        for (i, (_, min, max)) in DURATION_BUCKETS.iter().enumerate() {
            let fits = nights >= *min && max.map_or(true, |m| nights <= m);
            if fits {
                buckets[i].count += 1;
                break;
            }
        }
    }
    buckets
}

/// A bucket is typical only when it holds at least two packages; one
/// package is a data point, not a pattern. Ranked by count, capped at two.
fn typical_durations(buckets: &[DurationBucket]) -> Vec<String> {
    let mut qualifying: Vec<&DurationBucket> =
        buckets.iter().filter(|b| b.count >= 2).collect();
    qualifying.sort_by(|a, b| b.count.cmp(&a.count));
    qualifying
        .into_iter()
        .take(TYPICAL_DURATIONS_CAP)
        .map(|b| b.label.to_string())
        .collect()
}

fn top_inclusions(packages: &[HolidayPackage]) -> Vec<RankedInclusion> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for package in packages {
        // Per-package dedup so "flights" listed twice still counts once.
        let normalized: HashSet<String> = package
            .inclusions
            .iter()
            .map(|phrase| normalize_phrase(phrase))
            .filter(|phrase| !phrase.is_empty())
            .collect();
        for phrase in normalized {
            *counts.entry(phrase).or_default() += 1;
        }
    }

    let threshold = (packages.len() as f64 * INCLUSION_MIN_SHARE).ceil() as usize;
    let mut ranked: Vec<RankedInclusion> = counts
        .into_iter()
        .filter(|(_, count)| *count >= threshold.max(1))
        .map(|(phrase, count)| RankedInclusion { phrase, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.phrase.cmp(&b.phrase)));
    ranked.truncate(TOP_INCLUSIONS_CAP);
    ranked
}

fn top_hotels(packages: &[HolidayPackage]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for package in packages {
        if let Some(lead) = package
            .accommodations
            .iter()
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
        {
            *counts.entry(lead).or_default() += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(TOP_HOTELS_CAP)
        .map(|(name, _)| name.to_string())
        .collect()
}

const MONTH_ORDER: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

fn departure_months(packages: &[HolidayPackage]) -> Vec<String> {
    let seen: HashSet<String> = packages
        .iter()
        .flat_map(|p| p.departure_months.iter())
        .map(|m| m.trim().to_lowercase())
        .collect();
    MONTH_ORDER
        .iter()
        .filter(|month| seen.contains(&month.to_lowercase()))
        .map(|month| month.to_string())
        .collect()
}

fn featured(packages: &[HolidayPackage]) -> Vec<FeaturedPackage> {
    let mut ranked: Vec<&HolidayPackage> = packages.iter().collect();
    // Explicit display order wins; everything else falls back to most
    // recently updated.
    ranked.sort_by(|a, b| match (a.display_order, b.display_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.updated_at.cmp(&a.updated_at),
    });
    ranked
        .into_iter()
        .take(FEATURED_CAP)
        .map(|p| FeaturedPackage {
            slug: p.slug.clone(),
            title: p.title.clone(),
            price: p.price.filter(|price| *price > 0.0),
            currency: p.currency.clone(),
            duration: p.duration.clone(),
            image_url: p.image_url.clone(),
            special_offer: p.special_offer,
        })
        .collect()
}
