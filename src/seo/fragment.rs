//! Crawlable fragment markup.
//!
//! These builders emit the inner HTML the mutator wraps in the hidden
//! container. Headings, lists and `<details>` accordions only: plain
//! semantic markup a crawler can index without running a line of script.
//! Every section is skipped outright when its backing data is empty.

use crate::faq::FaqItem;
use crate::resolver::view::{ListItem, PageView, RelatedItem};
use crate::resolver::{DestinationBundle, ListingBundle};
use crate::seo::{escape_html, format_price, Site};

/// Itinerary days spelled out before the remainder is summarized.
const ITINERARY_DAY_CAP: usize = 5;

const IDEAL_FOR_CAP: usize = 6;
const LESS_SUITED_CAP: usize = 4;

/// Travel-style tag to suitability phrases: (tag, ideal for, less suited to).
const SUITABILITY: &[(&str, &[&str], &[&str])] = &[
    ("beach", &["beach lovers", "sun seekers"], &[]),
    (
        "city break",
        &["weekend travellers", "culture fans"],
        &["those after a single-hotel beach stay"],
    ),
    ("cultural", &["history enthusiasts", "museum goers"], &[]),
    (
        "adventure",
        &["active travellers"],
        &["those with limited mobility"],
    ),
    ("family", &["families with children"], &[]),
    ("romantic", &["couples", "honeymooners"], &["large groups"]),
    (
        "cruise",
        &["cruise fans"],
        &["travellers prone to seasickness"],
    ),
    (
        "ski",
        &["skiers and snowboarders"],
        &["summer-only travellers"],
    ),
    (
        "luxury",
        &["travellers wanting five-star comfort"],
        &["budget-focused travellers"],
    ),
    ("budget", &["value-focused travellers"], &[]),
    (
        "walking",
        &["hikers and walkers"],
        &["those with limited mobility"],
    ),
    (
        "multi-centre",
        &["travellers wanting more than one base"],
        &["those preferring a single base"],
    ),
];

/// Fragment for a package, tour or blog page.
pub fn page_fragment(
    site: &Site,
    view: &PageView,
    faqs: &[FaqItem],
    related: &[RelatedItem],
) -> String {
    let mut out = String::new();
    push_heading(&mut out, view);
    push_facts(&mut out, view);

    push_list_section(&mut out, "What's included", &view.inclusions);
    push_list_section(&mut out, "What's not included", &view.exclusions);
    push_list_section(&mut out, "Highlights", &view.highlights);
    push_itinerary(&mut out, view);
    push_list_section(&mut out, "Before you book", &view.requirements);
    push_suitability(&mut out, &view.tags);
    push_faqs(&mut out, faqs);
    push_related(&mut out, site, related);

    if let Some(attention) = view.attention.as_deref().filter(|t| !t.trim().is_empty()) {
        out.push_str("<section><h2>Important information</h2><p>");
        out.push_str(&escape_html(attention));
        out.push_str("</p></section>\n");
    }
    out
}

/// Fragment for a destination page: aggregate stats plus featured cards.
pub fn destination_fragment(site: &Site, bundle: &DestinationBundle) -> String {
    let view = &bundle.view;
    let agg = &bundle.aggregate;
    let mut out = String::new();
    push_heading(&mut out, view);

    let mut facts = Vec::new();
    facts.push(format!(
        "{} {}",
        agg.package_count,
        if agg.package_count == 1 { "package" } else { "packages" }
    ));
    if let (Some(min), Some(max)) = (agg.price_min, agg.price_max) {
        facts.push(format!(
            "from {} to {} per person",
            format_price(min, agg.currency.as_deref()),
            format_price(max, agg.currency.as_deref())
        ));
    }
    if let Some(median) = agg.price_median {
        facts.push(format!(
            "typically around {}",
            format_price(median, agg.currency.as_deref())
        ));
    }
    if !agg.typical_durations.is_empty() {
        facts.push(format!("most often {}", agg.typical_durations.join(" or ")));
    }
    out.push_str("<p>");
    out.push_str(&escape_html(&facts.join(", ")));
    out.push_str(".</p>\n");

    let tags: Vec<String> = agg.top_tags.clone();
    push_list_section(&mut out, "Travel styles", &tags);

    if !agg.top_inclusions.is_empty() {
        out.push_str("<section><h2>Usually included</h2><ul>");
        for inc in &agg.top_inclusions {
            out.push_str("<li>");
            out.push_str(&escape_html(&inc.phrase));
            out.push_str(&format!(
                " ({} {})",
                inc.count,
                if inc.count == 1 { "package" } else { "packages" }
            ));
            out.push_str("</li>");
        }
        out.push_str("</ul></section>\n");
    }

    push_list_section(&mut out, "Popular hotels", &agg.top_hotels);
    if !agg.departure_months.is_empty() {
        out.push_str("<section><h2>Departure months</h2><p>");
        out.push_str(&escape_html(&agg.departure_months.join(", ")));
        out.push_str("</p></section>\n");
    }

    if !agg.featured.is_empty() {
        out.push_str("<section><h2>Featured packages</h2><ul>");
        for pkg in &agg.featured {
            out.push_str("<li><a href=\"");
            out.push_str(&escape_html(&site.absolute(&format!("/packages/{}", pkg.slug))));
            out.push_str("\">");
            out.push_str(&escape_html(&pkg.title));
            out.push_str("</a>");
            if let Some(duration) = &pkg.duration {
                out.push_str(&format!(", {}", escape_html(duration)));
            }
            if let Some(price) = pkg.price.filter(|p| *p > 0.0) {
                out.push_str(&format!(
                    ", from {}",
                    format_price(price, pkg.currency.as_deref())
                ));
            }
            if pkg.special_offer {
                out.push_str(" (special offer)");
            }
            out.push_str("</li>");
        }
        out.push_str("</ul></section>\n");
    }

    push_faqs(&mut out, &bundle.faqs);
    out
}

/// Fragment for a listing page: intro plus one card per item.
pub fn listing_fragment(site: &Site, bundle: &ListingBundle) -> String {
    let view = &bundle.view;
    let mut out = String::new();
    push_heading(&mut out, view);

    if !bundle.items.is_empty() {
        out.push_str("<ul>");
        for item in &bundle.items {
            push_card(&mut out, site, item);
        }
        out.push_str("</ul>\n");
    }
    push_faqs(&mut out, &bundle.faqs);
    out
}

// ── Section builders ────────────────────────────────────────────

fn push_heading(out: &mut String, view: &PageView) {
    out.push_str("<h1>");
    out.push_str(&escape_html(&view.title));
    out.push_str("</h1>\n<p>");
    out.push_str(&escape_html(&view.description));
    out.push_str("</p>\n");
}

/// Key facts line: destination, duration, lead-in price.
fn push_facts(out: &mut String, view: &PageView) {
    let mut facts = Vec::new();
    if let Some(destination) = &view.destination {
        facts.push(escape_html(destination));
    }
    if let Some(duration) = &view.duration_label {
        facts.push(escape_html(duration));
    }
    if let Some(price) = view.price_from.filter(|p| *p > 0.0) {
        facts.push(format!(
            "from {} per person",
            format_price(price, view.currency.as_deref())
        ));
    }
    if facts.is_empty() {
        return;
    }
    out.push_str("<ul>");
    for fact in facts {
        out.push_str("<li>");
        out.push_str(&fact);
        out.push_str("</li>");
    }
    out.push_str("</ul>\n");
}

fn push_list_section(out: &mut String, heading: &str, items: &[String]) {
    let items: Vec<&str> = items
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .collect();
    if items.is_empty() {
        return;
    }
    out.push_str("<section><h2>");
    out.push_str(&escape_html(heading));
    out.push_str("</h2><ul>");
    for item in items {
        out.push_str("<li>");
        out.push_str(&escape_html(item));
        out.push_str("</li>");
    }
    out.push_str("</ul></section>\n");
}

fn push_itinerary(out: &mut String, view: &PageView) {
    if view.itinerary.is_empty() {
        return;
    }
    out.push_str("<section><h2>Itinerary</h2><ol>");
    for day in view.itinerary.iter().take(ITINERARY_DAY_CAP) {
        out.push_str("<li>");
        out.push_str(&escape_html(&format!("Day {}: {}", day.day, day.title)));
        if let Some(detail) = day.detail.as_deref().filter(|d| !d.trim().is_empty()) {
            out.push_str(". ");
            out.push_str(&escape_html(detail));
        }
        out.push_str("</li>");
    }
    out.push_str("</ol>");
    let remaining = view.itinerary.len().saturating_sub(ITINERARY_DAY_CAP);
    if remaining > 0 {
        out.push_str(&format!(
            "<p>Plus {remaining} more {}.</p>",
            if remaining == 1 { "day" } else { "days" }
        ));
    }
    out.push_str("</section>\n");
}

fn push_suitability(out: &mut String, tags: &[String]) {
    let (ideal, less) = suitability(tags);
    if ideal.is_empty() && less.is_empty() {
        return;
    }
    out.push_str("<section><h2>Who this holiday suits</h2>");
    if !ideal.is_empty() {
        out.push_str("<h3>Ideal for</h3><ul>");
        for phrase in ideal {
            out.push_str("<li>");
            out.push_str(&escape_html(phrase));
            out.push_str("</li>");
        }
        out.push_str("</ul>");
    }
    if !less.is_empty() {
        out.push_str("<h3>Less suited to</h3><ul>");
        for phrase in less {
            out.push_str("<li>");
            out.push_str(&escape_html(phrase));
            out.push_str("</li>");
        }
        out.push_str("</ul>");
    }
    out.push_str("</section>\n");
}

/// Map tags through the fixed table, dedup, cap each list.
fn suitability(tags: &[String]) -> (Vec<&'static str>, Vec<&'static str>) {
    let mut ideal: Vec<&'static str> = Vec::new();
    let mut less: Vec<&'static str> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if let Some((_, good, bad)) = SUITABILITY.iter().find(|(name, _, _)| *name == tag) {
            for phrase in *good {
                if ideal.len() < IDEAL_FOR_CAP && !ideal.contains(phrase) {
                    ideal.push(phrase);
                }
            }
            for phrase in *bad {
                if less.len() < LESS_SUITED_CAP && !less.contains(phrase) {
                    less.push(phrase);
                }
            }
        }
    }
    (ideal, less)
}

fn push_faqs(out: &mut String, faqs: &[FaqItem]) {
    if faqs.is_empty() {
        return;
    }
    out.push_str("<section><h2>Frequently asked questions</h2>");
    for faq in faqs {
        out.push_str("<details><summary>");
        out.push_str(&escape_html(&faq.question));
        out.push_str("</summary><p>");
        out.push_str(&escape_html(&faq.answer));
        out.push_str("</p></details>");
    }
    out.push_str("</section>\n");
}

fn push_related(out: &mut String, site: &Site, related: &[RelatedItem]) {
    if related.is_empty() {
        return;
    }
    out.push_str("<section><h2>You may also like</h2><ul>");
    for item in related {
        out.push_str("<li><a href=\"");
        out.push_str(&escape_html(&site.absolute(&item.path)));
        out.push_str("\">");
        out.push_str(&escape_html(&item.title));
        out.push_str("</a>");
        if let Some(price) = item.price.filter(|p| *p > 0.0) {
            out.push_str(&format!(
                ", from {}",
                format_price(price, item.currency.as_deref())
            ));
        }
        out.push_str("</li>");
    }
    out.push_str("</ul></section>\n");
}

fn push_card(out: &mut String, site: &Site, item: &ListItem) {
    out.push_str("<li><a href=\"");
    out.push_str(&escape_html(&site.absolute(&item.path)));
    out.push_str("\">");
    out.push_str(&escape_html(&item.title));
    out.push_str("</a>");
    if let Some(summary) = item.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        out.push_str(": ");
        out.push_str(&escape_html(summary));
    }
    if let Some(price) = item.price.filter(|p| *p > 0.0) {
        out.push_str(&format!(
            " (from {})",
            format_price(price, item.currency.as_deref())
        ));
    }
    out.push_str("</li>");
}
