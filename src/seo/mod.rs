//! Meta, structured-data, and fragment synthesis.
//!
//! Everything in this module tree is a pure string/value builder: view
//! models in, escaped markup out. Interpolated text is escaped here, at the
//! last moment before it lands in markup; upstream code works with raw
//! text throughout.

pub mod fragment;
pub mod jsonld;
pub mod meta;

use crate::resolver::{DestinationBundle, ListingBundle, PageBundle, Resolved};
use crate::resolver::view::PageKind;

/// Site identity shared by every builder.
#[derive(Debug, Clone)]
pub struct Site {
    /// Origin with no trailing slash, e.g. `https://www.meridiantravel.co.uk`.
    pub base_url: String,
    pub name: String,
}

impl Site {
    pub fn new(base_url: &str, name: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            name: name.to_string(),
        }
    }

    /// Absolute URL for a site path starting with `/`.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// The two strings the HTML mutator splices into the template.
#[derive(Debug, Clone)]
pub struct SeoPayload {
    /// Head tags plus JSON-LD scripts, inserted before `</head>`.
    pub head: String,
    /// Crawlable fragment markup, inserted before the mount element.
    pub fragment: String,
}

/// Build the complete payload for a resolved page, or `None` for NotFound.
pub fn build_payload(site: &Site, resolved: &Resolved) -> Option<SeoPayload> {
    match resolved {
        Resolved::Page(bundle) => Some(page_payload(site, bundle)),
        Resolved::Destination(bundle) => Some(destination_payload(site, bundle)),
        Resolved::Listing(bundle) => Some(listing_payload(site, bundle)),
        Resolved::NotFound => None,
    }
}

fn page_payload(site: &Site, bundle: &PageBundle) -> SeoPayload {
    let view = &bundle.view;
    let mut blocks = vec![jsonld::breadcrumbs(site, &view.breadcrumb_trail())];
    match view.kind {
        PageKind::Tour | PageKind::Package => blocks.push(jsonld::tourist_trip(site, view)),
        PageKind::Blog => blocks.push(jsonld::article(site, view)),
        _ => blocks.push(jsonld::organization(site)),
    }
    if !bundle.faqs.is_empty() {
        blocks.push(jsonld::faq_page(&bundle.faqs));
    }

    let mut head = meta::head_block(site, view);
    head.push_str(&jsonld::scripts(&blocks));
    SeoPayload {
        head,
        fragment: fragment::page_fragment(site, view, &bundle.faqs, &bundle.related),
    }
}

fn destination_payload(site: &Site, bundle: &DestinationBundle) -> SeoPayload {
    let mut blocks = vec![
        jsonld::breadcrumbs(site, &bundle.view.breadcrumb_trail()),
        jsonld::tourist_destination(site, bundle),
    ];
    if !bundle.faqs.is_empty() {
        blocks.push(jsonld::faq_page(&bundle.faqs));
    }

    let mut head = meta::head_block(site, &bundle.view);
    head.push_str(&jsonld::scripts(&blocks));
    SeoPayload {
        head,
        fragment: fragment::destination_fragment(site, bundle),
    }
}

fn listing_payload(site: &Site, bundle: &ListingBundle) -> SeoPayload {
    let mut blocks = Vec::new();
    if bundle.view.path == "/" {
        blocks.push(jsonld::organization(site));
    } else {
        blocks.push(jsonld::breadcrumbs(site, &bundle.view.breadcrumb_trail()));
    }
    if !bundle.items.is_empty() {
        blocks.push(jsonld::item_list(site, &bundle.view.title, &bundle.items));
    }
    if !bundle.faqs.is_empty() {
        blocks.push(jsonld::faq_page(&bundle.faqs));
    }

    let mut head = meta::head_block(site, &bundle.view);
    head.push_str(&jsonld::scripts(&blocks));
    SeoPayload {
        head,
        fragment: fragment::listing_fragment(site, bundle),
    }
}

// ── Text helpers ────────────────────────────────────────────────

/// Escape `& < > " '` for safe interpolation into markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Cap a string at `max` characters (a plain cut at a char boundary).
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    text.chars().take(max).collect()
}

/// Currency symbol for the codes the store actually carries.
pub fn currency_symbol(code: Option<&str>) -> String {
    match code.map(str::to_uppercase).as_deref() {
        Some("GBP") | None => "£".to_string(),
        Some("USD") => "$".to_string(),
        Some("EUR") => "€".to_string(),
        Some(other) => format!("{other} "),
    }
}

/// Human price text: symbol, thousands grouping, pence only when present.
pub fn format_price(amount: f64, currency: Option<&str>) -> String {
    format!("{}{}", currency_symbol(currency), group_thousands(amount))
}

/// Plain numeric price for structured data: no grouping, no symbol.
pub fn plain_price(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

fn group_thousands(amount: f64) -> String {
    let plain = plain_price(amount);
    let (int_part, dec_part) = match plain.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (plain.as_str(), None),
    };
    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 && *c != '-' && digits[i - 1] != '-' {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    match dec_part {
        Some(d) => format!("{grouped}.{d}"),
        None => grouped,
    }
}
