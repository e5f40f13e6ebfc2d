//! Head-tag synthesis: title, description, canonical, Open Graph, Twitter.
//!
//! [`head_block`] produces the full replacement block for a page. The
//! mutator strips the template's own title/description/canonical/social
//! tags first, so every tag emitted here is authoritative for the page.

use crate::resolver::view::{PageKind, PageView};
use crate::seo::{escape_html, plain_price, Site};

/// All head tags for one page, newline-separated, each escaped.
pub fn head_block(site: &Site, view: &PageView) -> String {
    let title = escape_html(&format!("{} | {}", view.title, site.name));
    let description = escape_html(&view.description);
    let canonical = escape_html(&site.absolute(&view.path));
    let image = view.image_url.as_deref().map(|u| absolute_image(site, u));

    let mut tags = Vec::new();
    tags.push(format!("<title>{title}</title>"));
    tags.push(meta_name("description", &description));
    tags.push(format!(r#"<link rel="canonical" href="{canonical}">"#));

    let og_type = match view.kind {
        PageKind::Blog => "article",
        _ => "website",
    };
    tags.push(meta_property("og:type", og_type));
    tags.push(meta_property("og:site_name", &escape_html(&site.name)));
    tags.push(meta_property("og:title", &title));
    tags.push(meta_property("og:description", &description));
    tags.push(meta_property("og:url", &canonical));
    if let Some(image) = &image {
        tags.push(meta_property("og:image", &escape_html(image)));
    }
    if let Some(price) = view.price_from.filter(|p| *p > 0.0) {
        tags.push(meta_property("og:price:amount", &plain_price(price)));
        let currency = view.currency.as_deref().unwrap_or("GBP");
        tags.push(meta_property("og:price:currency", &escape_html(currency)));
    }
    if view.kind == PageKind::Blog {
        if let Some(published) = view.published_at {
            tags.push(meta_property(
                "article:published_time",
                &published.to_rfc3339(),
            ));
        }
    }

    let card = if image.is_some() {
        "summary_large_image"
    } else {
        "summary"
    };
    tags.push(meta_name("twitter:card", card));
    tags.push(meta_name("twitter:title", &title));
    tags.push(meta_name("twitter:description", &description));
    if let Some(image) = &image {
        tags.push(meta_name("twitter:image", &escape_html(image)));
    }

    let mut block = tags.join("\n");
    block.push('\n');
    block
}

fn meta_name(name: &str, content: &str) -> String {
    format!(r#"<meta name="{name}" content="{content}">"#)
}

fn meta_property(property: &str, content: &str) -> String {
    format!(r#"<meta property="{property}" content="{content}">"#)
}

/// Site-relative image paths become absolute; full URLs pass through.
fn absolute_image(site: &Site, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if url.starts_with('/') {
        site.absolute(url)
    } else {
        format!("{}/{url}", site.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn site() -> Site {
        Site::new("https://example.test", "Example Travel")
    }

    fn package_view() -> PageView {
        PageView {
            kind: PageKind::Package,
            slug: "rome-city-break".to_string(),
            path: "/packages/rome-city-break".to_string(),
            title: "Rome City Break".to_string(),
            description: "Three nights in the Eternal City.".to_string(),
            destination: Some("Italy".to_string()),
            duration_days: Some(3),
            duration_label: Some("3 nights".to_string()),
            price_from: Some(499.0),
            currency: Some("GBP".to_string()),
            image_url: Some("/media/rome.jpg".to_string()),
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

    #[test]
    fn test_core_tags_present() {
        let head = head_block(&site(), &package_view());
        assert!(head.contains("<title>Rome City Break | Example Travel</title>"));
        assert!(head.contains(
            r#"<link rel="canonical" href="https://example.test/packages/rome-city-break">"#
        ));
        assert!(head.contains(r#"<meta property="og:type" content="website">"#));
        assert!(head.contains(r#"<meta property="og:price:amount" content="499">"#));
        assert!(head.contains(r#"<meta property="og:price:currency" content="GBP">"#));
        assert!(head.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
    }

    #[test]
    fn test_relative_image_is_absolutized() {
        let head = head_block(&site(), &package_view());
        assert!(head.contains(
            r#"<meta property="og:image" content="https://example.test/media/rome.jpg">"#
        ));
    }

    #[test]
    fn test_no_price_tags_without_price() {
        let mut view = package_view();
        view.price_from = None;
        let head = head_block(&site(), &view);
        assert!(!head.contains("og:price"));
    }

    #[test]
    fn test_no_image_means_plain_summary_card() {
        let mut view = package_view();
        view.image_url = None;
        let head = head_block(&site(), &view);
        assert!(head.contains(r#"<meta name="twitter:card" content="summary">"#));
        assert!(!head.contains("og:image"));
        assert!(!head.contains("twitter:image"));
    }

    #[test]
    fn test_blog_view_gets_article_tags() {
        let mut view = package_view();
        view.kind = PageKind::Blog;
        view.published_at = Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap());
        let head = head_block(&site(), &view);
        assert!(head.contains(r#"<meta property="og:type" content="article">"#));
        assert!(head.contains(r#"property="article:published_time""#));
        assert!(head.contains("2025-06-01T09:00:00"));
    }

    #[test]
    fn test_title_markup_is_escaped() {
        let mut view = package_view();
        view.title = r#"<script>alert("x")</script>"#.to_string();
        let head = head_block(&site(), &view);
        assert!(!head.contains("<script>"));
        assert!(head.contains("&lt;script&gt;"));
    }
}
