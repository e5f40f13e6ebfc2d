//! JSON-LD structured-data builders.
//!
//! Each builder returns one `@context`-rooted [`Value`]; [`scripts`] turns a
//! batch of them into `<script>` tags. Documents never invent data: optional
//! keys are present only when the view carries the backing field, and an
//! Offer is emitted only for a positive price.

use crate::faq::FaqItem;
use crate::resolver::view::{ListItem, PageView};
use crate::resolver::DestinationBundle;
use crate::seo::{plain_price, Site};
use serde_json::{json, Value};

/// The site itself, used on the home page and plain fixed pages.
pub fn organization(site: &Site) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "Organization",
        "name": site.name,
        "url": format!("{}/", site.base_url),
    })
}

/// BreadcrumbList from a `(name, path)` trail.
pub fn breadcrumbs(site: &Site, trail: &[(String, String)]) -> Value {
    let elements: Vec<Value> = trail
        .iter()
        .enumerate()
        .map(|(i, (name, path))| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": name,
                "item": site.absolute(path),
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

/// TouristTrip for a package or tour view.
pub fn tourist_trip(site: &Site, view: &PageView) -> Value {
    let mut trip = json!({
        "@context": "https://schema.org",
        "@type": "TouristTrip",
        "name": view.title,
        "description": view.description,
        "url": site.absolute(&view.path),
    });
    if let Some(image) = &view.image_url {
        trip["image"] = json!(image_url(site, image));
    }
    if !view.tags.is_empty() {
        trip["touristType"] = json!(view.tags);
    }
    if !view.itinerary.is_empty() {
        let days: Vec<Value> = view
            .itinerary
            .iter()
            .enumerate()
            .map(|(i, day)| {
                json!({
                    "@type": "ListItem",
                    "position": i + 1,
                    "name": day.title,
                })
            })
            .collect();
        trip["itinerary"] = json!({
            "@type": "ItemList",
            "numberOfItems": days.len(),
            "itemListElement": days,
        });
    }
    if let Some(price) = view.price_from.filter(|p| *p > 0.0) {
        trip["offers"] = json!({
            "@type": "Offer",
            "price": plain_price(price),
            "priceCurrency": view.currency.as_deref().unwrap_or("GBP"),
            "url": site.absolute(&view.path),
            "availability": "https://schema.org/InStock",
        });
    }
    trip
}

/// TouristDestination with an AggregateOffer over the package collection.
pub fn tourist_destination(site: &Site, bundle: &DestinationBundle) -> Value {
    let agg = &bundle.aggregate;
    let mut destination = json!({
        "@context": "https://schema.org",
        "@type": "TouristDestination",
        "name": agg.destination,
        "description": bundle.view.description,
        "url": site.absolute(&bundle.view.path),
    });
    if !agg.top_tags.is_empty() {
        destination["touristType"] = json!(agg.top_tags);
    }
    if let (Some(min), Some(max)) = (agg.price_min, agg.price_max) {
        destination["offers"] = json!({
            "@type": "AggregateOffer",
            "lowPrice": plain_price(min),
            "highPrice": plain_price(max),
            "priceCurrency": agg.currency.as_deref().unwrap_or("GBP"),
            "offerCount": agg.package_count,
        });
    }
    destination
}

/// Article for a blog post view.
pub fn article(site: &Site, view: &PageView) -> Value {
    let publisher = json!({ "@type": "Organization", "name": site.name });
    let mut article = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": view.title,
        "description": view.description,
        "mainEntityOfPage": site.absolute(&view.path),
        "author": publisher.clone(),
        "publisher": publisher,
    });
    if let Some(image) = &view.image_url {
        article["image"] = json!(image_url(site, image));
    }
    if let Some(published) = view.published_at {
        article["datePublished"] = json!(published.to_rfc3339());
    }
    if let Some(updated) = view.updated_at {
        article["dateModified"] = json!(updated.to_rfc3339());
    }
    article
}

/// FAQPage over synthesized or curated question/answer pairs.
pub fn faq_page(faqs: &[FaqItem]) -> Value {
    let questions: Vec<Value> = faqs
        .iter()
        .map(|f| {
            json!({
                "@type": "Question",
                "name": f.question,
                "acceptedAnswer": { "@type": "Answer", "text": f.answer },
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}

/// ItemList for a listing page.
pub fn item_list(site: &Site, name: &str, items: &[ListItem]) -> Value {
    let elements: Vec<Value> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": item.title,
                "url": site.absolute(&item.path),
            })
        })
        .collect();
    json!({
        "@context": "https://schema.org",
        "@type": "ItemList",
        "name": name,
        "numberOfItems": elements.len(),
        "itemListElement": elements,
    })
}

/// Wrap documents in `<script type="application/ld+json">` tags.
///
/// `<`, `>` and `&` are emitted as `\uXXXX` escapes so no string value can
/// terminate the script element early, whatever the source text contained.
pub fn scripts(blocks: &[Value]) -> String {
    let mut out = String::new();
    for block in blocks {
        let body = block
            .to_string()
            .replace('&', "\\u0026")
            .replace('<', "\\u003c")
            .replace('>', "\\u003e");
        out.push_str("<script type=\"application/ld+json\">");
        out.push_str(&body);
        out.push_str("</script>\n");
    }
    out
}

fn image_url(site: &Site, url: &str) -> String {
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
    use crate::aggregate::DestinationAggregate;
    use crate::resolver::view::{PageKind, PageView};
    use crate::store::HolidayPackage;
    use assert_json_diff::assert_json_include;

    fn site() -> Site {
        Site::new("https://example.test", "Example Travel")
    }

    fn trip_view(price: Option<f64>) -> PageView {
        PageView {
            kind: PageKind::Package,
            slug: "rome".to_string(),
            path: "/packages/rome".to_string(),
            title: "Rome City Break".to_string(),
            description: "Three nights in Rome.".to_string(),
            destination: Some("Italy".to_string()),
            duration_days: Some(3),
            duration_label: Some("3 nights".to_string()),
            price_from: price,
            currency: Some("GBP".to_string()),
            image_url: None,
            published_at: None,
            updated_at: None,
            tags: vec!["City Break".to_string()],
            inclusions: Vec::new(),
            exclusions: Vec::new(),
            highlights: Vec::new(),
            itinerary: Vec::new(),
            requirements: Vec::new(),
            attention: None,
        }
    }

    #[test]
    fn test_tourist_trip_with_offer() {
        let trip = tourist_trip(&site(), &trip_view(Some(499.0)));
        assert_json_include!(
            actual: trip,
            expected: serde_json::json!({
                "@type": "TouristTrip",
                "name": "Rome City Break",
                "url": "https://example.test/packages/rome",
                "touristType": ["City Break"],
                "offers": {
                    "@type": "Offer",
                    "price": "499",
                    "priceCurrency": "GBP",
                },
            })
        );
    }

    #[test]
    fn test_no_offer_without_positive_price() {
        assert!(tourist_trip(&site(), &trip_view(None)).get("offers").is_none());
        assert!(tourist_trip(&site(), &trip_view(Some(0.0))).get("offers").is_none());
    }

    #[test]
    fn test_breadcrumbs_positions_are_one_based() {
        let trail = vec![
            ("Home".to_string(), "/".to_string()),
            ("Packages".to_string(), "/packages".to_string()),
        ];
        let crumbs = breadcrumbs(&site(), &trail);
        let elements = crumbs["itemListElement"].as_array().unwrap();
        assert_eq!(elements[0]["position"], 1);
        assert_eq!(elements[1]["position"], 2);
        assert_eq!(elements[1]["item"], "https://example.test/packages");
    }

    #[test]
    fn test_destination_aggregate_offer() {
        let packages = vec![
            HolidayPackage {
                id: 1,
                slug: "a".into(),
                title: "A".into(),
                category: Some("Italy".into()),
                price: Some(800.0),
                currency: Some("GBP".into()),
                ..Default::default()
            },
            HolidayPackage {
                id: 2,
                slug: "b".into(),
                title: "B".into(),
                category: Some("Italy".into()),
                price: Some(1500.0),
                currency: Some("GBP".into()),
                ..Default::default()
            },
        ];
        let aggregate = DestinationAggregate::build("Italy", &packages);
        let bundle = DestinationBundle {
            view: PageView::for_destination("italy", "Italy", "Italy holidays.".to_string()),
            faqs: Vec::new(),
            aggregate,
        };
        let doc = tourist_destination(&site(), &bundle);
        assert_json_include!(
            actual: doc,
            expected: serde_json::json!({
                "@type": "TouristDestination",
                "name": "Italy",
                "offers": {
                    "@type": "AggregateOffer",
                    "lowPrice": "800",
                    "highPrice": "1500",
                    "offerCount": 2,
                },
            })
        );
    }

    #[test]
    fn test_faq_page_shape() {
        let faqs = vec![FaqItem {
            question: "How long?".to_string(),
            answer: "3 nights.".to_string(),
        }];
        let doc = faq_page(&faqs);
        assert_eq!(doc["@type"], "FAQPage");
        assert_eq!(doc["mainEntity"][0]["acceptedAnswer"]["text"], "3 nights.");
    }

    #[test]
    fn test_scripts_escape_angle_brackets() {
        let block = serde_json::json!({ "name": "</script><b>x&y</b>" });
        let tag = scripts(&[block]);
        assert!(tag.starts_with("<script type=\"application/ld+json\">"));
        assert!(!tag.contains("</script><b>"));
        assert!(tag.contains("\\u003c/script\\u003e"));
        assert!(tag.contains("x\\u0026y"));
    }
}
