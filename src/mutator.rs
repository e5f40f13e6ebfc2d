//! Shell-template mutation.
//!
//! The mutator takes the SPA's `index.html` text and splices a payload in:
//! stale head tags are stripped and replaced before `</head>`, and the
//! crawlable fragment lands immediately *before* the SPA mount element,
//! inside an off-screen container plus a `<noscript>` duplicate. Keeping
//! the container a preceding sibling of the mount is what stops the
//! hydrating app from wiping it out.
//!
//! Mutation is pure text splicing driven by precompiled patterns; after
//! splicing, the result is re-parsed once to verify the sibling invariant
//! on templates with pathological markup.

use regex::Regex;
use scraper::{Html, Selector};
use tracing::warn;

use crate::seo::SeoPayload;

/// `id` of the injected container element.
pub const CONTAINER_ID: &str = "meridian-seo";

/// Off-screen but rendered: `display:none` would invite the exact
/// hidden-text penalties this pipeline exists to avoid.
const CONTAINER_STYLE: &str =
    "position:absolute;width:1px;height:1px;overflow:hidden;clip:rect(0 0 0 0)";

pub struct Mutator {
    mount_id: String,
    strip: Vec<Regex>,
    mount: Regex,
    head_close: Regex,
    head_open: Regex,
    body_close: Regex,
}

impl Mutator {
    pub fn new(mount_id: &str) -> Self {
        // Template tags the payload supersedes. Escaped text never matches:
        // a literal `&lt;meta` in page copy has no `<`.
        let strip = vec![
            Regex::new(r"(?is)<title\b[^>]*>.*?</title>").expect("title regex is valid"),
            Regex::new(r#"(?is)<meta\s[^>]*name\s*=\s*["']?(?:description|keywords)\b[^>]*>"#)
                .expect("description regex is valid"),
            Regex::new(r#"(?is)<link\s[^>]*rel\s*=\s*["']?canonical\b[^>]*>"#)
                .expect("canonical regex is valid"),
            Regex::new(r#"(?is)<meta\s[^>]*property\s*=\s*["']?og:[^>]*>"#)
                .expect("og regex is valid"),
            Regex::new(r#"(?is)<meta\s[^>]*name\s*=\s*["']?twitter:[^>]*>"#)
                .expect("twitter regex is valid"),
        ];
        let id = regex::escape(mount_id);
        // Opening tag of the element carrying the mount id. `\sid` keeps
        // attributes like `data-id` from matching.
        let mount = Regex::new(&format!(
            r#"(?is)<[a-zA-Z][\w-]*[^>]*\sid\s*=\s*(?:"{id}"|'{id}'|{id}\b)[^>]*>"#
        ))
        .expect("mount regex is valid");

        Self {
            mount_id: mount_id.to_string(),
            strip,
            mount,
            head_close: Regex::new(r"(?i)</head\s*>").expect("head-close regex is valid"),
            head_open: Regex::new(r"(?i)<head\b[^>]*>").expect("head-open regex is valid"),
            body_close: Regex::new(r"(?i)</body\s*>").expect("body-close regex is valid"),
        }
    }

    /// Splice `payload` into `template`. Infallible: unusual templates
    /// degrade through documented fallbacks rather than failing a request.
    pub fn inject(&self, template: &str, payload: &SeoPayload) -> String {
        let html = self.inject_head(template, &payload.head);
        let result = self.inject_fragment(&html, &payload.fragment);

        if self.container_inside_mount(&result) {
            // A malformed template got the container re-parented into the
            // mount during parsing; the app would erase it. Serve head
            // tags only rather than markup the crawler never sees.
            warn!(
                "injected container would land inside #{}; falling back to head-only injection",
                self.mount_id
            );
            return self.inject_head(template, &payload.head);
        }
        result
    }

    fn inject_head(&self, template: &str, head: &str) -> String {
        let mut html = template.to_string();
        for pattern in &self.strip {
            html = pattern.replace_all(&html, "").into_owned();
        }

        if let Some(m) = self.head_close.find(&html) {
            return splice(&html, m.start(), head);
        }
        if let Some(m) = self.head_open.find(&html) {
            return splice(&html, m.end(), head);
        }
        warn!("template has no <head>; head tags skipped");
        html
    }

    fn inject_fragment(&self, html: &str, fragment: &str) -> String {
        let block = format!(
            "<div id=\"{CONTAINER_ID}\" aria-hidden=\"true\" style=\"{CONTAINER_STYLE}\">\
             {fragment}</div><noscript>{fragment}</noscript>",
        );

        if let Some(m) = self.mount.find(html) {
            return splice(html, m.start(), &block);
        }
        if let Some(m) = self.body_close.find(html) {
            warn!("mount element #{} not found; injecting before </body>", self.mount_id);
            return splice(html, m.start(), &block);
        }
        warn!("no mount element #{} or </body>; appending fragment", self.mount_id);
        format!("{html}{block}")
    }

    /// Parse the mutated document and check the container did not end up a
    /// descendant of the mount element.
    fn container_inside_mount(&self, html: &str) -> bool {
        let selector = match Selector::parse(&format!("#{CONTAINER_ID}")) {
            Ok(selector) => selector,
            Err(_) => return false,
        };
        let document = Html::parse_document(html);
        let Some(container) = document.select(&selector).next() else {
            return false;
        };
        container
            .ancestors()
            .filter_map(scraper::ElementRef::wrap)
            .any(|el| el.value().attr("id") == Some(self.mount_id.as_str()))
    }
}

fn splice(html: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(html.len() + insert.len());
    out.push_str(&html[..at]);
    out.push_str(insert);
    out.push_str(&html[at..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Loading…</title>
<meta name="description" content="placeholder">
<meta property="og:title" content="placeholder">
<link rel="canonical" href="https://example.test/old">
<script src="/app.js"></script>
</head>
<body>
<div id="app"></div>
</body>
</html>"#;

    fn payload() -> SeoPayload {
        SeoPayload {
            head: "<title>Rome City Break | Example</title>\n".to_string(),
            fragment: "<h1>Rome City Break</h1>".to_string(),
        }
    }

    #[test]
    fn test_stale_head_tags_are_stripped() {
        let out = Mutator::new("app").inject(TEMPLATE, &payload());
        assert!(!out.contains("Loading…"));
        assert!(!out.contains("placeholder"));
        assert!(!out.contains("https://example.test/old"));
        assert_eq!(out.matches("<title>").count(), 1);
        // Unrelated head tags survive.
        assert!(out.contains(r#"<meta charset="utf-8">"#));
        assert!(out.contains(r#"<script src="/app.js"></script>"#));
    }

    #[test]
    fn test_head_lands_before_closing_head() {
        let out = Mutator::new("app").inject(TEMPLATE, &payload());
        let title = out.find("<title>Rome City Break").unwrap();
        let head_close = out.find("</head>").unwrap();
        assert!(title < head_close);
    }

    #[test]
    fn test_fragment_is_a_preceding_sibling_of_the_mount() {
        let out = Mutator::new("app").inject(TEMPLATE, &payload());
        let container = out.find(&format!("id=\"{CONTAINER_ID}\"")).unwrap();
        let mount = out.find(r#"<div id="app">"#).unwrap();
        assert!(container < mount);

        // The parsed DOM agrees: same parent, container not inside mount.
        let document = Html::parse_document(&out);
        let container_sel = Selector::parse(&format!("#{CONTAINER_ID}")).unwrap();
        let mount_sel = Selector::parse("#app").unwrap();
        let container = document.select(&container_sel).next().unwrap();
        let mount = document.select(&mount_sel).next().unwrap();
        assert_eq!(container.parent().unwrap().id(), mount.parent().unwrap().id());
        assert!(mount
            .ancestors()
            .filter_map(scraper::ElementRef::wrap)
            .all(|el| el.value().attr("id") != Some(CONTAINER_ID)));
    }

    #[test]
    fn test_noscript_duplicate_present() {
        let out = Mutator::new("app").inject(TEMPLATE, &payload());
        assert!(out.contains("<noscript><h1>Rome City Break</h1></noscript>"));
    }

    #[test]
    fn test_container_is_offscreen_not_hidden() {
        let out = Mutator::new("app").inject(TEMPLATE, &payload());
        assert!(out.contains(r#"aria-hidden="true""#));
        assert!(out.contains("position:absolute"));
        assert!(!out.contains("display:none"));
    }

    #[test]
    fn test_missing_mount_falls_back_to_body_close() {
        let template = "<html><head></head><body><main>shell</main></body></html>";
        let out = Mutator::new("app").inject(template, &payload());
        let container = out.find(&format!("id=\"{CONTAINER_ID}\"")).unwrap();
        let body_close = out.find("</body>").unwrap();
        assert!(container < body_close);
        assert!(out.find("<main>").unwrap() < container);
    }

    #[test]
    fn test_missing_head_close_falls_back_to_head_open() {
        let template = "<html><head><body><div id=\"app\"></div></body></html>";
        let out = Mutator::new("app").inject(template, &payload());
        let head_open = out.find("<head>").unwrap();
        let title = out.find("<title>Rome City Break").unwrap();
        assert_eq!(title, head_open + "<head>".len());
    }

    #[test]
    fn test_similar_ids_do_not_match_the_mount() {
        let template = r#"<html><head></head><body>
<div data-id="app">decoy</div>
<div id="application">decoy</div>
<div id="app"></div>
</body></html>"#;
        let out = Mutator::new("app").inject(template, &payload());
        let container = out.find(&format!("id=\"{CONTAINER_ID}\"")).unwrap();
        assert!(out.find(r#"<div id="application">"#).unwrap() < container);
        assert!(container < out.find(r#"<div id="app">"#).unwrap());
    }

    #[test]
    fn test_single_quoted_and_unquoted_mount_ids_match() {
        for mount_tag in ["<div id='app'>", "<div id=app>"] {
            let template = format!("<html><head></head><body>{mount_tag}</body></html>");
            let out = Mutator::new("app").inject(&template, &payload());
            let container = out.find(&format!("id=\"{CONTAINER_ID}\"")).unwrap();
            assert!(container < out.find(mount_tag).unwrap(), "failed for {mount_tag}");
        }
    }
}
