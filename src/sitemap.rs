//! Sitemap generation.
//!
//! One index at `/sitemap.xml` pointing at five section sitemaps, each
//! regenerated from the store on request. Sections deliberately mirror the
//! dispatcher's content kinds, so a URL appears in a sitemap if and only
//! if the injector would render it.

use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::pages::STATIC_PAGES;
use crate::resolver::view::normalize_slug;
use crate::seo::Site;
use crate::store::ContentStore;

const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One `<url>` element.
#[derive(Debug, Clone)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: Option<&'static str>,
    pub priority: Option<&'static str>,
}

/// The five child sitemaps behind the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapSection {
    Pages,
    Tours,
    Packages,
    Destinations,
    Blog,
}

impl SitemapSection {
    pub const ALL: [SitemapSection; 5] = [
        SitemapSection::Pages,
        SitemapSection::Tours,
        SitemapSection::Packages,
        SitemapSection::Destinations,
        SitemapSection::Blog,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SitemapSection::Pages => "pages",
            SitemapSection::Tours => "tours",
            SitemapSection::Packages => "packages",
            SitemapSection::Destinations => "destinations",
            SitemapSection::Blog => "blog",
        }
    }

    /// Accepts both `pages` and `pages.xml`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_suffix(".xml").unwrap_or(name);
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

/// The `/sitemap.xml` index document.
pub fn sitemap_index(site: &Site) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("sitemapindex");
    root.push_attribute(("xmlns", SITEMAP_XMLNS));
    writer.write_event(Event::Start(root))?;
    for section in SitemapSection::ALL {
        writer.write_event(Event::Start(BytesStart::new("sitemap")))?;
        text_element(
            &mut writer,
            "loc",
            &site.absolute(&format!("/sitemaps/{}.xml", section.name())),
        )?;
        writer.write_event(Event::End(BytesEnd::new("sitemap")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("sitemapindex")))?;
    finish(writer)
}

/// A `<urlset>` document over the given entries.
pub fn urlset(entries: &[UrlEntry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("urlset");
    root.push_attribute(("xmlns", SITEMAP_XMLNS));
    writer.write_event(Event::Start(root))?;
    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        text_element(&mut writer, "loc", &entry.loc)?;
        if let Some(lastmod) = entry.lastmod {
            text_element(&mut writer, "lastmod", &lastmod.format("%Y-%m-%d").to_string())?;
        }
        if let Some(changefreq) = entry.changefreq {
            text_element(&mut writer, "changefreq", changefreq)?;
        }
        if let Some(priority) = entry.priority {
            text_element(&mut writer, "priority", priority)?;
        }
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    finish(writer)
}

/// Entries for one section, read fresh from the store.
pub async fn section_entries(
    section: SitemapSection,
    site: &Site,
    store: &dyn ContentStore,
    currencies: &[&str],
) -> Result<Vec<UrlEntry>> {
    match section {
        SitemapSection::Pages => Ok(page_entries(site)),
        SitemapSection::Tours => tour_entries(site, store, currencies).await,
        SitemapSection::Packages => package_entries(site, store).await,
        SitemapSection::Destinations => destination_entries(site, store).await,
        SitemapSection::Blog => blog_entries(site, store).await,
    }
}

/// One section rendered to XML.
pub async fn section_xml(
    section: SitemapSection,
    site: &Site,
    store: &dyn ContentStore,
    currencies: &[&str],
) -> Result<String> {
    let entries = section_entries(section, site, store, currencies)
        .await
        .with_context(|| format!("generating {} sitemap", section.name()))?;
    urlset(&entries)
}

fn page_entries(site: &Site) -> Vec<UrlEntry> {
    STATIC_PAGES
        .iter()
        .map(|page| UrlEntry {
            loc: site.absolute(page.path),
            lastmod: None,
            changefreq: Some(page.changefreq),
            priority: Some(page.priority),
        })
        .collect()
}

async fn tour_entries(
    site: &Site,
    store: &dyn ContentStore,
    currencies: &[&str],
) -> Result<Vec<UrlEntry>> {
    // First snapshot with content wins, same as the listing page.
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
            .map(|product| UrlEntry {
                loc: site.absolute(&format!("/tour/{}", product.id)),
                lastmod: product.updated_at,
                changefreq: Some("weekly"),
                priority: Some("0.8"),
            })
            .collect());
    }
    Ok(Vec::new())
}

async fn package_entries(site: &Site, store: &dyn ContentStore) -> Result<Vec<UrlEntry>> {
    let packages = store.all_packages().await.context("reading packages")?;
    Ok(packages
        .into_iter()
        .filter(|p| p.published)
        .map(|p| UrlEntry {
            loc: site.absolute(&format!("/packages/{}", p.slug)),
            lastmod: p.updated_at,
            changefreq: Some("weekly"),
            priority: Some("0.8"),
        })
        .collect())
}

async fn destination_entries(site: &Site, store: &dyn ContentStore) -> Result<Vec<UrlEntry>> {
    let packages = store.all_packages().await.context("reading packages")?;
    // Distinct destinations; lastmod is the newest update in the group.
    let mut groups: Vec<(String, Option<DateTime<Utc>>)> = Vec::new();
    for pkg in packages.iter().filter(|p| p.published) {
        let Some(category) = pkg.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
        else {
            continue;
        };
        let slug = normalize_slug(category);
        match groups.iter_mut().find(|(s, _)| *s == slug) {
            Some((_, lastmod)) => {
                if pkg.updated_at > *lastmod {
                    *lastmod = pkg.updated_at;
                }
            }
            None => groups.push((slug, pkg.updated_at)),
        }
    }
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(groups
        .into_iter()
        .map(|(slug, lastmod)| UrlEntry {
            loc: site.absolute(&format!("/destinations/{slug}")),
            lastmod,
            changefreq: Some("weekly"),
            priority: Some("0.7"),
        })
        .collect())
}

async fn blog_entries(site: &Site, store: &dyn ContentStore) -> Result<Vec<UrlEntry>> {
    let posts = store.published_posts().await.context("reading posts")?;
    Ok(posts
        .into_iter()
        .map(|post| UrlEntry {
            loc: site.absolute(&format!("/blog/{}", post.slug)),
            lastmod: post.updated_at.or(post.published_at),
            changefreq: Some("monthly"),
            priority: Some("0.5"),
        })
        .collect())
}

fn text_element<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn finish(writer: Writer<Cursor<Vec<u8>>>) -> Result<String> {
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).context("sitemap output was not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::{BlogPost, HolidayPackage};
    use chrono::TimeZone;

    fn site() -> Site {
        Site::new("https://example.test", "Example Travel")
    }

    #[test]
    fn test_index_lists_all_sections() {
        let xml = sitemap_index(&site()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        for section in SitemapSection::ALL {
            let loc = format!("<loc>https://example.test/sitemaps/{}.xml</loc>", section.name());
            assert!(xml.contains(&loc), "missing {}", section.name());
        }
    }

    #[test]
    fn test_section_names_round_trip() {
        for section in SitemapSection::ALL {
            assert_eq!(SitemapSection::from_name(section.name()), Some(section));
            assert_eq!(
                SitemapSection::from_name(&format!("{}.xml", section.name())),
                Some(section)
            );
        }
        assert_eq!(SitemapSection::from_name("video"), None);
    }

    #[test]
    fn test_urlset_escapes_and_formats() {
        let entries = vec![UrlEntry {
            loc: "https://example.test/packages/rome?a=1&b=2".to_string(),
            lastmod: Some(Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()),
            changefreq: Some("weekly"),
            priority: Some("0.8"),
        }];
        let xml = urlset(&entries).unwrap();
        assert!(xml.contains("a=1&amp;b=2"));
        assert!(xml.contains("<lastmod>2025-03-15</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }

    #[tokio::test]
    async fn test_package_section_skips_unpublished() {
        let mut hidden = HolidayPackage {
            id: 2,
            slug: "hidden".to_string(),
            title: "Hidden".to_string(),
            ..Default::default()
        };
        hidden.published = false;
        let store = MemoryStore::new().with_packages(vec![
            HolidayPackage {
                id: 1,
                slug: "rome".to_string(),
                title: "Rome".to_string(),
                ..Default::default()
            },
            hidden,
        ]);

        let xml = section_xml(SitemapSection::Packages, &site(), &store, &["GBP"])
            .await
            .unwrap();
        assert!(xml.contains("<loc>https://example.test/packages/rome</loc>"));
        assert!(!xml.contains("hidden"));
    }

    #[tokio::test]
    async fn test_destination_section_dedups_categories() {
        let pkg = |slug: &str, category: &str| HolidayPackage {
            id: 1,
            slug: slug.to_string(),
            title: slug.to_string(),
            category: Some(category.to_string()),
            ..Default::default()
        };
        let store = MemoryStore::new().with_packages(vec![
            pkg("a", "Italy"),
            pkg("b", "ITALY"),
            pkg("c", "France"),
        ]);

        let entries = section_entries(SitemapSection::Destinations, &site(), &store, &[])
            .await
            .unwrap();
        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://example.test/destinations/france",
                "https://example.test/destinations/italy",
            ]
        );
    }

    #[tokio::test]
    async fn test_blog_lastmod_falls_back_to_published_at() {
        let store = MemoryStore::new().with_posts(vec![BlogPost {
            id: 1,
            slug: "tips".to_string(),
            title: "Tips".to_string(),
            published: true,
            published_at: Some(Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap()),
            ..Default::default()
        }]);
        let entries = section_entries(SitemapSection::Blog, &site(), &store, &[])
            .await
            .unwrap();
        assert_eq!(entries[0].lastmod, Some(Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap()));
    }
}
