//! Fixed-page registry and crawler guidance files.
//!
//! The SPA's non-content routes (home, listings, about, contact) get their
//! titles and descriptions from this table rather than the store. Paths are
//! matched exactly; the dispatcher normalizes trailing slashes before
//! looking anything up.

use crate::resolver::view::PageKind;
use crate::seo::Site;

/// One fixed route of the site shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticPage {
    pub kind: PageKind,
    /// Cache-key slug, unique within the `static:` namespace.
    pub slug: &'static str,
    pub path: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Sitemap hints.
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Every fixed route the injector knows about.
pub const STATIC_PAGES: &[StaticPage] = &[
    StaticPage {
        kind: PageKind::Static,
        slug: "home",
        path: "/",
        title: "Escorted Tours & Tailor-Made Holidays",
        description: "Hand-picked escorted tours, holiday packages and city breaks \
                      across Europe and beyond, with flights and hotels included.",
        changefreq: "daily",
        priority: "1.0",
    },
    StaticPage {
        kind: PageKind::Static,
        slug: "packages",
        path: "/packages",
        title: "All Holiday Packages",
        description: "Browse every flight-inclusive holiday package: beach escapes, \
                      city breaks and multi-centre itineraries.",
        changefreq: "daily",
        priority: "0.9",
    },
    StaticPage {
        kind: PageKind::Static,
        slug: "tours",
        path: "/tours",
        title: "Escorted Tours & Day Trips",
        description: "Guided tours and day trips bookable alongside your holiday, \
                      with live availability and pricing.",
        changefreq: "daily",
        priority: "0.9",
    },
    StaticPage {
        kind: PageKind::Static,
        slug: "destinations",
        path: "/destinations",
        title: "Destinations",
        description: "Explore our destinations, from Mediterranean classics to \
                      long-haul favourites, each with its own package collection.",
        changefreq: "weekly",
        priority: "0.8",
    },
    StaticPage {
        kind: PageKind::Static,
        slug: "blog",
        path: "/blog",
        title: "Travel Guides & Inspiration",
        description: "Destination guides, packing tips and travel inspiration from \
                      the people who plan our holidays.",
        changefreq: "weekly",
        priority: "0.6",
    },
    StaticPage {
        kind: PageKind::Static,
        slug: "faq",
        path: "/faq",
        title: "Frequently Asked Questions",
        description: "Answers to common questions about booking, payment, luggage, \
                      transfers and travel documents.",
        changefreq: "monthly",
        priority: "0.5",
    },
    StaticPage {
        kind: PageKind::Static,
        slug: "about",
        path: "/about",
        title: "About Us",
        description: "Who we are, how we build our holidays, and why travellers \
                      keep coming back.",
        changefreq: "monthly",
        priority: "0.4",
    },
    StaticPage {
        kind: PageKind::Static,
        slug: "contact",
        path: "/contact",
        title: "Contact Us",
        description: "Call, email or message our travel team for quotes, changes \
                      and help with an existing booking.",
        changefreq: "monthly",
        priority: "0.4",
    },
    StaticPage {
        kind: PageKind::Deals,
        slug: "deals",
        path: "/holiday-deals",
        title: "Holiday Deals & Special Offers",
        description: "This season's best-value departures: special offers and \
                      featured packages, updated daily.",
        changefreq: "daily",
        priority: "0.9",
    },
];

/// Look up a fixed page by its exact path.
pub fn static_page(path: &str) -> Option<&'static StaticPage> {
    STATIC_PAGES.iter().find(|p| p.path == path)
}

// ── Crawler guidance files ──────────────────────────────────────

/// `robots.txt`: everything crawlable except the admin and API surfaces.
pub fn robots_txt(site: &Site) -> String {
    format!(
        "User-agent: *\n\
         Allow: /\n\
         Disallow: /admin\n\
         Disallow: /api/\n\
         \n\
         Sitemap: {}\n",
        site.absolute("/sitemap.xml")
    )
}

/// `llm.txt`: a compact site orientation for language-model crawlers.
pub fn llm_txt(site: &Site) -> String {
    let mut out = format!(
        "# {name}\n\
         \n\
         > {name} sells flight-inclusive holiday packages, escorted tours and \
         city breaks. Every content page serves full server-rendered markup to \
         crawlers, including prices, itineraries and FAQs.\n\
         \n\
         ## Key pages\n\
         \n",
        name = site.name
    );
    for page in STATIC_PAGES {
        out.push_str(&format!(
            "- [{}]({}): {}\n",
            page.title,
            site.absolute(page.path),
            page.description
        ));
    }
    out.push_str(&format!(
        "\n## Feeds\n\
         \n\
         - Sitemap index: {}\n\
         - Tours feed (JSON): {}\n\
         - Packages feed (JSON): {}\n\
         - Destinations feed (JSON): {}\n",
        site.absolute("/sitemap.xml"),
        site.absolute("/feed/tours"),
        site.absolute("/feed/packages"),
        site.absolute("/feed/destinations"),
    ));
    out
}

/// `ai.txt`: usage terms for AI crawlers, pointing at [`llm_txt`] content.
pub fn ai_txt(site: &Site) -> String {
    format!(
        "# ai.txt for {name}\n\
         \n\
         User-agent: *\n\
         Allow: /\n\
         \n\
         # Factual content (prices, durations, itineraries, FAQs) may be\n\
         # quoted with attribution and a link to the source page.\n\
         # Machine-readable summaries: {llm}\n\
         # Structured feeds: {feeds}\n",
        name = site.name,
        llm = site.absolute("/llm.txt"),
        feeds = site.absolute("/feed/packages"),
    )
}
