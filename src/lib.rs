//! Server-side SEO for a client-rendered travel storefront.
//!
//! The storefront ships an empty application shell; crawlers that do not
//! execute JavaScript see nothing. This crate sits in front of the shell,
//! resolves each public route to catalogue content, and injects a head
//! block, JSON-LD, and a crawlable HTML fragment into the shell before it
//! leaves the server. Humans keep the untouched app in development;
//! production serves the injected document to everyone.

pub mod aggregate;
pub mod bot;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod faq;
pub mod feed;
pub mod mutator;
pub mod pages;
pub mod resolver;
pub mod seo;
pub mod server;
pub mod sitemap;
pub mod store;
pub mod tours;
