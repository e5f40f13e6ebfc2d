//! CLI subcommand implementations for the meridian binary.

pub mod render_cmd;
pub mod serve_cmd;
pub mod sitemap_cmd;
