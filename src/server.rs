//! HTTP surface and the injection pipeline.
//!
//! Every content route funnels into [`run_pipeline`], which applies the
//! stages in a fixed order: prerendered snapshot, response cache, resolve,
//! build, mutate, cache, respond. Responses that carry injected content are
//! marked with `x-seo-injected: true`; pass-throughs and snapshots are not
//! marked, so cache layers and tests can tell the difference.

use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{debug, error, info, warn};

use crate::bot;
use crate::cache::{MemoryCache, ResponseCache};
use crate::config::Config;
use crate::error::{SeoError, SeoResult};
use crate::feed::{self, FeedKind};
use crate::mutator::Mutator;
use crate::pages;
use crate::resolver::{Resolver, Target};
use crate::seo::{self, Site};
use crate::sitemap::{self, SitemapSection};
use crate::store::ContentStore;
use crate::tours::{HttpTourApi, TourApi};

/// Marker header on responses whose body was injected.
pub const INJECTED_HEADER: &str = "x-seo-injected";

/// Shared state behind every handler.
pub struct AppState {
    pub config: Config,
    pub site: Site,
    pub store: Arc<dyn ContentStore>,
    pub resolver: Resolver,
    pub cache: Arc<dyn ResponseCache>,
    pub mutator: Mutator,
    pub started_at: Instant,
}

/// Wire the state up from resolved configuration and a store.
pub fn build_state(config: Config, store: Arc<dyn ContentStore>) -> Arc<AppState> {
    let site = Site::new(&config.base_url, &config.site_name);
    let tour_api: Option<Arc<dyn TourApi>> = config.tour_api_url.as_deref().map(|url| {
        Arc::new(HttpTourApi::new(url, config.tour_api_timeout.as_millis() as u64))
            as Arc<dyn TourApi>
    });
    let resolver = Resolver::new(
        Arc::clone(&store),
        tour_api,
        &config.currency,
        &config.secondary_currency,
    );
    let cache: Arc<dyn ResponseCache> = Arc::new(MemoryCache::new(config.cache_ttl));
    let mutator = Mutator::new(&config.mount_id);

    Arc::new(AppState {
        site,
        store,
        resolver,
        cache,
        mutator,
        started_at: Instant::now(),
        config,
    })
}

/// Build the full router: content routes, machine endpoints, SPA fallback.
pub fn router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(health))
        .route("/api/v1/status", get(status))
        .route("/sitemap.xml", get(sitemap_index))
        .route("/sitemaps/:name", get(sitemap_section))
        .route("/feed/:name", get(feed_endpoint))
        .route("/robots.txt", get(robots_txt))
        .route("/llm.txt", get(llm_txt))
        .route("/ai.txt", get(ai_txt))
        .route("/tour/:id", get(content))
        .route("/packages/:slug", get(content))
        .route("/destinations/:slug", get(content))
        .route("/blog/:slug", get(content))
        .route("/Holidays/:country", get(content))
        .route("/Holidays/:country/:slug", get(content));
    for page in pages::STATIC_PAGES {
        router = router.route(page.path, get(content));
    }

    // Anything else is either a built asset or an app-only route that gets
    // the raw shell.
    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir)
                .not_found_service(get(spa_shell).with_state(Arc::clone(&state))),
        ),
        None => router.fallback(spa_shell),
    };

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = state.config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("meridian listening on {addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("shutdown signal error: {e}");
        return;
    }
    info!("shutdown signal received");
}

// ── Content pipeline ────────────────────────────────────────────

async fn content(State(state): State<Arc<AppState>>, headers: HeaderMap, uri: Uri) -> Response {
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());
    let is_crawler = bot::is_crawler(user_agent);

    let Some(target) = Target::from_path(uri.path()) else {
        return shell_response(&state).await;
    };

    // Development keeps the live app for humans; production serves the
    // same injected document to everyone so crawlers and users match.
    if !is_crawler && !state.config.environment.is_production() {
        debug!("passthrough {} (browser, development)", uri.path());
        return shell_response(&state).await;
    }

    match run_pipeline(&state, &target).await {
        Ok(response) => response,
        Err(e) => error_response(e),
    }
}

async fn run_pipeline(state: &AppState, target: &Target) -> SeoResult<Response> {
    let key = target.cache_key();

    if let Some(html) = load_snapshot(state, target).await {
        debug!("serving prerendered snapshot for {key}");
        return Ok(html_response(html, false));
    }

    if let Some(html) = state.cache.get(&key) {
        debug!("cache hit for {key}");
        return Ok(html_response(html, true));
    }

    let resolved = state.resolver.resolve(target).await;
    let Some(payload) = seo::build_payload(&state.site, &resolved) else {
        debug!("no content for {key}; serving shell untouched");
        return Ok(html_response(read_template(state).await?, false));
    };

    let template = read_template(state).await?;
    let html = state.mutator.inject(&template, &payload);
    state.cache.set(&key, html.clone());
    Ok(html_response(html, true))
}

/// A handcrafted snapshot beats synthesis when one exists for the slug.
async fn load_snapshot(state: &AppState, target: &Target) -> Option<String> {
    let dir = state.config.snapshot_dir.as_ref()?;
    let slug = target.slug();
    if !safe_snapshot_slug(slug) {
        warn!("refusing snapshot lookup for suspicious slug {slug:?}");
        return None;
    }
    let path = dir.join(target.kind().namespace()).join(format!("{slug}.html"));
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Some(html),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!("snapshot read failed for {}: {e}", path.display());
            None
        }
    }
}

/// Snapshot slugs become file names; anything path-like is rejected.
fn safe_snapshot_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains('/') && !slug.contains('\\') && !slug.contains("..")
}

/// The shell template is read per request so deploys of the SPA bundle
/// take effect without a restart.
async fn read_template(state: &AppState) -> SeoResult<String> {
    let path = &state.config.template_path;
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeoError::Template {
            path: path.clone(),
            source,
        })
}

async fn spa_shell(State(state): State<Arc<AppState>>) -> Response {
    match read_template(&state).await {
        Ok(html) => html_response(html, false),
        Err(e) => error_response(e),
    }
}

async fn shell_response(state: &AppState) -> Response {
    match read_template(state).await {
        Ok(html) => html_response(html, false),
        Err(e) => error_response(e),
    }
}

fn html_response(html: String, injected: bool) -> Response {
    let mut response = Html(html).into_response();
    if injected {
        response.headers_mut().insert(
            HeaderName::from_static(INJECTED_HEADER),
            HeaderValue::from_static("true"),
        );
    }
    response
}

fn error_response(e: SeoError) -> Response {
    match e {
        SeoError::Template { .. } => {
            error!("{e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "shell template unavailable").into_response()
        }
        SeoError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
        SeoError::Upstream(_) => {
            error!("{e}");
            (StatusCode::BAD_GATEWAY, "upstream content source failed").into_response()
        }
    }
}

// ── Machine endpoints ───────────────────────────────────────────

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    let packages = state.store.all_packages().await.map(|p| p.len()).ok();
    let posts = state.store.published_posts().await.map(|p| p.len()).ok();
    let faqs = state.store.published_faqs().await.map(|f| f.len()).ok();
    let products = state
        .store
        .cached_products(&state.config.currency)
        .await
        .map(|p| p.len())
        .ok();

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment.as_str(),
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "cache": {
            "entries": state.cache.len(),
            "ttl_secs": state.config.cache_ttl.map(|ttl| ttl.as_secs()),
        },
        "store": {
            "packages": packages,
            "posts": posts,
            "faqs": faqs,
            "products": products,
        },
    }))
}

async fn sitemap_index(State(state): State<Arc<AppState>>) -> Response {
    match sitemap::sitemap_index(&state.site) {
        Ok(xml) => xml_response(xml),
        Err(e) => {
            error!("sitemap index failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn sitemap_section(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let Some(section) = SitemapSection::from_name(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let currencies = [
        state.config.currency.as_str(),
        state.config.secondary_currency.as_str(),
    ];
    match sitemap::section_xml(section, &state.site, state.store.as_ref(), &currencies).await {
        Ok(xml) => xml_response(xml),
        Err(e) => {
            error!("sitemap {name} failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn feed_endpoint(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    let Some(kind) = FeedKind::from_name(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let currencies = [
        state.config.currency.as_str(),
        state.config.secondary_currency.as_str(),
    ];
    match feed::feed(kind, &state.site, state.store.as_ref(), &currencies).await {
        Ok(feed) => Json(feed).into_response(),
        Err(e) => {
            error!("feed {name} failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn robots_txt(State(state): State<Arc<AppState>>) -> String {
    pages::robots_txt(&state.site)
}

async fn llm_txt(State(state): State<Arc<AppState>>) -> String {
    pages::llm_txt(&state.site)
}

async fn ai_txt(State(state): State<Arc<AppState>>) -> String {
    pages::ai_txt(&state.site)
}

fn xml_response(xml: String) -> Response {
    ([(CONTENT_TYPE, "application/xml")], xml).into_response()
}
