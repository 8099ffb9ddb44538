//! Preview server rendering article pages on request

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path as UrlPath, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{ArticleLookup, ArticleStore};
use crate::helpers::listing_url;
use crate::templates::PageRenderer;
use crate::Folio;

/// Server state
pub struct ServerState {
    config: SiteConfig,
    store: ArticleStore,
    renderer: PageRenderer,
    static_dir: PathBuf,
}

impl ServerState {
    pub fn new(folio: &Folio) -> Result<Self> {
        let store = if folio.config.cache {
            folio.store().with_cache()
        } else {
            folio.store()
        };

        Ok(Self {
            config: folio.config.clone(),
            store,
            renderer: PageRenderer::new()?,
            static_dir: folio.static_dir.clone(),
        })
    }
}

/// Start the preview server
pub async fn start(folio: &Folio, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(folio)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!(
        "http://{}:{}{}",
        ip,
        port,
        listing_url(&folio.config)
    );
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    // Open browser if requested
    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router: listing, article pages, then static files
pub fn router(state: Arc<ServerState>) -> Router {
    let base = state.config.base_path.trim_end_matches('/').to_string();
    let route = state.config.articles_route.trim_matches('/');
    let listing = if route.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}/", base, route)
    };

    let mut app = Router::new()
        .route(&listing, get(listing_handler))
        .route(&format!("{}:page", listing), get(article_handler))
        .route(&format!("{}:page/", listing), get(article_handler));

    if listing != "/" {
        app = app
            .route(listing.trim_end_matches('/'), get(listing_handler))
            .route("/", get(redirect_to_listing));
        if !base.is_empty() && listing != format!("{}/", base) {
            app = app
                .route(&base, get(redirect_to_listing))
                .route(&format!("{}/", base), get(redirect_to_listing));
        }
    }

    app.fallback(static_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn redirect_to_listing(State(state): State<Arc<ServerState>>) -> Redirect {
    Redirect::temporary(&listing_url(&state.config))
}

async fn listing_handler(State(state): State<Arc<ServerState>>) -> Response {
    let task_state = Arc::clone(&state);
    let listed = tokio::task::spawn_blocking(move || task_state.store.list_articles()).await;

    let summaries = match listed {
        Ok(Ok(summaries)) => summaries,
        Ok(Err(e)) => return server_error(&e.to_string()),
        Err(e) => return server_error(&e.to_string()),
    };

    match state.renderer.render_listing(&state.config, &summaries) {
        Ok(html) => Html(html).into_response(),
        Err(e) => server_error(&e.to_string()),
    }
}

async fn article_handler(
    State(state): State<Arc<ServerState>>,
    UrlPath(page): UrlPath<String>,
) -> Response {
    let slug = if state.config.trailing_slash {
        page
    } else {
        page.strip_suffix(".html").map(str::to_string).unwrap_or(page)
    };

    let task_state = Arc::clone(&state);
    let lookup = tokio::task::spawn_blocking(move || task_state.store.load_article(&slug)).await;

    match lookup.map(ArticleLookup::found) {
        Ok(Some(article)) => match state.renderer.render_article(&state.config, &article) {
            Ok(html) => Html(html).into_response(),
            Err(e) => server_error(&e.to_string()),
        },
        Ok(None) => not_found(&state),
        Err(e) => server_error(&e.to_string()),
    }
}

/// Fallback handler serving static assets below the base path
async fn static_handler(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    let Some(path) = strip_base_path(&state.config.base_path, request.uri().path()) else {
        return not_found(&state);
    };

    let (mut parts, body) = request.into_parts();
    parts.uri = match path.parse() {
        Ok(uri) => uri,
        Err(_) => return not_found(&state),
    };
    let request = Request::from_parts(parts, body);

    let mut service = ServeDir::new(&state.static_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(&state),
        Ok(response) => response.into_response(),
        Err(_) => server_error("static file error"),
    }
}

/// Path below the base path, `None` when the request is outside it
fn strip_base_path(base_path: &str, path: &str) -> Option<String> {
    let base = base_path.trim_end_matches('/');
    let rest = path.strip_prefix(base)?;
    if rest.is_empty() {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        None
    }
}

fn not_found(state: &ServerState) -> Response {
    match state.renderer.render_not_found(&state.config) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

fn server_error(message: &str) -> Response {
    tracing::error!("Request failed: {}", message);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
