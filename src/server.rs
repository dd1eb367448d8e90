//! HTTP surface.
//!
//! - `GET /`                 HTML card page (what the browser backend captures)
//! - `GET /api/stats-svg`    compact SVG card, `?theme=light|dark`
//! - `GET /api/stats-card`   layout SVG card, CDN-cacheable for an hour
//! - `GET /api/stats-image`  configured image backend
//!
//! Card routes count one view each. Rendering failures answer 500 with an
//! error image instead of an empty body.

use crate::aggregator::StatsAggregator;
use crate::render::{self, RenderRequest, RenderToImage, RenderedImage, SVG_CONTENT_TYPE};
use crate::stats::{FetchOutcome, StatsRecord};
use crate::views::ViewCounter;
use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

pub const NO_CACHE: &str = "no-cache, no-store, must-revalidate";
pub const CDN_HOUR: &str = "public, max-age=0, s-maxage=3600, stale-while-revalidate=3600";

/// Set on responses built from a degraded record
pub const STATUS_HEADER: &str = "x-stats-status";

pub struct AppState {
    pub username: String,
    pub aggregator: StatsAggregator,
    pub image: Arc<dyn RenderToImage>,
    pub views: ViewCounter,
}

#[derive(Debug, Deserialize)]
pub struct CardQuery {
    pub theme: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page))
        .route("/api/stats-svg", get(stats_svg))
        .route("/api/stats-card", get(stats_card))
        .route("/api/stats-image", get(stats_image))
        .with_state(state)
}

enum Caching {
    None,
    CdnHour,
}

fn respond(status: StatusCode, content_type: &'static str, caching: Caching, degraded: bool, body: Vec<u8>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    match caching {
        Caching::None => {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
            headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
            headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
        }
        Caching::CdnHour => {
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(CDN_HOUR));
        }
    }
    if degraded {
        headers.insert(STATUS_HEADER, HeaderValue::from_static("degraded"));
    }
    (status, headers, body).into_response()
}

fn error_response(message: &str) -> Response {
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        SVG_CONTENT_TYPE,
        Caching::None,
        false,
        render::error_image::render(message).into_bytes(),
    )
}

/// Fetch stats and attach the view count. `count_view` is false for the page,
/// which the browser backend loads on behalf of an already counted request.
async fn load(state: &AppState, count_view: bool) -> (StatsRecord, bool) {
    let outcome = state.aggregator.fetch(&state.username).await;
    if let FetchOutcome::Degraded { reason, .. } = &outcome {
        tracing::warn!(username = %state.username, reason = %reason, "Serving degraded stats");
    }
    let degraded = outcome.is_degraded();
    let views = if count_view {
        state.views.record()
    } else {
        state.views.current()
    };
    (outcome.into_record().with_profile_views(views), degraded)
}

async fn page(State(state): State<Arc<AppState>>) -> Response {
    let (stats, degraded) = load(&state, false).await;
    respond(
        StatusCode::OK,
        "text/html; charset=utf-8",
        Caching::None,
        degraded,
        render::html::render_page(&stats).into_bytes(),
    )
}

async fn stats_svg(State(state): State<Arc<AppState>>, Query(query): Query<CardQuery>) -> Response {
    let (stats, degraded) = load(&state, true).await;
    let theme = render::svg::Theme::from_param(query.theme.as_deref());
    respond(
        StatusCode::OK,
        SVG_CONTENT_TYPE,
        Caching::None,
        degraded,
        render::svg::render(&stats, theme).into_bytes(),
    )
}

async fn stats_card(State(state): State<Arc<AppState>>) -> Response {
    let (stats, degraded) = load(&state, true).await;
    respond(
        StatusCode::OK,
        SVG_CONTENT_TYPE,
        Caching::CdnHour,
        degraded,
        render::layout::stats_card(&stats).to_svg().into_bytes(),
    )
}

async fn stats_image(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (stats, degraded) = load(&state, true).await;
    let page_url = page_url(&headers);
    let image = Arc::clone(&state.image);

    let rendered = tokio::task::spawn_blocking(move || {
        image.render(&RenderRequest {
            stats: &stats,
            page_url: &page_url,
        })
    })
    .await;

    match rendered {
        Ok(Ok(RenderedImage { content_type, bytes })) => {
            respond(StatusCode::OK, content_type, Caching::None, degraded, bytes)
        }
        Ok(Err(e)) => {
            tracing::error!(backend = state.image.name(), error = %e, "Image rendering failed");
            error_response(&e.to_string())
        }
        Err(e) => {
            tracing::error!(backend = state.image.name(), error = %e, "Image rendering task failed");
            error_response("rendering task did not complete")
        }
    }
}

/// URL of this server's card page, as seen by the client.
fn page_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost:3000");
    format!("http://{host}/")
}
