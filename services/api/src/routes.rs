use crate::infra::{AppState, ListingState};
use crate::params::{ListingParams, ListingRequest};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use listing_hub::error::AppError;
use listing_hub::listings::{
    format_price, AgentId, CurrencyCode, CurrencyPreferenceStore, ListingRecord, MapViewport,
    SortKey,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// A listing as a surface shows it: the canonical record plus its display price.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingView {
    #[serde(flatten)]
    pub(crate) record: ListingRecord,
    pub(crate) display_price: String,
}

impl ListingView {
    pub(crate) fn project(records: Vec<ListingRecord>, currency: CurrencyCode) -> Vec<Self> {
        records
            .into_iter()
            .map(|record| ListingView {
                display_price: format_price(record.price, currency),
                record,
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingPageResponse {
    pub(crate) agent_id: AgentId,
    pub(crate) currency: CurrencyCode,
    pub(crate) sort: SortKey,
    pub(crate) page_number: usize,
    pub(crate) total_pages: usize,
    pub(crate) total_items: usize,
    pub(crate) items: Vec<ListingView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MapResponse {
    pub(crate) agent_id: AgentId,
    pub(crate) currency: CurrencyCode,
    pub(crate) viewport: MapViewport,
    pub(crate) markers: Vec<ListingView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CurrencyPreferenceResponse {
    pub(crate) currency: CurrencyCode,
    pub(crate) supported: Vec<CurrencyCode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CurrencyPreferenceUpdate {
    pub(crate) currency: String,
}

pub(crate) fn listing_router(state: ListingState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/agents/:agent_id/listings", get(listings_endpoint))
        .route("/api/v1/agents/:agent_id/map", get(map_endpoint))
        .route(
            "/api/v1/preferences/currency",
            get(currency_preference_endpoint).put(update_currency_preference_endpoint),
        )
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn listings_endpoint(
    State(state): State<ListingState>,
    Path(agent_id): Path<String>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingPageResponse>, AppError> {
    let ListingRequest { query, currency } = params.into_request(&state.settings)?;
    let currency = currency.unwrap_or_else(|| state.preferences.display_currency());
    let agent = AgentId(agent_id);

    let records = state.aggregator.load_listings(&agent).await?;
    let page = query.run(&records)?;
    debug!(
        agent = %agent,
        page = page.page_number,
        total = page.total_items,
        "served listing page"
    );

    Ok(Json(ListingPageResponse {
        agent_id: agent,
        currency,
        sort: query.sort,
        page_number: page.page_number,
        total_pages: page.total_pages,
        total_items: page.total_items,
        items: ListingView::project(page.items, currency),
    }))
}

pub(crate) async fn map_endpoint(
    State(state): State<ListingState>,
    Path(agent_id): Path<String>,
    Query(params): Query<ListingParams>,
) -> Result<Json<MapResponse>, AppError> {
    let ListingRequest { query, currency } = params.into_request(&state.settings)?;
    let currency = currency.unwrap_or_else(|| state.preferences.display_currency());
    let agent = AgentId(agent_id);

    let records = state.aggregator.load_listings(&agent).await?;
    let markers = query.map_markers(&records, state.settings.marker_offset)?;
    let viewport = MapViewport::for_records(&markers);

    Ok(Json(MapResponse {
        agent_id: agent,
        currency,
        viewport,
        markers: ListingView::project(markers, currency),
    }))
}

pub(crate) async fn currency_preference_endpoint(
    State(state): State<ListingState>,
) -> Json<CurrencyPreferenceResponse> {
    Json(CurrencyPreferenceResponse {
        currency: state.preferences.display_currency(),
        supported: CurrencyCode::ALL.to_vec(),
    })
}

pub(crate) async fn update_currency_preference_endpoint(
    State(state): State<ListingState>,
    Json(payload): Json<CurrencyPreferenceUpdate>,
) -> Result<Json<CurrencyPreferenceResponse>, AppError> {
    let currency = payload.currency.parse::<CurrencyCode>()?;
    state.preferences.set_display_currency(currency);

    Ok(Json(CurrencyPreferenceResponse {
        currency,
        supported: CurrencyCode::ALL.to_vec(),
    }))
}
