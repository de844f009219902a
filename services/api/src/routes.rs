use crate::infra::{build_snapshot, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use phone_match::decision::{
    ConstraintSet, Preset, PresetView, RankedResultsView, SubFactor, TraitKey, TraitView,
};
use phone_match::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RankRequest {
    #[serde(default)]
    pub(crate) constraints: ConstraintSet,
    #[serde(default)]
    pub(crate) preset: Option<Preset>,
    #[serde(default)]
    pub(crate) weights: BTreeMap<TraitKey, i64>,
    #[serde(default)]
    pub(crate) sub_weights: BTreeMap<TraitKey, BTreeMap<SubFactor, i64>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RankResponse {
    /// Constraints as applied, after budget clamping.
    pub(crate) constraints: ConstraintSet,
    pub(crate) adjusted: bool,
    #[serde(flatten)]
    pub(crate) results: RankedResultsView,
}

pub(crate) fn api_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/traits", get(traits_endpoint))
        .route("/api/v1/presets", get(presets_endpoint))
        .route("/api/v1/phones/rank", post(rank_endpoint))
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
        json!({ "status": "ready", "catalog_size": state.catalog.len() })
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

pub(crate) async fn traits_endpoint() -> Json<Vec<TraitView>> {
    Json(TraitView::all())
}

pub(crate) async fn presets_endpoint() -> Json<Vec<PresetView>> {
    Json(PresetView::all())
}

pub(crate) async fn rank_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let RankRequest {
        constraints,
        preset,
        weights,
        sub_weights,
    } = payload;

    let sub_weights = sub_weights.into_iter().flat_map(|(key, factors)| {
        factors
            .into_iter()
            .map(move |(factor, value)| (key, factor, value))
    });
    let mut snapshot = build_snapshot(constraints, preset, weights, sub_weights)?;

    let adjusted = state.engine.normalize(&mut snapshot);
    if adjusted {
        warn!(
            budget_min = snapshot.constraints.budget_min,
            budget_max = snapshot.constraints.budget_max,
            "budget range adjusted to allowed limits"
        );
    }

    let results = state.engine.evaluate(&state.catalog, &snapshot);
    info!(
        total_matches = results.total_matches,
        returned = results.entries.len(),
        "ranked phones"
    );

    Ok(Json(RankResponse {
        constraints: snapshot.constraints,
        adjusted,
        results: results.view(),
    }))
}
