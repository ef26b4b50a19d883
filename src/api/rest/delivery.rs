use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{post, put};
use axum::Json;
use axum::Router;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::engine::quote::quote_delivery;
use crate::error::AppError;
use crate::geo::calculate_distance;
use crate::models::delivery_config::{
    ConfigEvent, DeliveryLogicConfig, DistanceMode, DistanceTier,
};
use crate::models::quote::DeliveryQuote;
use crate::models::shop::GeoPoint;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/shops/:id/delivery-config",
            put(upsert_config).get(get_config).delete(delete_config),
        )
        .route("/shops/:id/delivery-quote", post(create_quote))
        .route("/distance", post(distance))
}

/// Merchant settings form payload. Omitted money fields default to zero and
/// omitted optional limits are disabled.
#[derive(Deserialize)]
pub struct UpsertConfigRequest {
    #[serde(default)]
    pub minimum_order_value: Decimal,
    #[serde(default)]
    pub small_order_surcharge: Decimal,
    #[serde(default)]
    pub least_order_value: Decimal,
    pub distance_mode: DistanceMode,
    #[serde(default)]
    pub distance_tiers: Vec<DistanceTier>,
    pub max_delivery_fee: Option<Decimal>,
    #[serde(default)]
    pub beyond_tier_fee_per_unit: Decimal,
    #[serde(default)]
    pub beyond_tier_distance_unit: f64,
    pub free_delivery_threshold: Option<Decimal>,
    pub free_delivery_radius: Option<f64>,
}

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub subtotal: Decimal,
    pub destination: GeoPoint,
}

#[derive(Deserialize)]
pub struct DistanceRequest {
    pub from: GeoPoint,
    pub to: GeoPoint,
}

#[derive(Serialize)]
pub struct DistanceResponse {
    pub meters: f64,
}

async fn upsert_config(
    State(state): State<Arc<AppState>>,
    Path(shop_id): Path<Uuid>,
    Json(payload): Json<UpsertConfigRequest>,
) -> Result<Json<DeliveryLogicConfig>, AppError> {
    if !state.shops.contains_key(&shop_id) {
        return Err(AppError::NotFound(format!("shop {} not found", shop_id)));
    }

    let config = DeliveryLogicConfig {
        shop_id,
        minimum_order_value: payload.minimum_order_value,
        small_order_surcharge: payload.small_order_surcharge,
        least_order_value: payload.least_order_value,
        distance_mode: payload.distance_mode,
        distance_tiers: payload.distance_tiers,
        max_delivery_fee: payload.max_delivery_fee,
        beyond_tier_fee_per_unit: payload.beyond_tier_fee_per_unit,
        beyond_tier_distance_unit: payload.beyond_tier_distance_unit,
        free_delivery_threshold: payload.free_delivery_threshold,
        free_delivery_radius: payload.free_delivery_radius,
        updated_at: Utc::now(),
    };
    config.validate()?;

    state.delivery_configs.insert(shop_id, config.clone());
    state
        .metrics
        .configs_stored
        .set(state.delivery_configs.len() as i64);
    let _ = state.config_events_tx.send(ConfigEvent::Updated {
        config: config.clone(),
    });

    info!(
        shop_id = %shop_id,
        mode = ?config.distance_mode,
        tiers = config.distance_tiers.len(),
        "delivery config saved"
    );

    Ok(Json(config))
}

async fn get_config(
    State(state): State<Arc<AppState>>,
    Path(shop_id): Path<Uuid>,
) -> Result<Json<DeliveryLogicConfig>, AppError> {
    let config = state.delivery_configs.get(&shop_id).ok_or_else(|| {
        AppError::NotFound(format!("delivery config for shop {} not found", shop_id))
    })?;

    Ok(Json(config.value().clone()))
}

async fn delete_config(
    State(state): State<Arc<AppState>>,
    Path(shop_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.delivery_configs.remove(&shop_id).ok_or_else(|| {
        AppError::NotFound(format!("delivery config for shop {} not found", shop_id))
    })?;

    state
        .metrics
        .configs_stored
        .set(state.delivery_configs.len() as i64);
    let _ = state.config_events_tx.send(ConfigEvent::Removed {
        shop_id,
        at: Utc::now(),
    });

    info!(shop_id = %shop_id, "delivery config removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn create_quote(
    State(state): State<Arc<AppState>>,
    Path(shop_id): Path<Uuid>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<DeliveryQuote>, AppError> {
    let quote = quote_delivery(&state, shop_id, payload.subtotal, &payload.destination)?;
    Ok(Json(quote))
}

async fn distance(Json(payload): Json<DistanceRequest>) -> Result<Json<DistanceResponse>, AppError> {
    let meters = calculate_distance(&payload.from, &payload.to)?;
    Ok(Json(DistanceResponse { meters }))
}
