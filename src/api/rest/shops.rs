use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::shop::{GeoPoint, Shop};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shops", post(create_shop).get(list_shops))
        .route("/shops/:id", get(get_shop))
}

#[derive(Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
    pub location: GeoPoint,
}

async fn create_shop(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateShopRequest>,
) -> Result<Json<Shop>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }
    payload.location.validate()?;

    let shop = Shop {
        id: Uuid::new_v4(),
        name: payload.name.trim().to_string(),
        location: payload.location,
        created_at: Utc::now(),
    };

    state.shops.insert(shop.id, shop.clone());
    info!(shop_id = %shop.id, name = %shop.name, "shop registered");

    Ok(Json(shop))
}

async fn list_shops(State(state): State<Arc<AppState>>) -> Json<Vec<Shop>> {
    let mut shops: Vec<Shop> = state
        .shops
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    shops.sort_by_key(|shop| shop.created_at);
    Json(shops)
}

async fn get_shop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Shop>, AppError> {
    let shop = state
        .shops
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("shop {} not found", id)))?;

    Ok(Json(shop.value().clone()))
}
