//! Bike endpoints. Every route requires a verified identity.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthMiddleware;
use crate::database::{Bike, BikeStore};
use crate::error::ApiResult;
use crate::routes::extract::ApiJson;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct BikeRequest {
    pub model: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListBikesResponse {
    pub bikes: Vec<Bike>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub message: String,
}

pub async fn create_bike(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<BikeRequest>,
) -> ApiResult<Json<Bike>> {
    let bike = app_state.store.create_bike(&payload.model, &payload.status).await?;
    tracing::info!("Created bike {}", bike.id);
    Ok(Json(bike))
}

pub async fn get_bike(State(app_state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Bike>> {
    Ok(Json(app_state.store.get_bike(id).await?))
}

pub async fn update_bike(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<BikeRequest>,
) -> ApiResult<Json<Bike>> {
    let bike = app_state.store.update_bike(id, &payload.model, &payload.status).await?;
    Ok(Json(bike))
}

pub async fn delete_bike(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<DeletedResponse>> {
    let bike = app_state.store.delete_bike(id).await?;
    tracing::info!("Deleted bike {}", bike.id);
    Ok(Json(DeletedResponse {
        message: format!("Bike {} was deleted!", bike.id),
    }))
}

pub async fn list_bikes(State(app_state): State<AppState>) -> ApiResult<Json<ListBikesResponse>> {
    let bikes = app_state.store.list_bikes().await?;
    Ok(Json(ListBikesResponse { bikes }))
}

pub fn create_bike_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/bikes", get(list_bikes).post(create_bike))
        .route("/v1/bikes/{id}", get(get_bike).put(update_bike).delete(delete_bike))
        .layer(axum::middleware::from_fn_with_state(
            app_state.jwt_service.clone(),
            AuthMiddleware::require_identity,
        ))
}
