//! Rental endpoints.
//!
//! Creation binds the rental to the caller; update and delete are limited to
//! the rental's owner.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthMiddleware, RequestIdentity};
use crate::database::{Rental, RentalStore, RentalUpdate};
use crate::error::ApiResult;
use crate::routes::extract::ApiJson;
use crate::routes::bikes::DeletedResponse;
use crate::server::AppState;

/// Any owner field a client sends is not part of this struct and is dropped.
#[derive(Debug, Deserialize)]
pub struct CreateRentalRequest {
    pub bike_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRentalRequest {
    pub status: String,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListRentalsResponse {
    pub rentals: Vec<Rental>,
}

pub async fn create_rental(
    State(app_state): State<AppState>,
    identity: RequestIdentity,
    ApiJson(payload): ApiJson<CreateRentalRequest>,
) -> ApiResult<Json<Rental>> {
    let user = app_state.guard.current_user(&identity).await?;
    let rental = app_state.store.create_rental(user.id, payload.bike_id).await?;
    tracing::info!("User {} rented bike {} (rental {})", user.id, rental.bike_id, rental.id);
    Ok(Json(rental))
}

pub async fn get_rental(State(app_state): State<AppState>, Path(id): Path<i32>) -> ApiResult<Json<Rental>> {
    Ok(Json(app_state.store.get_rental(id).await?))
}

pub async fn update_rental(
    State(app_state): State<AppState>,
    identity: RequestIdentity,
    Path(id): Path<i32>,
    ApiJson(payload): ApiJson<UpdateRentalRequest>,
) -> ApiResult<Json<Rental>> {
    let rental = app_state.store.get_rental(id).await?;
    app_state.guard.require_owner(&identity, &rental).await?;

    let rental = app_state
        .store
        .update_rental(
            id,
            RentalUpdate {
                status: payload.status,
                end_time: payload.end_time,
            },
        )
        .await?;
    Ok(Json(rental))
}

pub async fn delete_rental(
    State(app_state): State<AppState>,
    identity: RequestIdentity,
    Path(id): Path<i32>,
) -> ApiResult<Json<DeletedResponse>> {
    let rental = app_state.store.get_rental(id).await?;
    app_state.guard.require_owner(&identity, &rental).await?;

    let rental = app_state.store.delete_rental(id).await?;
    Ok(Json(DeletedResponse {
        message: format!("Rental {} was deleted!", rental.id),
    }))
}

pub async fn list_rentals(State(app_state): State<AppState>) -> ApiResult<Json<ListRentalsResponse>> {
    let rentals = app_state.store.list_rentals().await?;
    Ok(Json(ListRentalsResponse { rentals }))
}

pub fn create_rental_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/rentals", get(list_rentals).post(create_rental))
        .route("/v1/rentals/{id}", get(get_rental).put(update_rental).delete(delete_rental))
        .layer(axum::middleware::from_fn_with_state(
            app_state.jwt_service.clone(),
            AuthMiddleware::require_identity,
        ))
}
