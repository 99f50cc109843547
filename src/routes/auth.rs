//! Auth routes for login, registration, and the sample protected call

use axum::{extract::State, routing::post, Json, Router};

use crate::auth::models::{
    LoginRequest, ProtectedReply, ProtectedRequest, RegisterRequest, RegisterResponse, RequestIdentity,
    TokenResponse,
};
use crate::auth::{AuthMiddleware, Registration};
use crate::error::ApiResult;
use crate::routes::extract::ApiJson;
use crate::server::AppState;

/// `POST /v1/auth/login`
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let issued = app_state.gateway.login(&payload.email, &payload.password).await?;
    Ok(Json(TokenResponse::new(issued.token, issued.expires_at)))
}

/// `POST /v1/auth/register`
pub async fn register(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    let user_id = app_state
        .gateway
        .register(Registration {
            email: payload.email,
            password: payload.password,
            name: payload.name,
            surname: payload.surname,
            age: payload.age,
        })
        .await?;

    Ok(Json(RegisterResponse {
        user_id,
        reply: format!("Congratulations, User id: {} got created!", user_id),
    }))
}

/// `POST /v1/auth/protected`: echoes the text followed by the caller's email
pub async fn sample_protected(
    identity: RequestIdentity,
    ApiJson(payload): ApiJson<ProtectedRequest>,
) -> Json<ProtectedReply> {
    Json(ProtectedReply {
        result: format!("{} {}", payload.text, identity.email),
    })
}

pub fn create_auth_routes(app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/v1/auth/protected", post(sample_protected))
        .layer(axum::middleware::from_fn_with_state(
            app_state.jwt_service.clone(),
            AuthMiddleware::require_identity,
        ));

    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/register", post(register))
        .merge(protected)
}
