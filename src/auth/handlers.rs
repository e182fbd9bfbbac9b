use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginData, LoginRequest, RegisterRequest},
        middleware::SessionUser,
    },
    envelope::Envelope,
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Envelope<()>> {
    let Json(payload) = payload?;
    state.auth.register(payload).await?;
    Ok(Envelope::message(
        StatusCode::CREATED,
        "New user successfully created!",
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Envelope<LoginData>> {
    let Json(payload) = payload?;
    let access_token = state.auth.login(payload).await?;
    Ok(Envelope::ok(StatusCode::OK, LoginData { access_token }).with_message("Login successfully!"))
}

#[instrument(skip_all)]
pub async fn get_me(Extension(user): Extension<SessionUser>) -> Envelope<SessionUser> {
    Envelope::ok(StatusCode::OK, user)
}
