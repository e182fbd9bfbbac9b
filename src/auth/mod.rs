use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
pub mod handlers;
pub mod jwt;
pub mod middleware;
mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub use services::AuthService;

/// Routes reachable without a session.
pub fn public_router() -> Router<AppState> {
    handlers::auth_routes()
}

/// Routes that expect [`middleware::require_session`] in front of them.
pub fn session_router() -> Router<AppState> {
    handlers::me_routes()
}
