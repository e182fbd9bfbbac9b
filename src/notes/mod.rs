mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use services::NotesService;

pub fn router() -> Router<AppState> {
    handlers::notes_routes()
}
