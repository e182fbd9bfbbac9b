use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{AddNoteRequest, NoteDetails, NotesList},
    services::{ALREADY_DELETED, INVALID_ID},
};
use crate::{
    auth::middleware::SessionUser,
    envelope::Envelope,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn notes_routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes))
        .route("/notes/add", post(add_note))
        .route("/notes/delete/:id", get(delete_note))
        .route("/notes/:id", get(get_note))
}

#[instrument(skip(state, user), fields(owner = %user.email))]
pub async fn list_notes(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> AppResult<Envelope<NotesList>> {
    let notes = state.notes.list_notes(&user.email).await?;
    Ok(Envelope::ok(StatusCode::OK, NotesList { notes }))
}

#[instrument(skip(state, user, payload), fields(owner = %user.email))]
pub async fn add_note(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    payload: Result<Json<AddNoteRequest>, JsonRejection>,
) -> AppResult<Envelope<()>> {
    let Json(payload) = payload?;
    state
        .notes
        .add_note(&user.email, payload.title, payload.body)
        .await?;
    Ok(Envelope::message(
        StatusCode::CREATED,
        "New note success to created!",
    ))
}

/// A segment that does not even decode cannot name a note.
fn note_id(
    path: Result<Path<String>, PathRejection>,
    not_found: &'static str,
) -> AppResult<String> {
    path.map(|Path(id)| id).map_err(|e| {
        warn!(error = %e, "rejected note id");
        AppError::NotFound(not_found)
    })
}

#[instrument(skip(state, user, path))]
pub async fn get_note(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Envelope<NoteDetails>> {
    let id = note_id(path, INVALID_ID)?;
    let note = state.notes.get_note(&user.email, &id).await?;
    Ok(Envelope::ok(StatusCode::OK, NoteDetails { note }))
}

#[instrument(skip(state, user, path))]
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Envelope<()>> {
    let id = note_id(path, ALREADY_DELETED)?;
    state.notes.delete_note(&user.email, &id).await?;
    Ok(Envelope::message(StatusCode::OK, "Delete note successfully!"))
}
