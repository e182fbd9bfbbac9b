use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::repo_types::{NewNote, Note};
use crate::{
    error::{AppError, AppResult},
    storage::NoteStore,
};

pub(crate) const INVALID_ID: &str = "Sorry, invalid ID note";
pub(crate) const ALREADY_DELETED: &str = "Sorry, note already deleted";

/// Owner-scoped note operations.
#[derive(Clone)]
pub struct NotesService {
    notes: Arc<dyn NoteStore>,
    enforce_ownership: bool,
}

fn required(field: &str, value: Option<String>) -> AppResult<String> {
    match value {
        None => Err(AppError::Validation(format!("\"{field}\" is required"))),
        Some(v) if v.is_empty() => Err(AppError::Validation(format!(
            "\"{field}\" is not allowed to be empty"
        ))),
        Some(v) => Ok(v),
    }
}

impl NotesService {
    pub fn new(notes: Arc<dyn NoteStore>, enforce_ownership: bool) -> Self {
        Self {
            notes,
            enforce_ownership,
        }
    }

    pub async fn list_notes(&self, owner: &str) -> AppResult<Vec<Note>> {
        Ok(self.notes.list_by_owner(owner).await?)
    }

    pub async fn add_note(
        &self,
        owner: &str,
        title: Option<String>,
        body: Option<String>,
    ) -> AppResult<Note> {
        let title = required("title", title)?;
        let body = required("body", body)?;
        let note = self
            .notes
            .insert(NewNote {
                title,
                body,
                owner: owner.to_string(),
                created_at: OffsetDateTime::now_utc(),
            })
            .await?;
        info!(note_id = %note.id, owner = %owner, "note created");
        Ok(note)
    }

    /// `id` comes straight from the path; anything that is not a note id is
    /// treated as unknown.
    pub async fn get_note(&self, requester: &str, id: &str) -> AppResult<Note> {
        let id = Uuid::parse_str(id).map_err(|_| AppError::NotFound(INVALID_ID))?;
        let note = self
            .notes
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound(INVALID_ID))?;
        self.check_owner(requester, &note)?;
        Ok(note)
    }

    pub async fn delete_note(&self, requester: &str, id: &str) -> AppResult<()> {
        let id = Uuid::parse_str(id).map_err(|_| AppError::NotFound(ALREADY_DELETED))?;

        if self.enforce_ownership {
            let note = self
                .notes
                .find_by_id(id)
                .await?
                .ok_or(AppError::NotFound(ALREADY_DELETED))?;
            self.check_owner(requester, &note)?;
        }

        if self.notes.delete_by_id(id).await? == 0 {
            return Err(AppError::NotFound(ALREADY_DELETED));
        }
        info!(note_id = %id, requester = %requester, "note deleted");
        Ok(())
    }

    fn check_owner(&self, requester: &str, note: &Note) -> AppResult<()> {
        if self.enforce_ownership && note.owner != requester {
            warn!(note_id = %note.id, requester = %requester, "note belongs to another user");
            return Err(AppError::Authorization);
        }
        Ok(())
    }
}
