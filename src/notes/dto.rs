use serde::{Deserialize, Serialize};

use super::repo_types::Note;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddNoteRequest {
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NotesList {
    pub notes: Vec<Note>,
}

#[derive(Debug, Serialize)]
pub struct NoteDetails {
    pub note: Note,
}
