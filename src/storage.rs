use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};
use crate::notes::repo_types::{NewNote, Note};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;
}

#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Notes owned by `owner`, in whatever order the store yields them.
    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Note>>;
    async fn insert(&self, note: NewNote) -> anyhow::Result<Note>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Note>>;
    /// Returns the number of removed records (0 or 1).
    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<u64>;
}

/// Process-local store used for `DATABASE_URL=memory://` and in tests.
/// Keeps insertion order, like a fresh collection scan would.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    notes: RwLock<Vec<Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.iter().filter(|n| n.owner == owner).cloned().collect())
    }

    async fn insert(&self, note: NewNote) -> anyhow::Result<Note> {
        let note = Note {
            id: Uuid::new_v4(),
            title: note.title,
            body: note.body,
            owner: note.owner,
            created_at: note.created_at,
        };
        self.notes.write().await.push(note.clone());
        Ok(note)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.iter().find(|n| n.id == id).cloned())
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<u64> {
        let mut notes = self.notes.write().await;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        Ok((before - notes.len()) as u64)
    }
}
