use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;
use crate::notes::repo_types::{NewNote, Note};
use crate::storage::NoteStore;

#[async_trait]
impl NoteStore for PgStore {
    async fn list_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Note>> {
        let rows = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, body, owner, created_at
            FROM notes
            WHERE owner = $1
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .context("list notes by owner")?;
        Ok(rows)
    }

    async fn insert(&self, note: NewNote) -> anyhow::Result<Note> {
        let row = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (title, body, owner, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, body, owner, created_at
            "#,
        )
        .bind(note.title)
        .bind(note.body)
        .bind(note.owner)
        .bind(note.created_at)
        .fetch_one(&self.pool)
        .await
        .context("insert note")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Note>> {
        let row = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, body, owner, created_at
            FROM notes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("get note by id")?;
        Ok(row)
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete note")?;
        Ok(res.rows_affected())
    }
}
