use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tokio::sync::RwLock;
use tracing::error;

use crate::{
    complaints::repo_types::{ChatMessage, Complaint, ComplaintPatch, HistoryEntry},
    error::{AppError, AppResult},
    outcome::UpdateOutcome,
};

/// The `complaints` collection. Each complaint is one document; history and chat are embedded.
#[async_trait]
pub trait ComplaintStore: Send + Sync {
    async fn list_all(&self) -> AppResult<Vec<Complaint>>;

    async fn count(&self) -> AppResult<u64>;

    async fn find(&self, id: &str) -> AppResult<Option<Complaint>>;

    async fn create(&self, complaint: &Complaint) -> AppResult<()>;

    async fn update(&self, id: &str, patch: &ComplaintPatch) -> AppResult<UpdateOutcome>;

    async fn append_history(&self, id: &str, entry: &HistoryEntry) -> AppResult<UpdateOutcome>;

    async fn append_chat(&self, id: &str, message: &ChatMessage) -> AppResult<UpdateOutcome>;

    async fn delete(&self, id: &str) -> AppResult<UpdateOutcome>;
}

#[derive(Clone)]
pub struct PgComplaintStore {
    db: PgPool,
}

impl PgComplaintStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ComplaintStore for PgComplaintStore {
    async fn list_all(&self) -> AppResult<Vec<Complaint>> {
        let rows = sqlx::query_scalar::<_, Json<Complaint>>(
            r#"
            SELECT doc
            FROM complaints
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|Json(c)| c).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM complaints")
            .fetch_one(&self.db)
            .await?;
        Ok(n as u64)
    }

    async fn find(&self, id: &str) -> AppResult<Option<Complaint>> {
        let row = sqlx::query_scalar::<_, Json<Complaint>>(
            r#"
            SELECT doc
            FROM complaints
            WHERE id = $1
            ORDER BY seq
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(|Json(c)| c))
    }

    async fn create(&self, complaint: &Complaint) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO complaints (id, doc)
            VALUES ($1, $2)
            "#,
        )
        .bind(&complaint.id)
        .bind(Json(complaint))
        .execute(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, complaint_id = %complaint.id, "insert complaint failed");
            AppError::from(e)
        })?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: &ComplaintPatch) -> AppResult<UpdateOutcome> {
        let res = sqlx::query(
            r#"
            UPDATE complaints
               SET doc = doc || $2::jsonb
             WHERE seq = (SELECT seq FROM complaints WHERE id = $1 ORDER BY seq LIMIT 1)
            "#,
        )
        .bind(id)
        .bind(Json(patch))
        .execute(&self.db)
        .await?;
        Ok(UpdateOutcome::from_rows(res.rows_affected()))
    }

    async fn append_history(&self, id: &str, entry: &HistoryEntry) -> AppResult<UpdateOutcome> {
        let res = sqlx::query(
            r#"
            UPDATE complaints
               SET doc = jsonb_set(
                       doc,
                       '{history}',
                       COALESCE(doc->'history', '[]'::jsonb) || jsonb_build_array($2::jsonb))
             WHERE seq = (SELECT seq FROM complaints WHERE id = $1 ORDER BY seq LIMIT 1)
            "#,
        )
        .bind(id)
        .bind(Json(entry))
        .execute(&self.db)
        .await?;
        Ok(UpdateOutcome::from_rows(res.rows_affected()))
    }

    async fn append_chat(&self, id: &str, message: &ChatMessage) -> AppResult<UpdateOutcome> {
        let res = sqlx::query(
            r#"
            UPDATE complaints
               SET doc = jsonb_set(
                       doc,
                       '{chat}',
                       COALESCE(doc->'chat', '[]'::jsonb) || jsonb_build_array($2::jsonb))
             WHERE seq = (SELECT seq FROM complaints WHERE id = $1 ORDER BY seq LIMIT 1)
            "#,
        )
        .bind(id)
        .bind(Json(message))
        .execute(&self.db)
        .await?;
        Ok(UpdateOutcome::from_rows(res.rows_affected()))
    }

    async fn delete(&self, id: &str) -> AppResult<UpdateOutcome> {
        let res = sqlx::query(
            r#"
            DELETE FROM complaints
             WHERE seq = (SELECT seq FROM complaints WHERE id = $1 ORDER BY seq LIMIT 1)
            "#,
        )
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(UpdateOutcome::from_rows(res.rows_affected()))
    }
}

/// Process-local store; insertion order is list order.
#[derive(Default)]
pub struct MemoryComplaintStore {
    complaints: RwLock<Vec<Complaint>>,
}

impl MemoryComplaintStore {
    async fn with_complaint<F>(&self, id: &str, f: F) -> UpdateOutcome
    where
        F: FnOnce(&mut Complaint) + Send,
    {
        let mut complaints = self.complaints.write().await;
        match complaints.iter_mut().find(|c| c.id == id) {
            Some(c) => {
                f(c);
                UpdateOutcome::from_rows(1)
            }
            None => UpdateOutcome::unmatched(),
        }
    }
}

#[async_trait]
impl ComplaintStore for MemoryComplaintStore {
    async fn list_all(&self) -> AppResult<Vec<Complaint>> {
        Ok(self.complaints.read().await.clone())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.complaints.read().await.len() as u64)
    }

    async fn find(&self, id: &str) -> AppResult<Option<Complaint>> {
        Ok(self
            .complaints
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn create(&self, complaint: &Complaint) -> AppResult<()> {
        self.complaints.write().await.push(complaint.clone());
        Ok(())
    }

    async fn update(&self, id: &str, patch: &ComplaintPatch) -> AppResult<UpdateOutcome> {
        Ok(self.with_complaint(id, |c| c.apply(patch)).await)
    }

    async fn append_history(&self, id: &str, entry: &HistoryEntry) -> AppResult<UpdateOutcome> {
        Ok(self
            .with_complaint(id, |c| c.history.push(entry.clone()))
            .await)
    }

    async fn append_chat(&self, id: &str, message: &ChatMessage) -> AppResult<UpdateOutcome> {
        Ok(self
            .with_complaint(id, |c| c.chat.push(message.clone()))
            .await)
    }

    async fn delete(&self, id: &str) -> AppResult<UpdateOutcome> {
        let mut complaints = self.complaints.write().await;
        match complaints.iter().position(|c| c.id == id) {
            Some(idx) => {
                complaints.remove(idx);
                Ok(UpdateOutcome::from_rows(1))
            }
            None => Ok(UpdateOutcome::unmatched()),
        }
    }
}
