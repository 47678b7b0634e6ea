use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tokio::sync::RwLock;
use tracing::error;

use crate::{
    db::unique_violation,
    error::{AppError, AppResult},
    outcome::UpdateOutcome,
    users::repo_types::{Role, User, UserPatch},
};

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// The `users` collection.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_all(&self) -> AppResult<Vec<User>>;

    async fn count(&self) -> AppResult<u64>;

    /// Fails with [`AppError::DuplicateEmail`] when the email is taken.
    async fn create(&self, user: &User) -> AppResult<()>;

    async fn update(&self, id: &str, patch: &UserPatch) -> AppResult<UpdateOutcome>;

    async fn delete_by_email(&self, email: &str) -> AppResult<UpdateOutcome>;

    async fn find_by_credentials(&self, email: &str, pass: &str) -> AppResult<Option<User>>;

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>>;

    /// Bulk-set `year` for the given `(id, year)` pairs; returns how many documents changed.
    async fn set_years(&self, changes: &[(String, String)]) -> AppResult<u64>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn write_error(e: sqlx::Error, email: &str) -> AppError {
    match unique_violation(&e) {
        Some(constraint) if constraint == EMAIL_CONSTRAINT => {
            AppError::DuplicateEmail(email.to_string())
        }
        _ => {
            error!(error = %e, "users write failed");
            e.into()
        }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list_all(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_scalar::<_, Json<User>>(
            r#"
            SELECT doc
            FROM users
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|Json(u)| u).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(n as u64)
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, doc)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(Json(user))
        .execute(&self.db)
        .await
        .map_err(|e| write_error(e, &user.email))?;
        Ok(())
    }

    async fn update(&self, id: &str, patch: &UserPatch) -> AppResult<UpdateOutcome> {
        let res = sqlx::query(
            r#"
            UPDATE users
               SET doc = doc || $2::jsonb,
                   email = COALESCE($2::jsonb->>'email', email)
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(patch))
        .execute(&self.db)
        .await
        .map_err(|e| write_error(e, patch.email.as_deref().unwrap_or_default()))?;
        Ok(UpdateOutcome::from_rows(res.rows_affected()))
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<UpdateOutcome> {
        let res = sqlx::query("DELETE FROM users WHERE email = $1")
            .bind(email)
            .execute(&self.db)
            .await?;
        Ok(UpdateOutcome::from_rows(res.rows_affected()))
    }

    async fn find_by_credentials(&self, email: &str, pass: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_scalar::<_, Json<User>>(
            r#"
            SELECT doc
            FROM users
            WHERE email = $1 AND doc->>'pass' = $2
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(pass)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(|Json(u)| u))
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        let rows = sqlx::query_scalar::<_, Json<User>>(
            r#"
            SELECT doc
            FROM users
            WHERE doc->>'role' = $1
            ORDER BY seq
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|Json(u)| u).collect())
    }

    async fn set_years(&self, changes: &[(String, String)]) -> AppResult<u64> {
        if changes.is_empty() {
            return Ok(0);
        }
        let (ids, years): (Vec<String>, Vec<String>) = changes.iter().cloned().unzip();
        let res = sqlx::query(
            r#"
            UPDATE users
               SET doc = jsonb_set(doc, '{year}', to_jsonb(v.year))
              FROM UNNEST($1::text[], $2::text[]) AS v(id, year)
             WHERE users.id = v.id
            "#,
        )
        .bind(ids)
        .bind(years)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }
}

/// Process-local store; insertion order is list order.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list_all(&self) -> AppResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.users.read().await.len() as u64)
    }

    async fn create(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail(user.email.clone()));
        }
        if users.iter().any(|u| u.id == user.id) {
            return Err(AppError::Persistence(format!(
                "duplicate key value violates unique constraint \"users_pkey\" (id={})",
                user.id
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn update(&self, id: &str, patch: &UserPatch) -> AppResult<UpdateOutcome> {
        let mut users = self.users.write().await;
        let Some(idx) = users.iter().position(|u| u.id == id) else {
            return Ok(UpdateOutcome::unmatched());
        };
        if let Some(email) = &patch.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::DuplicateEmail(email.clone()));
            }
        }
        users[idx].apply(patch);
        Ok(UpdateOutcome::from_rows(1))
    }

    async fn delete_by_email(&self, email: &str) -> AppResult<UpdateOutcome> {
        let mut users = self.users.write().await;
        match users.iter().position(|u| u.email == email) {
            Some(idx) => {
                users.remove(idx);
                Ok(UpdateOutcome::from_rows(1))
            }
            None => Ok(UpdateOutcome::unmatched()),
        }
    }

    async fn find_by_credentials(&self, email: &str, pass: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email && u.pass == pass)
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn set_years(&self, changes: &[(String, String)]) -> AppResult<u64> {
        let mut users = self.users.write().await;
        let mut changed = 0;
        for (id, year) in changes {
            if let Some(user) = users.iter_mut().find(|u| &u.id == id) {
                user.year = Some(year.clone());
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: &str, email: &str) -> User {
        User {
            id: id.into(),
            role: Role::Student,
            name: id.to_uppercase(),
            dept: "CSE".into(),
            email: email.into(),
            pass: "pw".into(),
            year: Some("1".into()),
            enroll: None,
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_and_leaves_store_unchanged() {
        let store = MemoryUserStore::default();
        store.create(&student("s1", "s1@x.com")).await.expect("first");

        let err = store.create(&student("s2", "s1@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(ref e) if e == "s1@x.com"));
        assert_eq!(store.count().await.expect("count"), 1);
    }

    #[tokio::test]
    async fn update_missing_id_is_a_noop() {
        let store = MemoryUserStore::default();
        let patch = UserPatch {
            name: Some("Ghost".into()),
            ..Default::default()
        };
        let out = store.update("nobody", &patch).await.expect("update");
        assert!(!out.matched);
        assert_eq!(store.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn update_to_taken_email_is_rejected() {
        let store = MemoryUserStore::default();
        store.create(&student("s1", "s1@x.com")).await.expect("s1");
        store.create(&student("s2", "s2@x.com")).await.expect("s2");

        let patch = UserPatch {
            email: Some("s1@x.com".into()),
            ..Default::default()
        };
        let err = store.update("s2", &patch).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(_)));

        // unknown id with a taken email matches nothing
        let ghost = store.update("nobody", &patch).await.expect("ghost");
        assert!(!ghost.matched);

        // re-saving your own email is fine
        let own = UserPatch {
            email: Some("s2@x.com".into()),
            ..Default::default()
        };
        assert!(store.update("s2", &own).await.expect("own").matched);
    }

    #[tokio::test]
    async fn delete_by_email_reports_match() {
        let store = MemoryUserStore::default();
        store.create(&student("s1", "s1@x.com")).await.expect("s1");

        assert!(!store.delete_by_email("nope@x.com").await.expect("delete").matched);
        assert!(store.delete_by_email("s1@x.com").await.expect("delete").matched);
        assert_eq!(store.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn credentials_must_match_exactly() {
        let store = MemoryUserStore::default();
        store.create(&student("s1", "s1@x.com")).await.expect("s1");

        assert!(store
            .find_by_credentials("s1@x.com", "pw")
            .await
            .expect("lookup")
            .is_some());
        assert!(store
            .find_by_credentials("s1@x.com", "PW")
            .await
            .expect("lookup")
            .is_none());
        assert!(store
            .find_by_credentials("S1@x.com", "pw")
            .await
            .expect("lookup")
            .is_none());
    }
}
