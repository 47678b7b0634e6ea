use tracing::info;

use crate::{
    error::AppResult,
    users::{repo::UserStore, repo_types::Role},
};

/// Year that follows `current`, or `None` when the value does not advance.
pub fn next_year(current: &str) -> Option<&'static str> {
    match current {
        "1" => Some("2"),
        "2" => Some("3"),
        "3" => Some("4"),
        "4" => Some("Graduated"),
        _ => None,
    }
}

/// Advance every student one academic year; returns how many were updated.
///
/// No guard against repeated runs: calling it twice advances students two steps.
pub async fn promote_all_students(store: &dyn UserStore) -> AppResult<u64> {
    let students = store.list_by_role(Role::Student).await?;

    let changes: Vec<(String, String)> = students
        .into_iter()
        .filter_map(|s| {
            let next = next_year(s.year.as_deref().unwrap_or_default())?;
            Some((s.id, next.to_string()))
        })
        .collect();

    let updated = store.set_years(&changes).await?;
    info!(candidates = changes.len(), updated, "promotion finished");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{repo::MemoryUserStore, repo_types::User};

    fn user(id: &str, role: Role, year: Option<&str>) -> User {
        User {
            id: id.into(),
            role,
            name: id.into(),
            dept: "CSE".into(),
            email: format!("{id}@x.com"),
            pass: "pw".into(),
            year: year.map(str::to_string),
            enroll: None,
            is_admin: false,
        }
    }

    async fn year_of(store: &MemoryUserStore, id: &str) -> Option<String> {
        store
            .list_all()
            .await
            .expect("list")
            .into_iter()
            .find(|u| u.id == id)
            .and_then(|u| u.year)
    }

    #[test]
    fn progression_table() {
        assert_eq!(next_year("1"), Some("2"));
        assert_eq!(next_year("2"), Some("3"));
        assert_eq!(next_year("3"), Some("4"));
        assert_eq!(next_year("4"), Some("Graduated"));
        assert_eq!(next_year("Graduated"), None);
        assert_eq!(next_year(""), None);
        assert_eq!(next_year("5"), None);
    }

    #[tokio::test]
    async fn promotes_students_and_counts_only_changes() {
        let store = MemoryUserStore::default();
        for u in [
            user("a", Role::Student, Some("3")),
            user("b", Role::Student, Some("4")),
            user("c", Role::Student, Some("Graduated")),
            user("d", Role::Student, None),
            user("t", Role::Teacher, Some("1")),
        ] {
            store.create(&u).await.expect("create");
        }

        assert_eq!(promote_all_students(&store).await.expect("promote"), 2);
        assert_eq!(year_of(&store, "a").await.as_deref(), Some("4"));
        assert_eq!(year_of(&store, "b").await.as_deref(), Some("Graduated"));
        assert_eq!(year_of(&store, "c").await.as_deref(), Some("Graduated"));
        assert_eq!(year_of(&store, "d").await, None);
        // staff are never touched, whatever their year field says
        assert_eq!(year_of(&store, "t").await.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn running_twice_advances_two_steps() {
        let store = MemoryUserStore::default();
        store
            .create(&user("s", Role::Student, Some("1")))
            .await
            .expect("create");

        promote_all_students(&store).await.expect("first");
        promote_all_students(&store).await.expect("second");
        assert_eq!(year_of(&store, "s").await.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn empty_store_updates_nothing() {
        let store = MemoryUserStore::default();
        assert_eq!(promote_all_students(&store).await.expect("promote"), 0);
    }
}
