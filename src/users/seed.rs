use tracing::{debug, info};

use crate::{
    error::AppResult,
    users::{
        repo::UserStore,
        repo_types::{Role, User},
    },
};

/// Demo accounts inserted into an empty `users` collection.
pub fn default_accounts() -> Vec<User> {
    vec![
        User {
            id: "T01".into(),
            role: Role::Teacher,
            name: "Dr. Anita Rao".into(),
            dept: "CSE".into(),
            email: "teacher1@college.edu".into(),
            pass: "teacher123".into(),
            year: None,
            enroll: None,
            is_admin: false,
        },
        User {
            id: "T02".into(),
            role: Role::Teacher,
            name: "Prof. Vikram Singh".into(),
            dept: "CSE".into(),
            email: "teacher2@college.edu".into(),
            pass: "teacher123".into(),
            year: None,
            enroll: None,
            is_admin: false,
        },
        User {
            id: "HOD01".into(),
            role: Role::Hod,
            name: "Dr. Meera Iyer".into(),
            dept: "CSE".into(),
            email: "hod@college.edu".into(),
            pass: "admin123".into(),
            year: None,
            enroll: None,
            is_admin: true,
        },
    ]
}

/// Insert the default accounts unless any user already exists.
///
/// Run once at startup after the store is reachable. Returns how many accounts were inserted.
pub async fn seed_default_users(store: &dyn UserStore) -> AppResult<usize> {
    if store.count().await? > 0 {
        debug!("users present; skipping seed");
        return Ok(0);
    }

    let accounts = default_accounts();
    for user in &accounts {
        store.create(user).await?;
    }
    info!(count = accounts.len(), "seeded default accounts");
    Ok(accounts.len())
}
