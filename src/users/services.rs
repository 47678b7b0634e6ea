use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult},
    outcome::UpdateOutcome,
    users::{
        repo::UserStore,
        repo_types::{User, UserPatch},
    },
};

/// Plain credential equality; no hashing.
pub async fn authenticate(store: &dyn UserStore, email: &str, pass: &str) -> AppResult<User> {
    match store.find_by_credentials(email, pass).await? {
        Some(user) => {
            info!(user_id = %user.id, role = user.role.as_str(), "user logged in");
            Ok(user)
        }
        None => {
            warn!(%email, "login rejected");
            Err(AppError::Unauthorized)
        }
    }
}

pub async fn register(store: &dyn UserStore, user: User) -> AppResult<User> {
    if let Err(e) = store.create(&user).await {
        if matches!(e, AppError::DuplicateEmail(_)) {
            warn!(email = %user.email, "email already registered");
        }
        return Err(e);
    }
    info!(user_id = %user.id, email = %user.email, role = user.role.as_str(), "user registered");
    Ok(user)
}

pub async fn list_users(store: &dyn UserStore) -> AppResult<Vec<User>> {
    store.list_all().await
}

pub async fn update_user(
    store: &dyn UserStore,
    id: &str,
    patch: &UserPatch,
) -> AppResult<UpdateOutcome> {
    let out = store.update(id, patch).await?;
    if !out.matched {
        warn!(user_id = %id, "update matched no user");
    }
    Ok(out)
}

pub async fn delete_user(store: &dyn UserStore, email: &str) -> AppResult<UpdateOutcome> {
    let out = store.delete_by_email(email).await?;
    if out.matched {
        info!(%email, "user deleted");
    }
    Ok(out)
}
