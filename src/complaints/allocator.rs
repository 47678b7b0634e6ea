use tracing::debug;

use crate::{complaints::repo::ComplaintStore, error::AppResult};

/// Next complaint id: current complaint count + 1, as a decimal string.
///
/// Count-then-insert is not atomic. Two concurrent filings can compute the same id,
/// and after a deletion the computed id can equal one still in use. Both records are
/// kept; lookups and mutations by id act on the earliest one.
pub async fn next_id(store: &dyn ComplaintStore) -> AppResult<String> {
    let count = store.count().await?;
    let id = (count + 1).to_string();
    debug!(count, %id, "allocated complaint id");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaints::{repo::MemoryComplaintStore, repo_types::Complaint};

    #[tokio::test]
    async fn empty_store_starts_at_one() {
        let store = MemoryComplaintStore::default();
        assert_eq!(next_id(&store).await.expect("id"), "1");
    }

    #[tokio::test]
    async fn follows_the_count() {
        let store = MemoryComplaintStore::default();
        for id in ["1", "2"] {
            let c: Complaint =
                serde_json::from_value(serde_json::json!({ "id": id })).expect("complaint");
            store.create(&c).await.expect("create");
        }
        assert_eq!(next_id(&store).await.expect("id"), "3");

        store.delete("1").await.expect("delete");
        // count-based: collides with the surviving "2"
        assert_eq!(next_id(&store).await.expect("id"), "2");
    }
}
