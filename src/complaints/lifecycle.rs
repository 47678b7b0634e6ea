//! Complaint mutations: status, assignment, history and chat.
//!
//! There is no transition graph. Any caller may set any `status` string, assign or
//! unassign staff, and add to `history` or `chat`; ordering rules belong to the client.

use tracing::{info, warn};

use crate::{
    complaints::{
        repo::ComplaintStore,
        repo_types::{ChatMessage, Complaint, ComplaintPatch, HistoryEntry},
    },
    error::AppResult,
    outcome::UpdateOutcome,
};

impl Complaint {
    /// Replace every field present in `patch`. `id` is not patchable.
    pub fn apply(&mut self, patch: &ComplaintPatch) {
        if let Some(v) = &patch.student_id {
            self.student_id.clone_from(v);
        }
        if let Some(v) = &patch.student_name {
            self.student_name.clone_from(v);
        }
        if let Some(v) = &patch.category {
            self.category.clone_from(v);
        }
        if let Some(v) = &patch.title {
            self.title.clone_from(v);
        }
        if let Some(v) = &patch.description {
            self.description.clone_from(v);
        }
        if patch.attachment.is_some() {
            self.attachment.clone_from(&patch.attachment);
        }
        if let Some(v) = patch.is_anon {
            self.is_anon = v;
        }
        if let Some(v) = &patch.status {
            self.status.clone_from(v);
        }
        if let Some(v) = &patch.assigned_to {
            self.assigned_to.clone_from(v);
        }
        if let Some(v) = &patch.history {
            self.history.clone_from(v);
        }
        if let Some(v) = &patch.chat {
            self.chat.clone_from(v);
        }
        if patch.timestamp.is_some() {
            self.timestamp.clone_from(&patch.timestamp);
        }
    }
}

pub async fn update_complaint(
    store: &dyn ComplaintStore,
    id: &str,
    patch: &ComplaintPatch,
) -> AppResult<UpdateOutcome> {
    let out = store.update(id, patch).await?;
    if out.matched {
        info!(
            complaint_id = %id,
            status = ?patch.status,
            assigned_to = ?patch.assigned_to,
            "complaint updated"
        );
    } else {
        warn!(complaint_id = %id, "update matched no complaint");
    }
    Ok(out)
}

pub async fn append_history(
    store: &dyn ComplaintStore,
    id: &str,
    entry: &HistoryEntry,
) -> AppResult<UpdateOutcome> {
    let out = store.append_history(id, entry).await?;
    if !out.matched {
        warn!(complaint_id = %id, "history append matched no complaint");
    }
    Ok(out)
}

pub async fn append_chat(
    store: &dyn ComplaintStore,
    id: &str,
    message: &ChatMessage,
) -> AppResult<UpdateOutcome> {
    let out = store.append_chat(id, message).await?;
    if !out.matched {
        warn!(complaint_id = %id, "chat append matched no complaint");
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complaints::repo::MemoryComplaintStore;

    async fn store_with(doc: serde_json::Value) -> MemoryComplaintStore {
        let store = MemoryComplaintStore::default();
        let c: Complaint = serde_json::from_value(doc).expect("complaint");
        store.create(&c).await.expect("create");
        store
    }

    async fn fetch(store: &MemoryComplaintStore, id: &str) -> Complaint {
        store.find(id).await.expect("find").expect("present")
    }

    #[tokio::test]
    async fn status_and_assignment_leave_thread_untouched() {
        let store = store_with(serde_json::json!({
            "id": "1",
            "status": "Pending",
            "history": [{ "action": "filed", "by": "s1" }],
            "chat": [{ "sender": "s1", "body": "please help" }]
        }))
        .await;

        let patch = ComplaintPatch {
            status: Some("Resolved".into()),
            assigned_to: Some("T01".into()),
            ..Default::default()
        };
        assert!(update_complaint(&store, "1", &patch).await.expect("update").matched);

        let c = fetch(&store, "1").await;
        assert_eq!(c.status, "Resolved");
        assert_eq!(c.assigned_to, "T01");
        assert_eq!(c.history.len(), 1);
        assert_eq!(c.chat.len(), 1);
    }

    #[tokio::test]
    async fn any_status_string_is_accepted() {
        let store = store_with(serde_json::json!({ "id": "1", "status": "Resolved" })).await;
        let patch = ComplaintPatch {
            status: Some("Escalated to dean".into()),
            ..Default::default()
        };
        update_complaint(&store, "1", &patch).await.expect("update");
        assert_eq!(fetch(&store, "1").await.status, "Escalated to dean");
    }

    #[tokio::test]
    async fn status_does_not_require_assignment() {
        let store = store_with(serde_json::json!({ "id": "1", "assignedTo": "T02" })).await;
        let patch = ComplaintPatch {
            assigned_to: Some(String::new()),
            status: Some("In Progress".into()),
            ..Default::default()
        };
        update_complaint(&store, "1", &patch).await.expect("update");
        let c = fetch(&store, "1").await;
        assert_eq!(c.assigned_to, "");
        assert_eq!(c.status, "In Progress");
    }

    #[tokio::test]
    async fn patch_with_history_replaces_the_sequence() {
        let store = store_with(serde_json::json!({
            "id": "1",
            "history": [{ "action": "filed" }, { "action": "assigned" }]
        }))
        .await;
        let patch: ComplaintPatch = serde_json::from_value(serde_json::json!({
            "history": [{ "action": "filed" }, { "action": "assigned" }, { "action": "resolved", "by": "T01" }]
        }))
        .expect("patch");
        update_complaint(&store, "1", &patch).await.expect("update");
        let actions: Vec<String> = fetch(&store, "1")
            .await
            .history
            .into_iter()
            .filter_map(|h| h.action)
            .collect();
        assert_eq!(actions, vec!["filed", "assigned", "resolved"]);
    }

    #[tokio::test]
    async fn appends_keep_order() {
        let store = store_with(serde_json::json!({ "id": "1" })).await;
        for (sender, body) in [("s1", "first"), ("T01", "second")] {
            let msg = ChatMessage {
                sender: sender.into(),
                body: body.into(),
                ..Default::default()
            };
            append_chat(&store, "1", &msg).await.expect("chat");
        }
        let entry = HistoryEntry {
            action: Some("replied".into()),
            by: Some("T01".into()),
            ..Default::default()
        };
        append_history(&store, "1", &entry).await.expect("history");

        let c = fetch(&store, "1").await;
        let bodies: Vec<&str> = c.chat.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(c.history, vec![entry]);
    }

    #[tokio::test]
    async fn id_in_patch_body_is_ignored() {
        let store = store_with(serde_json::json!({ "id": "1", "title": "Noise" })).await;
        let patch: ComplaintPatch =
            serde_json::from_value(serde_json::json!({ "id": "99", "title": "Loud noise" }))
                .expect("patch");
        update_complaint(&store, "1", &patch).await.expect("update");
        let c = fetch(&store, "1").await;
        assert_eq!(c.id, "1");
        assert_eq!(c.title, "Loud noise");
    }

    #[test]
    fn apply_leaves_unset_fields_alone() {
        let mut c: Complaint = serde_json::from_value(serde_json::json!({
            "id": "1",
            "title": "Noise",
            "attachment": "data:image/png;base64,AAAA",
            "timestamp": "3/1/2024, 10:00:00 AM"
        }))
        .expect("complaint");
        c.apply(&ComplaintPatch {
            status: Some("Resolved".into()),
            ..Default::default()
        });
        assert_eq!(c.title, "Noise");
        assert_eq!(c.attachment.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(c.timestamp, Some(serde_json::json!("3/1/2024, 10:00:00 AM")));
        assert_eq!(c.status, "Resolved");
    }
}
