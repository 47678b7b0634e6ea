use serde::Deserialize;
use serde_json::Value;

use crate::complaints::repo_types::{ChatMessage, Complaint, HistoryEntry};

/// Request body for filing a complaint. Any `id` sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComplaint {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attachment: Option<String>,
    #[serde(default)]
    pub is_anon: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl NewComplaint {
    pub fn into_complaint(self, id: String) -> Complaint {
        Complaint {
            id,
            student_id: self.student_id,
            student_name: self.student_name,
            category: self.category,
            title: self.title,
            description: self.description,
            attachment: self.attachment,
            is_anon: self.is_anon,
            status: self.status,
            assigned_to: self.assigned_to,
            history: self.history,
            chat: self.chat,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Blank `studentName` on anonymous complaints.
    #[serde(default)]
    pub anonymize: bool,
}
