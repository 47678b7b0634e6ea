use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One audit line in a complaint's history. Keys other than the named ones are kept
/// as sent, so entries written by older clients read back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Client-formatted; stored verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One message in the complaint's conversation thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Complaint document as stored in the `complaints` collection.
///
/// `status` is an open label and `assigned_to` a soft reference to a staff id;
/// neither constrains the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
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
    /// Embedded file payload, usually a data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
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
    /// Filing time in whatever form the client sent (epoch millis, locale string, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

impl Complaint {
    /// Staff-facing copy: the filer's name is withheld on anonymous complaints.
    pub fn anonymized(mut self) -> Self {
        if self.is_anon {
            self.student_name.clear();
        }
        self
    }
}

/// Fields to replace on an existing complaint. `history` and `chat`, when present,
/// replace the whole sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_anon: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<Vec<ChatMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_history_and_timestamps_read_back_unchanged() {
        let doc = json!({
            "id": "1",
            "title": "Fan broken",
            "history": [
                { "status": "Resolved", "remark": "fixed fan", "date": "2024-03-02" },
                { "action": "assigned", "by": "HOD01", "time": 1709287200000u64 }
            ],
            "chat": [{ "sender": "s1", "body": "thanks", "time": "3/2/2024, 9:15:00 AM", "read": true }],
            "timestamp": 1709287200000u64
        });
        let c: Complaint = serde_json::from_value(doc.clone()).expect("complaint");
        assert_eq!(c.history[0].extra["remark"], "fixed fan");
        assert_eq!(c.history[0].action, None);
        assert_eq!(c.history[1].action.as_deref(), Some("assigned"));
        assert_eq!(c.timestamp, Some(json!(1709287200000u64)));

        let back = serde_json::to_value(&c).expect("serialize");
        assert_eq!(back["history"], doc["history"]);
        assert_eq!(back["chat"], doc["chat"]);
        assert_eq!(back["timestamp"], doc["timestamp"]);
    }

    #[test]
    fn locale_formatted_timestamp_is_accepted() {
        let c: Complaint = serde_json::from_value(json!({
            "id": "2",
            "timestamp": "3/1/2024, 10:00:00 AM"
        }))
        .expect("complaint");
        assert_eq!(c.timestamp, Some(json!("3/1/2024, 10:00:00 AM")));
    }

    #[test]
    fn anonymized_clears_only_the_name() {
        let c: Complaint = serde_json::from_value(json!({
            "id": "3",
            "studentId": "s1",
            "studentName": "Asha",
            "isAnon": true
        }))
        .expect("complaint");
        let staff = c.anonymized();
        assert_eq!(staff.student_name, "");
        assert_eq!(staff.student_id, "s1");
    }
}
