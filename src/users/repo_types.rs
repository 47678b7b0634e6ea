use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Hod,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Hod => "hod",
        }
    }
}

/// User document as stored in the `users` collection.
///
/// `pass` is kept and returned in plain text; credential checks are plain equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dept: String,
    pub email: String,
    #[serde(default)]
    pub pass: String,
    /// Students only: "1" | "2" | "3" | "4" | "Graduated".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enroll: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Fields to replace on an existing user. Absent fields stay untouched; `id` is never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enroll: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl User {
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(v) = patch.role {
            self.role = v;
        }
        if let Some(v) = &patch.name {
            self.name.clone_from(v);
        }
        if let Some(v) = &patch.dept {
            self.dept.clone_from(v);
        }
        if let Some(v) = &patch.email {
            self.email.clone_from(v);
        }
        if let Some(v) = &patch.pass {
            self.pass.clone_from(v);
        }
        if patch.year.is_some() {
            self.year.clone_from(&patch.year);
        }
        if patch.enroll.is_some() {
            self.enroll.clone_from(&patch.enroll);
        }
        if let Some(v) = patch.is_admin {
            self.is_admin = v;
        }
    }
}
