use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MEMBER_ROLE, DEFAULT_TAG_COLOR, DEFAULT_WORKFLOW_TYPE};
use crate::modules::user::schema::UserEntity;
use crate::utils::null_as_default;

fn default_kind() -> String {
    DEFAULT_WORKFLOW_TYPE.to_string()
}

fn default_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

fn default_role() -> String {
    DEFAULT_MEMBER_ROLE.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMember {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub workflow_id: u64,
    pub user_id: u64,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub user: Option<UserEntity>,
}

impl WorkflowMember {
    pub fn display_name(&self) -> String {
        match &self.user {
            Some(user) if !user.username.is_empty() => user.username.clone(),
            _ => format!("user #{}", self.user_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEntity {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub config: String,
    #[serde(default)]
    pub material_count: Option<u64>,
    #[serde(default)]
    pub created_by: u64,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub creator: Option<UserEntity>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<WorkflowMember>,
}

impl WorkflowEntity {
    pub fn has_member(&self, user_id: u64) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparse_workflow_gets_defaults() {
        let wf: WorkflowEntity = serde_json::from_value(json!({
            "id": 4,
            "name": "Graduation shoot",
            "description": null,
            "members": [{"user_id": 9, "user": {"id": 9, "username": "lens"}}, {"user_id": 11}],
        }))
        .unwrap();
        assert_eq!(wf.kind, "custom");
        assert_eq!(wf.color, "#409EFF");
        assert_eq!(wf.description, "");
        assert!(wf.is_active);
        assert!(wf.has_member(11));
        assert!(!wf.has_member(12));
        assert_eq!(wf.members[0].role, "member");
        assert_eq!(wf.members[0].display_name(), "lens");
        assert_eq!(wf.members[1].display_name(), "user #11");
    }

    #[test]
    fn test_kind_uses_type_on_the_wire() {
        let wf: WorkflowEntity =
            serde_json::from_value(json!({"id": 1, "type": "review", "members": null})).unwrap();
        assert_eq!(wf.kind, "review");
        assert!(wf.members.is_empty());
        assert_eq!(serde_json::to_value(&wf).unwrap()["type"], "review");
    }
}
