use serde::Serialize;
use validator::Validate;

use crate::constants::{DEFAULT_MEMBER_ROLE, DEFAULT_TAG_COLOR, DEFAULT_WORKFLOW_TYPE};
use crate::modules::tag::model::validate_color;
use crate::modules::workflow::schema::WorkflowEntity;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowQuery {
    pub keyword: Option<String>,
}

impl WorkflowQuery {
    pub fn to_query(&self, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", page.max(1).to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            query.push(("keyword", keyword.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct CreateWorkflowModel {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Workflow name must be 1 to 100 characters long"
    ))]
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    #[validate(length(
        min = 1,
        max = 20,
        message = "Workflow type must be 1 to 20 characters long"
    ))]
    pub kind: String,
    #[validate(custom(function = "validate_color"))]
    pub color: String,
    pub is_active: bool,
    pub config: String,
    pub members: Vec<u64>,
}

impl CreateWorkflowModel {
    pub fn new(name: &str) -> Self {
        CreateWorkflowModel {
            name: name.trim().to_string(),
            description: String::new(),
            kind: DEFAULT_WORKFLOW_TYPE.to_string(),
            color: DEFAULT_TAG_COLOR.to_string(),
            is_active: true,
            config: String::new(),
            members: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowDraft {
    pub name: String,
    pub description: String,
    pub kind: String,
    pub color: String,
    pub is_active: bool,
    pub config: String,
}

impl From<&WorkflowEntity> for WorkflowDraft {
    fn from(wf: &WorkflowEntity) -> Self {
        WorkflowDraft {
            name: wf.name.clone(),
            description: wf.description.clone(),
            kind: wf.kind.clone(),
            color: wf.color.clone(),
            is_active: wf.is_active,
            config: wf.config.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct UpdateWorkflow {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Workflow name must be 1 to 100 characters long"
    ))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 1,
        max = 20,
        message = "Workflow type must be 1 to 20 characters long"
    ))]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_color"))]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
}

fn changed(original: &str, edited: &str) -> Option<String> {
    (original != edited).then(|| edited.to_string())
}

impl UpdateWorkflow {
    pub fn diff(original: &WorkflowDraft, edited: &WorkflowDraft) -> Self {
        UpdateWorkflow {
            name: changed(&original.name, edited.name.trim()),
            description: changed(&original.description, &edited.description),
            kind: changed(&original.kind, edited.kind.trim()),
            color: (!original.color.eq_ignore_ascii_case(edited.color.trim()))
                .then(|| edited.color.trim().to_string()),
            is_active: (original.is_active != edited.is_active).then_some(edited.is_active),
            config: changed(&original.config, &edited.config),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &UpdateWorkflow::default()
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
pub struct AddMemberModel {
    #[validate(range(min = 1, message = "User id must be positive"))]
    pub user_id: u64,
    #[validate(length(min = 1, max = 20, message = "Member role must be 1 to 20 characters long"))]
    pub role: String,
}

impl AddMemberModel {
    pub fn new(user_id: u64, role: Option<&str>) -> Self {
        AddMemberModel {
            user_id,
            role: role
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_MEMBER_ROLE)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> WorkflowDraft {
        WorkflowDraft {
            name: "Open day".into(),
            description: "campus photos".into(),
            kind: "custom".into(),
            color: "#409EFF".into(),
            is_active: true,
            config: String::new(),
        }
    }

    #[test]
    fn test_create_serializes_type() {
        let mut model = CreateWorkflowModel::new(" Open day ");
        model.members = vec![3, 5];
        assert!(model.validate().is_ok());
        let value = serde_json::to_value(&model).unwrap();
        assert_eq!(value["type"], "custom");
        assert_eq!(value["name"], "Open day");
        assert_eq!(value["members"], json!([3, 5]));
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_diff_only_changed_fields() {
        let original = draft();
        let edited = WorkflowDraft { is_active: false, kind: "review".into(), ..original.clone() };
        assert_eq!(
            serde_json::to_value(UpdateWorkflow::diff(&original, &edited)).unwrap(),
            json!({"type": "review", "is_active": false})
        );
        assert!(UpdateWorkflow::diff(&original, &original).is_empty());
    }

    #[test]
    fn test_clearing_description_is_a_change() {
        let original = draft();
        let edited = WorkflowDraft { description: String::new(), ..original.clone() };
        assert_eq!(
            serde_json::to_value(UpdateWorkflow::diff(&original, &edited)).unwrap(),
            json!({"description": ""})
        );
    }

    #[test]
    fn test_member_defaults() {
        let member = AddMemberModel::new(7, None);
        assert_eq!(member.role, "member");
        assert!(member.validate().is_ok());
        assert!(AddMemberModel::new(0, Some("reviewer")).validate().is_err());
    }

    #[test]
    fn test_query_omits_blank_keyword() {
        let query = WorkflowQuery { keyword: Some(" ".into()) };
        assert_eq!(query.to_query(1, 10).len(), 2);
    }
}
