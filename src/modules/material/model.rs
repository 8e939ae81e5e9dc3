use serde::Serialize;
use validator::Validate;

use crate::api::error;
use crate::modules::material::schema::{FileType, MaterialEntity};
use crate::utils::percentage;

/// Filters for the material listing. All set filters apply together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialQuery {
    pub keyword: Option<String>,
    pub file_type: Option<FileType>,
    pub workflow_id: Option<u64>,
    pub tag_ids: Vec<u64>,
}

impl MaterialQuery {
    pub fn to_query(&self, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", page.max(1).to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            query.push(("keyword", keyword.to_string()));
        }
        if let Some(file_type) = self.file_type {
            query.push(("file_type", file_type.as_str().to_string()));
        }
        if let Some(workflow_id) = self.workflow_id {
            query.push(("workflow_id", workflow_id.to_string()));
        }
        if !self.tag_ids.is_empty() {
            let tags = self.tag_ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
            query.push(("tags", tags));
        }
        query
    }
}

/// Editable fields of a material as the user sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDraft {
    pub original_filename: String,
    pub is_starred: bool,
    pub is_public: bool,
    pub workflow_id: Option<u64>,
    pub tag_ids: Vec<u64>,
}

impl From<&MaterialEntity> for MaterialDraft {
    fn from(material: &MaterialEntity) -> Self {
        MaterialDraft {
            original_filename: material.original_filename.clone(),
            is_starred: material.is_starred,
            is_public: material.is_public,
            workflow_id: material.workflow_id,
            tag_ids: material.tag_ids(),
        }
    }
}

/// Partial update. `None` leaves a field alone; `workflow_id: Some(None)`
/// detaches the material from its workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct UpdateMaterial {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255, message = "File name must be 1 to 255 characters long"))]
    pub original_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_starred: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_id: Option<Option<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<u64>>,
}

fn sorted(ids: &[u64]) -> Vec<u64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl UpdateMaterial {
    pub fn diff(original: &MaterialDraft, edited: &MaterialDraft) -> Self {
        let edited_tags = sorted(&edited.tag_ids);
        UpdateMaterial {
            original_filename: (original.original_filename != edited.original_filename)
                .then(|| edited.original_filename.trim().to_string()),
            is_starred: (original.is_starred != edited.is_starred).then_some(edited.is_starred),
            is_public: (original.is_public != edited.is_public).then_some(edited.is_public),
            workflow_id: (original.workflow_id != edited.workflow_id).then_some(edited.workflow_id),
            tag_ids: (sorted(&original.tag_ids) != edited_tags).then_some(edited_tags),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &UpdateMaterial::default()
    }

    pub fn starred(value: bool) -> Self {
        UpdateMaterial { is_starred: Some(value), ..Default::default() }
    }

    pub fn public(value: bool) -> Self {
        UpdateMaterial { is_public: Some(value), ..Default::default() }
    }
}

/// File content handed to the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub workflow_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn percentage(&self) -> u8 {
        percentage(self.sent, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchAction {
    Star,
    Unstar,
    Publish,
    Unpublish,
    Delete,
}

impl BatchAction {
    /// The update this action submits, or `None` for deletion.
    pub fn update(&self) -> Option<UpdateMaterial> {
        match self {
            BatchAction::Star => Some(UpdateMaterial::starred(true)),
            BatchAction::Unstar => Some(UpdateMaterial::starred(false)),
            BatchAction::Publish => Some(UpdateMaterial::public(true)),
            BatchAction::Unpublish => Some(UpdateMaterial::public(false)),
            BatchAction::Delete => None,
        }
    }
}

/// Per-item results of a batch. Failures do not undo successes.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub succeeded: Vec<u64>,
    pub failed: Vec<(u64, error::SystemError)>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
