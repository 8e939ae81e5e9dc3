use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_TAG_COLOR;
use crate::modules::user::schema::UserEntity;

fn default_color() -> String {
    DEFAULT_TAG_COLOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagEntity {
    pub id: u64,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub created_by: u64,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub creator: Option<UserEntity>,
    #[serde(default)]
    pub material_count: Option<u64>,
}

/// Association between a material and a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialTagEntity {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub material_id: u64,
    #[serde(default)]
    pub tag_id: u64,
    #[serde(default)]
    pub created_by: u64,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub tag: Option<TagEntity>,
}

impl MaterialTagEntity {
    /// Tag id, falling back to the embedded tag when the link omits it.
    pub fn effective_tag_id(&self) -> u64 {
        match (&self.tag, self.tag_id) {
            (Some(tag), 0) => tag.id,
            _ => self.tag_id,
        }
    }
}
