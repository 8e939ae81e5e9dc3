use serde::{Deserialize, Serialize};

use crate::modules::tag::schema::{MaterialTagEntity, TagEntity};
use crate::modules::user::schema::UserEntity;
use crate::utils::{format_file_size, normalize_file, normalize_thumbnail, null_as_default};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
    Audio,
    Document,
    #[default]
    #[serde(other)]
    Other,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Document => "document",
            FileType::Other => "other",
        }
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(FileType::Image),
            "video" => Ok(FileType::Video),
            "audio" => Ok(FileType::Audio),
            "document" => Ok(FileType::Document),
            other => Err(format!("unknown file type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntity {
    pub id: u64,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub original_filename: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub file_type: FileType,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub uploaded_by: u64,
    #[serde(default)]
    pub upload_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub workflow_id: Option<u64>,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
    #[serde(default)]
    pub uploader: Option<UserEntity>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub material_tags: Vec<MaterialTagEntity>,
}

impl MaterialEntity {
    /// Rewrites relative file and thumbnail paths against the API origin.
    pub fn normalize_paths(mut self, origin: &str) -> Self {
        self.file_path = normalize_file(origin, &self.file_path);
        self.thumbnail_path = self
            .thumbnail_path
            .as_deref()
            .map(|p| normalize_thumbnail(origin, p))
            .filter(|p| !p.is_empty());
        self
    }

    pub fn tag_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self
            .material_tags
            .iter()
            .map(MaterialTagEntity::effective_tag_id)
            .filter(|id| *id != 0)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn tags(&self) -> impl Iterator<Item = &TagEntity> {
        self.material_tags.iter().filter_map(|mt| mt.tag.as_ref())
    }

    pub fn file_size_formatted(&self) -> String {
        format_file_size(self.file_size)
    }
}
