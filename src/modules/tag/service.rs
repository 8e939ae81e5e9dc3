use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::modules::tag::{
    model::{CreateTagModel, TagDraft, UpdateTag},
    repository::TagRepository,
    schema::TagEntity,
};
use crate::utils::Validated;

#[derive(Clone)]
pub struct TagService {
    repo: Arc<dyn TagRepository + Send + Sync>,
}

impl TagService {
    pub fn with_dependencies(repo: Arc<dyn TagRepository + Send + Sync>) -> Self {
        TagService { repo }
    }

    pub async fn list(&self) -> Result<Vec<TagEntity>, error::SystemError> {
        let mut tags = self.repo.find_all().await?;
        tags.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(tags)
    }

    pub async fn create(&self, model: CreateTagModel) -> Result<TagEntity, error::SystemError> {
        let model = Validated::new(model)?;
        let tag = self.repo.create(&model).await?;
        info!("created tag {} ({})", tag.name, tag.id);
        Ok(tag)
    }

    pub async fn update(
        &self,
        original: &TagEntity,
        edited: TagDraft,
    ) -> Result<TagEntity, error::SystemError> {
        let changes = UpdateTag::diff(&TagDraft::from(original), &edited);
        if changes.is_empty() {
            info!("tag {} unchanged, nothing to submit", original.id);
            return Ok(original.clone());
        }
        let changes = Validated::new(changes)?;
        self.repo.update(original.id, &changes).await
    }

    /// Looks a tag up by id in the full list; the backend has no single-tag read.
    pub async fn find(&self, id: u64) -> Result<TagEntity, error::SystemError> {
        self.repo
            .find_all()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| {
                let message = format!("Tag {id} not found");
                error::SystemError::http(reqwest::StatusCode::NOT_FOUND, message)
            })
    }

    pub async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.repo.delete(id).await?;
        info!("deleted tag {id}");
        Ok(())
    }

    pub async fn attach(&self, tag_id: u64, material_id: u64) -> Result<(), error::SystemError> {
        self.repo.attach(tag_id, material_id).await
    }

    pub async fn detach(&self, tag_id: u64, material_id: u64) -> Result<(), error::SystemError> {
        self.repo.detach(tag_id, material_id).await
    }
}
