use crate::{
    api::error,
    modules::tag::{
        model::{CreateTagModel, UpdateTag},
        schema::TagEntity,
    },
};

#[async_trait::async_trait]
pub trait TagRepository {
    async fn find_all(&self) -> Result<Vec<TagEntity>, error::SystemError>;

    async fn create(&self, tag: &CreateTagModel) -> Result<TagEntity, error::SystemError>;

    async fn update(&self, id: u64, changes: &UpdateTag) -> Result<TagEntity, error::SystemError>;

    async fn delete(&self, id: u64) -> Result<(), error::SystemError>;

    async fn attach(&self, tag_id: u64, material_id: u64) -> Result<(), error::SystemError>;

    async fn detach(&self, tag_id: u64, material_id: u64) -> Result<(), error::SystemError>;
}
