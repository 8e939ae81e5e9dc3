use tokio::sync::mpsc::UnboundedSender;

use crate::{
    api::{error, success::Page},
    modules::material::{
        model::{MaterialQuery, UpdateMaterial, UploadFile, UploadProgress},
        schema::MaterialEntity,
    },
};

#[async_trait::async_trait]
pub trait MaterialRepository {
    async fn find_page(
        &self,
        query: &MaterialQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<MaterialEntity>, error::SystemError>;

    async fn find_by_id(&self, id: u64) -> Result<MaterialEntity, error::SystemError>;

    async fn upload(
        &self,
        file: UploadFile,
        progress: Option<UnboundedSender<UploadProgress>>,
    ) -> Result<MaterialEntity, error::SystemError>;

    async fn update(
        &self,
        id: u64,
        changes: &UpdateMaterial,
    ) -> Result<MaterialEntity, error::SystemError>;

    async fn delete(&self, id: u64) -> Result<(), error::SystemError>;
}
