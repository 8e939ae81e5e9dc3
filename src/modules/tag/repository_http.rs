use reqwest::Method;

use crate::{
    api::{client::ApiClient, error, success::MessageBody},
    modules::tag::{
        model::{CreateTagModel, UpdateTag},
        repository::TagRepository,
        schema::TagEntity,
    },
};

#[derive(Clone)]
pub struct TagRepositoryHttp {
    api: ApiClient,
}

impl TagRepositoryHttp {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl TagRepository for TagRepositoryHttp {
    async fn find_all(&self) -> Result<Vec<TagEntity>, error::SystemError> {
        Ok(self.api.get::<Vec<TagEntity>>("tags").await?.into_data())
    }

    async fn create(&self, tag: &CreateTagModel) -> Result<TagEntity, error::SystemError> {
        Ok(self.api.post::<_, TagEntity>("tags", tag).await?.into_data())
    }

    async fn update(&self, id: u64, changes: &UpdateTag) -> Result<TagEntity, error::SystemError> {
        Ok(self.api.put::<_, TagEntity>(&format!("tags/{id}"), changes).await?.into_data())
    }

    async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.api.delete(&format!("tags/{id}")).await
    }

    async fn attach(&self, tag_id: u64, material_id: u64) -> Result<(), error::SystemError> {
        let body = self
            .api
            .post::<_, MessageBody>(
                &format!("tags/{tag_id}/materials/{material_id}"),
                &serde_json::json!({}),
            )
            .await?
            .into_data();
        log::debug!("attach tag {tag_id} -> material {material_id}: {:?}", body.message);
        Ok(())
    }

    async fn detach(&self, tag_id: u64, material_id: u64) -> Result<(), error::SystemError> {
        self.api
            .execute(Method::DELETE, &format!("tags/{tag_id}/materials/{material_id}"))
            .await
    }
}
