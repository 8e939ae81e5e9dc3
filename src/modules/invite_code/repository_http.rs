use crate::{
    api::{client::ApiClient, error, success::Page},
    modules::invite_code::{
        model::{page_query, GenerateInviteCodesModel},
        repository::InviteCodeRepository,
        schema::{InviteCodeEntity, InviteCodeStats},
    },
};

#[derive(Clone)]
pub struct InviteCodeRepositoryHttp {
    api: ApiClient,
}

impl InviteCodeRepositoryHttp {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl InviteCodeRepository for InviteCodeRepositoryHttp {
    async fn generate(
        &self,
        req: &GenerateInviteCodesModel,
    ) -> Result<Vec<InviteCodeEntity>, error::SystemError> {
        Ok(self.api.post::<_, Vec<InviteCodeEntity>>("invite_codes", req).await?.into_data())
    }

    async fn find_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<InviteCodeEntity>, error::SystemError> {
        let (items, pagination) = self
            .api
            .get_query::<Vec<InviteCodeEntity>>("invite_codes", &page_query(page, page_size))
            .await?
            .into_parts();
        Ok(Page::new(items, pagination, page, page_size))
    }

    async fn stats(&self) -> Result<InviteCodeStats, error::SystemError> {
        Ok(self.api.get::<InviteCodeStats>("invite_codes/stats").await?.into_data())
    }

    async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.api.delete(&format!("invite_codes/{id}")).await
    }
}
