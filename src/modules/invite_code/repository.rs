use crate::{
    api::{error, success::Page},
    modules::invite_code::{
        model::GenerateInviteCodesModel,
        schema::{InviteCodeEntity, InviteCodeStats},
    },
};

#[async_trait::async_trait]
pub trait InviteCodeRepository {
    async fn generate(
        &self,
        req: &GenerateInviteCodesModel,
    ) -> Result<Vec<InviteCodeEntity>, error::SystemError>;

    async fn find_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<InviteCodeEntity>, error::SystemError>;

    async fn stats(&self) -> Result<InviteCodeStats, error::SystemError>;

    async fn delete(&self, id: u64) -> Result<(), error::SystemError>;
}
