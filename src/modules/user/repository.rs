use crate::{
    api::{error, success::Page},
    modules::user::{
        model::{UpdateRoleModel, UserQuery},
        schema::UserEntity,
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_page(
        &self,
        query: &UserQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<UserEntity>, error::SystemError>;

    async fn update_role(
        &self,
        id: u64,
        req: &UpdateRoleModel,
    ) -> Result<Option<UserEntity>, error::SystemError>;

    async fn delete(&self, id: u64) -> Result<(), error::SystemError>;
}
