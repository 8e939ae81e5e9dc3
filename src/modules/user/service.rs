use log::info;
use std::sync::Arc;

use crate::api::{error, success::Page};
use crate::middlewares::authorization;
use crate::modules::auth::session::SessionStore;
use crate::modules::user::{
    model::{UpdateRoleModel, UserQuery},
    repository::UserRepository,
    schema::{UserEntity, UserRole},
};

/// Administration of accounts. Every call is gated on the admin role.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    session: Arc<SessionStore>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        session: Arc<SessionStore>,
    ) -> Self {
        UserService { repo, session }
    }

    pub async fn list(
        &self,
        query: &UserQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<UserEntity>, error::SystemError> {
        authorization(&self.session, &[UserRole::Admin])?;
        let page = page.max(1);
        self.repo.find_page(query, page, page_size).await?.ensure_in_range(page)
    }

    pub async fn change_role(
        &self,
        id: u64,
        role: UserRole,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let admin = authorization(&self.session, &[UserRole::Admin])?;
        let updated = self.repo.update_role(id, &UpdateRoleModel { role }).await?;
        info!("{} set role of user {id} to {role}", admin.username);
        if id == admin.id {
            if let Some(user) = &updated {
                self.session.refresh_user(user.clone())?;
            }
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        let admin = authorization(&self.session, &[UserRole::Admin])?;
        self.repo.delete(id).await?;
        info!("{} deleted user {id}", admin.username);
        Ok(())
    }
}
