use log::{info, warn};
use reqwest::StatusCode;
use std::sync::Arc;

use crate::api::{error, success::Page};
use crate::middlewares::authorization;
use crate::modules::auth::session::SessionStore;
use crate::modules::invite_code::{
    model::GenerateInviteCodesModel,
    repository::InviteCodeRepository,
    schema::{InviteCodeEntity, InviteCodeStats},
};
use crate::modules::user::schema::UserRole;
use crate::utils::Validated;

const STATS_PAGE_SIZE: u32 = 100;

#[derive(Clone)]
pub struct InviteCodeService {
    repo: Arc<dyn InviteCodeRepository + Send + Sync>,
    session: Arc<SessionStore>,
}

impl InviteCodeService {
    pub fn with_dependencies(
        repo: Arc<dyn InviteCodeRepository + Send + Sync>,
        session: Arc<SessionStore>,
    ) -> Self {
        InviteCodeService { repo, session }
    }

    fn guard(&self) -> Result<(), error::SystemError> {
        authorization(&self.session, &[UserRole::Admin]).map(|_| ())
    }

    pub async fn generate(&self, count: u32) -> Result<Vec<InviteCodeEntity>, error::SystemError> {
        self.guard()?;
        let req = Validated::new(GenerateInviteCodesModel { count })?;
        let codes = self.repo.generate(&req).await?;
        info!("generated {} invite codes", codes.len());
        Ok(codes)
    }

    pub async fn list(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Page<InviteCodeEntity>, error::SystemError> {
        self.guard()?;
        let page = page.max(1);
        self.repo.find_page(page, page_size).await?.ensure_in_range(page)
    }

    /// Falls back to counting every listed code when the server has no stats endpoint.
    pub async fn stats(&self) -> Result<InviteCodeStats, error::SystemError> {
        self.guard()?;
        match self.repo.stats().await {
            Err(e) if e.status() == Some(StatusCode::NOT_FOUND) => {
                warn!("invite code stats endpoint missing, counting listed codes");
                self.tally_all().await
            }
            other => other,
        }
    }

    async fn tally_all(&self) -> Result<InviteCodeStats, error::SystemError> {
        let mut codes = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.repo.find_page(page, STATS_PAGE_SIZE).await?;
            let last = batch.pager().total_pages();
            let empty = batch.items.is_empty();
            codes.extend(batch.items);
            if empty || page >= last {
                break;
            }
            page += 1;
        }
        Ok(InviteCodeStats::tally(&codes))
    }

    pub async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.guard()?;
        self.repo.delete(id).await?;
        info!("deleted invite code {id}");
        Ok(())
    }
}
