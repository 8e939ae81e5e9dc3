use futures_util::future::join_all;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{error, success::Page};
use crate::modules::material::{
    model::{
        BatchAction, BatchOutcome, MaterialDraft, MaterialQuery, UpdateMaterial, UploadFile,
        UploadProgress,
    },
    repository::MaterialRepository,
    schema::MaterialEntity,
};
use crate::utils::Validated;

#[derive(Clone)]
pub struct MaterialService {
    repo: Arc<dyn MaterialRepository + Send + Sync>,
    origin: String,
}

impl MaterialService {
    pub fn with_dependencies(
        repo: Arc<dyn MaterialRepository + Send + Sync>,
        origin: impl Into<String>,
    ) -> Self {
        MaterialService { repo, origin: origin.into() }
    }

    fn normalize(&self, material: MaterialEntity) -> MaterialEntity {
        material.normalize_paths(&self.origin)
    }

    pub async fn list(
        &self,
        query: &MaterialQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<MaterialEntity>, error::SystemError> {
        let page = page.max(1);
        let found = self.repo.find_page(query, page, page_size).await?.ensure_in_range(page)?;
        Ok(found.map(|m| self.normalize(m)))
    }

    pub async fn get(&self, id: u64) -> Result<MaterialEntity, error::SystemError> {
        Ok(self.normalize(self.repo.find_by_id(id).await?))
    }

    pub async fn upload(
        &self,
        path: &Path,
        workflow_id: Option<u64>,
        progress: Option<UnboundedSender<UploadProgress>>,
    ) -> Result<MaterialEntity, error::SystemError> {
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(error::SystemError::bad_request(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| error::SystemError::bad_request("Upload path has no file name"))?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let bytes = tokio::fs::read(path).await?;

        info!("uploading {file_name} ({mime_type}, {} bytes)", bytes.len());
        let file = UploadFile { file_name, mime_type, bytes, workflow_id };
        let material = self.repo.upload(file, progress).await?;
        info!("uploaded material {}", material.id);
        Ok(self.normalize(material))
    }

    /// Submits only the fields that differ from `original`.
    pub async fn update(
        &self,
        original: &MaterialEntity,
        edited: MaterialDraft,
    ) -> Result<MaterialEntity, error::SystemError> {
        let changes = UpdateMaterial::diff(&MaterialDraft::from(original), &edited);
        if changes.is_empty() {
            info!("material {} unchanged, nothing to submit", original.id);
            return Ok(original.clone());
        }
        let changes = Validated::new(changes)?;
        let material = self.repo.update(original.id, &changes).await?;
        Ok(self.normalize(material))
    }

    pub async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.repo.delete(id).await?;
        info!("deleted material {id}");
        Ok(())
    }

    async fn apply(&self, id: u64, action: BatchAction) -> Result<(), error::SystemError> {
        match action.update() {
            Some(changes) => self.repo.update(id, &changes).await.map(|_| ()),
            None => self.repo.delete(id).await,
        }
    }

    /// Runs one independent request per id. Failures are collected, not rolled back.
    pub async fn batch(&self, ids: &[u64], action: BatchAction) -> BatchOutcome {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let results = join_all(
            unique.into_iter().map(|id| async move { (id, self.apply(id, action).await) }),
        )
        .await;

        let mut outcome = BatchOutcome::default();
        for (id, result) in results {
            match result {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => {
                    warn!("{action:?} failed for material {id}: {e}");
                    outcome.failed.push((id, e));
                }
            }
        }
        outcome
    }
}
