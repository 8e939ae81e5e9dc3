use log::info;
use std::sync::Arc;

use crate::api::{error, success::Page};
use crate::modules::workflow::{
    model::{AddMemberModel, CreateWorkflowModel, UpdateWorkflow, WorkflowDraft, WorkflowQuery},
    repository::WorkflowRepository,
    schema::WorkflowEntity,
};
use crate::utils::Validated;

#[derive(Clone)]
pub struct WorkflowService {
    repo: Arc<dyn WorkflowRepository + Send + Sync>,
}

impl WorkflowService {
    pub fn with_dependencies(repo: Arc<dyn WorkflowRepository + Send + Sync>) -> Self {
        WorkflowService { repo }
    }

    pub async fn list(
        &self,
        query: &WorkflowQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<WorkflowEntity>, error::SystemError> {
        let page = page.max(1);
        self.repo.find_page(query, page, page_size).await?.ensure_in_range(page)
    }

    pub async fn get(&self, id: u64) -> Result<WorkflowEntity, error::SystemError> {
        self.repo.find_by_id(id).await
    }

    pub async fn create(
        &self,
        mut model: CreateWorkflowModel,
    ) -> Result<WorkflowEntity, error::SystemError> {
        model.members.sort_unstable();
        model.members.dedup();
        let model = Validated::new(model)?;
        let workflow = self.repo.create(&model).await?;
        info!("created workflow {} ({})", workflow.name, workflow.id);
        Ok(workflow)
    }

    pub async fn update(
        &self,
        original: &WorkflowEntity,
        edited: WorkflowDraft,
    ) -> Result<WorkflowEntity, error::SystemError> {
        let changes = UpdateWorkflow::diff(&WorkflowDraft::from(original), &edited);
        if changes.is_empty() {
            info!("workflow {} unchanged, nothing to submit", original.id);
            return Ok(original.clone());
        }
        let changes = Validated::new(changes)?;
        self.repo.update(original.id, &changes).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.repo.delete(id).await?;
        info!("deleted workflow {id}");
        Ok(())
    }

    pub async fn add_member(
        &self,
        id: u64,
        member: AddMemberModel,
    ) -> Result<(), error::SystemError> {
        let member = Validated::new(member)?;
        self.repo.add_member(id, &member).await?;
        info!("added user {} to workflow {id} as {}", member.user_id, member.role);
        Ok(())
    }

    pub async fn remove_member(&self, id: u64, user_id: u64) -> Result<(), error::SystemError> {
        self.repo.remove_member(id, user_id).await?;
        info!("removed user {user_id} from workflow {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::workflow::schema::WorkflowMember;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeWorkflowRepo {
        workflows: Mutex<Vec<WorkflowEntity>>,
        submitted: Mutex<Vec<serde_json::Value>>,
    }

    fn workflow(id: u64, name: &str) -> WorkflowEntity {
        serde_json::from_value(serde_json::json!({"id": id, "name": name})).unwrap()
    }

    impl FakeWorkflowRepo {
        fn with_workflow(
            &self,
            id: u64,
            f: impl FnOnce(&mut WorkflowEntity),
        ) -> Result<WorkflowEntity, error::SystemError> {
            let mut workflows = self.workflows.lock().unwrap();
            let wf = workflows
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or_else(|| error::SystemError::http(StatusCode::NOT_FOUND, ""))?;
            f(wf);
            Ok(wf.clone())
        }
    }

    #[async_trait::async_trait]
    impl WorkflowRepository for FakeWorkflowRepo {
        async fn find_page(
            &self,
            query: &WorkflowQuery,
            page: u32,
            page_size: u32,
        ) -> Result<Page<WorkflowEntity>, error::SystemError> {
            let keyword = query.keyword.clone().unwrap_or_default();
            let items: Vec<_> = self
                .workflows
                .lock()
                .unwrap()
                .iter()
                .filter(|w| w.name.contains(&keyword))
                .cloned()
                .collect();
            Ok(Page::new(items, None, page, page_size))
        }

        async fn find_by_id(&self, id: u64) -> Result<WorkflowEntity, error::SystemError> {
            self.with_workflow(id, |_| ())
        }

        async fn create(
            &self,
            model: &CreateWorkflowModel,
        ) -> Result<WorkflowEntity, error::SystemError> {
            self.submitted.lock().unwrap().push(serde_json::to_value(model)?);
            let mut workflows = self.workflows.lock().unwrap();
            let mut wf = workflow(workflows.len() as u64 + 1, &model.name);
            wf.members = model
                .members
                .iter()
                .map(|uid| {
                    serde_json::from_value::<WorkflowMember>(serde_json::json!({"user_id": uid}))
                })
                .collect::<Result<_, _>>()?;
            workflows.push(wf.clone());
            Ok(wf)
        }

        async fn update(
            &self,
            id: u64,
            changes: &UpdateWorkflow,
        ) -> Result<WorkflowEntity, error::SystemError> {
            self.submitted.lock().unwrap().push(serde_json::to_value(changes)?);
            self.with_workflow(id, |wf| {
                if let Some(name) = &changes.name {
                    wf.name = name.clone();
                }
                if let Some(active) = changes.is_active {
                    wf.is_active = active;
                }
            })
        }

        async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
            self.workflows.lock().unwrap().retain(|w| w.id != id);
            Ok(())
        }

        async fn add_member(
            &self,
            id: u64,
            member: &AddMemberModel,
        ) -> Result<(), error::SystemError> {
            let member: WorkflowMember = serde_json::from_value(serde_json::to_value(member)?)?;
            self.with_workflow(id, |wf| wf.members.push(member)).map(|_| ())
        }

        async fn remove_member(&self, id: u64, user_id: u64) -> Result<(), error::SystemError> {
            self.with_workflow(id, |wf| wf.members.retain(|m| m.user_id != user_id)).map(|_| ())
        }
    }

    #[tokio::test]
    async fn test_create_dedupes_members() {
        let repo = Arc::new(FakeWorkflowRepo::default());
        let svc = WorkflowService::with_dependencies(repo.clone());
        let mut model = CreateWorkflowModel::new("Open day");
        model.members = vec![5, 3, 5];
        let wf = svc.create(model).await.unwrap();
        assert!(wf.has_member(3) && wf.has_member(5));
        assert_eq!(repo.submitted.lock().unwrap()[0]["members"], serde_json::json!([3, 5]));

        assert!(svc.create(CreateWorkflowModel::new("  ")).await.is_err());
        assert_eq!(repo.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_skips_empty_diff() {
        let repo = Arc::new(FakeWorkflowRepo::default());
        repo.workflows.lock().unwrap().push(workflow(1, "Open day"));
        let svc = WorkflowService::with_dependencies(repo.clone());
        let original = svc.get(1).await.unwrap();

        svc.update(&original, WorkflowDraft::from(&original)).await.unwrap();
        assert!(repo.submitted.lock().unwrap().is_empty());

        let edited = WorkflowDraft { is_active: false, ..WorkflowDraft::from(&original) };
        let updated = svc.update(&original, edited).await.unwrap();
        assert!(!updated.is_active);
        assert_eq!(repo.submitted.lock().unwrap()[0], serde_json::json!({"is_active": false}));
    }

    #[tokio::test]
    async fn test_membership_changes() {
        let repo = Arc::new(FakeWorkflowRepo::default());
        repo.workflows.lock().unwrap().push(workflow(1, "Open day"));
        let svc = WorkflowService::with_dependencies(repo.clone());

        svc.add_member(1, AddMemberModel::new(8, Some("reviewer"))).await.unwrap();
        let wf = svc.get(1).await.unwrap();
        assert_eq!(wf.members[0].role, "reviewer");

        svc.remove_member(1, 8).await.unwrap();
        assert!(!svc.get(1).await.unwrap().has_member(8));
        assert!(svc.add_member(2, AddMemberModel::new(8, None)).await.is_err());
    }

    #[tokio::test]
    async fn test_list_filters_by_keyword() {
        let repo = Arc::new(FakeWorkflowRepo::default());
        repo.workflows
            .lock()
            .unwrap()
            .extend([workflow(1, "Open day"), workflow(2, "Sports meet")]);
        let svc = WorkflowService::with_dependencies(repo);
        let page = svc
            .list(&WorkflowQuery { keyword: Some("Sports".into()) }, 1, 20)
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pager().total_pages(), 1);
    }
}
