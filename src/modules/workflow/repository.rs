use crate::{
    api::{error, success::Page},
    modules::workflow::{
        model::{AddMemberModel, CreateWorkflowModel, UpdateWorkflow, WorkflowQuery},
        schema::WorkflowEntity,
    },
};

#[async_trait::async_trait]
pub trait WorkflowRepository {
    async fn find_page(
        &self,
        query: &WorkflowQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<WorkflowEntity>, error::SystemError>;

    async fn find_by_id(&self, id: u64) -> Result<WorkflowEntity, error::SystemError>;

    async fn create(
        &self,
        workflow: &CreateWorkflowModel,
    ) -> Result<WorkflowEntity, error::SystemError>;

    async fn update(
        &self,
        id: u64,
        changes: &UpdateWorkflow,
    ) -> Result<WorkflowEntity, error::SystemError>;

    async fn delete(&self, id: u64) -> Result<(), error::SystemError>;

    async fn add_member(&self, id: u64, member: &AddMemberModel) -> Result<(), error::SystemError>;

    async fn remove_member(&self, id: u64, user_id: u64) -> Result<(), error::SystemError>;
}
