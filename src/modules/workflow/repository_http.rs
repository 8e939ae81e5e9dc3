use crate::{
    api::{client::ApiClient, error, success::{MessageBody, Page}},
    modules::workflow::{
        model::{AddMemberModel, CreateWorkflowModel, UpdateWorkflow, WorkflowQuery},
        repository::WorkflowRepository,
        schema::WorkflowEntity,
    },
};

#[derive(Clone)]
pub struct WorkflowRepositoryHttp {
    api: ApiClient,
}

impl WorkflowRepositoryHttp {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl WorkflowRepository for WorkflowRepositoryHttp {
    async fn find_page(
        &self,
        query: &WorkflowQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<WorkflowEntity>, error::SystemError> {
        let (items, pagination) = self
            .api
            .get_query::<Vec<WorkflowEntity>>("workflows", &query.to_query(page, page_size))
            .await?
            .into_parts();
        Ok(Page::new(items, pagination, page, page_size))
    }

    async fn find_by_id(&self, id: u64) -> Result<WorkflowEntity, error::SystemError> {
        Ok(self.api.get::<WorkflowEntity>(&format!("workflows/{id}")).await?.into_data())
    }

    async fn create(
        &self,
        workflow: &CreateWorkflowModel,
    ) -> Result<WorkflowEntity, error::SystemError> {
        Ok(self.api.post::<_, WorkflowEntity>("workflows", workflow).await?.into_data())
    }

    async fn update(
        &self,
        id: u64,
        changes: &UpdateWorkflow,
    ) -> Result<WorkflowEntity, error::SystemError> {
        let path = format!("workflows/{id}");
        Ok(self.api.put::<_, WorkflowEntity>(&path, changes).await?.into_data())
    }

    async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.api.delete(&format!("workflows/{id}")).await
    }

    async fn add_member(&self, id: u64, member: &AddMemberModel) -> Result<(), error::SystemError> {
        self.api.post::<_, MessageBody>(&format!("workflows/{id}/members"), member).await?;
        Ok(())
    }

    async fn remove_member(&self, id: u64, user_id: u64) -> Result<(), error::SystemError> {
        self.api.delete(&format!("workflows/{id}/members/{user_id}")).await
    }
}
