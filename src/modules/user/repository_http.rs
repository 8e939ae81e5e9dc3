use crate::{
    api::{
        client::ApiClient,
        error,
        success::{Page, Pagination},
    },
    modules::user::{
        model::{RoleUpdated, UpdateRoleModel, UserQuery},
        repository::UserRepository,
        schema::UserEntity,
    },
};

#[derive(Clone)]
pub struct UserRepositoryHttp {
    api: ApiClient,
}

impl UserRepositoryHttp {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// Filters and pages a full user list on this side.
fn page_locally(
    users: Vec<UserEntity>,
    query: &UserQuery,
    page: u32,
    page_size: u32,
) -> Page<UserEntity> {
    let page = page.max(1);
    let matching: Vec<UserEntity> = users.into_iter().filter(|u| query.matches(u)).collect();
    let total = matching.len() as u64;
    let skip = (page as usize - 1).saturating_mul(page_size as usize);
    let items = matching.into_iter().skip(skip).take(page_size as usize).collect();
    Page::new(items, Some(Pagination { page, page_size, total }), page, page_size)
}

#[async_trait::async_trait]
impl UserRepository for UserRepositoryHttp {
    async fn find_page(
        &self,
        query: &UserQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<UserEntity>, error::SystemError> {
        let (users, pagination) = self
            .api
            .get_query::<Vec<UserEntity>>("users", &query.to_query(page, page_size))
            .await?
            .into_parts();
        match pagination {
            Some(_) => Ok(Page::new(users, pagination, page, page_size)),
            // older servers answer with a bare, unpaged array
            None => Ok(page_locally(users, query, page, page_size)),
        }
    }

    async fn update_role(
        &self,
        id: u64,
        req: &UpdateRoleModel,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let path = format!("users/{id}/role");
        let body = self.api.put::<_, RoleUpdated>(&path, req).await?.into_data();
        if let Some(message) = &body.message {
            log::debug!("role update for user {id}: {message}");
        }
        Ok(body.user)
    }

    async fn delete(&self, id: u64) -> Result<(), error::SystemError> {
        self.api.delete(&format!("users/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::user::schema::UserRole;

    fn users(n: u64) -> Vec<UserEntity> {
        (1..=n)
            .map(|id| UserEntity {
                id,
                username: format!("user{id}"),
                email: format!("user{id}@example.com"),
                role: if id == 1 { UserRole::Admin } else { UserRole::User },
                inviter_id: None,
                created_at: None,
                updated_at: None,
            })
            .collect()
    }

    #[test]
    fn test_bare_list_is_paged_locally() {
        let page = page_locally(users(45), &UserQuery::default(), 3, 20);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].id, 41);
        assert_eq!(page.total(), 45);
        assert_eq!(page.pager().total_pages(), 3);
        assert!(!page.pager().has_next());
    }

    #[test]
    fn test_bare_list_is_filtered_before_paging() {
        let query = UserQuery { role: Some(UserRole::Admin), ..Default::default() };
        let page = page_locally(users(45), &query, 1, 20);
        assert_eq!(page.total(), 1);
        assert_eq!(page.items[0].id, 1);

        let empty = page_locally(users(3), &UserQuery::default(), 9, 20);
        assert!(empty.items.is_empty());
        assert_eq!(empty.total(), 3);
    }
}
