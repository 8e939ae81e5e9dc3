use serde::{Deserialize, Serialize};

use crate::modules::user::schema::{UserEntity, UserRole};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    pub keyword: Option<String>,
    pub role: Option<UserRole>,
}

impl UserQuery {
    pub fn to_query(&self, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", page.max(1).to_string()),
            ("page_size", page_size.to_string()),
        ];
        if let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            query.push(("keyword", keyword.to_string()));
        }
        if let Some(role) = self.role {
            query.push(("role", role.as_str().to_string()));
        }
        query
    }

    /// Applies the filters locally, for servers that ignore them.
    pub fn matches(&self, user: &UserEntity) -> bool {
        let keyword_ok = match self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => {
                let keyword = keyword.to_lowercase();
                user.username.to_lowercase().contains(&keyword)
                    || user.email.to_lowercase().contains(&keyword)
            }
            None => true,
        };
        keyword_ok && (self.role.is_none() || self.role == Some(user.role))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateRoleModel {
    pub role: UserRole,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleUpdated {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserEntity>,
}
