use serde::Serialize;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct GenerateInviteCodesModel {
    #[validate(range(min = 1, max = 100, message = "Count must be between 1 and 100"))]
    pub count: u32,
}

pub fn page_query(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.max(1).to_string()), ("page_size", page_size.to_string())]
}
