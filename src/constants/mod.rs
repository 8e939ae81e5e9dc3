use std::str::FromStr;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";
pub const DEFAULT_TAG_COLOR: &str = "#409EFF";
pub const DEFAULT_WORKFLOW_TYPE: &str = "custom";
pub const DEFAULT_MEMBER_ROLE: &str = "member";

pub struct Env {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub session_file: String,
    pub page_size: u32,
    pub upload_chunk_size: usize,
}

fn var_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            log::warn!("{key}={raw:?} is not valid, falling back to {default}");
            default
        }),
        Err(_) => default,
    }
}

impl Env {
    fn new() -> Self {
        let api_base_url =
            std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let request_timeout_secs = var_or("REQUEST_TIMEOUT_SECS", 30u64);
        let session_file = std::env::var("SESSION_FILE")
            .unwrap_or_else(|_| ".mediacloud/session.json".to_string());
        let page_size = var_or("PAGE_SIZE", 20u32).max(1);
        let upload_chunk_size = var_or("UPLOAD_CHUNK_SIZE", 64 * 1024usize).max(1);

        Env { api_base_url, request_timeout_secs, session_file, page_size, upload_chunk_size }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}
