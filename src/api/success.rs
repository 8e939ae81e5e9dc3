use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::api::error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pagination {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }
}

/// `ceil(total / page_size)`; zero when either side is zero.
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total.div_ceil(page_size as u64);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// The backend wraps most bodies as `{data, pagination?, message?}` but a few
/// endpoints return the resource itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped {
        data: T,
        #[serde(default)]
        pagination: Option<Pagination>,
        #[serde(default)]
        message: Option<Cow<'static, str>>,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> T {
        match self {
            Envelope::Wrapped { data, .. } => data,
            Envelope::Bare(data) => data,
        }
    }

    /// Whatever the server said alongside the data.
    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Wrapped { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            Envelope::Bare(_) => None,
        }
    }

    pub fn into_parts(self) -> (T, Option<Pagination>) {
        match self {
            Envelope::Wrapped { data, pagination, .. } => (data, pagination),
            Envelope::Bare(data) => (data, None),
        }
    }
}

/// Body of a mutation that only reports what happened.
#[derive(Debug, Default, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message).filter(|m| !m.trim().is_empty())
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Builds a page, synthesising pagination when the server omitted it.
    pub fn new(items: Vec<T>, pagination: Option<Pagination>, page: u32, page_size: u32) -> Self {
        let pagination = pagination.unwrap_or(Pagination {
            page,
            page_size,
            total: items.len() as u64,
        });
        Self { items, pagination }
    }

    pub fn total(&self) -> u64 {
        self.pagination.total
    }

    pub fn pager(&self) -> Pager {
        Pager::new(self.pagination.page.max(1), self.pagination.page_size, self.pagination.total)
    }

    /// Refuses a page past the last one. An empty listing has nothing to refuse.
    pub fn ensure_in_range(self, requested: u32) -> Result<Self, error::SystemError> {
        let pager = self.pager();
        let last = pager.total_pages();
        if last > 0 && pager.go_to(requested).is_none() {
            return Err(error::SystemError::bad_request(format!(
                "page {requested} is past the last page ({last})"
            )));
        }
        Ok(self)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { items: self.items.into_iter().map(f).collect(), pagination: self.pagination }
    }
}

/// Pagination control state. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub page_size: u32,
    pub total: u64,
}

impl Pager {
    pub fn new(current: u32, page_size: u32, total: u64) -> Self {
        Self { current, page_size, total }
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }

    pub fn prev(&self) -> Option<u32> {
        self.has_prev().then(|| self.current - 1)
    }

    pub fn go_to(&self, page: u32) -> Option<u32> {
        (1..=self.total_pages()).contains(&page).then_some(page)
    }
}

impl std::fmt::Display for Pager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {}/{} ({} total)", self.current, self.total_pages().max(1), self.total)?;
        if let Some(prev) = self.prev() {
            write!(f, ", prev: --page {prev}")?;
        }
        if let Some(next) = self.next() {
            write!(f, ", next: --page {next}")?;
        }
        Ok(())
    }
}
