/*
 * Responsibility
 * - `?pageIndex=&pageSize=&name=` query shared by every `/paging` endpoint
 * - `{total, items}` response shape
 */
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: usize = 10;
const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// 1-based.
    pub page_index: Option<usize>,
    pub page_size: Option<usize>,
    /// Case-insensitive substring filter on the display name.
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl PageQuery {
    pub fn matches_name(&self, name: &str) -> bool {
        match self.name.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => name.to_lowercase().contains(&needle.to_lowercase()),
        }
    }

    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let index = self.page_index.unwrap_or(1).max(1);

        let total = items.len();
        let items = items
            .into_iter()
            .skip((index - 1).saturating_mul(size))
            .take(size)
            .collect();

        Page { total, items }
    }
}
