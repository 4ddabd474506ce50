use serde::{Deserialize, Serialize};

/// Paginated list envelope returned by the backend (`{ content, page, ... }`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn into_content(self) -> Vec<T> {
        self.content
    }
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            page: 0,
            size: 0,
            total_elements: 0,
            total_pages: 0,
        }
    }
}

/// Some list endpoints answer with a bare array, others with a page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    Page(PaginatedResponse<T>),
    Plain(Vec<T>),
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Page(page) => page.content,
            ListResponse::Plain(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_paging_fields_default() {
        let page: PaginatedResponse<i64> = serde_json::from_str(r#"{"content":[1,2,3]}"#).unwrap();
        assert_eq!(page.content, vec![1, 2, 3]);
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_list_response_accepts_both_shapes() {
        let plain: ListResponse<i64> = serde_json::from_str("[4,5]").unwrap();
        assert_eq!(plain.into_vec(), vec![4, 5]);
        let page: ListResponse<i64> = serde_json::from_str(r#"{"content":[6],"totalPages":1}"#).unwrap();
        assert_eq!(page.into_vec(), vec![6]);
    }
}
