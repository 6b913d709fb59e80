//! Listing parameters and their translation into a store query.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const DEFAULT_SORT: &str = "-created_at";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw listing parameters as they arrive on the query string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_sort() -> String {
    DEFAULT_SORT.to_string()
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            q: None,
            status: None,
            sort: default_sort(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("page must be >= 1")]
    PageOutOfRange,
    #[error("page_size must be between 1 and {MAX_PAGE_SIZE}")]
    PageSizeOutOfRange,
}

impl ListParams {
    /// Validate bounds and translate into the store-facing query.
    pub fn into_query(self) -> Result<ListQuery, QueryError> {
        if self.page < 1 {
            return Err(QueryError::PageOutOfRange);
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(QueryError::PageSizeOutOfRange);
        }
        Ok(ListQuery {
            filter: OrderFilter {
                q: self.q.filter(|s| !s.is_empty()),
                status: self.status.filter(|s| !s.is_empty()),
            },
            sort: SortSpec::parse(&self.sort),
            page: self.page,
            page_size: self.page_size,
        })
    }
}

/// Filter clause: free-text OR-match over order_number / customer_name /
/// email, AND an exact status match. Unknown status values match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub q: Option<String>,
    pub status: Option<String>,
}

/// Sort directive: field name, optionally descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    /// `-field` sorts descending, `field` ascending.
    pub fn parse(spec: &str) -> Self {
        match spec.strip_prefix('-') {
            Some(field) => Self {
                field: field.to_string(),
                descending: true,
            },
            None => Self {
                field: spec.to_string(),
                descending: false,
            },
        }
    }
}

/// Validated query handed to the store adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: OrderFilter,
    pub sort: SortSpec,
    pub page: u32,
    pub page_size: u32,
}

impl ListQuery {
    /// Records to skip before the requested page. Saturating, so a query
    /// built directly with `page = 0` behaves like the first page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// One page of wire-serialized orders plus the total match count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub items: Vec<JsonValue>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_spec_parses_direction() {
        assert_eq!(
            SortSpec::parse("-created_at"),
            SortSpec {
                field: "created_at".into(),
                descending: true
            }
        );
        assert_eq!(
            SortSpec::parse("email"),
            SortSpec {
                field: "email".into(),
                descending: false
            }
        );
    }

    #[test]
    fn defaults_apply() {
        let query = ListParams::default().into_query().unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.sort.field, "created_at");
        assert!(query.sort.descending);
        assert_eq!(query.filter, OrderFilter::default());
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn bounds_are_enforced() {
        let mut params = ListParams::default();
        params.page = 0;
        assert_eq!(params.into_query(), Err(QueryError::PageOutOfRange));

        let mut params = ListParams::default();
        params.page_size = 0;
        assert_eq!(params.into_query(), Err(QueryError::PageSizeOutOfRange));

        let mut params = ListParams::default();
        params.page_size = MAX_PAGE_SIZE + 1;
        assert_eq!(params.into_query(), Err(QueryError::PageSizeOutOfRange));
    }

    #[test]
    fn offset_skips_prior_pages() {
        let mut params = ListParams::default();
        params.page = 3;
        params.page_size = 25;
        let query = params.into_query().unwrap();
        assert_eq!(query.offset(), 50);
        assert_eq!(query.limit(), 25);
    }

    #[test]
    fn offset_saturates_when_built_with_page_zero() {
        // The pub fields allow bypassing into_query's validation.
        let query = ListQuery {
            filter: OrderFilter::default(),
            sort: SortSpec::parse(DEFAULT_SORT),
            page: 0,
            page_size: 10,
        };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let mut params = ListParams::default();
        params.q = Some(String::new());
        params.status = Some(String::new());
        let query = params.into_query().unwrap();
        assert_eq!(query.filter, OrderFilter::default());
    }
}
