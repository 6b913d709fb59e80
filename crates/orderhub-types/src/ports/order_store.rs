use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::order::{OrderId, OrderStatus};
use crate::domain::query::ListQuery;
use crate::domain::value::Document;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("db error: {0}")]
    Db(String),
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// One page of raw documents plus the total match count ignoring pagination.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub items: Vec<Document>,
    pub total: u64,
}

/// Port onto the order collection: insert/find/count/update primitives.
#[async_trait]
pub trait OrderStore: Send + Sync + 'static {
    /// Bulk insert; the store assigns each document an `_id`. Returns the
    /// number of documents inserted.
    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize, StoreError>;

    /// Filtered, sorted, paginated listing together with the total count.
    async fn find_page(&self, query: &ListQuery) -> Result<PageResult, StoreError>;

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Document>, StoreError>;

    /// Set `status` and `updated_at` on the matching record. Returns whether
    /// a record matched.
    async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    /// Names of the collections/tables backing this store, for diagnostics.
    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;
}
