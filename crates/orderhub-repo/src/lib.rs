#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a store feature: `memory` or `sqlite`.");

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orderhub_types::domain::order::{OrderId, OrderStatus};
use orderhub_types::domain::query::ListQuery;
use orderhub_types::domain::value::Document;
use orderhub_types::ports::order_store::{OrderStore, PageResult, StoreError};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Store adapter selected at build time by cargo features.
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteStore),
}

/// Construct a store from the optional database URL.
///
/// With the sqlite feature a missing URL means no store: callers get
/// `Ok(None)` and are expected to serve in the explicit "unavailable" state
/// rather than fail startup. The memory adapter needs no configuration and
/// is always available.
pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Option<Repo>> {
    #[cfg(feature = "sqlite")]
    if let Some(url) = database_url {
        return Ok(Some(Repo::Sqlite(sqlite::SqliteStore::new(url).await?)));
    }
    let _ = database_url;

    #[cfg(feature = "memory")]
    let repo = Some(Repo::Memory(memory::InMemoryStore::new()));
    #[cfg(not(feature = "memory"))]
    let repo = None;

    Ok(repo)
}

#[async_trait]
impl OrderStore for Repo {
    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize, StoreError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(store) => store.insert_many(docs).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(store) => store.insert_many(docs).await,
        }
    }

    async fn find_page(&self, query: &ListQuery) -> Result<PageResult, StoreError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(store) => store.find_page(query).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(store) => store.find_page(query).await,
        }
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Document>, StoreError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(store) => store.find_by_id(id).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(store) => store.find_by_id(id).await,
        }
    }

    async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(store) => store.set_status(id, status, updated_at).await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(store) => store.set_status(id, status, updated_at).await,
        }
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(store) => store.collection_names().await,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(store) => store.collection_names().await,
        }
    }
}
