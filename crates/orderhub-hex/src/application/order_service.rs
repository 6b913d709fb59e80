use chrono::Utc;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::application::demo;
use crate::errors::AppError;
use orderhub_types::domain::order::{OrderId, OrderStatus};
use orderhub_types::domain::query::{ListParams, OrderPage};
use orderhub_types::domain::value::Document;
use orderhub_types::ports::order_store::{OrderStore, StoreError};

/// The store handle, established once at startup. "Unavailable" is an
/// explicit state: data operations fail with a server error while the
/// process keeps serving liveness and diagnostics.
pub enum StoreState<R> {
    Ready(R),
    Unavailable,
}

pub struct OrderService<R: OrderStore> {
    store: StoreState<R>,
}

/// Store-facing portion of the `/test` diagnostic body.
#[derive(Debug, Serialize)]
pub struct StoreDiagnostics {
    pub database: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn internal(e: StoreError) -> AppError {
    AppError::Internal(anyhow::Error::new(e))
}

fn truncated(msg: &str) -> String {
    msg.chars().take(50).collect()
}

impl<R: OrderStore> OrderService<R> {
    pub fn new(store: R) -> Self {
        Self {
            store: StoreState::Ready(store),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            store: StoreState::Unavailable,
        }
    }

    fn store(&self) -> Result<&R, AppError> {
        match &self.store {
            StoreState::Ready(store) => Ok(store),
            StoreState::Unavailable => Err(AppError::Unavailable),
        }
    }

    pub async fn list_orders(&self, params: ListParams) -> Result<OrderPage, AppError> {
        let store = self.store()?;
        let query = params
            .into_query()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let page = store.find_page(&query).await.map_err(internal)?;
        Ok(OrderPage {
            items: page.items.iter().map(Document::to_wire).collect(),
            page: query.page,
            page_size: query.page_size,
            total: page.total,
        })
    }

    pub async fn get_order(&self, raw_id: &str) -> Result<JsonValue, AppError> {
        let store = self.store()?;
        let id: OrderId = raw_id
            .parse()
            .map_err(|e: orderhub_types::domain::order::ParseIdError| {
                AppError::BadRequest(e.to_string())
            })?;
        match store.find_by_id(&id).await.map_err(internal)? {
            Some(doc) => Ok(doc.to_wire()),
            None => Err(AppError::NotFound(format!("order {id}"))),
        }
    }

    pub async fn update_status(&self, raw_id: &str, status: &str) -> Result<JsonValue, AppError> {
        let store = self.store()?;
        let id: OrderId = raw_id
            .parse()
            .map_err(|e: orderhub_types::domain::order::ParseIdError| {
                AppError::BadRequest(e.to_string())
            })?;
        let status: OrderStatus = status
            .parse()
            .map_err(|e: orderhub_types::domain::order::ParseStatusError| {
                AppError::BadRequest(e.to_string())
            })?;

        let matched = store
            .set_status(&id, status, Utc::now())
            .await
            .map_err(internal)?;
        if !matched {
            return Err(AppError::NotFound(format!("order {id}")));
        }

        // Re-fetch so the caller sees the record exactly as stored.
        match store.find_by_id(&id).await.map_err(internal)? {
            Some(doc) => Ok(doc.to_wire()),
            None => Err(AppError::NotFound(format!("order {id}"))),
        }
    }

    pub async fn seed_demo_orders(&self) -> Result<usize, AppError> {
        let store = self.store()?;
        store
            .insert_many(demo::demo_orders(Utc::now()))
            .await
            .map_err(internal)
    }

    /// Never fails: store errors are captured into the diagnostic fields.
    pub async fn diagnostics(&self) -> StoreDiagnostics {
        match &self.store {
            StoreState::Unavailable => StoreDiagnostics {
                database: "not configured".into(),
                connection_status: "Not Connected".into(),
                collections: Vec::new(),
            },
            StoreState::Ready(store) => match store.collection_names().await {
                Ok(mut names) => {
                    names.truncate(10);
                    StoreDiagnostics {
                        database: "connected".into(),
                        connection_status: "Connected".into(),
                        collections: names,
                    }
                }
                Err(e) => StoreDiagnostics {
                    database: format!("error: {}", truncated(&e.to_string())),
                    connection_status: "Connected".into(),
                    collections: Vec::new(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderhub_repo::memory::InMemoryStore;

    fn seeded() -> OrderService<InMemoryStore> {
        OrderService::new(InMemoryStore::new())
    }

    #[tokio::test]
    async fn seed_and_list_everything() {
        let svc = seeded();
        let inserted = svc.seed_demo_orders().await.unwrap();
        assert_eq!(inserted, 3);

        let page = svc.list_orders(ListParams::default()).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.items.len(), 3);
        // Wire form only: string ids, string timestamps.
        for item in &page.items {
            assert!(item["id"].is_string());
            assert!(item["created_at"].as_str().unwrap().ends_with("+00:00"));
            assert!(item.get("_id").is_none());
        }
    }

    #[tokio::test]
    async fn fetch_by_listed_id_round_trips() {
        let svc = seeded();
        svc.seed_demo_orders().await.unwrap();
        let page = svc.list_orders(ListParams::default()).await.unwrap();
        let first = &page.items[0];
        let id = first["id"].as_str().unwrap();

        let fetched = svc.get_order(id).await.unwrap();
        assert_eq!(&fetched, first);
    }

    #[tokio::test]
    async fn invalid_id_is_rejected_before_lookup() {
        let svc = seeded();
        let err = svc.get_order("not-an-id").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = svc.update_status("not-an-id", "shipped").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let svc = seeded();
        svc.seed_demo_orders().await.unwrap();
        let ghost = OrderId::generate().to_string();

        let err = svc.get_order(&ghost).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = svc.update_status(&ghost, "shipped").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn unknown_status_is_rejected() {
        let svc = seeded();
        svc.seed_demo_orders().await.unwrap();
        let page = svc.list_orders(ListParams::default()).await.unwrap();
        let id = page.items[0]["id"].as_str().unwrap().to_string();

        let err = svc.update_status(&id, "refunded").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn update_status_returns_the_updated_record() {
        let svc = seeded();
        svc.seed_demo_orders().await.unwrap();

        let mut params = ListParams::default();
        params.status = Some("processing".into());
        let page = svc.list_orders(params).await.unwrap();
        assert_eq!(page.total, 1);
        let before = &page.items[0];
        let id = before["id"].as_str().unwrap().to_string();

        let updated = svc.update_status(&id, "delivered").await.unwrap();
        assert_eq!(updated["status"], "delivered");
        assert_eq!(updated["order_number"], before["order_number"]);
        assert!(
            updated["updated_at"].as_str().unwrap() > updated["created_at"].as_str().unwrap()
        );

        let refetched = svc.get_order(&id).await.unwrap();
        assert_eq!(refetched["status"], "delivered");
    }

    #[tokio::test]
    async fn unavailable_store_fails_data_operations_only() {
        let svc: OrderService<InMemoryStore> = OrderService::unavailable();

        let err = svc.list_orders(ListParams::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable));
        let err = svc.seed_demo_orders().await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable));
        let err = svc
            .get_order(&OrderId::generate().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unavailable));

        let diag = svc.diagnostics().await;
        assert_eq!(diag.connection_status, "Not Connected");
        assert!(diag.collections.is_empty());
    }

    #[tokio::test]
    async fn bad_paging_is_a_client_error() {
        let svc = seeded();
        let mut params = ListParams::default();
        params.page_size = 0;
        let err = svc.list_orders(params).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
