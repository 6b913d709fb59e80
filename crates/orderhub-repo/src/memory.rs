use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use orderhub_types::domain::order::{OrderId, OrderStatus};
use orderhub_types::domain::query::{ListQuery, OrderFilter};
use orderhub_types::domain::value::{Document, Value, ID_FIELD};
use orderhub_types::ports::order_store::{OrderStore, PageResult, StoreError};

/// Fields covered by the free-text `q` filter.
const SEARCH_FIELDS: [&str; 3] = ["order_number", "customer_name", "email"];

#[derive(Clone, Default)]
pub struct InMemoryStore {
    map: Arc<DashMap<OrderId, Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(doc: &Document, filter: &OrderFilter) -> bool {
    if let Some(q) = &filter.q {
        let needle = q.to_lowercase();
        let hit = SEARCH_FIELDS.iter().any(|field| {
            doc.get_str(field)
                .is_some_and(|s| s.to_lowercase().contains(&needle))
        });
        if !hit {
            return false;
        }
    }
    if let Some(status) = &filter.status {
        if doc.get_str("status") != Some(status.as_str()) {
            return false;
        }
    }
    true
}

fn variant_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) => 2,
        Value::String(_) => 3,
        Value::Id(_) => 4,
        Value::Timestamp(_) => 5,
        Value::Array(_) => 6,
        Value::Object(_) => 7,
    }
}

fn value_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Id(x), Value::Id(y)) => x.cmp(y),
        (Value::Timestamp(x), Value::Timestamp(y)) => x.cmp(y),
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => variant_rank(a).cmp(&variant_rank(b)),
        },
    }
}

/// Missing fields sort before present ones, like a null sort key would.
fn sort_key_cmp(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => value_cmp(x, y),
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize, StoreError> {
        let count = docs.len();
        for mut doc in docs {
            let id = OrderId::generate();
            doc.insert(ID_FIELD, id.clone());
            self.map.insert(id, doc);
        }
        Ok(count)
    }

    async fn find_page(&self, query: &ListQuery) -> Result<PageResult, StoreError> {
        let mut docs: Vec<Document> = self
            .map
            .iter()
            .filter(|kv| matches(kv.value(), &query.filter))
            .map(|kv| kv.value().clone())
            .collect();

        let field = query.sort.field.as_str();
        docs.sort_by(|a, b| {
            let primary = sort_key_cmp(a.get(field), b.get(field));
            let primary = if query.sort.descending {
                primary.reverse()
            } else {
                primary
            };
            // Stable tie-break: id ascending.
            primary.then_with(|| a.id().cmp(&b.id()))
        });

        let total = docs.len() as u64;
        let items = docs
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit() as usize)
            .collect();
        Ok(PageResult { items, total })
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Document>, StoreError> {
        Ok(self.map.get(id).map(|kv| kv.value().clone()))
    }

    async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        if let Some(mut doc) = self.map.get_mut(id) {
            doc.insert("status", status.as_str());
            doc.insert("updated_at", updated_at);
            return Ok(true);
        }
        Ok(false)
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(vec!["order".to_string()])
    }
}
