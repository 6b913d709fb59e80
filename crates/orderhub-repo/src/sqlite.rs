use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use orderhub_types::domain::order::{OrderId, OrderStatus};
use orderhub_types::domain::query::{ListQuery, OrderFilter, SortSpec};
use orderhub_types::domain::value::{Document, Value, ID_FIELD};
use orderhub_types::ports::order_store::{OrderStore, PageResult, StoreError};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

const COLUMNS: &str =
    "id, order_number, customer_name, email, status, total_amount, items_json, created_at, updated_at";

pub struct SqliteStore {
    pool: SqlitePool,
}

/// Fixed-column projection of an order document. Timestamps are stored as
/// RFC 3339 text with microsecond precision, which keeps lexicographic and
/// chronological order identical.
#[derive(FromRow)]
struct DbOrder {
    id: String,
    order_number: String,
    customer_name: String,
    email: String,
    status: String,
    total_amount: f64,
    items_json: String,
    created_at: String,
    updated_at: String,
}

fn db_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Db(e.to_string())
}

fn format_ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::Malformed(e.to_string()))
}

impl DbOrder {
    fn into_document(self) -> Result<Document, StoreError> {
        let id: OrderId = self
            .id
            .parse()
            .map_err(|e: orderhub_types::domain::order::ParseIdError| {
                StoreError::Malformed(e.to_string())
            })?;
        let items: serde_json::Value =
            serde_json::from_str(&self.items_json).map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(Document::new()
            .with(ID_FIELD, id)
            .with("order_number", self.order_number)
            .with("customer_name", self.customer_name)
            .with("email", self.email)
            .with("status", self.status)
            .with("total_amount", self.total_amount)
            .with("items", Value::from_json(items))
            .with("created_at", parse_ts(&self.created_at)?)
            .with("updated_at", parse_ts(&self.updated_at)?))
    }
}

/// Pull the columns out of an incoming document; fields the projection does
/// not know are dropped.
fn project(doc: &Document) -> Result<(String, String, String, String, f64, String, String, String), StoreError> {
    let field = |name: &str| {
        doc.get_str(name)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Malformed(format!("missing field: {name}")))
    };
    let total_amount = doc
        .get_f64("total_amount")
        .ok_or_else(|| StoreError::Malformed("missing field: total_amount".into()))?;
    let items = doc
        .get("items")
        .map(Value::to_wire)
        .unwrap_or(serde_json::Value::Array(Vec::new()));
    let items_json =
        serde_json::to_string(&items).map_err(|e| StoreError::Malformed(e.to_string()))?;
    let created_at = doc
        .get_timestamp("created_at")
        .ok_or_else(|| StoreError::Malformed("missing field: created_at".into()))?;
    let updated_at = doc
        .get_timestamp("updated_at")
        .ok_or_else(|| StoreError::Malformed("missing field: updated_at".into()))?;
    Ok((
        field("order_number")?,
        field("customer_name")?,
        field("email")?,
        field("status")?,
        total_amount,
        items_json,
        format_ts(created_at),
        format_ts(updated_at),
    ))
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// WHERE clause plus its bind values, in order.
///
/// SQLite's `lower()` folds ASCII only, so free-text matching is
/// case-insensitive for ASCII terms but case-sensitive for other scripts;
/// the memory adapter folds full Unicode.
fn filter_sql(filter: &OrderFilter) -> (String, Vec<String>) {
    let mut conds = Vec::new();
    let mut binds = Vec::new();
    if let Some(q) = &filter.q {
        let pattern = format!("%{}%", escape_like(&q.to_lowercase()));
        conds.push(
            "(lower(order_number) LIKE ? ESCAPE '\\' \
             OR lower(customer_name) LIKE ? ESCAPE '\\' \
             OR lower(email) LIKE ? ESCAPE '\\')",
        );
        binds.push(pattern.clone());
        binds.push(pattern.clone());
        binds.push(pattern);
    }
    if let Some(status) = &filter.status {
        conds.push("status = ?");
        binds.push(status.clone());
    }
    let clause = if conds.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conds.join(" AND "))
    };
    (clause, binds)
}

fn sort_column(field: &str) -> Option<&'static str> {
    match field {
        "order_number" => Some("order_number"),
        "customer_name" => Some("customer_name"),
        "email" => Some("email"),
        "status" => Some("status"),
        "total_amount" => Some("total_amount"),
        "created_at" => Some("created_at"),
        "updated_at" => Some("updated_at"),
        "id" | "_id" => Some("id"),
        _ => None,
    }
}

/// ORDER BY over a whitelisted column with an id tie-break; unknown sort
/// fields degrade to id-only ordering.
fn order_sql(sort: &SortSpec) -> String {
    let direction = if sort.descending { "DESC" } else { "ASC" };
    match sort_column(&sort.field) {
        Some("id") | None => " ORDER BY id ASC".to_string(),
        Some(column) => format!(" ORDER BY {column} {direction}, id ASC"),
    }
}

impl SqliteStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_orders.sql");
        sqlx::query(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn insert_many(&self, docs: Vec<Document>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let count = docs.len();
        for doc in &docs {
            let (order_number, customer_name, email, status, total_amount, items_json, created, updated) =
                project(doc)?;
            sqlx::query(
                "INSERT INTO orders (id, order_number, customer_name, email, status, total_amount, items_json, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(OrderId::generate().to_string())
            .bind(order_number)
            .bind(customer_name)
            .bind(email)
            .bind(status)
            .bind(total_amount)
            .bind(items_json)
            .bind(created)
            .bind(updated)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)?;
        Ok(count)
    }

    async fn find_page(&self, query: &ListQuery) -> Result<PageResult, StoreError> {
        let (where_sql, binds) = filter_sql(&query.filter);

        let count_sql = format!("SELECT COUNT(*) FROM orders{where_sql}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &binds {
            count_query = count_query.bind(bind.as_str());
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(db_err)?;

        let select_sql = format!(
            "SELECT {COLUMNS} FROM orders{where_sql}{} LIMIT ? OFFSET ?",
            order_sql(&query.sort)
        );
        let mut select = sqlx::query_as::<_, DbOrder>(&select_sql);
        for bind in &binds {
            select = select.bind(bind.as_str());
        }
        let rows = select
            .bind(query.limit() as i64)
            .bind(query.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let items = rows
            .into_iter()
            .map(DbOrder::into_document)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResult {
            items,
            total: total as u64,
        })
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Document>, StoreError> {
        let row: Option<DbOrder> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        row.map(DbOrder::into_document).transpose()
    }

    async fn set_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(format_ts(updated_at))
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(names)
    }
}
