use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    serve, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::errors::AppError;
use orderhub_types::domain::query::{ListParams, OrderPage};
use orderhub_types::ports::order_store::OrderStore;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
    pub database_url_set: bool,
    pub database_name_set: bool,
}

pub struct HttpServer<R>
where
    R: OrderStore,
{
    pub service: Arc<OrderService<R>>,
    pub config: HttpServerConfig,
}

struct AppState<R: OrderStore> {
    service: Arc<OrderService<R>>,
    env: HttpServerConfig,
}

impl<R: OrderStore> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            env: self.env.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl<R> HttpServer<R>
where
    R: OrderStore,
{
    pub async fn new(service: OrderService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        // Fully permissive CORS with credentials. Wildcards cannot be
        // combined with allow-credentials, so origin/methods/headers mirror
        // the request instead.
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true);

        let state = AppState {
            service: self.service.clone(),
            env: self.config.clone(),
        };

        Router::new()
            .route("/", get(root))
            .route("/api/hello", get(hello))
            .route("/test", get(diagnostics::<R>))
            .route("/api/orders", get(list_orders::<R>))
            .route("/api/orders/seed", post(seed_orders::<R>))
            .route("/api/orders/{id}", get(get_order::<R>))
            .route("/api/orders/{id}/status", patch(update_status::<R>))
            .layer(cors)
            .layer(trace_layer)
            .with_state(state)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn root() -> Json<JsonValue> {
    Json(json!({ "message": "Hello from the orders backend!" }))
}

async fn hello() -> Json<JsonValue> {
    Json(json!({ "message": "Hello from the backend API!" }))
}

async fn diagnostics<R>(State(state): State<AppState<R>>) -> Json<JsonValue>
where
    R: OrderStore,
{
    let diag = state.service.diagnostics().await;
    Json(json!({
        "backend": "running",
        "database": diag.database,
        "database_url": if state.env.database_url_set { "set" } else { "not set" },
        "database_name": if state.env.database_name_set { "set" } else { "not set" },
        "connection_status": diag.connection_status,
        "collections": diag.collections,
    }))
}

async fn list_orders<R>(
    State(state): State<AppState<R>>,
    Query(params): Query<ListParams>,
) -> Result<Json<OrderPage>, AppError>
where
    R: OrderStore,
{
    let page = state.service.list_orders(params).await?;
    Ok(Json(page))
}

async fn get_order<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<JsonValue>, AppError>
where
    R: OrderStore,
{
    let order = state.service.get_order(&id).await?;
    Ok(Json(order))
}

async fn update_status<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<JsonValue>, AppError>
where
    R: OrderStore,
{
    let order = state.service.update_status(&id, &payload.status).await?;
    Ok(Json(order))
}

async fn seed_orders<R>(State(state): State<AppState<R>>) -> Result<Json<JsonValue>, AppError>
where
    R: OrderStore,
{
    let inserted = state.service.seed_demo_orders().await?;
    Ok(Json(json!({ "inserted": inserted })))
}
