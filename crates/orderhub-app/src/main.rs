use orderhub_hex::application::order_service::OrderService;
use orderhub_hex::config::Config;
use orderhub_hex::inbound::http::{HttpServer, HttpServerConfig};
use orderhub_repo::build_repo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / DATABASE_NAME / PORT when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;

    // A missing or broken store is tolerated: the process serves liveness
    // and diagnostics while data endpoints answer with server errors.
    let service = match build_repo(config.database_url.as_deref()).await {
        Ok(Some(repo)) => OrderService::new(repo),
        Ok(None) => {
            tracing::warn!("DATABASE_URL not set; store unavailable");
            OrderService::unavailable()
        }
        Err(e) => {
            tracing::warn!(error = %e, "store initialization failed; store unavailable");
            OrderService::unavailable()
        }
    };

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
        database_url_set: config.database_url.is_some(),
        database_name_set: config.database_name.is_some(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
