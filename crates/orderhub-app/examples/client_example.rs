///  To run :
///  cargo r --example client_example
use orderhub_client::OrdersClient;
use orderhub_hex::application::order_service::OrderService;
use orderhub_hex::inbound::http::{HttpServer, HttpServerConfig};
use orderhub_repo::build_repo;
use orderhub_types::domain::query::ListParams;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start server on an ephemeral port with a throwaway database.
    let port = find_free_port();
    let dir = tempdir()?;
    let url = format!("sqlite://{}", dir.path().join("orders-demo.db").display());
    let repo = build_repo(Some(&url)).await?.expect("store available");

    let server = HttpServer::new(
        OrderService::new(repo),
        HttpServerConfig {
            port: port.to_string(),
            database_url_set: true,
            database_name_set: false,
        },
    )
    .await?;
    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = OrdersClient::new(&format!("http://127.0.0.1:{port}"))?;

    let seeded = client.seed_orders().await?;
    println!("seeded {} demo orders", seeded.inserted);

    let mut params = ListParams::default();
    params.status = Some("shipped".into());
    let page = client.list_orders(&params).await?;
    println!("shipped orders: {}", page.total);

    let id = page.items[0]["id"].as_str().expect("id").to_string();
    let updated = client.update_status(&id, "delivered").await?;
    println!("order {} now {}", updated["order_number"], updated["status"]);

    let fetched = client.get_order(&id).await?;
    println!("updated_at: {}", fetched["updated_at"]);

    handle.abort();
    Ok(())
}
