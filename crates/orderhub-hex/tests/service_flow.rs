use orderhub_hex::application::order_service::OrderService;
use orderhub_repo::memory::InMemoryStore;
use orderhub_types::domain::query::ListParams;

// End-to-end service flow against the in-memory adapter.
#[tokio::test]
async fn seed_list_filter_update_flow() {
    let svc = OrderService::new(InMemoryStore::new());

    let inserted = svc.seed_demo_orders().await.unwrap();
    assert_eq!(inserted, 3);

    let all = svc.list_orders(ListParams::default()).await.unwrap();
    assert_eq!(all.total, 3);

    let mut params = ListParams::default();
    params.status = Some("shipped".into());
    let shipped = svc.list_orders(params).await.unwrap();
    assert_eq!(shipped.total, 1);
    assert_eq!(shipped.items[0]["order_number"], "ORD-1003");

    let mut params = ListParams::default();
    params.q = Some("maya".into());
    let found = svc.list_orders(params).await.unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0]["customer_name"], "Maya Khan");

    let mut params = ListParams::default();
    params.q = Some("ORD-1002".into());
    let id = svc.list_orders(params).await.unwrap().items[0]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let updated = svc.update_status(&id, "delivered").await.unwrap();
    assert_eq!(updated["status"], "delivered");

    let fetched = svc.get_order(&id).await.unwrap();
    assert_eq!(fetched["status"], "delivered");
    assert!(fetched["updated_at"].as_str().unwrap() > fetched["created_at"].as_str().unwrap());
}

// Seeding twice duplicates records; nothing deduplicates order numbers.
#[tokio::test]
async fn seeding_is_not_idempotent() {
    let svc = OrderService::new(InMemoryStore::new());
    svc.seed_demo_orders().await.unwrap();
    svc.seed_demo_orders().await.unwrap();

    let all = svc.list_orders(ListParams::default()).await.unwrap();
    assert_eq!(all.total, 6);

    let mut params = ListParams::default();
    params.q = Some("ord-1001".into());
    let dupes = svc.list_orders(params).await.unwrap();
    assert_eq!(dupes.total, 2);
}
