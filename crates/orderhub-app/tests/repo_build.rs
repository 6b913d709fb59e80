use orderhub_repo::{build_repo, Repo};
use orderhub_types::domain::query::ListParams;
use orderhub_types::ports::order_store::OrderStore;

#[tokio::test]
async fn builds_sqlite_repo_from_url() {
    // Use a temp DB path for isolation.
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("orders-test.db");
    let url = format!("sqlite://{}", db_path.display());

    let repo: Repo = build_repo(Some(&url))
        .await
        .expect("build repo")
        .expect("store available");

    // Basic sanity: an empty listing succeeds.
    let query = ListParams::default().into_query().unwrap();
    let page = repo.find_page(&query).await.expect("find_page");
    assert_eq!(page.total, 0);
    assert!(page.items.is_empty());
}
