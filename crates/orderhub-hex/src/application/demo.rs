//! Fixed demo batch for exercising the admin UI. Repeated seeding duplicates
//! these records; nothing enforces order_number uniqueness.

use chrono::{DateTime, Utc};
use orderhub_types::domain::value::Document;

fn item(product_name: &str, quantity: i64, price: f64) -> Document {
    Document::new()
        .with("product_name", product_name)
        .with("quantity", quantity)
        .with("price", price)
}

pub fn demo_orders(now: DateTime<Utc>) -> Vec<Document> {
    vec![
        Document::new()
            .with("order_number", "ORD-1001")
            .with("customer_name", "Ava Nguyen")
            .with("email", "ava@example.com")
            .with("status", "pending")
            .with("total_amount", 89.5)
            .with(
                "items",
                vec![
                    item("Velvet Matte Lipstick", 1, 24.5),
                    item("Hydra Glow Serum", 1, 65.0),
                ],
            )
            .with("created_at", now)
            .with("updated_at", now),
        Document::new()
            .with("order_number", "ORD-1002")
            .with("customer_name", "Liam Patel")
            .with("email", "liam@example.com")
            .with("status", "processing")
            .with("total_amount", 42.0)
            .with("items", vec![item("Silk Finish Foundation", 1, 42.0)])
            .with("created_at", now)
            .with("updated_at", now),
        Document::new()
            .with("order_number", "ORD-1003")
            .with("customer_name", "Maya Khan")
            .with("email", "maya@example.com")
            .with("status", "shipped")
            .with("total_amount", 120.0)
            .with(
                "items",
                vec![
                    item("Radiant Blush Palette", 1, 55.0),
                    item("Ultra Define Mascara", 2, 32.5),
                ],
            )
            .with("created_at", now)
            .with("updated_at", now),
    ]
}
