//! Tests of the read-only query projections: catalog listings and the
//! customer view assembled from GOES_TO, HAS and line-item edges.

mod common;

use common::{harness, seed_catalog_entry, seed_product, seed_store};
use receipt_graph_service::{LineItemInput, StoreInput};

fn item(name: &str, price: f64, amount: i64) -> LineItemInput {
    LineItemInput {
        name: name.to_string(),
        price,
        amount,
    }
}

#[tokio::test]
async fn list_products_renders_the_catalog() {
    let h = harness();
    seed_product(&h, "milk", "Dairyco", "dairy").await;
    seed_product(&h, "bread", "Bakerly", "bakery").await;

    let mut products = h.projection.list_products().await.unwrap();
    products.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "bread");
    assert_eq!(products[0].brand.as_deref(), Some("Bakerly"));

    // Catalog products carry no line-item price or amount
    assert!(products[0].price.is_none());
    assert!(products[0].amount.is_none());
}

#[tokio::test]
async fn list_stores_includes_their_catalogs() {
    let h = harness();
    let milk = seed_product(&h, "milk", "Dairyco", "dairy").await;
    let bread = seed_product(&h, "bread", "Bakerly", "bakery").await;
    let shop = seed_store(&h, "Corner Shop", "1 High Street").await;
    seed_store(&h, "Megamart", "9 Broad Way").await;

    seed_catalog_entry(&h, &shop, &milk).await;
    seed_catalog_entry(&h, &shop, &bread).await;

    let mut stores = h.projection.list_stores().await.unwrap();
    stores.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].name, "Corner Shop");
    assert_eq!(stores[0].products.len(), 2);
    assert_eq!(stores[1].name, "Megamart");
    assert!(stores[1].products.is_empty());
}

#[tokio::test]
async fn customer_view_walks_stores_receipts_and_products() {
    let h = harness();
    seed_product(&h, "milk", "Dairyco", "dairy").await;
    seed_product(&h, "bread", "Bakerly", "bakery").await;
    seed_store(&h, "Corner Shop", "1 High Street").await;
    seed_store(&h, "Megamart", "9 Broad Way").await;
    h.service.register_customer("Jane", "jane@example.com").await.unwrap();

    let corner = StoreInput {
        name: "Corner Shop".to_string(),
        address: "1 High Street".to_string(),
    };
    let megamart = StoreInput {
        name: "Megamart".to_string(),
        address: "9 Broad Way".to_string(),
    };

    h.service
        .submit_receipt(
            "jane@example.com",
            &[item("milk", 2.5, 2)],
            &corner,
            "24/12/2023 18:30",
        )
        .await
        .unwrap();
    h.service
        .submit_receipt(
            "jane@example.com",
            &[item("milk", 2.4, 1), item("bread", 1.0, 3)],
            &megamart,
            "26/12/2023 10:05",
        )
        .await
        .unwrap();

    let view = h.projection.get_customer("jane@example.com").await.unwrap();

    assert_eq!(view.email, "jane@example.com");
    assert_eq!(view.name, "Jane");
    assert_eq!(view.stores.len(), 2);
    assert_eq!(view.receipts.len(), 2);

    // Products are the distinct union over the receipts' line items
    let mut names: Vec<_> = view.products.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["bread", "milk"]);
}

#[tokio::test]
async fn revisiting_a_store_keeps_one_goes_to_edge() {
    let h = harness();
    seed_product(&h, "milk", "Dairyco", "dairy").await;
    seed_store(&h, "Corner Shop", "1 High Street").await;
    h.service.register_customer("Jane", "jane@example.com").await.unwrap();

    let corner = StoreInput {
        name: "Corner Shop".to_string(),
        address: "1 High Street".to_string(),
    };

    h.service
        .submit_receipt(
            "jane@example.com",
            &[item("milk", 2.5, 2)],
            &corner,
            "24/12/2023 18:30",
        )
        .await
        .unwrap();
    h.service
        .submit_receipt(
            "jane@example.com",
            &[item("milk", 2.5, 1)],
            &corner,
            "25/12/2023 09:00",
        )
        .await
        .unwrap();

    let view = h.projection.get_customer("jane@example.com").await.unwrap();
    assert_eq!(view.receipts.len(), 2);
    assert_eq!(view.stores.len(), 1);
}

#[tokio::test]
async fn receipt_view_carries_submitted_prices_and_amounts() {
    let h = harness();
    seed_product(&h, "milk", "Dairyco", "dairy").await;
    seed_product(&h, "bread", "Bakerly", "bakery").await;
    seed_store(&h, "Corner Shop", "1 High Street").await;
    h.service.register_customer("Jane", "jane@example.com").await.unwrap();

    h.service
        .submit_receipt(
            "jane@example.com",
            &[item("milk", 2.5, 2), item("bread", 1.0, 3)],
            &StoreInput {
                name: "Corner Shop".to_string(),
                address: "1 High Street".to_string(),
            },
            "24/12/2023 18:30",
        )
        .await
        .unwrap();

    let view = h.projection.get_customer("jane@example.com").await.unwrap();
    let receipt = &view.receipts[0];

    assert_eq!(receipt.timestamp, "24/12/2023 18:30");

    let mut products = receipt.products.clone();
    products.sort_by(|a, b| a.name.cmp(&b.name));

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "bread");
    assert_eq!(products[0].price, Some(1.0));
    assert_eq!(products[0].amount, Some(3));
    assert_eq!(products[1].name, "milk");
    assert_eq!(products[1].price, Some(2.5));
    assert_eq!(products[1].amount, Some(2));
}

#[tokio::test]
async fn views_serialize_to_plain_records() {
    let h = harness();
    seed_product(&h, "milk", "Dairyco", "dairy").await;
    seed_store(&h, "Corner Shop", "1 High Street").await;
    h.service.register_customer("Jane", "jane@example.com").await.unwrap();

    h.service
        .submit_receipt(
            "jane@example.com",
            &[item("milk", 2.5, 2)],
            &StoreInput {
                name: "Corner Shop".to_string(),
                address: "1 High Street".to_string(),
            },
            "24/12/2023 18:30",
        )
        .await
        .unwrap();

    let view = h.projection.get_customer("jane@example.com").await.unwrap();
    let json = serde_json::to_value(&view).unwrap();

    assert_eq!(json["email"], "jane@example.com");
    assert_eq!(json["receipts"][0]["total_amount"], 5.0);
    assert_eq!(json["receipts"][0]["products"][0]["name"], "milk");
    assert!(json["stores"][0]["id"].is_i64());
}
