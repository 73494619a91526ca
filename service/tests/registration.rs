//! Tests of customer registration and its upsert semantics.

mod common;

use common::harness;
use receipt_graph_core::error::DomainError;

#[tokio::test]
async fn registration_returns_a_persisted_customer() {
    let h = harness();

    let customer = h
        .service
        .register_customer("Jane", "jane@example.com")
        .await
        .unwrap();

    assert_eq!(customer.name, "Jane");
    assert_eq!(customer.email, "jane@example.com");
    assert!(customer.id.is_some());
    assert_eq!(h.store.node_count(), 1);
}

#[tokio::test]
async fn re_registration_overwrites_instead_of_duplicating() {
    let h = harness();

    let first = h
        .service
        .register_customer("Jane", "jane@example.com")
        .await
        .unwrap();
    let second = h
        .service
        .register_customer("Jane Doe", "jane@example.com")
        .await
        .unwrap();

    // Same email merges into the same node; the name is overwritten
    assert_eq!(first.id, second.id);
    assert_eq!(h.store.node_count(), 1);

    let view = h.projection.get_customer("jane@example.com").await.unwrap();
    assert_eq!(view.name, "Jane Doe");
}

#[tokio::test]
async fn distinct_emails_register_distinct_customers() {
    let h = harness();

    let jane = h
        .service
        .register_customer("Jane", "jane@example.com")
        .await
        .unwrap();
    let june = h
        .service
        .register_customer("June", "june@example.com")
        .await
        .unwrap();

    assert_ne!(jane.id, june.id);
    assert_eq!(h.store.node_count(), 2);
}

#[tokio::test]
async fn lookup_of_unregistered_email_fails() {
    let h = harness();

    let err = h
        .projection
        .get_customer("ghost@example.com")
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::CustomerNotFound(_)));
}
