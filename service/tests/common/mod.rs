//! Shared test harness: the service and projection layers wired to an
//! in-memory graph store, plus helpers for out-of-band catalog seeding.

#![allow(dead_code)]

use std::sync::Arc;

use receipt_graph_core::graph::GraphStore;
use receipt_graph_core::models::{Product, Store};
use receipt_graph_service::{
    ProductRepository, QueryProjection, ReceiptService, StoreRepository,
};
use receipt_graph_store::InMemoryStore;

pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub graph: Arc<dyn GraphStore>,
    pub service: ReceiptService,
    pub projection: QueryProjection,
}

pub fn harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let store = Arc::new(InMemoryStore::new());
    let graph: Arc<dyn GraphStore> = store.clone();

    Harness {
        store,
        graph: graph.clone(),
        service: ReceiptService::new(graph.clone()),
        projection: QueryProjection::new(graph),
    }
}

/// Create a product out-of-band, the way the catalog is maintained
pub async fn seed_product(h: &Harness, name: &str, brand: &str, category: &str) -> Product {
    let mut product = Product::new(name, Some(brand.to_string()), Some(category.to_string()));
    ProductRepository::new(h.graph.clone())
        .save(&mut product)
        .await
        .unwrap();
    product
}

/// Create a store out-of-band
pub async fn seed_store(h: &Harness, name: &str, address: &str) -> Store {
    let mut store = Store::new(name, address);
    StoreRepository::new(h.graph.clone())
        .save(&mut store)
        .await
        .unwrap();
    store
}

/// List a product in a store's catalog
pub async fn seed_catalog_entry(h: &Harness, store: &Store, product: &Product) {
    StoreRepository::new(h.graph.clone())
        .link_product(store, product)
        .await
        .unwrap();
}
