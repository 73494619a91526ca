//! Store repository

use std::sync::Arc;

use receipt_graph_core::graph::{GraphStore, NodeId, Properties, StoreResult, Value};
use receipt_graph_core::models::{labels, EdgeLabel, Product, Store};

use super::require_id;

/// Repository for store nodes.
///
/// Stores declare no unique key: they are fetched by node id or by a linear
/// (name, address) property match, treated as a composite natural key.
pub struct StoreRepository {
    store: Arc<dyn GraphStore>,
}

impl StoreRepository {
    /// Create a repository over the given store
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        StoreRepository { store }
    }

    /// Fetch a store by its node id
    pub async fn fetch(&self, id: NodeId) -> StoreResult<Option<Store>> {
        let record = self.store.get_node(id).await?;
        record
            .filter(|r| r.label == labels::STORE)
            .as_ref()
            .map(Store::from_record)
            .transpose()
    }

    /// Fetch a store by name and address equality, returning the first match
    pub async fn fetch_by_name_and_address(
        &self,
        name: &str,
        address: &str,
    ) -> StoreResult<Option<Store>> {
        let mut filters = Properties::new();
        filters.insert("name".to_string(), Value::from(name));
        filters.insert("address".to_string(), Value::from(address));

        let records = self.store.find_nodes(labels::STORE, &filters).await?;
        records.first().map(Store::from_record).transpose()
    }

    /// Persist a new store, assigning its id.
    ///
    /// Stores carry no declared key to merge on; an already-persisted store
    /// is left untouched.
    pub async fn save(&self, store: &mut Store) -> StoreResult<()> {
        if store.id.is_some() {
            return Ok(());
        }

        let id = self
            .store
            .create_node(labels::STORE, store.to_properties())
            .await?;

        store.id = Some(id);
        Ok(())
    }

    /// All stores
    pub async fn all(&self) -> StoreResult<Vec<Store>> {
        let records = self.store.find_nodes(labels::STORE, &Properties::new()).await?;
        records.iter().map(Store::from_record).collect()
    }

    /// List a product in the store's catalog
    pub async fn link_product(&self, store: &Store, product: &Product) -> StoreResult<()> {
        let store_id = require_id("Store", store.id)?;
        let product_id = require_id("Product", product.id)?;

        self.store
            .merge_edge(store_id, product_id, EdgeLabel::Sells.as_str())
            .await
    }

    /// The store's catalog: products reachable over SELLS edges
    pub async fn products(&self, store: &Store) -> StoreResult<Vec<Product>> {
        let store_id = require_id("Store", store.id)?;

        let related = self
            .store
            .outgoing(store_id, EdgeLabel::Sells.as_str())
            .await?;

        related
            .iter()
            .map(|(record, _)| Product::from_record(record))
            .collect()
    }
}
