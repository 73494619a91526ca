//! Product repository

use std::sync::Arc;

use receipt_graph_core::graph::{GraphStore, Properties, StoreResult, Value};
use receipt_graph_core::models::{labels, Product};

/// Repository for product nodes, keyed by their unique name
pub struct ProductRepository {
    store: Arc<dyn GraphStore>,
}

impl ProductRepository {
    /// Create a repository over the given store
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        ProductRepository { store }
    }

    /// Fetch a product by name, returning the first match
    pub async fn fetch(&self, name: &str) -> StoreResult<Option<Product>> {
        let mut filters = Properties::new();
        filters.insert("name".to_string(), Value::from(name));

        let records = self.store.find_nodes(labels::PRODUCT, &filters).await?;
        records.first().map(Product::from_record).transpose()
    }

    /// Create or update a product, keyed by name, assigning its id
    pub async fn save(&self, product: &mut Product) -> StoreResult<()> {
        let id = self
            .store
            .merge_node(
                labels::PRODUCT,
                ("name", Value::from(product.name.clone())),
                product.to_properties(),
            )
            .await?;

        product.id = Some(id);
        Ok(())
    }

    /// All products
    pub async fn all(&self) -> StoreResult<Vec<Product>> {
        let records = self.store.find_nodes(labels::PRODUCT, &Properties::new()).await?;
        records.iter().map(Product::from_record).collect()
    }
}
