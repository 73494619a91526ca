//! Receipt repository

use std::sync::Arc;

use receipt_graph_core::graph::{GraphStore, NodeId, StoreError, StoreResult};
use receipt_graph_core::models::{labels, EdgeLabel, LineItem, Product, Receipt};

use super::require_id;

/// Repository for receipt nodes.
///
/// Receipts are created only through the customer save cascade; this
/// repository provides the read side.
pub struct ReceiptRepository {
    store: Arc<dyn GraphStore>,
}

impl ReceiptRepository {
    /// Create a repository over the given store
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        ReceiptRepository { store }
    }

    /// Fetch a receipt by its node id
    pub async fn fetch(&self, id: NodeId) -> StoreResult<Option<Receipt>> {
        let record = self.store.get_node(id).await?;
        record
            .filter(|r| r.label == labels::RECEIPT)
            .as_ref()
            .map(Receipt::from_record)
            .transpose()
    }

    /// The receipt's line items: products reachable over HAS edges, paired
    /// with the price and amount carried on each edge
    pub async fn products(&self, receipt: &Receipt) -> StoreResult<Vec<(Product, LineItem)>> {
        let receipt_id = require_id("Receipt", receipt.id)?;

        let related = self
            .store
            .outgoing(receipt_id, EdgeLabel::Has.as_str())
            .await?;

        let mut items = Vec::with_capacity(related.len());
        for (record, edge_props) in &related {
            let product = Product::from_record(record)?;
            let item = LineItem::from_properties(edge_props).ok_or_else(|| {
                StoreError::Malformed {
                    label: "Receipt",
                    detail: "line-item edge missing price or amount".to_string(),
                }
            })?;
            items.push((product, item));
        }
        Ok(items)
    }
}
