//! Customer repository

use std::sync::Arc;

use tracing::debug;

use receipt_graph_core::graph::{
    EdgePattern, GraphStore, Properties, StoreResult, Value,
};
use receipt_graph_core::models::{labels, Customer, EdgeLabel, Receipt, Store};

use super::require_id;

/// Repository for customer nodes, keyed by their unique email.
///
/// Saving a customer is the single durability checkpoint of the submission
/// workflow: the node is merged by email and every attached edge, including
/// newly created receipt nodes and their line-item edges, is pushed in the
/// same call.
pub struct CustomerRepository {
    store: Arc<dyn GraphStore>,
}

impl CustomerRepository {
    /// Create a repository over the given store
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        CustomerRepository { store }
    }

    /// Fetch a customer by email, returning the first match
    pub async fn fetch(&self, email: &str) -> StoreResult<Option<Customer>> {
        let mut filters = Properties::new();
        filters.insert("email".to_string(), Value::from(email));

        let records = self.store.find_nodes(labels::CUSTOMER, &filters).await?;
        records.first().map(Customer::from_record).transpose()
    }

    /// Create or update the customer node and push every pending edge.
    ///
    /// The node merges on email, so saving twice is an upsert. Attached
    /// stores become GOES_TO edges, attached receipts become new receipt
    /// nodes with their line-item HAS edges, the emitting store's EMITTED
    /// edge and the customer's own HAS edge. Receipts that already carry an
    /// id are left untouched.
    pub async fn save(&self, customer: &mut Customer) -> StoreResult<()> {
        let customer_id = self
            .store
            .merge_node(
                labels::CUSTOMER,
                ("email", Value::from(customer.email.clone())),
                customer.to_properties(),
            )
            .await?;
        customer.id = Some(customer_id);

        for store in customer.pending_stores() {
            let store_id = require_id("Store", store.id)?;
            self.store
                .merge_edge(customer_id, store_id, EdgeLabel::GoesTo.as_str())
                .await?;
        }

        for receipt in customer.pending_receipts_mut() {
            if receipt.is_persisted() {
                continue;
            }

            let receipt_id = self
                .store
                .create_node(labels::RECEIPT, receipt.to_properties())
                .await?;

            for (product, item) in receipt.line_items() {
                let product_id = require_id("Product", product.id)?;
                self.store
                    .create_edge(
                        receipt_id,
                        product_id,
                        EdgeLabel::Has.as_str(),
                        item.to_properties(),
                    )
                    .await?;
            }

            if let Some(store) = receipt.emitting_store() {
                let store_id = require_id("Store", store.id)?;
                self.store
                    .create_edge(store_id, receipt_id, EdgeLabel::Emitted.as_str(), Properties::new())
                    .await?;
            }

            self.store
                .merge_edge(customer_id, receipt_id, EdgeLabel::Has.as_str())
                .await?;

            receipt.id = Some(receipt_id);
        }

        debug!(email = %customer.email, "customer saved");
        customer.clear_pending();
        Ok(())
    }

    /// Whether the customer already owns a receipt with the same timestamp
    /// and total amount.
    ///
    /// This is a point-in-time read with no locking: it and the following
    /// save are separate round-trips, so two concurrent identical
    /// submissions can both pass this check.
    pub async fn has_matching_receipt(
        &self,
        customer: &Customer,
        receipt: &Receipt,
    ) -> StoreResult<bool> {
        let mut from_props = Properties::new();
        from_props.insert("email".to_string(), Value::from(customer.email.clone()));

        let mut to_props = Properties::new();
        to_props.insert("timestamp".to_string(), Value::from(receipt.timestamp.clone()));
        to_props.insert("total_amount".to_string(), Value::from(receipt.total_amount));

        let pattern = EdgePattern {
            from_label: labels::CUSTOMER,
            from_props,
            edge_label: EdgeLabel::Has.as_str(),
            to_label: labels::RECEIPT,
            to_props,
        };

        self.store.edge_exists(&pattern).await
    }

    /// Stores the customer has shopped at, over GOES_TO edges
    pub async fn stores(&self, customer: &Customer) -> StoreResult<Vec<Store>> {
        let customer_id = require_id("Customer", customer.id)?;

        let related = self
            .store
            .outgoing(customer_id, EdgeLabel::GoesTo.as_str())
            .await?;

        related
            .iter()
            .map(|(record, _)| Store::from_record(record))
            .collect()
    }

    /// Receipts the customer owns, over HAS edges
    pub async fn receipts(&self, customer: &Customer) -> StoreResult<Vec<Receipt>> {
        let customer_id = require_id("Customer", customer.id)?;

        let related = self
            .store
            .outgoing(customer_id, EdgeLabel::Has.as_str())
            .await?;

        related
            .iter()
            .map(|(record, _)| Receipt::from_record(record))
            .collect()
    }
}
