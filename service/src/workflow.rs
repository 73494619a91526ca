//! Receipt submission workflow
//!
//! The write side of the service: customer registration and the
//! receipt-submission workflow. A submission runs a verification chain
//! (customer, then every product, then the store), aggregates the line
//! items into a total, rejects duplicates, and pushes the whole new
//! relationship set through a single customer save.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use receipt_graph_core::error::{DomainError, Result};
use receipt_graph_core::graph::GraphStore;
use receipt_graph_core::models::{Customer, LineItem, Receipt};

use crate::repository::{CustomerRepository, ProductRepository, StoreRepository};

/// One submitted line item: a product name with its unit price and quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemInput {
    /// Name of an existing product
    pub name: String,

    /// Unit price paid
    pub price: f64,

    /// Number of units bought
    pub amount: i64,
}

/// The store a receipt was submitted for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInput {
    /// Store name
    pub name: String,

    /// Store address
    pub address: String,
}

/// The write-side service: registration and receipt submission
pub struct ReceiptService {
    customers: CustomerRepository,
    products: ProductRepository,
    stores: StoreRepository,
}

impl ReceiptService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        ReceiptService {
            customers: CustomerRepository::new(store.clone()),
            products: ProductRepository::new(store.clone()),
            stores: StoreRepository::new(store),
        }
    }

    /// Register a customer.
    ///
    /// Registration is an idempotent upsert on email: registering an
    /// already-known email merges into the existing node and overwrites the
    /// name.
    pub async fn register_customer(&self, name: &str, email: &str) -> Result<Customer> {
        let mut customer = Customer::new(name, email);
        self.customers.save(&mut customer).await?;

        info!(email = %customer.email, "customer registered");
        Ok(customer)
    }

    /// Submit a receipt for a registered customer.
    ///
    /// Each step is a hard precondition for the next: the customer is
    /// resolved first, every line-item product must exist (accumulating the
    /// receipt total on the way), the store must exist, the timestamp must
    /// parse, and no identical receipt may already exist for this customer.
    /// Only then is the relationship set built and pushed, in one save.
    pub async fn submit_receipt(
        &self,
        customer_email: &str,
        line_items: &[LineItemInput],
        store: &StoreInput,
        timestamp: &str,
    ) -> Result<()> {
        // Step 1: resolve the customer owning this submission
        let mut customer = self
            .customers
            .fetch(customer_email)
            .await?
            .ok_or_else(|| DomainError::CustomerNotFound(customer_email.to_string()))?;

        // Step 2: verify every product, accumulating the total and binding
        // each resolved product to its line item
        let mut total_amount = 0.0;
        let mut verified = Vec::with_capacity(line_items.len());
        for input in line_items {
            let product = self
                .products
                .fetch(&input.name)
                .await?
                .ok_or_else(|| DomainError::ProductNotFound(input.name.clone()))?;

            total_amount += input.price * input.amount as f64;
            verified.push((product, LineItem::new(input.price, input.amount)));
        }

        // Step 3: verify the store by name and address
        let resolved_store = self
            .stores
            .fetch_by_name_and_address(&store.name, &store.address)
            .await?
            .ok_or_else(|| DomainError::StoreNotFound(store.name.clone()))?;

        // Step 4: build the receipt candidate; the timestamp is validated
        // here, before the duplicate check and before anything is persisted
        let mut receipt = Receipt::new(total_amount, timestamp)?;

        // Step 5: reject a receipt this customer already owns
        if self
            .customers
            .has_matching_receipt(&customer, &receipt)
            .await?
        {
            warn!(email = %customer.email, timestamp, "duplicate receipt rejected");
            return Err(DomainError::DuplicateReceipt);
        }

        // Steps 6 and 7: attach the line-item edges, then the store and
        // customer edges
        for (product, item) in verified {
            receipt.add_line_item(product, item);
        }
        receipt.set_emitting_store(resolved_store.clone());
        customer.add_store(resolved_store);
        customer.add_receipt(receipt);

        // Step 8: one save pushes the receipt node and every new edge
        self.customers.save(&mut customer).await?;

        info!(
            email = %customer.email,
            timestamp,
            total_amount,
            "receipt submitted"
        );
        Ok(())
    }
}
