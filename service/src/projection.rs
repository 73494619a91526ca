//! Query projections
//!
//! The read side of the service: plain, serializable views over stored
//! entities and their edges. Everything here consumes read-only repository
//! operations; nothing in this module saves or submits.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use receipt_graph_core::error::{DomainError, Result};
use receipt_graph_core::graph::GraphStore;
use receipt_graph_core::models::{LineItem, Product, Receipt, Store};

use crate::repository::{
    require_id, CustomerRepository, ProductRepository, ReceiptRepository, StoreRepository,
};

/// A product as rendered to callers.
///
/// When the product appears as a receipt line item, the price and amount of
/// that purchase are carried along; in catalog listings they are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    /// Product name
    pub name: String,

    /// Product brand
    pub brand: Option<String>,

    /// Product category
    pub category: Option<String>,

    /// Unit price, when viewed as a line item
    pub price: Option<f64>,

    /// Quantity, when viewed as a line item
    pub amount: Option<i64>,
}

impl ProductView {
    /// Project a catalog product
    pub fn from_product(product: &Product) -> Self {
        ProductView {
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            price: None,
            amount: None,
        }
    }

    /// Project a product together with its line-item price and amount
    pub fn from_line_item(product: &Product, item: &LineItem) -> Self {
        ProductView {
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            price: Some(item.price),
            amount: Some(item.amount),
        }
    }
}

/// A store as rendered to callers, with its catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreView {
    /// Store node id
    pub id: i64,

    /// Store name
    pub name: String,

    /// Store address
    pub address: String,

    /// Products the store sells
    pub products: Vec<ProductView>,
}

/// A receipt as rendered to callers, with its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptView {
    /// Receipt node id
    pub id: i64,

    /// Receipt total
    pub total_amount: f64,

    /// Purchase timestamp
    pub timestamp: String,

    /// Line items with their price and amount
    pub products: Vec<ProductView>,
}

/// A customer as rendered to callers, with stores, receipts and products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerView {
    /// Customer email
    pub email: String,

    /// Customer name
    pub name: String,

    /// Stores the customer has shopped at
    pub stores: Vec<StoreView>,

    /// Receipts the customer owns
    pub receipts: Vec<ReceiptView>,

    /// Distinct products across the customer's receipts
    pub products: Vec<ProductView>,
}

/// The read-side service: projections over stored entities and edges
pub struct QueryProjection {
    customers: CustomerRepository,
    products: ProductRepository,
    receipts: ReceiptRepository,
    stores: StoreRepository,
}

impl QueryProjection {
    /// Create a projection layer over the given store
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        QueryProjection {
            customers: CustomerRepository::new(store.clone()),
            products: ProductRepository::new(store.clone()),
            receipts: ReceiptRepository::new(store.clone()),
            stores: StoreRepository::new(store),
        }
    }

    /// Render a customer with stores, receipts and products views
    pub async fn get_customer(&self, email: &str) -> Result<CustomerView> {
        let customer = self
            .customers
            .fetch(email)
            .await?
            .ok_or_else(|| DomainError::CustomerNotFound(email.to_string()))?;

        let mut stores = Vec::new();
        for store in self.customers.stores(&customer).await? {
            stores.push(self.store_view(&store).await?);
        }

        let mut receipts = Vec::new();
        let mut products = Vec::new();
        let mut seen = HashSet::new();
        for receipt in self.customers.receipts(&customer).await? {
            let view = self.receipt_view(&receipt).await?;

            // The customer's product view is the distinct union of line-item
            // products, in first-seen order
            for item in &view.products {
                if seen.insert(item.name.clone()) {
                    products.push(ProductView {
                        price: None,
                        amount: None,
                        ..item.clone()
                    });
                }
            }
            receipts.push(view);
        }

        Ok(CustomerView {
            email: customer.email,
            name: customer.name,
            stores,
            receipts,
            products,
        })
    }

    /// Render every store with its catalog
    pub async fn list_stores(&self) -> Result<Vec<StoreView>> {
        let mut views = Vec::new();
        for store in self.stores.all().await? {
            views.push(self.store_view(&store).await?);
        }
        Ok(views)
    }

    /// Render every product
    pub async fn list_products(&self) -> Result<Vec<ProductView>> {
        let products = self.products.all().await?;
        Ok(products.iter().map(ProductView::from_product).collect())
    }

    async fn store_view(&self, store: &Store) -> Result<StoreView> {
        let id = require_id("Store", store.id)?;

        let products = self
            .stores
            .products(store)
            .await?
            .iter()
            .map(ProductView::from_product)
            .collect();

        Ok(StoreView {
            id: id.0,
            name: store.name.clone(),
            address: store.address.clone(),
            products,
        })
    }

    async fn receipt_view(&self, receipt: &Receipt) -> Result<ReceiptView> {
        let id = require_id("Receipt", receipt.id)?;

        let products = self
            .receipts
            .products(receipt)
            .await?
            .iter()
            .map(|(product, item)| ProductView::from_line_item(product, item))
            .collect();

        Ok(ReceiptView {
            id: id.0,
            total_amount: receipt.total_amount,
            timestamp: receipt.timestamp.clone(),
            products,
        })
    }
}
