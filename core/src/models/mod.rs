//! Domain models for the receipt graph
//!
//! This module provides the four graph entities (products, stores, receipts
//! and customers) and the relationship model connecting them.

mod customer;
mod product;
mod receipt;
mod relationship;
mod store;

pub use customer::Customer;
pub use product::Product;
pub use receipt::{parse_timestamp, Receipt, TIMESTAMP_FORMAT};
pub use relationship::{EdgeLabel, LineItem};
pub use store::Store;

/// Node labels for the graph entities
pub mod labels {
    /// Label for product nodes
    pub const PRODUCT: &str = "Product";

    /// Label for store nodes
    pub const STORE: &str = "Store";

    /// Label for receipt nodes
    pub const RECEIPT: &str = "Receipt";

    /// Label for customer nodes
    pub const CUSTOMER: &str = "Customer";
}
