//! # Receipt Graph Service
//!
//! The domain layer of Receipt Graph: per-entity repositories over a graph
//! store, the receipt-submission workflow, customer registration, and the
//! read-only query projections.

pub mod projection;
pub mod repository;
pub mod workflow;

pub use projection::{CustomerView, ProductView, QueryProjection, ReceiptView, StoreView};
pub use repository::{
    CustomerRepository, ProductRepository, ReceiptRepository, StoreRepository,
};
pub use workflow::{LineItemInput, ReceiptService, StoreInput};
