//! Entity repositories
//!
//! One repository per entity type, each a thin mapping between a domain
//! entity and its graph node over a shared [`GraphStore`] handle. A fetch
//! returning `None` is never an error here; the workflow call sites that
//! require existence raise the not-found errors themselves.

mod customer;
mod product;
mod receipt;
mod store;

pub use customer::CustomerRepository;
pub use product::ProductRepository;
pub use receipt::ReceiptRepository;
pub use store::StoreRepository;

use receipt_graph_core::graph::{NodeId, StoreError, StoreResult};

/// The node id of an entity that must already be persisted
pub(crate) fn require_id(label: &'static str, id: Option<NodeId>) -> StoreResult<NodeId> {
    id.ok_or_else(|| StoreError::Malformed {
        label,
        detail: "entity has no node identifier; it was never persisted".to_string(),
    })
}
