//! # Receipt Graph Core
//!
//! Core domain model and graph-store contract for the Receipt Graph service.
//! This crate provides the entities, the relationship model, the error
//! taxonomy and the configuration shared by the store adapters and the
//! service layer.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod graph;
pub mod models;

/// Re-export common types for ease of use
pub use config::{SettingsError, StoreSettings};
pub use error::{DomainError, Result};
pub use graph::{
    EdgePattern, GraphStore, NodeId, NodeRecord, Properties, StoreError, StoreResult, Value,
};
pub use models::{Customer, EdgeLabel, LineItem, Product, Receipt, Store};

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
