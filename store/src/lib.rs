//! Graph store backends for Receipt Graph
//!
//! This crate provides the two implementations of the core
//! [`GraphStore`](receipt_graph_core::GraphStore) contract:
//! a Neo4j-backed store speaking Bolt, and an in-memory store for
//! testing without a running database.

pub mod memory;
pub mod neo4j;

pub use memory::InMemoryStore;
pub use neo4j::Neo4jStore;
