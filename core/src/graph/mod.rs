//! Graph store adapter contract
//!
//! This module defines the contract between the domain layer and the
//! underlying property-graph database: node and relationship records, the
//! pattern object used for relationship-existence queries, and the
//! [`GraphStore`] trait every backend implements.

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod value;

pub use value::{Properties, Value, ValueType};

/// Error type for graph store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failure establishing or using the store connection
    #[error("connection error: {0}")]
    Connection(String),

    /// A statement was rejected or failed mid-flight
    #[error("query error: {0}")]
    Query(String),

    /// A fetched record is missing or mistypes an expected property
    #[error("malformed {label} record: {detail}")]
    Malformed {
        /// Node label of the offending record
        label: &'static str,
        /// What was missing or mistyped
        detail: String,
    },
}

/// Result type for graph store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// An identifier for a node, assigned by the graph store at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// A plain projection of a stored node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Store-assigned node identifier
    pub id: NodeId,

    /// Node label
    pub label: String,

    /// Node properties
    pub properties: Properties,
}

impl NodeRecord {
    /// Get a text property by name
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Get a numeric property by name, widening integers
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_float)
    }

    /// Get an integer property by name
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.properties.get(key).and_then(Value::as_int)
    }
}

/// A relationship-existence pattern: an edge with the given label between a
/// node matching `from` and a node matching `to`, all by property equality.
///
/// This is the first-class form of the duplicate-receipt check; backends
/// bind every property as a statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePattern {
    /// Label of the source node
    pub from_label: &'static str,

    /// Property-equality filters on the source node
    pub from_props: Properties,

    /// Relationship label
    pub edge_label: &'static str,

    /// Label of the target node
    pub to_label: &'static str,

    /// Property-equality filters on the target node
    pub to_props: Properties,
}

/// Operations every graph store backend provides.
///
/// The production backend speaks Bolt to a Neo4j server; an in-memory
/// backend exists for testing without a running database. All operations are
/// single round-trips; nothing here opens a multi-statement transaction.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Fetch a node by its store-assigned identifier
    async fn get_node(&self, id: NodeId) -> StoreResult<Option<NodeRecord>>;

    /// Find all nodes with the given label matching every property filter.
    /// An empty filter map matches every node with the label.
    async fn find_nodes(&self, label: &str, filters: &Properties) -> StoreResult<Vec<NodeRecord>>;

    /// Create or update a node keyed by label plus one property: if a node
    /// with the key value exists its remaining properties are overwritten,
    /// otherwise a new node is created. Returns the node identifier.
    async fn merge_node(
        &self,
        label: &str,
        key: (&str, Value),
        props: Properties,
    ) -> StoreResult<NodeId>;

    /// Create a new node with no uniqueness key. Returns the node identifier.
    async fn create_node(&self, label: &str, props: Properties) -> StoreResult<NodeId>;

    /// Create a relationship with properties between two existing nodes
    async fn create_edge(
        &self,
        from: NodeId,
        to: NodeId,
        label: &str,
        props: Properties,
    ) -> StoreResult<()>;

    /// Create a propertyless relationship between two existing nodes unless
    /// an identical one already exists
    async fn merge_edge(&self, from: NodeId, to: NodeId, label: &str) -> StoreResult<()>;

    /// Whether at least one relationship matches the pattern
    async fn edge_exists(&self, pattern: &EdgePattern) -> StoreResult<bool>;

    /// All nodes reachable from `from` over an outgoing relationship with
    /// the given label, paired with the relationship's properties
    async fn outgoing(
        &self,
        from: NodeId,
        label: &str,
    ) -> StoreResult<Vec<(NodeRecord, Properties)>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_record_accessors() {
        let mut properties = Properties::new();
        properties.insert("name".to_string(), Value::from("milk"));
        properties.insert("price".to_string(), Value::from(2.5f64));
        properties.insert("amount".to_string(), Value::from(3i64));

        let record = NodeRecord {
            id: NodeId(7),
            label: "Product".to_string(),
            properties,
        };

        assert_eq!(record.get_str("name"), Some("milk"));
        assert_eq!(record.get_float("price"), Some(2.5));
        assert_eq!(record.get_int("amount"), Some(3));

        // Integer properties widen through get_float
        assert_eq!(record.get_float("amount"), Some(3.0));

        // Absent properties read as None
        assert_eq!(record.get_str("brand"), None);
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Connection("connection refused".to_string());
        assert_eq!(err.to_string(), "connection error: connection refused");

        let err = StoreError::Malformed {
            label: "Receipt",
            detail: "missing property \"timestamp\"".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed Receipt record: missing property \"timestamp\""
        );
    }
}
