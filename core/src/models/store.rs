//! Store entity
//!
//! Stores declare no unique key; they are identified by their node id and
//! looked up by (name, address) equality, a composite natural key without a
//! declared uniqueness constraint. Like products, stores are created
//! out-of-band and read-only from the workflow's perspective.

use serde::{Deserialize, Serialize};

use crate::graph::{NodeId, NodeRecord, Properties, StoreError, StoreResult, Value};

/// A store customers shop at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Store-assigned node identifier, absent until persisted
    pub id: Option<NodeId>,

    /// Store name
    pub name: String,

    /// Store address
    pub address: String,
}

impl Store {
    /// Create a new, not-yet-persisted store
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Store {
            id: None,
            name: name.into(),
            address: address.into(),
        }
    }

    /// Read a store back from a stored node record
    pub fn from_record(record: &NodeRecord) -> StoreResult<Self> {
        let name = record.get_str("name").ok_or_else(|| StoreError::Malformed {
            label: "Store",
            detail: "missing property \"name\"".to_string(),
        })?;
        let address = record
            .get_str("address")
            .ok_or_else(|| StoreError::Malformed {
                label: "Store",
                detail: "missing property \"address\"".to_string(),
            })?;

        Ok(Store {
            id: Some(record.id),
            name: name.to_string(),
            address: address.to_string(),
        })
    }

    /// Project the store's fields into node properties
    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert("name".to_string(), Value::from(self.name.clone()));
        props.insert("address".to_string(), Value::from(self.address.clone()));
        props
    }
}
