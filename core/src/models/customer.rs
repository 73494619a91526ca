//! Customer entity
//!
//! Customers are keyed globally by email, the only way to look one up. A
//! customer's scalar fields never change after registration; the entity is
//! mutated only by attaching new receipt and store edges, which are pushed
//! in a single save.

use serde::{Deserialize, Serialize};

use crate::graph::{NodeId, NodeRecord, Properties, StoreError, StoreResult, Value};
use crate::models::{Receipt, Store};

/// A registered customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-assigned node identifier, absent until persisted
    pub id: Option<NodeId>,

    /// Globally unique customer email
    pub email: String,

    /// Customer display name
    pub name: String,

    /// Receipts pending persistence as HAS edges
    receipts: Vec<Receipt>,

    /// Stores pending persistence as GOES_TO edges
    stores: Vec<Store>,
}

impl Customer {
    /// Create a new, not-yet-persisted customer
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Customer {
            id: None,
            email: email.into(),
            name: name.into(),
            receipts: Vec::new(),
            stores: Vec::new(),
        }
    }

    /// Read a customer back from a stored node record
    pub fn from_record(record: &NodeRecord) -> StoreResult<Self> {
        let email = record
            .get_str("email")
            .ok_or_else(|| StoreError::Malformed {
                label: "Customer",
                detail: "missing property \"email\"".to_string(),
            })?;
        let name = record.get_str("name").ok_or_else(|| StoreError::Malformed {
            label: "Customer",
            detail: "missing property \"name\"".to_string(),
        })?;

        Ok(Customer {
            id: Some(record.id),
            email: email.to_string(),
            name: name.to_string(),
            receipts: Vec::new(),
            stores: Vec::new(),
        })
    }

    /// Project the customer's fields into node properties
    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert("email".to_string(), Value::from(self.email.clone()));
        props.insert("name".to_string(), Value::from(self.name.clone()));
        props
    }

    /// Attach a receipt, pending persistence as a HAS edge
    pub fn add_receipt(&mut self, receipt: Receipt) {
        self.receipts.push(receipt);
    }

    /// Attach a store, pending persistence as a GOES_TO edge
    pub fn add_store(&mut self, store: Store) {
        self.stores.push(store);
    }

    /// Receipts attached since the last save
    pub fn pending_receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Mutable access to pending receipts, so a save can assign their ids
    pub fn pending_receipts_mut(&mut self) -> &mut [Receipt] {
        &mut self.receipts
    }

    /// Stores attached since the last save
    pub fn pending_stores(&self) -> &[Store] {
        &self.stores
    }

    /// Drop the pending edge lists once a save has pushed them
    pub fn clear_pending(&mut self) {
        self.receipts.clear();
        self.stores.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_round_trip() {
        let customer = Customer::new("Jane", "jane@example.com");

        let record = NodeRecord {
            id: NodeId(5),
            label: "Customer".to_string(),
            properties: customer.to_properties(),
        };

        let read = Customer::from_record(&record).unwrap();
        assert_eq!(read.id, Some(NodeId(5)));
        assert_eq!(read.email, "jane@example.com");
        assert_eq!(read.name, "Jane");
    }

    #[test]
    fn test_customer_without_email_is_malformed() {
        let mut properties = Properties::new();
        properties.insert("name".to_string(), Value::from("Jane"));

        let record = NodeRecord {
            id: NodeId(5),
            label: "Customer".to_string(),
            properties,
        };

        assert!(Customer::from_record(&record).is_err());
    }

    #[test]
    fn test_pending_edges() {
        let mut customer = Customer::new("Jane", "jane@example.com");
        assert!(customer.pending_receipts().is_empty());
        assert!(customer.pending_stores().is_empty());

        customer.add_store(Store::new("Corner Shop", "1 High Street"));
        customer.add_receipt(Receipt::new(8.0, "24/12/2023 18:30").unwrap());

        assert_eq!(customer.pending_receipts().len(), 1);
        assert_eq!(customer.pending_stores().len(), 1);

        customer.clear_pending();
        assert!(customer.pending_receipts().is_empty());
        assert!(customer.pending_stores().is_empty());
    }
}
