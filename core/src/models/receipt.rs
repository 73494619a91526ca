//! Receipt entity
//!
//! A receipt is created exactly once per successful submission and is
//! immutable thereafter. Its total amount is derived from its line items,
//! never supplied by the caller, and its timestamp must parse under the
//! fixed `dd/mm/yyyy hh:mm` format before anything is persisted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::graph::{NodeId, NodeRecord, Properties, StoreError, StoreResult, Value};
use crate::models::{LineItem, Product, Store};

/// The required receipt timestamp format, `dd/mm/yyyy hh:mm`
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// A purchase receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Store-assigned node identifier, absent until persisted
    pub id: Option<NodeId>,

    /// Sum over line items of unit price times quantity
    pub total_amount: f64,

    /// Purchase timestamp in `dd/mm/yyyy hh:mm` format
    pub timestamp: String,

    /// Line items pending persistence as HAS edges
    line_items: Vec<(Product, LineItem)>,

    /// Store pending persistence as the EMITTED edge source
    emitting_store: Option<Store>,
}

impl Receipt {
    /// Create a new, not-yet-persisted receipt.
    ///
    /// The timestamp is validated here, before any duplicate check or
    /// persistence can happen.
    pub fn new(total_amount: f64, timestamp: impl Into<String>) -> Result<Self> {
        let timestamp = timestamp.into();
        parse_timestamp(&timestamp)?;

        Ok(Receipt {
            id: None,
            total_amount,
            timestamp,
            line_items: Vec::new(),
            emitting_store: None,
        })
    }

    /// Read a receipt back from a stored node record.
    ///
    /// Stored timestamps are not re-validated; validation happens on the
    /// write path only.
    pub fn from_record(record: &NodeRecord) -> StoreResult<Self> {
        let total_amount =
            record
                .get_float("total_amount")
                .ok_or_else(|| StoreError::Malformed {
                    label: "Receipt",
                    detail: "missing property \"total_amount\"".to_string(),
                })?;
        let timestamp = record
            .get_str("timestamp")
            .ok_or_else(|| StoreError::Malformed {
                label: "Receipt",
                detail: "missing property \"timestamp\"".to_string(),
            })?;

        Ok(Receipt {
            id: Some(record.id),
            total_amount,
            timestamp: timestamp.to_string(),
            line_items: Vec::new(),
            emitting_store: None,
        })
    }

    /// Project the receipt's fields into node properties
    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert("total_amount".to_string(), Value::from(self.total_amount));
        props.insert("timestamp".to_string(), Value::from(self.timestamp.clone()));
        props
    }

    /// Whether the receipt has already been pushed to the store
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Attach a verified product as a line item of this receipt
    pub fn add_line_item(&mut self, product: Product, item: LineItem) {
        self.line_items.push((product, item));
    }

    /// The line items attached to this receipt
    pub fn line_items(&self) -> &[(Product, LineItem)] {
        &self.line_items
    }

    /// Record the store that emitted this receipt
    pub fn set_emitting_store(&mut self, store: Store) {
        self.emitting_store = Some(store);
    }

    /// The store that emitted this receipt, if attached
    pub fn emitting_store(&self) -> Option<&Store> {
        self.emitting_store.as_ref()
    }
}

/// Parse a timestamp under the required `dd/mm/yyyy hh:mm` format
pub fn parse_timestamp(timestamp: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
        .map_err(|_| DomainError::InvalidTimestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_timestamp() {
        let receipt = Receipt::new(8.0, "24/12/2023 18:30").unwrap();
        assert_eq!(receipt.timestamp, "24/12/2023 18:30");
        assert_eq!(receipt.total_amount, 8.0);
        assert!(!receipt.is_persisted());
    }

    #[test]
    fn test_invalid_timestamp_is_rejected() {
        // ISO date, out-of-range day and month
        assert!(matches!(
            Receipt::new(8.0, "2024-13-40"),
            Err(DomainError::InvalidTimestamp)
        ));

        // Right shape, impossible date
        assert!(matches!(
            Receipt::new(8.0, "31/02/2024 10:00"),
            Err(DomainError::InvalidTimestamp)
        ));

        // Missing time component
        assert!(matches!(
            Receipt::new(8.0, "24/12/2023"),
            Err(DomainError::InvalidTimestamp)
        ));
    }

    #[test]
    fn test_receipt_round_trip() {
        let receipt = Receipt::new(12.5, "01/06/2024 09:15").unwrap();

        let record = NodeRecord {
            id: NodeId(42),
            label: "Receipt".to_string(),
            properties: receipt.to_properties(),
        };

        let read = Receipt::from_record(&record).unwrap();
        assert_eq!(read.id, Some(NodeId(42)));
        assert_eq!(read.total_amount, 12.5);
        assert_eq!(read.timestamp, "01/06/2024 09:15");
        assert!(read.is_persisted());
    }

    #[test]
    fn test_line_item_attachment() {
        let mut receipt = Receipt::new(5.0, "24/12/2023 18:30").unwrap();
        let product = Product::new("milk", None, None);

        receipt.add_line_item(product, LineItem::new(2.5, 2));

        assert_eq!(receipt.line_items().len(), 1);
        assert_eq!(receipt.line_items()[0].1.total(), 5.0);
    }

    #[test]
    fn test_emitting_store_attachment() {
        let mut receipt = Receipt::new(5.0, "24/12/2023 18:30").unwrap();
        assert!(receipt.emitting_store().is_none());

        receipt.set_emitting_store(Store::new("Corner Shop", "1 High Street"));
        assert_eq!(receipt.emitting_store().unwrap().name, "Corner Shop");
    }
}
