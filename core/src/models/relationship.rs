//! Relationship model
//!
//! Typed, directed, labeled edges between entities. Most edges carry no
//! properties; the line-item edge between a receipt and a product carries
//! the unit price and quantity of that purchase.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::graph::{Properties, Value};

/// Labels of the relationships between graph entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeLabel {
    /// Store → Product: catalog listing
    Sells,

    /// Store → Receipt: the store emitted this receipt
    Emitted,

    /// Receipt → Product (with price and amount) and Customer → Receipt
    Has,

    /// Customer → Store: the customer has shopped at this store
    GoesTo,
}

impl EdgeLabel {
    /// The label as stored on the relationship
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeLabel::Sells => "SELLS",
            EdgeLabel::Emitted => "EMITTED",
            EdgeLabel::Has => "HAS",
            EdgeLabel::GoesTo => "GOES_TO",
        }
    }
}

impl Display for EdgeLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a receipt: the unit price and quantity of a purchased
/// product, carried as the properties of the receipt's HAS edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unit price of the product at purchase time
    pub price: f64,

    /// Number of units purchased
    pub amount: i64,
}

impl LineItem {
    /// Create a new line item
    pub fn new(price: f64, amount: i64) -> Self {
        LineItem { price, amount }
    }

    /// The line total: unit price times quantity
    pub fn total(&self) -> f64 {
        self.price * self.amount as f64
    }

    /// Project the line item into edge properties
    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert("price".to_string(), Value::from(self.price));
        props.insert("amount".to_string(), Value::from(self.amount));
        props
    }

    /// Read a line item back from edge properties
    pub fn from_properties(props: &Properties) -> Option<Self> {
        let price = props.get("price").and_then(Value::as_float)?;
        let amount = props.get("amount").and_then(Value::as_int)?;
        Some(LineItem { price, amount })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_labels() {
        assert_eq!(EdgeLabel::Sells.as_str(), "SELLS");
        assert_eq!(EdgeLabel::Emitted.as_str(), "EMITTED");
        assert_eq!(EdgeLabel::Has.as_str(), "HAS");
        assert_eq!(EdgeLabel::GoesTo.as_str(), "GOES_TO");
        assert_eq!(EdgeLabel::GoesTo.to_string(), "GOES_TO");
    }

    #[test]
    fn test_line_item_total() {
        assert_eq!(LineItem::new(2.5, 2).total(), 5.0);
        assert_eq!(LineItem::new(1.0, 3).total(), 3.0);
        assert_eq!(LineItem::new(0.0, 10).total(), 0.0);
    }

    #[test]
    fn test_line_item_properties() {
        let item = LineItem::new(4.75, 2);

        let props = item.to_properties();
        assert_eq!(props.get("price").and_then(Value::as_float), Some(4.75));
        assert_eq!(props.get("amount").and_then(Value::as_int), Some(2));

        let read = LineItem::from_properties(&props).unwrap();
        assert_eq!(read, item);
    }

    #[test]
    fn test_line_item_from_incomplete_properties() {
        let mut props = Properties::new();
        props.insert("price".to_string(), Value::from(4.75));

        // Missing amount
        assert!(LineItem::from_properties(&props).is_none());
    }
}
