//! Product entity
//!
//! Products are created out-of-band and are read-only from the submission
//! workflow's perspective; the workflow never creates a product implicitly.

use serde::{Deserialize, Serialize};

use crate::graph::{NodeId, NodeRecord, Properties, StoreError, StoreResult, Value};

/// A product, keyed globally by its unique name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned node identifier, absent until persisted
    pub id: Option<NodeId>,

    /// Globally unique product name
    pub name: String,

    /// Product brand
    pub brand: Option<String>,

    /// Product category
    pub category: Option<String>,
}

impl Product {
    /// Create a new, not-yet-persisted product
    pub fn new(
        name: impl Into<String>,
        brand: Option<String>,
        category: Option<String>,
    ) -> Self {
        Product {
            id: None,
            name: name.into(),
            brand,
            category,
        }
    }

    /// Read a product back from a stored node record
    pub fn from_record(record: &NodeRecord) -> StoreResult<Self> {
        let name = record.get_str("name").ok_or_else(|| StoreError::Malformed {
            label: "Product",
            detail: "missing property \"name\"".to_string(),
        })?;

        Ok(Product {
            id: Some(record.id),
            name: name.to_string(),
            brand: record.get_str("brand").map(str::to_string),
            category: record.get_str("category").map(str::to_string),
        })
    }

    /// Project the product's fields into node properties
    pub fn to_properties(&self) -> Properties {
        let mut props = Properties::new();
        props.insert("name".to_string(), Value::from(self.name.clone()));
        if let Some(brand) = &self.brand {
            props.insert("brand".to_string(), Value::from(brand.clone()));
        }
        if let Some(category) = &self.category {
            props.insert("category".to_string(), Value::from(category.clone()));
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_round_trip() {
        let product = Product::new(
            "oat milk",
            Some("Oately".to_string()),
            Some("dairy".to_string()),
        );

        let record = NodeRecord {
            id: NodeId(3),
            label: "Product".to_string(),
            properties: product.to_properties(),
        };

        let read = Product::from_record(&record).unwrap();
        assert_eq!(read.id, Some(NodeId(3)));
        assert_eq!(read.name, "oat milk");
        assert_eq!(read.brand.as_deref(), Some("Oately"));
        assert_eq!(read.category.as_deref(), Some("dairy"));
    }

    #[test]
    fn test_product_without_name_is_malformed() {
        let record = NodeRecord {
            id: NodeId(3),
            label: "Product".to_string(),
            properties: Properties::new(),
        };

        assert!(Product::from_record(&record).is_err());
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let product = Product::new("bread", None, None);
        let props = product.to_properties();

        assert!(props.contains_key("name"));
        assert!(!props.contains_key("brand"));
        assert!(!props.contains_key("category"));
    }
}
