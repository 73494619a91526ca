//! In-memory graph store
//!
//! A [`GraphStore`] backend holding the whole graph in process memory, for
//! testing the domain layer without a running Neo4j server. Semantics track
//! the Neo4j backend: merges match on label plus key property, edges connect
//! existing nodes only, and ids are assigned sequentially.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use receipt_graph_core::graph::{
    EdgePattern, GraphStore, NodeId, NodeRecord, Properties, StoreError, StoreResult, Value,
};

/// A stored relationship
#[derive(Debug, Clone)]
struct EdgeRecord {
    from: NodeId,
    to: NodeId,
    label: String,
    properties: Properties,
}

/// The graph held behind the store's lock
#[derive(Debug, Default)]
struct GraphData {
    next_id: i64,
    nodes: HashMap<i64, NodeRecord>,
    edges: Vec<EdgeRecord>,
}

/// An in-memory graph store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<GraphData>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes currently stored
    pub fn node_count(&self) -> usize {
        self.lock().map(|data| data.nodes.len()).unwrap_or(0)
    }

    /// Number of relationships currently stored
    pub fn edge_count(&self) -> usize {
        self.lock().map(|data| data.edges.len()).unwrap_or(0)
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, GraphData>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Connection("store lock poisoned".to_string()))
    }
}

/// Whether a node matches every property filter by equality
fn matches(record: &NodeRecord, filters: &Properties) -> bool {
    filters
        .iter()
        .all(|(key, value)| record.properties.get(key) == Some(value))
}

#[async_trait]
impl GraphStore for InMemoryStore {
    async fn get_node(&self, id: NodeId) -> StoreResult<Option<NodeRecord>> {
        let data = self.lock()?;
        Ok(data.nodes.get(&id.0).cloned())
    }

    async fn find_nodes(&self, label: &str, filters: &Properties) -> StoreResult<Vec<NodeRecord>> {
        let data = self.lock()?;

        let mut records: Vec<NodeRecord> = data
            .nodes
            .values()
            .filter(|record| record.label == label && matches(record, filters))
            .cloned()
            .collect();

        // Stable order for callers that list everything
        records.sort_by_key(|record| record.id.0);
        Ok(records)
    }

    async fn merge_node(
        &self,
        label: &str,
        key: (&str, Value),
        props: Properties,
    ) -> StoreResult<NodeId> {
        let mut data = self.lock()?;

        let existing = data
            .nodes
            .values()
            .find(|record| {
                record.label == label && record.properties.get(key.0) == Some(&key.1)
            })
            .map(|record| record.id);

        match existing {
            Some(id) => {
                let record = data
                    .nodes
                    .get_mut(&id.0)
                    .ok_or_else(|| StoreError::Query("node vanished during merge".to_string()))?;
                record.properties.extend(props);
                record
                    .properties
                    .insert(key.0.to_string(), key.1);
                Ok(id)
            }
            None => {
                let id = NodeId(data.next_id);
                data.next_id += 1;

                let mut properties = props;
                properties.insert(key.0.to_string(), key.1);

                data.nodes.insert(
                    id.0,
                    NodeRecord {
                        id,
                        label: label.to_string(),
                        properties,
                    },
                );
                Ok(id)
            }
        }
    }

    async fn create_node(&self, label: &str, props: Properties) -> StoreResult<NodeId> {
        let mut data = self.lock()?;

        let id = NodeId(data.next_id);
        data.next_id += 1;

        data.nodes.insert(
            id.0,
            NodeRecord {
                id,
                label: label.to_string(),
                properties: props,
            },
        );
        Ok(id)
    }

    async fn create_edge(
        &self,
        from: NodeId,
        to: NodeId,
        label: &str,
        props: Properties,
    ) -> StoreResult<()> {
        let mut data = self.lock()?;

        if !data.nodes.contains_key(&from.0) || !data.nodes.contains_key(&to.0) {
            return Err(StoreError::Query(format!(
                "{} edge endpoints not found ({} -> {})",
                label, from, to
            )));
        }

        data.edges.push(EdgeRecord {
            from,
            to,
            label: label.to_string(),
            properties: props,
        });
        Ok(())
    }

    async fn merge_edge(&self, from: NodeId, to: NodeId, label: &str) -> StoreResult<()> {
        let mut data = self.lock()?;

        if !data.nodes.contains_key(&from.0) || !data.nodes.contains_key(&to.0) {
            return Err(StoreError::Query(format!(
                "{} edge endpoints not found ({} -> {})",
                label, from, to
            )));
        }

        let exists = data
            .edges
            .iter()
            .any(|edge| edge.from == from && edge.to == to && edge.label == label);

        if !exists {
            data.edges.push(EdgeRecord {
                from,
                to,
                label: label.to_string(),
                properties: Properties::new(),
            });
        }
        Ok(())
    }

    async fn edge_exists(&self, pattern: &EdgePattern) -> StoreResult<bool> {
        let data = self.lock()?;

        let found = data.edges.iter().any(|edge| {
            if edge.label != pattern.edge_label {
                return false;
            }

            let from = match data.nodes.get(&edge.from.0) {
                Some(node) => node,
                None => return false,
            };
            let to = match data.nodes.get(&edge.to.0) {
                Some(node) => node,
                None => return false,
            };

            from.label == pattern.from_label
                && to.label == pattern.to_label
                && matches(from, &pattern.from_props)
                && matches(to, &pattern.to_props)
        });

        Ok(found)
    }

    async fn outgoing(
        &self,
        from: NodeId,
        label: &str,
    ) -> StoreResult<Vec<(NodeRecord, Properties)>> {
        let data = self.lock()?;

        let mut results = Vec::new();
        for edge in data
            .edges
            .iter()
            .filter(|edge| edge.from == from && edge.label == label)
        {
            if let Some(node) = data.nodes.get(&edge.to.0) {
                results.push((node.clone(), edge.properties.clone()));
            }
        }
        Ok(results)
    }
}
