//! Neo4j-backed graph store
//!
//! This module implements the [`GraphStore`] contract over a Bolt connection
//! to a Neo4j server. Every statement is parameterized: property values are
//! always bound as statement parameters, and identifiers (labels, property
//! keys), which Cypher cannot parameterize, are validated before they are
//! spliced into statement text.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Node, Query, Relation};
use tracing::debug;

use receipt_graph_core::config::StoreSettings;
use receipt_graph_core::graph::{
    EdgePattern, GraphStore, NodeId, NodeRecord, Properties, StoreError, StoreResult, Value,
};
use receipt_graph_core::models::labels;

/// A graph store speaking Bolt to a Neo4j server.
///
/// The underlying [`Graph`] handle pools connections internally and is safe
/// to share across tasks.
pub struct Neo4jStore {
    graph: Graph,
}

impl Neo4jStore {
    /// Connect to the server described by the settings
    pub async fn connect(settings: &StoreSettings) -> StoreResult<Self> {
        let config = ConfigBuilder::default()
            .uri(settings.uri().as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str())
            .db(settings.database.as_str())
            .fetch_size(settings.fetch_size)
            .max_connections(settings.max_connections)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        debug!(uri = %settings.uri(), "connected to graph store");

        Ok(Neo4jStore { graph })
    }

    /// Ensure the uniqueness constraints behind the declared entity keys.
    ///
    /// Safe to run on every startup; the statements use IF NOT EXISTS.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let statements = [
            format!(
                "CREATE CONSTRAINT product_name_unique IF NOT EXISTS \
                 FOR (p:{}) REQUIRE p.name IS UNIQUE",
                labels::PRODUCT
            ),
            format!(
                "CREATE CONSTRAINT customer_email_unique IF NOT EXISTS \
                 FOR (c:{}) REQUIRE c.email IS UNIQUE",
                labels::CUSTOMER
            ),
        ];

        for statement in statements {
            self.graph
                .run(query(&statement))
                .await
                .map_err(query_error)?;
        }

        debug!("graph schema constraints ensured");
        Ok(())
    }
}

/// Map a driver failure on an open connection to a query error
fn query_error(e: neo4rs::Error) -> StoreError {
    StoreError::Query(e.to_string())
}

/// Whether a name is usable as a label or property key in statement text.
///
/// Cypher cannot bind identifiers as parameters, so anything spliced into a
/// statement must pass this check.
fn valid_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Reject a name that cannot be safely spliced into statement text
fn check_identifier(name: &str) -> StoreResult<()> {
    if valid_identifier(name) {
        Ok(())
    } else {
        Err(StoreError::Query(format!("invalid identifier: {:?}", name)))
    }
}

/// Bind prepared parameters onto a statement.
///
/// Domain properties are scalar; null values are never bound.
fn with_params(mut q: Query, params: &[(String, Value)]) -> Query {
    for (key, value) in params {
        q = match value {
            Value::Str(v) => q.param(key, v.clone()),
            Value::Int(v) => q.param(key, *v),
            Value::Float(v) => q.param(key, *v),
            Value::Bool(v) => q.param(key, *v),
            Value::Null => q,
        };
    }
    q
}

/// The fixed property schema per node label.
///
/// Entity field sets are known at compile time, so node projection reads
/// exactly these keys instead of reflecting over the wire representation.
fn node_properties(label: &str) -> &'static [&'static str] {
    match label {
        labels::PRODUCT => &["name", "brand", "category"],
        labels::STORE => &["name", "address"],
        labels::RECEIPT => &["total_amount", "timestamp"],
        labels::CUSTOMER => &["email", "name"],
        _ => &[],
    }
}

/// Read one property off a driver node, trying the scalar types this domain
/// stores
fn decode_value(node: &Node, key: &str) -> Option<Value> {
    node.get::<String>(key)
        .ok()
        .map(Value::Str)
        .or_else(|| node.get::<i64>(key).ok().map(Value::Int))
        .or_else(|| node.get::<f64>(key).ok().map(Value::Float))
        .or_else(|| node.get::<bool>(key).ok().map(Value::Bool))
}

/// Project a driver node into a [`NodeRecord`]
fn node_record(node: &Node) -> NodeRecord {
    let label = node
        .labels()
        .first()
        .map(|l| l.to_string())
        .unwrap_or_default();

    let mut properties = Properties::new();
    for key in node_properties(&label) {
        if let Some(value) = decode_value(node, key) {
            properties.insert((*key).to_string(), value);
        }
    }

    NodeRecord {
        id: NodeId(node.id()),
        label,
        properties,
    }
}

/// Project a driver relationship's properties.
///
/// Line-item edges are the only propertied relationships in this domain.
fn relation_properties(relation: &Relation) -> Properties {
    let mut properties = Properties::new();
    if let Ok(price) = relation.get::<f64>("price") {
        properties.insert("price".to_string(), Value::Float(price));
    }
    if let Ok(amount) = relation.get::<i64>("amount") {
        properties.insert("amount".to_string(), Value::Int(amount));
    }
    properties
}

/// Statement builders.
///
/// Pure functions from inputs to (statement text, prepared parameters), kept
/// separate from the driver so the exact match semantics stay unit-testable.
mod statements {
    use super::*;

    /// Property filters sorted by key, for deterministic statement text
    fn sorted(props: &Properties) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = props.iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// `WHERE` conjunction over property equality, binding `$<prefix>_<key>`
    fn equality_clause(
        var: &str,
        prefix: &str,
        props: &Properties,
        params: &mut Vec<(String, Value)>,
    ) -> StoreResult<String> {
        let mut terms = Vec::new();
        for (key, value) in sorted(props) {
            check_identifier(key)?;
            let param = format!("{}_{}", prefix, key);
            terms.push(format!("{}.{} = ${}", var, key, param));
            params.push((param, value.clone()));
        }
        Ok(terms.join(" AND "))
    }

    /// `SET` clause over the given properties, binding `$p_<key>`
    fn set_clause(
        var: &str,
        props: &Properties,
        params: &mut Vec<(String, Value)>,
    ) -> StoreResult<String> {
        let mut terms = Vec::new();
        for (key, value) in sorted(props) {
            check_identifier(key)?;
            let param = format!("p_{}", key);
            terms.push(format!("{}.{} = ${}", var, key, param));
            params.push((param, value.clone()));
        }
        Ok(terms.join(", "))
    }

    pub(super) fn get_node() -> String {
        "MATCH (n) WHERE id(n) = $id RETURN n".to_string()
    }

    pub(super) fn find_nodes(
        label: &str,
        filters: &Properties,
    ) -> StoreResult<(String, Vec<(String, Value)>)> {
        check_identifier(label)?;

        let mut params = Vec::new();
        let clause = equality_clause("n", "f", filters, &mut params)?;

        let text = if clause.is_empty() {
            format!("MATCH (n:{}) RETURN n", label)
        } else {
            format!("MATCH (n:{}) WHERE {} RETURN n", label, clause)
        };

        Ok((text, params))
    }

    pub(super) fn merge_node(
        label: &str,
        key: &str,
        props: &Properties,
    ) -> StoreResult<(String, Vec<(String, Value)>)> {
        check_identifier(label)?;
        check_identifier(key)?;

        let mut params = Vec::new();
        let clause = set_clause("n", props, &mut params)?;

        let text = if clause.is_empty() {
            format!("MERGE (n:{} {{{}: $key}}) RETURN n", label, key)
        } else {
            format!(
                "MERGE (n:{} {{{}: $key}}) SET {} RETURN n",
                label, key, clause
            )
        };

        Ok((text, params))
    }

    pub(super) fn create_node(
        label: &str,
        props: &Properties,
    ) -> StoreResult<(String, Vec<(String, Value)>)> {
        check_identifier(label)?;

        let mut params = Vec::new();
        let clause = set_clause("n", props, &mut params)?;

        let text = if clause.is_empty() {
            format!("CREATE (n:{}) RETURN n", label)
        } else {
            format!("CREATE (n:{}) SET {} RETURN n", label, clause)
        };

        Ok((text, params))
    }

    pub(super) fn create_edge(
        label: &str,
        props: &Properties,
    ) -> StoreResult<(String, Vec<(String, Value)>)> {
        check_identifier(label)?;

        let mut params = Vec::new();
        let clause = set_clause("r", props, &mut params)?;

        let text = if clause.is_empty() {
            format!(
                "MATCH (a) WHERE id(a) = $from_id \
                 MATCH (b) WHERE id(b) = $to_id \
                 CREATE (a)-[r:{}]->(b) RETURN id(r)",
                label
            )
        } else {
            format!(
                "MATCH (a) WHERE id(a) = $from_id \
                 MATCH (b) WHERE id(b) = $to_id \
                 CREATE (a)-[r:{}]->(b) SET {} RETURN id(r)",
                label, clause
            )
        };

        Ok((text, params))
    }

    pub(super) fn merge_edge(label: &str) -> StoreResult<String> {
        check_identifier(label)?;

        Ok(format!(
            "MATCH (a) WHERE id(a) = $from_id \
             MATCH (b) WHERE id(b) = $to_id \
             MERGE (a)-[r:{}]->(b) RETURN id(r)",
            label
        ))
    }

    pub(super) fn edge_exists(
        pattern: &EdgePattern,
    ) -> StoreResult<(String, Vec<(String, Value)>)> {
        check_identifier(pattern.from_label)?;
        check_identifier(pattern.edge_label)?;
        check_identifier(pattern.to_label)?;

        let mut params = Vec::new();
        let from_clause = equality_clause("a", "a", &pattern.from_props, &mut params)?;
        let to_clause = equality_clause("b", "b", &pattern.to_props, &mut params)?;

        let clause = [from_clause, to_clause]
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" AND ");

        let text = if clause.is_empty() {
            format!(
                "MATCH (a:{})-[r:{}]->(b:{}) RETURN id(r) LIMIT 1",
                pattern.from_label, pattern.edge_label, pattern.to_label
            )
        } else {
            format!(
                "MATCH (a:{})-[r:{}]->(b:{}) WHERE {} RETURN id(r) LIMIT 1",
                pattern.from_label, pattern.edge_label, pattern.to_label, clause
            )
        };

        Ok((text, params))
    }

    pub(super) fn outgoing(label: &str) -> StoreResult<String> {
        check_identifier(label)?;

        Ok(format!(
            "MATCH (a)-[r:{}]->(b) WHERE id(a) = $from_id RETURN b, r",
            label
        ))
    }
}

impl Neo4jStore {
    /// Run a statement expected to return a single node and project it
    async fn fetch_single_node(&self, q: Query) -> StoreResult<Option<NodeRecord>> {
        let mut rows = self.graph.execute(q).await.map_err(query_error)?;

        match rows.next().await.map_err(query_error)? {
            Some(row) => {
                let node: Node = row
                    .get("n")
                    .map_err(|_| StoreError::Query("statement returned no node".to_string()))?;
                Ok(Some(node_record(&node)))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn get_node(&self, id: NodeId) -> StoreResult<Option<NodeRecord>> {
        let q = query(&statements::get_node()).param("id", id.0);
        self.fetch_single_node(q).await
    }

    async fn find_nodes(&self, label: &str, filters: &Properties) -> StoreResult<Vec<NodeRecord>> {
        let (text, params) = statements::find_nodes(label, filters)?;
        debug!(statement = %text, "find_nodes");

        let q = with_params(query(&text), &params);
        let mut rows = self.graph.execute(q).await.map_err(query_error)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await.map_err(query_error)? {
            let node: Node = row
                .get("n")
                .map_err(|_| StoreError::Query("statement returned no node".to_string()))?;
            records.push(node_record(&node));
        }
        Ok(records)
    }

    async fn merge_node(
        &self,
        label: &str,
        key: (&str, Value),
        props: Properties,
    ) -> StoreResult<NodeId> {
        let (text, params) = statements::merge_node(label, key.0, &props)?;
        debug!(statement = %text, "merge_node");

        let q = with_params(query(&text), &params);
        let q = with_params(q, &[("key".to_string(), key.1)]);

        match self.fetch_single_node(q).await? {
            Some(record) => Ok(record.id),
            None => Err(StoreError::Query(format!(
                "merge on {} returned no node",
                label
            ))),
        }
    }

    async fn create_node(&self, label: &str, props: Properties) -> StoreResult<NodeId> {
        let (text, params) = statements::create_node(label, &props)?;
        debug!(statement = %text, "create_node");

        let q = with_params(query(&text), &params);

        match self.fetch_single_node(q).await? {
            Some(record) => Ok(record.id),
            None => Err(StoreError::Query(format!(
                "create on {} returned no node",
                label
            ))),
        }
    }

    async fn create_edge(
        &self,
        from: NodeId,
        to: NodeId,
        label: &str,
        props: Properties,
    ) -> StoreResult<()> {
        let (text, params) = statements::create_edge(label, &props)?;
        debug!(statement = %text, from = %from, to = %to, "create_edge");

        let q = with_params(query(&text), &params)
            .param("from_id", from.0)
            .param("to_id", to.0);

        let mut rows = self.graph.execute(q).await.map_err(query_error)?;
        match rows.next().await.map_err(query_error)? {
            Some(_) => Ok(()),
            None => Err(StoreError::Query(format!(
                "{} edge endpoints not found ({} -> {})",
                label, from, to
            ))),
        }
    }

    async fn merge_edge(&self, from: NodeId, to: NodeId, label: &str) -> StoreResult<()> {
        let text = statements::merge_edge(label)?;
        debug!(statement = %text, from = %from, to = %to, "merge_edge");

        let q = query(&text).param("from_id", from.0).param("to_id", to.0);

        let mut rows = self.graph.execute(q).await.map_err(query_error)?;
        match rows.next().await.map_err(query_error)? {
            Some(_) => Ok(()),
            None => Err(StoreError::Query(format!(
                "{} edge endpoints not found ({} -> {})",
                label, from, to
            ))),
        }
    }

    async fn edge_exists(&self, pattern: &EdgePattern) -> StoreResult<bool> {
        let (text, params) = statements::edge_exists(pattern)?;
        debug!(statement = %text, "edge_exists");

        let q = with_params(query(&text), &params);
        let mut rows = self.graph.execute(q).await.map_err(query_error)?;

        Ok(rows.next().await.map_err(query_error)?.is_some())
    }

    async fn outgoing(
        &self,
        from: NodeId,
        label: &str,
    ) -> StoreResult<Vec<(NodeRecord, Properties)>> {
        let text = statements::outgoing(label)?;
        debug!(statement = %text, from = %from, "outgoing");

        let q = query(&text).param("from_id", from.0);
        let mut rows = self.graph.execute(q).await.map_err(query_error)?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await.map_err(query_error)? {
            let node: Node = row
                .get("b")
                .map_err(|_| StoreError::Query("statement returned no node".to_string()))?;
            let relation: Relation = row
                .get("r")
                .map_err(|_| {
                    StoreError::Query("statement returned no relationship".to_string())
                })?;
            results.push((node_record(&node), relation_properties(&relation)));
        }
        Ok(results)
    }
}
