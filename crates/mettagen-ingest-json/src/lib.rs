//! JSON record adapter for MettaGen.
//!
//! Reads pre-extracted records from a JSON document:
//!
//! ```json
//! {
//!   "nodes": [{"id": "BRCA1", "label": "biolink.Gene", "properties": {...}}],
//!   "edges": [{"source": "rs123", "target": "BRCA1", "label": "Variant_In_Gene"}]
//! }
//! ```
//!
//! JSON property values map onto the closed property shape: objects become
//! nested maps, arrays become scalar sequences (composite elements are
//! stringified to keep sequences flat), everything else is a scalar.

use anyhow::{Context, Result};
use mettagen_atom::{Adapter, EdgeRecord, NodeRecord, PropertyMap, PropertyValue, Scalar};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

// ============================================================================
// Raw document shape
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRecordFile {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    id: String,
    label: String,
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    source: String,
    target: String,
    label: String,
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
}

// ============================================================================
// Value conversion
// ============================================================================

fn scalar_from_json(value: &Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => n
            .as_i64()
            .map(Scalar::Int)
            .unwrap_or_else(|| Scalar::Float(n.as_f64().unwrap_or_default())),
        Value::String(s) => Scalar::Text(s.clone()),
        // Composites inside a sequence are flattened to their JSON text.
        other => Scalar::Text(other.to_string()),
    }
}

fn property_value_from_json(value: &Value) -> PropertyValue {
    match value {
        Value::Array(items) => PropertyValue::List(items.iter().map(scalar_from_json).collect()),
        Value::Object(map) => PropertyValue::Map(property_map_from_json(map)),
        scalar => PropertyValue::Scalar(scalar_from_json(scalar)),
    }
}

fn property_map_from_json(map: &serde_json::Map<String, Value>) -> PropertyMap {
    map.iter()
        .map(|(k, v)| (k.clone(), property_value_from_json(v)))
        .collect()
}

// ============================================================================
// Adapter
// ============================================================================

/// Record adapter over one JSON records document.
#[derive(Debug)]
pub struct JsonAdapter {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl JsonAdapter {
    pub fn from_file(path: &Path, write_properties: bool, add_provenance: bool) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read records file {}", path.display()))?;
        Self::from_str(&content, &path.to_string_lossy(), write_properties, add_provenance)
    }

    pub fn from_str(
        content: &str,
        locator: &str,
        write_properties: bool,
        add_provenance: bool,
    ) -> Result<Self> {
        let raw: RawRecordFile =
            serde_json::from_str(content).context("invalid records JSON")?;

        let build_properties = |raw_properties: &serde_json::Map<String, Value>| {
            let mut properties = if write_properties {
                property_map_from_json(raw_properties)
            } else {
                PropertyMap::new()
            };
            if write_properties && add_provenance {
                properties.insert("source".to_string(), PropertyValue::text(locator));
            }
            properties
        };

        let nodes = raw
            .nodes
            .iter()
            .map(|n| NodeRecord {
                id: n.id.clone(),
                label: n.label.clone(),
                properties: build_properties(&n.properties),
            })
            .collect::<Vec<_>>();
        let edges = raw
            .edges
            .iter()
            .map(|e| EdgeRecord {
                source: e.source.clone(),
                target: e.target.clone(),
                label: e.label.clone(),
                properties: build_properties(&e.properties),
            })
            .collect::<Vec<_>>();

        tracing::info!(nodes = nodes.len(), edges = edges.len(), locator, "loaded JSON records");
        Ok(Self { nodes, edges })
    }
}

impl Adapter for JsonAdapter {
    fn nodes(&self) -> Result<Vec<NodeRecord>> {
        Ok(self.nodes.clone())
    }

    fn edges(&self) -> Result<Vec<EdgeRecord>> {
        Ok(self.edges.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
