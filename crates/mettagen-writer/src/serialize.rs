//! Record serialization into MeTTa atom lines.

use crate::constructors::EdgeTypeIndex;
use crate::WriterError;
use mettagen_atom::{normalize_label, EdgeRecord, NodeRecord, PropertyMap, PropertyValue, Scalar};
use std::collections::BTreeSet;

/// Serializes raw records against a fixed edge-endpoint index.
///
/// The index is read-only after construction; one serializer is shared by
/// every adapter pass of a run.
#[derive(Debug, Clone)]
pub struct MettaSerializer {
    index: EdgeTypeIndex,
    excluded_properties: BTreeSet<String>,
}

impl MettaSerializer {
    pub fn new(index: EdgeTypeIndex, excluded_properties: BTreeSet<String>) -> Self {
        Self {
            index,
            excluded_properties,
        }
    }

    pub fn edge_types(&self) -> &EdgeTypeIndex {
        &self.index
    }

    /// Serialize a node record: head atom `(label id)` followed by one line
    /// per non-empty property.
    ///
    /// A dotted label keeps only its second segment (`biolink.Gene` →
    /// `Gene`), then is normalized and lowercased.
    pub fn serialize_node(&self, record: &NodeRecord) -> Vec<String> {
        let label = record
            .label
            .split('.')
            .nth(1)
            .unwrap_or(record.label.as_str());
        let head = format!(
            "({} {})",
            normalize_label(label).to_lowercase(),
            record.id
        );
        self.serialize_properties(&head, &record.properties)
    }

    /// Serialize an edge record: head atom
    /// `(label (source_type source_id) (target_type target_id))` followed by
    /// property lines.
    ///
    /// Fails with [`WriterError::UnknownEdgeLabel`] before emitting anything
    /// when the label is not in the index. The index's output label, when
    /// set, replaces the record label in the head.
    pub fn serialize_edge(&self, record: &EdgeRecord) -> Result<Vec<String>, WriterError> {
        let label = record.label.to_lowercase();
        let endpoints = self
            .index
            .get(&label)
            .ok_or_else(|| WriterError::UnknownEdgeLabel {
                label: label.clone(),
            })?;
        let label = endpoints.output_label.clone().unwrap_or(label);
        let head = format!(
            "({} ({} {}) ({} {}))",
            label, endpoints.source, record.source, endpoints.target, record.target
        );
        Ok(self.serialize_properties(&head, &record.properties))
    }

    /// Serialize a property map under `head`: the head line itself, then one
    /// line per non-empty property in map order. Nested maps recurse with
    /// the chained head `(key head)`; sequences join their escaped elements
    /// inside one parenthesis group.
    pub fn serialize_properties(&self, head: &str, properties: &PropertyMap) -> Vec<String> {
        let mut out = vec![head.to_string()];
        for (key, value) in properties {
            if self.excluded_properties.contains(key) {
                continue;
            }
            match value {
                PropertyValue::Scalar(scalar) => {
                    if scalar.is_empty() {
                        continue;
                    }
                    out.push(format!("({key} {head} {})", scalar.atom_text()));
                }
                PropertyValue::List(items) => {
                    let joined = items
                        .iter()
                        .map(Scalar::atom_text)
                        .collect::<Vec<_>>()
                        .join(" ");
                    out.push(format!("({key} {head} ({joined}))"));
                }
                PropertyValue::Map(nested) => {
                    let nested_head = format!("({key} {head})");
                    out.extend(self.serialize_properties(&nested_head, nested));
                }
            }
        }
        out
    }
}
