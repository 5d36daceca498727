//! Data-constructor generation from the schema mapping.
//!
//! This is a pure two-phase build: the full declaration list and the
//! edge-endpoint index come back as a pair, computed before anything is
//! written. The index is then owned read-only by the writer for the rest of
//! the run.

use crate::decl::ConstructorDecl;
use mettagen_atom::normalize_label;
use mettagen_schema::{Representation, Schema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved endpoint types for one edge label, all lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEndpoints {
    pub source: String,
    pub target: String,
    pub output_label: Option<String>,
}

/// Mapping from lowercase edge label to its endpoint types.
///
/// Built once from the schema; every edge record's label must resolve here
/// or its serialization fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeTypeIndex {
    entries: BTreeMap<String, EdgeEndpoints>,
}

impl EdgeTypeIndex {
    /// Look up an already-lowercased edge label.
    pub fn get(&self, label: &str) -> Option<&EdgeEndpoints> {
        self.entries.get(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, label: String, endpoints: EdgeEndpoints) {
        self.entries.insert(label, endpoints);
    }
}

/// Walk the schema mapping and produce one callable-type declaration per
/// label, together with the edge-endpoint index.
///
/// Edge entries missing a source or target produce neither declaration nor
/// index entry; a partial schema is tolerated, not an error. Multi-valued
/// labels and endpoints resolve to their first element.
pub fn data_constructors(schema: &Schema) -> (Vec<ConstructorDecl>, EdgeTypeIndex) {
    let mut decls = Vec::new();
    let mut index = EdgeTypeIndex::default();

    for (name, entry) in schema.iter() {
        match entry.represented_as {
            Representation::Edge => {
                let endpoints = entry
                    .source
                    .as_ref()
                    .and_then(|s| s.first())
                    .zip(entry.target.as_ref().and_then(|t| t.first()));
                let Some((source, target)) = endpoints else {
                    tracing::warn!(entity = name, "edge entry missing source or target, skipped");
                    continue;
                };
                let Some(label) = entry.input_label.first() else {
                    tracing::warn!(entity = name, "edge entry has no input label, skipped");
                    continue;
                };

                let label = normalize_label(label);
                let source = normalize_label(source);
                let target = normalize_label(target);
                let edge_type = normalize_label(name);

                decls.push(ConstructorDecl::Edge {
                    label: label.to_lowercase(),
                    source: source.to_uppercase(),
                    target: target.to_uppercase(),
                    edge_type: edge_type.to_uppercase(),
                });
                index.insert(
                    label.to_lowercase(),
                    EdgeEndpoints {
                        source: source.to_lowercase(),
                        target: target.to_lowercase(),
                        output_label: entry.output_label.as_deref().map(str::to_lowercase),
                    },
                );
            }
            Representation::Node => {
                let node_type = normalize_label(name).to_uppercase();
                for alias in entry.input_label.iter() {
                    decls.push(ConstructorDecl::Node {
                        label: normalize_label(alias).to_lowercase(),
                        node_type: node_type.clone(),
                    });
                }
            }
        }
    }

    (decls, index)
}
