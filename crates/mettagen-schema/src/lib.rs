//! Schema mapping model for MettaGen.
//!
//! A schema maps logical entity names to descriptors that say how records
//! with a given label are represented:
//!
//! - `represented_as: node | edge`
//! - `input_label`: one display label or a list of aliases
//! - for edges: `source` and `target` entity keys, plus an optional
//!   `output_label` override used in place of the input label at
//!   serialization time.
//!
//! Schemas are authored as YAML (the common form) or JSON. Unknown extra
//! keys on an entry are tolerated, so richer schema documents load as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// ============================================================================
// Entries
// ============================================================================

/// How records carrying an entry's label materialize in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    Node,
    Edge,
}

/// One value or a list of values.
///
/// Multi-valued fields resolve to their first element when a single value is
/// required (label aliases keep all elements; edge endpoints take the first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn first(&self) -> Option<&str> {
        match self {
            OneOrMany::One(v) => Some(v),
            OneOrMany::Many(vs) => vs.first().map(String::as_str),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            OneOrMany::One(v) => std::slice::from_ref(v).iter().map(String::as_str),
            OneOrMany::Many(vs) => vs.as_slice().iter().map(String::as_str),
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, OneOrMany::Many(_))
    }
}

/// Descriptor for one logical entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub represented_as: Representation,
    pub input_label: OneOrMany,
    #[serde(default)]
    pub source: Option<OneOrMany>,
    #[serde(default)]
    pub target: Option<OneOrMany>,
    #[serde(default)]
    pub output_label: Option<String>,
}

// ============================================================================
// Schema map
// ============================================================================

/// Mapping from logical entity name to descriptor, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub entries: BTreeMap<String, SchemaEntry>,
}

impl Schema {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(content: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a schema by extension: `.json` parses as JSON, everything else
    /// as YAML (the form schema configs usually ship in).
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext {
            "json" => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = r#"
gene:
  represented_as: node
  input_label: [Gene, ncbi_gene]
variant:
  represented_as: node
  input_label: Variant
variant to gene association:
  represented_as: edge
  input_label: Variant_In_Gene
  source: variant
  target: gene
  output_label: in_gene
"#;

    #[test]
    fn parses_yaml_schema() {
        let schema = Schema::from_yaml_str(SAMPLE_YAML).unwrap();
        assert_eq!(schema.len(), 3);

        let gene = &schema.entries["gene"];
        assert_eq!(gene.represented_as, Representation::Node);
        assert!(gene.input_label.is_many());
        assert_eq!(gene.input_label.iter().collect::<Vec<_>>(), vec!["Gene", "ncbi_gene"]);

        let assoc = &schema.entries["variant to gene association"];
        assert_eq!(assoc.represented_as, Representation::Edge);
        assert_eq!(assoc.source.as_ref().unwrap().first(), Some("variant"));
        assert_eq!(assoc.target.as_ref().unwrap().first(), Some("gene"));
        assert_eq!(assoc.output_label.as_deref(), Some("in_gene"));
    }

    #[test]
    fn parses_json_schema() {
        let json = r#"{
            "protein": {"represented_as": "node", "input_label": "Protein"}
        }"#;
        let schema = Schema::from_json_str(json).unwrap();
        assert_eq!(schema.entries["protein"].input_label.first(), Some("Protein"));
    }

    #[test]
    fn tolerates_extra_entry_fields() {
        let yaml = r#"
gene:
  represented_as: node
  input_label: Gene
  is_a: biological entity
  preferred_id: hgnc
"#;
        let schema = Schema::from_yaml_str(yaml).unwrap();
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn entry_without_endpoints_parses() {
        let yaml = r#"
orphan association:
  represented_as: edge
  input_label: Orphan
"#;
        let schema = Schema::from_yaml_str(yaml).unwrap();
        let entry = &schema.entries["orphan association"];
        assert!(entry.source.is_none());
        assert!(entry.target.is_none());
    }

    #[test]
    fn iteration_is_key_ordered() {
        let schema = Schema::from_yaml_str(SAMPLE_YAML).unwrap();
        let keys: Vec<&str> = schema.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["gene", "variant", "variant to gene association"]);
    }

    #[test]
    fn empty_multi_valued_field_has_no_first() {
        let entry = OneOrMany::Many(Vec::new());
        assert_eq!(entry.first(), None);
    }
}
