//! Shared record/property model for MettaGen.
//!
//! This crate is the typed base every other member builds on:
//!
//! - the closed property-value shape (scalar | sequence | map) carried by
//!   node and edge records,
//! - the atom-text escaping rules for literal text inside emitted atoms,
//! - label normalization (space → underscore), and
//! - the [`Adapter`] capability surface data sources implement.
//!
//! Records are produced by adapter crates (untrusted inputs), consumed once
//! by `mettagen-writer`, and not retained.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Property values
// ============================================================================

/// A scalar property value.
///
/// `Null` and the empty string count as *empty*: the serializer never emits a
/// property line for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Scalar {
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Text(t) => t.is_empty(),
            _ => false,
        }
    }

    /// Render this scalar as atom text.
    ///
    /// Text is escaped ([`escape_text`]); non-text scalars pass through
    /// unescaped.
    pub fn atom_text(&self) -> String {
        match self {
            Scalar::Text(t) => escape_text(t),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Null => String::new(),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

/// A property value: scalar, ordered sequence of scalars, or nested map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    List(Vec<Scalar>),
    Map(PropertyMap),
    Scalar(Scalar),
}

impl PropertyValue {
    pub fn text(value: &str) -> Self {
        PropertyValue::Scalar(Scalar::Text(value.to_string()))
    }
}

/// Property maps iterate in key order, which keeps emission deterministic
/// across runs on unchanged inputs.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

// ============================================================================
// Records
// ============================================================================

/// A raw node record as produced by an adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

/// A raw edge record as produced by an adapter.
///
/// The label must resolve against the writer's edge-type index; unmapped
/// labels fail the write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub label: String,
    #[serde(default)]
    pub properties: PropertyMap,
}

// ============================================================================
// Atom text
// ============================================================================

/// Escape literal text for embedding in an atom.
///
/// Internal spaces become underscores first, then every literal `(`, `)` and
/// the escape character itself are prefixed with `\`.
pub fn escape_text(value: &str) -> String {
    let underscored = value.replace(' ', "_");
    let mut out = String::with_capacity(underscored.len());
    for c in underscored.chars() {
        if matches!(c, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Normalize an input label: spaces become underscores.
pub fn normalize_label(label: &str) -> String {
    label.replace(' ', "_")
}

// ============================================================================
// Adapter capability surface
// ============================================================================

/// A data source that yields raw node/edge records.
///
/// Adapters are invoked one at a time; records are consumed once by the
/// writer. Implementations should keep whatever parsing state they need and
/// surface failures through the `Result`.
pub trait Adapter: std::fmt::Debug {
    fn nodes(&self) -> Result<Vec<NodeRecord>>;
    fn edges(&self) -> Result<Vec<EdgeRecord>>;
}

// ============================================================================
// Tests
// ============================================================================
