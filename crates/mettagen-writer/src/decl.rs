//! Typed declaration lines for `type_defs.metta`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One type declaration derived from an ontology class.
///
/// Names are stored fully normalized (underscored, uppercased); `Display`
/// renders the exact output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum TypeDecl {
    /// `(: NAME Type)` — the class is its own depth-limited ancestor.
    Root { name: String },
    /// `(<: NAME PARENT)`
    Sub { name: String, parent: String },
}

impl fmt::Display for TypeDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDecl::Root { name } => write!(f, "(: {name} Type)"),
            TypeDecl::Sub { name, parent } => write!(f, "(<: {name} {parent})"),
        }
    }
}

/// One callable-type declaration derived from a schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum ConstructorDecl {
    /// `(: label (-> SOURCE TARGET EDGE_TYPE))`
    Edge {
        label: String,
        source: String,
        target: String,
        edge_type: String,
    },
    /// `(: label (-> $x NODE_TYPE))` — `$x` is the unbound "any instance"
    /// placeholder, not a concrete node.
    Node { label: String, node_type: String },
}

impl fmt::Display for ConstructorDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorDecl::Edge {
                label,
                source,
                target,
                edge_type,
            } => write!(f, "(: {label} (-> {source} {target} {edge_type}))"),
            ConstructorDecl::Node { label, node_type } => {
                write!(f, "(: {label} (-> $x {node_type}))")
            }
        }
    }
}
