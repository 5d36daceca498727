//! Ontology class graph for MettaGen.
//!
//! Holds the parsed class hierarchy the type-declaration pass walks:
//!
//! - classes in insertion order (emission order follows load order),
//! - directed child → parent edges,
//! - a depth-limited preorder traversal used for ancestor resolution, and
//! - mixin detection (mixin classes never become type declarations).
//!
//! A flat-triple loader is included so ontologies shipped as N-Triples-like
//! text (`rdf:type owl:Class`, `rdfs:subClassOf`) can be read without a full
//! RDF toolkit. Class ids are the spaced, lowercased form of the OWL local
//! name (`GeneOrGeneProductMixin` → `gene or gene product mixin`), which is
//! the form the mixin marker and label normalization operate on.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Classes whose id contains this marker are traits/roles, not standalone
/// types, and are excluded from the type hierarchy.
pub const MIXIN_MARKER: &str = "mixin";

/// Ancestor resolution walks at most this many hops from the start class.
pub const ANCESTOR_DEPTH_LIMIT: usize = 2;

#[derive(Debug, Error)]
pub enum OntologyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no ontology classes found in {0}")]
    Empty(String),
}

// ============================================================================
// Class graph
// ============================================================================

/// Directed graph of ontology classes with child → parent edges.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    parents: Vec<Vec<usize>>,
}

impl OntologyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a class if absent; returns its slot either way.
    pub fn add_class(&mut self, id: &str) -> usize {
        if let Some(&slot) = self.index.get(id) {
            return slot;
        }
        let slot = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), slot);
        self.parents.push(Vec::new());
        slot
    }

    /// Record `child` as a subclass of `parent`, inserting both as needed.
    pub fn add_subclass(&mut self, child: &str, parent: &str) {
        let c = self.add_class(child);
        let p = self.add_class(parent);
        if !self.parents[c].contains(&p) {
            self.parents[c].push(p);
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Classes in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn is_mixin(id: &str) -> bool {
        id.contains(MIXIN_MARKER)
    }

    /// Preorder walk along parent edges, bounded to `depth_limit` hops from
    /// `start`. Each class is visited at most once, so cycles (including
    /// self-loops) terminate.
    ///
    /// Returns an empty sequence when `start` is not a known class.
    pub fn preorder(&self, start: &str, depth_limit: usize) -> Vec<&str> {
        let Some(&slot) = self.index.get(start) else {
            return Vec::new();
        };
        let mut visited = vec![false; self.ids.len()];
        let mut out = Vec::new();
        self.visit(slot, depth_limit, &mut visited, &mut out);
        out.iter().map(|&i| self.ids[i].as_str()).collect()
    }

    fn visit(&self, slot: usize, remaining: usize, visited: &mut [bool], out: &mut Vec<usize>) {
        visited[slot] = true;
        out.push(slot);
        if remaining == 0 {
            return;
        }
        for &parent in &self.parents[slot] {
            if !visited[parent] {
                self.visit(parent, remaining - 1, visited, out);
            }
        }
    }

    pub fn summary(&self) -> OntologySummary {
        let edges = self.parents.iter().map(Vec::len).sum();
        let roots = self
            .ids
            .iter()
            .enumerate()
            .filter(|(i, _)| self.parents[*i].is_empty())
            .map(|(_, id)| id.clone())
            .collect();
        let mixins = self.ids.iter().filter(|id| Self::is_mixin(id)).count();
        OntologySummary {
            classes: self.ids.len(),
            edges,
            mixins,
            roots,
        }
    }
}

/// Shape report for an ontology, printable by tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologySummary {
    pub classes: usize,
    pub edges: usize,
    pub mixins: usize,
    pub roots: Vec<String>,
}

// ============================================================================
// Flat-triple loader
// ============================================================================

impl OntologyGraph {
    /// Build a class graph from N-Triples-like text.
    ///
    /// Recognized statements:
    /// - `<C> rdf:type owl:Class .` declares a class
    /// - `<C> rdfs:subClassOf <D> .` declares a class edge
    ///
    /// Other statements (labels, comments, property axioms) are skipped; the
    /// loader is deliberately tolerant of lines it does not understand.
    pub fn from_flat_triples(content: &str) -> Self {
        let mut graph = OntologyGraph::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                continue;
            }
            let subject = class_id(parts[0]);
            let predicate = term_name(parts[1]);
            let object = parts[2..parts.len() - 1].join(" ");

            match predicate.as_str() {
                "type" | "a" => {
                    if term_name(&object) == "Class" {
                        graph.add_class(&subject);
                    }
                }
                "subClassOf" => {
                    graph.add_subclass(&subject, &class_id(&object));
                }
                _ => {}
            }
        }
        graph
    }

    pub fn from_file(path: &Path) -> Result<Self, OntologyError> {
        let content = std::fs::read_to_string(path)?;
        let graph = Self::from_flat_triples(&content);
        if graph.is_empty() {
            return Err(OntologyError::Empty(path.display().to_string()));
        }
        tracing::info!(
            classes = graph.len(),
            path = %path.display(),
            "loaded ontology graph"
        );
        Ok(graph)
    }
}

fn extract_iri(s: &str) -> &str {
    s.trim_start_matches('<').trim_end_matches('>')
}

/// Local name of an IRI or prefixed term (`rdfs:subClassOf` → `subClassOf`).
fn term_name(s: &str) -> String {
    let iri = extract_iri(s);
    iri.rsplit(['#', '/', ':']).next().unwrap_or(iri).to_string()
}

/// Class id used throughout the graph: the spaced, lowercased local name.
fn class_id(term: &str) -> String {
    humanize_class_name(&term_name(term))
}

/// `GeneOrGeneProductMixin` → `gene or gene product mixin`.
///
/// Word boundaries: lower/digit followed by upper, and an upper run followed
/// by upper+lower (`RNAProduct` → `rna product`). Underscores count as
/// spaces.
fn humanize_class_name(local: &str) -> String {
    let chars: Vec<char> = local.chars().collect();
    let mut out = String::with_capacity(local.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            out.push(' ');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(' ');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
