//! RDF record adapter for MettaGen (boundary crate).
//!
//! Parses RDF-shaped inputs (untrusted) with Sophia and emits raw node/edge
//! records for the writer:
//!
//! - every `rdfs:label` statement becomes one node record (subject id,
//!   literal label, `uri` property),
//! - every statement whose object is a resource becomes one edge record
//!   (predicate local name as the edge label, `uri` property).
//!
//! Supported serializations: N-Triples (`.nt`), Turtle (`.ttl`), RDF/XML
//! (`.rdf`, `.owl`, `.xml`).
//!
//! Whether a given edge label is *mapped* is the schema's business; the
//! adapter only reports what the input asserts.

use anyhow::{anyhow, Result};
use mettagen_atom::{Adapter, EdgeRecord, NodeRecord, PropertyMap, PropertyValue};
use sophia::api::prelude::*;
use std::path::Path;

pub const RDFS_LABEL_IRI: &str = "http://www.w3.org/2000/01/rdf-schema#label";

// ============================================================================
// RDF term model (sufficient for record emission)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum RdfTerm {
    Iri(String),
    BlankNode(String),
    Literal {
        lexical: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl RdfTerm {
    fn node_id(&self) -> Option<String> {
        match self {
            RdfTerm::Iri(iri) => Some(iri.clone()),
            RdfTerm::BlankNode(bn) => Some(format!("_:{bn}")),
            RdfTerm::Literal { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
struct RdfStatement {
    subject: RdfTerm,
    predicate_iri: String,
    object: RdfTerm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    NTriples,
    Turtle,
    RdfXml,
}

impl RdfFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "nt" | "ntriples" => Ok(RdfFormat::NTriples),
            "ttl" | "turtle" => Ok(RdfFormat::Turtle),
            "rdf" | "owl" | "xml" => Ok(RdfFormat::RdfXml),
            other => Err(anyhow!("unsupported RDF format: .{other}")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct RdfSinkError {
    message: String,
}

impl From<anyhow::Error> for RdfSinkError {
    fn from(value: anyhow::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}

// ============================================================================
// Term parsing (N-Triples-ish display form)
// ============================================================================

fn local_name(iri: &str) -> String {
    iri.rsplit(['#', '/']).next().unwrap_or(iri).to_string()
}

fn unescape_rdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_term_display(term: &str) -> Result<RdfTerm> {
    let s = term.trim();

    if let Some(rest) = s.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(RdfTerm::Iri(rest.to_string()));
    }

    if let Some(rest) = s.strip_prefix("_:") {
        return Ok(RdfTerm::BlankNode(rest.to_string()));
    }

    if s.starts_with('"') {
        let mut end_quote = None;
        let mut prev_was_escape = false;
        for (i, ch) in s.char_indices().skip(1) {
            if ch == '"' && !prev_was_escape {
                end_quote = Some(i);
                break;
            }
            prev_was_escape = ch == '\\' && !prev_was_escape;
        }
        let Some(end) = end_quote else {
            return Err(anyhow!("invalid literal term (missing closing quote): {s}"));
        };

        let lexical = unescape_rdf_string(&s[1..end]);
        let rest = s[end + 1..].trim();

        let mut language = None;
        let mut datatype = None;
        if let Some(lang) = rest.strip_prefix('@') {
            language = Some(lang.to_string());
        } else if let Some(dt) = rest.strip_prefix("^^") {
            let dt = dt.trim();
            if let Some(dt_iri) = dt.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
                datatype = Some(dt_iri.to_string());
            } else if !dt.is_empty() {
                datatype = Some(dt.to_string());
            }
        }

        return Ok(RdfTerm::Literal {
            lexical,
            datatype,
            language,
        });
    }

    Err(anyhow!("unsupported RDF term form: {s}"))
}

fn parse_resource_term_display(term: &str) -> Result<RdfTerm> {
    match parse_term_display(term)? {
        t @ (RdfTerm::Iri(_) | RdfTerm::BlankNode(_)) => Ok(t),
        RdfTerm::Literal { .. } => Err(anyhow!("expected IRI/blank node, got literal: {term}")),
    }
}

// ============================================================================
// Statement collection
// ============================================================================

fn collect_statements(bytes: &[u8], format: RdfFormat) -> Result<Vec<RdfStatement>> {
    let cursor = std::io::Cursor::new(bytes);
    let reader = std::io::BufReader::new(cursor);

    let mut out: Vec<RdfStatement> = Vec::new();
    let mut push = |t_s: String, t_p: String, t_o: String| -> std::result::Result<(), RdfSinkError> {
        let subject = parse_resource_term_display(&t_s).map_err(RdfSinkError::from)?;
        let predicate = parse_resource_term_display(&t_p).map_err(RdfSinkError::from)?;
        let RdfTerm::Iri(predicate_iri) = predicate else {
            return Ok(());
        };
        let object = parse_term_display(&t_o).map_err(RdfSinkError::from)?;
        out.push(RdfStatement {
            subject,
            predicate_iri,
            object,
        });
        Ok(())
    };

    match format {
        RdfFormat::NTriples => {
            let mut parser = sophia::turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| push(t.s().to_string(), t.p().to_string(), t.o().to_string()))
                .map_err(|e| anyhow!("failed to parse N-Triples: {e}"))?;
        }
        RdfFormat::Turtle => {
            let mut parser = sophia::turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| push(t.s().to_string(), t.p().to_string(), t.o().to_string()))
                .map_err(|e| anyhow!("failed to parse Turtle: {e}"))?;
        }
        RdfFormat::RdfXml => {
            let mut parser = sophia::xml::parser::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| push(t.s().to_string(), t.p().to_string(), t.o().to_string()))
                .map_err(|e| anyhow!("failed to parse RDF/XML: {e}"))?;
        }
    }

    Ok(out)
}

// ============================================================================
// Adapter
// ============================================================================

/// Record adapter over one parsed RDF document.
#[derive(Debug)]
pub struct RdfAdapter {
    locator: String,
    statements: Vec<RdfStatement>,
    write_properties: bool,
    add_provenance: bool,
}

impl RdfAdapter {
    pub fn from_file(path: &Path, write_properties: bool, add_provenance: bool) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let format = RdfFormat::from_path(path)?;
        Self::from_bytes(
            &bytes,
            format,
            path.to_string_lossy().into_owned(),
            write_properties,
            add_provenance,
        )
    }

    pub fn from_bytes(
        bytes: &[u8],
        format: RdfFormat,
        locator: String,
        write_properties: bool,
        add_provenance: bool,
    ) -> Result<Self> {
        let statements = collect_statements(bytes, format)?;
        tracing::info!(statements = statements.len(), locator = %locator, "parsed RDF input");
        Ok(Self {
            locator,
            statements,
            write_properties,
            add_provenance,
        })
    }

    fn properties(&self, uri: &str) -> PropertyMap {
        let mut properties = PropertyMap::new();
        if self.write_properties {
            properties.insert("uri".to_string(), PropertyValue::text(uri));
            if self.add_provenance {
                properties.insert("source".to_string(), PropertyValue::text(&self.locator));
            }
        }
        properties
    }
}

impl Adapter for RdfAdapter {
    /// One node record per `rdfs:label` statement.
    fn nodes(&self) -> Result<Vec<NodeRecord>> {
        let mut nodes = Vec::new();
        for stmt in &self.statements {
            if stmt.predicate_iri != RDFS_LABEL_IRI {
                continue;
            }
            let RdfTerm::Literal { lexical, .. } = &stmt.object else {
                continue;
            };
            let Some(id) = stmt.subject.node_id() else {
                continue;
            };
            nodes.push(NodeRecord {
                label: lexical.clone(),
                properties: self.properties(&id),
                id,
            });
        }
        Ok(nodes)
    }

    /// One edge record per statement whose object is a resource.
    fn edges(&self) -> Result<Vec<EdgeRecord>> {
        let mut edges = Vec::new();
        for stmt in &self.statements {
            let (Some(source), Some(target)) = (stmt.subject.node_id(), stmt.object.node_id())
            else {
                continue;
            };
            edges.push(EdgeRecord {
                source,
                target,
                label: local_name(&stmt.predicate_iri),
                properties: self.properties(&stmt.predicate_iri),
            });
        }
        Ok(edges)
    }
}

// ============================================================================
// Tests
// ============================================================================
