//! MeTTa translation layer for MettaGen.
//!
//! Turns an ontology class graph and a schema mapping into type
//! declarations, and raw node/edge records into MeTTa atom lines:
//!
//! - [`hierarchy`]: one type declaration per non-mixin ontology class.
//! - [`constructors`]: one callable-type declaration per schema label, plus
//!   the edge-endpoint index consulted for every edge record. This is a pure
//!   two-phase build: declarations and index come back together, nothing is
//!   written while they are computed.
//! - [`serialize`]: node/edge/property serialization over the closed
//!   property-value shape, with escaping and output-label substitution.
//! - [`sink`]: the writer that owns the output directory, emits
//!   `type_defs.metta` once, and appends node/edge atoms per namespace.

pub mod constructors;
pub mod decl;
pub mod hierarchy;
pub mod serialize;
pub mod sink;

pub use constructors::{data_constructors, EdgeEndpoints, EdgeTypeIndex};
pub use decl::{ConstructorDecl, TypeDecl};
pub use hierarchy::type_hierarchy;
pub use serialize::MettaSerializer;
pub use sink::{MettaWriter, WriterConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriterError {
    /// An edge record's label has no entry in the edge type index. Fatal for
    /// the record: the write aborts instead of skipping it.
    #[error("edge label '{label}' not found in the edge type index")]
    UnknownEdgeLabel { label: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
