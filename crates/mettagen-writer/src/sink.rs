//! File sink: `type_defs.metta` plus per-namespace node/edge files.

use crate::constructors::data_constructors;
use crate::hierarchy::type_hierarchy;
use crate::serialize::MettaSerializer;
use crate::WriterError;
use mettagen_atom::{EdgeRecord, NodeRecord};
use mettagen_ontology::OntologyGraph;
use mettagen_schema::Schema;
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const TYPE_DEFS_FILE: &str = "type_defs.metta";
pub const NODES_FILE: &str = "nodes.metta";
pub const EDGES_FILE: &str = "edges.metta";

/// Writer configuration, passed explicitly to the constructor.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Root output directory; namespace subdirectories are created under it.
    pub output_dir: PathBuf,
    /// Property keys that are never serialized.
    pub excluded_properties: BTreeSet<String>,
}

impl WriterConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            excluded_properties: BTreeSet::new(),
        }
    }
}

/// Owns the output tree and the serializer for one run.
///
/// Construction performs the one-time setup pass: the type hierarchy and
/// data constructors are computed and written to `type_defs.metta`, and the
/// edge-endpoint index is retained read-only for every later record write.
/// Node/edge writes append to the namespace given by `path_prefix`, so one
/// namespace can accumulate records from several adapter passes.
pub struct MettaWriter {
    config: WriterConfig,
    serializer: MettaSerializer,
}

impl MettaWriter {
    pub fn new(
        ontology: &OntologyGraph,
        schema: &Schema,
        config: WriterConfig,
    ) -> Result<Self, WriterError> {
        fs::create_dir_all(&config.output_dir)?;

        let types = type_hierarchy(ontology);
        let (constructors, index) = data_constructors(schema);

        let mut content = String::new();
        for decl in &types {
            content.push_str(&decl.to_string());
            content.push('\n');
        }
        for decl in &constructors {
            content.push_str(&decl.to_string());
            content.push('\n');
        }
        let path = config.output_dir.join(TYPE_DEFS_FILE);
        fs::write(&path, content)?;
        tracing::info!(
            types = types.len(),
            constructors = constructors.len(),
            path = %path.display(),
            "wrote type declarations"
        );

        let serializer = MettaSerializer::new(index, config.excluded_properties.clone());
        Ok(Self { config, serializer })
    }

    pub fn serializer(&self) -> &MettaSerializer {
        &self.serializer
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Resolve (and create, idempotently) the directory for a namespace.
    fn namespace_dir(&self, path_prefix: Option<&str>) -> Result<PathBuf, WriterError> {
        let dir = match path_prefix {
            Some(prefix) => self.config.output_dir.join(prefix),
            None => self.config.output_dir.clone(),
        };
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Serialize node records and append their atom lines to the namespace's
    /// `nodes.metta`. Returns the number of lines written.
    pub fn write_nodes(
        &self,
        records: &[NodeRecord],
        path_prefix: Option<&str>,
    ) -> Result<usize, WriterError> {
        let path = self.namespace_dir(path_prefix)?.join(NODES_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut out = BufWriter::new(file);

        let mut lines = 0usize;
        for record in records {
            for line in self.serializer.serialize_node(record) {
                writeln!(out, "{line}")?;
                lines += 1;
            }
        }
        out.flush()?;
        tracing::info!(records = records.len(), lines, path = %path.display(), "wrote node atoms");
        Ok(lines)
    }

    /// Serialize edge records and append their atom lines to the namespace's
    /// `edges.metta`. Returns the number of lines written.
    ///
    /// An unmapped edge label aborts the pass: the failing record emits
    /// nothing, records already written stay (appends are not rolled back).
    pub fn write_edges(
        &self,
        records: &[EdgeRecord],
        path_prefix: Option<&str>,
    ) -> Result<usize, WriterError> {
        let path = self.namespace_dir(path_prefix)?.join(EDGES_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut out = BufWriter::new(file);

        let mut lines = 0usize;
        for record in records {
            let serialized = self.serializer.serialize_edge(record)?;
            for line in serialized {
                writeln!(out, "{line}")?;
                lines += 1;
            }
        }
        out.flush()?;
        tracing::info!(records = records.len(), lines, path = %path.display(), "wrote edge atoms");
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mettagen_atom::{PropertyMap, PropertyValue};

    fn sample_ontology() -> OntologyGraph {
        let mut g = OntologyGraph::new();
        g.add_class("entity");
        g.add_subclass("gene", "entity");
        g.add_subclass("variant", "entity");
        g.add_class("thing mixin");
        g
    }

    fn sample_schema() -> Schema {
        Schema::from_yaml_str(
            r#"
gene:
  represented_as: node
  input_label: Gene
variant:
  represented_as: node
  input_label: Variant
variant to gene association:
  represented_as: edge
  input_label: Variant_In_Gene
  source: variant
  target: gene
"#,
        )
        .unwrap()
    }

    fn node(id: &str, label: &str) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            label: label.to_string(),
            properties: PropertyMap::new(),
        }
    }

    #[test]
    fn construction_writes_type_defs_once() {
        let dir = tempfile::tempdir().unwrap();
        let _writer = MettaWriter::new(
            &sample_ontology(),
            &sample_schema(),
            WriterConfig::new(dir.path()),
        )
        .unwrap();

        let content = fs::read_to_string(dir.path().join(TYPE_DEFS_FILE)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "(: ENTITY Type)",
                "(<: GENE ENTITY)",
                "(<: VARIANT ENTITY)",
                "(: gene (-> $x GENE))",
                "(: variant (-> $x VARIANT))",
                "(: variant_in_gene (-> VARIANT GENE VARIANT_TO_GENE_ASSOCIATION))",
            ]
        );
    }

    #[test]
    fn reruns_produce_byte_identical_type_defs() {
        let dir = tempfile::tempdir().unwrap();
        let ontology = sample_ontology();
        let schema = sample_schema();

        MettaWriter::new(&ontology, &schema, WriterConfig::new(dir.path())).unwrap();
        let first = fs::read(dir.path().join(TYPE_DEFS_FILE)).unwrap();
        MettaWriter::new(&ontology, &schema, WriterConfig::new(dir.path())).unwrap();
        let second = fs::read(dir.path().join(TYPE_DEFS_FILE)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn nodes_land_under_the_path_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MettaWriter::new(
            &sample_ontology(),
            &sample_schema(),
            WriterConfig::new(dir.path()),
        )
        .unwrap();

        let written = writer
            .write_nodes(&[node("BRCA1", "Gene")], Some("gencode"))
            .unwrap();
        assert_eq!(written, 1);
        let content = fs::read_to_string(dir.path().join("gencode").join(NODES_FILE)).unwrap();
        assert_eq!(content, "(gene BRCA1)\n");
    }

    #[test]
    fn no_prefix_writes_to_the_output_root() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MettaWriter::new(
            &sample_ontology(),
            &sample_schema(),
            WriterConfig::new(dir.path()),
        )
        .unwrap();

        writer.write_nodes(&[node("BRCA1", "Gene")], None).unwrap();
        assert!(dir.path().join(NODES_FILE).exists());
    }

    #[test]
    fn repeated_writes_append_to_the_same_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MettaWriter::new(
            &sample_ontology(),
            &sample_schema(),
            WriterConfig::new(dir.path()),
        )
        .unwrap();

        writer
            .write_nodes(&[node("BRCA1", "Gene")], Some("gencode"))
            .unwrap();
        writer
            .write_nodes(&[node("TP53", "Gene")], Some("gencode"))
            .unwrap();
        let content = fs::read_to_string(dir.path().join("gencode").join(NODES_FILE)).unwrap();
        assert_eq!(content, "(gene BRCA1)\n(gene TP53)\n");
    }

    #[test]
    fn unknown_edge_label_aborts_without_partial_record_output() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MettaWriter::new(
            &sample_ontology(),
            &sample_schema(),
            WriterConfig::new(dir.path()),
        )
        .unwrap();

        let good = EdgeRecord {
            source: "rs123".to_string(),
            target: "BRCA1".to_string(),
            label: "Variant_In_Gene".to_string(),
            properties: PropertyMap::new(),
        };
        let mut bad = good.clone();
        bad.label = "Unmapped".to_string();
        bad.properties.insert(
            "chromosome".to_string(),
            PropertyValue::text("17"),
        );

        let err = writer
            .write_edges(&[good, bad], Some("dbsnp"))
            .unwrap_err();
        assert!(matches!(err, WriterError::UnknownEdgeLabel { .. }));

        // The first record stays (no rollback); the failing record left
        // nothing behind.
        let content = fs::read_to_string(dir.path().join("dbsnp").join(EDGES_FILE)).unwrap();
        assert_eq!(content, "(variant_in_gene (variant rs123) (gene BRCA1))\n");
    }

    #[test]
    fn excluded_properties_come_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = WriterConfig::new(dir.path());
        config.excluded_properties.insert("taxon".to_string());
        let writer =
            MettaWriter::new(&sample_ontology(), &sample_schema(), config).unwrap();

        let mut record = node("BRCA1", "Gene");
        record
            .properties
            .insert("taxon".to_string(), PropertyValue::text("9606"));
        writer.write_nodes(&[record], None).unwrap();
        let content = fs::read_to_string(dir.path().join(NODES_FILE)).unwrap();
        assert_eq!(content, "(gene BRCA1)\n");
    }
}
