//! Adapter registry and run manifest.
//!
//! Adapters are looked up by name in a registry populated at startup, then
//! constructed from the manifest entry's `args` mapping. The manifest mirrors
//! the run configuration shape:
//!
//! ```yaml
//! bto:
//!   adapter:
//!     name: rdf
//!     args:
//!       path: data/bto.owl
//!   nodes: true
//!   edges: true
//!   outdir: bto
//! ```

use anyhow::{anyhow, Context, Result};
use mettagen_atom::Adapter;
use mettagen_ingest_json::JsonAdapter;
use mettagen_ingest_rdf::RdfAdapter;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Run-wide flags threaded into every adapter construction.
#[derive(Debug, Clone, Copy)]
pub struct AdapterOptions {
    pub write_properties: bool,
    pub add_provenance: bool,
}

pub type AdapterFactory =
    Box<dyn Fn(&serde_yaml::Value, AdapterOptions) -> Result<Box<dyn Adapter>>>;

/// Mapping from adapter name to constructor.
pub struct AdapterRegistry {
    factories: BTreeMap<String, AdapterFactory>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with the built-in `rdf` and `json` adapters.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("rdf", Box::new(build_rdf_adapter));
        registry.register("json", Box::new(build_json_adapter));
        registry
    }

    pub fn register(&mut self, name: &str, factory: AdapterFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Construct the named adapter, failing on unknown names.
    pub fn build(
        &self,
        name: &str,
        args: &serde_yaml::Value,
        options: AdapterOptions,
    ) -> Result<Box<dyn Adapter>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            anyhow!(
                "unknown adapter '{name}' (registered: {})",
                self.names().join(", ")
            )
        })?;
        factory(args, options)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Args shared by the file-backed built-in adapters.
#[derive(Debug, Deserialize)]
struct FileAdapterArgs {
    path: PathBuf,
}

fn build_rdf_adapter(args: &serde_yaml::Value, options: AdapterOptions) -> Result<Box<dyn Adapter>> {
    let args: FileAdapterArgs =
        serde_yaml::from_value(args.clone()).context("invalid args for the rdf adapter")?;
    let adapter = RdfAdapter::from_file(&args.path, options.write_properties, options.add_provenance)?;
    Ok(Box::new(adapter))
}

fn build_json_adapter(
    args: &serde_yaml::Value,
    options: AdapterOptions,
) -> Result<Box<dyn Adapter>> {
    let args: FileAdapterArgs =
        serde_yaml::from_value(args.clone()).context("invalid args for the json adapter")?;
    let adapter =
        JsonAdapter::from_file(&args.path, options.write_properties, options.add_provenance)?;
    Ok(Box::new(adapter))
}

// ============================================================================
// Run manifest
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AdapterSpec {
    pub name: String,
    #[serde(default)]
    pub args: serde_yaml::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub adapter: AdapterSpec,
    #[serde(default = "default_true")]
    pub nodes: bool,
    #[serde(default = "default_true")]
    pub edges: bool,
    #[serde(default)]
    pub outdir: Option<String>,
}

fn default_true() -> bool {
    true
}

/// The per-run adapter manifest, iterated in key order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AdapterManifest {
    pub entries: BTreeMap<String, ManifestEntry>,
}

impl AdapterManifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read adapter manifest {}", path.display()))?;
        serde_yaml::from_str(&content).context("invalid adapter manifest")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unknown_adapter_name_fails() {
        let registry = AdapterRegistry::builtin();
        let options = AdapterOptions {
            write_properties: true,
            add_provenance: false,
        };
        let err = registry
            .build("graphql", &serde_yaml::Value::Null, options)
            .unwrap_err();
        assert!(err.to_string().contains("unknown adapter"));
    }

    #[test]
    fn builtin_names_are_registered() {
        let registry = AdapterRegistry::builtin();
        assert_eq!(registry.names(), vec!["json", "rdf"]);
    }

    #[test]
    fn json_factory_builds_from_manifest_args() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"nodes": [{{"id": "BRCA1", "label": "Gene"}}]}}"#
        )
        .unwrap();

        let args: serde_yaml::Value =
            serde_yaml::from_str(&format!("path: {}", file.path().display())).unwrap();
        let registry = AdapterRegistry::builtin();
        let adapter = registry
            .build(
                "json",
                &args,
                AdapterOptions {
                    write_properties: true,
                    add_provenance: false,
                },
            )
            .unwrap();
        assert_eq!(adapter.nodes().unwrap().len(), 1);
    }

    #[test]
    fn manifest_parses_with_defaults() {
        let manifest: AdapterManifest = serde_yaml::from_str(
            r#"
bto:
  adapter:
    name: rdf
    args:
      path: data/bto.owl
  outdir: bto
dbsnp:
  adapter:
    name: json
    args:
      path: data/dbsnp.json
  nodes: false
"#,
        )
        .unwrap();

        let entries: Vec<_> = manifest.iter().collect();
        assert_eq!(entries.len(), 2);

        let (name, bto) = entries[0];
        assert_eq!(name, "bto");
        assert_eq!(bto.adapter.name, "rdf");
        assert!(bto.nodes && bto.edges);
        assert_eq!(bto.outdir.as_deref(), Some("bto"));

        let (_, dbsnp) = entries[1];
        assert!(!dbsnp.nodes);
        assert!(dbsnp.edges);
        assert_eq!(dbsnp.outdir, None);
    }
}
