//! MettaGen CLI
//!
//! Unified command-line interface for:
//! - Building a MeTTa knowledge graph from an ontology, a schema mapping and
//!   a manifest of record adapters (`build`)
//! - Emitting the type declarations alone (`types`)
//! - Inspecting an ontology's structure (`summary`)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use mettagen_atom::Adapter;
use mettagen_ontology::OntologyGraph;
use mettagen_schema::Schema;
use mettagen_writer::sink::TYPE_DEFS_FILE;
use mettagen_writer::{MettaWriter, WriterConfig};

mod registry;

use registry::{AdapterManifest, AdapterOptions, AdapterRegistry};

#[derive(Parser)]
#[command(name = "mettagen")]
#[command(
    author,
    version,
    about = "Generate MeTTa knowledge graphs from ontologies and typed records"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: type declarations, then every manifest adapter.
    Build {
        /// Ontology file (flat triples: rdf:type owl:Class / rdfs:subClassOf)
        #[arg(long)]
        ontology: PathBuf,
        /// Schema mapping (YAML or JSON)
        #[arg(long)]
        schema: PathBuf,
        /// Adapter manifest (YAML)
        #[arg(long)]
        adapters: PathBuf,
        /// Output directory root
        #[arg(short, long)]
        output_dir: PathBuf,
        /// Write properties to node and edge atoms
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        write_properties: bool,
        /// Add a `source` provenance property to every record
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        add_provenance: bool,
        /// Property keys to drop from every record (repeatable)
        #[arg(long = "exclude-property")]
        exclude_properties: Vec<String>,
    },

    /// Emit `type_defs.metta` only.
    Types {
        #[arg(long)]
        ontology: PathBuf,
        #[arg(long)]
        schema: PathBuf,
        #[arg(short, long)]
        output_dir: PathBuf,
    },

    /// Print an ontology structure summary.
    Summary {
        #[arg(long)]
        ontology: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            ontology,
            schema,
            adapters,
            output_dir,
            write_properties,
            add_provenance,
            exclude_properties,
        } => cmd_build(
            &ontology,
            &schema,
            &adapters,
            &output_dir,
            AdapterOptions {
                write_properties,
                add_provenance,
            },
            exclude_properties,
        ),
        Commands::Types {
            ontology,
            schema,
            output_dir,
        } => cmd_types(&ontology, &schema, &output_dir),
        Commands::Summary { ontology } => cmd_summary(&ontology),
    }
}

fn load_writer(
    ontology: &Path,
    schema: &Path,
    output_dir: &Path,
    exclude_properties: Vec<String>,
) -> Result<MettaWriter> {
    let graph = OntologyGraph::from_file(ontology)
        .with_context(|| format!("failed to load ontology {}", ontology.display()))?;
    let schema = Schema::from_file(schema)
        .with_context(|| format!("failed to load schema {}", schema.display()))?;

    let mut config = WriterConfig::new(output_dir);
    config.excluded_properties = exclude_properties.into_iter().collect();
    Ok(MettaWriter::new(&graph, &schema, config)?)
}

fn cmd_build(
    ontology: &Path,
    schema: &Path,
    adapters: &Path,
    output_dir: &Path,
    options: AdapterOptions,
    exclude_properties: Vec<String>,
) -> Result<()> {
    println!(
        "{} knowledge graph into {}",
        "Building".green().bold(),
        output_dir.display()
    );

    let writer = load_writer(ontology, schema, output_dir, exclude_properties)?;
    println!(
        "  {} {}",
        "→".cyan(),
        output_dir.join(TYPE_DEFS_FILE).display()
    );

    let manifest = AdapterManifest::from_file(adapters)?;
    let registry = AdapterRegistry::builtin();

    for (name, entry) in manifest.iter() {
        println!("{} adapter {}", "Running".green().bold(), name.bold());
        let adapter = registry
            .build(&entry.adapter.name, &entry.adapter.args, options)
            .with_context(|| format!("failed to construct adapter '{name}'"))?;
        let prefix = entry.outdir.as_deref();

        if entry.nodes {
            let records = adapter.nodes()?;
            let lines = writer.write_nodes(&records, prefix)?;
            println!(
                "  {} {} node atoms ({} records)",
                "→".cyan(),
                lines,
                records.len()
            );
        }
        if entry.edges {
            let records = adapter.edges()?;
            let lines = writer.write_edges(&records, prefix)?;
            println!(
                "  {} {} edge atoms ({} records)",
                "→".cyan(),
                lines,
                records.len()
            );
        }
    }

    println!("{}", "Done".green().bold());
    Ok(())
}

fn cmd_types(ontology: &Path, schema: &Path, output_dir: &Path) -> Result<()> {
    println!(
        "{} type declarations into {}",
        "Writing".green().bold(),
        output_dir.display()
    );
    load_writer(ontology, schema, output_dir, Vec::new())?;
    println!(
        "  {} {}",
        "→".cyan(),
        output_dir.join(TYPE_DEFS_FILE).display()
    );
    Ok(())
}

fn cmd_summary(ontology: &Path) -> Result<()> {
    let graph = OntologyGraph::from_file(ontology)
        .with_context(|| format!("failed to load ontology {}", ontology.display()))?;
    let summary = graph.summary();

    println!("{} {}", "Ontology".green().bold(), ontology.display());
    println!("  classes: {}", summary.classes);
    println!("  edges:   {}", summary.edges);
    println!("  mixins:  {}", summary.mixins);
    println!("  roots:");
    for root in &summary.roots {
        println!("    {}", root.cyan());
    }
    Ok(())
}
