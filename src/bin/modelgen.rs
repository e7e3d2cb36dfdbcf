//! modelgen CLI - EF Core code generation from entity notation
//!
//! This CLI tool reads a directory of entity sources and writes one C# file
//! per entity, holding the data class and its mapping configuration.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use modelgen::config::CONFIG_FILE_NAME;
use modelgen::{
    parse_provider, unresolved_references, write_files, DirectorySource, ParseOutput,
    ProjectConfig,
};

#[derive(Parser)]
#[command(name = "modelgen")]
#[command(version, about = "EF Core code generation from entity notation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one C# file per entity
    Generate {
        /// Path to modelgen.yaml (optional; defaults apply when missing)
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,

        /// Entities directory (overrides `entities` from the config file)
        #[arg(short, long)]
        entities: Option<PathBuf>,

        /// Output directory (overrides `output` from the config file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Namespace of the generated files
        #[arg(short, long)]
        namespace: Option<String>,

        /// Namespace of the entity base classes
        #[arg(short, long)]
        base_namespace: Option<String>,
    },

    /// Parse and resolve entity sources without generating code
    Check {
        /// Path to modelgen.yaml (optional; defaults apply when missing)
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,

        /// Entities directory (overrides `entities` from the config file)
        #[arg(short, long)]
        entities: Option<PathBuf>,

        /// Print the resolved model as JSON
        #[arg(long)]
        dump: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { config, entities, output, namespace, base_namespace } => {
            generate(config, entities, output, namespace, base_namespace)
        }
        Commands::Check { config, entities, dump } => check(config, entities, dump),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Load modelgen.yaml when present, otherwise fall back to defaults
fn load_config(config: &Path) -> Result<ProjectConfig, String> {
    if config.exists() {
        ProjectConfig::from_file(config).map_err(|e| e.to_string())
    } else {
        tracing::debug!("{} not found, using defaults", config.display());
        Ok(ProjectConfig::default())
    }
}

/// Parse every source of the entities directory
fn load_entities(entities_dir: &Path) -> Result<ParseOutput, String> {
    if !entities_dir.is_dir() {
        return Err(format!("Entities directory not found: {}", entities_dir.display()));
    }

    parse_provider(&DirectorySource::new(entities_dir))
        .map_err(|e| format!("Failed to load entities: {}", e))
}

/// Print batch and property errors; returns the number printed
fn report_errors(output: &ParseOutput) -> usize {
    let mut count = 0;
    for error in output.errors.iter().chain(output.property_errors().iter()) {
        eprintln!("  ✗ {}", error);
        count += 1;
    }
    count
}

/// Generate EF Core sources from entity notation
fn generate(
    config: PathBuf,
    entities: Option<PathBuf>,
    output: Option<PathBuf>,
    namespace: Option<String>,
    base_namespace: Option<String>,
) -> Result<(), String> {
    let mut project = load_config(&config)?;

    // CLI flags win over the config file
    if let Some(entities) = entities {
        project.entities = entities;
    }
    if let Some(output) = output {
        project.output = output;
    }
    if let Some(namespace) = namespace {
        project.default_namespace = namespace;
    }
    if base_namespace.is_some() {
        project.base_class_namespace = base_namespace;
    }
    project.validate().map_err(|e| e.to_string())?;

    println!("🔧 Generating code from {}...", project.entities.display());

    let parsed = load_entities(&project.entities)?;
    let errors = report_errors(&parsed);
    if errors > 0 {
        return Err(format!("{} errors found, no files generated", errors));
    }
    println!("  ✓ Parsed {} entities", parsed.entities.len());

    let report = write_files(&project.codegen_settings(), &parsed.entities, &project.output)
        .map_err(|e| format!("Failed to write files: {}", e))?;

    for path in &report.written {
        println!("  ✓ Generated {}", path.display());
    }
    for path in &report.skipped {
        println!("  - Skipped {} (already exists)", path.display());
    }

    println!(
        "✅ {} files written to {}",
        report.written.len(),
        project.output.display()
    );

    Ok(())
}

/// Validate entity sources without generating code
fn check(config: PathBuf, entities: Option<PathBuf>, dump: bool) -> Result<(), String> {
    let mut project = load_config(&config)?;
    if let Some(entities) = entities {
        project.entities = entities;
    }

    println!("🔍 Checking entities in {}...", project.entities.display());

    let parsed = load_entities(&project.entities)?;

    if dump {
        let json = serde_json::to_string_pretty(&parsed.entities)
            .map_err(|e| format!("Failed to serialize model: {}", e))?;
        println!("{}", json);
    }

    for unresolved in unresolved_references(&parsed.entities, &parsed.index()) {
        println!(
            "  ! {}.{} references '{}', which is not in this batch",
            unresolved.entity, unresolved.property, unresolved.target
        );
    }

    let errors = report_errors(&parsed);
    if errors > 0 {
        return Err(format!("{} errors found", errors));
    }

    println!("✅ {} entities are valid!", parsed.entities.len());

    Ok(())
}
