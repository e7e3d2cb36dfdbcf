//! # Modelgen: Entity Notation to EF Core Code Generation
//!
//! Modelgen compiles a compact, line-oriented entity notation into Entity
//! Framework Core data classes and their `IEntityTypeConfiguration<T>`
//! mapping classes.
//!
//! ## Features
//!
//! - **Entity notation parser**: One entity per source, one property per line
//! - **Batch resolution**: References are wired across the whole batch, with child collections inferred
//! - **Code generation**: One deterministic `.cs` file per entity
//! - **Pluggable sources**: Read entities from a directory or from memory
//!
//! ## Example: Entity source
//!
//! ```text
//! // Breeds belong to an application-wide species
//! Breed : BaseTable
//! AppSpeciesId
//! #Name string(50)
//! Notes string?
//! OwnerClientId Client? <OwnedBreeds
//! ```
//!
//! ## Example: Library use
//!
//! ```
//! use modelgen::{parse_entities, render_all, CodegenSettings, EntitySource};
//!
//! let sources = vec![
//!     EntitySource::new("AppSpecies", "AppSpecies\n#Name string(50)"),
//!     EntitySource::new("Breed", "Breed : BaseTable\nAppSpeciesId\n#Name string(50)"),
//! ];
//! let output = parse_entities(&sources);
//! assert!(output.is_clean());
//!
//! let files = render_all(&CodegenSettings::default(), &output.entities);
//! assert_eq!(files[1].filename, "Breed.cs");
//! assert!(files[0].content.contains("public ICollection<Breed> Breeds { get; set; } = [];"));
//! ```

// Core modules
pub mod model;
pub mod source;
pub mod parser;
pub mod resolver;

// Code generation
pub mod codegen;

// Project configuration (modelgen.yaml)
pub mod config;

// Re-export key types
pub use model::{EntityDefinition, PropertyDefinition, PropertyKind, Reference};
pub use source::{DirectorySource, EntitySource, MemorySource, SourceError, SourceProvider};
pub use parser::{parse_entities, parse_entity, parse_provider, ParseError, ParseOutput};
pub use resolver::{pluralize, resolve, unresolved_references, EntityIndex, UnresolvedReference};

// Re-export codegen types
pub use codegen::{render_all, render_entity, write_files, CodegenSettings, GeneratedFile, WriteReport};

pub use config::{ConfigError, ProjectConfig};
