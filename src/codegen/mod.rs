//! Entity Framework Core code generation.
//!
//! Each entity is rendered into one `.cs` file holding the data class and its
//! `IEntityTypeConfiguration<T>` mapping class. Output is built as a list of
//! lines joined once at the end; it depends only on declaration order and
//! batch order, so the same model always renders to the same bytes.

pub mod configuration;
pub mod entity_class;
pub mod fs_utils;
pub mod utils;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::EntityDefinition;

/// Extension of generated files
pub const FILE_EXTENSION: &str = "cs";

/// Imports emitted at the top of every generated file
pub const FRAMEWORK_USINGS: &[&str] = &[
    "Microsoft.EntityFrameworkCore",
    "Microsoft.EntityFrameworkCore.Metadata.Builders",
];

/// Options stamped into generated code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodegenSettings {
    /// Type of the identity property added to entities without a base class
    #[serde(default = "default_identity_type")]
    pub identity_type: String,
    /// Namespace declared by every generated file (e.g. `SpayWise.Data`)
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    /// Namespace of the base classes (e.g. `SpayWise.Data.Conventions`)
    #[serde(default)]
    pub base_class_namespace: Option<String>,
}

fn default_identity_type() -> String {
    "int".to_string()
}

fn default_namespace() -> String {
    "Generated".to_string()
}

impl Default for CodegenSettings {
    fn default() -> Self {
        Self {
            identity_type: default_identity_type(),
            default_namespace: default_namespace(),
            base_class_namespace: None,
        }
    }
}

/// One rendered entity file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// `{EntityName}.cs`
    pub filename: String,
    pub content: String,
}

/// Render the source file of one entity.
///
/// `all_entities` is the resolved batch; it supplies the child collections
/// other entities point at this one. Properties that failed to parse are
/// skipped, callers are expected to check parse errors before rendering.
pub fn render_entity(
    settings: &CodegenSettings,
    entity: &EntityDefinition,
    all_entities: &[EntityDefinition],
) -> String {
    let mut lines: Vec<String> = FRAMEWORK_USINGS
        .iter()
        .map(|namespace| format!("using {};", namespace))
        .collect();

    if entity.base_class.is_some() {
        if let Some(namespace) = settings
            .base_class_namespace
            .as_deref()
            .filter(|ns| !ns.trim().is_empty())
        {
            lines.push(format!("using {};", namespace));
        }
    }

    lines.push(String::new());
    lines.push(format!("namespace {};", settings.default_namespace));
    lines.push(String::new());

    lines.extend(entity_class::entity_class_lines(settings, entity, all_entities));
    lines.push(String::new());
    lines.extend(configuration::configuration_lines(entity));

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// Render every entity of a resolved batch, in batch order
pub fn render_all(settings: &CodegenSettings, entities: &[EntityDefinition]) -> Vec<GeneratedFile> {
    entities
        .iter()
        .map(|entity| GeneratedFile {
            filename: format!("{}.{}", entity.name, FILE_EXTENSION),
            content: render_entity(settings, entity, entities),
        })
        .collect()
}

/// Outcome of [`write_files`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    /// Files left untouched because they already existed
    pub skipped: Vec<PathBuf>,
}

/// Render a batch and write one file per entity into `output_dir`.
///
/// Existing files are never overwritten.
pub fn write_files(
    settings: &CodegenSettings,
    entities: &[EntityDefinition],
    output_dir: &Path,
) -> std::io::Result<WriteReport> {
    let mut report = WriteReport::default();

    for file in render_all(settings, entities) {
        let path = output_dir.join(&file.filename);
        if fs_utils::write_new_file(&path, &file.content)? {
            tracing::debug!("Generated {}", path.display());
            report.written.push(path);
        } else {
            tracing::warn!("'{}' already exists, skipping", file.filename);
            report.skipped.push(path);
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_entities;
    use crate::source::EntitySource;

    fn batch(sources: &[(&str, &str)]) -> Vec<EntityDefinition> {
        let sources: Vec<EntitySource> = sources
            .iter()
            .map(|(name, text)| EntitySource::new(*name, *text))
            .collect();
        let output = parse_entities(&sources);
        assert!(output.errors.is_empty(), "{:?}", output.errors);
        output.entities
    }

    #[test]
    fn test_render_customer_with_default() {
        let entities = batch(&[("Customer", "Customer : BaseTable\nIsActive bool = true")]);
        let settings = CodegenSettings {
            default_namespace: "Shop.Data".to_string(),
            base_class_namespace: Some("Shop.Data.Conventions".to_string()),
            ..Default::default()
        };

        let expected = "\
using Microsoft.EntityFrameworkCore;
using Microsoft.EntityFrameworkCore.Metadata.Builders;
using Shop.Data.Conventions;

namespace Shop.Data;

public class Customer : BaseTable
{
\tpublic bool IsActive { get; set; } = true;
}

public class CustomerConfiguration : IEntityTypeConfiguration<Customer>
{
\tpublic void Configure(EntityTypeBuilder<Customer> builder)
\t{
\t}
}
";
        assert_eq!(render_entity(&settings, &entities[0], &entities), expected);
    }

    #[test]
    fn test_base_namespace_needs_base_class() {
        let entities = batch(&[("Tag", "Tag\nName")]);
        let settings = CodegenSettings {
            base_class_namespace: Some("Shop.Conventions".to_string()),
            ..Default::default()
        };
        let content = render_entity(&settings, &entities[0], &entities);
        assert!(!content.contains("using Shop.Conventions;"));
        assert!(content.contains("namespace Generated;"));
        assert!(content.contains("\tpublic int Id { get; set; }\n\tpublic string Name { get; set; } = default!;\n}"));
    }

    #[test]
    fn test_render_all_names_files() {
        let entities = batch(&[
            ("Order", "Order : BaseTable\nCustomerId"),
            ("Customer", "Customer : BaseTable\nName string(100)"),
        ]);
        let files = render_all(&CodegenSettings::default(), &entities);
        let names: Vec<_> = files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["Order.cs", "Customer.cs"]);
        assert!(files[1]
            .content
            .contains("\tpublic ICollection<Order> Orders { get; set; } = [];"));
        assert!(files[0]
            .content
            .contains("\tpublic Customer? Customer { get; set; }"));
    }

    #[test]
    fn test_self_reference_lists_own_collection() {
        let entities = batch(&[("Employee", "Employee : BaseTable\nManagerId Employee? <Reports")]);
        let content = render_entity(&CodegenSettings::default(), &entities[0], &entities);
        assert!(content.contains("\tpublic int? ManagerId { get; set; }"));
        assert!(content.contains("\tpublic Employee? Manager { get; set; }"));
        assert!(content.contains("\tpublic ICollection<Employee> Reports { get; set; } = [];"));
        assert!(content.contains(
            "builder.HasOne(e => e.Manager).WithMany(e => e.Reports).HasForeignKey(x => x.ManagerId).OnDelete(DeleteBehavior.Restrict);"
        ));
    }

    #[test]
    fn test_write_files_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        let entities = batch(&[
            ("Clinic", "Clinic : BaseTable\nName"),
            ("Client", "Client : BaseTable\nClinicId"),
        ]);
        std::fs::write(dir.path().join("Clinic.cs"), "// hand edited\n").unwrap();

        let report = write_files(&CodegenSettings::default(), &entities, dir.path()).unwrap();
        assert_eq!(report.written, vec![dir.path().join("Client.cs")]);
        assert_eq!(report.skipped, vec![dir.path().join("Clinic.cs")]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("Clinic.cs")).unwrap(),
            "// hand edited\n"
        );
    }
}
