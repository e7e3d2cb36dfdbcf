//! Mapping configuration section (`IEntityTypeConfiguration<T>`).

use crate::codegen::utils::{collection_name, navigation_name};
use crate::model::EntityDefinition;

/// Lines of `public class {Name}Configuration` through its closing brace
pub fn configuration_lines(entity: &EntityDefinition) -> Vec<String> {
    let mut lines = vec![
        format!(
            "public class {}Configuration : IEntityTypeConfiguration<{}>",
            entity.name, entity.name
        ),
        "{".to_string(),
        format!(
            "\tpublic void Configure(EntityTypeBuilder<{}> builder)",
            entity.name
        ),
        "\t{".to_string(),
    ];

    let groups = [
        property_statements(entity),
        index_statements(entity),
        relationship_statements(entity),
    ];

    for (i, group) in groups.into_iter().filter(|g| !g.is_empty()).enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(group.into_iter().map(|statement| format!("\t\t{}", statement)));
    }

    lines.push("\t}".to_string());
    lines.push("}".to_string());
    lines
}

/// Required-string, max-length and value-generation statements
fn property_statements(entity: &EntityDefinition) -> Vec<String> {
    let mut statements = Vec::new();

    for prop in entity.properties.iter().filter(|p| p.is_text() && !p.is_nullable) {
        let max_length = prop
            .max_length
            .map(|len| format!(".HasMaxLength({})", len))
            .unwrap_or_default();
        statements.push(format!(
            "builder.Property(x => x.{}).IsRequired(){};",
            prop.name, max_length
        ));
    }

    for prop in entity.properties.iter().filter(|p| p.is_text() && p.is_nullable) {
        if let Some(len) = prop.max_length {
            statements.push(format!(
                "builder.Property(x => x.{}).HasMaxLength({});",
                prop.name, len
            ));
        }
    }

    for prop in entity
        .properties
        .iter()
        .filter(|p| p.is_auto_increment && !p.is_parse_error())
    {
        statements.push(format!(
            "builder.Property(x => x.{}).ValueGeneratedOnAdd();",
            prop.name
        ));
    }

    statements
}

/// Unique index over every property flagged unique, in declaration order
fn index_statements(entity: &EntityDefinition) -> Vec<String> {
    let unique: Vec<&str> = entity
        .properties
        .iter()
        .filter(|p| p.is_unique && !p.is_parse_error())
        .map(|p| p.name.as_str())
        .collect();

    match unique.as_slice() {
        [] => Vec::new(),
        [single] => vec![format!("builder.HasIndex(e => e.{}).IsUnique();", single)],
        many => {
            let members: Vec<String> = many.iter().map(|name| format!("e.{}", name)).collect();
            vec![format!(
                "builder.HasIndex(e => new {{ {} }}).IsUnique();",
                members.join(", ")
            )]
        }
    }
}

/// One `HasOne(..).WithMany(..)` statement per reference property
fn relationship_statements(entity: &EntityDefinition) -> Vec<String> {
    entity
        .references()
        .map(|(prop, reference)| {
            let principal_key = reference
                .column
                .as_ref()
                .map(|column| format!(".HasPrincipalKey(x => x.{})", column))
                .unwrap_or_default();
            format!(
                "builder.HasOne(e => e.{}).WithMany(e => e.{}).HasForeignKey(x => x.{}){}.OnDelete(DeleteBehavior.Restrict);",
                navigation_name(prop),
                collection_name(entity, prop),
                prop.name,
                principal_key
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_entity;

    fn body(entity: &EntityDefinition) -> Vec<String> {
        let lines = configuration_lines(entity);
        lines[4..lines.len() - 2].to_vec()
    }

    #[test]
    fn test_empty_configuration_body() {
        let entity = parse_entity("Tag : BaseTable\nWeight int").unwrap();
        assert!(body(&entity).is_empty());
        assert_eq!(configuration_lines(&entity).len(), 6);
    }

    #[test]
    fn test_string_constraints_order() {
        let entity = parse_entity(
            "Client : BaseTable\nEmail string(50)?\nName string\nCode string(3)\nNote?",
        )
        .unwrap();
        assert_eq!(
            body(&entity),
            vec![
                "\t\tbuilder.Property(x => x.Name).IsRequired();",
                "\t\tbuilder.Property(x => x.Code).IsRequired().HasMaxLength(3);",
                "\t\tbuilder.Property(x => x.Email).HasMaxLength(50);",
            ]
        );
    }

    #[test]
    fn test_groups_are_separated_by_blank_lines() {
        let entity = parse_entity(
            "ClinicUser : BaseTable\n#ClinicId\n#UserId AspNetUsers.UserId <ClinicUsers\nSeq int++",
        )
        .unwrap();
        assert_eq!(
            body(&entity),
            vec![
                "\t\tbuilder.Property(x => x.Seq).ValueGeneratedOnAdd();",
                "",
                "\t\tbuilder.HasIndex(e => new { e.ClinicId, e.UserId }).IsUnique();",
                "",
                "\t\tbuilder.HasOne(e => e.Clinic).WithMany(e => e.ClinicUsers).HasForeignKey(x => x.ClinicId).OnDelete(DeleteBehavior.Restrict);",
                "\t\tbuilder.HasOne(e => e.User).WithMany(e => e.ClinicUsers).HasForeignKey(x => x.UserId).HasPrincipalKey(x => x.UserId).OnDelete(DeleteBehavior.Restrict);",
            ]
        );
    }

    #[test]
    fn test_single_unique_index() {
        let entity = parse_entity("Status : BaseTable\n#Code int").unwrap();
        assert_eq!(
            body(&entity),
            vec!["\t\tbuilder.HasIndex(e => e.Code).IsUnique();"]
        );
    }
}
