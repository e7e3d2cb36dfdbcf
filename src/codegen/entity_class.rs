//! Data class section of a generated entity file.

use crate::codegen::utils::{child_collections, navigation_name};
use crate::codegen::CodegenSettings;
use crate::model::{EntityDefinition, PropertyDefinition};

/// Lines of `public class {Name}` through its closing brace
pub fn entity_class_lines(
    settings: &CodegenSettings,
    entity: &EntityDefinition,
    all_entities: &[EntityDefinition],
) -> Vec<String> {
    let mut lines = vec![class_declaration(entity), "{".to_string()];

    if entity.base_class.is_none() && !entity.has_identity_property() {
        lines.push(format!("\tpublic {} Id {{ get; set; }}", settings.identity_type));
    }

    lines.extend(
        entity
            .properties
            .iter()
            .filter_map(property_line),
    );

    let mut navigation: Vec<String> = entity
        .references()
        .map(|(prop, reference)| {
            format!(
                "\tpublic {}? {} {{ get; set; }}",
                reference.entity,
                navigation_name(prop)
            )
        })
        .collect();

    navigation.extend(child_collections(entity, all_entities).into_iter().map(
        |collection| {
            format!(
                "\tpublic ICollection<{}> {} {{ get; set; }} = [];",
                collection.child, collection.name
            )
        },
    ));

    if !navigation.is_empty() {
        lines.push(String::new());
        lines.extend(navigation);
    }

    lines.push("}".to_string());
    lines
}

fn class_declaration(entity: &EntityDefinition) -> String {
    match &entity.base_class {
        Some(base) => format!("public class {} : {}", entity.name, base),
        None => format!("public class {}", entity.name),
    }
}

/// Field declaration of a scalar or foreign-key property
fn property_line(prop: &PropertyDefinition) -> Option<String> {
    let clr_type = prop.clr_type()?;
    let nullable = if prop.is_nullable { "?" } else { "" };

    let initializer = match prop.default_value.as_deref().map(str::trim) {
        Some(literal) if !literal.is_empty() => format!(" = {};", literal),
        _ if prop.is_text() && !prop.is_nullable => " = default!;".to_string(),
        _ => String::new(),
    };

    Some(format!(
        "\tpublic {}{} {} {{ get; set; }}{}",
        clr_type, nullable, prop.name, initializer
    ))
}
