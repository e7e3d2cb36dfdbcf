//! Property line classifier.
//!
//! Grammar of one property line:
//!
//! ```text
//! line := ["#"] core ["=" default]
//! core := bare_id | id_type | entity_ref | custom_ref | inferred_ref
//! ```
//!
//! The suffix markers `?` (nullable) and `++` (auto-increment) are stripped
//! from `core` before its shape is matched.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{PropertyDefinition, PropertyKind, Reference, TEXT_TYPE};
use crate::parser::types::clr_type_from_string;

/// Suffix marking an implicit foreign key
pub const ID_SUFFIX: &str = "Id";

static RE_BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());
static RE_CUSTOM_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)\s+(\w+)\.(\w+)(\?)?\s*<\s*(\w+)$").unwrap()
});
static RE_ENTITY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s+(\w+)(\?)?\s*<\s*(\w+)$").unwrap());
static RE_INFERRED_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)(\?)?\s*<\s*(\w+)$").unwrap());
static RE_TYPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s+(\w+)(?:\(\s*(\d+)\s*\))?$").unwrap());

/// Entity implied by a foreign-key style name (`ClinicId` -> `Clinic`)
///
/// Returns `None` for names without the suffix and for the bare `Id`.
pub fn implied_entity(name: &str) -> Option<&str> {
    if name == ID_SUFFIX {
        return None;
    }
    name.strip_suffix(ID_SUFFIX)
}

/// Classify one trimmed, non-blank property line.
///
/// Never fails: a line that matches no shape becomes an invalid property
/// carrying the error message.
pub fn parse_property(line: &str, line_number: usize) -> PropertyDefinition {
    let mut core = line.trim();
    let mut is_unique = false;
    let mut default_value = None;
    let mut is_auto_increment = false;
    let mut is_nullable = false;

    if let Some(rest) = core.strip_prefix('#') {
        is_unique = true;
        core = rest.trim();
    }

    if let Some((head, literal)) = core.split_once('=') {
        let literal = literal.trim();
        if !literal.is_empty() {
            default_value = Some(literal.to_string());
        }
        core = head.trim();
    }

    loop {
        if let Some(rest) = core.strip_suffix("++") {
            is_auto_increment = true;
            core = rest.trim_end();
        } else if let Some(rest) = core.strip_suffix('?') {
            is_nullable = true;
            core = rest.trim_end();
        } else {
            break;
        }
    }

    let mut prop = classify_core(core, line);
    prop.is_unique = is_unique;
    prop.default_value = default_value;
    prop.is_auto_increment = is_auto_increment;
    prop.is_nullable |= is_nullable;
    prop.line = line_number;
    prop
}

/// Match the stripped core text against the property shapes, in priority order
fn classify_core(core: &str, line: &str) -> PropertyDefinition {
    if RE_BARE.is_match(core) {
        return match implied_entity(core) {
            Some(entity) => PropertyDefinition::foreign_key(core, entity),
            None => PropertyDefinition::scalar(core, TEXT_TYPE),
        };
    }

    if let Some(caps) = RE_CUSTOM_REF.captures(core) {
        let mut prop = explicit_reference(
            &caps[1],
            &caps[2],
            Some(caps[3].to_string()),
            &caps[5],
        );
        prop.is_nullable = caps.get(4).is_some();
        return prop;
    }

    if let Some(caps) = RE_ENTITY_REF.captures(core) {
        let mut prop = explicit_reference(&caps[1], &caps[2], None, &caps[4]);
        prop.is_nullable = caps.get(3).is_some();
        return prop;
    }

    if let Some(caps) = RE_INFERRED_REF.captures(core) {
        let name = &caps[1];
        if let Some(entity) = implied_entity(name) {
            let mut prop = explicit_reference(name, entity, None, &caps[3]);
            prop.is_nullable = caps.get(2).is_some();
            return prop;
        }
        return PropertyDefinition::invalid(
            name,
            format!(
                "Could not infer referenced entity from '{}' (expected a name ending in '{}'): {}",
                name, ID_SUFFIX, line
            ),
        );
    }

    if let Some(caps) = RE_TYPED.captures(core) {
        let name = &caps[1];
        let mut prop = PropertyDefinition::scalar(name, clr_type_from_string(&caps[2]));
        if let Some(length) = caps.get(3) {
            match length.as_str().parse::<u32>() {
                Ok(len) if len > 0 => prop.max_length = Some(len),
                _ => {
                    return PropertyDefinition::invalid(
                        name,
                        format!("Invalid max length '{}': {}", length.as_str(), line),
                    );
                }
            }
        }
        return prop;
    }

    PropertyDefinition::invalid(
        leading_identifier(core),
        format!("Could not parse property line: {}", line),
    )
}

fn explicit_reference(
    name: &str,
    entity: &str,
    column: Option<String>,
    collection: &str,
) -> PropertyDefinition {
    PropertyDefinition::new(
        name,
        PropertyKind::Reference(Reference {
            entity: entity.to_string(),
            column,
            child_collection: Some(collection.to_string()),
        }),
    )
}

/// Best-effort name for an unparseable line, so errors can point at it
fn leading_identifier(core: &str) -> String {
    core.chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}
