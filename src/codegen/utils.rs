//! Naming helpers shared by the class and configuration renderers.

use crate::model::{EntityDefinition, PropertyDefinition};
use crate::parser::property::ID_SUFFIX;
use crate::resolver::pluralize;

/// Suffix given to a navigation property whose key name has no `Id` suffix
pub const NAVIGATION_SUFFIX: &str = "Navigation";

/// Strip a trailing `Id` (any case) from a property name.
///
/// Returns `None` when there is no such suffix or nothing would remain.
pub fn trim_id_suffix(name: &str) -> Option<&str> {
    let cut = name.len().checked_sub(ID_SUFFIX.len())?;
    if cut == 0 || !name.is_char_boundary(cut) {
        return None;
    }
    let (head, tail) = name.split_at(cut);
    tail.eq_ignore_ascii_case(ID_SUFFIX).then_some(head)
}

/// Name of the navigation property generated for a reference property
pub fn navigation_name(prop: &PropertyDefinition) -> String {
    match trim_id_suffix(&prop.name) {
        Some(trimmed) => trimmed.to_string(),
        None => format!("{}{}", prop.name, NAVIGATION_SUFFIX),
    }
}

/// Collection name a reference property maps to on its target
pub fn collection_name(owner: &EntityDefinition, prop: &PropertyDefinition) -> String {
    prop.child_collection()
        .map(str::to_string)
        .unwrap_or_else(|| pluralize(&owner.name))
}

/// Collection property exposed by a referenced entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCollection {
    /// Entity holding the reference
    pub child: String,
    /// Collection property name
    pub name: String,
}

/// Child collections of `target`: one per reference to it in the batch,
/// in batch and declaration order, deduplicated by collection name
pub fn child_collections(
    target: &EntityDefinition,
    all_entities: &[EntityDefinition],
) -> Vec<ChildCollection> {
    let mut collections: Vec<ChildCollection> = Vec::new();

    for owner in all_entities {
        for (prop, reference) in owner.references() {
            if !target.is_named(&reference.entity) {
                continue;
            }
            let name = collection_name(owner, prop);
            if collections.iter().any(|c| c.name == name) {
                continue;
            }
            collections.push(ChildCollection {
                child: owner.name.clone(),
                name,
            });
        }
    }

    collections
}
