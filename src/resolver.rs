//! Cross-reference resolution over a parsed batch.
//!
//! Runs once, after every source of the batch has been parsed. Entities are
//! looked up by lower-cased name through an explicit [`EntityIndex`].

use indexmap::IndexMap;

use crate::model::{EntityDefinition, PropertyDefinition, PropertyKind};

/// Case-insensitive lookup from entity name to its position in the batch
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    by_name: IndexMap<String, usize>,
}

impl EntityIndex {
    /// Index a batch; on duplicate names the first entity wins
    pub fn build(entities: &[EntityDefinition]) -> Self {
        let mut by_name = IndexMap::with_capacity(entities.len());
        for (pos, entity) in entities.iter().enumerate() {
            by_name.entry(index_key(&entity.name)).or_insert(pos);
        }
        Self { by_name }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_name.get(&index_key(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&index_key(name))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Look an entity up in the batch the index was built from
    pub fn get<'a>(
        &self,
        entities: &'a [EntityDefinition],
        name: &str,
    ) -> Option<&'a EntityDefinition> {
        self.position(name).and_then(|pos| entities.get(pos))
    }
}

fn index_key(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Collection name for the entities owning a reference.
///
/// Appends `s` unless the name already ends in `s` (`Species` stays
/// `Species`). Deliberately not a linguistic pluralizer.
pub fn pluralize(name: &str) -> String {
    if name.ends_with('s') || name.ends_with('S') {
        name.to_string()
    } else {
        format!("{}s", name)
    }
}

/// A reference whose target is not part of the batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub entity: String,
    pub property: String,
    pub target: String,
}

/// Wire every reference property of the batch.
///
/// - a target matching a batch entity case-insensitively is rewritten to that
///   entity's declared name;
/// - a missing child collection is set to the pluralized owner name.
///
/// Targets outside the batch are kept as written.
pub fn resolve(entities: &mut [EntityDefinition], index: &EntityIndex) {
    let names: Vec<String> = entities.iter().map(|e| e.name.clone()).collect();

    for entity in entities.iter_mut() {
        let owner = entity.name.clone();

        for prop in entity.properties.iter_mut() {
            let PropertyDefinition { name, kind, .. } = prop;
            let PropertyKind::Reference(reference) = kind else {
                continue;
            };
            if reference.entity.is_empty() {
                continue;
            }

            match index.position(&reference.entity) {
                Some(pos) => reference.entity.clone_from(&names[pos]),
                None => tracing::warn!(
                    "{}.{} references unknown entity '{}'",
                    owner,
                    name,
                    reference.entity
                ),
            }

            if reference.child_collection.is_none() {
                reference.child_collection = Some(pluralize(&owner));
            }
        }
    }
}

/// List the references whose target is not in the batch
pub fn unresolved_references(
    entities: &[EntityDefinition],
    index: &EntityIndex,
) -> Vec<UnresolvedReference> {
    entities
        .iter()
        .flat_map(|entity| {
            entity
                .references()
                .filter(|(_, reference)| !index.contains(&reference.entity))
                .map(|(prop, reference)| UnresolvedReference {
                    entity: entity.name.clone(),
                    property: prop.name.clone(),
                    target: reference.entity.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(name: &str, properties: Vec<PropertyDefinition>) -> EntityDefinition {
        EntityDefinition {
            properties,
            ..EntityDefinition::new(name, None)
        }
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Breed"), "Breeds");
        assert_eq!(pluralize("Species"), "Species");
        assert_eq!(pluralize("Status"), "Status");
        assert_eq!(pluralize("Category"), "Categorys");
    }

    #[test]
    fn test_index_is_case_insensitive() {
        let batch = vec![entity("AppSpecies", vec![]), entity("Breed", vec![])];
        let index = EntityIndex::build(&batch);
        assert_eq!(index.position("appspecies"), Some(0));
        assert_eq!(index.position("BREED"), Some(1));
        assert!(!index.contains("Clinic"));
        assert_eq!(index.get(&batch, "breed").map(|e| e.name.as_str()), Some("Breed"));
    }

    #[test]
    fn test_resolve_sets_owner_collection_and_canonical_name() {
        let mut batch = vec![
            entity("AppSpecies", vec![]),
            entity("Breed", vec![PropertyDefinition::foreign_key("AppspeciesId", "Appspecies")]),
        ];
        let index = EntityIndex::build(&batch);
        resolve(&mut batch, &index);

        let prop = &batch[1].properties[0];
        assert_eq!(prop.referenced_entity(), Some("AppSpecies"));
        assert_eq!(prop.child_collection(), Some("Breeds"));
    }

    #[test]
    fn test_resolve_keeps_explicit_collection() {
        let mut prop = PropertyDefinition::foreign_key("OwnerClientId", "Client");
        prop.reference_mut().unwrap().child_collection = Some("OwnerPatients".to_string());
        let mut batch = vec![entity("Client", vec![]), entity("Patient", vec![prop])];

        let index = EntityIndex::build(&batch);
        resolve(&mut batch, &index);
        assert_eq!(batch[1].properties[0].child_collection(), Some("OwnerPatients"));
    }

    #[test]
    fn test_unknown_targets_pass_through() {
        let mut batch = vec![entity("Client", vec![PropertyDefinition::foreign_key("ClinicId", "Clinic")])];
        let index = EntityIndex::build(&batch);
        resolve(&mut batch, &index);

        assert_eq!(batch[0].properties[0].referenced_entity(), Some("Clinic"));
        assert_eq!(batch[0].properties[0].child_collection(), Some("Clients"));
        assert_eq!(
            unresolved_references(&batch, &index),
            vec![UnresolvedReference {
                entity: "Client".to_string(),
                property: "ClinicId".to_string(),
                target: "Clinic".to_string(),
            }]
        );
    }

    #[test]
    fn test_mutual_references_resolve() {
        let mut batch = vec![
            entity("Person", vec![PropertyDefinition::foreign_key("TeamId", "Team")]),
            entity("Team", vec![PropertyDefinition::foreign_key("CaptainId", "Person")]),
        ];
        let index = EntityIndex::build(&batch);
        resolve(&mut batch, &index);

        assert_eq!(batch[0].properties[0].child_collection(), Some("Persons"));
        assert_eq!(batch[1].properties[0].child_collection(), Some("Teams"));
        assert!(unresolved_references(&batch, &index).is_empty());
    }
}
