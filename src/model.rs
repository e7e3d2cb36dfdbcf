//! Entity model produced by the parser and consumed by the code generator.
//!
//! Entities refer to each other by name only. The resolver fills in the
//! derived relationship data (canonical target names, child collections)
//! once the whole batch has been parsed.

use serde::{Deserialize, Serialize};

/// Key column type used for every reference property.
pub const REFERENCE_KEY_TYPE: &str = "int";

/// Type emitted for text scalars, and the type a bare property name defaults to.
pub const TEXT_TYPE: &str = "string";

/// One entity parsed from a single entity source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDefinition {
    pub name: String,
    /// Parent type; `None` means the entity needs its own identity property
    #[serde(default)]
    pub base_class: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    /// `//` comment lines of the source, joined by newlines
    #[serde(default)]
    pub comments: Option<String>,
}

impl EntityDefinition {
    /// Create an entity with no properties
    pub fn new(name: impl Into<String>, base_class: Option<String>) -> Self {
        Self {
            name: name.into(),
            base_class,
            ..Default::default()
        }
    }

    /// Case-insensitive name comparison, the rule used for every entity lookup
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Iterate over the reference properties of this entity
    pub fn references(&self) -> impl Iterator<Item = (&PropertyDefinition, &Reference)> {
        self.properties
            .iter()
            .filter_map(|p| p.reference().map(|r| (p, r)))
    }

    /// Properties that could not be classified
    pub fn invalid_properties(&self) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties.iter().filter(|p| p.is_parse_error())
    }

    /// Whether the entity declares a property named exactly `Id`
    pub fn has_identity_property(&self) -> bool {
        self.properties.iter().any(|p| p.name == "Id")
    }
}

/// One property line of an entity source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(default)]
    pub max_length: Option<u32>,
    #[serde(default)]
    pub is_nullable: bool,
    /// Literal initializer text, emitted as written
    #[serde(default)]
    pub default_value: Option<String>,
    /// Part of the entity's uniqueness constraint
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub is_auto_increment: bool,
    /// 1-based line number in the entity source
    #[serde(default)]
    pub line: usize,
}

/// Resolution state of a property: exactly one of scalar, reference or invalid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PropertyKind {
    /// Plain column with a CLR type
    Scalar { clr_type: String },
    /// Foreign key column pointing at another entity
    Reference(Reference),
    /// The line could not be classified
    Invalid { message: String },
}

/// Target of a reference property
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Name of the referenced entity
    pub entity: String,
    /// Non-default key column on the referenced entity
    #[serde(default)]
    pub column: Option<String>,
    /// Collection the referenced entity exposes back to the owner
    #[serde(default)]
    pub child_collection: Option<String>,
}

impl PropertyDefinition {
    /// A property with the given kind and no markers
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            max_length: None,
            is_nullable: false,
            default_value: None,
            is_unique: false,
            is_auto_increment: false,
            line: 0,
        }
    }

    pub fn scalar(name: impl Into<String>, clr_type: impl Into<String>) -> Self {
        Self::new(
            name,
            PropertyKind::Scalar {
                clr_type: clr_type.into(),
            },
        )
    }

    pub fn foreign_key(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(
            name,
            PropertyKind::Reference(Reference {
                entity: entity.into(),
                ..Default::default()
            }),
        )
    }

    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            name,
            PropertyKind::Invalid {
                message: message.into(),
            },
        )
    }

    /// Stored column type; references always store an integer key
    pub fn clr_type(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Scalar { clr_type } => Some(clr_type),
            PropertyKind::Reference(_) => Some(REFERENCE_KEY_TYPE),
            PropertyKind::Invalid { .. } => None,
        }
    }

    pub fn reference(&self) -> Option<&Reference> {
        match &self.kind {
            PropertyKind::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn reference_mut(&mut self) -> Option<&mut Reference> {
        match &mut self.kind {
            PropertyKind::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub fn referenced_entity(&self) -> Option<&str> {
        self.reference().map(|r| r.entity.as_str())
    }

    pub fn child_collection(&self) -> Option<&str> {
        self.reference().and_then(|r| r.child_collection.as_deref())
    }

    pub fn is_text(&self) -> bool {
        matches!(&self.kind, PropertyKind::Scalar { clr_type } if clr_type == TEXT_TYPE)
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self.kind, PropertyKind::Invalid { .. })
    }

    /// Message recorded for an unclassifiable line
    pub fn parse_exception(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Invalid { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_reports_integer_key_type() {
        let prop = PropertyDefinition::foreign_key("ClinicId", "Clinic");
        assert_eq!(prop.clr_type(), Some("int"));
        assert_eq!(prop.referenced_entity(), Some("Clinic"));
        assert_eq!(prop.child_collection(), None);
        assert!(!prop.is_text());
    }

    #[test]
    fn test_invalid_property_has_no_type() {
        let prop = PropertyDefinition::invalid("", "Could not parse property line: ???");
        assert!(prop.is_parse_error());
        assert_eq!(prop.clr_type(), None);
        assert_eq!(
            prop.parse_exception(),
            Some("Could not parse property line: ???")
        );
    }

    #[test]
    fn test_entity_name_match_ignores_case() {
        let entity = EntityDefinition::new("AppSpecies", None);
        assert!(entity.is_named("appspecies"));
        assert!(entity.is_named("APPSPECIES"));
        assert!(!entity.is_named("Species"));
    }

    #[test]
    fn test_serialized_kind_is_tagged() {
        let prop = PropertyDefinition::scalar("Name", "string");
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(json["kind"]["state"], "scalar");
        assert_eq!(json["kind"]["clr_type"], "string");

        let back: PropertyDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, prop);
    }
}
