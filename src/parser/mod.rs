//! Entity source parser.
//!
//! Parsing runs in two passes over a batch: every source is parsed on its
//! own into an [`EntityDefinition`], then the resolver wires references
//! across the whole batch. Failures never escape [`parse_entities`]; they are
//! returned as data.

pub mod property;
pub mod types;

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::model::EntityDefinition;
use crate::resolver::{self, EntityIndex};
use crate::source::{EntitySource, SourceError, SourceProvider};

pub use property::{implied_entity, parse_property};
pub use types::clr_type_from_string;

static RE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s*(?::\s*(\w+))?$").unwrap());

/// Prefix of a comment line
pub const COMMENT_PREFIX: &str = "//";

/// Error that rejects a whole entity source
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("No entity definition found")]
    EmptyDefinition,

    #[error("Invalid entity header: {0}")]
    InvalidHeader(String),

    #[error("Duplicate entity '{name}' (already defined by {first_source})")]
    DuplicateEntity { name: String, first_source: String },
}

/// Result of parsing one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    /// Parsed and resolved entities, in source order
    pub entities: Vec<EntityDefinition>,
    /// One `"{source}: {message}"` entry per rejected source
    pub errors: Vec<String>,
}

impl ParseOutput {
    /// Errors recorded on individual property lines, as
    /// `"{entity}:{line}: {message}"`
    pub fn property_errors(&self) -> Vec<String> {
        self.entities
            .iter()
            .flat_map(|entity| {
                entity.invalid_properties().map(move |prop| {
                    format!(
                        "{}:{}: {}",
                        entity.name,
                        prop.line,
                        prop.parse_exception().unwrap_or_default()
                    )
                })
            })
            .collect()
    }

    /// True when no source was rejected and no property line failed
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.entities.iter().all(|e| e.invalid_properties().next().is_none())
    }

    /// Name index over the parsed entities
    pub fn index(&self) -> EntityIndex {
        EntityIndex::build(&self.entities)
    }
}

/// Parse the text of a single entity source.
///
/// The first non-comment line is the header (`Name[: BaseClass]`); every
/// other line is a property line. Property lines never fail the entity.
pub fn parse_entity(text: &str) -> Result<EntityDefinition, ParseError> {
    let mut comments = Vec::new();
    let mut lines = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match line.strip_prefix(COMMENT_PREFIX) {
            Some(comment) => comments.push(comment.trim().to_string()),
            None => lines.push((index + 1, line)),
        }
    }

    let mut lines = lines.into_iter();
    let (_, header) = lines.next().ok_or(ParseError::EmptyDefinition)?;

    let caps = RE_HEADER
        .captures(header)
        .ok_or_else(|| ParseError::InvalidHeader(header.to_string()))?;

    let mut entity = EntityDefinition::new(&caps[1], caps.get(2).map(|m| m.as_str().to_string()));
    entity.properties = lines
        .map(|(line_number, line)| parse_property(line, line_number))
        .collect();

    if !comments.is_empty() {
        entity.comments = Some(comments.join("\n"));
    }

    Ok(entity)
}

/// Parse a batch of entity sources and resolve references across it.
///
/// A source whose header is missing or malformed, or whose entity name
/// repeats an earlier one (case-insensitively), is left out of the entities
/// and recorded in `errors`. Parsing continues with the remaining sources.
pub fn parse_entities(sources: &[EntitySource]) -> ParseOutput {
    tracing::info!("Found {} entity sources", sources.len());

    let mut output = ParseOutput::default();
    let mut origins: Vec<&str> = Vec::with_capacity(sources.len());

    for source in sources {
        tracing::debug!("Source: {}, length: {}", source.name, source.text.len());

        let parsed = parse_entity(&source.text).and_then(|entity| {
            match output.entities.iter().position(|e| e.is_named(&entity.name)) {
                Some(pos) => Err(ParseError::DuplicateEntity {
                    name: entity.name,
                    first_source: origins[pos].to_string(),
                }),
                None => Ok(entity),
            }
        });

        match parsed {
            Ok(entity) => {
                tracing::debug!(
                    "Parsed entity {} ({} properties)",
                    entity.name,
                    entity.properties.len()
                );
                origins.push(&source.name);
                output.entities.push(entity);
            }
            Err(e) => {
                tracing::warn!("Error parsing {}: {}", source.name, e);
                output.errors.push(format!("{}: {}", source.name, e));
            }
        }
    }

    let index = EntityIndex::build(&output.entities);
    resolver::resolve(&mut output.entities, &index);

    tracing::info!(
        "Parsed {} entities, {} errors",
        output.entities.len(),
        output.errors.len()
    );

    output
}

/// Enumerate a provider and parse the whole batch
pub fn parse_provider(provider: &dyn SourceProvider) -> Result<ParseOutput, SourceError> {
    let sources = provider.entity_sources()?;
    Ok(parse_entities(&sources))
}
