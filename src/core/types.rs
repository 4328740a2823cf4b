use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// A named entity in the knowledge graph. `name` is the primary key and is
/// compared case-sensitively; tags are compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub entity_type: String,
    pub observations: Vec<String>,
    pub tags: Vec<String>,
    pub importance: Option<f32>,
    pub parent_id: Option<String>,
    pub created_at: String,
    pub last_modified: String,
    pub last_accessed_at: String,
}

impl Entity {
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::validation("entity name must not be empty"));
        }
        let now = now_iso8601();
        Ok(Entity {
            name,
            entity_type: entity_type.into(),
            observations: Vec::new(),
            tags: Vec::new(),
            importance: None,
            parent_id: None,
            created_at: now.clone(),
            last_modified: now.clone(),
            last_accessed_at: now,
        })
    }

    /// Clamp importance into [0, 10] as the store does at write time.
    pub fn set_importance(&mut self, importance: f32) {
        self.importance = Some(importance.clamp(0.0, 10.0));
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Text the lexical/fuzzy layers index: name + type + observations.
    pub fn indexable_text(&self) -> String {
        let mut parts = Vec::with_capacity(2 + self.observations.len());
        parts.push(self.name.clone());
        parts.push(self.entity_type.clone());
        parts.extend(self.observations.iter().cloned());
        parts.join(" ")
    }
}

/// A directed, typed edge between two entities. Uniqueness is the
/// `(from, to, relation_type)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub from: String,
    pub to: String,
    pub relation_type: String,
    pub weight: Option<f32>,
    pub confidence: Option<f32>,
    pub properties: RelationProperties,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationProperties {
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub bidirectional: Option<bool>,
    pub source: Option<String>,
    pub method: Option<String>,
}

impl Relation {
    pub fn key(&self) -> (String, String, String) {
        (self.from.clone(), self.to.clone(), self.relation_type.clone())
    }
}

/// The authoritative set of entities and relations. Owned exclusively by the
/// storage backend; the retrieval core only ever holds a snapshot or
/// advances its indexes from change events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    pub entities: HashMap<String, Entity>,
    pub relations: Vec<Relation>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        KnowledgeGraph::default()
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn relations_touching(&self, name: &str) -> impl Iterator<Item = &Relation> {
        self.relations.iter().filter(move |r| r.from == name || r.to == name)
    }
}

/// AND-combined metadata predicate set (spec §4.7).
#[derive(Debug, Clone, Default)]
pub struct SymbolicFilters {
    pub tags: Option<Vec<String>>,
    pub entity_types: Option<Vec<String>>,
    pub date_range: Option<DateRange>,
    pub importance: Option<ImportanceRange>,
    pub parent_id: Option<String>,
    pub has_observations: Option<bool>,
}

impl SymbolicFilters {
    pub fn is_empty(&self) -> bool {
        self.tags.is_none()
            && self.entity_types.is_none()
            && self.date_range.is_none()
            && self.importance.is_none()
            && self.parent_id.is_none()
            && self.has_observations.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportanceRange {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}
