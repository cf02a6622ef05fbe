//! Searchable records as returned by the search provider

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-assigned identifier. Providers use either numeric or string ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(u64),
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        EntityId::Number(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

/// A single searchable record. Never mutated by the picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Image URI
    #[serde(default)]
    pub image: String,
    /// Episode identifiers, in provider order
    #[serde(default)]
    pub episode: Vec<String>,
}

impl Entity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            episode: Vec::new(),
        }
    }

    pub fn episode_count(&self) -> usize {
        self.episode.len()
    }

    pub fn episode_label(&self) -> String {
        format!("{} Episodes", self.episode_count())
    }
}

/// Response body of `GET <endpoint>?name=<query>`
#[derive(Debug, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    results: Option<Vec<Entity>>,
}

impl SearchPage {
    pub fn into_results(self) -> Vec<Entity> {
        self.results.unwrap_or_default()
    }
}
