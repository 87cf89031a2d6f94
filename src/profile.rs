use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structured usage profile produced by the upstream extraction stage.
///
/// Read-only input to the generation pipeline. Ranked lists arrive ordered
/// descending by score/count; this crate trusts the upstream ordering. Every
/// field tolerates being absent so a sparse profile still deserializes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub stats: UsageStats,
    pub archetype: Archetype,
    pub themes: Vec<Theme>,
    pub phrases: BTreeMap<NgramOrder, Vec<PhraseEntry>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageStats {
    pub messages: u64,
    pub days: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Archetype {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub title: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseEntry {
    pub phrase: String,
    #[serde(default)]
    pub count: u64,
}

/// N-gram order of a ranked phrase list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NgramOrder {
    Unigram,
    Bigram,
    Trigram,
}

impl Profile {
    /// Parse a profile from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        serde_json::from_str(raw).map_err(|e| ProfileError::Parse(e.to_string()))
    }

    /// Highest-ranked theme with a non-empty title.
    pub fn top_theme(&self) -> Option<&Theme> {
        self.themes.iter().find(|t| !t.title.trim().is_empty())
    }

    /// Second-ranked theme with a non-empty title.
    pub fn second_theme(&self) -> Option<&Theme> {
        self.themes
            .iter()
            .filter(|t| !t.title.trim().is_empty())
            .nth(1)
    }

    /// Top-ranked phrase of the given n-gram order.
    pub fn top_phrase(&self, order: NgramOrder) -> Option<&PhraseEntry> {
        self.phrases
            .get(&order)?
            .iter()
            .find(|p| !p.phrase.trim().is_empty())
    }

    /// Archetype name, or `None` when the classifier produced nothing.
    pub fn archetype_name(&self) -> Option<&str> {
        let name = self.archetype.name.trim();
        if name.is_empty() { None } else { Some(name) }
    }
}
