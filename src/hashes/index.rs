//! Hash lookup index
//!
//! Built once per campaign from every encounter's base hash and every
//! difficulty variant's hash. Keys are the hash value trimmed and
//! lowercased, so `"  5F4DCC..."` and `"5f4dcc..."` hit the same entry.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::campaign::{Campaign, Encounter};
use crate::core::types::Difficulty;

/// What the index knows about one hash value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashEntry {
    pub solution: Option<String>,
    pub encounter_id: String,
    /// `None` for the encounter's base hash
    pub difficulty: Option<Difficulty>,
    pub hash_type: Option<String>,
    pub hints: Vec<String>,
}

/// Serializable lookup answer, present or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub found: bool,
    pub solution: Option<String>,
    pub encounter_id: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub hash_type: Option<String>,
    pub hints: Vec<String>,
}

impl LookupRecord {
    fn missing() -> Self {
        Self {
            found: false,
            solution: None,
            encounter_id: None,
            difficulty: None,
            hash_type: None,
            hints: Vec::new(),
        }
    }
}

impl From<&HashEntry> for LookupRecord {
    fn from(entry: &HashEntry) -> Self {
        Self {
            found: true,
            solution: entry.solution.clone(),
            encounter_id: Some(entry.encounter_id.clone()),
            difficulty: entry.difficulty,
            hash_type: entry.hash_type.clone(),
            hints: entry.hints.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    entries: AHashMap<String, HashEntry>,
}

impl HashIndex {
    /// Scan the campaign; a repeated hash keeps its last definition
    pub fn build(campaign: &Campaign) -> Self {
        let mut index = Self::default();

        for encounter in campaign.encounters() {
            if let Some(hash) = &encounter.hash {
                index.insert(hash, base_entry(encounter));
            }
            for level in Difficulty::ALL {
                let Some(variant) = encounter.variant(level) else {
                    continue;
                };
                let Some(hash) = &variant.hash else {
                    continue;
                };
                let hint = variant.hint.as_ref().or(encounter.hint.as_ref());
                index.insert(
                    hash,
                    HashEntry {
                        solution: variant.solution.clone().or_else(|| encounter.solution.clone()),
                        encounter_id: encounter.id.clone(),
                        difficulty: Some(level),
                        hash_type: variant
                            .hash_type
                            .clone()
                            .or_else(|| encounter.hash_type.clone()),
                        hints: hint.into_iter().cloned().collect(),
                    },
                );
            }
        }

        tracing::debug!("Indexed {} hashes for campaign '{}'", index.len(), campaign.id);
        index
    }

    fn insert(&mut self, hash: &str, entry: HashEntry) {
        let key = normalize_hash(hash);
        if key.is_empty() {
            return;
        }
        if let Some(previous) = self.entries.insert(key, entry) {
            tracing::debug!(
                "Hash reused: '{}' replaced by a later definition",
                previous.encounter_id
            );
        }
    }

    pub fn lookup(&self, hash: &str) -> Option<&HashEntry> {
        self.entries.get(&normalize_hash(hash))
    }

    pub fn lookup_record(&self, hash: &str) -> LookupRecord {
        self.lookup(hash).map_or_else(LookupRecord::missing, LookupRecord::from)
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.lookup(hash).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn base_entry(encounter: &Encounter) -> HashEntry {
    HashEntry {
        solution: encounter.solution.clone(),
        encounter_id: encounter.id.clone(),
        difficulty: None,
        hash_type: encounter.hash_type.clone(),
        hints: encounter.hint.iter().cloned().collect(),
    }
}

pub fn normalize_hash(hash: &str) -> String {
    hash.trim().to_lowercase()
}

/// Show the first `floor(chars x progress)` characters, mask the rest
///
/// `progress` is clamped to [0, 1]; NaN reveals nothing.
pub fn reveal(solution: &str, progress: f64, mask: char) -> String {
    let progress = if progress.is_nan() { 0.0 } else { progress.clamp(0.0, 1.0) };
    let total = solution.chars().count();
    let shown = ((total as f64) * progress).floor() as usize;

    solution
        .chars()
        .enumerate()
        .map(|(i, c)| if i < shown { c } else { mask })
        .collect()
}
