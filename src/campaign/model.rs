//! Campaign data model
//!
//! A campaign is stored arena-style: the `Campaign` owns one flat list of
//! encounters and one list of chapters, and everything refers to everything
//! else by string id. Id lookups go through index maps built as chapters are
//! pushed. Nothing here is mutated once loading finishes; share it behind an
//! `Arc` between any number of adventures.

use ahash::AHashMap;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::types::{Difficulty, EncounterKind};

/// A branch option on a fork encounter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: String,
    /// Encounter id the choice routes to
    pub leads_to: String,
    /// Picking an incorrect option is a failure, wherever it leads
    pub is_correct: bool,
}

impl Choice {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        leads_to: impl Into<String>,
        is_correct: bool,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            leads_to: leads_to.into(),
            is_correct,
        }
    }
}

/// Per-difficulty override of an encounter's challenge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncounterVariant {
    pub hash: Option<String>,
    pub hash_type: Option<String>,
    pub hint: Option<String>,
    pub solution: Option<String>,
    pub xp_reward: Option<u32>,
}

/// A single challenge or narrative unit
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    /// Unique across the whole campaign
    pub id: String,
    pub title: String,
    pub kind: EncounterKind,
    pub intro_text: String,
    pub success_text: String,
    pub failure_text: String,
    pub objective: String,
    pub hint: Option<String>,
    pub solution: Option<String>,
    pub hash: Option<String>,
    pub hash_type: Option<String>,
    /// External hash list, already resolved against the campaign directory
    pub hash_file: Option<PathBuf>,
    pub next_encounter: Option<String>,
    pub choices: Vec<Choice>,
    pub is_checkpoint: bool,
    /// Difficulty tier, 0-6
    pub tier: u8,
    pub xp_reward: u32,
    pub variants: BTreeMap<Difficulty, EncounterVariant>,
}

impl Encounter {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: EncounterKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            intro_text: String::new(),
            success_text: String::new(),
            failure_text: String::new(),
            objective: String::new(),
            hint: None,
            solution: None,
            hash: None,
            hash_type: None,
            hash_file: None,
            next_encounter: None,
            choices: Vec::new(),
            is_checkpoint: false,
            tier: 0,
            xp_reward: 0,
            variants: BTreeMap::new(),
        }
    }

    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.next_encounter = Some(next.into());
        self
    }

    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp_reward = xp;
        self
    }

    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>, hash_type: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self.hash_type = Some(hash_type.into());
        self
    }

    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.solution = Some(solution.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_variant(mut self, level: Difficulty, variant: EncounterVariant) -> Self {
        self.variants.insert(level, variant);
        self
    }

    pub fn with_tier(mut self, tier: u8) -> Self {
        self.tier = tier;
        self
    }

    pub fn checkpoint(mut self) -> Self {
        self.is_checkpoint = true;
        self
    }

    pub fn variant(&self, level: Difficulty) -> Option<&EncounterVariant> {
        self.variants.get(&level)
    }

    pub fn effective_hash(&self, level: Difficulty) -> Option<&str> {
        self.variant(level)
            .and_then(|v| v.hash.as_deref())
            .or(self.hash.as_deref())
    }

    pub fn effective_hash_type(&self, level: Difficulty) -> Option<&str> {
        self.variant(level)
            .and_then(|v| v.hash_type.as_deref())
            .or(self.hash_type.as_deref())
    }

    pub fn effective_hint(&self, level: Difficulty) -> Option<&str> {
        self.variant(level)
            .and_then(|v| v.hint.as_deref())
            .or(self.hint.as_deref())
    }

    pub fn effective_solution(&self, level: Difficulty) -> Option<&str> {
        self.variant(level)
            .and_then(|v| v.solution.as_deref())
            .or(self.solution.as_deref())
    }

    /// Unscaled reward for `level`; a variant never pays less than the base
    pub fn effective_xp(&self, level: Difficulty) -> u32 {
        match self.variant(level).and_then(|v| v.xp_reward) {
            Some(xp) => xp.max(self.xp_reward),
            None => self.xp_reward,
        }
    }

    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Whether the encounter offers any way forward on its own
    pub fn has_exit(&self) -> bool {
        self.next_encounter.is_some() || self.has_choices() || self.kind.is_branching()
    }
}

/// An ordered group of encounters
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub first_encounter: String,
    pub intro_text: String,
    pub outro_text: String,
    /// Indices into the campaign's encounter arena, in document order
    encounters: Vec<usize>,
}

impl Chapter {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        first_encounter: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            first_encounter: first_encounter.into(),
            intro_text: String::new(),
            outro_text: String::new(),
            encounters: Vec::new(),
        }
    }

    pub fn with_text(mut self, intro: impl Into<String>, outro: impl Into<String>) -> Self {
        self.intro_text = intro.into();
        self.outro_text = outro.into();
        self
    }

    pub fn encounter_indices(&self) -> &[usize] {
        &self.encounters
    }

    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }
}

/// Authoring metadata carried alongside the campaign
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignMeta {
    pub author: String,
    pub difficulty: String,
    pub intro_text: String,
    pub outro_text: String,
}

/// The full static adventure definition
#[derive(Debug, Clone)]
pub struct Campaign {
    pub id: String,
    pub title: String,
    pub first_chapter: String,
    pub meta: CampaignMeta,
    chapters: Vec<Chapter>,
    encounters: Vec<Encounter>,
    /// Owning chapter index for each arena slot
    encounter_chapter: Vec<usize>,
    chapter_lookup: AHashMap<String, usize>,
    encounter_lookup: AHashMap<String, usize>,
}

impl Campaign {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            first_chapter: String::new(),
            meta: CampaignMeta::default(),
            chapters: Vec::new(),
            encounters: Vec::new(),
            encounter_chapter: Vec::new(),
            chapter_lookup: AHashMap::new(),
            encounter_lookup: AHashMap::new(),
        }
    }

    pub fn with_meta(mut self, meta: CampaignMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_first_chapter(mut self, chapter_id: impl Into<String>) -> Self {
        self.first_chapter = chapter_id.into();
        self
    }

    /// Append a chapter and its encounters to the arena
    ///
    /// The first chapter pushed becomes `first_chapter` unless one was set.
    /// On duplicate ids the earliest definition keeps the lookup slot; the
    /// validator reports the collision.
    pub fn push_chapter(&mut self, mut chapter: Chapter, encounters: Vec<Encounter>) -> &mut Self {
        let chapter_idx = self.chapters.len();
        chapter.encounters.clear();

        for encounter in encounters {
            let idx = self.encounters.len();
            self.encounter_lookup.entry(encounter.id.clone()).or_insert(idx);
            chapter.encounters.push(idx);
            self.encounter_chapter.push(chapter_idx);
            self.encounters.push(encounter);
        }

        if self.first_chapter.is_empty() {
            self.first_chapter = chapter.id.clone();
        }
        self.chapter_lookup.entry(chapter.id.clone()).or_insert(chapter_idx);
        self.chapters.push(chapter);
        self
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, id: &str) -> Option<&Chapter> {
        self.chapter_index(id).map(|idx| &self.chapters[idx])
    }

    pub fn chapter_at(&self, idx: usize) -> Option<&Chapter> {
        self.chapters.get(idx)
    }

    pub fn chapter_index(&self, id: &str) -> Option<usize> {
        self.chapter_lookup.get(id).copied()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_last_chapter(&self, idx: usize) -> bool {
        idx + 1 >= self.chapters.len()
    }

    /// Chapter the adventure starts in
    pub fn start_chapter(&self) -> Option<&Chapter> {
        self.chapter(&self.first_chapter)
    }

    pub fn encounters(&self) -> &[Encounter] {
        &self.encounters
    }

    pub fn encounter(&self, id: &str) -> Option<&Encounter> {
        self.encounter_lookup.get(id).map(|&idx| &self.encounters[idx])
    }

    pub fn has_encounter(&self, id: &str) -> bool {
        self.encounter_lookup.contains_key(id)
    }

    pub fn encounter_count(&self) -> usize {
        self.encounters.len()
    }

    /// Chapter that contains the encounter
    pub fn chapter_of(&self, encounter_id: &str) -> Option<&Chapter> {
        self.encounter_lookup
            .get(encounter_id)
            .and_then(|&idx| self.encounter_chapter.get(idx))
            .map(|&chapter_idx| &self.chapters[chapter_idx])
    }

    pub fn chapter_encounters<'a>(
        &'a self,
        chapter: &'a Chapter,
    ) -> impl Iterator<Item = &'a Encounter> + 'a {
        chapter.encounters.iter().map(move |&idx| &self.encounters[idx])
    }

    /// Number of fork encounters in the whole campaign
    pub fn fork_count(&self) -> usize {
        self.encounters.iter().filter(|e| e.has_choices()).count()
    }
}
