//! Static graph checks for authored campaigns
//!
//! Findings are data, not errors: a campaign with findings still loads and
//! can still be played. Run this at authoring time or in CI.

use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

use crate::campaign::model::{Campaign, Encounter};

/// Highest encounter difficulty tier
pub const MAX_TIER: u8 = 6;

/// Run every check and return one human-readable message per violation
pub fn validate(campaign: &Campaign) -> Vec<String> {
    let mut errors = Vec::new();

    check_structure(campaign, &mut errors);
    check_unique_ids(campaign, &mut errors);
    check_references(campaign, &mut errors);
    check_encounter_content(campaign, &mut errors);
    check_dead_ends(campaign, &mut errors);
    check_reachability(campaign, &mut errors);

    errors
}

fn check_structure(campaign: &Campaign, errors: &mut Vec<String>) {
    if campaign.chapters().is_empty() {
        errors.push(format!("Campaign '{}' has no chapters", campaign.id));
        return;
    }

    if campaign.chapter(&campaign.first_chapter).is_none() {
        errors.push(format!(
            "Campaign '{}' first_chapter '{}' does not exist",
            campaign.id, campaign.first_chapter
        ));
    }

    for chapter in campaign.chapters() {
        if chapter.is_empty() {
            errors.push(format!("Chapter '{}' has no encounters", chapter.id));
        }

        let found = campaign
            .chapter_encounters(chapter)
            .any(|e| e.id == chapter.first_encounter);
        if !found {
            errors.push(format!(
                "Chapter '{}' first_encounter '{}' is not an encounter of that chapter",
                chapter.id, chapter.first_encounter
            ));
        }
    }
}

fn check_unique_ids(campaign: &Campaign, errors: &mut Vec<String>) {
    let mut seen_chapters = AHashSet::new();
    for chapter in campaign.chapters() {
        if !seen_chapters.insert(chapter.id.as_str()) {
            errors.push(format!("Duplicate chapter id '{}'", chapter.id));
        }
    }

    let mut counts: AHashMap<&str, usize> = AHashMap::new();
    for encounter in campaign.encounters() {
        *counts.entry(encounter.id.as_str()).or_default() += 1;
    }
    // Report in document order so output is stable
    let mut reported = AHashSet::new();
    for encounter in campaign.encounters() {
        let id = encounter.id.as_str();
        if counts[id] > 1 && reported.insert(id) {
            errors.push(format!("Duplicate encounter id '{}' ({} definitions)", id, counts[id]));
        }
    }
}

fn check_references(campaign: &Campaign, errors: &mut Vec<String>) {
    for encounter in campaign.encounters() {
        if let Some(next) = &encounter.next_encounter {
            if !campaign.has_encounter(next) {
                errors.push(format!(
                    "Encounter '{}' next_encounter '{}' does not exist",
                    encounter.id, next
                ));
            }
        }

        for choice in &encounter.choices {
            if !campaign.has_encounter(&choice.leads_to) {
                errors.push(format!(
                    "Encounter '{}' choice '{}' leads_to '{}' which does not exist",
                    encounter.id, choice.id, choice.leads_to
                ));
            }
        }
    }
}

fn check_encounter_content(campaign: &Campaign, errors: &mut Vec<String>) {
    for encounter in campaign.encounters() {
        if encounter.tier > MAX_TIER {
            errors.push(format!(
                "Encounter '{}' tier {} is outside 0..={}",
                encounter.id, encounter.tier, MAX_TIER
            ));
        }

        let mut choice_ids = AHashSet::new();
        for choice in &encounter.choices {
            if !choice_ids.insert(choice.id.as_str()) {
                errors.push(format!(
                    "Encounter '{}' has duplicate choice id '{}'",
                    encounter.id, choice.id
                ));
            }
        }
        if encounter.has_choices() && !encounter.choices.iter().any(|c| c.is_correct) {
            errors.push(format!("Encounter '{}' has no correct choice", encounter.id));
        }

        for (level, variant) in &encounter.variants {
            if let Some(xp) = variant.xp_reward {
                if xp < encounter.xp_reward {
                    errors.push(format!(
                        "Encounter '{}' {} variant pays {} XP, below base {}",
                        encounter.id, level, xp, encounter.xp_reward
                    ));
                }
            }
        }
    }
}

/// An encounter without an exit strands the player, unless it is the last
/// encounter listed in its chapter (a Success there completes the chapter).
fn check_dead_ends(campaign: &Campaign, errors: &mut Vec<String>) {
    for chapter in campaign.chapters() {
        let last = chapter.encounter_indices().last().copied();
        for &idx in chapter.encounter_indices() {
            let encounter = &campaign.encounters()[idx];
            if Some(idx) != last && !encounter.has_exit() {
                errors.push(format!(
                    "Encounter '{}' in chapter '{}' is a dead end (no next_encounter or choices)",
                    encounter.id, chapter.id
                ));
            }
        }
    }
}

fn check_reachability(campaign: &Campaign, errors: &mut Vec<String>) {
    let Some(start_idx) = campaign.chapter_index(&campaign.first_chapter) else {
        return;
    };

    // Chapters are entered in order, so every chapter from the start onward
    // contributes its first encounter as a root.
    let mut queue: VecDeque<&str> = campaign.chapters()[start_idx..]
        .iter()
        .map(|c| c.first_encounter.as_str())
        .collect();
    let mut visited: AHashSet<&str> = AHashSet::new();

    while let Some(id) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        if let Some(encounter) = campaign.encounter(id) {
            queue.extend(successors(encounter));
        }
    }

    let mut reported = AHashSet::new();
    for encounter in campaign.encounters() {
        if !visited.contains(encounter.id.as_str()) && reported.insert(encounter.id.as_str()) {
            errors.push(format!(
                "Warning: encounter '{}' is unreachable from the campaign start",
                encounter.id
            ));
        }
    }
}

fn successors(encounter: &Encounter) -> impl Iterator<Item = &str> {
    encounter
        .next_encounter
        .as_deref()
        .into_iter()
        .chain(encounter.choices.iter().map(|c| c.leads_to.as_str()))
}
