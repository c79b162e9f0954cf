//! Load campaigns from TOML or JSON documents
//!
//! Documents are deserialized into plain `*Doc` structs first and then
//! converted into the arena model, so that key spelling, defaults and
//! path resolution live in one place.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::campaign::model::{Campaign, CampaignMeta, Chapter, Choice, Encounter, EncounterVariant};
use crate::core::types::{Difficulty, EncounterKind};

/// Errors that can occur when loading a campaign
#[derive(Debug, Error)]
pub enum LoadError {
    /// Campaign document does not exist
    #[error("Campaign not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Document could not be parsed into a campaign
    #[error("Format error: {0}")]
    Format(String),
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialization format of a campaign document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON, everything else is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CampaignDoc {
    id: String,
    title: String,
    #[serde(default)]
    first_chapter: Option<String>,
    #[serde(default)]
    author: String,
    #[serde(default)]
    difficulty: String,
    #[serde(default)]
    intro_text: String,
    #[serde(default)]
    outro_text: String,
    chapters: Vec<ChapterDoc>,
}

#[derive(Debug, Deserialize)]
struct ChapterDoc {
    id: String,
    title: String,
    first_encounter: String,
    #[serde(default)]
    intro_text: String,
    #[serde(default)]
    outro_text: String,
    #[serde(default)]
    encounters: Vec<EncounterDoc>,
}

#[derive(Debug, Deserialize)]
struct EncounterDoc {
    id: String,
    title: String,
    #[serde(rename = "type")]
    kind: EncounterKind,
    intro_text: String,
    objective: String,
    #[serde(default)]
    success_text: String,
    #[serde(default)]
    failure_text: String,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    solution: Option<String>,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    hash_type: Option<String>,
    #[serde(default)]
    hash_file: Option<PathBuf>,
    #[serde(default)]
    next_encounter: Option<String>,
    #[serde(default)]
    choices: Vec<ChoiceDoc>,
    #[serde(default)]
    is_checkpoint: bool,
    #[serde(default)]
    tier: u8,
    #[serde(default, alias = "xp")]
    xp_reward: u32,
    #[serde(default)]
    variants: BTreeMap<String, VariantDoc>,
}

#[derive(Debug, Deserialize)]
struct ChoiceDoc {
    id: String,
    label: String,
    leads_to: String,
    #[serde(default)]
    is_correct: bool,
}

#[derive(Debug, Deserialize)]
struct VariantDoc {
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    hash_type: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default)]
    solution: Option<String>,
    #[serde(default, alias = "xp")]
    xp_reward: Option<u32>,
}

/// Load a campaign document from disk
///
/// Relative `hash_file` paths resolve against the document's directory.
pub fn load(path: &Path) -> Result<Campaign, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io(e),
    })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let campaign = parse_str(&content, DocumentFormat::from_path(path), base_dir)
        .map_err(|e| match e {
            LoadError::Format(msg) => LoadError::Format(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;

    tracing::info!(
        "Loaded campaign '{}' from {} ({} chapters, {} encounters)",
        campaign.id,
        path.display(),
        campaign.chapter_count(),
        campaign.encounter_count()
    );
    Ok(campaign)
}

/// Load every campaign document in a directory, sorted by campaign id
pub fn load_directory(dir: &Path) -> Result<Vec<Campaign>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::NotFound(dir.to_path_buf()));
    }

    let mut campaigns = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_document = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext == "toml" || ext == "json");
        if path.is_file() && is_document {
            campaigns.push(load(&path)?);
        }
    }

    campaigns.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(campaigns)
}

/// Parse a campaign from document text
pub fn parse_str(
    content: &str,
    format: DocumentFormat,
    base_dir: &Path,
) -> Result<Campaign, LoadError> {
    let doc: CampaignDoc = match format {
        DocumentFormat::Toml => {
            toml::from_str(content).map_err(|e| LoadError::Format(e.to_string()))?
        }
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| LoadError::Format(e.to_string()))?
        }
    };
    build_campaign(doc, base_dir)
}

fn build_campaign(doc: CampaignDoc, base_dir: &Path) -> Result<Campaign, LoadError> {
    let meta = CampaignMeta {
        author: doc.author,
        difficulty: doc.difficulty,
        intro_text: doc.intro_text,
        outro_text: doc.outro_text,
    };

    let mut campaign = Campaign::new(doc.id, doc.title).with_meta(meta);
    if let Some(first) = doc.first_chapter {
        campaign = campaign.with_first_chapter(first);
    }

    for chapter_doc in doc.chapters {
        let chapter = Chapter::new(chapter_doc.id, chapter_doc.title, chapter_doc.first_encounter)
            .with_text(chapter_doc.intro_text, chapter_doc.outro_text);

        let encounters = chapter_doc
            .encounters
            .into_iter()
            .map(|e| build_encounter(e, base_dir))
            .collect::<Result<Vec<_>, _>>()?;

        campaign.push_chapter(chapter, encounters);
    }

    Ok(campaign)
}

fn build_encounter(doc: EncounterDoc, base_dir: &Path) -> Result<Encounter, LoadError> {
    let mut variants = BTreeMap::new();
    for (key, variant) in doc.variants {
        let level: Difficulty = key
            .parse()
            .map_err(|e| LoadError::Format(format!("encounter '{}' variants: {}", doc.id, e)))?;
        variants.insert(
            level,
            EncounterVariant {
                hash: variant.hash,
                hash_type: variant.hash_type,
                hint: variant.hint,
                solution: variant.solution,
                xp_reward: variant.xp_reward,
            },
        );
    }

    let choices = doc
        .choices
        .into_iter()
        .map(|c| Choice::new(c.id, c.label, c.leads_to, c.is_correct))
        .collect();

    Ok(Encounter {
        id: doc.id,
        title: doc.title,
        kind: doc.kind,
        intro_text: doc.intro_text,
        success_text: doc.success_text,
        failure_text: doc.failure_text,
        objective: doc.objective,
        hint: doc.hint,
        solution: doc.solution,
        hash: doc.hash,
        hash_type: doc.hash_type,
        hash_file: doc.hash_file.map(|p| resolve_relative(base_dir, p)),
        next_encounter: doc.next_encounter,
        choices,
        is_checkpoint: doc.is_checkpoint,
        tier: doc.tier,
        xp_reward: doc.xp_reward,
        variants,
    })
}

fn resolve_relative(base_dir: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}
