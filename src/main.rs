//! Crackquest - campaign tooling
//!
//! Validates campaign documents, looks up hashes and summarizes saved
//! progress. Play itself happens in whatever front end embeds the library.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crackquest::adventure::Adventure;
use crackquest::campaign::{self, Campaign};
use crackquest::core::error::Result;
use crackquest::core::GameConfig;
use crackquest::hashes::{reveal, HashIndex};

#[derive(Parser, Debug)]
#[command(name = "crackquest")]
#[command(about = "Inspect and check hash-cracking adventure campaigns")]
struct Args {
    /// Game rules file (TOML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a campaign for structural problems
    Validate {
        campaign: PathBuf,
    },
    /// Look up a hash in a campaign
    Lookup {
        campaign: PathBuf,
        hash: String,
        /// Reveal this fraction (0-1) of the solution instead of all of it
        #[arg(long)]
        progress: Option<f64>,
    },
    /// Summarize a saved snapshot against its campaign
    Progress {
        campaign: PathBuf,
        save: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crackquest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let json = args.format.eq_ignore_ascii_case("json");

    let config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;

    match args.command {
        Command::Validate { campaign: path } => {
            let campaign = campaign::load(&path)?;
            let findings = campaign::validate(&campaign);
            report_findings(&campaign, &findings, json);
            if !findings.is_empty() {
                tracing::warn!("{} validation finding(s) in '{}'", findings.len(), campaign.id);
                std::process::exit(1);
            }
        }
        Command::Lookup { campaign: path, hash, progress } => {
            let campaign = campaign::load(&path)?;
            let index = HashIndex::build(&campaign);
            let mut record = index.lookup_record(&hash);
            if let Some(p) = progress {
                record.solution = record.solution.map(|s| reveal(&s, p, config.reveal_mask));
            }

            if json {
                println!("{}", to_json(&record));
            } else if record.found {
                println!("Encounter:  {}", record.encounter_id.as_deref().unwrap_or("-"));
                if let Some(level) = record.difficulty {
                    println!("Difficulty: {}", level);
                }
                println!("Type:       {}", record.hash_type.as_deref().unwrap_or("unknown"));
                println!("Solution:   {}", record.solution.as_deref().unwrap_or("(none)"));
                for hint in &record.hints {
                    println!("Hint:       {}", hint);
                }
            } else {
                println!("Hash not found in '{}'", campaign.id);
            }
        }
        Command::Progress { campaign: path, save } => {
            let campaign = Arc::new(campaign::load(&path)?);
            let adventure = Adventure::load(campaign, &save)?.with_config(config);
            let summary = adventure.progress();

            if json {
                println!("{}", to_json(&summary));
            } else {
                let state = adventure.state();
                println!("=== {} ===", adventure.campaign().title);
                println!(
                    "Player:     {} ({}, {})",
                    state.player_name, state.difficulty, state.game_mode
                );
                println!(
                    "Chapter:    {}/{} ({})",
                    summary.chapter_number, summary.chapter_count, state.chapter_id
                );
                println!(
                    "Encounters: {}/{} ({:.1}%)",
                    summary.completed, summary.total, summary.percent
                );
                println!(
                    "XP:         {} this run, {} lifetime",
                    summary.xp_earned, summary.total_xp
                );
                println!("Deaths:     {}", summary.deaths);
                println!("Hints:      {}", summary.hints_used);
                if summary.campaign_complete {
                    println!("Campaign complete");
                }
            }
        }
    }

    Ok(())
}

fn report_findings(campaign: &Campaign, findings: &[String], json: bool) {
    if json {
        let report = serde_json::json!({
            "campaign": campaign.id,
            "chapters": campaign.chapter_count(),
            "encounters": campaign.encounter_count(),
            "valid": findings.is_empty(),
            "findings": findings,
        });
        println!("{}", to_json(&report));
        return;
    }

    println!(
        "{}: {} chapters, {} encounters, {} forks",
        campaign.id,
        campaign.chapter_count(),
        campaign.encounter_count(),
        campaign.fork_count()
    );
    if findings.is_empty() {
        println!("OK");
    } else {
        for finding in findings {
            println!("  - {}", finding);
        }
        println!("{} problem(s) found", findings.len());
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}
