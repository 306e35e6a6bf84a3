//! Merge subcommand handler.

use anyhow::{Result, bail};
use tracing::info;

use formpilot_config::FormpilotConfig;
use formpilot_profile::merge;
use formpilot_protocols::{ExtractedProfileData, Profile};

use crate::cli::MergeArgs;
use crate::read_json;

pub(crate) fn handle_merge(config: &FormpilotConfig, args: MergeArgs) -> Result<()> {
    let existing: Profile = read_json(&args.existing, "profile")?;
    let extracted: ExtractedProfileData = read_json(&args.extracted, "extracted data")?;

    let mut policy = config.merge.clone();
    if let Some(strategy) = args.personal_info {
        policy.personal_info = strategy;
    }
    if let Some(strategy) = args.work_info {
        policy.work_info = strategy;
    }
    if let Some(strategy) = args.skills {
        policy.skills = strategy;
    }
    if let Some(min_confidence) = args.min_confidence {
        if !(0.0..=1.0).contains(&min_confidence) {
            bail!("--min-confidence must be within [0, 1], got {}", min_confidence);
        }
        policy.min_confidence = min_confidence;
    }

    let outcome = merge(&existing, &extracted, &policy);
    info!(changes = outcome.changes.len(), "Profile merged");

    if outcome.changes.is_empty() {
        println!("No changes.");
    }
    for change in &outcome.changes {
        println!("{}: {:?} -> {:?}", change.path, change.from, change.to);
    }

    let merged = serde_json::to_string_pretty(&outcome.profile)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, merged)?;
            println!("Merged profile written to {}", path.display());
        }
        None => println!("{}", merged),
    }
    Ok(())
}
