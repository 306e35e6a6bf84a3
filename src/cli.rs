//! CLI definitions for formpilot.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use formpilot_protocols::{FieldMergeStrategy, SkillMergeStrategy};

/// formpilot CLI.
#[derive(Parser)]
#[command(name = "formpilot")]
#[command(about = "Detect form fields in a page and fill them from a stored profile")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        env = "FORMPILOT_CONFIG",
        default_value = "formpilot.toml",
        global = true
    )]
    pub config: PathBuf,

    /// Log filter (overrides `logging.level`; RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Directory for daily rolling JSON log files (overrides `logging.file`)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Classify the fields of an HTML page
    Scan {
        /// HTML file to scan
        html: PathBuf,

        /// Profile JSON used to resolve values (defaults to the stored profile)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Rescan whenever the file changes
        #[arg(long)]
        watch: bool,
    },

    /// Fill an HTML page from a profile and CV
    Fill {
        /// HTML file to fill
        html: PathBuf,

        /// Profile JSON (defaults to the stored profile)
        #[arg(long)]
        profile: Option<PathBuf>,

        /// CV document (.pdf/.doc/.docx) or a stored CV record (.json)
        #[arg(long)]
        cv: Option<PathBuf>,

        /// Start with the automation target detached to exercise recovery
        #[arg(long)]
        detach_once: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Merge data extracted from a CV into a profile
    Merge(MergeArgs),

    /// Check whether a CV fits each upload field of an HTML page
    CheckUpload {
        /// HTML file to inspect
        html: PathBuf,

        /// CV document (.pdf/.doc/.docx) or a stored CV record (.json)
        #[arg(long)]
        cv: PathBuf,
    },
}

#[derive(Args)]
pub(crate) struct MergeArgs {
    /// Existing profile JSON
    #[arg(long)]
    pub existing: PathBuf,

    /// Extracted profile data JSON
    #[arg(long)]
    pub extracted: PathBuf,

    /// Strategy for personal info (overrides `merge.personal_info`)
    #[arg(long, value_parser = parse_field_strategy)]
    pub personal_info: Option<FieldMergeStrategy>,

    /// Strategy for work info (overrides `merge.work_info`)
    #[arg(long, value_parser = parse_field_strategy)]
    pub work_info: Option<FieldMergeStrategy>,

    /// Strategy for skills (overrides `merge.skills`)
    #[arg(long, value_parser = parse_skill_strategy)]
    pub skills: Option<SkillMergeStrategy>,

    /// Ignore extracted categories below this confidence
    #[arg(long)]
    pub min_confidence: Option<f64>,

    /// Write the merged profile here as well as printing the changes
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

fn parse_field_strategy(value: &str) -> Result<FieldMergeStrategy, String> {
    serde_json::from_value(serde_json::Value::String(value.replace('-', "_")))
        .map_err(|_| {
            format!(
                "unknown strategy '{}' (expected preserve_existing, prefer_extracted or merge_intelligent)",
                value
            )
        })
}

fn parse_skill_strategy(value: &str) -> Result<SkillMergeStrategy, String> {
    serde_json::from_value(serde_json::Value::String(value.replace('-', "_")))
        .map_err(|_| {
            format!(
                "unknown strategy '{}' (expected replace, merge or preserve_existing)",
                value
            )
        })
}
