//! Scan, fill and upload-check subcommand handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use notify::{Event, RecursiveMode, Watcher};
use tracing::{info, warn};

use formpilot_config::FormpilotConfig;
use formpilot_detect::upload::mime_for_extension;
use formpilot_detect::{ScanSnapshot, check_compatibility};
use formpilot_document_html::HtmlDocument;
use formpilot_fill::{
    AutofillCoordinator, CancellationToken, FormEngine, LocalTarget, RecoveryOrchestrator,
    RescanScheduler, ScanTrigger, TracingNotifier,
};
use formpilot_profile::{FileProfileStore, MemoryProfileStore};
use formpilot_protocols::{CvRecord, FillTarget, Profile, ProfileStore, RunReport};

use crate::cli::OutputFormat;
use crate::read_json;

/// Classify the fields of a page, once or on every change.
pub(crate) async fn handle_scan(
    config: &FormpilotConfig,
    html: &Path,
    profile: Option<&Path>,
    format: OutputFormat,
    watch: bool,
) -> Result<()> {
    let engine = FormEngine::from_config(config)?;
    let profile = scan_profile(config, profile).await?;

    if watch {
        return watch_and_scan(config, &engine, html, &profile, format).await;
    }
    let doc = load_document(html)?;
    let snapshot = engine.scan(&doc, &profile, ScanTrigger::Initial);
    print_snapshot(&snapshot, format)
}

/// Fill a page through the coordinator, the same path a live trigger takes.
pub(crate) async fn handle_fill(
    config: &FormpilotConfig,
    html: &Path,
    profile: Option<&Path>,
    cv: Option<&Path>,
    detach_once: bool,
    format: OutputFormat,
) -> Result<()> {
    let cv = cv.map(load_cv).transpose()?;
    let store: Arc<dyn ProfileStore> = match profile {
        Some(path) => Arc::new(MemoryProfileStore::with_records(
            read_json(path, "profile")?,
            cv,
        )?),
        None => {
            let store = FileProfileStore::new(config.storage.resolved_directory());
            if let Some(cv) = &cv {
                store.save_cv(cv).await?;
                info!("Stored CV {}", cv.file_name);
            }
            Arc::new(store)
        }
    };

    let engine = Arc::new(FormEngine::from_config(config)?);
    let recovery_options = engine.options().recovery;
    let target = Arc::new(LocalTarget::new(engine, load_document(html)?));
    if detach_once {
        target.detach();
    }

    let recovery = RecoveryOrchestrator::new(target.clone(), recovery_options);
    let coordinator = AutofillCoordinator::new(store, recovery, Arc::new(TracingNotifier));
    let report = coordinator.trigger().await?;
    if target.reinjections() > 0 {
        info!(
            "Automation logic was re-established {} time(s)",
            target.reinjections()
        );
    }
    print_report(&report, format)
}

/// Report whether the CV fits each upload field.
pub(crate) fn handle_check_upload(config: &FormpilotConfig, html: &Path, cv: &Path) -> Result<()> {
    let engine = FormEngine::from_config(config)?;
    let doc = load_document(html)?;
    let cv = load_cv(cv)?;
    let snapshot = engine.scan(&doc, &Profile::default(), ScanTrigger::Request);

    if snapshot.uploads.is_empty() {
        println!("No upload fields found.");
        return Ok(());
    }
    println!("{:<8} {:<14} {:<6} {}", "ELEMENT", "PURPOSE", "CONF", "RESULT");
    println!("{}", "-".repeat(72));
    for upload in &snapshot.uploads {
        let verdict = if !upload.purpose.accepts_cv() {
            format!("skipped: no stored file for {} uploads", upload.purpose)
        } else {
            match check_compatibility(upload, &cv) {
                Ok(()) => format!("compatible with {}", cv.file_name),
                Err(e) => e.to_string(),
            }
        };
        println!(
            "{:<8} {:<14} {:<6.2} {}",
            upload.element.to_string(),
            upload.purpose.as_str(),
            upload.confidence,
            verdict
        );
    }
    Ok(())
}

async fn watch_and_scan(
    config: &FormpilotConfig,
    engine: &FormEngine,
    html: &Path,
    profile: &Profile,
    format: OutputFormat,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let (signal, mut triggers, handle) =
        RescanScheduler::from_config(&config.scan).spawn(cancel.clone());

    // Editors often replace the file, so watch its directory.
    let file_name = html.file_name().map(|n| n.to_os_string());
    let directory = match html.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                let touches_page = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if touches_page {
                    signal.notify();
                }
            }
            Ok(_) => {}
            Err(e) => warn!("File watch error: {}", e),
        }
    })?;
    watcher
        .watch(&directory, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch {}", directory.display()))?;
    info!("Watching {} for changes (Ctrl-C to stop)", html.display());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                break;
            }
            trigger = triggers.recv() => {
                let Some(trigger) = trigger else { break };
                match load_document(html) {
                    Ok(doc) => {
                        let snapshot = engine.scan(&doc, profile, trigger);
                        print_snapshot(&snapshot, format)?;
                    }
                    Err(e) => warn!("{:#}", e),
                }
            }
        }
    }

    drop(watcher);
    handle.await?;
    Ok(())
}

fn load_document(path: &Path) -> Result<HtmlDocument> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(HtmlDocument::parse(&html))
}

/// Read a CV either as a stored record (`.json`) or as the document itself.
fn load_cv(path: &Path) -> Result<CvRecord> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if extension == "json" {
        return read_json(path, "CV record");
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read CV {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("CV path has no file name")?
        .to_string();
    let mime_type = mime_for_extension(&extension)
        .unwrap_or("application/octet-stream")
        .to_string();
    Ok(CvRecord {
        file_name,
        mime_type,
        size_bytes: bytes.len() as u64,
        data: BASE64.encode(&bytes),
        extracted_text: None,
        extraction_confidence: None,
        uploaded_at: Some(Utc::now()),
    })
}

async fn scan_profile(config: &FormpilotConfig, path: Option<&Path>) -> Result<Profile> {
    if let Some(path) = path {
        return read_json(path, "profile");
    }
    let store = FileProfileStore::new(config.storage.resolved_directory());
    match store.load_profile().await? {
        Some(profile) => Ok(profile),
        None => {
            warn!("No stored profile; mapped values will be empty");
            Ok(Profile::default())
        }
    }
}

fn print_snapshot(snapshot: &ScanSnapshot, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    println!(
        "{} candidates, {} fillable, {} mapped, {} uploads",
        snapshot.candidates,
        snapshot.fillable,
        snapshot.mappings.len(),
        snapshot.uploads.len()
    );
    if !snapshot.mappings.is_empty() {
        println!();
        println!(
            "{:<8} {:<14} {:<6} {:<18} {}",
            "ELEMENT", "TYPE", "CONF", "STRATEGY", "VALUE"
        );
        println!("{}", "-".repeat(72));
        for mapping in &snapshot.mappings {
            println!(
                "{:<8} {:<14} {:<6.2} {:<18} {}",
                mapping.element.to_string(),
                mapping.field_type.as_str(),
                mapping.confidence,
                format!("{:?}", mapping.strategy),
                mapping.value
            );
        }
    }
    for upload in &snapshot.uploads {
        println!(
            "upload {} -> {} ({:.2})",
            upload.element,
            upload.purpose,
            upload.confidence
        );
    }
    for hint in &snapshot.hints {
        println!(
            "hint   {} -> {} ({:.2}, not filled)",
            hint.element,
            hint.field_type,
            hint.confidence
        );
    }
    Ok(())
}

fn print_report(report: &RunReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!(
        "{:<8} {:<22} {:<13} {}",
        "ELEMENT", "TARGET", "STATE", "DETAIL"
    );
    println!("{}", "-".repeat(72));
    for outcome in &report.outcomes {
        let target = match outcome.target {
            FillTarget::Field(field_type) => field_type.to_string(),
            FillTarget::Upload(purpose) => format!("upload:{}", purpose),
        };
        println!(
            "{:<8} {:<22} {:<13} {}",
            outcome.element.to_string(),
            target,
            format!("{:?}", outcome.state),
            outcome.detail.as_deref().unwrap_or("")
        );
    }
    println!();
    println!(
        "Filled {} fields, uploaded {} files, skipped {}, {} errors{}",
        report.fields_filled,
        report.files_uploaded,
        report.skipped,
        report.errors.len(),
        if report.cancelled { " (cancelled)" } else { "" }
    );
    Ok(())
}
