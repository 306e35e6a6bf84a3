//! The engine object: scanner, executor and the latest scan snapshot.
//!
//! One engine per automation target. Scans from the scheduler and scans made
//! on demand by a fill share the same snapshot slot; a newer scan always
//! replaces the previous snapshot wholesale.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use formpilot_config::FormpilotConfig;
use formpilot_detect::{ClassifierTables, DetectError, FormScanner, ScanSnapshot};
use formpilot_protocols::{CvRecord, DocumentTree, FieldPort, Profile, RunReport};

use crate::CancellationToken;
use crate::executor::FillExecutor;
use crate::options::EngineOptions;

/// Why a scan ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanTrigger {
    /// First scan after the engine attaches to a document.
    Initial,
    Periodic,
    /// Debounced document mutation.
    Mutation,
    /// A fill asked for a fresh scan.
    Request,
}

impl fmt::Display for ScanTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanTrigger::Initial => "initial",
            ScanTrigger::Periodic => "periodic",
            ScanTrigger::Mutation => "mutation",
            ScanTrigger::Request => "request",
        };
        f.write_str(name)
    }
}

pub struct FormEngine {
    scanner: FormScanner,
    executor: FillExecutor,
    options: EngineOptions,
    last: RwLock<Option<Arc<ScanSnapshot>>>,
    scan_lock: Mutex<()>,
    generation: AtomicU64,
}

impl Default for FormEngine {
    fn default() -> Self {
        Self::new(ClassifierTables::builtin(), EngineOptions::default())
    }
}

impl FormEngine {
    pub fn new(tables: Arc<ClassifierTables>, options: EngineOptions) -> Self {
        Self {
            scanner: FormScanner::new(tables, options.scan),
            executor: FillExecutor::new(options.fill),
            options,
            last: RwLock::new(None),
            scan_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Build an engine from configuration, loading classifier tables from
    /// `config.tables` when set.
    pub fn from_config(config: &FormpilotConfig) -> Result<Self, DetectError> {
        let tables = match &config.tables {
            Some(path) => {
                info!("Loading classifier tables from {}", path.display());
                Arc::new(ClassifierTables::load(path)?)
            }
            None => ClassifierTables::builtin(),
        };
        Ok(Self::new(tables, EngineOptions::from_config(config)))
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Number of scans completed so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn latest(&self) -> Option<Arc<ScanSnapshot>> {
        self.last.read().clone()
    }

    /// Scan `doc` and publish the result as the latest snapshot.
    ///
    /// Scans never overlap. A background scan that had to wait for another
    /// scan to finish reuses that result instead of scanning again;
    /// [`ScanTrigger::Request`] always scans.
    pub fn scan<D>(&self, doc: &D, profile: &Profile, trigger: ScanTrigger) -> Arc<ScanSnapshot>
    where
        D: DocumentTree + ?Sized,
    {
        let observed = self.generation();
        let _guard = self.scan_lock.lock();
        if trigger != ScanTrigger::Request && self.generation() != observed {
            if let Some(latest) = self.latest() {
                debug!("Skipping {} scan; a concurrent scan just completed", trigger);
                return latest;
            }
        }

        debug!("Starting {} scan", trigger);
        let snapshot = Arc::new(self.scanner.scan(doc, profile));
        *self.last.write() = Some(Arc::clone(&snapshot));
        self.generation.fetch_add(1, Ordering::AcqRel);
        snapshot
    }

    /// Scan, then fill everything the scan found.
    pub async fn fill<P>(
        &self,
        port: &mut P,
        profile: &Profile,
        cv: Option<&CvRecord>,
        cancel: &CancellationToken,
    ) -> RunReport
    where
        P: FieldPort + ?Sized,
    {
        let snapshot = self.scan(&*port, profile, ScanTrigger::Request);
        self.executor.run(port, &snapshot, cv, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formpilot_document_html::HtmlDocument;

    const FORM: &str = r#"
        <form>
          <label for="fn">First name</label><input id="fn" name="first_name">
          <label for="em">Email</label><input id="em" type="email" name="email">
        </form>
    "#;

    fn profile() -> Profile {
        let mut profile = Profile::default();
        profile.personal_info.first_name = "Jane".to_string();
        profile.personal_info.email = "jane@example.com".to_string();
        profile
    }

    fn engine() -> FormEngine {
        let mut options = EngineOptions::default();
        options.fill.field_delay = std::time::Duration::ZERO;
        FormEngine::new(ClassifierTables::builtin(), options)
    }

    #[test]
    fn test_scan_replaces_snapshot() {
        let engine = engine();
        assert!(engine.latest().is_none());

        let doc = HtmlDocument::parse(FORM);
        let first = engine.scan(&doc, &profile(), ScanTrigger::Initial);
        assert_eq!(first.mappings.len(), 2);
        assert_eq!(engine.generation(), 1);

        let mut doc = doc;
        doc.remove(doc.find_by_id("em").unwrap());
        let second = engine.scan(&doc, &profile(), ScanTrigger::Mutation);
        assert_eq!(second.mappings.len(), 1);
        assert!(Arc::ptr_eq(&engine.latest().unwrap(), &second));
        assert_eq!(first.mappings.len(), 2);
        assert_eq!(engine.generation(), 2);
    }

    #[tokio::test]
    async fn test_fill_scans_first() {
        let engine = engine();
        let mut doc = HtmlDocument::parse(FORM);
        let report = engine
            .fill(&mut doc, &profile(), None, &CancellationToken::new())
            .await;

        assert_eq!(report.fields_filled, 2);
        assert_eq!(engine.generation(), 1);
        let email = doc.find_by_id("em").unwrap();
        assert_eq!(doc.value(email).as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn test_from_config_loads_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.toml");
        std::fs::write(&path, ClassifierTables::default().to_toml_string().unwrap()).unwrap();

        let config = FormpilotConfig {
            tables: Some(path),
            ..FormpilotConfig::default()
        };
        assert!(FormEngine::from_config(&config).is_ok());

        let config = FormpilotConfig {
            tables: Some(dir.path().join("missing.toml")),
            ..FormpilotConfig::default()
        };
        assert!(FormEngine::from_config(&config).is_err());
    }

    #[test]
    fn test_trigger_display() {
        assert_eq!(ScanTrigger::Mutation.to_string(), "mutation");
        assert_eq!(ScanTrigger::Request.to_string(), "request");
    }
}
