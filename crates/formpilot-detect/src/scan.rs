//! One full detection pass over a document.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use formpilot_protocols::{DocumentTree, ElementId, FieldMapping, FileUploadMapping, Profile};

use crate::candidate::{CandidateElement, TextCaps};
use crate::classifier::FieldClassifier;
use crate::fillability::check_fillable;
use crate::inventory::ElementInventory;
use crate::tables::ClassifierTables;
use crate::upload::UploadClassifier;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOptions {
    pub caps: TextCaps,
    /// Mappings must exceed this confidence to be retained.
    pub retain_threshold: f64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            caps: TextCaps::default(),
            retain_threshold: 0.3,
        }
    }
}

/// Result of a scan. Immutable once built; the next scan replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub scanned_at: DateTime<Utc>,
    /// Elements found by the inventory.
    pub candidates: usize,
    /// Candidates that passed the fillability filter.
    pub fillable: usize,
    /// Retained field mappings, in document order.
    pub mappings: Vec<FieldMapping>,
    pub uploads: Vec<FileUploadMapping>,
    /// Classifications that fell at or below the retention threshold.
    pub hints: Vec<FieldMapping>,
}

impl ScanSnapshot {
    /// Mappings confident enough to be written.
    pub fn writable(&self, write_threshold: f64) -> impl Iterator<Item = &FieldMapping> {
        self.mappings
            .iter()
            .filter(move |m| m.confidence > write_threshold)
    }

    pub fn mapping_for(&self, element: ElementId) -> Option<&FieldMapping> {
        self.mappings.iter().find(|m| m.element == element)
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty() && self.uploads.is_empty()
    }
}

/// Inventory, fillability, field and upload classification in one call.
pub struct FormScanner {
    tables: Arc<ClassifierTables>,
    inventory: ElementInventory,
    classifier: FieldClassifier,
    uploads: UploadClassifier,
}

impl Default for FormScanner {
    fn default() -> Self {
        Self::new(ClassifierTables::builtin(), ScanOptions::default())
    }
}

impl FormScanner {
    pub fn new(tables: Arc<ClassifierTables>, options: ScanOptions) -> Self {
        Self {
            inventory: ElementInventory::new(Arc::clone(&tables), options.caps),
            classifier: FieldClassifier::new(Arc::clone(&tables), options.retain_threshold),
            uploads: UploadClassifier::new(Arc::clone(&tables), options.caps),
            tables,
        }
    }

    pub fn tables(&self) -> &Arc<ClassifierTables> {
        &self.tables
    }

    pub fn scan<D>(&self, doc: &D, profile: &Profile) -> ScanSnapshot
    where
        D: DocumentTree + ?Sized,
    {
        let candidates = self.inventory.discover(doc);
        let candidate_count = candidates.len();

        let fillable: Vec<CandidateElement> = candidates
            .into_iter()
            .filter(|c| match check_fillable(doc, c.element) {
                Ok(()) => true,
                Err(reason) => {
                    debug!("Skipping {}: {}", c.element, reason);
                    false
                }
            })
            .collect();

        let classification = self.classifier.classify(&fillable, profile);
        let uploads = self.uploads.classify(doc);

        info!(
            candidates = candidate_count,
            fillable = fillable.len(),
            mapped = classification.mappings.len(),
            uploads = uploads.len(),
            hints = classification.hints.len(),
            "Scan complete"
        );

        ScanSnapshot {
            scanned_at: Utc::now(),
            candidates: candidate_count,
            fillable: fillable.len(),
            mappings: classification.mappings,
            uploads,
            hints: classification.hints,
        }
    }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
