//! File-upload classifier and CV compatibility check.
//!
//! Runs only over `input[type=file]`, which the field pipeline never
//! touches. File inputs are often visually replaced by a styled button, so
//! rendering is not required; disabled inputs are skipped.

use std::sync::Arc;

use tracing::debug;

use formpilot_protocols::{CvRecord, DocumentTree, ElementId, FileUploadMapping, UploadPurpose};

use crate::candidate::{CandidateElement, TextCaps};
use crate::error::Incompatibility;
use crate::tables::ClassifierTables;

/// Attributes pages use to declare an upload size limit.
const MAX_SIZE_ATTRIBUTES: [&str; 4] = [
    "data-max-size",
    "data-maxsize",
    "data-max-file-size",
    "max-size",
];

/// Extension ↔ MIME table for document types a CV can have.
const DOCUMENT_TYPES: [(&str, &str); 3] = [
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

/// Confidence of a keyword-less input whose `accept` list names a document type.
const DOCUMENT_ACCEPT_CONFIDENCE: f64 = 0.4;
const UNKNOWN_PURPOSE_CONFIDENCE: f64 = 0.2;
const EXTRA_KEYWORD_BONUS: f64 = 0.05;
const MAX_CONFIDENCE: f64 = 0.95;

pub struct UploadClassifier {
    tables: Arc<ClassifierTables>,
    caps: TextCaps,
}

impl UploadClassifier {
    pub fn new(tables: Arc<ClassifierTables>, caps: TextCaps) -> Self {
        Self { tables, caps }
    }

    /// Enabled file-selection elements, in document order.
    pub fn discover<D>(&self, doc: &D) -> Vec<ElementId>
    where
        D: DocumentTree + ?Sized,
    {
        doc.elements()
            .into_iter()
            .filter(|el| is_file_input(doc, *el) && !doc.is_disabled(*el))
            .collect()
    }

    pub fn classify<D>(&self, doc: &D) -> Vec<FileUploadMapping>
    where
        D: DocumentTree + ?Sized,
    {
        self.discover(doc)
            .into_iter()
            .map(|el| self.classify_element(doc, el))
            .collect()
    }

    pub fn classify_element<D>(&self, doc: &D, element: ElementId) -> FileUploadMapping
    where
        D: DocumentTree + ?Sized,
    {
        let identifier = CandidateElement::capture(doc, element, self.caps).identifier();
        let accepted_types = doc
            .attribute(element, "accept")
            .map(|accept| parse_accept(&accept))
            .unwrap_or_default();
        let max_size_bytes = MAX_SIZE_ATTRIBUTES
            .iter()
            .find_map(|attr| doc.attribute(element, attr))
            .and_then(|value| parse_max_size(&value));

        let (purpose, confidence) = self.score_purpose(&identifier, &accepted_types);
        debug!(
            element = %element,
            purpose = %purpose,
            confidence,
            "Classified upload field"
        );
        FileUploadMapping {
            element,
            purpose,
            confidence,
            accepted_types,
            max_size_bytes,
        }
    }

    fn score_purpose(&self, identifier: &str, accepted: &[String]) -> (UploadPurpose, f64) {
        let mut best: Option<(UploadPurpose, f64)> = None;
        for entry in &self.tables.upload_keywords {
            let hits = entry
                .keywords
                .iter()
                .filter(|k| identifier.contains(k.as_str()))
                .count();
            if hits == 0 {
                continue;
            }
            let score =
                (entry.weight + EXTRA_KEYWORD_BONUS * (hits - 1) as f64).min(MAX_CONFIDENCE);
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((entry.purpose, score));
            }
        }
        if let Some(best) = best {
            return best;
        }
        if accepts_document(accepted) {
            (UploadPurpose::CvResume, DOCUMENT_ACCEPT_CONFIDENCE)
        } else {
            (UploadPurpose::Other, UNKNOWN_PURPOSE_CONFIDENCE)
        }
    }
}

fn is_file_input<D>(doc: &D, element: ElementId) -> bool
where
    D: DocumentTree + ?Sized,
{
    doc.tag_name(element).as_deref() == Some("input")
        && doc
            .attribute(element, "type")
            .is_some_and(|t| t.trim().eq_ignore_ascii_case("file"))
}

/// Lowercased, trimmed, non-empty entries of an `accept` attribute.
pub fn parse_accept(accept: &str) -> Vec<String> {
    accept
        .split(',')
        .map(|entry| entry.trim().to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Parse `5MB`, `512 kb`, `1.5M` or a plain byte count. Units are binary.
pub fn parse_max_size(value: &str) -> Option<u64> {
    let value = value.trim().to_ascii_lowercase();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: f64 = number.parse().ok()?;
    let multiplier: u64 = match unit.trim() {
        "" | "b" => 1,
        "k" | "kb" => 1024,
        "m" | "mb" => 1024 * 1024,
        "g" | "gb" => 1024 * 1024 * 1024,
        _ => return None,
    };
    if number < 0.0 || !number.is_finite() {
        return None;
    }
    Some((number * multiplier as f64).round() as u64)
}

/// MIME type of a known document extension.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();
    DOCUMENT_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

fn accepts_document(accepted: &[String]) -> bool {
    accepted.iter().any(|entry| {
        DOCUMENT_TYPES
            .iter()
            .any(|(ext, mime)| entry.trim_start_matches('.') == *ext || entry == mime)
    })
}

fn type_accepted(accepted: &[String], mime_type: &str) -> bool {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    accepted.iter().any(|entry| {
        if let Some(extension) = entry.strip_prefix('.') {
            mime_for_extension(extension) == Some(mime_type.as_str())
        } else if let Some(family) = entry.strip_suffix("/*") {
            mime_type.split('/').next() == Some(family)
        } else {
            *entry == mime_type
        }
    })
}

/// Whether `cv` may be placed into the upload field. An empty accept list or
/// a missing size limit leaves that dimension unconstrained.
pub fn check_compatibility(upload: &FileUploadMapping, cv: &CvRecord) -> Result<(), Incompatibility> {
    if !upload.accepted_types.is_empty() && !type_accepted(&upload.accepted_types, &cv.mime_type) {
        return Err(Incompatibility::UnsupportedType {
            mime_type: cv.mime_type.clone(),
            accepted: upload.accepted_types.clone(),
        });
    }
    if let Some(max_bytes) = upload.max_size_bytes {
        if cv.size_bytes > max_bytes {
            return Err(Incompatibility::TooLarge {
                size_bytes: cv.size_bytes,
                max_bytes,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod tests;
