//! Field and upload classification results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::ElementId;

/// Semantic profile attribute a field can be mapped to.
///
/// Declaration order is significant: when two types score the same, the one
/// declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    State,
    Postcode,
    CoverLetter,
    ResumeText,
}

impl FieldType {
    pub const ALL: [FieldType; 10] = [
        FieldType::FirstName,
        FieldType::LastName,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Address,
        FieldType::City,
        FieldType::State,
        FieldType::Postcode,
        FieldType::CoverLetter,
        FieldType::ResumeText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::FirstName => "FIRST_NAME",
            FieldType::LastName => "LAST_NAME",
            FieldType::Email => "EMAIL",
            FieldType::Phone => "PHONE",
            FieldType::Address => "ADDRESS",
            FieldType::City => "CITY",
            FieldType::State => "STATE",
            FieldType::Postcode => "POSTCODE",
            FieldType::CoverLetter => "COVER_LETTER",
            FieldType::ResumeText => "RESUME_TEXT",
        }
    }

    /// Position in declaration order, used as the deterministic tie-break key.
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which classification strategy produced a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStrategy {
    AttributePattern,
    ContextPhrase,
    Position,
    Fallback,
}

/// Association of one element with a semantic field type.
///
/// Built fresh on every scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub element: ElementId,
    pub field_type: FieldType,
    /// Heuristic score in `[0, 1]`; only the relative ordering is meaningful.
    pub confidence: f64,
    pub value: String,
    pub strategy: ClassificationStrategy,
}

/// What a file-selection element is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadPurpose {
    CvResume,
    CoverLetter,
    Portfolio,
    Transcript,
    Photo,
    Other,
}

impl UploadPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadPurpose::CvResume => "CV_RESUME",
            UploadPurpose::CoverLetter => "COVER_LETTER",
            UploadPurpose::Portfolio => "PORTFOLIO",
            UploadPurpose::Transcript => "TRANSCRIPT",
            UploadPurpose::Photo => "PHOTO",
            UploadPurpose::Other => "OTHER",
        }
    }

    /// Whether the stored CV document is an appropriate file for this purpose.
    pub fn accepts_cv(&self) -> bool {
        matches!(self, UploadPurpose::CvResume | UploadPurpose::Other)
    }
}

impl fmt::Display for UploadPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of one file-selection element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadMapping {
    pub element: ElementId,
    pub purpose: UploadPurpose,
    pub confidence: f64,
    /// Lowercased entries of the `accept` attribute (extensions or MIME types).
    #[serde(default)]
    pub accepted_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size_bytes: Option<u64>,
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
