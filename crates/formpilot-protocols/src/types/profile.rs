//! Profile records: the stored profile, the stored CV, and the lower-confidence
//! data extracted from a CV upstream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user's stored profile.
///
/// Every leaf is a plain `String` defaulting to empty, so a partially stored
/// record still deserializes with every key present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub personal_info: PersonalInfo,

    #[serde(default)]
    pub work_info: WorkInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

/// Postal address. Always fully keyed, even when every field is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkInfo {
    pub title: String,
    /// Free-text experience summary.
    pub experience: String,
    pub skills: Vec<String>,
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

impl Profile {
    /// True when no personal or work field carries a value.
    pub fn is_empty(&self) -> bool {
        let p = &self.personal_info;
        let a = &p.address;
        let w = &self.work_info;
        [
            &p.first_name,
            &p.last_name,
            &p.email,
            &p.phone,
            &a.street,
            &a.city,
            &a.state,
            &a.zip_code,
            &a.country,
            &w.title,
            &w.experience,
            &w.linkedin,
            &w.github,
            &w.website,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
            && w.skills.is_empty()
    }

    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.personal_info.first_name, self.personal_info.last_name
        )
        .trim()
        .to_string()
    }
}

/// The stored CV document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvRecord {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    /// Raw file bytes, base64 encoded for storage.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl CvRecord {
    /// Lowercased file extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// Profile data recovered from a CV's text by the upstream extractor.
///
/// Every value is optional; absence means the extractor found nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedProfileData {
    pub personal_info: ExtractedPersonalInfo,
    pub work_info: ExtractedWorkInfo,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub confidence: ExtractionConfidence,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedPersonalInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: ExtractedAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedWorkInfo {
    pub title: Option<String>,
    pub experience: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub year: Option<String>,
}

/// Per-category extractor confidence in `[0, 1]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionConfidence {
    pub personal_info: f64,
    pub work_info: f64,
    pub education: f64,
    pub skills: f64,
}

#[cfg(test)]
#[path = "profile_tests.rs"]
mod tests;
