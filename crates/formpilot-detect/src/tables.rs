//! Classifier lookup tables.
//!
//! All scoring vocabulary (field-name substrings and their weights, context
//! phrases, position rules, upload keywords) lives here instead of inline in
//! the strategies. The built-in set can be replaced wholesale from a TOML file.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use formpilot_protocols::{FieldType, UploadPurpose};

use crate::error::DetectError;

static BUILTIN: Lazy<Arc<ClassifierTables>> = Lazy::new(|| Arc::new(ClassifierTables::builtin_tables()));

/// Complete vocabulary used by the inventory and the classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierTables {
    /// Attribute pattern-match table, one entry per field type.
    pub field_patterns: Vec<FieldPatterns>,

    /// Context-phrase table, one entry per field type.
    pub context_phrases: Vec<ContextPhrases>,

    /// Document-order position rules.
    pub position_rules: Vec<PositionRule>,

    /// Upload purpose keyword table.
    pub upload_keywords: Vec<UploadKeywords>,

    /// Substrings of `name`/`id`/`class` that put an element in the inventory.
    pub inventory_hints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPatterns {
    pub field_type: FieldType,
    /// Multiplier applied to every matched pattern's length.
    pub base_weight: f64,
    /// Compact (lowercase alphanumeric) substrings.
    pub patterns: Vec<String>,
    /// The type is not considered when any of these substrings is present.
    #[serde(default)]
    pub excludes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextPhrases {
    pub field_type: FieldType,
    /// Lowercase phrases matched against whitespace-normalized context text.
    pub phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRule {
    /// Zero-based index among the fillable fields of one form.
    pub index: usize,
    pub field_type: FieldType,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadKeywords {
    pub purpose: UploadPurpose,
    /// Score of a single keyword hit.
    pub weight: f64,
    pub keywords: Vec<String>,
}

impl Default for ClassifierTables {
    fn default() -> Self {
        Self::builtin().as_ref().clone()
    }
}

impl ClassifierTables {
    /// Shared handle to the built-in tables.
    pub fn builtin() -> Arc<ClassifierTables> {
        Arc::clone(&BUILTIN)
    }

    /// Parse and validate tables from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, DetectError> {
        let tables: ClassifierTables = toml::from_str(content)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Load tables from a TOML file.
    pub fn load(path: &Path) -> Result<Self, DetectError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML, e.g. as a starting point for a custom table file.
    pub fn to_toml_string(&self) -> Result<String, DetectError> {
        toml::to_string_pretty(self).map_err(|e| DetectError::InvalidTable {
            table: "tables".to_string(),
            message: e.to_string(),
        })
    }

    /// Reject tables that would produce scores outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), DetectError> {
        for entry in &self.field_patterns {
            if entry.base_weight <= 0.0 {
                return Err(invalid(
                    "field_patterns",
                    format!("{} has a non-positive base weight", entry.field_type),
                ));
            }
            if entry.patterns.iter().any(|p| p.trim().is_empty()) {
                return Err(invalid(
                    "field_patterns",
                    format!("{} has an empty pattern", entry.field_type),
                ));
            }
        }
        for entry in &self.context_phrases {
            if entry.phrases.iter().any(|p| p.trim().is_empty()) {
                return Err(invalid(
                    "context_phrases",
                    format!("{} has an empty phrase", entry.field_type),
                ));
            }
        }
        for rule in &self.position_rules {
            if !(0.0..=1.0).contains(&rule.confidence) {
                return Err(invalid(
                    "position_rules",
                    format!("confidence {} at index {} is outside [0, 1]", rule.confidence, rule.index),
                ));
            }
        }
        for entry in &self.upload_keywords {
            if !(0.0..=1.0).contains(&entry.weight) {
                return Err(invalid(
                    "upload_keywords",
                    format!("{} weight {} is outside [0, 1]", entry.purpose, entry.weight),
                ));
            }
        }
        Ok(())
    }

    pub fn patterns_for(&self, field_type: FieldType) -> Option<&FieldPatterns> {
        self.field_patterns.iter().find(|e| e.field_type == field_type)
    }

    pub fn phrases_for(&self, field_type: FieldType) -> Option<&ContextPhrases> {
        self.context_phrases.iter().find(|e| e.field_type == field_type)
    }

    pub fn position_rule(&self, index: usize) -> Option<&PositionRule> {
        self.position_rules.iter().find(|r| r.index == index)
    }

    fn builtin_tables() -> Self {
        use FieldType::*;

        let field_patterns = vec![
            patterns(FirstName, 1.0, &["firstname", "fname", "givenname", "forename", "first"], &[]),
            patterns(LastName, 1.0, &["lastname", "lname", "surname", "familyname", "last"], &[]),
            patterns(Email, 1.2, &["email", "mail"], &[]),
            patterns(Phone, 1.1, &["phone", "mobile", "telephone", "tel", "cell"], &[]),
            patterns(
                Address,
                0.9,
                &["address", "street", "addr", "addressline"],
                &["email"],
            ),
            patterns(City, 1.0, &["city", "town", "locality"], &[]),
            patterns(State, 0.9, &["state", "province", "region", "county"], &[]),
            patterns(Postcode, 1.0, &["zip", "zipcode", "postcode", "postal", "postalcode"], &[]),
            patterns(CoverLetter, 1.0, &["coverletter", "motivation", "letter"], &[]),
            patterns(
                ResumeText,
                1.0,
                &["resume", "cv", "skills", "qualifications", "summary"],
                &["upload"],
            ),
        ];

        let context_phrases = vec![
            phrases(FirstName, &["first name", "given name", "forename"]),
            phrases(LastName, &["last name", "surname", "family name"]),
            phrases(Email, &["email", "e-mail", "email address"]),
            phrases(Phone, &["phone", "phone number", "mobile", "telephone"]),
            phrases(Address, &["street address", "address line", "mailing address", "home address"]),
            phrases(City, &["city", "town"]),
            phrases(State, &["state", "province", "region"]),
            phrases(Postcode, &["zip", "zip code", "postal code", "postcode"]),
            phrases(CoverLetter, &["cover letter", "motivation", "why do you want", "about yourself"]),
            phrases(ResumeText, &["resume", "curriculum vitae", "skills", "qualifications"]),
        ];

        let position_rules = vec![
            PositionRule { index: 0, field_type: FirstName, confidence: 0.4 },
            PositionRule { index: 1, field_type: LastName, confidence: 0.4 },
            PositionRule { index: 2, field_type: Email, confidence: 0.5 },
            PositionRule { index: 3, field_type: Phone, confidence: 0.4 },
        ];

        let upload_keywords = vec![
            keywords(UploadPurpose::CvResume, 0.9, &["resume", "résumé", "cv", "curriculumvitae"]),
            keywords(UploadPurpose::CoverLetter, 0.8, &["coverletter", "motivationletter"]),
            keywords(UploadPurpose::Portfolio, 0.7, &["portfolio", "worksample"]),
            keywords(UploadPurpose::Transcript, 0.7, &["transcript", "diploma", "certificate"]),
            keywords(UploadPurpose::Photo, 0.7, &["photo", "picture", "avatar", "headshot"]),
        ];

        let inventory_hints = [
            "name", "email", "mail", "phone", "tel", "mobile", "address", "street", "city",
            "state", "province", "zip", "postal", "postcode", "country", "letter", "resume",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        Self {
            field_patterns,
            context_phrases,
            position_rules,
            upload_keywords,
            inventory_hints,
        }
    }
}

fn invalid(table: &str, message: String) -> DetectError {
    DetectError::InvalidTable {
        table: table.to_string(),
        message,
    }
}

fn patterns(field_type: FieldType, base_weight: f64, list: &[&str], excludes: &[&str]) -> FieldPatterns {
    FieldPatterns {
        field_type,
        base_weight,
        patterns: list.iter().map(|s| s.to_string()).collect(),
        excludes: excludes.iter().map(|s| s.to_string()).collect(),
    }
}

fn phrases(field_type: FieldType, list: &[&str]) -> ContextPhrases {
    ContextPhrases {
        field_type,
        phrases: list.iter().map(|s| s.to_string()).collect(),
    }
}

fn keywords(purpose: UploadPurpose, weight: f64, list: &[&str]) -> UploadKeywords {
    UploadKeywords {
        purpose,
        weight,
        keywords: list.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
#[path = "tables_tests.rs"]
mod tests;
