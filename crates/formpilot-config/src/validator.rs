//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::FormpilotConfig;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &FormpilotConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_scan(config, &mut result);
        Self::validate_fill(config, &mut result);
        Self::validate_merge(config, &mut result);
        Self::validate_tables(config, &mut result);

        result
    }

    fn validate_scan(config: &FormpilotConfig, result: &mut ValidationResult) {
        if config.scan.debounce_ms == 0 {
            result.add_warning(ValidationWarning::new(
                "scan.debounce_ms",
                "debounce_ms is 0, every mutation will trigger its own rescan",
            ));
        }

        if config.scan.context_text_cap == 0 {
            result.add_error(ValidationError::new(
                "scan.context_text_cap",
                "context_text_cap must be greater than 0",
            ));
        }
    }

    fn validate_fill(config: &FormpilotConfig, result: &mut ValidationResult) {
        let fill = &config.fill;

        for (path, value) in [
            ("fill.retain_threshold", fill.retain_threshold),
            ("fill.write_threshold", fill.write_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                result.add_error(ValidationError::new(path, "must be within [0, 1]"));
            }
        }

        if fill.write_threshold < fill.retain_threshold {
            result.add_error(ValidationError::new(
                "fill.write_threshold",
                "write_threshold cannot be lower than retain_threshold",
            ));
        }

        if fill.field_delay_ms > 5000 {
            result.add_warning(ValidationWarning::new(
                "fill.field_delay_ms",
                "field_delay_ms is very high (>5000), fills will be slow",
            ));
        }
    }

    fn validate_merge(config: &FormpilotConfig, result: &mut ValidationResult) {
        if config.merge.max_skills == 0 {
            result.add_error(ValidationError::new(
                "merge.max_skills",
                "max_skills must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&config.merge.min_confidence) {
            result.add_error(ValidationError::new(
                "merge.min_confidence",
                "must be within [0, 1]",
            ));
        }
    }

    fn validate_tables(config: &FormpilotConfig, result: &mut ValidationResult) {
        if let Some(ref path) = config.tables {
            if !path.exists() {
                result.add_error(ValidationError::new(
                    "tables",
                    format!("Classifier tables file does not exist: {:?}", path),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
