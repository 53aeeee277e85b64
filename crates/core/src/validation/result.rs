//! Validation result types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The wizard area an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    BasicDetails,
    PhoneSystem,
    Fax,
    Devices,
    CallFlow,
    WorkingHours,
}

/// A single error or warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub category: IssueCategory,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors block submission; warnings never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn error(&mut self, category: IssueCategory, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            category,
            field: field.to_string(),
            message: message.into(),
        });
        self.is_valid = false;
    }

    pub fn warning(&mut self, category: IssueCategory, field: &str, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            category,
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Append another result's errors and warnings.
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.is_valid = self.errors.is_empty();
    }

    pub fn has_error(&self, message: &str) -> bool {
        self.errors.iter().any(|e| e.message == message)
    }

    pub fn has_warning(&self, message: &str) -> bool {
        self.warnings.iter().any(|w| w.message == message)
    }
}
