//! Extension series arithmetic.
//!
//! A location owns one numeric range (optionally prefixed) plus a list of
//! reserved extensions. Candidates are generated in ascending order and a
//! candidate is free when no phone at the location holds it and it is not
//! reserved. Store access lives in the engine; this module only computes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::EntityId;

/// Width of the zero-padded index that follows a prefix.
pub const PREFIXED_INDEX_WIDTH: usize = 3;

/// Input for creating (or re-creating) a location's series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSeriesConfig {
    #[validate(length(min = 1, message = "locationId is required"))]
    pub location_id: EntityId,
    #[serde(default)]
    pub prefix: Option<String>,
    #[validate(range(min = 0, message = "startRange must be non-negative"))]
    pub start_range: i64,
    #[validate(range(min = 0, message = "endRange must be non-negative"))]
    pub end_range: i64,
    #[serde(default)]
    pub reserved_extensions: Vec<String>,
}

/// A location's extension series as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionSeries {
    pub location_id: EntityId,
    #[serde(default)]
    pub prefix: Option<String>,
    pub start_range: i64,
    pub end_range: i64,
    #[serde(default)]
    pub reserved_extensions: Vec<String>,
}

/// Check a series config: non-negative bounds, start strictly below end.
pub fn validate_series_config(config: &ExtensionSeriesConfig) -> Result<(), CoreError> {
    config
        .validate()
        .map_err(|e| CoreError::Validation(format!("Invalid extension range: {e}")))?;
    if config.start_range >= config.end_range {
        return Err(CoreError::Validation(format!(
            "Invalid extension range: startRange ({}) must be less than endRange ({})",
            config.start_range, config.end_range
        )));
    }
    Ok(())
}

/// Append `extra` to `existing`, skipping values already present.
fn union_into(existing: &mut Vec<String>, extra: impl IntoIterator<Item = String>) {
    for ext in extra {
        if !existing.contains(&ext) {
            existing.push(ext);
        }
    }
}

impl ExtensionSeries {
    /// Build a series from a validated config. Reserved values are deduplicated.
    pub fn from_config(config: ExtensionSeriesConfig) -> Result<Self, CoreError> {
        validate_series_config(&config)?;
        let mut reserved = Vec::with_capacity(config.reserved_extensions.len());
        union_into(&mut reserved, config.reserved_extensions);
        Ok(Self {
            location_id: config.location_id,
            prefix: config.prefix.filter(|p| !p.is_empty()),
            start_range: config.start_range,
            end_range: config.end_range,
            reserved_extensions: reserved,
        })
    }

    /// Replace range and prefix with `next`, keeping the union of both
    /// reserved lists.
    pub fn merge(self, next: ExtensionSeries) -> Self {
        let mut reserved = self.reserved_extensions;
        union_into(&mut reserved, next.reserved_extensions);
        Self {
            reserved_extensions: reserved,
            ..next
        }
    }

    /// Render the candidate for a numeric index.
    pub fn format(&self, index: i64) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{index:0width$}", width = PREFIXED_INDEX_WIDTH),
            None => index.to_string(),
        }
    }

    /// Numeric index of an extension, or `None` when it does not parse.
    pub fn parse_index(&self, extension: &str) -> Option<i64> {
        let digits = match &self.prefix {
            Some(prefix) => extension.strip_prefix(prefix.as_str())?,
            None => extension,
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.parse_index(extension)
            .is_some_and(|i| (self.start_range..=self.end_range).contains(&i))
    }

    /// Whether two spellings name the same extension in this series.
    ///
    /// With prefix `7`, `"701"` and `"7001"` are both index 1.
    pub fn same_extension(&self, a: &str, b: &str) -> bool {
        a == b
            || matches!(
                (self.parse_index(a), self.parse_index(b)),
                (Some(x), Some(y)) if x == y
            )
    }

    pub fn is_reserved(&self, extension: &str) -> bool {
        self.reserved_extensions
            .iter()
            .any(|r| self.same_extension(r, extension))
    }

    /// Whether `extension` is reserved or held by one of `assigned`.
    pub fn is_taken(&self, extension: &str, assigned: &HashSet<String>) -> bool {
        self.is_reserved(extension) || assigned.iter().any(|a| self.same_extension(a, extension))
    }

    /// Whether `extension` is in range, unreserved and not held by a phone.
    pub fn is_available(&self, extension: &str, assigned: &HashSet<String>) -> bool {
        self.contains(extension) && !self.is_taken(extension, assigned)
    }

    /// The first `count` free extensions in ascending order.
    ///
    /// Fails when the range holds fewer than `count` free candidates. The
    /// result is not an allocation: calling twice returns the same values
    /// until one of them is assigned or reserved.
    pub fn generate_available(
        &self,
        count: usize,
        assigned: &HashSet<String>,
    ) -> Result<Vec<String>, CoreError> {
        let available: Vec<String> = (self.start_range..=self.end_range)
            .map(|i| self.format(i))
            .filter(|ext| !self.is_taken(ext, assigned))
            .take(count)
            .collect();

        if available.len() < count {
            return Err(CoreError::Validation(format!(
                "Only {} extensions available in range {}-{} for location {}, {count} requested",
                available.len(),
                self.start_range,
                self.end_range,
                self.location_id
            )));
        }
        Ok(available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config(start: i64, end: i64, reserved: &[&str]) -> ExtensionSeriesConfig {
        ExtensionSeriesConfig {
            location_id: "L1".into(),
            prefix: None,
            start_range: start,
            end_range: end,
            reserved_extensions: reserved.iter().map(|s| s.to_string()).collect(),
        }
    }

    // -- validation --

    #[test]
    fn test_start_must_be_below_end() {
        assert_matches!(
            ExtensionSeries::from_config(config(1000, 1000, &[])),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            ExtensionSeries::from_config(config(1002, 1000, &[])),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn test_negative_bounds_are_rejected() {
        let err = ExtensionSeries::from_config(config(-5, 10, &[])).unwrap_err();
        assert!(err.to_string().contains("Invalid extension range"));
    }

    #[test]
    fn test_empty_location_is_rejected() {
        let mut c = config(1, 10, &[]);
        c.location_id.clear();
        assert!(ExtensionSeries::from_config(c).is_err());
    }

    // -- generation --

    #[test]
    fn test_generation_skips_reserved_in_ascending_order() {
        let series = ExtensionSeries::from_config(config(1000, 1002, &["1000"])).unwrap();
        let got = series.generate_available(2, &HashSet::new()).unwrap();
        assert_eq!(got, vec!["1001", "1002"]);
    }

    #[test]
    fn test_generation_skips_assigned_extensions() {
        let series = ExtensionSeries::from_config(config(100, 110, &[])).unwrap();
        let assigned: HashSet<String> = ["100", "102"].iter().map(|s| s.to_string()).collect();
        let got = series.generate_available(3, &assigned).unwrap();
        assert_eq!(got, vec!["101", "103", "104"]);
    }

    #[test]
    fn test_generation_fails_when_range_is_exhausted() {
        let series = ExtensionSeries::from_config(config(1000, 1002, &["1000"])).unwrap();
        assert_matches!(
            series.generate_available(3, &HashSet::new()),
            Err(CoreError::Validation(msg)) if msg.contains("Only 2 extensions")
        );
    }

    #[test]
    fn test_prefixed_candidates_are_zero_padded() {
        let mut c = config(1, 3, &[]);
        c.prefix = Some("8".into());
        let series = ExtensionSeries::from_config(c).unwrap();
        let got = series.generate_available(2, &HashSet::new()).unwrap();
        assert_eq!(got, vec!["8001", "8002"]);
    }

    // -- availability --

    #[test]
    fn test_availability_parses_prefixed_suffix() {
        let mut c = config(1, 50, &["7005"]);
        c.prefix = Some("7".into());
        let series = ExtensionSeries::from_config(c).unwrap();
        let none = HashSet::new();
        assert!(series.is_available("7010", &none));
        assert!(!series.is_available("7005", &none));
        assert!(!series.is_available("7051", &none));
        assert!(!series.is_available("7abc", &none));
        assert!(!series.is_available("6010", &none));
    }

    #[test]
    fn test_unpadded_spelling_matches_its_padded_index() {
        let mut c = config(1, 50, &["7005"]);
        c.prefix = Some("7".into());
        let series = ExtensionSeries::from_config(c).unwrap();
        let held: HashSet<String> = ["7001".to_string()].into_iter().collect();

        assert!(series.same_extension("701", "7001"));
        assert!(!series.same_extension("701", "7002"));
        assert!(!series.is_available("701", &held));
        assert!(!series.is_available("75", &HashSet::new()));
        assert!(series.is_available("702", &HashSet::new()));
    }

    #[test]
    fn test_generation_skips_unpadded_holders() {
        let mut c = config(1, 3, &[]);
        c.prefix = Some("8".into());
        let series = ExtensionSeries::from_config(c).unwrap();
        let held: HashSet<String> = ["81".to_string()].into_iter().collect();
        let got = series.generate_available(2, &held).unwrap();
        assert_eq!(got, vec!["8002", "8003"]);
    }

    #[test]
    fn test_malformed_extension_is_unavailable() {
        let series = ExtensionSeries::from_config(config(100, 200, &[])).unwrap();
        let none = HashSet::new();
        assert!(!series.is_available("1x0", &none));
        assert!(!series.is_available("", &none));
        assert!(!series.is_available("-150", &none));
    }

    // -- merge --

    #[test]
    fn test_recreating_a_series_unions_reserved_lists() {
        let first = ExtensionSeries::from_config(config(100, 200, &["100", "101"])).unwrap();
        let second = ExtensionSeries::from_config(config(300, 400, &["101", "300"])).unwrap();
        let merged = first.merge(second);
        assert_eq!(merged.start_range, 300);
        assert_eq!(merged.reserved_extensions, vec!["100", "101", "300"]);
    }
}
