//! Report configuration structures

use serde::Deserialize;

use crate::error::{Result, RuleError};

/// Whole report: the entries elements are sorted into
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub entries: Vec<ReportEntryConfig>,
}

impl ReportConfig {
    /// Expected format: {"entries": [{"name": ..., "rules": [RuleDefinition, ...]}]}
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| RuleError::Deserialization(err.to_string()))
    }
}

/// One report entry and the rules deciding its members
#[derive(Debug, Clone, Deserialize)]
pub struct ReportEntryConfig {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// Stored rule definition, before its condition is scanned
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleDefinition {
    /// File-type tag of the schema whose fields the condition uses
    pub extension: Option<String>,
    /// Comma-separated folders, `folder/*` for a whole subtree
    pub bounds: Option<String>,
    pub condition: String,
}

impl RuleDefinition {
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            extension: None,
            bounds: None,
            condition: condition.into(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn with_bounds(mut self, bounds: impl Into<String>) -> Self {
        self.bounds = Some(bounds.into());
        self
    }
}
