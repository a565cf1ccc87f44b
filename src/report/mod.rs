//! Report assembly
//!
//! A report is a list of named entries. Each entry owns the rules deciding
//! which elements belong to it; rules are compiled once when the report is
//! loaded and reused for every element offered afterwards.

mod candidate;
mod entry;

pub use candidate::*;
pub use entry::*;

use crate::config::ReportConfig;
use crate::error::Result;

/// Compiled report
#[derive(Debug, Clone, Default)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn from_config(config: &ReportConfig) -> Self {
        let entries: Vec<ReportEntry> = config.entries.iter().map(ReportEntry::from_config).collect();
        log::debug!(
            "compiled report: {} entries, {} rules",
            entries.len(),
            entries.iter().map(|entry| entry.rules().len()).sum::<usize>()
        );
        Self { entries }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_config(&ReportConfig::from_json(json)?))
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    /// Entries the candidate belongs to, in report order
    pub fn entries_for<C: Candidate + ?Sized>(&self, candidate: &C) -> Vec<&ReportEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.contains(candidate))
            .collect()
    }

    /// A schema was deleted: rules naming its extension stop filtering on it
    pub fn schema_removed(&self, extension: &str) -> usize {
        let cleared: usize = self
            .entries
            .iter()
            .map(|entry| entry.clear_extension(extension))
            .sum();
        if cleared > 0 {
            log::debug!("schema {:?} removed, cleared {} rules", extension, cleared);
        }
        cleared
    }
}
