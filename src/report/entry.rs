//! Report entries and their compiled rules

use std::sync::Arc;

use crate::config::{ReportEntryConfig, RuleDefinition};
use crate::error::RuleError;
use crate::report::Candidate;
use crate::rule::Rule;

/// A stored rule after compilation
#[derive(Debug, Clone)]
pub enum CompiledRule {
    Valid(Arc<Rule>),
    /// Kept so the owner can show the message next to the rule text
    Invalid { source: String, error: RuleError },
}

impl CompiledRule {
    pub fn compile(definition: &RuleDefinition) -> Self {
        match Rule::from_definition(definition) {
            Ok(rule) => Self::Valid(Arc::new(rule)),
            Err(error) => Self::Invalid {
                source: definition.condition.clone(),
                error,
            },
        }
    }

    pub fn rule(&self) -> Option<&Arc<Rule>> {
        match self {
            Self::Valid(rule) => Some(rule),
            Self::Invalid { .. } => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Named report entry collecting every element one of its rules matches
#[derive(Debug, Clone)]
pub struct ReportEntry {
    name: String,
    rules: Vec<CompiledRule>,
}

impl ReportEntry {
    pub fn new(name: impl Into<String>, rules: Vec<CompiledRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Compile every rule; a broken rule never stops the others
    pub fn from_config(config: &ReportEntryConfig) -> Self {
        let rules = config
            .rules
            .iter()
            .map(|definition| {
                let compiled = CompiledRule::compile(definition);
                if let CompiledRule::Invalid { source, error } = &compiled {
                    log::warn!(
                        "report entry {:?}: rule {:?} rejected: {}",
                        config.name,
                        source,
                        error
                    );
                }
                compiled
            })
            .collect();
        Self::new(config.name.clone(), rules)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn valid_rules(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter().filter_map(CompiledRule::rule)
    }

    pub fn invalid_rules(&self) -> impl Iterator<Item = (&str, &RuleError)> {
        self.rules.iter().filter_map(|rule| match rule {
            CompiledRule::Invalid { source, error } => Some((source.as_str(), error)),
            CompiledRule::Valid(_) => None,
        })
    }

    /// Whether any valid rule matches the candidate
    pub fn contains<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        self.valid_rules().any(|rule| rule.matches(candidate))
    }

    /// Clear `extension` from every rule naming it; returns how many changed
    pub fn clear_extension(&self, extension: &str) -> usize {
        let extension = extension.trim_start_matches('.');
        let mut cleared = 0;
        for rule in self.valid_rules() {
            let names_it = rule
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if names_it {
                rule.clear_extension();
                cleared += 1;
            }
        }
        cleared
    }
}
