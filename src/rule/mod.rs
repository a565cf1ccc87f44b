//! Report rules: an extension filter, folder bounds and a condition
//!
//! A rule is built once per stored definition and shared between report
//! passes. The only mutation after construction is clearing the extension
//! when the schema it names is deleted.

mod bounds;

pub use bounds::*;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::condition::{self, ConditionTree};
use crate::config::RuleDefinition;
use crate::error::Result;
use crate::report::Candidate;

/// One report-filtering rule
#[derive(Debug)]
pub struct Rule {
    extension: RwLock<Option<String>>,
    bounds: Option<String>,
    condition: Arc<ConditionTree>,
}

impl Rule {
    pub fn new(
        extension: Option<String>,
        bounds: Option<String>,
        condition: impl Into<Arc<ConditionTree>>,
    ) -> Self {
        Self {
            extension: RwLock::new(normalize_extension(extension)),
            bounds: bounds.filter(|bounds| !bounds.trim().is_empty()),
            condition: condition.into(),
        }
    }

    /// Scan and assemble `condition`, sharing the tree with identical rules
    pub fn parse(extension: Option<String>, bounds: Option<String>, condition: &str) -> Result<Self> {
        let tree = condition::get_or_parse(condition)?;
        Ok(Self::new(extension, bounds, tree))
    }

    pub fn from_definition(definition: &RuleDefinition) -> Result<Self> {
        Self::parse(
            definition.extension.clone(),
            definition.bounds.clone(),
            &definition.condition,
        )
    }

    pub fn extension(&self) -> Option<String> {
        self.extension.read().clone()
    }

    /// Drop the extension filter, e.g. after its schema was deleted
    pub fn clear_extension(&self) {
        let mut extension = self.extension.write();
        if let Some(old) = extension.take() {
            log::debug!("cleared extension {:?} from rule {}", old, self.condition);
        }
    }

    pub fn bounds(&self) -> Option<&str> {
        self.bounds.as_deref()
    }

    pub fn bounds_path_list(&self) -> Vec<BoundsPath> {
        self.bounds.as_deref().map(parse_bounds).unwrap_or_default()
    }

    pub fn condition(&self) -> &ConditionTree {
        &self.condition
    }

    /// Extension and bounds filters, without the condition
    pub fn applies_to<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        if let Some(extension) = self.extension.read().as_deref() {
            let matches = candidate
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if !matches {
                return false;
            }
        }

        let bounds = self.bounds_path_list();
        bounds.is_empty() || bounds.iter().any(|path| path.contains(candidate.path()))
    }

    /// Filters plus the condition
    pub fn matches<C: Candidate + ?Sized>(&self, candidate: &C) -> bool {
        self.applies_to(candidate) && condition::check(&self.condition, candidate)
    }
}

/// Rendered as `ext: [bounds] condition`
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(extension) = self.extension.read().as_deref() {
            write!(f, "{}: ", extension)?;
        }
        if let Some(bounds) = &self.bounds {
            write!(f, "[{}] ", bounds.trim())?;
        }
        write!(f, "{}", self.condition)
    }
}

fn normalize_extension(extension: Option<String>) -> Option<String> {
    extension
        .map(|ext| ext.trim().trim_start_matches('.').to_string())
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::FieldValue;
    use crate::error::RuleError;
    use crate::report::Record;

    fn record(path: &str, status: &str) -> Record {
        Record::new(path).with_field("status", FieldValue::Text(status.to_string()))
    }

    #[test]
    fn test_parse_rule() {
        let rule = Rule::parse(
            Some(".req".to_string()),
            Some("specs/*, notes".to_string()),
            r#"status = "approved""#,
        )
        .unwrap();

        assert_eq!(rule.extension(), Some("req".to_string()));
        assert_eq!(rule.bounds(), Some("specs/*, notes"));
        assert_eq!(
            rule.bounds_path_list(),
            vec![BoundsPath::new("specs", true), BoundsPath::new("notes", false)]
        );
        assert_eq!(rule.condition().to_string(), r#"status = "approved""#);
        assert_eq!(rule.to_string(), r#"req: [specs/*, notes] status = "approved""#);
    }

    #[test]
    fn test_invalid_condition() {
        let err = Rule::parse(None, None, "a = 1 and (b = 2").unwrap_err();
        assert_eq!(err.message(), "extra (");
        assert!(matches!(err, RuleError::Structural(_)));
    }

    #[test]
    fn test_blank_attributes_are_absent() {
        let rule = Rule::parse(Some("  ".to_string()), Some(" ".to_string()), "a = 1").unwrap();
        assert_eq!(rule.extension(), None);
        assert_eq!(rule.bounds(), None);
        assert!(rule.bounds_path_list().is_empty());
        assert_eq!(rule.to_string(), "a = 1");
    }

    #[test]
    fn test_matches_uses_all_filters() {
        let rule = Rule::parse(
            Some("req".to_string()),
            Some("specs/*".to_string()),
            "status = approved",
        )
        .unwrap();

        assert!(rule.matches(&record("specs/a/one.req", "approved")));
        assert!(!rule.matches(&record("specs/a/one.req", "draft")));
        assert!(!rule.matches(&record("specs/a/one.txt", "approved")));
        assert!(!rule.matches(&record("notes/one.req", "approved")));
    }

    #[test]
    fn test_clear_extension() {
        let rule = Rule::parse(Some("req".to_string()), None, "status = approved").unwrap();
        let other = record("one.txt", "approved");
        assert!(!rule.applies_to(&other));

        rule.clear_extension();
        assert_eq!(rule.extension(), None);
        assert!(rule.applies_to(&other));

        // clearing twice is harmless
        rule.clear_extension();
        assert_eq!(rule.extension(), None);
    }

    #[test]
    fn test_shared_between_threads() {
        let rule = Arc::new(
            Rule::parse(Some("req".to_string()), None, "status = approved").unwrap(),
        );
        let candidate = record("a.req", "approved");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let rule = Arc::clone(&rule);
                let candidate = &candidate;
                scope.spawn(move || {
                    for _ in 0..100 {
                        assert!(rule.matches(candidate));
                    }
                });
            }
            scope.spawn(|| rule.clear_extension());
        });

        assert_eq!(rule.extension(), None);
        assert!(rule.matches(&candidate));
    }
}
