//! Configuration module for report rule definitions
//!
//! An external document reader strips the owning document's markup and
//! hands the rule definitions over as JSON; this module deserializes them.

mod report;

pub use report::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuleError;

    #[test]
    fn test_from_json() {
        let json = r#"{
            "entries": [
                {
                    "name": "Approved requirements",
                    "rules": [
                        { "extension": "req", "bounds": "specs/*", "condition": "status = approved" },
                        { "condition": "owner = \"team-a\"" }
                    ]
                },
                { "name": "Empty" }
            ]
        }"#;

        let config = ReportConfig::from_json(json).unwrap();
        assert_eq!(config.entries.len(), 2);

        let entry = &config.entries[0];
        assert_eq!(entry.name, "Approved requirements");
        assert_eq!(entry.rules[0].extension.as_deref(), Some("req"));
        assert_eq!(entry.rules[0].bounds.as_deref(), Some("specs/*"));
        assert_eq!(entry.rules[1].extension, None);
        assert_eq!(entry.rules[1].condition, r#"owner = "team-a""#);
        assert!(config.entries[1].rules.is_empty());
    }

    #[test]
    fn test_missing_condition_is_rejected() {
        let json = r#"{ "entries": [ { "name": "x", "rules": [ { "extension": "req" } ] } ] }"#;
        let err = ReportConfig::from_json(json).unwrap_err();
        assert!(matches!(err, RuleError::Deserialization(_)));
        assert!(err.to_string().contains("condition"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ReportConfig::from_json("{ entries: "),
            Err(RuleError::Deserialization(_))
        ));
    }

    #[test]
    fn test_empty_config() {
        let config = ReportConfig::from_json("{}").unwrap();
        assert!(config.entries.is_empty());
    }
}
