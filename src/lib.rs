//! Report Rule Core - condition language for report-filtering rules
//!
//! Rules decide which elements of a document belong to a report entry. A
//! rule combines an optional schema extension, optional folder bounds and a
//! condition such as `status = approved and (priority >= 3 || owner = "me")`.
//!
//! - [`condition`] scans condition text into parts, assembles the parts into
//!   a tree and evaluates trees against an element's field values.
//! - [`rule`] holds one compiled rule and its filters.
//! - [`report`] compiles whole reports from [`config`] and sorts candidates
//!   into entries.

pub mod condition;
pub mod config;
pub mod error;
pub mod report;
pub mod rule;

pub use condition::{check, parse, ConditionTree, FieldLookup, FieldValue};
pub use config::{ReportConfig, RuleDefinition};
pub use error::{Result, RuleError};
pub use report::{Candidate, Record, Report, ReportEntry};
pub use rule::Rule;
