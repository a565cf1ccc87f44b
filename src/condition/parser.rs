//! Condition string parser

use crate::condition::ast::ConditionTree;
use crate::condition::builder::simplify;
use crate::condition::scanner::scan;
use crate::error::Result;

/// Parse a condition string into a tree
pub fn parse(condition: &str) -> Result<ConditionTree> {
    let tree = scan(condition).and_then(|parts| simplify(&parts));
    if let Err(err) = &tree {
        log::debug!("rejected condition {:?}: {}", condition, err);
    }
    tree
}
