//! Condition tree assembled from scanned parts

use std::fmt;

use crate::condition::part::{BooleanSign, Sign, Value};

/// Single comparison like `status = "open"`
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleCondition {
    pub field: String,
    pub sign: Sign,
    pub value: Value,
}

impl SimpleCondition {
    pub fn new(field: impl Into<String>, sign: Sign, value: Value) -> Self {
        Self {
            field: field.into(),
            sign,
            value,
        }
    }
}

impl fmt::Display for SimpleCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.sign.as_str(), self.value)
    }
}

/// Boolean combination of comparisons.
///
/// Bracket nesting in the source text is the only grouping: a parenthesized
/// group always becomes its own child node, even under the same operator.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionTree {
    Simple(SimpleCondition),
    /// Two or more children joined by one operator
    Combined {
        op: BooleanSign,
        children: Vec<ConditionTree>,
    },
}

impl ConditionTree {
    /// Comparisons in source order
    pub fn simple_conditions(&self) -> Vec<&SimpleCondition> {
        let mut out = Vec::new();
        self.collect_simple(&mut out);
        out
    }

    fn collect_simple<'a>(&'a self, out: &mut Vec<&'a SimpleCondition>) {
        match self {
            ConditionTree::Simple(cond) => out.push(cond),
            ConditionTree::Combined { children, .. } => {
                for child in children {
                    child.collect_simple(out);
                }
            }
        }
    }

    /// Distinct field names referenced by the tree, in first-use order
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for cond in self.simple_conditions() {
            if !names.contains(&cond.field.as_str()) {
                names.push(&cond.field);
            }
        }
        names
    }

    /// Nesting depth; a single comparison has depth 1
    pub fn depth(&self) -> usize {
        match self {
            ConditionTree::Simple(_) => 1,
            ConditionTree::Combined { children, .. } => {
                1 + children.iter().map(ConditionTree::depth).max().unwrap_or(0)
            }
        }
    }
}

impl From<SimpleCondition> for ConditionTree {
    fn from(cond: SimpleCondition) -> Self {
        ConditionTree::Simple(cond)
    }
}

/// Canonical form: rescanning it yields an equal tree
impl fmt::Display for ConditionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionTree::Simple(cond) => write!(f, "{}", cond),
            ConditionTree::Combined { op, children } => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.as_str())?;
                    }
                    match child {
                        ConditionTree::Simple(cond) => write!(f, "{}", cond)?,
                        ConditionTree::Combined { .. } => write!(f, "({})", child)?,
                    }
                }
                Ok(())
            }
        }
    }
}
