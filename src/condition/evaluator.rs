//! Condition evaluator

use std::cmp::Ordering;
use std::collections::HashMap;

use ahash::AHashMap;

use crate::condition::ast::{ConditionTree, SimpleCondition};
use crate::condition::part::{parse_finite, BooleanSign, Sign, Value};

/// Current value of one schema field on a candidate element
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    /// Combo field: the one selected item of the schema's list
    Choice { index: i64, label: String },
    /// Check field: every selected item of the schema's list
    Checks(Vec<FieldItem>),
}

/// Item of a combo or check field's option list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldItem {
    pub index: i64,
    pub label: String,
}

impl FieldItem {
    pub fn new(index: i64, label: impl Into<String>) -> Self {
        Self {
            index,
            label: label.into(),
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match value.as_index() {
            Some(index) => self.index == index,
            None => self.label == value.text(),
        }
    }
}

/// Source of field values for one candidate element
pub trait FieldLookup {
    fn field_value(&self, name: &str) -> Option<FieldValue>;
}

impl FieldLookup for HashMap<String, FieldValue> {
    fn field_value(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

impl FieldLookup for AHashMap<String, FieldValue> {
    fn field_value(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

impl<T: FieldLookup + ?Sized> FieldLookup for &T {
    fn field_value(&self, name: &str) -> Option<FieldValue> {
        (**self).field_value(name)
    }
}

/// Evaluate a tree against one element's field values
pub fn check<L: FieldLookup + ?Sized>(tree: &ConditionTree, lookup: &L) -> bool {
    match tree {
        ConditionTree::Simple(cond) => check_single(cond, lookup),
        ConditionTree::Combined {
            op: BooleanSign::And,
            children,
        } => children.iter().all(|child| check(child, lookup)),
        ConditionTree::Combined {
            op: BooleanSign::Or,
            children,
        } => children.iter().any(|child| check(child, lookup)),
    }
}

fn check_single<L: FieldLookup + ?Sized>(cond: &SimpleCondition, lookup: &L) -> bool {
    // Missing fields never match, whatever the sign
    let Some(actual) = lookup.field_value(&cond.field) else {
        return false;
    };

    match actual {
        FieldValue::Checks(items) => {
            let any = items.iter().any(|item| item.matches(&cond.value));
            match cond.sign {
                Sign::Equal | Sign::DoubleEqual => any,
                Sign::NotEqual => !any,
                // Default: ordering is undefined for a set of items
                _ => false,
            }
        }
        single => compare_field(&single, &cond.value)
            .is_some_and(|ordering| cond.sign.holds(ordering)),
    }
}

/// Order a single-valued field against a literal.
///
/// Text is compared numerically when both sides parse as numbers and
/// ordinally otherwise. Combo fields compare their index against integer
/// literals and their label against anything else. `None` when the two
/// cannot be ordered.
pub fn compare_field(actual: &FieldValue, expected: &Value) -> Option<Ordering> {
    match actual {
        FieldValue::Text(text) => match (parse_finite(text), expected.as_number()) {
            (Some(a), Some(e)) => a.partial_cmp(&e),
            _ => Some(text.as_str().cmp(expected.text())),
        },
        FieldValue::Number(number) => expected.as_number().and_then(|e| number.partial_cmp(&e)),
        FieldValue::Choice { index, label } => match expected.as_index() {
            Some(e) => Some(index.cmp(&e)),
            None => Some(label.as_str().cmp(expected.text())),
        },
        FieldValue::Checks(_) => None,
    }
}
