//! Folds a flat part sequence into a condition tree

use smallvec::SmallVec;

use crate::condition::ast::{ConditionTree, SimpleCondition};
use crate::condition::part::{BooleanSign, Condition, ConditionPart, Sign};
use crate::error::{BracketImbalance, Result, RuleError};

/// Terms collected at one bracket depth
#[derive(Debug, Default)]
struct Group {
    /// Operator of the current chain, set once it has two children
    op: Option<BooleanSign>,
    children: SmallVec<[ConditionTree; 4]>,
    /// Operator waiting for its right-hand term
    pending: Option<BooleanSign>,
}

impl Group {
    fn push(&mut self, child: ConditionTree) -> Result<()> {
        if self.children.is_empty() {
            self.children.push(child);
            return Ok(());
        }

        let Some(op) = self.pending.take() else {
            return Err(RuleError::Assembly(format!(
                "missing boolean operator before '{}'",
                child
            )));
        };

        // Equal precedence: a change of operator closes the chain so far.
        if let Some(current) = self.op.filter(|current| *current != op) {
            let chain = std::mem::take(&mut self.children).into_vec();
            self.children.push(ConditionTree::Combined {
                op: current,
                children: chain,
            });
        }
        self.op = Some(op);
        self.children.push(child);
        Ok(())
    }

    fn awaits_operator(&self) -> bool {
        !self.children.is_empty() && self.pending.is_none()
    }

    fn push_operator(&mut self, op: BooleanSign) -> Result<()> {
        if self.children.is_empty() {
            return Err(RuleError::Assembly(format!(
                "boolean operator '{}' has no left operand",
                op.as_str()
            )));
        }
        if let Some(previous) = self.pending {
            return Err(RuleError::Assembly(format!(
                "two consecutive boolean operators: '{}' then '{}'",
                previous.as_str(),
                op.as_str()
            )));
        }
        self.pending = Some(op);
        Ok(())
    }

    fn finish(mut self) -> Result<ConditionTree> {
        if let Some(op) = self.pending {
            return Err(RuleError::Assembly(format!(
                "boolean operator '{}' has no right operand",
                op.as_str()
            )));
        }
        match (self.children.len(), self.op) {
            (0, _) => Err(RuleError::Assembly("empty group".to_string())),
            (1, _) => Ok(self.children.remove(0)),
            (_, Some(op)) => Ok(ConditionTree::Combined {
                op,
                children: self.children.into_vec(),
            }),
            (_, None) => Err(RuleError::Assembly(
                "missing boolean operator between conditions".to_string(),
            )),
        }
    }
}

/// Comparison being assembled
enum Partial {
    Empty,
    Field(String),
    FieldSign(String, Sign),
}

impl Partial {
    fn describe(&self) -> String {
        match self {
            Partial::Empty => String::new(),
            Partial::Field(field) => field.clone(),
            Partial::FieldSign(field, sign) => format!("{} {}", field, sign.as_str()),
        }
    }
}

fn incomplete(partial: &Partial, next: &ConditionPart) -> RuleError {
    RuleError::Assembly(format!(
        "incomplete comparison '{}' before '{}'",
        partial.describe(),
        next
    ))
}

/// Fold scanned parts into a tree, one stack frame per bracket depth
pub fn simplify(condition: &Condition) -> Result<ConditionTree> {
    let mut current = Group::default();
    let mut outer: SmallVec<[Group; 4]> = SmallVec::new();
    let mut partial = Partial::Empty;

    for part in condition.parts() {
        partial = match (partial, part) {
            (Partial::Empty, ConditionPart::OpenBracket) => {
                outer.push(std::mem::take(&mut current));
                Partial::Empty
            }
            (Partial::Empty, ConditionPart::CloseBracket) => {
                let Some(parent) = outer.pop() else {
                    return Err(RuleError::Structural(BracketImbalance::ExtraClose));
                };
                let inner = std::mem::replace(&mut current, parent).finish()?;
                current.push(inner)?;
                Partial::Empty
            }
            (Partial::Empty, ConditionPart::FieldName(name)) => {
                if current.awaits_operator() {
                    return Err(RuleError::Assembly(format!(
                        "missing boolean operator before '{}'",
                        name
                    )));
                }
                Partial::Field(name.clone())
            }
            (Partial::Field(field), ConditionPart::Sign(sign)) => Partial::FieldSign(field, *sign),
            (Partial::FieldSign(field, sign), ConditionPart::Value(value)) => {
                current.push(ConditionTree::Simple(SimpleCondition {
                    field,
                    sign,
                    value: value.clone(),
                }))?;
                Partial::Empty
            }
            (Partial::Empty, ConditionPart::BooleanSign(op)) => {
                current.push_operator(*op)?;
                Partial::Empty
            }
            (partial, ConditionPart::EndOfInput) => partial,
            (_, ConditionPart::Error(message)) => {
                return Err(RuleError::Lexical {
                    message: message.clone(),
                    offset: 0,
                })
            }
            (Partial::Empty, ConditionPart::Sign(sign)) => {
                return Err(RuleError::Assembly(format!(
                    "sign '{}' has no field name",
                    sign.as_str()
                )))
            }
            (Partial::Empty, ConditionPart::Value(value)) => {
                return Err(RuleError::Assembly(format!(
                    "value '{}' has no field and sign",
                    value
                )))
            }
            (partial, part) => return Err(incomplete(&partial, part)),
        };
    }

    if !matches!(partial, Partial::Empty) {
        return Err(RuleError::Assembly(format!(
            "incomplete comparison '{}' at end of condition",
            partial.describe()
        )));
    }
    if !outer.is_empty() {
        return Err(RuleError::Structural(BracketImbalance::ExtraOpen));
    }
    current.finish()
}
