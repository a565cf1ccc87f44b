//! Condition scanning, assembly and evaluation
//!
//! This module handles condition strings like
//! `status = "approved" and (priority = high or owner = team-a)`:
//! the scanner turns the text into flat parts, the builder folds them into
//! a tree, and the evaluator checks the tree against a record of field values.

mod ast;
mod builder;
pub mod cache;
mod evaluator;
mod part;
pub mod parser;
pub mod scanner;


pub use ast::*;
pub use builder::simplify;
pub use cache::*;
pub use evaluator::*;
pub use parser::*;
pub use part::*;
pub use scanner::{scan, Scanner};
