// src/rules/mod.rs

//! Rule files: the declarative input describing what depends on what.
//!
//! - [`model`] defines `Rule`, the unvalidated `RawRuleSet`, and the
//!   validated `RuleSet` consumed by the scheduler.
//! - [`parser`] turns `target <- dep ...;` text into a `RawRuleSet`.
//! - [`loader`] reads a rule file from disk.
//! - [`validate`] rejects self-dependencies and cycles.

pub mod loader;
pub mod model;
pub mod parser;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{RawRuleSet, Rule, RuleSet};
pub use parser::{parse, ParseError};
