// src/rules/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::Result;
use crate::rules::model::{RawRuleSet, RuleSet};
use crate::rules::parser::parse;

/// Read and parse a rule file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawRuleSet> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let raw = parse(&contents)?;

    debug!(path = %path.display(), rules = raw.rules.len(), "parsed rule file");
    Ok(raw)
}

/// Read, parse and validate a rule file.
///
/// Rejects empty rule files, self-dependencies and dependency cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<RuleSet> {
    let raw = load_from_path(path)?;
    RuleSet::try_from(raw)
}
