#![allow(dead_code)]

use dagmake::rules::{parse, RawRuleSet, Rule, RuleSet};

/// Builder for `RuleSet` to simplify test setup.
pub struct RuleSetBuilder {
    raw: RawRuleSet,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawRuleSet::default(),
        }
    }

    /// Start from rule-file text.
    pub fn from_text(text: &str) -> Self {
        Self {
            raw: parse(text).expect("Failed to parse rule text in test"),
        }
    }

    pub fn rule(mut self, target: &str, deps: &[&str]) -> Self {
        self.raw.rules.push(Rule::new(target, deps.iter().copied()));
        self
    }

    /// Validated rule set (panics on cycles or an empty set).
    pub fn build(self) -> RuleSet {
        RuleSet::try_from(self.raw).expect("Failed to build valid rule set from builder")
    }

    /// Skip validation, e.g. to exercise cyclic or empty rule sets.
    pub fn build_unchecked(self) -> RuleSet {
        RuleSet::new_unchecked(self.raw.rules)
    }
}

impl Default for RuleSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
