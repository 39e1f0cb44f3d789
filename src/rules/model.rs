// src/rules/model.rs

use crate::engine::FileName;

/// A single `target <- dep1 dep2 ...;` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub target: FileName,
    /// Dependencies in declaration order.
    pub deps: Vec<FileName>,
}

impl Rule {
    pub fn new<T, I, D>(target: T, deps: I) -> Self
    where
        T: Into<FileName>,
        I: IntoIterator<Item = D>,
        D: Into<FileName>,
    {
        Self {
            target: target.into(),
            deps: deps.into_iter().map(Into::into).collect(),
        }
    }
}

/// Rules exactly as parsed, before any semantic checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRuleSet {
    pub rules: Vec<Rule>,
}

/// Validated, ordered rule set.
///
/// Construct it through `RuleSet::try_from(raw)` (see `rules::validate`),
/// which guarantees the dependency graph is acyclic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Wrap rules without validating them.
    ///
    /// The scheduler does not detect cycles: a cyclic rule set built this way
    /// leaves the affected target workers waiting forever.
    pub fn new_unchecked(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Effective dependencies of `target`: those of the last rule naming it.
    pub fn dependencies_of(&self, target: &str) -> Option<&[FileName]> {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.target == target)
            .map(|rule| rule.deps.as_slice())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
