//! Extraction rules mapping destination directories to patterns.

use std::path::Path;
use std::path::PathBuf;

use crate::pattern;

/// A single `(destination directory, pattern)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    destination: PathBuf,
    pattern: String,
}

impl Rule {
    /// Creates a rule writing entries matching `pattern` below `destination`.
    pub fn new(destination: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            pattern: pattern.into(),
        }
    }

    /// Returns the destination directory as given by the caller.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Returns the glob pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if an entry named `name` is selected by this rule.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        pattern::matches(&self.pattern, name)
    }
}

/// The set of rules evaluated against every tar entry.
///
/// Destinations are unique: inserting a destination that is already present
/// replaces its pattern. Rules are kept in insertion order so that runs are
/// reproducible, but no rule shadows another: an entry is written to every
/// destination whose pattern it matches.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use tarsift_core::RuleSet;
///
/// let mut rules = RuleSet::single("/tmp/bin", "/usr/bin/*");
/// rules.insert("/tmp/etc", "/etc/*");
/// assert_eq!(rules.len(), 2);
///
/// let from_map: RuleSet = HashMap::from([("/tmp/x", "*.json")]).into_iter().collect();
/// assert_eq!(from_map.get("/tmp/x"), Some("*.json"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule set with one rule.
    pub fn single(destination: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            rules: vec![Rule::new(destination, pattern)],
        }
    }

    /// Adds a rule, returning the pattern it replaced if the destination was
    /// already present.
    pub fn insert(
        &mut self,
        destination: impl Into<PathBuf>,
        pattern: impl Into<String>,
    ) -> Option<String> {
        let rule = Rule::new(destination, pattern);
        if let Some(existing) = self
            .rules
            .iter_mut()
            .find(|r| r.destination == rule.destination)
        {
            return Some(std::mem::replace(&mut existing.pattern, rule.pattern));
        }
        self.rules.push(rule);
        None
    }

    /// Returns the pattern configured for `destination`.
    pub fn get(&self, destination: impl AsRef<Path>) -> Option<&str> {
        let destination = destination.as_ref();
        self.rules
            .iter()
            .find(|r| r.destination.as_path() == destination)
            .map(Rule::pattern)
    }

    /// Iterates over the rules in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<P: Into<PathBuf>, S: Into<String>> FromIterator<(P, S)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (P, S)>>(iter: I) -> Self {
        let mut rules = Self::new();
        rules.extend(iter);
        rules
    }
}

impl<P: Into<PathBuf>, S: Into<String>> Extend<(P, S)> for RuleSet {
    fn extend<I: IntoIterator<Item = (P, S)>>(&mut self, iter: I) {
        for (destination, pattern) in iter {
            self.insert(destination, pattern);
        }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
