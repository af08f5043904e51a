use regex::Regex;
use shared_types::{ExtractionError, ExtractionInput};

/// One step of an extractor's fallback chain: a predicate and a transform in
/// a single call. `None` means the rule does not apply to this caption.
pub trait Rule<O = String>: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<O>;
}

/// Ordered, named rules of one extractor
pub struct RuleChain<O = String> {
    rules: Vec<Box<dyn Rule<O>>>,
}

impl<O> RuleChain<O> {
    pub fn new(rules: Vec<Box<dyn Rule<O>>>) -> Self {
        Self { rules }
    }

    /// Result of the first rule that applies, with that rule's name
    pub fn first_match(&self, input: &ExtractionInput<'_>) -> Option<(&'static str, O)> {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(input).map(|value| (rule.name(), value)))
    }

    /// Results of every rule that applies, in chain order
    pub fn all_matches(&self, input: &ExtractionInput<'_>) -> Vec<(&'static str, O)> {
        self.rules
            .iter()
            .filter_map(|rule| rule.apply(input).map(|value| (rule.name(), value)))
            .collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Remove a rule by name. The remaining rules keep their order.
    pub fn disable(&mut self, name: &str) -> Result<(), ExtractionError> {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != name);

        if self.rules.len() == before {
            return Err(ExtractionError::ConfigError(format!(
                "Unknown rule '{}', expected one of: {}",
                name,
                self.names().join(", ")
            )));
        }

        Ok(())
    }

    /// Move a rule to a new position in the chain
    pub fn reorder(&mut self, name: &str, position: usize) -> Result<(), ExtractionError> {
        let index = self
            .rules
            .iter()
            .position(|rule| rule.name() == name)
            .ok_or_else(|| ExtractionError::ConfigError(format!("Unknown rule '{}'", name)))?;

        let rule = self.rules.remove(index);
        let position = position.min(self.rules.len());
        self.rules.insert(position, rule);

        Ok(())
    }
}

/// Compile one of the built-in patterns
pub(crate) fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("built-in pattern must compile")
}
