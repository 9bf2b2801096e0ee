//! Difficulty classification.
//!
//! Maps a question identifier to a [`Tier`] through an ordered rule list.
//! The rule list is the engine's only policy-injection point: it is built
//! explicitly and handed in at construction, so tests can substitute rule
//! sets without touching global state.

use crate::types::Tier;
use regex::Regex;

/// Predicate half of a classifier rule.
#[derive(Debug, Clone)]
pub enum RulePredicate {
    /// Case-insensitive identifier prefix
    Prefix(String),

    /// Regex over the full identifier
    Pattern(Regex),

    /// Inclusive range over the first integer found in the identifier
    IdRange { lo: i64, hi: i64 },
}

/// One (predicate, tier) pair.
#[derive(Debug, Clone)]
pub struct ClassifierRule {
    predicate: RulePredicate,
    tier: Tier,
}

impl ClassifierRule {
    /// Rule matching identifiers by case-insensitive prefix.
    pub fn prefix(prefix: impl Into<String>, tier: Tier) -> Self {
        Self {
            predicate: RulePredicate::Prefix(prefix.into().to_uppercase()),
            tier,
        }
    }

    /// Rule matching identifiers against a regex.
    ///
    /// Returns `None` if the pattern does not compile; callers assembling
    /// rule sets from config should surface that as a config error.
    pub fn pattern(pattern: &str, tier: Tier) -> Option<Self> {
        Regex::new(pattern).ok().map(|re| Self {
            predicate: RulePredicate::Pattern(re),
            tier,
        })
    }

    /// Rule matching the first integer in the identifier against `[lo, hi]`.
    pub fn id_range(lo: i64, hi: i64, tier: Tier) -> Self {
        Self {
            predicate: RulePredicate::IdRange { lo, hi },
            tier,
        }
    }

    fn matches(&self, identifier: &str) -> bool {
        match &self.predicate {
            RulePredicate::Prefix(prefix) => {
                identifier.trim().to_uppercase().starts_with(prefix.as_str())
            }
            RulePredicate::Pattern(re) => re.is_match(identifier),
            RulePredicate::IdRange { lo, hi } => first_integer(identifier)
                .map(|n| n >= *lo && n <= *hi)
                .unwrap_or(false),
        }
    }
}

/// First run of ASCII digits in the identifier, parsed as i64.
///
/// Malformed identifiers (no digits, overflow) yield `None`; classification
/// then falls through to later rules or the fallback tier.
fn first_integer(identifier: &str) -> Option<i64> {
    let digits: String = identifier
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().ok()
}

/// Ordered-rule difficulty classifier: first match wins.
#[derive(Debug, Clone)]
pub struct DifficultyClassifier {
    rules: Vec<ClassifierRule>,
    fallback: Tier,
}

impl DifficultyClassifier {
    /// Start building a classifier.
    pub fn builder() -> DifficultyClassifierBuilder {
        DifficultyClassifierBuilder {
            rules: Vec::new(),
            fallback: Tier::Synthesis,
        }
    }

    /// Resolve the tier for a question.
    ///
    /// Pure and deterministic: no identifier, no matching rule, or a
    /// malformed identifier all silently resolve to the fallback tier.
    pub fn classify(&self, identifier: Option<&str>, text: &str) -> Tier {
        tracing::trace!("Classifying question: {}", text);

        let Some(identifier) = identifier else {
            return self.fallback;
        };

        for rule in &self.rules {
            if rule.matches(identifier) {
                return rule.tier;
            }
        }

        self.fallback
    }
}

impl Default for DifficultyClassifier {
    /// The stock rule set: `B…` precise, `I…` synthesis, `A…` decomposition,
    /// anything else synthesis.
    fn default() -> Self {
        Self::builder()
            .rule(ClassifierRule::prefix("B", Tier::Precise))
            .rule(ClassifierRule::prefix("I", Tier::Synthesis))
            .rule(ClassifierRule::prefix("A", Tier::Decomposition))
            .fallback(Tier::Synthesis)
            .build()
    }
}

/// Builder for [`DifficultyClassifier`].
#[derive(Debug)]
pub struct DifficultyClassifierBuilder {
    rules: Vec<ClassifierRule>,
    fallback: Tier,
}

impl DifficultyClassifierBuilder {
    /// Append one rule; earlier rules have priority.
    pub fn rule(mut self, rule: ClassifierRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Set the fallback tier.
    pub fn fallback(mut self, tier: Tier) -> Self {
        self.fallback = tier;
        self
    }

    /// Finish building.
    pub fn build(self) -> DifficultyClassifier {
        DifficultyClassifier {
            rules: self.rules,
            fallback: self.fallback,
        }
    }
}
