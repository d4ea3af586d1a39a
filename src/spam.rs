//! Spam screening for contact submissions.
//!
//! The blocklist is a declarative set of matchers rather than inline
//! checks, so it can be extended from configuration without touching
//! the intake control flow. The lexicon is a tunable blocklist, not an
//! exhaustive defense.

/// A single spam matcher. All matching is done on lowercased text.
#[derive(Debug, Clone)]
pub enum SpamPattern {
    /// Matches if the term occurs anywhere in the text.
    Literal(String),
    /// Matches if all terms occur in the text in the given order,
    /// with anything in between.
    Sequence(Vec<String>),
}

impl SpamPattern {
    fn matches(&self, text: &str) -> bool {
        match self {
            Self::Literal(term) => text.contains(term.as_str()),
            Self::Sequence(terms) => {
                let mut rest = text;
                for term in terms {
                    let Some(pos) = rest.find(term.as_str()) else {
                        return false;
                    };
                    rest = rest.get(pos + term.len()..).unwrap_or_default();
                }
                true
            }
        }
    }
}

/// The fixed set of spam matchers, loaded once at startup.
#[derive(Debug, Clone)]
pub struct SpamPatternSet {
    patterns: Vec<SpamPattern>,
}

fn literal(term: &str) -> SpamPattern {
    SpamPattern::Literal(term.to_string())
}

fn sequence(terms: &[&str]) -> SpamPattern {
    SpamPattern::Sequence(terms.iter().map(|t| t.to_string()).collect())
}

impl Default for SpamPatternSet {
    fn default() -> Self {
        Self {
            patterns: vec![
                literal("viagra"),
                literal("casino"),
                literal("lottery"),
                literal("$$$"),
                sequence(&["urgent", "money"]),
                sequence(&["click", "here", "now"]),
            ],
        }
    }
}

impl SpamPatternSet {
    /// The built-in lexicon extended with literal terms from configuration.
    pub fn with_extra_terms(extra: &[String]) -> Self {
        let mut set = Self::default();
        set.patterns
            .extend(extra.iter().map(|term| literal(&term.to_lowercase())));
        set
    }

    /// Check text against the pattern set, case-insensitively.
    pub fn is_spam(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.patterns.iter().any(|pattern| pattern.matches(&text))
    }
}
