//! Contact submission type and intake validation.

use crate::spam::SpamPatternSet;

/// One contact form submission. Lives only for the duration of a request,
/// never persisted.
#[derive(Debug, Clone)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub project_type: Option<String>,
    pub message: String,
}

/// Reason a submission was rejected. User-fixable, surfaced verbatim
/// to the caller and never logged as a system fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("missing required fields")]
    MissingFields,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("blocked as spam")]
    Spam,
}

impl Submission {
    /// Validate the submission: required fields, email shape, spam screen.
    /// Checks run in that order and the first failure short-circuits.
    pub fn validate(&self, patterns: &SpamPatternSet) -> Result<(), Rejection> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.message.trim().is_empty()
        {
            return Err(Rejection::MissingFields);
        }

        if !is_valid_email(&self.email) {
            return Err(Rejection::InvalidEmail);
        }

        if patterns.is_spam(&self.combined_text()) {
            return Err(Rejection::Spam);
        }

        Ok(())
    }

    /// The text the spam screen runs against.
    fn combined_text(&self) -> String {
        format!("{} {} {}", self.name, self.email, self.message)
    }
}

/// Minimal structural check: `<non-whitespace>@<non-whitespace>.<non-whitespace>`
/// with exactly one `@`. Not RFC validation.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}
