//! Form validation framework
//!
//! A validator is a pure function from a form snapshot to a per-field
//! validity map. The framework adds no logic of its own: its value is the
//! shared shape, so every form in the toolkit plugs its own rules into one
//! uniform consumer contract (`outcome[field].is_valid` / `.error`). Every
//! call recomputes fully and synchronously - forms are small, and fresh
//! outcomes avoid stale-validation bugs.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Validity of a single form field.
///
/// The steady states are "valid" and "invalid with an error message", but
/// the default - invalid with no message - is deliberately representable:
/// it is the untouched state a field holds before its first evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validity {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl Validity {
    /// A valid field
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    /// An invalid field with an inline message
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Per-field validation outcome for a form with field keys `K`
pub type Validations<K> = HashMap<K, Validity>;

/// Run a validator against a form snapshot.
///
/// Returns the validator's output unchanged; no caching, no merging with
/// prior outcomes.
pub fn validate<F, O, V>(validator: V, form: &F) -> O
where
    V: Fn(&F) -> O,
{
    validator(form)
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[A-Z0-9._%+-]{1,64}@(?:[A-Z0-9-]{1,63}\.){1,125}[A-Z]{2,63}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Check an email address against the shared RFC-shaped pattern.
///
/// The input is trimmed and upper-cased before matching, so case never
/// affects validity.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(&email.trim().to_uppercase())
}
