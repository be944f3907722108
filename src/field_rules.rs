//! Per-keystroke acceptance rules for free-text form fields.
//!
//! A value which fails its rule is quietly rejected: the form keeps the prior value
//! and no error is shown to the operator.

use regex::Regex;
use std::sync::OnceLock;

static NAME_RE: OnceLock<Regex> = OnceLock::new();
static IDENTIFICATION_RE: OnceLock<Regex> = OnceLock::new();
static AGE_RE: OnceLock<Regex> = OnceLock::new();

const MAX_IDENTIFICATION_LEN: usize = 8;
const MAX_AGE: u32 = 99;

/// Letters and whitespace only. Empty is allowed.
pub(crate) fn accepts_name(value: &str) -> bool {
    NAME_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z\s]*$").unwrap())
        .is_match(value)
}

/// One to eight digits. Empty is not allowed.
pub(crate) fn accepts_identification(value: &str) -> bool {
    value.len() <= MAX_IDENTIFICATION_LEN
        && IDENTIFICATION_RE
            .get_or_init(|| Regex::new(r"^[0-9]+$").unwrap())
            .is_match(value)
}

/// Digits only, with a numeric value from 0 to 99. Empty is allowed.
pub(crate) fn accepts_age(value: &str) -> bool {
    if !AGE_RE
        .get_or_init(|| Regex::new(r"^[0-9]*$").unwrap())
        .is_match(value)
    {
        return false;
    }
    // digit strings too long for u32 are certainly over the maximum
    value.is_empty() || value.parse::<u32>().is_ok_and(|age| age <= MAX_AGE)
}
