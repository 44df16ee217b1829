//! Literal forms shared by both grammars.

use criterium_common::utils::error::{Error, Result};

/// Quotes a string, doubling embedded single quotes.
#[must_use]
pub fn string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Renders a long in decimal.
#[must_use]
pub fn long(v: i64) -> String {
    v.to_string()
}

/// Renders a double so that it always reads back as a double (`4.0`).
///
/// # Errors
///
/// Neither grammar has a spelling for NaN or the infinities.
pub fn double(v: f64) -> Result<String> {
    if v.is_finite() {
        Ok(format!("{v:?}"))
    } else {
        Err(Error::InvalidArgument(format!(
            "{v} has no literal form in a query"
        )))
    }
}
