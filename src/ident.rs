//! Canonical 128-bit identifiers for jobs and service records.
//!
//! The canonical textual form is the 36-character lowercase hyphenated
//! hexadecimal layout (8-4-4-4-12). Parsing here is deliberately stricter
//! than [`Uuid::parse_str`], which also accepts braced, simple, and URN
//! forms that are not valid on this wire.

use uuid::Uuid;

use crate::error::{GridlinkError, Result};

/// Length of the canonical identifier string.
pub const CANONICAL_LEN: usize = 36;

/// Positions of the four hyphens in the canonical layout.
const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Generate a new identifier from OS randomness.
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// The canonical 36-character lowercase hyphenated form.
pub fn to_canonical_string(id: &Uuid) -> String {
    id.hyphenated().to_string()
}

/// Parse a canonical identifier string.
///
/// Fails unless `s` is exactly 36 characters with hyphens at positions
/// 8/13/18/23 and hex digits everywhere else.
pub fn from_canonical_string(s: &str) -> Result<Uuid> {
    if s.len() != CANONICAL_LEN {
        return Err(GridlinkError::Validation(format!(
            "identifier must be {} characters, got {}: {:?}",
            CANONICAL_LEN,
            s.len(),
            s
        )));
    }
    for (i, c) in s.char_indices() {
        if HYPHENS.contains(&i) {
            if c != '-' {
                return Err(GridlinkError::Validation(format!(
                    "identifier missing hyphen at position {}: {:?}",
                    i, s
                )));
            }
        } else if !c.is_ascii_hexdigit() {
            return Err(GridlinkError::Validation(format!(
                "identifier has non-hex character at position {}: {:?}",
                i, s
            )));
        }
    }
    Uuid::parse_str(s)
        .map_err(|e| GridlinkError::Validation(format!("unparsable identifier {:?}: {}", s, e)))
}

/// Collect the valid canonical tokens in whitespace-separated `text`,
/// in order. Invalid tokens are skipped with a diagnostic, never failing
/// the whole parse.
pub fn parse_list(text: &str) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for token in text.split_whitespace() {
        match from_canonical_string(token) {
            Ok(id) => ids.push(id),
            Err(e) => {
                tracing::warn!(token, error = %e, "Skipping invalid identifier token");
            }
        }
    }
    ids
}

/// False iff every bit of `id` is zero.
pub fn is_set(id: &Uuid) -> bool {
    !id.is_nil()
}
