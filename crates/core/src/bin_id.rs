//! Bin identifiers and their validation rules.
//!
//! A bin id names one capture bin and doubles as the entity key in the
//! registry, so every id in circulation must already be validated.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::limits::{BIN_ID_MAX_LEN, BIN_ID_PATTERN, RESERVED_BIN_ID};

/// Compiled bin id regex (lazy initialization).
static BIN_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BIN_ID_PATTERN).expect("invalid bin id pattern"));

/// Parsed and validated bin identifier.
///
/// Construction goes through [`BinId::parse`], which enforces the naming
/// rules. Ids are case-sensitive: `Orders` and `orders` are distinct bins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinId(String);

impl BinId {
    /// Parse and validate a bin id.
    ///
    /// Rules: non-empty, at most [`BIN_ID_MAX_LEN`] chars, only letters,
    /// numbers, `-`, `_` and `.`, and not the reserved word `bin` (compared
    /// case-insensitively).
    pub fn parse(id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(Error::invalid_bin_id("Bin Id cannot be empty."));
        }

        if id.chars().count() > BIN_ID_MAX_LEN {
            return Err(Error::invalid_bin_id(format!(
                "Bin Id cannot be longer than {BIN_ID_MAX_LEN} chars."
            )));
        }

        if !BIN_ID_REGEX.is_match(id) {
            return Err(Error::invalid_bin_id(
                "Bin Id can only contain Numbers, Letters, '-', '_' and '.'",
            ));
        }

        if id.eq_ignore_ascii_case(RESERVED_BIN_ID) {
            return Err(Error::invalid_bin_id(format!(
                "Bin Id cannot be '{RESERVED_BIN_ID}'."
            )));
        }

        Ok(Self(id.to_string()))
    }

    /// Get the raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for BinId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
