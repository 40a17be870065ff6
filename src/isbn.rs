//! ISBN-13 - the identity of a book record
//!
//! Stored and serialized as exactly 13 ASCII digits, e.g. `9780306406157`.
//! User input may be hyphenated (`978-0-306-40615-7`); see [`Isbn13::normalize`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of digits in an ISBN-13
pub const ISBN_LEN: usize = 13;

/// A validated 13-digit ISBN.
///
/// Used as the lookup key for `find` and `remove`. Only the digit count is
/// checked; the check digit is not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Isbn13(String);

impl Isbn13 {
    /// Parse an ISBN that must already be exactly 13 digits
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != ISBN_LEN {
            return Err(Error::InvalidRecord(format!(
                "ISBN-13 must contain exactly {} digits, got '{}'",
                ISBN_LEN, s
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidRecord(format!(
                "ISBN-13 must contain only digits, got '{}'",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Parse user input, accepting surrounding whitespace and hyphens
    pub fn normalize(input: &str) -> Result<Self> {
        let cleaned: String = input.trim().chars().filter(|c| *c != '-').collect();
        Self::parse(&cleaned)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Isbn13 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for Isbn13 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Isbn13 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Isbn13::parse(&s).map_err(serde::de::Error::custom)
    }
}
