//! Money amounts in minor currency units.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_object::ValueObject;

/// An amount in the smallest currency unit (e.g. cents).
///
/// The catalog does not deal in currencies; amounts are compared and
/// range-filtered as plain minor-unit integers, which keeps price queries
/// exact (no floating point).
#[derive(
    Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole currency units, e.g. `from_major(15)` is 15.00.
    pub const fn from_major(major: u64) -> Self {
        Self(major * 100)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl ValueObject for Money {}

/// Failed to parse a money amount from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("empty amount")]
    Empty,

    #[error("invalid amount '{0}'")]
    Invalid(String),

    #[error("amount '{0}' has more than two fractional digits")]
    Precision(String),

    #[error("amount '{0}' is out of range")]
    OutOfRange(String),
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Accepts `"15"`, `"15.5"` and `"15.50"`; anything finer than a minor
    /// unit is rejected rather than silently rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (major, fraction) = match raw.split_once('.') {
            Some((major, fraction)) => (major, Some(fraction)),
            None => (raw, None),
        };

        let major: u64 = major
            .parse()
            .map_err(|_| ParseMoneyError::Invalid(raw.to_string()))?;

        let minor: u64 = match fraction {
            None => 0,
            Some("") => return Err(ParseMoneyError::Invalid(raw.to_string())),
            Some(fraction) if fraction.len() == 1 => {
                let tenth: u64 = fraction
                    .parse()
                    .map_err(|_| ParseMoneyError::Invalid(raw.to_string()))?;
                tenth * 10
            }
            Some(fraction) if fraction.len() == 2 => fraction
                .parse()
                .map_err(|_| ParseMoneyError::Invalid(raw.to_string()))?,
            Some(_) => return Err(ParseMoneyError::Precision(raw.to_string())),
        };

        major
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(minor))
            .map(Money)
            .ok_or_else(|| ParseMoneyError::OutOfRange(raw.to_string()))
    }
}
