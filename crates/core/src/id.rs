//! Strongly-typed identifiers used across the catalog domain.

use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a product. Assigned by the product store on insert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

/// Identifier of a category. Categories are owned by an external service;
/// the catalog only references them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(u64);

/// Failed to parse a numeric identifier from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: '{input}'")]
pub struct ParseIdError {
    kind: &'static str,
    input: String,
    #[source]
    source: ParseIntError,
}

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse().map_err(|source| ParseIdError {
                    kind: $name,
                    input: s.to_string(),
                    source,
                })?;
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(ProductId, "ProductId");
impl_int_newtype!(CategoryId, "CategoryId");
