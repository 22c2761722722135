//! Field-level product validation.
//!
//! Schema-style constraints on a single draft (name shape, price and stock
//! bounds). Cross-entity rules such as uniqueness or capacity belong to the
//! rule engine, not here.

use serde::Serialize;
use thiserror::Error;

use crate::product::NewProduct;

/// A single field constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl core::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// One or more field constraints failed.
///
/// Violations are collected rather than short-circuited so the caller sees
/// every offending field at once.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("validation failed: {}", describe(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Errors only when violations were actually collected.
    pub fn from_violations(violations: Vec<FieldViolation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self { violations })
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(FieldViolation::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Field-level validation contract, run before any business rule.
pub trait ProductValidator: Send + Sync {
    fn validate(&self, draft: &NewProduct) -> Result<(), ValidationError>;
}

/// Default constraints: name present and at least two characters, unit price
/// non-zero, stock non-negative.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardProductValidator;

impl ProductValidator for StandardProductValidator {
    fn validate(&self, draft: &NewProduct) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        let name = draft.name.trim();
        if name.is_empty() {
            violations.push(FieldViolation::new("name", "must not be empty"));
        } else if name.chars().count() < 2 {
            violations.push(FieldViolation::new("name", "must be at least 2 characters"));
        }

        if draft.unit_price.is_zero() {
            violations.push(FieldViolation::new("unit_price", "must be greater than zero"));
        }

        if draft.units_in_stock < 0 {
            violations.push(FieldViolation::new("units_in_stock", "must not be negative"));
        }

        ValidationError::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradegate_core::{CategoryId, Money};

    fn draft(name: &str, price: Money, stock: i64) -> NewProduct {
        NewProduct {
            category_id: CategoryId::new(1),
            name: name.to_string(),
            unit_price: price,
            units_in_stock: stock,
        }
    }

    #[test]
    fn accepts_a_well_formed_draft() {
        let validator = StandardProductValidator;
        assert!(validator.validate(&draft("Bardak", Money::from_major(15), 15)).is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace_names() {
        let validator = StandardProductValidator;
        for name in ["", "   "] {
            let err = validator
                .validate(&draft(name, Money::from_major(10), 1))
                .unwrap_err();
            assert_eq!(err.violations().len(), 1);
            assert_eq!(err.violations()[0].field, "name");
        }
    }

    #[test]
    fn rejects_single_character_names() {
        let validator = StandardProductValidator;
        let err = validator
            .validate(&draft("B", Money::from_major(10), 1))
            .unwrap_err();
        assert!(err.to_string().contains("at least 2 characters"));
    }

    #[test]
    fn rejects_zero_price() {
        let validator = StandardProductValidator;
        let err = validator.validate(&draft("Bardak", Money::ZERO, 1)).unwrap_err();
        assert_eq!(err.violations()[0].field, "unit_price");
    }

    #[test]
    fn rejects_negative_stock() {
        let validator = StandardProductValidator;
        let err = validator
            .validate(&draft("Bardak", Money::from_major(10), -1))
            .unwrap_err();
        assert_eq!(err.violations()[0].field, "units_in_stock");
    }

    #[test]
    fn collects_every_offending_field() {
        let validator = StandardProductValidator;
        let err = validator.validate(&draft("", Money::ZERO, -5)).unwrap_err();

        let fields: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["name", "unit_price", "units_in_stock"]);

        let message = err.to_string();
        assert!(message.starts_with("validation failed: "));
        assert!(message.contains("name"));
        assert!(message.contains("unit_price"));
        assert!(message.contains("units_in_stock"));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            #[test]
            fn verdict_agrees_with_the_field_checks(
                name in "[ A-Za-z]{0,6}",
                price in 0u64..5_000,
                stock in -3i64..50,
            ) {
                let verdict =
                    StandardProductValidator.validate(&draft(&name, Money::from_minor(price), stock));

                let trimmed = name.trim();
                let expect_ok =
                    trimmed.chars().count() >= 2 && price > 0 && stock >= 0;
                prop_assert_eq!(verdict.is_ok(), expect_ok);
            }

            #[test]
            fn well_formed_drafts_always_pass(
                name in "[A-Za-z]{2,12}",
                price in 1u64..100_000,
                stock in 0i64..1_000,
            ) {
                prop_assert!(
                    StandardProductValidator
                        .validate(&draft(&name, Money::from_minor(price), stock))
                        .is_ok()
                );
            }
        }
    }
}
