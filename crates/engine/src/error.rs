//! Engine failure taxonomy.
//!
//! Expected business outcomes (validation, rule violations, the maintenance
//! gate, missing permissions) are ordinary values with stable display
//! strings suitable for direct rendering. Store faults, gate timeouts and
//! the deliberate fatal signal ride the same enum but represent the raised
//! fault channel; [`EngineError::is_business`] separates the two.

use thiserror::Error;

use std::time::Duration;

use tradegate_catalog::ValidationError;
use tradegate_store::StoreError;

use crate::access::AccessDenied;

/// One of the ordered business rules rejecting a mutation.
///
/// The display strings are part of the caller-facing contract and must not
/// change between releases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleViolation {
    /// The target category already holds more products than it may.
    #[error("product count of category exceeded")]
    CategoryProductCount,

    /// Another product already carries the exact same name.
    #[error("product name already exists")]
    DuplicateName,

    /// The catalog already has more categories than it may.
    #[error("category count exceeded")]
    CategoryCapacity,
}

/// Failure channel shared by every engine operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Field-level validation rejected the draft before any rule ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An ordered business rule rejected the mutation.
    #[error(transparent)]
    Rule(#[from] RuleViolation),

    /// The details view is unavailable during the maintenance hour.
    #[error("maintenance time")]
    Maintenance,

    /// The caller lacks a permission the operation requires.
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),

    /// The mutation gate stayed busy for the whole bounded wait.
    #[error("mutation gate busy, timed out after {}ms", .0.as_millis())]
    GateTimeout(Duration),

    /// Storage fault; not a business outcome.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// The deliberate unconditional fault inside the transactional demo
    /// path. Caught by the transaction wrapper for rollback, then
    /// propagated; never swallowed.
    #[error("fatal: {0}")]
    Fatal(String),
}

impl From<AccessDenied> for EngineError {
    fn from(denied: AccessDenied) -> Self {
        EngineError::Forbidden(denied.0)
    }
}

impl EngineError {
    /// True for expected outcomes whose message is meant for end users.
    /// Everything else is an internal fault.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            EngineError::Validation(_)
                | EngineError::Rule(_)
                | EngineError::Maintenance
                | EngineError::Forbidden(_)
        )
    }
}
