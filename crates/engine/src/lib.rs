//! `tradegate-engine` — business rules and orchestration for the catalog.
//!
//! [`ProductEngine`] is the single gatekeeper in front of a product store:
//! mutations pass field validation, an access check and three ordered
//! business rules before anything is written, and reads go through a
//! staleness-bounded query cache plus a simulated maintenance window.
//! Cross-cutting steps run as an explicit named-stage pipeline rather than
//! through any interception machinery.

pub mod access;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod policy;
pub mod rules;

pub use access::{AccessDenied, AccessPolicy, Permission, PermissionSet, PermitAll};
pub use config::EngineConfig;
pub use engine::ProductEngine;
pub use error::{EngineError, RuleViolation};
pub use filter::ProductFilter;
pub use policy::MaintenanceWindow;
