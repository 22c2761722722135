//! Mutation access control.
//!
//! Permissions are opaque strings checked by an [`AccessPolicy`] before a
//! gated operation runs. Where those permissions come from (tokens, roles,
//! config) is the embedding application's problem; the engine only asks
//! "may the current caller do this".

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// Permission identifier.
///
/// A special wildcard permission `"*"` grants everything without
/// enumerating domain permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Required to add products, transactionally or not.
    pub const PRODUCT_ADD: Permission = Permission(Cow::Borrowed("product.add"));

    /// Required by every read operation.
    pub const PRODUCT_READ: Permission = Permission(Cow::Borrowed("product.read"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Denied authorization, naming the missing permission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("forbidden: missing permission '{0}'")]
pub struct AccessDenied(pub String);

/// Decides whether the current caller holds a permission.
///
/// Pure policy check: no IO, no panics, no business logic.
pub trait AccessPolicy: Send + Sync {
    fn authorize(&self, required: &Permission) -> Result<(), AccessDenied>;
}

/// Policy that grants everything. The default for embedded use, matching a
/// single-user console session.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermitAll;

impl AccessPolicy for PermitAll {
    fn authorize(&self, _required: &Permission) -> Result<(), AccessDenied> {
        Ok(())
    }
}

/// Static grant set; `"*"` grants everything.
#[derive(Debug, Clone, Default)]
pub struct PermissionSet {
    granted: HashSet<Permission>,
}

impl PermissionSet {
    pub fn new(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }

    /// Empty grant set; every check fails.
    pub fn none() -> Self {
        Self::default()
    }
}

impl AccessPolicy for PermissionSet {
    fn authorize(&self, required: &Permission) -> Result<(), AccessDenied> {
        let allowed = self.granted.contains(required)
            || self.granted.iter().any(Permission::is_wildcard);
        if allowed {
            Ok(())
        } else {
            Err(AccessDenied(required.as_str().to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permit_all_grants_everything() {
        assert!(PermitAll.authorize(&Permission::PRODUCT_ADD).is_ok());
        assert!(PermitAll.authorize(&Permission::new("anything.else")).is_ok());
    }

    #[test]
    fn grant_set_checks_membership() {
        let policy = PermissionSet::new([Permission::PRODUCT_READ]);
        assert!(policy.authorize(&Permission::PRODUCT_READ).is_ok());
        assert_eq!(
            policy.authorize(&Permission::PRODUCT_ADD),
            Err(AccessDenied("product.add".into()))
        );
    }

    #[test]
    fn wildcard_grants_everything() {
        let policy = PermissionSet::new([Permission::new("*")]);
        assert!(policy.authorize(&Permission::PRODUCT_ADD).is_ok());
        assert!(policy.authorize(&Permission::new("whatever")).is_ok());
    }

    #[test]
    fn empty_set_denies_with_the_permission_name() {
        let err = PermissionSet::none()
            .authorize(&Permission::PRODUCT_ADD)
            .unwrap_err();
        assert_eq!(err.to_string(), "forbidden: missing permission 'product.add'");
    }
}
