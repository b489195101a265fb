//! Authorization policies attached to ledger and admin operations.
//!
//! The ownership rules differ per operation. Rather than hard-coding the
//! owner filter into each call site, every ledger operation consults a
//! [`LedgerPolicy`] value, so the rules are visible configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an operation only sees records owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
  /// Records owned by anyone else are treated as absent.
  ScopedByOwner,
  /// Any authenticated caller may act on any record by id.
  Unscoped,
}

impl AccessPolicy {
  /// The owner filter to hand to the store for a given caller.
  pub fn owner_filter(self, caller: Uuid) -> Option<Uuid> {
    match self {
      Self::ScopedByOwner => Some(caller),
      Self::Unscoped => None,
    }
  }
}

/// The access policy for each owner-facing ledger operation.
///
/// The default reproduces the long-standing behaviour: reads and deletes are
/// scoped to the owner while updates are not. Flip `update` to
/// [`AccessPolicy::ScopedByOwner`] to close that gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerPolicy {
  pub get:    AccessPolicy,
  pub list:   AccessPolicy,
  pub update: AccessPolicy,
  pub delete: AccessPolicy,
}

impl Default for LedgerPolicy {
  fn default() -> Self {
    Self {
      get:    AccessPolicy::ScopedByOwner,
      list:   AccessPolicy::ScopedByOwner,
      update: AccessPolicy::Unscoped,
      delete: AccessPolicy::ScopedByOwner,
    }
  }
}

impl LedgerPolicy {
  /// Every operation scoped to the owner.
  pub fn strict() -> Self {
    Self {
      update: AccessPolicy::ScopedByOwner,
      ..Self::default()
    }
  }
}

/// Who may use the admin view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAccess {
  /// Any valid session; "admin" names an endpoint category, not a role.
  #[default]
  AnySession,
  /// Only identities carrying the `is_admin` capability flag.
  RequireCapability,
}
