//! The `DietStore` trait: predicate-qualified CRUD over identities, sessions
//! and meals.
//!
//! Implemented by storage backends (e.g. `diet-store-sqlite`). The services
//! in this crate depend on the abstraction, never on a concrete backend.
//!
//! Owner filters are passed as `Option<Uuid>`: `Some(owner)` restricts the
//! operation to that owner's meals, `None` applies no ownership predicate.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  identity::{Identity, SessionRecord},
  meal::{Meal, MealQuery, MealUpdate},
};

/// Abstraction over a diet tracker storage backend.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait DietStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Identities and sessions ───────────────────────────────────────────

  /// Persist a new identity together with its session binding.
  ///
  /// Both records are written atomically; an identity never exists without
  /// its credential.
  fn create_identity(
    &self,
    identity: Identity,
    credential_digest: String,
    issued_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Look up the session bound to a credential digest.
  fn find_session(
    &self,
    credential_digest: String,
  ) -> impl Future<Output = Result<Option<SessionRecord>, Self::Error>> + Send + '_;

  /// Set or clear the admin capability. Returns `false` if no such identity.
  fn set_admin(
    &self,
    user_id: Uuid,
    is_admin: bool,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Meals ─────────────────────────────────────────────────────────────

  /// Insert a fully-built meal.
  fn insert_meal(
    &self,
    meal: Meal,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch a meal by id, optionally restricted to an owner.
  fn find_meal(
    &self,
    id: Uuid,
    owner: Option<Uuid>,
  ) -> impl Future<Output = Result<Option<Meal>, Self::Error>> + Send + '_;

  /// Apply `update` to the meal matching `id` (and `owner`, if given).
  ///
  /// Lookup and write happen as one unit. Returns `false` when nothing
  /// matched.
  fn update_meal(
    &self,
    id: Uuid,
    owner: Option<Uuid>,
    update: MealUpdate,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Permanently remove the meal matching `id` (and `owner`, if given).
  /// Returns `false` when nothing matched.
  fn delete_meal(
    &self,
    id: Uuid,
    owner: Option<Uuid>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// List meals matching `query`.
  fn list_meals(
    &self,
    query: MealQuery,
  ) -> impl Future<Output = Result<Vec<Meal>, Self::Error>> + Send + '_;
}
