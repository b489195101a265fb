//! Meal records and the inputs that create and modify them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

// ─── Meal ────────────────────────────────────────────────────────────────────

/// A single recorded meal, owned by exactly one identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
  pub id:          Uuid,
  pub name:        String,
  pub description: String,
  pub is_on_diet:  bool,
  /// Owner; fixed at creation.
  pub user_id:     Uuid,
  /// When the meal was eaten. Serialised as milliseconds since the epoch.
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub date:        DateTime<Utc>,
}

/// Input to [`crate::ledger::MealLedger::create`]. The owner and `date` are
/// always assigned by the ledger, never taken from the caller.
#[derive(Debug, Clone)]
pub struct NewMeal {
  pub name:        String,
  pub description: String,
  pub is_on_diet:  bool,
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// A field in a partial update: either left alone or replaced.
///
/// Deserialises from the bare value; combine with `#[serde(default)]` so an
/// absent key becomes [`Patch::Unchanged`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
  #[default]
  Unchanged,
  Set(T),
}

impl<T> Patch<T> {
  pub fn into_option(self) -> Option<T> {
    match self {
      Self::Unchanged => None,
      Self::Set(v) => Some(v),
    }
  }

  pub fn apply(self, target: &mut T) {
    if let Self::Set(v) = self {
      *target = v;
    }
  }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
  T: Deserialize<'de>,
{
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    T::deserialize(deserializer).map(Self::Set)
  }
}

/// Input to [`crate::ledger::MealLedger::update`]. `date` is mandatory; the
/// remaining fields are patches.
#[derive(Debug, Clone)]
pub struct MealUpdate {
  pub name:        Patch<String>,
  pub description: Patch<String>,
  pub is_on_diet:  Patch<bool>,
  pub date:        DateTime<Utc>,
}

impl MealUpdate {
  /// Apply this update to an in-memory meal.
  pub fn apply_to(self, meal: &mut Meal) {
    self.name.apply(&mut meal.name);
    self.description.apply(&mut meal.description);
    self.is_on_diet.apply(&mut meal.is_on_diet);
    meal.date = self.date;
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::DietStore::list_meals`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MealQuery {
  /// Restrict to meals owned by this identity; `None` lists every meal.
  pub owner:        Option<Uuid>,
  /// Order by `date`, most recent first. Otherwise store order.
  pub newest_first: bool,
}
