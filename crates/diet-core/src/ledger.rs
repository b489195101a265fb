//! The meal ledger: owner-facing CRUD over meal records.
//!
//! Each operation resolves its owner filter through the configured
//! [`LedgerPolicy`]. Absent and owned-by-someone-else are indistinguishable
//! to the caller; both surface as [`Error::MealNotFound`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  meal::{Meal, MealQuery, MealUpdate, NewMeal},
  policy::LedgerPolicy,
  store::DietStore,
};

pub struct MealLedger<S> {
  store:  Arc<S>,
  policy: LedgerPolicy,
}

impl<S> Clone for MealLedger<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      policy: self.policy,
    }
  }
}

impl<S: DietStore> MealLedger<S> {
  pub fn new(store: Arc<S>, policy: LedgerPolicy) -> Self { Self { store, policy } }

  pub fn policy(&self) -> LedgerPolicy { self.policy }

  /// Record a meal for `owner`, stamped with the current time.
  pub async fn create(&self, owner: Uuid, input: NewMeal) -> Result<Meal> {
    let meal = Meal {
      id:          Uuid::new_v4(),
      name:        input.name,
      description: input.description,
      is_on_diet:  input.is_on_diet,
      user_id:     owner,
      date:        now_millis(),
    };

    self.store.insert_meal(meal.clone()).await.map_err(Error::store)?;
    info!(meal_id = %meal.id, user_id = %owner, "meal created");
    Ok(meal)
  }

  /// Fetch one meal visible to `caller`.
  pub async fn get(&self, caller: Uuid, id: Uuid) -> Result<Meal> {
    self
      .store
      .find_meal(id, self.policy.get.owner_filter(caller))
      .await
      .map_err(Error::store)?
      .ok_or(Error::MealNotFound(id))
  }

  /// All meals visible to `caller`. An empty result is an error.
  pub async fn list(&self, caller: Uuid) -> Result<Vec<Meal>> {
    let meals = self
      .store
      .list_meals(MealQuery {
        owner:        self.policy.list.owner_filter(caller),
        newest_first: false,
      })
      .await
      .map_err(Error::store)?;

    if meals.is_empty() {
      debug!(user_id = %caller, "no meals to list");
      return Err(Error::NoMeals(caller));
    }
    Ok(meals)
  }

  /// Apply a partial update under the update policy.
  pub async fn update(&self, caller: Uuid, id: Uuid, update: MealUpdate) -> Result<()> {
    let owner = self.policy.update.owner_filter(caller);
    let found = self
      .store
      .update_meal(id, owner, update)
      .await
      .map_err(Error::store)?;

    if !found {
      return Err(Error::MealNotFound(id));
    }
    info!(meal_id = %id, user_id = %caller, "meal updated");
    Ok(())
  }

  /// Permanently remove a meal under the delete policy.
  pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<()> {
    let owner = self.policy.delete.owner_filter(caller);
    let found = self.store.delete_meal(id, owner).await.map_err(Error::store)?;

    if !found {
      return Err(Error::MealNotFound(id));
    }
    info!(meal_id = %id, user_id = %caller, "meal deleted");
    Ok(())
  }
}

/// The current time truncated to the millisecond precision meals are
/// stored with.
fn now_millis() -> DateTime<Utc> {
  let now = Utc::now();
  DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
