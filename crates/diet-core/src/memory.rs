//! In-memory `DietStore` for the service tests in this crate.

use std::{collections::HashMap, convert::Infallible, sync::Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  identity::{Identity, SessionRecord},
  meal::{Meal, MealQuery, MealUpdate},
  store::DietStore,
};

#[derive(Default)]
pub struct MemoryStore {
  inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
  identities: HashMap<Uuid, Identity>,
  /// credential digest → (user id, issued at)
  sessions:   HashMap<String, (Uuid, DateTime<Utc>)>,
  /// Insertion order is kept so listings are stable.
  meals:      Vec<Meal>,
}

impl MemoryStore {
  pub fn identity_count(&self) -> usize { self.inner.lock().unwrap().identities.len() }
}

fn visible(meal: &Meal, id: Uuid, owner: Option<Uuid>) -> bool {
  meal.id == id && owner.is_none_or(|o| meal.user_id == o)
}

impl DietStore for MemoryStore {
  type Error = Infallible;

  async fn create_identity(
    &self,
    identity: Identity,
    credential_digest: String,
    issued_at: DateTime<Utc>,
  ) -> Result<(), Infallible> {
    let mut inner = self.inner.lock().unwrap();
    inner.sessions.insert(credential_digest, (identity.id, issued_at));
    inner.identities.insert(identity.id, identity);
    Ok(())
  }

  async fn find_session(
    &self,
    credential_digest: String,
  ) -> Result<Option<SessionRecord>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.sessions.get(&credential_digest).and_then(|(user_id, issued_at)| {
      inner.identities.get(user_id).map(|identity| SessionRecord {
        identity:  identity.clone(),
        issued_at: *issued_at,
      })
    }))
  }

  async fn set_admin(&self, user_id: Uuid, is_admin: bool) -> Result<bool, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    Ok(match inner.identities.get_mut(&user_id) {
      Some(identity) => {
        identity.is_admin = is_admin;
        true
      }
      None => false,
    })
  }

  async fn insert_meal(&self, meal: Meal) -> Result<(), Infallible> {
    self.inner.lock().unwrap().meals.push(meal);
    Ok(())
  }

  async fn find_meal(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Meal>, Infallible> {
    let inner = self.inner.lock().unwrap();
    Ok(inner.meals.iter().find(|m| visible(m, id, owner)).cloned())
  }

  async fn update_meal(
    &self,
    id: Uuid,
    owner: Option<Uuid>,
    update: MealUpdate,
  ) -> Result<bool, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    Ok(match inner.meals.iter_mut().find(|m| visible(m, id, owner)) {
      Some(meal) => {
        update.apply_to(meal);
        true
      }
      None => false,
    })
  }

  async fn delete_meal(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool, Infallible> {
    let mut inner = self.inner.lock().unwrap();
    let before = inner.meals.len();
    inner.meals.retain(|m| !visible(m, id, owner));
    Ok(inner.meals.len() != before)
  }

  async fn list_meals(&self, query: MealQuery) -> Result<Vec<Meal>, Infallible> {
    let inner = self.inner.lock().unwrap();
    let mut meals: Vec<Meal> = inner
      .meals
      .iter()
      .filter(|m| query.owner.is_none_or(|o| m.user_id == o))
      .cloned()
      .collect();
    if query.newest_first {
      meals.sort_by(|a, b| b.date.cmp(&a.date));
    }
    Ok(meals)
  }
}
