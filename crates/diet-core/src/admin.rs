//! Unscoped read access over every meal in the ledger.

use std::sync::Arc;

use tracing::warn;

use crate::{
  Error, Result,
  identity::Identity,
  meal::{Meal, MealQuery},
  policy::AdminAccess,
  store::DietStore,
};

pub struct AdminView<S> {
  store:  Arc<S>,
  access: AdminAccess,
}

impl<S> Clone for AdminView<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      access: self.access,
    }
  }
}

impl<S: DietStore> AdminView<S> {
  pub fn new(store: Arc<S>, access: AdminAccess) -> Self { Self { store, access } }

  /// Every meal from every owner. `caller` must already be resolved.
  pub async fn list_all(&self, caller: &Identity) -> Result<Vec<Meal>> {
    if self.access == AdminAccess::RequireCapability && !caller.is_admin {
      warn!(user_id = %caller.id, "admin view refused");
      return Err(Error::Forbidden);
    }

    self
      .store
      .list_meals(MealQuery::default())
      .await
      .map_err(Error::store)
  }
}
