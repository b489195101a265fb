//! Dietary-adherence metrics over one identity's meals.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  meal::{Meal, MealQuery},
  store::DietStore,
};

/// Counts derived from an identity's current meal set. Never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietMetrics {
  pub total_meals:          usize,
  pub total_meals_on_diet:  usize,
  pub total_meals_off_diet: usize,
  /// Longest run of consecutive on-diet meals in date order.
  pub best_on_diet_streak:  usize,
}

impl DietMetrics {
  /// Tally a date-ordered sequence of meals.
  pub fn tally<'a>(meals: impl IntoIterator<Item = &'a Meal>) -> Self {
    let mut metrics = Self::default();
    let mut streak  = 0;

    for meal in meals {
      metrics.total_meals += 1;
      if meal.is_on_diet {
        metrics.total_meals_on_diet += 1;
        streak += 1;
        metrics.best_on_diet_streak = metrics.best_on_diet_streak.max(streak);
      } else {
        metrics.total_meals_off_diet += 1;
        streak = 0;
      }
    }

    metrics
  }
}

pub struct MetricsAggregator<S> {
  store: Arc<S>,
}

impl<S> Clone for MetricsAggregator<S> {
  fn clone(&self) -> Self { Self { store: Arc::clone(&self.store) } }
}

impl<S: DietStore> MetricsAggregator<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  /// Compute metrics over every meal `owner` currently has. An identity with
  /// no meals gets all-zero metrics.
  pub async fn compute(&self, owner: Uuid) -> Result<DietMetrics> {
    let meals = self
      .store
      .list_meals(MealQuery {
        owner:        Some(owner),
        newest_first: true,
      })
      .await
      .map_err(Error::store)?;

    Ok(DietMetrics::tally(&meals))
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::{ledger::MealLedger, meal::NewMeal, memory::MemoryStore, policy::LedgerPolicy};

  fn meal(is_on_diet: bool, millis: i64) -> Meal {
    Meal {
      id:          Uuid::new_v4(),
      name:        "Meal".into(),
      description: String::new(),
      is_on_diet,
      user_id:     Uuid::nil(),
      date:        Utc.timestamp_millis_opt(millis).unwrap(),
    }
  }

  #[test]
  fn tally_counts_and_streaks() {
    let meals = [
      meal(true, 6),
      meal(true, 5),
      meal(false, 4),
      meal(true, 3),
      meal(true, 2),
      meal(true, 1),
    ];
    let metrics = DietMetrics::tally(&meals);
    assert_eq!(metrics, DietMetrics {
      total_meals:          6,
      total_meals_on_diet:  5,
      total_meals_off_diet: 1,
      best_on_diet_streak:  3,
    });
  }

  #[test]
  fn tally_of_nothing_is_zero() {
    assert_eq!(DietMetrics::tally(&Vec::<Meal>::new()), DietMetrics::default());
  }

  #[test]
  fn serialises_camel_case() {
    let json = serde_json::to_value(DietMetrics::default()).unwrap();
    assert_eq!(json["totalMeals"], 0);
    assert_eq!(json["totalMealsOnDiet"], 0);
    assert_eq!(json["totalMealsOffDiet"], 0);
  }

  #[tokio::test]
  async fn compute_only_counts_the_owners_meals() {
    let store   = Arc::new(MemoryStore::default());
    let ledger  = MealLedger::new(store.clone(), LedgerPolicy::default());
    let metrics = MetricsAggregator::new(store);
    let alice   = Uuid::new_v4();
    let bob     = Uuid::new_v4();

    for (owner, on_diet) in [(alice, true), (alice, false), (bob, true)] {
      ledger
        .create(owner, NewMeal {
          name:        "Meal".into(),
          description: String::new(),
          is_on_diet:  on_diet,
        })
        .await
        .unwrap();
    }

    let m = metrics.compute(alice).await.unwrap();
    assert_eq!(m.total_meals, 2);
    assert_eq!(m.total_meals_on_diet, 1);
    assert_eq!(m.total_meals_off_diet, 1);

    let nobody = metrics.compute(Uuid::new_v4()).await.unwrap();
    assert_eq!(nobody, DietMetrics::default());
  }
}
