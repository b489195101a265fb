//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use diet_core::{
  identity::{Credential, Identity, NewIdentity},
  meal::{Meal, MealQuery, MealUpdate, Patch},
  store::DietStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn at(millis: i64) -> DateTime<Utc> { Utc.timestamp_millis_opt(millis).unwrap() }

async fn register(s: &SqliteStore, name: &str) -> (Identity, Credential) {
  let identity = NewIdentity {
    name:  name.into(),
    email: format!("{}@example.com", name.to_lowercase()),
  }
  .into_identity();
  let credential = Credential::generate();
  s.create_identity(identity.clone(), credential.digest(), Utc::now())
    .await
    .unwrap();
  (identity, credential)
}

fn meal(owner: Uuid, name: &str, is_on_diet: bool, millis: i64) -> Meal {
  Meal {
    id: Uuid::new_v4(),
    name: name.into(),
    description: format!("{name} description"),
    is_on_diet,
    user_id: owner,
    date: at(millis),
  }
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_resolves_to_identity() {
  let s = store().await;
  let (identity, credential) = register(&s, "Alice").await;

  let record = s.find_session(credential.digest()).await.unwrap().unwrap();
  assert_eq!(record.identity.id, identity.id);
  assert_eq!(record.identity.name, "Alice");
  assert_eq!(record.identity.email, "alice@example.com");
  assert!(!record.identity.is_admin);
}

#[tokio::test]
async fn unknown_digest_has_no_session() {
  let s = store().await;
  register(&s, "Alice").await;
  let other = Credential::generate();
  assert!(s.find_session(other.digest()).await.unwrap().is_none());
}

#[tokio::test]
async fn issued_at_round_trips() {
  let s = store().await;
  let identity = NewIdentity { name: "Old".into(), email: "old@example.com".into() }
    .into_identity();
  let credential = Credential::generate();
  let issued_at  = Utc::now() - TimeDelta::days(30);
  s.create_identity(identity, credential.digest(), issued_at)
    .await
    .unwrap();

  let record = s.find_session(credential.digest()).await.unwrap().unwrap();
  assert_eq!(record.issued_at.timestamp(), issued_at.timestamp());
}

#[tokio::test]
async fn emails_are_not_unique() {
  let s = store().await;
  register(&s, "Twin").await;
  register(&s, "Twin").await;
}

#[tokio::test]
async fn set_admin_flips_capability() {
  let s = store().await;
  let (identity, credential) = register(&s, "Root").await;

  assert!(s.set_admin(identity.id, true).await.unwrap());
  let record = s.find_session(credential.digest()).await.unwrap().unwrap();
  assert!(record.identity.is_admin);

  assert!(!s.set_admin(Uuid::new_v4(), true).await.unwrap());
}

// ─── Meals ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_find_meal() {
  let s = store().await;
  let (alice, _) = register(&s, "Alice").await;
  let m = meal(alice.id, "Breakfast", true, 1_700_000_000_000);
  s.insert_meal(m.clone()).await.unwrap();

  assert_eq!(s.find_meal(m.id, None).await.unwrap(), Some(m.clone()));
  assert_eq!(s.find_meal(m.id, Some(alice.id)).await.unwrap(), Some(m));
}

#[tokio::test]
async fn owner_filter_hides_other_users_meals() {
  let s = store().await;
  let (alice, _) = register(&s, "Alice").await;
  let (bob, _) = register(&s, "Bob").await;
  let m = meal(alice.id, "Breakfast", true, 1);
  s.insert_meal(m.clone()).await.unwrap();

  assert!(s.find_meal(m.id, Some(bob.id)).await.unwrap().is_none());
  assert!(!s.delete_meal(m.id, Some(bob.id)).await.unwrap());
  let bobs = s
    .list_meals(MealQuery { owner: Some(bob.id), newest_first: false })
    .await
    .unwrap();
  assert!(bobs.is_empty());
}

#[tokio::test]
async fn list_meals_orders_newest_first_on_request() {
  let s = store().await;
  let (alice, _) = register(&s, "Alice").await;
  for (name, ms) in [("b", 2), ("a", 1), ("c", 3)] {
    s.insert_meal(meal(alice.id, name, true, ms)).await.unwrap();
  }

  let names = |meals: Vec<Meal>| meals.into_iter().map(|m| m.name).collect::<Vec<_>>();

  let inserted = s
    .list_meals(MealQuery { owner: Some(alice.id), newest_first: false })
    .await
    .unwrap();
  assert_eq!(names(inserted), ["b", "a", "c"]);

  let newest = s
    .list_meals(MealQuery { owner: Some(alice.id), newest_first: true })
    .await
    .unwrap();
  assert_eq!(names(newest), ["c", "b", "a"]);
}

#[tokio::test]
async fn list_without_owner_returns_everything() {
  let s = store().await;
  let (alice, _) = register(&s, "Alice").await;
  let (bob, _) = register(&s, "Bob").await;
  s.insert_meal(meal(alice.id, "a", true, 1)).await.unwrap();
  s.insert_meal(meal(bob.id, "b", false, 2)).await.unwrap();

  let all = s.list_meals(MealQuery::default()).await.unwrap();
  assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn update_leaves_unset_columns_untouched() {
  let s = store().await;
  let (alice, _) = register(&s, "Alice").await;
  let m = meal(alice.id, "Breakfast", true, 1_000);
  s.insert_meal(m.clone()).await.unwrap();

  let found = s
    .update_meal(m.id, None, MealUpdate {
      name:        Patch::Set("Brunch".into()),
      description: Patch::Unchanged,
      is_on_diet:  Patch::Set(false),
      date:        at(5_000),
    })
    .await
    .unwrap();
  assert!(found);

  let updated = s.find_meal(m.id, None).await.unwrap().unwrap();
  assert_eq!(updated.name, "Brunch");
  assert_eq!(updated.description, m.description);
  assert!(!updated.is_on_diet);
  assert_eq!(updated.date, at(5_000));
  assert_eq!(updated.user_id, alice.id);
}

#[tokio::test]
async fn scoped_update_misses_other_owner() {
  let s = store().await;
  let (alice, _) = register(&s, "Alice").await;
  let (bob, _) = register(&s, "Bob").await;
  let m = meal(alice.id, "Breakfast", true, 1_000);
  s.insert_meal(m.clone()).await.unwrap();

  let found = s
    .update_meal(m.id, Some(bob.id), MealUpdate {
      name:        Patch::Set("Hijacked".into()),
      description: Patch::Unchanged,
      is_on_diet:  Patch::Unchanged,
      date:        at(2_000),
    })
    .await
    .unwrap();
  assert!(!found);
  assert_eq!(s.find_meal(m.id, None).await.unwrap().unwrap().name, "Breakfast");
}

#[tokio::test]
async fn update_of_missing_meal_reports_no_match() {
  let s = store().await;
  let found = s
    .update_meal(Uuid::new_v4(), None, MealUpdate {
      name:        Patch::Unchanged,
      description: Patch::Unchanged,
      is_on_diet:  Patch::Unchanged,
      date:        at(0),
    })
    .await
    .unwrap();
  assert!(!found);
}

#[tokio::test]
async fn delete_removes_permanently() {
  let s = store().await;
  let (alice, _) = register(&s, "Alice").await;
  let m = meal(alice.id, "Dinner", false, 1);
  s.insert_meal(m.clone()).await.unwrap();

  assert!(s.delete_meal(m.id, Some(alice.id)).await.unwrap());
  assert!(!s.delete_meal(m.id, Some(alice.id)).await.unwrap());
  assert!(s.find_meal(m.id, None).await.unwrap().is_none());
}

#[tokio::test]
async fn meal_for_unknown_owner_is_rejected() {
  let s = store().await;
  let orphan = meal(Uuid::new_v4(), "Ghost", true, 1);
  assert!(s.insert_meal(orphan).await.is_err());
}
