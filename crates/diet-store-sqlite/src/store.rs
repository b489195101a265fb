//! [`SqliteStore`]: the SQLite implementation of [`DietStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use diet_core::{
  identity::{Identity, SessionRecord},
  meal::{Meal, MealQuery, MealUpdate},
  store::DietStore,
};

use crate::{
  Result,
  encode::{RawMeal, RawSession, encode_dt, encode_millis, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A diet tracker store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── DietStore impl ──────────────────────────────────────────────────────────

impl DietStore for SqliteStore {
  type Error = crate::Error;

  // ── Identities and sessions ───────────────────────────────────────────────

  async fn create_identity(
    &self,
    identity:          Identity,
    credential_digest: String,
    issued_at:         DateTime<Utc>,
  ) -> Result<()> {
    let id_str         = encode_uuid(identity.id);
    let created_at_str = encode_dt(identity.created_at);
    let issued_at_str  = encode_dt(issued_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO users (id, name, email, is_admin, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            id_str,
            identity.name,
            identity.email,
            identity.is_admin,
            created_at_str,
          ],
        )?;
        tx.execute(
          "INSERT INTO sessions (credential_digest, user_id, issued_at)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![credential_digest, id_str, issued_at_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn find_session(&self, credential_digest: String) -> Result<Option<SessionRecord>> {
    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT u.id, u.name, u.email, u.is_admin, u.created_at, s.issued_at
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.credential_digest = ?1",
            rusqlite::params![credential_digest],
            |row| {
              Ok(RawSession {
                user_id:    row.get(0)?,
                name:       row.get(1)?,
                email:      row.get(2)?,
                is_admin:   row.get(3)?,
                created_at: row.get(4)?,
                issued_at:  row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSession::into_record).transpose()
  }

  async fn set_admin(&self, user_id: Uuid, is_admin: bool) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET is_admin = ?2 WHERE id = ?1",
          rusqlite::params![id_str, is_admin],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Meals ─────────────────────────────────────────────────────────────────

  async fn insert_meal(&self, meal: Meal) -> Result<()> {
    let id_str      = encode_uuid(meal.id);
    let user_id_str = encode_uuid(meal.user_id);
    let date_ms     = encode_millis(meal.date);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO meals (id, name, description, is_on_diet, user_id, date)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            meal.name,
            meal.description,
            meal.is_on_diet,
            user_id_str,
            date_ms,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn find_meal(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Meal>> {
    let id_str    = encode_uuid(id);
    let owner_str = owner.map(encode_uuid);

    let raw: Option<RawMeal> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM meals
           WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)",
          RawMeal::COLUMNS
        );
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str, owner_str], RawMeal::from_row)
          .optional()?)
      })
      .await?;

    raw.map(RawMeal::into_meal).transpose()
  }

  async fn update_meal(
    &self,
    id:     Uuid,
    owner:  Option<Uuid>,
    update: MealUpdate,
  ) -> Result<bool> {
    let id_str      = encode_uuid(id);
    let owner_str   = owner.map(encode_uuid);
    let name        = update.name.into_option();
    let description = update.description.into_option();
    let is_on_diet  = update.is_on_diet.into_option();
    let date_ms     = encode_millis(update.date);

    // Match and write in a single statement; unset columns keep their value.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE meals SET
             name        = COALESCE(?3, name),
             description = COALESCE(?4, description),
             is_on_diet  = COALESCE(?5, is_on_diet),
             date        = ?6
           WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)",
          rusqlite::params![id_str, owner_str, name, description, is_on_diet, date_ms],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_meal(&self, id: Uuid, owner: Option<Uuid>) -> Result<bool> {
    let id_str    = encode_uuid(id);
    let owner_str = owner.map(encode_uuid);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM meals WHERE id = ?1 AND (?2 IS NULL OR user_id = ?2)",
          rusqlite::params![id_str, owner_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn list_meals(&self, query: MealQuery) -> Result<Vec<Meal>> {
    let owner_str = query.owner.map(encode_uuid);
    let order     = if query.newest_first { "date DESC, rowid DESC" } else { "rowid" };

    let raws: Vec<RawMeal> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM meals
           WHERE ?1 IS NULL OR user_id = ?1
           ORDER BY {order}",
          RawMeal::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], RawMeal::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMeal::into_meal).collect()
  }
}
