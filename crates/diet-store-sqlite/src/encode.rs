//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Creation timestamps are RFC 3339 strings; meal dates are integer
//! milliseconds. UUIDs are hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use diet_core::{
  identity::{Identity, SessionRecord},
  meal::Meal,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_millis(dt: DateTime<Utc>) -> i64 { dt.timestamp_millis() }

pub fn decode_millis(ms: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp_millis(ms)
    .ok_or_else(|| Error::DateParse(format!("timestamp out of range: {ms}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `meals` row.
pub struct RawMeal {
  pub id:          String,
  pub name:        String,
  pub description: String,
  pub is_on_diet:  bool,
  pub user_id:     String,
  pub date:        i64,
}

impl RawMeal {
  /// Column order expected by [`RawMeal::from_row`].
  pub const COLUMNS: &'static str = "id, name, description, is_on_diet, user_id, date";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      is_on_diet:  row.get(3)?,
      user_id:     row.get(4)?,
      date:        row.get(5)?,
    })
  }

  pub fn into_meal(self) -> Result<Meal> {
    Ok(Meal {
      id:          decode_uuid(&self.id)?,
      name:        self.name,
      description: self.description,
      is_on_diet:  self.is_on_diet,
      user_id:     decode_uuid(&self.user_id)?,
      date:        decode_millis(self.date)?,
    })
  }
}

/// Raw values from a `sessions` row joined with its `users` row.
pub struct RawSession {
  pub user_id:    String,
  pub name:       String,
  pub email:      String,
  pub is_admin:   bool,
  pub created_at: String,
  pub issued_at:  String,
}

impl RawSession {
  pub fn into_record(self) -> Result<SessionRecord> {
    Ok(SessionRecord {
      identity:  Identity {
        id:         decode_uuid(&self.user_id)?,
        name:       self.name,
        email:      self.email,
        is_admin:   self.is_admin,
        created_at: decode_dt(&self.created_at)?,
      },
      issued_at: decode_dt(&self.issued_at)?,
    })
  }
}
