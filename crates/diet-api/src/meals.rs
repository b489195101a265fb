//! Handlers for `/meals` endpoints. Every route requires a session cookie.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/meals` | Body: [`CreateMealBody`]; 201, no body |
//! | `GET`    | `/meals` | `{"meals":[…]}`; 404 when the caller has none |
//! | `GET`    | `/meals/metrics` | Adherence counts; zeros when the caller has no meals |
//! | `GET`    | `/meals/{id}` | `{"meal":{…}}` |
//! | `PUT`    | `/meals/{id}` | Body: [`UpdateMealBody`]; 204 |
//! | `DELETE` | `/meals/{id}` | 204 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::{DateTime, Utc};
use diet_core::{
  meal::{MealUpdate, NewMeal, Patch},
  metrics::DietMetrics,
  store::DietStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::CurrentUser};

// ─── Dates ────────────────────────────────────────────────────────────────────

/// A client-supplied instant: RFC 3339 text or milliseconds since the epoch.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DateInput {
  Millis(i64),
  Text(DateTime<Utc>),
}

impl DateInput {
  pub fn into_datetime(self) -> Result<DateTime<Utc>, ApiError> {
    match self {
      Self::Text(dt) => Ok(dt),
      Self::Millis(ms) => DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| ApiError::BadRequest(format!("date out of range: {ms}"))),
    }
  }
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /meals`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealBody {
  pub name:        String,
  pub description: String,
  pub is_on_diet:  bool,
  /// Accepted for client compatibility but ignored; the server stamps the
  /// creation time.
  #[serde(default)]
  pub date:        Option<DateInput>,
}

impl From<CreateMealBody> for NewMeal {
  fn from(b: CreateMealBody) -> Self {
    NewMeal {
      name:        b.name,
      description: b.description,
      is_on_diet:  b.is_on_diet,
    }
  }
}

/// `POST /meals`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
  Json(body): Json<CreateMealBody>,
) -> Result<StatusCode, ApiError>
where
  S: DietStore + 'static,
{
  state.ledger.create(caller.id, NewMeal::from(body)).await?;
  Ok(StatusCode::CREATED)
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /meals`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: DietStore + 'static,
{
  let meals = state.ledger.list(caller.id).await?;
  Ok(Json(json!({ "meals": meals })))
}

/// `GET /meals/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: DietStore + 'static,
{
  let meal = state.ledger.get(caller.id, id).await?;
  Ok(Json(json!({ "meal": meal })))
}

/// `GET /meals/metrics`
pub async fn metrics<S>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
) -> Result<Json<DietMetrics>, ApiError>
where
  S: DietStore + 'static,
{
  Ok(Json(state.metrics.compute(caller.id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /meals/{id}`. `date` is required; omitted
/// fields keep their stored value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealBody {
  #[serde(default)]
  pub name:        Patch<String>,
  #[serde(default)]
  pub description: Patch<String>,
  #[serde(default)]
  pub is_on_diet:  Patch<bool>,
  pub date:        DateInput,
}

impl TryFrom<UpdateMealBody> for MealUpdate {
  type Error = ApiError;

  fn try_from(b: UpdateMealBody) -> Result<Self, ApiError> {
    Ok(MealUpdate {
      name:        b.name,
      description: b.description,
      is_on_diet:  b.is_on_diet,
      date:        b.date.into_datetime()?,
    })
  }
}

/// `PUT /meals/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateMealBody>,
) -> Result<StatusCode, ApiError>
where
  S: DietStore + 'static,
{
  let update = MealUpdate::try_from(body)?;
  state.ledger.update(caller.id, id, update).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /meals/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DietStore + 'static,
{
  state.ledger.delete(caller.id, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
