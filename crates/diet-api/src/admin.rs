//! Handler for `GET /admin/meals`: every meal from every user.

use axum::{Json, extract::State};
use diet_core::store::DietStore;
use serde_json::{Value, json};

use crate::{AppState, error::ApiError, session::CurrentUser};

/// `GET /admin/meals`
pub async fn list_meals<S>(
  State(state): State<AppState<S>>,
  CurrentUser(caller): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: DietStore + 'static,
{
  let meals = state.admin.list_all(&caller).await?;
  Ok(Json(json!({ "meals": meals })))
}
