//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/users` | Body: `{"name":"…","email":"…"}`; 201 + `Set-Cookie` for a new session, 200 if the cookie is already valid |
//! | `GET`  | `/users/me` | The identity behind the session cookie |

use axum::{
  Json,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
};
use diet_core::{identity::NewIdentity, store::DietStore};
use serde_json::json;

use crate::{
  AppState,
  error::ApiError,
  session::{CurrentUser, credential_from_headers},
};

/// `POST /users`: register, or confirm an existing session.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
  Json(body): Json<NewIdentity>,
) -> Result<Response, ApiError>
where
  S: DietStore + 'static,
{
  let presented = credential_from_headers(&headers);
  let session = state.issuer.ensure_session(presented.as_ref(), body).await?;
  let payload = Json(json!({ "user": session.identity }));

  Ok(match &session.credential {
    Some(credential) => (
      StatusCode::CREATED,
      [(header::SET_COOKIE, state.cookie.issue(credential))],
      payload,
    )
      .into_response(),
    None => (StatusCode::OK, payload).into_response(),
  })
}

/// `GET /users/me`
pub async fn me(CurrentUser(identity): CurrentUser) -> impl IntoResponse {
  Json(json!({ "user": identity }))
}
