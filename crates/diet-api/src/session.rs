//! Cookie transport for session credentials and the [`CurrentUser`]
//! extractor.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use diet_core::{
  identity::{Credential, Identity},
  store::DietStore,
};

use crate::{AppState, error::ApiError};

/// Name of the cookie carrying the credential.
pub const SESSION_COOKIE: &str = "sessionId";

/// Lifetime advertised to the client when no server-side TTL is set.
pub const DEFAULT_COOKIE_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

/// Attributes for the `Set-Cookie` header that hands out a credential.
#[derive(Debug, Clone)]
pub struct CookieSettings {
  pub max_age_secs: i64,
  /// Add the `Secure` attribute (HTTPS deployments).
  pub secure:       bool,
}

impl Default for CookieSettings {
  fn default() -> Self {
    Self {
      max_age_secs: DEFAULT_COOKIE_MAX_AGE_SECS,
      secure:       false,
    }
  }
}

impl CookieSettings {
  /// Render the `Set-Cookie` value for a freshly minted credential.
  pub fn issue(&self, credential: &Credential) -> String {
    let secure = if self.secure { "; Secure" } else { "" };
    format!(
      "{SESSION_COOKIE}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax{secure}",
      credential.as_str(),
      self.max_age_secs,
    )
  }
}

/// Find the session credential among the request's `Cookie` headers.
pub fn credential_from_headers(headers: &HeaderMap) -> Option<Credential> {
  headers
    .get_all(header::COOKIE)
    .iter()
    .filter_map(|v| v.to_str().ok())
    .flat_map(|v| v.split(';'))
    .filter_map(|pair| pair.trim().split_once('='))
    .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
    .map(|(_, value)| Credential::from_presented(value))
}

/// The identity behind the request's session cookie.
///
/// Rejects with [`ApiError::Unauthenticated`] before any later extractor
/// (including the body) runs.
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: DietStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let presented = credential_from_headers(&parts.headers);
    if presented.is_none() {
      tracing::debug!("request without session cookie");
    }
    let identity = state.issuer.require(presented.as_ref()).await.inspect_err(|_| {
      if presented.is_some() {
        tracing::warn!("rejected session credential");
      }
    })?;
    Ok(CurrentUser(identity))
  }
}
