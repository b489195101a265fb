//! JSON REST API for the diet tracker.
//!
//! Exposes an axum [`Router`] backed by any [`diet_core::store::DietStore`].
//! Sessions travel in the `sessionId` cookie; TLS and listening are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = AppState::new(Arc::new(store), ApiSettings::default());
//! axum::serve(listener, diet_api::api_router(state)).await?;
//! ```

pub mod admin;
pub mod error;
pub mod meals;
pub mod session;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use chrono::TimeDelta;
use diet_core::{
  admin::AdminView,
  ledger::MealLedger,
  metrics::MetricsAggregator,
  policy::{AdminAccess, LedgerPolicy},
  session::SessionIssuer,
  store::DietStore,
};

pub use error::ApiError;
use session::CookieSettings;

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Behavioural knobs for the API, usually filled from server configuration.
#[derive(Debug, Clone, Default)]
pub struct ApiSettings {
  pub policy:        LedgerPolicy,
  pub admin_access:  AdminAccess,
  /// Server-side credential lifetime. `None` means credentials never expire.
  pub session_ttl:   Option<TimeDelta>,
  pub secure_cookie: bool,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub issuer:  SessionIssuer<S>,
  pub ledger:  MealLedger<S>,
  pub metrics: MetricsAggregator<S>,
  pub admin:   AdminView<S>,
  pub cookie:  Arc<CookieSettings>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      issuer:  self.issuer.clone(),
      ledger:  self.ledger.clone(),
      metrics: self.metrics.clone(),
      admin:   self.admin.clone(),
      cookie:  Arc::clone(&self.cookie),
    }
  }
}

impl<S: DietStore> AppState<S> {
  pub fn new(store: Arc<S>, settings: ApiSettings) -> Self {
    let cookie = CookieSettings {
      max_age_secs: settings
        .session_ttl
        .map(|ttl| ttl.num_seconds())
        .unwrap_or(session::DEFAULT_COOKIE_MAX_AGE_SECS),
      secure:       settings.secure_cookie,
    };

    Self {
      issuer:  SessionIssuer::new(store.clone()).with_ttl(settings.session_ttl),
      ledger:  MealLedger::new(store.clone(), settings.policy),
      metrics: MetricsAggregator::new(store.clone()),
      admin:   AdminView::new(store, settings.admin_access),
      cookie:  Arc::new(cookie),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be served directly or nested into a parent
/// router regardless of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: DietStore + 'static,
{
  Router::new()
    // Users
    .route("/users", post(users::create::<S>))
    .route("/users/me", get(users::me))
    // Meals
    .route("/meals", get(meals::list::<S>).post(meals::create::<S>))
    .route("/meals/metrics", get(meals::metrics::<S>))
    .route(
      "/meals/{id}",
      get(meals::get_one::<S>)
        .put(meals::update::<S>)
        .delete(meals::delete_one::<S>),
    )
    // Admin
    .route("/admin/meals", get(admin::list_meals::<S>))
    .with_state(state)
}
