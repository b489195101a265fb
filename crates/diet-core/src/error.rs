//! Error types for `diet-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// No credential was presented, or it matched no live session.
  #[error("unauthenticated")]
  Unauthenticated,

  /// The caller holds a valid session but lacks the required capability.
  #[error("forbidden")]
  Forbidden,

  #[error("meal not found: {0}")]
  MealNotFound(Uuid),

  /// The caller owns no meals at all.
  #[error("no meals recorded for user {0}")]
  NoMeals(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  /// Whether this is one of the "record absent" variants.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::MealNotFound(_) | Self::NoMeals(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
