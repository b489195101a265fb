//! Session issuance and resolution.
//!
//! A session is created exactly once, when an anonymous client registers.
//! Every later request presents the credential it was handed and is resolved
//! back to the identity it is bound to.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use tracing::{debug, info};

use crate::{
  Error, Result,
  identity::{Credential, Identity, NewIdentity, Session},
  store::DietStore,
};

pub struct SessionIssuer<S> {
  store: Arc<S>,
  /// Credentials older than this are rejected. `None` means no expiry.
  ttl:   Option<TimeDelta>,
}

impl<S> Clone for SessionIssuer<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      ttl:   self.ttl,
    }
  }
}

impl<S: DietStore> SessionIssuer<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store, ttl: None } }

  pub fn with_ttl(mut self, ttl: Option<TimeDelta>) -> Self {
    self.ttl = ttl;
    self
  }

  /// Return the caller's session, creating an identity and minting a
  /// credential if `presented` does not resolve.
  ///
  /// A presented credential that resolves short-circuits: no new identity
  /// is created and [`Session::credential`] is `None`.
  pub async fn ensure_session(
    &self,
    presented: Option<&Credential>,
    input: NewIdentity,
  ) -> Result<Session> {
    if let Some(credential) = presented {
      match self.resolve(credential).await {
        Ok(identity) => {
          debug!(user_id = %identity.id, "session already established");
          return Ok(Session { identity, credential: None });
        }
        Err(Error::Unauthenticated) => {}
        Err(e) => return Err(e),
      }
    }

    let identity   = input.into_identity();
    let credential = Credential::generate();

    self
      .store
      .create_identity(identity.clone(), credential.digest(), Utc::now())
      .await
      .map_err(Error::store)?;

    info!(user_id = %identity.id, "issued new session");
    Ok(Session { identity, credential: Some(credential) })
  }

  /// Resolve a credential to its identity.
  pub async fn resolve(&self, credential: &Credential) -> Result<Identity> {
    let record = self
      .store
      .find_session(credential.digest())
      .await
      .map_err(Error::store)?
      .ok_or(Error::Unauthenticated)?;

    if let Some(ttl) = self.ttl
      && let Some(expires_at) = record.issued_at.checked_add_signed(ttl)
      && expires_at <= Utc::now()
    {
      debug!(user_id = %record.identity.id, "session expired");
      return Err(Error::Unauthenticated);
    }

    Ok(record.identity)
  }

  /// Like [`Self::resolve`], treating a missing credential as
  /// [`Error::Unauthenticated`].
  pub async fn require(&self, presented: Option<&Credential>) -> Result<Identity> {
    match presented {
      Some(credential) => self.resolve(credential).await,
      None => Err(Error::Unauthenticated),
    }
  }
}
