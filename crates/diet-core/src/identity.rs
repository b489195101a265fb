//! Identities and the opaque session credentials bound to them.

use std::fmt;

use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Number of random bytes behind a credential (hex-encoded on the wire).
const CREDENTIAL_BYTES: usize = 32;

// ─── Identity ────────────────────────────────────────────────────────────────

/// A registered user. Never updated or deleted once created, apart from the
/// operator-controlled admin capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub id:         Uuid,
  pub name:       String,
  /// Not unique; two identities may share an address.
  pub email:      String,
  #[serde(default)]
  pub is_admin:   bool,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::session::SessionIssuer::ensure_session`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewIdentity {
  pub name:  String,
  pub email: String,
}

impl NewIdentity {
  /// Build the persisted record with a fresh id and creation time.
  pub fn into_identity(self) -> Identity {
    Identity {
      id:         Uuid::new_v4(),
      name:       self.name,
      email:      self.email,
      is_admin:   false,
      created_at: Utc::now(),
    }
  }
}

// ─── Credential ──────────────────────────────────────────────────────────────

/// An opaque bearer token held by the client.
///
/// Only [`Credential::digest`] is ever persisted; the plaintext leaves the
/// server exactly once, in the response that issues it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
  /// Mint a new unpredictable credential from the OS RNG.
  pub fn generate() -> Self {
    let mut bytes = [0u8; CREDENTIAL_BYTES];
    OsRng.fill_bytes(&mut bytes);
    Self(hex::encode(bytes))
  }

  /// Wrap a credential value presented by a client.
  pub fn from_presented(value: impl Into<String>) -> Self { Self(value.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  /// SHA-256 hex digest used as the session lookup key.
  pub fn digest(&self) -> String { hex::encode(Sha256::digest(self.0.as_bytes())) }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Credential(..)")
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A persisted session binding, as returned by the store.
#[derive(Debug, Clone)]
pub struct SessionRecord {
  pub identity:  Identity,
  pub issued_at: DateTime<Utc>,
}

/// Outcome of [`crate::session::SessionIssuer::ensure_session`].
#[derive(Debug, Clone)]
pub struct Session {
  pub identity:   Identity,
  /// `Some` only when a new credential was minted by this call.
  pub credential: Option<Credential>,
}

impl Session {
  pub fn is_new(&self) -> bool { self.credential.is_some() }
}
