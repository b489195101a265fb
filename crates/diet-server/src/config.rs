//! Runtime server configuration, deserialised from `config.toml` and
//! `DIET_*` environment variables.

use std::path::PathBuf;

use chrono::TimeDelta;
use diet_api::ApiSettings;
use diet_core::policy::{AccessPolicy, AdminAccess, LedgerPolicy};
use serde::Deserialize;

// ─── Configuration ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub store_path:       PathBuf,
  /// Credential lifetime in seconds; absent means credentials never expire.
  pub session_ttl_secs: Option<u64>,
  pub cookie_secure:    bool,
  pub get_policy:       AccessPolicy,
  pub list_policy:      AccessPolicy,
  pub update_policy:    AccessPolicy,
  pub delete_policy:    AccessPolicy,
  pub admin_access:     AdminAccess,
}

impl Default for ServerConfig {
  fn default() -> Self {
    let policy = LedgerPolicy::default();
    Self {
      host:             "127.0.0.1".to_string(),
      port:             3333,
      store_path:       PathBuf::from("~/.local/share/diet/diet.db"),
      session_ttl_secs: None,
      cookie_secure:    false,
      get_policy:       policy.get,
      list_policy:      policy.list,
      update_policy:    policy.update,
      delete_policy:    policy.delete,
      admin_access:     AdminAccess::default(),
    }
  }
}

impl ServerConfig {
  pub fn ledger_policy(&self) -> LedgerPolicy {
    LedgerPolicy {
      get:    self.get_policy,
      list:   self.list_policy,
      update: self.update_policy,
      delete: self.delete_policy,
    }
  }

  /// `None` when no TTL is configured or it does not fit a [`TimeDelta`].
  pub fn session_ttl(&self) -> Option<TimeDelta> {
    self
      .session_ttl_secs
      .and_then(|secs| i64::try_from(secs).ok())
      .and_then(TimeDelta::try_seconds)
  }

  pub fn api_settings(&self) -> ApiSettings {
    ApiSettings {
      policy:        self.ledger_policy(),
      admin_access:  self.admin_access,
      session_ttl:   self.session_ttl(),
      secure_cookie: self.cookie_secure,
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}
