//! Core types, access policies and services for the diet tracker.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`store::DietStore`]; the services in [`session`], [`ledger`],
//! [`metrics`] and [`admin`] are written against that trait.

// Native `async fn` in traits; the store trait spells out `Send` futures
// explicitly where it matters.
#![allow(async_fn_in_trait)]

pub mod admin;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod meal;
pub mod metrics;
pub mod policy;
pub mod session;
pub mod store;

pub use error::{Error, Result};

#[cfg(test)]
mod memory;
