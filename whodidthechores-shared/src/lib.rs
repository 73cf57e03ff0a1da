//! # Who Did The Chores: shared library
//!
//! Domain persistence and session layer for the household chore tracker.
//!
//! ## Module Organization
//!
//! - `config`: Layered configuration (files, `WDTC_*` environment, defaults)
//! - `db`: Connection pool and embedded migrations
//! - `error`: Domain error taxonomy and field-level validation errors
//! - `classify`: Storage constraint violation → domain error mapping
//! - `models`: Chore, user, task and session records with their SQL
//! - `repository`: Transactional gateway over the models
//! - `validation`: Raw form input → normalized parameters
//! - `auth`: Password hashing, sessions and the session cookie
//! - `report`: Chore × user effort matrix

pub mod auth;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod report;
pub mod repository;
pub mod validation;

pub use error::{DomainError, DomainResult, FieldError, ValidationErrors};
pub use repository::Repository;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
