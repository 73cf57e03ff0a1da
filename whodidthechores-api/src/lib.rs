//! # Who Did The Chores API Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `error`: Domain error to HTTP response mapping
//! - `routes`: Route handlers

pub mod app;
pub mod error;
pub mod routes;
