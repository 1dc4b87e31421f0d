//! Plek booking backend.
//!
//! REST API for property listings ("posts"), pricing packages, availability
//! checks, bookings, and price estimates. The crate is layered: `http`
//! handlers call `services`, services call the repository traits in `db`,
//! and `models` holds the shared domain types.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod services;
