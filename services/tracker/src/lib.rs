//! Tracker service: the attendance reconciliation core
//!
//! Owns the one-fact-per-(user, date) response store, the read-side
//! aggregations, and the user/location reference data, exposed over a JSON
//! API.

pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod schema;
pub mod state;
pub mod validation;
