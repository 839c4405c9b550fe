//! HTTP front for SportSee user dashboards.
//!
//! `GET /user/{id}` answers the normalized user record and
//! `GET /user/{id}/dashboard` its chart-ready projection. Any failure on
//! those routes is a plain `404 Page Not Found`.

pub mod error;
pub mod routes;
pub mod settings;
pub mod telemetry;

pub use routes::{AppState, build_app};
