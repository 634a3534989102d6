//! Development server for the todo web UI.
//!
//! Serves the built frontend and forwards backend prefixes (by default
//! `/todos` to `http://localhost:8080`) so both appear same-origin to the
//! browser.

pub mod config;
pub mod proxy;
pub mod server;
