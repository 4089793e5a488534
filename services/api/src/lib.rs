//! Orchestra API Library Crate
//!
//! This library contains all the logic for the learning-orchestra web
//! service: application state, API handlers, and routing around one shared
//! pipeline controller. The `api` binary is a thin wrapper around this
//! library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
