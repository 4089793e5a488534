//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds the shared,
//! clonable resources every handler needs: the pipeline controller and the
//! loaded configuration.

use crate::config::Config;
use orchestra_core::PipelineController;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<PipelineController>,
    pub config: Arc<Config>,
}
