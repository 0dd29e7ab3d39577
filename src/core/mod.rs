//! Core infrastructure module for the forest predictor.
//!
//! - [`types`]: Handle types and small enumerations
//! - [`constants`]: System constants and configuration defaults
//! - [`error`]: Error type and `Result` alias
//! - [`traits`]: Feature accessor, split rule, edge predictor and persistence traits

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{ForestError, Result};
pub use traits::*;
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize logging with the given verbosity.
///
/// `RUST_LOG` takes precedence when set. Repeated calls are harmless; only
/// the first one installs a logger.
pub(crate) fn initialize_logging(verbosity: VerbosityLevel) {
    if LOGGING_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    let mut builder = env_logger::Builder::new();
    builder.filter_level(verbosity.level_filter());
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // Another logger may already be installed by the host application.
    if builder.try_init().is_ok() {
        log::debug!("Logging initialized at {} verbosity", verbosity);
    }
}

/// Whether [`initialize_logging`] has run.
pub(crate) fn is_logging_initialized() -> bool {
    LOGGING_INITIALIZED.load(Ordering::SeqCst)
}
