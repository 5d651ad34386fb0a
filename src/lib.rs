#![doc(test(attr(deny(warnings))))]

//! Tally is a terminal client for recording revenue and expense transactions
//! kept by a remote REST backend.
//!
//! The [`controller`] module holds the form state machine; [`cli`] wraps it in
//! an interactive shell.

pub mod cli;
pub mod controller;
pub mod errors;
pub mod utils;

pub use tally_config as config;
pub use tally_domain as domain;
pub use tally_store as store;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tally tracing initialized.");
    });
}
