#![doc(test(attr(deny(warnings))))]

//! Lager Core offers material inventory, customer posting, and debt ledger
//! primitives that power higher level bookkeeping workflows and APIs.

pub mod domain;
pub mod errors;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Lager Core tracing initialized.");
    });
}
