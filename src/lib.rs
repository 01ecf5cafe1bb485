#![doc(test(attr(deny(warnings))))]

//! Cuenta Core provides the view-model layer of a municipal current-account
//! screen: annual ledger aggregation by tax group, expandable detail state,
//! and a process-wide notification queue with timed dismissal.

pub mod config;
pub mod errors;
pub mod ledger;
pub mod notification;
pub mod report;
pub mod time;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cuenta Core tracing initialized.");
    });
}
