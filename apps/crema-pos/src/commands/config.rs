//! # Config Commands
//!
//! Read-only views of how the POS was started.

use tracing::debug;

use crema_store::SeedReport;

use crate::state::{ConfigState, StoreState};

/// Gets the current application configuration.
///
/// ## When Used
/// - Startup (store name, currency, tax rate for display)
/// - Receipt printing
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}

/// What was loaded at startup and which balances were repaired.
pub fn seed_report(store: &StoreState) -> SeedReport {
    store.inner().seed_report().clone()
}
