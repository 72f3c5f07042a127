//! # State Module
//!
//! Application state for the POS command layer.
//!
//! ## Why Multiple State Types?
//! Instead of one struct that every command reaches into, state is split by
//! concern and each command takes only the pieces it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      AppState (owned by run())                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  StoreState  │  │  OrderState  │  │   ConfigState    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Store       │  │  Arc<Mutex<  │  │  store_name      │              │
//! │  │  (shared     │  │    Order     │  │  tax_rate_bps    │              │
//! │  │   RwLock)    │  │  >>          │  │  currency        │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: Store serializes writes behind its own RwLock           │
//! │  • OrderState: Protected by Arc<Mutex<T>> for exclusive access         │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod order;
mod store;

pub use config::{ConfigError, ConfigState, CONFIG_FILE_NAME};
pub use order::OrderState;
pub use store::StoreState;

/// Everything the command layer needs, built once at startup.
#[derive(Debug)]
pub struct AppState {
    pub store: StoreState,
    pub order: OrderState,
    pub config: ConfigState,
}

impl AppState {
    pub fn new(store: StoreState, config: ConfigState) -> Self {
        AppState {
            store,
            order: OrderState::new(),
            config,
        }
    }
}
