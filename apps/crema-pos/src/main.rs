//! # Crema POS Entry Point
//!
//! Process entry point for the point of sale.
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Crema POS                                      │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 Front End (any process)                          │  │
//! │  │  • Order Screen         • Loyalty Forms                          │  │
//! │  │  • Staff Schedule       • Inventory                              │  │
//! │  └──────────────────────────────┬───────────────────────────────────┘  │
//! │                                 │ JSON lines on stdin/stdout            │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Backend (this crate)                     │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Starts the runtime                               │  │
//! │  │                                                                  │  │
//! │  │  lib.rs ─────► Logging, config, store, serve loop               │  │
//! │  │                                                                  │  │
//! │  │  commands/ ──► add_to_order, checkout, record_transaction       │  │
//! │  │                                                                  │  │
//! │  │  state/ ─────► StoreState, OrderState, ConfigState              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                     In-Memory Store                              │  │
//! │  │  seeded from JSON fixtures, one RwLock over every collection      │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```text
//! crema-pos [--config <path>]
//! ```

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The actual setup is in lib.rs so tests can drive it
    crema_pos::run().await
}
