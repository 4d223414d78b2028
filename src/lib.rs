//! finledger - a multi-user personal-finance ledger
//!
//! Keeps every account balance equal to its opening balance plus the signed
//! sum of its transactions, while users record income and expenses, set
//! budgets over expense categories and track savings goals.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, accounts, transactions, categories, etc.)
//! - `storage`: Partitioned stores with JSON file persistence
//! - `services`: Business logic layer
//! - `reports`: Read-only aggregations over the ledger
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `finledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use finledger::config::{paths::LedgerPaths, settings::Settings};
//! use finledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Filter directive used when neither `RUST_LOG` nor settings provide one
pub const DEFAULT_LOG_FILTER: &str = "finledger=info";

/// Initializes the global tracing subscriber with the default filter.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_FILTER);
}

/// Initializes the global tracing subscriber; `RUST_LOG` overrides `default_directive`.
///
/// Only the first call has any effect. Events go to stderr so command
/// output on stdout stays clean.
pub fn init_tracing_with(default_directive: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_directive))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        // A subscriber installed by an embedding application wins.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
