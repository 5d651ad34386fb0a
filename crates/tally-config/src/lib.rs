//! tally-config
//!
//! Persistent client preferences: backend origin, balance strategy, and
//! display options. Owns the Config data structure plus disk persistence.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{BalanceSource, Config};
