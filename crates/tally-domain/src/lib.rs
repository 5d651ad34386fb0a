//! tally-domain
//!
//! Transaction records exchanged with the backend, the client-side draft, and
//! balance arithmetic. No I/O, no CLI, no HTTP.

pub mod balance;
pub mod common;
pub mod date;
pub mod draft;
pub mod transaction;

pub use balance::*;
pub use common::*;
pub use date::*;
pub use draft::*;
pub use transaction::*;
