//! leave-domain
//!
//! Pure domain models (balance, requests, holidays, ledger snapshot).
//! No I/O, no CLI, no storage. Only data types, date helpers, and core enums.

pub mod balance;
pub mod calendar;
pub mod holiday;
pub mod ledger;
pub mod request;

pub use balance::*;
pub use holiday::*;
pub use ledger::*;
pub use request::*;
