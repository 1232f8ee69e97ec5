//! leave-core
//!
//! Leave accounting and planning services.
//! Depends on leave-domain. No CLI, no terminal I/O, no direct filesystem access.

pub mod accrual_service;
pub mod allocation_service;
pub mod error;
pub mod ids;
pub mod ledger_service;
pub mod manager;
pub mod outcome;
pub mod plan_service;
pub mod search_service;
pub mod storage;
pub mod summary_service;
pub mod time;

pub use accrual_service::*;
pub use allocation_service::*;
pub use error::CoreError;
pub use ids::{IdGenerator, IdScheme, TimestampIdGenerator, UuidIdGenerator};
pub use ledger_service::*;
pub use manager::LeaveManager;
pub use outcome::{CollectingSink, NotificationSink, Outcome};
pub use plan_service::*;
pub use search_service::*;
pub use summary_service::*;
pub use time::{Clock, FixedClock};

#[cfg(test)]
mod tests;
