//! Solver-free baseline dispatcher.
//!
//! Each fire draws a helicopter need from a seeded weighted distribution and
//! is served by the nearest bases in range, all or nothing, against a ledger
//! that depletes over one run.

pub mod dispatcher;
pub mod ledger;
pub mod needs;
pub mod record;

pub use dispatcher::BasicDispatcher;
pub use ledger::AllocationLedger;
pub use needs::HelicopterNeeds;
pub use record::{DispatchOutcome, DispatchRecord};
