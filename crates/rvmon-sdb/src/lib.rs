//! rvmon-sdb - The simple debugger
//!
//! Builds the monitor's debugging features on top of the machine model
//! and the expression engine: a fixed pool of watchpoints with cached
//! values, and a [`Debugger`] facade that steps the guest and halts it
//! when a watched expression changes.

mod debugger;
mod error;
mod watchpoint;

pub use debugger::Debugger;
pub use error::{Result, SdbError};
pub use watchpoint::{WatchHit, WatchPool, Watchpoint, NR_WATCHPOINTS};
