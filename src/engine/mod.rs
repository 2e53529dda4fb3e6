//! Timer engine module.
//!
//! - `clock`: countdown clock bookkeeping and schedule tokens
//! - `timer`: the pomodoro state machine
//! - `controller`: async handle that ticks the engine in real time

pub mod clock;
pub mod controller;
pub mod timer;

pub use clock::{ClockToken, CountdownClock};
pub use controller::{TimerController, TimerSnapshot, TICK_PERIOD};
pub use timer::{TickOutcome, TimerEngine, TimerEvent};
