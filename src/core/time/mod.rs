//! Tempo e Timers

pub mod clock;
pub mod jiffies;
pub mod timer;

pub use clock::{ClockSource, NSEC_PER_MSEC, NSEC_PER_SEC, NSEC_PER_USEC, TICK_NSEC};
