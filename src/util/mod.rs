//! Global utility functions — these are publicly re-exported in `prelude.rs`.

use std::time::Duration;

pub mod general;
pub mod timer;

pub use general::*;
pub use timer::TimerThread;
