//! Project-wide exports for easy access.

pub use crate::settings::*;
pub use crate::util::*;
pub use atomic_float::AtomicF64;
pub use crossbeam_channel::{
    unbounded as unbounded_channel, Receiver as CCReceiver, Sender as CCSender,
};
pub use nannou::prelude::{DVec2, DVec3, Vec2};
