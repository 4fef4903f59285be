//! MIDI output: message encoding and a timed sender thread.

use super::*;

pub mod message;
pub mod sender;

pub use message::MIDIMessage;
pub use sender::{MIDISender, MIDISenderTimedThread};
