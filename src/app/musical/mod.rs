//! Musical types and logic.

pub mod arpeggio;
pub mod chord;
pub mod note;

pub use arpeggio::{Subdivision, UpDownPattern};
pub use chord::{PitchTable, CHORD_NAMES, CHORD_TABLE, NOTE_TABLE};
pub use note::*;
