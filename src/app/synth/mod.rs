//! Sound output. The gesture logic only talks to a [`SynthBackend`], which is
//! implemented over MIDI by [`MidiSynth`], or silently by [`NullSynth`] when no
//! MIDI output is available.

use super::*;
use crate::app::hands::Side;
use crate::app::musical::{Pitch, Subdivision};

pub mod arpeggiator;
pub mod midi_synth;
#[cfg(test)]
pub(crate) mod recording;

pub use midi_synth::MidiSynth;

/// Fire-and-forget commands to whatever is making the sound. Each hand plays
/// on its own channel.
pub trait SynthBackend {
    /// Sets the gain of a channel in decibels.
    fn set_volume(&mut self, channel: Side, db: f64);

    /// Attacks a set of pitches together.
    fn start_pitches(&mut self, channel: Side, pitches: &[Pitch]);

    /// Attacks a single pitch.
    fn start_pitch(&mut self, channel: Side, pitch: Pitch);

    /// Releases the pitches started on a channel.
    fn stop_pitches(&mut self, channel: Side);

    /// Releases everything sounding on a channel, including anything this
    /// backend has lost track of.
    fn stop_all_pitches(&mut self, channel: Side);

    /// Starts cycling through `pitches` in an up-down pattern, one per
    /// `subdivision` of the shared transport.
    fn start_arpeggiator(&mut self, pitches: &[Pitch], subdivision: Subdivision);

    fn stop_arpeggiator(&mut self);

    fn set_accompaniment_enabled(&mut self, enabled: bool);

    /// Sets the shared transport rate in beats per second.
    fn set_arpeggiator_speed(&mut self, hz: f64);
}

/// A backend which makes no sound.
#[derive(Debug, Default)]
pub struct NullSynth;

impl SynthBackend for NullSynth {
    fn set_volume(&mut self, _: Side, _: f64) {}
    fn start_pitches(&mut self, _: Side, _: &[Pitch]) {}
    fn start_pitch(&mut self, _: Side, _: Pitch) {}
    fn stop_pitches(&mut self, _: Side) {}
    fn stop_all_pitches(&mut self, _: Side) {}
    fn start_arpeggiator(&mut self, _: &[Pitch], _: Subdivision) {}
    fn stop_arpeggiator(&mut self) {}
    fn set_accompaniment_enabled(&mut self, _: bool) {}
    fn set_arpeggiator_speed(&mut self, _: f64) {}
}
