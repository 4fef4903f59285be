//! The per-hand voice: decides when a hand starts, changes, or stops its
//! chord or note.

use super::zones::{FrameDims, ZoneAssignment};
use crate::app::hands::{HandRecord, PalmOrientation, Side};
use crate::app::musical::{Pitch, PitchParseError, PitchTable, Subdivision};
use crate::app::synth::SynthBackend;
use crate::prelude::*;

/// The step length of the chord hand's arpeggio.
pub const ARPEGGIO_SUBDIVISION: Subdivision = Subdivision::Sixteenth;

#[derive(Clone, Debug)]
pub struct VoiceConfig {
    pub side: Side,
    pub table: PitchTable,
    /// The pinch distance for full volume, as a proportion of frame width.
    pub max_distance_ratio: f64,
    /// Whether turning the palm away from the camera arpeggiates the pitches
    /// instead of holding them.
    pub arpeggiate_when_palm_away: bool,
}

impl VoiceConfig {
    /// The left hand plays chords, and arpeggiates them with its palm away.
    ///
    /// # Errors
    ///
    /// Returns an error if the chord table holds an invalid pitch name.
    pub fn chord_hand() -> Result<Self, PitchParseError> {
        Ok(Self {
            side: Side::Left,
            table: PitchTable::chords()?,
            max_distance_ratio: CHORD_MAX_DISTANCE_RATIO,
            arpeggiate_when_palm_away: true,
        })
    }

    /// The right hand plays single notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the note table holds an invalid pitch name.
    pub fn note_hand() -> Result<Self, PitchParseError> {
        Ok(Self {
            side: Side::Right,
            table: PitchTable::notes()?,
            max_distance_ratio: NOTE_MAX_DISTANCE_RATIO,
            arpeggiate_when_palm_away: false,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStyle {
    Sustained,
    Arpeggiated,
}

/// A zone which is currently sounding, and the pitches it started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sounding {
    pub zone: usize,
    pub pitches: Vec<Pitch>,
}

/// What a hand is currently playing. The zone and its pitches are stored
/// together, so one can never be set without the other.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoundingState {
    sounding: Option<Sounding>,
    is_arpeggiating: bool,
    orientation: Option<PalmOrientation>,
}

impl SoundingState {
    pub fn last_zone(&self) -> Option<usize> {
        self.sounding.as_ref().map(|s| s.zone)
    }

    pub fn pitches(&self) -> Option<&[Pitch]> {
        self.sounding.as_ref().map(|s| s.pitches.as_slice())
    }

    pub const fn is_sounding(&self) -> bool {
        self.sounding.is_some()
    }

    pub const fn is_arpeggiating(&self) -> bool {
        self.is_arpeggiating
    }

    pub const fn orientation(&self) -> Option<PalmOrientation> {
        self.orientation
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct VoiceController {
    config: VoiceConfig,
    state: SoundingState,
}

impl VoiceController {
    pub fn new(config: VoiceConfig) -> Self {
        Self { config, state: SoundingState::default() }
    }

    pub const fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub const fn state(&self) -> &SoundingState {
        &self.state
    }

    pub const fn side(&self) -> Side {
        self.config.side
    }

    /// The output volume for a pinch distance, in decibels.
    pub fn volume_for(&self, pinch: f64, dims: &FrameDims) -> f64 {
        map_clamped(
            pinch,
            dims.strum_threshold(),
            dims.width * self.config.max_distance_ratio,
            MIN_VOLUME_DB,
            MAX_VOLUME_DB,
        )
    }

    /// Runs one frame of the voice for a visible hand.
    pub fn process(
        &mut self,
        hand: &HandRecord,
        dims: &FrameDims,
        synth: &mut dyn SynthBackend,
    ) {
        let pinch = hand.pinch_distance(dims);
        let tip = dims.to_pixels(hand.index_tip());

        if dims.is_outside_margin(tip) {
            self.release(synth);
        }
        else {
            synth.set_volume(self.side(), self.volume_for(pinch, dims));

            if is_muted(pinch, dims) {
                self.release(synth);
            }
            else if let Some(assignment) = ZoneAssignment::from_pixels(tip, dims)
            {
                self.update_zone(assignment, hand.orientation, synth);
            }
        }

        self.state.orientation = Some(hand.orientation);
    }

    /// Stops whatever this hand is playing. Does nothing if it is silent.
    pub fn release(&mut self, synth: &mut dyn SynthBackend) {
        if self.state.sounding.take().is_none() {
            return;
        }

        synth.stop_pitches(self.side());

        if self.state.is_arpeggiating {
            synth.stop_arpeggiator();
            self.state.is_arpeggiating = false;
        }

        log::debug!("{} hand released", self.side());
    }

    /// Forgets everything without sending any commands, for after the synth
    /// has been cleared by other means.
    pub fn clear_silently(&mut self) {
        self.state = SoundingState::default();
    }

    fn style_for(&self, orientation: PalmOrientation) -> PlaybackStyle {
        if self.config.arpeggiate_when_palm_away && !orientation.is_facing() {
            PlaybackStyle::Arpeggiated
        }
        else {
            PlaybackStyle::Sustained
        }
    }

    const fn current_style(&self) -> PlaybackStyle {
        if self.state.is_arpeggiating {
            PlaybackStyle::Arpeggiated
        }
        else {
            PlaybackStyle::Sustained
        }
    }

    fn update_zone(
        &mut self,
        assignment: ZoneAssignment,
        orientation: PalmOrientation,
        synth: &mut dyn SynthBackend,
    ) {
        let style = self.style_for(orientation);

        if self.state.last_zone() != Some(assignment.zone) {
            self.release(synth);

            let Some(pitches) =
                self.config.table.pitches_for(assignment.zone, assignment.octave)
            else {
                return;
            };

            self.start(&pitches, style, synth);
            log::debug!(
                "{} hand playing zone {} ({})",
                self.side(),
                assignment.zone,
                format_pitches(&pitches)
            );

            self.state.sounding =
                Some(Sounding { zone: assignment.zone, pitches });

            return;
        }

        let orientation_changed = self.state.orientation != Some(orientation);

        if orientation_changed && style != self.current_style() {
            let Some(sounding) = self.state.sounding.clone() else {
                return;
            };

            self.release(synth);
            self.start(&sounding.pitches, style, synth);
            self.state.sounding = Some(sounding);
        }
    }

    fn start(
        &mut self,
        pitches: &[Pitch],
        style: PlaybackStyle,
        synth: &mut dyn SynthBackend,
    ) {
        match style {
            PlaybackStyle::Arpeggiated => {
                synth.start_arpeggiator(pitches, ARPEGGIO_SUBDIVISION);
                self.state.is_arpeggiating = true;
            }
            PlaybackStyle::Sustained => {
                if self.config.table.is_single_note() {
                    if let Some(&pitch) = pitches.first() {
                        synth.start_pitch(self.side(), pitch);
                    }
                }
                else {
                    synth.start_pitches(self.side(), pitches);
                }

                self.state.is_arpeggiating = false;
            }
        }
    }
}

/// Whether a pinch is closed enough to silence a hand. A pinch exactly at the
/// threshold is muted.
pub fn is_muted(pinch: f64, dims: &FrameDims) -> bool {
    pinch <= dims.strum_threshold()
}

pub fn format_pitches(pitches: &[Pitch]) -> String {
    pitches
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
