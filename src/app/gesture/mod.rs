//! The gesture state machine. Each frame of landmarks is turned into synth
//! commands: the hands play through their voices, the head drives the
//! accompaniment mode, and a watchdog silences everything once the hands
//! have gone.

use crate::app::hands::{FrameLandmarks, Side};
use crate::app::musical::PitchParseError;
use crate::app::synth::SynthBackend;
use crate::prelude::*;
use std::time::Instant;

pub mod mode;
pub mod voice;
pub mod watchdog;
pub mod zones;

pub use mode::{ModeController, ModePhase, ModeState};
pub use voice::{VoiceConfig, VoiceController};
pub use watchdog::{Presence, PresenceWatchdog};
pub use zones::{FrameDims, ZoneAssignment};

pub struct GestureEngine {
    dims: FrameDims,
    /// Indexed by `Side::index()`.
    voices: [VoiceController; 2],
    /// Per-side absence, for releasing one hand while the other plays on.
    hand_watchdogs: [PresenceWatchdog; 2],
    /// Absence of both hands, which silences everything.
    idle_watchdog: PresenceWatchdog,
    mode: ModeController,
}

impl GestureEngine {
    /// # Errors
    ///
    /// Returns an error if either voice's pitch table cannot be parsed.
    pub fn new(dims: FrameDims) -> Result<Self, PitchParseError> {
        let timeout = secs_to_duration(HAND_TIMEOUT_SECS);

        Ok(Self {
            dims,
            voices: [
                VoiceController::new(VoiceConfig::chord_hand()?),
                VoiceController::new(VoiceConfig::note_hand()?),
            ],
            hand_watchdogs: [
                PresenceWatchdog::new(timeout),
                PresenceWatchdog::new(timeout),
            ],
            idle_watchdog: PresenceWatchdog::new(timeout),
            mode: ModeController::new(),
        })
    }

    pub const fn dims(&self) -> &FrameDims {
        &self.dims
    }

    pub const fn voice(&self, side: Side) -> &VoiceController {
        &self.voices[side.index()]
    }

    pub const fn mode_state(&self) -> ModeState {
        self.mode.state()
    }

    /// Whether both hands have been gone long enough for everything to have
    /// been silenced (or no hand has been seen yet).
    pub const fn is_idle(&self) -> bool {
        self.idle_watchdog.is_expired()
    }

    /// Runs one frame. `frame` may be the same detection as last time if the
    /// detector has not produced a new one; its capture time is what counts
    /// towards the hand timeout.
    pub fn tick(
        &mut self,
        frame: &FrameLandmarks,
        now: Instant,
        synth: &mut dyn SynthBackend,
    ) {
        for side in Side::ALL {
            if frame.hand(side).is_some() {
                self.hand_watchdogs[side.index()].saw(frame.captured_at);
            }
        }

        if frame.has_hands() {
            self.idle_watchdog.saw(frame.captured_at);
        }

        match self.idle_watchdog.check(now) {
            Presence::Present => self.process_hands(frame, now, synth),
            Presence::JustExpired => {
                log::info!(
                    "no hands for {HAND_TIMEOUT_SECS} seconds, stopping everything"
                );
                self.full_clear(synth);
            }
            Presence::Absent => {}
        }

        self.mode.update(frame.face.as_ref(), now, synth);
    }

    /// Stops every channel and the arpeggiator, and forgets what each hand
    /// was playing.
    pub fn full_clear(&mut self, synth: &mut dyn SynthBackend) {
        for side in Side::ALL {
            synth.stop_all_pitches(side);
        }

        synth.stop_arpeggiator();

        for voice in &mut self.voices {
            voice.clear_silently();
        }
    }

    fn process_hands(
        &mut self,
        frame: &FrameLandmarks,
        now: Instant,
        synth: &mut dyn SynthBackend,
    ) {
        for side in Side::ALL {
            let i = side.index();
            let presence = self.hand_watchdogs[i].check(now);

            match frame.hand(side) {
                Some(hand) => self.voices[i].process(hand, &self.dims, synth),
                None if presence == Presence::JustExpired => {
                    log::debug!("{side} hand lost");
                    self.voices[i].release(synth);
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::app::hands::face::{
        CHIN_LANDMARK_INDEX, NOSE_TIP_LANDMARK_INDEX, NUM_FACE_LANDMARKS,
    };
    use crate::app::hands::*;

    /// A 1000 x 800 frame.
    pub fn dims() -> FrameDims {
        FrameDims::new(1000.0, 800.0)
    }

    /// The normalized horizontal centre of a zone.
    pub fn zone_x(zone: usize) -> f64 {
        (zone as f64 + 0.5) / NUM_ZONES as f64
    }

    /// A hand with its index fingertip at `(x, y)` and its thumb tip `pinch`
    /// further right, in normalized units.
    pub fn hand(
        side: Side,
        x: f64,
        y: f64,
        pinch: f64,
        facing: bool,
    ) -> HandRecord {
        let mut landmarks = [DVec3::new(x, y, 0.0); NUM_HAND_LANDMARKS];
        let thumb_x = x + pinch;

        let pinky_offset = match (side, facing) {
            (Side::Left, true) | (Side::Right, false) => 0.1,
            _ => -0.1,
        };

        landmarks[THUMB_TIP_LANDMARK_INDEX] = DVec3::new(thumb_x, y, 0.0);
        landmarks[PINKY_TIP_LANDMARK_INDEX] =
            DVec3::new(thumb_x + pinky_offset, y, 0.0);

        HandRecord::new(side, landmarks)
    }

    /// A face whose chin is offset from its nose tip by `(dx, dy)`.
    pub fn face_with(dx: f64, dy: f64) -> FaceLandmarks {
        let mut points = vec![DVec3::new(0.5, 0.5, 0.0); NUM_FACE_LANDMARKS];
        points[NOSE_TIP_LANDMARK_INDEX] = DVec3::new(0.5, 0.4, 0.0);
        points[CHIN_LANDMARK_INDEX] = DVec3::new(0.5 + dx, 0.4 + dy, 0.0);

        FaceLandmarks::from_points(points)
            .expect("a full mesh always has enough points")
    }

    pub fn frame(
        captured_at: Instant,
        hands: &[HandRecord],
        face: Option<FaceLandmarks>,
    ) -> FrameLandmarks {
        let mut frame = FrameLandmarks::empty(captured_at);

        for hand in hands {
            match hand.side {
                Side::Left => frame.left = Some(*hand),
                Side::Right => frame.right = Some(*hand),
            }
        }

        frame.face = face;
        frame
    }
}
