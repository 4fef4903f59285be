//! Head-pose control of the accompaniment. A shallow nod toggles the
//! accompaniment on and off; a deep nod while it is on lets the head's
//! horizontal position set the arpeggiator speed, which is locked in once the
//! head comes back up.
//!
//! Switching off from `AccompanyOn` waits until the head comes back up, as a
//! deep nod passes through the shallow band on its way down.

use crate::app::hands::FaceLandmarks;
use crate::app::synth::SynthBackend;
use crate::prelude::*;
use std::time::Instant;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModePhase {
    #[default]
    Idle,
    AccompanyOn,
    /// Only reachable from `AccompanyOn`, and only while the head is tilted
    /// past the deep threshold.
    SpeedAdjusting,
    SpeedLocked,
}

impl ModePhase {
    pub const fn accompaniment_enabled(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

impl std::fmt::Display for ModePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AccompanyOn => write!(f, "accompaniment on"),
            Self::SpeedAdjusting => write!(f, "adjusting speed"),
            Self::SpeedLocked => write!(f, "speed locked"),
        }
    }
}

/// A snapshot of the mode controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeState {
    pub phase: ModePhase,
    pub accompany_enabled: bool,
    pub speed_control_active: bool,
    pub speed_locked: bool,
    pub arpeggiator_speed_hz: f64,
    pub last_toggle: Option<Instant>,
}

pub struct ModeController {
    phase: ModePhase,
    speed_hz: f64,
    last_toggle: Option<Instant>,
    /// The previous frame's chin-to-nose distance, if a face was visible.
    prev_tilt: Option<f64>,
    /// Set by a shallow nod from `AccompanyOn` which has not yet come back up
    /// or gone deep.
    pending_off: bool,
}

impl ModeController {
    pub fn new() -> Self {
        Self {
            phase: ModePhase::Idle,
            speed_hz: DEFAULT_ARP_SPEED_HZ,
            last_toggle: None,
            prev_tilt: None,
            pending_off: false,
        }
    }

    pub const fn phase(&self) -> ModePhase {
        self.phase
    }

    pub const fn state(&self) -> ModeState {
        ModeState {
            phase: self.phase,
            accompany_enabled: self.phase.accompaniment_enabled(),
            speed_control_active: matches!(
                self.phase,
                ModePhase::SpeedAdjusting
            ),
            speed_locked: matches!(self.phase, ModePhase::SpeedLocked),
            arpeggiator_speed_hz: self.speed_hz,
            last_toggle: self.last_toggle,
        }
    }

    /// Runs one frame. Nothing changes while no face is visible.
    pub fn update(
        &mut self,
        face: Option<&FaceLandmarks>,
        now: Instant,
        synth: &mut dyn SynthBackend,
    ) {
        let Some(face) = face else {
            self.prev_tilt = None;
            self.pending_off = false;
            return;
        };

        let delta = face.chin_to_nose();
        let tilt = delta.y;

        let entered_band = is_shallow_tilt(tilt)
            && self.prev_tilt.is_some_and(|prev| prev < SHALLOW_TILT_MIN);

        if entered_band && self.debounce_elapsed(now) {
            match self.phase {
                ModePhase::AccompanyOn => self.pending_off = true,
                ModePhase::SpeedAdjusting => {}
                ModePhase::Idle | ModePhase::SpeedLocked => {
                    self.toggle(now, synth);
                }
            }
        }

        if self.pending_off {
            if tilt > DEEP_TILT_THRESHOLD {
                self.pending_off = false;
            }
            else if tilt < SHALLOW_TILT_MIN {
                self.pending_off = false;
                self.toggle(now, synth);
            }
        }

        if self.phase == ModePhase::AccompanyOn && tilt > DEEP_TILT_THRESHOLD {
            log::debug!("speed control active");
            self.phase = ModePhase::SpeedAdjusting;
        }

        if self.phase == ModePhase::SpeedAdjusting {
            if tilt > DEEP_TILT_THRESHOLD {
                self.speed_hz = speed_for_head_turn(delta.x);
                synth.set_arpeggiator_speed(self.speed_hz);
            }
            else {
                log::info!("arpeggiator speed locked at {:.2} Hz", self.speed_hz);
                self.phase = ModePhase::SpeedLocked;
            }
        }

        self.prev_tilt = Some(tilt);
    }

    fn debounce_elapsed(&self, now: Instant) -> bool {
        self.last_toggle.map_or(true, |t| {
            now.saturating_duration_since(t).as_secs_f64()
                >= MODE_TOGGLE_DEBOUNCE_SECS
        })
    }

    fn toggle(&mut self, now: Instant, synth: &mut dyn SynthBackend) {
        self.phase = match self.phase {
            ModePhase::Idle => ModePhase::AccompanyOn,
            _ => ModePhase::Idle,
        };
        self.last_toggle = Some(now);

        let enabled = self.phase.accompaniment_enabled();
        synth.set_accompaniment_enabled(enabled);

        log::info!(
            "accompaniment {}",
            if enabled { "enabled" } else { "disabled" }
        );
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

fn is_shallow_tilt(tilt: f64) -> bool {
    (SHALLOW_TILT_MIN..=SHALLOW_TILT_MAX).contains(&tilt)
}

/// Maps the horizontal chin-to-nose offset onto the arpeggiator speed range.
pub fn speed_for_head_turn(delta_x: f64) -> f64 {
    map_clamped(
        delta_x,
        -HEAD_TURN_RANGE,
        HEAD_TURN_RANGE,
        MIN_ARP_SPEED_HZ,
        MAX_ARP_SPEED_HZ,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::gesture::fixtures::face_with;
    use crate::app::synth::recording::{RecordingSynth, SynthCommand::*};
    use std::time::Duration;

    struct Nods {
        mode: ModeController,
        synth: RecordingSynth,
        start: Instant,
    }

    impl Nods {
        fn new() -> Self {
            Self {
                mode: ModeController::new(),
                synth: RecordingSynth::default(),
                start: Instant::now(),
            }
        }

        fn at(&mut self, ms: u64, dx: f64, dy: f64) {
            let face = face_with(dx, dy);
            let now = self.start + Duration::from_millis(ms);
            self.mode.update(Some(&face), now, &mut self.synth);
        }
    }

    #[test]
    fn test_shallow_nod_toggles_with_debounce() {
        let mut n = Nods::new();

        n.at(0, 0.0, 0.03);
        n.at(16, 0.0, 0.07);
        assert_eq!(n.synth.take_triggers(), [SetAccompanimentEnabled(true)]);
        assert_eq!(n.mode.phase(), ModePhase::AccompanyOn);

        // a second crossing 100 ms later is ignored
        n.at(50, 0.0, 0.03);
        n.at(116, 0.0, 0.07);
        assert!(n.synth.take_triggers().is_empty());
        assert!(n.mode.state().accompany_enabled);

        // switching off waits for the head to come back up
        n.at(400, 0.0, 0.03);
        n.at(420, 0.0, 0.07);
        assert!(n.synth.take_triggers().is_empty());

        n.at(440, 0.0, 0.03);
        assert_eq!(n.synth.take_triggers(), [SetAccompanimentEnabled(false)]);
        assert_eq!(n.mode.phase(), ModePhase::Idle);
    }

    #[test]
    fn test_slow_deep_nod_reaches_speed_control() {
        let mut n = Nods::new();

        n.at(0, 0.0, 0.03);
        n.at(16, 0.0, 0.07);
        n.at(100, 0.0, 0.03);
        n.synth.clear();

        // passes through the shallow band on the way down
        n.at(500, 0.0, 0.03);
        n.at(533, 0.0, 0.08);
        n.at(566, 0.0, 0.13);

        assert_eq!(n.synth.take_triggers(), [SetArpeggiatorSpeed(2.25)]);
        assert_eq!(n.mode.phase(), ModePhase::SpeedAdjusting);

        n.at(600, 0.0, 0.07);
        n.at(633, 0.0, 0.03);
        assert!(n.synth.take_triggers().is_empty());
        assert_eq!(n.mode.phase(), ModePhase::SpeedLocked);
    }

    #[test]
    fn test_holding_a_nod_does_not_retoggle() {
        let mut n = Nods::new();

        n.at(0, 0.0, 0.03);
        for ms in (16..2000).step_by(16) {
            n.at(ms, 0.0, 0.07);
        }

        assert_eq!(n.synth.take_triggers(), [SetAccompanimentEnabled(true)]);
    }

    #[test]
    fn test_deep_nod_adjusts_then_locks_speed() {
        let mut n = Nods::new();

        n.at(0, 0.0, 0.03);
        n.at(16, 0.0, 0.07);
        n.at(32, 0.0, 0.13);
        assert_eq!(n.mode.phase(), ModePhase::SpeedAdjusting);
        assert!(n.mode.state().speed_control_active);

        n.at(48, 0.06, 0.13);
        n.at(64, 0.1, 0.13);
        n.at(80, 0.0, 0.11);

        let triggers = n.synth.take_triggers();
        assert_eq!(
            triggers,
            [
                SetAccompanimentEnabled(true),
                SetArpeggiatorSpeed(2.25),
                SetArpeggiatorSpeed(MAX_ARP_SPEED_HZ),
                SetArpeggiatorSpeed(MAX_ARP_SPEED_HZ),
            ]
        );

        let state = n.mode.state();
        assert_eq!(state.phase, ModePhase::SpeedLocked);
        assert!(state.speed_locked && state.accompany_enabled);
        assert!(within_tolerance(state.arpeggiator_speed_hz, MAX_ARP_SPEED_HZ, 1e-12));

        // deep nods no longer change the speed
        n.at(96, -0.06, 0.13);
        assert!(n.synth.take_triggers().is_empty());
        assert_eq!(n.mode.phase(), ModePhase::SpeedLocked);
    }

    #[test]
    fn test_toggle_from_locked_resets_lock() {
        let mut n = Nods::new();

        n.at(0, 0.0, 0.03);
        n.at(16, 0.0, 0.07);
        n.at(32, 0.0, 0.13);
        n.at(48, 0.0, 0.02);
        assert_eq!(n.mode.phase(), ModePhase::SpeedLocked);
        n.synth.clear();

        n.at(500, 0.0, 0.06);
        assert_eq!(n.synth.take_triggers(), [SetAccompanimentEnabled(false)]);

        let state = n.mode.state();
        assert!(!state.speed_locked);
        assert!(!state.accompany_enabled);
    }

    #[test]
    fn test_deep_nod_while_idle_does_nothing() {
        let mut n = Nods::new();

        n.at(0, 0.0, 0.03);
        n.at(16, 0.0, 0.13);
        n.at(32, 0.05, 0.14);

        assert!(n.synth.take_triggers().is_empty());
        assert_eq!(n.mode.phase(), ModePhase::Idle);
    }

    #[test]
    fn test_missing_face_holds_state() {
        let mut n = Nods::new();

        n.at(0, 0.0, 0.03);
        n.at(16, 0.0, 0.07);
        n.synth.clear();

        let later = n.start + Duration::from_millis(1000);
        n.mode.update(None, later, &mut n.synth);
        assert_eq!(n.mode.phase(), ModePhase::AccompanyOn);

        // the face comes back mid-nod, which is not a fresh crossing
        n.at(1016, 0.0, 0.07);
        assert!(n.synth.take_triggers().is_empty());
        assert_eq!(n.mode.phase(), ModePhase::AccompanyOn);
    }

    #[test]
    fn test_speed_mapping() {
        assert!(within_tolerance(speed_for_head_turn(0.0), 2.25, 1e-12));
        assert!(within_tolerance(speed_for_head_turn(-1.0), MIN_ARP_SPEED_HZ, 1e-12));
        assert!(within_tolerance(speed_for_head_turn(1.0), MAX_ARP_SPEED_HZ, 1e-12));
    }
}
