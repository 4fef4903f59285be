//! Landmark intake: parsing detector packets, turning raw detections into
//! per-side hand records, and keeping the latest frame available to the
//! frame loop.

use super::*;
use crate::app::gesture::FrameDims;
use osc::OSCReceiver;
use std::time::Instant;
use triple_buffer::triple_buffer;

pub mod face;
pub mod hand_parser;
pub mod hand_types;

pub use face::FaceLandmarks;
pub use hand_types::*;

/// A hand as reported by the detector, before side-swapping.
#[derive(Clone, Debug, PartialEq)]
pub struct RawHand {
    pub label: String,
    pub landmarks: Vec<DVec3>,
}

/// Everything the detector reported for one camera frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawDetection {
    pub hands: Vec<RawHand>,
    pub face: Option<Vec<DVec3>>,
}

/// The landmarks for one frame, sorted by side.
#[derive(Clone, Debug)]
pub struct FrameLandmarks {
    pub left: Option<HandRecord>,
    pub right: Option<HandRecord>,
    pub face: Option<FaceLandmarks>,
    /// When the detection was received.
    pub captured_at: Instant,
}

impl FrameLandmarks {
    pub const fn empty(captured_at: Instant) -> Self {
        Self { left: None, right: None, face: None, captured_at }
    }

    pub const fn hand(&self, side: Side) -> Option<&HandRecord> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    pub const fn has_hands(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }
}

/// Sorts a raw detection into left and right hand records, swapping the
/// detector's handedness labels and working out each palm's orientation.
/// Hands with an unknown label or the wrong number of landmarks are dropped,
/// and a later hand replaces an earlier one claiming the same side.
pub fn normalize_detection(
    raw: RawDetection,
    captured_at: Instant,
) -> FrameLandmarks {
    let mut frame = FrameLandmarks::empty(captured_at);

    for hand in raw.hands {
        let Some(side) = Side::from_detector_label(&hand.label) else {
            log::debug!("dropping hand with unknown label \"{}\"", hand.label);
            continue;
        };

        let Ok(landmarks) =
            <[DVec3; NUM_HAND_LANDMARKS]>::try_from(hand.landmarks.as_slice())
        else {
            log::debug!(
                "dropping {side} hand with {} landmarks",
                hand.landmarks.len()
            );
            continue;
        };

        let record = HandRecord::new(side, landmarks);

        match side {
            Side::Left => frame.left = Some(record),
            Side::Right => frame.right = Some(record),
        }
    }

    frame.face = raw.face.and_then(|points| {
        let len = points.len();
        let face = FaceLandmarks::from_points(points);

        if face.is_none() {
            log::debug!("dropping face mesh with {len} landmarks");
        }

        face
    });

    frame
}

// *** *** *** //

/// Polls the OSC socket on its own thread, and publishes the newest parsed
/// detection to a single-slot buffer which the frame loop reads from.
pub struct DetectionFeed {
    poller: TimerThread,
    output: triple_buffer::Output<FrameLandmarks>,
    port: u16,
}

impl DetectionFeed {
    pub fn new(mut receiver: OSCReceiver) -> Self {
        let port = receiver.port();
        let (mut input, output) =
            triple_buffer(&FrameLandmarks::empty(Instant::now()));

        let poller = TimerThread::new(move || {
            let Some(msg) = receiver.try_recv(DETECTION_OSC_ADDRESS) else {
                return;
            };

            match hand_parser::parse_message(msg) {
                Ok(raw) => {
                    input.write(normalize_detection(raw, Instant::now()));
                }
                Err(e) => log::warn!("dropping landmark message: {e}"),
            }
        });

        Self { poller, output, port }
    }

    pub fn start(&mut self) {
        log::info!("listening for landmarks on OSC port {}", self.port);
        self.poller.start_hz(DETECTION_POLL_RATE);
    }

    pub fn stop(&mut self) {
        self.poller.stop();
    }

    /// The most recent detection. This may be the same frame as last time if
    /// the detector has not produced a new one.
    pub fn latest(&mut self) -> &FrameLandmarks {
        self.output.read()
    }
}
