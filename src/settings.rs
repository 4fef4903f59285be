//! Global constants.

/// The number of horizontal zones across the frame, each of which maps to one
/// chord or note.
pub const NUM_ZONES: usize = 8;

/// The highest octave offset which can be selected by raising a hand.
pub const MAX_OCTAVE_OFFSET: i32 = 2;

/// The margin band around each edge of the frame, as a proportion of the
/// frame's width (or height). A fingertip inside this band releases its hand.
pub const EDGE_MARGIN_RATIO: f64 = 0.05;

/// The pinch distance at (or below) which a hand is muted, as a proportion of
/// the frame width.
pub const STRUM_THRESHOLD_RATIO: f64 = 0.05;

/// The pinch distance at which the chord hand reaches full volume, as a
/// proportion of the frame width.
pub const CHORD_MAX_DISTANCE_RATIO: f64 = 0.2;

/// The pinch distance at which the note hand reaches full volume, as a
/// proportion of the frame width.
pub const NOTE_MAX_DISTANCE_RATIO: f64 = 0.3;

/// Volume of a hand which has only just opened past the strum threshold.
pub const MIN_VOLUME_DB: f64 = -60.0;
/// Volume of a fully-opened hand.
pub const MAX_VOLUME_DB: f64 = 0.0;

/// How long no hand may be seen before everything is released, in seconds.
pub const HAND_TIMEOUT_SECS: f64 = 1.5;

/// The minimum time between two accompaniment toggles, in seconds.
pub const MODE_TOGGLE_DEBOUNCE_SECS: f64 = 0.3;

/// The lower edge of the "shallow nod" band of chin-to-nose distance, as a
/// proportion of the frame height.
pub const SHALLOW_TILT_MIN: f64 = 0.05;
/// The upper edge of the "shallow nod" band.
pub const SHALLOW_TILT_MAX: f64 = 0.10;
/// Chin-to-nose distance past which a nod counts as "deep" and the
/// arpeggiator speed follows the head.
pub const DEEP_TILT_THRESHOLD: f64 = 0.12;

/// The horizontal chin-to-nose offset which maps onto the extremes of the
/// arpeggiator speed range.
pub const HEAD_TURN_RANGE: f64 = 0.06;

/// Slowest arpeggiator transport rate, in beats per second.
pub const MIN_ARP_SPEED_HZ: f64 = 0.5;
/// Fastest arpeggiator transport rate, in beats per second.
pub const MAX_ARP_SPEED_HZ: f64 = 4.0;
/// The transport rate used until the head adjusts it.
pub const DEFAULT_ARP_SPEED_HZ: f64 = 2.0;

/// The default size of the detector's frame, which is also the window size.
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

pub const DEFAULT_OSC_PORT: u16 = 9000;
/// The OSC address which landmark packets are sent to.
pub const DETECTION_OSC_ADDRESS: &str = "/landmarks";
/// How often the OSC socket is polled for new detections.
pub const DETECTION_POLL_RATE: f64 = 240.0;

/// How often queued MIDI messages are flushed to the output port.
pub const MIDI_SEND_RATE: f64 = 500.0;

pub const NOTE_VELOCITY: u8 = 100;

/// MIDI channels (zero-indexed) for each part.
pub const CHORD_CHANNEL: u8 = 0;
pub const NOTE_CHANNEL: u8 = 1;
pub const ACCOMPANIMENT_CHANNEL: u8 = 2;

/// General MIDI programs for each part (zero-indexed).
pub const CHORD_PROGRAM: u8 = 89; // Pad 2 (warm)
pub const NOTE_PROGRAM: u8 = 80; // Lead 1 (square)
pub const ACCOMPANIMENT_PROGRAM: u8 = 8; // Celesta
