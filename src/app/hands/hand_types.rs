use super::*;

pub const NUM_HAND_LANDMARKS: usize = 21;

pub const THUMB_TIP_LANDMARK_INDEX: usize = 4;
pub const INDEX_TIP_LANDMARK_INDEX: usize = 8;
pub const PINKY_TIP_LANDMARK_INDEX: usize = 20;

/// The "bones" of a hand, as pairs of landmark indices.
#[rustfmt::skip]
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

/// Which of the player's hands a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The chord hand.
    Left,
    /// The note hand.
    Right,
}

impl Side {
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Returns the side a detection belongs to from the detector's handedness
    /// label. The detector sees the unmirrored video, so its labels are
    /// swapped.
    pub fn from_detector_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Left" => Some(Self::Right),
            "Right" => Some(Self::Left),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PalmOrientation {
    FacingCamera,
    AwayFromCamera,
}

impl PalmOrientation {
    /// Works out which way the palm faces from the thumb and pinky tips. The
    /// rule is mirrored between the two hands.
    pub fn from_landmarks(
        side: Side,
        landmarks: &[DVec3; NUM_HAND_LANDMARKS],
    ) -> Self {
        let thumb_x = landmarks[THUMB_TIP_LANDMARK_INDEX].x;
        let pinky_x = landmarks[PINKY_TIP_LANDMARK_INDEX].x;

        let facing = match side {
            Side::Left => thumb_x < pinky_x,
            Side::Right => thumb_x >= pinky_x,
        };

        if facing {
            Self::FacingCamera
        }
        else {
            Self::AwayFromCamera
        }
    }

    pub const fn is_facing(self) -> bool {
        matches!(self, Self::FacingCamera)
    }
}

/// A single tracked hand for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandRecord {
    pub side: Side,
    pub landmarks: [DVec3; NUM_HAND_LANDMARKS],
    pub orientation: PalmOrientation,
}

impl HandRecord {
    pub fn new(side: Side, landmarks: [DVec3; NUM_HAND_LANDMARKS]) -> Self {
        let orientation = PalmOrientation::from_landmarks(side, &landmarks);
        Self { side, landmarks, orientation }
    }

    pub const fn thumb_tip(&self) -> DVec3 {
        self.landmarks[THUMB_TIP_LANDMARK_INDEX]
    }

    pub const fn index_tip(&self) -> DVec3 {
        self.landmarks[INDEX_TIP_LANDMARK_INDEX]
    }

    /// The distance between the thumb and index fingertips in pixels.
    pub fn pinch_distance(&self, dims: &FrameDims) -> f64 {
        dims.to_pixels(self.thumb_tip())
            .distance(dims.to_pixels(self.index_tip()))
    }
}
