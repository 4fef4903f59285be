//! Mapping fingertip positions onto zones and octaves.

use crate::prelude::*;

/// The size of the detector's frame in pixels. Constant for a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameDims {
    pub width: f64,
    pub height: f64,
}

impl FrameDims {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Converts a normalized landmark into pixel coordinates.
    pub fn to_pixels(&self, point: DVec3) -> DVec2 {
        DVec2::new(point.x * self.width, point.y * self.height)
    }

    /// The pinch distance at or below which a hand is muted.
    pub fn strum_threshold(&self) -> f64 {
        self.width * STRUM_THRESHOLD_RATIO
    }

    /// Whether a pixel position lies in the margin band around the frame's
    /// edges (or outside of the frame entirely).
    pub fn is_outside_margin(&self, px: DVec2) -> bool {
        let mx = self.width * EDGE_MARGIN_RATIO;
        let my = self.height * EDGE_MARGIN_RATIO;

        !(mx..=self.width - mx).contains(&px.x)
            || !(my..=self.height - my).contains(&px.y)
    }
}

impl Default for FrameDims {
    fn default() -> Self {
        Self::new(f64::from(DEFAULT_FRAME_WIDTH), f64::from(DEFAULT_FRAME_HEIGHT))
    }
}

/// Which zone and octave a fingertip selects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoneAssignment {
    pub zone: usize,
    pub octave: i32,
}

impl ZoneAssignment {
    /// Returns `None` if the fingertip is not over any zone.
    pub fn from_pixels(px: DVec2, dims: &FrameDims) -> Option<Self> {
        Some(Self {
            zone: zone_for(px.x, dims.width)?,
            octave: octave_for(px.y, dims.height),
        })
    }
}

/// The zone under a horizontal pixel position, or `None` if the position is
/// outside of the frame.
pub fn zone_for(x_px: f64, width: f64) -> Option<usize> {
    if !x_px.is_finite() || x_px < 0.0 || width <= 0.0 {
        return None;
    }

    let zone_width = width / NUM_ZONES as f64;
    let zone = (x_px / zone_width).floor() as usize;

    (zone < NUM_ZONES).then_some(zone)
}

/// The octave offset for a vertical pixel position. Higher on screen (lower
/// `y`) gives a higher octave.
pub fn octave_for(y_px: f64, height: f64) -> i32 {
    let octave =
        map(y_px, height, 0.0, 0.0, f64::from(MAX_OCTAVE_OFFSET)).floor();

    if octave.is_nan() {
        return 0;
    }

    (octave as i32).clamp(0, MAX_OCTAVE_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_boundaries() {
        let width = 640.0;

        assert_eq!(zone_for(0.0, width), Some(0));
        assert_eq!(zone_for(79.999, width), Some(0));
        assert_eq!(zone_for(80.0, width), Some(1));
        assert_eq!(zone_for(width - 1e-9, width), Some(NUM_ZONES - 1));
        assert_eq!(zone_for(width, width), None);
        assert_eq!(zone_for(-1.0, width), None);
        assert_eq!(zone_for(f64::NAN, width), None);
    }

    #[test]
    fn test_every_position_has_a_zone() {
        let width = 1000.0;

        for i in 0..1000 {
            let zone = zone_for(f64::from(i), width).unwrap();
            assert!(zone < NUM_ZONES);
            assert_eq!(zone, (f64::from(i) / (width / NUM_ZONES as f64)) as usize);
        }
    }

    #[test]
    fn test_octave_is_monotonic() {
        let height = 480.0;
        let mut prev = octave_for(-50.0, height);

        for y in -50..530 {
            let octave = octave_for(f64::from(y), height);

            assert!((0..=MAX_OCTAVE_OFFSET).contains(&octave));
            assert!(octave <= prev);

            prev = octave;
        }

        assert_eq!(octave_for(height, height), 0);
        assert_eq!(octave_for(height * 0.75, height), 0);
        assert_eq!(octave_for(height * 0.25, height), 1);
        assert_eq!(octave_for(0.0, height), 2);
    }

    #[test]
    fn test_margin_band() {
        let dims = FrameDims::new(640.0, 480.0);

        assert!(!dims.is_outside_margin(DVec2::new(320.0, 240.0)));
        assert!(!dims.is_outside_margin(DVec2::new(32.0, 24.0)));
        assert!(dims.is_outside_margin(DVec2::new(31.0, 240.0)));
        assert!(dims.is_outside_margin(DVec2::new(320.0, 457.0)));
        assert!(dims.is_outside_margin(DVec2::new(-5.0, 240.0)));
    }

    #[test]
    fn test_assignment() {
        let dims = FrameDims::new(640.0, 480.0);

        assert_eq!(
            ZoneAssignment::from_pixels(DVec2::new(410.0, 100.0), &dims),
            Some(ZoneAssignment { zone: 5, octave: 1 })
        );
        assert_eq!(ZoneAssignment::from_pixels(DVec2::new(700.0, 100.0), &dims), None);
    }
}
