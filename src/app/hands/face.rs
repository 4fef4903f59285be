//! Face mesh landmarks, used for head-pose control.

use super::*;

/// The minimum number of points in a face mesh.
pub const NUM_FACE_LANDMARKS: usize = 468;

pub const NOSE_TIP_LANDMARK_INDEX: usize = 1;
pub const CHIN_LANDMARK_INDEX: usize = 152;

// Feature contours, as mesh indices in drawing order. The nose paths double
// back on themselves so that closing them draws a single line.

#[rustfmt::skip]
pub const FACE_OUTLINE: &[usize] = &[
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379,
    378, 400, 377, 152, 148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127,
    162, 21, 54, 103, 67, 109,
];
#[rustfmt::skip]
pub const OUTER_LIPS: &[usize] = &[
    0, 267, 269, 270, 409, 291, 375, 321, 405, 314, 17, 84, 181, 91, 146, 76,
    185, 40, 39, 37,
];
#[rustfmt::skip]
pub const INNER_LIPS: &[usize] = &[
    62, 78, 191, 80, 81, 82, 13, 312, 311, 310, 415, 308, 324, 318, 402, 317,
    14, 87, 178, 88,
];
#[rustfmt::skip]
pub const LEFT_EYE: &[usize] = &[
    33, 246, 161, 160, 159, 158, 157, 173, 133, 155, 154, 153, 145, 144, 163, 7,
];
#[rustfmt::skip]
pub const RIGHT_EYE: &[usize] = &[
    362, 398, 384, 385, 386, 387, 388, 466, 263, 249, 390, 373, 374, 380, 381,
    382,
];
pub const LEFT_EYEBROW: &[usize] = &[55, 65, 52, 53, 46, 70, 63, 105, 66, 107];
pub const RIGHT_EYEBROW: &[usize] =
    &[336, 296, 334, 293, 300, 276, 283, 282, 295, 285];
#[rustfmt::skip]
pub const NOSE_BRIDGE: &[usize] = &[
    168, 6, 197, 195, 5, 4, 1, 19, 1, 4, 5, 195, 197, 6, 168,
];
#[rustfmt::skip]
pub const NOSE_RIDGE: &[usize] = &[
    48, 115, 220, 45, 4, 275, 440, 344, 278, 344, 440, 275, 4, 45, 220, 115, 48,
];
#[rustfmt::skip]
pub const NOSTRILS: &[usize] = &[
    240, 60, 242, 19, 354, 290, 460, 290, 354, 19, 242, 60, 240,
];
#[rustfmt::skip]
pub const NOSE_OUTLINE: &[usize] = &[
    240, 64, 48, 49, 209, 217, 114, 128, 245, 193, 168, 417, 465, 357, 343,
    437, 429, 279, 278, 294, 460,
];

#[derive(Clone, Debug, PartialEq)]
pub struct FaceLandmarks {
    points: Vec<DVec3>,
}

impl FaceLandmarks {
    /// Returns `None` if there are too few points for a full face mesh.
    pub fn from_points(points: Vec<DVec3>) -> Option<Self> {
        (points.len() >= NUM_FACE_LANDMARKS).then_some(Self { points })
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    pub fn nose_tip(&self) -> DVec3 {
        self.points[NOSE_TIP_LANDMARK_INDEX]
    }

    pub fn chin(&self) -> DVec3 {
        self.points[CHIN_LANDMARK_INDEX]
    }

    /// The points of a feature contour, in order. Indices past the end of the
    /// mesh are skipped.
    pub fn contour(&self, indices: &[usize]) -> Vec<DVec3> {
        indices.iter().filter_map(|&i| self.points.get(i).copied()).collect()
    }

    /// The mean of every point in the mesh.
    pub fn centroid(&self) -> DVec3 {
        let sum = self.points.iter().fold(DVec3::ZERO, |acc, p| acc + *p);
        sum / self.points.len() as f64
    }

    /// The chin position relative to the nose tip, in normalized frame
    /// units.
    pub fn chin_to_nose(&self) -> DVec2 {
        let d = self.chin() - self.nose_tip();
        DVec2::new(d.x, d.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_meshes_are_rejected() {
        assert!(FaceLandmarks::from_points(vec![DVec3::ZERO; 100]).is_none());
        assert!(
            FaceLandmarks::from_points(vec![DVec3::ZERO; NUM_FACE_LANDMARKS])
                .is_some()
        );
    }

    #[test]
    fn test_contours_fit_the_mesh() {
        let points = (0..NUM_FACE_LANDMARKS)
            .map(|i| DVec3::new(i as f64, 0.0, 0.0))
            .collect();
        let face = FaceLandmarks::from_points(points).unwrap();

        let features = [
            FACE_OUTLINE, OUTER_LIPS, INNER_LIPS, LEFT_EYE, RIGHT_EYE,
            LEFT_EYEBROW, RIGHT_EYEBROW, NOSE_BRIDGE, NOSE_RIDGE, NOSTRILS,
            NOSE_OUTLINE,
        ];

        for feature in features {
            let contour = face.contour(feature);
            assert_eq!(contour.len(), feature.len());
            assert!(contour
                .iter()
                .zip(feature)
                .all(|(p, &i)| within_tolerance(p.x, i as f64, 1e-12)));
        }

        assert_eq!(face.contour(&[0, 10_000, 1]).len(), 2);
        assert!(within_tolerance(
            face.centroid().x,
            (NUM_FACE_LANDMARKS - 1) as f64 / 2.0,
            1e-9
        ));
    }

    #[test]
    fn test_chin_to_nose() {
        let mut points = vec![DVec3::ZERO; NUM_FACE_LANDMARKS];
        points[NOSE_TIP_LANDMARK_INDEX] = DVec3::new(0.5, 0.4, 0.0);
        points[CHIN_LANDMARK_INDEX] = DVec3::new(0.52, 0.47, 0.0);

        let face = FaceLandmarks::from_points(points).unwrap();
        let delta = face.chin_to_nose();

        assert!(within_tolerance(delta.x, 0.02, 1e-12));
        assert!(within_tolerance(delta.y, 0.07, 1e-12));
    }
}
