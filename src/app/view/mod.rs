//! The view callback, i.e. "draw loop", and the hand-tracking overlay.

use super::*;
use crt::grade;
use hands::face::*;
use hands::{HandRecord, Side, HAND_CONNECTIONS};
use musical::CHORD_NAMES;

pub mod crt;

const fn color(r: f32, g: f32, b: f32, a: f32) -> Rgba {
    Rgba {
        color: rgb::Rgb {
            red: r,
            green: g,
            blue: b,
            standard: std::marker::PhantomData,
        },
        alpha: a,
    }
}

pub const LEFT_HAND_COLOR: Rgba = color(1.0, 0.9, 0.2, 1.0);
pub const RIGHT_HAND_COLOR: Rgba = color(0.3, 0.6, 1.0, 1.0);
pub const GUIDE_COLOR: Rgba = color(0.4, 1.0, 0.5, 0.35);

const GHOST_RED: Rgba = color(1.0, 0.1, 0.1, 0.35);
const GHOST_BLUE: Rgba = color(0.1, 0.3, 1.0, 0.35);

/// How a facial feature contour is drawn.
struct FeatureStyle {
    indices: &'static [usize],
    stroke: Option<Rgba>,
    fill: Option<Rgba>,
    weight: f32,
}

const fn outline(
    indices: &'static [usize],
    stroke: Rgba,
    weight: f32,
) -> FeatureStyle {
    FeatureStyle { indices, stroke: Some(stroke), fill: None, weight }
}

const fn mask(indices: &'static [usize], fill: Rgba) -> FeatureStyle {
    FeatureStyle { indices, stroke: None, fill: Some(fill), weight: 0.0 }
}

const EYE_STROKE: Rgba = color(0.14, 1.0, 0.2, 0.14);
const BROW_STROKE: Rgba = color(0.08, 0.14, 0.08, 0.14);
const NOSE_STROKE: Rgba = color(0.69, 0.69, 0.69, 0.14);
const EYE_MASK: Rgba = color(1.0, 0.88, 0.88, 1.0);

/// The face, back to front. The eye and mouth masks go on last.
const FACE_FEATURES: [FeatureStyle; 14] = [
    outline(FACE_OUTLINE, color(1.0, 1.0, 1.0, 1.0), 3.0),
    FeatureStyle {
        indices: OUTER_LIPS,
        stroke: Some(color(1.0, 0.0, 0.2, 0.06)),
        fill: Some(color(1.0, 0.18, 0.0, 0.37)),
        weight: 3.0,
    },
    outline(INNER_LIPS, color(0.92, 1.0, 0.2, 0.14), 2.0),
    outline(LEFT_EYE, EYE_STROKE, 1.0),
    outline(RIGHT_EYE, EYE_STROKE, 1.0),
    FeatureStyle {
        indices: LEFT_EYEBROW,
        stroke: Some(BROW_STROKE),
        fill: Some(color(0.0, 0.0, 0.0, 1.0)),
        weight: 2.0,
    },
    FeatureStyle {
        indices: RIGHT_EYEBROW,
        stroke: Some(BROW_STROKE),
        fill: Some(color(0.0, 0.0, 0.0, 1.0)),
        weight: 2.0,
    },
    outline(NOSE_BRIDGE, NOSE_STROKE, 2.0),
    outline(NOSTRILS, NOSE_STROKE, 2.0),
    outline(NOSE_RIDGE, NOSE_STROKE, 2.0),
    outline(NOSE_OUTLINE, NOSE_STROKE, 2.0),
    mask(LEFT_EYE, EYE_MASK),
    mask(RIGHT_EYE, EYE_MASK),
    mask(INNER_LIPS, color(0.1, 0.08, 0.02, 1.0)),
];

/// The app's view callback (AKA "draw loop").
pub fn view(app: &App, model: &Model, frame: Frame) {
    if frame.nth() == 0 {
        frame.clear(BLACK);
    }

    let rect = frame.rect();
    let draw = &app.draw();

    model.crt.draw_fade(draw, rect);

    let overlay = draw.translate(model.crt.wiggle().extend(0.0));

    if model.show_guides {
        draw_guides(&overlay, rect);
    }

    if let Some(face) = &model.frame.face {
        draw_face(&overlay, face, rect);
    }

    // a frozen detector leaves its last hands in the frame
    let hands_live = !model.engine.is_idle();

    for side in Side::ALL {
        if let Some(hand) = model.frame.hand(side).filter(|_| hands_live) {
            let sounding = model.engine.voice(side).state().is_sounding();
            let tip = landmark_to_window(hand.index_tip(), rect);
            let shift = vec2(model.crt.tear_shift_at(tip.y, rect), 0.0);

            draw_hand(&overlay, hand, rect, sounding, shift);
        }
    }

    model.crt.draw_scanlines(draw, rect);
    model.crt.draw_noise(draw, rect);
    model.crt.draw_pops(draw, rect);
    model.crt.draw_tears(draw, rect);

    model.draw(draw, &frame);

    _ = draw.to_frame(app, &frame);
}

/// Converts a normalized landmark into window coordinates, mirrored so the
/// overlay reads like a mirror.
pub fn landmark_to_window(point: DVec3, rect: Rect) -> Vec2 {
    vec2(
        ((0.5 - point.x) * <f64 as From<_>>::from(rect.w())) as f32,
        ((0.5 - point.y) * <f64 as From<_>>::from(rect.h())) as f32,
    )
}

const fn hand_color(side: Side) -> Rgba {
    match side {
        Side::Left => LEFT_HAND_COLOR,
        Side::Right => RIGHT_HAND_COLOR,
    }
}

fn draw_hand(
    draw: &Draw,
    hand: &HandRecord,
    rect: Rect,
    sounding: bool,
    shift: Vec2,
) {
    let points: Vec<Vec2> = hand
        .landmarks
        .iter()
        .map(|p| landmark_to_window(*p, rect) + shift)
        .collect();

    let mut col = grade(hand_color(hand.side));
    col.alpha = if sounding { 1.0 } else { 0.45 };

    let ghost = vec2(crt::CHROMATIC_OFFSET, 0.0);

    draw_skeleton(draw, &points, -ghost, GHOST_RED, 1.0);
    draw_skeleton(draw, &points, ghost, GHOST_BLUE, 1.0);
    draw_skeleton(draw, &points, Vec2::ZERO, col, 2.0);
}

fn draw_skeleton(
    draw: &Draw,
    points: &[Vec2],
    offset: Vec2,
    col: Rgba,
    weight: f32,
) {
    for &(a, b) in &HAND_CONNECTIONS {
        let (Some(&start), Some(&end)) = (points.get(a), points.get(b)) else {
            continue;
        };

        draw.line()
            .start(start + offset)
            .end(end + offset)
            .weight(weight)
            .color(col);
    }

    let dims = Vec2::splat(weight * 3.0);

    for p in points {
        draw.ellipse().xy(*p + offset).wh(dims).color(col);
    }
}

/// Draws the face as closed feature contours, re-centred on the middle of the
/// window.
fn draw_face(draw: &Draw, face: &FaceLandmarks, rect: Rect) {
    let recentre = DVec3::new(0.5, 0.5, 0.0) - face.centroid();

    for feature in &FACE_FEATURES {
        let points: Vec<Vec2> = face
            .contour(feature.indices)
            .into_iter()
            .map(|p| landmark_to_window(p + recentre, rect))
            .collect();

        if points.len() < 3 {
            continue;
        }

        if let Some(fill) = feature.fill {
            draw.polygon().color(grade(fill)).points(points.iter().copied());
        }

        if let Some(stroke) = feature.stroke {
            draw.polyline()
                .weight(feature.weight)
                .color(grade(stroke))
                .points_closed(points.iter().copied());
        }
    }
}

/// The edge margin and the zone dividers, with each zone's chord name.
fn draw_guides(draw: &Draw, rect: Rect) {
    let mx = rect.w() * EDGE_MARGIN_RATIO as f32;
    let my = rect.h() * EDGE_MARGIN_RATIO as f32;

    draw.rect()
        .xy(rect.xy())
        .w_h(rect.w() - 2.0 * mx, rect.h() - 2.0 * my)
        .no_fill()
        .stroke_color(grade(GUIDE_COLOR))
        .stroke_weight(1.0);

    let zone_w = 1.0 / NUM_ZONES as f64;

    for zone in 0..NUM_ZONES {
        let left = zone as f64 * zone_w;

        if zone > 0 {
            let x = landmark_to_window(DVec3::new(left, 0.0, 0.0), rect).x;

            draw.line()
                .start(pt2(x, rect.bottom() + my))
                .end(pt2(x, rect.top() - my))
                .weight(1.0)
                .color(grade(GUIDE_COLOR));
        }

        let centre = landmark_to_window(
            DVec3::new(left + zone_w * 0.5, 0.0, 0.0),
            rect,
        );

        draw.text(CHORD_NAMES[zone])
            .x_y(centre.x, rect.bottom() + my + 14.0)
            .font_size(12)
            .color(grade(GUIDE_COLOR));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmarks_are_mirrored() {
        let rect = Rect::from_w_h(640.0, 480.0);

        let top_left = landmark_to_window(DVec3::new(0.0, 0.0, 0.0), rect);
        assert_eq!(top_left, vec2(320.0, 240.0));

        let centre = landmark_to_window(DVec3::new(0.5, 0.5, 0.0), rect);
        assert_eq!(centre, Vec2::ZERO);

        let bottom_right = landmark_to_window(DVec3::new(1.0, 1.0, 0.0), rect);
        assert_eq!(bottom_right, vec2(-320.0, -240.0));
    }
}
