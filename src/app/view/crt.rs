//! Old-television effects layered over the overlay.

use super::*;
use noise::{NoiseFn, Perlin};
use rand::Rng;

const FADE_ALPHA: f32 = 0.22;
const SCANLINE_SPACING: f32 = 4.0;
const SCANLINE_SPEED: f32 = 30.0;
const NUM_NOISE_SPECKS: usize = 120;

const POP_CHANCE_PER_SEC: f64 = 0.8;
const POP_LIFETIME_SECS: f64 = 0.12;
const TEAR_CHANCE_PER_SEC: f64 = 0.5;
const TEAR_LIFETIME_SECS: f64 = 0.2;

const WIGGLE_RATE: f64 = 0.6;
const WIGGLE_AMOUNT: f32 = 3.0;

const POSTERIZE_LEVELS: f32 = 6.0;
const BRIGHTNESS: f32 = 1.2;
const BLACK_LEVEL: f32 = 75.0 / 255.0;

/// How far the red and blue ghosts sit from the main image, in pixels.
pub const CHROMATIC_OFFSET: f32 = 2.5;

/// A short burst of static.
#[derive(Clone, Copy, Debug)]
struct StaticPop {
    /// Normalized position in the window.
    pos: Vec2,
    radius: f32,
    age: f64,
}

/// A band of the image shifted sideways.
#[derive(Clone, Copy, Debug)]
struct TearBand {
    /// Normalized vertical position in the window.
    y: f32,
    height: f32,
    shift: f32,
    age: f64,
}

/// The tube's colour response: each channel is posterized into a few levels,
/// then brightened over a raised black level. Alpha is kept.
pub fn grade(col: Rgba) -> Rgba {
    let level = |v: f32| {
        let steps = POSTERIZE_LEVELS - 1.0;
        let q = (v.clamp(0.0, 1.0) * POSTERIZE_LEVELS).floor().min(steps);

        (q / steps * BRIGHTNESS).clamp(BLACK_LEVEL, 1.0)
    };

    Rgba::new(level(col.red), level(col.green), level(col.blue), col.alpha)
}

pub struct CrtEffects {
    perlin: Perlin,
    time: f64,
    pops: Vec<StaticPop>,
    tears: Vec<TearBand>,
}

impl CrtEffects {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            time: 0.0,
            pops: Vec::new(),
            tears: Vec::new(),
        }
    }

    /// The slow drift applied to the whole overlay.
    pub fn wiggle(&self) -> Vec2 {
        let t = self.time * WIGGLE_RATE;
        let x = self.perlin.get([t, 0.0]) as f32;
        let y = self.perlin.get([t, 17.3]) as f32;

        vec2(x, y) * WIGGLE_AMOUNT
    }

    /// The horizontal shift of a tear band covering `y` (in window
    /// coordinates), if any.
    pub fn tear_shift_at(&self, y: f32, rect: Rect) -> f32 {
        self.tears
            .iter()
            .find(|t| {
                let centre = rect.bottom() + t.y * rect.h();
                (y - centre).abs() <= t.height * 0.5
            })
            .map_or(0.0, |t| t.shift)
    }

    /// Draws a translucent black rectangle, so the last frames fade out into
    /// trails.
    pub fn draw_fade(&self, draw: &Draw, rect: Rect) {
        draw.rect()
            .xy(rect.xy())
            .wh(rect.wh())
            .color(grade(rgba(0.0, 0.0, 0.0, FADE_ALPHA)));
    }

    pub fn draw_scanlines(&self, draw: &Draw, rect: Rect) {
        let scroll = (self.time as f32 * SCANLINE_SPEED) % SCANLINE_SPACING;
        let mut y = rect.bottom() + scroll;

        while y < rect.top() {
            draw.line()
                .start(pt2(rect.left(), y))
                .end(pt2(rect.right(), y))
                .weight(1.0)
                .color(rgba(0.0, 0.0, 0.0, 0.35));

            y += SCANLINE_SPACING;
        }
    }

    /// Scattered specks, different every frame.
    pub fn draw_noise(&self, draw: &Draw, rect: Rect) {
        // a minimised window can report an empty frame
        if rect.w() <= 0.0 || rect.h() <= 0.0 {
            return;
        }

        let mut rng = rand::rng();

        for _ in 0..NUM_NOISE_SPECKS {
            let x = rng.random_range(rect.left()..rect.right());
            let y = rng.random_range(rect.bottom()..rect.top());
            let v = rng.random_range(0.3..1.0);

            draw.rect()
                .x_y(x, y)
                .w_h(1.5, 1.5)
                .color(rgba(v, v, v, 0.25));
        }
    }

    pub fn draw_pops(&self, draw: &Draw, rect: Rect) {
        let mut rng = rand::rng();

        for pop in &self.pops {
            let fade = 1.0 - (pop.age / POP_LIFETIME_SECS) as f32;
            let centre = pt2(
                rect.left() + pop.pos.x * rect.w(),
                rect.bottom() + pop.pos.y * rect.h(),
            );

            for _ in 0..40 {
                let offset = vec2(
                    rng.random_range(-pop.radius..pop.radius),
                    rng.random_range(-pop.radius..pop.radius),
                );
                let v = rng.random_range(0.5..1.0);

                draw.rect()
                    .xy(centre + offset)
                    .w_h(2.0, 2.0)
                    .color(rgba(v, v, v, 0.6 * fade));
            }
        }
    }

    pub fn draw_tears(&self, draw: &Draw, rect: Rect) {
        for tear in &self.tears {
            let y = rect.bottom() + tear.y * rect.h();

            draw.rect()
                .x_y(tear.shift, y)
                .w_h(rect.w(), tear.height)
                .color(rgba(0.8, 0.9, 1.0, 0.06));
        }
    }

    fn spawn(&mut self, dt: f64) {
        let mut rng = rand::rng();

        if rng.random_bool((POP_CHANCE_PER_SEC * dt).clamp(0.0, 1.0)) {
            self.pops.push(StaticPop {
                pos: vec2(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)),
                radius: rng.random_range(10.0..40.0),
                age: 0.0,
            });
        }

        if rng.random_bool((TEAR_CHANCE_PER_SEC * dt).clamp(0.0, 1.0)) {
            self.tears.push(TearBand {
                y: rng.random_range(0.0..1.0),
                height: rng.random_range(4.0..24.0),
                shift: rng.random_range(-12.0..12.0),
                age: 0.0,
            });
        }
    }
}

impl Updatable for CrtEffects {
    fn update(&mut self, update: &Update) {
        let dt = update.since_last.as_secs_f64();
        self.time += dt;

        for pop in &mut self.pops {
            pop.age += dt;
        }
        for tear in &mut self.tears {
            tear.age += dt;
        }

        self.pops.retain(|p| p.age < POP_LIFETIME_SECS);
        self.tears.retain(|t| t.age < TEAR_LIFETIME_SECS);

        self.spawn(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_posterizes_over_a_black_level() {
        let black = grade(rgba(0.0, 0.0, 0.0, 0.5));
        assert!((black.red - BLACK_LEVEL).abs() < f32::EPSILON);
        assert!((black.alpha - 0.5).abs() < f32::EPSILON);

        let white = grade(rgba(1.0, 1.0, 1.0, 1.0));
        assert!((white.green - 1.0).abs() < f32::EPSILON);

        // 0.5 falls in the fourth of six levels, then brightens
        let mid = grade(rgba(0.5, 0.52, 0.4, 1.0));
        assert!((mid.red - 0.72).abs() < 1e-6);
        assert!((mid.green - 0.72).abs() < 1e-6);
        assert!((mid.blue - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_wiggle_is_small() {
        let mut crt = CrtEffects::new(7);

        for i in 0..100 {
            crt.time = <f64 as From<_>>::from(i) * 0.37;
            let w = crt.wiggle();

            assert!(w.x.abs() <= WIGGLE_AMOUNT * 1.5);
            assert!(w.y.abs() <= WIGGLE_AMOUNT * 1.5);
        }
    }

    #[test]
    fn test_noise_skips_an_empty_frame() {
        let crt = CrtEffects::new(3);
        let draw = Draw::new();

        crt.draw_noise(&draw, Rect::from_w_h(0.0, 0.0));
        crt.draw_noise(&draw, Rect::from_w_h(640.0, 0.0));
        crt.draw_noise(&draw, Rect::from_w_h(640.0, 480.0));
    }

    #[test]
    fn test_tears_shift_only_their_band() {
        let mut crt = CrtEffects::new(1);
        let rect = Rect::from_w_h(640.0, 480.0);

        crt.tears.push(TearBand { y: 0.5, height: 20.0, shift: 8.0, age: 0.0 });

        assert!((crt.tear_shift_at(0.0, rect) - 8.0).abs() < f32::EPSILON);
        assert!(crt.tear_shift_at(100.0, rect).abs() < f32::EPSILON);
    }
}
