//! All app-related state and logic.

use crate::prelude::*;
use nannou::prelude::*;
use nannou::LoopMode::RefreshSync;
use std::sync::OnceLock;

pub mod args;
pub mod gesture;
pub mod hands;
pub mod keys;
pub mod midi;
mod model;
pub mod musical;
pub mod osc;
pub mod synth;
pub mod update;
pub mod view;

pub use model::Model;
use update::update;

/// Nannou builds the model from a plain function, so the parsed arguments
/// are handed over through here.
static ARGUMENTS: OnceLock<args::Arguments> = OnceLock::new();

/// Runs the app via Nannou.
pub fn run_app(args: args::Arguments) {
    _ = ARGUMENTS.set(args);

    nannou::app(model::Model::build)
        .loop_mode(RefreshSync)
        .update(update)
        .exit(model::exit)
        .run();
}

fn arguments() -> args::Arguments {
    ARGUMENTS.get().cloned().unwrap_or_default()
}

pub trait Updatable {
    fn update(&mut self, update: &Update);
}

pub trait Drawable {
    fn draw(&self, draw: &Draw, frame: &Frame);
}
