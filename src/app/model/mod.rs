//! The whole app's state.

use super::view::{crt::CrtEffects, view};
use super::*;
use anyhow::Context;
use gesture::GestureEngine;
use hands::{DetectionFeed, FrameLandmarks, Side};
use midi::MIDISenderTimedThread;
use nannou::prelude::WindowId as Id;
use osc::OSCReceiver;
use std::time::Instant;
use synth::SynthBackend;

mod constructors;
use constructors::*;

/// The app's model, i.e. its state.
pub struct Model {
    window: Id,
    args: args::Arguments,

    feed: DetectionFeed,
    /// The landmarks the engine last ran on.
    pub frame: FrameLandmarks,
    pub engine: GestureEngine,

    synth: Box<dyn SynthBackend>,
    /// Declared after `synth` so that the synth's final note offs are sent
    /// before this thread is dropped.
    midi_thread: Option<MIDISenderTimedThread>,
    midi_port_name: Option<String>,

    pub crt: CrtEffects,
    pub show_hud: bool,
    pub show_guides: bool,
}

impl Model {
    /// Builds the app's `Model`. Exits the process if the window or the OSC
    /// socket cannot be set up.
    pub fn build(app: &App) -> Self {
        match Self::try_build(app) {
            Ok(model) => model,
            Err(e) => {
                log::error!("{e:#}");
                std::process::exit(1);
            }
        }
    }

    fn try_build(app: &App) -> anyhow::Result<Self> {
        let args = arguments();
        let dims = args.frame_dims();

        let engine =
            GestureEngine::new(dims).context("failed to read pitch tables")?;
        let window = build_window(app, args.frame_width, args.frame_height)?;

        let receiver = OSCReceiver::with_port(args.osc_port).with_context(
            || format!("failed to bind OSC port {}", args.osc_port),
        )?;

        let mut feed = DetectionFeed::new(receiver);
        feed.start();

        let SynthSystem { synth, midi_thread } = build_synth_system(&args);
        let midi_port_name =
            midi_thread.as_ref().map(MIDISenderTimedThread::bound_port_name);

        Ok(Self {
            window,

            feed,
            frame: FrameLandmarks::empty(Instant::now()),
            engine,

            synth,
            midi_thread,
            midi_port_name,

            crt: CrtEffects::new(rand::random()),
            show_hud: true,
            show_guides: true,

            args,
        })
    }

    pub const fn window(&self) -> Id {
        self.window
    }

    /// Stops everything that is sounding.
    pub fn panic(&mut self) {
        log::info!("stopping all notes");
        self.engine.full_clear(self.synth.as_mut());
    }

    /// Stops the detection feed and silences the synth.
    pub fn shutdown(&mut self) {
        self.feed.stop();
        self.engine.full_clear(self.synth.as_mut());
        self.synth.set_accompaniment_enabled(false);
    }

    pub fn format_hud(&self) -> String {
        let mode = self.engine.mode_state();

        let mut lines = vec![
            format!(
                "mode: {}   arpeggio: {:.2} Hz{}",
                mode.phase,
                mode.arpeggiator_speed_hz,
                if mode.speed_locked { " (locked)" } else { "" }
            ),
            self.format_voice(Side::Left),
            self.format_voice(Side::Right),
        ];

        lines.push(format!(
            "OSC port {}   MIDI: {}",
            self.args.osc_port,
            self.midi_port_name.as_deref().unwrap_or("off"),
        ));

        if self.engine.is_idle() {
            lines.push(String::from("waiting for hands"));
        }

        lines.join("\n")
    }

    fn format_voice(&self, side: Side) -> String {
        let state = self.engine.voice(side).state();

        match (state.last_zone(), state.pitches()) {
            (Some(zone), Some(pitches)) => format!(
                "{side}: zone {} {}{}",
                zone + 1,
                gesture::voice::format_pitches(pitches),
                if state.is_arpeggiating() { " (arp)" } else { "" }
            ),
            _ => format!("{side}: -"),
        }
    }
}

impl Updatable for Model {
    fn update(&mut self, update: &Update) {
        self.frame = self.feed.latest().clone();
        self.engine.tick(&self.frame, Instant::now(), self.synth.as_mut());
        self.crt.update(update);
    }
}

impl Drawable for Model {
    fn draw(&self, draw: &Draw, frame: &Frame) {
        if !self.show_hud {
            return;
        }

        let r = frame.rect();
        let hud = self.format_hud();

        draw.text(&hud)
            .color(Rgba::new(0.6, 1.0, 0.6, 0.8))
            .line_spacing(4.0)
            .left_justify()
            .align_text_top()
            .xy(vec2(r.left() + 170.0, r.top() - 60.0))
            .wh(vec2(320.0, 100.0))
            .font_size(12);
    }
}

/// Nannou's exit callback.
pub fn exit(_app: &App, mut model: Model) {
    log::info!("shutting down");
    model.shutdown();
}
