//! App constructors.

use super::*;
use anyhow::anyhow;
use midi::MIDISender;
use synth::{MidiSynth, NullSynth};

/// Builds the app window, sized to the detector's frame.
pub fn build_window(app: &App, width: u32, height: u32) -> anyhow::Result<Id> {
    app.new_window()
        .size(width, height)
        .resizable(false)
        .msaa_samples(1)
        .key_pressed(keys::key_pressed)
        .view(view)
        .title("handsynth")
        .build()
        .map_err(|e| anyhow!("failed to build app window: {e:?}"))
}

pub struct SynthSystem {
    pub(super) synth: Box<dyn SynthBackend>,
    pub(super) midi_thread: Option<MIDISenderTimedThread>,
}

/// Connects to a MIDI output and starts its send thread, or falls back to a
/// silent synth if MIDI is disabled or unavailable.
pub fn build_synth_system(args: &args::Arguments) -> SynthSystem {
    let silent = || SynthSystem { synth: Box::new(NullSynth), midi_thread: None };

    if args.no_midi {
        log::info!("MIDI output disabled");
        return silent();
    }

    match MIDISender::connect("handsynth", args.midi_port.as_deref()) {
        Ok(sender) => {
            let (tx, rx) = unbounded_channel();

            let mut midi_thread = MIDISenderTimedThread::new(sender, rx);
            midi_thread.start_send();

            SynthSystem {
                synth: Box::new(MidiSynth::new(tx)),
                midi_thread: Some(midi_thread),
            }
        }
        Err(e) => {
            log::warn!("no MIDI output, running silently: {e:#}");
            silent()
        }
    }
}
