use clap::Parser;

use super::*;

/// Plays chords and notes from hand gestures tracked by an external
/// landmark detector.
#[derive(Parser, Clone, Debug)]
#[command(name = "handsynth")]
#[command(about = "Gesture-driven MIDI instrument with a CRT hand-tracking overlay")]
pub struct Arguments {
    /// UDP port to receive OSC landmark packets on
    #[arg(long, default_value_t = DEFAULT_OSC_PORT)]
    pub osc_port: u16,

    /// Bind to the first MIDI output whose name contains this (case-insensitive)
    #[arg(long)]
    pub midi_port: Option<String>,

    /// Width of the detector's camera frame, in pixels
    #[arg(long, default_value_t = DEFAULT_FRAME_WIDTH)]
    pub frame_width: u32,

    /// Height of the detector's camera frame, in pixels
    #[arg(long, default_value_t = DEFAULT_FRAME_HEIGHT)]
    pub frame_height: u32,

    /// Log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Run without MIDI output
    #[arg(long)]
    pub no_midi: bool,
}

impl Arguments {
    pub fn frame_dims(&self) -> gesture::FrameDims {
        gesture::FrameDims::new(
            <f64 as From<_>>::from(self.frame_width.max(1)),
            <f64 as From<_>>::from(self.frame_height.max(1)),
        )
    }
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            osc_port: DEFAULT_OSC_PORT,
            midi_port: None,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            debug: false,
            no_midi: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parsed_defaults() {
        let parsed = Arguments::parse_from(["handsynth"]);
        let default = Arguments::default();

        assert_eq!(parsed.osc_port, default.osc_port);
        assert_eq!(parsed.frame_width, default.frame_width);
        assert_eq!(parsed.frame_height, default.frame_height);
        assert!(parsed.midi_port.is_none());
        assert!(!parsed.no_midi);
    }

    #[test]
    fn test_flags() {
        let args = Arguments::parse_from([
            "handsynth",
            "--osc-port",
            "9100",
            "--midi-port",
            "iac",
            "--frame-width",
            "1280",
            "--no-midi",
        ]);

        assert_eq!(args.osc_port, 9100);
        assert_eq!(args.midi_port.as_deref(), Some("iac"));
        assert_eq!(args.frame_dims(), gesture::FrameDims::new(1280.0, 480.0));
        assert!(args.no_midi);
    }
}
