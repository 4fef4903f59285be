//! A backend which records every command, for tests.

use super::*;

#[derive(Clone, Debug, PartialEq)]
pub enum SynthCommand {
    SetVolume(Side, f64),
    StartPitches(Side, Vec<Pitch>),
    StartPitch(Side, Pitch),
    StopPitches(Side),
    StopAllPitches(Side),
    StartArpeggiator(Vec<Pitch>, Subdivision),
    StopArpeggiator,
    SetAccompanimentEnabled(bool),
    SetArpeggiatorSpeed(f64),
}

impl SynthCommand {
    pub const fn is_volume(&self) -> bool {
        matches!(self, Self::SetVolume(..))
    }
}

#[derive(Debug, Default)]
pub struct RecordingSynth {
    pub commands: Vec<SynthCommand>,
}

impl RecordingSynth {
    /// Takes every recorded command except volume changes.
    pub fn take_triggers(&mut self) -> Vec<SynthCommand> {
        std::mem::take(&mut self.commands)
            .into_iter()
            .filter(|c| !c.is_volume())
            .collect()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn last_volume(&self, channel: Side) -> Option<f64> {
        self.commands.iter().rev().find_map(|c| match c {
            SynthCommand::SetVolume(ch, db) if *ch == channel => Some(*db),
            _ => None,
        })
    }
}

impl SynthBackend for RecordingSynth {
    fn set_volume(&mut self, channel: Side, db: f64) {
        self.commands.push(SynthCommand::SetVolume(channel, db));
    }

    fn start_pitches(&mut self, channel: Side, pitches: &[Pitch]) {
        self.commands
            .push(SynthCommand::StartPitches(channel, pitches.to_vec()));
    }

    fn start_pitch(&mut self, channel: Side, pitch: Pitch) {
        self.commands.push(SynthCommand::StartPitch(channel, pitch));
    }

    fn stop_pitches(&mut self, channel: Side) {
        self.commands.push(SynthCommand::StopPitches(channel));
    }

    fn stop_all_pitches(&mut self, channel: Side) {
        self.commands.push(SynthCommand::StopAllPitches(channel));
    }

    fn start_arpeggiator(&mut self, pitches: &[Pitch], subdivision: Subdivision) {
        self.commands.push(SynthCommand::StartArpeggiator(
            pitches.to_vec(),
            subdivision,
        ));
    }

    fn stop_arpeggiator(&mut self) {
        self.commands.push(SynthCommand::StopArpeggiator);
    }

    fn set_accompaniment_enabled(&mut self, enabled: bool) {
        self.commands.push(SynthCommand::SetAccompanimentEnabled(enabled));
    }

    fn set_arpeggiator_speed(&mut self, hz: f64) {
        self.commands.push(SynthCommand::SetArpeggiatorSpeed(hz));
    }
}
