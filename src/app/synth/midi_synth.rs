//! A [`SynthBackend`] which plays through an external MIDI synth.

use super::arpeggiator::Arpeggiator;
use super::*;
use crate::app::midi::message::VOLUME_CONTROLLER;
use crate::app::midi::MIDIMessage;
use std::sync::{atomic::Ordering, Arc};

/// The accompaniment's step length.
const ACCOMPANIMENT_SUBDIVISION: Subdivision = Subdivision::Eighth;

/// The MIDI channel for a hand.
pub const fn channel_for(side: Side) -> u8 {
    match side {
        Side::Left => CHORD_CHANNEL,
        Side::Right => NOTE_CHANNEL,
    }
}

/// Converts a volume in decibels into a 7-bit controller value.
pub fn db_to_controller_value(db: f64) -> u8 {
    let level = db_to_level(db).clamp(0.0, 1.0);
    (level * 127.0).round() as u8
}

/// Plays each hand on its own channel, with the chord arpeggio on the chord
/// hand's channel and an accompaniment arpeggio on a third channel.
///
/// Messages are queued on a channel which a
/// [`MIDISenderTimedThread`](crate::app::midi::MIDISenderTimedThread) drains.
pub struct MidiSynth {
    sender: CCSender<Vec<MIDIMessage>>,
    /// Notes currently held per hand, indexed by `Side::index()`.
    held: [Vec<u8>; 2],
    /// The last volume controller value sent per hand.
    volume: [Option<u8>; 2],
    transport_hz: Arc<AtomicF64>,
    chord_arp: Arpeggiator,
    accompaniment: Arpeggiator,
    accompaniment_enabled: bool,
}

impl MidiSynth {
    pub fn new(sender: CCSender<Vec<MIDIMessage>>) -> Self {
        let transport_hz = Arc::new(AtomicF64::new(DEFAULT_ARP_SPEED_HZ));

        let chord_arp = Arpeggiator::new(
            CHORD_CHANNEL,
            crate::app::gesture::voice::ARPEGGIO_SUBDIVISION,
            Arc::clone(&transport_hz),
            sender.clone(),
        );
        let accompaniment = Arpeggiator::new(
            ACCOMPANIMENT_CHANNEL,
            ACCOMPANIMENT_SUBDIVISION,
            Arc::clone(&transport_hz),
            sender.clone(),
        );

        let synth = Self {
            sender,
            held: [Vec::new(), Vec::new()],
            volume: [None; 2],
            transport_hz,
            chord_arp,
            accompaniment,
            accompaniment_enabled: false,
        };

        synth.send(vec![
            MIDIMessage::program_change(CHORD_PROGRAM, CHORD_CHANNEL),
            MIDIMessage::program_change(NOTE_PROGRAM, NOTE_CHANNEL),
            MIDIMessage::program_change(
                ACCOMPANIMENT_PROGRAM,
                ACCOMPANIMENT_CHANNEL,
            ),
        ]);

        synth
    }

    fn send(&self, msgs: Vec<MIDIMessage>) {
        if !msgs.is_empty() && self.sender.send(msgs).is_err() {
            log::warn!("MIDI channel closed, dropping messages");
        }
    }

    fn note_ons(&mut self, side: Side, pitches: &[Pitch]) {
        let ch = channel_for(side);
        let mut msgs = self.note_offs(side);

        for pitch in pitches {
            let Some(note) = pitch.midi_note() else {
                log::debug!("{pitch} is outside the MIDI note range");
                continue;
            };

            msgs.push(MIDIMessage::note_on(note, NOTE_VELOCITY, ch));
            self.held[side.index()].push(note);
        }

        self.send(msgs);
    }

    /// Note offs for everything held on a channel, which is then forgotten.
    fn note_offs(&mut self, side: Side) -> Vec<MIDIMessage> {
        let ch = channel_for(side);

        self.held[side.index()]
            .drain(..)
            .map(|note| MIDIMessage::note_off(note, ch))
            .collect()
    }

    /// Keeps the accompaniment in step with the note hand.
    fn update_accompaniment(&mut self) {
        let root = self.held[Side::Right.index()].first().copied();

        match root {
            Some(note) if self.accompaniment_enabled => {
                let mut notes = vec![note];

                if note <= 127 - 12 {
                    notes.push(note + 12);
                }

                if self.accompaniment.notes() != notes {
                    self.accompaniment.set_notes(notes);
                }
            }
            _ => {
                if self.accompaniment.is_running() {
                    self.accompaniment.stop();
                }
            }
        }
    }
}

impl SynthBackend for MidiSynth {
    fn set_volume(&mut self, channel: Side, db: f64) {
        let value = db_to_controller_value(db);
        let last = &mut self.volume[channel.index()];

        if *last == Some(value) {
            return;
        }

        *last = Some(value);
        self.send(vec![MIDIMessage::control_change(
            VOLUME_CONTROLLER,
            value,
            channel_for(channel),
        )]);
    }

    fn start_pitches(&mut self, channel: Side, pitches: &[Pitch]) {
        self.note_ons(channel, pitches);

        if channel == Side::Right {
            self.update_accompaniment();
        }
    }

    fn start_pitch(&mut self, channel: Side, pitch: Pitch) {
        self.start_pitches(channel, &[pitch]);
    }

    fn stop_pitches(&mut self, channel: Side) {
        let msgs = self.note_offs(channel);
        self.send(msgs);

        if channel == Side::Right {
            self.update_accompaniment();
        }
    }

    fn stop_all_pitches(&mut self, channel: Side) {
        let mut msgs = self.note_offs(channel);
        msgs.push(MIDIMessage::all_notes_off(channel_for(channel)));
        self.send(msgs);

        if channel == Side::Right {
            self.update_accompaniment();
        }
    }

    fn start_arpeggiator(&mut self, pitches: &[Pitch], subdivision: Subdivision) {
        if subdivision != crate::app::gesture::voice::ARPEGGIO_SUBDIVISION {
            log::debug!("ignoring arpeggio subdivision {subdivision}");
        }

        let notes = pitches.iter().filter_map(|p| p.midi_note()).collect();
        self.chord_arp.start(notes);
    }

    fn stop_arpeggiator(&mut self) {
        self.chord_arp.stop();
    }

    fn set_accompaniment_enabled(&mut self, enabled: bool) {
        self.accompaniment_enabled = enabled;
        self.update_accompaniment();
    }

    fn set_arpeggiator_speed(&mut self, hz: f64) {
        let hz = hz.clamp(MIN_ARP_SPEED_HZ, MAX_ARP_SPEED_HZ);
        self.transport_hz.store(hz, Ordering::Relaxed);

        self.chord_arp.update_rate();
        self.accompaniment.update_rate();
    }
}

impl Drop for MidiSynth {
    fn drop(&mut self) {
        self.chord_arp.stop();
        self.accompaniment.stop();

        let mut msgs = Vec::new();

        for side in Side::ALL {
            msgs.extend(self.note_offs(side));
            msgs.push(MIDIMessage::all_notes_off(channel_for(side)));
        }

        msgs.push(MIDIMessage::all_notes_off(ACCOMPANIMENT_CHANNEL));
        self.send(msgs);
    }
}
