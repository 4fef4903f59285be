//! A timer-driven arpeggiator which plays an up-down pattern on one MIDI
//! channel.

use super::*;
use crate::app::midi::MIDIMessage;
use crate::app::musical::UpDownPattern;
use std::sync::{atomic::Ordering, Arc, Mutex};

#[derive(Debug, Default)]
struct ArpState {
    pattern: UpDownPattern,
    sounding: Option<u8>,
}

impl ArpState {
    /// Releases the sounding note and plays the next one in the pattern.
    fn step(&mut self, channel: u8) -> Vec<MIDIMessage> {
        let mut msgs = self.release(channel);

        if let Some(note) = self.pattern.next_note() {
            msgs.push(MIDIMessage::note_on(note, NOTE_VELOCITY, channel));
            self.sounding = Some(note);
        }

        msgs
    }

    fn release(&mut self, channel: u8) -> Vec<MIDIMessage> {
        self.sounding
            .take()
            .map(|note| MIDIMessage::note_off(note, channel))
            .into_iter()
            .collect()
    }
}

pub struct Arpeggiator {
    channel: u8,
    subdivision: Subdivision,
    /// Shared transport rate in beats per second.
    transport_hz: Arc<AtomicF64>,
    state: Arc<Mutex<ArpState>>,
    sender: CCSender<Vec<MIDIMessage>>,
    timer: TimerThread,
}

impl Arpeggiator {
    pub fn new(
        channel: u8,
        subdivision: Subdivision,
        transport_hz: Arc<AtomicF64>,
        sender: CCSender<Vec<MIDIMessage>>,
    ) -> Self {
        let state = Arc::new(Mutex::new(ArpState::default()));

        let cb_state = Arc::clone(&state);
        let cb_sender = sender.clone();

        let timer = TimerThread::new(move || {
            if let Ok(mut state) = cb_state.lock() {
                let msgs = state.step(channel);

                if !msgs.is_empty() {
                    _ = cb_sender.send(msgs);
                }
            }
        });

        Self { channel, subdivision, transport_hz, state, sender, timer }
    }

    /// Starts (or restarts) the arpeggio over `notes`. The first note plays
    /// straight away.
    pub fn start(&mut self, notes: Vec<u8>) {
        self.timer.stop();

        if notes.is_empty() {
            self.send(self.with_state(|state, ch| {
                state.pattern.set_notes(Vec::new());
                state.release(ch)
            }));
            return;
        }

        let msgs = self.with_state(|state, ch| {
            state.pattern.set_notes(notes);
            state.step(ch)
        });

        self.send(msgs);
        self.timer.start_hz(self.step_rate_hz());
    }

    /// Replaces the notes without restarting the timer, so the arpeggio
    /// keeps its rhythm.
    pub fn set_notes(&mut self, notes: Vec<u8>) {
        if !self.is_running() {
            self.start(notes);
            return;
        }

        _ = self.with_state(|state, _| {
            state.pattern.set_notes(notes);
            Vec::new()
        });
    }

    /// Stops the arpeggio and releases its sounding note.
    pub fn stop(&mut self) {
        self.timer.stop();

        let msgs = self.with_state(|state, ch| {
            state.pattern.set_notes(Vec::new());
            state.release(ch)
        });

        self.send(msgs);
    }

    /// Picks up a change in the transport rate.
    pub fn update_rate(&self) {
        if self.is_running() {
            self.timer.set_rate_hz(self.step_rate_hz());
        }
    }

    pub fn notes(&self) -> Vec<u8> {
        self.state
            .lock()
            .map(|state| state.pattern.notes().to_vec())
            .unwrap_or_default()
    }

    pub const fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn step_rate_hz(&self) -> f64 {
        self.subdivision
            .step_rate_hz(self.transport_hz.load(Ordering::Relaxed))
    }

    fn with_state(
        &self,
        f: impl FnOnce(&mut ArpState, u8) -> Vec<MIDIMessage>,
    ) -> Vec<MIDIMessage> {
        match self.state.lock() {
            Ok(mut state) => f(&mut state, self.channel),
            Err(_) => {
                log::error!("arpeggiator state was poisoned");
                Vec::new()
            }
        }
    }

    fn send(&self, msgs: Vec<MIDIMessage>) {
        if !msgs.is_empty() && self.sender.send(msgs).is_err() {
            log::warn!("MIDI channel closed, dropping arpeggiator messages");
        }
    }
}

impl Drop for Arpeggiator {
    fn drop(&mut self) {
        self.stop();
    }
}
