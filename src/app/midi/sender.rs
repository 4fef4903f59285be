use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context};
use midir::{MidiOutput, MidiOutputConnection, MidiOutputPort};

use super::*;

const MIDI_QUEUE_PREALLOC_SIZE: usize = 8192;

pub struct MIDISender {
    output: MidiOutputConnection,
    bound_port_name: String,
    queue: Vec<u8>,
}

impl MIDISender {
    /// Returns a new `MIDISender` bound to the first MIDI port whose name
    /// contains `port_substring` (case-insensitive), or to the first port if
    /// no substring is given.
    ///
    /// # Errors
    ///
    /// Returns an error if a MIDI output could not be created, if there are no
    /// MIDI ports, if no port name contained the substring, or if the
    /// connection failed.
    pub fn connect(
        name: &str,
        port_substring: Option<&str>,
    ) -> anyhow::Result<Self> {
        let output = MidiOutput::new(name)
            .context("failed to create a MIDI output")?;

        let ports = output.ports();

        if ports.is_empty() {
            return Err(anyhow!("no MIDI ports were found"));
        }

        let port = match port_substring {
            Some(substr) => find_port(&output, &ports, substr).ok_or_else(|| {
                anyhow!("no MIDI port contained the substring \"{substr}\"")
            })?,
            None => ports[0].clone(),
        };

        let bound_port_name = output
            .port_name(&port)
            .unwrap_or_else(|_| String::from("UNKNOWN"));

        let output = output
            .connect(&port, &format!("{name}_port"))
            .map_err(|e| anyhow!("failed to connect to \"{bound_port_name}\": {e}"))?;

        log::info!("bound to MIDI port \"{bound_port_name}\"");

        Ok(Self {
            output,
            bound_port_name,
            queue: Vec::with_capacity(MIDI_QUEUE_PREALLOC_SIZE),
        })
    }

    /// Enqueues the provided message to an internal queue, ready to be send via
    /// [`MIDISender::send_queue()`].
    pub fn enqueue(&mut self, message: &MIDIMessage) {
        self.queue
            .extend_from_slice(&message.as_bytes()[..message.len()]);
    }

    /// Sends the internal queue of `MIDIMessage` bytes to the bound MIDI port.
    /// The queue is cleared either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the MIDI message failed to send.
    pub fn send_queue(&mut self) -> Result<(), midir::SendError> {
        if self.queue.is_empty() {
            return Ok(());
        }

        let result = self.output.send(&self.queue);
        self.queue.clear();

        result
    }

    #[allow(clippy::missing_const_for_fn)]
    pub fn bound_port_name(&self) -> &str {
        &self.bound_port_name
    }
}

fn find_port(
    output: &MidiOutput,
    ports: &[MidiOutputPort],
    substr: &str,
) -> Option<MidiOutputPort> {
    let substr = substr.to_lowercase();

    ports
        .iter()
        .find(|p| {
            output
                .port_name(p)
                .is_ok_and(|name| name.to_lowercase().contains(&substr))
        })
        .cloned()
}

/// Drains every batch of messages waiting on `receiver` and sends them.
fn flush(receiver: &CCReceiver<Vec<MIDIMessage>>, sender: &mut MIDISender) {
    let mut any = false;

    while let Ok(buf) = receiver.try_recv() {
        for msg in &buf {
            sender.enqueue(msg);
        }

        any |= !buf.is_empty();
    }

    if any {
        if let Err(e) = sender.send_queue() {
            log::error!("failed to send MIDI message: \"{e}\"");
        }
    }
}

// *** *** *** //

/// Sends batches of MIDI messages from a channel at a fixed rate, so that
/// nothing on the frame loop blocks on the MIDI port.
pub struct MIDISenderTimedThread {
    sender: Arc<Mutex<MIDISender>>,
    receiver: Arc<Mutex<CCReceiver<Vec<MIDIMessage>>>>,
    thread: TimerThread,
}

impl MIDISenderTimedThread {
    pub fn new(sender: MIDISender, receiver: CCReceiver<Vec<MIDIMessage>>) -> Self {
        let sender = Arc::new(Mutex::new(sender));
        let receiver = Arc::new(Mutex::new(receiver));

        let tx = Arc::clone(&sender);
        let rx = Arc::clone(&receiver);

        let thread = TimerThread::new(move || {
            if let (Ok(rx), Ok(mut tx)) = (rx.lock(), tx.lock()) {
                flush(&rx, &mut tx);
            }
        });

        Self { sender, receiver, thread }
    }

    pub fn start_send(&mut self) {
        self.thread.start_hz(MIDI_SEND_RATE);
    }

    /// Stops the send thread, then sends anything still waiting.
    pub fn stop_send(&mut self) {
        self.thread.stop();

        if let (Ok(rx), Ok(mut tx)) = (self.receiver.lock(), self.sender.lock())
        {
            flush(&rx, &mut tx);
        }
    }

    pub fn bound_port_name(&self) -> String {
        self.sender
            .lock()
            .map(|s| s.bound_port_name().to_string())
            .unwrap_or_default()
    }
}

impl Drop for MIDISenderTimedThread {
    fn drop(&mut self) {
        self.stop_send();
    }
}
