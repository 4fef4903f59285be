use super::*;

use nannou_osc as osc;

pub struct OSCReceiver {
    receiver: osc::Receiver,
    port: u16,
}

impl OSCReceiver {
    /// Binds a receiver to the provided port.
    ///
    /// # Errors
    ///
    /// Returns an error if the port could not be bound.
    pub fn with_port(port: u16) -> std::io::Result<Self> {
        Ok(Self { receiver: osc::receiver(port)?, port })
    }

    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Drains every pending packet and returns the newest message sent to
    /// `addr`, so detections which arrived while an earlier one was in flight
    /// are dropped.
    pub fn try_recv(&mut self, addr: &str) -> Option<osc::Message> {
        let receiver = &mut self.receiver;

        let packets = std::iter::from_fn(|| match receiver.try_recv() {
            Ok(Some((packet, _))) => Some(packet),
            Ok(None) => None,
            Err(e) => {
                log::warn!("failed to receive OSC packet: {e}");
                None
            }
        });

        newest_message(packets, addr)
    }
}

/// The last message sent to `addr` across `packets`. Messages to other
/// addresses never replace an earlier match.
pub fn newest_message(
    packets: impl IntoIterator<Item = osc::Packet>,
    addr: &str,
) -> Option<osc::Message> {
    packets.into_iter().fold(None, |newest, packet| {
        packet
            .into_msgs()
            .into_iter()
            .filter(|m| m.addr == addr)
            .last()
            .or(newest)
    })
}
