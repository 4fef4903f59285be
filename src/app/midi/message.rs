/// All generic MIDI values must be below this value.
const MAX_7_BIT_INT: u8 = 1 << 7;
/// All MIDI channels must be below this value.
const MAX_4_BIT_INT: u8 = 1 << 4;
/// Controllers from 120-127 are reserved for "Channel Mode Messages", which are
/// special instructions. So only controllers 0-119 are available for general
/// use.
const MAX_CONTROLLER_NUMBER: u8 = 120;

/// This mask should be used for all generic MIDI values.
const GENERIC_MIDI_VALUE_MASK: u8 = 0b_0111_1111;
/// Bit mask for MIDI channel value — as part of the status byte.
const CHANNEL_BIT_MASK: u8 = 0b0000_1111;

const MIDI_NOTE_OFF: u8 = 0x80;
const MIDI_NOTE_ON: u8 = 0x90;
const MIDI_CONTROL_CHANGE: u8 = 0xB0;
const MIDI_PROGRAM_CHANGE: u8 = 0xC0;

/// The channel volume controller.
pub const VOLUME_CONTROLLER: u8 = 7;
/// The "All Notes Off" channel mode controller.
pub const ALL_NOTES_OFF_CONTROLLER: u8 = 123;

/// Representation of a MIDI message. Use `as_bytes()` to get the message as a
/// 3-byte value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MIDIMessage {
    NoteOff { note: u8, velocity: u8, ch: u8 },
    NoteOn { note: u8, velocity: u8, ch: u8 },
    ControlChange { controller: u8, value: u8, ch: u8 },
    ProgramChange { program: u8, ch: u8 },
    AllNotesOff { ch: u8 },
}

impl MIDIMessage {
    /// Returns a MIDI note off message with the provided information.
    ///
    /// # Panics
    ///
    /// If the provided values are invalid for MIDI messages, this function will
    /// panic.
    pub fn note_off(note_value: u8, channel: u8) -> Self {
        assert!(
            note_value < MAX_7_BIT_INT,
            "got invalid note value of {note_value}"
        );
        assert!(
            channel < MAX_4_BIT_INT,
            "got invalid MIDI channel of {channel}"
        );

        Self::NoteOff { note: note_value, velocity: 0, ch: channel }
    }

    /// Returns a MIDI note on message with the provided information.
    ///
    /// # Panics
    ///
    /// If the provided values are invalid for MIDI messages, this function will
    /// panic.
    pub fn note_on(note_value: u8, note_vel: u8, channel: u8) -> Self {
        assert!(
            note_value < MAX_7_BIT_INT,
            "got invalid note value of {note_value}"
        );
        assert!(
            note_vel < MAX_7_BIT_INT,
            "got invalid note velocity of {note_vel}"
        );
        assert!(
            channel < MAX_4_BIT_INT,
            "got invalid MIDI channel of {channel}"
        );

        Self::NoteOn { note: note_value, velocity: note_vel, ch: channel }
    }

    /// Returns a MIDI CC message with the controller number and value.
    ///
    /// # Panics
    ///
    /// If the provided values are invalid for MIDI messages, this function will
    /// panic.
    pub fn control_change(
        controller_number: u8,
        controller_value: u8,
        channel: u8,
    ) -> Self {
        assert!(
            controller_number < MAX_CONTROLLER_NUMBER,
            "got invalid controller number of {controller_number}"
        );
        assert!(
            controller_value < MAX_7_BIT_INT,
            "got invalid controller value of {controller_value}"
        );
        assert!(
            channel < MAX_4_BIT_INT,
            "got invalid MIDI channel of {channel}"
        );

        Self::ControlChange {
            controller: controller_number,
            value: controller_value,
            ch: channel,
        }
    }

    /// Returns a MIDI program change message with the provided program number.
    ///
    /// # Panics
    ///
    /// If the provided values are invalid for MIDI messages, this function will
    /// panic.
    pub fn program_change(program_number: u8, channel: u8) -> Self {
        assert!(
            program_number < MAX_7_BIT_INT,
            "got invalid program number of {program_number}"
        );
        assert!(
            channel < MAX_4_BIT_INT,
            "got invalid MIDI channel of {channel}"
        );

        Self::ProgramChange { program: program_number, ch: channel }
    }

    /// # Panics
    ///
    /// Panics if `channel` is not a valid MIDI channel.
    pub fn all_notes_off(channel: u8) -> Self {
        assert!(
            channel < MAX_4_BIT_INT,
            "got invalid MIDI channel of {channel}"
        );

        Self::AllNotesOff { ch: channel }
    }

    pub const fn channel(self) -> u8 {
        match self {
            Self::NoteOff { ch, .. }
            | Self::NoteOn { ch, .. }
            | Self::ControlChange { ch, .. }
            | Self::ProgramChange { ch, .. }
            | Self::AllNotesOff { ch } => ch,
        }
    }

    pub const fn note(self) -> Option<u8> {
        match self {
            Self::NoteOff { note, .. } | Self::NoteOn { note, .. } => {
                Some(note)
            }
            _ => None,
        }
    }

    /// Returns the MIDI message as a 3-byte array. Program changes are padded
    /// with a trailing zero byte; use [`MIDIMessage::len()`] to get the number
    /// of meaningful bytes.
    pub const fn as_bytes(self) -> [u8; 3] {
        let ch = self.channel() & CHANNEL_BIT_MASK;

        match self {
            Self::NoteOff { note, velocity, .. } => [
                MIDI_NOTE_OFF | ch,
                note & GENERIC_MIDI_VALUE_MASK,
                velocity & GENERIC_MIDI_VALUE_MASK,
            ],
            Self::NoteOn { note, velocity, .. } => [
                MIDI_NOTE_ON | ch,
                note & GENERIC_MIDI_VALUE_MASK,
                velocity & GENERIC_MIDI_VALUE_MASK,
            ],
            Self::ControlChange { controller, value, .. } => [
                MIDI_CONTROL_CHANGE | ch,
                controller & GENERIC_MIDI_VALUE_MASK,
                value & GENERIC_MIDI_VALUE_MASK,
            ],
            Self::ProgramChange { program, .. } => {
                [MIDI_PROGRAM_CHANGE | ch, program & GENERIC_MIDI_VALUE_MASK, 0]
            }
            Self::AllNotesOff { .. } => {
                [MIDI_CONTROL_CHANGE | ch, ALL_NOTES_OFF_CONTROLLER, 0]
            }
        }
    }

    /// The length of the message on the wire.
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(self) -> usize {
        match self {
            Self::ProgramChange { .. } => 2,
            _ => 3,
        }
    }
}

impl std::fmt::Display for MIDIMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteOff { note, ch, .. } => {
                write!(f, "MIDI note #{} OFF (channel {})", note, ch + 1)
            }
            Self::NoteOn { note, velocity, ch } => {
                write!(
                    f,
                    "MIDI note #{} ON with velocity {} (channel {})",
                    note,
                    velocity,
                    ch + 1
                )
            }
            Self::ControlChange { controller, value, ch } => {
                write!(
                    f,
                    "MIDI CC #{} with value {} (channel {})",
                    controller,
                    value,
                    ch + 1
                )
            }
            Self::ProgramChange { program, ch } => {
                write!(
                    f,
                    "MIDI program change to #{} (channel {})",
                    program,
                    ch + 1
                )
            }
            Self::AllNotesOff { ch } => {
                write!(f, "MIDI all notes off (channel {})", ch + 1)
            }
        }
    }
}
