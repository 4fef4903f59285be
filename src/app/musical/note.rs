//! Musical note and pitch representation.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

// there is no intention of changing the variants of this enum so the wildcard
// import is fine.
use Note::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PitchParseError {
    #[error("pitch name is empty")]
    Empty,
    #[error("\"{0}\" is not a note letter")]
    InvalidLetter(char),
    #[error("\"{0}\" has no octave number")]
    MissingOctave(String),
    #[error("\"{0}\" has an invalid octave number")]
    InvalidOctave(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            C => write!(f, "C"),
            Cs => write!(f, "C#"),
            D => write!(f, "D"),
            Ds => write!(f, "D#"),
            E => write!(f, "E"),
            F => write!(f, "F"),
            Fs => write!(f, "F#"),
            G => write!(f, "G"),
            Gs => write!(f, "G#"),
            A => write!(f, "A"),
            As => write!(f, "A#"),
            B => write!(f, "B"),
        }
    }
}

impl Note {
    /// Returns the note with a given transposition.
    #[must_use]
    pub const fn transpose(self, semitones: i32) -> Self {
        Self::from_value(self.note_value() + semitones)
    }

    /// Returns the value of the note for any octave.
    ///
    /// `C` is represented as 0, and `B` as 11.
    pub const fn note_value(self) -> i32 {
        match self {
            C => 0,
            Cs => 1,
            D => 2,
            Ds => 3,
            E => 4,
            F => 5,
            Fs => 6,
            G => 7,
            Gs => 8,
            A => 9,
            As => 10,
            B => 11,
        }
    }

    /// Returns the note associated with the provided value, wrapping it into
    /// a single octave.
    #[must_use]
    pub const fn from_value(value: i32) -> Self {
        match value.rem_euclid(12) {
            0 => C,
            1 => Cs,
            2 => D,
            3 => Ds,
            4 => E,
            5 => F,
            6 => Fs,
            7 => G,
            8 => Gs,
            9 => A,
            10 => As,
            _ => B,
        }
    }

    /// Returns the natural note for a letter name, if it is one.
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'C' => Some(C),
            'D' => Some(D),
            'E' => Some(E),
            'F' => Some(F),
            'G' => Some(G),
            'A' => Some(A),
            'B' => Some(B),
            _ => None,
        }
    }
}

// *** *** *** //

/// A note in a specific octave, written as `<letter>[#|b]<octave>` (e.g. "C4"
/// or "F#5"). C4 is MIDI note 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    note: Note,
    octave: i32,
}

impl Pitch {
    pub const fn new(note: Note, octave: i32) -> Self {
        Self { note, octave }
    }

    pub const fn note(self) -> Note {
        self.note
    }

    pub const fn octave(self) -> i32 {
        self.octave
    }

    /// Returns the pitch moved up (or down) by whole octaves.
    #[must_use]
    pub const fn transpose_octaves(self, octaves: i32) -> Self {
        Self { note: self.note, octave: self.octave + octaves }
    }

    /// The MIDI note number of this pitch, or `None` if it lies outside of
    /// the MIDI range.
    pub fn midi_note(self) -> Option<u8> {
        let value = (self.octave + 1) * 12 + self.note.note_value();
        u8::try_from(value).ok().filter(|&v| v < 128)
    }
}

impl Display for Pitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.note, self.octave)
    }
}

impl FromStr for Pitch {
    type Err = PitchParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();

        let letter = chars.next().ok_or(PitchParseError::Empty)?;
        let natural = Note::from_letter(letter)
            .ok_or(PitchParseError::InvalidLetter(letter))?;

        let rest = chars.as_str();
        let (note, octave_str) = match rest.chars().next() {
            Some('#') => (natural.transpose(1), &rest[1..]),
            Some('b') => (natural.transpose(-1), &rest[1..]),
            _ => (natural, rest),
        };

        if octave_str.is_empty() {
            return Err(PitchParseError::MissingOctave(s.to_string()));
        }

        let octave = octave_str
            .parse::<i32>()
            .map_err(|_| PitchParseError::InvalidOctave(s.to_string()))?;

        // Cb and B# cross the octave boundary.
        let octave = match (natural, note) {
            (C, B) => octave - 1,
            (B, C) => octave + 1,
            _ => octave,
        };

        Ok(Self { note, octave })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_parsing() {
        assert_eq!("C4".parse::<Pitch>(), Ok(Pitch::new(C, 4)));
        assert_eq!("F#5".parse::<Pitch>(), Ok(Pitch::new(Fs, 5)));
        assert_eq!("Bb3".parse::<Pitch>(), Ok(Pitch::new(As, 3)));
        assert_eq!("Cb4".parse::<Pitch>(), Ok(Pitch::new(B, 3)));
        assert_eq!("B#4".parse::<Pitch>(), Ok(Pitch::new(C, 5)));
    }

    #[test]
    fn test_invalid_pitch_names() {
        assert_eq!("".parse::<Pitch>(), Err(PitchParseError::Empty));
        assert_eq!(
            "H4".parse::<Pitch>(),
            Err(PitchParseError::InvalidLetter('H'))
        );
        assert!(matches!(
            "C#".parse::<Pitch>(),
            Err(PitchParseError::MissingOctave(_))
        ));
        assert!(matches!(
            "Cx4".parse::<Pitch>(),
            Err(PitchParseError::InvalidOctave(_))
        ));
    }

    #[test]
    fn test_pitch_formatting() {
        assert_eq!(Pitch::new(Fs, 5).to_string(), "F#5");
        assert_eq!(
            "Eb4".parse::<Pitch>().map(|p| p.to_string()),
            Ok(String::from("D#4"))
        );
    }

    #[test]
    fn test_midi_note_values() {
        assert_eq!(Pitch::new(C, 4).midi_note(), Some(60));
        assert_eq!(Pitch::new(A, 4).midi_note(), Some(69));
        assert_eq!(Pitch::new(C, -1).midi_note(), Some(0));
        assert_eq!(Pitch::new(G, 9).midi_note(), Some(127));
        assert_eq!(Pitch::new(Gs, 9).midi_note(), None);
        assert_eq!(Pitch::new(Cs, 4).midi_note(), Some(61));
    }

    #[test]
    fn test_octave_transposition() {
        assert_eq!(Pitch::new(E, 4).transpose_octaves(2), Pitch::new(E, 6));
        assert_eq!(
            "Bb4".parse::<Pitch>().map(|p| p.transpose_octaves(-1)),
            Ok(Pitch::new(As, 3))
        );
    }
}
