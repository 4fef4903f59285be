//! The fixed chord and note tables, one entry per zone.

use super::note::{Pitch, PitchParseError};
use crate::prelude::*;

/// Diatonic seventh chords of C major, one per zone from left to right.
#[rustfmt::skip]
pub const CHORD_TABLE: [[&str; 4]; NUM_ZONES] = [
    ["C4", "E4", "G4", "B4"], // Cmaj7
    ["D4", "F4", "A4", "C5"], // Dm7
    ["E4", "G4", "B4", "D5"], // Em7
    ["F4", "A4", "C5", "E5"], // Fmaj7
    ["G4", "B4", "D5", "F5"], // G7
    ["A4", "C5", "E5", "G5"], // Am7
    ["B4", "D5", "F5", "A5"], // Bm7b5
    ["C5", "E5", "G5", "B5"], // Cmaj7
];

/// Names of the chords in [`CHORD_TABLE`], for labelling zones.
pub const CHORD_NAMES: [&str; NUM_ZONES] =
    ["Cmaj7", "Dm7", "Em7", "Fmaj7", "G7", "Am7", "Bm7b5", "Cmaj7"];

/// The C major scale from C5 to C6, one note per zone.
pub const NOTE_TABLE: [&str; NUM_ZONES] =
    ["C5", "D5", "E5", "F5", "G5", "A5", "B5", "C6"];

/// The pitches a voice draws from, parsed from their names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchTable {
    zones: Vec<Vec<Pitch>>,
}

impl PitchTable {
    /// Parses a table of pitch names, one list of names per zone.
    ///
    /// # Errors
    ///
    /// Returns the first name which is not a valid pitch.
    pub fn from_names<'a, Z, N>(zones: Z) -> Result<Self, PitchParseError>
    where
        Z: IntoIterator<Item = N>,
        N: IntoIterator<Item = &'a str>,
    {
        let zones = zones
            .into_iter()
            .map(|names| {
                names.into_iter().map(str::parse).collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<Vec<Pitch>>, _>>()?;

        Ok(Self { zones })
    }

    /// [`CHORD_TABLE`], a four-note chord per zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the table holds an invalid pitch name.
    pub fn chords() -> Result<Self, PitchParseError> {
        Self::from_names(CHORD_TABLE.iter().map(|chord| chord.iter().copied()))
    }

    /// [`NOTE_TABLE`], a single note per zone.
    ///
    /// # Errors
    ///
    /// Returns an error if the table holds an invalid pitch name.
    pub fn notes() -> Result<Self, PitchParseError> {
        Self::from_names(NOTE_TABLE.iter().map(|&note| [note]))
    }

    /// Returns the pitches for `zone`, moved up by `octave` octaves, or `None`
    /// if the zone is out of range.
    pub fn pitches_for(&self, zone: usize, octave: i32) -> Option<Vec<Pitch>> {
        self.zones.get(zone).map(|pitches| {
            pitches.iter().map(|p| p.transpose_octaves(octave)).collect()
        })
    }

    pub fn is_single_note(&self) -> bool {
        self.zones.iter().all(|pitches| pitches.len() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::musical::Note::*;

    #[test]
    fn test_chord_lookup_is_transposed() {
        let table = PitchTable::chords().unwrap();
        let chord = table.pitches_for(1, 1).unwrap();
        let names: Vec<String> = chord.iter().map(|p| p.to_string()).collect();

        assert_eq!(names, ["D5", "F5", "A5", "C6"]);
        assert!(!table.is_single_note());
    }

    #[test]
    fn test_note_lookup() {
        let table = PitchTable::notes().unwrap();

        assert_eq!(table.pitches_for(7, 0), Some(vec![Pitch::new(C, 6)]));
        assert_eq!(table.pitches_for(0, 2), Some(vec![Pitch::new(C, 7)]));
        assert_eq!(table.pitches_for(NUM_ZONES, 0), None);
        assert!(table.is_single_note());
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let table = PitchTable::from_names([["C4", "E4"], ["D4", "X4"]]);
        assert_eq!(table, Err(PitchParseError::InvalidLetter('X')));

        let table = PitchTable::from_names([["Bb3"], ["F#4"]]).unwrap();
        assert_eq!(table.pitches_for(0, 1), Some(vec![Pitch::new(As, 4)]));
    }

    #[test]
    fn test_tables_are_diatonic() {
        const C_MAJOR: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

        let chords = PitchTable::chords().unwrap();
        let notes = PitchTable::notes().unwrap();

        for zone in 0..NUM_ZONES {
            let pitches = chords
                .pitches_for(zone, 0)
                .into_iter()
                .chain(notes.pitches_for(zone, 0))
                .flatten();

            for pitch in pitches {
                assert!(C_MAJOR.contains(&pitch.note().note_value()));
            }
        }
    }
}
