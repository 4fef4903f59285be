//! Arpeggio patterns and rhythmic subdivisions.

/// The length of one arpeggio step relative to a transport beat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Subdivision {
    Quarter,
    Eighth,
    #[default]
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

impl Subdivision {
    /// How many steps fit into one beat.
    pub const fn steps_per_beat(self) -> f64 {
        match self {
            Self::Quarter => 1.0,
            Self::Eighth => 2.0,
            Self::Sixteenth => 4.0,
            Self::ThirtySecond => 8.0,
            Self::SixtyFourth => 16.0,
        }
    }

    /// The step rate for a transport running at `beats_per_sec`.
    pub fn step_rate_hz(self, beats_per_sec: f64) -> f64 {
        beats_per_sec * self.steps_per_beat()
    }
}

impl std::fmt::Display for Subdivision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quarter => write!(f, "1/4"),
            Self::Eighth => write!(f, "1/8"),
            Self::Sixteenth => write!(f, "1/16"),
            Self::ThirtySecond => write!(f, "1/32"),
            Self::SixtyFourth => write!(f, "1/64"),
        }
    }
}

// *** *** *** //

/// Walks up a set of notes and back down again without repeating the top or
/// bottom note, e.g. `0 1 2 3 2 1 0 1 ...`.
#[derive(Clone, Debug, Default)]
pub struct UpDownPattern {
    notes: Vec<u8>,
    step: usize,
}

impl UpDownPattern {
    pub fn new(notes: Vec<u8>) -> Self {
        Self { notes, step: 0 }
    }

    /// Replaces the notes, restarting from the bottom.
    pub fn set_notes(&mut self, notes: Vec<u8>) {
        self.notes = notes;
        self.step = 0;
    }

    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    /// Returns the next note in the pattern, or `None` if there are no notes.
    pub fn next_note(&mut self) -> Option<u8> {
        let len = self.notes.len();

        if len == 0 {
            return None;
        }
        if len == 1 {
            return Some(self.notes[0]);
        }

        let period = 2 * (len - 1);
        let pos = self.step % period;
        let idx = if pos < len { pos } else { period - pos };

        self.step = (self.step + 1) % period;

        Some(self.notes[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_down_order() {
        let mut pattern = UpDownPattern::new(vec![60, 64, 67, 71]);
        let played: Vec<u8> =
            (0..10).filter_map(|_| pattern.next_note()).collect();

        assert_eq!(played, [60, 64, 67, 71, 67, 64, 60, 64, 67, 71]);
    }

    #[test]
    fn test_small_patterns() {
        let mut single = UpDownPattern::new(vec![72]);
        assert_eq!(single.next_note(), Some(72));
        assert_eq!(single.next_note(), Some(72));

        let mut pair = UpDownPattern::new(vec![60, 72]);
        let played: Vec<u8> = (0..4).filter_map(|_| pair.next_note()).collect();
        assert_eq!(played, [60, 72, 60, 72]);

        let mut empty = UpDownPattern::default();
        assert_eq!(empty.next_note(), None);
    }

    #[test]
    fn test_replacing_notes_restarts() {
        let mut pattern = UpDownPattern::new(vec![60, 64, 67]);
        _ = pattern.next_note();
        _ = pattern.next_note();

        pattern.set_notes(vec![50, 55]);
        assert_eq!(pattern.next_note(), Some(50));
    }

    #[test]
    fn test_step_rate() {
        assert!((Subdivision::Sixteenth.step_rate_hz(2.0) - 8.0).abs() < 1e-12);
        assert!((Subdivision::Quarter.step_rate_hz(0.5) - 0.5).abs() < 1e-12);
    }
}
