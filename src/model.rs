//! Logical music model consumed by the layout engine.
//!
//! These structures are produced by an upstream notation parser; the layout
//! engine only reads them. Notes know their pitch, strict duration, attached
//! grace notes and decorations; multi notes (chords) know how to split
//! themselves into groups of identical strict duration.

use serde::{Deserialize, Serialize};

/// Diatonic note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// Vertical offset from the bottom staff line, in half-glyph steps.
    pub fn staff_offset(self) -> f64 {
        match self {
            NoteName::C => -1.0,
            NoteName::D => -0.5,
            NoteName::E => 0.0,
            NoteName::F => 0.5,
            NoteName::G => 1.0,
            NoteName::A => 1.5,
            NoteName::B => 2.0,
        }
    }

    /// Semitone distance from C within one octave.
    pub fn semitone(self) -> i32 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }
}

/// Chromatic alteration printed (or implied) before a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
    DoubleSharp,
    DoubleFlat,
}

/// Pitch of a note: letter, optional accidental and octave transposition
/// relative to the octave starting at middle C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub name: NoteName,
    pub accidental: Option<Accidental>,
    pub octave_transposition: i32,
}

impl Pitch {
    /// The pitch on the staff middle line, used for stem direction decisions.
    pub const MIDDLE_LINE: Pitch = Pitch {
        name: NoteName::B,
        accidental: None,
        octave_transposition: 0,
    };

    pub fn new(name: NoteName, octave_transposition: i32) -> Self {
        Self {
            name,
            accidental: None,
            octave_transposition,
        }
    }

    pub fn with_accidental(mut self, accidental: Accidental) -> Self {
        self.accidental = Some(accidental);
        self
    }

    /// Absolute height in semitones of the natural note. Accidentals do not
    /// move a note on the staff, so they are ignored here.
    pub fn height(&self) -> i32 {
        self.name.semitone() + 12 * self.octave_transposition
    }

    /// Vertical staff offset in half-glyph steps (`3.5` per octave).
    pub fn staff_offset(&self) -> f64 {
        self.name.staff_offset() + 3.5 * self.octave_transposition as f64
    }

    pub fn is_higher_than(&self, other: &Pitch) -> bool {
        self.height() > other.height()
    }

    pub fn is_lower_than(&self, other: &Pitch) -> bool {
        self.height() < other.height()
    }
}

/// Duration category ignoring dots and tuplets. Ordered shortest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrictDuration {
    SixtyFourth,
    ThirtySecond,
    Sixteenth,
    Eighth,
    Quarter,
    Half,
    Whole,
}

/// Ornaments and articulations drawn around a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decoration {
    Staccato,
    Accent,
    Tenuto,
    Fermata,
    Trill,
    Roll,
    UpBow,
    DownBow,
}

/// A single note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    pub duration: StrictDuration,
    /// Number of augmentation dots
    #[serde(default)]
    pub dots: u8,
    /// Grace notes played before this note
    #[serde(default)]
    pub grace_notes: Vec<Note>,
    /// Decorations, in the order they were written
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl Note {
    pub fn new(pitch: Pitch, duration: StrictDuration) -> Self {
        Self {
            pitch,
            duration,
            dots: 0,
            grace_notes: Vec::new(),
            decorations: Vec::new(),
        }
    }

    pub fn with_grace_notes(mut self, grace_notes: Vec<Note>) -> Self {
        self.grace_notes = grace_notes;
        self
    }

    pub fn with_decorations(mut self, decorations: Vec<Decoration>) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn has_grace_notes(&self) -> bool {
        !self.grace_notes.is_empty()
    }

    pub fn has_decorations(&self) -> bool {
        !self.decorations.is_empty()
    }
}

/// Notes sounding together (a chord). Notes are kept in the order they were
/// given; use [`MultiNote::sorted_notes`] for pitch order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiNote {
    pub notes: Vec<Note>,
    #[serde(default)]
    pub grace_notes: Vec<Note>,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl MultiNote {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            notes,
            grace_notes: Vec::new(),
            decorations: Vec::new(),
        }
    }

    pub fn with_grace_notes(mut self, grace_notes: Vec<Note>) -> Self {
        self.grace_notes = grace_notes;
        self
    }

    pub fn with_decorations(mut self, decorations: Vec<Decoration>) -> Self {
        self.decorations = decorations;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Notes ordered by ascending height, lowest first.
    pub fn sorted_notes(&self) -> Vec<&Note> {
        let mut sorted: Vec<&Note> = self.notes.iter().collect();
        sorted.sort_by_key(|n| n.pitch.height());
        sorted
    }

    pub fn highest(&self) -> Option<&Note> {
        self.notes.iter().reduce(|best, n| {
            if n.pitch.is_higher_than(&best.pitch) { n } else { best }
        })
    }

    pub fn lowest(&self) -> Option<&Note> {
        self.notes.iter().reduce(|best, n| {
            if n.pitch.is_lower_than(&best.pitch) { n } else { best }
        })
    }

    /// Distinct strict durations present in this chord, shortest first.
    pub fn strict_durations(&self) -> Vec<StrictDuration> {
        let mut durations: Vec<StrictDuration> = self.notes.iter().map(|n| n.duration).collect();
        durations.sort();
        durations.dedup();
        durations
    }

    pub fn has_unique_strict_duration(&self) -> bool {
        self.strict_durations().len() <= 1
    }

    /// Split into duration-homogeneous chords, shortest duration first.
    /// Grace notes and decorations belong to the whole chord and are not
    /// copied into the groups.
    pub fn normalize(&self) -> Vec<MultiNote> {
        self.strict_durations()
            .into_iter()
            .map(|duration| {
                MultiNote::new(
                    self.notes
                        .iter()
                        .filter(|n| n.duration == duration)
                        .cloned()
                        .collect(),
                )
            })
            .collect()
    }
}

/// A logical element the layout engine knows how to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MusicElement {
    Note(Note),
    MultiNote(MultiNote),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(name: NoteName, octave: i32, duration: StrictDuration) -> Note {
        Note::new(Pitch::new(name, octave), duration)
    }

    #[test]
    fn staff_offset_table() {
        assert_eq!(Pitch::new(NoteName::C, 0).staff_offset(), -1.0);
        assert_eq!(Pitch::new(NoteName::E, 0).staff_offset(), 0.0);
        assert_eq!(Pitch::new(NoteName::B, 1).staff_offset(), 5.5);
        assert_eq!(Pitch::new(NoteName::G, -1).staff_offset(), -2.5);
    }

    #[test]
    fn height_ignores_accidentals() {
        let c = Pitch::new(NoteName::C, 1);
        let c_sharp = c.with_accidental(Accidental::Sharp);
        assert_eq!(c.height(), 12);
        assert_eq!(c_sharp.height(), 12);
        assert!(c.is_higher_than(&Pitch::MIDDLE_LINE));
    }

    #[test]
    fn highest_and_lowest_ignore_input_order() {
        let chord = MultiNote::new(vec![
            note(NoteName::E, 0, StrictDuration::Quarter),
            note(NoteName::C, 1, StrictDuration::Quarter),
            note(NoteName::G, -1, StrictDuration::Quarter),
        ]);
        assert_eq!(chord.highest().map(|n| n.pitch.name), Some(NoteName::C));
        assert_eq!(chord.lowest().map(|n| n.pitch.name), Some(NoteName::G));

        let sorted: Vec<NoteName> = chord.sorted_notes().iter().map(|n| n.pitch.name).collect();
        assert_eq!(sorted, vec![NoteName::G, NoteName::E, NoteName::C]);
    }

    #[test]
    fn normalize_groups_shortest_first() {
        let chord = MultiNote::new(vec![
            note(NoteName::C, 0, StrictDuration::Quarter),
            note(NoteName::E, 0, StrictDuration::Eighth),
            note(NoteName::G, 0, StrictDuration::Quarter),
        ]);
        assert!(!chord.has_unique_strict_duration());
        assert_eq!(
            chord.strict_durations(),
            vec![StrictDuration::Eighth, StrictDuration::Quarter]
        );

        let groups = chord.normalize();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].notes.len(), 1);
        assert_eq!(groups[0].notes[0].pitch.name, NoteName::E);
        assert_eq!(groups[1].notes.len(), 2);
    }

    #[test]
    fn empty_chord_has_no_extremes() {
        let chord = MultiNote::default();
        assert!(chord.is_empty());
        assert!(chord.highest().is_none());
        assert!(chord.has_unique_strict_duration());
    }
}
