//! Chord layout: stem direction for the whole group, a shared stem end row,
//! one stem column, the union of member boxes and the chord's slur anchors.
//!
//! A chord whose notes all share one strict duration owns its notes
//! directly. A chord mixing durations is split into two normalized chords:
//! the shorter duration with stems up, the longer with stems down.

use std::rc::Rc;

use log::{debug, warn};

use super::grace::GraceNoteCluster;
use super::note::{auto_stem_up, NoteElement};
use super::slurs::SlurAnchors;
use super::svg_builder::DrawingSurface;
use super::{Hit, ScoreElement};
use crate::geometry::{Point, Rect};
use crate::metrics::{NotationContext, ScoreMetrics};
use crate::model::{Decoration, MultiNote};

/// Horizontal room kept for accidentals in front of the chord. Accidental
/// collision layout is done elsewhere, so nothing is reserved here.
const ACCIDENTALS_RESERVED_WIDTH: f64 = 0.0;

#[derive(Debug)]
enum ChordBody {
    /// Members in ascending pitch order, lowest first
    Notes(Vec<NoteElement>),
    /// Shorter duration first (stems up), longer second (stems down)
    Normalized(Box<[ChordElement; 2]>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ChordLayout {
    bounding_box: Rect,
    slur_anchors: Option<SlurAnchors>,
}

/// Visual element for notes sounding together.
#[derive(Debug)]
pub struct ChordElement {
    multi_note: MultiNote,
    metrics: Rc<ScoreMetrics>,
    base: Point,
    color: Option<String>,
    stem_up: bool,
    auto_stem: bool,
    /// Stem end row injected by a beam group
    stem_end_row: Option<f64>,
    body: ChordBody,
    grace_notes: Option<GraceNoteCluster>,
    decorations: Vec<Decoration>,
    layout: Option<ChordLayout>,
}

impl ChordElement {
    /// Build the element for `multi_note`. Returns `None` (with a warning)
    /// for a chord without notes. Nothing is laid out until
    /// [`ScoreElement::set_base`] is called.
    pub fn new(multi_note: MultiNote, base: Point, metrics: Rc<ScoreMetrics>) -> Option<Self> {
        if multi_note.is_empty() {
            warn!("chord without notes ignored");
            return None;
        }

        let body = if multi_note.has_unique_strict_duration() {
            let sorted = multi_note.sorted_notes();
            let last = sorted.len() - 1;
            let members = sorted
                .into_iter()
                .enumerate()
                .map(|(i, note)| {
                    let mut member = NoteElement::chord_member(note, base, Rc::clone(&metrics));
                    member.set_chord_position(i == 0, i == last);
                    member
                })
                .collect();
            ChordBody::Notes(members)
        } else {
            let durations = multi_note.strict_durations();
            if durations.len() > 2 {
                warn!(
                    "chords with more than 2 different strict durations aren't supported, \
                     only the 2 shortest of {:?} are drawn",
                    durations
                );
            }
            let mut groups = multi_note.normalize().into_iter();
            let (Some(fastest), Some(slowest)) = (groups.next(), groups.next()) else {
                return None;
            };
            let mut fastest = ChordElement::new(fastest, base, Rc::clone(&metrics))?;
            fastest.set_stem_up(true);
            let mut slowest = ChordElement::new(slowest, base, Rc::clone(&metrics))?;
            slowest.set_stem_up(false);
            ChordBody::Normalized(Box::new([fastest, slowest]))
        };

        let grace_notes = GraceNoteCluster::new(&multi_note.grace_notes, base, Rc::clone(&metrics));
        let decorations = multi_note.decorations.clone();
        let auto_stem = matches!(body, ChordBody::Notes(_));

        Some(Self {
            multi_note,
            metrics,
            base,
            color: None,
            stem_up: true,
            auto_stem,
            stem_end_row: None,
            body,
            grace_notes,
            decorations,
            layout: None,
        })
    }

    pub fn multi_note(&self) -> &MultiNote {
        &self.multi_note
    }

    /// Member notes, lowest first. Empty for a mixed-duration chord.
    pub fn notes(&self) -> &[NoteElement] {
        match &self.body {
            ChordBody::Notes(members) => members,
            ChordBody::Normalized(_) => &[],
        }
    }

    /// The two duration-homogeneous chords of a mixed-duration chord.
    pub fn normalized_chords(&self) -> Option<&[ChordElement; 2]> {
        match &self.body {
            ChordBody::Notes(_) => None,
            ChordBody::Normalized(chords) => Some(chords),
        }
    }

    pub fn grace_notes(&self) -> Option<&GraceNoteCluster> {
        self.grace_notes.as_ref()
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn lowest_note(&self) -> Option<&NoteElement> {
        self.notes().first()
    }

    pub fn highest_note(&self) -> Option<&NoteElement> {
        self.notes().last()
    }

    /// The member showing the rhythm: the highest note with stems up, the
    /// lowest with stems down.
    pub fn anchor_note(&self) -> Option<&NoteElement> {
        if self.stem_up {
            self.highest_note()
        } else {
            self.lowest_note()
        }
    }

    pub fn is_mixed_duration(&self) -> bool {
        matches!(self.body, ChordBody::Normalized(_))
    }

    /// Stem direction of the chord. A mixed-duration chord always reports
    /// stems up: that is the direction of its shorter half, the one a beam
    /// connects. Use [`ChordElement::normalized_chords`] for both halves.
    pub fn is_stem_up(&self) -> bool {
        self.stem_up
    }

    /// Always `false` for a mixed-duration chord, whose halves have fixed
    /// directions.
    pub fn is_auto_stem(&self) -> bool {
        self.auto_stem
    }

    /// Force the stem direction. Disables automatic stemming. Ignored on a
    /// mixed-duration chord.
    pub fn set_stem_up(&mut self, stem_up: bool) {
        if self.is_mixed_duration() {
            debug!("stem direction of a mixed-duration chord is fixed; ignored");
            return;
        }
        self.stem_up = stem_up;
        self.auto_stem = false;
        self.relayout();
    }

    /// Ignored on a mixed-duration chord.
    pub fn set_auto_stem(&mut self, auto_stem: bool) {
        if self.is_mixed_duration() {
            debug!("stem direction of a mixed-duration chord is fixed; ignored");
            return;
        }
        self.auto_stem = auto_stem;
        self.relayout();
    }

    /// Stem end row injected by an enclosing beam group; `None` goes back to
    /// the automatic row. On a mixed-duration chord the row goes to the
    /// stems-up (shorter) half, which is the one a beam connects.
    pub fn set_stem_end_row(&mut self, row: Option<f64>) {
        self.stem_end_row = row;
        self.relayout();
    }

    pub fn stem_end_row(&self) -> Option<f64> {
        self.stem_end_row
    }

    /// Slur/tie anchors. Only single-duration chords have them.
    pub fn slur_anchors(&self) -> Option<SlurAnchors> {
        self.layout.and_then(|l| l.slur_anchors)
    }

    fn relayout(&mut self) {
        if self.layout.is_some() {
            self.on_base_changed();
        }
    }

    fn on_base_changed(&mut self) {
        let metrics = Rc::clone(&self.metrics);
        let base = self.base;

        let grace_width = match self.grace_notes.as_mut() {
            Some(grace) => {
                grace.set_base(base);
                grace.width().unwrap_or(0.0) + metrics.grace_notes_spacing
            }
            None => 0.0,
        };
        let chord_base = Point::new(
            base.x + grace_width + ACCIDENTALS_RESERVED_WIDTH,
            base.y,
        );

        let mut bounding_box = Rect::at(base);
        let mut slur_anchors = None;

        match &mut self.body {
            ChordBody::Notes(members) => {
                let stem_up = if self.auto_stem {
                    match (members.last(), members.first()) {
                        (Some(h), Some(l)) => auto_stem_up(h.pitch(), l.pitch()),
                        _ => self.stem_up,
                    }
                } else {
                    self.stem_up
                };
                self.stem_up = stem_up;

                let stem_end_y = self.stem_end_row.unwrap_or_else(|| {
                    let stem_length = metrics.stem_length(NotationContext::Note);
                    let half_note_height = metrics.note_height() / 2.0;
                    if stem_up {
                        members.last().map_or(base.y, |h| {
                            h.stem_begin_y_at(chord_base.y, true) - stem_length - half_note_height
                        })
                    } else {
                        members.first().map_or(base.y, |l| {
                            l.stem_begin_y_at(chord_base.y, false) + stem_length + half_note_height
                        })
                    }
                });

                for member in members.iter_mut() {
                    member.configure(stem_up, Some(stem_end_y));
                    member.set_color(self.color.clone());
                    member.set_base(chord_base);
                }

                let stem_x = members
                    .iter()
                    .filter_map(|m| m.stem_begin())
                    .map(|p| p.x)
                    .reduce(f64::max);
                if let Some(stem_x) = stem_x {
                    for member in members.iter_mut() {
                        member.set_stem_begin_x(stem_x);
                    }
                }
                debug!(
                    "chord {:?}: stems {}, stem end row {:.1}, stem column {:?}",
                    members.iter().map(|m| m.pitch().name).collect::<Vec<_>>(),
                    if stem_up { "up" } else { "down" },
                    stem_end_y,
                    stem_x
                );

                for bb in members.iter().filter_map(|m| m.bounding_box()) {
                    bounding_box = bounding_box.union(&bb);
                }

                let under = members.first().and_then(|l| l.slur_anchors()).map(|a| a.under);
                let above = members.last().and_then(|h| h.slur_anchors()).map(|a| a.above);
                if let (Some(under), Some(above)) = (under, above) {
                    slur_anchors = Some(SlurAnchors::for_chord(
                        under,
                        above,
                        &bounding_box,
                        stem_up,
                        metrics.slur_anchor_y_offset,
                    ));
                }
            }
            ChordBody::Normalized(chords) => {
                let [fastest, slowest] = &mut **chords;
                fastest.stem_end_row = self.stem_end_row;
                for chord in [fastest, slowest] {
                    chord.set_color(self.color.clone());
                    chord.set_base(chord_base);
                    if let Some(bb) = chord.bounding_box() {
                        bounding_box = bounding_box.union(&bb);
                    }
                }
            }
        }

        self.layout = Some(ChordLayout {
            bounding_box,
            slur_anchors,
        });
    }

    /// Decorations are not drawn for chords: their order relative to slurs
    /// is not settled yet, so the hook stays empty.
    fn render_decorations(&self, _surface: &mut dyn DrawingSurface) {}
}

impl ScoreElement for ChordElement {
    fn base(&self) -> Point {
        self.base
    }

    fn set_base(&mut self, base: Point) {
        self.base = base;
        self.on_base_changed();
    }

    /// Width of the chord's bounding box (grace notes included).
    fn width(&self) -> Option<f64> {
        self.layout.map(|l| l.bounding_box.width)
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.layout.map(|l| l.bounding_box)
    }

    fn element_at(&self, point: Point) -> Option<Hit<'_>> {
        let hit = match &self.body {
            ChordBody::Normalized(chords) => chords.iter().find_map(|c| c.element_at(point)),
            ChordBody::Notes(members) => members.iter().find_map(|m| m.element_at(point)),
        };
        hit.or_else(|| self.grace_notes.as_ref().and_then(|g| g.element_at(point)))
    }

    fn render(&self, surface: &mut dyn DrawingSurface) -> f64 {
        match &self.body {
            ChordBody::Notes(members) => {
                for member in members {
                    member.render(surface);
                }
            }
            ChordBody::Normalized(chords) => {
                for chord in chords.iter() {
                    chord.render(surface);
                }
            }
        }
        if let Some(grace) = &self.grace_notes {
            grace.render(surface);
        }
        self.render_decorations(surface);
        self.width().unwrap_or(0.0)
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn set_color(&mut self, color: Option<String>) {
        match &mut self.body {
            ChordBody::Notes(members) => {
                for member in members.iter_mut() {
                    member.set_color(color.clone());
                }
            }
            ChordBody::Normalized(chords) => {
                for chord in chords.iter_mut() {
                    chord.set_color(color.clone());
                }
            }
        }
        if let Some(grace) = self.grace_notes.as_mut() {
            grace.set_color(color.clone());
        }
        self.color = color;
    }
}
