//! Single note layout: vertical placement, stem geometry, bounding box and
//! slur anchors. The same element is used for standalone notes, chord
//! members and grace notes; only the notation context and who decides the
//! stem differ.

use std::rc::Rc;

use log::{debug, warn};

use super::constants::NOTE_COLOR;
use super::decoration::{place_decorations, DecorationElement};
use super::grace::GraceNoteCluster;
use super::slurs::SlurAnchors;
use super::svg_builder::{DrawingSurface, Stroke};
use super::{Hit, ScoreElement};
use crate::error::LayoutError;
use crate::geometry::{Point, Rect};
use crate::metrics::{NotationContext, ScoreMetrics};
use crate::model::{Note, Pitch, StrictDuration};

/// Default stem direction for a note (or chord) spanning `lowest..=highest`,
/// judged against the staff middle line.
///
/// Stems go up when everything sits on or below the middle line, down when
/// everything is above it. Otherwise the note furthest from the middle line
/// wins; equal distances go down.
pub fn auto_stem_up(highest: &Pitch, lowest: &Pitch) -> bool {
    let middle = Pitch::MIDDLE_LINE.height();
    let h = highest.height();
    let l = lowest.height();
    if h <= middle {
        true
    } else if l > middle {
        false
    } else {
        (h - middle) < (middle - l)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct NoteGeometry {
    /// Left edge of the notehead (after the grace-note shift)
    x: f64,
    /// Row the notehead is centred on
    center_y: f64,
    stem_begin: Point,
    stem_end_y: f64,
    width: f64,
}

/// Visual element for one note.
#[derive(Debug)]
pub struct NoteElement {
    note: Note,
    metrics: Rc<ScoreMetrics>,
    context: NotationContext,
    base: Point,
    color: Option<String>,
    stem_up: bool,
    auto_stem: bool,
    /// Stem end row injected by a chord or beam group
    stem_end_row: Option<f64>,
    is_lowest: bool,
    is_highest: bool,
    grace_notes: Option<GraceNoteCluster>,
    decorations: Vec<DecorationElement>,
    geometry: Option<NoteGeometry>,
}

impl NoteElement {
    /// Build the element for `note`. Nothing is laid out until
    /// [`ScoreElement::set_base`] is called.
    pub fn new(note: Note, base: Point, metrics: Rc<ScoreMetrics>) -> Self {
        let grace_notes = GraceNoteCluster::new(&note.grace_notes, base, Rc::clone(&metrics));
        let decorations = note
            .decorations
            .iter()
            .copied()
            .map(DecorationElement::new)
            .collect();
        Self {
            note,
            metrics,
            context: NotationContext::Note,
            base,
            color: None,
            stem_up: true,
            auto_stem: true,
            stem_end_row: None,
            is_lowest: false,
            is_highest: false,
            grace_notes,
            decorations,
            geometry: None,
        }
    }

    /// A small note inside a grace-note cluster. Grace stems always go up.
    pub(crate) fn grace(note: &Note, base: Point, metrics: Rc<ScoreMetrics>) -> Self {
        let mut grace = Self::new(Note::new(note.pitch, note.duration), base, metrics);
        grace.context = NotationContext::GraceNote;
        grace.auto_stem = false;
        grace
    }

    /// A member of a chord. Grace notes and decorations belong to the chord
    /// as a whole, so any attached to an individual member are dropped.
    pub(crate) fn chord_member(note: &Note, base: Point, metrics: Rc<ScoreMetrics>) -> Self {
        if note.has_grace_notes() || note.has_decorations() {
            debug!(
                "ignoring grace notes/decorations attached to chord member {:?}",
                note.pitch
            );
        }
        let mut member = Note::new(note.pitch, note.duration);
        member.dots = note.dots;
        Self::new(member, base, metrics)
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn pitch(&self) -> &Pitch {
        &self.note.pitch
    }

    pub fn context(&self) -> NotationContext {
        self.context
    }

    pub fn is_stem_up(&self) -> bool {
        self.stem_up
    }

    pub fn is_auto_stem(&self) -> bool {
        self.auto_stem
    }

    /// Force the stem direction. Disables automatic stemming.
    pub fn set_stem_up(&mut self, stem_up: bool) {
        self.stem_up = stem_up;
        self.auto_stem = false;
        self.relayout();
    }

    pub fn set_auto_stem(&mut self, auto_stem: bool) {
        self.auto_stem = auto_stem;
        self.relayout();
    }

    /// Stem end row injected by an enclosing beam group; `None` restores the
    /// default stem length.
    pub fn set_stem_end_row(&mut self, row: Option<f64>) {
        self.stem_end_row = row;
        self.relayout();
    }

    pub fn stem_end_row(&self) -> Option<f64> {
        self.stem_end_row
    }

    /// Direction and stem row decided by a parent. Takes effect on the next
    /// `set_base`, which the parent always issues right after.
    pub(crate) fn configure(&mut self, stem_up: bool, stem_end_row: Option<f64>) {
        self.stem_up = stem_up;
        self.auto_stem = false;
        self.stem_end_row = stem_end_row;
    }

    pub fn is_lowest(&self) -> bool {
        self.is_lowest
    }

    pub fn is_highest(&self) -> bool {
        self.is_highest
    }

    pub(crate) fn set_chord_position(&mut self, is_lowest: bool, is_highest: bool) {
        self.is_lowest = is_lowest;
        self.is_highest = is_highest;
    }

    pub fn grace_notes(&self) -> Option<&GraceNoteCluster> {
        self.grace_notes.as_ref()
    }

    pub fn decorations(&self) -> &[DecorationElement] {
        &self.decorations
    }

    /// Whole notes are drawn without a stem.
    pub fn has_stem(&self) -> bool {
        self.note.duration != StrictDuration::Whole
    }

    /// Where the stem leaves the notehead; `None` before layout.
    pub fn stem_begin(&self) -> Option<Point> {
        self.geometry.map(|g| g.stem_begin)
    }

    /// Resolved stem end row; `None` before layout.
    pub fn stem_end_y(&self) -> Option<f64> {
        self.geometry.map(|g| g.stem_end_y)
    }

    /// End of the stem. Fails until a stem end has been established.
    pub fn end_of_stem(&self) -> Result<Point, LayoutError> {
        self.geometry
            .map(|g| Point::new(g.stem_begin.x, g.stem_end_y))
            .ok_or(LayoutError::StemEndUnset)
    }

    /// Centre of the notehead; `None` before layout.
    pub fn note_center(&self) -> Option<Point> {
        let glyph = self.metrics.glyph_dimension(self.context);
        self.geometry
            .map(|g| Point::new(g.x + glyph.width / 2.0, g.center_y))
    }

    /// Row the stem would begin on if this note were anchored at `base_y`
    /// with the given direction. Pure: does not touch the current layout.
    pub fn stem_begin_y_at(&self, base_y: f64, stem_up: bool) -> f64 {
        let glyph = self.metrics.glyph_dimension(self.context);
        let center_y = base_y - self.note.pitch.staff_offset() * glyph.height;
        if stem_up {
            center_y - glyph.height / 6.0
        } else {
            center_y + glyph.height / 6.0
        }
    }

    pub(crate) fn set_stem_begin_x(&mut self, x: f64) {
        if let Some(g) = self.geometry.as_mut() {
            g.stem_begin.x = x;
        }
    }

    pub fn slur_anchors(&self) -> Option<SlurAnchors> {
        let g = self.geometry?;
        let center = self.note_center()?;
        let glyph = self.metrics.glyph_dimension(self.context);
        Some(SlurAnchors::for_note(
            center,
            glyph.height,
            g.stem_begin.x,
            g.stem_end_y,
            self.stem_up,
            self.metrics.slur_anchor_y_offset,
        ))
    }

    fn relayout(&mut self) {
        if self.geometry.is_some() {
            self.on_base_changed();
        }
    }

    fn on_base_changed(&mut self) {
        let metrics = Rc::clone(&self.metrics);
        let glyph = metrics.glyph_dimension(self.context);

        let mut x = self.base.x;
        if let Some(grace) = self.grace_notes.as_mut() {
            grace.set_base(self.base);
            x += grace.width().unwrap_or(0.0);
        }

        if self.auto_stem {
            self.stem_up = auto_stem_up(&self.note.pitch, &self.note.pitch);
        }

        let center_y = self.base.y - self.note.pitch.staff_offset() * glyph.height;
        let stem_begin_y = self.stem_begin_y_at(self.base.y, self.stem_up);
        let half_stroke = metrics.stem_width(self.context) / 2.0;
        let stem_x = if self.stem_up {
            x + glyph.width - half_stroke
        } else {
            x + half_stroke
        };
        let stem_length = metrics.stem_length(self.context);
        let stem_end_y = self.stem_end_row.unwrap_or(if self.stem_up {
            stem_begin_y - stem_length
        } else {
            stem_begin_y + stem_length
        });

        self.geometry = Some(NoteGeometry {
            x,
            center_y,
            stem_begin: Point::new(stem_x, stem_begin_y),
            stem_end_y,
            width: x - self.base.x + glyph.width,
        });

        if let Some(note_box) = self.bounding_box() {
            place_decorations(
                &mut self.decorations,
                &note_box,
                self.stem_up,
                glyph.height,
                metrics.slur_anchor_y_offset,
            );
        }
    }
}

impl ScoreElement for NoteElement {
    fn base(&self) -> Point {
        self.base
    }

    fn set_base(&mut self, base: Point) {
        self.base = base;
        self.on_base_changed();
    }

    fn width(&self) -> Option<f64> {
        self.geometry.map(|g| g.width)
    }

    /// From the stem end to the far edge of the notehead.
    fn bounding_box(&self) -> Option<Rect> {
        let g = self.geometry?;
        let glyph = self.metrics.glyph_dimension(self.context);
        let top = g.center_y - glyph.height / 2.0;
        let bottom = g.center_y + glyph.height / 2.0;
        let (y1, y2) = if self.stem_up {
            (g.stem_end_y.min(top), bottom)
        } else {
            (top, g.stem_end_y.max(bottom))
        };
        Some(Rect::new(g.x, y1, glyph.width, y2 - y1))
    }

    fn element_at(&self, point: Point) -> Option<Hit<'_>> {
        if let Some(hit) = self.grace_notes.as_ref().and_then(|g| g.element_at(point)) {
            return Some(hit);
        }
        self.bounding_box()
            .filter(|bb| bb.contains(point))
            .map(|_| Hit::Note(self))
    }

    fn render(&self, surface: &mut dyn DrawingSurface) -> f64 {
        let Some(g) = self.geometry else {
            warn!("note {:?} rendered before layout; skipped", self.note.pitch);
            return 0.0;
        };

        if self.has_stem() {
            let stroke = Stroke {
                width: self.metrics.stem_width(self.context),
                color: self.color.as_deref().unwrap_or(NOTE_COLOR),
            };
            surface.line(g.stem_begin, Point::new(g.stem_begin.x, g.stem_end_y), &stroke);
        }

        if let Some(grace) = &self.grace_notes {
            grace.render(surface);
        }
        for decoration in &self.decorations {
            decoration.render(surface);
        }
        g.width
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn set_color(&mut self, color: Option<String>) {
        if let Some(grace) = self.grace_notes.as_mut() {
            grace.set_color(color.clone());
        }
        self.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteName;

    fn pitch(name: NoteName, octave: i32) -> Pitch {
        Pitch::new(name, octave)
    }

    #[test]
    fn auto_stem_rule() {
        // everything on or below the middle line
        assert!(auto_stem_up(&pitch(NoteName::B, 0), &pitch(NoteName::C, 0)));
        // everything above it
        assert!(!auto_stem_up(&pitch(NoteName::E, 1), &pitch(NoteName::C, 1)));
        // straddling: A..c, highest is closer to B
        assert!(auto_stem_up(&pitch(NoteName::C, 1), &pitch(NoteName::A, 0)));
        // straddling: G..e, highest is further from B
        assert!(!auto_stem_up(&pitch(NoteName::E, 1), &pitch(NoteName::G, 0)));
        // exact tie: F..f
        assert!(!auto_stem_up(&pitch(NoteName::F, 1), &pitch(NoteName::F, 0)));
    }
}
