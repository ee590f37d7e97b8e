//! Grace-note clusters drawn before a host note or chord.

use std::rc::Rc;

use super::constants::NOTE_COLOR;
use super::note::NoteElement;
use super::svg_builder::{DrawingSurface, Stroke};
use super::{Hit, ScoreElement};
use crate::geometry::{Point, Rect};
use crate::metrics::{NotationContext, ScoreMetrics};
use crate::model::Note;

/// One or more grace notes laid out left to right from the cluster base.
///
/// A group of several grace notes is beamed: all stems share the row of the
/// highest default stem end and a beam joins the first and last stem.
#[derive(Debug)]
pub struct GraceNoteCluster {
    notes: Vec<NoteElement>,
    metrics: Rc<ScoreMetrics>,
    base: Point,
    color: Option<String>,
    width: Option<f64>,
    beam: Option<(Point, Point)>,
}

impl GraceNoteCluster {
    /// `None` when there are no grace notes to draw.
    pub fn new(grace_notes: &[Note], base: Point, metrics: Rc<ScoreMetrics>) -> Option<Self> {
        if grace_notes.is_empty() {
            return None;
        }
        let notes = grace_notes
            .iter()
            .map(|n| NoteElement::grace(n, base, Rc::clone(&metrics)))
            .collect();
        Some(Self {
            notes,
            metrics,
            base,
            color: None,
            width: None,
            beam: None,
        })
    }

    pub fn notes(&self) -> &[NoteElement] {
        &self.notes
    }

    pub fn is_beamed(&self) -> bool {
        self.notes.len() > 1
    }

    /// Beam segment from the first to the last stem end; `None` for a single
    /// grace note or before layout.
    pub fn beam(&self) -> Option<(Point, Point)> {
        self.beam
    }

    fn on_base_changed(&mut self) {
        let glyph = self.metrics.glyph_dimension(NotationContext::GraceNote);
        let stem_length = self.metrics.stem_length(NotationContext::GraceNote);
        let spacing = self.metrics.grace_notes_spacing;
        let base = self.base;

        let row = if self.is_beamed() {
            self.notes
                .iter()
                .map(|n| n.stem_begin_y_at(base.y, true) - stem_length)
                .reduce(f64::min)
        } else {
            None
        };

        let mut x = base.x;
        for note in self.notes.iter_mut() {
            note.configure(true, row);
            note.set_base(Point::new(x, base.y));
            x += glyph.width + spacing;
        }
        self.width = Some(x - base.x);

        self.beam = match (row, self.notes.first(), self.notes.last()) {
            (Some(row), Some(first), Some(last)) => first
                .stem_begin()
                .zip(last.stem_begin())
                .map(|(a, b)| (Point::new(a.x, row), Point::new(b.x, row))),
            _ => None,
        };
    }
}

impl ScoreElement for GraceNoteCluster {
    fn base(&self) -> Point {
        self.base
    }

    fn set_base(&mut self, base: Point) {
        self.base = base;
        self.on_base_changed();
    }

    /// Includes the trailing gap after the last grace note.
    fn width(&self) -> Option<f64> {
        self.width
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.notes
            .iter()
            .filter_map(|n| n.bounding_box())
            .reduce(|acc, bb| acc.union(&bb))
    }

    fn element_at(&self, point: Point) -> Option<Hit<'_>> {
        self.notes.iter().find_map(|n| n.element_at(point))
    }

    fn render(&self, surface: &mut dyn DrawingSurface) -> f64 {
        for note in &self.notes {
            note.render(surface);
        }
        if let Some((from, to)) = self.beam {
            let stroke = Stroke {
                width: self.metrics.grace_beam_thickness,
                color: self.color.as_deref().unwrap_or(NOTE_COLOR),
            };
            surface.line(from, to, &stroke);
        }
        self.width.unwrap_or(0.0)
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn set_color(&mut self, color: Option<String>) {
        for note in self.notes.iter_mut() {
            note.set_color(color.clone());
        }
        self.color = color;
    }
}
