//! Visual elements: positioned, sized and hit-testable representations of
//! notes, chords and grace notes.
//!
//! Every element follows the same contract ([`ScoreElement`]): it is built
//! once from a logical element with an initial base and the shared metrics,
//! and each call to [`ScoreElement::set_base`] recomputes all of its geometry
//! (and that of the elements it owns) before returning. Until the first
//! `set_base`, width and bounding box are `None`.

pub(crate) mod constants;
mod chord;
mod decoration;
mod grace;
mod note;
mod slurs;
mod svg_builder;

use std::rc::Rc;

use log::warn;

use crate::geometry::{Point, Rect};
use crate::metrics::ScoreMetrics;
use crate::model::MusicElement;

use constants::DEFAULT_BOX_HEIGHT;

pub use chord::ChordElement;
pub use decoration::DecorationElement;
pub use grace::GraceNoteCluster;
pub use note::{auto_stem_up, NoteElement};
pub use slurs::{SlurAnchors, SlurSide};
pub use svg_builder::{DrawingSurface, Stroke, SvgBuilder};

// ═══════════════════════════════════════════════════════════════════════
// Element contract
// ═══════════════════════════════════════════════════════════════════════

/// Capabilities shared by every visual element.
pub trait ScoreElement {
    /// Reference point the element is laid out from.
    fn base(&self) -> Point;

    /// Move the element and recompute all derived geometry.
    fn set_base(&mut self, base: Point);

    /// Horizontal room taken by the element; `None` before layout.
    fn width(&self) -> Option<f64>;

    /// `None` before layout. Leaves without a better idea get a fixed-height
    /// box standing on the base and spanning their width.
    fn bounding_box(&self) -> Option<Rect> {
        let base = self.base();
        self.width().map(|width| {
            Rect::new(base.x, base.y - DEFAULT_BOX_HEIGHT, width, DEFAULT_BOX_HEIGHT)
        })
    }

    /// The most specific element whose bounding box contains `point`.
    fn element_at(&self, point: Point) -> Option<Hit<'_>>;

    /// Draw the element and return its width, so a caller can advance a
    /// horizontal cursor.
    fn render(&self, surface: &mut dyn DrawingSurface) -> f64;

    fn color(&self) -> Option<&str>;

    fn set_color(&mut self, color: Option<String>);
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy)]
pub enum Hit<'a> {
    Note(&'a NoteElement),
    Chord(&'a ChordElement),
}

impl<'a> Hit<'a> {
    pub fn as_note(&self) -> Option<&'a NoteElement> {
        match *self {
            Hit::Note(note) => Some(note),
            Hit::Chord(_) => None,
        }
    }

    pub fn as_chord(&self) -> Option<&'a ChordElement> {
        match *self {
            Hit::Chord(chord) => Some(chord),
            Hit::Note(_) => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Element factory
// ═══════════════════════════════════════════════════════════════════════

/// A top-level visual element built from a logical music element.
#[derive(Debug)]
pub enum Element {
    Note(NoteElement),
    Chord(ChordElement),
}

impl Element {
    /// Build the visual element for `element`, laid out at `base`.
    ///
    /// A missing element or a chord without notes is reported and skipped.
    pub fn build(
        element: Option<&MusicElement>,
        base: Point,
        metrics: &Rc<ScoreMetrics>,
    ) -> Option<Element> {
        let Some(element) = element else {
            warn!("no music element given at ({:.1}, {:.1}); skipped", base.x, base.y);
            return None;
        };
        let mut built = match element {
            MusicElement::Note(note) => {
                Element::Note(NoteElement::new(note.clone(), base, Rc::clone(metrics)))
            }
            MusicElement::MultiNote(multi_note) => {
                Element::Chord(ChordElement::new(multi_note.clone(), base, Rc::clone(metrics))?)
            }
        };
        built.set_base(base);
        Some(built)
    }

    fn inner(&self) -> &dyn ScoreElement {
        match self {
            Element::Note(note) => note,
            Element::Chord(chord) => chord,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn ScoreElement {
        match self {
            Element::Note(note) => note,
            Element::Chord(chord) => chord,
        }
    }
}

impl ScoreElement for Element {
    fn base(&self) -> Point {
        self.inner().base()
    }

    fn set_base(&mut self, base: Point) {
        self.inner_mut().set_base(base)
    }

    fn width(&self) -> Option<f64> {
        self.inner().width()
    }

    fn bounding_box(&self) -> Option<Rect> {
        self.inner().bounding_box()
    }

    fn element_at(&self, point: Point) -> Option<Hit<'_>> {
        self.inner().element_at(point)
    }

    fn render(&self, surface: &mut dyn DrawingSurface) -> f64 {
        self.inner().render(surface)
    }

    fn color(&self) -> Option<&str> {
        self.inner().color()
    }

    fn set_color(&mut self, color: Option<String>) {
        self.inner_mut().set_color(color)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SVG output
// ═══════════════════════════════════════════════════════════════════════

/// Render already positioned elements into a self-contained SVG string.
///
/// With `show_bounding_boxes` each element's box is outlined, which helps
/// when checking hit-test regions.
pub fn render_elements_to_svg(
    elements: &[Element],
    width: f64,
    height: f64,
    show_bounding_boxes: bool,
) -> String {
    let mut svg = SvgBuilder::new(width, height);
    let mut advance = 0.0;
    for element in elements {
        advance += element.render(&mut svg);
        if show_bounding_boxes {
            if let Some(bb) = element.bounding_box() {
                svg.debug_box(&bb);
            }
        }
    }
    log::debug!("rendered {} elements, {:.1} units wide", elements.len(), advance);
    svg.build()
}
