//! Slur and tie anchor points.
//!
//! Every note or chord exposes one anchor above and one below. When a side
//! is occupied by the stem, the slur has to clear the stem end instead of
//! the notehead; that replacement is the "out of stem" anchor.

use crate::geometry::{Point, Rect};

/// Side of a note a slur or tie attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlurSide {
    Above,
    Under,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlurAnchors {
    /// Anchor above the notehead
    pub above: Point,
    /// Anchor under the notehead
    pub under: Point,
    /// Anchor to use above when the stem may be in the way
    pub above_out_of_stem: Point,
    /// Anchor to use under when the stem may be in the way
    pub under_out_of_stem: Point,
}

impl SlurAnchors {
    /// Anchor a slur should use on `side`. The out-of-stem variant equals the
    /// natural anchor whenever the stem is on the other side.
    pub fn anchor(&self, side: SlurSide) -> Point {
        match side {
            SlurSide::Above => self.above_out_of_stem,
            SlurSide::Under => self.under_out_of_stem,
        }
    }

    /// Whether `side` had to be moved off the notehead because of the stem.
    pub fn is_substituted(&self, side: SlurSide) -> bool {
        match side {
            SlurSide::Above => self.above_out_of_stem != self.above,
            SlurSide::Under => self.under_out_of_stem != self.under,
        }
    }

    /// Anchors of a single note whose glyph is centred on `center`.
    pub(crate) fn for_note(
        center: Point,
        glyph_height: f64,
        stem_x: f64,
        stem_end_y: f64,
        stem_up: bool,
        offset: f64,
    ) -> Self {
        let above = Point::new(center.x, center.y - glyph_height / 2.0 - offset);
        let under = Point::new(center.x, center.y + glyph_height / 2.0 + offset);
        Self {
            above,
            under,
            above_out_of_stem: if stem_up {
                Point::new(stem_x, stem_end_y - offset)
            } else {
                above
            },
            under_out_of_stem: if stem_up {
                under
            } else {
                Point::new(stem_x, stem_end_y + offset)
            },
        }
    }

    /// Anchors of a chord: `under` comes from its lowest note, `above` from
    /// its highest; the stem side moves to the corner of the chord's box.
    pub(crate) fn for_chord(
        under: Point,
        above: Point,
        bounding_box: &Rect,
        stem_up: bool,
        offset: f64,
    ) -> Self {
        Self {
            above,
            under,
            above_out_of_stem: if stem_up {
                Point::new(bounding_box.max_x(), bounding_box.min_y() - offset)
            } else {
                above
            },
            under_out_of_stem: if stem_up {
                under
            } else {
                Point::new(bounding_box.min_x(), bounding_box.max_y() + offset)
            },
        }
    }
}
