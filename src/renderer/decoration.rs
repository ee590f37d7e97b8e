//! Decoration overlays (articulations, ornaments, bowings).
//!
//! Decorations never change the width or bounding box of their note. They
//! are stacked outward from the note on the side away from the stem, except
//! for the few that always sit above the staff.

use super::svg_builder::DrawingSurface;
use crate::geometry::{Point, Rect};
use crate::model::Decoration;

impl Decoration {
    pub fn css_class(&self) -> &'static str {
        match self {
            Decoration::Staccato => "decoration-staccato",
            Decoration::Accent => "decoration-accent",
            Decoration::Tenuto => "decoration-tenuto",
            Decoration::Fermata => "decoration-fermata",
            Decoration::Trill => "decoration-trill",
            Decoration::Roll => "decoration-roll",
            Decoration::UpBow => "decoration-up-bow",
            Decoration::DownBow => "decoration-down-bow",
        }
    }

    pub fn always_above(&self) -> bool {
        matches!(
            self,
            Decoration::Fermata | Decoration::Trill | Decoration::UpBow | Decoration::DownBow
        )
    }
}

/// A positioned decoration attached to a note.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationElement {
    decoration: Decoration,
    position: Option<Point>,
}

impl DecorationElement {
    pub fn new(decoration: Decoration) -> Self {
        Self {
            decoration,
            position: None,
        }
    }

    pub fn decoration(&self) -> Decoration {
        self.decoration
    }

    /// Where the decoration glyph is centred; `None` before layout.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn render(&self, surface: &mut dyn DrawingSurface) {
        if let Some(at) = self.position {
            surface.overlay(self.decoration, at);
        }
    }
}

/// Stack `decorations` around `note_box`. `step` is the room taken by one
/// decoration, `offset` the clearance from the note.
pub(crate) fn place_decorations(
    decorations: &mut [DecorationElement],
    note_box: &Rect,
    stem_up: bool,
    step: f64,
    offset: f64,
) {
    let center_x = note_box.x + note_box.width / 2.0;
    let mut above = 0;
    let mut under = 0;
    for element in decorations.iter_mut() {
        let put_above = element.decoration.always_above() || !stem_up;
        let y = if put_above {
            above += 1;
            note_box.min_y() - offset - step * (above - 1) as f64
        } else {
            under += 1;
            note_box.max_y() + offset + step * (under - 1) as f64
        };
        element.position = Some(Point::new(center_x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacks_away_from_the_stem() {
        let mut decorations = vec![
            DecorationElement::new(Decoration::Staccato),
            DecorationElement::new(Decoration::Accent),
            DecorationElement::new(Decoration::Fermata),
        ];
        let note_box = Rect::new(0.0, 0.0, 10.0, 40.0);
        place_decorations(&mut decorations, &note_box, true, 8.0, 3.0);

        assert_eq!(decorations[0].position(), Some(Point::new(5.0, 43.0)));
        assert_eq!(decorations[1].position(), Some(Point::new(5.0, 51.0)));
        assert_eq!(decorations[2].position(), Some(Point::new(5.0, -3.0)));
    }
}
