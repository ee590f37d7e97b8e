//! Drawing surface abstraction and the SVG builder implementing it.
//!
//! Layout elements only ever draw lines (stems and grace beams). Glyphs are
//! handled by a separate renderer keyed off the same logical notes; the SVG
//! builder leaves a positioned marker group for each decoration so that
//! renderer can find them.

use super::constants::*;
use crate::geometry::{Point, Rect};
use crate::model::Decoration;

/// Stroke used for a line primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub width: f64,
    pub color: &'a str,
}

/// Target of [`ScoreElement::render`](super::ScoreElement::render).
pub trait DrawingSurface {
    fn line(&mut self, from: Point, to: Point, stroke: &Stroke<'_>);

    /// Position of a decoration overlay. Surfaces that don't draw glyphs
    /// ignore it.
    fn overlay(&mut self, _decoration: Decoration, _at: Point) {}
}

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub struct SvgBuilder {
    pub(crate) elements: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Outline a rectangle; used to visualise bounding boxes.
    pub fn debug_box(&mut self, rect: &Rect) {
        self.elements.push(format!(
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{}" stroke-width="0.5"/>"#,
            rect.x, rect.y, rect.width, rect.height, DEBUG_BOX_COLOR
        ));
    }
}

impl DrawingSurface for SvgBuilder {
    fn line(&mut self, from: Point, to: Point, stroke: &Stroke<'_>) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            from.x, from.y, to.x, to.y, stroke.color, stroke.width
        ));
    }

    fn overlay(&mut self, decoration: Decoration, at: Point) {
        self.elements.push(format!(
            r#"<g class="decoration {}" transform="translate({:.1},{:.1})"/>"#,
            decoration.css_class(),
            at.x,
            at.y
        ));
    }
}
