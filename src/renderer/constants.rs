//! Default metrics for the layout engine (all in SVG user units).

// ── Staff ───────────────────────────────────────────────────────────
pub(crate) const STAFF_LINE_SPACING: f64 = 10.0; // distance between staff lines

// ── Note dimensions ─────────────────────────────────────────────────
pub(crate) const NOTE_GLYPH_WIDTH: f64 = 11.0; // notehead ellipse, 2 × x-radius
pub(crate) const NOTE_GLYPH_HEIGHT: f64 = STAFF_LINE_SPACING;
pub(crate) const STEM_LENGTH: f64 = 30.0;
pub(crate) const STEM_WIDTH: f64 = 1.2;

// ── Grace notes ─────────────────────────────────────────────────────
pub(crate) const GRACE_SCALE: f64 = 0.66;
pub(crate) const GRACE_STEM_WIDTH: f64 = STEM_WIDTH * 0.85;
pub(crate) const GRACE_NOTES_SPACING: f64 = 3.0; // gap after each grace note
pub(crate) const GRACE_BEAM_THICKNESS: f64 = 2.0;

// ── Slurs & decorations ─────────────────────────────────────────────
pub(crate) const SLUR_ANCHOR_Y_OFFSET: f64 = 3.0;

// ── Hit testing ─────────────────────────────────────────────────────
pub(crate) const DEFAULT_BOX_HEIGHT: f64 = 50.0; // leaf box when nothing better is known

// ── Colors ──────────────────────────────────────────────────────────
pub(crate) const NOTE_COLOR: &str = "#1a1a1a";
pub(crate) const DEBUG_BOX_COLOR: &str = "#d03030";
