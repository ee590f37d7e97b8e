//! Score metrics: the read-only sizing context shared by every visual
//! element.
//!
//! Metrics are plain configuration: they can be built from defaults, loaded
//! from a (partial) JSON document, or scaled for a different staff size.
//! Elements hold them through an [`std::rc::Rc`] handle and never mutate them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::Dimension;
use crate::renderer::constants::*;

/// Which family of glyphs a note is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotationContext {
    /// Regular, full-size notes
    Note,
    /// Small notes drawn before a host note
    GraceNote,
}

/// Sizing context for notes, stems, grace notes and slur anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreMetrics {
    /// Notehead glyph width
    pub note_glyph_width: f64,
    /// Notehead glyph height; also the unit of the vertical staff offset
    pub note_glyph_height: f64,
    pub grace_note_glyph_width: f64,
    pub grace_note_glyph_height: f64,
    /// Default stem length for regular notes
    pub stem_length: f64,
    /// Default stem length for grace notes
    pub grace_stem_length: f64,
    /// Stroke width of regular stems
    pub stem_width: f64,
    /// Stroke width of grace-note stems
    pub grace_stem_width: f64,
    /// Horizontal gap after each grace note
    pub grace_notes_spacing: f64,
    /// Stroke width of the beam joining a group of grace notes
    pub grace_beam_thickness: f64,
    /// Vertical clearance between a note or chord and a slur/tie end
    pub slur_anchor_y_offset: f64,
}

impl Default for ScoreMetrics {
    fn default() -> Self {
        Self {
            note_glyph_width: NOTE_GLYPH_WIDTH,
            note_glyph_height: NOTE_GLYPH_HEIGHT,
            grace_note_glyph_width: NOTE_GLYPH_WIDTH * GRACE_SCALE,
            grace_note_glyph_height: NOTE_GLYPH_HEIGHT * GRACE_SCALE,
            stem_length: STEM_LENGTH,
            grace_stem_length: STEM_LENGTH * GRACE_SCALE,
            stem_width: STEM_WIDTH,
            grace_stem_width: GRACE_STEM_WIDTH,
            grace_notes_spacing: GRACE_NOTES_SPACING,
            grace_beam_thickness: GRACE_BEAM_THICKNESS,
            slur_anchor_y_offset: SLUR_ANCHOR_Y_OFFSET,
        }
    }
}

impl ScoreMetrics {
    /// Parse metrics from JSON. Missing fields keep their default value.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let metrics: ScoreMetrics = serde_json::from_str(json)?;
        metrics.validate()?;
        Ok(metrics)
    }

    /// Read and parse a JSON metrics file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Uniformly scaled copy, e.g. for a smaller staff.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            note_glyph_width: self.note_glyph_width * factor,
            note_glyph_height: self.note_glyph_height * factor,
            grace_note_glyph_width: self.grace_note_glyph_width * factor,
            grace_note_glyph_height: self.grace_note_glyph_height * factor,
            stem_length: self.stem_length * factor,
            grace_stem_length: self.grace_stem_length * factor,
            stem_width: self.stem_width * factor,
            grace_stem_width: self.grace_stem_width * factor,
            grace_notes_spacing: self.grace_notes_spacing * factor,
            grace_beam_thickness: self.grace_beam_thickness * factor,
            slur_anchor_y_offset: self.slur_anchor_y_offset * factor,
        }
    }

    /// Check that every size is usable for layout.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("note_glyph_width", self.note_glyph_width),
            ("note_glyph_height", self.note_glyph_height),
            ("grace_note_glyph_width", self.grace_note_glyph_width),
            ("grace_note_glyph_height", self.grace_note_glyph_height),
            ("stem_length", self.stem_length),
            ("grace_stem_length", self.grace_stem_length),
            ("stem_width", self.stem_width),
            ("grace_stem_width", self.grace_stem_width),
            ("grace_beam_thickness", self.grace_beam_thickness),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::InvalidMetrics {
                    field,
                    value,
                    reason: "must be a finite value greater than zero",
                });
            }
        }

        let non_negative = [
            ("grace_notes_spacing", self.grace_notes_spacing),
            ("slur_anchor_y_offset", self.slur_anchor_y_offset),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidMetrics {
                    field,
                    value,
                    reason: "must be a finite value of at least zero",
                });
            }
        }
        Ok(())
    }

    pub fn glyph_dimension(&self, context: NotationContext) -> Dimension {
        match context {
            NotationContext::Note => Dimension::new(self.note_glyph_width, self.note_glyph_height),
            NotationContext::GraceNote => {
                Dimension::new(self.grace_note_glyph_width, self.grace_note_glyph_height)
            }
        }
    }

    pub fn stem_length(&self, context: NotationContext) -> f64 {
        match context {
            NotationContext::Note => self.stem_length,
            NotationContext::GraceNote => self.grace_stem_length,
        }
    }

    pub fn stem_width(&self, context: NotationContext) -> f64 {
        match context {
            NotationContext::Note => self.stem_width,
            NotationContext::GraceNote => self.grace_stem_width,
        }
    }

    /// Height of a regular notehead.
    pub fn note_height(&self) -> f64 {
        self.note_glyph_height
    }
}
