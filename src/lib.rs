//! notelayout: geometry engine turning notes, chords and grace notes into
//! positioned, sized and hit-testable visual elements.
//!
//! Parsing, glyph drawing and staff-line layout live elsewhere: this crate
//! takes the logical music model, a set of [`ScoreMetrics`] and a base point,
//! and answers "how wide is it", "where is its box", "where do its stems and
//! slur anchors go" and "what is under the pointer".
//!
//! # Example
//! ```
//! use std::rc::Rc;
//! use notelayout::{
//!     ChordElement, MultiNote, Note, NoteName, Pitch, Point, ScoreElement, ScoreMetrics,
//!     StrictDuration,
//! };
//!
//! let metrics = Rc::new(ScoreMetrics::default());
//! let chord = MultiNote::new(vec![
//!     Note::new(Pitch::new(NoteName::C, 0), StrictDuration::Quarter),
//!     Note::new(Pitch::new(NoteName::E, 0), StrictDuration::Quarter),
//!     Note::new(Pitch::new(NoteName::G, 0), StrictDuration::Quarter),
//! ]);
//! let mut element = ChordElement::new(chord, Point::new(0.0, 100.0), metrics).unwrap();
//! assert!(element.width().is_none());
//!
//! element.set_base(Point::new(20.0, 100.0));
//! assert!(element.is_stem_up());
//! assert!(element.width().unwrap() > 0.0);
//! ```

pub mod error;
pub mod geometry;
pub mod metrics;
pub mod model;
pub mod renderer;

pub use error::LayoutError;
pub use geometry::{Dimension, Point, Rect};
pub use metrics::{NotationContext, ScoreMetrics};
pub use model::*;
pub use renderer::{
    auto_stem_up, render_elements_to_svg, ChordElement, DecorationElement, DrawingSurface,
    Element, GraceNoteCluster, Hit, NoteElement, ScoreElement, SlurAnchors, SlurSide, Stroke,
    SvgBuilder,
};
