//! Single note layout: vertical placement, stems, boxes, grace notes and
//! decorations.

use std::rc::Rc;

use notelayout::{
    Decoration, LayoutError, NotationContext, Note, NoteElement, NoteName, Pitch, Point, Rect,
    ScoreElement, ScoreMetrics, StrictDuration, SvgBuilder,
};
use pretty_assertions::assert_eq;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn metrics() -> Rc<ScoreMetrics> {
    Rc::new(ScoreMetrics::default())
}

fn quarter(name: NoteName, octave: i32) -> Note {
    Note::new(Pitch::new(name, octave), StrictDuration::Quarter)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn geometry_is_unset_before_first_layout() {
    init_logger();
    let note = NoteElement::new(quarter(NoteName::C, 0), Point::new(0.0, 100.0), metrics());

    assert_eq!(note.width(), None);
    assert_eq!(note.bounding_box(), None);
    assert_eq!(note.stem_end_y(), None);
    assert!(matches!(note.end_of_stem(), Err(LayoutError::StemEndUnset)));
}

#[test]
fn vertical_placement_follows_the_offset_table() {
    init_logger();
    let mut c = NoteElement::new(quarter(NoteName::C, 0), Point::default(), metrics());
    c.set_base(Point::new(0.0, 100.0));
    // C is one step below E: 100 - (-1 × 10)
    assert_close(c.note_center().unwrap().y, 110.0);

    let mut b = NoteElement::new(quarter(NoteName::B, 1), Point::default(), metrics());
    b.set_base(Point::new(0.0, 100.0));
    // 2 + 3.5 steps above E
    assert_close(b.note_center().unwrap().y, 45.0);
}

#[test]
fn stem_up_geometry() {
    init_logger();
    let mut note = NoteElement::new(quarter(NoteName::C, 0), Point::default(), metrics());
    note.set_base(Point::new(0.0, 100.0));

    assert!(note.is_stem_up());
    let begin = note.stem_begin().unwrap();
    assert_close(begin.x, 11.0 - 0.6);
    assert_close(begin.y, 110.0 - 10.0 / 6.0);

    let end = note.end_of_stem().unwrap();
    assert_close(end.x, begin.x);
    assert_close(end.y, begin.y - 30.0);

    let bb = note.bounding_box().unwrap();
    assert_close(bb.x, 0.0);
    assert_close(bb.width, 11.0);
    assert_close(bb.min_y(), end.y);
    assert_close(bb.max_y(), 115.0);
    assert_eq!(note.width(), Some(11.0));
}

#[test]
fn stem_down_geometry() {
    init_logger();
    let mut note = NoteElement::new(quarter(NoteName::C, 0), Point::new(0.0, 100.0), metrics());
    note.set_stem_up(false);
    assert!(!note.is_auto_stem());
    note.set_base(Point::new(0.0, 100.0));

    let begin = note.stem_begin().unwrap();
    assert_close(begin.x, 0.6);
    assert_close(begin.y, 110.0 + 10.0 / 6.0);
    assert_close(note.stem_end_y().unwrap(), begin.y + 30.0);

    let bb = note.bounding_box().unwrap();
    assert_close(bb.min_y(), 105.0);
    assert_close(bb.max_y(), begin.y + 30.0);
}

#[test]
fn single_note_auto_stem() {
    init_logger();
    let mut a = NoteElement::new(quarter(NoteName::A, 0), Point::default(), metrics());
    a.set_base(Point::new(0.0, 100.0));
    assert!(a.is_stem_up());

    let mut high_c = NoteElement::new(quarter(NoteName::C, 1), Point::default(), metrics());
    high_c.set_base(Point::new(0.0, 100.0));
    assert!(!high_c.is_stem_up());
}

#[test]
fn injected_stem_end_row_wins_over_the_default() {
    init_logger();
    let mut note = NoteElement::new(quarter(NoteName::E, 0), Point::default(), metrics());
    note.set_base(Point::new(0.0, 100.0));
    note.set_stem_end_row(Some(50.0));

    assert_eq!(note.stem_end_row(), Some(50.0));
    assert_close(note.end_of_stem().unwrap().y, 50.0);
    assert_close(note.bounding_box().unwrap().min_y(), 50.0);

    note.set_stem_end_row(None);
    let begin = note.stem_begin().unwrap();
    assert_close(note.stem_end_y().unwrap(), begin.y - 30.0);
}

#[test]
fn set_base_is_idempotent() {
    init_logger();
    let note = quarter(NoteName::G, 0).with_grace_notes(vec![quarter(NoteName::A, 0)]);
    let mut element = NoteElement::new(note, Point::default(), metrics());

    element.set_base(Point::new(13.0, 87.5));
    let first = (element.width(), element.bounding_box(), element.stem_begin());
    element.set_base(Point::new(13.0, 87.5));
    let second = (element.width(), element.bounding_box(), element.stem_begin());

    assert_eq!(first, second);
}

#[test]
fn moving_the_base_moves_the_geometry() {
    init_logger();
    let mut note = NoteElement::new(quarter(NoteName::D, 0), Point::default(), metrics());
    note.set_base(Point::new(0.0, 100.0));
    let before = note.bounding_box().unwrap();

    note.set_base(Point::new(25.0, 140.0));
    let after = note.bounding_box().unwrap();

    let expected = Rect::new(before.x + 25.0, before.y + 40.0, before.width, before.height);
    assert_close(after.x, expected.x);
    assert_close(after.y, expected.y);
    assert_close(after.width, expected.width);
    assert_close(after.height, expected.height);
}

#[test]
fn grace_notes_shift_the_host_note() {
    init_logger();
    let m = metrics();
    let note = quarter(NoteName::C, 0).with_grace_notes(vec![quarter(NoteName::D, 0)]);
    let mut element = NoteElement::new(note, Point::default(), Rc::clone(&m));
    element.set_base(Point::new(0.0, 100.0));

    let grace = element.grace_notes().expect("grace cluster");
    assert_eq!(grace.notes().len(), 1);
    assert_eq!(grace.notes()[0].context(), NotationContext::GraceNote);
    assert!(!grace.is_beamed());

    let grace_width = m.grace_note_glyph_width + m.grace_notes_spacing;
    assert_close(grace.width().unwrap(), grace_width);
    assert_close(element.width().unwrap(), grace_width + m.note_glyph_width);
    assert_close(element.bounding_box().unwrap().x, grace_width);
}

#[test]
fn grace_note_groups_share_one_beamed_stem_row() {
    init_logger();
    let graces = vec![
        quarter(NoteName::C, 0),
        quarter(NoteName::G, 0),
        quarter(NoteName::E, 0),
    ];
    let mut element = NoteElement::new(
        quarter(NoteName::F, 0).with_grace_notes(graces),
        Point::default(),
        metrics(),
    );
    element.set_base(Point::new(0.0, 100.0));

    let grace = element.grace_notes().unwrap();
    assert!(grace.is_beamed());
    let rows: Vec<f64> = grace.notes().iter().map(|n| n.stem_end_y().unwrap()).collect();
    assert!(rows.iter().all(|r| *r == rows[0]));
    assert!(grace.notes().iter().all(|n| n.is_stem_up()));

    // the highest grace note (G) decides the row
    let g = &grace.notes()[1];
    let expected = g.stem_begin().unwrap().y - ScoreMetrics::default().grace_stem_length;
    assert_close(rows[0], expected);

    let (from, to) = grace.beam().unwrap();
    assert_close(from.y, rows[0]);
    assert_close(to.x, grace.notes()[2].stem_begin().unwrap().x);

    let mut svg = SvgBuilder::new(100.0, 200.0);
    element.render(&mut svg);
    // host stem + 3 grace stems + beam
    assert_eq!(svg.build().matches("<line").count(), 5);
}

#[test]
fn decorations_sit_away_from_the_stem() {
    init_logger();
    let note = quarter(NoteName::C, 0).with_decorations(vec![Decoration::Staccato, Decoration::Fermata]);
    let mut element = NoteElement::new(note, Point::default(), metrics());
    element.set_base(Point::new(0.0, 100.0));

    let bb = element.bounding_box().unwrap();
    let decorations = element.decorations();
    assert_eq!(decorations.len(), 2);

    let staccato = decorations[0].position().unwrap();
    assert_close(staccato.x, 5.5);
    assert_close(staccato.y, bb.max_y() + 3.0);

    let fermata = decorations[1].position().unwrap();
    assert_close(fermata.y, bb.min_y() - 3.0);

    // decorations never change the note's own extent
    assert_eq!(element.width(), Some(11.0));
}

#[test]
fn render_draws_stem_then_overlays() {
    init_logger();
    let note = quarter(NoteName::E, 0).with_decorations(vec![Decoration::Accent]);
    let mut element = NoteElement::new(note, Point::default(), metrics());
    element.set_base(Point::new(0.0, 100.0));

    let mut svg = SvgBuilder::new(100.0, 200.0);
    let advance = element.render(&mut svg);
    let out = svg.build();

    assert_eq!(advance, 11.0);
    assert_eq!(out.matches("<line").count(), 1);
    let stem = out.find("<line").unwrap();
    let accent = out.find("decoration-accent").unwrap();
    assert!(stem < accent);
}

#[test]
fn whole_notes_have_no_stem_line() {
    init_logger();
    let note = Note::new(Pitch::new(NoteName::F, 0), StrictDuration::Whole);
    let mut element = NoteElement::new(note, Point::default(), metrics());
    element.set_base(Point::new(0.0, 100.0));

    let mut svg = SvgBuilder::new(100.0, 200.0);
    element.render(&mut svg);
    assert_eq!(svg.build().matches("<line").count(), 0);
}

#[test]
fn render_before_layout_draws_nothing() {
    init_logger();
    let element = NoteElement::new(quarter(NoteName::E, 0), Point::default(), metrics());
    let mut svg = SvgBuilder::new(100.0, 200.0);
    assert_eq!(element.render(&mut svg), 0.0);
    assert_eq!(svg.build().matches("<line").count(), 0);
}

#[test]
fn color_is_used_for_the_stem() {
    init_logger();
    let mut element = NoteElement::new(quarter(NoteName::E, 0), Point::default(), metrics());
    element.set_color(Some("#ff0000".to_string()));
    element.set_base(Point::new(0.0, 100.0));

    let mut svg = SvgBuilder::new(100.0, 200.0);
    element.render(&mut svg);
    assert!(svg.build().contains("stroke=\"#ff0000\""));
}

#[test]
fn color_reaches_the_grace_notes() {
    init_logger();
    let note = quarter(NoteName::C, 0).with_grace_notes(vec![quarter(NoteName::D, 0)]);
    let mut element = NoteElement::new(note, Point::default(), metrics());
    element.set_base(Point::new(0.0, 100.0));
    element.set_color(Some("#ff0000".to_string()));

    let grace = element.grace_notes().unwrap();
    assert_eq!(grace.color(), Some("#ff0000"));
    assert_eq!(grace.notes()[0].color(), Some("#ff0000"));

    let mut svg = SvgBuilder::new(100.0, 200.0);
    element.render(&mut svg);
    // host stem + grace stem
    assert_eq!(svg.build().matches("stroke=\"#ff0000\"").count(), 2);
}
