//! Tuplet layout orchestration.
//!
//! One pass per tuplet: manage the number child, resolve the direction,
//! resolve the start/end anchors through nested tuplets, decide whether a
//! bracket is drawn, delegate the geometry to [`super::bracket`], then
//! store the results and register the bounding box with the skyline.
//! Nested tuplets must already be laid out; use
//! [`super::layout_with_nested`] to drive a whole nest innermost-first.

use log::{debug, error};

use crate::geom::{Point, Rect};
use crate::model::{
    ChordRestId, DirectionV, Score, TupletBracketType, TupletElement, TupletId,
};

use super::bracket::{self, BracketInput};
use super::{number, LayoutContext};

pub fn layout(score: &mut Score, id: TupletId, ctx: &mut LayoutContext) {
    if score.tuplets[id].elements.is_empty() {
        debug!("tuplet at tick {:?} is empty, nothing to lay out", score.tuplets[id].tick);
        return;
    }

    // Stemless tablature shows no tuplets at all.
    let staff_idx = score.tuplets[id].staff_idx;
    if score
        .staves
        .get(staff_idx)
        .is_some_and(|s| s.hides_tuplets())
    {
        return;
    }

    number::create(score, id, &mut ctx.selection);

    let is_up = compute_direction(score, id);

    let Some((cr1, cr2)) = resolve_anchors(score, id) else {
        return;
    };

    let has_bracket = calc_has_bracket(score, id, cr1, cr2);
    let mag = (score.chord_rests[cr1].mag + score.chord_rests[cr2].mag) / 2.0;

    // Measure the number; the bracket carve-out needs its width.
    let mut number = score.tuplets[id].layout.number.take();
    let (has_number, number_width) = match number.as_mut() {
        Some(n) => (true, number::measure(n, &score.style)),
        None => (false, 0.0),
    };
    score.tuplets[id].layout.number = number;

    let geometry = bracket::compute(&BracketInput {
        score,
        tuplet: id,
        cr1,
        cr2,
        is_up,
        has_bracket,
        number_width,
        has_number,
        mag,
    });

    let measure_id = score.tuplets[id].measure;
    let measure_x = score.measures[measure_id].page_pos.x;
    let is_cross = score.tuplets[id].cross;

    let tuplet = &mut score.tuplets[id];
    tuplet.layout.pos = Point::default();
    tuplet.layout.mag = mag;
    tuplet.layout.is_up = is_up;
    tuplet.layout.has_bracket = has_bracket;
    tuplet.layout.p1 = geometry.p1;
    tuplet.layout.p2 = geometry.p2;
    tuplet.layout.bracket_l = geometry.bracket_l;
    tuplet.layout.bracket_r = geometry.bracket_r;
    if let (Some(n), Some(pos)) = (tuplet.layout.number.as_mut(), geometry.number_pos) {
        n.pos = pos;
    }

    // Collect the bounding box from the number and the bracket corners.
    let mut bbox = Rect::default();
    if let Some(n) = &tuplet.layout.number {
        bbox = n.bbox.translated(n.pos);
        if tuplet.layout.has_bracket {
            let span = Rect::from_corners(tuplet.layout.bracket_l[1], tuplet.layout.bracket_r[2]);
            bbox = bbox.united(&span);
        }
    } else if tuplet.layout.has_bracket {
        bbox = Rect::from_corners(tuplet.layout.bracket_l[1], tuplet.layout.bracket_l[3]);
    }
    tuplet.layout.bbox = bbox;

    // Cross-staff tuplets stay out of the skyline.
    if !is_cross {
        ctx.skyline.add(
            staff_idx,
            bbox.translated(Point::new(measure_x, 0.0)),
            is_up,
        );
    }
}

/// Resolve Auto direction: explicit stem directions carry veto weight over
/// the implicit up flags; an all-rest tie falls back to voice parity on
/// multi-voice staves, otherwise up.
fn compute_direction(score: &Score, id: TupletId) -> bool {
    let tuplet = &score.tuplets[id];
    if tuplet.direction != DirectionV::Auto {
        return tuplet.direction == DirectionV::Up;
    }

    let mut up = 0i32;
    for element in &tuplet.elements {
        let TupletElement::ChordRest(cr_id) = *element else {
            continue;
        };
        let cr = &score.chord_rests[cr_id];
        let Some(chord) = cr.chord() else { continue };
        if chord.stem_direction != DirectionV::Auto {
            up += if chord.stem_direction == DirectionV::Up { 1000 } else { -1000 };
        } else {
            up += if cr.up { 1 } else { -1 };
        }
    }

    if up == 0 {
        let measure = &score.measures[tuplet.measure];
        if measure.has_voices(tuplet.staff_idx) {
            up = if tuplet.voice() % 2 == 0 { 1 } else { -1 };
        } else {
            up = 1;
        }
    }

    up > 0
}

/// First and last chord/rest of the tuplet, descending through nested
/// tuplets at either end.
fn resolve_anchors(score: &Score, id: TupletId) -> Option<(ChordRestId, ChordRestId)> {
    let elements = &score.tuplets[id].elements;
    let first = descend(score, *elements.first()?, true)?;
    let last = descend(score, *elements.last()?, false)?;
    Some((first, last))
}

fn descend(score: &Score, mut element: TupletElement, front: bool) -> Option<ChordRestId> {
    loop {
        match element {
            TupletElement::ChordRest(cr) => return Some(cr),
            TupletElement::Tuplet(t) => {
                let inner = &score.tuplets[t].elements;
                let next = if front { inner.first() } else { inner.last() };
                match next {
                    Some(&e) => element = e,
                    None => {
                        debug_assert!(false, "empty nested tuplet as bracket anchor");
                        error!("empty nested tuplet as bracket anchor");
                        return None;
                    }
                }
            }
        }
    }
}

/// Bracket policy. Auto draws a bracket unless a shared beam already spans
/// exactly the tuplet's chords, which makes the grouping visible on its
/// own. Nested tuplets always bracket their parent.
fn calc_has_bracket(score: &Score, id: TupletId, cr1: ChordRestId, cr2: ChordRestId) -> bool {
    let tuplet = &score.tuplets[id];
    match tuplet.bracket_type {
        TupletBracketType::Show => true,
        TupletBracketType::Hide => false,
        TupletBracketType::Auto => {
            if tuplet
                .elements
                .iter()
                .any(|e| matches!(e, TupletElement::Tuplet(_)))
            {
                return true;
            }
            let c1 = &score.chord_rests[cr1];
            let c2 = &score.chord_rests[cr2];
            if !c1.is_chord() || !c2.is_chord() {
                return true;
            }
            let Some(beam_id) = c1.beam else { return true };
            if c1.beam != c2.beam {
                return true;
            }
            let beam = &score.beams[beam_id];
            !(beam.elements.first() == Some(&cr1) && beam.elements.last() == Some(&cr2))
        }
    }
}
