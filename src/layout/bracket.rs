//! Bracket endpoint and polyline geometry.
//!
//! Everything here is a pure computation: [`compute`] reads the score and
//! returns an immutable [`BracketGeometry`] describing both endpoints, the
//! bracket polylines (with a hole carved around the number when there is
//! one) and the number's anchor position. The caller stores the result on
//! the tuplet afterwards.
//!
//! Endpoints are resolved in page coordinates first (stem or notehead
//! anchoring, rest equalization, out-of-staff clamping, slope limiting,
//! interior collision correction), then shifted into tuplet-local
//! coordinates before user offsets and the hook heights are applied.

use log::error;
use num_traits::ToPrimitive;

use crate::geom::Point;
use crate::model::{ChordRestId, Score, TupletElement, TupletId, VOICES};

use super::number;

/// Resolved inputs for one bracket computation. Anchors and direction have
/// already been decided by the tuplet pass.
pub struct BracketInput<'a> {
    pub score: &'a Score,
    pub tuplet: TupletId,
    pub cr1: ChordRestId,
    pub cr2: ChordRestId,
    pub is_up: bool,
    pub has_bracket: bool,
    /// Width of the laid-out number text, 0.0 when there is none.
    pub number_width: f64,
    pub has_number: bool,
    /// Tuplet magnification (average of the anchor magnifications).
    pub mag: f64,
}

/// Immutable result of a bracket computation, tuplet-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketGeometry {
    pub p1: Point,
    pub p2: Point,
    /// Left polyline: 4 points when the bracket runs through, 3 when a
    /// number hole is carved.
    pub bracket_l: Vec<Point>,
    /// Right polyline: 3 points with a number hole, empty otherwise.
    pub bracket_r: Vec<Point>,
    /// Center position of the number text.
    pub number_pos: Option<Point>,
}

pub fn compute(input: &BracketInput<'_>) -> BracketGeometry {
    let score = input.score;
    let style = &score.style;
    let spatium = style.spatium;
    let tuplet = &score.tuplets[input.tuplet];
    let cr1 = &score.chord_rests[input.cr1];
    let cr2 = &score.chord_rests[input.cr2];
    let is_up = input.is_up;

    let max_slope = style.tuplet_max_slope;
    let mut out_of_staff = style.tuplet_out_of_staff;
    let mut v_head_distance = style.abs(style.tuplet_v_head_distance) * input.mag;
    let v_stem_distance = style.abs(style.tuplet_v_stem_distance) * input.mag;
    let bracket_half_width = style.abs(style.tuplet_bracket_width) / 2.0;
    let stem_left = (style.abs(style.tuplet_stem_left_distance) - bracket_half_width) * cr1.mag;
    let stem_right = (style.abs(style.tuplet_stem_right_distance) - bracket_half_width) * cr2.mag;
    let note_left = (style.abs(style.tuplet_note_left_distance) - bracket_half_width) * cr1.mag;
    let note_right = (style.abs(style.tuplet_note_right_distance) - bracket_half_width) * cr2.mag;

    // The bracket can only dodge the staff when both endpoints sit on the
    // same destination staff.
    let mut moved = 0;
    if out_of_staff {
        if cr1.staff_move == cr2.staff_move {
            moved = cr1.staff_move;
        } else {
            out_of_staff = false;
        }
    }

    let l1 = style.abs(style.tuplet_bracket_hook_height) * input.mag;
    let mut l2l = v_head_distance;
    let mut l2r = v_head_distance;

    if is_up {
        v_head_distance = -v_head_distance;
    }

    let mut p1 = cr1.page_pos;
    let mut p2 = cr2.page_pos;
    p1.x -= note_left;
    p2.x += style.note_head_width_abs() + note_right;
    p1.y += v_head_distance;
    p2.y += v_head_distance;

    // Used to center the number on the beam.
    let mut xx1 = p1.x;

    let left_note_edge = cr1.chord().map_or(0.0, |c| {
        if cr1.up {
            c.down_note.bounding.left()
        } else {
            c.up_note.bounding.left()
        }
    });
    let right_note_edge = cr2.chord().map_or(0.0, |c| {
        if cr2.up {
            c.down_note.bounding.right()
        } else {
            c.up_note.bounding.right()
        }
    });

    if is_up {
        if let Some(chord1) = cr1.chord() {
            if let Some(stem) = chord1.stem {
                xx1 = stem.x;
            }
            match chord1.stem {
                Some(stem) if cr1.up => {
                    p1.y = stem.y;
                    l2l = v_stem_distance;
                    p1.x = stem.left() - stem_left;
                }
                _ => {
                    p1.y = chord1.up_note.bounding.top();
                    p1.x = left_note_edge - note_left;
                }
            }
        }
        if let Some(chord2) = cr2.chord() {
            match chord2.stem {
                Some(stem) if cr2.up => {
                    p2.y = stem.top();
                    l2r = v_stem_distance;
                    p2.x = stem.right() + stem_right;
                }
                _ => {
                    p2.y = chord2.up_note.bounding.top();
                    p2.x = right_note_edge + note_right;
                }
            }
        }

        // A rest endpoint adopts the chord endpoint's height, whichever is
        // further from the staff.
        if !cr1.is_chord() && cr2.is_chord() {
            if p2.y < p1.y {
                p1.y = p2.y;
            } else {
                p2.y = p1.y;
            }
        } else if cr1.is_chord() && !cr2.is_chord() {
            if p1.y < p2.y {
                p2.y = p1.y;
            } else {
                p1.y = p2.y;
            }
        }

        if out_of_staff {
            let staff1 = (cr1.staff_idx as i32 + moved).max(0) as usize;
            let min = score.measures[cr1.measure].staff_page_rect(staff1).y;
            if min < p1.y {
                p1.y = min;
                l2l = v_stem_distance;
            }
            let staff2 = (cr2.staff_idx as i32 + moved).max(0) as usize;
            let min = score.measures[cr2.measure].staff_page_rect(staff2).y;
            if min < p2.y {
                p2.y = min;
                l2r = v_stem_distance;
            }
        }

        // Limit the slope.
        let d = (p2.y - p1.y) / (p2.x - p1.x);
        if d < -max_slope {
            p1.y = p2.y + max_slope * (p2.x - p1.x);
        } else if d > max_slope {
            p2.y = p1.y + max_slope * (p2.x - p1.x);
        }

        // Interior chords must stay below the bracket line.
        let n = tuplet.elements.len();
        if n >= 3 {
            let d = (p2.y - p1.y) / (p2.x - p1.x);
            for element in &tuplet.elements[1..n - 1] {
                let TupletElement::ChordRest(id) = *element else {
                    continue;
                };
                let cr = &score.chord_rests[id];
                let Some(chord) = cr.chord() else { continue };
                let Some(stem) = chord.stem else { continue };
                let r = if cr.up { stem } else { chord.up_note.bounding };
                let y3 = r.top();
                let x3 = r.x + r.w * 0.5;
                let y0 = p1.y + (x3 - p1.x) * d;
                let c = y0 - y3;
                if c > 0.0 {
                    p1.y -= c;
                    p2.y -= c;
                }
            }
        }
    } else {
        if let Some(chord1) = cr1.chord() {
            if let Some(stem) = chord1.stem {
                xx1 = stem.x;
            }
            match chord1.stem {
                Some(stem) if !cr1.up => {
                    p1.y = stem.bottom();
                    l2l = v_stem_distance;
                    p1.x = stem.left() - stem_left;
                }
                _ => {
                    p1.y = chord1.down_note.bounding.bottom();
                    p1.x = left_note_edge - note_left;
                }
            }
        }
        if let Some(chord2) = cr2.chord() {
            match chord2.stem {
                Some(stem) if !cr2.up => {
                    p2.y = stem.bottom();
                    l2r = v_stem_distance;
                    p2.x = stem.right() + stem_right;
                }
                _ => {
                    p2.y = chord2.down_note.bounding.bottom();
                    p2.x = right_note_edge + note_right;
                }
            }
        }

        if !cr1.is_chord() && cr2.is_chord() {
            if p2.y > p1.y {
                p1.y = p2.y;
            } else {
                p2.y = p1.y;
            }
        } else if cr1.is_chord() && !cr2.is_chord() {
            if p1.y > p2.y {
                p2.y = p1.y;
            } else {
                p1.y = p2.y;
            }
        }

        if out_of_staff {
            let staff1 = (cr1.staff_idx as i32 + moved).max(0) as usize;
            let max = score.measures[cr1.measure].staff_page_rect(staff1).bottom();
            if max > p1.y {
                p1.y = max;
                l2l = v_stem_distance;
            }
            let staff2 = (cr2.staff_idx as i32 + moved).max(0) as usize;
            let max = score.measures[cr2.measure].staff_page_rect(staff2).bottom();
            if max > p2.y {
                p2.y = max;
                l2r = v_stem_distance;
            }
        }

        let d = (p2.y - p1.y) / (p2.x - p1.x);
        if d < -max_slope {
            p2.y = p1.y - max_slope * (p2.x - p1.x);
        } else if d > max_slope {
            p1.y = p2.y - max_slope * (p2.x - p1.x);
        }

        let n = tuplet.elements.len();
        if n >= 3 {
            let d = (p2.y - p1.y) / (p2.x - p1.x);
            for element in &tuplet.elements[1..n - 1] {
                let TupletElement::ChordRest(id) = *element else {
                    continue;
                };
                let cr = &score.chord_rests[id];
                let Some(chord) = cr.chord() else { continue };
                let Some(stem) = chord.stem else { continue };
                let r = if cr.up { chord.down_note.bounding } else { stem };
                let y3 = r.bottom();
                let x3 = r.x + r.w * 0.5;
                let y0 = p1.y + (x3 - p1.x) * d;
                let c = y0 - y3;
                if c < 0.0 {
                    p1.y -= c;
                    p2.y -= c;
                }
            }
        }
    }

    // Rest endpoints keep their own horizontal extent.
    if !cr1.is_chord() {
        p1.x = cr1.page_bounding_rect().left() - note_left;
    }
    if !cr2.is_chord() {
        match cr2.shape.chord_rest_rect() {
            Some(r) => p2.x = r.translated(cr2.page_pos).right() + note_right,
            None => {
                debug_assert!(false, "rest endpoint without a chord-rest shape element");
                p2.x = cr2.page_bounding_rect().right() + note_right;
            }
        }
    }

    // Shift from page to tuplet-local coordinates.
    let vstaff = tuplet.staff_idx;
    let measure = &score.measures[tuplet.measure];
    let mp = Point::new(
        measure.page_pos.x,
        measure.page_pos.y + score.staves.get(vstaff).map_or(0.0, |s| s.y),
    );
    p1 -= mp;
    p2 -= mp;
    p1 += tuplet.user_p1;
    p2 += tuplet.user_p2;
    xx1 -= mp.x;

    let hook_sign = if is_up { 1.0 } else { -1.0 };
    p1.y -= l2l * hook_sign;
    p2.y -= l2r * hook_sign;

    let y_offset = score.staves.get(vstaff).map_or(0.0, |s| s.user_offset_y);
    p1.y -= y_offset;
    p2.y -= y_offset;

    if style.tuplet_extend_to_end_of_duration {
        extend_to_end_of_duration(input, &mut p2, is_up);
    }

    // Center the number.
    let mut x_number = 0.0;
    let number_width = input.number_width;
    let mut number_pos = None;
    if input.has_number {
        let y_number = p1.y + (p2.y - p1.y) * 0.5 - l1 * hook_sign;

        if number::place_on_rhythmic_center(score, tuplet, cr1, cr2) {
            x_number = number::rhythmic_center_x(score, tuplet, input.cr2, is_up);
        } else if cr1.beam.is_some() && cr1.beam == cr2.beam && !input.has_bracket {
            // Beamed tuplets without a bracket center the number on the beam.
            if is_up == cr1.up {
                let deltax = cr2.page_pos.x - cr1.page_pos.x;
                x_number = xx1 + deltax * 0.5;
            } else {
                let deltax = p2.x - p1.x;
                x_number = p1.x + deltax * 0.5;
            }
        } else {
            let deltax = p2.x - p1.x;
            x_number = p1.x + deltax * 0.5;
        }

        number_pos = Some(Point::new(x_number, y_number));
    }

    let mut bracket_l = Vec::new();
    let mut bracket_r = Vec::new();
    if input.has_bracket {
        let slope = (p2.y - p1.y) / (p2.x - p1.x);
        let number_gap = 0.35 * spatium;
        let hook = l1 * hook_sign;

        if input.has_number {
            // Carve the hole around the number, widening the endpoints when
            // the number would not fit otherwise.
            let x = x_number - number_width * 0.5 - number_gap;
            p1.x = p1.x.min(x - 0.5 * l1);
            let y = p1.y + (x - p1.x) * slope;
            bracket_l.push(p1);
            bracket_l.push(Point::new(p1.x, p1.y - hook));
            bracket_l.push(Point::new(x, y - hook));

            let x = x_number + number_width * 0.5 + number_gap;
            p2.x = p2.x.max(x + 0.5 * l1);
            let y = p1.y + (x - p1.x) * slope;
            bracket_r.push(Point::new(x, y - hook));
            bracket_r.push(Point::new(p2.x, p2.y - hook));
            bracket_r.push(p2);
        } else {
            bracket_l.push(p1);
            bracket_l.push(Point::new(p1.x, p1.y - hook));
            bracket_l.push(Point::new(p2.x, p2.y - hook));
            bracket_l.push(p2);
        }
    }

    BracketGeometry {
        p1,
        p2,
        bracket_l,
        bracket_r,
        number_pos,
    }
}

/// Stretch the right endpoint toward the end of the final element's full
/// duration, stopping short of whatever comes next on the staff.
fn extend_to_end_of_duration(input: &BracketInput<'_>, p2: &mut Point, is_up: bool) {
    let score = input.score;
    let style = &score.style;
    let tuplet = &score.tuplets[input.tuplet];
    let end_cr = &score.chord_rests[input.cr2];

    let base_duration = tuplet.base_len;
    if end_cr.ticks <= base_duration {
        return;
    }

    let last_subdivision = end_cr.end_tick() - tuplet.subdivision();
    let mut ref_segment = end_cr.segment;
    while let Some(next) = score.next_chord_rest_segment(ref_segment) {
        if score.segments[next].tick > last_subdivision {
            break;
        }
        ref_segment = next;
    }

    let ref_seg = &score.segments[ref_segment];
    let tick_ratio = ((last_subdivision - ref_seg.tick) / ref_seg.ticks)
        .to_f64()
        .unwrap_or(0.0);

    let mut x_result =
        score.segment_page_x(ref_segment) + ref_seg.width * tick_ratio + style.note_head_width_abs();

    let padding = 0.6 * style.spatium;

    let vstaff = end_cr.vstaff_idx();
    let Some(next_seg_id) = score.next_segment_with_elems_on_staff(ref_segment, vstaff) else {
        debug_assert!(false, "no following segment during bracket extension");
        error!(
            "no following segment during bracket extension of tuplet at {:?}",
            tuplet.tick
        );
        p2.x = p2.x.max(x_result - score.measures[tuplet.measure].page_pos.x);
        return;
    };
    let next_seg = &score.segments[next_seg_id];
    x_result = x_result.min(score.segment_page_x(next_seg_id) - padding);

    // Back off further if the next segment opens another tuplet running the
    // same way.
    if next_seg.kind == crate::model::SegmentKind::ChordRest {
        let start_track = vstaff * VOICES;
        for track in start_track..start_track + VOICES {
            let Some(cr_id) = next_seg.element(track) else {
                continue;
            };
            let cr = &score.chord_rests[cr_id];
            let Some(next_tuplet_id) = cr.tuplet else { continue };
            let next_tuplet = &score.tuplets[next_tuplet_id];
            if next_tuplet.elements.first() == Some(&TupletElement::ChordRest(cr_id))
                && next_tuplet.layout.is_up == is_up
            {
                let x_start = score.measures[next_tuplet.measure].page_pos.x
                    + next_tuplet.layout.p1.x;
                x_result = x_result.min(x_start - padding);
            }
        }
    }

    let hook = style.abs(style.tuplet_bracket_hook_height);
    let shape = next_seg.staff_shape(vstaff).translated(Point::new(
        score.segment_page_x(next_seg_id),
        score.staves.get(vstaff).map_or(0.0, |s| s.y),
    ));
    let y_above = p2.y - if is_up { hook } else { 0.0 };
    let y_below = p2.y + if is_up { 0.0 } else { hook };
    let left = shape.left_most_edge_at_height(y_above, y_below);
    x_result = x_result.min(left - padding);

    p2.x = p2.x.max(x_result - score.measures[tuplet.measure].page_pos.x);
}
