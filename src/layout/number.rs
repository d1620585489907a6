//! Tuplet number content, metrics and horizontal placement policies.
//!
//! The number child is recreated or updated on every layout pass: its
//! content comes from the displayed ratio (plain digits or SMuFL glyph
//! names), its magnification from whether the whole tuplet is cue-sized,
//! and its text properties from the tuplet's own overrides. Horizontal
//! placement helpers cover the rhythmic-center policy for asymmetric
//! rhythms; centering on the beam or bracket lives with the bracket
//! geometry.

use num_rational::Rational32;
use num_traits::ToPrimitive;

use log::error;

use crate::geom::Rect;
use crate::model::{
    ChordRest, ChordRestId, NumberVisual, Score, Selection, SelectionRef, Ticks, Tuplet,
    TupletElement, TupletId, TupletNumber, TupletNumberType,
};
use crate::style::Style;

// Advance widths of the tuplet digits, in spatia. Digit glyphs in the
// common music fonts are close enough to uniform that fixed advances hold
// within a few percent.
const DIGIT_WIDTH_SP: f64 = 0.6;
const COLON_WIDTH_SP: f64 = 0.3;
const NUMBER_HEIGHT_SP: f64 = 1.0;

/// Create, refresh or destroy the tuplet's number child according to the
/// number type. Destroying a selected number deselects it first.
pub fn create(score: &mut Score, id: TupletId, selection: &mut Selection) {
    let tuplet = &score.tuplets[id];

    if tuplet.number_type == TupletNumberType::None {
        if tuplet.layout.number.is_some() {
            selection.deselect(SelectionRef::TupletNumber(id));
            score.tuplets[id].layout.number = None;
        }
        return;
    }

    let (num, den) = tuplet.ratio;
    let text = match tuplet.number_type {
        TupletNumberType::Ratio => format!("{num}:{den}"),
        _ => format!("{num}"),
    };
    let visual = if score.style.tuplet_use_symbols {
        let glyphs = text
            .chars()
            .map(|c| {
                if c == ':' {
                    "tupletColon".to_string()
                } else {
                    format!("tuplet{c}")
                }
            })
            .collect();
        NumberVisual::Symbols(glyphs)
    } else {
        NumberVisual::Text(text)
    };

    // The tuplet is cue-sized only when every member is.
    let small = tuplet.elements.iter().all(|e| match *e {
        TupletElement::ChordRest(cr) => score.chord_rests[cr].small,
        TupletElement::Tuplet(t) => score.tuplets[t].layout.small,
    });

    let mag = if small { score.style.small_note_mag } else { 1.0 };
    let overrides = tuplet.text_overrides.clone();
    let visible = tuplet.visible;

    let tuplet = &mut score.tuplets[id];
    tuplet.layout.small = small;
    // Position is filled in by the bracket pass; keep the previous one so
    // an interrupted pass still has sane coordinates.
    let pos = tuplet
        .layout
        .number
        .as_ref()
        .map(|n| n.pos)
        .unwrap_or_default();
    tuplet.layout.number = Some(TupletNumber {
        visual,
        mag,
        pos,
        bbox: Rect::default(),
        overrides,
        visible,
    });
}

/// Measure the number text and store its bounding box, centered on the
/// (not yet final) position. Returns the width.
pub fn measure(number: &mut TupletNumber, style: &Style) -> f64 {
    let scale = number.mag * number.overrides.font_size.map_or(1.0, |pt| pt / 10.0);
    let width_sp = match &number.visual {
        NumberVisual::Text(s) => s
            .chars()
            .map(|c| if c == ':' { COLON_WIDTH_SP } else { DIGIT_WIDTH_SP })
            .sum(),
        NumberVisual::Symbols(glyphs) => glyphs
            .iter()
            .map(|g| {
                if g == "tupletColon" {
                    COLON_WIDTH_SP
                } else {
                    DIGIT_WIDTH_SP
                }
            })
            .sum::<f64>(),
    };
    let w = style.abs(width_sp) * scale;
    let h = style.abs(NUMBER_HEIGHT_SP) * scale;
    number.bbox = Rect::new(-w / 2.0, -h / 2.0, w, h);
    w
}

/// Midpoint of the tuplet's span, pulled back half a subdivision so the
/// center lands on a sounding position rather than between two.
pub fn center_tick(tuplet: &Tuplet) -> Ticks {
    (tuplet.tick + tuplet.end_tick() - tuplet.subdivision()) * Rational32::new(1, 2)
}

/// Whether the number should sit on the rhythmic center instead of the
/// geometric bracket center.
pub fn place_on_rhythmic_center(
    score: &Score,
    tuplet: &Tuplet,
    cr1: &ChordRest,
    cr2: &ChordRest,
) -> bool {
    if score.style.tuplet_number_rhythmic_center && !is_symmetric(score, cr1, cr2) {
        let center = center_tick(tuplet);
        if cr2.tick <= center {
            // The center falls inside the last element; only meaningful when
            // the bracket is stretched over its full duration.
            return score.style.tuplet_extend_to_end_of_duration;
        }
        return true;
    }
    false
}

/// A rhythm is symmetric when the segment durations across the tuplet's
/// span read the same forwards and backwards.
pub fn is_symmetric(score: &Score, cr1: &ChordRest, cr2: &ChordRest) -> bool {
    let end_tick = cr2.end_tick();

    let mut segments = Vec::new();
    let mut seg = Some(cr1.segment);
    while let Some(s) = seg {
        if score.segments[s].tick >= end_tick {
            break;
        }
        segments.push(s);
        seg = score.next_active_segment(s);
    }

    let n = segments.len();
    for i in 0..n {
        let j = n - 1 - i;
        if j <= i {
            break;
        }
        if score.segments[segments[i]].ticks != score.segments[segments[j]].ticks {
            return false;
        }
    }
    true
}

/// X of the rhythmic center, measure-local. Interpolates inside the
/// reference element when the center tick falls between attack points.
pub fn rhythmic_center_x(score: &Score, tuplet: &Tuplet, end_cr: ChordRestId, is_up: bool) -> f64 {
    let center = center_tick(tuplet);
    let track = tuplet.track;

    // Walk back from the last element to the latest attack at or before the
    // center tick on the tuplet's own track.
    let mut ref_pair: Option<(usize, Option<ChordRestId>)> = None;
    let mut seg = Some(score.chord_rests[end_cr].segment);
    while let Some(s) = seg {
        let cr = score.segments[s].element(track);
        ref_pair = Some((s, cr));
        if cr.is_some() && score.segments[s].tick <= center {
            break;
        }
        seg = score.prev_chord_rest_segment_in_measure(s);
    }

    let Some((ref_seg_id, Some(ref_cr_id))) = ref_pair else {
        debug_assert!(false, "no reference chord-rest for rhythmic center");
        error!("no reference chord-rest for rhythmic center of tuplet at {:?}", tuplet.tick);
        return 0.0;
    };
    let ref_seg = &score.segments[ref_seg_id];
    let ref_cr = &score.chord_rests[ref_cr_id];

    if ref_seg.tick == center {
        let x_ref = match ref_cr.chord() {
            Some(chord) => {
                let head = chord.up_note.head_width;
                let mut x = 0.5 * head;
                if ref_cr.up == is_up {
                    // Stem-side correction.
                    x += if ref_cr.up { 0.25 } else { -0.25 } * head;
                }
                x
            }
            None => 0.5 * ref_cr.width,
        };
        return ref_seg.x + x_ref;
    }

    let ref_cr_ticks = ref_cr.ticks;
    let tick_ratio = ((center - ref_cr.tick) / ref_cr_ticks).to_f64().unwrap_or(0.0);

    let next_seg = score.find_chord_rest_segment(tuplet.measure, ref_seg.tick + ref_cr_ticks);
    let x_ref = ref_seg.x
        + match ref_cr.chord() {
            Some(chord) => chord.up_note.head_width,
            None => ref_cr.width,
        };
    let ref_width = match next_seg {
        Some(n) => score.segments[n].x - x_ref,
        None => ref_seg.width,
    };

    x_ref + ref_width * tick_ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ticks;

    fn triplet_shell() -> Tuplet {
        Tuplet {
            track: 0,
            staff_idx: 0,
            measure: 0,
            tick: ticks(0, 1),
            ratio: (3, 2),
            base_len: ticks(1, 8),
            elements: Vec::new(),
            direction: crate::model::DirectionV::Auto,
            bracket_type: crate::model::TupletBracketType::Auto,
            number_type: TupletNumberType::Number,
            user_p1: Default::default(),
            user_p2: Default::default(),
            cross: false,
            visible: true,
            text_overrides: Default::default(),
            layout: Default::default(),
        }
    }

    #[test]
    fn center_tick_of_eighth_triplet() {
        let t = triplet_shell();
        // Span is a quarter note; subdivision a triplet eighth.
        assert_eq!(t.subdivision(), ticks(1, 12));
        assert_eq!(t.end_tick(), ticks(1, 4));
        assert_eq!(center_tick(&t), ticks(1, 12));
    }

    #[test]
    fn center_tick_respects_start_offset() {
        let mut t = triplet_shell();
        t.tick = ticks(1, 4);
        assert_eq!(center_tick(&t), ticks(1, 4) + ticks(1, 12));
    }

    #[test]
    fn ratio_kept_as_written() {
        let mut t = triplet_shell();
        t.ratio = (4, 2);
        // 4:2 must not display as 2:1.
        t.number_type = TupletNumberType::Ratio;
        let (num, den) = t.ratio;
        assert_eq!(format!("{num}:{den}"), "4:2");
    }

    #[test]
    fn measure_scales_with_mag() {
        let style = Style::default();
        let mut n = TupletNumber {
            visual: NumberVisual::Text("3".into()),
            mag: 1.0,
            pos: Default::default(),
            bbox: Rect::default(),
            overrides: Default::default(),
            visible: true,
        };
        let full = measure(&mut n, &style);
        n.mag = 0.5;
        let half = measure(&mut n, &style);
        assert!((half - full * 0.5).abs() < 1e-9);
        assert_eq!(n.bbox.w, half);
    }

    #[test]
    fn ratio_text_is_wider_than_number_text() {
        let style = Style::default();
        let mut plain = TupletNumber {
            visual: NumberVisual::Text("3".into()),
            mag: 1.0,
            pos: Default::default(),
            bbox: Rect::default(),
            overrides: Default::default(),
            visible: true,
        };
        let mut ratio = plain.clone();
        ratio.visual = NumberVisual::Text("3:2".into());
        assert!(measure(&mut ratio, &style) > measure(&mut plain, &style));
    }
}
