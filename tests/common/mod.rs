//! Score fixture builder for layout tests.
//!
//! Builds a single-staff, single-measure score at the origin with one
//! chord-rest segment per element, so page, measure and staff coordinates
//! all coincide and expected geometry can be worked out by hand. Noteheads
//! sit on the staff's middle line (y = 2 at the default spatium of 1.0);
//! up stems run from y = -1.5 to 3.0, down stems from 3.0 to 7.5.

#![allow(dead_code)]

use engravelib::*;

pub const HEAD_W: f64 = 1.18;
pub const STEM_W: f64 = 0.13;

pub struct ScoreBuilder {
    pub score: Score,
}

impl ScoreBuilder {
    pub fn new() -> Self {
        let style = Style::default();
        let sp = style.spatium;
        let mut score = Score::new(style);
        score.staves.push(Staff::standard(0.0));
        score.measures.push(Measure {
            tick: ticks(0, 1),
            ticks: ticks(1, 1),
            page_pos: Point::new(0.0, 0.0),
            segments: Vec::new(),
            staff_rects: vec![Rect::new(0.0, 0.0, 200.0, 4.0 * sp)],
            multi_voice: vec![false],
        });
        ScoreBuilder { score }
    }

    pub fn multi_voice(mut self) -> Self {
        self.score.measures[0].multi_voice[0] = true;
        self
    }

    pub fn ctx(&self) -> LayoutContext {
        LayoutContext::new(self.score.staves.len())
    }

    fn push_segment(&mut self, tick: Ticks, dur: Ticks, x: f64, track: usize, cr: ChordRestId) {
        let id = self.score.segments.len();
        let mut elements = vec![None; VOICES];
        elements[track] = Some(cr);
        self.score.segments.push(Segment {
            kind: SegmentKind::ChordRest,
            measure: 0,
            tick,
            ticks: dur,
            x,
            width: 10.0,
            elements,
            staff_shapes: vec![Shape::new()],
        });
        self.score.measures[0].segments.push(id);
    }

    /// Chord with the standard stem for its direction.
    pub fn chord(&mut self, x: f64, tick: Ticks, dur: Ticks, up: bool) -> ChordRestId {
        let stem = if up {
            Rect::new(x + HEAD_W - STEM_W, -1.5, STEM_W, 4.5)
        } else {
            Rect::new(x, 3.0, STEM_W, 4.5)
        };
        self.chord_with_stem(x, tick, dur, up, Some(stem))
    }

    /// Up chord whose stem reaches the given top.
    pub fn chord_with_stem_top(
        &mut self,
        x: f64,
        tick: Ticks,
        dur: Ticks,
        stem_top: f64,
    ) -> ChordRestId {
        let stem = Rect::new(x + HEAD_W - STEM_W, stem_top, STEM_W, 3.0 - stem_top);
        self.chord_with_stem(x, tick, dur, true, Some(stem))
    }

    pub fn chord_with_stem(
        &mut self,
        x: f64,
        tick: Ticks,
        dur: Ticks,
        up: bool,
        stem: Option<Rect>,
    ) -> ChordRestId {
        let head = Rect::new(x, 2.0, HEAD_W, 1.0);
        let note = NoteData {
            bounding: head,
            head_width: HEAD_W,
        };
        let cr_id = self.score.chord_rests.len();
        let seg_id = self.score.segments.len();
        let mut shape = Shape::new();
        shape.add(Rect::new(0.0, 0.0, HEAD_W, 1.0), Some(ElementKind::Note));
        self.score.chord_rests.push(ChordRest {
            kind: ChordRestKind::Chord(ChordData {
                stem,
                stem_direction: DirectionV::Auto,
                up_note: note,
                down_note: note,
            }),
            tick,
            ticks: dur,
            track: 0,
            staff_idx: 0,
            staff_move: 0,
            measure: 0,
            segment: seg_id,
            small: false,
            mag: 1.0,
            page_pos: Point::new(x, 2.0),
            width: HEAD_W,
            up,
            beam: None,
            tuplet: None,
            shape,
        });
        self.push_segment(tick, dur, x, 0, cr_id);
        cr_id
    }

    pub fn rest(&mut self, x: f64, tick: Ticks, dur: Ticks) -> ChordRestId {
        let bounding = Rect::new(x, 1.0, 1.5, 1.0);
        let cr_id = self.score.chord_rests.len();
        let seg_id = self.score.segments.len();
        let mut shape = Shape::new();
        shape.add(Rect::new(0.0, 0.0, 1.5, 1.0), Some(ElementKind::Rest));
        self.score.chord_rests.push(ChordRest {
            kind: ChordRestKind::Rest { bounding },
            tick,
            ticks: dur,
            track: 0,
            staff_idx: 0,
            staff_move: 0,
            measure: 0,
            segment: seg_id,
            small: false,
            mag: 1.0,
            page_pos: Point::new(x, 2.0),
            width: 1.5,
            up: true,
            beam: None,
            tuplet: None,
            shape,
        });
        self.push_segment(tick, dur, x, 0, cr_id);
        cr_id
    }

    /// Eighth-note triplet shell over the given members.
    pub fn tuplet(&mut self, elements: Vec<TupletElement>) -> TupletId {
        let id = self.score.tuplets.len();
        for e in &elements {
            if let TupletElement::ChordRest(cr) = *e {
                self.score.chord_rests[cr].tuplet = Some(id);
            }
        }
        self.score.tuplets.push(Tuplet {
            track: 0,
            staff_idx: 0,
            measure: 0,
            tick: ticks(0, 1),
            ratio: (3, 2),
            base_len: ticks(1, 8),
            elements,
            direction: DirectionV::Auto,
            bracket_type: TupletBracketType::Auto,
            number_type: TupletNumberType::Number,
            user_p1: Point::default(),
            user_p2: Point::default(),
            cross: false,
            visible: true,
            text_overrides: TextOverrides::default(),
            layout: TupletLayoutData::default(),
        });
        id
    }

    pub fn beam(&mut self, members: Vec<ChordRestId>) -> BeamId {
        let id = self.score.beams.len();
        for &cr in &members {
            self.score.chord_rests[cr].beam = Some(id);
        }
        self.score.beams.push(Beam { elements: members });
        id
    }

    pub fn set_stem_direction(&mut self, cr: ChordRestId, dir: DirectionV) {
        if let ChordRestKind::Chord(chord) = &mut self.score.chord_rests[cr].kind {
            chord.stem_direction = dir;
        }
    }
}

/// Three up-stem chords at x = 10, 20, 30 under one eighth-note triplet.
pub fn standard_triplet() -> (ScoreBuilder, TupletId, [ChordRestId; 3]) {
    let mut b = ScoreBuilder::new();
    let c1 = b.chord(10.0, ticks(0, 1), ticks(1, 12), true);
    let c2 = b.chord(20.0, ticks(1, 12), ticks(1, 12), true);
    let c3 = b.chord(30.0, ticks(2, 12), ticks(1, 12), true);
    let t = b.tuplet(vec![
        TupletElement::ChordRest(c1),
        TupletElement::ChordRest(c2),
        TupletElement::ChordRest(c3),
    ]);
    (b, t, [c1, c2, c3])
}
