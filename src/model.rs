//! Score model slice consumed by the layout engine.
//!
//! These structures capture exactly what tuplet layout and the spacing
//! tables read from a score: chord/rest page positions, stem and notehead
//! rectangles, beam membership, staff indices, and measure/segment tick
//! ranges. Elements reference each other through arena indices into the
//! owning [`Score`] rather than parent/child pointers, which keeps both
//! ownership and traversal order explicit.

use std::collections::HashSet;

use num_rational::Rational32;
use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};
use crate::shape::Shape;
use crate::style::Style;

/// Musical time as a fraction of a whole note.
pub type Ticks = Rational32;

/// Shorthand for a tick fraction.
pub fn ticks(numer: i32, denom: i32) -> Ticks {
    Rational32::new(numer, denom)
}

/// Voices per staff; track = staff × VOICES + voice.
pub const VOICES: usize = 4;

pub type StaffId = usize;
pub type MeasureId = usize;
pub type SegmentId = usize;
pub type ChordRestId = usize;
pub type BeamId = usize;
pub type TupletId = usize;

/// Vertical direction preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionV {
    Auto,
    Up,
    Down,
}

// ═══════════════════════════════════════════════════════════════════════
// Staves and measures
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StaffKind {
    Standard,
    /// Tablature; a stemless tab staff suppresses tuplet display entirely.
    Tablature { stemless: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub kind: StaffKind,
    /// Vertical position of this staff within its system (page units).
    pub y: f64,
    /// User-applied vertical offset.
    pub user_offset_y: f64,
}

impl Staff {
    pub fn standard(y: f64) -> Self {
        Staff {
            kind: StaffKind::Standard,
            y,
            user_offset_y: 0.0,
        }
    }

    /// Whether tuplets are suppressed on this staff.
    pub fn hides_tuplets(&self) -> bool {
        matches!(self.kind, StaffKind::Tablature { stemless: true })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub tick: Ticks,
    pub ticks: Ticks,
    pub page_pos: Point,
    /// Segments of this measure in tick order (indices into Score::segments).
    pub segments: Vec<SegmentId>,
    /// Page bounding rect of each staff's five-line region in this measure.
    pub staff_rects: Vec<Rect>,
    /// Whether more than one voice is active on each staff.
    pub multi_voice: Vec<bool>,
}

impl Measure {
    pub fn staff_page_rect(&self, staff: usize) -> Rect {
        self.staff_rects.get(staff).copied().unwrap_or_default()
    }

    pub fn has_voices(&self, staff: usize) -> bool {
        self.multi_voice.get(staff).copied().unwrap_or(false)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Segments
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    ChordRest,
    /// Pure timing anchor with no visual content; skipped when looking for
    /// the next segment a bracket could collide with.
    TimeTick,
    Other,
}

/// A vertical slice of a measure at one rhythmic position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub measure: MeasureId,
    pub tick: Ticks,
    /// Duration to the next segment.
    pub ticks: Ticks,
    /// X position relative to the measure.
    pub x: f64,
    pub width: f64,
    /// Chord/rest per track (empty slots for tracks with nothing here).
    pub elements: Vec<Option<ChordRestId>>,
    /// Collision silhouette per staff, segment-local coordinates.
    pub staff_shapes: Vec<Shape>,
}

impl Segment {
    pub fn element(&self, track: usize) -> Option<ChordRestId> {
        self.elements.get(track).copied().flatten()
    }

    pub fn staff_shape(&self, staff: usize) -> Shape {
        self.staff_shapes.get(staff).cloned().unwrap_or_default()
    }

    fn has_elements_on_staff(&self, staff: usize) -> bool {
        let tracks = staff * VOICES..(staff + 1) * VOICES;
        if tracks.clone().any(|t| self.element(t).is_some()) {
            return true;
        }
        self.staff_shapes
            .get(staff)
            .map(|s| !s.is_empty())
            .unwrap_or(false)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Chords and rests
// ═══════════════════════════════════════════════════════════════════════

/// Geometry of one notehead (page coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteData {
    pub bounding: Rect,
    pub head_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordData {
    /// Stem page bounding rect; None for whole notes and stemless chords.
    pub stem: Option<Rect>,
    /// Explicit user stem direction; Auto when the layout decided.
    pub stem_direction: DirectionV,
    /// Highest notehead of the chord.
    pub up_note: NoteData,
    /// Lowest notehead of the chord.
    pub down_note: NoteData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChordRestKind {
    Chord(ChordData),
    Rest { bounding: Rect },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordRest {
    pub kind: ChordRestKind,
    pub tick: Ticks,
    /// Actual sounding duration (after tuplet scaling).
    pub ticks: Ticks,
    pub track: usize,
    pub staff_idx: StaffId,
    /// Cross-staff displacement (−1/0/+1 staves).
    pub staff_move: i32,
    pub measure: MeasureId,
    pub segment: SegmentId,
    pub small: bool,
    pub mag: f64,
    pub page_pos: Point,
    pub width: f64,
    /// Resolved stem direction of this chord (or placement side of a rest).
    pub up: bool,
    pub beam: Option<BeamId>,
    /// Innermost enclosing tuplet, if any.
    pub tuplet: Option<TupletId>,
    /// Collision silhouette, local to page_pos.
    pub shape: Shape,
}

impl ChordRest {
    pub fn is_chord(&self) -> bool {
        matches!(self.kind, ChordRestKind::Chord(_))
    }

    pub fn chord(&self) -> Option<&ChordData> {
        match &self.kind {
            ChordRestKind::Chord(c) => Some(c),
            ChordRestKind::Rest { .. } => None,
        }
    }

    pub fn end_tick(&self) -> Ticks {
        self.tick + self.ticks
    }

    pub fn voice(&self) -> usize {
        self.track % VOICES
    }

    /// Staff the element is drawn on, after cross-staff displacement.
    pub fn vstaff_idx(&self) -> usize {
        (self.staff_idx as i32 + self.staff_move).max(0) as usize
    }

    pub fn page_bounding_rect(&self) -> Rect {
        match &self.kind {
            ChordRestKind::Rest { bounding } => *bounding,
            ChordRestKind::Chord(c) => {
                let mut r = c.up_note.bounding.united(&c.down_note.bounding);
                if let Some(stem) = c.stem {
                    r = r.united(&stem);
                }
                r
            }
        }
    }
}

/// A beam group, in left-to-right order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    pub elements: Vec<ChordRestId>,
}

// ═══════════════════════════════════════════════════════════════════════
// Tuplets
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TupletBracketType {
    Auto,
    Show,
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TupletNumberType {
    /// No number text at all.
    None,
    /// Plain numerator ("3").
    Number,
    /// Full ratio ("3:2").
    Ratio,
}

/// A direct member of a tuplet: either an actual chord/rest or a nested
/// tuplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TupletElement {
    ChordRest(ChordRestId),
    Tuplet(TupletId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// User overrides of the number's text properties, propagated from the
/// tuplet to its number each layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOverrides {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub align: Option<TextAlign>,
}

/// The rendered content of a tuplet number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NumberVisual {
    /// Plain text digits, e.g. "3" or "3:2".
    Text(String),
    /// SMuFL glyph names, one per digit, e.g. ["tuplet3"] or
    /// ["tuplet3", "tupletColon", "tuplet2"].
    Symbols(Vec<String>),
}

/// The tuplet's number-text child, recreated or updated each layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupletNumber {
    pub visual: NumberVisual,
    pub mag: f64,
    /// Position local to the tuplet (center of the text).
    pub pos: Point,
    /// Bounding box local to pos.
    pub bbox: Rect,
    pub overrides: TextOverrides,
    pub visible: bool,
}

/// Cached layout results, fully recomputed each pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupletLayoutData {
    pub pos: Point,
    pub bbox: Rect,
    pub mag: f64,
    pub is_up: bool,
    pub small: bool,
    pub has_bracket: bool,
    /// Left bracket endpoint, measure-local coordinates.
    pub p1: Point,
    /// Right bracket endpoint.
    pub p2: Point,
    /// Left bracket polyline (4 points without a number, 3 with).
    pub bracket_l: Vec<Point>,
    /// Right bracket polyline (empty without a number, 3 points with).
    pub bracket_r: Vec<Point>,
    pub number: Option<TupletNumber>,
}

impl Default for TupletLayoutData {
    fn default() -> Self {
        TupletLayoutData {
            pos: Point::default(),
            bbox: Rect::default(),
            mag: 1.0,
            is_up: true,
            small: false,
            has_bracket: false,
            p1: Point::default(),
            p2: Point::default(),
            bracket_l: Vec::new(),
            bracket_r: Vec::new(),
            number: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuplet {
    pub track: usize,
    pub staff_idx: StaffId,
    pub measure: MeasureId,
    pub tick: Ticks,
    /// Displayed ratio, kept as written (4:2 is never reduced to 2:1).
    pub ratio: (i32, i32),
    /// Duration of one written subdivision before scaling, e.g. 1/8 for an
    /// eighth-note triplet.
    pub base_len: Ticks,
    pub elements: Vec<TupletElement>,
    pub direction: DirectionV,
    pub bracket_type: TupletBracketType,
    pub number_type: TupletNumberType,
    /// User endpoint offset overrides.
    pub user_p1: Point,
    pub user_p2: Point,
    /// Set when contents moved across staves; a cross tuplet stays out of
    /// the skyline.
    pub cross: bool,
    pub visible: bool,
    pub text_overrides: TextOverrides,
    pub layout: TupletLayoutData,
}

impl Tuplet {
    pub fn voice(&self) -> usize {
        self.track % VOICES
    }

    /// Duration of one sounding subdivision: base length ÷ ratio.
    pub fn subdivision(&self) -> Ticks {
        self.base_len * Rational32::new(self.ratio.1, self.ratio.0)
    }

    /// Tick one past the tuplet's full span.
    pub fn end_tick(&self) -> Ticks {
        self.tick + self.base_len * Rational32::from_integer(self.ratio.1)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Selection
// ═══════════════════════════════════════════════════════════════════════

/// Reference to a selectable element owned by the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionRef {
    TupletNumber(TupletId),
}

/// The editor's current selection. Layout must deselect an element before
/// destroying it so the selection never dangles.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    items: HashSet<SelectionRef>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    pub fn select(&mut self, item: SelectionRef) {
        self.items.insert(item);
    }

    pub fn deselect(&mut self, item: SelectionRef) {
        self.items.remove(&item);
    }

    pub fn contains(&self, item: SelectionRef) -> bool {
        self.items.contains(&item)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Score
// ═══════════════════════════════════════════════════════════════════════

/// The arena owning every element the layout engine reads or writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub style: Style,
    pub staves: Vec<Staff>,
    pub measures: Vec<Measure>,
    /// All segments in score order; a segment's successor is the next index.
    pub segments: Vec<Segment>,
    pub chord_rests: Vec<ChordRest>,
    pub beams: Vec<Beam>,
    pub tuplets: Vec<Tuplet>,
}

impl Score {
    pub fn new(style: Style) -> Self {
        Score {
            style,
            staves: Vec::new(),
            measures: Vec::new(),
            segments: Vec::new(),
            chord_rests: Vec::new(),
            beams: Vec::new(),
            tuplets: Vec::new(),
        }
    }

    /// Page X of a segment (measure position plus measure-relative x).
    pub fn segment_page_x(&self, id: SegmentId) -> f64 {
        let seg = &self.segments[id];
        self.measures[seg.measure].page_pos.x + seg.x
    }

    /// Next segment in score order.
    pub fn next_active_segment(&self, id: SegmentId) -> Option<SegmentId> {
        (id + 1 < self.segments.len()).then_some(id + 1)
    }

    /// Next chord/rest segment in score order, crossing measure boundaries.
    pub fn next_chord_rest_segment(&self, id: SegmentId) -> Option<SegmentId> {
        (id + 1..self.segments.len()).find(|&i| self.segments[i].kind == SegmentKind::ChordRest)
    }

    /// Next non-TimeTick segment carrying anything on the given staff.
    pub fn next_segment_with_elems_on_staff(
        &self,
        id: SegmentId,
        staff: usize,
    ) -> Option<SegmentId> {
        (id + 1..self.segments.len()).find(|&i| {
            let seg = &self.segments[i];
            seg.kind != SegmentKind::TimeTick && seg.has_elements_on_staff(staff)
        })
    }

    /// Previous chord/rest segment within the same measure.
    pub fn prev_chord_rest_segment_in_measure(&self, id: SegmentId) -> Option<SegmentId> {
        let measure = self.segments[id].measure;
        (0..id)
            .rev()
            .take_while(|&i| self.segments[i].measure == measure)
            .find(|&i| self.segments[i].kind == SegmentKind::ChordRest)
    }

    /// Chord/rest segment of a measure at an exact tick.
    pub fn find_chord_rest_segment(&self, measure: MeasureId, tick: Ticks) -> Option<SegmentId> {
        self.measures[measure].segments.iter().copied().find(|&i| {
            self.segments[i].kind == SegmentKind::ChordRest && self.segments[i].tick == tick
        })
    }
}
