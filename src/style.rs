//! Engraving style: the spatium plus the named distance constants that
//! drive the spacing tables and tuplet geometry.
//!
//! Distances are stored in spatium units and converted to page units with
//! [`Style::abs`]. The set of constants is closed: a layout component can
//! only read a field that exists here, so a missing constant is a compile
//! error rather than a runtime lookup failure.

use serde::{Deserialize, Serialize};

/// A snapshot of the engraving style.
///
/// Treated as an immutable value during a layout pass: the padding tables
/// are rebuilt from a fresh snapshot whenever the style changes, never
/// mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Base unit of engraving scale, in page units: the distance between
    /// two adjacent staff lines. All other distances are multiples of it.
    pub spatium: f64,

    // ── Horizontal spacing distances (spatium units) ────────────────────
    pub ledger_line_length: f64,
    pub accidental_note_distance: f64,
    pub note_bar_distance: f64,
    pub bar_note_distance: f64,
    pub bar_accidental_distance: f64,
    pub clef_left_margin: f64,
    pub clef_key_right_margin: f64,
    pub clef_barline_distance: f64,
    pub clef_key_distance: f64,
    pub clef_timesig_distance: f64,
    pub key_barline_distance: f64,
    pub keysig_left_margin: f64,
    pub timesig_left_margin: f64,
    pub key_timesig_distance: f64,
    pub timesig_barline_distance: f64,
    pub dot_note_distance: f64,
    pub dot_dot_distance: f64,
    pub ambitus_margin: f64,
    pub arpeggio_note_distance: f64,
    pub arpeggio_accidental_distance: f64,
    pub min_harmony_distance: f64,
    pub lyrics_min_distance: f64,
    pub lyrics_melisma_pad: f64,
    pub min_note_distance: f64,

    // ── Note geometry ───────────────────────────────────────────────────
    /// Nominal black notehead width (spatium units).
    pub note_head_width: f64,
    /// Magnification applied to cue-sized elements.
    pub small_note_mag: f64,

    // ── Tuplets ─────────────────────────────────────────────────────────
    /// Maximum bracket slope (dimensionless dy/dx).
    pub tuplet_max_slope: f64,
    /// Keep tuplet brackets outside the staff.
    pub tuplet_out_of_staff: bool,
    pub tuplet_v_head_distance: f64,
    pub tuplet_v_stem_distance: f64,
    pub tuplet_stem_left_distance: f64,
    pub tuplet_stem_right_distance: f64,
    pub tuplet_note_left_distance: f64,
    pub tuplet_note_right_distance: f64,
    pub tuplet_bracket_width: f64,
    pub tuplet_bracket_hook_height: f64,
    /// Render the tuplet number with musical digit glyphs instead of text.
    pub tuplet_use_symbols: bool,
    /// Place the number on the tuplet's rhythmic center rather than the
    /// geometric bracket center.
    pub tuplet_number_rhythmic_center: bool,
    /// Extend the bracket to cover the full duration of a final element
    /// longer than one subdivision.
    pub tuplet_extend_to_end_of_duration: bool,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            spatium: 1.0,

            ledger_line_length: 0.35,
            accidental_note_distance: 0.25,
            note_bar_distance: 1.0,
            bar_note_distance: 1.3,
            bar_accidental_distance: 0.3,
            clef_left_margin: 0.8,
            clef_key_right_margin: 0.8,
            clef_barline_distance: 0.5,
            clef_key_distance: 1.0,
            clef_timesig_distance: 1.0,
            key_barline_distance: 1.0,
            keysig_left_margin: 0.5,
            timesig_left_margin: 0.63,
            key_timesig_distance: 1.0,
            timesig_barline_distance: 0.5,
            dot_note_distance: 0.35,
            dot_dot_distance: 0.65,
            ambitus_margin: 0.25,
            arpeggio_note_distance: 0.6,
            arpeggio_accidental_distance: 0.3,
            min_harmony_distance: 0.5,
            lyrics_min_distance: 0.25,
            lyrics_melisma_pad: 0.1,
            min_note_distance: 0.5,

            note_head_width: 1.18,
            small_note_mag: 0.7,

            tuplet_max_slope: 0.5,
            tuplet_out_of_staff: true,
            tuplet_v_head_distance: 0.5,
            tuplet_v_stem_distance: 0.25,
            tuplet_stem_left_distance: 0.5,
            tuplet_stem_right_distance: 0.5,
            tuplet_note_left_distance: 0.0,
            tuplet_note_right_distance: 0.0,
            tuplet_bracket_width: 0.1,
            tuplet_bracket_hook_height: 1.0,
            tuplet_use_symbols: false,
            tuplet_number_rhythmic_center: false,
            tuplet_extend_to_end_of_duration: false,
        }
    }
}

impl Style {
    /// Convert a spatium-unit distance to page units.
    pub fn abs(&self, sp: f64) -> f64 {
        sp * self.spatium
    }

    /// Nominal notehead width in page units.
    pub fn note_head_width_abs(&self) -> f64 {
        self.abs(self.note_head_width)
    }
}
