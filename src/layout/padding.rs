//! Minimum-padding tables for horizontal spacing.
//!
//! The general spacing algorithm never places two glyphs closer than the
//! distance these tables allow for their category pair. A table is a pure
//! function of the style: it is rebuilt from scratch on every style change
//! and read-only afterwards, so one snapshot can be shared across a whole
//! layout pass.
//!
//! Construction is two-phase: every cell starts at the minimum padding
//! unit, then an ordered list of declarative rules overwrites specific
//! cells, rows and columns. Rule order matters: several rules copy rows
//! or columns produced by earlier ones.

use log::error;

use crate::element::ElementKind;
use crate::style::Style;

/// Fraction of a spatium used as the conservative floor for any pair
/// without an explicit rule.
const MIN_PAD_UNIT_SP: f64 = 0.1;

const N: usize = ElementKind::COUNT;

type Cells = [[f64; N]; N];

/// One table-construction step.
///
/// `Cell` overwrites a single pair; `FillRow`/`FillColumn` broadcast one
/// value against every partner ("halo" categories); `CopyRow`/`CopyColumn`
/// borrow the current state of another category's rules.
#[derive(Debug, Clone, Copy)]
enum PadRule {
    Cell(ElementKind, ElementKind, f64),
    FillRow(ElementKind, f64),
    FillColumn(ElementKind, f64),
    CopyRow { from: ElementKind, to: ElementKind },
    CopyColumn { from: ElementKind, to: ElementKind },
}

fn apply(cells: &mut Cells, rule: PadRule) {
    match rule {
        PadRule::Cell(a, b, v) => cells[a.index()][b.index()] = v,
        PadRule::FillRow(row, v) => cells[row.index()] = [v; N],
        PadRule::FillColumn(col, v) => {
            for row in cells.iter_mut() {
                row[col.index()] = v;
            }
        }
        PadRule::CopyRow { from, to } => cells[to.index()] = cells[from.index()],
        PadRule::CopyColumn { from, to } => {
            for row in cells.iter_mut() {
                row[to.index()] = row[from.index()];
            }
        }
    }
}

/// Square matrix of minimum separations between adjacent visual
/// categories, in page units.
///
/// Not symmetric: "A followed by B" and "B followed by A" are physically
/// different arrangements and may need different gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct PaddingTable {
    min_unit: f64,
    cells: Cells,
}

impl PaddingTable {
    /// Build the table for one style snapshot. Idempotent: the same style
    /// always produces a bit-identical table.
    pub fn build(style: &Style) -> Self {
        let min_unit = MIN_PAD_UNIT_SP * style.spatium;
        let mut cells = [[min_unit; N]; N];
        for rule in rules(style, min_unit) {
            apply(&mut cells, rule);
        }
        PaddingTable { min_unit, cells }
    }

    /// The conservative floor every unruled pair keeps.
    pub fn min_padding_unit(&self) -> f64 {
        self.min_unit
    }

    /// Minimum gap when `a` is followed by `b`. O(1); never fails, since
    /// pairs without an explicit rule hold the minimum unit.
    pub fn padding(&self, a: ElementKind, b: ElementKind) -> f64 {
        self.cells[a.index()][b.index()]
    }
}

fn rules(style: &Style, min_unit: f64) -> Vec<PadRule> {
    use ElementKind::*;

    let sp = style.spatium;
    let ledger_pad = 0.25 * sp;
    let ledger_len = style.abs(style.ledger_line_length);

    let note_ledger = 0.35 * sp;
    let note_accidental = style.abs(style.accidental_note_distance).max(0.35 * sp);
    let note_rest = 0.5 * sp;
    let note_clef = 0.8 * sp;
    let note_bar = style.abs(style.note_bar_distance);
    let note_key = 0.75 * sp;
    let note_time = 0.75 * sp;

    let hook_note = 0.35 * sp;
    let dot_note = style
        .abs(style.dot_note_distance)
        .max(style.abs(style.dot_dot_distance));
    let clef_note = style.abs(style.clef_key_right_margin);
    let bar_note = style.abs(style.bar_note_distance);
    let key_note = 1.75 * sp;
    let time_note = 1.35 * sp;

    let lyrics_spacing = style.abs(style.lyrics_min_distance);
    let articulation_and_fermata = 0.35 * sp;

    vec![
        // Note-note padding stays at the minimum unit rather than
        // minNoteDistance: some pairs are allowed to get closer, and
        // minNoteDistance is applied during the spacing calculation itself.
        PadRule::Cell(Note, Note, min_unit),
        PadRule::Cell(Note, LedgerLine, note_ledger),
        PadRule::Cell(Note, Accidental, note_accidental),
        PadRule::Cell(Note, Rest, note_rest),
        PadRule::Cell(Note, Clef, note_clef),
        PadRule::Cell(Note, Arpeggio, 0.6 * sp),
        PadRule::Cell(Note, BarLine, note_bar),
        PadRule::Cell(Note, KeySig, note_key),
        PadRule::Cell(Note, TimeSig, note_time),
        // A stem behaves like its note for most neighbors...
        PadRule::CopyRow { from: Note, to: Stem },
        PadRule::CopyColumn { from: Note, to: Stem },
        // ...except where stems need tighter or looser spacing.
        PadRule::Cell(Stem, Stem, 0.85 * sp),
        PadRule::Cell(Stem, Accidental, 0.35 * sp),
        PadRule::Cell(Stem, LedgerLine, 0.35 * sp),
        PadRule::Cell(LedgerLine, Stem, 0.35 * sp),
        // Ledger lines shorten the effective visual gap, so their distances
        // are the note distances minus half the protruding length, floored
        // at the ledger pad.
        PadRule::Cell(LedgerLine, Note, note_ledger),
        PadRule::Cell(LedgerLine, LedgerLine, ledger_pad),
        PadRule::Cell(
            LedgerLine,
            Accidental,
            style
                .abs(style.accidental_note_distance)
                .max(note_accidental - ledger_len / 2.0),
        ),
        PadRule::Cell(LedgerLine, Rest, note_ledger),
        PadRule::Cell(LedgerLine, Clef, (note_clef - ledger_len / 2.0).max(ledger_pad)),
        PadRule::Cell(LedgerLine, Arpeggio, 0.5 * sp),
        PadRule::Cell(LedgerLine, BarLine, (note_bar - ledger_len).max(ledger_pad)),
        PadRule::Cell(LedgerLine, KeySig, (note_key - ledger_len / 2.0).max(ledger_pad)),
        PadRule::Cell(LedgerLine, TimeSig, (note_time - ledger_len / 2.0).max(ledger_pad)),
        PadRule::Cell(Hook, Note, hook_note),
        PadRule::Cell(Hook, LedgerLine, (hook_note - ledger_len).max(ledger_pad)),
        PadRule::Cell(Hook, Accidental, 0.35 * sp),
        PadRule::Cell(Hook, Rest, hook_note),
        PadRule::Cell(Hook, Clef, 0.5 * sp),
        PadRule::Cell(Hook, Arpeggio, 0.35 * sp),
        PadRule::Cell(Hook, BarLine, 1.0 * sp),
        PadRule::Cell(Hook, KeySig, 1.15 * sp),
        PadRule::Cell(Hook, TimeSig, 1.15 * sp),
        PadRule::Cell(NoteDot, Note, dot_note),
        PadRule::Cell(NoteDot, LedgerLine, (dot_note - ledger_len).max(ledger_pad)),
        PadRule::Cell(NoteDot, Accidental, 0.35 * sp),
        PadRule::Cell(NoteDot, Rest, dot_note),
        PadRule::Cell(NoteDot, Clef, 1.0 * sp),
        PadRule::Cell(NoteDot, Arpeggio, 0.5 * sp),
        PadRule::Cell(NoteDot, BarLine, 0.8 * sp),
        PadRule::Cell(NoteDot, KeySig, 1.35 * sp),
        PadRule::Cell(NoteDot, TimeSig, 1.35 * sp),
        PadRule::Cell(Rest, Note, note_rest),
        // Note's stem column was copied from note-note, i.e. the minimum.
        PadRule::Cell(Rest, Stem, min_unit),
        PadRule::Cell(Rest, LedgerLine, (note_rest - ledger_len / 2.0).max(ledger_pad)),
        PadRule::Cell(Rest, Accidental, 0.45 * sp),
        PadRule::Cell(Rest, Rest, note_rest),
        PadRule::Cell(Rest, Clef, note_clef),
        PadRule::Cell(Rest, BarLine, 1.65 * sp),
        PadRule::Cell(Rest, KeySig, 1.5 * sp),
        PadRule::Cell(Rest, TimeSig, 1.5 * sp),
        PadRule::Cell(Clef, Note, clef_note),
        PadRule::Cell(Clef, LedgerLine, (clef_note - ledger_len / 2.0).max(ledger_pad)),
        PadRule::Cell(Clef, Accidental, 0.6 * sp),
        PadRule::Cell(Clef, Stem, 0.75 * sp),
        PadRule::Cell(Clef, Rest, clef_note),
        PadRule::Cell(Clef, Clef, 0.75 * sp),
        PadRule::Cell(Clef, Arpeggio, 0.65 * sp),
        PadRule::Cell(Clef, BarLine, style.abs(style.clef_barline_distance)),
        PadRule::Cell(Clef, KeySig, style.abs(style.clef_key_distance)),
        PadRule::Cell(Clef, TimeSig, style.abs(style.clef_timesig_distance)),
        PadRule::Cell(BarLine, Note, bar_note),
        PadRule::Cell(BarLine, LedgerLine, (bar_note - ledger_len).max(ledger_pad)),
        PadRule::Cell(BarLine, Accidental, style.abs(style.bar_accidental_distance)),
        PadRule::Cell(BarLine, Rest, bar_note),
        PadRule::Cell(BarLine, Clef, style.abs(style.clef_left_margin)),
        PadRule::Cell(BarLine, Arpeggio, 0.65 * sp),
        PadRule::Cell(BarLine, BarLine, 1.35 * sp),
        PadRule::Cell(BarLine, KeySig, style.abs(style.keysig_left_margin)),
        PadRule::Cell(BarLine, TimeSig, style.abs(style.timesig_left_margin)),
        PadRule::Cell(KeySig, Note, key_note),
        PadRule::Cell(KeySig, LedgerLine, (key_note - ledger_len).max(ledger_pad)),
        PadRule::Cell(KeySig, Accidental, 1.6 * sp),
        PadRule::Cell(KeySig, Rest, key_note),
        PadRule::Cell(KeySig, Clef, 1.0 * sp),
        PadRule::Cell(KeySig, Arpeggio, 1.35 * sp),
        PadRule::Cell(KeySig, BarLine, style.abs(style.key_barline_distance)),
        PadRule::Cell(KeySig, KeySig, 1.0 * sp),
        PadRule::Cell(KeySig, TimeSig, style.abs(style.key_timesig_distance)),
        PadRule::Cell(TimeSig, Note, time_note),
        PadRule::Cell(TimeSig, LedgerLine, (time_note - ledger_len).max(ledger_pad)),
        PadRule::Cell(TimeSig, Accidental, 0.8 * sp),
        PadRule::Cell(TimeSig, Rest, time_note),
        PadRule::Cell(TimeSig, Clef, 1.0 * sp),
        PadRule::Cell(TimeSig, Arpeggio, 1.35 * sp),
        PadRule::Cell(TimeSig, BarLine, style.abs(style.timesig_barline_distance)),
        PadRule::Cell(TimeSig, KeySig, style.abs(style.key_timesig_distance)),
        PadRule::Cell(TimeSig, TimeSig, 1.0 * sp),
        // Ambitus keeps one margin against everything.
        PadRule::FillRow(Ambitus, style.abs(style.ambitus_margin)),
        PadRule::FillColumn(Ambitus, style.abs(style.ambitus_margin)),
        PadRule::Cell(Arpeggio, Note, style.abs(style.arpeggio_note_distance)),
        PadRule::Cell(Arpeggio, LedgerLine, 0.3 * sp),
        PadRule::Cell(Arpeggio, Accidental, style.abs(style.arpeggio_accidental_distance)),
        PadRule::FillRow(Breath, 1.0 * sp),
        PadRule::FillColumn(Breath, 1.0 * sp),
        PadRule::Cell(BarLine, Harmony, 0.5 * style.abs(style.min_harmony_distance)),
        PadRule::Cell(Harmony, Harmony, style.abs(style.min_harmony_distance)),
        PadRule::Cell(Harmony, FretDiagram, 0.3 * sp),
        PadRule::Cell(FretDiagram, Harmony, 0.3 * sp),
        PadRule::Cell(FretDiagram, FretDiagram, 0.25 * sp),
        PadRule::FillRow(ChordLine, 0.35 * sp),
        PadRule::FillColumn(ChordLine, 0.35 * sp),
        PadRule::Cell(BarLine, ChordLine, 0.65 * sp),
        PadRule::Cell(ChordLine, BarLine, 0.65 * sp),
        // Fingering reuses accidental spacing as a proxy.
        PadRule::CopyColumn { from: Accidental, to: Fingering },
        // Needed for beamlets, not beams themselves.
        PadRule::FillRow(Beam, 0.35 * sp),
        PadRule::CopyRow { from: Beam, to: TremoloSingleChord },
        PadRule::FillRow(Lyrics, lyrics_spacing),
        PadRule::FillColumn(Lyrics, lyrics_spacing),
        PadRule::Cell(Note, Lyrics, style.abs(style.lyrics_melisma_pad)),
        // Used by the accidental placement algorithm.
        PadRule::Cell(Accidental, Note, style.abs(style.accidental_note_distance)),
        PadRule::Cell(Accidental, LedgerLine, 0.18 * sp),
        PadRule::Cell(Accidental, Stem, style.abs(style.accidental_note_distance)),
        // Overridden by the articulation halo fill below; kept so the rule
        // order mirrors the sequence the values were derived in.
        PadRule::Cell(Articulation, Note, 0.25 * sp),
        PadRule::Cell(Articulation, Rest, 0.25 * sp),
        PadRule::Cell(Articulation, Accidental, 0.25 * sp),
        PadRule::Cell(LaissezVib, Note, 0.5 * sp),
        PadRule::Cell(LaissezVib, Rest, 0.5 * sp),
        PadRule::Cell(LaissezVib, Accidental, 0.35 * sp),
        PadRule::Cell(LaissezVib, BarLine, 0.35 * sp),
        PadRule::Cell(LaissezVib, Stem, 0.35 * sp),
        PadRule::Cell(Parenthesis, Parenthesis, 1.0 * sp),
        // Measure repeats space like notes.
        PadRule::CopyRow { from: Note, to: MeasureRepeat },
        PadRule::CopyColumn { from: Note, to: MeasureRepeat },
        PadRule::FillRow(Articulation, articulation_and_fermata),
        PadRule::FillColumn(Articulation, articulation_and_fermata),
        PadRule::FillRow(Fermata, articulation_and_fermata),
        PadRule::FillColumn(Fermata, articulation_and_fermata),
        PadRule::CopyRow { from: Articulation, to: Tapping },
        PadRule::CopyColumn { from: Articulation, to: Tapping },
        PadRule::CopyRow { from: Articulation, to: TappingHalfSlur },
        PadRule::CopyColumn { from: Articulation, to: TappingHalfSlur },
    ]
}

// ═══════════════════════════════════════════════════════════════════════
// Parenthesis padding
// ═══════════════════════════════════════════════════════════════════════

/// The kind of element whose parentheses the table is specialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParenHost {
    Note,
    KeySig,
    TimeSig,
    Clef,
}

impl ParenHost {
    /// Host for a parenthesised element category, None for kinds that are
    /// never parenthesised.
    pub fn for_element(kind: ElementKind) -> Option<ParenHost> {
        match kind {
            ElementKind::Note => Some(ParenHost::Note),
            ElementKind::KeySig => Some(ParenHost::KeySig),
            ElementKind::TimeSig => Some(ParenHost::TimeSig),
            ElementKind::Clef => Some(ParenHost::Clef),
            _ => None,
        }
    }
}

/// Asymmetric before/after padding between a parenthesis glyph and its
/// neighbors, specialized per parenthesised-element kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ParenPaddingTable {
    host: ParenHost,
    min_unit: f64,
    before: [f64; N],
    after: [f64; N],
}

impl ParenPaddingTable {
    pub fn build(host: ParenHost, style: &Style) -> Self {
        let min_unit = MIN_PAD_UNIT_SP * style.spatium;
        let mut table = ParenPaddingTable {
            host,
            min_unit,
            before: [min_unit; N],
            after: [min_unit; N],
        };
        match host {
            ParenHost::Note => table.fill_note(style),
            ParenHost::KeySig => table.fill_keysig(style),
            ParenHost::TimeSig => table.fill_timesig(style),
            ParenHost::Clef => table.fill_clef(style),
        }
        table
    }

    /// Table for the parent element carrying the parentheses, or None when
    /// the kind is never parenthesised (a caller bug, logged).
    pub fn for_parent(kind: ElementKind, style: &Style) -> Option<Self> {
        match ParenHost::for_element(kind) {
            Some(host) => Some(Self::build(host, style)),
            None => {
                debug_assert!(false, "not a valid parenthesised type: {kind:?}");
                error!("paren padding requested for non-parenthesised kind {kind:?}");
                None
            }
        }
    }

    pub fn host(&self) -> ParenHost {
        self.host
    }

    /// Padding between the pair, one side of which must be the parenthesis
    /// glyph itself. A lookup where neither side is a parenthesis is a
    /// contract violation: debug builds assert, release builds fall back to
    /// the minimum unit.
    pub fn padding(&self, a: ElementKind, b: ElementKind) -> f64 {
        debug_assert!(
            a == ElementKind::Parenthesis || b == ElementKind::Parenthesis,
            "paren padding lookup without a parenthesis: {a:?}, {b:?}"
        );
        if a == ElementKind::Parenthesis {
            self.before[b.index()]
        } else if b == ElementKind::Parenthesis {
            self.after[a.index()]
        } else {
            error!("paren padding lookup without a parenthesis: {a:?}, {b:?}");
            self.min_unit
        }
    }

    fn set_before(&mut self, kind: ElementKind, v: f64) {
        self.before[kind.index()] = v;
    }

    fn set_after(&mut self, kind: ElementKind, v: f64) {
        self.after[kind.index()] = v;
    }

    fn fill_note(&mut self, style: &Style) {
        use ElementKind::*;
        let sp = style.spatium;

        self.set_before(Arpeggio, style.abs(style.arpeggio_accidental_distance));
        self.set_before(BarLine, style.abs(style.bar_accidental_distance));
        self.set_before(Clef, 0.6 * sp);
        self.set_before(Hook, 0.35 * sp);
        self.set_before(KeySig, 1.6 * sp);
        self.set_before(LedgerLine, style.abs(style.accidental_note_distance));
        self.set_before(NoteDot, 0.35 * sp);
        self.set_before(Note, 0.35 * sp);
        self.set_before(Rest, 0.45 * sp);
        self.set_before(Stem, 0.35 * sp);
        self.set_before(TimeSig, 0.8 * sp);

        let acc_note = style.abs(style.accidental_note_distance).max(0.35 * sp);
        self.set_after(Accidental, acc_note);
        self.set_after(Arpeggio, 0.6 * sp);
        self.set_after(BarLine, style.abs(style.note_bar_distance));
        self.set_after(Clef, 0.8 * sp);
        self.set_after(KeySig, 0.75 * sp);
        self.set_after(LedgerLine, 0.35 * sp);
        self.set_after(Note, acc_note);
        self.set_after(Rest, style.abs(style.min_note_distance));
        self.set_after(Stem, style.abs(style.min_note_distance));
        self.set_after(TimeSig, 0.75 * sp);
    }

    // The keysig/timesig/clef variants differ only in a handful of cells,
    // but each is written out in full so the values can be audited against
    // engraving references independently.

    fn fill_keysig(&mut self, style: &Style) {
        use ElementKind::*;
        let sp = style.spatium;

        self.set_before(BarLine, 0.5 * sp);
        self.set_before(Clef, 0.25 * sp);
        self.set_before(Hook, 0.35 * sp);
        self.set_before(KeySig, 0.25 * sp);
        self.set_before(NoteDot, 0.35 * sp);
        self.set_before(Note, style.abs(style.note_bar_distance));
        self.set_before(Rest, style.abs(style.note_bar_distance));
        self.set_before(Stem, 0.35 * sp);
        self.set_before(TimeSig, 0.25 * sp);

        self.set_after(BarLine, 0.5 * sp);
        self.set_after(Clef, 0.2 * sp);
        self.set_after(Hook, 0.35 * sp);
        self.set_after(KeySig, 0.25 * sp);
        self.set_after(NoteDot, 0.35 * sp);
        self.set_after(Note, style.abs(style.bar_note_distance));
        self.set_after(Rest, style.abs(style.bar_note_distance));
        self.set_after(Stem, 0.35 * sp);
        self.set_after(TimeSig, 0.25 * sp);
    }

    fn fill_timesig(&mut self, style: &Style) {
        use ElementKind::*;
        let sp = style.spatium;

        self.set_before(BarLine, 0.5 * sp);
        self.set_before(Clef, 0.25 * sp);
        self.set_before(Hook, 0.35 * sp);
        self.set_before(KeySig, 0.25 * sp);
        self.set_before(NoteDot, 0.35 * sp);
        self.set_before(Note, style.abs(style.note_bar_distance));
        self.set_before(Rest, style.abs(style.note_bar_distance));
        self.set_before(Stem, 0.35 * sp);
        self.set_before(TimeSig, 0.25 * sp);

        self.set_after(BarLine, 0.5 * sp);
        self.set_after(Clef, 0.2 * sp);
        self.set_after(Hook, 0.35 * sp);
        self.set_after(KeySig, 0.35 * sp);
        self.set_after(NoteDot, 0.2 * sp);
        self.set_after(Note, style.abs(style.bar_note_distance));
        self.set_after(Rest, style.abs(style.bar_note_distance));
        self.set_after(Stem, 0.35 * sp);
        self.set_after(TimeSig, 0.25 * sp);
    }

    fn fill_clef(&mut self, style: &Style) {
        use ElementKind::*;
        let sp = style.spatium;

        self.set_before(BarLine, 0.5 * sp);
        self.set_before(Clef, 0.25 * sp);
        self.set_before(Hook, 0.35 * sp);
        self.set_before(KeySig, 0.25 * sp);
        self.set_before(NoteDot, 0.35 * sp);
        self.set_before(Note, style.abs(style.note_bar_distance));
        self.set_before(Rest, style.abs(style.note_bar_distance));
        self.set_before(Stem, 0.35 * sp);
        self.set_before(TimeSig, 0.25 * sp);

        self.set_after(BarLine, 0.5 * sp);
        self.set_after(Clef, 0.25 * sp);
        self.set_after(Hook, 0.35 * sp);
        self.set_after(KeySig, 0.35 * sp);
        self.set_after(NoteDot, 0.35 * sp);
        self.set_after(Note, style.abs(style.bar_note_distance));
        self.set_after(Rest, style.abs(style.bar_note_distance));
        self.set_after(Stem, 0.35 * sp);
        self.set_after(TimeSig, 0.2 * sp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ElementKind::*;

    #[test]
    fn build_is_idempotent() {
        let style = Style::default();
        let a = PaddingTable::build(&style);
        let b = PaddingTable::build(&style);
        assert_eq!(a, b);
    }

    #[test]
    fn every_pair_at_least_min_unit() {
        let table = PaddingTable::build(&Style::default());
        for &a in &ElementKind::ALL {
            for &b in &ElementKind::ALL {
                let p = table.padding(a, b);
                assert!(
                    p >= table.min_padding_unit(),
                    "padding({a:?}, {b:?}) = {p} below minimum"
                );
            }
        }
    }

    #[test]
    fn unruled_pairs_keep_the_minimum_unit() {
        let table = PaddingTable::build(&Style::default());
        // PlayCount has no dedicated rules; only halo columns touch it.
        assert_eq!(table.padding(PlayCount, Note), table.min_padding_unit());
        assert_eq!(table.padding(Note, PlayCount), table.min_padding_unit());
    }

    #[test]
    fn exact_values_at_unit_spatium() {
        let style = Style {
            spatium: 1.0,
            ..Style::default()
        };
        let table = PaddingTable::build(&style);
        assert_eq!(table.padding(Note, Rest), 0.5);
        assert_eq!(table.padding(LedgerLine, LedgerLine), 0.25);
    }

    #[test]
    fn values_scale_with_spatium() {
        let style = Style {
            spatium: 2.0,
            ..Style::default()
        };
        let table = PaddingTable::build(&style);
        assert_eq!(table.padding(Note, Rest), 1.0);
        assert_eq!(table.padding(LedgerLine, LedgerLine), 0.5);
    }

    #[test]
    fn stem_row_borrows_from_note_row() {
        let table = PaddingTable::build(&Style::default());
        for &x in &ElementKind::ALL {
            // Overridden cells: stem-stem, stem-accidental, stem-ledger,
            // and the note-specific melisma pad in the lyrics column.
            if matches!(x, Stem | Accidental | LedgerLine | Lyrics) {
                continue;
            }
            assert_eq!(
                table.padding(Stem, x),
                table.padding(Note, x),
                "stem row differs from note row at {x:?}"
            );
        }
        // And the overrides really do override.
        let sp = Style::default().spatium;
        assert_eq!(table.padding(Stem, Stem), 0.85 * sp);
        assert_eq!(table.padding(Stem, Accidental), 0.35 * sp);
        assert_eq!(table.padding(Stem, LedgerLine), 0.35 * sp);
    }

    #[test]
    fn halo_categories_broadcast_one_value() {
        let style = Style::default();
        let table = PaddingTable::build(&style);
        // Partners that no later fill overwrites.
        let partners = [Note, Stem, LedgerLine, Accidental, Rest, Clef, BarLine, KeySig, TimeSig];

        let ambitus = style.abs(style.ambitus_margin);
        for &x in &partners {
            assert_eq!(table.padding(Ambitus, x), ambitus);
            assert_eq!(table.padding(x, Ambitus), ambitus);
        }

        for &x in &partners {
            assert_eq!(table.padding(Breath, x), 1.0 * style.spatium);
            assert_eq!(table.padding(x, Breath), 1.0 * style.spatium);
        }

        for &x in &partners {
            if x == BarLine {
                // Chordlines get extra room against barlines.
                assert_eq!(table.padding(ChordLine, BarLine), 0.65 * style.spatium);
                assert_eq!(table.padding(BarLine, ChordLine), 0.65 * style.spatium);
                continue;
            }
            assert_eq!(table.padding(ChordLine, x), 0.35 * style.spatium);
            assert_eq!(table.padding(x, ChordLine), 0.35 * style.spatium);
        }

        for &x in &partners {
            assert_eq!(table.padding(Articulation, x), 0.35 * style.spatium);
            assert_eq!(table.padding(x, Articulation), 0.35 * style.spatium);
            assert_eq!(table.padding(Fermata, x), 0.35 * style.spatium);
            assert_eq!(table.padding(x, Fermata), 0.35 * style.spatium);
            assert_eq!(table.padding(Tapping, x), table.padding(Articulation, x));
            assert_eq!(table.padding(x, Tapping), table.padding(x, Articulation));
        }
    }

    #[test]
    fn fingering_borrows_accidental_column() {
        let table = PaddingTable::build(&Style::default());
        // The copy happens before the late accidental-row rules, so compare
        // against categories whose accidental cell is final at copy time.
        for &x in &[Note, Stem, LedgerLine, Rest, Clef, BarLine, KeySig, TimeSig, Hook, NoteDot] {
            assert_eq!(
                table.padding(x, Fingering),
                table.padding(x, Accidental),
                "fingering column differs from accidental column at {x:?}"
            );
        }
    }

    #[test]
    fn measure_repeat_spaces_like_a_note() {
        let table = PaddingTable::build(&Style::default());
        for &x in &[Rest, Clef, BarLine, KeySig, TimeSig, Accidental] {
            assert_eq!(table.padding(MeasureRepeat, x), table.padding(Note, x));
            assert_eq!(table.padding(x, MeasureRepeat), table.padding(x, Note));
        }
    }

    #[test]
    fn table_is_not_symmetric() {
        let style = Style::default();
        let table = PaddingTable::build(&style);
        // Rest before barline needs far more room than barline before rest.
        assert_eq!(table.padding(Rest, BarLine), 1.65 * style.spatium);
        assert_eq!(
            table.padding(BarLine, Rest),
            style.abs(style.bar_note_distance)
        );
    }

    #[test]
    fn paren_padding_is_asymmetric() {
        let style = Style::default();
        let table = ParenPaddingTable::build(ParenHost::Note, &style);
        // Parenthesis before a rest vs a rest before a parenthesis.
        assert_eq!(table.padding(Parenthesis, Rest), 0.45 * style.spatium);
        assert_eq!(
            table.padding(Rest, Parenthesis),
            style.abs(style.min_note_distance)
        );
        assert_ne!(
            table.padding(Parenthesis, Rest),
            table.padding(Rest, Parenthesis)
        );
    }

    #[test]
    fn paren_hosts_differ() {
        let style = Style::default();
        let note = ParenPaddingTable::build(ParenHost::Note, &style);
        let keysig = ParenPaddingTable::build(ParenHost::KeySig, &style);
        assert_ne!(
            note.padding(Parenthesis, Note),
            keysig.padding(Parenthesis, Note)
        );
    }

    #[test]
    fn paren_for_parent_rejects_invalid_kinds() {
        let style = Style::default();
        assert!(ParenPaddingTable::for_parent(ElementKind::Note, &style).is_some());
        // debug_assert fires in debug builds; the release fallback is None.
        if !cfg!(debug_assertions) {
            assert!(ParenPaddingTable::for_parent(ElementKind::Beam, &style).is_none());
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "without a parenthesis")]
    fn paren_lookup_without_parenthesis_panics_in_debug() {
        let table = ParenPaddingTable::build(ParenHost::Note, &Style::default());
        table.padding(Note, Rest);
    }
}
