//! The closed set of visual element categories the spacing rules know about.

use serde::{Deserialize, Serialize};

/// Visual role of a layout primitive, used to index the padding tables.
///
/// This set is closed and fixed at compile time: every glyph the horizontal
/// spacing algorithm can place next to another maps onto exactly one of
/// these categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Note,
    Stem,
    LedgerLine,
    Accidental,
    Rest,
    Clef,
    BarLine,
    KeySig,
    TimeSig,
    Hook,
    NoteDot,
    Arpeggio,
    Ambitus,
    Breath,
    Harmony,
    FretDiagram,
    ChordLine,
    Fingering,
    Beam,
    TremoloSingleChord,
    Lyrics,
    Articulation,
    Fermata,
    Tapping,
    TappingHalfSlur,
    Parenthesis,
    MeasureRepeat,
    LaissezVib,
    PlayCount,
}

impl ElementKind {
    /// All categories, in table index order.
    pub const ALL: [ElementKind; 29] = [
        ElementKind::Note,
        ElementKind::Stem,
        ElementKind::LedgerLine,
        ElementKind::Accidental,
        ElementKind::Rest,
        ElementKind::Clef,
        ElementKind::BarLine,
        ElementKind::KeySig,
        ElementKind::TimeSig,
        ElementKind::Hook,
        ElementKind::NoteDot,
        ElementKind::Arpeggio,
        ElementKind::Ambitus,
        ElementKind::Breath,
        ElementKind::Harmony,
        ElementKind::FretDiagram,
        ElementKind::ChordLine,
        ElementKind::Fingering,
        ElementKind::Beam,
        ElementKind::TremoloSingleChord,
        ElementKind::Lyrics,
        ElementKind::Articulation,
        ElementKind::Fermata,
        ElementKind::Tapping,
        ElementKind::TappingHalfSlur,
        ElementKind::Parenthesis,
        ElementKind::MeasureRepeat,
        ElementKind::LaissezVib,
        ElementKind::PlayCount,
    ];

    /// Number of categories (the padding tables are COUNT × COUNT).
    pub const COUNT: usize = Self::ALL.len();

    /// Table index of this category.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_index_order() {
        for (i, kind) in ElementKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
