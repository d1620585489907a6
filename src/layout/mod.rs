//! Layout engine: padding tables and tuplet bracket/number layout.

pub mod bracket;
pub mod number;
pub mod padding;
pub mod tuplet;

pub use bracket::{BracketGeometry, BracketInput};
pub use padding::{PaddingTable, ParenHost, ParenPaddingTable};

use crate::model::{Score, Selection, TupletElement, TupletId};
use crate::shape::Skyline;

/// Mutable collaborators shared across one layout pass: the skyline the
/// finished tuplets register with, and the editor selection that must stay
/// free of dangling references when a number is destroyed.
pub struct LayoutContext {
    pub skyline: Skyline,
    pub selection: Selection,
}

impl LayoutContext {
    pub fn new(staves: usize) -> Self {
        LayoutContext {
            skyline: Skyline::new(staves),
            selection: Selection::new(),
        }
    }
}

/// Worklist for a tuplet nest: every nested tuplet ahead of the tuplet
/// containing it, the root last.
pub fn layout_order(score: &Score, root: TupletId) -> Vec<TupletId> {
    let mut order = Vec::new();
    collect(score, root, &mut order);
    order
}

fn collect(score: &Score, id: TupletId, out: &mut Vec<TupletId>) {
    for element in score.tuplets[id].elements.iter().rev() {
        if let TupletElement::Tuplet(nested) = *element {
            collect(score, nested, out);
        }
    }
    out.push(id);
}

/// Lay out a tuplet and everything nested inside it, innermost first, so
/// each outer bracket can anchor on fully placed inner elements.
pub fn layout_with_nested(score: &mut Score, root: TupletId, ctx: &mut LayoutContext) {
    for id in layout_order(score, root) {
        tuplet::layout(score, id, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ticks, DirectionV, Score, Tuplet, TupletBracketType, TupletNumberType};
    use crate::style::Style;

    fn bare_tuplet(elements: Vec<TupletElement>) -> Tuplet {
        Tuplet {
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
            user_p1: Default::default(),
            user_p2: Default::default(),
            cross: false,
            visible: true,
            text_overrides: Default::default(),
            layout: Default::default(),
        }
    }

    #[test]
    fn layout_order_is_post_order() {
        let mut score = Score::new(Style::default());
        // 0 contains 1, 1 contains 2.
        score.tuplets.push(bare_tuplet(vec![
            TupletElement::ChordRest(0),
            TupletElement::Tuplet(1),
        ]));
        score.tuplets.push(bare_tuplet(vec![
            TupletElement::Tuplet(2),
            TupletElement::ChordRest(1),
        ]));
        score.tuplets.push(bare_tuplet(vec![TupletElement::ChordRest(2)]));

        assert_eq!(layout_order(&score, 0), vec![2, 1, 0]);
    }

    #[test]
    fn layout_order_of_leaf_is_itself() {
        let mut score = Score::new(Style::default());
        score.tuplets.push(bare_tuplet(vec![TupletElement::ChordRest(0)]));
        assert_eq!(layout_order(&score, 0), vec![0]);
    }
}
