//! engravelib — music engraving layout engine.
//!
//! Covers the two spacing-critical subsystems of a notation renderer: the
//! pairwise minimum-padding tables that keep adjacent glyphs apart, and
//! the tuplet bracket/number layout algorithm (direction, anchoring
//! through nested tuplets, slope-limited bracket geometry with a hole
//! carved for the number, and the number placement policies).
//!
//! # Example
//! ```
//! use engravelib::layout::PaddingTable;
//! use engravelib::{ElementKind, Style};
//!
//! let style = Style::default();
//! let table = PaddingTable::build(&style);
//! let gap = table.padding(ElementKind::Note, ElementKind::Rest);
//! assert_eq!(gap, 0.5 * style.spatium);
//! ```

pub mod element;
pub mod geom;
pub mod layout;
pub mod model;
pub mod shape;
pub mod style;

pub use element::ElementKind;
pub use geom::{Point, Rect};
pub use layout::{LayoutContext, PaddingTable, ParenHost, ParenPaddingTable};
pub use model::*;
pub use shape::{Shape, ShapeElement, Skyline};
pub use style::Style;
