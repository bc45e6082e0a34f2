//! Integer pixel geometry shared by the layout engine and renderers.
//!
//! Canonical space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Positions are signed (children may be offset past their parent's edges),
//! sizes are unsigned and never negative.

mod corner_radii;
mod rect;

pub use corner_radii::CornerRadii;
pub use rect::{Rect, Size};
