//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands
//! - keep paint order equal to insertion order (tree order is z-order)

mod cmd;
mod list;

pub use cmd::DrawCmd;
pub use list::DrawList;
