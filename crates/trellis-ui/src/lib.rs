//! Trellis UI — box tree, style cascade, flex layout and render cache on top
//! of `trellis-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use trellis_ui::prelude::*;
//!
//! let mut fonts = FontSystem::new();
//! let font = fonts.add_grid_font(8, 16);
//!
//! let sheet = Stylesheet::new()
//!     .rule("toolbar", Style::new().row().padding_all(4).background(Color::from_hex(0x202020ff)))
//!     .rule("button", Style::new().grow(1.0).font(font, 1).color(Color::WHITE));
//!
//! let mut tree = UiTree::new();
//! let root = tree.new_root();
//! tree.set_class(root, Some("toolbar"));
//! for label in ["Open", "Save", "Quit"] {
//!     let b = tree.new_child(root).unwrap();
//!     tree.set_class(b, Some("button"));
//!     tree.set_text(b, Some(label));
//! }
//!
//! // Once per frame:
//! apply_styles(&mut tree, root, &sheet);
//! layout(&mut tree, root, Rect::new(0, 0, 640, 32), &fonts);
//! render(&mut tree, root, &mut renderer, &fonts, &RenderConfig::default());
//! ```

pub mod cache;
pub mod cascade;
pub mod config;
pub mod layout;
pub mod render;
pub mod style;
pub mod stylesheet;
pub mod tree;

/// Everything a host needs to build, lay out and draw a tree.
pub mod prelude {
    pub use crate::cache::{cache_valid, invalidate, mark_dirty, shadow_margins};
    pub use crate::cascade::apply_styles;
    pub use crate::config::RenderConfig;
    pub use crate::layout::layout;
    pub use crate::render::render;
    pub use crate::style::{
        Align, Display, Edges, FlexDirection, Justify, Length, Position, Style, TextAlign,
    };
    pub use crate::stylesheet::Stylesheet;
    pub use crate::tree::{NodeId, UiTree};

    // Engine primitives that appear in styles and collaborator calls.
    pub use trellis_engine::coords::{CornerRadii, Rect, Size};
    pub use trellis_engine::paint::{BoxShadow, Color};
    pub use trellis_engine::render::{RecordingRenderer, Renderer, TextureId};
    pub use trellis_engine::text::{FontId, FontSystem, Fonts, WhiteSpace, WordBreak};
}
