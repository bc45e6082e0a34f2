use crate::coords::{CornerRadii, Rect};
use crate::paint::{BoxShadow, Color};
use crate::render::TextureId;
use crate::text::FontId;

/// Renderer-agnostic draw command, one variant per [`crate::render::Renderer`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Fill {
        rect: Rect,
        color: Color,
    },
    Texture {
        texture: TextureId,
        rect: Rect,
    },
    RoundedRect {
        rect: Rect,
        background: Color,
        border: Color,
        radii: CornerRadii,
        border_width: u32,
    },
    Shadow {
        rect: Rect,
        radii: CornerRadii,
        shadow: BoxShadow,
    },
    Glyph {
        font: FontId,
        ch: char,
        rect: Rect,
        color: Color,
    },
}

impl DrawCmd {
    /// Destination rectangle of the command.
    pub fn rect(&self) -> Rect {
        match self {
            DrawCmd::Fill { rect, .. }
            | DrawCmd::Texture { rect, .. }
            | DrawCmd::RoundedRect { rect, .. }
            | DrawCmd::Shadow { rect, .. }
            | DrawCmd::Glyph { rect, .. } => *rect,
        }
    }
}
