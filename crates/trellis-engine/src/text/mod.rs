//! Font collaborator boundary.
//!
//! Layout measures text and the renderer draws it through the same [`Fonts`]
//! trait; both provided methods run one shared [`flow`] routine, so a run
//! measured during layout wraps at exactly the same points when drawn.

mod flow;
mod font_system;

pub use flow::flow;
pub use font_system::FontSystem;

use crate::coords::Rect;
use crate::paint::Color;
use crate::render::Renderer;

/// Opaque handle to a font registered with a [`Fonts`] implementation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub u32);

/// CSS `white-space`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum WhiteSpace {
    #[default]
    Normal,
    NoWrap,
    Pre,
    PreWrap,
    PreLine,
}

impl WhiteSpace {
    /// `\n` forces a line break instead of acting as a space.
    #[inline]
    pub fn preserves_newlines(self) -> bool {
        matches!(self, WhiteSpace::Pre | WhiteSpace::PreWrap | WhiteSpace::PreLine)
    }

    /// Runs of spaces collapse to one and line-leading spaces are dropped.
    #[inline]
    pub fn collapses_spaces(self) -> bool {
        matches!(self, WhiteSpace::Normal | WhiteSpace::NoWrap | WhiteSpace::PreLine)
    }

    /// Lines may break at the right edge of the box.
    #[inline]
    pub fn wraps(self) -> bool {
        !matches!(self, WhiteSpace::NoWrap | WhiteSpace::Pre)
    }
}

/// CSS `word-break`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum WordBreak {
    #[default]
    Normal,
    BreakAll,
    KeepAll,
    BreakWord,
}

/// Font parameters for one text run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextStyle {
    pub font: FontId,
    /// Integer scale factor applied to the font's base size.
    pub scale: u32,
    pub white_space: WhiteSpace,
    pub word_break: WordBreak,
}

/// Result of flowing a run into a box.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TextMetrics {
    /// Widest line, in pixels.
    pub width: u32,
    /// Height of all started lines, in pixels.
    pub height: u32,
    /// Byte offset of the first character that was not placed, if any.
    pub overflow: Option<usize>,
}

/// Glyph metrics source plus the shared measure/draw pair.
pub trait Fonts {
    /// Line advance for `font` at `scale`, or `None` for an unknown font.
    fn line_height(&self, font: FontId, scale: u32) -> Option<u32>;

    /// Horizontal advance of `ch`.
    fn advance(&self, font: FontId, scale: u32, ch: char) -> u32;

    /// Flows `text` into `bounds` without drawing.
    ///
    /// An unknown font contributes nothing: zero size, no overflow.
    fn measure(&self, text: &str, style: &TextStyle, bounds: Rect) -> TextMetrics {
        let Some(line_h) = self.line_height(style.font, style.scale) else {
            return TextMetrics::default();
        };
        flow(
            text,
            bounds,
            style.white_space,
            style.word_break,
            line_h,
            |ch| self.advance(style.font, style.scale, ch),
            |_, _| {},
        )
    }

    /// Flows `text` into `bounds`, emitting one glyph draw per placed character.
    fn draw(
        &self,
        renderer: &mut dyn Renderer,
        text: &str,
        style: &TextStyle,
        bounds: Rect,
        color: Color,
    ) -> TextMetrics {
        let Some(line_h) = self.line_height(style.font, style.scale) else {
            return TextMetrics::default();
        };
        flow(
            text,
            bounds,
            style.white_space,
            style.word_break,
            line_h,
            |ch| self.advance(style.font, style.scale, ch),
            |ch, rect| renderer.draw_glyph(style.font, ch, rect, color),
        )
    }
}

/// A box with no practical size limit, for intrinsic measurement.
#[inline]
pub fn unbounded() -> Rect {
    Rect::new(0, 0, u32::MAX, u32::MAX)
}
