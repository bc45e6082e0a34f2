//! Renderer capability boundary.
//!
//! The UI core never knows which backend it talks to: GPU, framebuffer and
//! headless backends all implement [`Renderer`]. The only stateful part of the
//! interface is the offscreen target pair used by the render cache.

mod recording;

pub use recording::RecordingRenderer;

use crate::coords::{CornerRadii, Rect, Size};
use crate::paint::{BoxShadow, Color};
use crate::text::FontId;

/// Opaque handle to a backend texture (background image or cache target).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Draw calls consumed by the UI core.
pub trait Renderer {
    /// Solid axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Textured quad stretched over `rect`.
    fn draw_texture(&mut self, texture: TextureId, rect: Rect);

    /// Rounded rectangle with background fill and a border stroke of
    /// `border_width` (zero = no stroke).
    fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        background: Color,
        border: Color,
        radii: CornerRadii,
        border_width: u32,
    );

    /// Blurred drop shadow of the box `rect`.
    fn draw_shadow(&mut self, rect: Rect, radii: CornerRadii, shadow: BoxShadow);

    /// A single glyph cell placed by the font collaborator.
    fn draw_glyph(&mut self, font: FontId, ch: char, rect: Rect, color: Color);

    /// Redirects subsequent draw calls into a fresh, cleared offscreen texture
    /// of `size`. Must be paired with [`end_offscreen`](Self::end_offscreen).
    fn begin_offscreen(&mut self, size: Size) -> anyhow::Result<TextureId>;

    /// Restores the render target that was active before the matching
    /// [`begin_offscreen`](Self::begin_offscreen).
    fn end_offscreen(&mut self);

    /// Frees a texture previously returned by `begin_offscreen`.
    fn release_texture(&mut self, texture: TextureId);
}
