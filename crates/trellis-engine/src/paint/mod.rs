//! Paint model shared between the UI core and renderers.
//!
//! Style records store colors as packed straight-alpha bytes so they can be
//! compared for the cascade and hashed for cache keys. Renderers that blend in
//! premultiplied float space convert with [`Color::to_premul_f32`].

pub mod color;

pub use color::Color;

/// Drop shadow payload passed to [`crate::render::Renderer::draw_shadow`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BoxShadow {
    pub color: Color,
    /// Blur radius in logical pixels.
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl BoxShadow {
    /// A shadow is only drawn when it has a visible color and a positive blur.
    #[inline]
    pub fn is_visible(&self) -> bool {
        !self.color.is_transparent() && self.blur > 0.0
    }
}
