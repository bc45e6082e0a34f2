//! Trellis engine crate.
//!
//! Renderer-agnostic primitives and the collaborator seams the UI core talks
//! through: integer geometry, colors, the [`render::Renderer`] capability
//! trait (with a headless recording backend) and the [`text::Fonts`] trait.

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
