use std::collections::HashMap;

use anyhow::ensure;

use crate::coords::{CornerRadii, Rect, Size};
use crate::paint::{BoxShadow, Color};
use crate::scene::{DrawCmd, DrawList};
use crate::text::FontId;

use super::{Renderer, TextureId};

/// Offscreen texture ids are allocated from the upper half of the id space so
/// they never collide with host-provided image textures.
const FIRST_OFFSCREEN_ID: u32 = 1 << 31;

/// Largest offscreen extent accepted by default, matching common GPU limits.
const DEFAULT_MAX_TEXTURE_EXTENT: u32 = 8192;

#[derive(Debug)]
struct OffscreenTarget {
    size: Size,
    list: DrawList,
}

/// Headless [`Renderer`] that records every call as a [`DrawCmd`].
///
/// Screen draws land in [`screen`](Self::screen); draws issued between
/// `begin_offscreen` / `end_offscreen` land in that texture's own list, so a
/// host can replay them into a real backend (or a test can inspect them).
#[derive(Debug)]
pub struct RecordingRenderer {
    screen: DrawList,
    textures: HashMap<TextureId, OffscreenTarget>,
    /// Active offscreen targets, innermost last.
    targets: Vec<TextureId>,
    next_texture: u32,
    max_texture_extent: u32,
    offscreen_passes: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            screen: DrawList::new(),
            textures: HashMap::new(),
            targets: Vec::new(),
            next_texture: FIRST_OFFSCREEN_ID,
            max_texture_extent: DEFAULT_MAX_TEXTURE_EXTENT,
            offscreen_passes: 0,
        }
    }

    /// Offscreen requests wider or taller than `extent` fail.
    pub fn with_max_texture_extent(mut self, extent: u32) -> Self {
        self.max_texture_extent = extent;
        self
    }

    /// Draw commands recorded for the screen target.
    #[inline]
    pub fn screen(&self) -> &DrawList {
        &self.screen
    }

    /// Starts a new frame on the screen target. Offscreen textures survive.
    #[inline]
    pub fn clear_screen(&mut self) {
        self.screen.clear();
    }

    /// Draw commands recorded into an offscreen texture.
    pub fn texture(&self, id: TextureId) -> Option<&DrawList> {
        self.textures.get(&id).map(|t| &t.list)
    }

    pub fn texture_size(&self, id: TextureId) -> Option<Size> {
        self.textures.get(&id).map(|t| t.size)
    }

    /// Number of live (not yet released) offscreen textures.
    #[inline]
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Total successful `begin_offscreen` calls since construction.
    #[inline]
    pub fn offscreen_passes(&self) -> usize {
        self.offscreen_passes
    }

    /// Nesting depth of active offscreen targets (0 = drawing to screen).
    #[inline]
    pub fn target_depth(&self) -> usize {
        self.targets.len()
    }

    fn current(&mut self) -> &mut DrawList {
        match self.targets.last() {
            Some(id) => match self.textures.get_mut(id) {
                Some(target) => &mut target.list,
                None => &mut self.screen,
            },
            None => &mut self.screen,
        }
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for RecordingRenderer {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.current().push(DrawCmd::Fill { rect, color });
    }

    fn draw_texture(&mut self, texture: TextureId, rect: Rect) {
        self.current().push(DrawCmd::Texture { texture, rect });
    }

    fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        background: Color,
        border: Color,
        radii: CornerRadii,
        border_width: u32,
    ) {
        self.current().push(DrawCmd::RoundedRect { rect, background, border, radii, border_width });
    }

    fn draw_shadow(&mut self, rect: Rect, radii: CornerRadii, shadow: BoxShadow) {
        self.current().push(DrawCmd::Shadow { rect, radii, shadow });
    }

    fn draw_glyph(&mut self, font: FontId, ch: char, rect: Rect, color: Color) {
        self.current().push(DrawCmd::Glyph { font, ch, rect, color });
    }

    fn begin_offscreen(&mut self, size: Size) -> anyhow::Result<TextureId> {
        ensure!(!size.is_empty(), "offscreen target has zero size ({}x{})", size.w, size.h);
        ensure!(
            size.w <= self.max_texture_extent && size.h <= self.max_texture_extent,
            "offscreen target {}x{} exceeds max extent {}",
            size.w,
            size.h,
            self.max_texture_extent,
        );

        let id = TextureId(self.next_texture);
        self.next_texture = self.next_texture.wrapping_add(1).max(FIRST_OFFSCREEN_ID);
        self.textures.insert(id, OffscreenTarget { size, list: DrawList::new() });
        self.targets.push(id);
        self.offscreen_passes += 1;
        log::trace!("offscreen begin {:?} {}x{}", id, size.w, size.h);
        Ok(id)
    }

    fn end_offscreen(&mut self) {
        debug_assert!(!self.targets.is_empty(), "end_offscreen called without matching begin_offscreen");
        if let Some(id) = self.targets.pop() {
            log::trace!("offscreen end {:?}", id);
        }
    }

    fn release_texture(&mut self, texture: TextureId) {
        if self.textures.remove(&texture).is_some() {
            log::trace!("released {:?}", texture);
        }
    }
}
