//! Dirty tracking and render-cache validity.
//!
//! Every rendered node owns at most one [`CacheEntry`]: an offscreen texture
//! holding the node's whole subtree plus room for its shadow. Mutations mark
//! entries dirty downwards (the subtree's pixels changed) and upwards (every
//! ancestor's texture contains those pixels too).

use std::hash::Hasher;

use anyhow::Context;
use rustc_hash::FxHasher;
use trellis_engine::coords::{Rect, Size};
use trellis_engine::render::{Renderer, TextureId};
use trellis_engine::text::Fonts;

use crate::config::RenderConfig;
use crate::render;
use crate::style::{Edges, Style};
use crate::tree::{NodeId, UiTree};

/// Shadow extent per pixel of blur radius, covering the blur falloff.
pub const SHADOW_BLUR_FACTOR: f32 = 3.0;

#[derive(Debug, Clone, Default)]
pub(crate) struct CacheEntry {
    pub(crate) dirty: bool,
    pub(crate) texture: Option<TextureId>,
    /// Texture size: node box plus shadow margins.
    pub(crate) size: Size,
    pub(crate) hash: u64,
}

// ── invalidation ──────────────────────────────────────────────────────────

/// Resets `node`'s subtree to "unmeasured" and invalidates every cache entry
/// in the subtree and on the path to the root.
pub fn mark_dirty(tree: &mut UiTree, node: NodeId) {
    if !tree.contains(node) {
        return;
    }
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        let Some(n) = tree.node_mut(id) else { continue };
        n.rect.w = 0;
        n.rect.h = 0;
        if let Some(entry) = n.cache.as_mut() {
            entry.dirty = true;
        }
        stack.extend(n.children.iter().copied());
    }
    invalidate_ancestors(tree, node);
    log::trace!("marked {:?} dirty", node);
}

/// Invalidates cached pixels of `node`'s subtree and ancestors without
/// touching geometry (paint-only changes).
pub fn invalidate(tree: &mut UiTree, node: NodeId) {
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        let Some(n) = tree.node_mut(id) else { continue };
        if let Some(entry) = n.cache.as_mut() {
            entry.dirty = true;
        }
        stack.extend(n.children.iter().copied());
    }
    invalidate_ancestors(tree, node);
}

fn invalidate_ancestors(tree: &mut UiTree, node: NodeId) {
    let mut cur = tree.parent(node);
    while let Some(id) = cur {
        let Some(n) = tree.node_mut(id) else { break };
        if let Some(entry) = n.cache.as_mut() {
            entry.dirty = true;
        }
        cur = n.parent;
    }
}

// ── validity ──────────────────────────────────────────────────────────────

/// `true` when the node's cached texture can be drawn as-is.
pub fn cache_valid(tree: &UiTree, node: NodeId) -> bool {
    let Some(n) = tree.node(node) else { return false };
    let Some(entry) = n.cache.as_ref() else { return false };

    !entry.dirty
        && entry.texture.is_some()
        && entry.size == required_size(&n.style, n.rect)
        && entry.hash == content_hash(&n.style, n.rect.size(), n.text.as_deref())
}

/// Extra pixels needed around a node's box so its shadow fits in the cache
/// texture. Zero unless the shadow has a color and a positive blur.
pub fn shadow_margins(style: &Style) -> Edges {
    let shadow = &style.box_shadow;
    if !shadow.is_visible() {
        return Edges::ZERO;
    }
    let spread = shadow.blur * SHADOW_BLUR_FACTOR;
    let px = |v: f32| v.max(0.0).ceil() as u32;
    Edges {
        left: px(spread + (-shadow.offset_x).max(0.0)),
        right: px(spread + shadow.offset_x.max(0.0)),
        top: px(spread + (-shadow.offset_y).max(0.0)),
        bottom: px(spread + shadow.offset_y.max(0.0)),
    }
}

fn required_size(style: &Style, rect: Rect) -> Size {
    let m = shadow_margins(style);
    Size::new(rect.w.saturating_add(m.h()), rect.h.saturating_add(m.v()))
}

fn content_hash(style: &Style, size: Size, text: Option<&str>) -> u64 {
    let mut h = FxHasher::default();
    style.hash_into(&mut h);
    h.write_u32(size.w);
    h.write_u32(size.h);
    if let Some(text) = text {
        h.write(text.as_bytes());
    }
    h.finish()
}

// ── rebuild ───────────────────────────────────────────────────────────────

/// Offscreen pass over one subtree.
///
/// While alive, the subtree's coordinates are translated into texture space
/// and the renderer targets the cache texture. Dropping it restores both,
/// whichever way the pass ends.
struct OffscreenScope<'a> {
    tree: &'a mut UiTree,
    renderer: &'a mut dyn Renderer,
    node: NodeId,
    dx: i32,
    dy: i32,
}

impl Drop for OffscreenScope<'_> {
    fn drop(&mut self) {
        translate_subtree(self.tree, self.node, -self.dx, -self.dy);
        self.renderer.end_offscreen();
    }
}

/// Re-renders `node`'s subtree into a fresh cache texture.
///
/// The node's own box is drawn directly, never through its own entry; its
/// children still go through their own cache entries.
pub(crate) fn rebuild(
    tree: &mut UiTree,
    node: NodeId,
    renderer: &mut dyn Renderer,
    fonts: &dyn Fonts,
    config: &RenderConfig,
) -> anyhow::Result<()> {
    let Some(n) = tree.node_mut(node) else { return Ok(()) };
    let rect = n.rect;
    let margins = shadow_margins(&n.style);
    let required = required_size(&n.style, rect);
    let entry = n.cache.get_or_insert_with(CacheEntry::default);
    entry.dirty = true;

    if rect.is_empty() {
        return Ok(());
    }
    if let Some(old) = entry.texture.take() {
        renderer.release_texture(old);
    }

    let texture = renderer
        .begin_offscreen(required)
        .with_context(|| format!("cache texture {}x{} for {:?}", required.w, required.h, node))?;

    let dx = (margins.left as i32).saturating_sub(rect.x);
    let dy = (margins.top as i32).saturating_sub(rect.y);
    translate_subtree(tree, node, dx, dy);
    {
        let mut scope = OffscreenScope { tree: &mut *tree, renderer: &mut *renderer, node, dx, dy };
        render::draw_raw(&mut *scope.tree, node, &mut *scope.renderer, fonts, config);
    }

    let Some(n) = tree.node_mut(node) else { return Ok(()) };
    let hash = content_hash(&n.style, n.rect.size(), n.text.as_deref());
    if let Some(entry) = n.cache.as_mut() {
        entry.texture = Some(texture);
        entry.size = required;
        entry.hash = hash;
        entry.dirty = false;
    }
    log::trace!("rebuilt cache for {:?} ({}x{})", node, required.w, required.h);
    Ok(())
}

/// Blits the node's cached texture at its current position.
pub(crate) fn draw_cached(tree: &UiTree, node: NodeId, renderer: &mut dyn Renderer) {
    let Some(n) = tree.node(node) else { return };
    let Some(entry) = n.cache.as_ref() else { return };
    let Some(texture) = entry.texture else { return };
    let m = shadow_margins(&n.style);
    let dst = Rect::new(
        n.rect.x.saturating_sub(m.left as i32),
        n.rect.y.saturating_sub(m.top as i32),
        entry.size.w,
        entry.size.h,
    );
    renderer.draw_texture(texture, dst);
}

fn translate_subtree(tree: &mut UiTree, node: NodeId, dx: i32, dy: i32) {
    let mut stack = vec![node];
    while let Some(id) = stack.pop() {
        let Some(n) = tree.node_mut(id) else { continue };
        n.rect = n.rect.translate(dx, dy);
        stack.extend(n.children.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_engine::logging::{init_logging, LoggingConfig};
    use trellis_engine::paint::Color;
    use trellis_engine::render::RecordingRenderer;
    use trellis_engine::text::FontSystem;

    use crate::layout::layout;
    use crate::render::render;

    struct Fixture {
        tree: UiTree,
        root: NodeId,
        child: NodeId,
        leaf: NodeId,
        fonts: FontSystem,
        renderer: RecordingRenderer,
    }

    fn fixture() -> Fixture {
        init_logging(LoggingConfig::default().for_tests());
        let mut fonts = FontSystem::new();
        let font = fonts.add_grid_font(8, 16);
        let mut tree = UiTree::new();
        let root = tree.new_root();
        tree.set_style(root, Style::new().background(Color::WHITE));
        let child = tree.new_child_with_style(root, Style::new().grow(1.0)).unwrap();
        let leaf = tree.new_child_with_style(child, Style::new().font(font, 1)).unwrap();
        tree.set_text(leaf, Some("hi"));
        crate::cascade::apply_styles(&mut tree, root, &crate::stylesheet::Stylesheet::new());
        Fixture { tree, root, child, leaf, fonts, renderer: RecordingRenderer::new() }
    }

    impl Fixture {
        fn frame(&mut self) {
            layout(&mut self.tree, self.root, Rect::new(0, 0, 200, 100), &self.fonts);
            self.renderer.clear_screen();
            render(&mut self.tree, self.root, &mut self.renderer, &self.fonts, &RenderConfig::default());
        }
    }

    // ── validity ──────────────────────────────────────────────────────────

    #[test]
    fn no_entry_is_invalid() {
        let f = fixture();
        assert!(!cache_valid(&f.tree, f.root));
    }

    #[test]
    fn valid_after_one_render() {
        let mut f = fixture();
        f.frame();
        assert!(cache_valid(&f.tree, f.root));
        assert!(cache_valid(&f.tree, f.child));
        assert!(cache_valid(&f.tree, f.leaf));
    }

    #[test]
    fn mark_dirty_invalidates_and_zeroes_geometry() {
        let mut f = fixture();
        f.frame();
        mark_dirty(&mut f.tree, f.child);
        assert!(!cache_valid(&f.tree, f.child));
        assert!(!cache_valid(&f.tree, f.leaf));
        assert!(!cache_valid(&f.tree, f.root));
        assert_eq!(f.tree.geometry(f.child).map(|r| (r.w, r.h)), Some((0, 0)));
        assert_eq!(f.tree.geometry(f.leaf).map(|r| (r.w, r.h)), Some((0, 0)));
    }

    #[test]
    fn class_change_invalidates_without_touching_geometry() {
        let mut f = fixture();
        f.frame();
        let before = f.tree.geometry(f.leaf);
        f.tree.set_class(f.leaf, Some("accent"));
        assert!(!cache_valid(&f.tree, f.leaf));
        assert!(!cache_valid(&f.tree, f.child));
        assert!(!cache_valid(&f.tree, f.root));
        assert_eq!(f.tree.geometry(f.leaf), before);
    }

    #[test]
    fn setting_the_same_class_keeps_entries_valid() {
        let mut f = fixture();
        f.tree.set_class(f.leaf, Some("accent"));
        f.frame();
        f.tree.set_class(f.leaf, Some("accent"));
        assert!(cache_valid(&f.tree, f.leaf));
        assert!(cache_valid(&f.tree, f.root));
    }

    #[test]
    fn descendant_text_change_invalidates_every_ancestor() {
        let mut f = fixture();
        f.frame();
        f.tree.set_text(f.leaf, Some("changed"));
        assert!(!cache_valid(&f.tree, f.leaf));
        assert!(!cache_valid(&f.tree, f.child));
        assert!(!cache_valid(&f.tree, f.root));
    }

    #[test]
    fn sibling_stays_valid_after_mutation() {
        let mut f = fixture();
        let sibling = f.tree.new_child_with_style(f.root, Style::new().grow(1.0)).unwrap();
        crate::cascade::apply_styles(&mut f.tree, f.root, &crate::stylesheet::Stylesheet::new());
        f.frame();
        f.tree.set_text(f.leaf, Some("changed"));
        assert!(cache_valid(&f.tree, sibling));
    }

    #[test]
    fn size_change_is_a_miss() {
        let mut f = fixture();
        f.frame();
        layout(&mut f.tree, f.root, Rect::new(0, 0, 300, 100), &f.fonts);
        assert!(!cache_valid(&f.tree, f.root));
    }

    #[test]
    fn moving_without_resizing_keeps_cache() {
        let mut f = fixture();
        f.frame();
        layout(&mut f.tree, f.root, Rect::new(40, 30, 200, 100), &f.fonts);
        assert!(cache_valid(&f.tree, f.root));
        assert!(cache_valid(&f.tree, f.leaf));
    }

    #[test]
    fn second_frame_reuses_textures() {
        let mut f = fixture();
        f.frame();
        let passes = f.renderer.offscreen_passes();
        f.frame();
        assert_eq!(f.renderer.offscreen_passes(), passes);
        assert_eq!(f.renderer.screen().len(), 1);
    }

    // ── shadow margins ────────────────────────────────────────────────────

    #[test]
    fn no_shadow_no_margin() {
        assert_eq!(shadow_margins(&Style::new()), Edges::ZERO);
        // Color without blur, or blur without color, is not a shadow.
        assert_eq!(shadow_margins(&Style::new().shadow(Color::BLACK, 0.0, 4.0, 4.0)), Edges::ZERO);
        assert_eq!(shadow_margins(&Style::new().shadow(Color::TRANSPARENT, 5.0, 0.0, 0.0)), Edges::ZERO);
    }

    #[test]
    fn offset_grows_the_far_side_only() {
        let m = shadow_margins(&Style::new().shadow(Color::BLACK, 2.0, 4.0, -3.0));
        assert_eq!(m, Edges { left: 6, right: 10, top: 9, bottom: 6 });
    }

    #[test]
    fn shadow_enlarges_cache_texture() {
        let mut f = fixture();
        f.tree.set_style(f.root, Style::new().shadow(Color::BLACK, 1.0, 0.0, 0.0));
        crate::cascade::apply_styles(&mut f.tree, f.root, &crate::stylesheet::Stylesheet::new());
        f.frame();
        let entry = f.tree.node(f.root).unwrap().cache.clone().unwrap();
        assert_eq!(entry.size, Size::new(206, 106));
        assert_eq!(
            f.renderer.screen().items()[0].rect(),
            Rect::new(-3, -3, 206, 106),
        );
    }

    // ── rebuild scope ─────────────────────────────────────────────────────

    #[test]
    fn rebuild_restores_coordinates_and_target() {
        let mut f = fixture();
        layout(&mut f.tree, f.root, Rect::new(25, 35, 200, 100), &f.fonts);
        let before: Vec<_> = [f.root, f.child, f.leaf].iter().map(|&n| f.tree.geometry(n)).collect();
        rebuild(&mut f.tree, f.root, &mut f.renderer, &f.fonts, &RenderConfig::default()).unwrap();
        let after: Vec<_> = [f.root, f.child, f.leaf].iter().map(|&n| f.tree.geometry(n)).collect();
        assert_eq!(before, after);
        assert_eq!(f.renderer.target_depth(), 0);
    }

    #[test]
    fn rebuild_draws_in_texture_space() {
        let mut f = fixture();
        layout(&mut f.tree, f.root, Rect::new(25, 35, 200, 100), &f.fonts);
        rebuild(&mut f.tree, f.root, &mut f.renderer, &f.fonts, &RenderConfig::default()).unwrap();
        let tex = f.tree.node(f.root).unwrap().cache.as_ref().unwrap().texture.unwrap();
        // Root background lands at the texture origin, not at (25, 35).
        assert_eq!(f.renderer.texture(tex).unwrap().items()[0].rect(), Rect::new(0, 0, 200, 100));
    }

    #[test]
    fn failed_offscreen_leaves_entry_invalid() {
        let mut f = fixture();
        f.renderer = RecordingRenderer::new().with_max_texture_extent(16);
        layout(&mut f.tree, f.root, Rect::new(0, 0, 200, 100), &f.fonts);
        assert!(rebuild(&mut f.tree, f.root, &mut f.renderer, &f.fonts, &RenderConfig::default()).is_err());
        assert!(!cache_valid(&f.tree, f.root));
        assert_eq!(f.renderer.target_depth(), 0);
    }
}
