//! Render driver: walks the laid-out tree and issues draw calls, serving
//! unchanged subtrees from their cache textures.

use trellis_engine::coords::Rect;
use trellis_engine::paint::Color;
use trellis_engine::render::Renderer;
use trellis_engine::text::Fonts;

use crate::cache;
use crate::config::RenderConfig;
use crate::layout::content_box;
use crate::style::{Display, TextAlign};
use crate::tree::{Node, NodeId, UiTree};

/// Draws `root` and its subtree.
///
/// Textures of cache entries freed since the last call are released first.
pub fn render(
    tree: &mut UiTree,
    root: NodeId,
    renderer: &mut dyn Renderer,
    fonts: &dyn Fonts,
    config: &RenderConfig,
) {
    let retired = std::mem::take(&mut tree.retired);
    if !retired.is_empty() {
        log::debug!("releasing {} retired cache texture(s)", retired.len());
    }
    for texture in retired {
        renderer.release_texture(texture);
    }
    draw_node(tree, root, renderer, fonts, config);
}

fn draw_node(
    tree: &mut UiTree,
    id: NodeId,
    renderer: &mut dyn Renderer,
    fonts: &dyn Fonts,
    config: &RenderConfig,
) {
    let Some(n) = tree.node(id) else { return };
    if n.style.display == Display::None || n.rect.is_empty() {
        return;
    }

    if !config.caching {
        draw_raw(tree, id, renderer, fonts, config);
        return;
    }
    if !cache::cache_valid(tree, id) {
        if let Err(err) = cache::rebuild(tree, id, renderer, fonts, config) {
            log::warn!("drawing {:?} uncached: {:#}", id, err);
            draw_raw(tree, id, renderer, fonts, config);
            return;
        }
    }
    cache::draw_cached(tree, id, renderer);
}

/// Draws the node's own box and text, then its children in tree order.
pub(crate) fn draw_raw(
    tree: &mut UiTree,
    id: NodeId,
    renderer: &mut dyn Renderer,
    fonts: &dyn Fonts,
    config: &RenderConfig,
) {
    let Some(n) = tree.node(id) else { return };
    draw_box(n, renderer);
    draw_text(n, renderer, fonts);

    for child in tree.child_list(id) {
        draw_node(tree, child, renderer, fonts, config);
    }
}

fn draw_box(n: &Node, renderer: &mut dyn Renderer) {
    let style = &n.style;
    let rect = n.rect;
    let radii = style.border_radius;
    let rounded = !radii.is_zero();
    let bw = if style.border_color.is_transparent() { 0 } else { style.border_width };

    if style.box_shadow.is_visible() {
        renderer.draw_shadow(rect, radii, style.box_shadow);
    }

    let mut background = style.background_color;
    if let Some(texture) = style.background_image {
        renderer.draw_texture(texture, rect);
        background = Color::TRANSPARENT;
    }

    if rounded {
        if !background.is_transparent() || bw > 0 {
            renderer.draw_rounded_rect(rect, background, style.border_color, radii, bw);
        }
        return;
    }

    if !background.is_transparent() {
        renderer.fill_rect(rect, background);
    }
    if bw > 0 {
        for edge in border_edges(rect, bw) {
            renderer.fill_rect(edge, style.border_color);
        }
    }
}

/// Top, bottom, left, right strips of a square-cornered border.
fn border_edges(rect: Rect, bw: u32) -> [Rect; 4] {
    let bw_h = bw.min(rect.h);
    let bw_w = bw.min(rect.w);
    let side_h = rect.h.saturating_sub(bw_h * 2);
    let inner_y = rect.y.saturating_add(bw_h as i32);
    [
        Rect::new(rect.x, rect.y, rect.w, bw_h),
        Rect::new(rect.x, rect.y.saturating_add((rect.h - bw_h) as i32), rect.w, bw_h),
        Rect::new(rect.x, inner_y, bw_w, side_h),
        Rect::new(rect.x.saturating_add((rect.w - bw_w) as i32), inner_y, bw_w, side_h),
    ]
}

fn draw_text(n: &Node, renderer: &mut dyn Renderer, fonts: &dyn Fonts) {
    let style = &n.style;
    let Some(text) = n.text.as_deref().filter(|t| !t.is_empty()) else { return };
    let Some(ts) = style.text_style() else { return };
    if style.color.is_transparent() {
        return;
    }
    let inner = content_box(n.rect, style);
    if inner.is_empty() {
        return;
    }

    let dx = match style.text_align {
        TextAlign::Left => 0,
        align => {
            let free = inner.w.saturating_sub(fonts.measure(text, &ts, inner).width);
            if align == TextAlign::Center { free / 2 } else { free }
        }
    };
    fonts.draw(renderer, text, &ts, inner.translate(dx as i32, 0), style.color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_engine::coords::CornerRadii;
    use trellis_engine::logging::{init_logging, LoggingConfig};
    use trellis_engine::render::{RecordingRenderer, TextureId};
    use trellis_engine::scene::DrawCmd;
    use trellis_engine::text::{FontId, FontSystem};

    use crate::cascade::apply_styles;
    use crate::layout::layout;
    use crate::style::Style;
    use crate::stylesheet::Stylesheet;

    fn red() -> Color {
        Color::from_rgb8(255, 0, 0)
    }

    struct Ui {
        tree: UiTree,
        root: NodeId,
        fonts: FontSystem,
        font: FontId,
        renderer: RecordingRenderer,
    }

    impl Ui {
        fn new(root_style: Style) -> Self {
            init_logging(LoggingConfig::default().for_tests());
            let mut fonts = FontSystem::new();
            let font = fonts.add_grid_font(8, 16);
            let mut tree = UiTree::new();
            let root = tree.new_root();
            tree.set_style(root, root_style);
            Ui { tree, root, fonts, font, renderer: RecordingRenderer::new() }
        }

        fn frame(&mut self, rect: Rect, config: RenderConfig) {
            apply_styles(&mut self.tree, self.root, &Stylesheet::new());
            layout(&mut self.tree, self.root, rect, &self.fonts);
            self.renderer.clear_screen();
            render(&mut self.tree, self.root, &mut self.renderer, &self.fonts, &config);
        }

        fn raw(&mut self, rect: Rect) -> Vec<DrawCmd> {
            self.frame(rect, RenderConfig::uncached());
            self.renderer.screen().items().to_vec()
        }
    }

    // ── raw drawing ───────────────────────────────────────────────────────

    #[test]
    fn paint_order_is_shadow_background_border_text() {
        let mut ui = Ui::new(Style::new());
        let font = ui.font;
        ui.tree.set_style(
            ui.root,
            Style::new()
                .shadow(Color::BLACK, 2.0, 1.0, 1.0)
                .background(Color::WHITE)
                .border(1, red())
                .font(font, 1)
                .color(Color::BLACK),
        );
        ui.tree.set_text(ui.root, Some("a"));
        let cmds = ui.raw(Rect::new(0, 0, 20, 20));

        assert!(matches!(cmds[0], DrawCmd::Shadow { .. }));
        assert_eq!(cmds[1], DrawCmd::Fill { rect: Rect::new(0, 0, 20, 20), color: Color::WHITE });
        assert_eq!(cmds[2], DrawCmd::Fill { rect: Rect::new(0, 0, 20, 1), color: red() });
        assert_eq!(cmds[3], DrawCmd::Fill { rect: Rect::new(0, 19, 20, 1), color: red() });
        assert_eq!(cmds[4], DrawCmd::Fill { rect: Rect::new(0, 1, 1, 18), color: red() });
        assert_eq!(cmds[5], DrawCmd::Fill { rect: Rect::new(19, 1, 1, 18), color: red() });
        assert_eq!(
            cmds[6],
            DrawCmd::Glyph { font, ch: 'a', rect: Rect::new(1, 1, 8, 16), color: Color::BLACK },
        );
        assert_eq!(cmds.len(), 7);
    }

    #[test]
    fn radius_draws_one_rounded_rect() {
        let mut ui = Ui::new(Style::new().background(Color::WHITE).border(2, red()).radius(4));
        let cmds = ui.raw(Rect::new(0, 0, 20, 20));
        assert_eq!(
            cmds,
            vec![DrawCmd::RoundedRect {
                rect: Rect::new(0, 0, 20, 20),
                background: Color::WHITE,
                border: red(),
                radii: CornerRadii::all(4),
                border_width: 2,
            }],
        );
    }

    #[test]
    fn background_image_replaces_color() {
        let mut ui = Ui::new(Style::new().background(Color::WHITE).background_image(TextureId(7)));
        let cmds = ui.raw(Rect::new(0, 0, 20, 20));
        assert_eq!(cmds, vec![DrawCmd::Texture { texture: TextureId(7), rect: Rect::new(0, 0, 20, 20) }]);
    }

    #[test]
    fn children_paint_after_parent_in_tree_order() {
        let mut ui = Ui::new(Style::new().row().background(Color::BLACK));
        let root = ui.root;
        ui.tree.new_child_with_style(root, Style::new().grow(1.0).background(red()));
        ui.tree.new_child_with_style(root, Style::new().grow(1.0).background(Color::WHITE));
        let colors: Vec<_> = ui
            .raw(Rect::new(0, 0, 20, 10))
            .into_iter()
            .filter_map(|c| match c {
                DrawCmd::Fill { color, .. } => Some(color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::BLACK, red(), Color::WHITE]);
    }

    #[test]
    fn hidden_nodes_are_not_drawn() {
        let mut ui = Ui::new(Style::new());
        let root = ui.root;
        ui.tree.new_child_with_style(root, Style::new().grow(1.0).background(red()).display(Display::None));
        assert!(ui.raw(Rect::new(0, 0, 20, 10)).is_empty());
    }

    #[test]
    fn text_alignment_shifts_the_run() {
        for (align, x) in [(TextAlign::Left, 0), (TextAlign::Center, 12), (TextAlign::Right, 24)] {
            let mut ui = Ui::new(Style::new());
            let font = ui.font;
            ui.tree.set_style(ui.root, Style::new().font(font, 1).color(Color::WHITE).text_align(align));
            ui.tree.set_text(ui.root, Some("ab"));
            let cmds = ui.raw(Rect::new(0, 0, 40, 16));
            assert_eq!(cmds[0].rect().x, x, "{:?}", align);
        }
    }

    #[test]
    fn drawn_text_stops_at_layout_overflow() {
        let mut ui = Ui::new(Style::new());
        let font = ui.font;
        ui.tree.set_style(ui.root, Style::new().font(font, 1).color(Color::WHITE));
        ui.tree.set_text(ui.root, Some("lorem ipsum dolor"));
        ui.frame(Rect::new(10, 20, 40, 32), RenderConfig::uncached());

        assert_eq!(ui.tree.overflow_text(ui.root), Some("dolor"));
        assert_eq!(ui.renderer.screen().glyph_text(), "loremipsum");
    }

    // ── caching ───────────────────────────────────────────────────────────

    #[test]
    fn cached_frame_is_one_texture_draw() {
        let mut ui = Ui::new(Style::new().background(red()));
        let root = ui.root;
        ui.tree.new_child_with_style(root, Style::new().grow(1.0).background(Color::WHITE));
        ui.frame(Rect::new(5, 5, 30, 20), RenderConfig::default());

        let screen = ui.renderer.screen().items();
        assert_eq!(screen.len(), 1);
        let DrawCmd::Texture { texture, rect } = screen[0] else { panic!("expected texture, got {:?}", screen[0]) };
        assert_eq!(rect, Rect::new(5, 5, 30, 20));
        let inner = ui.renderer.texture(texture).unwrap().items();
        assert_eq!(inner[0], DrawCmd::Fill { rect: Rect::new(0, 0, 30, 20), color: red() });
        assert!(matches!(inner[1], DrawCmd::Texture { .. }));
    }

    #[test]
    fn mutation_rebuilds_only_the_affected_path() {
        let mut ui = Ui::new(Style::new().row());
        let root = ui.root;
        let font = ui.font;
        let a = ui.tree.new_child_with_style(root, Style::new().grow(1.0).font(font, 1).color(red())).unwrap();
        let _b = ui.tree.new_child_with_style(root, Style::new().grow(1.0).background(red())).unwrap();
        ui.tree.set_text(a, Some("x"));
        ui.frame(Rect::new(0, 0, 100, 20), RenderConfig::default());
        let before = ui.renderer.offscreen_passes();

        ui.tree.set_text(a, Some("y"));
        ui.frame(Rect::new(0, 0, 100, 20), RenderConfig::default());
        // root and `a` rebuild; `b` is reused.
        assert_eq!(ui.renderer.offscreen_passes(), before + 2);
    }

    #[test]
    fn uncached_render_makes_no_textures() {
        let mut ui = Ui::new(Style::new().background(red()));
        ui.frame(Rect::new(0, 0, 30, 20), RenderConfig::uncached());
        assert_eq!(ui.renderer.offscreen_passes(), 0);
        assert_eq!(ui.renderer.screen().len(), 1);
    }

    #[test]
    fn offscreen_failure_falls_back_to_raw() {
        let mut ui = Ui::new(Style::new().background(red()));
        ui.renderer = RecordingRenderer::new().with_max_texture_extent(8);
        ui.frame(Rect::new(0, 0, 30, 20), RenderConfig::default());
        assert_eq!(
            ui.renderer.screen().items(),
            &[DrawCmd::Fill { rect: Rect::new(0, 0, 30, 20), color: red() }],
        );
        assert_eq!(ui.renderer.target_depth(), 0);
    }

    #[test]
    fn removed_subtree_textures_are_released() {
        let mut ui = Ui::new(Style::new());
        let root = ui.root;
        let child = ui.tree.new_child_with_style(root, Style::new().grow(1.0).background(red())).unwrap();
        ui.frame(Rect::new(0, 0, 30, 20), RenderConfig::default());
        assert_eq!(ui.renderer.live_textures(), 2);

        ui.tree.remove(child);
        ui.frame(Rect::new(0, 0, 30, 20), RenderConfig::default());
        assert_eq!(ui.renderer.live_textures(), 1);
    }
}
