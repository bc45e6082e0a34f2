//! Single-line flexbox layout.
//!
//! Each container runs the same sequence over its children: intrinsic
//! measurement, base sizes, grow/shrink distribution, text re-measurement,
//! justify along the main axis, align along the cross axis, then absolute
//! placement. Geometry is integer pixels; negative intermediate sizes clamp to
//! zero before they are stored.

use trellis_engine::coords::{Rect, Size};
use trellis_engine::text::{Fonts, TextMetrics};

use crate::style::{Align, Display, FlexDirection, Justify, Length, Style};
use crate::tree::{Node, NodeId, UiTree};

/// Wrap width for measuring text that may run as wide as it likes.
const NO_WRAP: u32 = u32::MAX;

/// Lays out `root` into `rect`, then its whole subtree.
///
/// Expects styles to be resolved ([`apply_styles`](crate::cascade::apply_styles)).
pub fn layout(tree: &mut UiTree, root: NodeId, rect: Rect, fonts: &dyn Fonts) {
    let Some(n) = tree.node_mut(root) else { return };
    n.rect = rect;
    layout_node(tree, root, fonts);
    log::trace!("layout {:?} into {}x{} at ({}, {})", root, rect.w, rect.h, rect.x, rect.y);
}

// ── axes ──────────────────────────────────────────────────────────────────

/// `(main, cross)` components of `size`.
#[inline]
fn split(dir: FlexDirection, size: Size) -> (u32, u32) {
    match dir {
        FlexDirection::Row => (size.w, size.h),
        FlexDirection::Column => (size.h, size.w),
    }
}

#[inline]
fn join(dir: FlexDirection, main: u32, cross: u32) -> Size {
    match dir {
        FlexDirection::Row => Size::new(main, cross),
        FlexDirection::Column => Size::new(cross, main),
    }
}

/// `(x, y)` from main/cross coordinates.
#[inline]
fn join_pos(dir: FlexDirection, main: i64, cross: i64) -> (i32, i32) {
    match dir {
        FlexDirection::Row => (to_i32(main), to_i32(cross)),
        FlexDirection::Column => (to_i32(cross), to_i32(main)),
    }
}

#[inline]
fn to_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[inline]
fn to_u32(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

// ── basis ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Basis {
    Fixed(u32),
    Zero,
    /// From content (`auto` or a negative length).
    Auto,
}

impl Basis {
    fn of(style: &Style) -> Basis {
        if style.display == Display::Inline {
            return Basis::Auto;
        }
        match style.flex_basis {
            Length::Px(px) if px > 0 => Basis::Fixed(px as u32),
            Length::Px(0) => Basis::Zero,
            _ => Basis::Auto,
        }
    }

    /// Initial main size for an item whose content measures `content`.
    fn base(self, content: u32) -> u32 {
        match self {
            Basis::Fixed(px) => px,
            Basis::Zero => 0,
            Basis::Auto => content.max(1),
        }
    }
}

/// Main size an item contributes to its container's intrinsic size.
///
/// A zero-basis item that grows stands in as one pixel.
fn hypothetical_main(style: &Style, content: u32) -> u32 {
    match Basis::of(style) {
        Basis::Zero if style.flex_grow > 0.0 => 1,
        basis => basis.base(content),
    }
}

fn in_flow(style: &Style) -> bool {
    style.display != Display::None && !style.is_absolute()
}

// ── measurement ───────────────────────────────────────────────────────────

/// Intrinsic outer size of `id` (content plus padding and border), with text
/// wrapping inside `wrap` pixels of outer width.
fn measure(tree: &UiTree, id: NodeId, fonts: &dyn Fonts, wrap: u32) -> Size {
    let Some(n) = tree.node(id) else { return Size::zero() };
    let style = &n.style;
    if style.display == Display::None {
        return Size::zero();
    }
    let frame = style.frame();
    let inner_wrap = wrap.saturating_sub(frame.h());

    let mut flow = n
        .children
        .iter()
        .filter_map(|&c| tree.node(c).map(|cn| (c, cn)))
        .filter(|(_, cn)| in_flow(&cn.style))
        .peekable();

    let content = if flow.peek().is_none() {
        let bounds = Rect::new(0, 0, inner_wrap, u32::MAX);
        let m = text_metrics(n, fonts, bounds);
        Size::new(m.width, m.height)
    } else {
        let dir = style.flex_direction;
        let child_wrap = match dir {
            FlexDirection::Row => NO_WRAP,
            FlexDirection::Column => inner_wrap,
        };
        let (mut main, mut cross) = (0u32, 0u32);
        for (c, cn) in flow {
            let (m, x) = split(dir, measure(tree, c, fonts, child_wrap));
            main = main.saturating_add(hypothetical_main(&cn.style, m));
            cross = cross.max(x);
        }
        join(dir, main, cross)
    };

    Size::new(content.w.saturating_add(frame.h()), content.h.saturating_add(frame.v()))
}

/// Flows the node's text run into `bounds`. Nodes without text or without a
/// font measure as empty.
fn text_metrics(n: &Node, fonts: &dyn Fonts, bounds: Rect) -> TextMetrics {
    let Some(text) = n.text.as_deref().filter(|t| !t.is_empty()) else {
        return TextMetrics::default();
    };
    if bounds.is_empty() {
        return TextMetrics { overflow: Some(0), ..TextMetrics::default() };
    }
    match n.style.text_style() {
        Some(ts) => fonts.measure(text, &ts, bounds),
        None => TextMetrics::default(),
    }
}

/// Outer box minus padding and border.
pub(crate) fn content_box(rect: Rect, style: &Style) -> Rect {
    let f = style.frame();
    rect.inset(f.left, f.top, f.right, f.bottom)
}

// ── placement ─────────────────────────────────────────────────────────────

fn layout_node(tree: &mut UiTree, id: NodeId, fonts: &dyn Fonts) {
    let Some(n) = tree.node(id) else { return };
    let rect = n.rect;
    let style = n.style.clone();
    let has_children = !n.children.is_empty();
    let inner = content_box(rect, &style);

    let extent = if has_children && !rect.is_empty() {
        Some(layout_children(tree, id, &style, rect, inner, fonts))
    } else {
        None
    };

    let Some(n) = tree.node_mut(id) else { return };
    let metrics = text_metrics(n, fonts, inner);
    n.overflow = metrics.overflow;
    n.content = extent.unwrap_or(Size::new(metrics.width, metrics.height));
}

struct Item {
    id: NodeId,
    grow: f32,
    shrink: f32,
    basis: Basis,
    align: Align,
    main: u32,
    cross: u32,
}

/// Places every child of `id` and recurses into them. Returns the extent of
/// the in-flow children.
fn layout_children(
    tree: &mut UiTree,
    id: NodeId,
    style: &Style,
    outer: Rect,
    inner: Rect,
    fonts: &dyn Fonts,
) -> Size {
    let dir = style.flex_direction;
    let (inner_main, inner_cross) = split(dir, inner.size());
    let wrap = match dir {
        FlexDirection::Row => NO_WRAP,
        FlexDirection::Column => inner.w,
    };

    let mut items = Vec::new();
    let mut absolute = Vec::new();

    for child in tree.child_list(id) {
        let Some(c) = tree.node(child) else { continue };
        let cs = &c.style;
        if cs.display == Display::None {
            hide(tree, child);
            continue;
        }
        if cs.is_absolute() {
            absolute.push(child);
            continue;
        }

        let inline = cs.display == Display::Inline;
        let basis = Basis::of(cs);
        let mut align = cs.align_self.resolve(style.align_items);
        if inline && align == Align::Stretch {
            align = Align::FlexStart;
        }
        let (grow, shrink) = if inline { (0.0, 0.0) } else { (cs.flex_grow.max(0.0), cs.flex_shrink.max(0.0)) };

        let (content_main, content_cross) = split(dir, measure(tree, child, fonts, wrap));
        items.push(Item {
            id: child,
            grow,
            shrink,
            basis,
            align,
            main: basis.base(content_main),
            cross: content_cross,
        });
    }

    distribute(&mut items, inner_main);

    // Wrapped text gets taller once its width is final.
    if dir == FlexDirection::Row {
        for item in items.iter_mut().filter(|i| i.basis == Basis::Auto) {
            item.cross = measure(tree, item.id, fonts, item.main).h;
        }
    }

    let (inner_start_main, inner_start_cross) = match dir {
        FlexDirection::Row => (inner.x as i64, inner.y as i64),
        FlexDirection::Column => (inner.y as i64, inner.x as i64),
    };
    let (offset, gap) = justify(style.justify_content, &items, inner_main);

    let mut cursor = inner_start_main + offset;
    let mut extent_main = 0u32;
    let mut extent_cross = 0u32;
    for item in &items {
        let free_cross = inner_cross as i64 - item.cross as i64;
        let (cross, cross_offset) = match item.align {
            Align::Auto | Align::Stretch => (inner_cross, 0),
            Align::FlexStart => (item.cross, 0),
            Align::Center => (item.cross, free_cross / 2),
            Align::FlexEnd => (item.cross, free_cross),
        };
        let (x, y) = join_pos(dir, cursor, inner_start_cross + cross_offset);
        let size = join(dir, item.main, cross);
        if let Some(n) = tree.node_mut(item.id) {
            n.rect = Rect::new(x, y, size.w, size.h);
        }
        cursor += item.main as i64 + gap;
        extent_main = extent_main.saturating_add(item.main);
        extent_cross = extent_cross.max(cross);
    }

    for item in &items {
        layout_node(tree, item.id, fonts);
    }
    for child in absolute {
        place_absolute(tree, child, outer, fonts);
        layout_node(tree, child, fonts);
    }

    join(dir, extent_main, extent_cross)
}

/// Grow or shrink item main sizes so they fill `inner_main`.
///
/// Shares are floored; the last participating item takes the remainder, so
/// the sizes sum to `inner_main` exactly unless every shrinkable item is
/// already at zero.
fn distribute(items: &mut [Item], inner_main: u32) {
    let used: i64 = items.iter().map(|i| i.main as i64).sum();
    let free = inner_main as i64 - used;
    if free == 0 {
        return;
    }

    if free > 0 {
        let total: f64 = items.iter().map(|i| i.grow as f64).sum();
        if total <= 0.0 {
            return;
        }
        let last = items.iter().rposition(|i| i.grow > 0.0);
        let mut given = 0i64;
        for (k, item) in items.iter_mut().enumerate() {
            if item.grow <= 0.0 {
                continue;
            }
            let share = if Some(k) == last {
                free - given
            } else {
                (free as f64 * item.grow as f64 / total).floor() as i64
            };
            given += share;
            item.main = to_u32(item.main as i64 + share);
        }
    } else {
        shrink(items, -free);
    }
}

/// Takes `deficit` pixels off the items, weighted by `shrink × base`.
///
/// An item whose cut would reach its whole base size is frozen at zero and the
/// rest of the deficit is shared again among the others. Each round freezes
/// at least one item or finishes, so this runs at most `items.len()` rounds.
fn shrink(items: &mut [Item], mut deficit: i64) {
    let weight = |i: &Item| i.shrink as f64 * i.main as f64;
    let mut active: Vec<bool> = items.iter().map(|i| weight(i) > 0.0).collect();
    let mut cuts = vec![0i64; items.len()];

    for _ in 0..items.len() {
        if deficit <= 0 {
            return;
        }
        let total: f64 = items.iter().zip(&active).filter(|(_, a)| **a).map(|(i, _)| weight(i)).sum();
        let Some(last) = active.iter().rposition(|&a| a) else { return };
        if total <= 0.0 {
            return;
        }

        let mut taken = 0i64;
        for (k, item) in items.iter().enumerate() {
            if !active[k] {
                continue;
            }
            cuts[k] = if k == last {
                deficit - taken
            } else {
                (deficit as f64 * weight(item) / total).floor() as i64
            };
            taken += cuts[k];
        }

        let mut frozen = false;
        for (k, item) in items.iter_mut().enumerate() {
            if active[k] && cuts[k] >= item.main as i64 {
                deficit -= item.main as i64;
                item.main = 0;
                active[k] = false;
                frozen = true;
            }
        }
        if frozen {
            continue;
        }

        for (k, item) in items.iter_mut().enumerate() {
            if active[k] {
                item.main = to_u32(item.main as i64 - cuts[k]);
            }
        }
        return;
    }
}

/// Leading offset and inter-item gap for `justify-content`.
fn justify(mode: Justify, items: &[Item], inner_main: u32) -> (i64, i64) {
    let used: i64 = items.iter().map(|i| i.main as i64).sum();
    let remaining = (inner_main as i64 - used).max(0);
    let n = items.len() as i64;
    if n == 0 {
        return (0, 0);
    }
    match mode {
        Justify::FlexStart => (0, 0),
        Justify::FlexEnd => (remaining, 0),
        Justify::Center => (remaining / 2, 0),
        Justify::SpaceBetween if n == 1 => (remaining / 2, 0),
        Justify::SpaceBetween => (0, remaining / (n - 1)),
        Justify::SpaceAround => {
            let gap = remaining / n;
            (gap / 2, gap)
        }
    }
}

/// Four-edge placement against the parent's outer box.
fn place_absolute(tree: &mut UiTree, child: NodeId, outer: Rect, fonts: &dyn Fonts) {
    let Some(c) = tree.node(child) else { return };
    let s = &c.style;
    let (left, right, top, bottom) = (s.left.px(), s.right.px(), s.top.px(), s.bottom.px());
    let content = measure(tree, child, fonts, NO_WRAP);

    let (x, w) = pin(outer.x, outer.w, left, right, content.w);
    let (y, h) = pin(outer.y, outer.h, top, bottom, content.h);
    if let Some(n) = tree.node_mut(child) {
        n.rect = Rect::new(x, y, w, h);
    }
}

/// Position and size along one axis from a start/end edge pair.
fn pin(origin: i32, extent: u32, start: Option<i32>, end: Option<i32>, size: u32) -> (i32, u32) {
    let (o, e) = (origin as i64, extent as i64);
    match (start, end) {
        (Some(s), Some(en)) => (to_i32(o + s as i64), to_u32(e - s as i64 - en as i64)),
        (Some(s), None) => (to_i32(o + s as i64), size),
        (None, Some(en)) => (to_i32(o + e - en as i64 - size as i64), size),
        (None, None) => (origin, extent),
    }
}

fn hide(tree: &mut UiTree, id: NodeId) {
    if let Some(n) = tree.node_mut(id) {
        n.rect.w = 0;
        n.rect.h = 0;
        n.overflow = None;
    }
}
