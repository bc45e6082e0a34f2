//! Style cascade: inherited subset → stylesheet class → inline style.

use crate::cache;
use crate::style::Style;
use crate::stylesheet::Stylesheet;
use crate::tree::{NodeId, UiTree};

/// Resolves the effective style of `root` and every descendant.
///
/// `root` starts from [`Style::DEFAULT`]. Nodes whose effective style changed
/// are invalidated: geometry and caches when a layout field changed, caches
/// only for paint-only changes.
pub fn apply_styles(tree: &mut UiTree, root: NodeId, sheet: &Stylesheet) {
    if !tree.contains(root) {
        return;
    }
    let mut changed = 0usize;
    let mut stack = vec![(root, Style::DEFAULT)];
    while let Some((id, inherited)) = stack.pop() {
        let Some(style) = resolve(tree, id, inherited, sheet) else { continue };
        let Some(n) = tree.node_mut(id) else { continue };

        let layout_changed = n.style.layout_differs(&style);
        let paint_changed = !layout_changed && n.style != style;
        let down = style.inheritable();
        n.style = style;

        if layout_changed {
            cache::mark_dirty(tree, id);
            changed += 1;
        } else if paint_changed {
            cache::invalidate(tree, id);
            changed += 1;
        }

        // Reverse push keeps the walk in tree order.
        for &child in tree.children(id).iter().rev() {
            stack.push((child, down.clone()));
        }
    }
    log::debug!("cascade: {} node(s) changed style", changed);
}

fn resolve(tree: &UiTree, id: NodeId, mut style: Style, sheet: &Stylesheet) -> Option<Style> {
    let n = tree.node(id)?;
    if let Some(rule) = n.class.as_deref().and_then(|c| sheet.get(c)) {
        style.merge(rule);
    }
    if let Some(inline) = n.inline.get() {
        style.merge(inline);
    }
    Some(style)
}
