use std::rc::Rc;

use trellis_engine::coords::{Rect, Size};
use trellis_engine::render::TextureId;

use crate::cache::{self, CacheEntry};
use crate::style::Style;

// ── NodeId ────────────────────────────────────────────────────────────────

/// Generational handle to a node in a [`UiTree`].
///
/// A handle outlives its node: once the node is freed the slot's generation
/// moves on and every operation taking the stale handle becomes a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

// ── Node ──────────────────────────────────────────────────────────────────

/// The node's declared (inline) style layer.
#[derive(Debug, Clone, Default)]
pub(crate) enum InlineStyle {
    #[default]
    None,
    /// Private record owned by the node.
    Owned(Style),
    /// Record owned by the caller and possibly shared between nodes.
    Shared(Rc<Style>),
}

impl InlineStyle {
    pub(crate) fn get(&self) -> Option<&Style> {
        match self {
            InlineStyle::None => None,
            InlineStyle::Owned(s) => Some(s),
            InlineStyle::Shared(s) => Some(s),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    /// Insertion order is paint order and layout order.
    pub(crate) children: Vec<NodeId>,
    pub(crate) class: Option<String>,
    pub(crate) text: Option<String>,
    pub(crate) inline: InlineStyle,
    /// Effective style written by the cascade.
    pub(crate) style: Style,
    pub(crate) rect: Rect,
    /// Extent of the children (containers) or of the text run (leaves),
    /// excluding padding and border.
    pub(crate) content: Size,
    pub(crate) overflow: Option<usize>,
    pub(crate) cache: Option<CacheEntry>,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

// ── UiTree ────────────────────────────────────────────────────────────────

/// Arena owning every box, its styles and its cache state.
///
/// All mutation goes through the methods here (and the cascade, layout and
/// render passes), which keep geometry and cache invalidation consistent.
#[derive(Default)]
pub struct UiTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    /// Cache textures of freed nodes, released by the next render pass.
    pub(crate) retired: Vec<TextureId>,
}

impl UiTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    // ── creation ──────────────────────────────────────────────────────────

    /// Creates a parentless node.
    pub fn new_root(&mut self) -> NodeId {
        self.allocate(Node::default())
    }

    /// Appends a new node under `parent`. `None` if `parent` is stale.
    pub fn new_child(&mut self, parent: NodeId) -> Option<NodeId> {
        self.new_child_node(parent, InlineStyle::None)
    }

    /// Appends a new node owning the inline style `style`.
    pub fn new_child_with_style(&mut self, parent: NodeId, style: Style) -> Option<NodeId> {
        self.new_child_node(parent, InlineStyle::Owned(style))
    }

    /// Appends a new node whose inline style is the caller's shared record.
    pub fn new_child_shared(&mut self, parent: NodeId, style: Rc<Style>) -> Option<NodeId> {
        self.new_child_node(parent, InlineStyle::Shared(style))
    }

    fn new_child_node(&mut self, parent: NodeId, inline: InlineStyle) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.allocate(Node { parent: Some(parent), inline, ..Node::default() });
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        cache::mark_dirty(self, parent);
        Some(id)
    }

    // ── structure ─────────────────────────────────────────────────────────

    /// Moves `child` (and its subtree) to the end of `parent`'s children.
    ///
    /// Refuses (returns `false`) when either handle is stale or when `parent`
    /// lies inside `child`'s subtree.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.contains(parent) || !self.contains(child) || self.is_ancestor_or_self(child, parent) {
            return false;
        }
        if let Some(old) = self.detach(child) {
            cache::mark_dirty(self, old);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        cache::mark_dirty(self, child);
        cache::mark_dirty(self, parent);
        true
    }

    /// Detaches `node` from its parent and frees its whole subtree.
    pub fn remove(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        if let Some(parent) = self.detach(node) {
            cache::mark_dirty(self, parent);
        }
        self.free_subtree(node);
    }

    /// Frees every descendant of `node`; the node itself stays.
    pub fn clear(&mut self, node: NodeId) {
        let Some(n) = self.node_mut(node) else { return };
        let children = std::mem::take(&mut n.children);
        for child in children {
            self.free_subtree(child);
        }
        cache::mark_dirty(self, node);
    }

    // ── content ───────────────────────────────────────────────────────────

    /// Sets the class used for stylesheet lookup. Takes effect on the next
    /// cascade, which also resets geometry if layout fields change; cached
    /// pixels are invalidated here.
    pub fn set_class(&mut self, node: NodeId, class: Option<&str>) {
        let Some(n) = self.node_mut(node) else { return };
        if n.class.as_deref() == class {
            return;
        }
        n.class = class.map(str::to_owned);
        cache::invalidate(self, node);
    }

    /// Sets the node's text run. Invalidates geometry when the text changes.
    pub fn set_text(&mut self, node: NodeId, text: Option<&str>) {
        let Some(n) = self.node_mut(node) else { return };
        if n.text.as_deref() == text {
            return;
        }
        n.text = text.map(str::to_owned);
        cache::mark_dirty(self, node);
    }

    /// Replaces the node's inline style with a private record.
    pub fn set_style(&mut self, node: NodeId, style: Style) {
        let Some(n) = self.node_mut(node) else { return };
        if n.inline.get() == Some(&style) {
            return;
        }
        n.inline = InlineStyle::Owned(style);
        cache::mark_dirty(self, node);
    }

    /// Points the node's inline style at a caller-owned shared record.
    pub fn share_style(&mut self, node: NodeId, style: Rc<Style>) {
        let Some(n) = self.node_mut(node) else { return };
        n.inline = InlineStyle::Shared(style);
        cache::mark_dirty(self, node);
    }

    /// Edits the node's private inline style in place, marking the node dirty
    /// only if the edit changed something. A shared style is copied first.
    pub fn update_style(&mut self, node: NodeId, edit: impl FnOnce(&mut Style)) {
        let Some(n) = self.node_mut(node) else { return };
        let mut style = n.inline.get().cloned().unwrap_or_default();
        let before = style.clone();
        edit(&mut style);
        if style == before && matches!(n.inline, InlineStyle::Owned(_)) {
            return;
        }
        n.inline = InlineStyle::Owned(style);
        cache::mark_dirty(self, node);
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// Children in insertion order; empty for a stale handle.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Box computed by the last layout pass (zero = unmeasured).
    pub fn geometry(&self, node: NodeId) -> Option<Rect> {
        self.node(node).map(|n| n.rect)
    }

    pub fn content_size(&self, node: NodeId) -> Option<Size> {
        self.node(node).map(|n| n.content)
    }

    /// Effective style from the last cascade.
    pub fn computed_style(&self, node: NodeId) -> Option<&Style> {
        self.node(node).map(|n| &n.style)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.text.as_deref()
    }

    pub fn class(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.class.as_deref()
    }

    /// Byte offset in the text run where drawing stops, if the run does not
    /// fit the node's content box.
    pub fn overflow(&self, node: NodeId) -> Option<usize> {
        self.node(node)?.overflow
    }

    /// The part of the text run that does not fit.
    pub fn overflow_text(&self, node: NodeId) -> Option<&str> {
        let n = self.node(node)?;
        n.text.as_deref()?.get(n.overflow?..)
    }

    // ── internal ──────────────────────────────────────────────────────────

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    /// Snapshot of a node's children, for passes that mutate while walking.
    pub(crate) fn child_list(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).to_vec()
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId { index, generation: slot.generation }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot { generation: 0, node: Some(node) });
            NodeId { index, generation: 0 }
        }
    }

    /// Unlinks `node` from its parent, returning the former parent.
    fn detach(&mut self, node: NodeId) -> Option<NodeId> {
        let parent = self.node_mut(node)?.parent.take()?;
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != node);
        }
        Some(parent)
    }

    fn free_subtree(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(slot) = self.slots.get_mut(id.index as usize) else { continue };
            if slot.generation != id.generation {
                continue;
            }
            let Some(node) = slot.node.take() else { continue };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            self.len -= 1;

            if let Some(texture) = node.cache.and_then(|c| c.texture) {
                self.retired.push(texture);
            }
            stack.extend(node.children);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.parent(node) {
                Some(p) => node = p,
                None => return false,
            }
        }
    }
}
