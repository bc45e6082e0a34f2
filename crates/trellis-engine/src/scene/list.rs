use super::DrawCmd;

/// Recorded draw stream for one render target.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps allocated capacity for reuse across frames
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawList {
    items: Vec<DrawCmd>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }

    /// Returns items in paint order (back-to-front).
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Concatenated text of every glyph command, in paint order.
    pub fn glyph_text(&self) -> String {
        self.items
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCmd::Glyph { ch, .. } => Some(*ch),
                _ => None,
            })
            .collect()
    }
}
