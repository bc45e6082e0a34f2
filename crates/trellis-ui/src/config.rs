/// Options for [`render`](crate::render::render).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Serve subtrees from offscreen cache textures when they are unchanged.
    pub caching: bool,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self { caching: true }
    }

    /// Draw everything directly every frame.
    pub fn uncached() -> Self {
        Self { caching: false }
    }

    pub fn with_caching(mut self, caching: bool) -> Self {
        self.caching = caching;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}
