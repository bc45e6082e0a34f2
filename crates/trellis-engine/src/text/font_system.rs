use anyhow::anyhow;

use super::{FontId, Fonts};

/// Line height multiplier used when an outline font has no line metrics.
const FALLBACK_LINE_FACTOR: f32 = 1.2;

enum Face {
    /// Fixed-cell bitmap font (tile-map style): every glyph is one cell.
    Grid { cell_w: u32, cell_h: u32 },
    /// Outline font rasterized by fontdue at `px × scale`.
    Outline { font: fontdue::Font, px: f32 },
}

/// Owns a collection of loaded fonts and implements [`Fonts`] over them.
///
/// Fonts are immutable after loading. A `FontId` that was not issued by this
/// system measures as zero and draws nothing.
pub struct FontSystem {
    faces: Vec<Face>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { faces: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    ///
    /// `px` is the pixel size at scale 1.
    pub fn load_font(&mut self, bytes: &[u8], px: f32) -> anyhow::Result<FontId> {
        anyhow::ensure!(px > 0.0 && px.is_finite(), "invalid font size {px}");
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| anyhow!("font load error: {e}"))?;
        Ok(self.push(Face::Outline { font, px }))
    }

    /// Registers a fixed-cell font whose glyphs are `cell_w × cell_h` at scale 1.
    pub fn add_grid_font(&mut self, cell_w: u32, cell_h: u32) -> FontId {
        self.push(Face::Grid { cell_w, cell_h })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn push(&mut self, face: Face) -> FontId {
        let id = FontId(self.faces.len() as u32);
        self.faces.push(face);
        log::debug!("registered font {:?}", id);
        id
    }

    fn face(&self, id: FontId) -> Option<&Face> {
        self.faces.get(id.0 as usize)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Fonts for FontSystem {
    fn line_height(&self, font: FontId, scale: u32) -> Option<u32> {
        let scale = scale.max(1);
        match self.face(font)? {
            Face::Grid { cell_h, .. } => Some(cell_h.saturating_mul(scale)),
            Face::Outline { font, px } => {
                let size = px * scale as f32;
                let h = font
                    .horizontal_line_metrics(size)
                    .map(|m| m.new_line_size)
                    .unwrap_or(size * FALLBACK_LINE_FACTOR);
                Some(h.ceil().max(1.0) as u32)
            }
        }
    }

    fn advance(&self, font: FontId, scale: u32, ch: char) -> u32 {
        let scale = scale.max(1);
        match self.face(font) {
            Some(Face::Grid { cell_w, .. }) => cell_w.saturating_mul(scale),
            Some(Face::Outline { font, px }) => {
                font.metrics(ch, px * scale as f32).advance_width.ceil().max(0.0) as u32
            }
            None => 0,
        }
    }
}
