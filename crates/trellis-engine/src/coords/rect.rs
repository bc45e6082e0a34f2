/// Width/height pair in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    #[inline]
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { w: 0, h: 0 }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Axis-aligned rectangle in logical pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self { x: 0, y: 0, w: size.w, h: size.h }
    }

    #[inline]
    pub fn size(self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(self) -> i64 {
        self.y as i64 + self.h as i64
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, px: i32, py: i32) -> bool {
        let (px, py) = (px as i64, py as i64);
        px >= self.x as i64 && py >= self.y as i64 && px < self.right() && py < self.bottom()
    }

    #[inline]
    #[must_use]
    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x.saturating_add(dx), y: self.y.saturating_add(dy), ..self }
    }

    /// Shrink by per-side insets. Sizes clamp at zero.
    #[inline]
    #[must_use]
    pub fn inset(self, left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Rect::new(
            self.x.saturating_add(left as i32),
            self.y.saturating_add(top as i32),
            self.w.saturating_sub(left.saturating_add(right)),
            self.h.saturating_sub(top.saturating_add(bottom)),
        )
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let x0 = (self.x as i64).max(other.x as i64);
        let y0 = (self.y as i64).max(other.y as i64);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::new(x0 as i32, y0 as i32, (x1 - x0) as u32, (y1 - y0) as u32))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: u32, h: u32) -> Rect { Rect::new(x, y, w, h) }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_interior_point() {
        assert!(r(0, 0, 10, 10).contains(5, 5));
    }

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0, 0, 10, 10).contains(0, 0));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0, 0, 10, 10).contains(10, 10));
    }

    #[test]
    fn contains_outside() {
        assert!(!r(0, 0, 10, 10).contains(-1, 5));
        assert!(!r(0, 0, 10, 10).contains(5, -1));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let i = r(0, 0, 10, 10).intersect(r(5, 5, 10, 10)).unwrap();
        assert_eq!(i, r(5, 5, 5, 5));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        assert!(r(0, 0, 10, 10).intersect(r(10, 0, 10, 10)).is_none());
    }

    #[test]
    fn intersect_negative_origin() {
        let i = r(-5, -5, 10, 10).intersect(r(0, 0, 10, 10)).unwrap();
        assert_eq!(i, r(0, 0, 5, 5));
    }

    // ── inset / translate ─────────────────────────────────────────────────

    #[test]
    fn inset_asymmetric() {
        let inner = r(5, 5, 100, 60).inset(6, 4, 10, 8);
        assert_eq!(inner, r(11, 9, 84, 48));
    }

    #[test]
    fn inset_clamps_to_zero() {
        let inner = r(0, 0, 10, 10).inset(20, 20, 20, 20);
        assert_eq!(inner.w, 0);
        assert_eq!(inner.h, 0);
    }

    #[test]
    fn translate_round_trips() {
        let rect = r(3, 4, 5, 6);
        assert_eq!(rect.translate(-10, 7).translate(10, -7), rect);
    }

    // ── is_empty ──────────────────────────────────────────────────────────

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0, 0, 0, 5).is_empty());
        assert!(r(0, 0, 5, 0).is_empty());
        assert!(!r(0, 0, 1, 1).is_empty());
    }
}
