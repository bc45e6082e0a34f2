use std::hash::{Hash, Hasher};

use trellis_engine::coords::CornerRadii;
use trellis_engine::paint::{BoxShadow, Color};
use trellis_engine::render::TextureId;
use trellis_engine::text::{FontId, TextStyle, WhiteSpace, WordBreak};

// ── Edges ─────────────────────────────────────────────────────────────────

/// Insets on all four sides (padding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Edges {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Edges {
    pub const ZERO: Edges = Edges { top: 0, right: 0, bottom: 0, left: 0 };

    #[inline]
    pub const fn all(v: u32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    #[inline]
    pub const fn symmetric(vertical: u32, horizontal: u32) -> Self {
        Self { top: vertical, bottom: vertical, left: horizontal, right: horizontal }
    }

    /// Total inset on the horizontal axis.
    #[inline]
    pub fn h(self) -> u32 {
        self.left.saturating_add(self.right)
    }

    /// Total inset on the vertical axis.
    #[inline]
    pub fn v(self) -> u32 {
        self.top.saturating_add(self.bottom)
    }
}

// ── value enums ───────────────────────────────────────────────────────────

/// A pixel length or "auto" (used by flex-basis and edge offsets).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Length {
    #[default]
    Auto,
    Px(i32),
}

impl Length {
    /// Pixel value, or `None` for `Auto`.
    #[inline]
    pub fn px(self) -> Option<i32> {
        match self {
            Length::Auto => None,
            Length::Px(v) => Some(v),
        }
    }
}

/// CSS `flex-direction`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
}

/// CSS `position`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Position {
    #[default]
    Relative,
    Absolute,
}

/// CSS `display`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Display {
    #[default]
    Block,
    Inline,
    None,
}

/// Cross-axis alignment (`align-items`, `align-self`).
///
/// `Auto` is only meaningful for `align-self`, where it defers to the
/// container's `align-items`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Align {
    Auto,
    #[default]
    Stretch,
    FlexStart,
    Center,
    FlexEnd,
}

impl Align {
    /// Effective alignment of an item whose container aligns with `items`.
    #[inline]
    pub fn resolve(self, items: Align) -> Align {
        match (self, items) {
            (Align::Auto, Align::Auto) => Align::Stretch,
            (Align::Auto, items) => items,
            (own, _) => own,
        }
    }
}

/// Main-axis distribution (`justify-content`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Justify {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
}

/// CSS `text-align`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

// ── Style ─────────────────────────────────────────────────────────────────

/// Flat style record.
///
/// Every field's value in [`Style::DEFAULT`] doubles as its "unset" marker:
/// [`merge`](Style::merge) copies a field only when the source differs from
/// the default. A lower-priority layer can therefore never be overridden back
/// to a default value.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    // box model
    pub padding: Edges,
    pub border_width: u32,
    pub border_color: Color,
    pub border_radius: CornerRadii,

    // background
    pub background_color: Color,
    pub background_image: Option<TextureId>,

    // text
    pub font: Option<FontId>,
    /// Integer scale applied to the font's base size.
    pub font_size: u32,
    pub color: Color,
    pub text_align: TextAlign,
    pub white_space: WhiteSpace,
    pub word_break: WordBreak,

    // flexbox
    pub flex_direction: FlexDirection,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    /// `Px(n > 0)` fixed, `Px(0)` zero, `Auto` (or negative) from content.
    pub flex_basis: Length,

    // positioning
    pub position: Position,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,

    // alignment
    pub align_items: Align,
    pub align_self: Align,
    pub justify_content: Justify,

    pub display: Display,

    pub box_shadow: BoxShadow,
}

impl Style {
    pub const DEFAULT: Style = Style {
        padding: Edges::ZERO,
        border_width: 0,
        border_color: Color::TRANSPARENT,
        border_radius: CornerRadii::zero(),
        background_color: Color::TRANSPARENT,
        background_image: None,
        font: None,
        font_size: 1,
        color: Color::TRANSPARENT,
        text_align: TextAlign::Left,
        white_space: WhiteSpace::Normal,
        word_break: WordBreak::Normal,
        flex_direction: FlexDirection::Column,
        flex_grow: 0.0,
        flex_shrink: 1.0,
        flex_basis: Length::Auto,
        position: Position::Relative,
        top: Length::Auto,
        right: Length::Auto,
        bottom: Length::Auto,
        left: Length::Auto,
        align_items: Align::Stretch,
        align_self: Align::Auto,
        justify_content: Justify::FlexStart,
        display: Display::Block,
        box_shadow: BoxShadow {
            color: Color::TRANSPARENT,
            blur: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        },
    };

    #[inline]
    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Sentinel merge: take each field of `src` that differs from the default.
    pub fn merge(&mut self, src: &Style) {
        let d = &Style::DEFAULT;

        macro_rules! merge {
            ($($field:ident).+) => {
                if src.$($field).+ != d.$($field).+ {
                    self.$($field).+ = src.$($field).+;
                }
            };
        }

        merge!(padding.top);
        merge!(padding.right);
        merge!(padding.bottom);
        merge!(padding.left);
        merge!(border_width);
        merge!(border_color);
        merge!(border_radius.top_left);
        merge!(border_radius.top_right);
        merge!(border_radius.bottom_right);
        merge!(border_radius.bottom_left);

        merge!(background_color);
        merge!(background_image);

        merge!(font);
        merge!(font_size);
        merge!(color);
        merge!(text_align);
        merge!(white_space);
        merge!(word_break);

        merge!(flex_direction);
        merge!(flex_grow);
        merge!(flex_shrink);
        merge!(flex_basis);

        merge!(position);
        merge!(top);
        merge!(right);
        merge!(bottom);
        merge!(left);

        merge!(align_items);
        merge!(align_self);
        merge!(justify_content);

        merge!(display);

        merge!(box_shadow.color);
        merge!(box_shadow.blur);
        merge!(box_shadow.offset_x);
        merge!(box_shadow.offset_y);
    }

    /// The part of this style that children start their cascade from.
    ///
    /// Text properties cascade; geometry, decoration, positioning and flex
    /// hints are per-element and reset to the default.
    pub fn inheritable(&self) -> Style {
        Style {
            font: self.font,
            font_size: self.font_size,
            color: self.color,
            text_align: self.text_align,
            white_space: self.white_space,
            word_break: self.word_break,
            ..Style::DEFAULT
        }
    }

    /// `true` if any field that feeds measurement or placement differs.
    pub fn layout_differs(&self, other: &Style) -> bool {
        self.padding != other.padding
            || self.border_width != other.border_width
            || self.flex_direction != other.flex_direction
            || self.flex_grow != other.flex_grow
            || self.flex_shrink != other.flex_shrink
            || self.flex_basis != other.flex_basis
            || self.position != other.position
            || self.top != other.top
            || self.right != other.right
            || self.bottom != other.bottom
            || self.left != other.left
            || self.align_items != other.align_items
            || self.align_self != other.align_self
            || self.justify_content != other.justify_content
            || self.display != other.display
            || self.font != other.font
            || self.font_size != other.font_size
            || self.white_space != other.white_space
            || self.word_break != other.word_break
    }

    /// Font parameters for this node's text run, if it has a font.
    pub fn text_style(&self) -> Option<TextStyle> {
        Some(TextStyle {
            font: self.font?,
            scale: self.font_size,
            white_space: self.white_space,
            word_break: self.word_break,
        })
    }

    /// Padding plus border on each side.
    #[inline]
    pub fn frame(&self) -> Edges {
        let b = self.border_width;
        Edges {
            top: self.padding.top.saturating_add(b),
            right: self.padding.right.saturating_add(b),
            bottom: self.padding.bottom.saturating_add(b),
            left: self.padding.left.saturating_add(b),
        }
    }

    #[inline]
    pub fn is_absolute(&self) -> bool {
        self.position == Position::Absolute
    }

    /// Feeds every field into `state`. Floats hash by bit pattern.
    pub fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.padding.hash(state);
        self.border_width.hash(state);
        self.border_color.hash(state);
        self.border_radius.hash(state);
        self.background_color.hash(state);
        self.background_image.hash(state);
        self.font.hash(state);
        self.font_size.hash(state);
        self.color.hash(state);
        self.text_align.hash(state);
        self.white_space.hash(state);
        self.word_break.hash(state);
        self.flex_direction.hash(state);
        self.flex_grow.to_bits().hash(state);
        self.flex_shrink.to_bits().hash(state);
        self.flex_basis.hash(state);
        self.position.hash(state);
        (self.top, self.right, self.bottom, self.left).hash(state);
        (self.align_items, self.align_self, self.justify_content).hash(state);
        self.display.hash(state);
        self.box_shadow.color.hash(state);
        self.box_shadow.blur.to_bits().hash(state);
        self.box_shadow.offset_x.to_bits().hash(state);
        self.box_shadow.offset_y.to_bits().hash(state);
    }

    // ── builder ───────────────────────────────────────────────────────────

    pub fn row(mut self) -> Self {
        self.flex_direction = FlexDirection::Row;
        self
    }

    pub fn column(mut self) -> Self {
        self.flex_direction = FlexDirection::Column;
        self
    }

    pub fn grow(mut self, v: f32) -> Self {
        self.flex_grow = v;
        self
    }

    pub fn shrink(mut self, v: f32) -> Self {
        self.flex_shrink = v;
        self
    }

    pub fn basis(mut self, px: i32) -> Self {
        self.flex_basis = Length::Px(px);
        self
    }

    pub fn padding(mut self, edges: Edges) -> Self {
        self.padding = edges;
        self
    }

    pub fn padding_all(mut self, v: u32) -> Self {
        self.padding = Edges::all(v);
        self
    }

    pub fn border(mut self, width: u32, color: Color) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }

    pub fn radius(mut self, r: u32) -> Self {
        self.border_radius = CornerRadii::all(r);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn background_image(mut self, texture: TextureId) -> Self {
        self.background_image = Some(texture);
        self
    }

    pub fn font(mut self, font: FontId, size: u32) -> Self {
        self.font = Some(font);
        self.font_size = size;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn white_space(mut self, ws: WhiteSpace) -> Self {
        self.white_space = ws;
        self
    }

    pub fn word_break(mut self, wb: WordBreak) -> Self {
        self.word_break = wb;
        self
    }

    pub fn absolute(mut self) -> Self {
        self.position = Position::Absolute;
        self
    }

    /// Edge offsets (top, right, bottom, left) for absolute positioning.
    pub fn inset(mut self, top: Length, right: Length, bottom: Length, left: Length) -> Self {
        self.top = top;
        self.right = right;
        self.bottom = bottom;
        self.left = left;
        self
    }

    pub fn align_items(mut self, align: Align) -> Self {
        self.align_items = align;
        self
    }

    pub fn align_self(mut self, align: Align) -> Self {
        self.align_self = align;
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify_content = justify;
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    pub fn shadow(mut self, color: Color, blur: f32, offset_x: f32, offset_y: f32) -> Self {
        self.box_shadow = BoxShadow { color, blur, offset_x, offset_y };
        self
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Style {
        Style::new()
            .row()
            .grow(2.0)
            .basis(40)
            .padding_all(3)
            .background(Color::from_rgb8(10, 20, 30))
            .font(FontId(1), 2)
            .absolute()
            .inset(Length::Px(5), Length::Auto, Length::Auto, Length::Px(7))
    }

    // ── merge ─────────────────────────────────────────────────────────────

    #[test]
    fn merge_into_self_is_idempotent() {
        let s = sample();
        let mut m = s.clone();
        m.merge(&s);
        assert_eq!(m, s);
    }

    #[test]
    fn merging_default_is_noop() {
        let s = sample();
        let mut m = s.clone();
        m.merge(&Style::DEFAULT);
        assert_eq!(m, s);
    }

    #[test]
    fn merge_takes_non_default_fields() {
        let mut dst = Style::new().background(Color::BLACK);
        dst.merge(&Style::new().grow(1.0).padding(Edges { left: 4, ..Edges::ZERO }));
        assert_eq!(dst.background_color, Color::BLACK);
        assert_eq!(dst.flex_grow, 1.0);
        assert_eq!(dst.padding.left, 4);
    }

    #[test]
    fn default_valued_field_cannot_be_reasserted() {
        // A layer that spells out the default shrink (1.0) is indistinguishable
        // from one that leaves it unset, so the lower layer's value survives.
        let mut dst = Style::new().shrink(0.0);
        dst.merge(&Style::new().shrink(1.0));
        assert_eq!(dst.flex_shrink, 0.0);
    }

    #[test]
    fn merge_is_per_padding_side() {
        let mut dst = Style::new().padding(Edges { top: 9, ..Edges::ZERO });
        dst.merge(&Style::new().padding(Edges { left: 2, ..Edges::ZERO }));
        assert_eq!(dst.padding, Edges { top: 9, left: 2, ..Edges::ZERO });
    }

    // ── inheritance ───────────────────────────────────────────────────────

    #[test]
    fn inheritable_keeps_text_resets_geometry() {
        let s = sample().color(Color::WHITE).white_space(WhiteSpace::Pre);
        let inh = s.inheritable();
        assert_eq!(inh.font, Some(FontId(1)));
        assert_eq!(inh.font_size, 2);
        assert_eq!(inh.color, Color::WHITE);
        assert_eq!(inh.white_space, WhiteSpace::Pre);
        assert_eq!(inh.padding, Edges::ZERO);
        assert_eq!(inh.background_color, Color::TRANSPARENT);
        assert_eq!(inh.position, Position::Relative);
        assert_eq!(inh.left, Length::Auto);
        assert_eq!(inh.flex_grow, 0.0);
        assert_eq!(inh.flex_basis, Length::Auto);
        assert_eq!(inh.flex_direction, FlexDirection::Column);
    }

    // ── diffing ───────────────────────────────────────────────────────────

    #[test]
    fn paint_only_change_is_not_a_layout_change() {
        let a = sample();
        let b = a.clone().background(Color::WHITE).border(0, Color::WHITE);
        assert!(!a.layout_differs(&b));
        assert_ne!(a, b);
        assert!(a.layout_differs(&a.clone().grow(3.0)));
    }

    // ── align ─────────────────────────────────────────────────────────────

    #[test]
    fn align_self_auto_defers_to_items() {
        assert_eq!(Align::Auto.resolve(Align::Center), Align::Center);
        assert_eq!(Align::FlexEnd.resolve(Align::Center), Align::FlexEnd);
        assert_eq!(Align::Auto.resolve(Align::Auto), Align::Stretch);
    }
}
