//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
#![warn(missing_docs)]
//! `nuklear-redux` is an immediate-mode GUI core in the spirit of nuklear.
//! Each frame the host feeds input, declares windows, rows and widgets, and then either walks the
//! resulting command list or converts it into an anti-aliased triangle mesh. The crate never talks
//! to a window system or a GPU: fonts, clipboards and renderers are plugged in through traits.

use std::ops::{Add, Mul, Sub};

use bitflags::bitflags;

mod buffer;
mod color;
mod command;
mod context;
mod draw_context;
#[cfg(feature = "vertex-buffer")]
mod draw_list;
mod input;
mod layout;
mod menu;
mod panel;
mod pool;
mod popup;
mod style;
mod table;
mod text_editor;
mod utf8;
mod util;
mod widgets;
mod window;

pub use buffer::*;
pub use color::*;
pub use command::*;
pub use context::*;
pub use draw_context::DrawCtx;
#[cfg(feature = "vertex-buffer")]
pub use draw_list::*;
pub use input::*;
pub use layout::{LayoutFormat, RowLayoutType};
pub use panel::{PanelFlags, PanelType};
pub use pool::*;
pub use rs_math3d::{Recti, Vec2i};
pub use style::*;
pub use text_editor::*;
pub use utf8::*;
pub use util::{
    filter_ascii, filter_binary, filter_decimal, filter_default, filter_float, filter_hex, filter_oct, format_float, format_int, murmur_hash, Filter, Hash,
};

/// Decimal places kept when formatting floats for numeric fields.
pub const MAX_FLOAT_PRECISION: usize = 2;
/// Capacity of the text buffer used by numeric fields.
pub const MAX_NUMBER_BUFFER: usize = 64;
pub use widgets::*;
pub use window::*;

#[derive(Default, Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
/// Two dimensional float vector used for positions, sizes and paddings.
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// Creates a vector from its components.
    pub const fn new(x: f32, y: f32) -> Self { Self { x, y } }

    /// Squared length.
    pub fn len_sqr(self) -> f32 { self.x * self.x + self.y * self.y }

    /// Converts to an integer vector, truncating toward zero.
    pub fn to_vec2i(self) -> Vec2i { Vec2i::new(self.x as i32, self.y as i32) }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 { Vec2::new(self.x + o.x, self.y + o.y) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 { Vec2::new(self.x - o.x, self.y - o.y) }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 { Vec2::new(self.x * s, self.y * s) }
}

#[derive(Default, Copy, Clone, Debug, PartialEq)]
/// Floating point rectangle (`x`, `y` is the top left corner).
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

/// Rectangle large enough to stand for "no clipping".
pub const NULL_RECT: Rect = Rect { x: -8192.0, y: -8192.0, w: 16384.0, h: 16384.0 };

impl Rect {
    /// Creates a rectangle from position and size.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self { Self { x, y, w, h } }

    /// Builds a rectangle from a position and a size vector.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self { Self::new(pos.x, pos.y, size.x, size.y) }

    /// Top left corner.
    pub fn pos(&self) -> Vec2 { Vec2::new(self.x, self.y) }

    /// Width and height.
    pub fn size(&self) -> Vec2 { Vec2::new(self.w, self.h) }

    /// Center point.
    pub fn center(&self) -> Vec2 { Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5) }

    /// Half open containment test (`[x, x + w)`).
    pub fn contains(&self, p: Vec2) -> bool { p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h }

    /// Returns `true` if both rectangles share a non empty area.
    pub fn intersects(&self, o: &Rect) -> bool { o.x < self.x + self.w && self.x < o.x + o.w && o.y < self.y + self.h && self.y < o.y + o.h }

    /// Returns `true` if `o` lies completely outside of `self`.
    pub fn is_outside_of(&self, o: &Rect) -> bool { self.x > o.x + o.w || self.x + self.w < o.x || self.y > o.y + o.h || self.y + self.h < o.y }

    /// Shrinks the rectangle by `amount` on all four sides.
    pub fn shrink(&self, amount: f32) -> Rect {
        let w = (2.0 * amount).max(self.w);
        let h = (2.0 * amount).max(self.h);
        Rect::new(self.x + amount, self.y + amount, w - 2.0 * amount, h - 2.0 * amount)
    }

    /// Shrinks the rectangle by a per axis padding.
    pub fn pad(&self, pad: Vec2) -> Rect {
        let w = (2.0 * pad.x).max(self.w);
        let h = (2.0 * pad.y).max(self.h);
        Rect::new(self.x + pad.x, self.y + pad.y, w - 2.0 * pad.x, h - 2.0 * pad.y)
    }

    /// Grows the rectangle by a per axis padding.
    pub fn grow(&self, pad: Vec2) -> Rect { Rect::new(self.x - pad.x, self.y - pad.y, self.w + 2.0 * pad.x, self.h + 2.0 * pad.y) }

    /// Intersection of `self` and `other` as used for clip rectangles.
    /// A non overlapping pair yields an empty rectangle placed at the clamped corner.
    pub fn unify(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let x1 = (self.x + self.w).min(other.x + other.w).max(x);
        let y1 = (self.y + self.h).min(other.y + other.h).max(y);
        Rect::new(x, y, x1 - x, y1 - y)
    }

    /// Converts to an integer rectangle, truncating each field.
    pub fn to_recti(&self) -> Recti { Recti::new(self.x as i32, self.y as i32, self.w as i32, self.h as i32) }
}

/// Convenience constructor for [`Vec2`].
pub fn vec2(x: f32, y: f32) -> Vec2 { Vec2 { x, y } }

/// Convenience constructor for [`Rect`].
pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect { x, y, w, h } }

/// Convenience constructor for [`Color`].
pub fn color(r: u8, g: u8, b: u8, a: u8) -> Color { Color { r, g, b, a } }

#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
/// Simple RGBA color stored with 8-bit components.
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
/// Handle referencing a font registered in the [`Context`].
pub struct FontId(pub(crate) u32);

impl FontId {
    /// Returns the raw registry index.
    pub fn raw(self) -> u32 { self.0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
/// Handle referencing a renderer-owned texture.
pub struct TextureId(pub u32);

impl TextureId {
    /// Returns the raw numeric identifier stored inside the handle.
    pub fn raw(self) -> u32 { self.0 }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
/// Texture reference with an optional sub region in pixels.
pub struct Image {
    /// Backing texture.
    pub texture: TextureId,
    /// Texture width in pixels.
    pub w: u16,
    /// Texture height in pixels.
    pub h: u16,
    /// Sub region `x, y, w, h` in pixels; all zeros selects the full texture.
    pub region: [u16; 4],
}

impl Image {
    /// References the whole texture.
    pub fn new(texture: TextureId) -> Self { Self { texture, w: 0, h: 0, region: [0; 4] } }

    /// References a sub rectangle of a `w` by `h` texture.
    pub fn sub_image(texture: TextureId, w: u16, h: u16, region: [u16; 4]) -> Self { Self { texture, w, h, region } }

    /// Returns `true` if the image covers only part of its texture.
    pub fn is_subimage(&self) -> bool { !(self.w == 0 && self.h == 0) }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
/// Placement information for a single glyph.
pub struct Glyph {
    /// Texture coordinates of the top left and bottom right corners.
    pub uv: [Vec2; 2],
    /// Offset from the pen position to the glyph's top left corner.
    pub offset: Vec2,
    /// Glyph width in pixels.
    pub width: f32,
    /// Glyph height in pixels.
    pub height: f32,
    /// Horizontal pen advance.
    pub xadvance: f32,
}

/// Font metrics supplied by the host.
pub trait Font {
    /// Line height in pixels.
    fn height(&self) -> f32;
    /// Width of `text` rendered at `height`.
    fn text_width(&self, height: f32, text: &str) -> f32;
    /// Glyph placement for `codepoint`, with the following code point for kerning.
    fn query_glyph(&self, height: f32, codepoint: char, next: Option<char>) -> Glyph;
    /// Atlas texture holding the glyph bitmaps.
    fn texture(&self) -> TextureId;
}

/// Host clipboard used by text edits with the clipboard flag.
pub trait Clipboard {
    /// Stores `text` on the clipboard.
    fn copy(&mut self, text: &str);
    /// Returns the current clipboard text.
    fn paste(&mut self) -> Option<String>;
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    /// Text alignment inside a rectangle.
    pub struct TextAlign : u32 {
        /// Align to the left edge.
        const LEFT = 0x01;
        /// Center horizontally.
        const CENTERED = 0x02;
        /// Align to the right edge.
        const RIGHT = 0x04;
        /// Align to the top edge.
        const TOP = 0x08;
        /// Center vertically.
        const MIDDLE = 0x10;
        /// Align to the bottom edge.
        const BOTTOM = 0x20;
    }
}

impl TextAlign {
    /// Left aligned, vertically centered.
    pub const TEXT_LEFT: TextAlign = TextAlign::MIDDLE.union(TextAlign::LEFT);
    /// Centered on both axes.
    pub const TEXT_CENTERED: TextAlign = TextAlign::MIDDLE.union(TextAlign::CENTERED);
    /// Right aligned, vertically centered.
    pub const TEXT_RIGHT: TextAlign = TextAlign::MIDDLE.union(TextAlign::RIGHT);

    /// Returns `true` if horizontally centered.
    pub fn is_centered(&self) -> bool { self.intersects(Self::CENTERED) }
    /// Returns `true` if right aligned.
    pub fn is_right(&self) -> bool { self.intersects(Self::RIGHT) }
    /// Returns `true` if vertically centered.
    pub fn is_middle(&self) -> bool { self.intersects(Self::MIDDLE) }
    /// Returns `true` if bottom aligned.
    pub fn is_bottom(&self) -> bool { self.intersects(Self::BOTTOM) }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Interaction state bits reported by the last widget.
    pub struct WidgetStates : u32 {
        /// State changed this frame.
        const MODIFIED = 1 << 1;
        /// Not hovered and not active.
        const INACTIVE = 1 << 2;
        /// The mouse entered the widget this frame.
        const ENTERED = 1 << 3;
        /// The mouse hovers the widget.
        const HOVER = 1 << 4;
        /// The widget is held.
        const ACTIVED = 1 << 5;
        /// The mouse left the widget this frame.
        const LEFT = 1 << 6;
        /// Hovered and modified.
        const HOVERED = Self::HOVER.bits() | Self::MODIFIED.bits();
        /// Active and modified.
        const ACTIVE = Self::ACTIVED.bits() | Self::MODIFIED.bits();
    }
}

impl WidgetStates {
    /// Resets the state to inactive while keeping the modified bit.
    pub(crate) fn reset(&mut self) {
        if self.intersects(Self::MODIFIED) {
            *self = Self::INACTIVE | Self::MODIFIED;
        } else {
            *self = Self::INACTIVE;
        }
    }

    /// Returns `true` if the hover bit is set.
    pub fn is_hovered(&self) -> bool { self.intersects(Self::HOVER) }
    /// Returns `true` if the active bit is set.
    pub fn is_active(&self) -> bool { self.intersects(Self::ACTIVED) }
    /// Returns `true` if the mouse entered the widget this frame.
    pub fn is_entered(&self) -> bool { self.intersects(Self::ENTERED) }
    /// Returns `true` if the mouse left the widget this frame.
    pub fn is_left(&self) -> bool { self.intersects(Self::LEFT) }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Visibility of a freshly allocated widget rectangle.
pub enum WidgetLayoutState {
    /// Outside of the visible region; neither drawn nor updated.
    Invalid,
    /// Visible and interactive.
    Valid,
    /// Visible but the mouse is outside the visible part; draw only.
    Rom,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
/// Built-in vector symbols drawn inside buttons.
pub enum Symbol {
    /// No symbol.
    None,
    /// Diagonal cross.
    X,
    /// Underscore line.
    Underscore,
    /// Filled circle.
    CircleSolid,
    /// Outlined circle.
    CircleOutline,
    /// Filled square.
    RectSolid,
    /// Outlined square.
    RectOutline,
    /// Triangle pointing up.
    TriangleUp,
    /// Triangle pointing down.
    TriangleDown,
    /// Triangle pointing left.
    TriangleLeft,
    /// Triangle pointing right.
    TriangleRight,
    /// Plus sign.
    Plus,
    /// Minus sign.
    Minus,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Direction for triangle symbols and menus.
pub enum Heading {
    /// Pointing up.
    Up,
    /// Pointing right.
    Right,
    /// Pointing down.
    Down,
    /// Pointing left.
    Left,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// When a button reports a click.
pub enum ButtonBehavior {
    /// Fires once, on release inside the button.
    #[default]
    Default,
    /// Fires every frame while held.
    Repeater,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Axis of a scrollbar or slider.
pub enum Orientation {
    /// Top to bottom.
    Vertical,
    /// Left to right.
    Horizontal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Whether a collapsible element starts minimized or maximized.
pub enum CollapseState {
    /// Collapsed.
    Minimized,
    /// Expanded.
    Maximized,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Look of a tree header.
pub enum TreeType {
    /// Plain header for nested tree nodes.
    Node,
    /// Highlighted header for collapsible sections.
    Tab,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Popup sizing behavior.
pub enum PopupType {
    /// Fixed bounds supplied by the caller.
    Static,
    /// Height grows with the content up to the supplied bounds.
    Dynamic,
}

#[cfg(test)]
pub(crate) mod test_font {
    use super::*;

    /// Fixed advance font: every glyph is 8px wide and the line is 10px tall.
    pub struct TestFont;

    impl Font for TestFont {
        fn height(&self) -> f32 { 10.0 }
        fn text_width(&self, _height: f32, text: &str) -> f32 { text.chars().count() as f32 * 8.0 }
        fn query_glyph(&self, _height: f32, _codepoint: char, _next: Option<char>) -> Glyph {
            Glyph {
                uv: [vec2(0.0, 0.0), vec2(1.0, 1.0)],
                offset: vec2(0.0, 0.0),
                width: 8.0,
                height: 10.0,
                xadvance: 8.0,
            }
        }
        fn texture(&self) -> TextureId { TextureId(7) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_containment_is_half_open() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(vec2(0.0, 0.0)));
        assert!(r.contains(vec2(9.9, 9.9)));
        assert!(!r.contains(vec2(10.0, 5.0)));
    }

    #[test]
    fn unify_clamps_disjoint_rects_to_empty() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(20.0, 20.0, 5.0, 5.0);
        let u = a.unify(&b);
        assert_eq!(u.w, 0.0);
        assert_eq!(u.h, 0.0);

        let c = rect(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.unify(&c), rect(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn widget_state_reset_keeps_modified() {
        let mut s = WidgetStates::HOVERED;
        s.reset();
        assert_eq!(s, WidgetStates::INACTIVE | WidgetStates::MODIFIED);
        let mut s = WidgetStates::HOVER;
        s.reset();
        assert_eq!(s, WidgetStates::INACTIVE);
    }
}
