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
//! Panel geometry: header, body, scrollbars, border and scaler of windows, popups and groups.

use bitflags::bitflags;

use crate::draw_context::DrawCtx;
use crate::layout::RowLayout;
use crate::widgets::chart::Chart;
use crate::widgets::{TextStyle, WidgetCtx, do_button_symbol, do_scrollbarh, do_scrollbarv, widget_text};
use crate::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Window and panel flags. Bits below [`PanelFlags::PRIVATE`] are set by the caller.
    pub struct PanelFlags : u32 {
        /// Draws a border around the panel.
        const BORDER = 1 << 0;
        /// The header can be dragged to move the window.
        const MOVABLE = 1 << 1;
        /// A scaler in the bottom corner resizes the window.
        const SCALABLE = 1 << 2;
        /// Adds a close button to the header.
        const CLOSABLE = 1 << 3;
        /// Adds a minimize button to the header.
        const MINIMIZABLE = 1 << 4;
        /// Removes the scrollbars.
        const NO_SCROLLBAR = 1 << 5;
        /// Shows the title in a header.
        const TITLE = 1 << 6;
        /// Hides the scrollbars when there is no input for a while.
        const SCROLL_AUTO_HIDE = 1 << 7;
        /// Keeps the window below every other window.
        const BACKGROUND = 1 << 8;
        /// Puts the scaler in the bottom left corner.
        const SCALE_LEFT = 1 << 9;
        /// The window ignores input.
        const NO_INPUT = 1 << 10;
        /// First private bit.
        const PRIVATE = 1 << 11;
        /// Height shrinks to the content.
        const DYNAMIC = Self::PRIVATE.bits();
        /// Drawn but not interactive.
        const ROM = 1 << 12;
        /// Read only and without input.
        const NOT_INTERACTIVE = Self::ROM.bits() | Self::NO_INPUT.bits();
        /// Not drawn.
        const HIDDEN = 1 << 13;
        /// Closed and collected at the next clear.
        const CLOSED = 1 << 14;
        /// Only the header is shown.
        const MINIMIZED = 1 << 15;
        /// Drops the read only state at the end of the frame.
        const REMOVE_ROM = 1 << 16;
    }
}

impl PanelFlags {
    /// Flags the caller may set.
    pub const PUBLIC: PanelFlags = PanelFlags::from_bits_truncate(PanelFlags::PRIVATE.bits() - 1);

    /// Returns `true` if the panel is hidden.
    pub fn is_hidden(&self) -> bool { self.contains(Self::HIDDEN) }
    /// Returns `true` if the panel is minimized.
    pub fn is_minimized(&self) -> bool { self.contains(Self::MINIMIZED) }
    /// Returns `true` if the panel is closed.
    pub fn is_closed(&self) -> bool { self.contains(Self::CLOSED) }
    /// Returns `true` if the panel is read only.
    pub fn is_rom(&self) -> bool { self.contains(Self::ROM) }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Kind of panel being laid out.
    pub struct PanelType : u32 {
        /// Top level window.
        const WINDOW = 1 << 0;
        /// Group inside a window.
        const GROUP = 1 << 1;
        /// Blocking popup.
        const POPUP = 1 << 2;
        /// Contextual menu.
        const CONTEXTUAL = 1 << 4;
        /// Combo box drop down.
        const COMBO = 1 << 5;
        /// Menu drop down.
        const MENU = 1 << 6;
        /// Tooltip.
        const TOOLTIP = 1 << 7;
    }
}

impl PanelType {
    /// Popups that close when clicking outside of them.
    pub const SET_NONBLOCK: PanelType = PanelType::CONTEXTUAL.union(PanelType::COMBO).union(PanelType::MENU).union(PanelType::TOOLTIP);
    /// Every popup kind.
    pub const SET_POPUP: PanelType = PanelType::SET_NONBLOCK.union(PanelType::POPUP);
    /// Every panel nested in another panel.
    pub const SET_SUB: PanelType = PanelType::SET_POPUP.union(PanelType::GROUP);

    pub(crate) fn is_sub(self) -> bool { self.intersects(Self::SET_SUB) }
    pub(crate) fn is_nonblock(self) -> bool { self.intersects(Self::SET_NONBLOCK) }
}

/// Seconds without input after which auto hiding scrollbars disappear.
pub(crate) const SCROLLBAR_HIDING_TIMEOUT: f32 = 4.0;

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct MenuState {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub offset: Vec2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Where a panel's scroll offset is written back at its end.
pub(crate) enum ScrollSink {
    /// The owning window's scrollbar.
    #[default]
    Window,
    /// Two consecutive value table keys starting at the hash.
    Table(Hash),
    /// Returned to the caller of the group end.
    Caller,
}

/// Layout state of one window, popup or group for the current frame.
#[derive(Clone, Default)]
pub(crate) struct Panel {
    pub kind: PanelType,
    pub flags: PanelFlags,
    /// Outer bounds including header, border and scrollbars.
    pub outer: Rect,
    /// Content area.
    pub bounds: Rect,
    pub offset: Vec2,
    pub sink: ScrollSink,
    pub at_x: f32,
    pub at_y: f32,
    pub max_x: f32,
    pub footer_height: f32,
    pub header_height: f32,
    pub border: f32,
    pub has_scrolling: bool,
    pub clip: Rect,
    pub menu: MenuState,
    pub row: RowLayout,
    pub chart: Chart,
}

impl Panel {
    pub(crate) fn new(kind: PanelType, outer: Rect, flags: PanelFlags, offset: Vec2) -> Self { Self { kind, outer, flags, offset, ..Default::default() } }
}

pub(crate) fn panel_padding(style: &Style, kind: PanelType) -> Vec2 {
    let w = &style.window;
    if kind.contains(PanelType::GROUP) {
        w.group_padding
    } else if kind.contains(PanelType::POPUP) {
        w.popup_padding
    } else if kind.contains(PanelType::CONTEXTUAL) {
        w.contextual_padding
    } else if kind.contains(PanelType::COMBO) {
        w.combo_padding
    } else if kind.contains(PanelType::MENU) {
        w.menu_padding
    } else if kind.contains(PanelType::TOOLTIP) {
        w.tooltip_padding
    } else {
        w.padding
    }
}

pub(crate) fn panel_border(style: &Style, flags: PanelFlags, kind: PanelType) -> f32 {
    if !flags.contains(PanelFlags::BORDER) {
        return 0.0;
    }
    let w = &style.window;
    if kind.contains(PanelType::GROUP) {
        w.group_border
    } else if kind.contains(PanelType::POPUP) {
        w.popup_border
    } else if kind.contains(PanelType::CONTEXTUAL) {
        w.contextual_border
    } else if kind.contains(PanelType::COMBO) {
        w.combo_border
    } else if kind.contains(PanelType::MENU) {
        w.menu_border
    } else if kind.contains(PanelType::TOOLTIP) {
        w.tooltip_border
    } else {
        w.border
    }
}

pub(crate) fn panel_border_color(style: &Style, kind: PanelType) -> Color {
    let w = &style.window;
    if kind.contains(PanelType::GROUP) {
        w.group_border_color
    } else if kind.contains(PanelType::POPUP) {
        w.popup_border_color
    } else if kind.contains(PanelType::CONTEXTUAL) {
        w.contextual_border_color
    } else if kind.contains(PanelType::COMBO) {
        w.combo_border_color
    } else if kind.contains(PanelType::MENU) {
        w.menu_border_color
    } else if kind.contains(PanelType::TOOLTIP) {
        w.tooltip_border_color
    } else {
        w.border_color
    }
}

pub(crate) fn panel_has_header(flags: PanelFlags, title: Option<&str>) -> bool {
    flags.intersects(PanelFlags::CLOSABLE | PanelFlags::MINIMIZABLE | PanelFlags::TITLE) && !flags.contains(PanelFlags::HIDDEN) && title.is_some()
}

pub(crate) fn header_height(style: &Style, font: &dyn Font) -> f32 { font.height() + 2.0 * style.window.header.padding.y + 2.0 * style.window.header.label_padding.y }

impl Context {
    /// Top level window owning `h`, following popup parents.
    pub(crate) fn root_window(&self, mut h: Handle<Window>) -> Handle<Window> {
        while let Some(parent) = self.windows.get(h).and_then(|w| w.parent) {
            h = parent;
        }
        h
    }

    /// Lays out the header and body of the innermost panel of the current window.
    ///
    /// The panel's `outer`, `flags` and `offset` must be set up by the caller. Returns `true` if
    /// the panel is visible and not minimized.
    pub(crate) fn panel_begin(&mut self, title: Option<&str>, kind: PanelType) -> bool {
        let Some(cur) = self.current else { return false };
        let is_active = self.active == Some(cur);
        #[cfg(feature = "command-userdata")]
        let userdata = self.userdata;
        let Context { windows, memory, input, style, fonts, .. } = self;
        let Some(win) = windows.get_mut(cur) else { return false };
        let Window { layout: stack, buffer, drag, .. } = win;
        let Some(layout) = stack.last_mut() else { return false };
        #[cfg(feature = "command-userdata")]
        {
            buffer.userdata = userdata;
        }

        let font = font_of(fonts, style.font);
        let flags = layout.flags;
        let hovering_input: &Input = input;
        let input: Option<&Input> = if flags.contains(PanelFlags::NO_INPUT) { None } else { Some(input) };
        let padding = panel_padding(style, kind);
        let has_header = panel_has_header(flags, title);
        let scrollbar_size = style.window.scrollbar_size;
        let hs = &style.window.header;

        // header drag moves the window
        if flags.contains(PanelFlags::MOVABLE) && !flags.contains(PanelFlags::ROM)
            && let Some(input) = input
        {
            let o = layout.outer;
            let header = Rect::new(o.x, o.y, o.w, if has_header { header_height(style, font) } else { padding.y });
            let left = &input.mouse.buttons[MouseButton::Left as usize];
            if left.down && left.clicked == 0 && header.contains(drag.origin(input)) {
                layout.outer.x += input.mouse.delta.x;
                layout.outer.y += input.mouse.delta.y;
                drag.follow(input, input.mouse.delta);
            }
        }

        let outer = layout.outer;
        layout.kind = kind;
        layout.bounds = outer;
        layout.bounds.x += padding.x;
        layout.bounds.w -= 2.0 * padding.x;
        if flags.contains(PanelFlags::BORDER) {
            layout.border = panel_border(style, flags, kind);
            layout.bounds = layout.bounds.shrink(layout.border);
        } else {
            layout.border = 0.0;
        }
        layout.at_y = layout.bounds.y;
        layout.at_x = layout.bounds.x;
        layout.max_x = 0.0;
        layout.header_height = 0.0;
        layout.footer_height = 0.0;
        layout.row = RowLayout::default();
        layout.row.min_height = crate::layout::min_row_height(style, font);
        layout.row.height = padding.y;
        layout.has_scrolling = true;
        if !flags.contains(PanelFlags::NO_SCROLLBAR) {
            layout.bounds.w -= scrollbar_size.x;
        }
        if !kind.is_nonblock() {
            if !flags.contains(PanelFlags::NO_SCROLLBAR) || flags.contains(PanelFlags::SCALABLE) {
                layout.footer_height = scrollbar_size.y;
            }
            layout.bounds.h -= layout.footer_height;
        }

        let mut w = WidgetCtx::new(DrawCtx::new(memory, buffer), input, font, style.font, drag);

        if has_header && let Some(title) = title {
            let mut header = Rect::new(outer.x, outer.y, outer.w, header_height(style, font));
            layout.header_height = header.h;
            layout.bounds.y += header.h;
            layout.bounds.h -= header.h;
            layout.at_y += header.h;

            let (background, label_color) = if is_active {
                (&hs.active, hs.label_active)
            } else if hovering_input.is_mouse_hovering_rect(header) {
                (&hs.hover, hs.label_hover)
            } else {
                (&hs.normal, hs.label_normal)
            };

            header.h += 1.0;
            background.draw(&mut w.draw, header, 0.0);
            let text_background = background.color();

            let mut button = Rect::new(0.0, header.y + hs.padding.y, 0.0, header.h - 2.0 * hs.padding.y);
            button.w = button.h;
            if flags.contains(PanelFlags::CLOSABLE) {
                let mut ws = WidgetStates::empty();
                if hs.align == HeaderAlign::Right {
                    button.x = (header.w + header.x) - (button.w + hs.padding.x);
                    header.w -= button.w + hs.spacing.x + hs.padding.x;
                } else {
                    button.x = header.x + hs.padding.x;
                    header.x += button.w + hs.spacing.x + hs.padding.x;
                }
                if do_button_symbol(&mut ws, &mut w, button, hs.close_symbol, ButtonBehavior::Default, &hs.close_button) && !flags.contains(PanelFlags::ROM) {
                    layout.flags.insert(PanelFlags::HIDDEN | PanelFlags::CLOSED);
                    layout.flags.remove(PanelFlags::MINIMIZED);
                }
            }

            if flags.contains(PanelFlags::MINIMIZABLE) {
                let mut ws = WidgetStates::empty();
                if hs.align == HeaderAlign::Right {
                    button.x = (header.w + header.x) - button.w;
                    if !flags.contains(PanelFlags::CLOSABLE) {
                        button.x -= hs.padding.x;
                        header.w -= hs.padding.x;
                    }
                    header.w -= button.w + hs.spacing.x;
                } else {
                    button.x = header.x;
                    header.x += button.w + hs.spacing.x + hs.padding.x;
                }
                let symbol = if layout.flags.contains(PanelFlags::MINIMIZED) { hs.maximize_symbol } else { hs.minimize_symbol };
                if do_button_symbol(&mut ws, &mut w, button, symbol, ButtonBehavior::Default, &hs.minimize_button) && !flags.contains(PanelFlags::ROM) {
                    layout.flags.toggle(PanelFlags::MINIMIZED);
                }
            }

            let text_width = font.text_width(font.height(), title);
            let mut label = Rect::new(
                header.x + hs.padding.x + hs.label_padding.x,
                header.y + hs.label_padding.y,
                text_width + 2.0 * hs.spacing.x,
                font.height() + 2.0 * hs.label_padding.y,
            );
            label.w = label.w.min(header.x + header.w - label.x).max(0.0);
            let text = TextStyle { padding: Vec2::default(), background: text_background, color: label_color };
            widget_text(&mut w.draw, w.font, label, title, &text, TextAlign::TEXT_LEFT);
        }

        if !layout.flags.intersects(PanelFlags::MINIMIZED | PanelFlags::DYNAMIC) {
            let body = Rect::new(outer.x, outer.y + layout.header_height, outer.w, outer.h - layout.header_height);
            style.window.fixed_background.draw(&mut w.draw, body, style.window.rounding);
        }

        let clip = w.draw.clip().unify(&layout.bounds);
        w.draw.push_scissor(clip);
        layout.clip = clip;
        !layout.flags.intersects(PanelFlags::HIDDEN | PanelFlags::MINIMIZED)
    }

    /// Finishes the innermost panel of the current window: dynamic fit, scrollbars, border,
    /// scaler and, for top level windows, the command buffer and per window collectors.
    pub(crate) fn panel_end(&mut self) {
        let Some(cur) = self.current else { return };
        let root = self.root_window(cur);
        let parent = self.windows.get(cur).and_then(|w| w.parent);
        let root_clip = parent
            .and_then(|p| self.windows.get(p))
            .or_else(|| self.windows.get(cur))
            .and_then(|w| w.layout.first())
            .map(|p| p.clip)
            .unwrap_or(NULL_RECT);
        let root_is_active = self.active == Some(root);
        let is_active = self.active == Some(cur);
        let window_hovered = self.window_is_hovered();
        let any_item_active = self.last_widget_state.contains(WidgetStates::MODIFIED);
        let delta_time = self.delta_time_seconds;

        let mut consumed_wheel = false;
        let mut disable_parent_scrolling = false;
        {
            let Context { windows, memory, input, style, fonts, .. } = self;
            let Some(win) = windows.get_mut(cur) else { return };
            let Window {
                layout: stack,
                buffer,
                drag,
                flags: win_flags,
                scrollbar_hiding_timer,
                scrolled,
                popup,
                ..
            } = win;
            let Some(top) = stack.last() else { return };
            let kind = top.kind;
            let is_group = kind.contains(PanelType::GROUP);
            let in_: Option<&Input> = if top.flags.intersects(PanelFlags::ROM | PanelFlags::NO_INPUT) { None } else { Some(input) };

            // wheel routing
            let scroll_has_scrolling = if kind.is_sub() {
                let grab = root_is_active
                    && top.has_scrolling
                    && in_.is_some_and(|i| i.is_mouse_hovering_rect(top.bounds))
                    && top.bounds.intersects(&root_clip);
                if grab {
                    for p in stack.iter_mut() {
                        p.has_scrolling = false;
                    }
                    disable_parent_scrolling = true;
                }
                grab
            } else {
                let has = is_active && top.has_scrolling;
                *scrolled = in_.is_some_and(|i| i.mouse.scroll_delta.y > 0.0 || i.mouse.scroll_delta.x > 0.0) && has;
                has
            };

            let Some(layout) = stack.last_mut() else { return };
            let font = font_of(fonts, style.font);
            let padding = panel_padding(style, kind);
            let scrollbar_size = style.window.scrollbar_size;
            let outer_flags = if is_group { layout.flags } else { *win_flags };
            let hiding_timer = if is_group { 0.0 } else { *scrollbar_hiding_timer };

            let mut w = WidgetCtx::new(DrawCtx::new(memory, buffer), in_, font, style.font, drag);
            if !kind.is_sub() {
                w.draw.push_scissor(NULL_RECT);
            }

            layout.at_y += layout.row.height;

            if layout.flags.contains(PanelFlags::DYNAMIC) && !layout.flags.contains(PanelFlags::MINIMIZED) {
                if layout.at_y < layout.bounds.y + layout.bounds.h {
                    layout.bounds.h = layout.at_y - layout.bounds.y;
                }
                let bg = style.window.background;
                let o = layout.outer;
                w.draw.fill_rect(Rect::new(o.x, layout.bounds.y, o.w, padding.y), 0.0, bg);
                w.draw.fill_rect(Rect::new(o.x, layout.bounds.y, padding.x + layout.border, layout.bounds.h), 0.0, bg);
                let mut right = Rect::new(layout.bounds.x + layout.bounds.w, layout.bounds.y, padding.x + layout.border, layout.bounds.h);
                if layout.offset.y == 0.0 && !layout.flags.contains(PanelFlags::NO_SCROLLBAR) {
                    right.w += scrollbar_size.x;
                }
                w.draw.fill_rect(right, 0.0, bg);
                if layout.footer_height > 0.0 {
                    w.draw.fill_rect(Rect::new(o.x, layout.bounds.y + layout.bounds.h, o.w, layout.footer_height), 0.0, bg);
                }
            }

            if !layout.flags.intersects(PanelFlags::NO_SCROLLBAR | PanelFlags::MINIMIZED) && hiding_timer < SCROLLBAR_HIDING_TIMEOUT {
                let mut ws = WidgetStates::empty();
                let scroll = Rect::new(layout.bounds.x + layout.bounds.w + padding.x, layout.bounds.y, scrollbar_size.x, layout.bounds.h);
                let target = (layout.at_y - scroll.y).trunc();
                let offset = do_scrollbarv(&mut ws, &mut w, scroll, scroll_has_scrolling, layout.offset.y, target, scroll.h * 0.10, scroll.h * 0.01, &style.scrollv);
                layout.offset.y = offset.max(0.0).trunc();
                if in_.is_some() && scroll_has_scrolling {
                    consumed_wheel = true;
                }

                let mut ws = WidgetStates::empty();
                let scroll = Rect::new(layout.bounds.x, layout.bounds.y + layout.bounds.h, layout.bounds.w, scrollbar_size.y);
                let target = (layout.max_x - scroll.x).trunc();
                let offset = do_scrollbarh(&mut ws, &mut w, scroll, scroll_has_scrolling, layout.offset.x, target, layout.max_x * 0.05, layout.max_x * 0.005, &style.scrollh);
                layout.offset.x = offset.max(0.0).trunc();
            }

            if !is_group {
                if outer_flags.contains(PanelFlags::SCROLL_AUTO_HIDE) {
                    let has_input = input.mouse.delta.x != 0.0 || input.mouse.delta.y != 0.0 || input.mouse.scroll_delta.y != 0.0;
                    if (!has_input && window_hovered) || (!window_hovered && !any_item_active) {
                        *scrollbar_hiding_timer += delta_time;
                    } else {
                        *scrollbar_hiding_timer = 0.0;
                    }
                } else {
                    *scrollbar_hiding_timer = 0.0;
                }
            }

            if layout.flags.contains(PanelFlags::BORDER) {
                let o = layout.outer;
                let bottom = if layout.flags.contains(PanelFlags::MINIMIZED) {
                    style.window.border + o.y + layout.header_height
                } else if layout.flags.contains(PanelFlags::DYNAMIC) {
                    layout.bounds.y + layout.bounds.h + layout.footer_height
                } else {
                    o.y + o.h
                };
                let b = Rect::new(o.x, o.y, o.w, bottom - o.y);
                w.draw.stroke_rect(b, style.window.rounding, layout.border, panel_border_color(style, kind));
            }

            if layout.flags.contains(PanelFlags::SCALABLE)
                && !layout.flags.contains(PanelFlags::MINIMIZED)
                && let Some(input) = in_
            {
                let mut scaler = Rect::new(0.0, layout.bounds.y + layout.bounds.h, scrollbar_size.x, scrollbar_size.y);
                scaler.x = if layout.flags.contains(PanelFlags::SCALE_LEFT) {
                    layout.bounds.x - padding.x * 0.5
                } else {
                    layout.bounds.x + layout.bounds.w + padding.x
                };
                if layout.flags.contains(PanelFlags::NO_SCROLLBAR) && !layout.flags.contains(PanelFlags::SCALE_LEFT) {
                    scaler.x -= scaler.w;
                }

                match &style.window.scaler {
                    StyleItem::Image(img) => w.draw.draw_image(scaler, img, Color::rgba(255, 255, 255, 255)),
                    StyleItem::Color(c) => {
                        if layout.flags.contains(PanelFlags::SCALE_LEFT) {
                            w.draw.fill_triangle(
                                vec2(scaler.x, scaler.y),
                                vec2(scaler.x, scaler.y + scaler.h),
                                vec2(scaler.x + scaler.w, scaler.y + scaler.h),
                                *c,
                            );
                        } else {
                            w.draw.fill_triangle(
                                vec2(scaler.x + scaler.w, scaler.y),
                                vec2(scaler.x + scaler.w, scaler.y + scaler.h),
                                vec2(scaler.x, scaler.y + scaler.h),
                                *c,
                            );
                        }
                    }
                    StyleItem::Hide => {}
                }

                if !outer_flags.contains(PanelFlags::ROM) {
                    let min_size = style.window.min_size;
                    let left = &input.mouse.buttons[MouseButton::Left as usize];
                    if left.down && scaler.contains(w.drag.origin(input)) {
                        let delta = input.mouse.delta;
                        let left_edge = layout.flags.contains(PanelFlags::SCALE_LEFT);
                        let delta_x = if left_edge { -delta.x } else { delta.x };
                        // grow only while the pointer is past the scaler
                        let past = if left_edge { input.mouse.pos.x <= scaler.x + scaler.w } else { input.mouse.pos.x >= scaler.x };
                        if layout.outer.w + delta_x >= min_size.x && (delta_x < 0.0 || (delta_x > 0.0 && past)) {
                            layout.outer.w += delta_x;
                            if left_edge {
                                layout.outer.x += delta.x;
                            }
                            scaler.x += delta.x;
                        }
                        if !layout.flags.contains(PanelFlags::DYNAMIC)
                            && min_size.y < layout.outer.h + delta.y
                            && (delta.y < 0.0 || (delta.y > 0.0 && input.mouse.pos.y >= scaler.y))
                        {
                            layout.outer.h += delta.y;
                            scaler.y += delta.y;
                        }
                        w.drag.set(scaler.center());
                    }
                }
            }

            if !kind.is_sub() {
                if layout.flags.contains(PanelFlags::HIDDEN) {
                    buffer.reset();
                } else {
                    // popup commands sit between the parent's commands before and after it
                    buffer.end = memory.allocated() as u32;
                    if popup.buf.active {
                        if let Some(parent_last) = popup.buf.parent {
                            set_next(memory, parent_last, popup.buf.begin);
                        }
                        if let Some(popup_last) = popup.buf.last {
                            set_next(memory, popup_last, popup.buf.end);
                        }
                    }
                }
            }

            if layout.flags.contains(PanelFlags::REMOVE_ROM) {
                layout.flags.remove(PanelFlags::ROM | PanelFlags::REMOVE_ROM);
            }

            if !is_group {
                *win_flags = layout.flags;
                win.bounds = layout.outer;
                win.scrollbar = layout.offset;
                win.collect_garbage();
            }
        }

        if consumed_wheel {
            self.input.mouse.scroll_delta.y = 0.0;
        }
        if disable_parent_scrolling && let Some(p) = parent.and_then(|p| self.windows.get_mut(p)) {
            for panel in p.layout.iter_mut() {
                panel.has_scrolling = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use std::rc::Rc;

    fn context() -> Context {
        let mut ctx = Context::new(Rc::new(TestFont));
        ctx.input_begin();
        ctx.input_motion(2000.0, 2000.0);
        ctx.input_end();
        ctx
    }

    fn window(ctx: &mut Context, bounds: Rect, flags: PanelFlags) -> bool {
        let mut open = false;
        ctx.frame(|ctx| {
            open = ctx.begin("w", bounds, flags);
            ctx.end();
        });
        open
    }

    fn press(ctx: &mut Context, x: f32, y: f32, down: bool) {
        ctx.input_begin();
        ctx.input_motion(x, y);
        ctx.input_button(MouseButton::Left, x, y, down);
        ctx.input_end();
    }

    fn motion(ctx: &mut Context, x: f32, y: f32) {
        ctx.input_begin();
        ctx.input_motion(x, y);
        ctx.input_end();
    }

    fn bounds(ctx: &Context) -> Option<Rect> { ctx.window_find("w").map(|w| w.bounds) }

    #[test]
    fn close_button_hides_and_closes() {
        let mut ctx = context();
        let r = rect(0.0, 0.0, 200.0, 200.0);
        let flags = PanelFlags::CLOSABLE | PanelFlags::TITLE;
        assert!(window(&mut ctx, r, flags));
        // header is 27 high, the close button sits at (177, 4, 19, 19)
        press(&mut ctx, 186.0, 12.0, true);
        assert!(window(&mut ctx, r, flags));
        press(&mut ctx, 186.0, 12.0, false);
        window(&mut ctx, r, flags);
        assert!(ctx.window_find("w").is_some_and(|w| w.flags().contains(PanelFlags::HIDDEN | PanelFlags::CLOSED)));
        ctx.clear();
        assert!(ctx.window_is_closed("w"));
    }

    #[test]
    fn minimize_button_collapses_to_the_header() {
        let mut ctx = context();
        let r = rect(0.0, 0.0, 200.0, 200.0);
        let flags = PanelFlags::MINIMIZABLE | PanelFlags::TITLE;
        press(&mut ctx, 186.0, 12.0, true);
        assert!(window(&mut ctx, r, flags));
        press(&mut ctx, 186.0, 12.0, false);
        window(&mut ctx, r, flags);
        assert!(ctx.window_is_collapsed("w"));
        motion(&mut ctx, 2000.0, 2000.0);
        assert!(!window(&mut ctx, r, flags));

        // only the header still covers the pointer
        motion(&mut ctx, 100.0, 100.0);
        assert!(!ctx.window_is_any_hovered());
        motion(&mut ctx, 100.0, 10.0);
        assert!(ctx.window_is_any_hovered());

        press(&mut ctx, 186.0, 12.0, true);
        window(&mut ctx, r, flags);
        press(&mut ctx, 186.0, 12.0, false);
        window(&mut ctx, r, flags);
        assert!(!ctx.window_is_collapsed("w"));
    }

    #[test]
    fn scaler_stops_at_the_minimum_size() {
        let mut ctx = context();
        let flags = PanelFlags::SCALABLE;
        let r = rect(0.0, 0.0, 200.0, 200.0);
        // scaler is (190, 190, 10, 10)
        press(&mut ctx, 195.0, 195.0, true);
        window(&mut ctx, r, flags);
        assert_eq!(bounds(&ctx), Some(r));

        motion(&mut ctx, 95.0, 95.0);
        window(&mut ctx, r, flags);
        assert_eq!(bounds(&ctx), Some(rect(0.0, 0.0, 100.0, 100.0)));

        // 50 would be below the 64 minimum
        motion(&mut ctx, 45.0, 45.0);
        window(&mut ctx, r, flags);
        assert_eq!(bounds(&ctx), Some(rect(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(ctx.style().window.min_size, vec2(64.0, 64.0));
    }

    #[test]
    fn left_scaler_moves_the_window_edge() {
        let mut ctx = context();
        let flags = PanelFlags::SCALABLE | PanelFlags::SCALE_LEFT | PanelFlags::NO_SCROLLBAR;
        let r = rect(100.0, 0.0, 200.0, 200.0);
        // scaler is (102, 190, 10, 10)
        press(&mut ctx, 107.0, 195.0, true);
        window(&mut ctx, r, flags);

        motion(&mut ctx, 57.0, 195.0);
        window(&mut ctx, r, flags);
        assert_eq!(bounds(&ctx), Some(rect(50.0, 0.0, 250.0, 200.0)));

        // shrinking below the minimum leaves the edge in place
        motion(&mut ctx, 257.0, 195.0);
        window(&mut ctx, r, flags);
        assert_eq!(bounds(&ctx), Some(rect(50.0, 0.0, 250.0, 200.0)));
    }
}
