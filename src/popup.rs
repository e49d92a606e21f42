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
//! Popups: blocking popups, the non blocking popups behind menus and combos, contextual menus
//! and tooltips.
//!
//! A popup lives in its own pool slot linked to the window that opened it. While it is open it
//! writes into a copy of its parent's command buffer; on close the parent takes the buffer back
//! and remembers where the popup's commands start and end so the parent's later commands are
//! linked after them.

use log::debug;

use crate::draw_context::DrawCtx;
use crate::panel::{Panel, panel_padding};
use crate::util::{POPUP_SEED, hash_str};
use crate::widgets::{WidgetCtx, do_button_text, do_button_text_image, do_button_text_symbol};
use crate::window::PopupBuffer;
use crate::*;

const TOOLTIP_NAME: &str = "__##Tooltip##__";

impl Context {
    /// Applies `f` to the flags of every open panel of `h`.
    fn update_panel_flags(&mut self, h: Handle<Window>, f: impl Fn(&mut PanelFlags)) {
        if let Some(w) = self.windows.get_mut(h) {
            for p in w.layout.iter_mut() {
                f(&mut p.flags);
            }
        }
    }

    /// Current window if it may open a popup.
    fn popup_parent(&self) -> Option<Handle<Window>> {
        let cur = self.current?;
        let win = self.windows.get(cur)?;
        if win.layout.is_empty() {
            return None;
        }
        if win.parent.is_some() {
            debug_assert!(false, "popups cannot open popups");
            return None;
        }
        Some(cur)
    }

    /// Popup slot of `parent`, allocated on first use.
    fn popup_window(&mut self, parent: Handle<Window>, kind: PanelType) -> Option<(Handle<Window>, bool)> {
        let existing = self.windows.get(parent)?.popup.win.filter(|p| self.windows.contains(*p));
        if let Some(p) = existing {
            return Some((p, false));
        }
        let p = match self.windows.alloc(Window::blank_popup(parent)) {
            Ok(p) => p,
            Err(err) => {
                log::warn!("popup not created: {err}");
                return None;
            }
        };
        let win = self.windows.get_mut(parent)?;
        win.popup.win = Some(p);
        win.popup.kind = kind;
        Some((p, true))
    }

    /// Records where the popup's commands start in the parent's buffer.
    fn start_popup(win: &mut Window) {
        win.popup.buf = PopupBuffer {
            begin: win.buffer.end,
            parent: win.buffer.last,
            last: None,
            end: win.buffer.end,
            active: true,
        };
    }

    /// Opens the popup `title` at `rect`, relative to the current panel's visible area. Returns
    /// `true` if the popup is shown; only then must [`Context::popup_end`] be called.
    pub fn popup_begin(&mut self, kind: PopupType, title: &str, flags: PanelFlags, rect: Rect) -> bool {
        let Some(cur) = self.popup_parent() else { return false };
        let hash = hash_str(title, POPUP_SEED);
        let Some((ph, created)) = self.popup_window(cur, PanelType::POPUP) else { return false };
        let seq = self.seq;

        let Context { windows, tables, memory, .. } = self;
        let Some(win) = windows.get_mut(cur) else { return false };
        if created {
            win.popup.active = false;
            win.popup.kind = PanelType::POPUP;
        }
        let mut reset = false;
        if win.popup.name != hash {
            if win.popup.active {
                return false;
            }
            win.popup.name = hash;
            win.popup.active = true;
            win.popup.kind = PanelType::POPUP;
            reset = true;
        }
        let clip = win.layout.last().map(|p| p.clip).unwrap_or_default();
        Self::start_popup(win);
        let parent_buffer = win.buffer;

        let Some(popup) = windows.get_mut(ph) else { return false };
        if reset {
            popup.tables.free_all(tables);
            *popup = Window::blank_popup(cur);
            debug!("popup {title:?} opened");
        }
        let bounds = Rect::new(rect.x + clip.x, rect.y + clip.y, rect.w, rect.h);
        let mut flags = flags | PanelFlags::BORDER;
        if kind == PopupType::Dynamic {
            flags |= PanelFlags::DYNAMIC;
        }
        popup.parent = Some(cur);
        popup.bounds = bounds;
        popup.seq = seq;
        popup.flags = flags;
        popup.buffer = parent_buffer;
        popup.layout.clear();
        popup.layout.push(Panel::new(PanelType::POPUP, bounds, flags, popup.scrollbar));
        memory.mark(BufferSide::Front);
        DrawCtx::new(memory, &mut popup.buffer).push_scissor(NULL_RECT);

        self.current = Some(ph);
        if self.panel_begin(Some(title), PanelType::POPUP) {
            self.memory.unmark(BufferSide::Front);
            self.update_panel_flags(cur, |f| {
                f.insert(PanelFlags::ROM);
                f.remove(PanelFlags::REMOVE_ROM);
            });
            if let Some(win) = self.windows.get_mut(cur) {
                win.popup.active = true;
            }
            true
        } else {
            self.update_panel_flags(cur, |f| f.insert(PanelFlags::REMOVE_ROM));
            if let Some(win) = self.windows.get_mut(cur) {
                win.popup.buf.active = false;
                win.popup.active = false;
            }
            self.memory.reset(BufferSide::Front);
            if let Some(popup) = self.windows.get_mut(ph) {
                popup.layout.clear();
            }
            self.current = Some(cur);
            false
        }
    }

    /// Opens a popup that closes itself when the user clicks outside of `body` or inside of
    /// `header`. Used by menus, combos and contextual menus.
    pub(crate) fn nonblock_begin(&mut self, flags: PanelFlags, body: Rect, header: Rect, kind: PanelType) -> bool {
        let Some(cur) = self.popup_parent() else { return false };
        let Some((ph, created)) = self.popup_window(cur, kind) else { return false };

        let mut is_active = true;
        if !created {
            let pressed = self.input.is_mouse_pressed(MouseButton::Left);
            let in_body = self.input.is_mouse_hovering_rect(body);
            let in_header = self.input.is_mouse_hovering_rect(header);
            if pressed && (!in_body || in_header) {
                is_active = false;
            }
        }
        if let Some(win) = self.windows.get_mut(cur) {
            win.popup.header = header;
        }
        if !is_active {
            self.update_panel_flags(cur, |f| f.insert(PanelFlags::REMOVE_ROM));
            return false;
        }

        let seq = self.seq;
        let Context { windows, memory, .. } = self;
        let Some(win) = windows.get_mut(cur) else { return false };
        win.popup.active = true;
        Self::start_popup(win);
        let parent_buffer = win.buffer;

        let Some(popup) = windows.get_mut(ph) else { return false };
        let flags = flags | PanelFlags::BORDER | PanelFlags::DYNAMIC;
        popup.bounds = body;
        popup.parent = Some(cur);
        popup.flags = flags;
        popup.seq = seq;
        popup.buffer = parent_buffer;
        popup.layout.clear();
        popup.layout.push(Panel::new(kind, body, flags, popup.scrollbar));
        DrawCtx::new(memory, &mut popup.buffer).push_scissor(NULL_RECT);

        self.current = Some(ph);
        self.panel_begin(None, kind);

        let buffer = self.windows.get(ph).map(|p| p.buffer);
        if let (Some(buffer), Some(win)) = (buffer, self.windows.get_mut(cur)) {
            win.buffer = buffer;
        }
        self.update_panel_flags(cur, |f| f.insert(PanelFlags::ROM));
        true
    }

    /// Marks the current popup as closed. It still has to be ended.
    pub fn popup_close(&mut self) {
        if let Some(w) = self.current.and_then(|h| self.windows.get_mut(h)) {
            w.flags.insert(PanelFlags::HIDDEN);
        }
    }

    /// Ends the current popup and returns to its parent window.
    pub fn popup_end(&mut self) {
        let Some(ph) = self.current else { return };
        let Some(popup) = self.windows.get(ph) else { return };
        let Some(parent) = popup.parent else {
            debug_assert!(false, "popup end outside of a popup");
            return;
        };
        if popup.layout.is_empty() {
            return;
        }
        if popup.flags.contains(PanelFlags::HIDDEN) {
            self.update_panel_flags(parent, |f| f.insert(PanelFlags::REMOVE_ROM));
            if let Some(win) = self.windows.get_mut(parent) {
                win.popup.active = false;
            }
        }

        let Context { windows, memory, .. } = self;
        if let Some(popup) = windows.get_mut(ph) {
            DrawCtx::new(memory, &mut popup.buffer).push_scissor(NULL_RECT);
        }
        self.panel_end();

        let Context { windows, memory, .. } = self;
        let Some(popup) = windows.get_mut(ph) else { return };
        popup.layout.clear();
        let buffer = popup.buffer;
        let Some(win) = windows.get_mut(parent) else { return };
        win.buffer = buffer;
        win.popup.buf.last = win.buffer.last;
        win.popup.buf.end = win.buffer.end;
        let clip = win.layout.last().map(|p| p.clip).unwrap_or(NULL_RECT);
        DrawCtx::new(memory, &mut win.buffer).push_scissor(clip);
        self.current = Some(parent);
    }

    /// Scroll offset of the current popup.
    pub fn popup_get_scroll(&self) -> Vec2 { self.window_get_scroll() }

    /// Scrolls the current popup.
    pub fn popup_set_scroll(&mut self, offset: Vec2) { self.window_set_scroll(offset); }
}

impl Context {
    /// Opens a contextual menu of `size` when `trigger` is right clicked. Returns `true` while
    /// the menu is open; only then must [`Context::contextual_end`] be called.
    pub fn contextual_begin(&mut self, flags: PanelFlags, size: Vec2, trigger: Rect) -> bool {
        let Some(cur) = self.current else { return false };
        let Some(win) = self.windows.get_mut(cur) else { return false };
        if win.layout.is_empty() {
            return false;
        }
        win.popup.con_count += 1;
        if self.active != Some(cur) {
            return false;
        }
        let popup = win.popup.win;
        let popup = popup.filter(|p| self.windows.contains(*p));
        let Some(win) = self.windows.get_mut(cur) else { return false };
        let is_open = popup.is_some() && win.popup.kind == PanelType::CONTEXTUAL;
        let is_clicked = self.input.mouse_clicked(MouseButton::Right, trigger);
        if win.popup.active_con != 0 && win.popup.con_count != win.popup.active_con {
            return false;
        }
        if !is_open && win.popup.active_con != 0 {
            win.popup.active_con = 0;
        }
        if !is_open && !is_clicked {
            return false;
        }
        win.popup.active_con = win.popup.con_count;

        let origin = if is_clicked {
            self.input.mouse.pos
        } else {
            popup.and_then(|p| self.windows.get(p)).map(|p| p.bounds.pos()).unwrap_or_default()
        };
        let body = Rect::new(origin.x, origin.y, size.x, size.y);
        let header = Rect::new(-1.0, -1.0, 0.0, 0.0);
        let open = self.nonblock_begin(flags | PanelFlags::NO_SCROLLBAR, body, header, PanelType::CONTEXTUAL);
        if let Some(win) = self.windows.get_mut(cur) {
            if open {
                win.popup.kind = PanelType::CONTEXTUAL;
            } else {
                win.popup.active_con = 0;
                win.popup.kind = PanelType::empty();
                let p = win.popup.win;
                if let Some(p) = p.and_then(|p| self.windows.get_mut(p)) {
                    p.flags = PanelFlags::empty();
                }
            }
        }
        open
    }

    fn contextual_item(&mut self, f: impl FnOnce(&mut WidgetStates, &mut WidgetCtx<'_>, Rect, &StyleButton) -> bool) -> bool {
        let (bounds, state) = self.widget_fitting(self.style.contextual_button.padding);
        if state == WidgetLayoutState::Invalid {
            return false;
        }
        let fired = self.with_widget(state == WidgetLayoutState::Valid, |ws, w, s| f(ws, w, bounds, &s.contextual_button)).unwrap_or(false);
        if fired {
            self.contextual_close();
        }
        fired
    }

    /// Menu entry that closes the contextual menu when clicked.
    pub fn contextual_item_label(&mut self, text: &str, align: TextAlign) -> bool {
        self.contextual_item(|ws, w, r, s| do_button_text(ws, w, r, text, align, ButtonBehavior::Default, s))
    }

    /// Menu entry with an image.
    pub fn contextual_item_image_label(&mut self, img: Image, text: &str, align: TextAlign) -> bool {
        self.contextual_item(|ws, w, r, s| do_button_text_image(ws, w, r, &img, text, align, ButtonBehavior::Default, s))
    }

    /// Menu entry with a symbol.
    pub fn contextual_item_symbol_label(&mut self, symbol: Symbol, text: &str, align: TextAlign) -> bool {
        self.contextual_item(|ws, w, r, s| do_button_text_symbol(ws, w, r, symbol, text, align, ButtonBehavior::Default, s))
    }

    /// Closes the open contextual menu.
    pub fn contextual_close(&mut self) { self.popup_close(); }

    /// Ends a contextual menu. A click below the last row of a dynamic menu closes it in the
    /// next frame.
    pub fn contextual_end(&mut self) {
        let Some(ph) = self.current else { return };
        let pressed = self.input.is_mouse_pressed(MouseButton::Left);
        let Context { windows, input, style, .. } = self;
        let Some(popup) = windows.get_mut(ph) else { return };
        if let Some(panel) = popup.layout.last()
            && panel.flags.contains(PanelFlags::DYNAMIC)
        {
            let mut body = Rect::default();
            if panel.at_y < panel.bounds.y + panel.bounds.h {
                let padding = panel_padding(style, panel.kind);
                body = panel.bounds;
                body.y = panel.at_y + panel.footer_height + panel.border + padding.y + panel.row.height;
                body.h = (panel.bounds.y + panel.bounds.h) - body.y;
            }
            if pressed && input.is_mouse_hovering_rect(body) {
                popup.flags.insert(PanelFlags::HIDDEN);
            }
        }
        if popup.flags.contains(PanelFlags::HIDDEN) {
            popup.seq = 0;
        }
        self.popup_end();
    }
}

impl Context {
    /// Opens a tooltip of `width` next to the pointer. Returns `true` if shown; only then must
    /// [`Context::tooltip_end`] be called.
    pub fn tooltip_begin(&mut self, width: f32) -> bool {
        let Some(cur) = self.current else { return false };
        let Some(win) = self.windows.get(cur) else { return false };
        if win.popup.win.is_some() && win.popup.kind.is_nonblock() {
            return false;
        }
        let Some(clip) = win.layout.last().map(|p| p.clip) else { return false };
        let pos = self.input.mouse.pos;
        let bounds = Rect::new((pos.x + 1.0).floor() - clip.x.trunc(), (pos.y + 1.0).floor() - clip.y.trunc(), width.ceil(), NULL_RECT.h.ceil());
        let open = self.popup_begin(PopupType::Dynamic, TOOLTIP_NAME, PanelFlags::NO_SCROLLBAR | PanelFlags::BORDER, bounds);
        if let Some(win) = self.windows.get_mut(cur) {
            if open && let Some(p) = win.layout.last_mut() {
                p.flags.remove(PanelFlags::ROM);
            }
            win.popup.kind = PanelType::TOOLTIP;
        }
        if open && let Some(p) = self.panel_mut() {
            p.kind = PanelType::TOOLTIP;
        }
        open
    }

    /// Ends a tooltip. Tooltips live a single frame.
    pub fn tooltip_end(&mut self) {
        let Some(w) = self.current.and_then(|h| self.windows.get_mut(h)) else { return };
        w.seq = w.seq.wrapping_sub(1);
        self.popup_close();
        self.popup_end();
    }

    /// Tooltip showing `text` on a single line.
    pub fn tooltip(&mut self, text: &str) {
        if self.current.is_none() {
            return;
        }
        let window = &self.style.window;
        // popup padding counts twice: once for the panel, once for the row
        let chrome = 4.0 * window.popup_padding.x + 2.0 * window.popup_border + 2.0 * self.style.text.padding.x;
        let padding = window.padding;
        let font = self.font();
        let width = font.text_width(font.height(), text) + chrome;
        let height = font.height() + 2.0 * padding.y;
        if self.tooltip_begin(width) {
            self.layout_row_dynamic(height, 1);
            self.label(text, TextAlign::TEXT_LEFT);
            self.tooltip_end();
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

    fn texts(ctx: &mut Context) -> Vec<String> {
        ctx.commands()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn popup_commands_sit_between_the_parent_commands() {
        let mut ctx = context();
        ctx.frame(|ctx| {
            assert!(ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR));
            ctx.layout_row_dynamic(20.0, 1);
            ctx.label("A", TextAlign::TEXT_LEFT);
            assert!(ctx.popup_begin(PopupType::Static, "p", PanelFlags::empty(), rect(10.0, 10.0, 100.0, 100.0)));
            ctx.layout_row_dynamic(20.0, 1);
            ctx.label("B", TextAlign::TEXT_LEFT);
            ctx.popup_end();
            ctx.label("C", TextAlign::TEXT_LEFT);
            ctx.end();
            ctx.begin("other", rect(400.0, 0.0, 100.0, 100.0), PanelFlags::NO_SCROLLBAR);
            ctx.layout_row_dynamic(20.0, 1);
            ctx.label("D", TextAlign::TEXT_LEFT);
            ctx.end();
        });
        assert_eq!(texts(&mut ctx), ["A", "B", "C", "D"]);
    }

    #[test]
    fn open_popup_makes_the_parent_read_only() {
        let mut ctx = context();
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            assert!(ctx.popup_begin(PopupType::Static, "p", PanelFlags::empty(), rect(10.0, 10.0, 100.0, 100.0)));
            assert_eq!(ctx.panel().map(|p| p.kind), Some(PanelType::POPUP));
            // an opened popup keeps its commands, nothing rewinds to the old mark
            assert!(!ctx.memory.is_marked(BufferSide::Front));
            // a second popup cannot open while the first is shown
            ctx.popup_end();
            assert!(ctx.panel().is_some_and(|p| p.flags.contains(PanelFlags::ROM)));
            assert!(!ctx.popup_begin(PopupType::Static, "q", PanelFlags::empty(), rect(10.0, 10.0, 100.0, 100.0)));
            ctx.end();
        });
    }

    #[test]
    fn closed_popup_releases_the_parent() {
        let mut ctx = context();
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            assert!(ctx.popup_begin(PopupType::Static, "p", PanelFlags::empty(), rect(10.0, 10.0, 100.0, 100.0)));
            ctx.popup_close();
            ctx.popup_end();
            let win = ctx.current.and_then(|h| ctx.windows.get(h));
            assert!(win.is_some_and(|w| !w.popup.active));
            assert!(ctx.panel().is_some_and(|p| p.flags.contains(PanelFlags::REMOVE_ROM)));
            // another popup may open now
            assert!(ctx.popup_begin(PopupType::Static, "q", PanelFlags::empty(), rect(10.0, 10.0, 100.0, 100.0)));
            ctx.popup_end();
            ctx.end();
        });
    }

    fn contextual_frame(ctx: &mut Context, pick: bool) -> (bool, bool) {
        let mut open = false;
        let mut picked = false;
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            if ctx.contextual_begin(PanelFlags::empty(), vec2(100.0, 200.0), rect(0.0, 0.0, 300.0, 300.0)) {
                open = true;
                ctx.layout_row_dynamic(20.0, 1);
                picked = ctx.contextual_item_label("copy", TextAlign::TEXT_LEFT) && pick;
                ctx.contextual_end();
            }
            ctx.end();
        });
        (open, picked)
    }

    #[test]
    fn contextual_menu_opens_on_right_click_and_closes_on_pick() {
        let mut ctx = context();
        assert_eq!(contextual_frame(&mut ctx, false), (false, false));

        ctx.input_begin();
        ctx.input_motion(50.0, 50.0);
        ctx.input_button(MouseButton::Right, 50.0, 50.0, true);
        ctx.input_end();
        assert_eq!(contextual_frame(&mut ctx, false), (true, false));

        // stays open at the click position
        ctx.input_begin();
        ctx.input_button(MouseButton::Right, 50.0, 50.0, false);
        ctx.input_end();
        assert_eq!(contextual_frame(&mut ctx, false), (true, false));
        let popup = ctx.window_find("w").and_then(|w| w.popup.win).and_then(|p| ctx.windows.get(p));
        assert_eq!(popup.map(|p| p.bounds.pos()), Some(vec2(50.0, 50.0)));

        // clicking outside closes it
        ctx.input_begin();
        ctx.input_motion(250.0, 280.0);
        ctx.input_button(MouseButton::Left, 250.0, 280.0, true);
        ctx.input_end();
        assert_eq!(contextual_frame(&mut ctx, false), (false, false));
    }

    #[test]
    fn tooltip_follows_the_pointer() {
        let mut ctx = context();
        ctx.input_begin();
        ctx.input_motion(40.0, 30.0);
        ctx.input_end();
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            ctx.tooltip("tip");
            ctx.end();
        });
        assert!(texts(&mut ctx).iter().any(|t| t == "tip"));
        let popup = ctx.window_find("w").and_then(|w| w.popup.win).and_then(|p| ctx.windows.get(p));
        assert_eq!(popup.map(|p| p.bounds.pos()), Some(vec2(41.0, 31.0)));
        // text plus popup padding twice and the border on both sides
        assert_eq!(popup.map(|p| p.bounds.w), Some(24.0 + 16.0 + 2.0));
        // the tooltip window is dropped at the next clear
        ctx.clear();
        assert!(ctx.window_find("w").is_some_and(|w| w.popup.win.is_none()));
    }
}
