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
//! Persistent per window state kept in the context's window pool.

use log::{debug, warn};

use crate::command::CmdOffset;
use crate::panel::{Panel, PanelType, header_height};
use crate::table::ValueTables;
use crate::util::{WINDOW_TITLE_SEED, hash_str};
use crate::*;

/// Bytes of a window name kept for lookups.
pub const WINDOW_MAX_NAME: usize = 64;

/// Re-anchored origin of the current left button drag.
///
/// Dragging a window header or a scrollbar cursor moves the point the drag is considered to have
/// started from, so the next frame still finds it inside the moved element.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct DragAnchor {
    pos: Option<Vec2>,
}

impl DragAnchor {
    /// Origin of the current left button drag.
    pub(crate) fn origin(&self, input: &Input) -> Vec2 { self.pos.unwrap_or(input.mouse.buttons[MouseButton::Left as usize].clicked_pos) }

    pub(crate) fn set(&mut self, pos: Vec2) { self.pos = Some(pos); }

    /// Moves the origin along with the dragged element.
    pub(crate) fn follow(&mut self, input: &Input, delta: Vec2) { self.pos = Some(self.origin(input) + delta); }

    /// Drops the anchor when the left button changed state this frame.
    pub(crate) fn sync(&mut self, input: &Input) {
        if input.mouse.buttons[MouseButton::Left as usize].clicked > 0 {
            self.pos = None;
        }
    }

    /// The left button is held and the drag started inside `r`.
    pub(crate) fn is_dragging_in(&self, input: &Input, r: Rect) -> bool { input.mouse.buttons[MouseButton::Left as usize].down && r.contains(self.origin(input)) }
}

#[derive(Copy, Clone, Debug, Default)]
/// Range of the parent's command buffer written by the open popup.
pub(crate) struct PopupBuffer {
    /// First byte of the popup's commands.
    pub begin: u32,
    /// Parent command right before the popup.
    pub parent: Option<CmdOffset>,
    /// Last popup command.
    pub last: Option<CmdOffset>,
    /// First byte after the popup's commands.
    pub end: u32,
    pub active: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct PopupState {
    pub win: Option<Handle<Window>>,
    pub kind: PanelType,
    pub buf: PopupBuffer,
    pub name: Hash,
    pub active: bool,
    pub combo_count: u32,
    pub con_count: u32,
    pub con_old: u32,
    pub active_con: u32,
    pub header: Rect,
}

#[derive(Clone, Debug, Default)]
/// Cursor, selection and scroll of the focused text field.
pub(crate) struct EditState {
    pub name: Hash,
    pub seq: u32,
    pub old: u32,
    pub active: bool,
    pub prev: bool,
    pub cursor: usize,
    pub sel_start: usize,
    pub sel_end: usize,
    pub scrollbar: Vec2,
    pub mode: TextEditMode,
    pub single_line: bool,
}

#[derive(Clone, Debug, Default)]
/// Text buffer of the property currently edited by keyboard.
pub(crate) struct PropertyState {
    pub active: bool,
    pub prev: bool,
    pub buffer: String,
    pub cursor: usize,
    pub select_start: usize,
    pub select_end: usize,
    pub name: Hash,
    pub seq: u32,
    pub old: u32,
    pub state: PropertyMode,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Interaction mode of a property widget.
pub enum PropertyMode {
    /// Showing the value.
    #[default]
    Default,
    /// Editing the value as text.
    Edit,
    /// Dragging the value with the mouse.
    Drag,
}

/// A top level window or popup.
pub struct Window {
    pub(crate) seq: u32,
    pub(crate) name: Hash,
    pub(crate) name_string: String,
    pub(crate) flags: PanelFlags,
    pub(crate) bounds: Rect,
    pub(crate) scrollbar: Vec2,
    pub(crate) buffer: CommandBuffer,
    /// Window panel followed by the open groups, innermost last.
    pub(crate) layout: Vec<Panel>,
    pub(crate) scrollbar_hiding_timer: f32,
    pub(crate) property: PropertyState,
    pub(crate) popup: PopupState,
    pub(crate) edit: EditState,
    pub(crate) scrolled: bool,
    pub(crate) tables: ValueTables,
    pub(crate) prev: Option<Handle<Window>>,
    pub(crate) next: Option<Handle<Window>>,
    pub(crate) parent: Option<Handle<Window>>,
    pub(crate) drag: DragAnchor,
}

impl Window {
    pub(crate) fn new(name: &str, hash: Hash, bounds: Rect, flags: PanelFlags) -> Self {
        let mut name_string = String::new();
        for c in name.chars() {
            if name_string.len() + c.len_utf8() >= WINDOW_MAX_NAME {
                break;
            }
            name_string.push(c);
        }
        Self {
            seq: 0,
            name: hash,
            name_string,
            flags,
            bounds,
            scrollbar: Vec2::default(),
            buffer: CommandBuffer::default(),
            layout: Vec::new(),
            scrollbar_hiding_timer: 0.0,
            property: PropertyState::default(),
            popup: PopupState::default(),
            edit: EditState::default(),
            scrolled: false,
            tables: ValueTables::default(),
            prev: None,
            next: None,
            parent: None,
            drag: DragAnchor::default(),
        }
    }

    /// Popup window reset to a blank state, keeping only its pool slot.
    pub(crate) fn blank_popup(parent: Handle<Window>) -> Self {
        let mut w = Self::new("", 0, Rect::default(), PanelFlags::empty());
        w.parent = Some(parent);
        w
    }

    /// Stored name.
    pub fn name(&self) -> &str { &self.name_string }
    /// Outer bounds.
    pub fn bounds(&self) -> Rect { self.bounds }
    /// Current flags.
    pub fn flags(&self) -> PanelFlags { self.flags }
    /// Scroll offset of the content.
    pub fn scroll(&self) -> Vec2 { self.scrollbar }
    /// Whether the mouse wheel scrolled this window in the last frame.
    pub fn is_scrolled(&self) -> bool { self.scrolled }

    pub(crate) fn name_matches(&self, hash: Hash, name: &str) -> bool {
        self.name == hash && name.starts_with(self.name_string.as_str())
    }

    /// End of frame collectors for the property, edit and contextual states.
    pub(crate) fn collect_garbage(&mut self) {
        let p = &mut self.property;
        if p.active && p.old != p.seq && p.active == p.prev {
            *p = PropertyState::default();
        } else {
            p.old = p.seq;
            p.prev = p.active;
            p.seq = 0;
        }

        let e = &mut self.edit;
        if e.active && e.old != e.seq && e.active == e.prev {
            *e = EditState::default();
        } else {
            e.old = e.seq;
            e.prev = e.active;
            e.seq = 0;
        }

        let pop = &mut self.popup;
        if pop.active_con != 0 && pop.con_old != pop.con_count {
            pop.con_count = 0;
            pop.con_old = 0;
            pop.active_con = 0;
        } else {
            pop.con_old = pop.con_count;
            pop.con_count = 0;
        }
        pop.combo_count = 0;
    }
}

/// Snapshot of the innermost panel of the current window.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PanelView {
    /// Panel kind.
    pub kind: PanelType,
    /// Panel flags.
    pub flags: PanelFlags,
    /// Content bounds.
    pub bounds: Rect,
    /// Visible part of the content.
    pub clip: Rect,
    /// Scroll offset.
    pub offset: Vec2,
}

impl Context {
    /// Windows from the bottom of the z-order to the top.
    pub(crate) fn z_order(&self) -> Vec<Handle<Window>> {
        let mut order = Vec::with_capacity(self.count);
        let mut iter = self.begin;
        while let Some(h) = iter {
            order.push(h);
            iter = self.windows.get(h).and_then(|w| w.next);
        }
        order
    }

    pub(crate) fn find_window(&self, hash: Hash, name: &str) -> Option<Handle<Window>> {
        self.z_order().into_iter().find(|h| self.windows.get(*h).is_some_and(|w| w.name_matches(hash, name)))
    }

    fn find_window_named(&self, name: &str) -> Option<Handle<Window>> { self.find_window(hash_str(name, WINDOW_TITLE_SEED), name) }

    /// Links `h` on top of the z-order, or at the bottom when `on_top` is not set.
    pub(crate) fn insert_window(&mut self, h: Handle<Window>, on_top: bool) {
        if self.z_order().contains(&h) {
            debug_assert!(false, "window inserted twice");
            return;
        }
        let (Some(first), Some(last)) = (self.begin, self.end) else {
            if let Some(w) = self.windows.get_mut(h) {
                w.prev = None;
                w.next = None;
            }
            self.begin = Some(h);
            self.end = Some(h);
            self.count = 1;
            return;
        };
        if on_top {
            if let Some(w) = self.windows.get_mut(last) {
                w.flags.insert(PanelFlags::ROM);
                w.next = Some(h);
            }
            if let Some(w) = self.windows.get_mut(h) {
                w.prev = Some(last);
                w.next = None;
                w.flags.remove(PanelFlags::ROM);
            }
            self.end = Some(h);
            self.active = Some(h);
        } else {
            if let Some(w) = self.windows.get_mut(first) {
                w.prev = Some(h);
            }
            if let Some(w) = self.windows.get_mut(h) {
                w.next = Some(first);
                w.prev = None;
                w.flags.remove(PanelFlags::ROM);
            }
            self.begin = Some(h);
        }
        self.count += 1;
    }

    /// Unlinks `h` from the z-order.
    pub(crate) fn remove_window(&mut self, h: Handle<Window>) {
        let Some((prev, next)) = self.windows.get(h).map(|w| (w.prev, w.next)) else { return };
        if let Some(w) = prev.and_then(|p| self.windows.get_mut(p)) {
            w.next = next;
        }
        if let Some(w) = next.and_then(|n| self.windows.get_mut(n)) {
            w.prev = prev;
        }
        if self.begin == Some(h) {
            self.begin = next;
        }
        if self.end == Some(h) {
            self.end = prev;
        }
        if self.active == Some(h) || self.active.is_none() {
            self.active = self.end;
            if let Some(w) = self.end.and_then(|e| self.windows.get_mut(e)) {
                w.flags.remove(PanelFlags::ROM);
            }
        }
        if let Some(w) = self.windows.get_mut(h) {
            w.prev = None;
            w.next = None;
        }
        self.count = self.count.saturating_sub(1);
    }

    /// Bounds used for overlap tests: minimized windows only cover their header.
    fn visible_bounds(&self, w: &Window) -> Rect {
        if w.flags.contains(PanelFlags::MINIMIZED) {
            Rect::new(w.bounds.x, w.bounds.y, w.bounds.w, header_height(&self.style, self.font()))
        } else {
            w.bounds
        }
    }

    /// An open popup of `w` covers `r`.
    fn popup_blocks(&self, w: &Window, r: Rect) -> bool {
        w.popup.active
            && !w.flags.contains(PanelFlags::HIDDEN)
            && w.popup.win.and_then(|p| self.windows.get(p)).is_some_and(|p| p.bounds.intersects(&r))
    }

    /// Focus and read only bookkeeping when `h` begins: hovering an uncovered window or clicking
    /// it moves it on top, every other window is read only.
    fn update_focus(&mut self, h: Handle<Window>) {
        let Some(win) = self.windows.get(h) else { return };
        let win_flags = win.flags;
        let win_bounds = self.visible_bounds(win);
        let left = &self.input.mouse.buttons[MouseButton::Left as usize];
        let inpanel = self.input.has_mouse_click_down_in_rect(MouseButton::Left, win_bounds, true) && left.clicked > 0;
        let hovered = self.input.is_mouse_hovering_rect(win_bounds);

        let mut iter = Some(h);
        if self.active != Some(h) && hovered && !left.down {
            iter = win.next;
            while let Some(it) = iter {
                let Some(w) = self.windows.get(it) else {
                    iter = None;
                    break;
                };
                if !w.flags.contains(PanelFlags::HIDDEN) && self.visible_bounds(w).intersects(&win_bounds) {
                    break;
                }
                if self.popup_blocks(w, win_bounds) {
                    break;
                }
                iter = w.next;
            }
        }

        if iter.is_some() && inpanel && self.end != Some(h) {
            iter = win.next;
            while let Some(it) = iter {
                let Some(w) = self.windows.get(it) else {
                    iter = None;
                    break;
                };
                if !w.flags.contains(PanelFlags::HIDDEN) && self.visible_bounds(w).contains(self.input.mouse.pos) {
                    break;
                }
                if self.popup_blocks(w, win_bounds) {
                    break;
                }
                iter = w.next;
            }
        }

        match iter {
            Some(it) if !win_flags.contains(PanelFlags::ROM) && win_flags.contains(PanelFlags::BACKGROUND) => {
                if let Some(w) = self.windows.get_mut(h) {
                    w.flags.insert(PanelFlags::ROM);
                }
                let mut raise = false;
                if let Some(w) = self.windows.get_mut(it) {
                    w.flags.remove(PanelFlags::ROM);
                    raise = !w.flags.contains(PanelFlags::BACKGROUND);
                }
                self.active = Some(it);
                if raise {
                    self.remove_window(it);
                    self.insert_window(it, true);
                }
            }
            _ => {
                if iter.is_none() && self.end != Some(h) {
                    if !win_flags.contains(PanelFlags::BACKGROUND) {
                        self.remove_window(h);
                        self.insert_window(h, true);
                    }
                    if let Some(w) = self.windows.get_mut(h) {
                        w.flags.remove(PanelFlags::ROM);
                    }
                    self.active = Some(h);
                }
                if self.end != Some(h)
                    && !win_flags.contains(PanelFlags::BACKGROUND)
                    && let Some(w) = self.windows.get_mut(h)
                {
                    w.flags.insert(PanelFlags::ROM);
                }
            }
        }
    }

    /// Starts the window `title`. Returns `true` if its content is visible; [`Context::end`]
    /// must be called either way.
    pub fn begin(&mut self, title: &str, bounds: Rect, flags: PanelFlags) -> bool { self.begin_titled(title, title, bounds, flags) }

    /// Like [`Context::begin`] with a title that differs from the identifying name.
    pub fn begin_titled(&mut self, name: &str, title: &str, bounds: Rect, flags: PanelFlags) -> bool {
        if self.current.is_some() {
            debug_assert!(false, "begin inside window; missing end");
            return false;
        }
        let hash = hash_str(name, WINDOW_TITLE_SEED);
        let seq = self.seq;
        let h = match self.find_window(hash, name) {
            None => {
                let mut win = Window::new(name, hash, bounds, flags);
                win.seq = seq;
                let h = match self.windows.alloc(win) {
                    Ok(h) => h,
                    Err(err) => {
                        warn!("window {name:?} not created: {err}");
                        return false;
                    }
                };
                self.insert_window(h, !flags.contains(PanelFlags::BACKGROUND));
                if self.active.is_none() {
                    self.active = Some(h);
                }
                debug!("window {name:?} created");
                h
            }
            Some(h) => {
                let no_active = self.active.is_none();
                let Some(win) = self.windows.get_mut(h) else { return false };
                win.flags.remove(PanelFlags::PUBLIC);
                win.flags.insert(flags);
                if !win.flags.intersects(PanelFlags::MOVABLE | PanelFlags::SCALABLE) {
                    win.bounds = bounds;
                }
                debug_assert!(win.seq != seq, "window {name:?} begun twice in one frame");
                win.seq = seq;
                if no_active && !win.flags.contains(PanelFlags::HIDDEN) {
                    self.active = Some(h);
                }
                h
            }
        };

        let Context { windows, memory, input, .. } = self;
        let Some(win) = windows.get_mut(h) else { return false };
        if win.flags.contains(PanelFlags::HIDDEN) {
            win.layout.clear();
            self.current = Some(h);
            return false;
        }
        win.drag.sync(input);
        win.buffer.start(memory);
        win.popup.buf = PopupBuffer::default();

        if !win.flags.contains(PanelFlags::NO_INPUT) {
            self.update_focus(h);
        }

        let Some(win) = self.windows.get_mut(h) else { return false };
        let panel = Panel::new(PanelType::WINDOW, win.bounds, win.flags, win.scrollbar);
        win.layout.clear();
        win.layout.push(panel);
        self.current = Some(h);
        self.panel_begin(Some(title), PanelType::WINDOW)
    }

    /// Ends the current window.
    pub fn end(&mut self) {
        let Some(cur) = self.current else {
            debug_assert!(false, "end without begin");
            return;
        };
        let open = self.windows.get(cur).is_some_and(|w| !w.layout.is_empty() && !w.flags.contains(PanelFlags::HIDDEN));
        if open {
            self.panel_end();
        }
        if let Some(w) = self.windows.get_mut(cur) {
            w.layout.clear();
        }
        self.current = None;
    }

    fn current_window(&self) -> Option<&Window> { self.current.and_then(|h| self.windows.get(h)) }

    /// Looks a window up by name.
    pub fn window_find(&self, name: &str) -> Option<&Window> { self.find_window_named(name).and_then(|h| self.windows.get(h)) }

    /// Bounds of the current window.
    pub fn window_get_bounds(&self) -> Rect { self.current_window().map(|w| w.bounds).unwrap_or_default() }

    /// Position of the current window.
    pub fn window_get_position(&self) -> Vec2 { self.window_get_bounds().pos() }

    /// Size of the current window.
    pub fn window_get_size(&self) -> Vec2 { self.window_get_bounds().size() }

    /// Width of the current window.
    pub fn window_get_width(&self) -> f32 { self.window_get_bounds().w }

    /// Height of the current window.
    pub fn window_get_height(&self) -> f32 { self.window_get_bounds().h }

    /// Innermost panel of the current window.
    pub fn window_get_panel(&self) -> Option<PanelView> {
        self.panel().map(|p| PanelView { kind: p.kind, flags: p.flags, bounds: p.bounds, clip: p.clip, offset: p.offset })
    }

    /// Visible content area of the current window.
    pub fn window_get_content_region(&self) -> Rect { self.panel().map(|p| p.clip).unwrap_or_default() }

    /// Top left corner of the content area.
    pub fn window_get_content_region_min(&self) -> Vec2 { self.window_get_content_region().pos() }

    /// Bottom right corner of the content area.
    pub fn window_get_content_region_max(&self) -> Vec2 {
        let r = self.window_get_content_region();
        vec2(r.x + r.w, r.y + r.h)
    }

    /// Size of the content area.
    pub fn window_get_content_region_size(&self) -> Vec2 { self.window_get_content_region().size() }

    /// Scroll offset of the current window.
    pub fn window_get_scroll(&self) -> Vec2 { self.current_window().map(|w| w.scrollbar).unwrap_or_default() }

    /// Scrolls the current window; applied when the next frame begins it.
    pub fn window_set_scroll(&mut self, offset: Vec2) {
        if let Some(w) = self.current.and_then(|h| self.windows.get_mut(h)) {
            w.scrollbar = offset;
        }
    }

    /// The current window has the focus.
    pub fn window_has_focus(&self) -> bool { self.current.is_some() && self.current == self.active }

    /// The pointer is over the current window.
    pub fn window_is_hovered(&self) -> bool {
        self.current_window()
            .is_some_and(|w| !w.flags.contains(PanelFlags::HIDDEN) && self.input.is_mouse_hovering_rect(w.bounds))
    }

    /// The window `name` is minimized.
    pub fn window_is_collapsed(&self, name: &str) -> bool { self.window_find(name).is_some_and(|w| w.flags.contains(PanelFlags::MINIMIZED)) }

    /// The window `name` was closed or does not exist.
    pub fn window_is_closed(&self, name: &str) -> bool { self.window_find(name).is_none_or(|w| w.flags.contains(PanelFlags::CLOSED)) }

    /// The window `name` is hidden or does not exist.
    pub fn window_is_hidden(&self, name: &str) -> bool { self.window_find(name).is_none_or(|w| w.flags.contains(PanelFlags::HIDDEN)) }

    /// The window `name` has the focus.
    pub fn window_is_active(&self, name: &str) -> bool { self.find_window_named(name).is_some_and(|h| self.active == Some(h)) }

    /// The pointer is over any visible window or open popup.
    pub fn window_is_any_hovered(&self) -> bool {
        let header = header_height(&self.style, self.font());
        self.z_order().into_iter().filter_map(|h| self.windows.get(h)).any(|w| {
            if w.flags.contains(PanelFlags::HIDDEN) {
                return false;
            }
            let popup_hovered = w.popup.active && w.popup.win.and_then(|p| self.windows.get(p)).is_some_and(|p| self.input.is_mouse_hovering_rect(p.bounds));
            let bounds = if w.flags.contains(PanelFlags::MINIMIZED) { Rect::new(w.bounds.x, w.bounds.y, w.bounds.w, header) } else { w.bounds };
            popup_hovered || self.input.is_mouse_hovering_rect(bounds)
        })
    }

    /// A window is hovered or the last widget changed state.
    pub fn item_is_any_active(&self) -> bool { self.window_is_any_hovered() || self.last_widget_state.contains(WidgetStates::MODIFIED) }

    fn with_window_named(&mut self, name: &str, f: impl FnOnce(&mut Window)) {
        if let Some(w) = self.find_window_named(name).and_then(|h| self.windows.get_mut(h)) {
            f(w);
        }
    }

    /// Moves and resizes the window `name`.
    pub fn window_set_bounds(&mut self, name: &str, bounds: Rect) { self.with_window_named(name, |w| w.bounds = bounds); }

    /// Moves the window `name`.
    pub fn window_set_position(&mut self, name: &str, pos: Vec2) {
        self.with_window_named(name, |w| {
            w.bounds.x = pos.x;
            w.bounds.y = pos.y;
        });
    }

    /// Resizes the window `name`.
    pub fn window_set_size(&mut self, name: &str, size: Vec2) {
        self.with_window_named(name, |w| {
            w.bounds.w = size.x;
            w.bounds.h = size.y;
        });
    }

    /// Raises the window `name` and gives it the focus.
    pub fn window_set_focus(&mut self, name: &str) {
        let h = self.find_window_named(name);
        if let Some(h) = h
            && self.end != Some(h)
        {
            self.remove_window(h);
            self.insert_window(h, true);
        }
        self.active = h;
    }

    /// Hides the window `name`; it is freed by the next [`Context::clear`]. The current window
    /// cannot close itself this way.
    pub fn window_close(&mut self, name: &str) {
        let Some(h) = self.find_window_named(name) else { return };
        if self.current == Some(h) {
            return;
        }
        if let Some(w) = self.windows.get_mut(h) {
            w.flags.insert(PanelFlags::HIDDEN | PanelFlags::CLOSED);
        }
    }

    /// Minimizes or restores the window `name`.
    pub fn window_collapse(&mut self, name: &str, state: CollapseState) {
        self.with_window_named(name, |w| match state {
            CollapseState::Minimized => w.flags.insert(PanelFlags::MINIMIZED),
            CollapseState::Maximized => w.flags.remove(PanelFlags::MINIMIZED),
        });
    }

    /// [`Context::window_collapse`] when `cond` holds.
    pub fn window_collapse_if(&mut self, name: &str, state: CollapseState, cond: bool) {
        if cond {
            self.window_collapse(name, state);
        }
    }

    /// Shows or hides the window `name`.
    pub fn window_show(&mut self, name: &str, show: bool) { self.with_window_named(name, |w| w.flags.set(PanelFlags::HIDDEN, !show)); }

    /// [`Context::window_show`] when `cond` holds.
    pub fn window_show_if(&mut self, name: &str, show: bool, cond: bool) {
        if cond {
            self.window_show(name, show);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_truncated() {
        let long = "w".repeat(100);
        let w = Window::new(&long, 1, Rect::default(), PanelFlags::empty());
        assert_eq!(w.name().len(), WINDOW_MAX_NAME - 1);
        assert!(w.name_matches(1, &long));
        assert!(!w.name_matches(2, &long));
    }

    #[test]
    fn edit_state_dropped_when_field_disappears() {
        let mut w = Window::new("w", 1, Rect::default(), PanelFlags::empty());
        w.edit.active = true;
        w.edit.name = 5;
        w.edit.seq = 1;
        w.collect_garbage();
        // the field is still declared: the bookkeeping rolls over
        assert!(w.edit.active);
        w.edit.seq = 1;
        w.collect_garbage();
        assert!(w.edit.active);
        // no edit declared this frame
        w.collect_garbage();
        assert!(!w.edit.active);
        assert_eq!(w.edit.name, 0);
    }

    #[test]
    fn drag_anchor_follows_moves() {
        let mut input = Input::default();
        input.button(MouseButton::Left, 10.0, 10.0, true);
        let mut a = DragAnchor::default();
        a.sync(&input);
        assert_eq!(a.origin(&input), vec2(10.0, 10.0));
        a.follow(&input, vec2(5.0, 0.0));
        assert!(a.is_dragging_in(&input, rect(12.0, 0.0, 10.0, 20.0)));
        input.begin();
        assert_eq!(a.origin(&input), vec2(15.0, 10.0));
    }

    fn context() -> Context {
        let mut ctx = Context::new(std::rc::Rc::new(crate::test_font::TestFont));
        ctx.input_begin();
        ctx.input_motion(2000.0, 2000.0);
        ctx.input_end();
        ctx
    }

    fn two_windows(ctx: &mut Context) {
        ctx.frame(|ctx| {
            ctx.begin("a", rect(0.0, 0.0, 100.0, 100.0), PanelFlags::empty());
            ctx.end();
            ctx.begin("b", rect(50.0, 50.0, 100.0, 100.0), PanelFlags::empty());
            ctx.end();
        });
    }

    #[test]
    fn clicking_a_covered_window_raises_it() {
        let mut ctx = context();
        two_windows(&mut ctx);
        assert!(ctx.window_is_active("b"));
        assert!(ctx.window_find("a").is_some_and(|w| w.flags().is_rom()));

        ctx.input_begin();
        ctx.input_motion(10.0, 10.0);
        ctx.input_button(MouseButton::Left, 10.0, 10.0, true);
        ctx.input_end();
        two_windows(&mut ctx);
        assert!(ctx.window_is_active("a"));
        assert!(ctx.window_find("a").is_some_and(|w| !w.flags().is_rom()));
        assert!(ctx.window_find("b").is_some_and(|w| w.flags().is_rom()));
        let order: Vec<_> = ctx.z_order().into_iter().filter_map(|h| ctx.windows.get(h)).map(|w| w.name().to_string()).collect();
        assert_eq!(order, ["b", "a"]);
    }

    #[test]
    fn closed_windows_are_freed_on_clear() {
        let mut ctx = context();
        two_windows(&mut ctx);
        ctx.window_close("a");
        assert!(ctx.window_is_hidden("a"));
        assert!(ctx.window_is_closed("a"));
        ctx.clear();
        assert!(ctx.window_find("a").is_none());
        assert!(ctx.window_is_closed("a"));
        assert!(ctx.window_find("b").is_some());
    }

    #[test]
    fn collapse_and_bounds_mutators() {
        let mut ctx = context();
        two_windows(&mut ctx);
        ctx.window_collapse("b", CollapseState::Minimized);
        assert!(ctx.window_is_collapsed("b"));
        ctx.window_collapse_if("b", CollapseState::Maximized, false);
        assert!(ctx.window_is_collapsed("b"));
        ctx.window_collapse_if("b", CollapseState::Maximized, true);
        assert!(!ctx.window_is_collapsed("b"));

        ctx.window_set_position("a", vec2(5.0, 6.0));
        ctx.window_set_size("a", vec2(70.0, 80.0));
        assert_eq!(ctx.window_find("a").map(|w| w.bounds()), Some(rect(5.0, 6.0, 70.0, 80.0)));
    }

    #[test]
    fn current_window_queries() {
        let mut ctx = context();
        assert!(ctx.begin("q", rect(10.0, 20.0, 200.0, 100.0), PanelFlags::NO_SCROLLBAR));
        assert_eq!(ctx.window_get_position(), vec2(10.0, 20.0));
        assert_eq!(ctx.window_get_size(), vec2(200.0, 100.0));
        assert!(ctx.window_has_focus());
        assert!(!ctx.window_is_hovered());
        let panel = ctx.window_get_panel();
        assert_eq!(panel.map(|p| p.kind), Some(PanelType::WINDOW));
        assert_eq!(ctx.window_get_content_region(), panel.map(|p| p.clip).unwrap_or_default());
        ctx.end();
        assert_eq!(ctx.window_get_bounds(), Rect::default());
    }
}
