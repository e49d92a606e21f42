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
use std::rc::Rc;

use log::{debug, trace, warn};

use crate::command::{Commands, set_next};
use crate::panel::Panel;
use crate::style::StyleStacks;
use crate::table::Table;
use crate::*;

/// Initial size of a growable command arena.
pub const DEFAULT_MEMORY_SIZE: usize = 16 * 1024;

/// Fonts registered with a context. The first one always exists.
pub(crate) struct Fonts {
    first: Rc<dyn Font>,
    rest: Vec<Rc<dyn Font>>,
}

/// Resolves `id`, falling back to the first font for unknown ids.
pub(crate) fn font_of(fonts: &Fonts, id: FontId) -> &dyn Font {
    match id.0 {
        0 => fonts.first.as_ref(),
        n => fonts.rest.get(n as usize - 1).map(|f| f.as_ref()).unwrap_or(fonts.first.as_ref()),
    }
}

/// Primary entry point: owns the command arena, the windows and every piece of retained state.
///
/// A frame is input, then `begin`/`end` pairs with widgets in between, then a walk over
/// [`Context::commands`], then [`Context::clear`]. [`Context::frame`] wraps the last three steps.
pub struct Context {
    pub(crate) memory: Buffer,
    pub(crate) windows: Pool<Window>,
    pub(crate) tables: Pool<Table>,
    /// Bottom of the z-order.
    pub(crate) begin: Option<Handle<Window>>,
    /// Top of the z-order.
    pub(crate) end: Option<Handle<Window>>,
    pub(crate) active: Option<Handle<Window>>,
    pub(crate) current: Option<Handle<Window>>,
    pub(crate) count: usize,
    pub(crate) seq: u32,
    build: bool,
    frame_pending: bool,

    pub(crate) input: Input,
    pub(crate) style: Style,
    pub(crate) fonts: Fonts,
    pub(crate) last_widget_state: WidgetStates,
    pub(crate) button_behavior: ButtonBehavior,
    pub(crate) button_behavior_stack: Vec<ButtonBehavior>,
    pub(crate) style_stacks: StyleStacks,
    pub(crate) clipboard: Option<Box<dyn Clipboard>>,
    /// Editor shared by every text field; only the focused one owns its state.
    pub(crate) text_edit: TextEdit,
    pub(crate) delta_time_seconds: f32,
    #[cfg(feature = "command-userdata")]
    pub(crate) userdata: u32,
    #[cfg(feature = "vertex-buffer")]
    pub(crate) draw_batches: crate::draw_list::DrawBatches,
}

impl Context {
    /// Creates a context with a growable arena and window pool.
    pub fn new(font: Rc<dyn Font>) -> Self { Self::with_parts(font, Buffer::new(DEFAULT_MEMORY_SIZE), Pool::new(), Pool::new()) }

    /// Creates a context that never allocates after construction: the arena holds `size` bytes
    /// and the window and table pools a single page each.
    pub fn with_fixed_memory(font: Rc<dyn Font>, size: usize) -> Self {
        Self::with_parts(font, Buffer::fixed(size), Pool::fixed(POOL_DEFAULT_CAPACITY), Pool::fixed(POOL_DEFAULT_CAPACITY))
    }

    fn with_parts(font: Rc<dyn Font>, memory: Buffer, windows: Pool<Window>, tables: Pool<Table>) -> Self {
        Self {
            memory,
            windows,
            tables,
            begin: None,
            end: None,
            active: None,
            current: None,
            count: 0,
            seq: 1,
            build: false,
            frame_pending: false,
            input: Input::default(),
            style: Style::default(),
            fonts: Fonts { first: font, rest: Vec::new() },
            last_widget_state: WidgetStates::empty(),
            button_behavior: ButtonBehavior::Default,
            button_behavior_stack: Vec::new(),
            style_stacks: StyleStacks::default(),
            clipboard: None,
            text_edit: TextEdit::new(),
            delta_time_seconds: 0.0,
            #[cfg(feature = "command-userdata")]
            userdata: 0,
            #[cfg(feature = "vertex-buffer")]
            draw_batches: Default::default(),
        }
    }

    /// Registers another font. Select it through [`Style::font`].
    pub fn add_font(&mut self, font: Rc<dyn Font>) -> FontId {
        self.fonts.rest.push(font);
        FontId(self.fonts.rest.len() as u32)
    }

    /// Installs the host clipboard used by fields with [`EditFlags::CLIPBOARD`].
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) { self.clipboard = Some(clipboard); }

    /// Current style.
    pub fn style(&self) -> &Style { &self.style }

    /// Mutable access to the style; changes apply to the following widgets.
    pub fn style_mut(&mut self) -> &mut Style { &mut self.style }

    /// Replaces the whole style.
    pub fn set_style(&mut self, style: Style) { self.style = style; }

    /// Seconds since the previous frame, used to hide idle scrollbars.
    pub fn set_delta_time(&mut self, seconds: f32) { self.delta_time_seconds = seconds; }

    /// Tag stamped on every following command.
    #[cfg(feature = "command-userdata")]
    pub fn set_userdata(&mut self, userdata: u32) {
        self.userdata = userdata;
        if let Some(win) = self.current.and_then(|h| self.windows.get_mut(h)) {
            win.buffer.userdata = userdata;
        }
    }

    /// Input of the current frame.
    pub fn input(&self) -> &Input { &self.input }

    /// Font selected by the style.
    pub(crate) fn font(&self) -> &dyn Font { font_of(&self.fonts, self.style.font) }

    /// Innermost panel of the current window.
    pub(crate) fn panel(&self) -> Option<&Panel> { self.current.and_then(|h| self.windows.get(h)).and_then(|w| w.layout.last()) }

    pub(crate) fn panel_mut(&mut self) -> Option<&mut Panel> { self.current.and_then(|h| self.windows.get_mut(h)).and_then(|w| w.layout.last_mut()) }

    /// Stores `value` under `key` in the current window. Returns `false` outside a window or
    /// when no table page can be allocated.
    pub fn set_value(&mut self, key: Hash, value: u32) -> bool {
        let Some(cur) = self.current else { return false };
        let seq = self.seq;
        let Context { windows, tables, .. } = self;
        windows.get_mut(cur).is_some_and(|w| w.tables.insert(tables, key, value, seq))
    }

    /// Value stored under `key` in the current window.
    pub fn find_value(&mut self, key: Hash) -> Option<u32> {
        let cur = self.current?;
        let seq = self.seq;
        let Context { windows, tables, .. } = self;
        windows.get(cur)?.tables.find(tables, key, seq)
    }
}

impl Context {
    /// Starts collecting input for a frame.
    pub fn input_begin(&mut self) { self.input.begin(); }

    /// Pointer moved to `x`, `y`.
    pub fn input_motion(&mut self, x: f32, y: f32) { self.input.motion(x, y); }

    /// Key state change.
    pub fn input_key(&mut self, key: Key, down: bool) { self.input.key(key, down); }

    /// Mouse button state change at `x`, `y`.
    pub fn input_button(&mut self, button: MouseButton, x: f32, y: f32, down: bool) { self.input.button(button, x, y, down); }

    /// Wheel motion.
    pub fn input_scroll(&mut self, delta: Vec2) { self.input.scroll(delta); }

    /// Single byte of typed text.
    pub fn input_char(&mut self, c: u8) { self.input.char(c); }

    /// UTF-8 encoded glyph of typed text.
    pub fn input_glyph(&mut self, glyph: &[u8]) { self.input.glyph(glyph); }

    /// Typed code point.
    pub fn input_unicode(&mut self, c: char) { self.input.unicode(c); }

    /// Ends input collection.
    pub fn input_end(&mut self) { self.input.end(); }
}

impl Context {
    /// Resets the arena and drops everything not declared since the previous clear: windows,
    /// popups and value table pages.
    pub fn clear(&mut self) {
        self.memory.clear();
        self.build = false;
        self.frame_pending = false;
        self.last_widget_state = WidgetStates::empty();
        trace!("clearing frame {}", self.seq);

        let seq = self.seq;
        let mut iter = self.begin;
        while let Some(h) = iter {
            let Some(win) = self.windows.get(h) else { break };
            let (next, prev, flags) = (win.next, win.prev, win.flags);
            if flags.contains(PanelFlags::MINIMIZED) && !flags.contains(PanelFlags::CLOSED) && win.seq == seq {
                iter = next;
                continue;
            }
            if flags.intersects(PanelFlags::HIDDEN | PanelFlags::CLOSED) && self.active == Some(h) {
                self.active = prev;
                if let Some(w) = prev.and_then(|p| self.windows.get_mut(p)) {
                    w.flags.remove(PanelFlags::ROM);
                }
            }

            let Context { windows, tables, .. } = self;
            let popup = windows.get(h).and_then(|w| w.popup.win);
            if let Some(p) = popup
                && windows.get(p).is_none_or(|pw| pw.seq != seq)
            {
                if let Some(mut pw) = windows.free(p) {
                    pw.tables.free_all(tables);
                }
                if let Some(w) = windows.get_mut(h) {
                    w.popup.win = None;
                }
            }
            if let Some(w) = windows.get_mut(h) {
                let freed = w.tables.sweep(tables, seq);
                if freed > 0 {
                    debug!("window {:?}: freed {} value pages", w.name_string, freed);
                }
            }

            let stale = windows.get(h).is_some_and(|w| w.seq != seq || w.flags.contains(PanelFlags::CLOSED));
            if stale {
                self.remove_window(h);
                if let Some(mut w) = self.windows.free(h) {
                    debug!("window {:?} removed", w.name_string);
                    w.tables.free_all(&mut self.tables);
                    if let Some(mut p) = w.popup.win.and_then(|p| self.windows.free(p)) {
                        p.tables.free_all(&mut self.tables);
                    }
                }
            }
            iter = next;
        }
        self.seq = self.seq.wrapping_add(1);
    }

    fn is_drawn(&self, w: &Window) -> bool { !w.buffer.is_empty() && !w.flags.contains(PanelFlags::HIDDEN) && w.seq == self.seq }

    /// Windows with commands this frame, bottom first.
    fn drawn_windows(&self) -> Vec<Handle<Window>> {
        self.z_order().into_iter().filter(|h| self.windows.get(*h).is_some_and(|w| self.is_drawn(w))).collect()
    }

    /// Links the per window command lists into one list in z-order.
    fn build_commands(&mut self) {
        let drawn = self.drawn_windows();
        for pair in drawn.windows(2) {
            let last = self.windows.get(pair[0]).and_then(|w| w.buffer.last);
            let next = self.windows.get(pair[1]).map(|w| w.buffer.begin);
            if let (Some(last), Some(next)) = (last, next) {
                set_next(&mut self.memory, last, next);
            }
        }
        let top = drawn.last().and_then(|h| self.windows.get(*h)).and_then(|w| w.buffer.last);
        if let Some(last) = top {
            let end = self.memory.allocated() as u32;
            set_next(&mut self.memory, last, end);
        }
        trace!("built command list over {} windows", drawn.len());
    }

    /// Commands of every visible window, bottom window first and popups inside their parent.
    pub fn commands(&mut self) -> Commands<'_> { self.command_list().0 }

    /// Command list together with the fonts its text commands refer to.
    pub(crate) fn command_list(&mut self) -> (Commands<'_>, &Fonts) {
        if !self.build {
            self.build_commands();
            self.build = true;
        }
        let first = self.drawn_windows().first().and_then(|h| self.windows.get(*h)).map(|w| w.buffer.begin as usize);
        (Commands::new(self.memory.memory(), first, self.memory.allocated()), &self.fonts)
    }

    /// Runs one frame of UI declarations. The previous frame is cleared first, so its commands
    /// stay readable through [`Context::commands`] until the next call.
    pub fn frame<F: FnOnce(&mut Self)>(&mut self, f: F) {
        if self.frame_pending {
            self.clear();
        }
        f(self);
        debug_assert!(self.current.is_none(), "frame ended inside a window");
        if !self.style_stacks.is_empty() {
            warn!("frame ended with unpopped style pushes");
        }
        self.frame_pending = true;
        self.build_commands();
        self.build = true;
    }

    /// Bytes of the command arena in use.
    pub fn memory_used(&self) -> usize { self.memory.allocated() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;

    fn context() -> Context {
        let mut ctx = Context::new(Rc::new(TestFont));
        ctx.input_begin();
        // keep the pointer away so hovering does not reorder windows
        ctx.input_motion(2000.0, 2000.0);
        ctx.input_end();
        ctx
    }

    fn rect_origins(ctx: &mut Context) -> Vec<i32> {
        ctx.commands()
            .filter_map(|c| match c {
                Command::Rect { rect, .. } | Command::RectFilled { rect, .. } => Some(rect.x),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn windows_are_linked_bottom_to_top() {
        let mut ctx = context();
        let flags = PanelFlags::NO_SCROLLBAR;
        ctx.frame(|ctx| {
            for (name, x) in [("a", 0.0), ("b", 200.0), ("c", 400.0)] {
                ctx.begin(name, rect(x, 0.0, 100.0, 100.0), flags);
                ctx.end();
            }
            ctx.window_show("b", false);
        });
        ctx.frame(|ctx| {
            for (name, x) in [("a", 0.0), ("b", 200.0), ("c", 400.0), ("d", 600.0)] {
                ctx.begin(name, rect(x, 0.0, 100.0, 100.0), flags);
                ctx.end();
            }
        });
        // the hidden window is skipped, the new one lands on top
        let xs = rect_origins(&mut ctx);
        let mut order: Vec<i32> = Vec::new();
        for x in xs {
            if order.last() != Some(&x) {
                order.push(x);
            }
        }
        assert_eq!(order, vec![0, 400, 600]);
    }

    #[test]
    fn windows_not_declared_are_collected() {
        let mut ctx = context();
        ctx.frame(|ctx| {
            ctx.begin("kept", rect(0.0, 0.0, 100.0, 100.0), PanelFlags::empty());
            ctx.end();
            ctx.begin("dropped", rect(0.0, 0.0, 100.0, 100.0), PanelFlags::empty());
            ctx.end();
        });
        assert_eq!(ctx.windows.len(), 2);
        ctx.frame(|ctx| {
            ctx.begin("kept", rect(0.0, 0.0, 100.0, 100.0), PanelFlags::empty());
            ctx.end();
        });
        ctx.clear();
        assert_eq!(ctx.windows.len(), 1);
        assert!(ctx.window_find("kept").is_some());
        assert!(ctx.window_find("dropped").is_none());
        assert_eq!(ctx.count, 1);
    }

    #[test]
    fn value_pages_live_with_their_window() {
        let mut ctx = context();
        ctx.begin("w", rect(0.0, 0.0, 100.0, 100.0), PanelFlags::empty());
        assert!(ctx.set_value(7, 42));
        assert_eq!(ctx.find_value(7), Some(42));
        ctx.end();
        assert_eq!(ctx.tables.len(), 1);
        ctx.clear();
        ctx.clear();
        assert_eq!(ctx.tables.len(), 0);
    }

    fn button_frame(ctx: &mut Context) -> bool {
        let mut clicked = false;
        ctx.frame(|ctx| {
            if ctx.begin("btn", rect(0.0, 0.0, 200.0, 100.0), PanelFlags::NO_SCROLLBAR) {
                ctx.layout_row_static(30.0, 80.0, 1);
                clicked = ctx.button_label("ok");
            }
            ctx.end();
        });
        clicked
    }

    #[test]
    fn button_fires_on_the_release_frame() {
        let mut ctx = context();
        assert!(!button_frame(&mut ctx));

        ctx.input_begin();
        ctx.input_motion(30.0, 20.0);
        ctx.input_button(MouseButton::Left, 30.0, 20.0, true);
        ctx.input_end();
        assert!(!button_frame(&mut ctx));

        ctx.input_begin();
        ctx.input_button(MouseButton::Left, 30.0, 20.0, false);
        ctx.input_end();
        assert!(button_frame(&mut ctx));

        ctx.input_begin();
        ctx.input_end();
        assert!(!button_frame(&mut ctx));
    }

    #[test]
    fn extra_fonts_fall_back_to_the_first() {
        let mut ctx = context();
        let id = ctx.add_font(Rc::new(TestFont));
        assert_eq!(id, FontId(1));
        assert_eq!(font_of(&ctx.fonts, FontId(9)).height(), 10.0);
    }
}
