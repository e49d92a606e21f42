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
//! Groups: scrollable sub panels laid out like a widget inside the current window.

use crate::draw_context::DrawCtx;
use crate::panel::{Panel, ScrollSink};
use crate::util::{GROUP_SEED, hash_str};
use crate::*;

impl Context {
    pub(crate) fn group_offset_key(name: &str) -> Hash { hash_str(name, GROUP_SEED) }

    /// Scroll offset stored for the group `name` of the current window.
    pub fn group_get_scroll(&mut self, name: &str) -> Vec2 {
        let key = Self::group_offset_key(name);
        let x = self.find_value(key).unwrap_or(0);
        let y = self.find_value(key.wrapping_add(1)).unwrap_or(0);
        vec2(x as f32, y as f32)
    }

    /// Overrides the stored scroll offset of the group `name` of the current window.
    pub fn group_set_scroll(&mut self, name: &str, offset: Vec2) {
        let key = Self::group_offset_key(name);
        self.set_value(key, offset.x.max(0.0) as u32);
        self.set_value(key.wrapping_add(1), offset.y.max(0.0) as u32);
    }

    pub(crate) fn group_begin_with(&mut self, title: Option<&str>, flags: PanelFlags, offset: Vec2, sink: ScrollSink) -> bool {
        let Some(cur) = self.current else { return false };
        let Some(parent) = self.panel() else {
            debug_assert!(false, "group outside of a window");
            return false;
        };
        let clip = parent.clip;
        let bounds = self.alloc_space();
        if !clip.intersects(&bounds) && !flags.contains(PanelFlags::MOVABLE) {
            return false;
        }
        let mut flags = flags & PanelFlags::PUBLIC;
        if self.windows.get(cur).is_some_and(|w| w.flags.contains(PanelFlags::ROM)) {
            flags |= PanelFlags::ROM;
        }
        let Some(win) = self.windows.get_mut(cur) else { return false };
        let mut panel = Panel::new(PanelType::GROUP, bounds, flags, offset);
        panel.sink = sink;
        win.layout.push(panel);

        let title = title.filter(|_| flags.contains(PanelFlags::TITLE));
        let visible = self.panel_begin(title, PanelType::GROUP);
        if !visible {
            self.group_end_with();
        }
        visible
    }

    /// Closes the innermost group, returning its final scroll offset.
    fn group_end_with(&mut self) -> Option<Vec2> {
        let cur = self.current?;
        let Context { windows, memory, .. } = self;
        let win = windows.get_mut(cur)?;
        let n = win.layout.len();
        if n < 2 || !win.layout[n - 1].kind.contains(PanelType::GROUP) {
            debug_assert!(false, "group end without a matching begin");
            return None;
        }
        let parent_clip = win.layout[n - 2].clip;
        let g = &win.layout[n - 1];
        let area = Rect::new(g.outer.x, g.outer.y, g.outer.w, g.outer.h);
        DrawCtx::new(memory, &mut win.buffer).push_scissor(parent_clip.unify(&area));

        self.panel_end();

        let Context { windows, memory, .. } = self;
        let win = windows.get_mut(cur)?;
        let g = win.layout.pop()?;
        DrawCtx::new(memory, &mut win.buffer).push_scissor(parent_clip);
        if let ScrollSink::Table(key) = g.sink {
            self.set_value(key, g.offset.x.max(0.0) as u32);
            self.set_value(key.wrapping_add(1), g.offset.y.max(0.0) as u32);
        }
        Some(g.offset)
    }

    /// Starts a group whose scroll offset is kept in the window under `name`. Returns `true`
    /// if the group is visible; only then must [`Context::group_end`] be called.
    pub fn group_begin(&mut self, name: &str, flags: PanelFlags) -> bool { self.group_begin_titled(name, name, flags) }

    /// Like [`Context::group_begin`] with a title that differs from the identifying name.
    pub fn group_begin_titled(&mut self, name: &str, title: &str, flags: PanelFlags) -> bool {
        if self.current.is_none() {
            return false;
        }
        let key = Self::group_offset_key(name);
        let offset = self.group_get_scroll(name);
        self.group_begin_with(Some(title), flags, offset, ScrollSink::Table(key))
    }

    /// Ends a group started with [`Context::group_begin`].
    pub fn group_end(&mut self) { self.group_end_with(); }

    /// Starts a group scrolled by the caller-held `offset`.
    pub fn group_scrolled_offset_begin(&mut self, offset: Vec2, title: &str, flags: PanelFlags) -> bool {
        self.group_begin_with(Some(title), flags, offset, ScrollSink::Caller)
    }

    /// Ends a caller-scrolled group and returns the offset to keep for the next frame.
    pub fn group_scrolled_offset_end(&mut self) -> Vec2 { self.group_end_with().unwrap_or_default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use std::rc::Rc;

    fn context() -> Context {
        let mut ctx = Context::new(Rc::new(TestFont));
        ctx.style_mut().window.padding = vec2(10.0, 10.0);
        ctx.style_mut().window.group_padding = vec2(4.0, 4.0);
        ctx.style_mut().window.spacing = vec2(5.0, 5.0);
        ctx.input_begin();
        ctx.input_end();
        ctx
    }

    #[test]
    fn widgets_are_placed_inside_the_group() {
        let mut ctx = context();
        assert!(ctx.begin("g", rect(0.0, 0.0, 320.0, 400.0), PanelFlags::NO_SCROLLBAR));
        ctx.layout_row_dynamic(100.0, 1);
        assert!(ctx.group_begin("list", PanelFlags::empty()));
        ctx.layout_row_dynamic(20.0, 1);
        let (a, _) = ctx.widget();
        ctx.group_end();
        // the group is popped and the window row continues
        assert_eq!(ctx.panel().map(|p| p.kind), Some(PanelType::WINDOW));
        assert_eq!(ctx.group_get_scroll("list"), vec2(0.0, 0.0));
        ctx.end();
        assert_eq!((a.x, a.y), (28.0, 14.0));
    }

    #[test]
    fn stored_offset_scrolls_the_content() {
        let mut ctx = context();
        assert!(ctx.begin("g", rect(0.0, 0.0, 320.0, 400.0), PanelFlags::NO_SCROLLBAR));
        ctx.layout_row_dynamic(100.0, 1);
        ctx.group_set_scroll("list", vec2(0.0, 30.0));
        assert!(ctx.group_begin("list", PanelFlags::NO_SCROLLBAR));
        ctx.layout_row_dynamic(20.0, 1);
        let (a, _) = ctx.widget();
        ctx.group_end();
        ctx.end();
        assert_eq!(a.y, -16.0);
    }

    #[test]
    fn caller_offsets_come_back_from_end() {
        let mut ctx = context();
        assert!(ctx.begin("g", rect(0.0, 0.0, 320.0, 400.0), PanelFlags::NO_SCROLLBAR));
        ctx.layout_row_dynamic(100.0, 1);
        assert!(ctx.group_scrolled_offset_begin(vec2(3.0, 0.0), "free", PanelFlags::NO_SCROLLBAR));
        let offset = ctx.group_scrolled_offset_end();
        ctx.end();
        assert_eq!(offset, vec2(3.0, 0.0));
    }
}
