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
//! Tree nodes and tabs: collapsible sections that indent their content while open.

use std::panic::Location;

use crate::widgets::{TextStyle, button_behavior, do_button_symbol, widget_text};
use crate::*;

const WHITE: Color = Color::rgba(255, 255, 255, 255);

fn state_of(value: u32) -> CollapseState { if value == 0 { CollapseState::Minimized } else { CollapseState::Maximized } }

fn value_of(state: CollapseState) -> u32 {
    match state {
        CollapseState::Minimized => 0,
        CollapseState::Maximized => 1,
    }
}

impl Context {
    /// Draws the header row and flips `state` on a click. An open tree indents the panel.
    fn tree_state_base(&mut self, kind: TreeType, img: Option<Image>, title: &str, state: &mut CollapseState) -> bool {
        if self.current.is_none() {
            return false;
        }
        let row_height = self.font().height() + 2.0 * self.style.tab.padding.y;
        self.layout_row_dynamic(row_height, 1);
        let (header, layout_state) = self.widget();

        let current = *state;
        let toggled = self
            .with_widget(layout_state == WidgetLayoutState::Valid, |ws, w, style| {
                let tab = &style.tab;
                let spacing = style.window.spacing;
                let background = match kind {
                    TreeType::Tab => match tab.background {
                        StyleItem::Image(img) => {
                            w.draw.draw_image(header, &img, WHITE);
                            Color::default()
                        }
                        StyleItem::Color(c) => {
                            w.draw.fill_rect(header, 0.0, tab.border_color);
                            w.draw.fill_rect(header.shrink(tab.border), tab.rounding, c);
                            c
                        }
                        StyleItem::Hide => Color::default(),
                    },
                    TreeType::Node => style.window.background,
                };

                let toggled = button_behavior(ws, header, w.input, ButtonBehavior::Default);

                let (symbol, button) = match (current, kind) {
                    (CollapseState::Maximized, TreeType::Tab) => (tab.sym_maximize, &tab.tab_maximize_button),
                    (CollapseState::Maximized, TreeType::Node) => (tab.sym_maximize, &tab.node_maximize_button),
                    (CollapseState::Minimized, TreeType::Tab) => (tab.sym_minimize, &tab.tab_minimize_button),
                    (CollapseState::Minimized, TreeType::Node) => (tab.sym_minimize, &tab.node_minimize_button),
                };
                let height = w.font.height();
                let mut sym = Rect::new(header.x + tab.padding.x, header.y + tab.padding.y, height, height);
                // the symbol only shows the state, the whole header reacts to clicks
                let input = w.input.take();
                let mut sym_state = WidgetStates::empty();
                do_button_symbol(&mut sym_state, w, sym, symbol, ButtonBehavior::Default, button);
                w.input = input;

                if let Some(img) = img {
                    sym.x += sym.w + 4.0 * spacing.x;
                    w.draw.draw_image(sym, &img, WHITE);
                    sym.w = height + tab.spacing.x;
                }

                let header_w = header.w.max(sym.w + spacing.x);
                let label = Rect::new(sym.x + sym.w + spacing.x, sym.y, header_w - (sym.w + spacing.y + tab.indent), height);
                let text = TextStyle { padding: Vec2::default(), background, color: tab.text };
                widget_text(&mut w.draw, w.font, label, title, &text, TextAlign::TEXT_LEFT);
                toggled
            })
            .unwrap_or(false);

        if toggled {
            *state = match current {
                CollapseState::Maximized => CollapseState::Minimized,
                CollapseState::Minimized => CollapseState::Maximized,
            };
        }
        if *state == CollapseState::Minimized {
            return false;
        }
        let indent = self.style.tab.indent;
        let Some(layout) = self.panel_mut() else { return false };
        layout.at_x += indent;
        layout.bounds.w = layout.bounds.w.max(indent) - indent;
        layout.row.tree_depth += 1;
        true
    }

    fn tree_base(&mut self, kind: TreeType, img: Option<Image>, title: &str, initial: CollapseState, key: Hash) -> bool {
        let mut state = self.find_value(key).map(state_of).unwrap_or(initial);
        let open = self.tree_state_base(kind, img, title, &mut state);
        self.set_value(key, value_of(state));
        open
    }

    /// Starts a collapsible section whose state is kept in the window and keyed by the calling
    /// source location. Returns `true` while open; only then must [`Context::tree_pop`] follow.
    /// Use [`Context::tree_push_id`] when calling from a loop.
    #[track_caller]
    pub fn tree_push(&mut self, kind: TreeType, title: &str, initial: CollapseState) -> bool {
        let at = Location::caller();
        self.tree_push_hashed(kind, title, initial, at.file().as_bytes(), at.line())
    }

    /// Like [`Context::tree_push`] with `id` telling apart sections declared at the same line.
    #[track_caller]
    pub fn tree_push_id(&mut self, kind: TreeType, title: &str, initial: CollapseState, id: u32) -> bool {
        let at = Location::caller();
        self.tree_push_hashed(kind, title, initial, at.file().as_bytes(), id)
    }

    /// Like [`Context::tree_push`] with the state keyed by `hash` and `seed`.
    pub fn tree_push_hashed(&mut self, kind: TreeType, title: &str, initial: CollapseState, hash: &[u8], seed: u32) -> bool {
        self.tree_base(kind, None, title, initial, murmur_hash(hash, seed))
    }

    /// Tree header with an image in front of the title.
    #[track_caller]
    pub fn tree_image_push(&mut self, kind: TreeType, img: Image, title: &str, initial: CollapseState) -> bool {
        let at = Location::caller();
        self.tree_base(kind, Some(img), title, initial, murmur_hash(at.file().as_bytes(), at.line()))
    }

    /// Image tree header keyed by `hash` and `seed`.
    pub fn tree_image_push_hashed(&mut self, kind: TreeType, img: Image, title: &str, initial: CollapseState, hash: &[u8], seed: u32) -> bool {
        self.tree_base(kind, Some(img), title, initial, murmur_hash(hash, seed))
    }

    /// Ends a section opened by one of the `tree_push` calls.
    pub fn tree_pop(&mut self) { self.tree_state_pop(); }

    /// Collapsible section whose state is held by the caller.
    pub fn tree_state_push(&mut self, kind: TreeType, title: &str, state: &mut CollapseState) -> bool { self.tree_state_base(kind, None, title, state) }

    /// Caller held section with an image in front of the title.
    pub fn tree_state_image_push(&mut self, kind: TreeType, img: Image, title: &str, state: &mut CollapseState) -> bool {
        self.tree_state_base(kind, Some(img), title, state)
    }

    /// Ends a section opened by [`Context::tree_state_push`].
    pub fn tree_state_pop(&mut self) {
        let indent = self.style.tab.indent;
        let Some(layout) = self.panel_mut() else { return };
        if layout.row.tree_depth == 0 {
            debug_assert!(false, "tree pop without a matching push");
            return;
        }
        layout.at_x -= indent;
        layout.bounds.w += indent;
        layout.row.tree_depth -= 1;
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

    fn click(ctx: &mut Context, x: f32, y: f32, down: bool) {
        ctx.input_begin();
        ctx.input_motion(x, y);
        ctx.input_button(MouseButton::Left, x, y, down);
        ctx.input_end();
    }

    /// Runs a frame with a tab holding one label and returns whether it was open and where the
    /// label went.
    fn tree_frame(ctx: &mut Context, initial: CollapseState) -> (bool, Option<Rect>) {
        let mut out = (false, None);
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            if ctx.tree_push(TreeType::Tab, "section", initial) {
                ctx.layout_row_dynamic(20.0, 1);
                out = (true, Some(ctx.widget().0));
                ctx.tree_pop();
            }
            assert_eq!(ctx.panel().map(|p| p.row.tree_depth), Some(0));
            ctx.end();
        });
        out
    }

    #[test]
    fn open_tree_indents_its_content() {
        let mut ctx = context();
        let (open, item) = tree_frame(&mut ctx, CollapseState::Maximized);
        assert!(open);
        // the header row is 18 high plus spacing, the content is shifted by the 10 pixel indent
        assert_eq!(item, Some(rect(18.0, 26.0, 274.0, 20.0)));
        let texts: Vec<String> = ctx
            .commands()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["section"]);
    }

    #[test]
    fn header_click_toggles_the_stored_state() {
        let mut ctx = context();
        assert!(!tree_frame(&mut ctx, CollapseState::Minimized).0);
        // header spans (8, 4, 284, 18)
        click(&mut ctx, 50.0, 8.0, true);
        assert!(!tree_frame(&mut ctx, CollapseState::Minimized).0);
        click(&mut ctx, 50.0, 8.0, false);
        assert!(tree_frame(&mut ctx, CollapseState::Minimized).0);
        // the initial state no longer matters once stored
        ctx.input_begin();
        ctx.input_end();
        assert!(tree_frame(&mut ctx, CollapseState::Minimized).0);
    }

    #[test]
    fn nested_pops_restore_the_row_origin() {
        let mut ctx = context();
        let mut outer = CollapseState::Maximized;
        let mut inner = CollapseState::Maximized;
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            ctx.layout_row_dynamic(20.0, 1);
            let before = ctx.widget().0;
            assert!(ctx.tree_state_push(TreeType::Node, "a", &mut outer));
            assert!(ctx.tree_state_push(TreeType::Node, "b", &mut inner));
            assert_eq!(ctx.panel().map(|p| p.row.tree_depth), Some(2));
            ctx.layout_row_dynamic(20.0, 1);
            let deep = ctx.widget().0;
            ctx.tree_state_pop();
            ctx.tree_state_pop();
            ctx.layout_row_dynamic(20.0, 1);
            let after = ctx.widget().0;
            assert_eq!(deep.x, before.x + 20.0);
            assert_eq!(deep.w, before.w - 20.0);
            assert_eq!((after.x, after.w), (before.x, before.w));
            ctx.end();
        });
    }

    #[test]
    fn collapsed_state_is_written_back() {
        let mut ctx = context();
        let mut state = CollapseState::Minimized;
        click(&mut ctx, 50.0, 8.0, true);
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            assert!(!ctx.tree_state_push(TreeType::Node, "n", &mut state));
            ctx.end();
        });
        click(&mut ctx, 50.0, 8.0, false);
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            assert!(ctx.tree_state_push(TreeType::Node, "n", &mut state));
            ctx.tree_state_pop();
            ctx.end();
        });
        assert_eq!(state, CollapseState::Maximized);
    }
}
