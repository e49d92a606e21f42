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
//! Menubars, drop down menus and combo boxes. Both menus and combos open a non blocking popup
//! below their header widget.

use crate::draw_context::DrawCtx;
use crate::panel::panel_padding;
use crate::util::hash_str;
use crate::widgets::{FontRef, TextStyle, WidgetCtx, button_behavior, by_state, do_button_image, do_button_symbol, do_button_text, do_button_text_image, do_button_text_symbol, draw_button_symbol, draw_symbol, widget_text};
use crate::*;

impl Context {
    /// Starts a menubar. Must be the first call after [`Context::begin`].
    pub fn menubar_begin(&mut self) {
        let Some(layout) = self.panel_mut() else { return };
        if layout.flags.intersects(PanelFlags::HIDDEN | PanelFlags::MINIMIZED) {
            return;
        }
        layout.menu.x = layout.at_x;
        layout.menu.y = layout.at_y + layout.row.height;
        layout.menu.w = layout.bounds.w;
        layout.menu.offset = layout.offset;
        layout.offset.y = 0.0;
    }

    /// Ends the menubar; the panel content starts below it and does not scroll it away.
    pub fn menubar_end(&mut self) {
        let Some(cur) = self.current else { return };
        let spacing = self.style.window.spacing;
        let Context { windows, memory, .. } = self;
        let Some(win) = windows.get_mut(cur) else { return };
        let Some(layout) = win.layout.last_mut() else { return };
        if layout.flags.intersects(PanelFlags::HIDDEN | PanelFlags::MINIMIZED) {
            return;
        }
        layout.menu.h = layout.at_y - layout.menu.y;
        let taken = layout.menu.h + spacing.y + layout.row.height;
        layout.bounds.y += taken;
        layout.bounds.h -= taken;
        layout.offset = layout.menu.offset;
        layout.at_y = layout.bounds.y - layout.row.height;
        layout.clip.y = layout.bounds.y;
        layout.clip.h = layout.bounds.h;
        let clip = layout.clip;
        DrawCtx::new(memory, &mut win.buffer).push_scissor(clip);
    }

    fn menu_begin(&mut self, id: &str, is_clicked: bool, header: Rect, size: Vec2) -> bool {
        let Some(cur) = self.current else { return false };
        let hash = hash_str(id, PanelType::MENU.bits());
        let body = Rect::new(header.x, header.y + header.h, size.x, size.y);
        let Some(win) = self.windows.get(cur) else { return false };
        let is_open = win.popup.win.is_some();
        let is_active = is_open && win.popup.name == hash && win.popup.kind == PanelType::MENU;
        if (is_open && !is_active) || (!is_open && !is_clicked) {
            return false;
        }
        if !self.nonblock_begin(PanelFlags::NO_SCROLLBAR, body, header, PanelType::MENU) {
            return false;
        }
        if let Some(win) = self.windows.get_mut(cur) {
            win.popup.kind = PanelType::MENU;
            win.popup.name = hash;
        }
        true
    }

    /// Lays out the menu header widget and runs `f` on it, returning the header and whether it
    /// was clicked.
    fn menu_header(&mut self, f: impl FnOnce(&mut WidgetStates, &mut WidgetCtx<'_>, Rect, &StyleButton) -> bool) -> Option<(Rect, bool)> {
        let (header, state) = self.widget();
        if state == WidgetLayoutState::Invalid {
            return None;
        }
        let clicked = self.with_widget(state == WidgetLayoutState::Valid, |ws, w, s| f(ws, w, header, &s.menu_button)).unwrap_or(false);
        Some((header, clicked))
    }

    /// Menu whose header shows `title`. Returns `true` while the menu is open; only then must
    /// [`Context::menu_end`] be called.
    pub fn menu_begin_label(&mut self, title: &str, align: TextAlign, size: Vec2) -> bool {
        let Some((header, clicked)) = self.menu_header(|ws, w, r, s| do_button_text(ws, w, r, title, align, ButtonBehavior::Default, s)) else {
            return false;
        };
        self.menu_begin(title, clicked, header, size)
    }

    /// Menu whose header shows an image. `id` identifies the menu.
    pub fn menu_begin_image(&mut self, id: &str, img: Image, size: Vec2) -> bool {
        let Some((header, clicked)) = self.menu_header(|ws, w, r, s| do_button_image(ws, w, r, &img, ButtonBehavior::Default, s)) else {
            return false;
        };
        self.menu_begin(id, clicked, header, size)
    }

    /// Menu whose header shows a symbol. `id` identifies the menu.
    pub fn menu_begin_symbol(&mut self, id: &str, symbol: Symbol, size: Vec2) -> bool {
        let Some((header, clicked)) = self.menu_header(|ws, w, r, s| do_button_symbol(ws, w, r, symbol, ButtonBehavior::Default, s)) else {
            return false;
        };
        self.menu_begin(id, clicked, header, size)
    }

    /// Menu whose header shows an image next to `title`.
    pub fn menu_begin_image_label(&mut self, title: &str, align: TextAlign, img: Image, size: Vec2) -> bool {
        let Some((header, clicked)) = self.menu_header(|ws, w, r, s| do_button_text_image(ws, w, r, &img, title, align, ButtonBehavior::Default, s)) else {
            return false;
        };
        self.menu_begin(title, clicked, header, size)
    }

    /// Menu whose header shows a symbol next to `title`.
    pub fn menu_begin_symbol_label(&mut self, title: &str, align: TextAlign, symbol: Symbol, size: Vec2) -> bool {
        let Some((header, clicked)) = self.menu_header(|ws, w, r, s| do_button_text_symbol(ws, w, r, symbol, title, align, ButtonBehavior::Default, s)) else {
            return false;
        };
        self.menu_begin(title, clicked, header, size)
    }

    /// Menu entry; clicking it closes the menu.
    pub fn menu_item_label(&mut self, text: &str, align: TextAlign) -> bool { self.contextual_item_label(text, align) }

    /// Menu entry with an image.
    pub fn menu_item_image_label(&mut self, img: Image, text: &str, align: TextAlign) -> bool { self.contextual_item_image_label(img, text, align) }

    /// Menu entry with a symbol.
    pub fn menu_item_symbol_label(&mut self, symbol: Symbol, text: &str, align: TextAlign) -> bool { self.contextual_item_symbol_label(symbol, text, align) }

    /// Closes the open menu.
    pub fn menu_close(&mut self) { self.contextual_close(); }

    /// Ends an open menu.
    pub fn menu_end(&mut self) { self.contextual_end(); }
}

/// Drop down button of a combo header and the symbol area inside it.
fn combo_button(header: Rect, style: &StyleCombo) -> (Rect, Rect) {
    let w = header.h - 2.0 * style.button_padding.y;
    let button = Rect::new((header.x + header.w - header.h) - style.button_padding.x, header.y + style.button_padding.y, w, w);
    (button, button.pad(style.button.padding))
}

/// What a combo header shows next to its drop down button.
enum ComboContent<'a> {
    Label(&'a str),
    Color(Color),
    Symbol(Symbol),
    SymbolLabel(Symbol, &'a str),
    Image(Image),
    ImageLabel(Image, &'a str),
}

fn draw_combo_content(d: &mut DrawCtx<'_>, font: FontRef<'_>, header: Rect, button: Rect, state: WidgetStates, style: &StyleCombo, content: &ComboContent<'_>) {
    let background = by_state(state, style.normal, style.hover, style.active).color();
    let color = by_state(state, style.label_normal, style.label_hover, style.label_active);
    let text = TextStyle { padding: Vec2::default(), background, color };
    let pad = style.content_padding;
    let inner = Rect::new(header.x + pad.x, header.y + pad.y, 0.0, header.h - 2.0 * pad.y);
    let icon = Rect::new(inner.x, inner.y, inner.h, inner.h);
    let label_rect = {
        let x = icon.x + icon.w + style.spacing.x + pad.x;
        Rect::new(x, inner.y, (button.x - pad.x) - x, inner.h)
    };
    match *content {
        ComboContent::Label(label) => {
            let r = Rect::new(inner.x, inner.y, button.x - (pad.x + style.spacing.x) - inner.x, inner.h);
            widget_text(d, font, r, label, &text, TextAlign::TEXT_LEFT);
        }
        ComboContent::Color(c) => {
            let x = header.x + 2.0 * pad.x;
            let r = Rect::new(x, header.y + 2.0 * pad.y, (button.x - (pad.x + style.spacing.x)) - x, header.h - 4.0 * pad.y);
            d.fill_rect(r, 0.0, c);
        }
        ComboContent::Symbol(symbol) => {
            let r = Rect::new(inner.x, inner.y, (button.x - pad.y) - inner.x, inner.h);
            draw_symbol(d, font, symbol, r, background, color, 1.0);
        }
        ComboContent::SymbolLabel(symbol, label) => {
            draw_symbol(d, font, symbol, icon, background, color, 1.0);
            widget_text(d, font, label_rect, label, &text, TextAlign::TEXT_LEFT);
        }
        ComboContent::Image(img) => {
            let r = Rect::new(inner.x, inner.y, (button.x - pad.y) - inner.x, inner.h);
            d.draw_image(r, &img, Color::rgba(255, 255, 255, 255));
        }
        ComboContent::ImageLabel(img, label) => {
            d.draw_image(icon, &img, Color::rgba(255, 255, 255, 255));
            widget_text(d, font, label_rect, label, &text, TextAlign::TEXT_LEFT);
        }
    }
}

impl Context {
    fn combo_begin(&mut self, size: Vec2, is_clicked: bool, header: Rect) -> bool {
        let Some(cur) = self.current else { return false };
        let body = Rect::new(header.x, header.y + header.h - self.style.window.combo_border, size.x, size.y);
        let Some(win) = self.windows.get_mut(cur) else { return false };
        let hash = win.popup.combo_count;
        win.popup.combo_count += 1;
        let is_open = win.popup.win.is_some();
        let is_active = is_open && win.popup.name == hash && win.popup.kind == PanelType::COMBO;
        if (is_open && !is_active) || (!is_open && !is_clicked) {
            return false;
        }
        let close_area = if is_clicked && is_open { Rect::default() } else { header };
        if !self.nonblock_begin(PanelFlags::empty(), body, close_area, PanelType::COMBO) {
            return false;
        }
        if let Some(win) = self.windows.get_mut(cur) {
            win.popup.kind = PanelType::COMBO;
            win.popup.name = hash;
        }
        true
    }

    fn combo_header(&mut self, size: Vec2, content: ComboContent<'_>) -> bool {
        let (header, state) = self.widget();
        if state == WidgetLayoutState::Invalid {
            return false;
        }
        let clicked = self
            .with_widget(state == WidgetLayoutState::Valid, |ws, w, s| {
                let clicked = button_behavior(ws, header, w.input, ButtonBehavior::Default);
                let state = *ws;
                let style = &s.combo;
                match by_state(state, style.normal, style.hover, style.active) {
                    StyleItem::Image(img) => w.draw.draw_image(header, &img, Color::rgba(255, 255, 255, 255)),
                    StyleItem::Color(c) => {
                        w.draw.fill_rect(header, style.rounding, c);
                        w.draw.stroke_rect(header, style.rounding, style.border, style.border_color);
                    }
                    StyleItem::Hide => {}
                }
                let symbol = if state.is_hovered() {
                    style.sym_hover
                } else if clicked {
                    style.sym_active
                } else {
                    style.sym_normal
                };
                let (button, inner) = combo_button(header, style);
                draw_combo_content(&mut w.draw, w.font, header, button, state, style, &content);
                draw_button_symbol(&mut w.draw, w.font, button, inner, state, &style.button, symbol);
                clicked
            })
            .unwrap_or(false);
        self.combo_begin(size, clicked, header)
    }

    /// Combo box showing `selected`. Returns `true` while the drop down is open; only then must
    /// [`Context::combo_end`] be called.
    pub fn combo_begin_label(&mut self, selected: &str, size: Vec2) -> bool { self.combo_header(size, ComboContent::Label(selected)) }

    /// Combo box showing a color swatch.
    pub fn combo_begin_color(&mut self, color: Color, size: Vec2) -> bool { self.combo_header(size, ComboContent::Color(color)) }

    /// Combo box showing a symbol.
    pub fn combo_begin_symbol(&mut self, symbol: Symbol, size: Vec2) -> bool { self.combo_header(size, ComboContent::Symbol(symbol)) }

    /// Combo box showing a symbol next to `selected`.
    pub fn combo_begin_symbol_label(&mut self, selected: &str, symbol: Symbol, size: Vec2) -> bool {
        self.combo_header(size, ComboContent::SymbolLabel(symbol, selected))
    }

    /// Combo box showing an image.
    pub fn combo_begin_image(&mut self, img: Image, size: Vec2) -> bool { self.combo_header(size, ComboContent::Image(img)) }

    /// Combo box showing an image next to `selected`.
    pub fn combo_begin_image_label(&mut self, selected: &str, img: Image, size: Vec2) -> bool {
        self.combo_header(size, ComboContent::ImageLabel(img, selected))
    }

    /// Drop down entry; clicking it closes the combo.
    pub fn combo_item_label(&mut self, text: &str, align: TextAlign) -> bool { self.contextual_item_label(text, align) }

    /// Drop down entry with an image.
    pub fn combo_item_image_label(&mut self, img: Image, text: &str, align: TextAlign) -> bool { self.contextual_item_image_label(img, text, align) }

    /// Drop down entry with a symbol.
    pub fn combo_item_symbol_label(&mut self, symbol: Symbol, text: &str, align: TextAlign) -> bool { self.contextual_item_symbol_label(symbol, text, align) }

    /// Closes the open drop down.
    pub fn combo_close(&mut self) { self.contextual_close(); }

    /// Ends an open drop down.
    pub fn combo_end(&mut self) { self.contextual_end(); }

    /// Combo box listing `items`, each `item_height` tall. The drop down is at most `size` and
    /// shrinks to fit the items. Returns the selected index.
    pub fn combo(&mut self, items: &[&str], selected: usize, item_height: f32, size: Vec2) -> usize {
        let Some(current) = items.get(selected).or_else(|| items.first()) else { return selected };
        let Some(kind) = self.panel().map(|p| p.kind) else { return selected };
        let spacing = self.style.window.spacing;
        let padding = panel_padding(&self.style, kind);
        let count = items.len() as f32;
        let max_height = count * item_height + count * spacing.y.trunc() + spacing.y.trunc() * 2.0 + padding.y.trunc() * 2.0;
        let size = vec2(size.x, size.y.min(max_height));

        let mut selected = selected;
        if self.combo_begin_label(current, size) {
            self.layout_row_dynamic(item_height, 1);
            for (i, item) in items.iter().enumerate() {
                if self.combo_item_label(item, TextAlign::TEXT_LEFT) {
                    selected = i;
                }
            }
            self.combo_end();
        }
        selected
    }

    /// Like [`Context::combo`] with `items` separated by `separator`.
    pub fn combo_separator(&mut self, items: &str, separator: char, selected: usize, item_height: f32, size: Vec2) -> usize {
        let items: Vec<&str> = items.split(separator).collect();
        self.combo(&items, selected, item_height, size)
    }

    /// Combo box listing `count` items produced by `item`.
    pub fn combo_callback<'a>(&mut self, item: impl Fn(usize) -> &'a str, count: usize, selected: usize, item_height: f32, size: Vec2) -> usize {
        let items: Vec<&str> = (0..count).map(item).collect();
        self.combo(&items, selected, item_height, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use std::rc::Rc;

    fn context() -> Context {
        let mut ctx = Context::new(Rc::new(TestFont));
        ctx.style_mut().window.padding = vec2(10.0, 10.0);
        ctx.style_mut().window.spacing = vec2(4.0, 4.0);
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

    fn idle(ctx: &mut Context) {
        ctx.input_begin();
        ctx.input_end();
    }

    #[test]
    fn menubar_pushes_the_content_down() {
        let mut ctx = context();
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            ctx.menubar_begin();
            ctx.layout_row_static(20.0, 60.0, 1);
            let (m, _) = ctx.widget();
            ctx.menubar_end();
            ctx.layout_row_dynamic(20.0, 1);
            let (a, _) = ctx.widget();
            let clip = ctx.panel().map(|p| p.clip);
            ctx.end();
            assert_eq!(m.y, 10.0);
            assert_eq!(a.y, 28.0);
            assert_eq!(clip.map(|c| c.y), Some(28.0));
        });
    }

    fn menu_frame(ctx: &mut Context) -> bool {
        let mut open = false;
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            ctx.menubar_begin();
            ctx.layout_row_static(20.0, 60.0, 1);
            if ctx.menu_begin_label("File", TextAlign::TEXT_LEFT, vec2(120.0, 200.0)) {
                open = true;
                ctx.layout_row_dynamic(20.0, 1);
                ctx.menu_item_label("Open", TextAlign::TEXT_LEFT);
                ctx.menu_end();
            }
            ctx.menubar_end();
            ctx.end();
        });
        open
    }

    #[test]
    fn menu_opens_on_header_click_and_closes_outside() {
        let mut ctx = context();
        assert!(!menu_frame(&mut ctx));
        // header is (20, 10, 60, 20)
        click(&mut ctx, 20.0, 15.0, true);
        assert!(!menu_frame(&mut ctx));
        click(&mut ctx, 20.0, 15.0, false);
        assert!(menu_frame(&mut ctx));
        idle(&mut ctx);
        assert!(menu_frame(&mut ctx));
        let popup = ctx.window_find("w").and_then(|w| w.popup.win).and_then(|p| ctx.windows.get(p));
        assert_eq!(popup.map(|p| p.bounds.pos()), Some(vec2(20.0, 30.0)));

        click(&mut ctx, 250.0, 280.0, true);
        assert!(!menu_frame(&mut ctx));
        idle(&mut ctx);
        assert!(!menu_frame(&mut ctx));
    }

    fn combo_frame(ctx: &mut Context, selected: usize) -> usize {
        let mut out = selected;
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            ctx.layout_row_static(30.0, 120.0, 1);
            out = ctx.combo(&["red", "green", "blue"], selected, 20.0, vec2(120.0, 200.0));
            ctx.end();
        });
        out
    }

    #[test]
    fn combo_picks_an_item_and_closes() {
        let mut ctx = context();
        // header is (20, 10, 120, 30), the drop down starts at y 39
        click(&mut ctx, 50.0, 25.0, true);
        assert_eq!(combo_frame(&mut ctx, 1), 1);
        click(&mut ctx, 50.0, 25.0, false);
        assert_eq!(combo_frame(&mut ctx, 1), 1);
        let popup = ctx.window_find("w").and_then(|w| w.popup.win).and_then(|p| ctx.windows.get(p));
        // three items of 20 with spacing plus padding
        assert_eq!(popup.map(|p| p.bounds), Some(rect(20.0, 39.0, 120.0, 100.0)));

        click(&mut ctx, 50.0, 54.0, true);
        assert_eq!(combo_frame(&mut ctx, 1), 1);
        click(&mut ctx, 50.0, 54.0, false);
        assert_eq!(combo_frame(&mut ctx, 1), 0);
        idle(&mut ctx);
        combo_frame(&mut ctx, 0);
        assert!(ctx.window_find("w").is_some_and(|w| w.popup.win.is_none()));
    }

    #[test]
    fn combo_separator_splits_items() {
        let mut ctx = context();
        ctx.frame(|ctx| {
            ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR);
            ctx.layout_row_static(30.0, 120.0, 1);
            assert_eq!(ctx.combo_separator("a|b|c", '|', 2, 20.0, vec2(120.0, 200.0)), 2);
            ctx.end();
        });
        let texts: Vec<String> = ctx
            .commands()
            .filter_map(|c| match c {
                Command::Text { text, .. } => Some(text.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["c"]);
    }
}
