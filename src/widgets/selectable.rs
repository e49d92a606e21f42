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
//! Selectable labels: text that toggles a selection flag when clicked.

use crate::draw_context::DrawCtx;
use crate::style::with_custom_draw;
use crate::widgets::{FontRef, TextStyle, WidgetCtx, button_behavior, draw_symbol, widget_text};
use crate::*;

#[derive(Copy, Clone)]
enum Icon<'a> {
    None,
    Symbol(Symbol),
    Image(&'a Image),
}

/// Background and text color of a selectable for its state and selection.
fn selectable_colors(state: WidgetStates, style: &StyleSelectable, selected: bool) -> (StyleItem, Color) {
    match (selected, state.is_active(), state.is_hovered()) {
        (false, true, _) => (style.pressed, style.text_pressed),
        (false, false, true) => (style.hover, style.text_hover),
        (false, false, false) => (style.normal, style.text_normal),
        (true, true, _) => (style.pressed_active, style.text_pressed_active),
        (true, false, true) => (style.hover_active, style.text_hover_active),
        (true, false, false) => (style.normal_active, style.text_normal_active),
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_selectable(draw: &mut DrawCtx<'_>, font: FontRef<'_>, state: WidgetStates, style: &StyleSelectable, selected: bool, bounds: Rect, icon: Rect, img: Icon<'_>, text: &str, align: TextAlign) {
    let (background, color) = selectable_colors(state, style, selected);
    let text_bg = match background {
        StyleItem::Image(img) => {
            draw.draw_image(bounds, &img, Color::rgba(255, 255, 255, 255));
            Color::rgba(0, 0, 0, 0)
        }
        StyleItem::Color(c) => {
            draw.fill_rect(bounds, style.rounding, c);
            c
        }
        StyleItem::Hide => style.text_background,
    };
    match img {
        Icon::Image(i) => draw.draw_image(icon, i, Color::rgba(255, 255, 255, 255)),
        Icon::Symbol(s) => draw_symbol(draw, font, s, icon, text_bg, color, 1.0),
        Icon::None => {}
    }
    let t = TextStyle { padding: style.padding, background: text_bg, color };
    widget_text(draw, font, bounds, text, &t, align);
}

#[allow(clippy::too_many_arguments)]
fn do_selectable(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, bounds: Rect, text: &str, align: TextAlign, selected: &mut bool, icon: Icon<'_>, style: &StyleSelectable) -> bool {
    let old = *selected;
    let touch = bounds.grow(style.touch_padding);
    if button_behavior(state, touch, w.input, ButtonBehavior::Default) {
        *selected = !*selected;
    }

    let mut icon_rect = Rect::new(0.0, bounds.y + style.padding.y, 0.0, bounds.h - 2.0 * style.padding.y);
    icon_rect.w = icon_rect.h;
    icon_rect.x = if align.contains(TextAlign::LEFT) {
        ((bounds.x + bounds.w) - (2.0 * style.padding.x + icon_rect.w)).max(0.0)
    } else {
        bounds.x + 2.0 * style.padding.x
    };
    let icon_rect = icon_rect.pad(style.image_padding);

    let font = w.font;
    let (state, on) = (*state, *selected);
    with_custom_draw(&style.draw, &mut w.draw, |d| draw_selectable(d, font, state, style, on, bounds, icon_rect, icon, text, align));
    old != *selected
}

impl Context {
    fn selectable(&mut self, text: &str, align: TextAlign, selected: &mut bool, icon: Icon<'_>) -> bool {
        let Some((bounds, state)) = self.widget_rect() else { return false };
        self.with_widget(state == WidgetLayoutState::Valid, |ws, w, s| do_selectable(ws, w, bounds, text, align, selected, icon, &s.selectable))
            .unwrap_or(false)
    }

    /// Selectable label bound to `selected`. Returns `true` if it changed.
    pub fn selectable_label(&mut self, text: &str, align: TextAlign, selected: &mut bool) -> bool { self.selectable(text, align, selected, Icon::None) }

    /// Selectable label with a symbol. Returns `true` if the selection changed.
    pub fn selectable_symbol_label(&mut self, symbol: Symbol, text: &str, align: TextAlign, selected: &mut bool) -> bool {
        self.selectable(text, align, selected, Icon::Symbol(symbol))
    }

    /// Selectable label with an image. Returns `true` if the selection changed.
    pub fn selectable_image_label(&mut self, img: Image, text: &str, align: TextAlign, selected: &mut bool) -> bool {
        self.selectable(text, align, selected, Icon::Image(&img))
    }

    /// Selectable label showing `selected`. Returns the new value.
    pub fn select_label(&mut self, text: &str, align: TextAlign, selected: bool) -> bool {
        let mut selected = selected;
        self.selectable_label(text, align, &mut selected);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_picks_the_active_palette() {
        let style = Style::default().selectable;
        let hovered = WidgetStates::HOVERED;
        assert_eq!(selectable_colors(hovered, &style, false).1, style.text_hover);
        assert_eq!(selectable_colors(hovered, &style, true).1, style.text_hover_active);
        assert_eq!(selectable_colors(WidgetStates::ACTIVE, &style, true).1, style.text_pressed_active);
        assert_eq!(selectable_colors(WidgetStates::INACTIVE, &style, false).0, style.normal);
    }
}
