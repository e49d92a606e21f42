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
//! Checkboxes and option (radio) buttons.

use crate::draw_context::DrawCtx;
use crate::style::with_custom_draw;
use crate::widgets::{FontRef, TextStyle, WidgetCtx, button_behavior, hover_transition, widget_text};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ToggleKind {
    Check,
    Option,
}

fn toggle_behavior(state: &mut WidgetStates, input: Option<&Input>, select: Rect, active: bool) -> bool {
    state.reset();
    let mut active = active;
    if button_behavior(state, select, input, ButtonBehavior::Default) {
        *state = WidgetStates::ACTIVE;
        active = !active;
    }
    hover_transition(state, input, select);
    active
}

#[allow(clippy::too_many_arguments)]
fn draw_toggle(draw: &mut DrawCtx<'_>, font: FontRef<'_>, state: WidgetStates, style: &StyleToggle, active: bool, label: Rect, select: Rect, cursor: Rect, text: &str, kind: ToggleKind) {
    let (background, knob, color) = if state.is_hovered() {
        (style.hover, style.cursor_hover, style.text_hover)
    } else if state.is_active() {
        (style.hover, style.cursor_hover, style.text_active)
    } else {
        (style.normal, style.cursor_normal, style.text_normal)
    };

    match (background, kind) {
        (StyleItem::Color(c), ToggleKind::Check) => {
            draw.fill_rect(select, 0.0, style.border_color);
            draw.fill_rect(select.shrink(style.border), 0.0, c);
        }
        (StyleItem::Color(c), ToggleKind::Option) => {
            draw.fill_circle(select, style.border_color);
            draw.fill_circle(select.shrink(style.border), c);
        }
        (StyleItem::Image(img), _) => draw.draw_image(select, &img, Color::rgba(255, 255, 255, 255)),
        (StyleItem::Hide, _) => {}
    }
    if active {
        match (knob, kind) {
            (StyleItem::Image(img), _) => draw.draw_image(cursor, &img, Color::rgba(255, 255, 255, 255)),
            (StyleItem::Color(c), ToggleKind::Check) => draw.fill_rect(cursor, 0.0, c),
            (StyleItem::Color(c), ToggleKind::Option) => draw.fill_circle(cursor, c),
            (StyleItem::Hide, _) => {}
        }
    }
    let t = TextStyle { padding: Vec2::default(), background: style.text_background, color };
    widget_text(draw, font, label, text, &t, TextAlign::TEXT_LEFT);
}

/// Toggle with a box (or circle) followed by `text`. Returns `true` if `active` changed.
fn do_toggle(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, r: Rect, active: &mut bool, text: &str, kind: ToggleKind, style: &StyleToggle) -> bool {
    let font = w.font;
    let mut r = r;
    r.w = r.w.max(font.height() + 2.0 * style.padding.x);
    r.h = r.h.max(font.height() + 2.0 * style.padding.y);
    let bounds = r.grow(style.touch_padding);

    let select = Rect::new(r.x, r.y + r.h / 2.0 - font.height() / 2.0, font.height(), font.height());
    let inset = vec2(style.padding.x + style.border, style.padding.y + style.border);
    let cursor = Rect::new(select.x + inset.x, select.y + inset.y, select.w - 2.0 * inset.x, select.h - 2.0 * inset.y);
    let label_x = select.x + select.w + style.spacing;
    let label = Rect::new(label_x, select.y, (r.x + r.w).max(label_x) - label_x, select.w);

    let was_active = *active;
    *active = toggle_behavior(state, w.input, bounds, *active);
    let (state, on) = (*state, *active);
    with_custom_draw(&style.draw, &mut w.draw, |d| draw_toggle(d, font, state, style, on, label, select, cursor, text, kind));
    was_active != *active
}

impl Context {
    fn toggle(&mut self, text: &str, active: bool, kind: ToggleKind) -> bool {
        let Some((bounds, state)) = self.widget_rect() else { return active };
        let mut active = active;
        self.with_widget(state == WidgetLayoutState::Valid, |ws, w, s| {
            let style = if kind == ToggleKind::Check { &s.checkbox } else { &s.option };
            do_toggle(ws, w, bounds, &mut active, text, kind, style)
        });
        active
    }

    /// Checkbox showing `active`. Returns the new value.
    pub fn check_label(&mut self, label: &str, active: bool) -> bool { self.toggle(label, active, ToggleKind::Check) }

    /// Checkbox bound to `active`. Returns `true` if it changed.
    pub fn checkbox_label(&mut self, label: &str, active: &mut bool) -> bool {
        let old = *active;
        *active = self.check_label(label, old);
        old != *active
    }

    /// Checkbox toggling `value` bits in `flags`. Returns the new flags.
    pub fn check_flags_label(&mut self, label: &str, flags: u32, value: u32) -> u32 {
        let mut flags = flags;
        if self.check_label(label, flags & value == value) {
            flags |= value;
        } else {
            flags &= !value;
        }
        flags
    }

    /// Checkbox toggling `value` bits in `flags`. Returns `true` if they changed.
    pub fn checkbox_flags_label(&mut self, label: &str, flags: &mut u32, value: u32) -> bool {
        let old = *flags;
        *flags = self.check_flags_label(label, old, value);
        old != *flags
    }

    /// Option button showing `active`. Returns the new value.
    pub fn option_label(&mut self, label: &str, active: bool) -> bool { self.toggle(label, active, ToggleKind::Option) }

    /// Option button bound to `active`. Returns `true` if it changed.
    pub fn radio_label(&mut self, label: &str, active: &mut bool) -> bool {
        let old = *active;
        *active = self.option_label(label, old);
        old != *active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use crate::window::DragAnchor;

    #[test]
    fn click_flips_checkbox() {
        let font = TestFont;
        let style = Style::default();
        let mut input = Input::default();
        input.motion(5.0, 5.0);
        input.button(MouseButton::Left, 5.0, 5.0, true);
        input.begin();
        input.button(MouseButton::Left, 5.0, 5.0, false);

        let mut drag = DragAnchor::default();
        let mut memory = Buffer::new(4096);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut w = WidgetCtx::new(DrawCtx::new(&mut memory, &mut buf), Some(&input), &font, FontId(0), &mut drag);
        let mut state = WidgetStates::empty();
        let mut on = false;
        assert!(do_toggle(&mut state, &mut w, rect(0.0, 0.0, 100.0, 20.0), &mut on, "check", ToggleKind::Check, &style.checkbox));
        assert!(on);

        w.input = None;
        assert!(!do_toggle(&mut state, &mut w, rect(0.0, 0.0, 100.0, 20.0), &mut on, "check", ToggleKind::Check, &style.checkbox));
        assert!(on);
    }
}
