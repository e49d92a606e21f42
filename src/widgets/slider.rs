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
//! Horizontal sliders over a stepped float range.

use crate::draw_context::DrawCtx;
use crate::style::with_custom_draw;
use crate::widgets::{WidgetCtx, by_state, do_button_symbol, hover_transition};
use crate::*;

/// Moves `value` by whole steps toward the pointer while the cursor is dragged.
#[allow(clippy::too_many_arguments)]
fn slider_behavior(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, logical: Rect, visual: Rect, bounds: Rect, min: f32, value: f32, max: f32, step: f32) -> f32 {
    state.reset();
    let Some(input) = w.input else { return value };
    let mut value = value;
    if input.is_mouse_down(MouseButton::Left) && visual.contains(w.drag.origin(input)) {
        *state = WidgetStates::ACTIVE;
        let d = input.mouse.pos.x - (visual.x + visual.w / 2.0);
        let pxstep = bounds.w / ((max - min) / step);
        if pxstep > 0.0 && d.abs() >= pxstep {
            let steps = (d.abs() / pxstep).trunc();
            value += if d > 0.0 { step * steps } else { -(step * steps) };
            value = value.clamp(min, max);
            let ratio = (value - min) / step;
            let x = bounds.x + logical.w * ratio;
            let origin = w.drag.origin(input);
            w.drag.set(vec2(x, origin.y));
        }
    }
    // an active slider does not also report hover
    if !state.is_active() && input.is_mouse_hovering_rect(bounds) {
        *state = WidgetStates::HOVERED;
    }
    hover_transition(state, Some(input), bounds);
    value
}

fn draw_slider(draw: &mut DrawCtx<'_>, state: WidgetStates, style: &StyleSlider, bounds: Rect, visual: Rect) {
    let background = by_state(state, style.normal, style.hover, style.active);
    let bar_color = by_state(state, style.bar_normal, style.bar_hover, style.bar_active);
    let cursor = by_state(state, style.cursor_normal, style.cursor_hover, style.cursor_active);

    let bar = Rect::new(bounds.x, visual.y + visual.h / 2.0 - bounds.h / 12.0, bounds.w, bounds.h / 6.0);
    let fill = Rect::new(bar.x, bar.y, (visual.x + visual.w / 2.0) - bar.x, bar.h);

    if let StyleItem::Color(c) = background {
        draw.fill_rect(bounds, style.rounding, c);
        draw.stroke_rect(bounds, style.rounding, style.border, style.border_color);
    } else {
        background.draw(draw, bounds, style.rounding);
    }
    draw.fill_rect(bar, style.rounding, bar_color);
    draw.fill_rect(fill, style.rounding, style.bar_filled);
    match cursor {
        StyleItem::Color(c) => draw.fill_circle(visual, c),
        StyleItem::Image(img) => draw.draw_image(visual, &img, Color::rgba(255, 255, 255, 255)),
        StyleItem::Hide => {}
    }
}

/// Slider over `[min, max]` moving in `step` increments. Returns the new value.
#[allow(clippy::too_many_arguments)]
pub(crate) fn do_slider(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, bounds: Rect, min: f32, value: f32, max: f32, step: f32, style: &StyleSlider) -> f32 {
    let mut bounds = bounds.pad(style.padding);
    let mut value = value;
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if style.show_buttons {
        let mut ws = WidgetStates::empty();
        let size = vec2(bounds.h, bounds.h);
        let dec = Rect::new(bounds.x, bounds.y, size.x, size.y);
        if do_button_symbol(&mut ws, w, dec, style.dec_symbol, ButtonBehavior::Default, &style.dec_button) {
            value -= step;
        }
        let inc = Rect::new(bounds.x + bounds.w - size.x, bounds.y, size.x, size.y);
        if do_button_symbol(&mut ws, w, inc, style.inc_symbol, ButtonBehavior::Default, &style.inc_button) {
            value += step;
        }
        bounds.x += size.x + style.spacing.x;
        bounds.w -= 2.0 * size.x + 2.0 * style.spacing.x;
    }

    bounds.x += style.cursor_size.x * 0.5;
    bounds.w = (bounds.w - style.cursor_size.x).max(0.0);

    let value = value.clamp(min, max);
    let steps = if step > 0.0 { ((max - min) / step).max(1.0) } else { 1.0 };
    let step = if step > 0.0 { step } else { max - min };

    let logical_w = bounds.w / steps;
    let place = |value: f32| -> (Rect, Rect) {
        let off = if step > 0.0 { (value - min) / step } else { 0.0 };
        let logical = Rect::new(bounds.x + logical_w * off, bounds.y, logical_w, bounds.h);
        let visual = Rect::new(logical.x - style.cursor_size.x * 0.5, bounds.y + bounds.h * 0.5 - style.cursor_size.y * 0.5, style.cursor_size.x, style.cursor_size.y);
        (logical, visual)
    };
    let (logical, visual) = place(value);

    let value = slider_behavior(state, w, logical, visual, bounds, min, value, max, step);
    let (_, visual) = place(value);

    let state = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| draw_slider(d, state, style, bounds, visual));
    value
}

impl Context {
    /// Slider bound to `value`. Returns `true` if it changed.
    ///
    /// Sliders react to input whenever the window does, including while the pointer is outside
    /// of the visible part of the widget.
    pub fn slider_float(&mut self, min: f32, value: &mut f32, max: f32, step: f32) -> bool {
        let Some((bounds, _)) = self.widget_rect() else { return false };
        let old = *value;
        if let Some(v) = self.with_widget(true, |ws, w, s| do_slider(ws, w, bounds, min, old, max, step, &s.slider)) {
            *value = v;
        }
        old != *value
    }

    /// Slider showing `value`. Returns the new value.
    pub fn slide_float(&mut self, min: f32, value: f32, max: f32, step: f32) -> f32 {
        let mut value = value;
        self.slider_float(min, &mut value, max, step);
        value
    }

    /// Integer slider bound to `value`. Returns `true` if it changed.
    pub fn slider_int(&mut self, min: i32, value: &mut i32, max: i32, step: i32) -> bool {
        let mut v = *value as f32;
        self.slider_float(min as f32, &mut v, max as f32, step as f32);
        let old = *value;
        *value = v as i32;
        old != *value
    }

    /// Integer slider showing `value`. Returns the new value.
    pub fn slide_int(&mut self, min: i32, value: i32, max: i32, step: i32) -> i32 {
        let mut value = value;
        self.slider_int(min, &mut value, max, step);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use crate::window::DragAnchor;

    fn slide(input: &Input, drag: &mut DragAnchor, value: f32) -> (f32, WidgetStates) {
        let font = TestFont;
        let mut style = Style::default().slider;
        style.padding = Vec2::default();
        style.cursor_size = vec2(10.0, 10.0);
        style.show_buttons = false;
        let mut memory = Buffer::new(4096);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut w = WidgetCtx::new(DrawCtx::new(&mut memory, &mut buf), Some(input), &font, FontId(0), drag);
        let mut state = WidgetStates::empty();
        // track is 100px wide once the cursor is accounted for: 10px per step
        let v = do_slider(&mut state, &mut w, rect(0.0, 0.0, 110.0, 20.0), 0.0, value, 10.0, 1.0, &style);
        (v, state)
    }

    #[test]
    fn dragging_moves_by_whole_steps() {
        let mut input = Input::default();
        // cursor of value 2 is centered at x = 5 + 20
        input.motion(25.0, 10.0);
        input.button(MouseButton::Left, 25.0, 10.0, true);
        input.begin();
        input.motion(51.0, 10.0);
        let mut drag = DragAnchor::default();
        let (v, state) = slide(&input, &mut drag, 2.0);
        assert_eq!(v, 4.0);
        assert!(state.is_active());
        assert!(!state.is_hovered());
        assert_eq!(drag.origin(&input).x, 45.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let input = Input::default();
        let mut drag = DragAnchor::default();
        assert_eq!(slide(&input, &mut drag, 25.0).0, 10.0);
        assert_eq!(slide(&input, &mut drag, -3.0).0, 0.0);
    }
}
