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
//! Progress bars, optionally draggable.

use crate::draw_context::DrawCtx;
use crate::style::with_custom_draw;
use crate::widgets::{WidgetCtx, by_state};
use crate::*;

fn progress_behavior(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, r: Rect, cursor: Rect, max: usize, value: usize, modifiable: bool) -> usize {
    state.reset();
    let Some(input) = w.input.filter(|_| modifiable) else { return value };
    let mut value = value;
    if input.is_mouse_hovering_rect(r) {
        *state = WidgetStates::HOVERED;
    }
    if input.is_mouse_down(MouseButton::Left) && cursor.contains(w.drag.origin(input)) {
        let ratio = (input.mouse.pos.x - cursor.x).max(0.0) / cursor.w;
        value = ((max as f32 * ratio) as usize).min(max);
        let origin = w.drag.origin(input);
        w.drag.set(vec2(cursor.x + cursor.w / 2.0, origin.y));
        *state |= WidgetStates::ACTIVE;
    }
    if state.is_hovered() && !input.is_mouse_prev_hovering_rect(r) {
        *state |= WidgetStates::ENTERED;
    } else if input.is_mouse_prev_hovering_rect(r) && !input.is_mouse_hovering_rect(r) {
        *state |= WidgetStates::LEFT;
    }
    value
}

fn draw_progress(draw: &mut DrawCtx<'_>, state: WidgetStates, style: &StyleProgress, bounds: Rect, cursor: Rect) {
    let background = by_state(state, style.normal, style.hover, style.active);
    let knob = by_state(state, style.cursor_normal, style.cursor_hover, style.cursor_active);
    match background {
        StyleItem::Color(c) => {
            draw.fill_rect(bounds, style.rounding, c);
            draw.stroke_rect(bounds, style.rounding, style.border, style.border_color);
        }
        other => other.draw(draw, bounds, style.rounding),
    }
    match knob {
        StyleItem::Color(c) => {
            draw.fill_rect(cursor, style.cursor_rounding, c);
            draw.stroke_rect(cursor, style.cursor_rounding, style.cursor_border, style.cursor_border_color);
        }
        other => other.draw(draw, cursor, style.cursor_rounding),
    }
}

/// Progress bar filled to `value / max`. Returns the new value.
#[allow(clippy::too_many_arguments)]
pub(crate) fn do_progress(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, bounds: Rect, value: usize, max: usize, modifiable: bool, style: &StyleProgress) -> usize {
    let inset = vec2(style.padding.x + style.border, style.padding.y + style.border);
    let mut cursor = bounds.pad(inset);
    let value = value.min(max);
    let value = progress_behavior(state, w, bounds, cursor, max, value, modifiable);
    cursor.w = if max == 0 { 0.0 } else { cursor.w * (value as f32 / max as f32) };

    let state = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| draw_progress(d, state, style, bounds, cursor));
    value
}

impl Context {
    /// Progress bar bound to `value`. When `modifiable` the bar can be dragged. Returns `true`
    /// if the value changed.
    pub fn progress(&mut self, value: &mut usize, max: usize, modifiable: bool) -> bool {
        let Some((bounds, state)) = self.widget_rect() else { return false };
        let old = *value;
        if let Some(v) = self.with_widget(state == WidgetLayoutState::Valid, |ws, w, s| do_progress(ws, w, bounds, old, max, modifiable, &s.progress)) {
            *value = v;
        }
        old != *value
    }

    /// Progress bar showing `value`. Returns the new value.
    pub fn prog(&mut self, value: usize, max: usize, modifiable: bool) -> usize {
        let mut value = value;
        self.progress(&mut value, max, modifiable);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use crate::window::DragAnchor;

    fn run(input: &Input, value: usize, modifiable: bool) -> (usize, Rect) {
        let font = TestFont;
        let mut style = Style::default().progress;
        style.padding = Vec2::default();
        style.border = 0.0;
        let mut drag = DragAnchor::default();
        let mut memory = Buffer::new(4096);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let v = {
            let mut w = WidgetCtx::new(DrawCtx::new(&mut memory, &mut buf), Some(input), &font, FontId(0), &mut drag);
            let mut state = WidgetStates::empty();
            do_progress(&mut state, &mut w, rect(0.0, 0.0, 100.0, 20.0), value, 50, modifiable, &style)
        };
        let cursor = Commands::new(memory.memory(), Some(buf.begin as usize), buf.end as usize)
            .filter_map(|c| match c {
                Command::RectFilled { rect, .. } => Some(rect),
                _ => None,
            })
            .last()
            .map(|r| rect(r.x as f32, r.y as f32, r.width as f32, r.height as f32))
            .unwrap_or_default();
        (v, cursor)
    }

    #[test]
    fn cursor_width_follows_value() {
        let input = Input::default();
        let (v, cursor) = run(&input, 25, false);
        assert_eq!(v, 25);
        assert_eq!(cursor.w, 50.0);
        assert_eq!(run(&input, 80, false).0, 50);
    }

    #[test]
    fn dragging_sets_value_from_pointer() {
        let mut input = Input::default();
        input.motion(10.0, 10.0);
        input.button(MouseButton::Left, 10.0, 10.0, true);
        input.begin();
        input.motion(60.0, 10.0);
        assert_eq!(run(&input, 5, true).0, 30);
        assert_eq!(run(&input, 5, false).0, 5);
    }
}
