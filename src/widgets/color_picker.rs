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
//! Color picker: saturation/value matrix, hue bar and an optional alpha bar.

use crate::draw_context::DrawCtx;
use crate::widgets::{WidgetCtx, button_behavior, hover_transition};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Channels edited by a color picker.
pub enum ColorFormat {
    /// Color only; alpha is left untouched.
    Rgb,
    /// Color and alpha.
    Rgba,
}

const CROSSHAIR_SIZE: f32 = 7.0;

const HUE_COLORS: [Color; 7] = [
    Color::rgb(255, 0, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 255, 255),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 0, 255),
    Color::rgb(255, 0, 0),
];

#[derive(Copy, Clone, Debug)]
struct PickerLayout {
    matrix: Rect,
    hue: Rect,
    alpha: Option<Rect>,
}

fn picker_layout(bounds: Rect, bar_w: f32, padding: Vec2, fmt: ColorFormat) -> PickerLayout {
    let matrix = Rect::new(bounds.x, bounds.y, bounds.w - (3.0 * padding.x + 2.0 * bar_w), bounds.h);
    let hue = Rect::new(matrix.x + matrix.w + padding.x, bounds.y, bar_w, matrix.h);
    let alpha = (fmt == ColorFormat::Rgba).then(|| Rect::new(hue.x + hue.w + padding.x, bounds.y, bar_w, matrix.h));
    PickerLayout { matrix, hue, alpha }
}

fn saturate(v: f32) -> f32 { v.clamp(0.0, 1.0) }

fn picker_behavior(state: &mut WidgetStates, input: Option<&Input>, bounds: Rect, l: &PickerLayout, color: &mut Colorf) -> bool {
    let mut hsva = color.to_hsva();
    let mut hsv_changed = false;
    let mut value_changed = false;

    if button_behavior(state, l.matrix, input, ButtonBehavior::Repeater)
        && let Some(i) = input
    {
        hsva[1] = saturate((i.mouse.pos.x - l.matrix.x) / (l.matrix.w - 1.0));
        hsva[2] = 1.0 - saturate((i.mouse.pos.y - l.matrix.y) / (l.matrix.h - 1.0));
        hsv_changed = true;
    }
    if button_behavior(state, l.hue, input, ButtonBehavior::Repeater)
        && let Some(i) = input
    {
        hsva[0] = saturate((i.mouse.pos.y - l.hue.y) / (l.hue.h - 1.0));
        hsv_changed = true;
    }
    if let Some(alpha) = l.alpha
        && button_behavior(state, alpha, input, ButtonBehavior::Repeater)
        && let Some(i) = input
    {
        hsva[3] = 1.0 - saturate((i.mouse.pos.y - alpha.y) / (alpha.h - 1.0));
        value_changed = true;
    }

    state.reset();
    if hsv_changed {
        *color = Colorf::from_hsva(hsva[0], hsva[1], hsva[2], hsva[3]);
    }
    if hsv_changed || value_changed {
        color.a = hsva[3];
        *state = WidgetStates::ACTIVE;
    }
    if !state.is_active() && input.is_some_and(|i| i.is_mouse_hovering_rect(bounds)) {
        *state = WidgetStates::HOVERED;
    }
    hover_transition(state, input, bounds);
    hsv_changed || value_changed
}

fn draw_picker(draw: &mut DrawCtx<'_>, l: &PickerLayout, color: Colorf) {
    let white = Color::rgb(255, 255, 255);
    let black = Color::rgb(0, 0, 0);
    let clear = Color::rgba(0, 0, 0, 0);
    let hsva = color.to_hsva();
    let (matrix, hue) = (l.matrix, l.hue);

    let band = hue.h / 6.0;
    for (i, pair) in HUE_COLORS.windows(2).enumerate() {
        let r = Rect::new(hue.x, hue.y + i as f32 * band + 0.5, hue.w, band + 0.5);
        draw.fill_rect_multi_color(r, pair[0], pair[0], pair[1], pair[1]);
    }
    let line_y = (hue.y + hsva[0] * matrix.h + 0.5).trunc();
    draw.stroke_line(vec2(hue.x - 1.0, line_y), vec2(hue.x + hue.w + 2.0, line_y), 1.0, white);

    if let Some(alpha) = l.alpha {
        let line_y = (alpha.y + (1.0 - saturate(color.a)) * matrix.h + 0.5).trunc();
        draw.fill_rect_multi_color(alpha, white, white, black, black);
        draw.stroke_line(vec2(alpha.x - 1.0, line_y), vec2(alpha.x + alpha.w + 2.0, line_y), 1.0, white);
    }

    let pure = Color::from_colorf(Colorf::from_hsva(hsva[0], 1.0, 1.0, 1.0));
    draw.fill_rect_multi_color(matrix, white, pure, pure, white);
    draw.fill_rect_multi_color(matrix, clear, clear, black, black);

    let p = vec2((matrix.x + hsva[1] * matrix.w).trunc(), (matrix.y + (1.0 - hsva[2]) * matrix.h).trunc());
    draw.stroke_line(vec2(p.x - CROSSHAIR_SIZE, p.y), vec2(p.x - 2.0, p.y), 1.0, white);
    draw.stroke_line(vec2(p.x + CROSSHAIR_SIZE + 1.0, p.y), vec2(p.x + 3.0, p.y), 1.0, white);
    draw.stroke_line(vec2(p.x, p.y + CROSSHAIR_SIZE + 1.0), vec2(p.x, p.y + 3.0), 1.0, white);
    draw.stroke_line(vec2(p.x, p.y - CROSSHAIR_SIZE), vec2(p.x, p.y - 2.0), 1.0, white);
}

/// Color picker filling `bounds`. Returns `true` if `color` changed.
pub(crate) fn do_color_picker(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, color: &mut Colorf, fmt: ColorFormat, bounds: Rect, padding: Vec2) -> bool {
    let bounds = bounds.pad(padding);
    let l = picker_layout(bounds, w.font.height(), padding, fmt);
    let changed = picker_behavior(state, w.input, bounds, &l, color);
    draw_picker(&mut w.draw, &l, *color);
    changed
}

impl Context {
    /// Color picker bound to `color`. Returns `true` if it changed.
    pub fn color_pick(&mut self, color: &mut Colorf, fmt: ColorFormat) -> bool {
        let Some((bounds, state)) = self.widget_rect() else { return false };
        self.with_widget(state == WidgetLayoutState::Valid, |ws, w, _| do_color_picker(ws, w, color, fmt, bounds, Vec2::default()))
            .unwrap_or(false)
    }

    /// Color picker showing `color`. Returns the picked color.
    pub fn color_picker(&mut self, color: Colorf, fmt: ColorFormat) -> Colorf {
        let mut color = color;
        self.color_pick(&mut color, fmt);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use crate::window::DragAnchor;
    use approx::assert_relative_eq;

    fn pick(input: &Input, color: &mut Colorf, fmt: ColorFormat) -> (bool, WidgetStates) {
        let font = TestFont;
        let mut drag = DragAnchor::default();
        let mut memory = Buffer::new(8192);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut w = WidgetCtx::new(DrawCtx::new(&mut memory, &mut buf), Some(input), &font, FontId(0), &mut drag);
        let mut state = WidgetStates::empty();
        // matrix is 80x50, hue bar at x 80, alpha bar at x 90
        let changed = do_color_picker(&mut state, &mut w, color, fmt, rect(0.0, 0.0, 100.0, 50.0), Vec2::default());
        (changed, state)
    }

    fn press(x: f32, y: f32) -> Input {
        let mut input = Input::default();
        input.motion(x, y);
        input.button(MouseButton::Left, x, y, true);
        input
    }

    #[test]
    fn matrix_sets_saturation_and_value() {
        let mut color = Colorf::new(1.0, 0.0, 0.0, 1.0);
        let (changed, state) = pick(&press(40.0, 25.0), &mut color, ColorFormat::Rgb);
        assert!(changed);
        assert!(state.is_active());
        let v = 1.0 - 25.0 / 49.0;
        let s = 40.0 / 79.0;
        assert_relative_eq!(color.r, v, epsilon = 1e-5);
        assert_relative_eq!(color.g, v * (1.0 - s), epsilon = 1e-5);
        assert_relative_eq!(color.a, 1.0);
    }

    #[test]
    fn alpha_bar_only_exists_for_rgba() {
        let mut color = Colorf::new(0.0, 0.0, 1.0, 1.0);
        let (changed, _) = pick(&press(95.0, 10.0), &mut color, ColorFormat::Rgb);
        assert!(!changed);
        assert_eq!(color, Colorf::new(0.0, 0.0, 1.0, 1.0));

        let (changed, _) = pick(&press(95.0, 10.0), &mut color, ColorFormat::Rgba);
        assert!(changed);
        assert_relative_eq!(color.a, 1.0 - 10.0 / 49.0, epsilon = 1e-5);
        assert_relative_eq!(color.b, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn hovering_without_press_changes_nothing() {
        let mut input = Input::default();
        input.motion(40.0, 25.0);
        let mut color = Colorf::new(0.5, 0.5, 0.5, 1.0);
        let (changed, state) = pick(&input, &mut color, ColorFormat::Rgba);
        assert!(!changed);
        assert!(state.is_hovered());
    }
}
