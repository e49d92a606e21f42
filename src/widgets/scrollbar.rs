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
//! Scrollbars: thumb drag, wheel, page steps and start/end keys.

use crate::draw_context::DrawCtx;
use crate::style::with_custom_draw;
use crate::widgets::{WidgetCtx, button_behavior, by_state, do_button_symbol, hover_transition};
use crate::*;

/// Geometry of one scrollbar along its axis.
struct Track {
    scroll: Rect,
    cursor: Rect,
    /// Empty space before and after the cursor.
    before: Rect,
    after: Rect,
}

fn axis(r: &Rect, o: Orientation) -> f32 {
    match o {
        Orientation::Vertical => r.h,
        Orientation::Horizontal => r.w,
    }
}

#[allow(clippy::too_many_arguments)]
fn scrollbar_behavior(
    state: &mut WidgetStates,
    w: &mut WidgetCtx<'_>,
    has_scrolling: bool,
    t: &Track,
    offset: f32,
    target: f32,
    step: f32,
    o: Orientation,
) -> f32 {
    state.reset();
    let Some(input) = w.input else { return offset };
    let mut offset = offset;
    let len = axis(&t.scroll, o);
    let left = &input.mouse.buttons[MouseButton::Left as usize];
    let scroll_delta = match o {
        Orientation::Vertical => input.mouse.scroll_delta.y,
        Orientation::Horizontal => input.mouse.scroll_delta.x,
    };
    if input.is_mouse_hovering_rect(t.scroll) {
        *state = WidgetStates::HOVERED;
    }

    let mut ws = WidgetStates::empty();
    let vertical = o == Orientation::Vertical;
    if left.down && left.clicked == 0 && t.cursor.contains(w.drag.origin(input)) {
        *state = WidgetStates::ACTIVE;
        let pixel = if vertical { input.mouse.delta.y } else { input.mouse.delta.x };
        offset = (offset + (pixel / len) * target).clamp(0.0, (target - len).max(0.0));
        // keep the drag anchored to the moved cursor
        let origin = w.drag.origin(input);
        let at = (offset / target) * len;
        if vertical {
            w.drag.set(vec2(origin.x, t.scroll.y + at + t.cursor.h / 2.0));
        } else {
            w.drag.set(vec2(t.scroll.x + at + t.cursor.w / 2.0, origin.y));
        }
    } else if (vertical && has_scrolling && input.is_key_pressed(Key::ScrollUp)) || button_behavior(&mut ws, t.before, Some(input), ButtonBehavior::Default) {
        offset = (offset - len).max(0.0);
    } else if (vertical && has_scrolling && input.is_key_pressed(Key::ScrollDown)) || button_behavior(&mut ws, t.after, Some(input), ButtonBehavior::Default) {
        offset = (offset + len).min(target - len);
    } else if has_scrolling {
        if scroll_delta != 0.0 {
            offset = (offset + step * -scroll_delta).clamp(0.0, (target - len).max(0.0));
        } else if vertical && input.is_key_pressed(Key::ScrollStart) {
            offset = 0.0;
        } else if vertical && input.is_key_pressed(Key::ScrollEnd) {
            offset = target - len;
        }
    }
    hover_transition(state, Some(input), t.scroll);
    offset
}

fn draw_scrollbar(draw: &mut DrawCtx<'_>, state: WidgetStates, style: &StyleScrollbar, bounds: Rect, cursor: Rect) {
    let background = by_state(state, style.normal, style.hover, style.active);
    let knob = by_state(state, style.cursor_normal, style.cursor_hover, style.cursor_active);
    match background {
        StyleItem::Color(c) => {
            draw.fill_rect(bounds, style.rounding, c);
            draw.stroke_rect(bounds, style.rounding, style.border, style.border_color);
        }
        StyleItem::Image(img) => draw.draw_image(bounds, &img, Color::rgba(255, 255, 255, 255)),
        StyleItem::Hide => {}
    }
    match knob {
        StyleItem::Color(c) => {
            draw.fill_rect(cursor, style.rounding_cursor, c);
            draw.stroke_rect(cursor, style.rounding_cursor, style.border_cursor, style.cursor_border_color);
        }
        StyleItem::Image(img) => draw.draw_image(cursor, &img, Color::rgba(255, 255, 255, 255)),
        StyleItem::Hide => {}
    }
}

#[allow(clippy::too_many_arguments)]
fn do_scrollbar(
    state: &mut WidgetStates,
    w: &mut WidgetCtx<'_>,
    scroll: Rect,
    has_scrolling: bool,
    offset: f32,
    target: f32,
    step: f32,
    button_pixel_inc: f32,
    style: &StyleScrollbar,
    o: Orientation,
) -> f32 {
    let vertical = o == Orientation::Vertical;
    let mut scroll = scroll;
    if vertical {
        scroll.w = scroll.w.max(1.0);
        scroll.h = scroll.h.max(0.0);
    } else {
        scroll.h = scroll.h.max(1.0);
        scroll.w = scroll.w.max(0.0);
    }
    if target <= axis(&scroll, o) {
        return 0.0;
    }

    let mut offset = offset;
    if style.show_buttons {
        let mut ws = WidgetStates::empty();
        let size = if vertical { scroll.w } else { scroll.h };
        let inc = step.min(button_pixel_inc);
        let (dec, incr) = if vertical {
            (Rect::new(scroll.x, scroll.y, size, size), Rect::new(scroll.x, scroll.y + scroll.h - size, size, size))
        } else {
            (Rect::new(scroll.x, scroll.y, size, size), Rect::new(scroll.x + scroll.w - size, scroll.y, size, size))
        };
        if do_button_symbol(&mut ws, w, dec, style.dec_symbol, ButtonBehavior::Repeater, &style.dec_button) {
            offset -= inc;
        }
        if do_button_symbol(&mut ws, w, incr, style.inc_symbol, ButtonBehavior::Repeater, &style.inc_button) {
            offset += inc;
        }
        if vertical {
            scroll.y += size;
            scroll.h = (scroll.h - 2.0 * size).max(0.0);
        } else {
            scroll.x += size;
            scroll.w = (scroll.w - 2.0 * size).max(0.0);
        }
    }

    let len = axis(&scroll, o);
    let step = step.min(len);
    let offset = offset.clamp(0.0, (target - len).max(0.0));
    let ratio = len / target;
    let place = |offset: f32, border: f32| -> Rect {
        let off = offset / target;
        if vertical {
            Rect::new(
                scroll.x + style.border + style.padding.x,
                scroll.y + off * scroll.h + border + style.padding.y,
                scroll.w - (2.0 * style.border + 2.0 * style.padding.x),
                (ratio * scroll.h - (2.0 * style.border + 2.0 * style.padding.y)).max(0.0),
            )
        } else {
            Rect::new(
                scroll.x + off * scroll.w + border + style.padding.x,
                scroll.y + style.border + style.padding.y,
                (ratio * scroll.w - (2.0 * style.border + 2.0 * style.padding.x)).max(0.0),
                scroll.h - (2.0 * style.border + 2.0 * style.padding.y),
            )
        }
    };
    let cursor = place(offset, style.border);
    let (before, after) = if vertical {
        (
            Rect::new(scroll.x, scroll.y, scroll.w, (cursor.y - scroll.y).max(0.0)),
            Rect::new(scroll.x, cursor.y + cursor.h, scroll.w, ((scroll.y + scroll.h) - (cursor.y + cursor.h)).max(0.0)),
        )
    } else {
        (
            Rect::new(scroll.x, scroll.y, (cursor.x - scroll.x).max(0.0), scroll.h),
            Rect::new(cursor.x + cursor.w, scroll.y, ((scroll.x + scroll.w) - (cursor.x + cursor.w)).max(0.0), scroll.h),
        )
    };
    let track = Track { scroll, cursor, before, after };
    let offset = scrollbar_behavior(state, w, has_scrolling, &track, offset, target, step, o);
    let cursor = place(offset, style.border_cursor);

    let state = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| draw_scrollbar(d, state, style, scroll, cursor));
    offset
}

/// Vertical scrollbar over `scroll` for content `target` pixels high. Returns the new offset.
#[allow(clippy::too_many_arguments)]
pub(crate) fn do_scrollbarv(
    state: &mut WidgetStates,
    w: &mut WidgetCtx<'_>,
    scroll: Rect,
    has_scrolling: bool,
    offset: f32,
    target: f32,
    step: f32,
    button_pixel_inc: f32,
    style: &StyleScrollbar,
) -> f32 {
    do_scrollbar(state, w, scroll, has_scrolling, offset, target, step, button_pixel_inc, style, Orientation::Vertical)
}

/// Horizontal scrollbar over `scroll` for content `target` pixels wide. Returns the new offset.
#[allow(clippy::too_many_arguments)]
pub(crate) fn do_scrollbarh(
    state: &mut WidgetStates,
    w: &mut WidgetCtx<'_>,
    scroll: Rect,
    has_scrolling: bool,
    offset: f32,
    target: f32,
    step: f32,
    button_pixel_inc: f32,
    style: &StyleScrollbar,
) -> f32 {
    do_scrollbar(state, w, scroll, has_scrolling, offset, target, step, button_pixel_inc, style, Orientation::Horizontal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use crate::window::DragAnchor;

    fn run(input: &Input, drag: &mut DragAnchor, offset: f32) -> f32 {
        let font = TestFont;
        let style = Style::default();
        let mut memory = Buffer::new(4096);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut w = WidgetCtx::new(DrawCtx::new(&mut memory, &mut buf), Some(input), &font, FontId(0), drag);
        let mut state = WidgetStates::empty();
        let scroll = rect(100.0, 0.0, 10.0, 100.0);
        do_scrollbarv(&mut state, &mut w, scroll, true, offset, 1000.0, scroll.h * 0.10, scroll.h * 0.01, &style.scrollv)
    }

    #[test]
    fn wheel_scrolls_by_a_tenth_of_the_track() {
        let mut input = Input::default();
        input.begin();
        input.scroll(vec2(0.0, -1.0));
        let mut drag = DragAnchor::default();
        assert_eq!(run(&input, &mut drag, 0.0), 10.0);
        // clamped to target - height
        assert_eq!(run(&input, &mut drag, 895.0), 900.0);
        input.begin();
        input.scroll(vec2(0.0, 1.0));
        assert_eq!(run(&input, &mut drag, 5.0), 0.0);
    }

    #[test]
    fn content_smaller_than_track_resets_offset() {
        let font = TestFont;
        let style = Style::default();
        let input = Input::default();
        let mut drag = DragAnchor::default();
        let mut memory = Buffer::new(1024);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut w = WidgetCtx::new(DrawCtx::new(&mut memory, &mut buf), Some(&input), &font, FontId(0), &mut drag);
        let mut state = WidgetStates::empty();
        let off = do_scrollbarv(&mut state, &mut w, rect(0.0, 0.0, 10.0, 100.0), true, 40.0, 80.0, 10.0, 1.0, &style.scrollv);
        assert_eq!(off, 0.0);
    }

    #[test]
    fn dragging_the_thumb_moves_proportionally() {
        let mut input = Input::default();
        input.motion(105.0, 5.0);
        input.button(MouseButton::Left, 105.0, 5.0, true);
        input.begin();
        input.motion(105.0, 15.0);
        let mut drag = DragAnchor::default();
        drag.sync(&input);
        // 10px of the 100px track is 100px of the 1000px content
        assert_eq!(run(&input, &mut drag, 0.0), 100.0);
        assert_eq!(drag.origin(&input).y, 10.0 + 5.0);
    }
}
