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
//! Buttons and the vector symbols drawn inside them.

use crate::draw_context::DrawCtx;
use crate::style::with_custom_draw;
use crate::widgets::{FontRef, TextStyle, WidgetCtx, hover_transition, widget_text};
use crate::*;

/// Depth of the button behavior stack.
pub const BUTTON_BEHAVIOR_STACK_SIZE: usize = 8;

const WHITE: Color = Color::rgba(255, 255, 255, 255);

/// Corners of a triangle filling `r` (shrunk by `pad`) and pointing toward `heading`.
pub(crate) fn triangle_from_direction(r: Rect, pad: Vec2, heading: Heading) -> [Vec2; 3] {
    let w = r.w.max(2.0 * pad.x) - 2.0 * pad.x;
    let h = r.h.max(2.0 * pad.y) - 2.0 * pad.y;
    let x = r.x + pad.x;
    let y = r.y + pad.y;
    let (w_half, h_half) = (w / 2.0, h / 2.0);
    match heading {
        Heading::Up => [vec2(x + w_half, y), vec2(x + w, y + h), vec2(x, y + h)],
        Heading::Right => [vec2(x, y), vec2(x + w, y + h_half), vec2(x, y + h)],
        Heading::Down => [vec2(x, y), vec2(x + w, y), vec2(x + w_half, y + h)],
        Heading::Left => [vec2(x, y + h_half), vec2(x + w, y), vec2(x + w, y + h)],
    }
}

pub(crate) fn draw_symbol(draw: &mut DrawCtx<'_>, font: FontRef<'_>, symbol: Symbol, content: Rect, background: Color, foreground: Color, border_width: f32) {
    match symbol {
        Symbol::X | Symbol::Underscore | Symbol::Plus | Symbol::Minus => {
            let glyph = match symbol {
                Symbol::X => "x",
                Symbol::Underscore => "_",
                Symbol::Plus => "+",
                _ => "-",
            };
            let t = TextStyle { padding: Vec2::default(), background, color: foreground };
            widget_text(draw, font, content, glyph, &t, TextAlign::TEXT_CENTERED);
        }
        Symbol::RectSolid | Symbol::RectOutline => {
            draw.fill_rect(content, 0.0, foreground);
            if symbol == Symbol::RectOutline {
                draw.fill_rect(content.shrink(border_width), 0.0, background);
            }
        }
        Symbol::CircleSolid | Symbol::CircleOutline => {
            draw.fill_circle(content, foreground);
            if symbol == Symbol::CircleOutline {
                draw.fill_circle(content.shrink(1.0), background);
            }
        }
        Symbol::TriangleUp | Symbol::TriangleDown | Symbol::TriangleLeft | Symbol::TriangleRight => {
            let heading = match symbol {
                Symbol::TriangleUp => Heading::Up,
                Symbol::TriangleDown => Heading::Down,
                Symbol::TriangleLeft => Heading::Left,
                _ => Heading::Right,
            };
            let [a, b, c] = triangle_from_direction(content, Vec2::default(), heading);
            draw.fill_triangle(a, b, c, foreground);
        }
        Symbol::None => {}
    }
}

/// Updates `state` for a clickable area and returns `true` when it fires.
///
/// The default behavior fires on the frame the left button is released over `r`, provided the
/// press also started inside `r`. The repeater fires every frame the button is held after a
/// press inside `r`.
pub(crate) fn button_behavior(state: &mut WidgetStates, r: Rect, input: Option<&Input>, behavior: ButtonBehavior) -> bool {
    state.reset();
    let Some(input) = input else { return false };
    let mut fired = false;
    if input.is_mouse_hovering_rect(r) {
        *state = WidgetStates::HOVERED;
        if input.is_mouse_down(MouseButton::Left) {
            *state = WidgetStates::ACTIVE;
        }
        if input.has_mouse_press_in_rect(MouseButton::Left, r) {
            fired = match behavior {
                ButtonBehavior::Default => input.has_mouse_click_in_rect(MouseButton::Left, r) && input.is_mouse_released(MouseButton::Left),
                ButtonBehavior::Repeater => input.is_mouse_down(MouseButton::Left),
            };
        }
    }
    hover_transition(state, Some(input), r);
    fired
}

/// Runs the button behavior over `r` grown by the touch padding and returns the content rect.
pub(crate) fn do_button(state: &mut WidgetStates, input: Option<&Input>, r: Rect, style: &StyleButton, behavior: ButtonBehavior) -> (bool, Rect) {
    let inset = vec2(style.padding.x + style.border + style.rounding, style.padding.y + style.border + style.rounding);
    let content = Rect::new(r.x + inset.x, r.y + inset.y, r.w - 2.0 * inset.x, r.h - 2.0 * inset.y);
    let fired = button_behavior(state, r.grow(style.touch_padding), input, behavior);
    (fired, content)
}

/// Draws the button frame and returns the background used for the content.
pub(crate) fn draw_button(draw: &mut DrawCtx<'_>, bounds: Rect, state: WidgetStates, style: &StyleButton) -> StyleItem {
    let background = if state.is_hovered() {
        style.hover
    } else if state.is_active() {
        style.active
    } else {
        style.normal
    };
    match background {
        StyleItem::Image(img) => draw.draw_image(bounds, &img, WHITE),
        StyleItem::Color(c) => {
            draw.fill_rect(bounds, style.rounding, c);
            draw.stroke_rect(bounds, style.rounding, style.border, style.border_color);
        }
        StyleItem::Hide => {}
    }
    background
}

/// Text background and foreground of a button's content for the current state.
fn content_colors(background: StyleItem, state: WidgetStates, style: &StyleButton) -> (Color, Color) {
    let bg = match background {
        StyleItem::Color(c) => c,
        _ => style.text_background,
    };
    let fg = if state.is_hovered() {
        style.text_hover
    } else if state.is_active() {
        style.text_active
    } else {
        style.text_normal
    };
    (bg, fg)
}

pub(crate) fn do_button_text(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, bounds: Rect, text: &str, align: TextAlign, behavior: ButtonBehavior, style: &StyleButton) -> bool {
    let (fired, content) = do_button(state, w.input, bounds, style, behavior);
    let font = w.font;
    let state = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| {
        let background = draw_button(d, bounds, state, style);
        let (bg, fg) = content_colors(background, state, style);
        widget_text(d, font, content, text, &TextStyle { padding: Vec2::default(), background: bg, color: fg }, align);
    });
    fired
}

pub(crate) fn do_button_symbol(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, bounds: Rect, symbol: Symbol, behavior: ButtonBehavior, style: &StyleButton) -> bool {
    let (fired, content) = do_button(state, w.input, bounds, style, behavior);
    let font = w.font;
    let state = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| {
        let background = draw_button(d, bounds, state, style);
        let (bg, fg) = content_colors(background, state, style);
        draw_symbol(d, font, symbol, content, bg, fg, 1.0);
    });
    fired
}

/// Draws a symbol button in `state` without running its behavior.
pub(crate) fn draw_button_symbol(d: &mut DrawCtx<'_>, font: FontRef<'_>, bounds: Rect, content: Rect, state: WidgetStates, style: &StyleButton, symbol: Symbol) {
    let background = draw_button(d, bounds, state, style);
    let (bg, fg) = content_colors(background, state, style);
    draw_symbol(d, font, symbol, content, bg, fg, 1.0);
}

pub(crate) fn do_button_image(state: &mut WidgetStates, w: &mut WidgetCtx<'_>, bounds: Rect, img: &Image, behavior: ButtonBehavior, style: &StyleButton) -> bool {
    let (fired, content) = do_button(state, w.input, bounds, style, behavior);
    let content = content.pad(style.image_padding);
    let state = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| {
        draw_button(d, bounds, state, style);
        d.draw_image(content, img, WHITE);
    });
    fired
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn do_button_text_symbol(
    state: &mut WidgetStates,
    w: &mut WidgetCtx<'_>,
    bounds: Rect,
    symbol: Symbol,
    text: &str,
    align: TextAlign,
    behavior: ButtonBehavior,
    style: &StyleButton,
) -> bool {
    let (fired, content) = do_button(state, w.input, bounds, style, behavior);
    let font = w.font;
    let mut tri = Rect::new(0.0, content.y + content.h / 2.0 - font.height() / 2.0, font.height(), font.height());
    tri.x = if align.contains(TextAlign::LEFT) {
        ((content.x + content.w) - (2.0 * style.padding.x + tri.w)).max(0.0)
    } else {
        content.x + 2.0 * style.padding.x
    };
    let state = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| {
        let background = draw_button(d, bounds, state, style);
        let (bg, fg) = content_colors(background, state, style);
        draw_symbol(d, font, symbol, tri, style.text_background, fg, 0.0);
        widget_text(d, font, content, text, &TextStyle { padding: Vec2::default(), background: bg, color: fg }, TextAlign::TEXT_CENTERED);
    });
    fired
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn do_button_text_image(
    state: &mut WidgetStates,
    w: &mut WidgetCtx<'_>,
    bounds: Rect,
    img: &Image,
    text: &str,
    align: TextAlign,
    behavior: ButtonBehavior,
    style: &StyleButton,
) -> bool {
    let (fired, content) = do_button(state, w.input, bounds, style, behavior);
    let font = w.font;
    let mut icon = Rect::new(0.0, bounds.y + style.padding.y, 0.0, bounds.h - 2.0 * style.padding.y);
    icon.w = icon.h;
    icon.x = if align.contains(TextAlign::LEFT) {
        ((bounds.x + bounds.w) - (2.0 * style.padding.x + icon.w)).max(0.0)
    } else {
        bounds.x + 2.0 * style.padding.x
    };
    let icon = icon.pad(style.image_padding);
    let state = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| {
        let background = draw_button(d, bounds, state, style);
        let (bg, fg) = content_colors(background, state, style);
        widget_text(d, font, content, text, &TextStyle { padding: Vec2::default(), background: bg, color: fg }, TextAlign::TEXT_CENTERED);
        d.draw_image(icon, img, WHITE);
    });
    fired
}

impl Context {
    /// Sets how buttons fire from now on.
    pub fn button_set_behavior(&mut self, behavior: ButtonBehavior) { self.button_behavior = behavior; }

    /// Sets the button behavior, saving the current one. Returns `false` when the stack is full.
    pub fn button_push_behavior(&mut self, behavior: ButtonBehavior) -> bool {
        if self.button_behavior_stack.len() >= BUTTON_BEHAVIOR_STACK_SIZE {
            return false;
        }
        self.button_behavior_stack.push(self.button_behavior);
        self.button_behavior = behavior;
        true
    }

    /// Restores the behavior saved by the last push. Returns `false` when nothing was pushed.
    pub fn button_pop_behavior(&mut self) -> bool {
        match self.button_behavior_stack.pop() {
            Some(b) => {
                self.button_behavior = b;
                true
            }
            None => false,
        }
    }

    /// Allocates a widget rectangle and runs a button function on it with `style` or the
    /// context's button style.
    fn run_button(&mut self, style: Option<&StyleButton>, f: impl FnOnce(&mut WidgetStates, &mut WidgetCtx<'_>, Rect, ButtonBehavior, &StyleButton) -> bool) -> bool {
        let Some((bounds, state)) = self.widget_rect() else { return false };
        let behavior = self.button_behavior;
        self.with_widget(state == WidgetLayoutState::Valid, |ws, w, s| f(ws, w, bounds, behavior, style.unwrap_or(&s.button)))
            .unwrap_or(false)
    }

    /// Text button using `style`.
    pub fn button_text_styled(&mut self, style: &StyleButton, title: &str) -> bool {
        self.run_button(Some(style), |ws, w, r, b, s| do_button_text(ws, w, r, title, s.text_alignment, b, s))
    }

    /// Text button.
    pub fn button_text(&mut self, title: &str) -> bool { self.run_button(None, |ws, w, r, b, s| do_button_text(ws, w, r, title, s.text_alignment, b, s)) }

    /// Alias of [`Context::button_text`].
    pub fn button_label(&mut self, title: &str) -> bool { self.button_text(title) }

    /// Button filled with a flat color.
    pub fn button_color(&mut self, color: Color) -> bool {
        let mut style = self.style.button.clone();
        style.normal = StyleItem::Color(color);
        style.hover = StyleItem::Color(color);
        style.active = StyleItem::Color(color);
        self.run_button(Some(&style), |ws, w, r, b, s| {
            let (fired, _) = do_button(ws, w.input, r, s, b);
            draw_button(&mut w.draw, r, *ws, s);
            fired
        })
    }

    /// Symbol button using `style`.
    pub fn button_symbol_styled(&mut self, style: &StyleButton, symbol: Symbol) -> bool {
        self.run_button(Some(style), |ws, w, r, b, s| do_button_symbol(ws, w, r, symbol, b, s))
    }

    /// Symbol button.
    pub fn button_symbol(&mut self, symbol: Symbol) -> bool { self.run_button(None, |ws, w, r, b, s| do_button_symbol(ws, w, r, symbol, b, s)) }

    /// Image button.
    pub fn button_image(&mut self, img: Image) -> bool { self.run_button(None, |ws, w, r, b, s| do_button_image(ws, w, r, &img, b, s)) }

    /// Image button using `style`.
    pub fn button_image_styled(&mut self, style: &StyleButton, img: Image) -> bool {
        self.run_button(Some(style), |ws, w, r, b, s| do_button_image(ws, w, r, &img, b, s))
    }

    /// Button with a symbol next to the text.
    pub fn button_symbol_text(&mut self, symbol: Symbol, text: &str, align: TextAlign) -> bool {
        self.run_button(None, |ws, w, r, b, s| do_button_text_symbol(ws, w, r, symbol, text, align, b, s))
    }

    /// Alias of [`Context::button_symbol_text`].
    pub fn button_symbol_label(&mut self, symbol: Symbol, label: &str, align: TextAlign) -> bool { self.button_symbol_text(symbol, label, align) }

    /// Symbol and text button using `style`.
    pub fn button_symbol_text_styled(&mut self, style: &StyleButton, symbol: Symbol, text: &str, align: TextAlign) -> bool {
        self.run_button(Some(style), |ws, w, r, b, s| do_button_text_symbol(ws, w, r, symbol, text, align, b, s))
    }

    /// Button with an image next to the text.
    pub fn button_image_text(&mut self, img: Image, text: &str, align: TextAlign) -> bool {
        self.run_button(None, |ws, w, r, b, s| do_button_text_image(ws, w, r, &img, text, align, b, s))
    }

    /// Alias of [`Context::button_image_text`].
    pub fn button_image_label(&mut self, img: Image, label: &str, align: TextAlign) -> bool { self.button_image_text(img, label, align) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(input: &mut Input, f: impl FnOnce(&mut Input)) {
        input.begin();
        f(input);
    }

    #[test]
    fn default_button_fires_on_release_only() {
        let r = rect(0.0, 0.0, 20.0, 20.0);
        let mut input = Input::default();
        let mut state = WidgetStates::empty();

        frame(&mut input, |i| i.motion(5.0, 5.0));
        assert!(!button_behavior(&mut state, r, Some(&input), ButtonBehavior::Default));
        assert!(state.is_hovered());

        frame(&mut input, |i| i.button(MouseButton::Left, 5.0, 5.0, true));
        assert!(!button_behavior(&mut state, r, Some(&input), ButtonBehavior::Default));
        assert!(state.is_active());

        frame(&mut input, |_| {});
        assert!(!button_behavior(&mut state, r, Some(&input), ButtonBehavior::Default));

        frame(&mut input, |i| i.button(MouseButton::Left, 6.0, 6.0, false));
        assert!(button_behavior(&mut state, r, Some(&input), ButtonBehavior::Default));

        frame(&mut input, |_| {});
        assert!(!button_behavior(&mut state, r, Some(&input), ButtonBehavior::Default));
    }

    #[test]
    fn press_outside_does_not_fire() {
        let r = rect(0.0, 0.0, 20.0, 20.0);
        let mut input = Input::default();
        let mut state = WidgetStates::empty();
        frame(&mut input, |i| {
            i.motion(50.0, 5.0);
            i.button(MouseButton::Left, 50.0, 5.0, true);
        });
        frame(&mut input, |i| i.motion(5.0, 5.0));
        frame(&mut input, |i| i.button(MouseButton::Left, 5.0, 5.0, false));
        assert!(!button_behavior(&mut state, r, Some(&input), ButtonBehavior::Default));
    }

    #[test]
    fn repeater_fires_while_held() {
        let r = rect(0.0, 0.0, 20.0, 20.0);
        let mut input = Input::default();
        let mut state = WidgetStates::empty();
        frame(&mut input, |i| {
            i.motion(5.0, 5.0);
            i.button(MouseButton::Left, 5.0, 5.0, true);
        });
        assert!(button_behavior(&mut state, r, Some(&input), ButtonBehavior::Repeater));
        frame(&mut input, |_| {});
        assert!(button_behavior(&mut state, r, Some(&input), ButtonBehavior::Repeater));
        assert!(!button_behavior(&mut state, r, None, ButtonBehavior::Repeater));
    }

    #[test]
    fn triangles_point_toward_heading() {
        let r = rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(triangle_from_direction(r, Vec2::default(), Heading::Up)[0], vec2(5.0, 0.0));
        assert_eq!(triangle_from_direction(r, Vec2::default(), Heading::Down)[2], vec2(5.0, 10.0));
        assert_eq!(triangle_from_direction(r, vec2(1.0, 1.0), Heading::Right)[1], vec2(9.0, 5.0));
    }
}
