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
//! Numeric properties: a name between `-`/`+` buttons, draggable, editable as text.

use crate::draw_context::DrawCtx;
use crate::style::with_custom_draw;
use crate::util::{PROPERTY_SEED, hash_str, parse_f64, parse_i64};
use crate::widgets::{FontRef, TextStyle, WidgetCtx, button_behavior, do_button_symbol, do_edit, widget_text};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Kind {
    Int,
    Float,
    Double,
}

/// Value edited by a property together with its range.
#[derive(Copy, Clone, Debug)]
struct Variant {
    kind: Kind,
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl Variant {
    fn new(kind: Kind, min: f64, value: f64, max: f64, step: f64) -> Self { Self { kind, value, min, max, step } }

    fn set(&mut self, value: f64) {
        let value = match self.kind {
            Kind::Int => value.trunc(),
            Kind::Float => value as f32 as f64,
            Kind::Double => value,
        };
        self.value = value.clamp(self.min.min(self.max), self.max.max(self.min));
    }

    fn format(&self) -> String {
        match self.kind {
            Kind::Int => format_int(self.value as i64),
            Kind::Float | Kind::Double => format_float(self.value),
        }
    }

    fn parse(&mut self, text: &str) {
        match self.kind {
            Kind::Int => self.set(parse_i64(text) as f64),
            Kind::Float | Kind::Double => self.set(parse_f64(text)),
        }
    }

    fn filter(&self) -> Filter {
        match self.kind {
            Kind::Int => filter_decimal,
            Kind::Float | Kind::Double => filter_float,
        }
    }
}

/// Rectangles of the parts of a property.
#[derive(Copy, Clone, Debug)]
struct PropertyLayout {
    left: Rect,
    right: Rect,
    label: Rect,
    edit: Rect,
    empty: Rect,
}

fn property_layout(property: Rect, font: FontRef<'_>, name: &str, shown: &str, editing: bool, style: &StyleProperty) -> PropertyLayout {
    let side = font.height() / 2.0;
    let left = Rect::new(property.x + style.border + style.padding.x, property.y + style.border + property.h / 2.0 - side / 2.0, side, side);
    let label = Rect::new(
        left.x + left.w + style.padding.x,
        property.y + style.border + style.padding.y,
        font.width(name) + 2.0 * style.padding.x,
        property.h - (2.0 * style.border + 2.0 * style.padding.y),
    );
    let right = Rect::new(property.x + property.w - (side + style.padding.x), left.y, side, side);

    let mut size = font.width(shown);
    if editing {
        size += style.edit.cursor_size;
    }
    let edit_w = (size + 2.0 * style.padding.x).min(right.x - (label.x + label.w));
    let edit = Rect::new(right.x - (edit_w + style.padding.x), property.y + style.border, edit_w, property.h - 2.0 * style.border);
    let empty = Rect::new(label.x + label.w, property.y, edit.x - (label.x + label.w), property.h);
    PropertyLayout { left, right, label, edit, empty }
}

fn drag_behavior(state: &mut WidgetStates, input: Option<&Input>, drag: Rect, variant: &mut Variant, inc_per_pixel: f32) {
    state.reset();
    let Some(input) = input else { return };
    if input.is_mouse_hovering_rect(drag) {
        *state = WidgetStates::HOVERED;
    }
    if input.is_mouse_down(MouseButton::Left) && input.has_mouse_click_down_in_rect(MouseButton::Left, drag, true) {
        let delta = (input.mouse.delta.x * inc_per_pixel) as f64;
        let delta = if variant.kind == Kind::Int { delta.trunc() } else { delta };
        variant.set(variant.value + delta);
        *state = WidgetStates::ACTIVE;
    }
    if state.is_hovered() && !input.is_mouse_prev_hovering_rect(drag) {
        *state |= WidgetStates::ENTERED;
    } else if input.is_mouse_prev_hovering_rect(drag) && !input.is_mouse_hovering_rect(drag) {
        *state |= WidgetStates::LEFT;
    }
}

#[allow(clippy::too_many_arguments)]
fn property_behavior(state: &mut WidgetStates, input: Option<&Input>, property: Rect, l: &PropertyLayout, mode: &mut PropertyMode, variant: &mut Variant, inc_per_pixel: f32) {
    if let Some(i) = input
        && *mode == PropertyMode::Default
    {
        if button_behavior(state, l.edit, Some(i), ButtonBehavior::Default) {
            *mode = PropertyMode::Edit;
        } else if i.is_mouse_click_down_in_rect(MouseButton::Left, l.label, true) || i.is_mouse_click_down_in_rect(MouseButton::Left, l.empty, true) {
            *mode = PropertyMode::Drag;
        }
    }
    if *mode == PropertyMode::Drag {
        drag_behavior(state, input, property, variant, inc_per_pixel);
        if !state.is_active() {
            *mode = PropertyMode::Default;
        }
    }
}

fn draw_property(draw: &mut DrawCtx<'_>, font: FontRef<'_>, state: WidgetStates, style: &StyleProperty, bounds: Rect, label: Rect, name: &str) {
    let (background, color) = if state.is_active() {
        (style.active, style.label_active)
    } else if state.is_hovered() {
        (style.hover, style.label_hover)
    } else {
        (style.normal, style.label_normal)
    };
    let text_bg = match background {
        StyleItem::Color(c) => {
            draw.fill_rect(bounds, style.rounding, c);
            draw.stroke_rect(bounds, style.rounding, style.border, style.border_color);
            c
        }
        other => {
            other.draw(draw, bounds, style.rounding);
            Color::rgba(0, 0, 0, 0)
        }
    };
    let t = TextStyle { padding: Vec2::default(), background: text_bg, color };
    widget_text(draw, font, label, name, &t, TextAlign::TEXT_CENTERED);
}

/// One frame of a property. `st` holds the text buffer, selection and mode of the property.
/// Returns `true` if the frame's typed text was used.
#[allow(clippy::too_many_arguments)]
fn do_property(
    state: &mut WidgetStates,
    w: &mut WidgetCtx<'_>,
    property: Rect,
    name: &str,
    variant: &mut Variant,
    inc_per_pixel: f32,
    st: &mut PropertyState,
    text_edit: &mut TextEdit,
    clipboard: &mut Option<Box<dyn Clipboard>>,
    behavior: ButtonBehavior,
    style: &StyleProperty,
) -> bool {
    let font = w.font;
    let display = variant.format();
    let editing = st.state == PropertyMode::Edit;
    let shown = if editing { st.buffer.as_str() } else { display.as_str() };
    let l = property_layout(property, font, name, shown, editing, style);

    property_behavior(state, w.input, property, &l, &mut st.state, variant, inc_per_pixel);

    let drawn = *state;
    with_custom_draw(&style.draw, &mut w.draw, |d| draw_property(d, font, drawn, style, property, l.label, name));

    if do_button_symbol(state, w, l.left, style.sym_left, behavior, &style.dec_button) {
        variant.set(variant.value - variant.step);
    }
    if do_button_symbol(state, w, l.right, style.sym_right, behavior, &style.inc_button) {
        variant.set(variant.value + variant.step);
    }

    let active = if !editing && st.state == PropertyMode::Edit {
        st.buffer = variant.format();
        st.cursor = st.buffer.chars().count();
        false
    } else {
        st.state == PropertyMode::Edit
    };

    let filter = variant.filter();
    let mut text = if st.state == PropertyMode::Edit { std::mem::take(&mut st.buffer) } else { variant.format() };
    text_edit.clear_state(TextEditType::SingleLine, Some(filter));
    text_edit.set_max_len(Some(MAX_NUMBER_BUFFER));
    text_edit.swap_string(&mut text);
    text_edit.restore(st.cursor, st.select_start, st.select_end);
    text_edit.active = active;
    text_edit.mode = TextEditMode::Insert;

    let input = w.input;
    if st.state != PropertyMode::Edit {
        w.input = None;
    }
    let (_, consumed) = do_edit(state, w, l.edit, EditFlags::FIELD | EditFlags::AUTO_SELECT, Some(filter), text_edit, clipboard, &style.edit);
    w.input = input;

    st.cursor = text_edit.cursor();
    (st.select_start, st.select_end) = text_edit.selection();
    if text_edit.active && input.is_some_and(|i| i.is_key_pressed(Key::Enter)) {
        text_edit.active = false;
    }
    text_edit.swap_string(&mut text);
    if st.state == PropertyMode::Edit {
        st.buffer = text;
    }

    if active && !text_edit.active {
        st.state = PropertyMode::Default;
        variant.parse(&st.buffer);
    }
    consumed
}

impl Context {
    fn property(&mut self, name: &str, variant: &mut Variant, inc_per_pixel: f32) {
        let Some((bounds, layout_state)) = self.widget_rect() else { return };
        let Some(cur) = self.current else { return };
        let behavior = self.button_behavior;
        let Context { windows, memory, input, style, fonts, last_widget_state, clipboard, text_edit, .. } = self;
        let Some(Window { layout, buffer, drag, property: hot, .. }) = windows.get_mut(cur) else { return };

        // every property takes a slot so the end of frame collector sees them
        let seq = hot.seq;
        hot.seq += 1;
        let (hash, label) = match name.strip_prefix('#') {
            Some(rest) => (hash_str(name, seq), rest),
            None => (hash_str(name, PROPERTY_SEED), name),
        };

        let is_hot = hot.active && hot.name == hash;
        let mut st = if is_hot { std::mem::take(hot) } else { PropertyState::default() };
        let old_state = st.state;

        let rom = layout.last().is_none_or(|p| p.flags.contains(PanelFlags::ROM));
        let with_input = !((layout_state == WidgetLayoutState::Rom && !hot.active && !is_hot) || rom);
        let reader: Option<&Input> = if with_input { Some(&*input) } else { None };
        let mut w = WidgetCtx::new(DrawCtx::new(memory, buffer), reader, font_of(fonts, style.font), style.font, drag);
        let consumed = do_property(last_widget_state, &mut w, bounds, label, variant, inc_per_pixel, &mut st, text_edit, clipboard, behavior, &style.property);

        let now = st.state;
        if is_hot {
            *hot = st;
        } else if with_input && now != PropertyMode::Default && !hot.active {
            hot.active = true;
            hot.buffer = st.buffer;
            hot.cursor = st.cursor;
            hot.select_start = st.select_start;
            hot.select_end = st.select_end;
            hot.state = now;
            hot.name = hash;
            if now == PropertyMode::Drag {
                input.mouse.grab = true;
                input.mouse.grabbed = true;
            }
        }
        if now == PropertyMode::Default && old_state != PropertyMode::Default {
            if old_state == PropertyMode::Drag {
                input.mouse.grab = false;
                input.mouse.grabbed = false;
                input.mouse.ungrab = true;
            }
            hot.select_start = 0;
            hot.select_end = 0;
            hot.active = false;
        }
        if consumed {
            input.keyboard.clear_text();
        }
    }

    /// Integer property bound to `value`.
    pub fn property_int(&mut self, name: &str, min: i32, value: &mut i32, max: i32, step: i32, inc_per_pixel: f32) {
        let mut v = Variant::new(Kind::Int, min as f64, *value as f64, max as f64, step as f64);
        self.property(name, &mut v, inc_per_pixel);
        *value = v.value as i32;
    }

    /// Float property bound to `value`.
    pub fn property_float(&mut self, name: &str, min: f32, value: &mut f32, max: f32, step: f32, inc_per_pixel: f32) {
        let mut v = Variant::new(Kind::Float, min as f64, *value as f64, max as f64, step as f64);
        self.property(name, &mut v, inc_per_pixel);
        *value = v.value as f32;
    }

    /// Double property bound to `value`.
    pub fn property_double(&mut self, name: &str, min: f64, value: &mut f64, max: f64, step: f64, inc_per_pixel: f32) {
        let mut v = Variant::new(Kind::Double, min, *value, max, step);
        self.property(name, &mut v, inc_per_pixel);
        *value = v.value;
    }

    /// Integer property showing `value`. Returns the new value.
    pub fn propertyi(&mut self, name: &str, min: i32, value: i32, max: i32, step: i32, inc_per_pixel: f32) -> i32 {
        let mut value = value;
        self.property_int(name, min, &mut value, max, step, inc_per_pixel);
        value
    }

    /// Float property showing `value`. Returns the new value.
    pub fn propertyf(&mut self, name: &str, min: f32, value: f32, max: f32, step: f32, inc_per_pixel: f32) -> f32 {
        let mut value = value;
        self.property_float(name, min, &mut value, max, step, inc_per_pixel);
        value
    }

    /// Double property showing `value`. Returns the new value.
    pub fn propertyd(&mut self, name: &str, min: f64, value: f64, max: f64, step: f64, inc_per_pixel: f32) -> f64 {
        let mut value = value;
        self.property_double(name, min, &mut value, max, step, inc_per_pixel);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use crate::window::DragAnchor;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 200.0, 20.0);

    fn run(input: &Input, variant: &mut Variant, st: &mut PropertyState) {
        let font = TestFont;
        let style = Style::default();
        let mut drag = DragAnchor::default();
        let mut memory = Buffer::new(8192);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut w = WidgetCtx::new(DrawCtx::new(&mut memory, &mut buf), Some(input), &font, FontId(0), &mut drag);
        let mut state = WidgetStates::empty();
        let mut edit = TextEdit::new();
        do_property(&mut state, &mut w, BOUNDS, "x", variant, 1.0, st, &mut edit, &mut None, ButtonBehavior::Default, &style.property);
    }

    fn label_center() -> Vec2 {
        let font = TestFont;
        let f = FontRef { font: &font, id: FontId(0) };
        property_layout(BOUNDS, f, "x", "5", false, &Style::default().property).label.center()
    }

    #[test]
    fn layout_puts_edit_right_of_label() {
        let font = TestFont;
        let f = FontRef { font: &font, id: FontId(0) };
        let style = Style::default().property;
        let l = property_layout(BOUNDS, f, "x", "12", false, &style);
        assert_eq!(l.left.w, 5.0);
        assert_eq!(l.right.x, 200.0 - (5.0 + style.padding.x));
        assert_eq!(l.edit.w, 16.0 + 2.0 * style.padding.x);
        assert_eq!(l.empty.x, l.label.x + l.label.w);
        assert_eq!(l.empty.x + l.empty.w, l.edit.x);
    }

    #[test]
    fn pressing_the_label_drags_the_value() {
        let p = label_center();
        let mut input = Input::default();
        input.motion(p.x, p.y);
        input.begin();
        input.button(MouseButton::Left, p.x, p.y, true);
        let mut variant = Variant::new(Kind::Float, 0.0, 5.0, 100.0, 1.0);
        let mut st = PropertyState::default();
        run(&input, &mut variant, &mut st);
        assert_eq!(st.state, PropertyMode::Drag);

        input.begin();
        input.motion(p.x + 10.0, p.y);
        run(&input, &mut variant, &mut st);
        assert_eq!(st.state, PropertyMode::Drag);
        assert_eq!(variant.value, 15.0);

        input.begin();
        input.button(MouseButton::Left, p.x + 10.0, p.y, false);
        run(&input, &mut variant, &mut st);
        assert_eq!(st.state, PropertyMode::Default);
    }

    #[test]
    fn leaving_edit_mode_parses_and_clamps() {
        let mut input = Input::default();
        input.motion(500.0, 500.0);
        input.begin();
        input.button(MouseButton::Left, 500.0, 500.0, true);
        let mut variant = Variant::new(Kind::Float, 0.0, 5.0, 10.0, 1.0);
        let mut st = PropertyState { state: PropertyMode::Edit, buffer: "12.5".to_string(), ..Default::default() };
        run(&input, &mut variant, &mut st);
        assert_eq!(st.state, PropertyMode::Default);
        assert_eq!(variant.value, 10.0);

        let mut st = PropertyState { state: PropertyMode::Edit, buffer: "7.25".to_string(), ..Default::default() };
        run(&input, &mut variant, &mut st);
        assert_eq!(variant.value, 7.25);
        assert_eq!(variant.format(), "7.25");
    }

    #[test]
    fn integer_steps_truncate() {
        let mut v = Variant::new(Kind::Int, 0.0, 3.0, 10.0, 1.0);
        v.set(4.9);
        assert_eq!(v.value, 4.0);
        v.parse("42");
        assert_eq!(v.value, 10.0);
        assert_eq!(v.format(), "10");
    }
}
