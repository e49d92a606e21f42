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
//! Labels, wrapped text, values and images.

use crate::draw_context::{DrawCtx, text_clamp};
use crate::widgets::FontRef;
use crate::*;

#[derive(Copy, Clone, Debug)]
pub(crate) struct TextStyle {
    pub padding: Vec2,
    pub background: Color,
    pub color: Color,
}

/// Draws a single line of `text` aligned inside `b`.
pub(crate) fn widget_text(draw: &mut DrawCtx<'_>, font: FontRef<'_>, b: Rect, text: &str, t: &TextStyle, align: TextAlign) {
    let mut b = b;
    b.h = b.h.max(2.0 * t.padding.y);
    let mut label = Rect::new(0.0, b.y + t.padding.y, 0.0, font.height().min(b.h - 2.0 * t.padding.y));
    let text_width = font.width(text) + 2.0 * t.padding.x;

    if align.contains(TextAlign::LEFT) {
        label.x = b.x + t.padding.x;
        label.w = (b.w - 2.0 * t.padding.x).max(0.0);
    } else if align.is_centered() {
        label.w = (2.0 * t.padding.x + text_width).max(1.0);
        label.x = b.x + t.padding.x + ((b.w - 2.0 * t.padding.x) - label.w) / 2.0;
        label.x = label.x.max(b.x + t.padding.x);
        label.w = (b.x + b.w).min(label.x + label.w);
        if label.w >= label.x {
            label.w -= label.x;
        }
    } else if align.is_right() {
        label.x = (b.x + t.padding.x).max((b.x + b.w) - (2.0 * t.padding.x + text_width));
        label.w = text_width + 2.0 * t.padding.x;
    } else {
        return;
    }

    if align.is_middle() {
        label.y = b.y + b.h / 2.0 - font.height() / 2.0;
        label.h = (b.h / 2.0).max(b.h - (b.h / 2.0 + font.height() / 2.0));
    } else if align.is_bottom() {
        label.y = b.y + b.h - font.height();
        label.h = font.height();
    }
    draw.draw_text(label, text, font.id, font.font, t.background, t.color);
}

/// Bytes of the next wrapped line: as many glyphs as fit, cut back to the last space when the
/// rest of the text does not fit.
fn wrap_clamp(font: FontRef<'_>, text: &str, space: f32) -> usize {
    let (fitting, _, _) = text_clamp(font.font, font.height(), text, space);
    if fitting >= text.len() {
        return fitting;
    }
    match text[..fitting].rfind(' ') {
        Some(at) => at + 1,
        None => fitting,
    }
}

/// Draws `text` wrapped at spaces into as many lines as fit into `b`.
pub(crate) fn widget_text_wrap(draw: &mut DrawCtx<'_>, font: FontRef<'_>, b: Rect, text: &str, t: &TextStyle) {
    let line_style = TextStyle { padding: Vec2::default(), ..*t };
    let mut b = b;
    b.w = b.w.max(2.0 * t.padding.x);
    b.h = b.h.max(2.0 * t.padding.y) - 2.0 * t.padding.y;

    let mut line = Rect::new(b.x + t.padding.x, b.y + t.padding.y, b.w - 2.0 * t.padding.x, 2.0 * t.padding.y + font.height());
    let mut rest = text;
    while !rest.is_empty() {
        let fitting = wrap_clamp(font, rest, line.w);
        if fitting == 0 || line.y + line.h >= b.y + b.h {
            break;
        }
        widget_text(draw, font, line, &rest[..fitting], &line_style, TextAlign::TEXT_LEFT);
        rest = &rest[fitting..];
        line.y += font.height() + 2.0 * t.padding.y;
    }
}

impl Context {
    fn text_style(&self, color: Color) -> TextStyle { TextStyle { padding: self.style.text.padding, background: self.style.window.background, color } }

    /// Single line label in the default text color.
    pub fn label(&mut self, text: &str, align: TextAlign) {
        let color = self.style.text.color;
        self.label_colored(text, align, color);
    }

    /// Single line label in `color`.
    pub fn label_colored(&mut self, text: &str, align: TextAlign, color: Color) {
        let bounds = self.alloc_space();
        let t = self.text_style(color);
        self.with_widget(false, |_, w, _| widget_text(&mut w.draw, w.font, bounds, text, &t, align));
    }

    /// Label wrapped at spaces over as many lines as the row height allows.
    pub fn label_wrap(&mut self, text: &str) {
        let color = self.style.text.color;
        self.label_colored_wrap(text, color);
    }

    /// Wrapped label in `color`.
    pub fn label_colored_wrap(&mut self, text: &str, color: Color) {
        let bounds = self.alloc_space();
        let t = self.text_style(color);
        self.with_widget(false, |_, w, _| widget_text_wrap(&mut w.draw, w.font, bounds, text, &t));
    }

    /// `prefix: value` label.
    pub fn value_int(&mut self, prefix: &str, value: i32) { self.label(&format!("{prefix}: {value}"), TextAlign::TEXT_LEFT); }

    /// `prefix: value` label for unsigned values.
    pub fn value_uint(&mut self, prefix: &str, value: u32) { self.label(&format!("{prefix}: {value}"), TextAlign::TEXT_LEFT); }

    /// `prefix: value` label with three decimals.
    pub fn value_float(&mut self, prefix: &str, value: f32) { self.label(&format!("{prefix}: {value:.3}"), TextAlign::TEXT_LEFT); }

    /// `prefix: true|false` label.
    pub fn value_bool(&mut self, prefix: &str, value: bool) { self.label(&format!("{prefix}: {value}"), TextAlign::TEXT_LEFT); }

    /// `prefix: (r, g, b, a)` label.
    pub fn value_color_byte(&mut self, prefix: &str, c: Color) { self.label(&format!("{prefix}: ({}, {}, {}, {})", c.r, c.g, c.b, c.a), TextAlign::TEXT_LEFT); }

    /// Image stretched over the next widget rectangle.
    pub fn image(&mut self, img: Image) { self.image_color(img, Color::rgba(255, 255, 255, 255)); }

    /// Image tinted with `color`.
    pub fn image_color(&mut self, img: Image, color: Color) {
        let Some((bounds, _)) = self.widget_rect() else { return };
        self.with_widget(false, |_, w, _| w.draw.draw_image(bounds, &img, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;

    fn texts(memory: &Buffer, buf: &CommandBuffer) -> Vec<(String, i32, i32)> {
        Commands::new(memory.memory(), Some(buf.begin as usize), buf.end as usize)
            .filter_map(|c| match c {
                Command::Text { text, rect, .. } => Some((text.to_string(), rect.x, rect.y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn wrapped_lines_break_at_spaces() {
        let font = TestFont;
        let f = FontRef { font: &font, id: FontId(0) };
        let mut memory = Buffer::new(1024);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        {
            let mut d = DrawCtx::new(&mut memory, &mut buf);
            let t = TextStyle { padding: Vec2::default(), background: Color::rgba(0, 0, 0, 255), color: Color::rgba(255, 255, 255, 255) };
            // 10 glyphs per line
            widget_text_wrap(&mut d, f, rect(0.0, 0.0, 80.0, 100.0), "hello big world", &t);
        }
        let lines = texts(&memory, &buf);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, "hello big ");
        assert_eq!(lines[1].0, "world");
        assert_eq!(lines[1].2 - lines[0].2, 10);
    }

    #[test]
    fn right_aligned_text_hugs_the_edge() {
        let font = TestFont;
        let f = FontRef { font: &font, id: FontId(0) };
        let mut memory = Buffer::new(1024);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        {
            let mut d = DrawCtx::new(&mut memory, &mut buf);
            let t = TextStyle { padding: Vec2::default(), background: Color::rgba(0, 0, 0, 255), color: Color::rgba(255, 255, 255, 255) };
            widget_text(&mut d, f, rect(0.0, 0.0, 100.0, 20.0), "abc", &t, TextAlign::TEXT_RIGHT);
        }
        let lines = texts(&memory, &buf);
        assert_eq!(lines, vec![("abc".to_string(), 76, 5)]);
    }
}
