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
use crate::command::*;
use crate::*;

/// Writer appending clipped draw commands to a window's command buffer.
pub struct DrawCtx<'a> {
    memory: &'a mut Buffer,
    buffer: &'a mut CommandBuffer,
}

fn pt(v: Vec2) -> [i16; 2] { [v.x as i16, v.y as i16] }

fn rect_fields(r: Rect) -> (i16, i16, u16, u16) { (r.x as i16, r.y as i16, r.w.max(0.0) as u16, r.h.max(0.0) as u16) }

/// Measures how many bytes of `text` fit into `space` pixels.
///
/// Returns the byte length, the glyph count and the width of the fitting prefix.
pub(crate) fn text_clamp(font: &dyn Font, height: f32, text: &str, space: f32) -> (usize, usize, f32) {
    let mut width = 0.0;
    let mut glyphs = 0;
    let mut buf = [0u8; 4];
    for (at, ch) in text.char_indices() {
        let w = font.text_width(height, ch.encode_utf8(&mut buf));
        if width + w > space {
            return (at, glyphs, width);
        }
        width += w;
        glyphs += 1;
    }
    (text.len(), glyphs, width)
}

impl<'a> DrawCtx<'a> {
    pub(crate) fn new(memory: &'a mut Buffer, buffer: &'a mut CommandBuffer) -> Self { Self { memory, buffer } }

    /// Current clip rectangle.
    pub fn clip(&self) -> Rect { self.buffer.clip }

    fn clipped_out(&self, r: &Rect) -> bool {
        if !self.buffer.use_clipping {
            return false;
        }
        let c = self.buffer.clip;
        c.w == 0.0 || c.h == 0.0 || !r.intersects(&c)
    }

    fn push<P: bytemuck::Pod>(&mut self, kind: CommandType, payload: &P, extra: &[u8]) { self.buffer.push(self.memory, kind, payload, extra); }

    /// Changes the clip rectangle of the following commands.
    pub fn push_scissor(&mut self, r: Rect) {
        self.buffer.clip = r;
        let (x, y, w, h) = rect_fields(r);
        self.push(CommandType::Scissor, &ScissorCmd { x, y, w, h }, &[]);
    }

    /// Straight line from `a` to `b`.
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, thickness: f32, color: Color) {
        if thickness <= 0.0 {
            return;
        }
        self.push(CommandType::Line, &LineCmd { thickness: thickness as u16, _pad: 0, begin: pt(a), end: pt(b), color }, &[]);
    }

    /// Cubic Bézier from `a` to `b` with control points `c0` and `c1`.
    pub fn stroke_curve(&mut self, a: Vec2, c0: Vec2, c1: Vec2, b: Vec2, thickness: f32, color: Color) {
        if color.a == 0 || thickness <= 0.0 {
            return;
        }
        self.push(CommandType::Curve, &CurveCmd { thickness: thickness as u16, _pad: 0, begin: pt(a), end: pt(b), ctrl: [pt(c0), pt(c1)], color }, &[]);
    }

    /// Rectangle outline.
    pub fn stroke_rect(&mut self, r: Rect, rounding: f32, thickness: f32, color: Color) {
        if color.a == 0 || r.w == 0.0 || r.h == 0.0 || thickness <= 0.0 || self.clipped_out(&r) {
            return;
        }
        let (x, y, w, h) = rect_fields(r);
        self.push(CommandType::Rect, &RectCmd { rounding: rounding as u16, thickness: thickness as u16, x, y, w, h, color }, &[]);
    }

    /// Filled rectangle.
    pub fn fill_rect(&mut self, r: Rect, rounding: f32, color: Color) {
        if color.a == 0 || r.w == 0.0 || r.h == 0.0 || self.clipped_out(&r) {
            return;
        }
        let (x, y, w, h) = rect_fields(r);
        self.push(CommandType::RectFilled, &RectCmd { rounding: rounding as u16, thickness: 0, x, y, w, h, color }, &[]);
    }

    /// Rectangle with a color per corner, given as left (top left), top (top right), right
    /// (bottom right) and bottom (bottom left).
    pub fn fill_rect_multi_color(&mut self, r: Rect, left: Color, top: Color, right: Color, bottom: Color) {
        if self.clipped_out(&r) {
            return;
        }
        let (x, y, w, h) = rect_fields(r);
        self.push(CommandType::RectMultiColor, &RectMultiColorCmd { x, y, w, h, left, top, bottom, right }, &[]);
    }

    /// Circle outline inscribed in `r`.
    pub fn stroke_circle(&mut self, r: Rect, thickness: f32, color: Color) {
        if r.w == 0.0 || r.h == 0.0 || thickness <= 0.0 || self.clipped_out(&r) {
            return;
        }
        let (x, y, w, h) = rect_fields(r);
        self.push(CommandType::Circle, &CircleCmd { x, y, w, h, thickness: thickness as u16, _pad: 0, color }, &[]);
    }

    /// Filled circle inscribed in `r`.
    pub fn fill_circle(&mut self, r: Rect, color: Color) {
        if color.a == 0 || r.w == 0.0 || r.h == 0.0 || self.clipped_out(&r) {
            return;
        }
        let (x, y, w, h) = rect_fields(r);
        self.push(CommandType::CircleFilled, &CircleCmd { x, y, w, h, thickness: 0, _pad: 0, color }, &[]);
    }

    /// Arc outline around `center` from angle `a_min` to `a_max`.
    pub fn stroke_arc(&mut self, center: Vec2, radius: f32, a_min: f32, a_max: f32, thickness: f32, color: Color) {
        if color.a == 0 || radius == 0.0 || thickness <= 0.0 {
            return;
        }
        let c = pt(center);
        self.push(CommandType::Arc, &ArcCmd { cx: c[0], cy: c[1], r: radius as u16, thickness: thickness as u16, a: [a_min, a_max], color }, &[]);
    }

    /// Filled pie slice.
    pub fn fill_arc(&mut self, center: Vec2, radius: f32, a_min: f32, a_max: f32, color: Color) {
        if color.a == 0 || radius == 0.0 {
            return;
        }
        let c = pt(center);
        self.push(CommandType::ArcFilled, &ArcCmd { cx: c[0], cy: c[1], r: radius as u16, thickness: 0, a: [a_min, a_max], color }, &[]);
    }

    fn triangle_clipped(&self, a: Vec2, b: Vec2, c: Vec2) -> bool {
        if !self.buffer.use_clipping {
            return false;
        }
        let clip = self.buffer.clip;
        !clip.contains(a) && !clip.contains(b) && !clip.contains(c)
    }

    /// Triangle outline.
    pub fn stroke_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, thickness: f32, color: Color) {
        if color.a == 0 || thickness <= 0.0 || self.triangle_clipped(a, b, c) {
            return;
        }
        self.push(CommandType::Triangle, &TriangleCmd { thickness: thickness as u16, _pad: 0, a: pt(a), b: pt(b), c: pt(c), color }, &[]);
    }

    /// Filled triangle.
    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        if color.a == 0 || self.triangle_clipped(a, b, c) {
            return;
        }
        self.push(CommandType::TriangleFilled, &TriangleCmd { thickness: 0, _pad: 0, a: pt(a), b: pt(b), c: pt(c), color }, &[]);
    }

    fn poly(&mut self, kind: CommandType, points: &[Vec2], thickness: f32, color: Color) {
        let count = points.len().min(u16::MAX as usize);
        let packed: Vec<[i16; 2]> = points[..count].iter().map(|p| pt(*p)).collect();
        let header = PolyCmd { color, thickness: thickness as u16, point_count: count as u16 };
        self.push(kind, &header, bytemuck::cast_slice(&packed));
    }

    /// Closed polygon outline.
    pub fn stroke_polygon(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        if color.a == 0 || thickness <= 0.0 || points.is_empty() {
            return;
        }
        self.poly(CommandType::Polygon, points, thickness, color);
    }

    /// Filled convex polygon.
    pub fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if color.a == 0 || points.is_empty() {
            return;
        }
        self.poly(CommandType::PolygonFilled, points, 0.0, color);
    }

    /// Open polyline.
    pub fn stroke_polyline(&mut self, points: &[Vec2], thickness: f32, color: Color) {
        if color.a == 0 || thickness <= 0.0 || points.is_empty() {
            return;
        }
        self.poly(CommandType::Polyline, points, thickness, color);
    }

    /// Textured quad.
    pub fn draw_image(&mut self, r: Rect, image: &Image, color: Color) {
        if self.clipped_out(&r) {
            return;
        }
        let (x, y, w, h) = rect_fields(r);
        let cmd = ImageCmd { x, y, w, h, texture: image.texture.0, img_w: image.w, img_h: image.h, region: image.region, color };
        self.push(CommandType::Image, &cmd, &[]);
    }

    /// Host drawn region tagged with `id`.
    pub fn push_custom(&mut self, r: Rect, id: u32) {
        if self.clipped_out(&r) {
            return;
        }
        let (x, y, w, h) = rect_fields(r);
        self.push(CommandType::Custom, &CustomCmd { x, y, w, h, id }, &[]);
    }

    /// Text run clamped to the width of `r`.
    pub fn draw_text(&mut self, r: Rect, text: &str, font_id: FontId, font: &dyn Font, bg: Color, fg: Color) {
        if text.is_empty() || (bg.a == 0 && fg.a == 0) || self.clipped_out(&r) {
            return;
        }
        let height = font.height();
        let mut len = text.len();
        if font.text_width(height, text) > r.w {
            len = text_clamp(font, height, text, r.w).0;
        }
        if len == 0 {
            return;
        }
        let (x, y, w, h) = rect_fields(r);
        let cmd = TextCmd { font: font_id.0, x, y, w, h, background: bg, foreground: fg, height, length: len as u32 };
        self.push(CommandType::Text, &cmd, &text.as_bytes()[..len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;

    fn collect(memory: &Buffer, buf: &CommandBuffer) -> Vec<CommandType> {
        let mut kinds = Vec::new();
        let mut at = buf.begin as usize;
        while at < buf.end as usize {
            let h = read_header(memory.memory(), at);
            kinds.push(CommandType::from_u32(h.kind));
            at = h.next as usize;
        }
        kinds
    }

    #[test]
    fn degenerate_shapes_are_skipped() {
        let mut memory = Buffer::new(256);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        {
            let mut d = DrawCtx::new(&mut memory, &mut buf);
            d.push_scissor(rect(0.0, 0.0, 100.0, 100.0));
            d.fill_rect(rect(0.0, 0.0, 0.0, 10.0), 0.0, color(255, 0, 0, 255));
            d.fill_rect(rect(0.0, 0.0, 10.0, 10.0), 0.0, color(255, 0, 0, 0));
            d.fill_rect(rect(200.0, 200.0, 10.0, 10.0), 0.0, color(255, 0, 0, 255));
            d.fill_circle(rect(10.0, 10.0, 10.0, 10.0), color(1, 2, 3, 4));
            d.stroke_arc(vec2(5.0, 5.0), 0.0, 0.0, 1.0, 1.0, color(1, 2, 3, 4));
            d.stroke_line(vec2(0.0, 0.0), vec2(1.0, 1.0), 0.0, color(1, 2, 3, 4));
        }
        assert_eq!(collect(&memory, &buf), vec![CommandType::Scissor, CommandType::CircleFilled]);
    }

    #[test]
    fn text_is_clamped_to_rect_width() {
        let mut memory = Buffer::new(256);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let font = TestFont;
        {
            let mut d = DrawCtx::new(&mut memory, &mut buf);
            d.draw_text(rect(0.0, 0.0, 20.0, 10.0), "hello", FontId(0), &font, color(0, 0, 0, 0), color(255, 255, 255, 255));
        }
        let at = buf.last.unwrap();
        match decode(memory.memory(), at.get()) {
            Command::Text { text, .. } => assert_eq!(text, "he"),
            _ => panic!("expected text"),
        }
    }
}
