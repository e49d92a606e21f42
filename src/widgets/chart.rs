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
//! Line and column charts with up to [`CHART_MAX_SLOT`] data series.

use bitflags::bitflags;

use crate::draw_context::DrawCtx;
use crate::*;

/// Data series a single chart can hold.
pub const CHART_MAX_SLOT: usize = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// How a chart series is drawn.
pub enum ChartType {
    /// Points joined by lines.
    #[default]
    Lines,
    /// One bar per value.
    Column,
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Interaction with a pushed chart value.
    pub struct ChartEvents : u32 {
        /// The pointer is over the value.
        const HOVERING = 0x01;
        /// The value was clicked.
        const CLICKED = 0x02;
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct ChartSlot {
    pub kind: ChartType,
    pub color: Color,
    pub highlight: Color,
    pub min: f32,
    pub max: f32,
    pub range: f32,
    pub count: usize,
    pub last: Vec2,
    pub index: usize,
}

impl ChartSlot {
    fn new(kind: ChartType, color: Color, highlight: Color, count: usize, min: f32, max: f32) -> Self {
        let (min, max) = (min.min(max), min.max(max));
        Self { kind, color, highlight, min, max, range: max - min, count, ..Default::default() }
    }
}

/// Chart being filled in the current panel.
#[derive(Clone, Debug, Default)]
pub(crate) struct Chart {
    pub slots: Vec<ChartSlot>,
    pub area: Rect,
}

fn push_line(draw: &mut DrawCtx<'_>, input: Option<&Input>, g: &mut Chart, value: f32, slot: usize) -> ChartEvents {
    let area = g.area;
    let s = &mut g.slots[slot];
    let ratio = if s.range != 0.0 { (value - s.min) / s.range } else { 0.0 };
    let mut ret = ChartEvents::empty();

    if s.index == 0 {
        s.last = vec2(area.x, (area.y + area.h) - ratio * area.h);
        let bounds = Rect::new(s.last.x - 2.0, s.last.y - 2.0, 4.0, 4.0);
        let mut color = s.color;
        if let Some(i) = input
            && Rect::new(s.last.x - 3.0, s.last.y - 3.0, 6.0, 6.0).contains(i.mouse.pos)
        {
            if i.is_mouse_hovering_rect(bounds) {
                ret |= ChartEvents::HOVERING;
            }
            if i.is_mouse_pressed(MouseButton::Left) {
                ret |= ChartEvents::CLICKED;
            }
            color = s.highlight;
        }
        draw.fill_rect(bounds, 0.0, color);
        s.index += 1;
        return ret;
    }

    let step = area.w / s.count.max(1) as f32;
    let cur = vec2(area.x + step * s.index as f32, (area.y + area.h) - ratio * area.h);
    draw.stroke_line(s.last, cur, 1.0, s.color);

    let mut color = s.color;
    if let Some(i) = input
        && i.is_mouse_hovering_rect(Rect::new(cur.x - 3.0, cur.y - 3.0, 6.0, 6.0))
    {
        ret = ChartEvents::HOVERING;
        if i.is_mouse_released(MouseButton::Left) {
            ret |= ChartEvents::CLICKED;
        }
        color = s.highlight;
    }
    draw.fill_rect(Rect::new(cur.x - 2.0, cur.y - 2.0, 4.0, 4.0), 0.0, color);
    s.last = cur;
    s.index += 1;
    ret
}

/// Rectangle of the next bar of a column series.
fn column_rect(area: Rect, s: &ChartSlot, value: f32) -> Rect {
    let w = if s.count > 0 { (area.w - (s.count - 1) as f32) / s.count as f32 } else { 0.0 };
    let range = if s.range != 0.0 { s.range } else { 1.0 };
    let h = area.h * (value / range).abs();
    let y = if value >= 0.0 {
        let ratio = (value + s.min.abs()) / range.abs();
        (area.y + area.h) - area.h * ratio
    } else {
        let ratio = (value - s.max) / range;
        area.y + area.h * ratio.abs() - h
    };
    let x = area.x + s.index as f32 * w + s.index as f32;
    Rect::new(x, y, w, h)
}

fn push_column(draw: &mut DrawCtx<'_>, input: Option<&Input>, g: &mut Chart, value: f32, slot: usize) -> ChartEvents {
    let area = g.area;
    let s = &mut g.slots[slot];
    if s.index >= s.count {
        return ChartEvents::empty();
    }
    let item = column_rect(area, s, value);
    let mut ret = ChartEvents::empty();
    let mut color = s.color;
    if let Some(i) = input
        && i.is_mouse_hovering_rect(item)
    {
        ret = ChartEvents::HOVERING;
        if i.is_mouse_released(MouseButton::Left) {
            ret |= ChartEvents::CLICKED;
        }
        color = s.highlight;
    }
    draw.fill_rect(item, 0.0, color);
    s.index += 1;
    ret
}

fn draw_chart_background(draw: &mut DrawCtx<'_>, bounds: Rect, style: &StyleChart) {
    match style.background {
        StyleItem::Image(img) => draw.draw_image(bounds, &img, Color::rgba(255, 255, 255, 255)),
        StyleItem::Color(c) => {
            draw.fill_rect(bounds, style.rounding, style.border_color);
            draw.fill_rect(bounds.shrink(style.border), style.rounding, c);
        }
        StyleItem::Hide => {}
    }
}

impl Context {
    fn chart_mut(&mut self) -> Option<&mut Chart> { self.panel_mut().map(|p| &mut p.chart) }

    /// Starts a chart of `count` values in `[min, max]` using the style's colors.
    pub fn chart_begin(&mut self, kind: ChartType, count: usize, min: f32, max: f32) -> bool {
        let (color, highlight) = (self.style.chart.color, self.style.chart.selected_color);
        self.chart_begin_colored(kind, color, highlight, count, min, max)
    }

    /// Starts a chart whose first series uses `color` and `highlight`.
    pub fn chart_begin_colored(&mut self, kind: ChartType, color: Color, highlight: Color, count: usize, min: f32, max: f32) -> bool {
        let Some((bounds, _)) = self.widget_rect() else {
            if let Some(chart) = self.chart_mut() {
                *chart = Chart::default();
            }
            return false;
        };
        let style = &self.style.chart;
        let area = Rect::new(
            bounds.x + style.padding.x,
            bounds.y + style.padding.y,
            (bounds.w - 2.0 * style.padding.x).max(2.0 * style.padding.x),
            (bounds.h - 2.0 * style.padding.y).max(2.0 * style.padding.y),
        );
        if let Some(chart) = self.chart_mut() {
            *chart = Chart { slots: vec![ChartSlot::new(kind, color, highlight, count, min, max)], area };
        }
        self.with_widget(false, |_, w, s| draw_chart_background(&mut w.draw, bounds, &s.chart));
        true
    }

    /// Adds another series to the open chart.
    pub fn chart_add_slot(&mut self, kind: ChartType, count: usize, min: f32, max: f32) {
        let (color, highlight) = (self.style.chart.color, self.style.chart.selected_color);
        self.chart_add_slot_colored(kind, color, highlight, count, min, max);
    }

    /// Adds another series with its own colors to the open chart.
    pub fn chart_add_slot_colored(&mut self, kind: ChartType, color: Color, highlight: Color, count: usize, min: f32, max: f32) {
        let Some(chart) = self.chart_mut() else { return };
        if chart.slots.is_empty() || chart.slots.len() >= CHART_MAX_SLOT {
            return;
        }
        chart.slots.push(ChartSlot::new(kind, color, highlight, count, min, max));
    }

    /// Pushes the next value of series `slot`.
    pub fn chart_push_slot(&mut self, value: f32, slot: usize) -> ChartEvents {
        let Some(chart) = self.chart_mut() else { return ChartEvents::empty() };
        if slot >= chart.slots.len() {
            return ChartEvents::empty();
        }
        let mut chart = std::mem::take(chart);
        let events = self
            .with_widget(true, |_, w, _| match chart.slots[slot].kind {
                ChartType::Lines => push_line(&mut w.draw, w.input, &mut chart, value, slot),
                ChartType::Column => push_column(&mut w.draw, w.input, &mut chart, value, slot),
            })
            .unwrap_or_default();
        if let Some(c) = self.chart_mut() {
            *c = chart;
        }
        events
    }

    /// Pushes the next value of the first series.
    pub fn chart_push(&mut self, value: f32) -> ChartEvents { self.chart_push_slot(value, 0) }

    /// Closes the open chart.
    pub fn chart_end(&mut self) {
        if let Some(chart) = self.chart_mut() {
            *chart = Chart::default();
        }
    }

    /// Charts `values` scaled to their own minimum and maximum.
    pub fn plot(&mut self, kind: ChartType, values: &[f32]) {
        let Some(first) = values.first() else { return };
        let (min, max) = values.iter().fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        if self.chart_begin(kind, values.len(), min, max) {
            for v in values {
                self.chart_push(*v);
            }
            self.chart_end();
        }
    }

    /// Charts `count` values produced by `value`.
    pub fn plot_function(&mut self, kind: ChartType, count: usize, value: impl Fn(usize) -> f32) {
        if count == 0 {
            return;
        }
        let values: Vec<f32> = (0..count).map(value).collect();
        self.plot(kind, &values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(kind: ChartType) -> Chart {
        Chart {
            slots: vec![ChartSlot::new(kind, Color::rgb(1, 1, 1), Color::rgb(2, 2, 2), 4, 0.0, 10.0)],
            area: rect(0.0, 0.0, 103.0, 100.0),
        }
    }

    fn push(input: &Input, g: &mut Chart, value: f32) -> ChartEvents {
        let mut memory = Buffer::new(4096);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut draw = DrawCtx::new(&mut memory, &mut buf);
        match g.slots[0].kind {
            ChartType::Lines => push_line(&mut draw, Some(input), g, value, 0),
            ChartType::Column => push_column(&mut draw, Some(input), g, value, 0),
        }
    }

    #[test]
    fn columns_leave_a_pixel_between_bars() {
        let g = chart(ChartType::Column);
        let mut s = g.slots[0];
        let first = column_rect(g.area, &s, 5.0);
        s.index = 1;
        let second = column_rect(g.area, &s, 10.0);
        assert_eq!(first.w, 25.0);
        assert_eq!(first.h, 50.0);
        assert_eq!(first.y, 50.0);
        assert_eq!(second.x, 26.0);
        assert_eq!(second.y, 0.0);
    }

    #[test]
    fn hovering_a_bar_reports_it() {
        let mut input = Input::default();
        input.motion(10.0, 90.0);
        let mut g = chart(ChartType::Column);
        assert_eq!(push(&input, &mut g, 5.0), ChartEvents::HOVERING);
        // the second bar is not under the pointer
        assert_eq!(push(&input, &mut g, 5.0), ChartEvents::empty());
        assert_eq!(g.slots[0].index, 2);
    }

    #[test]
    fn full_column_series_ignores_extra_values() {
        let input = Input::default();
        let mut g = chart(ChartType::Column);
        for _ in 0..6 {
            push(&input, &mut g, 1.0);
        }
        assert_eq!(g.slots[0].index, 4);
    }

    #[test]
    fn lines_advance_by_step() {
        let input = Input::default();
        let mut g = chart(ChartType::Lines);
        push(&input, &mut g, 0.0);
        assert_eq!(g.slots[0].last, vec2(0.0, 100.0));
        push(&input, &mut g, 10.0);
        assert_eq!(g.slots[0].last, vec2(25.75, 0.0));
    }
}
