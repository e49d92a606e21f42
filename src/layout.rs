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
//! Row layout engine placing widgets inside the innermost panel.

use crate::draw_context::DrawCtx;
use crate::panel::{Panel, PanelFlags, PanelType, panel_padding};
use crate::*;

/// Columns a template row can hold.
pub const MAX_LAYOUT_ROW_TEMPLATE_COLUMNS: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Whether row sizes are ratios of the panel width or pixels.
pub enum LayoutFormat {
    /// Sizes are ratios in `0..=1` of the usable width.
    Dynamic,
    /// Sizes are pixels.
    Static,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Placement mode of the current row.
pub enum RowLayoutType {
    /// Equal columns scaled to the panel.
    #[default]
    DynamicFixed,
    /// Ratios pushed one widget at a time.
    DynamicRow,
    /// Free placement with rectangles in panel ratios.
    DynamicFree,
    /// One ratio per column.
    Dynamic,
    /// Equal columns of a fixed pixel width.
    StaticFixed,
    /// Pixel widths pushed one widget at a time.
    StaticRow,
    /// Free placement in pixels.
    StaticFree,
    /// One pixel width per column.
    Static,
    /// Mix of static, variable and dynamic columns.
    Template,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct RowLayout {
    pub kind: RowLayoutType,
    pub index: usize,
    pub height: f32,
    pub min_height: f32,
    pub columns: usize,
    pub ratio: Vec<f32>,
    pub item_width: f32,
    pub item_height: f32,
    pub item_offset: f32,
    pub filled: f32,
    pub item: Rect,
    pub tree_depth: i32,
    pub templates: Vec<f32>,
}

/// Default minimum row height for `font`.
pub(crate) fn min_row_height(style: &Style, font: &dyn Font) -> f32 { font.height() + style.text.padding.y * 2.0 + style.window.min_row_height_padding * 2.0 }

/// Width left for widgets once the panel padding and the gaps between `columns` are removed.
pub(crate) fn usable_space(style: &Style, kind: PanelType, total: f32, columns: usize) -> f32 {
    let padding = panel_padding(style, kind);
    let gaps = columns.saturating_sub(1) as f32 * style.window.spacing.x;
    total - 2.0 * padding.x - gaps
}

fn frac(x: f32) -> f32 { x - x.trunc() }

/// Rectangle of the next widget of `layout`. With `modify` the row cursor advances.
pub(crate) fn widget_space(style: &Style, layout: &mut Panel, modify: bool) -> Rect {
    let spacing = style.window.spacing;
    let padding = panel_padding(style, layout.kind);
    let panel_space = usable_space(style, layout.kind, layout.bounds.w, layout.row.columns);
    let row = &mut layout.row;
    let index = row.index as f32;

    let (item_width, item_offset, item_spacing) = match row.kind {
        RowLayoutType::DynamicFixed => {
            let w = panel_space.max(1.0) / row.columns.max(1) as f32;
            let offset = index * w;
            (w + frac(offset), offset, index * spacing.x)
        }
        RowLayoutType::DynamicRow => {
            let w = row.item_width * panel_space;
            let offset = row.item_offset;
            if modify {
                row.item_offset += w + spacing.x;
                row.filled += row.item_width;
                row.index = 0;
            }
            (w + frac(offset), offset, 0.0)
        }
        RowLayoutType::DynamicFree => {
            let x = layout.at_x + layout.bounds.w * row.item.x - layout.offset.x;
            let y = layout.at_y + row.height * row.item.y - layout.offset.y;
            return Rect::new(x, y, layout.bounds.w * row.item.w + frac(x), row.height * row.item.h + frac(y));
        }
        RowLayoutType::Dynamic => {
            let r = row.ratio.get(row.index).copied().unwrap_or(0.0);
            let ratio = if r < 0.0 { row.item_width } else { r };
            let w = ratio * panel_space;
            let offset = row.item_offset;
            if modify {
                row.item_offset += w;
                row.filled += ratio;
            }
            (w + frac(offset), offset, index * spacing.x)
        }
        RowLayoutType::StaticFixed => (row.item_width, index * row.item_width, index * spacing.x),
        RowLayoutType::StaticRow => {
            let offset = row.item_offset;
            if modify {
                row.item_offset += row.item_width;
            }
            (row.item_width, offset, index * spacing.x)
        }
        RowLayoutType::StaticFree => {
            let x = layout.at_x + row.item.x;
            if modify && x + row.item.w > layout.max_x {
                layout.max_x = x + row.item.w;
            }
            return Rect::new(x - layout.offset.x, layout.at_y + row.item.y - layout.offset.y, row.item.w, row.item.h);
        }
        RowLayoutType::Static => {
            let w = row.ratio.get(row.index).copied().unwrap_or(0.0);
            let offset = row.item_offset;
            if modify {
                row.item_offset += w;
            }
            (w, offset, index * spacing.x)
        }
        RowLayoutType::Template => {
            let w = row.templates.get(row.index).copied().unwrap_or(0.0);
            let offset = row.item_offset;
            if modify {
                row.item_offset += w;
            }
            (w + frac(offset), offset, index * spacing.x)
        }
    };

    let mut bounds = Rect::new(layout.at_x + item_offset + item_spacing + padding.x, layout.at_y - layout.offset.y, item_width, row.height - spacing.y);
    if modify && bounds.x + bounds.w > layout.max_x {
        layout.max_x = bounds.x + bounds.w;
    }
    bounds.x -= layout.offset.x;
    bounds
}

impl Context {
    /// Starts a new row of `cols` columns, `height` pixels high (0 uses the minimum row height).
    fn panel_layout(&mut self, height: f32, cols: usize) {
        let Some(cur) = self.current else { return };
        let Context { windows, memory, style, .. } = self;
        let Some(win) = windows.get_mut(cur) else { return };
        let outer = win.bounds;
        let Some(layout) = win.layout.last_mut() else {
            debug_assert!(false, "layout call outside of a window");
            return;
        };
        let spacing = style.window.spacing;
        layout.row.index = 0;
        layout.at_y += layout.row.height;
        layout.row.columns = cols;
        layout.row.height = if height == 0.0 { height.max(layout.row.min_height) + spacing.y } else { height + spacing.y };
        layout.row.item_offset = 0.0;
        if layout.flags.contains(PanelFlags::DYNAMIC) {
            let background = Rect::new(outer.x, layout.at_y - 1.0, outer.w, layout.row.height + 1.0);
            let color = style.window.background;
            DrawCtx::new(memory, &mut win.buffer).fill_rect(background, 0.0, color);
        }
    }

    fn row_layout(&mut self, fmt: LayoutFormat, height: f32, cols: usize, width: f32) {
        self.panel_layout(height, cols);
        if let Some(layout) = self.panel_mut() {
            layout.row.kind = match fmt {
                LayoutFormat::Dynamic => RowLayoutType::DynamicFixed,
                LayoutFormat::Static => RowLayoutType::StaticFixed,
            };
            layout.row.ratio.clear();
            layout.row.filled = 0.0;
            layout.row.item_offset = 0.0;
            layout.row.item_width = width;
        }
    }

    /// Row of `cols` equally wide columns filling the panel.
    pub fn layout_row_dynamic(&mut self, height: f32, cols: usize) { self.row_layout(LayoutFormat::Dynamic, height, cols, 0.0); }

    /// Row of `cols` columns, `item_width` pixels each.
    pub fn layout_row_static(&mut self, height: f32, item_width: f32, cols: usize) { self.row_layout(LayoutFormat::Static, height, cols, item_width); }

    /// Starts a row whose column sizes are pushed one at a time.
    pub fn layout_row_begin(&mut self, fmt: LayoutFormat, height: f32, cols: usize) {
        self.panel_layout(height, cols);
        if let Some(layout) = self.panel_mut() {
            layout.row.kind = match fmt {
                LayoutFormat::Dynamic => RowLayoutType::DynamicRow,
                LayoutFormat::Static => RowLayoutType::StaticRow,
            };
            layout.row.ratio.clear();
            layout.row.filled = 0.0;
            layout.row.item_width = 0.0;
            layout.row.item_offset = 0.0;
            layout.row.columns = cols;
        }
    }

    /// Size of the next widget: a ratio for dynamic rows, pixels for static rows.
    pub fn layout_row_push(&mut self, ratio_or_width: f32) {
        let Some(layout) = self.panel_mut() else { return };
        match layout.row.kind {
            RowLayoutType::DynamicRow => {
                let ratio = ratio_or_width;
                if ratio + layout.row.filled > 1.0 {
                    return;
                }
                layout.row.item_width = if ratio > 0.0 { ratio.clamp(0.0, 1.0) } else { 1.0 - layout.row.filled };
            }
            RowLayoutType::StaticRow => layout.row.item_width = ratio_or_width,
            _ => {}
        }
    }

    /// Ends a row started with [`Context::layout_row_begin`].
    pub fn layout_row_end(&mut self) {
        if let Some(layout) = self.panel_mut() {
            layout.row.item_width = 0.0;
            layout.row.item_offset = 0.0;
        }
    }

    /// Row with one size per column. Negative dynamic ratios share the remaining width.
    pub fn layout_row(&mut self, fmt: LayoutFormat, height: f32, ratio: &[f32]) {
        self.panel_layout(height, ratio.len());
        let Some(layout) = self.panel_mut() else { return };
        layout.row.ratio = ratio.to_vec();
        match fmt {
            LayoutFormat::Dynamic => {
                let n_undef = ratio.iter().filter(|r| **r < 0.0).count();
                let r: f32 = ratio.iter().filter(|r| **r >= 0.0).sum();
                let r = (1.0 - r).clamp(0.0, 1.0);
                layout.row.kind = RowLayoutType::Dynamic;
                layout.row.item_width = if r > 0.0 && n_undef > 0 { r / n_undef as f32 } else { 0.0 };
            }
            LayoutFormat::Static => {
                layout.row.kind = RowLayoutType::Static;
                layout.row.item_width = 0.0;
            }
        }
        layout.row.item_offset = 0.0;
        layout.row.filled = 0.0;
    }

    /// Starts a template row. Columns are declared with the `layout_row_template_push_*` calls.
    pub fn layout_row_template_begin(&mut self, height: f32) {
        self.panel_layout(height, 1);
        let Some(layout) = self.panel_mut() else { return };
        let row = &mut layout.row;
        row.kind = RowLayoutType::Template;
        row.columns = 0;
        row.ratio.clear();
        row.templates.clear();
        row.item_width = 0.0;
        row.item_height = 0.0;
        row.item_offset = 0.0;
        row.filled = 0.0;
        row.item = Rect::default();
    }

    fn template_push(&mut self, value: f32) {
        let Some(layout) = self.panel_mut() else { return };
        if layout.row.kind != RowLayoutType::Template || layout.row.columns >= MAX_LAYOUT_ROW_TEMPLATE_COLUMNS {
            return;
        }
        layout.row.templates.push(value);
        layout.row.columns += 1;
    }

    /// Column sharing the remaining width with the other dynamic columns.
    pub fn layout_row_template_push_dynamic(&mut self) { self.template_push(-1.0); }

    /// Column sharing the remaining width but never narrower than `min_width`.
    pub fn layout_row_template_push_variable(&mut self, min_width: f32) { self.template_push(-min_width); }

    /// Column of a fixed pixel width.
    pub fn layout_row_template_push_static(&mut self, width: f32) { self.template_push(width); }

    /// Resolves the template column widths.
    pub fn layout_row_template_end(&mut self) {
        let Context { windows, style, current, .. } = self;
        let Some(layout) = current.and_then(|c| windows.get_mut(c)).and_then(|w| w.layout.last_mut()) else { return };
        if layout.row.kind != RowLayoutType::Template {
            return;
        }
        let mut variable_count = 0;
        let mut min_variable_count = 0;
        let mut min_fixed_width = 0.0;
        let mut total_fixed_width = 0.0;
        let mut max_variable_width: f32 = 0.0;
        for &width in &layout.row.templates {
            if width >= 0.0 {
                total_fixed_width += width;
                min_fixed_width += width;
            } else if width < -1.0 {
                total_fixed_width += -width;
                max_variable_width = max_variable_width.max(-width);
                variable_count += 1;
            } else {
                min_variable_count += 1;
                variable_count += 1;
            }
        }
        if variable_count > 0 {
            let space = usable_space(style, layout.kind, layout.bounds.w, layout.row.columns);
            let mut var_width = (space - min_fixed_width).max(0.0) / variable_count as f32;
            let enough_space = var_width >= max_variable_width;
            if !enough_space {
                var_width = (space - total_fixed_width).max(0.0) / min_variable_count.max(1) as f32;
            }
            for width in layout.row.templates.iter_mut() {
                *width = if *width >= 0.0 {
                    *width
                } else if *width < -1.0 && !enough_space {
                    -*width
                } else {
                    var_width
                };
            }
        }
    }

    /// Starts a free placement row of `height` pixels.
    pub fn layout_space_begin(&mut self, fmt: LayoutFormat, height: f32, widget_count: usize) {
        self.panel_layout(height, widget_count);
        let Some(layout) = self.panel_mut() else { return };
        layout.row.kind = match fmt {
            LayoutFormat::Static => RowLayoutType::StaticFree,
            LayoutFormat::Dynamic => RowLayoutType::DynamicFree,
        };
        layout.row.ratio.clear();
        layout.row.filled = 0.0;
        layout.row.item_width = 0.0;
        layout.row.item_offset = 0.0;
    }

    /// Places the next widget at `r`, relative to the row (pixels or ratios).
    pub fn layout_space_push(&mut self, r: Rect) {
        if let Some(layout) = self.panel_mut() {
            layout.row.item = r;
        }
    }

    /// Ends a free placement row.
    pub fn layout_space_end(&mut self) {
        if let Some(layout) = self.panel_mut() {
            layout.row.item_width = 0.0;
            layout.row.item_height = 0.0;
            layout.row.item_offset = 0.0;
            layout.row.item = Rect::default();
        }
    }

    /// Screen space rectangle available to the current free placement row.
    pub fn layout_space_bounds(&self) -> Rect { self.panel().map(|l| Rect::new(l.clip.x, l.clip.y, l.clip.w, l.row.height)).unwrap_or_default() }

    /// Converts a row relative point to screen space.
    pub fn layout_space_to_screen(&self, p: Vec2) -> Vec2 { self.panel().map(|l| vec2(p.x + l.at_x - l.offset.x, p.y + l.at_y - l.offset.y)).unwrap_or(p) }

    /// Converts a screen space point to row relative coordinates.
    pub fn layout_space_to_local(&self, p: Vec2) -> Vec2 { self.panel().map(|l| vec2(p.x - l.at_x + l.offset.x, p.y - l.at_y + l.offset.y)).unwrap_or(p) }

    /// Moves a row relative rectangle to screen space.
    pub fn layout_space_rect_to_screen(&self, r: Rect) -> Rect {
        let p = self.layout_space_to_screen(r.pos());
        Rect::new(p.x, p.y, r.w, r.h)
    }

    /// Moves a screen space rectangle to row relative coordinates.
    pub fn layout_space_rect_to_local(&self, r: Rect) -> Rect {
        let p = self.layout_space_to_local(r.pos());
        Rect::new(p.x, p.y, r.w, r.h)
    }

    /// Overrides the height used by rows declared with height 0.
    pub fn layout_set_min_row_height(&mut self, height: f32) {
        if let Some(layout) = self.panel_mut() {
            layout.row.min_height = height;
        }
    }

    /// Restores the default minimum row height derived from the font and style.
    pub fn layout_reset_min_row_height(&mut self) {
        let height = min_row_height(&self.style, self.font());
        if let Some(layout) = self.panel_mut() {
            layout.row.min_height = height;
        }
    }

    /// Ratio of the content width covered by `pixel_width`, clamped to `0..=1`.
    pub fn layout_ratio_from_pixel(&self, pixel_width: f32) -> f32 {
        match self.panel() {
            Some(l) if l.bounds.w > 0.0 => (pixel_width / l.bounds.w).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Rectangle from the row cursor to the right edge of the panel.
    pub fn layout_widget_bounds(&self) -> Rect {
        self.panel()
            .map(|l| Rect::new(l.at_x, l.at_y, l.bounds.w - (l.at_x - l.bounds.x).max(0.0), l.row.height))
            .unwrap_or_default()
    }

    fn alloc_row(&mut self) {
        let spacing = self.style.window.spacing.y;
        let Some((height, cols)) = self.panel().map(|l| (l.row.height - spacing, l.row.columns)) else { return };
        self.panel_layout(height, cols);
    }

    /// Allocates the next widget rectangle, opening a new row when the current one is full.
    pub(crate) fn alloc_space(&mut self) -> Rect {
        if self.panel().is_some_and(|l| l.row.index >= l.row.columns) {
            self.alloc_row();
        }
        let Context { windows, style, current, .. } = self;
        let Some(layout) = current.and_then(|c| windows.get_mut(c)).and_then(|w| w.layout.last_mut()) else { return Rect::default() };
        let bounds = widget_space(style, layout, true);
        layout.row.index += 1;
        bounds
    }

    /// Rectangle the next widget would get, without consuming it.
    pub(crate) fn layout_peek(&mut self) -> Rect {
        let Context { windows, style, current, .. } = self;
        let Some(layout) = current.and_then(|c| windows.get_mut(c)).and_then(|w| w.layout.last_mut()) else { return Rect::default() };
        let y = layout.at_y;
        let index = layout.row.index;
        if layout.row.index >= layout.row.columns {
            layout.at_y += layout.row.height;
            layout.row.index = 0;
        }
        let mut bounds = widget_space(style, layout, false);
        if layout.row.index == 0 {
            bounds.x -= layout.row.item_offset;
        }
        layout.at_y = y;
        layout.row.index = index;
        bounds
    }

    /// Skips `cols` columns, wrapping over row boundaries.
    pub fn spacing(&mut self, cols: usize) {
        let Some((index, columns, kind)) = self.panel().map(|l| (l.row.index, l.row.columns, l.row.kind)) else { return };
        if columns == 0 {
            return;
        }
        let mut cols = cols;
        let new_index = (index + cols) % columns;
        let rows = (index + cols) / columns;
        if rows > 0 {
            for _ in 0..rows {
                self.alloc_row();
            }
            cols = new_index;
        }
        if kind != RowLayoutType::DynamicFixed && kind != RowLayoutType::StaticFixed {
            for _ in 0..cols {
                self.alloc_space();
            }
        }
        if let Some(layout) = self.panel_mut() {
            layout.row.index = new_index;
        }
    }

    /// Allocates the next widget rectangle and classifies its visibility.
    ///
    /// `Invalid` widgets are outside the clip and should be skipped entirely; `Rom` widgets are
    /// visible but must not react to input.
    pub fn widget(&mut self) -> (Rect, WidgetLayoutState) {
        let b = self.alloc_space();
        let Some(layout) = self.panel() else { return (b, WidgetLayoutState::Invalid) };
        let bounds = Rect::new(b.x.trunc(), b.y.trunc(), b.w.trunc(), b.h.trunc());
        let c = layout.clip;
        let c = Rect::new(c.x.trunc(), c.y.trunc(), c.w.trunc(), c.h.trunc());
        let v = c.unify(&bounds);
        if !c.intersects(&bounds) {
            return (bounds, WidgetLayoutState::Invalid);
        }
        if !v.contains(self.input.mouse.pos) {
            return (bounds, WidgetLayoutState::Rom);
        }
        (bounds, WidgetLayoutState::Valid)
    }

    /// Like [`Context::widget`] but grows the rectangle by the item padding on the first and
    /// last column.
    pub(crate) fn widget_fitting(&mut self, item_padding: Vec2) -> (Rect, WidgetLayoutState) {
        let (mut bounds, state) = self.widget();
        let Some(layout) = self.panel() else { return (bounds, state) };
        let index = layout.row.index;
        let columns = layout.row.columns;
        let panel_padding = panel_padding(&self.style, layout.kind);
        if index == 1 {
            bounds.w += panel_padding.x;
            bounds.x -= panel_padding.x;
        } else {
            bounds.x -= item_padding.x;
        }
        if index == columns {
            bounds.w += panel_padding.x;
        } else {
            bounds.w += item_padding.x;
        }
        (bounds, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use std::rc::Rc;

    fn context() -> Context {
        let mut ctx = Context::new(Rc::new(TestFont));
        ctx.style_mut().window.padding = vec2(10.0, 10.0);
        ctx.style_mut().window.spacing = vec2(5.0, 5.0);
        ctx.input_begin();
        ctx.input_end();
        ctx
    }

    #[test]
    fn dynamic_columns_split_usable_width() {
        let mut ctx = context();
        assert!(ctx.begin("layout", rect(0.0, 0.0, 320.0, 400.0), PanelFlags::NO_SCROLLBAR));
        ctx.layout_row_dynamic(30.0, 3);
        let (a, _) = ctx.widget();
        let (b, _) = ctx.widget();
        let (c, _) = ctx.widget();
        let (d, _) = ctx.widget();
        ctx.end();

        assert_eq!(a.w, 90.0);
        assert_eq!(b.w, 90.0);
        assert_eq!(c.w, 90.0);
        assert_eq!(a.x, 20.0);
        assert_eq!(b.x - a.x, 95.0);
        assert_eq!(c.x - b.x, 95.0);
        assert_eq!(a.h, 30.0);
        // fourth widget wraps to a new row of the same height
        assert_eq!(d.x, a.x);
        assert_eq!(d.y - a.y, 35.0);
    }

    #[test]
    fn row_push_rejects_overflowing_ratios() {
        let mut ctx = context();
        assert!(ctx.begin("layout", rect(0.0, 0.0, 320.0, 400.0), PanelFlags::NO_SCROLLBAR));
        ctx.layout_row_begin(LayoutFormat::Dynamic, 20.0, 2);
        ctx.layout_row_push(0.25);
        let (a, _) = ctx.widget();
        ctx.layout_row_push(0.9);
        let (b, _) = ctx.widget();
        ctx.layout_row_end();
        ctx.end();
        // usable width is 300 - 20 - 5, a quarter of it truncated
        assert_eq!(a.w, 68.0);
        // the 0.9 push was ignored so the second widget keeps the quarter ratio
        assert_eq!(b.w, 69.0);
        assert!(b.x > a.x + a.w);
    }

    #[test]
    fn template_resolves_variable_columns() {
        let mut ctx = context();
        assert!(ctx.begin("layout", rect(0.0, 0.0, 320.0, 400.0), PanelFlags::NO_SCROLLBAR));
        ctx.layout_row_template_begin(20.0);
        ctx.layout_row_template_push_static(50.0);
        ctx.layout_row_template_push_dynamic();
        ctx.layout_row_template_push_variable(30.0);
        ctx.layout_row_template_end();
        let (a, _) = ctx.widget();
        let (b, _) = ctx.widget();
        let (c, _) = ctx.widget();
        ctx.end();
        // usable = 300 - 20 - 10 = 270, variable share = (270 - 50) / 2
        assert_eq!(a.w, 50.0);
        assert_eq!(b.w, 110.0);
        assert_eq!(c.w, 110.0);
    }

    #[test]
    fn static_free_space_tracks_content_width() {
        let mut ctx = context();
        assert!(ctx.begin("layout", rect(0.0, 0.0, 320.0, 400.0), PanelFlags::NO_SCROLLBAR));
        ctx.layout_space_begin(LayoutFormat::Static, 100.0, 1);
        ctx.layout_space_push(rect(5.0, 6.0, 40.0, 20.0));
        let (a, _) = ctx.widget();
        ctx.layout_space_end();
        let local = ctx.layout_space_rect_to_local(a);
        ctx.end();
        assert_eq!(a.x, 15.0);
        assert_eq!(a.w, 40.0);
        assert_eq!(local.x, 5.0);
        assert_eq!(local.y, 6.0);
    }

    #[test]
    fn spacing_skips_columns() {
        let mut ctx = context();
        assert!(ctx.begin("layout", rect(0.0, 0.0, 320.0, 400.0), PanelFlags::NO_SCROLLBAR));
        ctx.layout_row_dynamic(30.0, 3);
        ctx.spacing(2);
        let (a, _) = ctx.widget();
        ctx.end();
        assert_eq!(a.x, 210.0);
    }
}
