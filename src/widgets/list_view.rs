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
//! List views: groups of many equally high rows where only the visible rows are laid out.

use std::ops::Range;

use crate::panel::{PanelType, ScrollSink, panel_padding};
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq)]
/// Rows of a list view to lay out this frame.
pub struct ListView {
    /// First visible row.
    pub begin: usize,
    /// One past the last visible row.
    pub end: usize,
    /// Number of visible rows.
    pub count: usize,
    total_height: f32,
}

impl ListView {
    /// Indices of the visible rows.
    pub fn rows(&self) -> Range<usize> { self.begin..self.end }
}

impl Context {
    /// Starts a scrollable group of `row_count` rows, each `row_height` high. Lay out one row of
    /// `row_height` per index of [`ListView::rows`], then call [`Context::list_view_end`].
    /// Returns `None` if the group is not visible.
    pub fn list_view_begin(&mut self, title: &str, flags: PanelFlags, row_height: f32, row_count: usize) -> Option<ListView> {
        self.current?;
        let step = (row_height + self.style.window.spacing.y.max(0.0)).max(1.0);
        let key = Self::group_offset_key(title);
        let offset = self.group_get_scroll(title);
        if !self.group_begin_with(Some(title), flags, offset, ScrollSink::Table(key)) {
            return None;
        }
        let layout = self.panel_mut()?;
        let begin = ((offset.y / step) as usize).min(row_count);
        // part of the first row scrolled above the top
        let hidden = offset.y - begin as f32 * step;
        let count = (((layout.clip.h + hidden) / step).ceil().max(0.0) as usize).min(row_count - begin);
        // skip the rows above the view
        layout.at_y += begin as f32 * step;
        Some(ListView { begin, end: begin + count, count, total_height: step * row_count as f32 })
    }

    /// Ends a list view; the content extent covers every row, laid out or not.
    pub fn list_view_end(&mut self, view: ListView) {
        let padding = panel_padding(&self.style, PanelType::GROUP);
        if let Some(layout) = self.panel_mut() {
            layout.at_y = layout.bounds.y + padding.y + view.total_height - layout.row.height;
        }
        self.group_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use std::rc::Rc;

    fn context() -> Context {
        let mut ctx = Context::new(Rc::new(TestFont));
        ctx.input_begin();
        ctx.input_motion(2000.0, 2000.0);
        ctx.input_end();
        ctx
    }

    /// Lays out the visible rows of a 100 pixel high list view, returning the view and the
    /// first row's rectangle.
    fn list(ctx: &mut Context, scroll: f32, row_count: usize) -> Option<(ListView, Rect)> {
        ctx.layout_row_dynamic(100.0, 1);
        ctx.group_set_scroll("list", vec2(0.0, scroll));
        let view = ctx.list_view_begin("list", PanelFlags::NO_SCROLLBAR, 16.0, row_count)?;
        let mut first = None;
        for _ in view.rows() {
            ctx.layout_row_dynamic(16.0, 1);
            let r = ctx.widget().0;
            first.get_or_insert(r);
        }
        ctx.list_view_end(view);
        Some((view, first.unwrap_or_default()))
    }

    #[test]
    fn unscrolled_view_covers_the_visible_rows() {
        let mut ctx = context();
        assert!(ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR));
        let (view, first) = list(&mut ctx, 0.0, 100).unwrap();
        assert_eq!(ctx.panel().map(|p| p.kind), Some(PanelType::WINDOW));
        ctx.end();
        // 100 pixels of rows 20 apart
        assert_eq!(view.rows(), 0..5);
        assert_eq!(first.y, 8.0);
    }

    #[test]
    fn scrolled_view_starts_at_the_first_visible_row() {
        let mut ctx = context();
        assert!(ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR));
        let (view, first) = list(&mut ctx, 50.0, 100).unwrap();
        assert_eq!(ctx.group_get_scroll("list"), vec2(0.0, 50.0));
        ctx.end();
        // row 2 is cut 10 pixels short at the top, row 7 is cut at the bottom
        assert_eq!(view.rows(), 2..8);
        assert_eq!(view.count, 6);
        assert_eq!(first.y, -2.0);
    }

    #[test]
    fn short_lists_stop_at_the_row_count() {
        let mut ctx = context();
        assert!(ctx.begin("w", rect(0.0, 0.0, 300.0, 300.0), PanelFlags::NO_SCROLLBAR));
        let (view, _) = list(&mut ctx, 0.0, 3).unwrap();
        assert_eq!(view.rows(), 0..3);
        let (view, _) = list(&mut ctx, 500.0, 3).unwrap();
        assert_eq!((view.begin, view.count), (3, 0));
        ctx.end();
    }
}
