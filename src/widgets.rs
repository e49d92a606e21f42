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
//! Widget behavior layer.
//!
//! Each widget is a free `do_*` function that updates a [`WidgetStates`] from the input and draws
//! itself through a [`WidgetCtx`], plus a thin [`Context`] method that allocates the widget's
//! rectangle from the current row and hands the right style and input to it.

use crate::draw_context::DrawCtx;
use crate::window::DragAnchor;
use crate::*;

mod button;
pub(crate) mod chart;
mod color_picker;
mod group;
mod list_view;
mod progress;
mod property;
mod scrollbar;
mod selectable;
mod slider;
mod text;
mod text_edit;
mod toggle;
mod tree;

pub(crate) use button::*;
pub use chart::{CHART_MAX_SLOT, ChartEvents, ChartType};
pub use color_picker::ColorFormat;
pub(crate) use scrollbar::*;
pub(crate) use text::*;
pub(crate) use text_edit::do_edit;
pub use text_edit::{EditEvents, EditFlags};

#[derive(Copy, Clone)]
/// Font a widget measures and draws its text with.
pub(crate) struct FontRef<'a> {
    pub font: &'a dyn Font,
    pub id: FontId,
}

impl FontRef<'_> {
    pub fn height(&self) -> f32 { self.font.height() }

    pub fn width(&self, text: &str) -> f32 { self.font.text_width(self.font.height(), text) }
}

/// Everything a widget needs for one update and draw.
pub(crate) struct WidgetCtx<'a> {
    pub draw: DrawCtx<'a>,
    /// `None` when the widget must not react to input.
    pub input: Option<&'a Input>,
    pub font: FontRef<'a>,
    pub drag: &'a mut DragAnchor,
}

impl<'a> WidgetCtx<'a> {
    pub(crate) fn new(draw: DrawCtx<'a>, input: Option<&'a Input>, font: &'a dyn Font, font_id: FontId, drag: &'a mut DragAnchor) -> Self {
        Self { draw, input, font: FontRef { font, id: font_id }, drag }
    }

    /// Left button is held and the current drag started inside `r`.
    pub(crate) fn is_dragging_in(&self, r: Rect) -> bool { self.input.is_some_and(|i| self.drag.is_dragging_in(i, r)) }

    pub(crate) fn is_hovering(&self, r: Rect) -> bool { self.input.is_some_and(|i| i.is_mouse_hovering_rect(r)) }
}

/// Adds the entered and left bits after a behavior update.
pub(crate) fn hover_transition(state: &mut WidgetStates, input: Option<&Input>, r: Rect) {
    let Some(input) = input else { return };
    let was_hovered = input.is_mouse_prev_hovering_rect(r);
    if state.is_hovered() && !was_hovered {
        *state |= WidgetStates::ENTERED;
    } else if was_hovered && !input.is_mouse_hovering_rect(r) {
        *state |= WidgetStates::LEFT;
    }
}

/// Picks the style element matching the widget state: active first, then hover.
pub(crate) fn by_state<T: Copy>(state: WidgetStates, normal: T, hover: T, active: T) -> T {
    if state.is_active() {
        active
    } else if state.is_hovered() {
        hover
    } else {
        normal
    }
}

impl Context {
    /// Allocates the next widget rectangle, returning `None` when it is not visible.
    pub(crate) fn widget_rect(&mut self) -> Option<(Rect, WidgetLayoutState)> {
        let (bounds, state) = self.widget();
        (state != WidgetLayoutState::Invalid).then_some((bounds, state))
    }

    /// Runs `f` with a widget context on the current window.
    ///
    /// Input is handed over only when `with_input` is set and the innermost panel is not read
    /// only.
    pub(crate) fn with_widget<R>(&mut self, with_input: bool, f: impl FnOnce(&mut WidgetStates, &mut WidgetCtx<'_>, &Style) -> R) -> Option<R> {
        let cur = self.current?;
        let Context { windows, memory, input, style, fonts, last_widget_state, .. } = self;
        let Window { layout, buffer, drag, .. } = windows.get_mut(cur)?;
        let rom = layout.last().is_none_or(|p| p.flags.contains(PanelFlags::ROM));
        let input: Option<&Input> = if with_input && !rom { Some(&*input) } else { None };
        let mut w = WidgetCtx::new(DrawCtx::new(memory, buffer), input, font_of(fonts, style.font), style.font, drag);
        Some(f(last_widget_state, &mut w, style))
    }

    /// Draws directly into the current window, clipped to the innermost panel.
    pub fn with_draw<R>(&mut self, f: impl FnOnce(&mut DrawCtx<'_>) -> R) -> Option<R> { self.with_widget(false, |_, w, _| f(&mut w.draw)) }

    /// State bits of the last widget.
    pub fn widget_state(&self) -> WidgetStates { self.last_widget_state }

    /// Returns `true` if the pointer hovers the next widget's rectangle.
    pub fn widget_is_hovered(&mut self) -> bool {
        if self.current.is_none() || self.active != self.current {
            return false;
        }
        let bounds = self.layout_peek();
        let clip = self.panel().map(|l| l.clip).unwrap_or(NULL_RECT);
        clip.intersects(&bounds) && self.input.is_mouse_hovering_rect(bounds)
    }

    /// Returns `true` if `button` was clicked on the next widget's rectangle this frame.
    pub fn widget_is_mouse_clicked(&mut self, button: MouseButton) -> bool {
        if self.current.is_none() || self.active != self.current {
            return false;
        }
        let bounds = self.layout_peek();
        let clip = self.panel().map(|l| l.clip).unwrap_or(NULL_RECT);
        clip.intersects(&bounds) && self.input.mouse_clicked(button, bounds)
    }
}
