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
//! Widget appearance: per widget style blocks built from a color table.

use std::rc::Rc;

use log::warn;

use crate::draw_context::DrawCtx;
use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
/// Entries of the color table accepted by [`Style::from_table`].
pub enum StyleColor {
    /// Text of labels and buttons.
    Text,
    /// Window body.
    Window,
    /// Window header.
    Header,
    /// Borders.
    Border,
    /// Button at rest.
    Button,
    /// Hovered button.
    ButtonHover,
    /// Pressed button.
    ButtonActive,
    /// Checkbox and option background.
    Toggle,
    /// Hovered toggle.
    ToggleHover,
    /// Toggle cursor.
    ToggleCursor,
    /// Selectable at rest.
    Select,
    /// Selected selectable.
    SelectActive,
    /// Slider bar.
    Slider,
    /// Slider cursor.
    SliderCursor,
    /// Hovered slider cursor.
    SliderCursorHover,
    /// Dragged slider cursor.
    SliderCursorActive,
    /// Property background.
    Property,
    /// Edit background.
    Edit,
    /// Edit cursor.
    EditCursor,
    /// Combo background.
    Combo,
    /// Chart background.
    Chart,
    /// Chart lines and columns.
    ChartColor,
    /// Hovered chart element.
    ChartColorHighlight,
    /// Scrollbar background.
    Scrollbar,
    /// Scrollbar cursor.
    ScrollbarCursor,
    /// Hovered scrollbar cursor.
    ScrollbarCursorHover,
    /// Dragged scrollbar cursor.
    ScrollbarCursorActive,
    /// Tree tab header.
    TabHeader,
}

/// Number of [`StyleColor`] entries.
pub const STYLE_COLOR_COUNT: usize = StyleColor::TabHeader as usize + 1;

/// Default dark color table.
pub const DEFAULT_COLOR_TABLE: [Color; STYLE_COLOR_COUNT] = [
    Color::rgba(175, 175, 175, 255),
    Color::rgba(45, 45, 45, 255),
    Color::rgba(40, 40, 40, 255),
    Color::rgba(65, 65, 65, 255),
    Color::rgba(50, 50, 50, 255),
    Color::rgba(40, 40, 40, 255),
    Color::rgba(35, 35, 35, 255),
    Color::rgba(100, 100, 100, 255),
    Color::rgba(120, 120, 120, 255),
    Color::rgba(45, 45, 45, 255),
    Color::rgba(45, 45, 45, 255),
    Color::rgba(35, 35, 35, 255),
    Color::rgba(38, 38, 38, 255),
    Color::rgba(100, 100, 100, 255),
    Color::rgba(120, 120, 120, 255),
    Color::rgba(150, 150, 150, 255),
    Color::rgba(38, 38, 38, 255),
    Color::rgba(38, 38, 38, 255),
    Color::rgba(175, 175, 175, 255),
    Color::rgba(45, 45, 45, 255),
    Color::rgba(120, 120, 120, 255),
    Color::rgba(45, 45, 45, 255),
    Color::rgba(255, 0, 0, 255),
    Color::rgba(40, 40, 40, 255),
    Color::rgba(100, 100, 100, 255),
    Color::rgba(120, 120, 120, 255),
    Color::rgba(150, 150, 150, 255),
    Color::rgba(40, 40, 40, 255),
];

const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

#[derive(Copy, Clone, Debug, PartialEq)]
/// Background of a styled element.
pub enum StyleItem {
    /// Flat color.
    Color(Color),
    /// Stretched image.
    Image(Image),
    /// Nothing is drawn.
    Hide,
}

impl StyleItem {
    /// Color used as text background, transparent for images.
    pub fn color(&self) -> Color {
        match self {
            StyleItem::Color(c) => *c,
            _ => TRANSPARENT,
        }
    }

    pub(crate) fn draw(&self, draw: &mut DrawCtx<'_>, r: Rect, rounding: f32) {
        match self {
            StyleItem::Color(c) => draw.fill_rect(r, rounding, *c),
            StyleItem::Image(img) => draw.draw_image(r, img, Color::rgba(255, 255, 255, 255)),
            StyleItem::Hide => {}
        }
    }
}

/// Host hooks run before and after a widget renders its default look.
pub trait CustomDraw {
    /// Called before the widget draws.
    fn draw_begin(&self, _draw: &mut DrawCtx<'_>) {}
    /// Called after the widget draws.
    fn draw_end(&self, _draw: &mut DrawCtx<'_>) {}
}

/// Optional shared [`CustomDraw`] strategy.
pub type CustomDrawRef = Option<Rc<dyn CustomDraw>>;

pub(crate) fn with_custom_draw(hook: &CustomDrawRef, draw: &mut DrawCtx<'_>, f: impl FnOnce(&mut DrawCtx<'_>)) {
    if let Some(h) = hook {
        h.draw_begin(draw);
    }
    f(draw);
    if let Some(h) = hook {
        h.draw_end(draw);
    }
}

#[derive(Clone)]
/// Plain text.
pub struct StyleText {
    /// Text color.
    pub color: Color,
    /// Padding around the text.
    pub padding: Vec2,
}

#[derive(Clone)]
/// Push buttons.
pub struct StyleButton {
    /// Background at rest.
    pub normal: StyleItem,
    /// Background while hovered.
    pub hover: StyleItem,
    /// Background while held.
    pub active: StyleItem,
    /// Border color.
    pub border_color: Color,
    /// Background passed to text commands.
    pub text_background: Color,
    /// Label color at rest.
    pub text_normal: Color,
    /// Label color while hovered.
    pub text_hover: Color,
    /// Label color while held.
    pub text_active: Color,
    /// Label alignment.
    pub text_alignment: TextAlign,
    /// Border thickness.
    pub border: f32,
    /// Corner radius.
    pub rounding: f32,
    /// Padding between border and content.
    pub padding: Vec2,
    /// Padding around images.
    pub image_padding: Vec2,
    /// Extra hit area outside the drawn bounds.
    pub touch_padding: Vec2,
    /// Optional render hooks.
    pub draw: CustomDrawRef,
}

#[derive(Clone)]
/// Checkboxes and options.
pub struct StyleToggle {
    /// Box at rest.
    pub normal: StyleItem,
    /// Hovered box.
    pub hover: StyleItem,
    /// Held box.
    pub active: StyleItem,
    /// Border color.
    pub border_color: Color,
    /// Cursor at rest.
    pub cursor_normal: StyleItem,
    /// Hovered cursor.
    pub cursor_hover: StyleItem,
    /// Label color at rest.
    pub text_normal: Color,
    /// Hovered label color.
    pub text_hover: Color,
    /// Held label color.
    pub text_active: Color,
    /// Label background.
    pub text_background: Color,
    /// Label alignment.
    pub text_alignment: TextAlign,
    /// Padding inside the box.
    pub padding: Vec2,
    /// Extra hit area.
    pub touch_padding: Vec2,
    /// Gap between box and label.
    pub spacing: f32,
    /// Border thickness.
    pub border: f32,
    /// Optional render hooks.
    pub draw: CustomDrawRef,
}

#[derive(Clone)]
/// Selectable labels.
pub struct StyleSelectable {
    /// Background at rest.
    pub normal: StyleItem,
    /// Hovered background.
    pub hover: StyleItem,
    /// Pressed background.
    pub pressed: StyleItem,
    /// Selected background at rest.
    pub normal_active: StyleItem,
    /// Selected and hovered background.
    pub hover_active: StyleItem,
    /// Selected and pressed background.
    pub pressed_active: StyleItem,
    /// Label color at rest.
    pub text_normal: Color,
    /// Hovered label color.
    pub text_hover: Color,
    /// Pressed label color.
    pub text_pressed: Color,
    /// Selected label color.
    pub text_normal_active: Color,
    /// Selected and hovered label color.
    pub text_hover_active: Color,
    /// Selected and pressed label color.
    pub text_pressed_active: Color,
    /// Label background.
    pub text_background: Color,
    /// Label alignment.
    pub text_alignment: TextAlign,
    /// Corner radius.
    pub rounding: f32,
    /// Padding around the label.
    pub padding: Vec2,
    /// Extra hit area.
    pub touch_padding: Vec2,
    /// Padding around symbols and images.
    pub image_padding: Vec2,
    /// Optional render hooks.
    pub draw: CustomDrawRef,
}

#[derive(Clone)]
/// Sliders.
pub struct StyleSlider {
    /// Background at rest.
    pub normal: StyleItem,
    /// Hovered background.
    pub hover: StyleItem,
    /// Dragged background.
    pub active: StyleItem,
    /// Border color.
    pub border_color: Color,
    /// Bar at rest.
    pub bar_normal: Color,
    /// Hovered bar.
    pub bar_hover: Color,
    /// Dragged bar.
    pub bar_active: Color,
    /// Bar part left of the cursor.
    pub bar_filled: Color,
    /// Cursor at rest.
    pub cursor_normal: StyleItem,
    /// Hovered cursor.
    pub cursor_hover: StyleItem,
    /// Dragged cursor.
    pub cursor_active: StyleItem,
    /// Border thickness.
    pub border: f32,
    /// Corner radius.
    pub rounding: f32,
    /// Bar thickness.
    pub bar_height: f32,
    /// Padding around the bar.
    pub padding: Vec2,
    /// Gap between buttons and bar.
    pub spacing: Vec2,
    /// Cursor size.
    pub cursor_size: Vec2,
    /// Shows `-`/`+` buttons at both ends.
    pub show_buttons: bool,
    /// Increment and decrement buttons.
    pub inc_button: StyleButton,
    /// Decrement button.
    pub dec_button: StyleButton,
    /// Increment symbol.
    pub inc_symbol: Symbol,
    /// Decrement symbol.
    pub dec_symbol: Symbol,
    /// Optional render hooks.
    pub draw: CustomDrawRef,
}

#[derive(Clone)]
/// Progress bars.
pub struct StyleProgress {
    /// Background at rest.
    pub normal: StyleItem,
    /// Hovered background.
    pub hover: StyleItem,
    /// Dragged background.
    pub active: StyleItem,
    /// Border color.
    pub border_color: Color,
    /// Filled part at rest.
    pub cursor_normal: StyleItem,
    /// Hovered filled part.
    pub cursor_hover: StyleItem,
    /// Dragged filled part.
    pub cursor_active: StyleItem,
    /// Filled part border color.
    pub cursor_border_color: Color,
    /// Corner radius.
    pub rounding: f32,
    /// Border thickness.
    pub border: f32,
    /// Filled part border thickness.
    pub cursor_border: f32,
    /// Filled part corner radius.
    pub cursor_rounding: f32,
    /// Padding around the filled part.
    pub padding: Vec2,
    /// Optional render hooks.
    pub draw: CustomDrawRef,
}

#[derive(Clone)]
/// Scrollbars.
pub struct StyleScrollbar {
    /// Track at rest.
    pub normal: StyleItem,
    /// Hovered track.
    pub hover: StyleItem,
    /// Dragged track.
    pub active: StyleItem,
    /// Track border color.
    pub border_color: Color,
    /// Thumb at rest.
    pub cursor_normal: StyleItem,
    /// Hovered thumb.
    pub cursor_hover: StyleItem,
    /// Dragged thumb.
    pub cursor_active: StyleItem,
    /// Thumb border color.
    pub cursor_border_color: Color,
    /// Track border thickness.
    pub border: f32,
    /// Track corner radius.
    pub rounding: f32,
    /// Thumb border thickness.
    pub border_cursor: f32,
    /// Thumb corner radius.
    pub rounding_cursor: f32,
    /// Padding between track and thumb.
    pub padding: Vec2,
    /// Shows step buttons at both ends.
    pub show_buttons: bool,
    /// Step forward button.
    pub inc_button: StyleButton,
    /// Step back button.
    pub dec_button: StyleButton,
    /// Step forward symbol.
    pub inc_symbol: Symbol,
    /// Step back symbol.
    pub dec_symbol: Symbol,
    /// Optional render hooks.
    pub draw: CustomDrawRef,
}

#[derive(Clone)]
/// Text edit fields.
pub struct StyleEdit {
    /// Background at rest.
    pub normal: StyleItem,
    /// Hovered background.
    pub hover: StyleItem,
    /// Focused background.
    pub active: StyleItem,
    /// Border color.
    pub border_color: Color,
    /// Vertical scrollbar of multi line fields.
    pub scrollbar: StyleScrollbar,
    /// Cursor at rest.
    pub cursor_normal: Color,
    /// Hovered cursor.
    pub cursor_hover: Color,
    /// Character under a block cursor.
    pub cursor_text_normal: Color,
    /// Hovered character under a block cursor.
    pub cursor_text_hover: Color,
    /// Text at rest.
    pub text_normal: Color,
    /// Hovered text.
    pub text_hover: Color,
    /// Focused text.
    pub text_active: Color,
    /// Selection background.
    pub selected_normal: Color,
    /// Hovered selection background.
    pub selected_hover: Color,
    /// Selected text.
    pub selected_text_normal: Color,
    /// Hovered selected text.
    pub selected_text_hover: Color,
    /// Border thickness.
    pub border: f32,
    /// Corner radius.
    pub rounding: f32,
    /// Width of the insert cursor.
    pub cursor_size: f32,
    /// Size of the multi line scrollbar.
    pub scrollbar_size: Vec2,
    /// Padding between border and text.
    pub padding: Vec2,
    /// Extra space between text rows.
    pub row_padding: f32,
    /// Optional render hooks.
    pub draw: CustomDrawRef,
}

#[derive(Clone)]
/// Property fields.
pub struct StyleProperty {
    /// Background at rest.
    pub normal: StyleItem,
    /// Hovered background.
    pub hover: StyleItem,
    /// Dragged background.
    pub active: StyleItem,
    /// Border color.
    pub border_color: Color,
    /// Label color at rest.
    pub label_normal: Color,
    /// Hovered label color.
    pub label_hover: Color,
    /// Dragged label color.
    pub label_active: Color,
    /// Decrement symbol.
    pub sym_left: Symbol,
    /// Increment symbol.
    pub sym_right: Symbol,
    /// Border thickness.
    pub border: f32,
    /// Corner radius.
    pub rounding: f32,
    /// Padding inside the border.
    pub padding: Vec2,
    /// Embedded edit field.
    pub edit: StyleEdit,
    /// Increment button.
    pub inc_button: StyleButton,
    /// Decrement button.
    pub dec_button: StyleButton,
    /// Optional render hooks.
    pub draw: CustomDrawRef,
}

#[derive(Clone)]
/// Charts.
pub struct StyleChart {
    /// Background.
    pub background: StyleItem,
    /// Border color.
    pub border_color: Color,
    /// Hovered element color.
    pub selected_color: Color,
    /// Element color.
    pub color: Color,
    /// Border thickness.
    pub border: f32,
    /// Corner radius.
    pub rounding: f32,
    /// Padding inside the border.
    pub padding: Vec2,
}

#[derive(Clone)]
/// Combo boxes.
pub struct StyleCombo {
    /// Background at rest.
    pub normal: StyleItem,
    /// Hovered background.
    pub hover: StyleItem,
    /// Open background.
    pub active: StyleItem,
    /// Border color.
    pub border_color: Color,
    /// Label color at rest.
    pub label_normal: Color,
    /// Hovered label color.
    pub label_hover: Color,
    /// Open label color.
    pub label_active: Color,
    /// Drop down symbol at rest.
    pub sym_normal: Symbol,
    /// Hovered drop down symbol.
    pub sym_hover: Symbol,
    /// Open drop down symbol.
    pub sym_active: Symbol,
    /// Drop down button.
    pub button: StyleButton,
    /// Border thickness.
    pub border: f32,
    /// Corner radius.
    pub rounding: f32,
    /// Padding around the header content.
    pub content_padding: Vec2,
    /// Padding around the drop down button.
    pub button_padding: Vec2,
    /// Gap between content and button.
    pub spacing: Vec2,
}

#[derive(Clone)]
/// Collapsible tree headers.
pub struct StyleTab {
    /// Tab header background.
    pub background: StyleItem,
    /// Tab header border color.
    pub border_color: Color,
    /// Title color.
    pub text: Color,
    /// Toggle of an open tab.
    pub tab_maximize_button: StyleButton,
    /// Toggle of a collapsed tab.
    pub tab_minimize_button: StyleButton,
    /// Toggle of an open node.
    pub node_maximize_button: StyleButton,
    /// Toggle of a collapsed node.
    pub node_minimize_button: StyleButton,
    /// Symbol of a collapsed tree.
    pub sym_minimize: Symbol,
    /// Symbol of an open tree.
    pub sym_maximize: Symbol,
    /// Tab header border thickness.
    pub border: f32,
    /// Tab header corner radius.
    pub rounding: f32,
    /// Horizontal shift of the content of an open tree.
    pub indent: f32,
    /// Padding inside the header.
    pub padding: Vec2,
    /// Gap after an optional header image.
    pub spacing: Vec2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Side of the header holding the window buttons.
pub enum HeaderAlign {
    /// Buttons on the left.
    Left,
    /// Buttons on the right.
    Right,
}

#[derive(Clone)]
/// Window title bars.
pub struct StyleWindowHeader {
    /// Background at rest.
    pub normal: StyleItem,
    /// Hovered background.
    pub hover: StyleItem,
    /// Background of the active window.
    pub active: StyleItem,
    /// Close button.
    pub close_button: StyleButton,
    /// Minimize button.
    pub minimize_button: StyleButton,
    /// Close symbol.
    pub close_symbol: Symbol,
    /// Minimize symbol.
    pub minimize_symbol: Symbol,
    /// Restore symbol.
    pub maximize_symbol: Symbol,
    /// Title color at rest.
    pub label_normal: Color,
    /// Hovered title color.
    pub label_hover: Color,
    /// Title color of the active window.
    pub label_active: Color,
    /// Button placement.
    pub align: HeaderAlign,
    /// Padding inside the header.
    pub padding: Vec2,
    /// Padding around the title.
    pub label_padding: Vec2,
    /// Gap between buttons and title.
    pub spacing: Vec2,
}

#[derive(Clone)]
/// Windows and the panels nested in them.
pub struct StyleWindow {
    /// Title bar.
    pub header: StyleWindowHeader,
    /// Body background.
    pub fixed_background: StyleItem,
    /// Background color passed to text.
    pub background: Color,
    /// Window border color.
    pub border_color: Color,
    /// Popup border color.
    pub popup_border_color: Color,
    /// Combo border color.
    pub combo_border_color: Color,
    /// Contextual menu border color.
    pub contextual_border_color: Color,
    /// Menu border color.
    pub menu_border_color: Color,
    /// Group border color.
    pub group_border_color: Color,
    /// Tooltip border color.
    pub tooltip_border_color: Color,
    /// Scaler triangle.
    pub scaler: StyleItem,
    /// Window border thickness.
    pub border: f32,
    /// Combo border thickness.
    pub combo_border: f32,
    /// Contextual menu border thickness.
    pub contextual_border: f32,
    /// Menu border thickness.
    pub menu_border: f32,
    /// Group border thickness.
    pub group_border: f32,
    /// Tooltip border thickness.
    pub tooltip_border: f32,
    /// Popup border thickness.
    pub popup_border: f32,
    /// Extra height added to the font height for the minimum row height.
    pub min_row_height_padding: f32,
    /// Body corner radius.
    pub rounding: f32,
    /// Gap between widgets.
    pub spacing: Vec2,
    /// Scrollbar thickness.
    pub scrollbar_size: Vec2,
    /// Minimum size reachable with the scaler.
    pub min_size: Vec2,
    /// Window padding.
    pub padding: Vec2,
    /// Group padding.
    pub group_padding: Vec2,
    /// Popup padding.
    pub popup_padding: Vec2,
    /// Combo padding.
    pub combo_padding: Vec2,
    /// Contextual menu padding.
    pub contextual_padding: Vec2,
    /// Menu padding.
    pub menu_padding: Vec2,
    /// Tooltip padding.
    pub tooltip_padding: Vec2,
}

#[derive(Clone)]
/// Complete appearance of every widget.
pub struct Style {
    /// Font used for every widget.
    pub font: FontId,
    /// Labels.
    pub text: StyleText,
    /// Push buttons.
    pub button: StyleButton,
    /// Buttons inside contextual menus.
    pub contextual_button: StyleButton,
    /// Buttons inside menubars.
    pub menu_button: StyleButton,
    /// Option (radio) buttons.
    pub option: StyleToggle,
    /// Checkboxes.
    pub checkbox: StyleToggle,
    /// Selectables.
    pub selectable: StyleSelectable,
    /// Sliders.
    pub slider: StyleSlider,
    /// Progress bars.
    pub progress: StyleProgress,
    /// Properties.
    pub property: StyleProperty,
    /// Edit fields.
    pub edit: StyleEdit,
    /// Charts.
    pub chart: StyleChart,
    /// Horizontal scrollbars.
    pub scrollh: StyleScrollbar,
    /// Vertical scrollbars.
    pub scrollv: StyleScrollbar,
    /// Combo boxes.
    pub combo: StyleCombo,
    /// Tree headers.
    pub tab: StyleTab,
    /// Windows.
    pub window: StyleWindow,
}

impl Default for Style {
    fn default() -> Self { Self::from_table(&DEFAULT_COLOR_TABLE) }
}

fn flat_button(bg: Color, text: Color, padding: Vec2) -> StyleButton {
    StyleButton {
        normal: StyleItem::Color(bg),
        hover: StyleItem::Color(bg),
        active: StyleItem::Color(bg),
        border_color: TRANSPARENT,
        text_background: bg,
        text_normal: text,
        text_hover: text,
        text_active: text,
        text_alignment: TextAlign::TEXT_CENTERED,
        border: 0.0,
        rounding: 0.0,
        padding,
        image_padding: Vec2::default(),
        touch_padding: Vec2::default(),
        draw: None,
    }
}

fn step_button(text: Color) -> StyleButton {
    StyleButton {
        normal: StyleItem::Color(Color::rgb(40, 40, 40)),
        hover: StyleItem::Color(Color::rgb(42, 42, 42)),
        active: StyleItem::Color(Color::rgb(44, 44, 44)),
        border_color: Color::rgb(65, 65, 65),
        text_background: Color::rgb(40, 40, 40),
        text_normal: text,
        text_hover: text,
        text_active: text,
        text_alignment: TextAlign::TEXT_CENTERED,
        border: 1.0,
        rounding: 0.0,
        padding: vec2(8.0, 8.0),
        image_padding: Vec2::default(),
        touch_padding: Vec2::default(),
        draw: None,
    }
}

impl Style {
    /// Builds every widget style from a color table indexed by [`StyleColor`].
    pub fn from_table(table: &[Color; STYLE_COLOR_COUNT]) -> Self {
        let c = |s: StyleColor| table[s as usize];
        let item = |s: StyleColor| StyleItem::Color(c(s));
        let text = c(StyleColor::Text);

        let button = StyleButton {
            normal: item(StyleColor::Button),
            hover: item(StyleColor::ButtonHover),
            active: item(StyleColor::ButtonActive),
            border_color: c(StyleColor::Border),
            text_background: c(StyleColor::Button),
            text_normal: text,
            text_hover: text,
            text_active: text,
            text_alignment: TextAlign::TEXT_CENTERED,
            border: 1.0,
            rounding: 4.0,
            padding: vec2(2.0, 2.0),
            image_padding: Vec2::default(),
            touch_padding: Vec2::default(),
            draw: None,
        };

        let contextual_button = StyleButton {
            normal: item(StyleColor::Window),
            hover: item(StyleColor::ButtonHover),
            active: item(StyleColor::ButtonActive),
            border_color: c(StyleColor::Window),
            text_background: c(StyleColor::Window),
            border: 0.0,
            rounding: 0.0,
            ..button.clone()
        };

        let menu_button = StyleButton {
            normal: item(StyleColor::Window),
            hover: item(StyleColor::Window),
            active: item(StyleColor::Window),
            border_color: c(StyleColor::Window),
            text_background: c(StyleColor::Window),
            border: 0.0,
            rounding: 1.0,
            ..button.clone()
        };

        let toggle = StyleToggle {
            normal: item(StyleColor::Toggle),
            hover: item(StyleColor::ToggleHover),
            active: item(StyleColor::ToggleHover),
            border_color: TRANSPARENT,
            cursor_normal: item(StyleColor::ToggleCursor),
            cursor_hover: item(StyleColor::ToggleCursor),
            text_normal: text,
            text_hover: text,
            text_active: text,
            text_background: c(StyleColor::Window),
            text_alignment: TextAlign::TEXT_LEFT,
            padding: vec2(2.0, 2.0),
            touch_padding: Vec2::default(),
            spacing: 4.0,
            border: 0.0,
            draw: None,
        };

        let selectable = StyleSelectable {
            normal: item(StyleColor::Select),
            hover: item(StyleColor::Select),
            pressed: item(StyleColor::Select),
            normal_active: item(StyleColor::SelectActive),
            hover_active: item(StyleColor::SelectActive),
            pressed_active: item(StyleColor::SelectActive),
            text_normal: text,
            text_hover: text,
            text_pressed: text,
            text_normal_active: text,
            text_hover_active: text,
            text_pressed_active: text,
            text_background: TRANSPARENT,
            text_alignment: TextAlign::TEXT_LEFT,
            rounding: 0.0,
            padding: vec2(2.0, 2.0),
            touch_padding: Vec2::default(),
            image_padding: vec2(2.0, 2.0),
            draw: None,
        };

        let slider = StyleSlider {
            normal: StyleItem::Hide,
            hover: StyleItem::Hide,
            active: StyleItem::Hide,
            border_color: TRANSPARENT,
            bar_normal: c(StyleColor::Slider),
            bar_hover: c(StyleColor::Slider),
            bar_active: c(StyleColor::Slider),
            bar_filled: c(StyleColor::SliderCursor),
            cursor_normal: item(StyleColor::SliderCursor),
            cursor_hover: item(StyleColor::SliderCursorHover),
            cursor_active: item(StyleColor::SliderCursorActive),
            border: 0.0,
            rounding: 0.0,
            bar_height: 8.0,
            padding: vec2(2.0, 2.0),
            spacing: vec2(2.0, 2.0),
            cursor_size: vec2(16.0, 16.0),
            show_buttons: false,
            inc_button: step_button(text),
            dec_button: step_button(text),
            inc_symbol: Symbol::TriangleRight,
            dec_symbol: Symbol::TriangleLeft,
            draw: None,
        };

        let progress = StyleProgress {
            normal: item(StyleColor::Slider),
            hover: item(StyleColor::Slider),
            active: item(StyleColor::Slider),
            border_color: TRANSPARENT,
            cursor_normal: item(StyleColor::SliderCursor),
            cursor_hover: item(StyleColor::SliderCursorHover),
            cursor_active: item(StyleColor::SliderCursorActive),
            cursor_border_color: TRANSPARENT,
            rounding: 0.0,
            border: 0.0,
            cursor_border: 0.0,
            cursor_rounding: 0.0,
            padding: vec2(4.0, 4.0),
            draw: None,
        };

        let mut scroll_button = step_button(text);
        scroll_button.padding = vec2(4.0, 4.0);
        let scrollbar = StyleScrollbar {
            normal: item(StyleColor::Scrollbar),
            hover: item(StyleColor::Scrollbar),
            active: item(StyleColor::Scrollbar),
            border_color: c(StyleColor::Scrollbar),
            cursor_normal: item(StyleColor::ScrollbarCursor),
            cursor_hover: item(StyleColor::ScrollbarCursorHover),
            cursor_active: item(StyleColor::ScrollbarCursorActive),
            cursor_border_color: c(StyleColor::Scrollbar),
            border: 0.0,
            rounding: 0.0,
            border_cursor: 0.0,
            rounding_cursor: 0.0,
            padding: Vec2::default(),
            show_buttons: false,
            inc_button: scroll_button.clone(),
            dec_button: scroll_button,
            inc_symbol: Symbol::CircleSolid,
            dec_symbol: Symbol::CircleSolid,
            draw: None,
        };

        let edit = StyleEdit {
            normal: item(StyleColor::Edit),
            hover: item(StyleColor::Edit),
            active: item(StyleColor::Edit),
            border_color: c(StyleColor::Border),
            scrollbar: scrollbar.clone(),
            cursor_normal: c(StyleColor::EditCursor),
            cursor_hover: c(StyleColor::EditCursor),
            cursor_text_normal: c(StyleColor::Edit),
            cursor_text_hover: c(StyleColor::Edit),
            text_normal: text,
            text_hover: text,
            text_active: text,
            selected_normal: text,
            selected_hover: text,
            selected_text_normal: c(StyleColor::Edit),
            selected_text_hover: c(StyleColor::Edit),
            border: 1.0,
            rounding: 0.0,
            cursor_size: 4.0,
            scrollbar_size: vec2(10.0, 10.0),
            padding: vec2(4.0, 4.0),
            row_padding: 2.0,
            draw: None,
        };

        let property_button = flat_button(c(StyleColor::Property), text, Vec2::default());
        let property = StyleProperty {
            normal: item(StyleColor::Property),
            hover: item(StyleColor::Property),
            active: item(StyleColor::Property),
            border_color: c(StyleColor::Border),
            label_normal: text,
            label_hover: text,
            label_active: text,
            sym_left: Symbol::TriangleLeft,
            sym_right: Symbol::TriangleRight,
            border: 1.0,
            rounding: 10.0,
            padding: vec2(4.0, 4.0),
            edit: StyleEdit {
                normal: item(StyleColor::Property),
                hover: item(StyleColor::Property),
                active: item(StyleColor::Property),
                border_color: TRANSPARENT,
                border: 0.0,
                cursor_size: 8.0,
                padding: Vec2::default(),
                ..edit.clone()
            },
            inc_button: property_button.clone(),
            dec_button: property_button,
            draw: None,
        };

        let chart = StyleChart {
            background: item(StyleColor::Chart),
            border_color: c(StyleColor::Border),
            selected_color: c(StyleColor::ChartColorHighlight),
            color: c(StyleColor::ChartColor),
            border: 0.0,
            rounding: 0.0,
            padding: vec2(4.0, 4.0),
        };

        let combo = StyleCombo {
            normal: item(StyleColor::Combo),
            hover: item(StyleColor::Combo),
            active: item(StyleColor::Combo),
            border_color: c(StyleColor::Border),
            label_normal: text,
            label_hover: text,
            label_active: text,
            sym_normal: Symbol::TriangleDown,
            sym_hover: Symbol::TriangleDown,
            sym_active: Symbol::TriangleDown,
            button: flat_button(c(StyleColor::Combo), text, vec2(2.0, 2.0)),
            border: 1.0,
            rounding: 0.0,
            content_padding: vec2(4.0, 4.0),
            button_padding: vec2(0.0, 4.0),
            spacing: vec2(4.0, 0.0),
        };

        let tab_button = flat_button(c(StyleColor::TabHeader), text, vec2(2.0, 2.0));
        let node_button = StyleButton { text_background: c(StyleColor::TabHeader), ..flat_button(c(StyleColor::Window), text, vec2(2.0, 2.0)) };
        let tab = StyleTab {
            background: item(StyleColor::TabHeader),
            border_color: c(StyleColor::Border),
            text,
            tab_maximize_button: tab_button.clone(),
            tab_minimize_button: tab_button,
            node_maximize_button: node_button.clone(),
            node_minimize_button: node_button,
            sym_minimize: Symbol::TriangleRight,
            sym_maximize: Symbol::TriangleDown,
            border: 1.0,
            rounding: 0.0,
            indent: 10.0,
            padding: vec2(4.0, 4.0),
            spacing: vec2(4.0, 4.0),
        };

        let header_button = flat_button(c(StyleColor::Header), text, Vec2::default());
        let border = c(StyleColor::Border);
        let window = StyleWindow {
            header: StyleWindowHeader {
                normal: item(StyleColor::Header),
                hover: item(StyleColor::Header),
                active: item(StyleColor::Header),
                close_button: header_button.clone(),
                minimize_button: header_button,
                close_symbol: Symbol::X,
                minimize_symbol: Symbol::Minus,
                maximize_symbol: Symbol::Plus,
                label_normal: text,
                label_hover: text,
                label_active: text,
                align: HeaderAlign::Right,
                padding: vec2(4.0, 4.0),
                label_padding: vec2(4.0, 4.0),
                spacing: Vec2::default(),
            },
            fixed_background: item(StyleColor::Window),
            background: c(StyleColor::Window),
            border_color: border,
            popup_border_color: border,
            combo_border_color: border,
            contextual_border_color: border,
            menu_border_color: border,
            group_border_color: border,
            tooltip_border_color: border,
            scaler: StyleItem::Color(text),
            border: 2.0,
            combo_border: 1.0,
            contextual_border: 1.0,
            menu_border: 1.0,
            group_border: 1.0,
            tooltip_border: 1.0,
            popup_border: 1.0,
            min_row_height_padding: 8.0,
            rounding: 0.0,
            spacing: vec2(4.0, 4.0),
            scrollbar_size: vec2(10.0, 10.0),
            min_size: vec2(64.0, 64.0),
            padding: vec2(4.0, 4.0),
            group_padding: vec2(4.0, 4.0),
            popup_padding: vec2(4.0, 4.0),
            combo_padding: vec2(4.0, 4.0),
            contextual_padding: vec2(4.0, 4.0),
            menu_padding: vec2(4.0, 4.0),
            tooltip_padding: vec2(4.0, 4.0),
        };

        Self {
            font: FontId(0),
            text: StyleText { color: text, padding: Vec2::default() },
            button,
            contextual_button,
            menu_button,
            option: toggle.clone(),
            checkbox: toggle,
            selectable,
            slider,
            progress,
            property,
            edit,
            chart,
            scrollh: scrollbar.clone(),
            scrollv: scrollbar,
            combo,
            tab,
            window,
        }
    }
}


/// Depth of the style item stack.
pub const STYLE_ITEM_STACK_SIZE: usize = 16;
/// Depth of the float stack.
pub const FLOAT_STACK_SIZE: usize = 32;
/// Depth of the vector stack.
pub const VECTOR_STACK_SIZE: usize = 16;
/// Depth of the alignment flags stack.
pub const FLAGS_STACK_SIZE: usize = 32;
/// Depth of the color stack.
pub const COLOR_STACK_SIZE: usize = 32;
/// Depth of the font stack.
pub const FONT_STACK_SIZE: usize = 8;

/// Selects one field of a [`Style`], e.g. `|s| &mut s.window.padding`.
pub type StyleField<T> = fn(&mut Style) -> &mut T;

struct Saved<T> {
    field: StyleField<T>,
    old: T,
}

/// Values overwritten by the `style_push_*` calls, restored in reverse order by the pops.
#[derive(Default)]
pub(crate) struct StyleStacks {
    items: Vec<Saved<StyleItem>>,
    floats: Vec<Saved<f32>>,
    vectors: Vec<Saved<Vec2>>,
    flags: Vec<Saved<TextAlign>>,
    colors: Vec<Saved<Color>>,
    fonts: Vec<FontId>,
}

impl StyleStacks {
    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty() && self.floats.is_empty() && self.vectors.is_empty() && self.flags.is_empty() && self.colors.is_empty() && self.fonts.is_empty()
    }
}

fn push_field<T: Copy>(stack: &mut Vec<Saved<T>>, capacity: usize, style: &mut Style, field: StyleField<T>, value: T, what: &str) -> bool {
    if stack.len() >= capacity {
        warn!("{what} style stack full ({capacity})");
        return false;
    }
    let slot = field(style);
    stack.push(Saved { field, old: *slot });
    *slot = value;
    true
}

fn pop_field<T>(stack: &mut Vec<Saved<T>>, style: &mut Style) -> bool {
    match stack.pop() {
        Some(saved) => {
            *(saved.field)(style) = saved.old;
            true
        }
        None => false,
    }
}

impl Context {
    /// Overwrites a background until the matching [`Context::style_pop_item`]. Returns `false`
    /// when the stack is full.
    pub fn style_push_item(&mut self, field: StyleField<StyleItem>, value: StyleItem) -> bool {
        push_field(&mut self.style_stacks.items, STYLE_ITEM_STACK_SIZE, &mut self.style, field, value, "item")
    }

    /// Restores the last pushed background. Returns `false` when nothing was pushed.
    pub fn style_pop_item(&mut self) -> bool { pop_field(&mut self.style_stacks.items, &mut self.style) }

    /// Overwrites a size, border or rounding.
    pub fn style_push_float(&mut self, field: StyleField<f32>, value: f32) -> bool {
        push_field(&mut self.style_stacks.floats, FLOAT_STACK_SIZE, &mut self.style, field, value, "float")
    }

    /// Restores the last pushed float.
    pub fn style_pop_float(&mut self) -> bool { pop_field(&mut self.style_stacks.floats, &mut self.style) }

    /// Overwrites a padding or spacing.
    pub fn style_push_vec2(&mut self, field: StyleField<Vec2>, value: Vec2) -> bool {
        push_field(&mut self.style_stacks.vectors, VECTOR_STACK_SIZE, &mut self.style, field, value, "vector")
    }

    /// Restores the last pushed vector.
    pub fn style_pop_vec2(&mut self) -> bool { pop_field(&mut self.style_stacks.vectors, &mut self.style) }

    /// Overwrites a text alignment.
    pub fn style_push_flags(&mut self, field: StyleField<TextAlign>, value: TextAlign) -> bool {
        push_field(&mut self.style_stacks.flags, FLAGS_STACK_SIZE, &mut self.style, field, value, "flags")
    }

    /// Restores the last pushed alignment.
    pub fn style_pop_flags(&mut self) -> bool { pop_field(&mut self.style_stacks.flags, &mut self.style) }

    /// Overwrites a color.
    pub fn style_push_color(&mut self, field: StyleField<Color>, value: Color) -> bool {
        push_field(&mut self.style_stacks.colors, COLOR_STACK_SIZE, &mut self.style, field, value, "color")
    }

    /// Restores the last pushed color.
    pub fn style_pop_color(&mut self) -> bool { pop_field(&mut self.style_stacks.colors, &mut self.style) }

    /// Switches widgets to `font` until the matching [`Context::style_pop_font`].
    pub fn style_push_font(&mut self, font: FontId) -> bool {
        if self.style_stacks.fonts.len() >= FONT_STACK_SIZE {
            warn!("font style stack full ({FONT_STACK_SIZE})");
            return false;
        }
        self.style_stacks.fonts.push(self.style.font);
        self.style.font = font;
        true
    }

    /// Restores the font active before the last push.
    pub fn style_pop_font(&mut self) -> bool {
        match self.style_stacks.fonts.pop() {
            Some(font) => {
                self.style.font = font;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn table_feeds_widget_styles() {
        let mut table = DEFAULT_COLOR_TABLE;
        table[StyleColor::Button as usize] = Color::rgb(1, 2, 3);
        let style = Style::from_table(&table);
        assert_eq!(style.button.normal, StyleItem::Color(Color::rgb(1, 2, 3)));
        assert_eq!(style.button.text_background, Color::rgb(1, 2, 3));
        assert_eq!(style.window.spacing, vec2(4.0, 4.0));
        assert_eq!(style.property.rounding, 10.0);
        assert_eq!(style.chart.selected_color, Color::rgb(255, 0, 0));
        assert_eq!(style.tab.background, StyleItem::Color(DEFAULT_COLOR_TABLE[StyleColor::TabHeader as usize]));
        assert_eq!(style.tab.node_minimize_button.normal, StyleItem::Color(DEFAULT_COLOR_TABLE[StyleColor::Window as usize]));
    }

    struct Counter(Cell<u32>);

    impl CustomDraw for Counter {
        fn draw_begin(&self, _draw: &mut DrawCtx<'_>) { self.0.set(self.0.get() + 1); }
        fn draw_end(&self, _draw: &mut DrawCtx<'_>) { self.0.set(self.0.get() + 10); }
    }

    #[test]
    fn custom_draw_wraps_rendering() {
        let counter = Rc::new(Counter(Cell::new(0)));
        let hook: CustomDrawRef = Some(counter.clone());
        let mut memory = Buffer::new(128);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut draw = DrawCtx::new(&mut memory, &mut buf);
        let mut ran = false;
        with_custom_draw(&hook, &mut draw, |_| ran = true);
        assert!(ran);
        assert_eq!(counter.0.get(), 11);
    }

    #[test]
    fn pops_restore_in_reverse_order() {
        let mut ctx = Context::new(Rc::new(crate::test_font::TestFont));
        let padding = ctx.style().window.padding;
        assert!(ctx.style_push_vec2(|s| &mut s.window.padding, vec2(1.0, 1.0)));
        assert!(ctx.style_push_vec2(|s| &mut s.window.padding, vec2(2.0, 2.0)));
        assert!(ctx.style_push_color(|s| &mut s.text.color, Color::rgb(9, 9, 9)));
        assert!(ctx.style_push_item(|s| &mut s.button.normal, StyleItem::Hide));
        assert_eq!(ctx.style().window.padding, vec2(2.0, 2.0));
        assert_eq!(ctx.style().button.normal, StyleItem::Hide);

        assert!(ctx.style_pop_vec2());
        assert_eq!(ctx.style().window.padding, vec2(1.0, 1.0));
        assert!(ctx.style_pop_vec2());
        assert_eq!(ctx.style().window.padding, padding);
        assert!(!ctx.style_pop_vec2());
        assert!(ctx.style_pop_color());
        assert!(ctx.style_pop_item());
        assert_eq!(ctx.style().text.color, DEFAULT_COLOR_TABLE[StyleColor::Text as usize]);
        assert_eq!(ctx.style().button.normal, StyleItem::Color(DEFAULT_COLOR_TABLE[StyleColor::Button as usize]));
        assert!(ctx.style_stacks.is_empty());
    }

    #[test]
    fn full_stacks_refuse_pushes() {
        let mut ctx = Context::new(Rc::new(crate::test_font::TestFont));
        for i in 0..FONT_STACK_SIZE {
            assert!(ctx.style_push_font(FontId(i as u32 + 1)));
        }
        assert!(!ctx.style_push_font(FontId(99)));
        assert_eq!(ctx.style().font, FontId(FONT_STACK_SIZE as u32));
        for _ in 0..FLOAT_STACK_SIZE {
            assert!(ctx.style_push_float(|s| &mut s.button.rounding, 1.0));
        }
        assert!(!ctx.style_push_float(|s| &mut s.button.rounding, 2.0));
        assert_eq!(ctx.style().button.rounding, 1.0);
        while ctx.style_pop_float() {}
        assert_eq!(ctx.style().button.rounding, 4.0);
        while ctx.style_pop_font() {}
        assert_eq!(ctx.style().font, FontId(0));
    }
}
