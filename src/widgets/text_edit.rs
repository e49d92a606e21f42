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
//! Single and multi line text fields on top of [`TextEdit`].

use bitflags::bitflags;

use crate::draw_context::DrawCtx;
use crate::style::with_custom_draw;
use crate::widgets::{FontRef, WidgetCtx, do_scrollbarv};
use crate::*;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Behavior of an edit field.
    pub struct EditFlags : u32 {
        /// Text can be selected and copied but not changed.
        const READ_ONLY = 1 << 0;
        /// Selects the whole text when the field is activated.
        const AUTO_SELECT = 1 << 1;
        /// Enter reports [`EditEvents::COMMITED`] instead of inserting a newline.
        const SIG_ENTER = 1 << 2;
        /// Tab inserts spaces.
        const ALLOW_TAB = 1 << 3;
        /// The cursor is not drawn.
        const NO_CURSOR = 1 << 4;
        /// Mouse selection is enabled.
        const SELECTABLE = 1 << 5;
        /// Copy, cut and paste go through the host clipboard.
        const CLIPBOARD = 1 << 6;
        /// Enter needs shift to insert a newline.
        const CTRL_ENTER_NEWLINE = 1 << 7;
        /// The view never scrolls sideways.
        const NO_HORIZONTAL_SCROLL = 1 << 8;
        /// Typing always inserts.
        const ALWAYS_INSERT_MODE = 1 << 9;
        /// Newlines split rows and a vertical scrollbar is shown.
        const MULTILINE = 1 << 10;
        /// The cursor jumps to the end when the field is activated.
        const GOTO_END_ON_ACTIVATE = 1 << 11;

        /// Plain field.
        const SIMPLE = Self::ALWAYS_INSERT_MODE.bits();
        /// Field with selection and clipboard.
        const FIELD = Self::SIMPLE.bits() | Self::SELECTABLE.bits() | Self::CLIPBOARD.bits();
        /// Multi line box.
        const BOX = Self::ALWAYS_INSERT_MODE.bits() | Self::SELECTABLE.bits() | Self::MULTILINE.bits() | Self::ALLOW_TAB.bits() | Self::CLIPBOARD.bits();
        /// Multi line editor with modal editing.
        const EDITOR = Self::SELECTABLE.bits() | Self::MULTILINE.bits() | Self::ALLOW_TAB.bits() | Self::CLIPBOARD.bits();
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// What happened to an edit field this frame.
    pub struct EditEvents : u32 {
        /// The field has focus.
        const ACTIVE = 1 << 0;
        /// The field does not have focus.
        const INACTIVE = 1 << 1;
        /// The field got focus this frame.
        const ACTIVATED = 1 << 2;
        /// The field lost focus this frame.
        const DEACTIVATED = 1 << 3;
        /// Enter was pressed on a [`EditFlags::SIG_ENTER`] field.
        const COMMITED = 1 << 4;
    }
}

/// Keys forwarded to the editor as they are.
const EDIT_KEYS: [Key; 18] = [
    Key::Del,
    Key::Backspace,
    Key::Up,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::TextInsertMode,
    Key::TextReplaceMode,
    Key::TextResetMode,
    Key::TextLineStart,
    Key::TextLineEnd,
    Key::TextStart,
    Key::TextEnd,
    Key::TextUndo,
    Key::TextRedo,
    Key::TextSelectAll,
    Key::TextWordLeft,
    Key::TextWordRight,
];

/// Cursor pen position and extent of the laid out text, relative to the text origin.
#[derive(Copy, Clone, Debug, Default)]
struct Caret {
    cursor: Vec2,
    size: Vec2,
}

fn glyph_width(font: FontRef<'_>, c: char) -> f32 {
    let mut buf = [0u8; 4];
    font.width(c.encode_utf8(&mut buf))
}

fn measure(text: &str, font: FontRef<'_>, row_height: f32, cursor: usize) -> Caret {
    let mut pen = Vec2::default();
    let mut caret = Caret::default();
    let mut width: f32 = 0.0;
    let mut n = 0;
    for (i, c) in text.chars().enumerate() {
        if i == cursor {
            caret.cursor = pen;
        }
        if c == '\n' {
            width = width.max(pen.x);
            pen = vec2(0.0, pen.y + row_height);
        } else {
            pen.x += glyph_width(font, c);
        }
        n = i + 1;
    }
    if cursor >= n {
        caret.cursor = pen;
    }
    caret.size = vec2(width.max(pen.x), pen.y + row_height);
    caret
}

fn byte_at(s: &str, glyph: usize) -> usize { s.char_indices().nth(glyph).map(|(b, _)| b).unwrap_or(s.len()) }

struct EditColors {
    text: Color,
    background: Color,
    selected: Color,
    selected_text: Color,
    cursor: Color,
    cursor_text: Color,
}

fn edit_colors(style: &StyleEdit, active: bool, hovered: bool, background: StyleItem) -> EditColors {
    let text = if active {
        style.text_active
    } else if hovered {
        style.text_hover
    } else {
        style.text_normal
    };
    EditColors {
        text,
        background: background.color(),
        selected: if hovered { style.selected_hover } else { style.selected_normal },
        selected_text: if hovered { style.selected_text_hover } else { style.selected_text_normal },
        cursor: if hovered { style.cursor_hover } else { style.cursor_normal },
        cursor_text: if hovered { style.cursor_text_hover } else { style.cursor_text_normal },
    }
}

struct TextView<'a> {
    text: &'a str,
    area: Rect,
    scroll: Vec2,
    row_height: f32,
    multiline: bool,
    selection: (usize, usize),
    cursor: Option<usize>,
    cursor_size: f32,
}

impl TextView<'_> {
    fn row_y(&self, row: usize, font: FontRef<'_>) -> f32 {
        if self.multiline {
            self.area.y + row as f32 * self.row_height - self.scroll.y
        } else {
            self.area.y + self.area.h / 2.0 - font.height() / 2.0
        }
    }

    fn draw(&self, d: &mut DrawCtx<'_>, font: FontRef<'_>, c: &EditColors) {
        let (sel_a, sel_b) = self.selection;
        let mut first = 0;
        for (row, line) in self.text.split('\n').enumerate() {
            let count = line.chars().count();
            let y = self.row_y(row, font);
            let mut x = self.area.x - self.scroll.x;
            let a = sel_a.clamp(first, first + count) - first;
            let b = sel_b.clamp(first, first + count) - first;
            let chunks = [(0, a, false), (a, b, true), (b, count, false)];
            for (from, to, selected) in chunks {
                if from >= to {
                    continue;
                }
                let s = &line[byte_at(line, from)..byte_at(line, to)];
                let w = font.width(s);
                let r = Rect::new(x, y, w, font.height());
                if selected {
                    d.fill_rect(r, 0.0, c.selected);
                    d.draw_text(r, s, font.id, font.font, c.selected, c.selected_text);
                } else {
                    d.draw_text(r, s, font.id, font.font, c.background, c.text);
                }
                x += w;
            }

            if let Some(cursor) = self.cursor
                && (first..=first + count).contains(&cursor)
            {
                let pre = &line[..byte_at(line, cursor - first)];
                let cx = self.area.x - self.scroll.x + font.width(pre);
                match line[byte_at(line, cursor - first)..].chars().next() {
                    Some(g) => {
                        let mut buf = [0u8; 4];
                        let g = g.encode_utf8(&mut buf);
                        let r = Rect::new(cx, y, font.width(g), font.height());
                        d.fill_rect(r, 0.0, c.cursor);
                        d.draw_text(r, g, font.id, font.font, c.cursor, c.cursor_text);
                    }
                    None => d.fill_rect(Rect::new(cx, y, self.cursor_size, font.height()), 0.0, c.cursor),
                }
            }
            first += count + 1;
        }
    }
}

/// Moves the view so the cursor stays visible.
fn follow_cursor(edit: &mut TextEdit, caret: &Caret, area: Rect, row_height: f32, flags: EditFlags) {
    if flags.contains(EditFlags::NO_HORIZONTAL_SCROLL) {
        edit.scrollbar.x = 0.0;
    } else {
        let increment = area.w * 0.25;
        if caret.cursor.x < edit.scrollbar.x {
            edit.scrollbar.x = (caret.cursor.x - increment).max(0.0).floor();
        }
        if caret.cursor.x >= edit.scrollbar.x + area.w {
            edit.scrollbar.x = (caret.cursor.x - area.w + increment).max(0.0).floor();
        }
    }
    if flags.contains(EditFlags::MULTILINE) {
        if caret.cursor.y < edit.scrollbar.y {
            edit.scrollbar.y = (caret.cursor.y - row_height).max(0.0);
        }
        if caret.cursor.y >= edit.scrollbar.y + area.h {
            edit.scrollbar.y += row_height;
        }
    } else {
        edit.scrollbar.y = 0.0;
    }
}

/// Applies one frame of input to an active editor. Returns the commit flag, whether the view
/// must follow the cursor and whether the typed text was used.
fn edit_input(edit: &mut TextEdit, input: &Input, font: FontRef<'_>, area: Rect, row_height: f32, flags: EditFlags, clipboard: &mut Option<Box<dyn Clipboard>>) -> (bool, bool, bool) {
    let mut follow = false;
    let mut committed = false;
    let shift = input.is_key_down(Key::Shift);
    let mouse = vec2(input.mouse.pos.x - area.x + edit.scrollbar.x, input.mouse.pos.y - area.y + edit.scrollbar.y);
    let row_height = if flags.contains(EditFlags::MULTILINE) { row_height } else { area.h };
    let hovered = input.is_mouse_hovering_rect(area);
    let left = &input.mouse.buttons[MouseButton::Left as usize];
    let right = &input.mouse.buttons[MouseButton::Right as usize];

    if hovered && left.down && left.clicked > 0 {
        edit.click(mouse.x, mouse.y, font.font, row_height);
    } else if hovered && left.down && (input.mouse.delta.x != 0.0 || input.mouse.delta.y != 0.0) && flags.contains(EditFlags::SELECTABLE) {
        edit.drag(mouse.x, mouse.y, font.font, row_height);
        follow = true;
    } else if hovered && right.down && right.clicked > 0 && flags.contains(EditFlags::SELECTABLE) {
        edit.select_word_at(mouse.x, mouse.y, font.font, row_height);
        follow = true;
    }

    for key in EDIT_KEYS {
        if input.is_key_pressed(key) {
            edit.key(key, shift, font.font, row_height);
            follow = true;
        }
    }

    let text = input.keyboard.text();
    let consumed = !text.is_empty();
    if consumed {
        edit.text(text);
        follow = true;
    }

    if input.is_key_pressed(Key::Enter) {
        follow = true;
        if flags.contains(EditFlags::CTRL_ENTER_NEWLINE) && shift {
            edit.text("\n");
        } else if flags.contains(EditFlags::SIG_ENTER) {
            committed = true;
        } else {
            edit.text("\n");
        }
    }

    let copy = input.is_key_pressed(Key::Copy);
    let cut = input.is_key_pressed(Key::Cut);
    if (copy || cut) && flags.contains(EditFlags::CLIPBOARD) {
        if edit.has_selection()
            && let Some(cb) = clipboard.as_deref_mut()
        {
            cb.copy(edit.selected_text());
        }
        if cut && !flags.contains(EditFlags::READ_ONLY) {
            edit.cut();
            follow = true;
        }
    }

    if input.is_key_pressed(Key::Paste)
        && flags.contains(EditFlags::CLIPBOARD)
        && edit.mode != TextEditMode::View
        && let Some(text) = clipboard.as_deref_mut().and_then(|cb| cb.paste())
    {
        edit.paste(&text);
        follow = true;
    }

    if input.is_key_pressed(Key::Tab) && flags.contains(EditFlags::ALLOW_TAB) {
        edit.text("    ");
        follow = true;
    }
    (committed, follow, consumed)
}

/// Edit field over `bounds`. Returns the events and whether the frame's typed text was used.
#[allow(clippy::too_many_arguments)]
pub(crate) fn do_edit(
    state: &mut WidgetStates,
    w: &mut WidgetCtx<'_>,
    bounds: Rect,
    flags: EditFlags,
    filter: Option<Filter>,
    edit: &mut TextEdit,
    clipboard: &mut Option<Box<dyn Clipboard>>,
    style: &StyleEdit,
) -> (EditEvents, bool) {
    let font = w.font;
    let multiline = flags.contains(EditFlags::MULTILINE);
    let mut area = bounds.pad(vec2(style.padding.x + style.border, style.padding.y + style.border));
    if multiline {
        area.w = (area.w - style.scrollbar_size.x).max(0.0);
    }
    let row_height = if multiline { font.height() + style.row_padding } else { area.h };

    let prev_active = edit.active;
    let mut input = w.input;
    if let Some(i) = input
        && i.is_mouse_pressed(MouseButton::Left)
    {
        edit.active = bounds.contains(i.mouse.pos);
    }

    if !prev_active && edit.active {
        let kind = if multiline { TextEditType::MultiLine } else { TextEditType::SingleLine };
        let scroll = edit.scrollbar;
        edit.clear_state(kind, filter);
        edit.scrollbar = scroll;
        if flags.contains(EditFlags::AUTO_SELECT) {
            edit.select_all();
        }
        if flags.contains(EditFlags::GOTO_END_ON_ACTIVATE) {
            edit.set_cursor(edit.len());
            input = None;
        }
    }
    edit.filter = filter;
    edit.single_line = !multiline;
    if !edit.active {
        edit.mode = TextEditMode::View;
    } else if flags.contains(EditFlags::ALWAYS_INSERT_MODE) {
        edit.mode = TextEditMode::Insert;
    }
    if flags.contains(EditFlags::READ_ONLY) {
        edit.mode = TextEditMode::View;
    }

    let mut events = if edit.active { EditEvents::ACTIVE } else { EditEvents::INACTIVE };
    if prev_active != edit.active {
        events |= if edit.active { EditEvents::ACTIVATED } else { EditEvents::DEACTIVATED };
    }

    let mut consumed = false;
    let mut follow = false;
    if edit.active
        && let Some(i) = input
    {
        let (committed, f, c) = edit_input(edit, i, font, area, row_height, flags, clipboard);
        if committed {
            events |= EditEvents::COMMITED;
        }
        follow = f;
        consumed = c;
    }

    state.reset();
    let hovered = w.is_hovering(bounds);
    if edit.active {
        *state = WidgetStates::ACTIVE;
    } else if hovered {
        *state = WidgetStates::HOVERED;
    }

    let caret = measure(edit.as_str(), font, row_height, edit.cursor());
    if edit.active && follow {
        follow_cursor(edit, &caret, area, row_height, flags);
    }

    if multiline {
        let scroll = Rect::new((bounds.x + bounds.w - style.border) - style.scrollbar_size.x, area.y, style.scrollbar_size.x, area.h);
        let mut ws = WidgetStates::empty();
        let has_scrolling = w.is_hovering(bounds);
        edit.scrollbar.y = do_scrollbarv(&mut ws, w, scroll, has_scrolling, edit.scrollbar.y, caret.size.y, scroll.h * 0.10, scroll.h * 0.01, &style.scrollbar);
    }

    let background = if edit.active {
        style.active
    } else if hovered {
        style.hover
    } else {
        style.normal
    };
    let colors = edit_colors(style, edit.active, hovered, background);
    let (a, b) = edit.selection();
    let show_cursor = edit.active && !flags.contains(EditFlags::NO_CURSOR) && a == b;
    let view = TextView {
        text: edit.as_str(),
        area,
        scroll: edit.scrollbar,
        row_height,
        multiline,
        selection: if edit.active { (a.min(b), a.max(b)) } else { (0, 0) },
        cursor: show_cursor.then_some(edit.cursor()),
        cursor_size: style.cursor_size,
    };
    with_custom_draw(&style.draw, &mut w.draw, |d| {
        match background {
            StyleItem::Color(c) => {
                d.fill_rect(bounds, style.rounding, c);
                d.stroke_rect(bounds, style.rounding, style.border, style.border_color);
            }
            other => other.draw(d, bounds, style.rounding),
        }
        let old = d.clip();
        d.push_scissor(area.unify(&old));
        view.draw(d, font, &colors);
        d.push_scissor(old);
    });
    (events, consumed)
}

impl Context {
    /// Runs an edit field over the next widget rectangle, tracking focus in the window.
    fn run_edit(&mut self, flags: EditFlags, edit: &mut TextEdit, filter: Option<Filter>) -> EditEvents {
        let Some((bounds, layout_state)) = self.widget_rect() else { return EditEvents::empty() };
        let Some(cur) = self.current else { return EditEvents::empty() };
        let Context { windows, memory, input, style, fonts, last_widget_state, clipboard, .. } = self;
        let Some(Window { layout, buffer, drag, edit: focus, .. }) = windows.get_mut(cur) else { return EditEvents::empty() };

        let hash = focus.seq;
        focus.seq += 1;
        edit.active = focus.active && focus.name == hash;
        let prev = edit.active;

        let rom = layout.last().is_none_or(|p| p.flags.contains(PanelFlags::ROM));
        let with_input = layout_state == WidgetLayoutState::Valid && !rom && !flags.contains(EditFlags::READ_ONLY);
        let reader: Option<&Input> = if with_input { Some(&*input) } else { None };
        let mut w = WidgetCtx::new(DrawCtx::new(memory, buffer), reader, font_of(fonts, style.font), style.font, drag);
        let (events, consumed) = do_edit(last_widget_state, &mut w, bounds, flags, filter, edit, clipboard, &style.edit);

        if edit.active && !prev {
            focus.active = true;
            focus.name = hash;
            focus.mode = edit.mode;
        } else if prev && !edit.active {
            focus.active = false;
        }
        if consumed {
            input.keyboard.clear_text();
        }
        events
    }

    /// Edit field over a caller owned string holding at most `max` characters.
    ///
    /// Cursor, selection and scroll of the focused field are kept by the window between frames.
    pub fn edit_string(&mut self, flags: EditFlags, buffer: &mut String, max: usize, filter: Option<Filter>) -> EditEvents {
        let Some(cur) = self.current else { return EditEvents::empty() };
        let Some(saved) = self.windows.get(cur).map(|w| w.edit.clone()) else { return EditEvents::empty() };
        let hash = saved.seq;

        let mut edit = std::mem::take(&mut self.text_edit);
        let kind = if flags.contains(EditFlags::MULTILINE) { TextEditType::MultiLine } else { TextEditType::SingleLine };
        edit.clear_state(kind, filter);
        edit.set_max_len(Some(max));
        edit.swap_string(buffer);
        if saved.active && saved.name == hash {
            edit.restore(saved.cursor, saved.sel_start, saved.sel_end);
            edit.mode = saved.mode;
            edit.scrollbar = saved.scrollbar;
        }

        let events = self.run_edit(flags, &mut edit, filter);

        if let Some(win) = self.windows.get_mut(cur)
            && win.edit.active
            && win.edit.name == hash
        {
            let (start, end) = edit.selection();
            win.edit.cursor = edit.cursor();
            win.edit.sel_start = start;
            win.edit.sel_end = end;
            win.edit.mode = edit.mode;
            win.edit.scrollbar = edit.scrollbar;
        }
        edit.swap_string(buffer);
        self.text_edit = edit;
        events
    }

    /// Edit field over a caller owned editor, which keeps its own cursor and history.
    pub fn edit_buffer(&mut self, flags: EditFlags, edit: &mut TextEdit, filter: Option<Filter>) -> EditEvents {
        if flags.contains(EditFlags::NO_HORIZONTAL_SCROLL) {
            edit.scrollbar.x = 0.0;
        }
        self.run_edit(flags, edit, filter)
    }

    /// Gives focus to the next edit field of the current window.
    pub fn edit_focus(&mut self, flags: EditFlags) {
        let Some(win) = self.current.and_then(|c| self.windows.get_mut(c)) else { return };
        win.edit.active = true;
        win.edit.name = win.edit.seq;
        if flags.contains(EditFlags::ALWAYS_INSERT_MODE) {
            win.edit.mode = TextEditMode::Insert;
        }
    }

    /// Removes focus from the edit fields of the current window.
    pub fn edit_unfocus(&mut self) {
        let Some(win) = self.current.and_then(|c| self.windows.get_mut(c)) else { return };
        win.edit.active = false;
        win.edit.name = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;
    use crate::window::DragAnchor;

    struct Memo(String);

    impl Clipboard for Memo {
        fn copy(&mut self, text: &str) { self.0 = text.to_string(); }
        fn paste(&mut self) -> Option<String> { Some(self.0.clone()) }
    }

    fn run(input: &Input, edit: &mut TextEdit, flags: EditFlags, clipboard: &mut Option<Box<dyn Clipboard>>) -> (EditEvents, bool) {
        let font = TestFont;
        let style = Style::default();
        let mut drag = DragAnchor::default();
        let mut memory = Buffer::new(8192);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let mut w = WidgetCtx::new(DrawCtx::new(&mut memory, &mut buf), Some(input), &font, FontId(0), &mut drag);
        let mut state = WidgetStates::empty();
        do_edit(&mut state, &mut w, rect(0.0, 0.0, 200.0, 30.0), flags, None, edit, clipboard, &style.edit)
    }

    #[test]
    fn click_activates_and_typing_inserts() {
        let mut input = Input::default();
        input.begin();
        input.motion(50.0, 15.0);
        input.button(MouseButton::Left, 50.0, 15.0, true);
        input.char(b'a');
        input.char(b'b');
        let mut edit = TextEdit::new();
        let (events, consumed) = run(&input, &mut edit, EditFlags::FIELD, &mut None);
        assert!(events.contains(EditEvents::ACTIVE | EditEvents::ACTIVATED));
        assert!(consumed);
        assert_eq!(edit.as_str(), "ab");
        assert_eq!(edit.cursor(), 2);

        // a click elsewhere takes the focus away
        input.begin();
        input.button(MouseButton::Left, 50.0, 15.0, false);
        input.motion(500.0, 15.0);
        input.begin();
        input.button(MouseButton::Left, 500.0, 15.0, true);
        let (events, _) = run(&input, &mut edit, EditFlags::FIELD, &mut None);
        assert!(events.contains(EditEvents::INACTIVE | EditEvents::DEACTIVATED));
    }

    #[test]
    fn enter_commits_with_sig_enter() {
        let mut input = Input::default();
        input.begin();
        input.key(Key::Enter, true);
        let mut edit = TextEdit::with_text("abc");
        edit.active = true;
        let (events, _) = run(&input, &mut edit, EditFlags::FIELD | EditFlags::SIG_ENTER, &mut None);
        assert!(events.contains(EditEvents::COMMITED));
        assert_eq!(edit.as_str(), "abc");

        edit.active = true;
        let (events, _) = run(&input, &mut edit, EditFlags::BOX, &mut None);
        assert!(!events.contains(EditEvents::COMMITED));
        assert_eq!(edit.as_str(), "\nabc");
    }

    #[test]
    fn read_only_ignores_typing() {
        let mut input = Input::default();
        input.begin();
        input.char(b'x');
        let mut edit = TextEdit::with_text("abc");
        edit.active = true;
        run(&input, &mut edit, EditFlags::FIELD | EditFlags::READ_ONLY, &mut None);
        assert_eq!(edit.as_str(), "abc");
    }

    #[test]
    fn copy_and_paste_use_the_clipboard() {
        let mut clipboard: Option<Box<dyn Clipboard>> = Some(Box::new(Memo(String::new())));
        let mut edit = TextEdit::with_text("hello");
        edit.active = true;
        edit.select(0, 2);

        let mut input = Input::default();
        input.begin();
        input.key(Key::Copy, true);
        run(&input, &mut edit, EditFlags::FIELD, &mut clipboard);

        input.key(Key::Copy, false);
        input.begin();
        input.key(Key::TextEnd, true);
        input.key(Key::Paste, true);
        run(&input, &mut edit, EditFlags::FIELD, &mut clipboard);
        assert_eq!(edit.as_str(), "hellohe");
    }

    #[test]
    fn caret_tracks_rows() {
        let font = TestFont;
        let f = FontRef { font: &font, id: FontId(0) };
        let caret = measure("ab\ncd", f, 12.0, 4);
        assert_eq!(caret.cursor, vec2(8.0, 12.0));
        assert_eq!(caret.size, vec2(16.0, 24.0));
    }
}
