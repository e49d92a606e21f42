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
//! Editable string with cursor, selection and undo/redo history.
//!
//! Positions and lengths are counted in code points. The undo history keeps a fixed number of
//! records and characters: undo entries grow from the bottom of both arrays, redo entries from the
//! top, and the oldest undo entry is dropped when the two would meet.

use crate::utf8::byte_offset;
use crate::*;

/// Maximum number of undo plus redo records.
pub const UNDO_STATE_COUNT: usize = 99;
/// Maximum number of code points stored by undo plus redo records.
pub const UNDO_CHAR_COUNT: usize = 999;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// How typed text is applied.
pub enum TextEditMode {
    /// Typed text is ignored.
    #[default]
    View,
    /// Typed text is inserted at the cursor.
    Insert,
    /// Typed text overwrites the character under the cursor.
    Replace,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Line handling of an editor.
pub enum TextEditType {
    /// Newlines are rejected; up and down act as left and right.
    #[default]
    SingleLine,
    /// Newlines split rows.
    MultiLine,
}

#[derive(Copy, Clone, Debug, Default)]
struct UndoRecord {
    at: usize,
    insert_length: usize,
    delete_length: usize,
    char_storage: Option<usize>,
    // cursor and selection restored when the record is applied
    cursor: usize,
    select_start: usize,
    select_end: usize,
}

#[derive(Clone, Debug)]
struct UndoState {
    records: Vec<UndoRecord>,
    chars: Vec<char>,
    undo_point: usize,
    redo_point: usize,
    undo_char_point: usize,
    redo_char_point: usize,
}

impl Default for UndoState {
    fn default() -> Self {
        Self {
            records: vec![UndoRecord::default(); UNDO_STATE_COUNT],
            chars: vec!['\0'; UNDO_CHAR_COUNT],
            undo_point: 0,
            redo_point: UNDO_STATE_COUNT,
            undo_char_point: 0,
            redo_char_point: UNDO_CHAR_COUNT,
        }
    }
}

impl UndoState {
    fn flush_redo(&mut self) {
        self.redo_point = UNDO_STATE_COUNT;
        self.redo_char_point = UNDO_CHAR_COUNT;
    }

    fn discard_undo(&mut self) {
        if self.undo_point == 0 {
            return;
        }
        if self.records[0].char_storage.is_some() {
            let n = self.records[0].insert_length;
            self.undo_char_point -= n;
            self.chars.copy_within(n..n + self.undo_char_point, 0);
            for r in self.records[..self.undo_point].iter_mut() {
                if let Some(s) = r.char_storage.as_mut() {
                    *s = s.saturating_sub(n);
                }
            }
        }
        self.undo_point -= 1;
        self.records.copy_within(1..self.undo_point + 1, 0);
    }

    fn discard_redo(&mut self) {
        let k = UNDO_STATE_COUNT - 1;
        if self.redo_point > k {
            return;
        }
        if self.records[k].char_storage.is_some() {
            let n = self.records[k].insert_length;
            let from = self.redo_char_point;
            self.chars.copy_within(from..UNDO_CHAR_COUNT - n, from + n);
            self.redo_char_point += n;
            for r in self.records[self.redo_point..k].iter_mut() {
                if let Some(s) = r.char_storage.as_mut() {
                    *s += n;
                }
            }
        }
        self.records.copy_within(self.redo_point..k, self.redo_point + 1);
        self.redo_point += 1;
    }

    /// Reserves a record and `numchars` character slots. Returns the record index.
    fn create_record(&mut self, numchars: usize) -> Option<usize> {
        self.flush_redo();
        if self.undo_point == UNDO_STATE_COUNT {
            self.discard_undo();
        }
        if numchars > UNDO_CHAR_COUNT {
            // too large to ever fit: drop the whole history
            self.undo_point = 0;
            self.undo_char_point = 0;
            return None;
        }
        while self.undo_char_point + numchars > UNDO_CHAR_COUNT {
            self.discard_undo();
        }
        let at = self.undo_point;
        self.undo_point += 1;
        Some(at)
    }

    fn create(&mut self, at: usize, insert_length: usize, delete_length: usize, restore: (usize, usize, usize)) -> Option<usize> {
        let idx = self.create_record(insert_length)?;
        let storage = if insert_length == 0 {
            None
        } else {
            let s = self.undo_char_point;
            self.undo_char_point += insert_length;
            Some(s)
        };
        self.records[idx] = UndoRecord {
            at,
            insert_length,
            delete_length,
            char_storage: storage,
            cursor: restore.0,
            select_start: restore.1,
            select_end: restore.2,
        };
        storage
    }
}

fn is_word_boundary_char(c: char) -> bool { matches!(c, ' ' | '\t' | '\u{3000}' | ',' | ';' | '(' | ')' | '{' | '}' | '[' | ']' | '|') }

#[derive(Copy, Clone, Debug, Default)]
struct TextRow {
    x0: f32,
    x1: f32,
    baseline_y_delta: f32,
    ymin: f32,
    ymax: f32,
    num_chars: usize,
}

#[derive(Copy, Clone, Debug, Default)]
struct TextFind {
    x: f32,
    first_char: usize,
    length: usize,
    prev_first: usize,
}

#[derive(Clone)]
/// Editable text buffer with cursor, selection and undo history.
pub struct TextEdit {
    string: String,
    glyphs: usize,
    max_len: Option<usize>,
    pub(crate) filter: Option<Filter>,
    pub(crate) scrollbar: Vec2,
    cursor: usize,
    select_start: usize,
    select_end: usize,
    /// How typed text is applied.
    pub mode: TextEditMode,
    pub(crate) cursor_at_end_of_line: bool,
    pub(crate) initialized: bool,
    pub(crate) has_preferred_x: bool,
    pub(crate) single_line: bool,
    pub(crate) active: bool,
    pub(crate) preferred_x: f32,
    undo: UndoState,
}

impl Default for TextEdit {
    fn default() -> Self { Self::new() }
}

impl TextEdit {
    /// Creates an empty, growable editor.
    pub fn new() -> Self {
        Self {
            string: String::new(),
            glyphs: 0,
            max_len: None,
            filter: None,
            scrollbar: Vec2::default(),
            cursor: 0,
            select_start: 0,
            select_end: 0,
            mode: TextEditMode::View,
            cursor_at_end_of_line: false,
            initialized: false,
            has_preferred_x: false,
            single_line: true,
            active: false,
            preferred_x: 0.0,
            undo: UndoState::default(),
        }
    }

    /// Creates an editor holding `text`.
    pub fn with_text(text: &str) -> Self {
        let mut edit = Self::new();
        edit.set_text(text);
        edit
    }

    /// Creates an editor that never holds more than `max_len` code points.
    pub fn fixed(max_len: usize) -> Self {
        let mut edit = Self::new();
        edit.max_len = Some(max_len);
        edit
    }

    /// Resets cursor, selection and history for a new editing session.
    pub fn clear_state(&mut self, kind: TextEditType, filter: Option<Filter>) {
        self.undo = UndoState::default();
        self.select_start = 0;
        self.select_end = 0;
        self.cursor = 0;
        self.has_preferred_x = false;
        self.preferred_x = 0.0;
        self.cursor_at_end_of_line = false;
        self.initialized = true;
        self.single_line = kind == TextEditType::SingleLine;
        self.mode = TextEditMode::View;
        self.filter = filter;
        self.scrollbar = Vec2::default();
    }

    /// Current text.
    pub fn as_str(&self) -> &str { &self.string }

    /// Replaces the text without recording history.
    pub fn set_text(&mut self, text: &str) {
        self.string.clear();
        self.string.push_str(text);
        if let Some(max) = self.max_len {
            let end = byte_offset(&self.string, max);
            self.string.truncate(end);
        }
        self.glyphs = self.string.chars().count();
        self.clamp();
    }

    pub(crate) fn swap_string(&mut self, other: &mut String) {
        std::mem::swap(&mut self.string, other);
        self.glyphs = self.string.chars().count();
    }

    pub(crate) fn set_max_len(&mut self, max_len: Option<usize>) { self.max_len = max_len; }

    /// Length in code points.
    pub fn len(&self) -> usize { self.glyphs }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool { self.glyphs == 0 }

    /// Cursor position.
    pub fn cursor(&self) -> usize { self.cursor }

    /// Selection as `(start, end)`; equal values mean no selection.
    pub fn selection(&self) -> (usize, usize) { (self.select_start, self.select_end) }

    /// Moves the cursor and drops the selection.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.glyphs);
        self.select_start = self.cursor;
        self.select_end = self.cursor;
    }

    /// Selects `[start, end)` and puts the cursor at `end`.
    pub fn select(&mut self, start: usize, end: usize) {
        self.select_start = start;
        self.select_end = end;
        self.cursor = end;
        self.clamp();
    }

    /// Returns `true` if a non empty selection exists.
    pub fn has_selection(&self) -> bool { self.select_start != self.select_end }

    /// Selected text.
    pub fn selected_text(&self) -> &str {
        let (a, b) = self.sorted_selection();
        &self.string[byte_offset(&self.string, a)..byte_offset(&self.string, b)]
    }

    /// Sets the character filter applied by [`TextEdit::text`].
    pub fn set_filter(&mut self, filter: Option<Filter>) { self.filter = filter; }

    fn restore_point(&self) -> (usize, usize, usize) { (self.cursor, self.select_start, self.select_end) }

    fn sorted_selection(&self) -> (usize, usize) {
        if self.select_start <= self.select_end {
            (self.select_start, self.select_end)
        } else {
            (self.select_end, self.select_start)
        }
    }

    fn char_at(&self, i: usize) -> Option<char> { crate::utf8::char_at(&self.string, i) }

    fn slice(&self, at: usize, len: usize) -> &str {
        let start = byte_offset(&self.string, at);
        let end = byte_offset(&self.string, at + len);
        &self.string[start..end]
    }

    fn insert_raw(&mut self, at: usize, text: &str) -> bool {
        let n = text.chars().count();
        if let Some(max) = self.max_len
            && self.glyphs + n > max
        {
            return false;
        }
        let b = byte_offset(&self.string, at);
        self.string.insert_str(b, text);
        self.glyphs += n;
        true
    }

    fn remove_raw(&mut self, at: usize, len: usize) {
        let start = byte_offset(&self.string, at);
        let end = byte_offset(&self.string, at + len);
        self.string.replace_range(start..end, "");
        self.glyphs = self.string.chars().count();
    }

    fn clamp(&mut self) {
        let n = self.glyphs;
        if self.has_selection() {
            self.select_start = self.select_start.min(n);
            self.select_end = self.select_end.min(n);
            if self.select_start == self.select_end {
                self.cursor = self.select_start;
            }
        }
        self.cursor = self.cursor.min(n);
    }

    fn sort_selection(&mut self) {
        if self.select_end < self.select_start {
            std::mem::swap(&mut self.select_start, &mut self.select_end);
        }
    }

    fn move_to_first(&mut self) {
        if self.has_selection() {
            self.sort_selection();
            self.cursor = self.select_start;
            self.select_end = self.select_start;
            self.has_preferred_x = false;
        }
    }

    fn move_to_last(&mut self) {
        if self.has_selection() {
            self.sort_selection();
            self.clamp();
            self.cursor = self.select_end;
            self.select_start = self.select_end;
            self.has_preferred_x = false;
        }
    }

    fn prep_selection_at_cursor(&mut self) {
        if !self.has_selection() {
            self.select_start = self.cursor;
            self.select_end = self.cursor;
        } else {
            self.cursor = self.select_end;
        }
    }

    fn is_word_boundary(&self, idx: usize) -> bool {
        if idx == 0 {
            return true;
        }
        match self.char_at(idx) {
            Some(c) => is_word_boundary_char(c),
            None => true,
        }
    }

    fn move_to_word_previous(&self) -> usize {
        let mut c = self.cursor as isize - 1;
        while c >= 0 && !self.is_word_boundary(c as usize) {
            c -= 1;
        }
        c.max(0) as usize
    }

    fn move_to_word_next(&self) -> usize {
        let len = self.glyphs;
        let mut c = self.cursor + 1;
        while c < len && !self.is_word_boundary(c) {
            c += 1;
        }
        c.min(len)
    }

    /// Deletes `len` code points at `at`, recording history.
    pub fn delete(&mut self, at: usize, len: usize) {
        let len = len.min(self.glyphs.saturating_sub(at));
        if len == 0 {
            return;
        }
        self.make_undo_delete(at, len);
        self.remove_raw(at, len);
        self.has_preferred_x = false;
    }

    /// Deletes the selected text.
    pub fn delete_selection(&mut self) {
        self.clamp();
        if self.has_selection() {
            let (a, b) = self.sorted_selection();
            self.delete(a, b - a);
            self.select_start = a;
            self.select_end = a;
            self.cursor = a;
            self.has_preferred_x = false;
        }
    }

    /// Selects the whole text.
    pub fn select_all(&mut self) {
        self.select_start = 0;
        self.select_end = self.glyphs;
        self.has_preferred_x = false;
    }

    /// Puts back a cursor and selection saved from an earlier frame.
    pub(crate) fn restore(&mut self, cursor: usize, select_start: usize, select_end: usize) {
        self.cursor = cursor;
        self.select_start = select_start;
        self.select_end = select_end;
        self.clamp();
    }

    /// Selects the word under `x`, `y`.
    pub(crate) fn select_word_at(&mut self, x: f32, y: f32, font: &dyn Font, row_height: f32) {
        self.click(x, y, font, row_height);
        let mut start = self.cursor;
        while start > 0 && !self.char_at(start - 1).is_some_and(is_word_boundary_char) {
            start -= 1;
        }
        let mut end = self.cursor;
        while end < self.glyphs && !self.char_at(end).is_some_and(is_word_boundary_char) {
            end += 1;
        }
        self.select_start = start;
        self.select_end = end;
        self.cursor = end;
    }

    fn make_undo_delete(&mut self, at: usize, len: usize) {
        let restore = self.restore_point();
        if let Some(s) = self.undo.create(at, len, 0, restore) {
            let removed: Vec<char> = self.slice(at, len).chars().collect();
            self.undo.chars[s..s + removed.len()].copy_from_slice(&removed);
        }
    }

    fn make_undo_insert(&mut self, at: usize, len: usize, restore: (usize, usize, usize)) { self.undo.create(at, 0, len, restore); }

    fn make_undo_replace(&mut self, at: usize, old_len: usize, new_len: usize, restore: (usize, usize, usize)) {
        if let Some(s) = self.undo.create(at, old_len, new_len, restore) {
            let removed: Vec<char> = self.slice(at, old_len).chars().collect();
            self.undo.chars[s..s + removed.len()].copy_from_slice(&removed);
        }
    }

    /// Replaces the selection with `text`, or inserts it at the cursor. Returns `false` and leaves
    /// the editor untouched when the text does not fit.
    pub fn paste(&mut self, text: &str) -> bool {
        self.clamp();
        let n = text.chars().count();
        let (a, b) = self.sorted_selection();
        if self.max_len.is_some_and(|max| self.glyphs - (b - a) + n > max) {
            return false;
        }
        let restore = self.restore_point();
        self.delete_selection();
        if !self.insert_raw(self.cursor, text) {
            return false;
        }
        self.make_undo_insert(self.cursor, n, restore);
        self.cursor += n;
        self.has_preferred_x = false;
        true
    }

    /// Deletes the selection. Returns `true` if something was removed.
    pub fn cut(&mut self) -> bool {
        if self.mode == TextEditMode::View {
            return false;
        }
        if self.has_selection() {
            self.delete_selection();
            self.has_preferred_x = false;
            return true;
        }
        false
    }

    /// Applies typed text according to the edit mode, the filter and the line type.
    pub fn text(&mut self, input: &str) {
        if self.mode == TextEditMode::View {
            return;
        }
        let mut buf = [0u8; 4];
        for ch in input.chars() {
            if ch == '\u{7f}' || (ch == '\n' && self.single_line) {
                continue;
            }
            if let Some(filter) = self.filter
                && !filter(self, ch)
            {
                continue;
            }
            let s: &str = ch.encode_utf8(&mut buf);
            if !self.has_selection() && self.cursor < self.glyphs && self.mode == TextEditMode::Replace {
                let restore = self.restore_point();
                self.make_undo_replace(self.cursor, 1, 1, restore);
                self.remove_raw(self.cursor, 1);
                if self.insert_raw(self.cursor, s) {
                    self.cursor += 1;
                    self.has_preferred_x = false;
                }
            } else if self.has_selection() {
                // one record covers the removed selection and the typed character
                self.clamp();
                let restore = self.restore_point();
                let (a, b) = self.sorted_selection();
                if self.max_len.is_some_and(|max| self.glyphs - (b - a) + 1 > max) {
                    continue;
                }
                self.make_undo_replace(a, b - a, 1, restore);
                self.remove_raw(a, b - a);
                self.insert_raw(a, s);
                self.select_start = a;
                self.select_end = a;
                self.cursor = a + 1;
                self.has_preferred_x = false;
            } else {
                let restore = self.restore_point();
                if self.insert_raw(self.cursor, s) {
                    self.make_undo_insert(self.cursor, 1, restore);
                    self.cursor += 1;
                    self.has_preferred_x = false;
                }
            }
        }
    }

    /// Reverts the most recent edit, restoring text, cursor and selection.
    pub fn undo(&mut self) {
        if self.undo.undo_point == 0 {
            return;
        }
        let u = self.undo.records[self.undo.undo_point - 1];
        let mut r = UndoRecord {
            at: u.at,
            insert_length: u.delete_length,
            delete_length: u.insert_length,
            char_storage: None,
            cursor: self.cursor,
            select_start: self.select_start,
            select_end: self.select_end,
        };

        if u.delete_length > 0 {
            if self.undo.undo_char_point + u.delete_length >= UNDO_CHAR_COUNT {
                // no room to keep the redo text: the redo becomes a no-op insert
                r.insert_length = 0;
            } else {
                while self.undo.undo_char_point + u.delete_length > self.undo.redo_char_point {
                    if self.undo.redo_point == UNDO_STATE_COUNT {
                        return;
                    }
                    self.undo.discard_redo();
                }
                let s = self.undo.redo_char_point - u.delete_length;
                self.undo.redo_char_point = s;
                r.char_storage = Some(s);
                let removed: Vec<char> = self.slice(u.at, u.delete_length).chars().collect();
                self.undo.chars[s..s + removed.len()].copy_from_slice(&removed);
            }
            self.remove_raw(u.at, u.delete_length);
        }

        if u.insert_length > 0 {
            if let Some(s) = u.char_storage {
                let text: String = self.undo.chars[s..s + u.insert_length].iter().collect();
                self.insert_raw(u.at, &text);
            }
            self.undo.undo_char_point -= u.insert_length;
        }

        self.undo.records[self.undo.redo_point - 1] = r;
        self.undo.undo_point -= 1;
        self.undo.redo_point -= 1;

        self.cursor = u.cursor;
        self.select_start = u.select_start;
        self.select_end = u.select_end;
        self.clamp();
        self.has_preferred_x = false;
    }

    /// Re-applies the most recently undone edit.
    pub fn redo(&mut self) {
        if self.undo.redo_point == UNDO_STATE_COUNT {
            return;
        }
        let r = self.undo.records[self.undo.redo_point];
        let mut u = UndoRecord {
            at: r.at,
            insert_length: r.delete_length,
            delete_length: r.insert_length,
            char_storage: None,
            cursor: self.cursor,
            select_start: self.select_start,
            select_end: self.select_end,
        };

        if r.delete_length > 0 {
            if self.undo.undo_char_point + u.insert_length > self.undo.redo_char_point {
                u.insert_length = 0;
                u.delete_length = 0;
            } else {
                let s = self.undo.undo_char_point;
                u.char_storage = Some(s);
                self.undo.undo_char_point += u.insert_length;
                let removed: Vec<char> = self.slice(r.at, r.delete_length).chars().collect();
                self.undo.chars[s..s + removed.len()].copy_from_slice(&removed);
            }
            self.remove_raw(r.at, r.delete_length);
        }

        if r.insert_length > 0 {
            if let Some(s) = r.char_storage {
                let text: String = self.undo.chars[s..s + r.insert_length].iter().collect();
                self.insert_raw(r.at, &text);
            }
            self.undo.redo_char_point += r.insert_length;
        }

        self.undo.records[self.undo.undo_point] = u;
        self.undo.undo_point += 1;
        self.undo.redo_point += 1;

        self.cursor = r.cursor;
        self.select_start = r.select_start;
        self.select_end = r.select_end;
        self.clamp();
        self.has_preferred_x = false;
    }

    fn char_width(&self, font: &dyn Font, height: f32, line_start: usize, i: usize) -> f32 {
        let mut buf = [0u8; 4];
        match self.char_at(line_start + i) {
            Some(c) => font.text_width(height, c.encode_utf8(&mut buf)),
            None => 0.0,
        }
    }

    fn layout_row(&self, start: usize, row_height: f32, font: &dyn Font) -> TextRow {
        let height = font.height();
        let mut width: f32 = 0.0;
        let mut num_chars = 0;
        let mut buf = [0u8; 4];
        for c in self.string.chars().skip(start) {
            num_chars += 1;
            if c == '\n' {
                break;
            }
            if c == '\r' {
                continue;
            }
            width += font.text_width(height, c.encode_utf8(&mut buf));
        }
        TextRow { x0: 0.0, x1: width, baseline_y_delta: row_height, ymin: 0.0, ymax: row_height, num_chars }
    }

    fn find_charpos(&self, n: usize, font: &dyn Font, row_height: f32) -> TextFind {
        let z = self.glyphs;
        let mut find = TextFind::default();
        let mut i = 0;
        let mut prev_start = 0;
        if n == z {
            if self.single_line {
                let r = self.layout_row(0, row_height, font);
                find.first_char = 0;
                find.length = z;
                find.x = r.x1;
            } else {
                while i < z {
                    let r = self.layout_row(i, row_height, font);
                    prev_start = i;
                    i += r.num_chars;
                }
                find.first_char = i;
                find.length = 0;
                find.prev_first = prev_start;
            }
            return find;
        }

        let mut r;
        loop {
            r = self.layout_row(i, row_height, font);
            if n < i + r.num_chars || r.num_chars == 0 {
                break;
            }
            prev_start = i;
            i += r.num_chars;
        }
        find.first_char = i;
        find.length = r.num_chars;
        find.prev_first = prev_start;
        find.x = r.x0;
        let height = font.height();
        for k in 0..n.saturating_sub(i) {
            find.x += self.char_width(font, height, i, k);
        }
        find
    }

    fn locate_coord(&self, x: f32, y: f32, font: &dyn Font, row_height: f32) -> usize {
        let n = self.glyphs;
        let height = font.height();
        let mut base_y = 0.0;
        let mut i = 0;
        let mut r = TextRow::default();
        while i < n {
            r = self.layout_row(i, row_height, font);
            if r.num_chars == 0 {
                return n;
            }
            if i == 0 && y < base_y + r.ymin {
                return 0;
            }
            if y < base_y + r.ymax {
                break;
            }
            i += r.num_chars;
            base_y += r.baseline_y_delta;
        }
        if i >= n {
            return n;
        }
        if x < r.x0 {
            return i;
        }
        if x < r.x1 {
            let mut prev_x = r.x0;
            for k in 0..r.num_chars {
                let w = self.char_width(font, height, i, k);
                if x < prev_x + w {
                    return if x < prev_x + w / 2.0 { k + i } else { k + i + 1 };
                }
                prev_x += w;
            }
        }
        if self.char_at(i + r.num_chars - 1) == Some('\n') {
            i + r.num_chars - 1
        } else {
            i + r.num_chars
        }
    }

    /// Places the cursor at the character nearest to `x`, `y` (relative to the text origin).
    pub fn click(&mut self, x: f32, y: f32, font: &dyn Font, row_height: f32) {
        self.cursor = self.locate_coord(x, y, font, row_height);
        self.select_start = self.cursor;
        self.select_end = self.cursor;
        self.has_preferred_x = false;
    }

    /// Extends the selection to the character nearest to `x`, `y`.
    pub fn drag(&mut self, x: f32, y: f32, font: &dyn Font, row_height: f32) {
        let p = self.locate_coord(x, y, font, row_height);
        if self.select_start == self.select_end {
            self.select_start = self.cursor;
        }
        self.cursor = p;
        self.select_end = p;
    }

    fn vertical_move(&mut self, start: usize, goal_x: f32, font: &dyn Font, row_height: f32) {
        let height = font.height();
        self.cursor = start;
        let row = self.layout_row(start, row_height, font);
        let mut x = row.x0;
        let mut i = 0;
        while i < row.num_chars && x < row.x1 {
            x += self.char_width(font, height, start, i);
            if x > goal_x {
                break;
            }
            self.cursor += 1;
            i += 1;
        }
        self.clamp();
        self.has_preferred_x = true;
        self.preferred_x = goal_x;
    }

    /// Applies a navigation or editing key.
    pub fn key(&mut self, key: Key, shift: bool, font: &dyn Font, row_height: f32) {
        let key = match key {
            Key::Down if self.single_line => Key::Right,
            Key::Up if self.single_line => Key::Left,
            k => k,
        };
        match key {
            Key::TextUndo => {
                self.undo();
                self.has_preferred_x = false;
            }
            Key::TextRedo => {
                self.redo();
                self.has_preferred_x = false;
            }
            Key::TextSelectAll => self.select_all(),
            Key::TextInsertMode => {
                if self.mode == TextEditMode::View {
                    self.mode = TextEditMode::Insert;
                }
            }
            Key::TextReplaceMode => {
                if self.mode == TextEditMode::View {
                    self.mode = TextEditMode::Replace;
                }
            }
            Key::TextResetMode => {
                if self.mode != TextEditMode::View {
                    self.mode = TextEditMode::View;
                }
            }
            Key::Left => {
                if shift {
                    self.clamp();
                    self.prep_selection_at_cursor();
                    if self.select_end > 0 {
                        self.select_end -= 1;
                    }
                    self.cursor = self.select_end;
                } else if self.has_selection() {
                    self.move_to_first();
                } else if self.cursor > 0 {
                    self.cursor -= 1;
                }
                self.has_preferred_x = false;
            }
            Key::Right => {
                if shift {
                    self.prep_selection_at_cursor();
                    self.select_end += 1;
                    self.clamp();
                    self.cursor = self.select_end;
                } else {
                    if self.has_selection() {
                        self.move_to_last();
                    } else {
                        self.cursor += 1;
                    }
                    self.clamp();
                }
                self.has_preferred_x = false;
            }
            Key::TextWordLeft => {
                if shift {
                    if !self.has_selection() {
                        self.prep_selection_at_cursor();
                    }
                    self.cursor = self.move_to_word_previous();
                    self.select_end = self.cursor;
                    self.clamp();
                } else if self.has_selection() {
                    self.move_to_first();
                } else {
                    self.cursor = self.move_to_word_previous();
                    self.clamp();
                }
            }
            Key::TextWordRight => {
                if shift {
                    if !self.has_selection() {
                        self.prep_selection_at_cursor();
                    }
                    self.cursor = self.move_to_word_next();
                    self.select_end = self.cursor;
                    self.clamp();
                } else if self.has_selection() {
                    self.move_to_last();
                } else {
                    self.cursor = self.move_to_word_next();
                    self.clamp();
                }
            }
            Key::Down => {
                if shift {
                    self.prep_selection_at_cursor();
                } else if self.has_selection() {
                    self.move_to_last();
                }
                self.clamp();
                let find = self.find_charpos(self.cursor, font, row_height);
                if find.length > 0 {
                    let goal_x = if self.has_preferred_x { self.preferred_x } else { find.x };
                    self.vertical_move(find.first_char + find.length, goal_x, font, row_height);
                    if shift {
                        self.select_end = self.cursor;
                    }
                }
            }
            Key::Up => {
                if shift {
                    self.prep_selection_at_cursor();
                } else if self.has_selection() {
                    self.move_to_first();
                }
                self.clamp();
                let find = self.find_charpos(self.cursor, font, row_height);
                if find.prev_first != find.first_char {
                    let goal_x = if self.has_preferred_x { self.preferred_x } else { find.x };
                    self.vertical_move(find.prev_first, goal_x, font, row_height);
                    if shift {
                        self.select_end = self.cursor;
                    }
                }
            }
            Key::Del => {
                if self.mode == TextEditMode::View {
                    return;
                }
                if self.has_selection() {
                    self.delete_selection();
                } else if self.cursor < self.glyphs {
                    self.delete(self.cursor, 1);
                }
                self.has_preferred_x = false;
            }
            Key::Backspace => {
                if self.mode == TextEditMode::View {
                    return;
                }
                if self.has_selection() {
                    self.delete_selection();
                } else {
                    self.clamp();
                    if self.cursor > 0 {
                        self.delete(self.cursor - 1, 1);
                        self.cursor -= 1;
                    }
                }
                self.has_preferred_x = false;
            }
            Key::TextStart => {
                if shift {
                    self.prep_selection_at_cursor();
                    self.cursor = 0;
                    self.select_end = 0;
                } else {
                    self.cursor = 0;
                    self.select_start = 0;
                    self.select_end = 0;
                }
                self.has_preferred_x = false;
            }
            Key::TextEnd => {
                if shift {
                    self.prep_selection_at_cursor();
                    self.cursor = self.glyphs;
                    self.select_end = self.glyphs;
                } else {
                    self.cursor = self.glyphs;
                    self.select_start = 0;
                    self.select_end = 0;
                }
                self.has_preferred_x = false;
            }
            Key::TextLineStart => {
                if shift {
                    self.clamp();
                    self.prep_selection_at_cursor();
                    if self.glyphs > 0 && self.cursor == self.glyphs {
                        self.cursor -= 1;
                    }
                    let find = self.find_charpos(self.cursor, font, row_height);
                    self.cursor = find.first_char;
                    self.select_end = find.first_char;
                } else {
                    if self.glyphs > 0 && self.cursor == self.glyphs {
                        self.cursor -= 1;
                    }
                    self.clamp();
                    self.move_to_first();
                    let find = self.find_charpos(self.cursor, font, row_height);
                    self.cursor = find.first_char;
                }
                self.has_preferred_x = false;
            }
            Key::TextLineEnd => {
                self.clamp();
                if shift {
                    self.prep_selection_at_cursor();
                } else {
                    self.move_to_first();
                }
                let find = self.find_charpos(self.cursor, font, row_height);
                self.has_preferred_x = false;
                self.cursor = find.first_char + find.length;
                if find.length > 0 && self.char_at(self.cursor - 1) == Some('\n') {
                    self.cursor -= 1;
                }
                if shift {
                    self.select_end = self.cursor;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_font::TestFont;

    fn editor(text: &str) -> TextEdit {
        let mut e = TextEdit::with_text(text);
        e.mode = TextEditMode::Insert;
        e
    }

    #[test]
    fn typing_replaces_selection_and_undo_restores_it() {
        let mut e = editor("hello");
        e.select(1, 4);
        e.text("X");
        assert_eq!(e.as_str(), "hXo");
        assert_eq!(e.cursor(), 2);

        e.undo();
        assert_eq!(e.as_str(), "hello");
        assert_eq!(e.selection(), (1, 4));
        assert_eq!(e.cursor(), 4);

        e.redo();
        assert_eq!(e.as_str(), "hXo");
        assert_eq!(e.cursor(), 2);
    }

    #[test]
    fn undo_and_redo_are_inverse() {
        let mut e = editor("");
        e.text("abc");
        e.key(Key::Backspace, false, &TestFont, 10.0);
        e.paste("xyz");
        let states = ["abxyz", "ab", "abc", "ab", "a", ""];
        for expected in states.iter().skip(1) {
            e.undo();
            assert_eq!(e.as_str(), *expected);
        }
        for expected in states.iter().rev().skip(1) {
            e.redo();
            assert_eq!(e.as_str(), *expected);
        }
        assert_eq!(e.cursor(), 5);
    }

    #[test]
    fn view_mode_ignores_text_and_single_line_skips_newlines() {
        let mut e = TextEdit::with_text("ab");
        e.text("c");
        assert_eq!(e.as_str(), "ab");
        e.mode = TextEditMode::Insert;
        e.set_cursor(2);
        e.text("c\nd\u{7f}");
        assert_eq!(e.as_str(), "abcd");
    }

    #[test]
    fn replace_mode_overwrites() {
        let mut e = editor("abc");
        e.mode = TextEditMode::Replace;
        e.set_cursor(1);
        e.text("XY");
        assert_eq!(e.as_str(), "aXY");
        e.undo();
        assert_eq!(e.as_str(), "aXc");
    }

    #[test]
    fn filter_rejects_characters() {
        let mut e = editor("");
        e.set_filter(Some(filter_decimal));
        e.text("1a-2.");
        assert_eq!(e.as_str(), "1-2");
    }

    #[test]
    fn fixed_capacity_rejects_overflow() {
        let mut e = TextEdit::fixed(3);
        e.mode = TextEditMode::Insert;
        e.text("abcd");
        assert_eq!(e.as_str(), "abc");
        assert!(!e.paste("z"));
        e.undo();
        assert_eq!(e.as_str(), "ab");
    }

    #[test]
    fn word_navigation_stops_at_separators() {
        let mut e = editor("foo bar,baz");
        e.set_cursor(0);
        e.key(Key::TextWordRight, false, &TestFont, 10.0);
        assert_eq!(e.cursor(), 3);
        e.key(Key::TextWordRight, false, &TestFont, 10.0);
        assert_eq!(e.cursor(), 7);
        e.key(Key::TextWordLeft, true, &TestFont, 10.0);
        assert_eq!(e.selection(), (7, 3));
        assert_eq!(e.selected_text(), " bar");
    }

    #[test]
    fn multi_line_navigation_keeps_column() {
        let mut e = editor("abcd\nef\nghij");
        e.single_line = false;
        e.set_cursor(3);
        e.key(Key::Down, false, &TestFont, 10.0);
        assert_eq!(e.cursor(), 7);
        e.key(Key::Down, false, &TestFont, 10.0);
        assert_eq!(e.cursor(), 11);
        e.key(Key::TextLineStart, false, &TestFont, 10.0);
        assert_eq!(e.cursor(), 8);
        e.key(Key::Up, false, &TestFont, 10.0);
        assert_eq!(e.cursor(), 5);
    }

    #[test]
    fn click_locates_nearest_character() {
        let mut e = editor("abcd\nef");
        e.single_line = false;
        e.click(13.0, 2.0, &TestFont, 10.0);
        assert_eq!(e.cursor(), 2);
        e.drag(100.0, 12.0, &TestFont, 10.0);
        assert_eq!(e.selection(), (2, 7));
        e.click(1.0, 12.0, &TestFont, 10.0);
        assert_eq!(e.cursor(), 5);
    }

    #[test]
    fn history_overflow_discards_oldest() {
        let mut e = editor("");
        for _ in 0..UNDO_STATE_COUNT + 10 {
            e.text("a");
        }
        for _ in 0..UNDO_STATE_COUNT + 10 {
            e.undo();
        }
        assert_eq!(e.len(), 10);
    }
}
