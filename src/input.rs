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
//! Per frame input snapshot fed by the host.

use crate::utf8::{utf8_decode, utf8_encode, UTF_SIZE};
use crate::*;

/// Bytes of typed text accepted per frame.
pub const INPUT_MAX: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
/// Logical keys understood by the widgets.
pub enum Key {
    /// No key.
    None,
    /// Shift modifier.
    Shift,
    /// Control modifier.
    Ctrl,
    /// Delete forward.
    Del,
    /// Enter or return.
    Enter,
    /// Tab.
    Tab,
    /// Delete backward.
    Backspace,
    /// Copy selection.
    Copy,
    /// Cut selection.
    Cut,
    /// Paste clipboard.
    Paste,
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Switch the editor to insert mode.
    TextInsertMode,
    /// Switch the editor to replace mode.
    TextReplaceMode,
    /// Switch the editor back to view mode.
    TextResetMode,
    /// Start of the line.
    TextLineStart,
    /// End of the line.
    TextLineEnd,
    /// Start of the text.
    TextStart,
    /// End of the text.
    TextEnd,
    /// Undo.
    TextUndo,
    /// Redo.
    TextRedo,
    /// Select all.
    TextSelectAll,
    /// Previous word.
    TextWordLeft,
    /// Next word.
    TextWordRight,
    /// Scroll to the start.
    ScrollStart,
    /// Scroll to the end.
    ScrollEnd,
    /// Scroll one page down.
    ScrollDown,
    /// Scroll one page up.
    ScrollUp,
}

/// Number of [`Key`] variants.
pub const KEY_COUNT: usize = Key::ScrollUp as usize + 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
/// Mouse buttons tracked by the snapshot.
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Middle button.
    Middle,
    /// Secondary button.
    Right,
    /// Host detected double click.
    Double,
}

/// Number of [`MouseButton`] variants.
pub const BUTTON_COUNT: usize = 4;

#[derive(Copy, Clone, Debug, Default)]
/// State of one mouse button.
pub struct ButtonState {
    /// Held this frame.
    pub down: bool,
    /// Transitions recorded this frame.
    pub clicked: u32,
    /// Position of the last transition.
    pub clicked_pos: Vec2,
    /// Position of the last press.
    pub down_pos: Vec2,
}

#[derive(Copy, Clone, Debug, Default)]
/// Mouse part of the snapshot.
pub struct Mouse {
    /// Button states indexed by [`MouseButton`].
    pub buttons: [ButtonState; BUTTON_COUNT],
    /// Current position.
    pub pos: Vec2,
    /// Position at the start of the frame.
    pub prev: Vec2,
    /// Motion since the start of the frame.
    pub delta: Vec2,
    /// Accumulated wheel motion.
    pub scroll_delta: Vec2,
    pub(crate) grab: bool,
    pub(crate) grabbed: bool,
    pub(crate) ungrab: bool,
}

#[derive(Copy, Clone, Debug, Default)]
/// State of one key.
pub struct KeyState {
    /// Held this frame.
    pub down: bool,
    /// Transitions recorded this frame.
    pub clicked: u32,
}

#[derive(Copy, Clone, Debug)]
/// Keyboard part of the snapshot.
pub struct Keyboard {
    /// Key states indexed by [`Key`].
    pub keys: [KeyState; KEY_COUNT],
    text: [u8; INPUT_MAX],
    text_len: usize,
}

impl Default for Keyboard {
    fn default() -> Self { Self { keys: [KeyState::default(); KEY_COUNT], text: [0; INPUT_MAX], text_len: 0 } }
}

impl Keyboard {
    /// UTF-8 text typed this frame.
    pub fn text(&self) -> &str { std::str::from_utf8(&self.text[..self.text_len]).unwrap_or("") }

    pub(crate) fn clear_text(&mut self) { self.text_len = 0; }
}

#[derive(Copy, Clone, Debug, Default)]
/// Double buffered input snapshot.
pub struct Input {
    /// Mouse state.
    pub mouse: Mouse,
    /// Keyboard state.
    pub keyboard: Keyboard,
}

impl Input {
    /// Starts a frame: clears click counters, text and wheel motion.
    pub fn begin(&mut self) {
        for b in self.mouse.buttons.iter_mut() {
            b.clicked = 0;
        }
        self.keyboard.text_len = 0;
        self.mouse.scroll_delta = Vec2::default();
        self.mouse.prev = self.mouse.pos;
        self.mouse.delta = Vec2::default();
        for k in self.keyboard.keys.iter_mut() {
            k.clicked = 0;
        }
    }

    /// Ends a frame.
    pub fn end(&mut self) {
        if self.mouse.grab {
            self.mouse.grab = false;
        }
        if self.mouse.ungrab {
            self.mouse.grabbed = false;
            self.mouse.ungrab = false;
            self.mouse.grab = false;
        }
    }

    /// Records a mouse move.
    pub fn motion(&mut self, x: f32, y: f32) {
        self.mouse.pos = vec2(x, y);
        self.mouse.delta = self.mouse.pos - self.mouse.prev;
    }

    /// Records a key transition.
    pub fn key(&mut self, key: Key, down: bool) {
        let k = &mut self.keyboard.keys[key as usize];
        if k.down == down {
            return;
        }
        k.down = down;
        k.clicked += 1;
    }

    /// Records a mouse button transition at `x`, `y`.
    pub fn button(&mut self, id: MouseButton, x: f32, y: f32, down: bool) {
        let b = &mut self.mouse.buttons[id as usize];
        if b.down == down {
            return;
        }
        b.clicked_pos = vec2(x, y);
        if down {
            b.down_pos = b.clicked_pos;
        }
        b.down = down;
        b.clicked += 1;
        self.mouse.delta = Vec2::default();
    }

    /// Accumulates wheel motion.
    pub fn scroll(&mut self, delta: Vec2) { self.mouse.scroll_delta = self.mouse.scroll_delta + delta; }

    /// Queues one UTF-8 encoded glyph. Invalid or overflowing glyphs are dropped.
    pub fn glyph(&mut self, glyph: &[u8]) {
        let (unicode, len) = utf8_decode(glyph);
        if len == 0 || self.keyboard.text_len + len >= INPUT_MAX {
            return;
        }
        let at = self.keyboard.text_len;
        let written = utf8_encode(unicode, &mut self.keyboard.text[at..]);
        self.keyboard.text_len += written;
    }

    /// Queues a single byte character.
    pub fn char(&mut self, c: u8) { self.glyph(&[c]); }

    /// Queues a code point.
    pub fn unicode(&mut self, c: char) {
        let mut buf = [0u8; UTF_SIZE];
        let n = utf8_encode(c as u32, &mut buf);
        self.glyph(&buf[..n]);
    }

    fn btn(&self, id: MouseButton) -> &ButtonState { &self.mouse.buttons[id as usize] }

    /// A transition happened this frame and the button is now up.
    pub fn has_mouse_click(&self, id: MouseButton) -> bool {
        let b = self.btn(id);
        b.clicked > 0 && !b.down
    }

    /// The last transition of `id` happened inside `r`.
    pub fn has_mouse_click_in_rect(&self, id: MouseButton, r: Rect) -> bool { r.contains(self.btn(id).clicked_pos) }

    /// The last press of `id` happened inside `r`.
    pub fn has_mouse_press_in_rect(&self, id: MouseButton, r: Rect) -> bool { r.contains(self.btn(id).down_pos) }

    /// The last transition happened inside `r` and left the button in state `down`.
    pub fn has_mouse_click_down_in_rect(&self, id: MouseButton, r: Rect, down: bool) -> bool {
        self.has_mouse_click_in_rect(id, r) && self.btn(id).down == down
    }

    /// A transition of `id` happened inside `r` this frame.
    pub fn is_mouse_click_in_rect(&self, id: MouseButton, r: Rect) -> bool { self.btn(id).clicked > 0 && self.has_mouse_click_in_rect(id, r) }

    /// A transition to `down` happened inside `r` this frame.
    pub fn is_mouse_click_down_in_rect(&self, id: MouseButton, r: Rect, down: bool) -> bool {
        self.has_mouse_click_down_in_rect(id, r, down) && self.btn(id).clicked > 0
    }

    /// Any button was clicked inside `r` this frame.
    pub fn any_mouse_click_in_rect(&self, r: Rect) -> bool {
        [MouseButton::Left, MouseButton::Middle, MouseButton::Right].iter().any(|b| self.is_mouse_click_in_rect(*b, r))
    }

    /// The pointer is inside `r`.
    pub fn is_mouse_hovering_rect(&self, r: Rect) -> bool { r.contains(self.mouse.pos) }

    /// The pointer was inside `r` at the start of the frame.
    pub fn is_mouse_prev_hovering_rect(&self, r: Rect) -> bool { r.contains(self.mouse.prev) }

    /// The pointer is inside `r` and `id` was clicked inside it this frame.
    pub fn mouse_clicked(&self, id: MouseButton, r: Rect) -> bool { self.is_mouse_hovering_rect(r) && self.is_mouse_click_in_rect(id, r) }

    /// The button is held.
    pub fn is_mouse_down(&self, id: MouseButton) -> bool { self.btn(id).down }

    /// The button went down this frame.
    pub fn is_mouse_pressed(&self, id: MouseButton) -> bool {
        let b = self.btn(id);
        b.down && b.clicked > 0
    }

    /// The button went up this frame.
    pub fn is_mouse_released(&self, id: MouseButton) -> bool {
        let b = self.btn(id);
        !b.down && b.clicked > 0
    }

    /// The key went down this frame.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        let k = &self.keyboard.keys[key as usize];
        (k.down && k.clicked > 0) || (!k.down && k.clicked >= 2)
    }

    /// The key went up this frame.
    pub fn is_key_released(&self, key: Key) -> bool {
        let k = &self.keyboard.keys[key as usize];
        (!k.down && k.clicked > 0) || (k.down && k.clicked >= 2)
    }

    /// The key is held.
    pub fn is_key_down(&self, key: Key) -> bool { self.keyboard.keys[key as usize].down }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_resets_per_frame_state() {
        let mut input = Input::default();
        input.begin();
        input.motion(10.0, 20.0);
        input.button(MouseButton::Left, 10.0, 20.0, true);
        input.scroll(vec2(0.0, -1.0));
        input.key(Key::Enter, true);
        input.end();
        assert!(input.is_mouse_pressed(MouseButton::Left));
        assert!(input.is_key_pressed(Key::Enter));
        assert_eq!(input.mouse.scroll_delta.y, -1.0);

        input.begin();
        input.motion(15.0, 20.0);
        input.end();
        assert!(!input.is_mouse_pressed(MouseButton::Left));
        assert!(input.is_mouse_down(MouseButton::Left));
        assert_eq!(input.mouse.delta, vec2(5.0, 0.0));
        assert_eq!(input.mouse.scroll_delta.y, 0.0);
        assert!(input.is_key_down(Key::Enter) && !input.is_key_pressed(Key::Enter));
    }

    #[test]
    fn click_tracks_position() {
        let mut input = Input::default();
        input.begin();
        input.button(MouseButton::Left, 5.0, 5.0, true);
        input.button(MouseButton::Left, 50.0, 50.0, false);
        assert!(input.is_mouse_click_in_rect(MouseButton::Left, rect(40.0, 40.0, 20.0, 20.0)));
        assert!(input.has_mouse_click(MouseButton::Left));
        assert!(input.has_mouse_press_in_rect(MouseButton::Left, rect(0.0, 0.0, 10.0, 10.0)));
        // repeated state is ignored
        input.button(MouseButton::Left, 0.0, 0.0, false);
        assert_eq!(input.mouse.buttons[0].clicked, 2);
    }

    #[test]
    fn text_queue_is_bounded() {
        let mut input = Input::default();
        input.begin();
        for _ in 0..20 {
            input.char(b'a');
        }
        assert_eq!(input.keyboard.text().len(), INPUT_MAX - 1);
        input.begin();
        input.unicode('€');
        input.glyph(&[0xE2, 0x82]);
        assert_eq!(input.keyboard.text(), "€");
    }
}
