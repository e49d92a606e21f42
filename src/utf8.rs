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
//! UTF-8 decoding and encoding for raw input bytes.

/// Code point returned for malformed input.
pub const UTF_INVALID: u32 = 0xFFFD;
/// Maximum encoded length of one code point.
pub const UTF_SIZE: usize = 4;

const UTF_BYTE: [u8; UTF_SIZE + 1] = [0x80, 0, 0xC0, 0xE0, 0xF0];
const UTF_MASK: [u8; UTF_SIZE + 1] = [0xC0, 0x80, 0xE0, 0xF0, 0xF8];
const UTF_MIN: [u32; UTF_SIZE + 1] = [0, 0, 0x80, 0x800, 0x10000];
const UTF_MAX: [u32; UTF_SIZE + 1] = [0x10FFFF, 0x7F, 0x7FF, 0xFFFF, 0x10FFFF];

// Returns the payload bits and the class index (0 = continuation, 1..=4 = lead byte length).
fn decode_byte(c: u8) -> (u32, usize) {
    for i in 0..UTF_MASK.len() {
        if c & UTF_MASK[i] == UTF_BYTE[i] {
            return ((c & !UTF_MASK[i]) as u32, i);
        }
    }
    (0, UTF_MASK.len())
}

// Replaces out of range, overlong and surrogate code points; returns the encoded length.
fn validate(u: &mut u32, class: usize) -> usize {
    if *u < UTF_MIN[class] || *u > UTF_MAX[class] || (0xD800..=0xDFFF).contains(u) {
        *u = UTF_INVALID;
    }
    let mut i = 1;
    while i < UTF_SIZE && *u > UTF_MAX[i] {
        i += 1;
    }
    i
}

/// Decodes the first code point of `bytes`.
///
/// Returns the code point and the number of bytes consumed. An empty or truncated input consumes
/// nothing; a bad lead byte consumes one byte and a bad continuation byte stops in front of it. In
/// both cases the code point is [`UTF_INVALID`].
pub fn utf8_decode(bytes: &[u8]) -> (u32, usize) {
    if bytes.is_empty() {
        return (UTF_INVALID, 0);
    }
    let (mut decoded, len) = decode_byte(bytes[0]);
    if !(1..=UTF_SIZE).contains(&len) {
        return (UTF_INVALID, 1);
    }

    let mut j = 1;
    while j < bytes.len() && j < len {
        let (bits, class) = decode_byte(bytes[j]);
        if class != 0 {
            return (UTF_INVALID, j);
        }
        decoded = (decoded << 6) | bits;
        j += 1;
    }
    if j < len {
        return (UTF_INVALID, 0);
    }
    validate(&mut decoded, len);
    (decoded, len)
}

/// Encodes `u` into `out`, returning the number of bytes written or 0 when `out` is too short.
pub fn utf8_encode(u: u32, out: &mut [u8]) -> usize {
    let mut u = u;
    let len = validate(&mut u, 0);
    if out.len() < len {
        return 0;
    }
    for i in (1..len).rev() {
        out[i] = UTF_BYTE[0] | (u as u8 & !UTF_MASK[0]);
        u >>= 6;
    }
    out[0] = UTF_BYTE[len] | (u as u8 & !UTF_MASK[len]);
    len
}

/// Number of code points in `bytes`, stopping at the first truncated sequence.
pub fn utf8_len(bytes: &[u8]) -> usize {
    let mut count = 0;
    let mut at = 0;
    while at < bytes.len() {
        let (_, n) = utf8_decode(&bytes[at..]);
        if n == 0 {
            break;
        }
        at += n;
        count += 1;
    }
    count
}

/// Converts a code point index of `s` into a byte offset, clamping to the end.
pub(crate) fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map(|(b, _)| b).unwrap_or(s.len())
}

/// Returns the code point at `index`.
pub(crate) fn char_at(s: &str, index: usize) -> Option<char> { s.chars().nth(index) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_lengths() {
        for &cp in &[0x41u32, 0xE9, 0x20AC, 0x3000, 0x1F600, 0x10FFFF] {
            let mut buf = [0u8; UTF_SIZE];
            let n = utf8_encode(cp, &mut buf);
            assert_eq!(n, char::from_u32(cp).map(|c| c.len_utf8()).unwrap_or(0));
            assert_eq!(&buf[..n], char::from_u32(cp).unwrap().to_string().as_bytes());
            assert_eq!(utf8_decode(&buf[..n]), (cp, n));
        }
    }

    #[test]
    fn truncated_sequence_consumes_nothing() {
        let euro = "€".as_bytes();
        assert_eq!(utf8_decode(&euro[..2]), (UTF_INVALID, 0));
        assert_eq!(utf8_decode(&[]), (UTF_INVALID, 0));
    }

    #[test]
    fn invalid_bytes_yield_sentinel() {
        // stray continuation byte
        assert_eq!(utf8_decode(&[0x80, 0x41]), (UTF_INVALID, 1));
        // lead byte followed by ASCII
        assert_eq!(utf8_decode(&[0xE2, 0x41, 0x41]), (UTF_INVALID, 1));
        // overlong encoding of '/'
        assert_eq!(utf8_decode(&[0xC0, 0xAF]).0, UTF_INVALID);
        // surrogate
        assert_eq!(utf8_decode(&[0xED, 0xA0, 0x80]).0, UTF_INVALID);
    }

    #[test]
    fn encode_rejects_short_output() {
        let mut buf = [0u8; 2];
        assert_eq!(utf8_encode(0x20AC, &mut buf), 0);
        assert_eq!(utf8_len("añ€😀".as_bytes()), 4);
    }
}
