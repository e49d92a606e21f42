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
use crate::TextEdit;

/// 32-bit identity hash of a window, widget or table key.
pub type Hash = u32;

/// Seed used for window titles.
pub(crate) const WINDOW_TITLE_SEED: Hash = 1 << 6;
/// Seed used for popup titles.
pub(crate) const POPUP_SEED: Hash = 4;
/// Seed used for group names.
pub(crate) const GROUP_SEED: Hash = 2;
/// Seed used for properties keyed by name.
pub(crate) const PROPERTY_SEED: Hash = 42;

/// 32-bit MurmurHash3 of `key`.
pub fn murmur_hash(key: &[u8], seed: Hash) -> Hash {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    let mut h1 = seed;
    let mut blocks = key.chunks_exact(4);
    for block in &mut blocks {
        let mut k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);

        h1 ^= k1;
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k1 = 0u32;
        for (i, b) in tail.iter().enumerate() {
            k1 ^= (*b as u32) << (8 * i);
        }
        k1 = k1.wrapping_mul(C1);
        k1 = k1.rotate_left(15);
        k1 = k1.wrapping_mul(C2);
        h1 ^= k1;
    }

    h1 ^= key.len() as u32;
    h1 ^= h1 >> 16;
    h1 = h1.wrapping_mul(0x85eb_ca6b);
    h1 ^= h1 >> 13;
    h1 = h1.wrapping_mul(0xc2b2_ae35);
    h1 ^= h1 >> 16;
    h1
}

pub(crate) fn hash_str(s: &str, seed: Hash) -> Hash { murmur_hash(s.as_bytes(), seed) }

/// Formats a float for numeric fields: two decimals, trailing zeros and a dangling point removed.
pub fn format_float(value: f64) -> String {
    let mut s = format!("{:.*}", crate::MAX_FLOAT_PRECISION, value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

/// Formats an integer for numeric fields.
pub fn format_int(value: i64) -> String { value.to_string() }

/// Parses the text of a numeric field, accepting an empty string as zero.
pub(crate) fn parse_f64(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    t.parse::<f64>().unwrap_or(0.0)
}

pub(crate) fn parse_i64(s: &str) -> i64 {
    let t = s.trim();
    match t.parse::<i64>() {
        Ok(v) => v,
        Err(_) => parse_f64(t) as i64,
    }
}

/// Character filter applied to text typed into an edit field.
pub type Filter = fn(&TextEdit, char) -> bool;

/// Accepts every character.
pub fn filter_default(_: &TextEdit, _: char) -> bool { true }

/// Accepts 7-bit ASCII.
pub fn filter_ascii(_: &TextEdit, c: char) -> bool { (c as u32) < 128 }

/// Accepts digits, `-` and `.`.
pub fn filter_float(_: &TextEdit, c: char) -> bool { c.is_ascii_digit() || c == '-' || c == '.' }

/// Accepts digits and `-`.
pub fn filter_decimal(_: &TextEdit, c: char) -> bool { c.is_ascii_digit() || c == '-' }

/// Accepts hexadecimal digits.
pub fn filter_hex(_: &TextEdit, c: char) -> bool { c.is_ascii_hexdigit() }

/// Accepts octal digits.
pub fn filter_oct(_: &TextEdit, c: char) -> bool { ('0'..='7').contains(&c) }

/// Accepts `0` and `1`.
pub fn filter_binary(_: &TextEdit, c: char) -> bool { c == '0' || c == '1' }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn murmur_matches_reference_vectors() {
        assert_eq!(murmur_hash(b"", 0), 0);
        assert_eq!(murmur_hash(b"", 1), 0x514e_28b7);
        assert_eq!(murmur_hash(b"test", 0), 0xba6b_d213);
    }

    #[test]
    fn seeds_separate_namespaces() {
        assert_ne!(hash_str("Demo", WINDOW_TITLE_SEED), hash_str("Demo", POPUP_SEED));
    }

    // Standard formatter rounds instead of truncating: 2/3 shows as 0.67, not 0.66.
    #[test]
    fn float_formatting_rounds_to_two_decimals() {
        assert_eq!(format_float(2.0 / 3.0), "0.67");
        assert_eq!(format_float(2.0), "2");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(-0.001), "0");
        assert_eq!(format_float(-12.25), "-12.25");
    }

    #[test]
    fn numeric_parsing_is_lenient() {
        assert_eq!(parse_f64(""), 0.0);
        assert_eq!(parse_f64("1.5"), 1.5);
        assert_eq!(parse_i64("12"), 12);
        assert_eq!(parse_i64("3.9"), 3);
        assert_eq!(format_int(-7), "-7");
    }
}
