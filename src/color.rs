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
use crate::Color;

#[derive(Default, Copy, Clone, Debug, PartialEq)]
/// RGBA color with float channels in `[0, 1]`.
pub struct Colorf {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

fn clamp01(v: f32) -> f32 { v.clamp(0.0, 1.0) }

impl Colorf {
    /// Creates a float color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self { Self { r, g, b, a } }

    /// Builds a color from hue, saturation, value and alpha, all in `[0, 1]`.
    pub fn from_hsva(h: f32, s: f32, v: f32, a: f32) -> Self {
        if s <= 0.0 {
            return Self::new(v, v, v, a);
        }
        let hh = h / (60.0 / 360.0);
        let i = hh as i32;
        let f = hh - i as f32;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match i {
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            5 => (v, p, q),
            _ => (v, t, p),
        };
        Self::new(r, g, b, a)
    }

    /// Converts to hue, saturation, value and alpha.
    pub fn to_hsva(&self) -> [f32; 4] {
        let (mut r, mut g, mut b) = (self.r, self.g, self.b);
        let mut k = 0.0;
        if g < b {
            std::mem::swap(&mut g, &mut b);
            k = -1.0;
        }
        if r < g {
            std::mem::swap(&mut r, &mut g);
            k = -2.0 / 6.0 - k;
        }
        let chroma = r - g.min(b);
        let h = (k + (g - b) / (6.0 * chroma + 1e-20)).abs();
        let s = chroma / (r + 1e-20);
        [h, s, r, self.a]
    }
}

impl Color {
    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b, a: 255 } }

    /// Creates a color with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self { Self { r, g, b, a } }

    /// Converts float channels, clamping to `[0, 1]`.
    pub fn from_colorf(c: Colorf) -> Self {
        Self {
            r: (clamp01(c.r) * 255.0) as u8,
            g: (clamp01(c.g) * 255.0) as u8,
            b: (clamp01(c.b) * 255.0) as u8,
            a: (clamp01(c.a) * 255.0) as u8,
        }
    }

    /// Converts to float channels.
    pub fn to_colorf(self) -> Colorf { Colorf::new(self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0, self.a as f32 / 255.0) }

    /// Builds a color from float hue, saturation, value and alpha.
    pub fn from_hsva_f(h: f32, s: f32, v: f32, a: f32) -> Self { Self::from_colorf(Colorf::from_hsva(h, s, v, a)) }

    /// Builds a color from byte hue, saturation, value and alpha.
    pub fn from_hsva(h: u8, s: u8, v: u8, a: u8) -> Self { Self::from_hsva_f(h as f32 / 255.0, s as f32 / 255.0, v as f32 / 255.0, a as f32 / 255.0) }

    /// Hue, saturation, value and alpha as bytes.
    pub fn to_hsva(self) -> [u8; 4] {
        let hsva = self.to_colorf().to_hsva();
        hsva.map(|c| (clamp01(c) * 255.0) as u8)
    }

    /// Packs the channels as `0xAABBGGRR`.
    pub fn to_u32(self) -> u32 { u32::from_le_bytes([self.r, self.g, self.b, self.a]) }

    /// Unpacks a color packed as `0xAABBGGRR`.
    pub fn from_u32(v: u32) -> Self {
        let [r, g, b, a] = v.to_le_bytes();
        Self { r, g, b, a }
    }

    /// Parses `RRGGBB` or `RRGGBBAA`, with an optional leading `#`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let byte = |i: usize| s.get(i..i + 2).and_then(|h| u8::from_str_radix(h, 16).ok());
        match s.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Formats as `RRGGBBAA`.
    pub fn to_hex_rgba(self) -> String { format!("{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a) }

    /// Formats as `RRGGBB`.
    pub fn to_hex_rgb(self) -> String { format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hsva_round_trip() {
        let c = Colorf::new(0.2, 0.6, 0.4, 1.0);
        let [h, s, v, a] = c.to_hsva();
        let back = Colorf::from_hsva(h, s, v, a);
        assert_relative_eq!(back.r, c.r, epsilon = 1e-4);
        assert_relative_eq!(back.g, c.g, epsilon = 1e-4);
        assert_relative_eq!(back.b, c.b, epsilon = 1e-4);
    }

    #[test]
    fn grey_has_no_saturation() {
        let [_, s, v, _] = Colorf::new(0.5, 0.5, 0.5, 1.0).to_hsva();
        assert_relative_eq!(s, 0.0, epsilon = 1e-6);
        assert_relative_eq!(v, 0.5);
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Color::from_hex("#FF8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("10203040"), Some(Color::rgba(0x10, 0x20, 0x30, 0x40)));
        assert_eq!(Color::from_hex("#12"), None);
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex_rgba(), "01020304");
        assert_eq!(Color::from_u32(Color::rgba(9, 8, 7, 6).to_u32()), Color::rgba(9, 8, 7, 6));
    }
}
