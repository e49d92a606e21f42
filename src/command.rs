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
//! Binary command records stored in the context arena and their decoded view.

use bytemuck::{Pod, Zeroable};
use log::warn;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
/// Kind tag stored in every command header.
pub enum CommandType {
    /// No operation.
    Nop = 0,
    /// Clip rectangle change.
    Scissor,
    /// Straight line.
    Line,
    /// Cubic Bézier curve.
    Curve,
    /// Rectangle outline.
    Rect,
    /// Filled rectangle.
    RectFilled,
    /// Rectangle with one color per corner.
    RectMultiColor,
    /// Circle outline.
    Circle,
    /// Filled circle.
    CircleFilled,
    /// Arc outline.
    Arc,
    /// Filled arc (pie slice).
    ArcFilled,
    /// Triangle outline.
    Triangle,
    /// Filled triangle.
    TriangleFilled,
    /// Closed polygon outline.
    Polygon,
    /// Filled convex polygon.
    PolygonFilled,
    /// Open polyline.
    Polyline,
    /// Text run.
    Text,
    /// Textured quad.
    Image,
    /// Host defined drawing.
    Custom,
}

impl CommandType {
    pub(crate) fn from_u32(v: u32) -> Self {
        match v {
            1 => Self::Scissor,
            2 => Self::Line,
            3 => Self::Curve,
            4 => Self::Rect,
            5 => Self::RectFilled,
            6 => Self::RectMultiColor,
            7 => Self::Circle,
            8 => Self::CircleFilled,
            9 => Self::Arc,
            10 => Self::ArcFilled,
            11 => Self::Triangle,
            12 => Self::TriangleFilled,
            13 => Self::Polygon,
            14 => Self::PolygonFilled,
            15 => Self::Polyline,
            16 => Self::Text,
            17 => Self::Image,
            18 => Self::Custom,
            _ => Self::Nop,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Byte offset of a command header inside the context arena.
pub struct CmdOffset(pub(crate) u32);

impl CmdOffset {
    /// Raw byte offset.
    pub fn get(self) -> usize { self.0 as usize }
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct CommandHeader {
    pub kind: u32,
    pub next: u32,
    #[cfg(feature = "command-userdata")]
    pub userdata: u32,
}

pub(crate) const HEADER_SIZE: usize = size_of::<CommandHeader>();
pub(crate) const COMMAND_ALIGN: usize = 4;

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct ScissorCmd {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct LineCmd {
    pub thickness: u16,
    pub _pad: u16,
    pub begin: [i16; 2],
    pub end: [i16; 2],
    pub color: Color,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct CurveCmd {
    pub thickness: u16,
    pub _pad: u16,
    pub begin: [i16; 2],
    pub end: [i16; 2],
    pub ctrl: [[i16; 2]; 2],
    pub color: Color,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct RectCmd {
    pub rounding: u16,
    pub thickness: u16,
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
    pub color: Color,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct RectMultiColorCmd {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
    pub left: Color,
    pub top: Color,
    pub bottom: Color,
    pub right: Color,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct CircleCmd {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
    pub thickness: u16,
    pub _pad: u16,
    pub color: Color,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct ArcCmd {
    pub cx: i16,
    pub cy: i16,
    pub r: u16,
    pub thickness: u16,
    pub a: [f32; 2],
    pub color: Color,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct TriangleCmd {
    pub thickness: u16,
    pub _pad: u16,
    pub a: [i16; 2],
    pub b: [i16; 2],
    pub c: [i16; 2],
    pub color: Color,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct PolyCmd {
    pub color: Color,
    pub thickness: u16,
    pub point_count: u16,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct TextCmd {
    pub font: u32,
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
    pub background: Color,
    pub foreground: Color,
    pub height: f32,
    pub length: u32,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct ImageCmd {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
    pub texture: u32,
    pub img_w: u16,
    pub img_h: u16,
    pub region: [u16; 4],
    pub color: Color,
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
pub(crate) struct CustomCmd {
    pub x: i16,
    pub y: i16,
    pub w: u16,
    pub h: u16,
    pub id: u32,
}

#[derive(Copy, Clone, Debug)]
/// A window's view into the shared command arena.
pub struct CommandBuffer {
    pub(crate) begin: u32,
    pub(crate) end: u32,
    pub(crate) last: Option<CmdOffset>,
    pub(crate) clip: Rect,
    pub(crate) use_clipping: bool,
    #[cfg(feature = "command-userdata")]
    pub(crate) userdata: u32,
}

impl Default for CommandBuffer {
    fn default() -> Self {
        Self {
            begin: 0,
            end: 0,
            last: None,
            clip: NULL_RECT,
            use_clipping: true,
            #[cfg(feature = "command-userdata")]
            userdata: 0,
        }
    }
}

impl CommandBuffer {
    /// Restarts the view at the arena's current front cursor.
    pub(crate) fn start(&mut self, memory: &Buffer) {
        self.begin = memory.allocated() as u32;
        self.end = self.begin;
        self.last = None;
        self.clip = NULL_RECT;
    }

    /// Forgets every command.
    pub(crate) fn reset(&mut self) {
        self.begin = 0;
        self.end = 0;
        self.last = None;
        self.clip = NULL_RECT;
    }

    /// Returns `true` if no command was pushed since the last start.
    pub fn is_empty(&self) -> bool { self.begin == self.end }

    /// Current clip rectangle.
    pub fn clip(&self) -> Rect { self.clip }

    /// Offset of the first command.
    pub fn begin(&self) -> CmdOffset { CmdOffset(self.begin) }

    /// Offset of the most recent command.
    pub fn last(&self) -> Option<CmdOffset> { self.last }

    /// Appends a command with `payload` followed by `extra` bytes.
    pub(crate) fn push<P: Pod>(&mut self, memory: &mut Buffer, kind: CommandType, payload: &P, extra: &[u8]) -> Option<CmdOffset> {
        let body = size_of::<P>() + extra.len();
        let total = (HEADER_SIZE + body + COMMAND_ALIGN - 1) & !(COMMAND_ALIGN - 1);
        let at = match memory.alloc(BufferSide::Front, total, COMMAND_ALIGN) {
            Ok(at) => at,
            Err(err) => {
                warn!("dropping {:?} command: {}", kind, err);
                return None;
            }
        };
        let header = CommandHeader {
            kind: kind as u32,
            next: (at + total) as u32,
            #[cfg(feature = "command-userdata")]
            userdata: self.userdata,
        };
        memory.write(at, &header);
        memory.write(at + HEADER_SIZE, payload);
        let tail = at + HEADER_SIZE + size_of::<P>();
        memory.bytes_mut(tail, extra.len()).copy_from_slice(extra);
        for b in memory.bytes_mut(tail + extra.len(), total - HEADER_SIZE - body) {
            *b = 0;
        }

        self.last = Some(CmdOffset(at as u32));
        self.end = header.next;
        Some(CmdOffset(at as u32))
    }
}

pub(crate) fn read_header(memory: &[u8], at: usize) -> CommandHeader { bytemuck::pod_read_unaligned(&memory[at..at + HEADER_SIZE]) }

pub(crate) fn set_next(memory: &mut Buffer, at: CmdOffset, next: u32) {
    let mut header: CommandHeader = memory.read(at.get());
    header.next = next;
    memory.write(at.get(), &header);
}

pub(crate) fn next_of(memory: &Buffer, at: CmdOffset) -> u32 { memory.read::<CommandHeader>(at.get()).next }

#[derive(Copy, Clone)]
/// Packed point list carried by polygon and polyline commands.
pub struct Points<'a>(&'a [u8]);

impl<'a> Points<'a> {
    /// Number of points.
    pub fn len(&self) -> usize { self.0.len() / 4 }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Point at `i`.
    pub fn get(&self, i: usize) -> Vec2i {
        let p: [i16; 2] = bytemuck::pod_read_unaligned(&self.0[i * 4..i * 4 + 4]);
        Vec2i::new(p[0] as i32, p[1] as i32)
    }

    /// Iterates over the points.
    pub fn iter(&self) -> impl Iterator<Item = Vec2i> + 'a {
        let bytes = self.0;
        bytes.chunks_exact(4).map(|c| {
            let p: [i16; 2] = bytemuck::pod_read_unaligned(c);
            Vec2i::new(p[0] as i32, p[1] as i32)
        })
    }
}

#[derive(Copy, Clone)]
/// Decoded draw command.
pub enum Command<'a> {
    /// No operation.
    Nop,
    /// Sets the clip rectangle for the following commands.
    Scissor {
        /// Clip rectangle.
        rect: Recti,
    },
    /// Straight line.
    Line {
        /// Start point.
        begin: Vec2i,
        /// End point.
        end: Vec2i,
        /// Line thickness in pixels.
        thickness: u16,
        /// Line color.
        color: Color,
    },
    /// Cubic Bézier curve.
    Curve {
        /// Start point.
        begin: Vec2i,
        /// End point.
        end: Vec2i,
        /// Control points.
        ctrl: [Vec2i; 2],
        /// Line thickness.
        thickness: u16,
        /// Line color.
        color: Color,
    },
    /// Rectangle outline.
    Rect {
        /// Outer rectangle.
        rect: Recti,
        /// Corner radius.
        rounding: u16,
        /// Line thickness.
        thickness: u16,
        /// Line color.
        color: Color,
    },
    /// Filled rectangle.
    RectFilled {
        /// Rectangle.
        rect: Recti,
        /// Corner radius.
        rounding: u16,
        /// Fill color.
        color: Color,
    },
    /// Rectangle with per-corner colors.
    RectMultiColor {
        /// Rectangle.
        rect: Recti,
        /// Top left color.
        left: Color,
        /// Top right color.
        top: Color,
        /// Bottom right color.
        right: Color,
        /// Bottom left color.
        bottom: Color,
    },
    /// Circle outline fitted inside a rectangle.
    Circle {
        /// Bounding rectangle.
        rect: Recti,
        /// Line thickness.
        thickness: u16,
        /// Line color.
        color: Color,
    },
    /// Filled circle fitted inside a rectangle.
    CircleFilled {
        /// Bounding rectangle.
        rect: Recti,
        /// Fill color.
        color: Color,
    },
    /// Arc outline.
    Arc {
        /// Center point.
        center: Vec2i,
        /// Radius.
        radius: u16,
        /// Start and end angles in radians.
        angles: [f32; 2],
        /// Line thickness.
        thickness: u16,
        /// Line color.
        color: Color,
    },
    /// Filled arc.
    ArcFilled {
        /// Center point.
        center: Vec2i,
        /// Radius.
        radius: u16,
        /// Start and end angles in radians.
        angles: [f32; 2],
        /// Fill color.
        color: Color,
    },
    /// Triangle outline.
    Triangle {
        /// Corners.
        points: [Vec2i; 3],
        /// Line thickness.
        thickness: u16,
        /// Line color.
        color: Color,
    },
    /// Filled triangle.
    TriangleFilled {
        /// Corners.
        points: [Vec2i; 3],
        /// Fill color.
        color: Color,
    },
    /// Closed polygon outline.
    Polygon {
        /// Corners.
        points: Points<'a>,
        /// Line thickness.
        thickness: u16,
        /// Line color.
        color: Color,
    },
    /// Filled convex polygon.
    PolygonFilled {
        /// Corners.
        points: Points<'a>,
        /// Fill color.
        color: Color,
    },
    /// Open polyline.
    Polyline {
        /// Points.
        points: Points<'a>,
        /// Line thickness.
        thickness: u16,
        /// Line color.
        color: Color,
    },
    /// Text run.
    Text {
        /// Font used to measure and render.
        font: FontId,
        /// Target rectangle.
        rect: Recti,
        /// Font height.
        height: f32,
        /// Background color used for blending.
        background: Color,
        /// Glyph color.
        foreground: Color,
        /// UTF-8 text.
        text: &'a str,
    },
    /// Textured quad.
    Image {
        /// Target rectangle.
        rect: Recti,
        /// Image reference.
        image: Image,
        /// Tint color.
        color: Color,
    },
    /// Host defined drawing.
    Custom {
        /// Target rectangle.
        rect: Recti,
        /// Host supplied identifier.
        id: u32,
    },
}

fn v2(p: [i16; 2]) -> Vec2i { Vec2i::new(p[0] as i32, p[1] as i32) }

fn r4(x: i16, y: i16, w: u16, h: u16) -> Recti { Recti::new(x as i32, y as i32, w as i32, h as i32) }

fn payload<P: Pod>(memory: &[u8], at: usize) -> P { bytemuck::pod_read_unaligned(&memory[at + HEADER_SIZE..at + HEADER_SIZE + size_of::<P>()]) }

/// Decodes the command stored at `at`.
pub(crate) fn decode(memory: &[u8], at: usize) -> Command<'_> {
    let header = read_header(memory, at);
    match CommandType::from_u32(header.kind) {
        CommandType::Nop => Command::Nop,
        CommandType::Scissor => {
            let c: ScissorCmd = payload(memory, at);
            Command::Scissor { rect: r4(c.x, c.y, c.w, c.h) }
        }
        CommandType::Line => {
            let c: LineCmd = payload(memory, at);
            Command::Line { begin: v2(c.begin), end: v2(c.end), thickness: c.thickness, color: c.color }
        }
        CommandType::Curve => {
            let c: CurveCmd = payload(memory, at);
            Command::Curve { begin: v2(c.begin), end: v2(c.end), ctrl: [v2(c.ctrl[0]), v2(c.ctrl[1])], thickness: c.thickness, color: c.color }
        }
        CommandType::Rect => {
            let c: RectCmd = payload(memory, at);
            Command::Rect { rect: r4(c.x, c.y, c.w, c.h), rounding: c.rounding, thickness: c.thickness, color: c.color }
        }
        CommandType::RectFilled => {
            let c: RectCmd = payload(memory, at);
            Command::RectFilled { rect: r4(c.x, c.y, c.w, c.h), rounding: c.rounding, color: c.color }
        }
        CommandType::RectMultiColor => {
            let c: RectMultiColorCmd = payload(memory, at);
            Command::RectMultiColor { rect: r4(c.x, c.y, c.w, c.h), left: c.left, top: c.top, right: c.right, bottom: c.bottom }
        }
        CommandType::Circle => {
            let c: CircleCmd = payload(memory, at);
            Command::Circle { rect: r4(c.x, c.y, c.w, c.h), thickness: c.thickness, color: c.color }
        }
        CommandType::CircleFilled => {
            let c: CircleCmd = payload(memory, at);
            Command::CircleFilled { rect: r4(c.x, c.y, c.w, c.h), color: c.color }
        }
        CommandType::Arc => {
            let c: ArcCmd = payload(memory, at);
            Command::Arc { center: v2([c.cx, c.cy]), radius: c.r, angles: c.a, thickness: c.thickness, color: c.color }
        }
        CommandType::ArcFilled => {
            let c: ArcCmd = payload(memory, at);
            Command::ArcFilled { center: v2([c.cx, c.cy]), radius: c.r, angles: c.a, color: c.color }
        }
        CommandType::Triangle => {
            let c: TriangleCmd = payload(memory, at);
            Command::Triangle { points: [v2(c.a), v2(c.b), v2(c.c)], thickness: c.thickness, color: c.color }
        }
        CommandType::TriangleFilled => {
            let c: TriangleCmd = payload(memory, at);
            Command::TriangleFilled { points: [v2(c.a), v2(c.b), v2(c.c)], color: c.color }
        }
        kind @ (CommandType::Polygon | CommandType::PolygonFilled | CommandType::Polyline) => {
            let c: PolyCmd = payload(memory, at);
            let start = at + HEADER_SIZE + size_of::<PolyCmd>();
            let points = Points(&memory[start..start + c.point_count as usize * 4]);
            match kind {
                CommandType::Polygon => Command::Polygon { points, thickness: c.thickness, color: c.color },
                CommandType::PolygonFilled => Command::PolygonFilled { points, color: c.color },
                _ => Command::Polyline { points, thickness: c.thickness, color: c.color },
            }
        }
        CommandType::Text => {
            let c: TextCmd = payload(memory, at);
            let start = at + HEADER_SIZE + size_of::<TextCmd>();
            let bytes = &memory[start..start + c.length as usize];
            Command::Text {
                font: FontId(c.font),
                rect: r4(c.x, c.y, c.w, c.h),
                height: c.height,
                background: c.background,
                foreground: c.foreground,
                text: std::str::from_utf8(bytes).unwrap_or(""),
            }
        }
        CommandType::Image => {
            let c: ImageCmd = payload(memory, at);
            Command::Image {
                rect: r4(c.x, c.y, c.w, c.h),
                image: Image { texture: TextureId(c.texture), w: c.img_w, h: c.img_h, region: c.region },
                color: c.color,
            }
        }
        CommandType::Custom => {
            let c: CustomCmd = payload(memory, at);
            Command::Custom { rect: r4(c.x, c.y, c.w, c.h), id: c.id }
        }
    }
}

/// Iterator over the spliced command list.
pub struct Commands<'a> {
    memory: &'a [u8],
    at: Option<usize>,
    end: usize,
}

impl<'a> Commands<'a> {
    pub(crate) fn new(memory: &'a [u8], first: Option<usize>, end: usize) -> Self { Self { memory, at: first.filter(|f| *f < end), end } }

    /// Userdata tag of the next command without advancing.
    #[cfg(feature = "command-userdata")]
    pub fn peek_userdata(&self) -> Option<u32> { self.at.map(|at| read_header(self.memory, at).userdata) }
}

impl<'a> Iterator for Commands<'a> {
    type Item = Command<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let at = self.at?;
        let header = read_header(self.memory, at);
        let next = header.next as usize;
        self.at = if next >= self.end || next == at { None } else { Some(next) };
        Some(decode(self.memory, at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_sizes_stay_packed() {
        assert_eq!(size_of::<ScissorCmd>(), 8);
        assert_eq!(size_of::<LineCmd>(), 16);
        assert_eq!(size_of::<CurveCmd>(), 24);
        assert_eq!(size_of::<RectCmd>(), 16);
        assert_eq!(size_of::<RectMultiColorCmd>(), 24);
        assert_eq!(size_of::<CircleCmd>(), 16);
        assert_eq!(size_of::<ArcCmd>(), 20);
        assert_eq!(size_of::<TriangleCmd>(), 20);
        assert_eq!(size_of::<PolyCmd>(), 8);
        assert_eq!(size_of::<TextCmd>(), 28);
        assert_eq!(size_of::<ImageCmd>(), 28);
        assert_eq!(size_of::<CustomCmd>(), 12);
    }

    #[test]
    fn push_links_commands_in_order() {
        let mut memory = Buffer::new(64);
        let mut buf = CommandBuffer::default();
        buf.start(&memory);
        let a = buf.push(&mut memory, CommandType::Scissor, &ScissorCmd { x: 1, y: 2, w: 3, h: 4 }, &[]).unwrap();
        let b = buf.push(&mut memory, CommandType::Text, &TextCmd { length: 3, ..Zeroable::zeroed() }, b"abc").unwrap();
        assert_eq!(next_of(&memory, a), b.0);
        assert_eq!(buf.end as usize, memory.allocated());
        assert_eq!(memory.allocated() % COMMAND_ALIGN, 0);

        let cmds: Vec<_> = Commands::new(memory.memory(), Some(0), memory.allocated()).collect();
        assert_eq!(cmds.len(), 2);
        match cmds[1] {
            Command::Text { text, .. } => assert_eq!(text, "abc"),
            _ => panic!("expected text"),
        }
        match cmds[0] {
            Command::Scissor { rect } => assert_eq!((rect.x, rect.y, rect.width, rect.height), (1, 2, 3, 4)),
            _ => panic!("expected scissor"),
        }
    }
}
