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
//! Converts the command list into an indexed triangle mesh.
//!
//! Three caller owned [`Buffer`]s receive the output: vertices, `u16` element indices and draw
//! commands. The command buffer doubles as scratch space: path points grow from its front while
//! draw commands grow from its back.

use std::f32::consts::PI;

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use log::warn;

use crate::context::font_of;
use crate::*;

/// Element index type written to the element buffer.
pub type DrawIndex = u16;

const CIRCLE_VTX_COUNT: usize = 12;
const AA_SIZE: f32 = 1.0;
const VERTEX_SIZE: usize = size_of::<Vertex>();
const VERTEX_ALIGN: usize = align_of::<Vertex>();
const INDEX_SIZE: usize = size_of::<DrawIndex>();
const POINT_SIZE: usize = size_of::<Vec2>();
const COMMAND_SIZE: usize = size_of::<RawDrawCommand>();

#[derive(Default, Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
/// Vertex written to the vertex buffer.
pub struct Vertex {
    pos: Vec2,
    uv: Vec2,
    color: Color,
}

impl Vertex {
    /// Creates a vertex with the provided position, texture coordinate and color.
    pub fn new(pos: Vec2, uv: Vec2, color: Color) -> Self { Self { pos, uv, color } }

    /// Screen space position.
    pub fn position(&self) -> Vec2 { self.pos }

    /// Texture coordinate.
    pub fn tex_coord(&self) -> Vec2 { self.uv }

    /// Vertex color.
    pub fn color(&self) -> Color { self.color }
}

#[derive(Copy, Clone, Pod, Zeroable)]
#[repr(C)]
struct RawDrawCommand {
    elem_count: u32,
    clip: [f32; 4],
    texture: u32,
    userdata: u32,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// One batch of triangles sharing a clip rectangle and a texture.
pub struct DrawCommand {
    /// Number of element indices in this batch.
    pub elem_count: u32,
    /// Scissor rectangle.
    pub clip_rect: Rect,
    /// Texture sampled by the batch.
    pub texture: TextureId,
    /// Tag of the commands that produced the batch.
    #[cfg(feature = "command-userdata")]
    pub userdata: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
/// Anti-aliasing toggle for strokes and shapes.
pub enum AntiAliasing {
    /// Plain geometry.
    Off,
    /// Feathered one pixel fringe.
    #[default]
    On,
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
/// White texel used by untextured geometry.
pub struct NullTexture {
    /// Texture holding the white texel.
    pub texture: TextureId,
    /// Coordinate of the white texel.
    pub uv: Vec2,
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// Tessellation settings for [`Context::convert`].
pub struct ConvertConfig {
    /// Multiplier applied to the alpha of strokes, fills and text.
    pub global_alpha: f32,
    /// Anti-aliasing of lines and outlines.
    pub line_aa: AntiAliasing,
    /// Anti-aliasing of filled shapes.
    pub shape_aa: AntiAliasing,
    /// Segments per full circle.
    pub circle_segment_count: u32,
    /// Segments per arc.
    pub arc_segment_count: u32,
    /// Segments per Bézier curve.
    pub curve_segment_count: u32,
    /// Texture and texel used for untextured geometry.
    pub null: NullTexture,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            global_alpha: 1.0,
            line_aa: AntiAliasing::On,
            shape_aa: AntiAliasing::On,
            circle_segment_count: 22,
            arc_segment_count: 22,
            curve_segment_count: 22,
            null: NullTexture::default(),
        }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    /// Outcome of a conversion. Empty means every command fit.
    pub struct ConvertResult : u32 {
        /// Path points or draw commands did not fit into the command buffer.
        const COMMAND_BUFFER_FULL = 1 << 1;
        /// Vertices did not fit, or the mesh exceeded the 16-bit index range.
        const VERTEX_BUFFER_FULL = 1 << 2;
        /// Element indices did not fit.
        const ELEMENT_BUFFER_FULL = 1 << 3;
    }
}

impl ConvertResult {
    /// Returns `true` if nothing was dropped.
    pub fn is_success(&self) -> bool { self.is_empty() }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Whether a stroked path joins its last point back to the first.
pub enum Stroke {
    /// Open polyline.
    Open,
    /// Closed outline.
    Closed,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// Location of the draw commands produced by the last conversion.
pub(crate) struct DrawBatches {
    count: usize,
    // distance of the first command from the end of the command buffer
    first: usize,
}

fn full(buf: &Buffer) -> bool { buf.needed() > buf.allocated() + (buf.capacity() - buf.back()) }

fn normalize(d: Vec2) -> Vec2 {
    let len = d.len_sqr();
    if len != 0.0 { d * (1.0 / len.sqrt()) } else { d }
}

/// Averaged miter normal, with the inverse squared length clamped to 100.
fn miter(n0: Vec2, n1: Vec2) -> Vec2 {
    let dm = (n0 + n1) * 0.5;
    let dmr2 = dm.len_sqr();
    if dmr2 > 0.000001 { dm * (1.0 / dmr2).min(100.0) } else { dm }
}

fn with_alpha(c: Color, alpha: f32) -> Color { Color { a: (c.a as f32 * alpha) as u8, ..c } }

fn transparent(c: Color) -> Color { Color { a: 0, ..c } }

/// Triangle mesh builder writing into three caller owned buffers.
pub struct DrawList<'a> {
    cmds: &'a mut Buffer,
    vertices: &'a mut Buffer,
    elements: &'a mut Buffer,
    config: ConvertConfig,
    clip_rect: Rect,
    circle_vtx: [Vec2; CIRCLE_VTX_COUNT],
    cmd_count: usize,
    cmd_first: usize,
    vertex_count: usize,
    element_count: usize,
    path_count: usize,
    path_offset: usize,
    index_overflow: bool,
    #[cfg(feature = "command-userdata")]
    userdata: u32,
    points: Vec<Vec2>,
    normals: Vec<Vec2>,
    temp: Vec<Vec2>,
}

impl<'a> DrawList<'a> {
    /// Starts a mesh over `cmds`, `vertices` and `elements`. All three buffers are cleared.
    pub fn new(config: ConvertConfig, cmds: &'a mut Buffer, vertices: &'a mut Buffer, elements: &'a mut Buffer) -> Self {
        cmds.clear();
        vertices.clear();
        elements.clear();
        let circle_vtx = std::array::from_fn(|i| {
            let a = (i as f32 / CIRCLE_VTX_COUNT as f32) * 2.0 * PI;
            vec2(a.cos(), a.sin())
        });
        Self {
            cmds,
            vertices,
            elements,
            config,
            clip_rect: NULL_RECT,
            circle_vtx,
            cmd_count: 0,
            cmd_first: 0,
            vertex_count: 0,
            element_count: 0,
            path_count: 0,
            path_offset: 0,
            index_overflow: false,
            #[cfg(feature = "command-userdata")]
            userdata: 0,
            points: Vec::new(),
            normals: Vec::new(),
            temp: Vec::new(),
        }
    }

    /// Number of vertices written so far.
    pub fn vertex_count(&self) -> usize { self.vertex_count }

    /// Number of element indices written so far.
    pub fn element_count(&self) -> usize { self.element_count }

    /// Number of draw commands written so far.
    pub fn command_count(&self) -> usize { self.cmd_count }

    /// Tag stamped on the following draw commands.
    #[cfg(feature = "command-userdata")]
    pub fn set_userdata(&mut self, userdata: u32) { self.userdata = userdata; }

    /// Draw commands produced so far.
    pub fn commands(&self) -> DrawCommands<'_> { DrawCommands::new(self.cmds, self.batches()) }

    /// Reports which buffers refused an allocation.
    pub fn result(&self) -> ConvertResult {
        let mut res = ConvertResult::empty();
        res.set(ConvertResult::COMMAND_BUFFER_FULL, full(self.cmds));
        res.set(ConvertResult::VERTEX_BUFFER_FULL, full(self.vertices) || self.index_overflow);
        res.set(ConvertResult::ELEMENT_BUFFER_FULL, full(self.elements));
        res
    }

    fn batches(&self) -> DrawBatches { DrawBatches { count: self.cmd_count, first: self.cmd_first } }

    fn command_offset(&self, index: usize) -> usize { self.cmds.offset_from_end(self.cmd_first) - index * COMMAND_SIZE }

    fn last_command(&self) -> Option<(usize, RawDrawCommand)> {
        let at = self.command_offset(self.cmd_count.checked_sub(1)?);
        Some((at, self.cmds.read(at)))
    }

    fn push_command(&mut self, clip: Rect, texture: TextureId) {
        let Ok(at) = self.cmds.alloc(BufferSide::Back, COMMAND_SIZE, align_of::<RawDrawCommand>()) else { return };
        if self.cmd_count == 0 {
            self.cmd_first = self.cmds.distance_from_end(at);
        }
        #[cfg(feature = "command-userdata")]
        let userdata = self.userdata;
        #[cfg(not(feature = "command-userdata"))]
        let userdata = 0;
        let cmd = RawDrawCommand { elem_count: 0, clip: [clip.x, clip.y, clip.w, clip.h], texture: texture.0, userdata };
        self.cmds.write(at, &cmd);
        self.cmd_count += 1;
        self.clip_rect = clip;
    }

    /// Starts a batch clipped to `rect`. An empty trailing batch is retargeted instead.
    pub fn add_clip(&mut self, rect: Rect) {
        match self.last_command() {
            None => self.push_command(rect, self.config.null.texture),
            Some((at, mut prev)) => {
                if prev.elem_count == 0 {
                    prev.clip = [rect.x, rect.y, rect.w, rect.h];
                    self.cmds.write(at, &prev);
                }
                self.push_command(rect, TextureId(prev.texture));
            }
        }
    }

    /// Switches the current batch to `texture`. An empty trailing batch is retargeted instead.
    pub fn push_image(&mut self, texture: TextureId) {
        let Some((at, mut prev)) = self.last_command() else {
            self.push_command(NULL_RECT, texture);
            return;
        };
        #[cfg(feature = "command-userdata")]
        let other_tag = prev.userdata != self.userdata;
        #[cfg(not(feature = "command-userdata"))]
        let other_tag = false;
        if prev.elem_count == 0 {
            prev.texture = texture.0;
            #[cfg(feature = "command-userdata")]
            {
                prev.userdata = self.userdata;
            }
            self.cmds.write(at, &prev);
        } else if prev.texture != texture.0 || other_tag {
            let [x, y, w, h] = prev.clip;
            self.push_command(Rect::new(x, y, w, h), texture);
        }
    }

    fn alloc_vertices(&mut self, count: usize) -> Option<usize> {
        if self.vertex_count + count > DrawIndex::MAX as usize + 1 {
            if !self.index_overflow {
                warn!("draw list exceeds {} vertices; dropping geometry", DrawIndex::MAX as usize + 1);
            }
            self.index_overflow = true;
            return None;
        }
        self.vertices.alloc(BufferSide::Front, count * VERTEX_SIZE, VERTEX_ALIGN).ok()
    }

    /// Reserves `vertices` and `elements` slots, returning their offsets and the first index.
    /// Counts only move once both allocations succeed.
    fn reserve(&mut self, vertices: usize, elements: usize) -> Option<(usize, usize, usize)> {
        let (cmd_at, mut cmd) = self.last_command()?;
        self.vertices.mark(BufferSide::Front);
        let Some(vtx) = self.alloc_vertices(vertices) else {
            self.vertices.unmark(BufferSide::Front);
            return None;
        };
        let Ok(ids) = self.elements.alloc(BufferSide::Front, elements * INDEX_SIZE, INDEX_SIZE) else {
            self.vertices.reset(BufferSide::Front);
            return None;
        };
        self.vertices.unmark(BufferSide::Front);

        let base = self.vertex_count;
        self.vertex_count += vertices;
        self.element_count += elements;
        cmd.elem_count += elements as u32;
        self.cmds.write(cmd_at, &cmd);
        Some((vtx, ids, base))
    }

    fn put_vertex(&mut self, at: usize, pos: Vec2, uv: Vec2, color: Color) -> usize {
        self.vertices.write(at, &Vertex::new(pos, uv, color));
        at + VERTEX_SIZE
    }

    fn put_indices(&mut self, at: usize, ids: &[usize]) -> usize {
        for (i, id) in ids.iter().enumerate() {
            self.elements.write(at + i * INDEX_SIZE, &(*id as DrawIndex));
        }
        at + ids.len() * INDEX_SIZE
    }

    fn push_rect_uv(&mut self, a: Vec2, c: Vec2, uva: Vec2, uvc: Vec2, color: Color) {
        let Some((vtx, ids, index)) = self.reserve(4, 6) else { return };
        self.put_indices(ids, &[index, index + 1, index + 2, index, index + 2, index + 3]);
        let vtx = self.put_vertex(vtx, a, uva, color);
        let vtx = self.put_vertex(vtx, vec2(c.x, a.y), vec2(uvc.x, uva.y), color);
        let vtx = self.put_vertex(vtx, c, uvc, color);
        self.put_vertex(vtx, vec2(a.x, c.y), vec2(uva.x, uvc.y), color);
    }

    /// Strokes a polyline through `points`.
    pub fn stroke_poly_line(&mut self, points: &[Vec2], color: Color, closed: Stroke, thickness: f32, aliasing: AntiAliasing) {
        let n = points.len();
        if n < 2 {
            return;
        }
        self.untextured();
        let closed = closed == Stroke::Closed;
        let count = if closed { n } else { n - 1 };
        let thick = thickness > 1.0;
        let col = with_alpha(color, self.config.global_alpha);
        let col_trans = transparent(col);
        let uv = self.config.null.uv;

        if aliasing == AntiAliasing::Off {
            let Some((mut vtx, mut ids, mut idx)) = self.reserve(count * 4, count * 6) else { return };
            for i1 in 0..count {
                let p1 = points[i1];
                let p2 = points[if i1 + 1 == n { 0 } else { i1 + 1 }];
                let diff = normalize(p2 - p1);
                let dx = diff.x * (thickness * 0.5);
                let dy = diff.y * (thickness * 0.5);
                vtx = self.put_vertex(vtx, vec2(p1.x + dy, p1.y - dx), uv, col);
                vtx = self.put_vertex(vtx, vec2(p2.x + dy, p2.y - dx), uv, col);
                vtx = self.put_vertex(vtx, vec2(p2.x - dy, p2.y + dx), uv, col);
                vtx = self.put_vertex(vtx, vec2(p1.x - dy, p1.y + dx), uv, col);
                ids = self.put_indices(ids, &[idx, idx + 1, idx + 2, idx, idx + 2, idx + 3]);
                idx += 4;
            }
            return;
        }

        let (vtx_count, idx_count) = if thick { (n * 4, count * 18) } else { (n * 3, count * 12) };
        let Some((mut vtx, mut ids, index)) = self.reserve(vtx_count, idx_count) else { return };

        let mut normals = std::mem::take(&mut self.normals);
        let mut temp = std::mem::take(&mut self.temp);
        normals.clear();
        normals.resize(n, Vec2::default());
        temp.clear();
        temp.resize(n * if thick { 4 } else { 2 }, Vec2::default());

        for i1 in 0..count {
            let i2 = if i1 + 1 == n { 0 } else { i1 + 1 };
            let d = normalize(points[i2] - points[i1]);
            normals[i1] = vec2(d.y, -d.x);
        }
        if !closed {
            normals[n - 1] = normals[n - 2];
        }

        if !thick {
            if !closed {
                let d = normals[0] * AA_SIZE;
                temp[0] = points[0] + d;
                temp[1] = points[0] - d;
                let d = normals[n - 1] * AA_SIZE;
                temp[(n - 1) * 2] = points[n - 1] + d;
                temp[(n - 1) * 2 + 1] = points[n - 1] - d;
            }
            let mut idx1 = index;
            for i1 in 0..count {
                let i2 = if i1 + 1 == n { 0 } else { i1 + 1 };
                let idx2 = if i1 + 1 == n { index } else { idx1 + 3 };
                let dm = miter(normals[i1], normals[i2]) * AA_SIZE;
                temp[i2 * 2] = points[i2] + dm;
                temp[i2 * 2 + 1] = points[i2] - dm;
                ids = self.put_indices(ids, &[
                    idx2, idx1, idx1 + 2, idx1 + 2, idx2 + 2, idx2,
                    idx2 + 1, idx1 + 1, idx1, idx1, idx2, idx2 + 1,
                ]);
                idx1 = idx2;
            }
            for i in 0..n {
                vtx = self.put_vertex(vtx, points[i], uv, col);
                vtx = self.put_vertex(vtx, temp[i * 2], uv, col_trans);
                vtx = self.put_vertex(vtx, temp[i * 2 + 1], uv, col_trans);
            }
        } else {
            let half_inner = (thickness - AA_SIZE) * 0.5;
            let edge = |temp: &mut [Vec2], i: usize, p: Vec2, n: Vec2| {
                let d1 = n * (half_inner + AA_SIZE);
                let d2 = n * half_inner;
                temp[i * 4] = p + d1;
                temp[i * 4 + 1] = p + d2;
                temp[i * 4 + 2] = p - d2;
                temp[i * 4 + 3] = p - d1;
            };
            if !closed {
                edge(&mut temp, 0, points[0], normals[0]);
                edge(&mut temp, n - 1, points[n - 1], normals[n - 1]);
            }
            let mut idx1 = index;
            for i1 in 0..count {
                let i2 = if i1 + 1 == n { 0 } else { i1 + 1 };
                let idx2 = if i1 + 1 == n { index } else { idx1 + 4 };
                edge(&mut temp, i2, points[i2], miter(normals[i1], normals[i2]));
                ids = self.put_indices(ids, &[
                    idx2 + 1, idx1 + 1, idx1 + 2, idx1 + 2, idx2 + 2, idx2 + 1,
                    idx2 + 1, idx1 + 1, idx1, idx1, idx2, idx2 + 1,
                    idx2 + 2, idx1 + 2, idx1 + 3, idx1 + 3, idx2 + 3, idx2 + 2,
                ]);
                idx1 = idx2;
            }
            for i in 0..n {
                vtx = self.put_vertex(vtx, temp[i * 4], uv, col_trans);
                vtx = self.put_vertex(vtx, temp[i * 4 + 1], uv, col);
                vtx = self.put_vertex(vtx, temp[i * 4 + 2], uv, col);
                vtx = self.put_vertex(vtx, temp[i * 4 + 3], uv, col_trans);
            }
        }
        self.normals = normals;
        self.temp = temp;
    }

    /// Fills the convex polygon `points`.
    pub fn fill_poly_convex(&mut self, points: &[Vec2], color: Color, aliasing: AntiAliasing) {
        let n = points.len();
        if n < 3 {
            return;
        }
        self.untextured();
        let col = with_alpha(color, self.config.global_alpha);
        let col_trans = transparent(col);
        let uv = self.config.null.uv;

        if aliasing == AntiAliasing::Off {
            let Some((mut vtx, mut ids, index)) = self.reserve(n, (n - 2) * 3) else { return };
            for p in points {
                vtx = self.put_vertex(vtx, *p, uv, col);
            }
            for i in 2..n {
                ids = self.put_indices(ids, &[index, index + i - 1, index + i]);
            }
            return;
        }

        let Some((mut vtx, mut ids, index)) = self.reserve(n * 2, (n - 2) * 3 + n * 6) else { return };
        let (inner, outer) = (index, index + 1);
        for i in 2..n {
            ids = self.put_indices(ids, &[inner, inner + ((i - 1) << 1), inner + (i << 1)]);
        }

        let mut normals = std::mem::take(&mut self.normals);
        normals.clear();
        normals.resize(n, Vec2::default());
        let mut i0 = n - 1;
        for i1 in 0..n {
            let d = normalize(points[i1] - points[i0]);
            normals[i0] = vec2(d.y, -d.x);
            i0 = i1;
        }

        let mut i0 = n - 1;
        for i1 in 0..n {
            let dm = miter(normals[i0], normals[i1]) * (AA_SIZE * 0.5);
            vtx = self.put_vertex(vtx, points[i1] - dm, uv, col);
            vtx = self.put_vertex(vtx, points[i1] + dm, uv, col_trans);
            ids = self.put_indices(ids, &[
                inner + (i1 << 1), inner + (i0 << 1), outer + (i0 << 1),
                outer + (i0 << 1), outer + (i1 << 1), inner + (i1 << 1),
            ]);
            i0 = i1;
        }
        self.normals = normals;
    }

    /// Drops every point of the current path.
    pub fn path_clear(&mut self) {
        self.cmds.reset(BufferSide::Front);
        self.path_count = 0;
        self.path_offset = 0;
    }

    /// Makes sure the trailing batch samples the null texture.
    fn untextured(&mut self) {
        if self.cmd_count == 0 {
            self.add_clip(NULL_RECT);
        }
        if let Some((_, cmd)) = self.last_command()
            && cmd.texture != self.config.null.texture.0
        {
            self.push_image(self.config.null.texture);
        }
    }

    /// Appends `pos` to the current path.
    pub fn path_line_to(&mut self, pos: Vec2) {
        self.untextured();
        let Ok(at) = self.cmds.alloc(BufferSide::Front, POINT_SIZE, align_of::<Vec2>()) else { return };
        if self.path_count == 0 {
            self.path_offset = at;
        }
        self.path_count += 1;
        self.cmds.write(at, &pos);
    }

    fn path_last(&self) -> Option<Vec2> {
        let last = self.path_count.checked_sub(1)?;
        Some(self.cmds.read(self.path_offset + last * POINT_SIZE))
    }

    /// Appends the precomputed circle points `a_min..=a_max` (twelve per turn).
    pub fn path_arc_to_fast(&mut self, center: Vec2, radius: f32, a_min: usize, a_max: usize) {
        for a in a_min..=a_max {
            let c = self.circle_vtx[a % CIRCLE_VTX_COUNT];
            self.path_line_to(vec2(center.x + c.x * radius, center.y + c.y * radius));
        }
    }

    /// Appends `segments + 1` points along an arc from `a_min` to `a_max` radians.
    pub fn path_arc_to(&mut self, center: Vec2, radius: f32, a_min: f32, a_max: f32, segments: u32) {
        if radius == 0.0 {
            return;
        }
        // rotate the start vector by a fixed step instead of calling sin/cos per point
        let d_angle = (a_max - a_min) / segments as f32;
        let (sin_d, cos_d) = d_angle.sin_cos();
        let mut cx = a_min.cos() * radius;
        let mut cy = a_min.sin() * radius;
        for _ in 0..=segments {
            self.path_line_to(vec2(center.x + cx, center.y + cy));
            let nx = cx * cos_d - cy * sin_d;
            let ny = cy * cos_d + cx * sin_d;
            cx = nx;
            cy = ny;
        }
    }

    /// Appends a rectangle from `a` to `b`, with corners rounded by up to `rounding`.
    pub fn path_rect_to(&mut self, a: Vec2, b: Vec2, rounding: f32) {
        let r = rounding.min((b.x - a.x).abs()).min((b.y - a.y).abs());
        if r == 0.0 {
            self.path_line_to(a);
            self.path_line_to(vec2(b.x, a.y));
            self.path_line_to(b);
            self.path_line_to(vec2(a.x, b.y));
        } else {
            self.path_arc_to_fast(vec2(a.x + r, a.y + r), r, 6, 9);
            self.path_arc_to_fast(vec2(b.x - r, a.y + r), r, 9, 12);
            self.path_arc_to_fast(vec2(b.x - r, b.y - r), r, 0, 3);
            self.path_arc_to_fast(vec2(a.x + r, b.y - r), r, 3, 6);
        }
    }

    /// Appends a cubic Bézier from the last path point through `p2`, `p3` to `p4`.
    pub fn path_curve_to(&mut self, p2: Vec2, p3: Vec2, p4: Vec2, segments: u32) {
        let Some(p1) = self.path_last() else { return };
        let segments = segments.max(1);
        let t_step = 1.0 / segments as f32;
        for step in 1..=segments {
            let t = t_step * step as f32;
            let u = 1.0 - t;
            let w1 = u * u * u;
            let w2 = 3.0 * u * u * t;
            let w3 = 3.0 * u * t * t;
            let w4 = t * t * t;
            self.path_line_to(vec2(
                w1 * p1.x + w2 * p2.x + w3 * p3.x + w4 * p4.x,
                w1 * p1.y + w2 * p2.y + w3 * p3.y + w4 * p4.y,
            ));
        }
    }

    fn take_path(&mut self) -> Vec<Vec2> {
        let mut points = std::mem::take(&mut self.points);
        points.clear();
        points.extend((0..self.path_count).map(|i| self.cmds.read::<Vec2>(self.path_offset + i * POINT_SIZE)));
        self.path_clear();
        points
    }

    /// Fills the current path as a convex polygon and clears it.
    pub fn path_fill(&mut self, color: Color) {
        let points = self.take_path();
        self.fill_poly_convex(&points, color, self.config.shape_aa);
        self.points = points;
    }

    /// Strokes the current path and clears it.
    pub fn path_stroke(&mut self, color: Color, closed: Stroke, thickness: f32) {
        let points = self.take_path();
        self.stroke_poly_line(&points, color, closed, thickness, self.config.line_aa);
        self.points = points;
    }

    fn aliased(&self) -> bool { self.config.line_aa == AntiAliasing::On }

    /// Line from `a` to `b`.
    pub fn stroke_line(&mut self, a: Vec2, b: Vec2, color: Color, thickness: f32) {
        if color.a == 0 {
            return;
        }
        let half = if self.aliased() { Vec2::default() } else { vec2(0.5, 0.5) };
        self.path_line_to(a - half);
        self.path_line_to(b - half);
        self.path_stroke(color, Stroke::Open, thickness);
    }

    fn rect_path(&mut self, r: Rect, rounding: f32) {
        let half = if self.aliased() { Vec2::default() } else { vec2(0.5, 0.5) };
        self.path_rect_to(r.pos() - half, vec2(r.x + r.w, r.y + r.h), rounding);
    }

    /// Filled rectangle.
    pub fn fill_rect(&mut self, r: Rect, color: Color, rounding: f32) {
        if color.a == 0 {
            return;
        }
        self.rect_path(r, rounding);
        self.path_fill(color);
    }

    /// Rectangle outline.
    pub fn stroke_rect(&mut self, r: Rect, color: Color, rounding: f32, thickness: f32) {
        if color.a == 0 {
            return;
        }
        self.rect_path(r, rounding);
        self.path_stroke(color, Stroke::Closed, thickness);
    }

    /// Rectangle with one color per corner, clockwise from the top left.
    pub fn fill_rect_multi_color(&mut self, r: Rect, left: Color, top: Color, right: Color, bottom: Color) {
        self.push_image(self.config.null.texture);
        let Some((vtx, ids, index)) = self.reserve(4, 6) else { return };
        self.put_indices(ids, &[index, index + 1, index + 2, index, index + 2, index + 3]);
        let uv = self.config.null.uv;
        let vtx = self.put_vertex(vtx, vec2(r.x, r.y), uv, left);
        let vtx = self.put_vertex(vtx, vec2(r.x + r.w, r.y), uv, top);
        let vtx = self.put_vertex(vtx, vec2(r.x + r.w, r.y + r.h), uv, right);
        self.put_vertex(vtx, vec2(r.x, r.y + r.h), uv, bottom);
    }

    /// Filled triangle.
    pub fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        if color.a == 0 {
            return;
        }
        self.path_line_to(a);
        self.path_line_to(b);
        self.path_line_to(c);
        self.path_fill(color);
    }

    /// Triangle outline.
    pub fn stroke_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color, thickness: f32) {
        if color.a == 0 {
            return;
        }
        self.path_line_to(a);
        self.path_line_to(b);
        self.path_line_to(c);
        self.path_stroke(color, Stroke::Closed, thickness);
    }

    fn circle_path(&mut self, center: Vec2, radius: f32, segments: u32) {
        let a_max = PI * 2.0 * (segments as f32 - 1.0) / segments as f32;
        self.path_arc_to(center, radius, 0.0, a_max, segments);
    }

    /// Filled circle.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, segments: u32) {
        if color.a == 0 {
            return;
        }
        self.circle_path(center, radius, segments);
        self.path_fill(color);
    }

    /// Circle outline.
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, segments: u32, thickness: f32) {
        if color.a == 0 {
            return;
        }
        self.circle_path(center, radius, segments);
        self.path_stroke(color, Stroke::Closed, thickness);
    }

    /// Cubic Bézier from `p0` to `p1` with control points `cp0` and `cp1`.
    pub fn stroke_curve(&mut self, p0: Vec2, cp0: Vec2, cp1: Vec2, p1: Vec2, color: Color, segments: u32, thickness: f32) {
        if color.a == 0 {
            return;
        }
        self.path_line_to(p0);
        self.path_curve_to(cp0, cp1, p1, segments);
        self.path_stroke(color, Stroke::Open, thickness);
    }

    /// Textured quad covering `r`.
    pub fn add_image(&mut self, image: Image, r: Rect, color: Color) {
        self.push_image(image.texture);
        let (uv0, uv1) = if image.is_subimage() && image.w > 0 && image.h > 0 {
            let (w, h) = (image.w as f32, image.h as f32);
            let [x, y, rw, rh] = image.region.map(|v| v as f32);
            (vec2(x / w, y / h), vec2((x + rw) / w, (y + rh) / h))
        } else {
            (vec2(0.0, 0.0), vec2(1.0, 1.0))
        };
        self.push_rect_uv(r.pos(), vec2(r.x + r.w, r.y + r.h), uv0, uv1, color);
    }

    /// One textured quad per glyph of `text`, starting at the top left of `r`.
    pub fn add_text(&mut self, font: &dyn Font, r: Rect, text: &str, height: f32, fg: Color) {
        if text.is_empty() || !r.intersects(&self.clip_rect) {
            return;
        }
        self.push_image(font.texture());
        let fg = with_alpha(fg, self.config.global_alpha);
        let mut x = r.x;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let g = font.query_glyph(height, c, chars.peek().copied());
            let gx = x + g.offset.x;
            let gy = r.y + g.offset.y;
            self.push_rect_uv(vec2(gx, gy), vec2(gx + g.width, gy + g.height), g.uv[0], g.uv[1], fg);
            x += g.xadvance;
        }
    }

    fn add_command(&mut self, cmd: &Command<'_>, fonts: &crate::context::Fonts) {
        let cfg = self.config;
        let p = |v: Vec2i| vec2(v.x as f32, v.y as f32);
        let r = |r: Recti| Rect::new(r.x as f32, r.y as f32, r.width as f32, r.height as f32);
        match *cmd {
            Command::Nop => {}
            Command::Scissor { rect } => self.add_clip(r(rect)),
            Command::Line { begin, end, thickness, color } => self.stroke_line(p(begin), p(end), color, thickness as f32),
            Command::Curve { begin, end, ctrl, thickness, color } => {
                self.stroke_curve(p(begin), p(ctrl[0]), p(ctrl[1]), p(end), color, cfg.curve_segment_count, thickness as f32)
            }
            Command::Rect { rect, rounding, thickness, color } => self.stroke_rect(r(rect), color, rounding as f32, thickness as f32),
            Command::RectFilled { rect, rounding, color } => self.fill_rect(r(rect), color, rounding as f32),
            Command::RectMultiColor { rect, left, top, right, bottom } => self.fill_rect_multi_color(r(rect), left, top, right, bottom),
            Command::Circle { rect, thickness, color } => {
                let c = r(rect);
                self.stroke_circle(vec2(c.x + c.w / 2.0, c.y + c.h / 2.0), c.w / 2.0, color, cfg.circle_segment_count, thickness as f32)
            }
            Command::CircleFilled { rect, color } => {
                let c = r(rect);
                self.fill_circle(vec2(c.x + c.w / 2.0, c.y + c.h / 2.0), c.w / 2.0, color, cfg.circle_segment_count)
            }
            Command::Arc { center, radius, angles, thickness, color } => {
                self.path_line_to(p(center));
                self.path_arc_to(p(center), radius as f32, angles[0], angles[1], cfg.arc_segment_count);
                self.path_stroke(color, Stroke::Closed, thickness as f32);
            }
            Command::ArcFilled { center, radius, angles, color } => {
                self.path_line_to(p(center));
                self.path_arc_to(p(center), radius as f32, angles[0], angles[1], cfg.arc_segment_count);
                self.path_fill(color);
            }
            Command::Triangle { points, thickness, color } => {
                self.stroke_triangle(p(points[0]), p(points[1]), p(points[2]), color, thickness as f32)
            }
            Command::TriangleFilled { points, color } => self.fill_triangle(p(points[0]), p(points[1]), p(points[2]), color),
            Command::Polygon { points, thickness, color } => {
                points.iter().for_each(|v| self.path_line_to(p(v)));
                self.path_stroke(color, Stroke::Closed, thickness as f32);
            }
            Command::PolygonFilled { points, color } => {
                points.iter().for_each(|v| self.path_line_to(p(v)));
                self.path_fill(color);
            }
            Command::Polyline { points, thickness, color } => {
                points.iter().for_each(|v| self.path_line_to(p(v)));
                self.path_stroke(color, Stroke::Open, thickness as f32);
            }
            Command::Text { font, rect, height, foreground, text, .. } => self.add_text(font_of(fonts, font), r(rect), text, height, foreground),
            Command::Image { rect, image, color } => self.add_image(image, r(rect), color),
            Command::Custom { .. } => {}
        }
    }
}

/// Iterator over the draw commands stored in a command buffer.
pub struct DrawCommands<'b> {
    buf: &'b Buffer,
    batches: DrawBatches,
    index: usize,
}

impl<'b> DrawCommands<'b> {
    fn new(buf: &'b Buffer, batches: DrawBatches) -> Self { Self { buf, batches, index: 0 } }
}

impl Iterator for DrawCommands<'_> {
    type Item = DrawCommand;

    fn next(&mut self) -> Option<DrawCommand> {
        if self.index >= self.batches.count {
            return None;
        }
        let at = self.buf.offset_from_end(self.batches.first).checked_sub(self.index * COMMAND_SIZE)?;
        self.index += 1;
        let raw: RawDrawCommand = self.buf.read(at);
        let [x, y, w, h] = raw.clip;
        Some(DrawCommand {
            elem_count: raw.elem_count,
            clip_rect: Rect::new(x, y, w, h),
            texture: TextureId(raw.texture),
            #[cfg(feature = "command-userdata")]
            userdata: raw.userdata,
        })
    }
}

impl Context {
    /// Tessellates the current command list into `vertices` (of [`Vertex`]), `elements` (of
    /// [`DrawIndex`]) and draw commands stored in `cmds`. The three buffers are cleared first.
    pub fn convert(&mut self, cmds: &mut Buffer, vertices: &mut Buffer, elements: &mut Buffer, config: &ConvertConfig) -> ConvertResult {
        self.convert_with(cmds, vertices, elements, config, |_, _, _| {})
    }

    /// Like [`Context::convert`], handing every custom command to `custom` together with the
    /// draw list so it can add its own geometry.
    pub fn convert_with<F>(&mut self, cmds: &mut Buffer, vertices: &mut Buffer, elements: &mut Buffer, config: &ConvertConfig, mut custom: F) -> ConvertResult
    where
        F: FnMut(&mut DrawList<'_>, Rect, u32),
    {
        let mut list = DrawList::new(*config, cmds, vertices, elements);
        let (mut commands, fonts) = self.command_list();
        loop {
            #[cfg(feature = "command-userdata")]
            let tag = commands.peek_userdata();
            #[cfg(feature = "command-userdata")]
            list.set_userdata(tag.unwrap_or(0));
            let Some(cmd) = commands.next() else { break };
            if let Command::Custom { rect, id } = cmd {
                custom(&mut list, Rect::new(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32), id);
            } else {
                list.add_command(&cmd, fonts);
            }
        }
        let res = list.result();
        let batches = list.batches();
        if !res.is_success() {
            warn!("convert dropped geometry: {:?}", res);
        }
        self.draw_batches = batches;
        res
    }

    /// Draw commands produced by the last [`Context::convert`] into `cmds`.
    pub fn draw_commands<'b>(&self, cmds: &'b Buffer) -> DrawCommands<'b> { DrawCommands::new(cmds, self.draw_batches) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };

    struct Mesh {
        cmds: Buffer,
        vertices: Buffer,
        elements: Buffer,
    }

    impl Mesh {
        fn new() -> Self { Self { cmds: Buffer::new(1024), vertices: Buffer::new(1024), elements: Buffer::new(1024) } }

        fn list(&mut self, aa: AntiAliasing) -> DrawList<'_> {
            let config = ConvertConfig { line_aa: aa, shape_aa: aa, ..ConvertConfig::default() };
            DrawList::new(config, &mut self.cmds, &mut self.vertices, &mut self.elements)
        }
    }

    fn square() -> [Vec2; 4] { [vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 10.0), vec2(0.0, 10.0)] }

    #[test]
    fn anti_aliased_convex_fill_counts() {
        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::On);
        square().into_iter().for_each(|p| list.path_line_to(p));
        list.path_fill(RED);
        assert_eq!(list.vertex_count(), 8);
        assert_eq!(list.element_count(), 2 * 3 + 4 * 6);
        let cmds: Vec<_> = list.commands().collect();
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].elem_count, 30);
    }

    #[test]
    fn plain_convex_fill_is_a_fan() {
        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::Off);
        list.fill_poly_convex(&square(), RED, AntiAliasing::Off);
        assert_eq!(list.vertex_count(), 4);
        assert_eq!(list.element_count(), 6);
        drop(list);
        let ids: Vec<u16> = (0..6).map(|i| mesh.elements.read(i * INDEX_SIZE)).collect();
        assert_eq!(ids, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn stroke_counts_per_mode() {
        let pts = [vec2(0.0, 0.0), vec2(10.0, 0.0), vec2(10.0, 10.0)];

        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::On);
        list.stroke_poly_line(&pts, RED, Stroke::Open, 1.0, AntiAliasing::On);
        assert_eq!((list.vertex_count(), list.element_count()), (9, 2 * 12));

        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::On);
        list.stroke_poly_line(&pts, RED, Stroke::Closed, 3.0, AntiAliasing::On);
        assert_eq!((list.vertex_count(), list.element_count()), (12, 3 * 18));

        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::Off);
        list.stroke_poly_line(&pts, RED, Stroke::Open, 2.0, AntiAliasing::Off);
        assert_eq!((list.vertex_count(), list.element_count()), (8, 12));
    }

    #[test]
    fn thin_stroke_feathers_with_transparent_edges() {
        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::On);
        list.stroke_line(vec2(0.0, 0.0), vec2(10.0, 0.0), RED, 1.0);
        drop(list);
        let v: Vec<Vertex> = (0..6).map(|i| mesh.vertices.read(i * VERTEX_SIZE)).collect();
        assert_eq!(v[0].color(), RED);
        assert_eq!(v[1].color().a, 0);
        assert_eq!(v[2].color().a, 0);
        // the fringe sits one pixel off the line
        approx::assert_relative_eq!(v[1].position().y, -1.0);
        approx::assert_relative_eq!(v[2].position().y, 1.0);
    }

    #[test]
    fn degenerate_input_draws_nothing() {
        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::On);
        list.stroke_poly_line(&[vec2(1.0, 1.0)], RED, Stroke::Open, 1.0, AntiAliasing::On);
        list.fill_poly_convex(&[vec2(0.0, 0.0), vec2(1.0, 1.0)], RED, AntiAliasing::On);
        list.fill_circle(vec2(5.0, 5.0), 0.0, RED, 12);
        list.fill_rect(rect(0.0, 0.0, 10.0, 10.0), Color { a: 0, ..RED }, 0.0);
        list.stroke_line(vec2(0.0, 0.0), vec2(5.0, 5.0), Color { a: 0, ..RED }, 1.0);
        assert_eq!(list.vertex_count(), 0);
        assert_eq!(list.element_count(), 0);
        assert!(list.result().is_success());
    }

    #[test]
    fn rounded_rect_uses_sixteen_corner_points() {
        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::Off);
        list.fill_rect(rect(0.0, 0.0, 40.0, 20.0), RED, 4.0);
        assert_eq!(list.vertex_count(), 16);
        assert_eq!(list.element_count(), 14 * 3);
    }

    #[test]
    fn empty_batches_are_retargeted() {
        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::Off);
        list.add_clip(rect(0.0, 0.0, 50.0, 50.0));
        list.add_clip(rect(10.0, 10.0, 20.0, 20.0));
        list.push_image(TextureId(3));
        list.add_image(Image::new(TextureId(3)), rect(0.0, 0.0, 8.0, 8.0), RED);
        list.add_image(Image::new(TextureId(4)), rect(0.0, 0.0, 8.0, 8.0), RED);
        let cmds: Vec<_> = list.commands().collect();
        // first clip was empty when the second arrived, so it took the new rect as well
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0].elem_count, 0);
        assert_eq!(cmds[0].clip_rect, rect(10.0, 10.0, 20.0, 20.0));
        assert_eq!((cmds[1].texture, cmds[1].elem_count), (TextureId(3), 6));
        assert_eq!((cmds[2].texture, cmds[2].elem_count), (TextureId(4), 6));
        assert_eq!(cmds[2].clip_rect, rect(10.0, 10.0, 20.0, 20.0));
    }

    #[test]
    fn sub_image_maps_its_region() {
        let mut mesh = Mesh::new();
        let mut list = mesh.list(AntiAliasing::Off);
        list.add_image(Image::sub_image(TextureId(1), 100, 50, [10, 5, 20, 10]), rect(0.0, 0.0, 20.0, 10.0), RED);
        drop(list);
        let first: Vertex = mesh.vertices.read(0);
        let third: Vertex = mesh.vertices.read(2 * VERTEX_SIZE);
        assert_eq!(first.tex_coord(), vec2(0.1, 0.1));
        assert_eq!(third.tex_coord(), vec2(0.3, 0.3));
    }

    #[test]
    fn fixed_vertex_buffer_reports_full() {
        let mut cmds = Buffer::new(1024);
        let mut vertices = Buffer::fixed(VERTEX_SIZE * 4);
        let mut elements = Buffer::new(1024);
        let mut list = DrawList::new(ConvertConfig::default(), &mut cmds, &mut vertices, &mut elements);
        list.fill_rect_multi_color(rect(0.0, 0.0, 4.0, 4.0), RED, RED, RED, RED);
        assert!(list.result().is_success());
        list.fill_rect_multi_color(rect(0.0, 0.0, 4.0, 4.0), RED, RED, RED, RED);
        assert_eq!(list.result(), ConvertResult::VERTEX_BUFFER_FULL);
        assert_eq!(list.vertex_count(), 4);
    }

    #[test]
    fn full_element_buffer_leaves_vertices_untouched() {
        let mut cmds = Buffer::new(1024);
        let mut vertices = Buffer::new(1024);
        let mut elements = Buffer::fixed(INDEX_SIZE * 4);
        let mut list = DrawList::new(ConvertConfig::default(), &mut cmds, &mut vertices, &mut elements);
        list.fill_rect_multi_color(rect(0.0, 0.0, 4.0, 4.0), RED, RED, RED, RED);
        assert_eq!(list.result(), ConvertResult::ELEMENT_BUFFER_FULL);
        assert_eq!((list.vertex_count(), list.element_count()), (0, 0));
        assert_eq!(list.commands().map(|c| c.elem_count).sum::<u32>(), 0);
        drop(list);
        assert_eq!(vertices.allocated(), 0);
    }

    #[test]
    fn convert_turns_a_window_into_batches() {
        use crate::test_font::TestFont;
        use std::rc::Rc;

        let mut ctx = Context::new(Rc::new(TestFont));
        ctx.frame(|ctx| {
            if ctx.begin("w", rect(0.0, 0.0, 200.0, 100.0), PanelFlags::BORDER) {
                ctx.layout_row_dynamic(20.0, 1);
                ctx.label("hi", TextAlign::TEXT_LEFT);
            }
            ctx.end();
        });
        let (mut cmds, mut vertices, mut elements) = (Buffer::default(), Buffer::default(), Buffer::default());
        let res = ctx.convert(&mut cmds, &mut vertices, &mut elements, &ConvertConfig::default());
        assert!(res.is_success());

        let batches: Vec<_> = ctx.draw_commands(&cmds).collect();
        assert!(!batches.is_empty());
        let total: u32 = batches.iter().map(|c| c.elem_count).sum();
        assert_eq!(total as usize * INDEX_SIZE, elements.allocated());
        assert!(batches.iter().any(|c| c.texture == TextureId(7) && c.elem_count == 12));
        assert_eq!(vertices.allocated() % VERTEX_SIZE, 0);
    }
}
