use std::collections::HashMap;

use crate::{
    assets::pixbuf::PixelBuf,
    foundation::color::{self, Rgba},
    foundation::error::{GessoError, GessoResult},
    foundation::geom::IntRect,
    gl::device::{
        BlendMode, BlendQuad, Device, DrawParams, FramebufferId, PointVertex, TexFbo, TexInfo,
        TextureId,
    },
};

/// Configuration for the software reference device.
#[derive(Debug, Clone, Copy)]
pub struct SoftDeviceOpts {
    /// Largest texture dimension reported to callers.
    pub max_texture_size: u32,
    /// Optional budget on total live texture bytes (logical RGBA8 bytes);
    /// allocations beyond it fail with [`GessoError::Exhausted`].
    pub max_total_bytes: Option<usize>,
}

impl Default for SoftDeviceOpts {
    fn default() -> Self {
        Self {
            max_texture_size: 4096,
            max_total_bytes: None,
        }
    }
}

struct SoftTex {
    width: u32,
    height: u32,
    texels: Vec<Rgba>,
}

impl SoftTex {
    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + x as usize)
    }

    fn get(&self, x: i32, y: i32) -> Rgba {
        self.idx(x, y)
            .map_or(Rgba::transparent(), |i| self.texels[i])
    }
}

/// Software implementation of the [`Device`] contract.
///
/// Textures are CPU-resident f32 RGBA (straight alpha). The shader math here
/// is the behavioral reference for hardware backends: nearest-neighbor
/// sampling, per-fragment gradient interpolation, HSL hue rotation, and the
/// source-alpha-weighted blend
/// `co1 = src.a * opacity; co2 = dst.a * (1 - co1)`.
pub struct SoftDevice {
    opts: SoftDeviceOpts,
    textures: HashMap<u32, SoftTex>,
    next_id: u32,
    live_bytes: usize,
}

impl SoftDevice {
    pub fn new(opts: SoftDeviceOpts) -> Self {
        Self {
            opts,
            textures: HashMap::new(),
            next_id: 1,
            live_bytes: 0,
        }
    }

    /// Number of currently live textures, for leak assertions in tests.
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    fn tex(&self, id: TextureId) -> &SoftTex {
        self.textures.get(&id.0).expect("live texture handle")
    }

    fn tex_mut(&mut self, id: TextureId) -> &mut SoftTex {
        self.textures.get_mut(&id.0).expect("live texture handle")
    }

    fn clip_of(&self, target: TexInfo, params: DrawParams) -> IntRect {
        let mut clip = target.rect().intersect(params.viewport);
        if let Some(scissor) = params.scissor {
            clip = clip.intersect(scissor);
        }
        clip
    }

    fn write(&mut self, target: TexInfo, writes: Vec<(i32, i32, Rgba)>) {
        let tex = self.tex_mut(target.tex);
        for (x, y, c) in writes {
            if let Some(i) = tex.idx(x, y) {
                tex.texels[i] = c;
            }
        }
    }
}

/// Straight-alpha "over" for the fixed-function `BlendMode::Normal` path.
fn over(dst: Rgba, src: Rgba) -> Rgba {
    let ao = src.a + dst.a * (1.0 - src.a);
    if ao <= 0.0 {
        return Rgba::transparent();
    }
    Rgba::new(
        (src.r * src.a + dst.r * dst.a * (1.0 - src.a)) / ao,
        (src.g * src.a + dst.g * dst.a * (1.0 - src.a)) / ao,
        (src.b * src.a + dst.b * dst.a * (1.0 - src.a)) / ao,
        ao,
    )
}

fn apply_blend(mode: BlendMode, dst: Rgba, src: Rgba) -> Rgba {
    match mode {
        BlendMode::None => src,
        BlendMode::Normal => over(dst, src),
    }
}

/// The blend shader's per-fragment formula: source weighted by its own alpha
/// times `opacity`, composed with the snapshotted destination.
fn blend_composite(dst: Rgba, src: Rgba, opacity: f32) -> Rgba {
    let co1 = src.a * opacity;
    let co2 = dst.a * (1.0 - co1);
    let ao = co1 + co2;
    if ao <= 0.0 {
        return Rgba::transparent();
    }
    Rgba::new(
        (src.r * co1 + dst.r * co2) / ao,
        (src.g * co1 + dst.g * co2) / ao,
        (src.b * co1 + dst.b * co2) / ao,
        ao,
    )
}

fn sample_nearest(tex: &SoftTex, u: f32, v: f32) -> Rgba {
    let x = (u * tex.width as f32).floor() as i32;
    let y = (v * tex.height as f32).floor() as i32;
    tex.get(
        x.clamp(0, tex.width as i32 - 1),
        y.clamp(0, tex.height as i32 - 1),
    )
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    Rgba::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

impl Device for SoftDevice {
    fn max_texture_size(&self) -> u32 {
        self.opts.max_texture_size
    }

    fn create_texture(&mut self, width: u32, height: u32) -> GessoResult<TexFbo> {
        if width > self.opts.max_texture_size || height > self.opts.max_texture_size {
            return Err(GessoError::exhausted(format!(
                "{width}x{height} exceeds max texture size {}",
                self.opts.max_texture_size
            )));
        }

        let bytes = (width as usize).saturating_mul(height as usize).saturating_mul(4);
        if let Some(budget) = self.opts.max_total_bytes
            && self.live_bytes.saturating_add(bytes) > budget
        {
            return Err(GessoError::exhausted(format!(
                "texture budget exceeded ({} + {bytes} > {budget} bytes)",
                self.live_bytes
            )));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.textures.insert(
            id,
            SoftTex {
                width,
                height,
                texels: vec![Rgba::transparent(); (width as usize) * (height as usize)],
            },
        );
        self.live_bytes += bytes;

        Ok(TexFbo {
            tex: TextureId(id),
            fbo: FramebufferId(id),
            width,
            height,
        })
    }

    fn delete_texture(&mut self, tex: TexFbo) {
        if self.textures.remove(&tex.tex.0).is_some() {
            let bytes = (tex.width as usize) * (tex.height as usize) * 4;
            self.live_bytes = self.live_bytes.saturating_sub(bytes);
        }
    }

    fn upload(&mut self, target: TexInfo, pixels: &PixelBuf) {
        let tex = self.tex_mut(target.tex);
        let w = pixels.width().min(tex.width);
        let h = pixels.height().min(tex.height);
        for y in 0..h {
            for x in 0..w {
                let i = (y as usize) * (tex.width as usize) + x as usize;
                tex.texels[i] = Rgba::from_rgba8(pixels.pixel(x, y));
            }
        }
    }

    fn read_pixel(&self, source: TexInfo, x: i32, y: i32) -> Rgba {
        self.tex(source.tex).get(x, y)
    }

    fn clear(&mut self, target: TexInfo, scissor: Option<IntRect>, color: Rgba) {
        let region = scissor
            .map_or(target.rect(), |s| s.intersect(target.rect()));
        let tex = self.tex_mut(target.tex);
        for y in region.y..region.bottom() {
            for x in region.x..region.right() {
                if let Some(i) = tex.idx(x, y) {
                    tex.texels[i] = color;
                }
            }
        }
    }

    fn copy_rect(
        &mut self,
        source: TexInfo,
        src_rect: IntRect,
        target: TexInfo,
        dst_x: i32,
        dst_y: i32,
    ) {
        let src_tex = self.tex(source.tex);
        let clamped = src_rect.intersect(source.rect());
        let mut writes = Vec::with_capacity((clamped.w.max(0) * clamped.h.max(0)) as usize);
        for y in clamped.y..clamped.bottom() {
            for x in clamped.x..clamped.right() {
                writes.push((
                    dst_x + (x - src_rect.x),
                    dst_y + (y - src_rect.y),
                    src_tex.get(x, y),
                ));
            }
        }
        self.write(target, writes);
    }

    fn draw_points(&mut self, target: TexInfo, points: &[PointVertex], params: DrawParams) {
        let clip = self.clip_of(target, params);
        let mut writes = Vec::with_capacity(points.len());
        {
            let tex = self.tex(target.tex);
            // Insertion order preserved: later points at the same position
            // overwrite earlier ones in the write list.
            for p in points {
                let x = p.pos.x.floor() as i32;
                let y = p.pos.y.floor() as i32;
                if clip.contains(x, y) {
                    writes.push((x, y, apply_blend(params.blend, tex.get(x, y), p.color)));
                }
            }
        }
        self.write(target, writes);
    }

    fn draw_blend_quad(
        &mut self,
        target: TexInfo,
        quad: BlendQuad,
        opacity: f32,
        params: DrawParams,
    ) {
        let dx = quad.dest_rect.x.round() as i32;
        let dy = quad.dest_rect.y.round() as i32;
        let dw = quad.dest_rect.w.round() as i32;
        let dh = quad.dest_rect.h.round() as i32;
        if dw <= 0 || dh <= 0 {
            return;
        }

        let region = IntRect::new(dx, dy, dw, dh).intersect(self.clip_of(target, params));
        let opacity = opacity.clamp(0.0, 1.0);

        let mut writes = Vec::with_capacity((region.w.max(0) * region.h.max(0)) as usize);
        {
            let src_tex = self.tex(quad.source.tex);
            let snap_tex = self.tex(quad.dest_snapshot.tex);
            let dst_tex = self.tex(target.tex);
            for y in region.y..region.bottom() {
                for x in region.x..region.right() {
                    let fx = (x - dx) as f32 + 0.5;
                    let fy = (y - dy) as f32 + 0.5;
                    let u = quad.src_sub.x + (fx / dw as f32) * quad.src_sub.w;
                    let v = quad.src_sub.y + (fy / dh as f32) * quad.src_sub.h;
                    let src = sample_nearest(src_tex, u, v);
                    let snap = snap_tex.get(x - dx, y - dy);
                    let out = blend_composite(snap, src, opacity);
                    writes.push((x, y, apply_blend(params.blend, dst_tex.get(x, y), out)));
                }
            }
        }
        self.write(target, writes);
    }

    fn draw_gradient_quad(
        &mut self,
        target: TexInfo,
        rect: IntRect,
        corners: [Rgba; 4],
        params: DrawParams,
    ) {
        if rect.is_empty() {
            return;
        }
        let region = rect.intersect(self.clip_of(target, params));
        let [tl, tr, br, bl] = corners;

        let mut writes = Vec::with_capacity((region.w.max(0) * region.h.max(0)) as usize);
        {
            let dst_tex = self.tex(target.tex);
            for y in region.y..region.bottom() {
                for x in region.x..region.right() {
                    let fx = ((x - rect.x) as f32 + 0.5) / rect.w as f32;
                    let fy = ((y - rect.y) as f32 + 0.5) / rect.h as f32;
                    let top = lerp(tl, tr, fx);
                    let bottom = lerp(bl, br, fx);
                    let out = lerp(top, bottom, fy);
                    writes.push((x, y, apply_blend(params.blend, dst_tex.get(x, y), out)));
                }
            }
        }
        self.write(target, writes);
    }

    fn draw_hue_quad(
        &mut self,
        source: TexInfo,
        target: TexInfo,
        hue_radians: f32,
        params: DrawParams,
    ) {
        let region = self.clip_of(target, params);
        let mut writes = Vec::with_capacity((region.w.max(0) * region.h.max(0)) as usize);
        {
            let src_tex = self.tex(source.tex);
            for y in region.y..region.bottom() {
                for x in region.x..region.right() {
                    let out = color::rotate_hue_radians(src_tex.get(x, y), hue_radians);
                    writes.push((x, y, out));
                }
            }
        }
        self.write(target, writes);
    }
}
