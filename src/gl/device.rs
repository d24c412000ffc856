use crate::{
    assets::pixbuf::PixelBuf,
    foundation::color::Rgba,
    foundation::error::GessoResult,
    foundation::geom::{FloatRect, IntRect, Vec2},
};

/// Opaque texture handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Opaque framebuffer handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FramebufferId(pub u32);

/// Owning descriptor for a texture+framebuffer pair.
///
/// Deliberately neither `Clone` nor `Copy`: exactly one owner (a pool bucket,
/// a lease, or a scratch cache) holds a `TexFbo` at a time, so two live
/// surfaces can never alias one texture. Pass [`TexInfo`] views to draw calls.
#[derive(Debug)]
pub struct TexFbo {
    pub tex: TextureId,
    pub fbo: FramebufferId,
    pub width: u32,
    pub height: u32,
}

impl TexFbo {
    /// Borrowed, copyable view for use in draw calls.
    pub fn info(&self) -> TexInfo {
        TexInfo {
            tex: self.tex,
            fbo: self.fbo,
            width: self.width,
            height: self.height,
        }
    }
}

/// Copyable view of a [`TexFbo`] used as a draw-call argument.
#[derive(Clone, Copy, Debug)]
pub struct TexInfo {
    pub tex: TextureId,
    pub fbo: FramebufferId,
    pub width: u32,
    pub height: u32,
}

impl TexInfo {
    pub fn rect(&self) -> IntRect {
        IntRect::of_size(self.width, self.height)
    }
}

/// Fixed-function blend mode applied around a draw.
///
/// The compositing shaders compute their own blending, so every internal draw
/// runs with `BlendMode::None`; `Normal` is the ambient base state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    None,
    Normal,
}

/// Snapshot of the render state a draw call runs under, produced by a
/// [`crate::StateScope`].
#[derive(Clone, Copy, Debug)]
pub struct DrawParams {
    pub viewport: IntRect,
    pub scissor: Option<IntRect>,
    pub blend: BlendMode,
}

/// One pending pixel write: position (texel-centered) and color.
#[derive(Clone, Copy, Debug)]
pub struct PointVertex {
    pub pos: Vec2,
    pub color: Rgba,
}

/// Inputs to the blend shader: a source layer, the snapshotted
/// "destination so far", the normalized source sub-rect to sample, and the
/// placement rectangle in the target.
#[derive(Clone, Copy, Debug)]
pub struct BlendQuad {
    pub source: TexInfo,
    pub dest_snapshot: TexInfo,
    /// Region of `source` to sample, in its [0, 1] coordinate space.
    pub src_sub: FloatRect,
    /// Placement in the target, sub-texel precision (text squeeze).
    pub dest_rect: FloatRect,
}

/// GPU device boundary.
///
/// The shader set (solid-color, blend, hue) is expressed as typed draw entry
/// points; shader compilation and uniform binding live behind this trait.
/// The shipped implementation is [`crate::SoftDevice`]; a hardware backend
/// implements the same contract.
pub trait Device {
    /// Largest texture dimension the device supports.
    fn max_texture_size(&self) -> u32;

    /// Allocate a texture+framebuffer pair, cleared to transparent.
    fn create_texture(&mut self, width: u32, height: u32) -> GessoResult<TexFbo>;

    /// Free a texture+framebuffer pair.
    fn delete_texture(&mut self, tex: TexFbo);

    /// Upload pixels into the region at the target's origin sized to the
    /// buffer; the rest of the target is untouched.
    fn upload(&mut self, target: TexInfo, pixels: &PixelBuf);

    /// Read one committed texel; out-of-bounds reads return transparent.
    fn read_pixel(&self, source: TexInfo, x: i32, y: i32) -> Rgba;

    /// Clear the target (restricted to `scissor` when present) to `color`.
    fn clear(&mut self, target: TexInfo, scissor: Option<IntRect>, color: Rgba);

    /// Framebuffer-to-framebuffer rectangle copy (no blending, no scaling).
    fn copy_rect(
        &mut self,
        source: TexInfo,
        src_rect: IntRect,
        target: TexInfo,
        dst_x: i32,
        dst_y: i32,
    );

    /// Solid-color shader: draw batched points in insertion order.
    fn draw_points(&mut self, target: TexInfo, points: &[PointVertex], params: DrawParams);

    /// Blend shader: composite `quad.source` over `quad.dest_snapshot` into
    /// the target at `quad.dest_rect`, weighted by source alpha times
    /// `opacity` in [0, 1].
    fn draw_blend_quad(
        &mut self,
        target: TexInfo,
        quad: BlendQuad,
        opacity: f32,
        params: DrawParams,
    );

    /// Solid-color shader with per-vertex colors: corner order is top-left,
    /// top-right, bottom-right, bottom-left, interpolated per fragment.
    fn draw_gradient_quad(
        &mut self,
        target: TexInfo,
        rect: IntRect,
        corners: [Rgba; 4],
        params: DrawParams,
    );

    /// Hue shader: draw `source` into the target rotating each texel's hue.
    /// The uniform is the sign-inverted radian angle (negative rotates
    /// forward through the spectrum).
    fn draw_hue_quad(
        &mut self,
        source: TexInfo,
        target: TexInfo,
        hue_radians: f32,
        params: DrawParams,
    );
}
