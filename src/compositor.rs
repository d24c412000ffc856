//! Stateless compositing algorithms invoked by [`crate::Bitmap`].
//!
//! Every operation follows the same shape: flush pending point writes (done
//! by the surface before delegating), acquire scratch storage when the draw
//! must read its own destination, open a [`crate::StateScope`] for the
//! viewport/scissor/blend/clear-color it needs, issue one device call, and
//! let the scope drop restore prior state on every exit path.

use crate::{
    batch::PointBatch,
    foundation::color::Rgba,
    foundation::error::GessoResult,
    foundation::geom::{FloatRect, IntRect},
    gl::device::{BlendMode, BlendQuad, TexInfo},
    gl::pool::TexLease,
    graphics::Graphics,
    text::raster::{FontStyle, TextAlign},
};

/// Commit pending batched point writes in one draw and clear the batch.
pub(crate) fn flush_points(gfx: &Graphics, target: TexInfo, batch: &mut PointBatch) {
    if batch.is_empty() {
        return;
    }

    let mut state = gfx.state().borrow_mut();
    let mut scope = state.scope();
    scope.set_viewport(target.rect());
    scope.set_blend(BlendMode::None);
    gfx.device()
        .borrow_mut()
        .draw_points(target, batch.as_slice(), scope.params());
    batch.reset();
}

/// Scissored clear of `rect` to `color`.
pub(crate) fn fill_rect(gfx: &Graphics, target: TexInfo, rect: IntRect, color: Rgba) {
    let mut state = gfx.state().borrow_mut();
    let mut scope = state.scope();
    scope.set_scissor(rect);
    scope.set_clear_color(color);
    gfx.device()
        .borrow_mut()
        .clear(target, scope.scissor(), scope.clear_color());
}

/// Full-surface clear to `color` (no scissor).
pub(crate) fn clear(gfx: &Graphics, target: TexInfo, color: Rgba) {
    let mut state = gfx.state().borrow_mut();
    let mut scope = state.scope();
    scope.set_clear_color(color);
    gfx.device()
        .borrow_mut()
        .clear(target, scope.scissor(), scope.clear_color());
}

/// Per-fragment interpolated two-color fill, blending disabled.
///
/// Vertical assigns `color2` to the top edge and `color1` to the bottom;
/// horizontal assigns `color1` to the left edge and `color2` to the right.
pub(crate) fn gradient_fill(
    gfx: &Graphics,
    target: TexInfo,
    rect: IntRect,
    color1: Rgba,
    color2: Rgba,
    vertical: bool,
) {
    // Corner order: top-left, top-right, bottom-right, bottom-left.
    let corners = if vertical {
        [color2, color2, color1, color1]
    } else {
        [color1, color2, color2, color1]
    };

    let mut state = gfx.state().borrow_mut();
    let mut scope = state.scope();
    scope.set_viewport(target.rect());
    scope.set_blend(BlendMode::None);
    gfx.device()
        .borrow_mut()
        .draw_gradient_quad(target, rect, corners, scope.params());
}

/// Rectangle-to-rectangle copy with opacity blending and independent
/// per-axis scaling.
///
/// The destination rectangle's current contents are snapshotted into a
/// scratch texture first, so the blend shader can read "what's already
/// there" without aliasing its own writes.
#[tracing::instrument(skip_all)]
pub(crate) fn stretch_blt(
    gfx: &Graphics,
    target: TexInfo,
    dest_rect: IntRect,
    source: TexInfo,
    src_rect: IntRect,
    opacity: f32,
) -> GessoResult<()> {
    if dest_rect.is_empty() || src_rect.is_empty() {
        return Ok(());
    }

    let snapshot = gfx
        .scratch()
        .borrow_mut()
        .acquire(dest_rect.w as u32, dest_rect.h as u32)?;

    let src_sub = FloatRect::normalized(src_rect, source.width, source.height);

    let mut device = gfx.device().borrow_mut();
    device.copy_rect(target, dest_rect, snapshot, 0, 0);

    let mut state = gfx.state().borrow_mut();
    let mut scope = state.scope();
    scope.set_viewport(target.rect());
    scope.set_blend(BlendMode::None);
    device.draw_blend_quad(
        target,
        BlendQuad {
            source,
            dest_snapshot: snapshot,
            src_sub,
            dest_rect: FloatRect::from_int(dest_rect),
        },
        opacity,
        scope.params(),
    );
    Ok(())
}

/// Draw the full surface through the hue shader into a fresh lease.
///
/// `degrees` is normalized into [0, 360); the shader uniform carries the
/// sign-inverted radian value (the color model rotates opposite to the
/// user-facing convention). The caller swaps its backing lease for the
/// returned one.
pub(crate) fn hue_rotate(
    gfx: &Graphics,
    source: TexInfo,
    degrees: i32,
) -> GessoResult<TexLease> {
    let deg = degrees.rem_euclid(360);
    let lease = TexLease::request(gfx.pool(), source.width, source.height)?;
    let hue_adj = -(std::f32::consts::TAU / 360.0) * deg as f32;
    tracing::debug!(deg, "hue rotation into fresh lease");

    let mut state = gfx.state().borrow_mut();
    let mut scope = state.scope();
    scope.set_viewport(lease.info().rect());
    scope.set_blend(BlendMode::None);
    gfx.device()
        .borrow_mut()
        .draw_hue_quad(source, lease.info(), hue_adj, scope.params());
    Ok(lease)
}

/// Rasterize and composite a string into `rect`.
///
/// Horizontal placement comes from `align` (center never moves left of the
/// rectangle's left edge), vertical placement centers in the rectangle, and
/// strings wider than the rectangle are squeezed horizontally rather than
/// clipped. Opacity comes from the style color's alpha channel.
#[tracing::instrument(skip_all)]
pub(crate) fn draw_text(
    gfx: &Graphics,
    target: TexInfo,
    rect: IntRect,
    text: &str,
    align: TextAlign,
    style: &FontStyle,
) -> GessoResult<()> {
    if text.is_empty() {
        return Ok(());
    }

    let glyphs = gfx.text().render(text, style)?;
    let (tw, th) = (glyphs.width(), glyphs.height());
    if tw == 0 || th == 0 {
        return Ok(());
    }

    let mut align_x = match align {
        TextAlign::Left => rect.x,
        TextAlign::Center => rect.x + (rect.w - tw as i32) / 2,
        TextAlign::Right => rect.x + rect.w - tw as i32,
    };
    // Centered text may overflow to the right, never to the left.
    if align_x < rect.x {
        align_x = rect.x;
    }
    let align_y = rect.y + (rect.h - th as i32) / 2;

    let squeeze = (rect.w as f32 / tw as f32).min(1.0);
    let pos = FloatRect::new(
        align_x as f32,
        align_y as f32,
        tw as f32 * squeeze,
        th as f32,
    );
    let snap_rect = IntRect::new(align_x, align_y, pos.w.round() as i32, th as i32);
    if snap_rect.is_empty() {
        return Ok(());
    }

    let snapshot = gfx
        .scratch()
        .borrow_mut()
        .acquire(snap_rect.w as u32, snap_rect.h as u32)?;
    let upload = gfx.upload().borrow_mut().ensure(tw, th)?;

    let mut device = gfx.device().borrow_mut();
    device.copy_rect(target, snap_rect, snapshot, 0, 0);
    device.upload(upload, &glyphs);

    let src_sub = FloatRect::new(
        0.0,
        0.0,
        tw as f32 / upload.width as f32,
        th as f32 / upload.height as f32,
    );

    let mut state = gfx.state().borrow_mut();
    let mut scope = state.scope();
    scope.set_viewport(target.rect());
    scope.set_blend(BlendMode::None);
    device.draw_blend_quad(
        target,
        BlendQuad {
            source: upload,
            dest_snapshot: snapshot,
            src_sub,
            dest_rect: pos,
        },
        style.color.a,
        scope.params(),
    );
    Ok(())
}

/// Read one committed texel.
pub(crate) fn read_pixel(gfx: &Graphics, target: TexInfo, x: i32, y: i32) -> Rgba {
    let mut state = gfx.state().borrow_mut();
    let mut scope = state.scope();
    scope.set_viewport(target.rect());
    gfx.device().borrow().read_pixel(target, x, y)
}
