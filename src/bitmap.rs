use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    assets::decode::decode_image,
    assets::pixbuf::PixelBuf,
    batch::PointBatch,
    compositor,
    foundation::color::Rgba,
    foundation::error::{GessoError, GessoResult},
    foundation::geom::IntRect,
    gl::device::TexInfo,
    gl::pool::TexLease,
    graphics::GraphicsRef,
    text::raster::{FontStyle, TextAlign},
};

/// Backing store of a surface, fixed at construction.
enum Backing {
    /// Leased GPU texture+framebuffer.
    Gpu(TexLease),
    /// CPU-resident pixels for images beyond the device's texture limits.
    /// Such surfaces are sampling sources only; every GPU-path operation
    /// rejects them.
    Oversized(PixelBuf),
}

struct Inner {
    backing: Backing,
    /// Interior-mutable so read paths (`get_pixel`, `duplicate`) can flush.
    batch: RefCell<PointBatch>,
    font: FontStyle,
    revision: Cell<u64>,
}

impl Inner {
    fn gpu(&self, op: &str) -> GessoResult<TexInfo> {
        match &self.backing {
            Backing::Gpu(lease) => Ok(lease.info()),
            Backing::Oversized(_) => Err(GessoError::oversized(op)),
        }
    }

    fn touch(&self) {
        self.revision.set(self.revision.get() + 1);
    }
}

/// A mutable 2D raster canvas backed by a pooled GPU texture, or by CPU
/// pixels when the image exceeds the device's maximum texture size.
///
/// All drawing goes through the shared [`crate::Graphics`] context the
/// surface was created with. Single-pixel writes are batched and committed
/// lazily; every operation that reads committed pixels flushes first, so a
/// `set_pixel` is always visible to a following `get_pixel`.
pub struct Bitmap {
    gfx: GraphicsRef,
    inner: Option<Inner>,
}

impl Bitmap {
    fn with_backing(gfx: &GraphicsRef, backing: Backing, font: FontStyle) -> Self {
        Self {
            gfx: Rc::clone(gfx),
            inner: Some(Inner {
                backing,
                batch: RefCell::new(PointBatch::default()),
                font,
                revision: Cell::new(0),
            }),
        }
    }

    fn inner(&self) -> GessoResult<&Inner> {
        self.inner.as_ref().ok_or(GessoError::Disposed)
    }

    /// Create a fresh surface cleared to fully transparent.
    pub fn new(gfx: &GraphicsRef, width: i32, height: i32) -> GessoResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(GessoError::InvalidDimensions(width, height));
        }

        let lease = TexLease::request(gfx.pool(), width as u32, height as u32)?;
        compositor::clear(gfx, lease.info(), Rgba::transparent());
        Ok(Self::with_backing(
            gfx,
            Backing::Gpu(lease),
            gfx.default_font(),
        ))
    }

    /// Decode image bytes and upload, falling back to a CPU-resident surface
    /// when a dimension exceeds the device's maximum texture size.
    pub fn from_bytes(gfx: &GraphicsRef, bytes: &[u8]) -> GessoResult<Self> {
        let pixels = decode_image(bytes)?;
        Self::from_pixels(gfx, pixels)
    }

    /// Wrap already-decoded canonical RGBA8 pixels; same fallback rule as
    /// [`Bitmap::from_bytes`].
    pub fn from_pixels(gfx: &GraphicsRef, pixels: PixelBuf) -> GessoResult<Self> {
        let max = gfx.max_texture_size();
        let backing = if pixels.width() > max || pixels.height() > max {
            tracing::debug!(
                width = pixels.width(),
                height = pixels.height(),
                max,
                "image exceeds max texture size, keeping CPU-resident"
            );
            Backing::Oversized(pixels)
        } else {
            let lease = TexLease::request(gfx.pool(), pixels.width(), pixels.height())?;
            gfx.device().borrow_mut().upload(lease.info(), &pixels);
            Backing::Gpu(lease)
        };
        Ok(Self::with_backing(gfx, backing, gfx.default_font()))
    }

    /// Copy into a fresh lease via a full-rectangle opaque blit.
    pub fn duplicate(&self) -> GessoResult<Self> {
        let inner = self.inner()?;
        let src = inner.gpu("duplicate")?;
        let full = IntRect::of_size(src.width, src.height);

        let lease = TexLease::request(self.gfx.pool(), src.width, src.height)?;
        compositor::flush_points(&self.gfx, src, &mut inner.batch.borrow_mut());
        compositor::stretch_blt(&self.gfx, lease.info(), full, src, full, 1.0)?;
        Ok(Self::with_backing(
            &self.gfx,
            Backing::Gpu(lease),
            inner.font.clone(),
        ))
    }

    /// Release the backing store. Safe to call twice; every other operation
    /// fails with [`GessoError::Disposed`] afterwards.
    pub fn dispose(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("surface disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_none()
    }

    pub fn width(&self) -> GessoResult<u32> {
        let inner = self.inner()?;
        Ok(match &inner.backing {
            Backing::Gpu(lease) => lease.info().width,
            Backing::Oversized(pixels) => pixels.width(),
        })
    }

    pub fn height(&self) -> GessoResult<u32> {
        let inner = self.inner()?;
        Ok(match &inner.backing {
            Backing::Gpu(lease) => lease.info().height,
            Backing::Oversized(pixels) => pixels.height(),
        })
    }

    /// Full-surface rectangle at the origin.
    pub fn rect(&self) -> GessoResult<IntRect> {
        Ok(IntRect::of_size(self.width()?, self.height()?))
    }

    /// 1:1 copy of `src_rect` from `source` to `(x, y)`.
    pub fn blt(
        &mut self,
        x: i32,
        y: i32,
        source: &Bitmap,
        src_rect: IntRect,
        opacity: i32,
    ) -> GessoResult<()> {
        self.stretch_blt(
            IntRect::new(x, y, src_rect.w, src_rect.h),
            source,
            src_rect,
            opacity,
        )
    }

    /// Scaled copy of `src_rect` from `source` into `dest_rect`, blended by
    /// `opacity` in [0, 255] (clamped; 0 draws nothing).
    pub fn stretch_blt(
        &mut self,
        dest_rect: IntRect,
        source: &Bitmap,
        src_rect: IntRect,
        opacity: i32,
    ) -> GessoResult<()> {
        let inner = self.inner()?;
        let target = inner.gpu("stretch_blt")?;
        let src = source.inner()?.gpu("stretch_blt source")?;

        let opacity = opacity.clamp(0, 255);
        if opacity == 0 {
            return Ok(());
        }

        compositor::flush_points(&self.gfx, target, &mut inner.batch.borrow_mut());
        compositor::stretch_blt(
            &self.gfx,
            target,
            dest_rect,
            src,
            src_rect,
            opacity as f32 / 255.0,
        )?;
        inner.touch();
        Ok(())
    }

    /// Fill `rect` with `color` via a scissored clear.
    pub fn fill_rect(&mut self, rect: IntRect, color: Rgba) -> GessoResult<()> {
        let inner = self.inner()?;
        let target = inner.gpu("fill_rect")?;
        compositor::flush_points(&self.gfx, target, &mut inner.batch.borrow_mut());
        compositor::fill_rect(&self.gfx, target, rect, color);
        inner.touch();
        Ok(())
    }

    /// Two-color gradient over `rect`. Vertical runs `color2` at the top
    /// edge to `color1` at the bottom; horizontal runs `color1` at the left
    /// edge to `color2` at the right.
    pub fn gradient_fill_rect(
        &mut self,
        rect: IntRect,
        color1: Rgba,
        color2: Rgba,
        vertical: bool,
    ) -> GessoResult<()> {
        let inner = self.inner()?;
        let target = inner.gpu("gradient_fill_rect")?;
        compositor::flush_points(&self.gfx, target, &mut inner.batch.borrow_mut());
        compositor::gradient_fill(&self.gfx, target, rect, color1, color2, vertical);
        inner.touch();
        Ok(())
    }

    /// Reset the whole surface to fully transparent. Pending batched points
    /// are discarded, not flushed: they would not be visible afterwards.
    pub fn clear(&mut self) -> GessoResult<()> {
        let inner = self.inner()?;
        let target = inner.gpu("clear")?;
        inner.batch.borrow_mut().reset();
        compositor::clear(&self.gfx, target, Rgba::transparent());
        inner.touch();
        Ok(())
    }

    /// Reset `rect` to fully transparent.
    pub fn clear_rect(&mut self, rect: IntRect) -> GessoResult<()> {
        self.fill_rect(rect, Rgba::transparent())
    }

    /// Committed color at `(x, y)`; out-of-bounds reads return transparent.
    /// Flushes pending point writes first.
    pub fn get_pixel(&self, x: i32, y: i32) -> GessoResult<Rgba> {
        let inner = self.inner()?;
        let target = inner.gpu("get_pixel")?;
        if !target.rect().contains(x, y) {
            return Ok(Rgba::transparent());
        }
        compositor::flush_points(&self.gfx, target, &mut inner.batch.borrow_mut());
        Ok(compositor::read_pixel(&self.gfx, target, x, y))
    }

    /// Queue a single-pixel write; committed on the next flush.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) -> GessoResult<()> {
        let inner = self.inner()?;
        inner.gpu("set_pixel")?;
        inner.batch.borrow_mut().append(x, y, color);
        inner.touch();
        Ok(())
    }

    /// Rotate every texel's hue by `degrees` (positive rotates red toward
    /// green). A delta that is 0 modulo 360 is a no-op. The backing lease is
    /// swapped atomically: the new texture is drawn first, then the old lease
    /// returns to the pool.
    pub fn hue_change(&mut self, degrees: i32) -> GessoResult<()> {
        let gfx = Rc::clone(&self.gfx);
        let inner = self.inner.as_mut().ok_or(GessoError::Disposed)?;
        let target = inner.gpu("hue_change")?;

        if degrees.rem_euclid(360) == 0 {
            return Ok(());
        }

        compositor::flush_points(&gfx, target, &mut inner.batch.borrow_mut());
        let fresh = compositor::hue_rotate(&gfx, target, degrees)?;
        if let Backing::Gpu(lease) = &mut inner.backing {
            // Old lease drops here and returns to the pool.
            *lease = fresh;
        }
        inner.touch();
        Ok(())
    }

    /// Render `text` into `rect` with the surface's font style. Empty
    /// strings draw nothing.
    pub fn draw_text(&mut self, rect: IntRect, text: &str, align: TextAlign) -> GessoResult<()> {
        let inner = self.inner()?;
        let target = inner.gpu("draw_text")?;
        if text.is_empty() {
            return Ok(());
        }
        compositor::flush_points(&self.gfx, target, &mut inner.batch.borrow_mut());
        compositor::draw_text(&self.gfx, target, rect, text, align, &inner.font)?;
        inner.touch();
        Ok(())
    }

    /// Pixel extent `text` would occupy at the surface's font style.
    pub fn text_size(&self, text: &str) -> GessoResult<(u32, u32)> {
        let inner = self.inner()?;
        inner.gpu("text_size")?;
        Ok(self.gfx.text().measure(text, &inner.font))
    }

    /// Commit pending batched point writes. Silent no-op when disposed or
    /// CPU-resident.
    pub fn flush(&self) {
        let Some(inner) = self.inner.as_ref() else {
            return;
        };
        if let Backing::Gpu(lease) = &inner.backing {
            compositor::flush_points(&self.gfx, lease.info(), &mut inner.batch.borrow_mut());
        }
    }

    pub fn font(&self) -> GessoResult<FontStyle> {
        Ok(self.inner()?.font.clone())
    }

    pub fn set_font(&mut self, style: FontStyle) -> GessoResult<()> {
        let inner = self.inner.as_mut().ok_or(GessoError::Disposed)?;
        inner.font = style;
        Ok(())
    }

    /// Whether this surface is CPU-resident (image exceeded texture limits).
    pub fn is_oversized(&self) -> bool {
        matches!(
            self.inner.as_ref().map(|i| &i.backing),
            Some(Backing::Oversized(_))
        )
    }

    /// Raw texture handle for collaborating renderers; `None` when disposed
    /// or CPU-resident.
    pub fn gpu_handle(&self) -> Option<TexInfo> {
        match self.inner.as_ref().map(|i| &i.backing) {
            Some(Backing::Gpu(lease)) => Some(lease.info()),
            _ => None,
        }
    }

    /// CPU pixels of an oversized surface, for external sampling paths.
    pub fn pixels(&self) -> Option<&PixelBuf> {
        match self.inner.as_ref().map(|i| &i.backing) {
            Some(Backing::Oversized(pixels)) => Some(pixels),
            _ => None,
        }
    }

    /// Ok on live GPU surfaces and (as a disposal-idempotent probe) on
    /// disposed ones; rejects oversized surfaces.
    pub fn ensure_gpu(&self) -> GessoResult<()> {
        match self.inner.as_ref() {
            None => Ok(()),
            Some(inner) => inner.gpu("ensure_gpu").map(|_| ()),
        }
    }

    /// Monotonic counter bumped by every visible mutation, for change
    /// detection by collaborating renderers.
    pub fn revision(&self) -> u64 {
        self.inner.as_ref().map_or(0, |i| i.revision.get())
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut dbg = f.debug_struct("Bitmap");
        match self.inner.as_ref() {
            None => dbg.field("disposed", &true).finish(),
            Some(inner) => {
                let mode = match &inner.backing {
                    Backing::Gpu(_) => "gpu",
                    Backing::Oversized(_) => "oversized",
                };
                dbg.field("mode", &mode)
                    .field("revision", &inner.revision.get())
                    .finish()
            }
        }
    }
}
