use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    foundation::error::GessoResult,
    gl::device::{Device, TexFbo, TexInfo},
};

/// Shared single-threaded device handle.
pub type SharedDevice = Rc<RefCell<dyn Device>>;

/// Pool configuration for retained texture+framebuffer pairs.
#[derive(Debug, Clone, Copy)]
pub struct TexPoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained textures per (w,h) bucket.
    pub max_per_bucket: usize,
}

impl Default for TexPoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 64 * 1024 * 1024,
            max_per_bucket: 8,
        }
    }
}

/// Counters exposed for diagnostics and tests.
#[derive(Debug, Default, Clone)]
pub struct TexPoolStats {
    pub retained_textures: usize,
    pub retained_bytes: usize,
    pub alloc_textures: u64,
    pub reused: u64,
    pub dropped_on_release: u64,
}

fn texel_bytes(width: u32, height: u32) -> usize {
    (width as usize).saturating_mul(height as usize).saturating_mul(4)
}

/// Bounded freelist of texture+framebuffer pairs, keyed by exact size.
///
/// Request/release must pair exactly once per owned texture; [`TexLease`]
/// enforces the pairing through its destructor.
pub struct TexturePool {
    device: SharedDevice,
    opts: TexPoolOpts,
    stats: TexPoolStats,
    buckets: HashMap<(u32, u32), Vec<TexFbo>>,
}

impl TexturePool {
    pub fn new(device: SharedDevice, opts: TexPoolOpts) -> Self {
        Self {
            device,
            opts,
            stats: TexPoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    pub fn stats(&self) -> TexPoolStats {
        self.stats.clone()
    }

    /// Hand out a texture of exactly `width`x`height`, reusing a retained one
    /// when available.
    pub fn request(&mut self, width: u32, height: u32) -> GessoResult<TexFbo> {
        if let Some(bucket) = self.buckets.get_mut(&(width, height))
            && let Some(tex) = bucket.pop()
        {
            self.stats.reused += 1;
            self.stats.retained_textures = self.stats.retained_textures.saturating_sub(1);
            self.stats.retained_bytes = self
                .stats
                .retained_bytes
                .saturating_sub(texel_bytes(width, height));
            tracing::debug!(width, height, "texture pool reuse");
            // Retained textures carry stale content; hand them out cleared
            // like a fresh allocation.
            self.device.borrow_mut().clear(
                tex.info(),
                None,
                crate::foundation::color::Rgba::transparent(),
            );
            return Ok(tex);
        }

        let tex = self.device.borrow_mut().create_texture(width, height)?;
        self.stats.alloc_textures += 1;
        tracing::debug!(width, height, "texture pool alloc");
        Ok(tex)
    }

    /// Return a texture to the pool; over-cap returns free the texture.
    pub fn release(&mut self, tex: TexFbo) {
        let bytes = texel_bytes(tex.width, tex.height);

        if self.opts.max_pool_bytes == 0
            || self.opts.max_per_bucket == 0
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            self.stats.dropped_on_release += 1;
            self.device.borrow_mut().delete_texture(tex);
            return;
        }

        let bucket = self.buckets.entry((tex.width, tex.height)).or_default();
        if bucket.len() >= self.opts.max_per_bucket {
            self.stats.dropped_on_release += 1;
            self.device.borrow_mut().delete_texture(tex);
            return;
        }

        tracing::debug!(width = tex.width, height = tex.height, "texture pool retain");
        bucket.push(tex);
        self.stats.retained_textures += 1;
        self.stats.retained_bytes += bytes;
    }
}

impl Drop for TexturePool {
    fn drop(&mut self) {
        let mut device = self.device.borrow_mut();
        for (_, bucket) in self.buckets.drain() {
            for tex in bucket {
                device.delete_texture(tex);
            }
        }
    }
}

/// Owning lease on a pooled texture+framebuffer pair.
///
/// Dropping the lease releases the texture back to the pool, so release
/// happens exactly once on disposal or on replacement.
pub struct TexLease {
    pool: Rc<RefCell<TexturePool>>,
    tex: Option<TexFbo>,
}

impl TexLease {
    /// Lease a texture of exactly `width`x`height` from `pool`.
    pub fn request(
        pool: &Rc<RefCell<TexturePool>>,
        width: u32,
        height: u32,
    ) -> GessoResult<Self> {
        let tex = pool.borrow_mut().request(width, height)?;
        Ok(Self {
            pool: Rc::clone(pool),
            tex: Some(tex),
        })
    }

    pub fn info(&self) -> TexInfo {
        self.tex.as_ref().expect("lease released only on drop").info()
    }
}

impl Drop for TexLease {
    fn drop(&mut self) {
        if let Some(tex) = self.tex.take() {
            self.pool.borrow_mut().release(tex);
        }
    }
}

impl std::fmt::Debug for TexLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TexLease").field("tex", &self.tex).finish()
    }
}

/// Transient textures for destination snapshots during read-modify-write
/// compositing, keyed by exact requested size with oldest-first eviction.
pub(crate) struct ScratchCache {
    device: SharedDevice,
    entries: Vec<TexFbo>,
    cap: usize,
}

impl ScratchCache {
    pub(crate) fn new(device: SharedDevice) -> Self {
        Self {
            device,
            entries: Vec::new(),
            cap: 4,
        }
    }

    /// A scratch texture of exactly the requested size; content is stale and
    /// must be fully written before it is read.
    pub(crate) fn acquire(&mut self, width: u32, height: u32) -> GessoResult<TexInfo> {
        if let Some(i) = self
            .entries
            .iter()
            .position(|t| t.width == width && t.height == height)
        {
            let tex = self.entries.remove(i);
            let info = tex.info();
            self.entries.push(tex);
            return Ok(info);
        }

        if self.entries.len() >= self.cap {
            let old = self.entries.remove(0);
            self.device.borrow_mut().delete_texture(old);
        }

        let tex = self.device.borrow_mut().create_texture(width, height)?;
        let info = tex.info();
        self.entries.push(tex);
        Ok(info)
    }
}

impl Drop for ScratchCache {
    fn drop(&mut self) {
        let mut device = self.device.borrow_mut();
        for tex in self.entries.drain(..) {
            device.delete_texture(tex);
        }
    }
}

/// Grow-only shared texture for glyph uploads; coexists with a scratch
/// snapshot inside one text draw, hence not part of [`ScratchCache`].
pub(crate) struct UploadTex {
    device: SharedDevice,
    tex: Option<TexFbo>,
}

impl UploadTex {
    pub(crate) fn new(device: SharedDevice) -> Self {
        Self { device, tex: None }
    }

    /// A texture at least `width`x`height`, reallocating only on growth.
    pub(crate) fn ensure(&mut self, width: u32, height: u32) -> GessoResult<TexInfo> {
        if let Some(tex) = &self.tex
            && tex.width >= width
            && tex.height >= height
        {
            return Ok(tex.info());
        }

        let new_w = width.max(self.tex.as_ref().map_or(0, |t| t.width));
        let new_h = height.max(self.tex.as_ref().map_or(0, |t| t.height));
        let created = self.device.borrow_mut().create_texture(new_w, new_h)?;
        if let Some(old) = self.tex.replace(created) {
            self.device.borrow_mut().delete_texture(old);
        }
        Ok(self.tex.as_ref().expect("just stored").info())
    }
}

impl Drop for UploadTex {
    fn drop(&mut self) {
        if let Some(tex) = self.tex.take() {
            self.device.borrow_mut().delete_texture(tex);
        }
    }
}
