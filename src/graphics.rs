use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    gl::device::Device,
    gl::pool::{ScratchCache, SharedDevice, TexPoolOpts, TexturePool, UploadTex},
    gl::soft::{SoftDevice, SoftDeviceOpts},
    gl::state::GlState,
    text::raster::{FontStyle, TextRasterizer},
};

/// Shared rendering context: device, texture pool, render-state stack,
/// scratch caches, text rasterizer, and the process-wide default font style.
///
/// This is the single-threaded hub every [`crate::Bitmap`] holds a handle to.
/// Interior mutability is per component, so a pool borrow never overlaps a
/// state borrow.
pub struct Graphics {
    device: SharedDevice,
    pool: Rc<RefCell<TexturePool>>,
    state: RefCell<GlState>,
    scratch: RefCell<ScratchCache>,
    upload: RefCell<UploadTex>,
    text: Rc<dyn TextRasterizer>,
    default_font: RefCell<FontStyle>,
}

/// Shared handle to a [`Graphics`] context.
pub type GraphicsRef = Rc<Graphics>;

impl Graphics {
    /// Build a context over any device implementation.
    pub fn new(device: SharedDevice, text: Rc<dyn TextRasterizer>) -> GraphicsRef {
        Self::with_pool_opts(device, text, TexPoolOpts::default())
    }

    /// Build a context with explicit texture-pool bounds.
    pub fn with_pool_opts(
        device: SharedDevice,
        text: Rc<dyn TextRasterizer>,
        pool_opts: TexPoolOpts,
    ) -> GraphicsRef {
        let pool = Rc::new(RefCell::new(TexturePool::new(
            Rc::clone(&device),
            pool_opts,
        )));
        let scratch = RefCell::new(ScratchCache::new(Rc::clone(&device)));
        let upload = RefCell::new(UploadTex::new(Rc::clone(&device)));
        Rc::new(Self {
            device,
            pool,
            state: RefCell::new(GlState::new()),
            scratch,
            upload,
            text,
            default_font: RefCell::new(FontStyle::default()),
        })
    }

    /// Convenience constructor over the software reference device.
    pub fn soft(opts: SoftDeviceOpts, text: Rc<dyn TextRasterizer>) -> GraphicsRef {
        let device: SharedDevice = Rc::new(RefCell::new(SoftDevice::new(opts)));
        Self::new(device, text)
    }

    /// Largest texture dimension the device supports; images beyond it fall
    /// back to CPU-resident surfaces.
    pub fn max_texture_size(&self) -> u32 {
        self.device.borrow().max_texture_size()
    }

    /// Default style applied to newly created surfaces.
    pub fn default_font(&self) -> FontStyle {
        self.default_font.borrow().clone()
    }

    pub fn set_default_font(&self, style: FontStyle) {
        *self.default_font.borrow_mut() = style;
    }

    pub fn pool(&self) -> &Rc<RefCell<TexturePool>> {
        &self.pool
    }

    pub(crate) fn device(&self) -> &RefCell<dyn Device> {
        &self.device
    }

    pub(crate) fn state(&self) -> &RefCell<GlState> {
        &self.state
    }

    pub(crate) fn scratch(&self) -> &RefCell<ScratchCache> {
        &self.scratch
    }

    pub(crate) fn upload(&self) -> &RefCell<UploadTex> {
        &self.upload
    }

    pub(crate) fn text(&self) -> &dyn TextRasterizer {
        self.text.as_ref()
    }
}
