#![forbid(unsafe_code)]

pub mod assets;
mod batch;
pub mod bitmap;
mod compositor;
pub mod foundation;
pub mod gl;
pub mod graphics;
pub mod text;

pub use assets::decode::decode_image;
pub use assets::pixbuf::PixelBuf;
pub use bitmap::Bitmap;
pub use foundation::color::{Rgba, rotate_hue};
pub use foundation::error::{GessoError, GessoResult};
pub use foundation::geom::{FloatRect, IntRect, Vec2};
pub use gl::device::{
    BlendMode, BlendQuad, Device, DrawParams, FramebufferId, PointVertex, TexFbo, TexInfo,
    TextureId,
};
pub use gl::pool::{SharedDevice, TexLease, TexPoolOpts, TexPoolStats, TexturePool};
pub use gl::soft::{SoftDevice, SoftDeviceOpts};
pub use gl::state::{GlState, StateScope, StateStack};
pub use graphics::{Graphics, GraphicsRef};
pub use text::raster::{FontStyle, FontdueRasterizer, TextAlign, TextRasterizer};
