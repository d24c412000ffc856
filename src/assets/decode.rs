use crate::{assets::pixbuf::PixelBuf, foundation::error::GessoResult};

/// Decode encoded image bytes and convert to the canonical straight RGBA8
/// format.
pub fn decode_image(bytes: &[u8]) -> GessoResult<PixelBuf> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| crate::GessoError::decode(e.to_string()))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuf::from_rgba8(width, height, rgba.into_raw())
}
