use crate::foundation::error::{GessoError, GessoResult};

/// CPU pixel buffer in the canonical format: straight RGBA8, tightly packed,
/// row-major.
///
/// This is the decode target for image bytes, the glyph output of text
/// rasterizers, and the backing store of oversized surfaces.
#[derive(Clone, Debug)]
pub struct PixelBuf {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuf {
    /// Allocate a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    /// Wrap existing RGBA8 bytes; the length must be exactly `w * h * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> GessoResult<Self> {
        let expect = (width as usize) * (height as usize) * 4;
        if data.len() != expect {
            return Err(GessoError::decode(format!(
                "pixel buffer length {} does not match {}x{} rgba8",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one texel; callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite one texel; out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, px: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y * self.width + x) as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_transparent() {
        let buf = PixelBuf::new(2, 2);
        assert_eq!(buf.pixel(1, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn from_rgba8_rejects_bad_length() {
        assert!(PixelBuf::from_rgba8(2, 2, vec![0; 15]).is_err());
        assert!(PixelBuf::from_rgba8(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn put_pixel_ignores_out_of_bounds() {
        let mut buf = PixelBuf::new(2, 2);
        buf.put_pixel(5, 0, [1, 2, 3, 4]);
        assert!(buf.data().iter().all(|&b| b == 0));
        buf.put_pixel(1, 0, [1, 2, 3, 4]);
        assert_eq!(buf.pixel(1, 0), [1, 2, 3, 4]);
    }
}
