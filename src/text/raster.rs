use crate::{
    assets::pixbuf::PixelBuf,
    foundation::color::Rgba,
    foundation::error::{GessoError, GessoResult},
};

/// Horizontal text alignment inside a bounding rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Text style applied by surface text operations: pixel size and fill color.
///
/// The color's alpha channel becomes the compositing opacity of the rendered
/// string.
#[derive(Clone, Debug, PartialEq)]
pub struct FontStyle {
    pub size: f32,
    pub color: Rgba,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            size: 22.0,
            color: Rgba::opaque(1.0, 1.0, 1.0),
        }
    }
}

/// Font rasterization collaborator.
///
/// Implementations produce canonical RGBA8 glyph buffers whose rgb channels
/// carry the style color and whose alpha carries antialiased coverage.
pub trait TextRasterizer {
    /// Rasterize `text` at the style's size and color. An empty or
    /// zero-extent result is legal and treated as a no-op by callers.
    fn render(&self, text: &str, style: &FontStyle) -> GessoResult<PixelBuf>;

    /// Pixel extent `(width, height)` the string would occupy, without
    /// rendering.
    fn measure(&self, text: &str, style: &FontStyle) -> (u32, u32);
}

/// [`TextRasterizer`] backed by a single `fontdue` font.
pub struct FontdueRasterizer {
    font: fontdue::Font,
}

impl FontdueRasterizer {
    /// Parse a TrueType/OpenType font from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> GessoResult<Self> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| GessoError::Other(anyhow::anyhow!("font load error: {e}")))?;
        Ok(Self { font })
    }

    fn layout(&self, text: &str, size: f32) -> fontdue::layout::Layout {
        use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(
            std::slice::from_ref(&self.font),
            &TextStyle::new(text, size, 0),
        );
        layout
    }

    fn extent(layout: &fontdue::layout::Layout, size: f32) -> (u32, u32) {
        let glyphs = layout.glyphs();
        if glyphs.is_empty() {
            return (0, size.ceil().max(1.0) as u32);
        }
        let w = glyphs
            .iter()
            .map(|g| g.x + g.width as f32)
            .fold(0.0f32, f32::max);
        let h = glyphs
            .iter()
            .map(|g| g.y + g.height as f32)
            .fold(size, f32::max);
        (w.ceil().max(0.0) as u32, h.ceil().max(1.0) as u32)
    }
}

impl TextRasterizer for FontdueRasterizer {
    fn render(&self, text: &str, style: &FontStyle) -> GessoResult<PixelBuf> {
        let layout = self.layout(text, style.size);
        let (width, height) = Self::extent(&layout, style.size);
        if width == 0 || height == 0 {
            return Ok(PixelBuf::new(0, 0));
        }

        let rgb = style.color.to_rgba8();
        let mut buf = PixelBuf::new(width, height);
        for glyph in layout.glyphs() {
            let (metrics, coverage) = self.font.rasterize_config(glyph.key);
            let gx = glyph.x.round() as i64;
            let gy = glyph.y.round() as i64;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let cov = coverage[row * metrics.width + col];
                    if cov == 0 {
                        continue;
                    }
                    let x = gx + col as i64;
                    let y = gy + row as i64;
                    if x < 0 || y < 0 {
                        continue;
                    }
                    let (x, y) = (x as u32, y as u32);
                    if x >= width || y >= height {
                        continue;
                    }
                    // Overlapping glyph edges keep the strongest coverage.
                    let prev = buf.pixel(x, y)[3];
                    buf.put_pixel(x, y, [rgb[0], rgb[1], rgb[2], cov.max(prev)]);
                }
            }
        }
        Ok(buf)
    }

    fn measure(&self, text: &str, style: &FontStyle) -> (u32, u32) {
        let layout = self.layout(text, style.size);
        Self::extent(&layout, style.size)
    }
}
