#![allow(dead_code)]

use std::rc::Rc;

use gesso::{
    FontStyle, GraphicsRef, Graphics, GessoResult, PixelBuf, Rgba, SoftDeviceOpts, TextRasterizer,
};

/// Glyph cell width of [`BlockRasterizer`] output, including 1px spacing.
pub const BLOCK_ADVANCE: u32 = 7;
/// Solid glyph width inside each cell.
pub const BLOCK_W: u32 = 6;
/// Glyph cell height.
pub const BLOCK_H: u32 = 10;

/// Deterministic rasterizer for tests: every non-space character becomes a
/// solid 6x10 block of the style color, with a 1px transparent gap between
/// cells. Extents depend only on character count, so placement math is easy
/// to assert against.
pub struct BlockRasterizer;

impl BlockRasterizer {
    fn extent(text: &str) -> (u32, u32) {
        let n = text.chars().count() as u32;
        if n == 0 {
            return (0, BLOCK_H);
        }
        (n * BLOCK_ADVANCE - (BLOCK_ADVANCE - BLOCK_W), BLOCK_H)
    }
}

impl TextRasterizer for BlockRasterizer {
    fn render(&self, text: &str, style: &FontStyle) -> GessoResult<PixelBuf> {
        let (w, h) = Self::extent(text);
        let mut buf = PixelBuf::new(w, h);
        // Alpha carries coverage, which is full inside every block; the
        // style color's own alpha is applied by the compositor as opacity.
        let [r, g, b, _] = style.color.to_rgba8();
        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let x0 = i as u32 * BLOCK_ADVANCE;
            for y in 0..BLOCK_H {
                for x in x0..x0 + BLOCK_W {
                    buf.put_pixel(x, y, [r, g, b, 255]);
                }
            }
        }
        Ok(buf)
    }

    fn measure(&self, text: &str, _style: &FontStyle) -> (u32, u32) {
        Self::extent(text)
    }
}

/// Route tracing output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Context over the software device with default limits.
pub fn new_gfx() -> GraphicsRef {
    init_tracing();
    Graphics::soft(SoftDeviceOpts::default(), Rc::new(BlockRasterizer))
}

/// Context whose device rejects textures above `max` on either axis.
pub fn gfx_with_max_tex(max: u32) -> GraphicsRef {
    init_tracing();
    Graphics::soft(
        SoftDeviceOpts {
            max_texture_size: max,
            ..SoftDeviceOpts::default()
        },
        Rc::new(BlockRasterizer),
    )
}

pub fn assert_color_near(got: Rgba, want: Rgba, what: &str) {
    assert!(
        got.approx_eq(want, 1.0 / 255.0),
        "{what}: got {got:?}, want {want:?}"
    );
}

/// Solid-color canonical RGBA8 buffer.
pub fn solid_pixels(w: u32, h: u32, color: Rgba) -> PixelBuf {
    let mut buf = PixelBuf::new(w, h);
    let rgba = color.to_rgba8();
    for y in 0..h {
        for x in 0..w {
            buf.put_pixel(x, y, rgba);
        }
    }
    buf
}
