mod support;

use gesso::{Bitmap, FontStyle, GessoError, IntRect, Rgba, TextAlign};
use support::{
    BLOCK_ADVANCE, BLOCK_H, BLOCK_W, assert_color_near, gfx_with_max_tex, new_gfx, solid_pixels,
};

fn text_width(chars: u32) -> i32 {
    (chars * BLOCK_ADVANCE - (BLOCK_ADVANCE - BLOCK_W)) as i32
}

#[test]
fn empty_string_draws_nothing() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 16, 16).unwrap();
    let before = bmp.revision();
    bmp.draw_text(IntRect::new(0, 0, 16, 16), "", TextAlign::Left)
        .unwrap();
    assert_eq!(bmp.revision(), before);
    assert_eq!(bmp.get_pixel(0, 0).unwrap(), Rgba::transparent());
}

#[test]
fn left_aligned_text_starts_at_the_rect_origin() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 48, 16).unwrap();
    let rect = IntRect::new(2, 3, 40, BLOCK_H as i32);
    bmp.draw_text(rect, "ab", TextAlign::Left).unwrap();

    let white = Rgba::opaque(1.0, 1.0, 1.0);
    assert_color_near(bmp.get_pixel(2, 3).unwrap(), white, "first glyph corner");
    // Inter-glyph gap has zero coverage.
    assert_eq!(
        bmp.get_pixel(2 + BLOCK_W as i32, 3).unwrap(),
        Rgba::transparent()
    );
    assert_eq!(bmp.get_pixel(1, 3).unwrap(), Rgba::transparent());
}

#[test]
fn centered_text_is_centered_in_the_rect() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 48, 16).unwrap();
    let rect = IntRect::new(2, 3, 40, BLOCK_H as i32);
    bmp.draw_text(rect, "ab", TextAlign::Center).unwrap();

    let x0 = 2 + (40 - text_width(2)) / 2;
    let white = Rgba::opaque(1.0, 1.0, 1.0);
    assert_color_near(bmp.get_pixel(x0, 3).unwrap(), white, "centered glyph");
    assert_eq!(bmp.get_pixel(2, 3).unwrap(), Rgba::transparent());
}

#[test]
fn right_aligned_text_ends_at_the_rect_edge() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 48, 16).unwrap();
    let rect = IntRect::new(2, 3, 40, BLOCK_H as i32);
    bmp.draw_text(rect, "ab", TextAlign::Right).unwrap();

    let x0 = 2 + 40 - text_width(2);
    let white = Rgba::opaque(1.0, 1.0, 1.0);
    assert_color_near(bmp.get_pixel(x0, 3).unwrap(), white, "right-aligned glyph");
    assert_color_near(
        bmp.get_pixel(2 + 40 - 1, 3).unwrap(),
        white,
        "last glyph column",
    );
    assert_eq!(bmp.get_pixel(x0 - 1, 3).unwrap(), Rgba::transparent());
}

#[test]
fn centered_text_never_starts_left_of_the_rect() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 16, 16).unwrap();
    // Text wider than the rect would center to a negative origin.
    let rect = IntRect::new(0, 0, 8, BLOCK_H as i32);
    bmp.draw_text(rect, "abcd", TextAlign::Center).unwrap();

    assert!(bmp.get_pixel(0, 0).unwrap().a > 0.99, "clamped to rect edge");
}

#[test]
fn wide_text_is_squeezed_into_the_rect() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 16, 16).unwrap();
    let rect = IntRect::new(0, 0, 8, BLOCK_H as i32);
    bmp.draw_text(rect, "abcd", TextAlign::Left).unwrap();

    // The squeezed string spans exactly the rect width; the last destination
    // column samples from the final glyph.
    assert!(bmp.get_pixel(7, 0).unwrap().a > 0.99, "last squeezed column");
    assert_eq!(bmp.get_pixel(8, 0).unwrap(), Rgba::transparent());
    assert_eq!(bmp.get_pixel(9, 0).unwrap(), Rgba::transparent());
}

#[test]
fn text_is_vertically_centered() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 32, 32).unwrap();
    let rect = IntRect::new(0, 4, 32, BLOCK_H as i32 + 10);
    bmp.draw_text(rect, "a", TextAlign::Left).unwrap();

    let y0 = 4 + 5;
    assert!(bmp.get_pixel(0, y0).unwrap().a > 0.99, "first glyph row");
    assert_eq!(bmp.get_pixel(0, y0 - 1).unwrap(), Rgba::transparent());
    assert_eq!(
        bmp.get_pixel(0, y0 + BLOCK_H as i32).unwrap(),
        Rgba::transparent()
    );
}

#[test]
fn font_color_alpha_becomes_draw_opacity() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 16, 16).unwrap();
    bmp.set_font(FontStyle {
        size: 22.0,
        color: Rgba::new(1.0, 0.0, 0.0, 0.5),
    })
    .unwrap();
    bmp.draw_text(IntRect::new(0, 0, 16, BLOCK_H as i32), "a", TextAlign::Left)
        .unwrap();

    let got = bmp.get_pixel(0, 0).unwrap();
    assert!((got.a - 0.5).abs() < 0.01, "half opacity, got {got:?}");
    assert!((got.r - 1.0).abs() < 0.01);
}

#[test]
fn text_size_reports_the_rasterizer_extent() {
    let gfx = new_gfx();
    let bmp = Bitmap::new(&gfx, 4, 4).unwrap();
    assert_eq!(bmp.text_size("ab").unwrap(), (text_width(2) as u32, BLOCK_H));
    assert_eq!(bmp.text_size("").unwrap(), (0, BLOCK_H));
}

#[test]
fn draw_text_commits_pending_point_writes_first() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 32, 32).unwrap();
    let red = Rgba::opaque(1.0, 0.0, 0.0);
    bmp.set_pixel(30, 30, red).unwrap();
    bmp.draw_text(IntRect::new(0, 0, 20, BLOCK_H as i32), "a", TextAlign::Left)
        .unwrap();

    assert_color_near(bmp.get_pixel(30, 30).unwrap(), red, "point outside text");
    assert!(bmp.get_pixel(0, 0).unwrap().a > 0.99, "glyph drawn");
}

#[test]
fn text_operations_are_rejected_on_oversized_surfaces() {
    let gfx = gfx_with_max_tex(8);
    let mut bmp =
        Bitmap::from_pixels(&gfx, solid_pixels(16, 4, Rgba::opaque(1.0, 1.0, 1.0))).unwrap();
    assert!(matches!(
        bmp.draw_text(IntRect::new(0, 0, 16, 4), "a", TextAlign::Left),
        Err(GessoError::Oversized(_))
    ));
    assert!(matches!(bmp.text_size("a"), Err(GessoError::Oversized(_))));
}
