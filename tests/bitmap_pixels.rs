mod support;

use gesso::{Bitmap, IntRect, Rgba};
use support::{assert_color_near, new_gfx};

#[test]
fn set_pixel_is_visible_to_get_pixel() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 8, 8).unwrap();
    let red = Rgba::opaque(1.0, 0.0, 0.0);

    bmp.set_pixel(3, 4, red).unwrap();
    assert_color_near(bmp.get_pixel(3, 4).unwrap(), red, "written texel");
    assert_color_near(
        bmp.get_pixel(4, 3).unwrap(),
        Rgba::transparent(),
        "untouched texel",
    );
}

#[test]
fn later_write_at_same_position_wins() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 4, 4).unwrap();

    bmp.set_pixel(1, 1, Rgba::opaque(1.0, 0.0, 0.0)).unwrap();
    bmp.set_pixel(1, 1, Rgba::opaque(0.0, 0.0, 1.0)).unwrap();
    assert_color_near(
        bmp.get_pixel(1, 1).unwrap(),
        Rgba::opaque(0.0, 0.0, 1.0),
        "last write",
    );
}

#[test]
fn out_of_bounds_reads_are_transparent() {
    let gfx = new_gfx();
    let bmp = Bitmap::new(&gfx, 4, 4).unwrap();

    assert_eq!(bmp.get_pixel(-1, 0).unwrap(), Rgba::transparent());
    assert_eq!(bmp.get_pixel(0, -1).unwrap(), Rgba::transparent());
    assert_eq!(bmp.get_pixel(4, 0).unwrap(), Rgba::transparent());
    assert_eq!(bmp.get_pixel(0, 4).unwrap(), Rgba::transparent());
}

#[test]
fn fill_rect_paints_exactly_the_rectangle() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 8, 8).unwrap();
    let blue = Rgba::opaque(0.0, 0.0, 1.0);

    bmp.fill_rect(IntRect::new(2, 2, 3, 3), blue).unwrap();
    assert_color_near(bmp.get_pixel(2, 2).unwrap(), blue, "inside corner");
    assert_color_near(bmp.get_pixel(4, 4).unwrap(), blue, "inside far corner");
    assert_eq!(bmp.get_pixel(1, 2).unwrap(), Rgba::transparent());
    assert_eq!(bmp.get_pixel(5, 5).unwrap(), Rgba::transparent());
}

#[test]
fn fill_rect_overhanging_the_surface_is_clamped() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 4, 4).unwrap();
    let green = Rgba::opaque(0.0, 1.0, 0.0);

    bmp.fill_rect(IntRect::new(2, 2, 10, 10), green).unwrap();
    assert_color_near(bmp.get_pixel(3, 3).unwrap(), green, "clamped fill");
    assert_eq!(bmp.get_pixel(1, 1).unwrap(), Rgba::transparent());
}

#[test]
fn fill_commits_pending_point_writes_first() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 8, 8).unwrap();
    let red = Rgba::opaque(1.0, 0.0, 0.0);
    let blue = Rgba::opaque(0.0, 0.0, 1.0);

    bmp.set_pixel(0, 0, red).unwrap();
    bmp.set_pixel(5, 5, red).unwrap();
    bmp.fill_rect(IntRect::new(4, 4, 4, 4), blue).unwrap();

    // The point outside the fill survives, the one inside is painted over.
    assert_color_near(bmp.get_pixel(0, 0).unwrap(), red, "point outside fill");
    assert_color_near(bmp.get_pixel(5, 5).unwrap(), blue, "point inside fill");
}

#[test]
fn clear_discards_pending_points_and_resets_to_transparent() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 4, 4).unwrap();

    bmp.fill_rect(IntRect::new(0, 0, 4, 4), Rgba::opaque(1.0, 1.0, 0.0))
        .unwrap();
    bmp.set_pixel(2, 2, Rgba::opaque(1.0, 0.0, 0.0)).unwrap();
    bmp.clear().unwrap();

    assert_eq!(bmp.get_pixel(2, 2).unwrap(), Rgba::transparent());
    assert_eq!(bmp.get_pixel(0, 0).unwrap(), Rgba::transparent());
}

#[test]
fn clear_rect_resets_only_the_rectangle() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 4, 4).unwrap();
    let yellow = Rgba::opaque(1.0, 1.0, 0.0);

    bmp.fill_rect(IntRect::new(0, 0, 4, 4), yellow).unwrap();
    bmp.clear_rect(IntRect::new(1, 1, 2, 2)).unwrap();

    assert_eq!(bmp.get_pixel(1, 1).unwrap(), Rgba::transparent());
    assert_eq!(bmp.get_pixel(2, 2).unwrap(), Rgba::transparent());
    assert_color_near(bmp.get_pixel(0, 0).unwrap(), yellow, "outside clear_rect");
    assert_color_near(bmp.get_pixel(3, 3).unwrap(), yellow, "outside clear_rect");
}

#[test]
fn explicit_flush_commits_without_another_operation() {
    let gfx = new_gfx();
    let mut bmp = Bitmap::new(&gfx, 4, 4).unwrap();
    let red = Rgba::opaque(1.0, 0.0, 0.0);

    bmp.set_pixel(0, 3, red).unwrap();
    let before = bmp.revision();
    bmp.flush();
    assert_eq!(bmp.revision(), before, "flush is not a visible mutation");
    assert_color_near(bmp.get_pixel(0, 3).unwrap(), red, "flushed point");
}
