/// Straight (non-premultiplied) RGBA color with components in [0, 1].
///
/// This is the color type flowing through every drawing operation; the
/// canonical byte format at the asset boundary is straight RGBA8.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_rgba8(px: [u8; 4]) -> Self {
        Self::new(
            f32::from(px[0]) / 255.0,
            f32::from(px[1]) / 255.0,
            f32::from(px[2]) / 255.0,
            f32::from(px[3]) / 255.0,
        )
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        fn q(v: f32) -> u8 {
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Componentwise comparison within `eps`, for float-tolerant assertions.
    pub fn approx_eq(self, other: Self, eps: f32) -> bool {
        (self.r - other.r).abs() <= eps
            && (self.g - other.g).abs() <= eps
            && (self.b - other.b).abs() <= eps
            && (self.a - other.a).abs() <= eps
    }
}

/// Rotate a color's hue by `degrees`, preserving saturation, lightness and
/// alpha.
///
/// Positive degrees rotate forward through the spectrum (red -> green ->
/// blue); `rotate_hue(red, 120.0)` is pure green.
pub fn rotate_hue(c: Rgba, degrees: f32) -> Rgba {
    let (h, s, l) = rgb_to_hsl(c.r, c.g, c.b);
    let h = (h + degrees).rem_euclid(360.0);
    let (r, g, b) = hsl_to_rgb(h, s, l);
    Rgba::new(r, g, b, c.a)
}

/// Hue rotation as seen by the hue shader: the uniform carries the
/// sign-inverted radian value, so a negative angle rotates forward.
pub(crate) fn rotate_hue_radians(c: Rgba, radians: f32) -> Rgba {
    rotate_hue(c, -radians.to_degrees())
}

fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (h * 60.0, s, l)
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hn = h / 360.0;

    (
        hue_channel(p, q, hn + 1.0 / 3.0),
        hue_channel(p, q, hn),
        hue_channel(p, q, hn - 1.0 / 3.0),
    )
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_round_trip() {
        let c = Rgba::from_rgba8([12, 200, 255, 128]);
        assert_eq!(c.to_rgba8(), [12, 200, 255, 128]);
    }

    #[test]
    fn rotate_red_forward_is_green() {
        let red = Rgba::opaque(1.0, 0.0, 0.0);
        let out = rotate_hue(red, 120.0);
        assert!(out.approx_eq(Rgba::opaque(0.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn rotation_is_invertible_modulo_rounding() {
        let c = Rgba::new(0.7, 0.3, 0.15, 0.6);
        let back = rotate_hue(rotate_hue(c, 77.0), 360.0 - 77.0);
        assert!(back.approx_eq(c, 1e-4));
    }

    #[test]
    fn grays_are_hue_invariant() {
        let gray = Rgba::new(0.5, 0.5, 0.5, 1.0);
        assert!(rotate_hue(gray, 90.0).approx_eq(gray, 1e-6));
    }

    #[test]
    fn shader_convention_undoes_sign_inversion() {
        let red = Rgba::opaque(1.0, 0.0, 0.0);
        let adj = -(std::f32::consts::TAU / 360.0) * 120.0;
        let out = rotate_hue_radians(red, adj);
        assert!(out.approx_eq(Rgba::opaque(0.0, 1.0, 0.0), 1e-4));
    }
}
