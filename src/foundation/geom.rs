/// Integer rectangle with origin and extent, in texel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IntRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle covering a full `w`x`h` surface.
    pub fn of_size(w: u32, h: u32) -> Self {
        Self::new(0, 0, w as i32, h as i32)
    }

    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn right(self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.right() && y < self.bottom()
    }

    /// Intersection of two rectangles; empty extents when they do not overlap.
    pub fn intersect(self, other: Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        Self::new(x, y, (r - x).max(0), (b - y).max(0))
    }
}

/// Float rectangle, used both for sub-texel placement and for normalized
/// [0, 1] texture sub-rects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl FloatRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_int(rect: IntRect) -> Self {
        Self::new(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32)
    }

    /// Express a texel rectangle in the [0, 1] coordinate space of a
    /// `tex_w`x`tex_h` texture.
    pub fn normalized(rect: IntRect, tex_w: u32, tex_h: u32) -> Self {
        let tw = (tex_w.max(1)) as f32;
        let th = (tex_h.max(1)) as f32;
        Self::new(
            rect.x as f32 / tw,
            rect.y as f32 / th,
            rect.w as f32 / tw,
            rect.h as f32 / th,
        )
    }

    /// The full [0, 1] x [0, 1] region.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// 2D position in texel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}
