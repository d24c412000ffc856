use smallvec::SmallVec;

use crate::{
    foundation::color::Rgba,
    foundation::geom::Vec2,
    gl::device::PointVertex,
};

/// Append-only cache of pending single-pixel writes.
///
/// Entries keep insertion order; the flush draws them in one call with
/// blending disabled, so later entries at the same position win by overdraw.
#[derive(Debug, Default)]
pub(crate) struct PointBatch {
    points: SmallVec<[PointVertex; 32]>,
}

impl PointBatch {
    /// Queue a write centered on texel `(x, y)`.
    pub(crate) fn append(&mut self, x: i32, y: i32, color: Rgba) {
        self.points.push(PointVertex {
            pos: Vec2::new(x as f32 + 0.5, y as f32 + 0.5),
            color,
        });
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn as_slice(&self) -> &[PointVertex] {
        &self.points
    }

    pub(crate) fn reset(&mut self) {
        self.points.clear();
    }
}
