use super::Rect;

/// Size of the root canvas in logical pixels.
///
/// The layout engine resolves top-level percentages against this size.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// The viewport as a rect anchored at the origin.
    #[inline]
    pub fn as_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
