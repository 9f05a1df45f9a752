use tessera_engine::coords::Rect;

/// Insets on all four sides (padding, margin).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Self = Self { top: 0.0, right: 0.0, bottom: 0.0, left: 0.0 };

    #[inline]
    pub fn all(v: f32) -> Self {
        Self { top: v, right: v, bottom: v, left: v }
    }

    #[inline]
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self { top: vertical, bottom: vertical, left: horizontal, right: horizontal }
    }

    /// Total inset on the horizontal axis.
    #[inline]
    pub fn h(self) -> f32 {
        self.left + self.right
    }

    /// Total inset on the vertical axis.
    #[inline]
    pub fn v(self) -> f32 {
        self.top + self.bottom
    }
}

impl From<f32> for Edges {
    fn from(v: f32) -> Self {
        Self::all(v)
    }
}

/// `[top, right, bottom, left]`.
impl From<[f32; 4]> for Edges {
    fn from([top, right, bottom, left]: [f32; 4]) -> Self {
        Self { top, right, bottom, left }
    }
}

/// Shrink a rect by `edges`. Unresolved (NaN) sizes stay NaN.
#[inline]
pub fn inset_rect(rect: Rect, edges: Edges) -> Rect {
    Rect::new(
        rect.origin.x + edges.left,
        rect.origin.y + edges.top,
        shrink(rect.size.x, edges.h()),
        shrink(rect.size.y, edges.v()),
    )
}

#[inline]
fn shrink(len: f32, by: f32) -> f32 {
    if len.is_nan() { len } else { (len - by).max(0.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_order_is_top_right_bottom_left() {
        let e = Edges::from([1.0, 2.0, 3.0, 4.0]);
        assert_eq!((e.top, e.right, e.bottom, e.left), (1.0, 2.0, 3.0, 4.0));
        assert_eq!(e.h(), 6.0);
        assert_eq!(e.v(), 4.0);
    }

    #[test]
    fn inset_clamps_at_zero() {
        let r = inset_rect(Rect::new(0.0, 0.0, 10.0, 4.0), Edges::all(3.0));
        assert_eq!(r, Rect::new(3.0, 3.0, 4.0, 0.0));
    }

    #[test]
    fn inset_keeps_unresolved_axis() {
        let r = inset_rect(Rect::new(0.0, 0.0, f32::NAN, 10.0), Edges::all(2.0));
        assert!(r.size.x.is_nan());
        assert_eq!(r.size.y, 6.0);
    }
}
