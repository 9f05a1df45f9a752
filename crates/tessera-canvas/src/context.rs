use tessera_engine::coords::{Rect, Vec2};
use tessera_engine::paint::Paint;
use tessera_engine::scene::SortKey;

use crate::align::Align;
use crate::edges::{Edges, inset_rect};

/// Resolved placement request on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum AxisAnchor {
    /// Offset from the interior's start edge (`left`, `top`, undirected).
    Start(f32),
    /// Offset from the interior's end edge (`right`, `bottom`).
    End(f32),
    /// Offset from the centred position.
    Center(f32),
    /// Follow walk and alignment.
    Flow,
}

impl AxisAnchor {
    #[inline]
    pub(crate) fn is_flow(self) -> bool {
        matches!(self, AxisAnchor::Flow)
    }
}

/// How a child asked to be placed; kept until `end_rect` when the
/// position depends on a size measured from content.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub(crate) x: AxisAnchor,
    pub(crate) y: AxisAnchor,
    pub(crate) align: Align,
    /// Takes part in the parent's left-to-right flow.
    pub(crate) flows: bool,
    pub(crate) margin: Edges,
}

/// Book-keeping for a container between `begin_rect` and `end_rect`.
#[derive(Debug, Clone)]
pub(crate) struct Pending {
    pub(crate) placement: Placement,
    pub(crate) auto_w: bool,
    pub(crate) auto_h: bool,
    /// First draw-list index recorded inside the container.
    pub(crate) mark: usize,
    pub(crate) fill: Option<(SortKey, Paint)>,
}

/// One level of the layout stack.
#[derive(Debug, Clone)]
pub(crate) struct LayoutContext {
    /// Border box. Size components are NaN while sized to content.
    pub(crate) rect: Rect,
    pub(crate) padding: Edges,
    /// Flow cursor, relative to the interior origin.
    pub(crate) cursor: Vec2,
    /// Tallest outer height in the current row.
    pub(crate) row_h: f32,
    /// Far edge of all placed content, relative to the interior origin.
    pub(crate) extent: Vec2,
    /// `None` for the root context.
    pub(crate) pending: Option<Pending>,
}

impl LayoutContext {
    pub(crate) fn root(rect: Rect) -> Self {
        Self {
            rect,
            padding: Edges::ZERO,
            cursor: Vec2::zero(),
            row_h: 0.0,
            extent: Vec2::zero(),
            pending: None,
        }
    }

    pub(crate) fn open(rect: Rect, padding: Edges, pending: Pending) -> Self {
        Self { pending: Some(pending), padding, ..Self::root(rect) }
    }

    #[inline]
    pub(crate) fn interior(&self) -> Rect {
        inset_rect(self.rect, self.padding)
    }

    /// Starts a new row if an element `outer_w` wide would overflow the interior.
    ///
    /// The first element of a row is always placed; a content-sized
    /// interior never wraps.
    pub(crate) fn wrap_for(&mut self, outer_w: f32) {
        let width = self.interior().size.x;
        if self.cursor.x > 0.0 && width.is_finite() && self.cursor.x + outer_w > width {
            self.cursor = Vec2::new(0.0, self.cursor.y + self.row_h);
            self.row_h = 0.0;
        }
    }

    /// Moves the cursor past the far edges of a flowing element, wherever
    /// alignment put it inside the row.
    pub(crate) fn advance_past(&mut self, rect: Rect, margin: Edges) {
        let far = self.far_edge(rect, margin);
        self.cursor.x = self.cursor.x.max(far.x);
        self.row_h = self.row_h.max(far.y - self.cursor.y);
    }

    /// Grows the content extent to cover `rect` plus its trailing margin.
    pub(crate) fn include(&mut self, rect: Rect, margin: Edges) {
        self.extent = self.extent.max(self.far_edge(rect, margin));
    }

    /// Bottom-right corner of `rect` plus margin, relative to the interior origin.
    fn far_edge(&self, rect: Rect, margin: Edges) -> Vec2 {
        Vec2::new(rect.right() + margin.right, rect.bottom() + margin.bottom) - self.interior().origin
    }

    /// Border-box origin of a child of border size `size` (NaN = unknown).
    ///
    /// The second value tells whether both axes are final; an axis whose
    /// position depends on an unknown size gets a provisional start position.
    pub(crate) fn place(&self, p: &Placement, size: Vec2) -> (Vec2, bool) {
        let interior = self.interior();
        let (slot, free) = if p.flows {
            (interior.origin + self.cursor, interior.size - self.cursor)
        } else {
            (interior.origin, interior.size)
        };

        let (x, x_final) = place_axis(
            p.x,
            AxisSpan { start: interior.origin.x, len: interior.size.x },
            AxisSpan { start: slot.x, len: free.x },
            size.x,
            (p.margin.left, p.margin.right),
            p.align.h.factor(),
        );
        let (y, y_final) = place_axis(
            p.y,
            AxisSpan { start: interior.origin.y, len: interior.size.y },
            AxisSpan { start: slot.y, len: free.y },
            size.y,
            (p.margin.top, p.margin.bottom),
            p.align.v.factor(),
        );
        (Vec2::new(x, y), x_final && y_final)
    }
}

#[derive(Clone, Copy)]
struct AxisSpan {
    start: f32,
    len: f32,
}

fn place_axis(
    anchor: AxisAnchor,
    interior: AxisSpan,
    slot: AxisSpan,
    size: f32,
    (m_lo, m_hi): (f32, f32),
    factor: f32,
) -> (f32, bool) {
    let provisional = (interior.start + m_lo, false);
    match anchor {
        AxisAnchor::Start(offset) => (interior.start + offset + m_lo, true),
        AxisAnchor::End(_) | AxisAnchor::Center(_) if size.is_nan() => provisional,
        AxisAnchor::End(offset) => (interior.start + interior.len - offset - size - m_hi, true),
        AxisAnchor::Center(offset) => {
            (interior.start + (interior.len - size - m_lo - m_hi) * 0.5 + offset + m_lo, true)
        }
        AxisAnchor::Flow if factor == 0.0 || slot.len.is_nan() => (slot.start + m_lo, true),
        AxisAnchor::Flow if size.is_nan() => (slot.start + m_lo, false),
        AxisAnchor::Flow => {
            let spare = (slot.len - size - m_lo - m_hi).max(0.0);
            (slot.start + spare * factor + m_lo, true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(x: AxisAnchor, y: AxisAnchor, align: Align, flows: bool) -> Placement {
        Placement { x, y, align, flows, margin: Edges::ZERO }
    }

    #[test]
    fn wrap_skips_first_element_of_row() {
        let mut ctx = LayoutContext::root(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.wrap_for(50.0);
        assert_eq!(ctx.cursor, Vec2::zero());

        ctx.advance_past(Rect::new(0.0, 0.0, 6.0, 3.0), Edges::ZERO);
        ctx.advance_past(Rect::new(6.0, 0.0, 2.0, 5.0), Edges::ZERO);
        ctx.wrap_for(4.0);
        assert_eq!(ctx.cursor, Vec2::new(0.0, 5.0));
        assert_eq!(ctx.row_h, 0.0);
    }

    #[test]
    fn content_sized_interior_never_wraps() {
        let mut ctx = LayoutContext::root(Rect::new(0.0, 0.0, f32::NAN, 10.0));
        ctx.advance_past(Rect::new(0.0, 0.0, 500.0, 3.0), Edges::ZERO);
        ctx.wrap_for(500.0);
        assert_eq!(ctx.cursor.x, 500.0);
    }

    #[test]
    fn end_anchor_measures_from_far_edge() {
        let ctx = LayoutContext::root(Rect::new(10.0, 0.0, 100.0, 100.0));
        let p = placement(AxisAnchor::End(5.0), AxisAnchor::Start(3.0), Align::LEFT_TOP, false);
        let (origin, fin) = ctx.place(&p, Vec2::new(20.0, 20.0));
        assert_eq!(origin, Vec2::new(85.0, 3.0));
        assert!(fin);
    }

    #[test]
    fn alignment_never_pushes_before_slot_start() {
        let ctx = LayoutContext::root(Rect::new(0.0, 0.0, 10.0, 10.0));
        let p = placement(AxisAnchor::Flow, AxisAnchor::Flow, Align::CENTER, false);
        let (origin, _) = ctx.place(&p, Vec2::new(40.0, 4.0));
        assert_eq!(origin, Vec2::new(0.0, 3.0));
    }

    #[test]
    fn unknown_size_with_nonzero_factor_is_provisional() {
        let ctx = LayoutContext::root(Rect::new(0.0, 0.0, 100.0, 100.0));
        let p = placement(AxisAnchor::Flow, AxisAnchor::Flow, Align::BOTTOM, false);
        let (origin, fin) = ctx.place(&p, Vec2::new(10.0, f32::NAN));
        assert_eq!(origin, Vec2::new(45.0, 0.0));
        assert!(!fin);
    }

    #[test]
    fn include_tracks_far_edges_with_margin() {
        let mut ctx = LayoutContext::root(Rect::new(10.0, 10.0, 100.0, 100.0));
        ctx.include(Rect::new(12.0, 15.0, 20.0, 5.0), Edges::all(1.0));
        assert_eq!(ctx.extent, Vec2::new(23.0, 11.0));
    }

    // ── wrap boundaries ──────────────────────────────────────────────────

    #[test]
    fn exact_fit_stays_on_the_row() {
        // (interior width, cursor after first element, next outer width, wraps)
        let cases = [
            (100.0, 60.0, 40.0, false),
            (100.0, 60.0, 40.5, true),
            (100.0, 99.0, 1.0, false),
            (100.0, 100.0, 0.0, false),
            (100.0, 100.0, 0.5, true),
            (37.0, 20.0, 17.0, false),
        ];
        for (width, used, next, wraps) in cases {
            let mut ctx = LayoutContext::root(Rect::new(0.0, 0.0, width, 50.0));
            ctx.advance_past(Rect::new(0.0, 0.0, used, 4.0), Edges::ZERO);
            ctx.wrap_for(next);
            let expected = if wraps { Vec2::new(0.0, 4.0) } else { Vec2::new(used, 0.0) };
            assert_eq!(ctx.cursor, expected, "width {width}, used {used}, next {next}");
        }
    }

    #[test]
    fn advance_past_follows_aligned_position() {
        let mut ctx = LayoutContext::root(Rect::new(0.0, 0.0, 100.0, 100.0));
        ctx.advance_past(Rect::new(40.0, 10.0, 20.0, 5.0), Edges::all(2.0));
        assert_eq!(ctx.cursor, Vec2::new(62.0, 0.0));
        assert_eq!(ctx.row_h, 17.0);
    }
}
