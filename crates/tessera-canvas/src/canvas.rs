use tessera_engine::coords::{Rect, Vec2, Viewport};
use tessera_engine::paint::Paint;
use tessera_engine::scene::{DrawCmd, DrawList, RectCmd, SortKey, ZIndex};

use crate::align::Walk;
use crate::context::{AxisAnchor, LayoutContext, Pending, Placement};
use crate::error::LayoutError;
use crate::spec::RectSpec;
use crate::value::{Axis, Directive, LayoutValue};

/// Output of a `begin_rect`, `draw_rect` or `end_rect` call.
///
/// Coordinates are final unless an enclosing container is still waiting for
/// its content size to align itself; the draw list always ends up with final
/// positions. `begin_rect` reports a content-sized axis as NaN and its
/// position on that axis as provisional.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRect {
    /// Border box in logical pixels.
    pub rect: Rect,
    pub paint: Option<Paint>,
    /// Nesting level; children of the root are at depth 1.
    pub depth: usize,
    /// Paint-order key of the recorded fill, if any.
    pub key: Option<SortKey>,
}

/// Immediate-mode rectangle layout over a stack of containers.
///
/// Containers are opened with [`begin_rect`](Self::begin_rect) and closed with
/// [`end_rect`](Self::end_rect); leaves are emitted with
/// [`draw_rect`](Self::draw_rect). Each call resolves its values once against
/// the enclosing container; there is no relayout pass.
///
/// A container whose size comes from its content is placed provisionally and
/// moved, together with everything drawn inside it, when it closes. Its fill is
/// recorded beneath its children in paint order.
#[derive(Debug)]
pub struct Canvas {
    defaults: RectSpec,
    stack: Vec<LayoutContext>,
    list: DrawList,
}

const Z: ZIndex = ZIndex::BASE;

impl Canvas {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_draw_list(viewport, DrawList::new())
    }

    /// Records into `list`, cleared first, to reuse its allocations.
    pub fn with_draw_list(viewport: Viewport, mut list: DrawList) -> Self {
        if !viewport.is_valid() {
            log::warn!("canvas viewport {viewport:?} is not a valid size");
        }
        list.clear();
        Self { defaults: RectSpec::default(), stack: vec![LayoutContext::root(viewport.as_rect())], list }
    }

    /// Spec merged under every `begin_rect` / `draw_rect` call.
    pub fn with_defaults(mut self, defaults: RectSpec) -> Self {
        self.defaults = defaults;
        self
    }

    /// Runs one layout pass and returns the complete draw list.
    ///
    /// Any error aborts the pass; no partial frame is returned.
    pub fn frame<F>(viewport: Viewport, build: F) -> Result<DrawList, LayoutError>
    where
        F: FnOnce(&mut Canvas) -> Result<(), LayoutError>,
    {
        Canvas::new(viewport).run(build)
    }

    /// Like [`frame`](Self::frame), on an already configured canvas.
    pub fn run<F>(mut self, build: F) -> Result<DrawList, LayoutError>
    where
        F: FnOnce(&mut Canvas) -> Result<(), LayoutError>,
    {
        build(&mut self)?;
        self.finish()
    }

    /// Number of open containers.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Interior of the innermost open container. Sizes are NaN while sized to content.
    pub fn interior(&self) -> Rect {
        self.top().interior()
    }

    /// Opens a container and returns its placement so far.
    pub fn begin_rect(&mut self, spec: &RectSpec) -> Result<PlacedRect, LayoutError> {
        let spec = spec.merge(&self.defaults);
        let resolved = self.resolve(&spec)?;
        let depth = self.stack.len();

        let parent = self.top_mut();
        if resolved.placement.flows && resolved.w.is_some() {
            parent.wrap_for(resolved.outer().x);
        }
        let size = resolved.size();
        let (origin, _) = parent.place(&resolved.placement, size);
        let rect = Rect::from_origin_size(origin, size);
        let sized = resolved.w.is_some() && resolved.h.is_some();
        if sized {
            if resolved.placement.flows {
                parent.advance_past(rect, resolved.placement.margin);
            }
            parent.include(rect, resolved.placement.margin);
        }

        let fill = spec.color.clone().map(|paint| (self.list.reserve(Z), paint));
        let key = fill.as_ref().map(|(key, _)| *key);
        let pending = Pending {
            placement: resolved.placement,
            auto_w: resolved.w.is_none(),
            auto_h: resolved.h.is_none(),
            mark: self.list.len(),
            fill,
        };
        log::trace!("begin_rect depth {depth}: {rect:?}");
        self.stack.push(LayoutContext::open(rect, spec.padding.unwrap_or_default(), pending));
        Ok(PlacedRect { rect, paint: spec.color, depth, key })
    }

    /// Places a leaf rect inside the innermost container. Auto sizes are zero.
    pub fn draw_rect(&mut self, spec: &RectSpec) -> Result<PlacedRect, LayoutError> {
        let spec = spec.merge(&self.defaults);
        let mut resolved = self.resolve(&spec)?;
        resolved.w.get_or_insert(0.0);
        resolved.h.get_or_insert(0.0);
        let depth = self.stack.len();

        let parent = self.top_mut();
        let flows = resolved.placement.flows;
        if flows {
            parent.wrap_for(resolved.outer().x);
        }
        let (origin, _) = parent.place(&resolved.placement, resolved.size());
        let rect = Rect::from_origin_size(origin, resolved.size());
        if flows {
            parent.advance_past(rect, resolved.placement.margin);
        }
        parent.include(rect, resolved.placement.margin);

        let key = spec.color.as_ref().map(|paint| {
            let key = self.list.reserve(Z);
            self.list.push_reserved(key, DrawCmd::Rect(RectCmd::new(rect, paint.clone())));
            key
        });
        log::trace!("draw_rect depth {depth}: {rect:?}");
        Ok(PlacedRect { rect, paint: spec.color, depth, key })
    }

    /// Closes the innermost container, measuring content-sized axes and
    /// applying any alignment that waited for them.
    pub fn end_rect(&mut self) -> Result<PlacedRect, LayoutError> {
        if self.stack.len() < 2 {
            return Err(LayoutError::Unbalanced);
        }
        let mut ctx = self.stack.pop().ok_or(LayoutError::Unbalanced)?;
        let pending = ctx.pending.take().ok_or(LayoutError::Unbalanced)?;
        let placement = pending.placement;
        let margin = placement.margin;

        if pending.auto_w {
            ctx.rect.size.x = ctx.extent.x + ctx.padding.h();
        }
        if pending.auto_h {
            ctx.rect.size.y = ctx.extent.y + ctx.padding.v();
        }
        let outer_w = ctx.rect.size.x + margin.h();

        let depth = self.stack.len();
        let parent = self.stack.last_mut().ok_or(LayoutError::Unbalanced)?;
        if pending.auto_w || pending.auto_h {
            if placement.flows && pending.auto_w {
                parent.wrap_for(outer_w);
            }
            let (origin, _) = parent.place(&placement, ctx.rect.size);
            self.list.translate_since(pending.mark, origin - ctx.rect.origin);
            ctx.rect.origin = origin;
            if placement.flows {
                parent.advance_past(ctx.rect, margin);
            }
            parent.include(ctx.rect, margin);
        }

        let (key, paint) = match pending.fill {
            Some((key, paint)) => {
                self.list.push_reserved(key, DrawCmd::Rect(RectCmd::new(ctx.rect, paint.clone())));
                (Some(key), Some(paint))
            }
            None => (None, None),
        };
        log::trace!("end_rect depth {depth}: {:?}", ctx.rect);
        Ok(PlacedRect { rect: ctx.rect, paint, depth, key })
    }

    /// Ends the pass. Fails if containers remain open.
    pub fn finish(self) -> Result<DrawList, LayoutError> {
        let depth = self.depth();
        if depth > 0 {
            return Err(LayoutError::Unclosed { depth });
        }
        log::debug!("canvas pass finished with {} draw item(s)", self.list.len());
        Ok(self.list)
    }

    #[inline]
    fn top(&self) -> &LayoutContext {
        // The root context is never popped.
        &self.stack[self.stack.len() - 1]
    }

    #[inline]
    fn top_mut(&mut self) -> &mut LayoutContext {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn resolve(&self, spec: &RectSpec) -> Result<Resolved, LayoutError> {
        let interior = self.top().interior();
        let w = resolve_size("w", spec.w, Axis::X, interior)?;
        let h = resolve_size("h", spec.h, Axis::Y, interior)?;
        let x = resolve_anchor("x", spec.x, Axis::X, interior)?;
        let y = resolve_anchor("y", spec.y, Axis::Y, interior)?;
        let flows = spec.walk.unwrap_or_default() == Walk::LrtbWrap && x.is_flow() && y.is_flow();
        Ok(Resolved {
            w,
            h,
            placement: Placement {
                x,
                y,
                align: spec.align.unwrap_or_default(),
                flows,
                margin: spec.margin.unwrap_or_default(),
            },
        })
    }
}

/// A spec resolved against its parent's interior.
struct Resolved {
    w: Option<f32>,
    h: Option<f32>,
    placement: Placement,
}

impl Resolved {
    fn size(&self) -> Vec2 {
        Vec2::new(self.w.unwrap_or(f32::NAN), self.h.unwrap_or(f32::NAN))
    }

    fn outer(&self) -> Vec2 {
        let m = self.placement.margin;
        let s = self.size();
        Vec2::new(s.x + m.h(), s.y + m.v())
    }
}

fn axis_len(rect: Rect, axis: Axis) -> f32 {
    match axis {
        Axis::X => rect.size.x,
        Axis::Y => rect.size.y,
    }
}

fn unresolved(field: &'static str, value: LayoutValue) -> LayoutError {
    LayoutError::UnresolvedAxis { field, value: value.to_string() }
}

/// `w`/`h`: `None` when sized to content, otherwise clamped to `>= 0`.
fn resolve_size(
    field: &'static str,
    value: Option<LayoutValue>,
    axis: Axis,
    interior: Rect,
) -> Result<Option<f32>, LayoutError> {
    let Some(value) = value.filter(|v| !v.is_auto()) else {
        return Ok(None);
    };
    if let Some(d @ (Directive::Left | Directive::Right | Directive::Top | Directive::Bottom | Directive::Center)) =
        value.directive()
    {
        return Err(LayoutError::invalid(format!("`{field}` cannot use the `{}` anchor", d.name())));
    }
    let reference = axis_len(interior, value.reference_axis(axis));
    let len = value.resolve(reference).ok_or_else(|| unresolved(field, value))?;
    Ok(Some(len.max(0.0)))
}

/// `x`/`y`: explicit anchors; absent or auto means flow placement.
fn resolve_anchor(
    field: &'static str,
    value: Option<LayoutValue>,
    axis: Axis,
    interior: Rect,
) -> Result<AxisAnchor, LayoutError> {
    let Some(value) = value.filter(|v| !v.is_auto()) else {
        return Ok(AxisAnchor::Flow);
    };
    let wrong_axis = match (value.directive(), axis) {
        (Some(d @ (Directive::Left | Directive::Right)), Axis::Y) => Some(d),
        (Some(d @ (Directive::Top | Directive::Bottom)), Axis::X) => Some(d),
        _ => None,
    };
    if let Some(d) = wrong_axis {
        return Err(LayoutError::invalid(format!("`{field}` cannot use the `{}` anchor", d.name())));
    }

    let reference = axis_len(interior, value.reference_axis(axis));
    let offset = value.resolve(reference).ok_or_else(|| unresolved(field, value))?;
    let own_len = axis_len(interior, axis);
    Ok(match value.directive() {
        Some(Directive::Right | Directive::Bottom) if own_len.is_nan() => return Err(unresolved(field, value)),
        Some(Directive::Center) if own_len.is_nan() => return Err(unresolved(field, value)),
        Some(Directive::Right | Directive::Bottom) => AxisAnchor::End(offset),
        Some(Directive::Center) => AxisAnchor::Center(offset),
        _ => AxisAnchor::Start(offset),
    })
}
