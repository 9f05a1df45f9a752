use crate::coords::Vec2;
use crate::scene::shapes::RectCmd;

/// Renderer-agnostic draw command stream.
///
/// The canvas only ever emits filled rectangles; image fills travel inside
/// the rect's [`Paint`](crate::paint::Paint).
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
}

impl DrawCmd {
    #[inline]
    pub(crate) fn translate(&mut self, delta: Vec2) {
        match self {
            DrawCmd::Rect(r) => r.translate(delta),
        }
    }
}
