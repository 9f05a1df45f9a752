//! Tessera canvas: immediate-mode rectangle layout on top of `tessera-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tessera_canvas::prelude::*;
//!
//! let list = Canvas::frame(Viewport::new(800.0, 600.0), |c| {
//!     c.begin_rect(&RectSpec::new().align(Align::CENTER).padding(10.0).color_str("orange")?)?;
//!     for _ in 0..3 {
//!         c.draw_rect(&RectSpec::new().walk(Walk::LrtbWrap).w(50).h(50).margin(2.0).color_str("red")?)?;
//!     }
//!     c.end_rect()?;
//!     Ok(())
//! })?;
//! // Hand `list` to a `Renderer`.
//! ```
//!
//! # Layout values
//!
//! Sizes (`w`, `h`) and positions (`x`, `y`) take a [`LayoutValue`], parsed from
//!
//! ```text
//! value     := "auto" | [directive "("] expr [")"]
//! directive := "left" | "right" | "top" | "bottom" | "center" | "width" | "height"
//! expr      := ["+" | "-"] term (("+" | "-") term)*
//! term      := number ["%"]
//! ```
//!
//! Whitespace is ignored. Percent terms are taken of the parent interior's
//! axis (the field's own axis unless `width(..)` / `height(..)` says otherwise)
//! and rounded before the pixel terms are added. `right`/`bottom` measure from
//! the far edge and `center` from the centred position.

mod align;
mod canvas;
mod context;
mod edges;
mod error;
mod spec;
mod value;

pub use align::{Align, HAlign, VAlign, Walk};
pub use canvas::{Canvas, PlacedRect};
pub use edges::{Edges, inset_rect};
pub use error::LayoutError;
pub use spec::RectSpec;
pub use value::{Directive, LayoutValue};

/// Everything needed to lay out a frame.
pub mod prelude {
    pub use crate::{Align, Canvas, Edges, LayoutError, LayoutValue, PlacedRect, RectSpec, Walk};

    // Engine primitives.
    pub use tessera_engine::coords::{Rect, Vec2, Viewport};
    pub use tessera_engine::paint::{Color, Paint};
    pub use tessera_engine::scene::DrawList;
}
