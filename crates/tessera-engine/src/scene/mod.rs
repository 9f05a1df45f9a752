//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands emitted by the canvas
//! - provide deterministic ordering (z-index + insertion order)
//! - let the canvas shift an already-recorded subtree once a deferred
//!   alignment becomes known

mod cmd;
mod key;
mod list;

pub mod shapes;

pub use cmd::DrawCmd;
pub use key::{SortKey, ZIndex};
pub use list::{DrawItem, DrawList};
pub use shapes::RectCmd;
