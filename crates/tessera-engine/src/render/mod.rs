//! Render pass.
//!
//! Walks a recorded [`DrawList`](crate::scene::DrawList) in paint order against a
//! [`Device`](crate::device::Device), resolving texture fills to device handles
//! and producing one [`RenderBatch`] per visible rect.
//!
//! Convention:
//! - geometry stays in logical pixels (top-left origin, +Y down)
//! - the target framebuffer is bound for the duration of the pass only

mod batch;
mod error;
mod renderer;

pub use batch::{BatchFill, RenderBatch};
pub use error::RenderError;
pub use renderer::Renderer;
