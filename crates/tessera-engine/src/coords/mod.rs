//! Coordinate and geometry types shared by the layout engine, the draw stream
//! and the texture samplers.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Texture coordinates (`Vec2` in `[0, 1]`) follow the device convention instead:
//! `v = 0` addresses the first uploaded row.

mod color;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
