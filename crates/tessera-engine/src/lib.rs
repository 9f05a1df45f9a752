//! Tessera engine crate.
//!
//! Owns the pieces below the layout layer: geometry, paints, the recorded draw
//! stream, texture resources and their cache, the device contract with an
//! in-memory implementation, and the render pass.

pub mod coords;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod texture;
