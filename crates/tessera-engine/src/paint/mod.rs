//! Paint model shared between the layout engine and the renderer.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - fill sources (solid color, texture image)
//!
//! Geometry types remain in `coords`.

pub mod color;

use std::sync::Arc;

pub use color::{Color, ParseColorError};

use crate::texture::{SampleMode, Texture};

/// Image fill: a texture plus the sampling helper used to read it.
#[derive(Debug, Clone)]
pub struct TextureFill {
    pub texture: Arc<Texture>,
    pub mode: SampleMode,
}

impl TextureFill {
    #[inline]
    pub fn new(texture: Arc<Texture>, mode: SampleMode) -> Self {
        Self { texture, mode }
    }
}

/// Fills compare by texture identity, not by pixel content.
impl PartialEq for TextureFill {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.texture, &other.texture) && self.mode == other.mode
    }
}

/// Paint source for filling a placed rectangle.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Texture(TextureFill),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    /// Bilinear, clamped image fill.
    #[inline]
    pub fn texture(texture: Arc<Texture>) -> Self {
        Paint::Texture(TextureFill::new(texture, SampleMode::Sample))
    }

    #[inline]
    pub fn is_opaque(&self) -> bool {
        match self {
            Paint::Solid(c) => c.is_opaque(),
            // Pixel content is only known on the device.
            Paint::Texture(_) => false,
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

/// Straight `[r, g, b, a]`.
impl From<[f32; 4]> for Paint {
    fn from(rgba: [f32; 4]) -> Self {
        Paint::Solid(Color::from_array(rgba))
    }
}

impl From<TextureFill> for Paint {
    fn from(fill: TextureFill) -> Self {
        Paint::Texture(fill)
    }
}
