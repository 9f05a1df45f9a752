use crate::coords::{ColorRgba, Vec2};
use crate::device::{Device, SamplerConfig};

use super::{Texture, TextureError};

/// Sampler preset used by a texture fill or a direct sample call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum SampleMode {
    /// Bilinear, clamped.
    #[default]
    Sample,
    /// Bilinear, clamped, with `v` mirrored.
    Flipped,
    /// Nearest texel, clamped.
    Point,
    /// Nearest texel, clamped, with `v` mirrored.
    PointFlipped,
}

impl SampleMode {
    pub fn sampler(self) -> SamplerConfig {
        match self {
            SampleMode::Sample | SampleMode::Flipped => SamplerConfig::LINEAR_CLAMP,
            SampleMode::Point | SampleMode::PointFlipped => SamplerConfig::NEAREST_CLAMP,
        }
    }

    #[inline]
    pub fn is_flipped(self) -> bool {
        matches!(self, SampleMode::Flipped | SampleMode::PointFlipped)
    }

    /// Coordinate actually handed to the device.
    #[inline]
    pub fn map_uv(self, uv: Vec2) -> Vec2 {
        if self.is_flipped() { Vec2::new(uv.x, 1.0 - uv.y) } else { uv }
    }
}

impl Texture {
    /// Reads one filtered texel at `uv` using `mode`.
    ///
    /// Materializes the device handle for `mode` on first use.
    pub fn fetch(&self, device: &mut dyn Device, uv: Vec2, mode: SampleMode) -> Result<ColorRgba, TextureError> {
        let handle = self
            .resolve_device_handle(device, &mode.sampler())?
            .ok_or(TextureError::Empty { id: self.id() })?;
        device.fetch(handle, mode.map_uv(uv)).map_err(TextureError::device(self.id()))
    }

    pub fn sample(&self, device: &mut dyn Device, uv: Vec2) -> Result<ColorRgba, TextureError> {
        self.fetch(device, uv, SampleMode::Sample)
    }

    pub fn sample_xy(&self, device: &mut dyn Device, x: f32, y: f32) -> Result<ColorRgba, TextureError> {
        self.sample(device, Vec2::new(x, y))
    }

    pub fn flipped(&self, device: &mut dyn Device, uv: Vec2) -> Result<ColorRgba, TextureError> {
        self.fetch(device, uv, SampleMode::Flipped)
    }

    pub fn flipped_xy(&self, device: &mut dyn Device, x: f32, y: f32) -> Result<ColorRgba, TextureError> {
        self.flipped(device, Vec2::new(x, y))
    }

    pub fn point(&self, device: &mut dyn Device, uv: Vec2) -> Result<ColorRgba, TextureError> {
        self.fetch(device, uv, SampleMode::Point)
    }

    pub fn point_xy(&self, device: &mut dyn Device, x: f32, y: f32) -> Result<ColorRgba, TextureError> {
        self.point(device, Vec2::new(x, y))
    }

    pub fn point_flipped(&self, device: &mut dyn Device, uv: Vec2) -> Result<ColorRgba, TextureError> {
        self.fetch(device, uv, SampleMode::PointFlipped)
    }

    pub fn point_flipped_xy(&self, device: &mut dyn Device, x: f32, y: f32) -> Result<ColorRgba, TextureError> {
        self.point_flipped(device, Vec2::new(x, y))
    }
}
