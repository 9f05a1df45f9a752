//! Device contract consumed by the texture manager and the renderer.
//!
//! This module is responsible for:
//! - the object-level capability surface a rendering context must offer
//!   (textures, framebuffers, renderbuffers, uploads, extension queries)
//! - an in-memory [`HeadlessDevice`] implementing that surface
//! - a [`DeviceQueue`] for handing device work to the owning thread
//!
//! Device objects must only be touched on the thread that owns the device.
//! Other threads enqueue closures through [`DeviceQueue`].

mod error;
mod handles;
mod headless;
mod params;
mod queue;

pub use error::DeviceError;
pub use handles::{FramebufferHandle, RenderbufferHandle, TextureHandle};
pub use headless::{DeviceStats, FailPoint, HeadlessConfig, HeadlessDevice};
pub use params::{DataType, DepthFormat, Filter, PixelFormat, SamplerConfig, Upload, Wrap};
pub use queue::{DeviceJob, DeviceQueue, DeviceQueueHandle};

use crate::coords::{ColorRgba, Vec2};

/// GL-style object interface of a rendering context.
///
/// Deleting an object that no longer exists is a no-op, matching GL semantics.
pub trait Device {
    fn create_texture(&mut self) -> Result<TextureHandle, DeviceError>;
    fn delete_texture(&mut self, texture: TextureHandle);

    fn create_framebuffer(&mut self) -> Result<FramebufferHandle, DeviceError>;
    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle);

    fn create_renderbuffer(&mut self) -> Result<RenderbufferHandle, DeviceError>;
    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle);

    /// Sets filtering and wrapping used when `texture` is sampled.
    fn set_sampler(&mut self, texture: TextureHandle, sampler: &SamplerConfig) -> Result<(), DeviceError>;

    /// Specifies level 0 of `texture`, replacing any previous storage.
    fn upload_2d(&mut self, texture: TextureHandle, upload: &Upload<'_>) -> Result<(), DeviceError>;

    fn renderbuffer_storage(
        &mut self,
        renderbuffer: RenderbufferHandle,
        format: DepthFormat,
        width: u32,
        height: u32,
    ) -> Result<(), DeviceError>;

    fn attach_color(&mut self, framebuffer: FramebufferHandle, texture: TextureHandle) -> Result<(), DeviceError>;

    fn attach_depth(
        &mut self,
        framebuffer: FramebufferHandle,
        renderbuffer: RenderbufferHandle,
        format: DepthFormat,
    ) -> Result<(), DeviceError>;

    /// Binds `framebuffer` as the draw target; `None` restores the default target.
    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) -> Result<(), DeviceError>;

    fn bound_framebuffer(&self) -> Option<FramebufferHandle>;

    /// Extension-capability query (`"OES_texture_float"`, ...).
    fn has_extension(&self, name: &str) -> bool;

    /// Filtered read of `texture` at normalized `uv`, using its sampler parameters.
    fn fetch(&self, texture: TextureHandle, uv: Vec2) -> Result<ColorRgba, DeviceError>;
}
