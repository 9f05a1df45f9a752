//! Texture resource manager.
//!
//! This module is responsible for:
//! - texture resources (pixel source, declared type, per-sampler device handles)
//! - render-target allocation with extension negotiation
//! - a content-addressed, single-flight [`TextureCache`]
//! - image loading behind the [`ImageLoader`] seam
//!
//! Device objects are only created and deleted through a `&mut dyn Device`,
//! i.e. on the thread owning the device.

mod cache;
mod config;
mod error;
mod flags;
mod format;
mod image;
mod manager;
mod resource;
mod sampling;

pub use cache::{CacheKey, CacheOutcome, CacheStats, TextureCache};
pub use config::{CachePolicy, CollisionPolicy, ImageKeying, TextureConfig};
pub use error::TextureError;
pub use flags::TextureFlags;
pub use format::{DataTypeRequest, RenderTargetFormat};
pub use image::{DecodedImage, FsImageLoader, ImageLoader, ImagePath, Rgba8};
pub use manager::{TextureManager, TextureStub};
pub use resource::{PixelSource, Texture, TextureId};
pub use sampling::SampleMode;

pub use crate::device::SamplerConfig;
