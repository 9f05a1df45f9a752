use std::path::PathBuf;

use crate::device::DeviceError;

use super::{CacheKey, TextureId};

/// Failure of a texture-manager operation.
///
/// Every variant names the resource or input involved so callers can log and
/// skip the offending item.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The device lacks an extension the declared type needs. Nothing was allocated.
    #[error("texture {id} ({flags}) needs unsupported extension `{extension}`")]
    UnsupportedFormat {
        id: TextureId,
        flags: String,
        extension: &'static str,
    },

    /// A cache hit whose stored content differs from the requested content.
    #[error("cache key {key} is already taken by different content")]
    CacheKeyCollision { key: CacheKey },

    #[error("{len} bytes cannot hold a {width}x{height} RGBA8 image")]
    SizeMismatch { width: u32, height: u32, len: usize },

    /// Sampling or uploading a texture that has neither pixels nor attachments.
    #[error("texture {id} has no pixel source")]
    Empty { id: TextureId },

    #[error("failed to load image {}: {reason}", path.display())]
    ImageLoad { path: PathBuf, reason: String },

    #[error("texture {id}: device call failed")]
    Device {
        id: TextureId,
        #[source]
        source: DeviceError,
    },
}

impl TextureError {
    pub(crate) fn device(id: TextureId) -> impl FnOnce(DeviceError) -> Self {
        move |source| TextureError::Device { id, source }
    }
}
