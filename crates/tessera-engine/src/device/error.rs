use super::{FramebufferHandle, RenderbufferHandle, TextureHandle};

/// Failure reported by a [`Device`](super::Device) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("device could not create a {kind} object")]
    OutOfObjects { kind: &'static str },

    #[error("unknown texture {0}")]
    UnknownTexture(TextureHandle),

    #[error("unknown framebuffer {0}")]
    UnknownFramebuffer(FramebufferHandle),

    #[error("unknown renderbuffer {0}")]
    UnknownRenderbuffer(RenderbufferHandle),

    #[error("invalid upload: {reason}")]
    InvalidUpload { reason: String },

    #[error("{width}x{height} exceeds the maximum texture size {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("texture {0} has no storage")]
    NoStorage(TextureHandle),
}
