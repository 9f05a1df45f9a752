use crate::device::DeviceError;
use crate::texture::{TextureError, TextureId};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The target texture has no framebuffer (deleted or never initialized).
    #[error("render target {id} has no framebuffer")]
    TargetNotReady { id: TextureId },

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("device call failed during render pass")]
    Device(#[from] DeviceError),
}
