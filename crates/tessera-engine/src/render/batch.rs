use crate::coords::Rect;
use crate::device::{SamplerConfig, TextureHandle};
use crate::paint::Color;
use crate::scene::SortKey;
use crate::texture::TextureId;

/// Fill of one batch, with textures already resolved to device handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatchFill {
    Solid(Color),
    Textured {
        texture: TextureId,
        handle: TextureHandle,
        sampler: SamplerConfig,
        /// Mirror `v` when generating texture coordinates.
        flip_v: bool,
    },
}

/// One rect ready for submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderBatch {
    pub key: SortKey,
    pub rect: Rect,
    pub fill: BatchFill,
}
