use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::device::{
    Device, DeviceError, FramebufferHandle, RenderbufferHandle, SamplerConfig, TextureHandle, Upload,
};

use super::{DecodedImage, RenderTargetFormat, TextureError, TextureFlags};

/// Process-wide id counter. The first texture gets id 1.
static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Monotonically increasing texture identity.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        Self(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// CPU-side pixels a texture uploads from.
#[derive(Debug, Clone)]
pub enum PixelSource {
    /// No pixels: render targets and `from_type` placeholders.
    None,
    /// Raw RGBA8 rows.
    Array(Arc<[u8]>),
    /// Decoded image, remembered with the path it was loaded from.
    Image { path: PathBuf, image: DecodedImage },
}

impl PixelSource {
    fn shared_rgba(&self) -> Option<Arc<[u8]>> {
        match self {
            PixelSource::None => None,
            PixelSource::Array(bytes) => Some(Arc::clone(bytes)),
            PixelSource::Image { image, .. } => Some(Arc::clone(&image.rgba)),
        }
    }
}

/// Device objects backing a render target.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Attachments {
    framebuffer: FramebufferHandle,
    color: TextureHandle,
    depth: Option<RenderbufferHandle>,
}

impl Attachments {
    fn release(self, device: &mut dyn Device) {
        device.delete_framebuffer(self.framebuffer);
        device.delete_texture(self.color);
        if let Some(rb) = self.depth {
            device.delete_renderbuffer(rb);
        }
    }
}

/// Objects created so far while building attachments, for rollback.
#[derive(Default)]
struct PartialAttachments {
    framebuffer: Option<FramebufferHandle>,
    color: Option<TextureHandle>,
    depth: Option<RenderbufferHandle>,
}

impl PartialAttachments {
    fn release(self, device: &mut dyn Device) {
        if let Some(rb) = self.depth {
            device.delete_renderbuffer(rb);
        }
        if let Some(tex) = self.color {
            device.delete_texture(tex);
        }
        if let Some(fb) = self.framebuffer {
            device.delete_framebuffer(fb);
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct SamplerHandle {
    handle: TextureHandle,
    update_id: u64,
}

#[derive(Debug)]
struct TextureState {
    width: u32,
    height: u32,
    source: PixelSource,
    update_id: u64,
    handles: HashMap<SamplerConfig, SamplerHandle>,
    attachments: Option<Attachments>,
}

/// A GPU texture resource: pixel source, declared type and the device
/// handles materialized for it.
///
/// Textures are shared through `Arc` (the cache hands out clones), so mutable
/// state sits behind a mutex. Device objects are never released implicitly;
/// call [`delete`](Self::delete) on the device thread.
#[derive(Debug)]
pub struct Texture {
    id: TextureId,
    flags: TextureFlags,
    render_target: bool,
    /// Pixels the texture was built from; its cache key derives from these.
    built_from: Option<Arc<[u8]>>,
    state: Mutex<TextureState>,
}

impl Texture {
    pub(crate) fn new(flags: TextureFlags, width: u32, height: u32, source: PixelSource) -> Self {
        Self {
            id: TextureId::next(),
            flags,
            render_target: false,
            built_from: source.shared_rgba(),
            state: Mutex::new(TextureState {
                width,
                height,
                source,
                update_id: 0,
                handles: HashMap::new(),
                attachments: None,
            }),
        }
    }

    /// An uninitialized render target; an empty flag set means `RGBA|DEPTH|STENCIL`.
    pub(crate) fn render_target(flags: TextureFlags, width: u32, height: u32) -> Self {
        let flags = if flags.is_empty() { TextureFlags::RENDER_TARGET_DEFAULT } else { flags };
        Self { render_target: true, ..Self::new(flags, width, height, PixelSource::None) }
    }

    #[inline]
    pub fn id(&self) -> TextureId {
        self.id
    }

    #[inline]
    pub fn flags(&self) -> TextureFlags {
        self.flags
    }

    /// `"Texture.RGBA|Texture.DEPTH"`-style description of the declared type.
    pub fn type_string(&self) -> String {
        self.flags.describe()
    }

    #[inline]
    pub fn is_render_target(&self) -> bool {
        self.render_target
    }

    pub fn size(&self) -> (u32, u32) {
        let st = self.state.lock();
        (st.width, st.height)
    }

    /// Version stamp of the pixel source; handles older than this are re-uploaded.
    pub fn update_id(&self) -> u64 {
        self.state.lock().update_id
    }

    pub fn framebuffer(&self) -> Option<FramebufferHandle> {
        self.state.lock().attachments.map(|a| a.framebuffer)
    }

    pub fn color_attachment(&self) -> Option<TextureHandle> {
        self.state.lock().attachments.map(|a| a.color)
    }

    pub fn depth_attachment(&self) -> Option<RenderbufferHandle> {
        self.state.lock().attachments.and_then(|a| a.depth)
    }

    /// Number of per-sampler device handles currently materialized.
    pub fn device_handle_count(&self) -> usize {
        self.state.lock().handles.len()
    }

    /// Path the pixels were loaded from, for image-backed textures.
    pub fn source_path(&self) -> Option<PathBuf> {
        match &self.state.lock().source {
            PixelSource::Image { path, .. } => Some(path.clone()),
            _ => None,
        }
    }

    pub(crate) fn has_source_path(&self, path: &Path) -> bool {
        matches!(&self.state.lock().source, PixelSource::Image { path: p, .. } if p == path)
    }

    /// Whether the texture was built from exactly `bytes`.
    ///
    /// Later [`set_pixels`](Self::set_pixels) calls do not change the answer.
    pub fn built_from(&self, bytes: &[u8]) -> bool {
        self.built_from.as_deref() == Some(bytes)
    }

    // ── pixel updates ─────────────────────────────────────────────────────

    /// Replaces the pixel source and bumps the version stamp.
    ///
    /// A cached texture keeps the cache key it was built under.
    pub fn set_pixels(&self, rgba: impl Into<Arc<[u8]>>, width: u32, height: u32) -> Result<(), TextureError> {
        let rgba = rgba.into();
        check_rgba_len(&rgba, width, height)?;
        let mut st = self.state.lock();
        st.source = PixelSource::Array(rgba);
        st.width = width;
        st.height = height;
        st.update_id += 1;
        Ok(())
    }

    /// Marks existing device handles stale without touching the pixels.
    pub fn mark_updated(&self) {
        self.state.lock().update_id += 1;
    }

    // ── render target lifecycle ───────────────────────────────────────────

    /// Allocates framebuffer, colour texture and optional depth/stencil storage.
    ///
    /// Either every object is created and attached, or none is left behind.
    pub fn init_as_render_target(&self, device: &mut dyn Device) -> Result<(), TextureError> {
        let mut st = self.state.lock();
        self.init_locked(&mut st, device)
    }

    fn init_locked(&self, st: &mut TextureState, device: &mut dyn Device) -> Result<(), TextureError> {
        if let Some(old) = st.attachments.take() {
            old.release(device);
        }

        let format = RenderTargetFormat::negotiate(self.flags, device).map_err(|extension| {
            TextureError::UnsupportedFormat { id: self.id, flags: self.flags.describe(), extension }
        })?;

        let mut partial = PartialAttachments::default();
        match build_attachments(device, &mut partial, format, st.width, st.height) {
            Ok(attachments) => {
                log::debug!(
                    "texture {}: render target {}x{} ({}) fb={} color={}",
                    self.id,
                    st.width,
                    st.height,
                    self.flags,
                    attachments.framebuffer,
                    attachments.color
                );
                st.attachments = Some(attachments);
                Ok(())
            }
            Err(source) => {
                partial.release(device);
                Err(TextureError::Device { id: self.id, source })
            }
        }
    }

    /// Rebuilds attachments at a new size, keeping id and flags.
    ///
    /// A texture without live attachments only records the new size.
    pub fn resize(&self, device: &mut dyn Device, width: u32, height: u32) -> Result<(), TextureError> {
        let mut st = self.state.lock();
        st.width = width;
        st.height = height;
        match st.attachments.take() {
            Some(old) => {
                old.release(device);
                self.init_locked(&mut st, device)
            }
            None => Ok(()),
        }
    }

    /// Releases every device object held by this texture. Idempotent.
    pub fn delete(&self, device: &mut dyn Device) {
        let mut st = self.state.lock();
        let mut released = 0usize;
        if let Some(a) = st.attachments.take() {
            a.release(device);
            released += 1;
        }
        for (_, h) in st.handles.drain() {
            device.delete_texture(h.handle);
            released += 1;
        }
        if released > 0 {
            log::debug!("texture {}: released {released} device object group(s)", self.id);
        }
    }

    // ── device handles ────────────────────────────────────────────────────

    /// Returns the device texture to sample with `sampler`, creating or
    /// refreshing it as needed.
    ///
    /// Render targets hand out their colour attachment. Textures without pixels
    /// resolve to `None`.
    pub fn resolve_device_handle(
        &self,
        device: &mut dyn Device,
        sampler: &SamplerConfig,
    ) -> Result<Option<TextureHandle>, TextureError> {
        let mut st = self.state.lock();

        if let Some(a) = st.attachments {
            device.set_sampler(a.color, sampler).map_err(TextureError::device(self.id))?;
            return Ok(Some(a.color));
        }

        let Some(rgba) = st.source.shared_rgba() else {
            return Ok(None);
        };
        let (width, height) = (st.width, st.height);
        let current = st.update_id;
        let upload = Upload::rgba8(width, height, &rgba, sampler);

        if let Some(existing) = st.handles.get(sampler).copied() {
            if existing.update_id >= current {
                return Ok(Some(existing.handle));
            }
            device.upload_2d(existing.handle, &upload).map_err(TextureError::device(self.id))?;
            st.handles.insert(*sampler, SamplerHandle { handle: existing.handle, update_id: current });
            log::trace!("texture {}: refreshed {} to update {current}", self.id, existing.handle);
            return Ok(Some(existing.handle));
        }

        let handle = device.create_texture().map_err(TextureError::device(self.id))?;
        let configured = device
            .upload_2d(handle, &upload)
            .and_then(|()| device.set_sampler(handle, sampler));
        if let Err(source) = configured {
            device.delete_texture(handle);
            return Err(TextureError::Device { id: self.id, source });
        }

        st.handles.insert(*sampler, SamplerHandle { handle, update_id: current });
        log::debug!("texture {}: materialized {handle} for {sampler:?}", self.id);
        Ok(Some(handle))
    }
}

fn build_attachments(
    device: &mut dyn Device,
    partial: &mut PartialAttachments,
    format: RenderTargetFormat,
    width: u32,
    height: u32,
) -> Result<Attachments, DeviceError> {
    let framebuffer = device.create_framebuffer()?;
    partial.framebuffer = Some(framebuffer);

    let color = device.create_texture()?;
    partial.color = Some(color);
    device.set_sampler(color, &SamplerConfig::NEAREST_CLAMP)?;
    device.upload_2d(color, &Upload::storage(width, height, format.color, format.data_type))?;
    device.attach_color(framebuffer, color)?;

    let depth = match format.depth {
        Some(depth_format) => {
            let rb = device.create_renderbuffer()?;
            partial.depth = Some(rb);
            device.renderbuffer_storage(rb, depth_format, width, height)?;
            device.attach_depth(framebuffer, rb, depth_format)?;
            Some(rb)
        }
        None => None,
    };

    Ok(Attachments { framebuffer, color, depth })
}

pub(crate) fn check_rgba_len(rgba: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    if rgba.len() as u64 != width as u64 * height as u64 * 4 {
        return Err(TextureError::SizeMismatch { width, height, len: rgba.len() });
    }
    Ok(())
}
