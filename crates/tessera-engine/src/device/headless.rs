use std::collections::HashMap;

use crate::coords::{ColorRgba, Vec2};

use super::{
    DataType, DepthFormat, Device, DeviceError, Filter, FramebufferHandle, PixelFormat,
    RenderbufferHandle, SamplerConfig, TextureHandle, Upload, Wrap,
};

/// Configuration of a [`HeadlessDevice`].
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Extension names reported by [`Device::has_extension`].
    pub extensions: Vec<String>,
    /// Largest accepted texture or renderbuffer dimension.
    pub max_texture_size: u32,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            // A bare WebGL1-class context: no float textures.
            extensions: Vec::new(),
            max_texture_size: 4096,
        }
    }
}

impl HeadlessConfig {
    pub fn with_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions.push(name.into());
        self
    }

    pub fn with_extensions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions.extend(names.into_iter().map(Into::into));
        self
    }
}

/// Object lifecycle counters, used to assert allocation behavior in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub textures_created: u32,
    pub textures_deleted: u32,
    pub framebuffers_created: u32,
    pub framebuffers_deleted: u32,
    pub renderbuffers_created: u32,
    pub renderbuffers_deleted: u32,
    pub uploads: u32,
}

impl DeviceStats {
    /// Objects currently alive across all kinds.
    pub fn live_objects(&self) -> u32 {
        (self.textures_created - self.textures_deleted)
            + (self.framebuffers_created - self.framebuffers_deleted)
            + (self.renderbuffers_created - self.renderbuffers_deleted)
    }
}

/// Operation that can be made to fail once via [`HeadlessDevice::fail_next`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FailPoint {
    CreateTexture,
    CreateFramebuffer,
    CreateRenderbuffer,
    Upload,
    RenderbufferStorage,
}

#[derive(Debug, Clone)]
struct HeadlessTexture {
    width: u32,
    height: u32,
    format: PixelFormat,
    data_type: DataType,
    texels: Vec<[f32; 4]>,
    sampler: SamplerConfig,
}

impl HeadlessTexture {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            format: PixelFormat::Rgba,
            data_type: DataType::UnsignedByte,
            texels: Vec::new(),
            sampler: SamplerConfig::default(),
        }
    }

    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let x = wrap_index(x, self.width, self.sampler.wrap_s);
        let y = wrap_index(y, self.height, self.sampler.wrap_t);
        self.texels[y * self.width as usize + x]
    }

    fn nearest(&self, uv: Vec2) -> [f32; 4] {
        let x = (uv.x * self.width as f32).floor() as i64;
        let y = (uv.y * self.height as f32).floor() as i64;
        self.texel(x, y)
    }

    fn bilinear(&self, uv: Vec2) -> [f32; 4] {
        let fx = uv.x * self.width as f32 - 0.5;
        let fy = uv.y * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let lerp = |a: [f32; 4], b: [f32; 4], t: f32| {
            [
                a[0] + (b[0] - a[0]) * t,
                a[1] + (b[1] - a[1]) * t,
                a[2] + (b[2] - a[2]) * t,
                a[3] + (b[3] - a[3]) * t,
            ]
        };
        let top = lerp(self.texel(x0, y0), self.texel(x0 + 1, y0), tx);
        let bottom = lerp(self.texel(x0, y0 + 1), self.texel(x0 + 1, y0 + 1), tx);
        lerp(top, bottom, ty)
    }
}

fn wrap_index(i: i64, n: u32, mode: Wrap) -> usize {
    let n = n as i64;
    let j = match mode {
        Wrap::ClampToEdge => i.clamp(0, n - 1),
        Wrap::Repeat => i.rem_euclid(n),
        Wrap::MirroredRepeat => {
            let m = i.rem_euclid(2 * n);
            if m < n { m } else { 2 * n - 1 - m }
        }
    };
    j as usize
}

#[derive(Debug, Clone, Default)]
struct HeadlessFramebuffer {
    color: Option<TextureHandle>,
    depth: Option<(RenderbufferHandle, DepthFormat)>,
}

/// In-memory device: keeps texel data on the CPU and filters on `fetch`.
///
/// Only the magnification filter is consulted when sampling; there are no mip levels.
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    config: HeadlessConfig,
    next_name: u32,
    textures: HashMap<TextureHandle, HeadlessTexture>,
    framebuffers: HashMap<FramebufferHandle, HeadlessFramebuffer>,
    renderbuffers: HashMap<RenderbufferHandle, Option<(DepthFormat, u32, u32)>>,
    bound: Option<FramebufferHandle>,
    stats: DeviceStats,
    fail: Vec<FailPoint>,
}

impl HeadlessDevice {
    pub fn new(config: HeadlessConfig) -> Self {
        log::debug!(
            "headless device created (extensions: [{}], max size {})",
            config.extensions.join(", "),
            config.max_texture_size
        );
        Self { config, ..Self::default() }
    }

    #[inline]
    pub fn stats(&self) -> DeviceStats {
        self.stats
    }

    /// Makes the next call hitting `point` fail.
    pub fn fail_next(&mut self, point: FailPoint) {
        self.fail.push(point);
    }

    pub fn is_texture(&self, texture: TextureHandle) -> bool {
        self.textures.contains_key(&texture)
    }

    pub fn is_framebuffer(&self, framebuffer: FramebufferHandle) -> bool {
        self.framebuffers.contains_key(&framebuffer)
    }

    pub fn is_renderbuffer(&self, renderbuffer: RenderbufferHandle) -> bool {
        self.renderbuffers.contains_key(&renderbuffer)
    }

    /// Storage size of `texture`, if it exists.
    pub fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&texture).map(|t| (t.width, t.height))
    }

    /// Storage layout of `texture`, if it exists.
    pub fn texture_layout(&self, texture: TextureHandle) -> Option<(PixelFormat, DataType)> {
        self.textures.get(&texture).map(|t| (t.format, t.data_type))
    }

    pub fn texture_sampler(&self, texture: TextureHandle) -> Option<SamplerConfig> {
        self.textures.get(&texture).map(|t| t.sampler)
    }

    /// Colour and depth attachments of `framebuffer`.
    pub fn attachments(
        &self,
        framebuffer: FramebufferHandle,
    ) -> Option<(Option<TextureHandle>, Option<(RenderbufferHandle, DepthFormat)>)> {
        self.framebuffers.get(&framebuffer).map(|fb| (fb.color, fb.depth))
    }

    fn should_fail(&mut self, point: FailPoint) -> bool {
        if let Some(i) = self.fail.iter().position(|&p| p == point) {
            self.fail.swap_remove(i);
            log::debug!("headless device: injected failure at {point:?}");
            true
        } else {
            false
        }
    }

    fn next_name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }

    fn check_size(&self, width: u32, height: u32) -> Result<(), DeviceError> {
        let max = self.config.max_texture_size;
        if width > max || height > max {
            return Err(DeviceError::TooLarge { width, height, max });
        }
        Ok(())
    }

    fn texture_mut(&mut self, texture: TextureHandle) -> Result<&mut HeadlessTexture, DeviceError> {
        self.textures.get_mut(&texture).ok_or(DeviceError::UnknownTexture(texture))
    }

    fn framebuffer_mut(&mut self, framebuffer: FramebufferHandle) -> Result<&mut HeadlessFramebuffer, DeviceError> {
        self.framebuffers
            .get_mut(&framebuffer)
            .ok_or(DeviceError::UnknownFramebuffer(framebuffer))
    }
}

/// Decodes tightly packed RGBA8 rows into texels, applying the unpack flags.
fn unpack_rgba8(upload: &Upload<'_>, pixels: &[u8]) -> Result<Vec<[f32; 4]>, DeviceError> {
    let expected = upload.width as usize * upload.height as usize * 4;
    if pixels.len() != expected {
        return Err(DeviceError::InvalidUpload {
            reason: format!(
                "{} bytes for a {}x{} RGBA8 image (expected {expected})",
                pixels.len(),
                upload.width,
                upload.height
            ),
        });
    }
    if upload.data_type != DataType::UnsignedByte {
        return Err(DeviceError::InvalidUpload {
            reason: format!("pixel data must be unsigned bytes, got {:?}", upload.data_type),
        });
    }

    let rgba: &[[u8; 4]] = bytemuck::try_cast_slice(pixels).map_err(|e| DeviceError::InvalidUpload {
        reason: e.to_string(),
    })?;

    let row = upload.width as usize;
    let mut texels = Vec::with_capacity(rgba.len());
    for y in 0..upload.height as usize {
        let src_y = if upload.flip_y { upload.height as usize - 1 - y } else { y };
        for px in &rgba[src_y * row..(src_y + 1) * row] {
            let mut t = ColorRgba::from_u8(*px);
            if upload.premultiply_alpha {
                t.r *= t.a;
                t.g *= t.a;
                t.b *= t.a;
            }
            texels.push([t.r, t.g, t.b, t.a]);
        }
    }
    Ok(texels)
}

impl Device for HeadlessDevice {
    fn create_texture(&mut self) -> Result<TextureHandle, DeviceError> {
        if self.should_fail(FailPoint::CreateTexture) {
            return Err(DeviceError::OutOfObjects { kind: "texture" });
        }
        let name = self.next_name();
        let handle = TextureHandle::from_raw(name).ok_or(DeviceError::OutOfObjects { kind: "texture" })?;
        self.textures.insert(handle, HeadlessTexture::empty());
        self.stats.textures_created += 1;
        log::trace!("headless: create {handle}");
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_some() {
            self.stats.textures_deleted += 1;
            for fb in self.framebuffers.values_mut() {
                if fb.color == Some(texture) {
                    fb.color = None;
                }
            }
            log::trace!("headless: delete {texture}");
        }
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferHandle, DeviceError> {
        if self.should_fail(FailPoint::CreateFramebuffer) {
            return Err(DeviceError::OutOfObjects { kind: "framebuffer" });
        }
        let name = self.next_name();
        let handle =
            FramebufferHandle::from_raw(name).ok_or(DeviceError::OutOfObjects { kind: "framebuffer" })?;
        self.framebuffers.insert(handle, HeadlessFramebuffer::default());
        self.stats.framebuffers_created += 1;
        log::trace!("headless: create {handle}");
        Ok(handle)
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        if self.framebuffers.remove(&framebuffer).is_some() {
            self.stats.framebuffers_deleted += 1;
            if self.bound == Some(framebuffer) {
                self.bound = None;
            }
            log::trace!("headless: delete {framebuffer}");
        }
    }

    fn create_renderbuffer(&mut self) -> Result<RenderbufferHandle, DeviceError> {
        if self.should_fail(FailPoint::CreateRenderbuffer) {
            return Err(DeviceError::OutOfObjects { kind: "renderbuffer" });
        }
        let name = self.next_name();
        let handle =
            RenderbufferHandle::from_raw(name).ok_or(DeviceError::OutOfObjects { kind: "renderbuffer" })?;
        self.renderbuffers.insert(handle, None);
        self.stats.renderbuffers_created += 1;
        log::trace!("headless: create {handle}");
        Ok(handle)
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle) {
        if self.renderbuffers.remove(&renderbuffer).is_some() {
            self.stats.renderbuffers_deleted += 1;
            for fb in self.framebuffers.values_mut() {
                if matches!(fb.depth, Some((rb, _)) if rb == renderbuffer) {
                    fb.depth = None;
                }
            }
            log::trace!("headless: delete {renderbuffer}");
        }
    }

    fn set_sampler(&mut self, texture: TextureHandle, sampler: &SamplerConfig) -> Result<(), DeviceError> {
        self.texture_mut(texture)?.sampler = *sampler;
        Ok(())
    }

    fn upload_2d(&mut self, texture: TextureHandle, upload: &Upload<'_>) -> Result<(), DeviceError> {
        if self.should_fail(FailPoint::Upload) {
            return Err(DeviceError::InvalidUpload { reason: "injected failure".into() });
        }
        self.check_size(upload.width, upload.height)?;

        let texels = match upload.pixels {
            Some(pixels) => unpack_rgba8(upload, pixels)?,
            None => vec![[0.0; 4]; upload.width as usize * upload.height as usize],
        };

        let tex = self.texture_mut(texture)?;
        tex.width = upload.width;
        tex.height = upload.height;
        tex.format = upload.format;
        tex.data_type = upload.data_type;
        tex.texels = texels;
        self.stats.uploads += 1;
        Ok(())
    }

    fn renderbuffer_storage(
        &mut self,
        renderbuffer: RenderbufferHandle,
        format: DepthFormat,
        width: u32,
        height: u32,
    ) -> Result<(), DeviceError> {
        if self.should_fail(FailPoint::RenderbufferStorage) {
            return Err(DeviceError::OutOfObjects { kind: "renderbuffer storage" });
        }
        self.check_size(width, height)?;
        let slot = self
            .renderbuffers
            .get_mut(&renderbuffer)
            .ok_or(DeviceError::UnknownRenderbuffer(renderbuffer))?;
        *slot = Some((format, width, height));
        Ok(())
    }

    fn attach_color(&mut self, framebuffer: FramebufferHandle, texture: TextureHandle) -> Result<(), DeviceError> {
        if !self.textures.contains_key(&texture) {
            return Err(DeviceError::UnknownTexture(texture));
        }
        self.framebuffer_mut(framebuffer)?.color = Some(texture);
        Ok(())
    }

    fn attach_depth(
        &mut self,
        framebuffer: FramebufferHandle,
        renderbuffer: RenderbufferHandle,
        format: DepthFormat,
    ) -> Result<(), DeviceError> {
        if !self.renderbuffers.contains_key(&renderbuffer) {
            return Err(DeviceError::UnknownRenderbuffer(renderbuffer));
        }
        self.framebuffer_mut(framebuffer)?.depth = Some((renderbuffer, format));
        Ok(())
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferHandle>) -> Result<(), DeviceError> {
        if let Some(fb) = framebuffer {
            if !self.framebuffers.contains_key(&fb) {
                return Err(DeviceError::UnknownFramebuffer(fb));
            }
        }
        self.bound = framebuffer;
        Ok(())
    }

    fn bound_framebuffer(&self) -> Option<FramebufferHandle> {
        self.bound
    }

    fn has_extension(&self, name: &str) -> bool {
        self.config.extensions.iter().any(|e| e == name)
    }

    fn fetch(&self, texture: TextureHandle, uv: Vec2) -> Result<ColorRgba, DeviceError> {
        let tex = self.textures.get(&texture).ok_or(DeviceError::UnknownTexture(texture))?;
        if tex.texels.is_empty() {
            return Err(DeviceError::NoStorage(texture));
        }
        let [r, g, b, a] = match tex.sampler.mag_filter {
            Filter::Nearest => tex.nearest(uv),
            Filter::Linear => tex.bilinear(uv),
        };
        Ok(ColorRgba::new(r, g, b, a))
    }
}
