use crate::device::{DataType, DepthFormat, Device, PixelFormat};

use super::TextureFlags;

impl TextureFlags {
    /// Colour buffer layout.
    ///
    /// Precedence: `LUMINANCE` (with `ALPHA` → luminance-alpha) > `ALPHA` > `RGBA` > `RGB`.
    pub fn buffer_format(self) -> PixelFormat {
        if self.contains(TextureFlags::LUMINANCE) {
            if self.contains(TextureFlags::ALPHA) {
                PixelFormat::LuminanceAlpha
            } else {
                PixelFormat::Luminance
            }
        } else if self.contains(TextureFlags::ALPHA) {
            PixelFormat::Alpha
        } else if self.contains(TextureFlags::RGBA) {
            PixelFormat::Rgba
        } else {
            PixelFormat::Rgb
        }
    }

    /// Depth/stencil renderbuffer storage, if any is requested.
    pub fn depth_attachment(self) -> Option<DepthFormat> {
        let depth = self.contains(TextureFlags::DEPTH);
        let stencil = self.contains(TextureFlags::STENCIL);
        match (depth, stencil) {
            (true, true) => Some(DepthFormat::DepthStencil),
            (false, true) => Some(DepthFormat::StencilIndex8),
            (true, false) => Some(DepthFormat::DepthComponent16),
            (false, false) => None,
        }
    }

    #[inline]
    pub fn data_type_request(self) -> DataTypeRequest {
        DataTypeRequest::from_flags(self)
    }
}

/// Data type requested by a flag set, together with the extensions it needs.
///
/// Precedence: `HALF_FLOAT_LINEAR` > `FLOAT_LINEAR` > `HALF_FLOAT` > `FLOAT` > unsigned byte.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DataTypeRequest {
    pub data_type: DataType,
    pub extensions: &'static [&'static str],
}

impl DataTypeRequest {
    pub fn from_flags(flags: TextureFlags) -> Self {
        let (data_type, extensions): (DataType, &'static [&'static str]) =
            if flags.contains(TextureFlags::HALF_FLOAT_LINEAR) {
                (
                    DataType::HalfFloatLinear,
                    &["OES_texture_half_float", "OES_texture_half_float_linear"],
                )
            } else if flags.contains(TextureFlags::FLOAT_LINEAR) {
                (DataType::FloatLinear, &["OES_texture_float", "OES_texture_float_linear"])
            } else if flags.contains(TextureFlags::HALF_FLOAT) {
                (DataType::HalfFloat, &["OES_texture_half_float"])
            } else if flags.contains(TextureFlags::FLOAT) {
                (DataType::Float, &["OES_texture_float"])
            } else {
                (DataType::UnsignedByte, &[])
            };
        Self { data_type, extensions }
    }

    /// First required extension the device lacks.
    pub fn missing_extension(&self, device: &dyn Device) -> Option<&'static str> {
        self.extensions.iter().copied().find(|ext| !device.has_extension(ext))
    }
}

/// Full storage description of a render target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RenderTargetFormat {
    pub color: PixelFormat,
    pub data_type: DataType,
    pub depth: Option<DepthFormat>,
}

impl RenderTargetFormat {
    /// Interprets `flags` and probes `device` for the needed extensions.
    ///
    /// Returns the missing extension name on failure; nothing is allocated here.
    pub fn negotiate(flags: TextureFlags, device: &dyn Device) -> Result<Self, &'static str> {
        let request = DataTypeRequest::from_flags(flags);
        if let Some(missing) = request.missing_extension(device) {
            return Err(missing);
        }
        Ok(Self {
            color: flags.buffer_format(),
            data_type: request.data_type,
            depth: flags.depth_attachment(),
        })
    }
}
