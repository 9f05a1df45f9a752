/// Texel filter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Filter {
    Nearest,
    #[default]
    Linear,
}

/// Coordinate wrap mode outside `[0, 1]`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Wrap {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

/// How a device handle was built: filtering, wrapping and unpack flags.
///
/// A texture keeps one device handle per distinct configuration, so every
/// field participates in equality and hashing.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct SamplerConfig {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub wrap_s: Wrap,
    pub wrap_t: Wrap,
    /// Reverse row order while uploading.
    pub flip_y: bool,
    /// Multiply rgb by alpha while uploading.
    pub premultiply_alpha: bool,
}

impl SamplerConfig {
    /// Bilinear filtering, clamped to edge.
    pub const LINEAR_CLAMP: Self = Self::filtered(Filter::Linear);

    /// Nearest-texel filtering, clamped to edge.
    pub const NEAREST_CLAMP: Self = Self::filtered(Filter::Nearest);

    const fn filtered(filter: Filter) -> Self {
        Self {
            min_filter: filter,
            mag_filter: filter,
            wrap_s: Wrap::ClampToEdge,
            wrap_t: Wrap::ClampToEdge,
            flip_y: false,
            premultiply_alpha: false,
        }
    }

    #[inline]
    pub fn wrap(mut self, s: Wrap, t: Wrap) -> Self {
        self.wrap_s = s;
        self.wrap_t = t;
        self
    }

    #[inline]
    pub fn flip_y(mut self, flip: bool) -> Self {
        self.flip_y = flip;
        self
    }

    #[inline]
    pub fn premultiply_alpha(mut self, premultiply: bool) -> Self {
        self.premultiply_alpha = premultiply;
        self
    }
}

/// Channel layout of a device texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    Rgb,
    Rgba,
    Alpha,
    Luminance,
    LuminanceAlpha,
}

impl PixelFormat {
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Alpha | PixelFormat::Luminance => 1,
            PixelFormat::LuminanceAlpha => 2,
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Per-channel storage type of a device texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum DataType {
    #[default]
    UnsignedByte,
    HalfFloat,
    /// Half float storage that may be sampled with linear filtering.
    HalfFloatLinear,
    Float,
    /// Float storage that may be sampled with linear filtering.
    FloatLinear,
}

impl DataType {
    #[inline]
    pub fn bytes_per_channel(self) -> usize {
        match self {
            DataType::UnsignedByte => 1,
            DataType::HalfFloat | DataType::HalfFloatLinear => 2,
            DataType::Float | DataType::FloatLinear => 4,
        }
    }
}

/// Renderbuffer storage for depth/stencil attachments.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DepthFormat {
    DepthComponent16,
    StencilIndex8,
    DepthStencil,
}

/// One 2D image description for [`Device::upload_2d`](super::Device::upload_2d).
///
/// `pixels == None` allocates storage without initializing it (render targets).
/// When present, pixels are tightly packed RGBA8 rows.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data_type: DataType,
    pub pixels: Option<&'a [u8]>,
    pub flip_y: bool,
    pub premultiply_alpha: bool,
}

impl<'a> Upload<'a> {
    /// RGBA8 upload of `pixels` honoring the sampler's unpack flags.
    pub fn rgba8(width: u32, height: u32, pixels: &'a [u8], sampler: &SamplerConfig) -> Self {
        Self {
            width,
            height,
            format: PixelFormat::Rgba,
            data_type: DataType::UnsignedByte,
            pixels: Some(pixels),
            flip_y: sampler.flip_y,
            premultiply_alpha: sampler.premultiply_alpha,
        }
    }

    /// Uninitialized storage of the given layout.
    pub fn storage(width: u32, height: u32, format: PixelFormat, data_type: DataType) -> Self {
        Self {
            width,
            height,
            format,
            data_type,
            pixels: None,
            flip_y: false,
            premultiply_alpha: false,
        }
    }
}
