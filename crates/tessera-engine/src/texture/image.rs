use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use super::TextureError;
use super::resource::check_rgba_len;

/// One RGBA8 pixel, castable to and from raw bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Image path as written by the caller.
///
/// Absolute paths are used verbatim; relative paths are joined to the asset root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath(PathBuf);

impl ImagePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[inline]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn resolve(&self, asset_root: &Path) -> PathBuf {
        if self.0.is_absolute() { self.0.clone() } else { asset_root.join(&self.0) }
    }
}

impl From<&str> for ImagePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for ImagePath {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for ImagePath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

/// Decoded image data: tightly packed RGBA8 rows, first row on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, rgba: impl Into<Arc<[u8]>>) -> Result<Self, TextureError> {
        let rgba = rgba.into();
        check_rgba_len(&rgba, width, height)?;
        Ok(Self { width, height, rgba })
    }
}

/// Source of decoded images for [`TextureManager::from_image`](super::TextureManager::from_image).
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<DecodedImage, TextureError>;
}

/// Loads images from the filesystem through the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &Path) -> Result<DecodedImage, TextureError> {
        let img = ::image::open(path).map_err(|e| TextureError::ImageLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {} ({width}x{height})", path.display());
        DecodedImage::new(width, height, rgba.into_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_kept() {
        let root = Path::new("/assets");
        let abs = if cfg!(windows) { "C:\\img\\a.png" } else { "/img/a.png" };
        assert_eq!(ImagePath::new(abs).resolve(root), PathBuf::from(abs));
    }

    #[test]
    fn relative_paths_join_the_root() {
        let root = Path::new("assets");
        assert_eq!(ImagePath::new("tiles/a.png").resolve(root), PathBuf::from("assets/tiles/a.png"));
    }

    #[test]
    fn decoded_image_validates_length() {
        assert!(DecodedImage::new(2, 1, vec![0u8; 8]).is_ok());
        assert!(matches!(
            DecodedImage::new(2, 2, vec![0u8; 8]),
            Err(TextureError::SizeMismatch { width: 2, height: 2, len: 8 })
        ));
    }

    #[test]
    fn missing_file_reports_image_load() {
        let err = FsImageLoader.load(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, TextureError::ImageLoad { .. }));
    }

    #[test]
    fn rgba8_casts_to_bytes() {
        let px = [Rgba8::new(1, 2, 3, 4), Rgba8::new(5, 6, 7, 8)];
        let bytes: &[u8] = bytemuck::cast_slice(&px);
        assert_eq!(bytes, &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
