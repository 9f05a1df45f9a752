use std::fmt;
use std::num::NonZeroU32;

macro_rules! device_handle {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wraps a raw device name. Zero is reserved for "no object".
            #[inline]
            pub fn from_raw(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            #[inline]
            pub fn raw(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

device_handle!(
    /// Device-resident 2D texture object.
    TextureHandle,
    "tex"
);
device_handle!(
    /// Framebuffer object used as a render target.
    FramebufferHandle,
    "fb"
);
device_handle!(
    /// Renderbuffer holding depth and/or stencil storage.
    RenderbufferHandle,
    "rb"
);
