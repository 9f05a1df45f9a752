bitflags::bitflags! {
    /// Declared type of a texture: channel layout, attachments and data type.
    ///
    /// Bit values are stable. Interpret a set through
    /// [`buffer_format`](Self::buffer_format), [`depth_attachment`](Self::depth_attachment)
    /// and [`data_type_request`](Self::data_type_request); they encode which flag
    /// wins when several are present.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
    pub struct TextureFlags: u32 {
        const RGB = 1 << 0;
        const RGBA = 1 << 1;
        const ALPHA = 1 << 3;
        const DEPTH = 1 << 4;
        const STENCIL = 1 << 5;
        const LUMINANCE = 1 << 6;

        const FLOAT = 1 << 10;
        const HALF_FLOAT = 1 << 11;
        const FLOAT_LINEAR = 1 << 12;
        const HALF_FLOAT_LINEAR = 1 << 13;
    }
}

impl TextureFlags {
    /// What an empty render-target type means.
    pub const RENDER_TARGET_DEFAULT: Self =
        Self::RGBA.union(Self::DEPTH).union(Self::STENCIL);

    /// `"Texture.RGBA|Texture.DEPTH"`-style rendering of the set bits.
    pub fn describe(self) -> String {
        self.iter_names()
            .map(|(name, _)| format!("Texture.{name}"))
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl std::fmt::Display for TextureFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("(none)")
        } else {
            f.write_str(&self.describe())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_values_are_stable() {
        assert_eq!(TextureFlags::RGBA.bits(), 2);
        assert_eq!(TextureFlags::ALPHA.bits(), 8);
        assert_eq!(TextureFlags::LUMINANCE.bits(), 64);
        assert_eq!(TextureFlags::HALF_FLOAT_LINEAR.bits(), 1 << 13);
    }

    #[test]
    fn describe_lists_set_flags_in_declaration_order() {
        let flags = TextureFlags::DEPTH | TextureFlags::RGBA;
        assert_eq!(flags.describe(), "Texture.RGBA|Texture.DEPTH");
    }

    #[test]
    fn display_of_empty_set() {
        assert_eq!(TextureFlags::empty().to_string(), "(none)");
    }

    #[test]
    fn render_target_default_has_color_depth_and_stencil() {
        let d = TextureFlags::RENDER_TARGET_DEFAULT;
        assert!(d.contains(TextureFlags::RGBA | TextureFlags::DEPTH | TextureFlags::STENCIL));
    }
}
