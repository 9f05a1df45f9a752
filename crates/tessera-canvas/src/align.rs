// ── Align ─────────────────────────────────────────────────────────────────

/// Horizontal anchor inside free space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor inside free space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl HAlign {
    /// Share of the free space placed before the element.
    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            HAlign::Left => 0.0,
            HAlign::Center => 0.5,
            HAlign::Right => 1.0,
        }
    }
}

impl VAlign {
    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            VAlign::Top => 0.0,
            VAlign::Center => 0.5,
            VAlign::Bottom => 1.0,
        }
    }
}

/// Anchor combination used to place an element inside its free space.
///
/// With [`Walk::None`] the free space is the whole parent interior. A flowing
/// element is aligned in the space right of and below the cursor, and the
/// cursor then moves past the element's aligned far edges, so later elements
/// in the row start after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Align {
    pub h: HAlign,
    pub v: VAlign,
}

impl Align {
    pub const LEFT_TOP: Self = Self::new(HAlign::Left, VAlign::Top);
    pub const TOP: Self = Self::new(HAlign::Center, VAlign::Top);
    pub const RIGHT_TOP: Self = Self::new(HAlign::Right, VAlign::Top);
    pub const LEFT: Self = Self::new(HAlign::Left, VAlign::Center);
    pub const CENTER: Self = Self::new(HAlign::Center, VAlign::Center);
    pub const RIGHT: Self = Self::new(HAlign::Right, VAlign::Center);
    pub const LEFT_BOTTOM: Self = Self::new(HAlign::Left, VAlign::Bottom);
    pub const BOTTOM: Self = Self::new(HAlign::Center, VAlign::Bottom);
    pub const RIGHT_BOTTOM: Self = Self::new(HAlign::Right, VAlign::Bottom);

    #[inline]
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }
}

// ── Walk ──────────────────────────────────────────────────────────────────

/// How an element takes part in its parent's flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Walk {
    /// Aligned inside the whole parent interior; the cursor does not move.
    #[default]
    None,
    /// Placed at the parent's cursor, left to right, wrapping to a new row
    /// when the element would overflow the interior width.
    LrtbWrap,
}
