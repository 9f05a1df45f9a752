use std::str::FromStr;

use tessera_engine::paint::{Color, Paint};

use crate::align::{Align, Walk};
use crate::edges::Edges;
use crate::error::LayoutError;
use crate::value::LayoutValue;

/// Options of one `begin_rect` / `draw_rect` call.
///
/// Every field is optional; unset fields fall back to the canvas defaults
/// (see [`merge`](Self::merge)) and then to built-in values: no walk,
/// left-top alignment, no fill, zero edges, content-sized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectSpec {
    pub walk: Option<Walk>,
    pub align: Option<Align>,
    pub color: Option<Paint>,
    pub padding: Option<Edges>,
    pub margin: Option<Edges>,
    pub w: Option<LayoutValue>,
    pub h: Option<LayoutValue>,
    pub x: Option<LayoutValue>,
    pub y: Option<LayoutValue>,
}

impl RectSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn walk(mut self, walk: Walk) -> Self {
        self.walk = Some(walk);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn color(mut self, paint: impl Into<Paint>) -> Self {
        self.color = Some(paint.into());
        self
    }

    /// Named or hex colour (`"orange"`, `"#1f1f1f"`).
    pub fn color_str(self, color: &str) -> Result<Self, LayoutError> {
        let parsed = Color::from_str(color).map_err(|e| LayoutError::invalid(e.to_string()))?;
        Ok(self.color(parsed))
    }

    pub fn padding(mut self, padding: impl Into<Edges>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    pub fn margin(mut self, margin: impl Into<Edges>) -> Self {
        self.margin = Some(margin.into());
        self
    }

    pub fn w(mut self, w: impl Into<LayoutValue>) -> Self {
        self.w = Some(w.into());
        self
    }

    pub fn h(mut self, h: impl Into<LayoutValue>) -> Self {
        self.h = Some(h.into());
        self
    }

    pub fn x(mut self, x: impl Into<LayoutValue>) -> Self {
        self.x = Some(x.into());
        self
    }

    pub fn y(mut self, y: impl Into<LayoutValue>) -> Self {
        self.y = Some(y.into());
        self
    }

    /// Fields set on `self` win; unset ones are taken from `defaults`.
    #[must_use]
    pub fn merge(&self, defaults: &RectSpec) -> RectSpec {
        RectSpec {
            walk: self.walk.or(defaults.walk),
            align: self.align.or(defaults.align),
            color: self.color.clone().or_else(|| defaults.color.clone()),
            padding: self.padding.or(defaults.padding),
            margin: self.margin.or(defaults.margin),
            w: self.w.or(defaults.w),
            h: self.h.or(defaults.h),
            x: self.x.or(defaults.x),
            y: self.y.or(defaults.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_and_gaps_are_filled() {
        let defaults = RectSpec::new().margin(1.0).walk(Walk::LrtbWrap).color(Color::transparent());
        let spec = RectSpec::new().margin(5.0).w(10);

        let merged = spec.merge(&defaults);
        assert_eq!(merged.margin, Some(Edges::all(5.0)));
        assert_eq!(merged.walk, Some(Walk::LrtbWrap));
        assert_eq!(merged.color, Some(Paint::Solid(Color::transparent())));
        assert_eq!(merged.w, Some(LayoutValue::px(10.0)));
        assert_eq!(merged.h, None);
    }

    #[test]
    fn array_fill_is_premultiplied() {
        let spec = RectSpec::new().color([1.0, 0.5, 0.0, 0.5]);
        assert_eq!(spec.color, Some(Paint::Solid(Color::from_premul(0.5, 0.25, 0.0, 0.5))));
    }

    #[test]
    fn color_str_accepts_names_and_hex() {
        assert!(RectSpec::new().color_str("orange").is_ok());
        assert!(RectSpec::new().color_str("#1f1f1f").is_ok());
        assert!(matches!(
            RectSpec::new().color_str("chartreuse-ish"),
            Err(LayoutError::InvalidSpec { .. })
        ));
    }
}
