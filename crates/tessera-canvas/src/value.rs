use std::fmt;
use std::str::FromStr;

use crate::error::LayoutError;

// ── Directive ─────────────────────────────────────────────────────────────

/// Anchor or reference-axis wrapper of a layout value (`left(10)`, `width(50%)`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
    Left,
    Right,
    Top,
    Bottom,
    Center,
    /// Measure percentages against the parent's width.
    Width,
    /// Measure percentages against the parent's height.
    Height,
}

impl Directive {
    pub fn name(self) -> &'static str {
        match self {
            Directive::Left => "left",
            Directive::Right => "right",
            Directive::Top => "top",
            Directive::Bottom => "bottom",
            Directive::Center => "center",
            Directive::Width => "width",
            Directive::Height => "height",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "left" => Directive::Left,
            "right" => Directive::Right,
            "top" => Directive::Top,
            "bottom" => Directive::Bottom,
            "center" => Directive::Center,
            "width" => Directive::Width,
            "height" => Directive::Height,
            _ => return None,
        })
    }

    /// Axis the directive measures against, if it names one.
    pub(crate) fn axis(self) -> Option<Axis> {
        match self {
            Directive::Left | Directive::Right | Directive::Width => Some(Axis::X),
            Directive::Top | Directive::Bottom | Directive::Height => Some(Axis::Y),
            Directive::Center => None,
        }
    }
}

/// Layout axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

// ── LayoutValue ───────────────────────────────────────────────────────────

/// A length: `percent` of a parent axis plus `pixels`, optionally wrapped in a
/// [`Directive`].
///
/// Resolves to `round(axis * percent / 100) + pixels`. A NaN pixel part means
/// "size to content".
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayoutValue {
    directive: Option<Directive>,
    percent: f32,
    pixels: f32,
}

impl LayoutValue {
    /// Size to content.
    pub const AUTO: Self = Self { directive: None, percent: 0.0, pixels: f32::NAN };

    #[inline]
    pub const fn px(pixels: f32) -> Self {
        Self { directive: None, percent: 0.0, pixels }
    }

    #[inline]
    pub const fn pct(percent: f32) -> Self {
        Self { directive: None, percent, pixels: 0.0 }
    }

    /// Offset from the parent's left interior edge.
    #[inline]
    pub const fn left(pixels: f32) -> Self {
        Self { directive: Some(Directive::Left), percent: 0.0, pixels }
    }

    /// Offset from the parent's right interior edge.
    #[inline]
    pub const fn right(pixels: f32) -> Self {
        Self { directive: Some(Directive::Right), percent: 0.0, pixels }
    }

    #[inline]
    pub const fn top(pixels: f32) -> Self {
        Self { directive: Some(Directive::Top), percent: 0.0, pixels }
    }

    #[inline]
    pub const fn bottom(pixels: f32) -> Self {
        Self { directive: Some(Directive::Bottom), percent: 0.0, pixels }
    }

    /// Offset from the centred position.
    #[inline]
    pub const fn center(pixels: f32) -> Self {
        Self { directive: Some(Directive::Center), percent: 0.0, pixels }
    }

    /// `expr` measured against the parent's width, e.g. `width("100%-5")`.
    pub fn width(expr: &str) -> Result<Self, LayoutError> {
        Self::with_directive(Directive::Width, expr)
    }

    /// `expr` measured against the parent's height.
    pub fn height(expr: &str) -> Result<Self, LayoutError> {
        Self::with_directive(Directive::Height, expr)
    }

    fn with_directive(directive: Directive, expr: &str) -> Result<Self, LayoutError> {
        let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
        let (percent, pixels) = parse_expr(&compact).map_err(|reason| LayoutError::parse(expr, reason))?;
        Ok(Self { directive: Some(directive), percent, pixels })
    }

    /// Parses `[directive '('] expr [')']`; see the crate docs for the grammar.
    pub fn parse(input: &str) -> Result<Self, LayoutError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(LayoutError::parse(input, "empty value"));
        }
        if compact == "auto" {
            return Ok(Self::AUTO);
        }

        let (directive, body) = match compact.find('(') {
            Some(open) => {
                let name = &compact[..open];
                let directive = Directive::from_name(name)
                    .ok_or_else(|| LayoutError::parse(input, format!("unknown directive `{name}`")))?;
                let body = compact[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| LayoutError::parse(input, "unbalanced parentheses"))?;
                (Some(directive), body)
            }
            None => (None, compact.as_str()),
        };
        if body.contains(['(', ')']) {
            return Err(LayoutError::parse(input, "unbalanced parentheses"));
        }

        let (percent, pixels) = parse_expr(body).map_err(|reason| LayoutError::parse(input, reason))?;
        Ok(Self { directive, percent, pixels })
    }

    #[inline]
    pub fn directive(self) -> Option<Directive> {
        self.directive
    }

    #[inline]
    pub fn percent(self) -> f32 {
        self.percent
    }

    #[inline]
    pub fn pixels(self) -> f32 {
        self.pixels
    }

    #[inline]
    pub fn is_auto(self) -> bool {
        self.pixels.is_nan()
    }

    /// Resolves against `axis`. Returns `None` when a percentage meets an
    /// unresolved (NaN) axis.
    pub fn resolve(self, axis: f32) -> Option<f32> {
        if self.percent == 0.0 {
            return Some(self.pixels);
        }
        if !axis.is_finite() {
            return None;
        }
        Some((axis * self.percent / 100.0).round() + self.pixels)
    }

    /// Axis percentages refer to when the value is assigned to a field on `field_axis`.
    pub(crate) fn reference_axis(self, field_axis: Axis) -> Axis {
        self.directive.and_then(Directive::axis).unwrap_or(field_axis)
    }
}

impl Default for LayoutValue {
    fn default() -> Self {
        Self::AUTO
    }
}

impl From<f32> for LayoutValue {
    fn from(pixels: f32) -> Self {
        Self::px(pixels)
    }
}

impl From<i32> for LayoutValue {
    fn from(pixels: i32) -> Self {
        Self::px(pixels as f32)
    }
}

impl FromStr for LayoutValue {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LayoutValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_auto() {
            return f.write_str("auto");
        }
        if let Some(d) = self.directive {
            write!(f, "{}(", d.name())?;
        }
        match (self.percent != 0.0, self.pixels != 0.0) {
            (true, true) if self.pixels < 0.0 => write!(f, "{}%-{}", self.percent, -self.pixels)?,
            (true, true) => write!(f, "{}%+{}", self.percent, self.pixels)?,
            (true, false) => write!(f, "{}%", self.percent)?,
            (false, _) => write!(f, "{}", self.pixels)?,
        }
        if self.directive.is_some() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// `term (('+'|'-') term)*` with `term := ['-'|'+'] number ['%']` on the first
/// term only. Input must already be free of whitespace.
fn parse_expr(src: &str) -> Result<(f32, f32), String> {
    let mut percent = 0.0;
    let mut pixels = 0.0;
    let mut rest = src;
    let mut sign = 1.0;

    if let Some(r) = rest.strip_prefix('-') {
        sign = -1.0;
        rest = r;
    } else if let Some(r) = rest.strip_prefix('+') {
        rest = r;
    }

    loop {
        let len = rest.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(rest.len());
        if len == 0 {
            return Err(match rest.chars().next() {
                Some(c) => format!("expected a number, found `{c}`"),
                None => "expected a number".to_owned(),
            });
        }
        let n: f32 = rest[..len].parse().map_err(|_| format!("invalid number `{}`", &rest[..len]))?;
        rest = &rest[len..];

        match rest.strip_prefix('%') {
            Some(r) => {
                percent += sign * n;
                rest = r;
            }
            None => pixels += sign * n,
        }

        let mut chars = rest.chars();
        match chars.next() {
            None => return Ok((percent, pixels)),
            Some('+') => sign = 1.0,
            Some('-') => sign = -1.0,
            Some(c) => return Err(format!("unexpected `{c}`")),
        }
        rest = chars.as_str();
    }
}
