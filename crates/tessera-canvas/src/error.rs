/// Failure of a layout pass.
///
/// Every layout error is fatal to the current pass: [`Canvas::frame`](crate::Canvas::frame)
/// returns it instead of a partial draw list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// Malformed layout value string.
    #[error("cannot parse layout value `{input}`: {reason}")]
    Parse { input: String, reason: String },

    /// A percentage refers to a parent axis that is sized to content.
    #[error("`{field}: {value}` refers to a parent axis that is sized to content")]
    UnresolvedAxis { field: &'static str, value: String },

    /// `end_rect` without a matching `begin_rect`.
    #[error("end_rect called without a matching begin_rect")]
    Unbalanced,

    /// The pass ended with contexts still open.
    #[error("{depth} rect(s) still open at the end of the pass")]
    Unclosed { depth: usize },

    /// A spec that is well-formed but meaningless (e.g. `x: top(3)`).
    #[error("invalid rect spec: {reason}")]
    InvalidSpec { reason: String },
}

impl LayoutError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        LayoutError::Parse { input: input.to_owned(), reason: reason.into() }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        LayoutError::InvalidSpec { reason: reason.into() }
    }
}
