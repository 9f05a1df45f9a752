pub(crate) mod rect;

pub use rect::RectCmd;
