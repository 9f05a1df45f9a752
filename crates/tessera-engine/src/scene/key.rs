/// Paint layer of a draw item. Higher layers cover lower ones.
///
/// The canvas records everything on [`ZIndex::BASE`]; paint order inside a
/// layer is recording order, adjusted by [`DrawList::reserve`](super::DrawList::reserve).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    pub const BASE: Self = Self(0);

    #[inline]
    pub const fn new(layer: i32) -> Self {
        Self(layer)
    }
}

/// Position of a draw item in paint order: layer first, then slot.
///
/// Field order matters: the derived `Ord` compares `z` before `order`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SortKey {
    pub z: ZIndex,
    /// Slot handed out by the draw list, unique within one recording.
    pub order: u32,
}

impl SortKey {
    #[inline]
    pub const fn new(z: ZIndex, order: u32) -> Self {
        Self { z, order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_dominates_slot() {
        let low_late = SortKey::new(ZIndex::BASE, 90);
        let high_early = SortKey::new(ZIndex::new(1), 3);
        assert!(low_late < high_early);
        assert!(SortKey::new(ZIndex::BASE, 1) < SortKey::new(ZIndex::BASE, 2));
    }
}
