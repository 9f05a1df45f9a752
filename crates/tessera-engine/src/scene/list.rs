use crate::coords::Vec2;

use super::{DrawCmd, SortKey, ZIndex};

/// A recorded command and its paint-order key.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Recorded draw stream for a frame.
///
/// The canvas records into one `DrawList` per pass; the renderer consumes it in
/// paint order.
///
/// Paint-order iteration reuses an internal index buffer across frames.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items, keeping allocated capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Moves every command recorded at or after insertion index `mark` by `delta`.
    pub fn translate_since(&mut self, mark: usize, delta: Vec2) {
        if delta == Vec2::zero() {
            return;
        }
        for item in self.items.iter_mut().skip(mark) {
            item.cmd.translate(delta);
        }
    }

    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let key = self.reserve(z);
        self.push_reserved(key, cmd);
    }

    /// Reserves a paint-order slot at `z` for a command recorded later.
    ///
    /// Lets a container claim its place beneath children it has not measured yet.
    #[inline]
    pub fn reserve(&mut self, z: ZIndex) -> SortKey {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);
        SortKey::new(z, order)
    }

    /// Records `cmd` in a slot obtained from [`reserve`](Self::reserve).
    #[inline]
    pub fn push_reserved(&mut self, key: SortKey, cmd: DrawCmd) {
        self.items.push(DrawItem { key, cmd });
        self.sorted_dirty = true;
    }

    /// Iterates items in paint order without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;
    use crate::scene::RectCmd;

    fn rect_of(item: &DrawItem) -> Rect {
        match &item.cmd {
            DrawCmd::Rect(r) => r.rect,
        }
    }

    #[test]
    fn paint_order_sorts_by_z_then_insertion() {
        let mut list = DrawList::new();
        list.push_solid_rect(ZIndex::new(2), Rect::new(2.0, 0.0, 1.0, 1.0), Color::transparent());
        list.push_solid_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 1.0, 1.0), Color::transparent());
        list.push_solid_rect(ZIndex::new(2), Rect::new(3.0, 0.0, 1.0, 1.0), Color::transparent());

        let xs: Vec<f32> = list.iter_in_paint_order().map(|i| rect_of(i).origin.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 3.0]);
    }

    #[test]
    fn translate_since_only_moves_later_items() {
        let mut list = DrawList::new();
        list.push_solid_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 1.0, 1.0), Color::transparent());
        let mark = list.len();
        list.push_solid_rect(ZIndex::new(1), Rect::new(5.0, 5.0, 1.0, 1.0), Color::transparent());

        list.translate_since(mark, Vec2::new(10.0, 20.0));

        assert_eq!(rect_of(&list.items()[0]).origin, Vec2::new(0.0, 0.0));
        assert_eq!(rect_of(&list.items()[1]).origin, Vec2::new(15.0, 25.0));
    }

    #[test]
    fn reserved_slot_paints_before_later_items() {
        let mut list = DrawList::new();
        let slot = list.reserve(ZIndex::new(0));
        list.push_solid_rect(ZIndex::new(0), Rect::new(1.0, 0.0, 1.0, 1.0), Color::transparent());
        list.push_reserved(slot, DrawCmd::Rect(RectCmd::new(Rect::new(0.0, 0.0, 4.0, 4.0), Color::transparent().into())));

        let xs: Vec<f32> = list.iter_in_paint_order().map(|i| rect_of(i).origin.x).collect();
        assert_eq!(xs, vec![0.0, 1.0]);
    }

    #[test]
    fn clear_resets_insertion_order() {
        let mut list = DrawList::new();
        list.push_solid_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 1.0, 1.0), Color::transparent());
        list.clear();
        assert!(list.is_empty());
        list.push_solid_rect(ZIndex::new(0), Rect::new(0.0, 0.0, 1.0, 1.0), Color::transparent());
        assert_eq!(list.items()[0].key.order, 0);
    }
}
