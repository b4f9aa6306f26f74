/// Filter/sort view over the inventory.
///
/// Pure functions: nothing here touches the filesystem or holds a lock for
/// longer than it takes to clone the visible rows.

pub mod filter;
pub mod sort;

pub use filter::{filter, CategoryFilter, ALL_FILTERS};
pub use sort::{sort, SortColumn, SortDirection, SortState};

use crate::model::{Inventory, InventoryEntry};

/// Owned copies of the entries in `entries` that match `filter`, in order.
///
/// Takes a slice so a live table can copy just the tail appended since its
/// last build.
pub fn visible_rows(entries: &[InventoryEntry], filter: CategoryFilter) -> Vec<InventoryEntry> {
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Materialise the rows the table should show: entries matching `filter`, in
/// inventory order, then ordered by the active sort of `sort_state` (if any).
pub fn build_rows(
    inventory: &Inventory,
    filter: CategoryFilter,
    sort_state: &SortState,
) -> Vec<InventoryEntry> {
    let mut rows = visible_rows(inventory.entries(), filter);
    sort_state.apply(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, VolumeInfo};
    use std::path::PathBuf;

    fn inventory() -> Inventory {
        let volume = VolumeInfo::new(PathBuf::from("/"), 1_000);
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        let entries = [
            ("b.exe", 30),
            ("a.txt", 10),
            ("c.bin", 20),
            ("d.pdf", 40),
        ]
        .into_iter()
        .map(|(name, size)| {
            InventoryEntry::new(
                PathBuf::from("/").join(name),
                false,
                size,
                false,
                &volume,
            )
        });
        assert!(inv.append_batch(generation, entries));
        inv
    }

    #[test]
    fn rows_without_sort_keep_inventory_order() {
        let rows = build_rows(&inventory(), CategoryFilter::All, &SortState::default());
        let names: Vec<_> = rows.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b.exe", "a.txt", "c.bin", "d.pdf"]);
    }

    #[test]
    fn rows_are_filtered_then_sorted() {
        let mut state = SortState::default();
        state.toggle(SortColumn::Size);

        let rows = build_rows(
            &inventory(),
            CategoryFilter::Only(Category::Document),
            &state,
        );
        let names: Vec<_> = rows.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["d.pdf", "a.txt"]);
    }

    #[test]
    fn visible_rows_of_a_tail_slice() {
        let inv = inventory();
        let tail = visible_rows(&inv.entries()[2..], CategoryFilter::Only(Category::Document));
        let names: Vec<_> = tail.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["d.pdf"]);
    }
}
