/// Category filter for the inventory table.
use crate::model::{Category, InventoryEntry};

/// Which categories the table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// Every filter choice, in combo box order.
pub const ALL_FILTERS: [CategoryFilter; 5] = [
    CategoryFilter::All,
    CategoryFilter::Only(Category::File),
    CategoryFilter::Only(Category::Program),
    CategoryFilter::Only(Category::Document),
    CategoryFilter::Only(Category::Folder),
];

impl CategoryFilter {
    pub fn matches(self, entry: &InventoryEntry) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => entry.category == category,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.label(),
        }
    }
}

/// Entries matching `filter`, in their original order.
///
/// Applying the same filter to its own output returns the same rows.
pub fn filter(entries: &[InventoryEntry], filter: CategoryFilter) -> Vec<&InventoryEntry> {
    entries.iter().filter(|e| filter.matches(e)).collect()
}
