/// Column sorting for the inventory table.
///
/// Sorting is stable, so rows that compare equal keep the order they had
/// before: sorting by type after sorting by size leaves each type group
/// ordered by size.
use crate::model::InventoryEntry;
use std::borrow::Borrow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    Size,
    Percent,
    Category,
    Restricted,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Name,
        SortColumn::Size,
        SortColumn::Percent,
        SortColumn::Category,
        SortColumn::Restricted,
    ];

    fn index(self) -> usize {
        match self {
            Self::Name => 0,
            Self::Size => 1,
            Self::Percent => 2,
            Self::Category => 3,
            Self::Restricted => 4,
        }
    }

    /// Direction used the first time the column header is clicked.
    /// Sizes start largest-first.
    fn first_direction(self) -> SortDirection {
        match self {
            Self::Size | Self::Percent => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Arrow shown next to the active column header.
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Ascending => "⏶",
            Self::Descending => "⏷",
        }
    }
}

fn case_insensitive(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

fn compare(a: &InventoryEntry, b: &InventoryEntry, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Name => case_insensitive(&a.name, &b.name),
        SortColumn::Size => a.size_bytes.cmp(&b.size_bytes),
        SortColumn::Percent => a.percent_of_volume.total_cmp(&b.percent_of_volume),
        SortColumn::Category => case_insensitive(a.category.label(), b.category.label()),
        // Ascending lists restricted entries first.
        SortColumn::Restricted => b.is_restricted.cmp(&a.is_restricted),
    }
}

/// Stable sort of `rows` by `column`.
pub fn sort<T: Borrow<InventoryEntry>>(rows: &mut [T], column: SortColumn, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ord = compare(a.borrow(), b.borrow(), column);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Header click state: which column is active and which direction each
/// column will use on its next click.
///
/// Every column remembers its own direction, so switching to another
/// column and back continues where that column left off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    active: Option<(SortColumn, SortDirection)>,
    next: [SortDirection; 5],
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            active: None,
            next: SortColumn::ALL.map(SortColumn::first_direction),
        }
    }
}

impl SortState {
    /// Register a click on `column`'s header.
    ///
    /// Returns the direction now in effect. The column's stored direction
    /// flips for the next click; other columns are untouched.
    pub fn toggle(&mut self, column: SortColumn) -> SortDirection {
        let slot = &mut self.next[column.index()];
        let direction = *slot;
        *slot = direction.flipped();
        self.active = Some((column, direction));
        direction
    }

    /// The column and direction last applied, if any header was clicked.
    pub fn active(&self) -> Option<(SortColumn, SortDirection)> {
        self.active
    }

    /// Re-apply the active sort to `rows`. No-op before the first click.
    pub fn apply<T: Borrow<InventoryEntry>>(&self, rows: &mut [T]) {
        if let Some((column, direction)) = self.active {
            sort(rows, column, direction);
        }
    }
}
