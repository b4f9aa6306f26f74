/// The in-memory inventory shared by the scanner, the view and the executor.
///
/// One `Inventory` holds the entries of the current scan generation in
/// insertion order. It is shared as [`SharedInventory`]: the scan worker
/// appends in batches, the deletion worker removes, and the UI thread reads
/// to build filtered/sorted rows. Every mutation goes through the methods
/// below so that readers never observe a half-applied change.
use super::entry::{InventoryEntry, LockingProcess};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Inventory behind a lock, cloned cheaply into worker threads.
pub type SharedInventory = Arc<RwLock<Inventory>>;

/// Create an empty shared inventory.
pub fn shared() -> SharedInventory {
    Arc::new(RwLock::new(Inventory::default()))
}

/// Entries of one scan generation.
///
/// `index` maps every path to its position in `entries` and is kept in step
/// with every mutation.
#[derive(Debug, Default)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
    index: HashMap<PathBuf, usize>,
    generation: u64,
}

impl Inventory {
    /// Discard every entry and start a new generation.
    ///
    /// Returns the new generation number. Writers holding an older number
    /// are ignored by [`append_batch`](Self::append_batch) from now on.
    pub fn begin_generation(&mut self) -> u64 {
        self.entries.clear();
        self.index.clear();
        self.generation += 1;
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Append entries produced by the scan for `generation`.
    ///
    /// Returns `false` (and drops the batch) if a newer scan has started
    /// since. Paths already present in this generation are skipped.
    pub fn append_batch(
        &mut self,
        generation: u64,
        batch: impl IntoIterator<Item = InventoryEntry>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        for entry in batch {
            if let Entry::Vacant(slot) = self.index.entry(entry.path.clone()) {
                slot.insert(self.entries.len());
                self.entries.push(entry);
            }
        }
        true
    }

    /// Remove the entry for `path` only, keeping the order of the others.
    ///
    /// Removing a file also shrinks the folder entries above it.
    pub fn remove(&mut self, path: &Path) -> Option<InventoryEntry> {
        let pos = self.index.remove(path)?;
        let removed = self.entries.remove(pos);
        for (i, entry) in self.entries.iter().enumerate().skip(pos) {
            if let Some(slot) = self.index.get_mut(&entry.path) {
                *slot = i;
            }
        }
        if !removed.is_dir() {
            self.shrink_ancestors(&removed.path, removed.size_bytes);
        }
        Some(removed)
    }

    /// Remove every root in `roots` and every entry below them, in one pass
    /// over the inventory. Surviving folder entries lose the size of the
    /// files removed beneath them.
    ///
    /// Returns the number of entries removed.
    pub fn remove_subtrees(&mut self, roots: &[PathBuf]) -> usize {
        if roots.is_empty() {
            return 0;
        }
        let roots: HashSet<&Path> = roots.iter().map(PathBuf::as_path).collect();

        let before = self.entries.len();
        let mut removed_files = Vec::new();
        self.entries.retain(|e| {
            // `ancestors` starts with the path itself.
            if e.path.ancestors().any(|a| roots.contains(a)) {
                if !e.is_dir() {
                    removed_files.push((e.path.clone(), e.size_bytes));
                }
                false
            } else {
                true
            }
        });
        if self.entries.len() == before {
            return 0;
        }

        self.index
            .retain(|p, _| !p.ancestors().any(|a| roots.contains(a)));
        for (i, entry) in self.entries.iter().enumerate() {
            if let Some(slot) = self.index.get_mut(&entry.path) {
                *slot = i;
            }
        }

        for (path, size) in &removed_files {
            self.shrink_ancestors(path, *size);
        }
        before - self.entries.len()
    }

    /// Subtract `size` from every folder entry above `path`.
    fn shrink_ancestors(&mut self, path: &Path, size: u64) {
        if size == 0 {
            return;
        }
        for ancestor in path.ancestors().skip(1) {
            let Some(&i) = self.index.get(ancestor) else {
                continue;
            };
            let folder = &mut self.entries[i];
            if !folder.is_dir() {
                continue;
            }
            let old = folder.size_bytes;
            folder.size_bytes = old.saturating_sub(size);
            folder.percent_of_volume = if old == 0 {
                0.0
            } else {
                folder.percent_of_volume * (folder.size_bytes as f64 / old as f64)
            };
        }
    }

    /// Record the processes found holding `path`. Returns `false` if the
    /// path is not in the inventory.
    pub fn set_locking_processes(&mut self, path: &Path, holders: Vec<LockingProcess>) -> bool {
        match self.index.get(path) {
            Some(&i) => {
                self.entries[i].locking_processes = holders;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, path: &Path) -> Option<&InventoryEntry> {
        self.index.get(path).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains_key(path)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    /// Owned copy of all entries, for export off the lock.
    pub fn snapshot(&self) -> Vec<InventoryEntry> {
        self.entries.clone()
    }

    /// Sum of all entry sizes.
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size_bytes).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VolumeInfo;

    fn entry(path: &str, size: u64) -> InventoryEntry {
        let vol = VolumeInfo::new("C:\\", 1_000);
        InventoryEntry::new(PathBuf::from(path), false, size, false, &vol)
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        assert!(inv.append_batch(generation, vec![entry("b", 2), entry("a", 1)]));
        assert!(inv.append_batch(generation, vec![entry("c", 3)]));

        let names: Vec<_> = inv.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(inv.total_size(), 6);
    }

    #[test]
    fn duplicate_paths_are_ignored_within_a_generation() {
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        inv.append_batch(generation, vec![entry("a", 1), entry("a", 99)]);
        assert_eq!(inv.len(), 1);
        assert_eq!(inv.entries()[0].size_bytes, 1);
    }

    #[test]
    fn new_generation_discards_previous_entries() {
        let mut inv = Inventory::default();
        let first = inv.begin_generation();
        inv.append_batch(first, vec![entry("a", 1)]);

        let second = inv.begin_generation();
        assert!(second > first);
        assert!(inv.is_empty());

        // A superseded scan can no longer write.
        assert!(!inv.append_batch(first, vec![entry("stale", 1)]));
        assert!(inv.is_empty());

        // The same path is accepted again in the new generation.
        assert!(inv.append_batch(second, vec![entry("a", 1)]));
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn remove_drops_only_the_named_entry() {
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        inv.append_batch(generation, vec![entry("a", 1), entry("b", 2), entry("c", 3)]);

        let removed = inv.remove(Path::new("b")).expect("b was present");
        assert_eq!(removed.size_bytes, 2);
        assert!(!inv.contains(Path::new("b")));
        assert!(inv.remove(Path::new("b")).is_none());

        let names: Vec<_> = inv.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn remove_subtrees_drops_descendants() {
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        inv.append_batch(
            generation,
            vec![
                entry("/d/sub/a.txt", 1),
                entry("/d/sub", 1),
                entry("/d/subway.txt", 2),
                entry("/d/other.txt", 3),
            ],
        );

        assert_eq!(inv.remove_subtrees(&[PathBuf::from("/d/sub")]), 2);
        // Component-wise prefix: a sibling sharing the name prefix stays.
        let names: Vec<_> = inv.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["subway.txt", "other.txt"]);
        assert!(!inv.contains(Path::new("/d/sub/a.txt")));
        assert_eq!(inv.get(Path::new("/d/other.txt")).map(|e| e.size_bytes), Some(3));
    }

    #[test]
    fn remove_subtrees_handles_many_roots_in_one_pass() {
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        inv.append_batch(
            generation,
            (0..10_000).map(|i| entry(&format!("/v/f{i:05}.bin"), i)),
        );

        let roots: Vec<PathBuf> = (0..10_000)
            .filter(|i| i % 2 == 0)
            .map(|i| PathBuf::from(format!("/v/f{i:05}.bin")))
            .collect();
        assert_eq!(inv.remove_subtrees(&roots), 5_000);

        // Survivors keep their order and stay reachable by path.
        assert_eq!(inv.len(), 5_000);
        for (i, e) in inv.entries().iter().enumerate() {
            assert_eq!(e.size_bytes, 2 * i as u64 + 1);
            assert_eq!(inv.get(&e.path).map(|g| g.size_bytes), Some(e.size_bytes));
        }
        assert!(inv.get(Path::new("/v/f00000.bin")).is_none());
    }

    #[test]
    fn lookups_follow_entries_after_single_removal() {
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        inv.append_batch(generation, vec![entry("a", 1), entry("b", 2), entry("c", 3)]);

        inv.remove(Path::new("a"));
        assert_eq!(inv.get(Path::new("b")).map(|e| e.size_bytes), Some(2));
        assert_eq!(inv.get(Path::new("c")).map(|e| e.size_bytes), Some(3));
        assert!(inv.set_locking_processes(Path::new("c"), vec![LockingProcess::new(1, "x.exe")]));
        assert_eq!(inv.entries()[1].locking_processes.len(), 1);
    }

    #[test]
    fn removing_files_shrinks_ancestor_folders() {
        let vol = VolumeInfo::new("/", 1_000);
        let folder = |path: &str, size| InventoryEntry::new(PathBuf::from(path), true, size, false, &vol);
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        inv.append_batch(
            generation,
            vec![
                entry("/d/sub/a.txt", 100),
                entry("/d/sub/b.txt", 300),
                entry("/d/c.txt", 100),
                folder("/d/sub", 400),
                folder("/d", 500),
            ],
        );

        inv.remove_subtrees(&[PathBuf::from("/d/sub/b.txt")]);
        let sub = inv.get(Path::new("/d/sub")).unwrap();
        assert_eq!(sub.size_bytes, 100);
        assert!((sub.percent_of_volume - 10.0).abs() < 1e-9);
        assert_eq!(inv.get(Path::new("/d")).unwrap().size_bytes, 200);

        // Removing a whole folder subtracts its files once from the parent.
        inv.remove_subtrees(&[PathBuf::from("/d/sub"), PathBuf::from("/d/sub/a.txt")]);
        assert_eq!(inv.get(Path::new("/d")).unwrap().size_bytes, 100);

        inv.remove(Path::new("/d/c.txt"));
        let root = inv.get(Path::new("/d")).unwrap();
        assert_eq!(root.size_bytes, 0);
        assert_eq!(root.percent_of_volume, 0.0);
    }

    #[test]
    fn locking_processes_are_recorded_on_the_entry() {
        let mut inv = Inventory::default();
        let generation = inv.begin_generation();
        inv.append_batch(generation, vec![entry("a", 1)]);

        let holders = vec![LockingProcess::new(10, "word.exe")];
        assert!(inv.set_locking_processes(Path::new("a"), holders.clone()));
        assert!(!inv.set_locking_processes(Path::new("missing"), holders.clone()));
        assert_eq!(
            inv.get(Path::new("a")).map(|e| e.locking_processes.clone()),
            Some(holders)
        );
    }
}
