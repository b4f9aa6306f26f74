/// Data model for the drive inventory.
///
/// Re-exports the entry, volume and shared-store types.
pub mod category;
pub mod entry;
pub mod inventory;
pub mod size;
pub mod volume;

pub use category::{classify, classify_path, Category};
pub use entry::{format_holders, InventoryEntry, LockingProcess};
pub use inventory::{Inventory, SharedInventory};
pub use volume::VolumeInfo;
