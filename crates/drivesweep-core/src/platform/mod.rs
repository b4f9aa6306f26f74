/// Platform-specific functionality: drive enumeration, file attributes,
/// lock-holder discovery, process termination, removal and shortcuts.
///
/// Each OS capability sits behind a small trait with a Windows
/// implementation and a fallback, so the scanner and executor stay
/// platform-agnostic.
pub mod attributes;
pub mod drives;
pub mod locks;
pub mod process;
pub mod remover;
pub mod shortcut;

pub use attributes::{AttributeProbe, SystemAttributeProbe};
pub use drives::{enumerate_drives, volume_capacity, DriveInfo, DriveType};
pub use locks::{system_lock_probe, LockProbe, NoLockProbe};
pub use process::{ProcessTerminator, SystemTerminator};
pub use remover::{FsRemover, Remover};

#[cfg(windows)]
pub use locks::RestartManagerProbe;
