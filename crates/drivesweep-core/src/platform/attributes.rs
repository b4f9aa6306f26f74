/// Restricted-attribute detection.
///
/// An entry is restricted when it carries the Windows SYSTEM attribute.
/// The flag only gates deletion batches in the UI, so every failure to
/// read it answers "not restricted".
use std::path::Path;

/// `FILE_ATTRIBUTE_SYSTEM` from winnt.h.
pub const FILE_ATTRIBUTE_SYSTEM: u32 = 0x4;

/// Answers whether a path is protected from casual deletion.
pub trait AttributeProbe: Send + Sync {
    fn is_restricted(&self, path: &Path) -> bool;
}

/// Reads the SYSTEM bit from file metadata. Always `false` off Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAttributeProbe;

impl AttributeProbe for SystemAttributeProbe {
    #[cfg(windows)]
    fn is_restricted(&self, path: &Path) -> bool {
        use std::os::windows::fs::MetadataExt;
        std::fs::symlink_metadata(path)
            .map(|meta| meta.file_attributes() & FILE_ATTRIBUTE_SYSTEM != 0)
            .unwrap_or(false)
    }

    #[cfg(not(windows))]
    fn is_restricted(&self, _path: &Path) -> bool {
        false
    }
}
