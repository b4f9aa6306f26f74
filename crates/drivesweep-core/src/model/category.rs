/// Entry classification by extension.
///
/// Four coarse categories drive the type filter in the table. The mapping is
/// a pure function of "is this a directory" and the file extension.
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Coarse type of an inventory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Folder,
    Program,
    Document,
    File,
}

impl Category {
    /// Every category, in the order the filter combo box lists them.
    pub const ALL: [Category; 4] = [
        Category::File,
        Category::Program,
        Category::Document,
        Category::Folder,
    ];

    /// Human-readable label, also used in the CSV `type` column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Folder => "Folder",
            Self::Program => "Program",
            Self::Document => "Document",
            Self::File => "File",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an entry from its directory flag and extension.
///
/// `ext` may be given with or without the leading dot and in any case.
/// Directories are always `Folder`, whatever their name looks like.
pub fn classify(is_dir: bool, ext: &str) -> Category {
    if is_dir {
        return Category::Folder;
    }

    // Lowercase into a stack buffer. Nothing we match is longer than 4 bytes,
    // so anything over 16 is `File` without allocating.
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    let bytes = ext.as_bytes();
    if bytes.len() > 16 {
        return Category::File;
    }
    let mut lower = [0u8; 16];
    for (dest, &src) in lower.iter_mut().zip(bytes) {
        *dest = src.to_ascii_lowercase();
    }

    match &lower[..bytes.len()] {
        b"exe" | b"msi" => Category::Program,
        b"txt" | b"docx" | b"pdf" | b"xls" | b"xlsx" | b"ppt" | b"pptx" | b"rtf" | b"odt" => {
            Category::Document
        }
        _ => Category::File,
    }
}

/// Classify a path. Files without an extension are `File`.
pub fn classify_path(path: &Path, is_dir: bool) -> Category {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy())
        .unwrap_or_default();
    classify(is_dir, &ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_are_folders_regardless_of_extension() {
        assert_eq!(classify(true, "anything"), Category::Folder);
        assert_eq!(classify(true, ".exe"), Category::Folder);
        assert_eq!(classify(true, ""), Category::Folder);
    }

    #[test]
    fn programs() {
        assert_eq!(classify(false, ".exe"), Category::Program);
        assert_eq!(classify(false, "msi"), Category::Program);
    }

    #[test]
    fn documents() {
        for ext in [
            ".txt", ".docx", ".pdf", ".xls", ".xlsx", ".ppt", ".pptx", ".rtf", ".odt",
        ] {
            assert_eq!(classify(false, ext), Category::Document, "{ext}");
        }
    }

    #[test]
    fn everything_else_is_a_file() {
        assert_eq!(classify(false, ".xyz"), Category::File);
        assert_eq!(classify(false, ""), Category::File);
        assert_eq!(classify(false, ".doc"), Category::File);
        assert_eq!(classify(false, ".dll"), Category::File);
        assert_eq!(classify(false, &"x".repeat(40)), Category::File);
    }

    #[test]
    fn extension_matching_is_case_insensitive() {
        assert_eq!(classify(false, ".EXE"), Category::Program);
        assert_eq!(classify(false, ".Pdf"), Category::Document);
        assert_eq!(classify(false, "XLSX"), Category::Document);
    }

    #[test]
    fn classify_path_uses_last_extension() {
        assert_eq!(
            classify_path(Path::new("setup.tar.msi"), false),
            Category::Program
        );
        assert_eq!(classify_path(Path::new("README"), false), Category::File);
        assert_eq!(classify_path(Path::new("docs.pdf"), true), Category::Folder);
    }
}
