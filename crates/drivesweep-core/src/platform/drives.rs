/// Drive enumeration and capacity queries.
///
/// On Windows every logical drive is listed with its type, label,
/// filesystem and capacity. Other hosts only expose the filesystem root so
/// the core can be exercised in tests and tooling.
use crate::model::size;
use std::path::{Path, PathBuf};

/// Information about a single drive.
#[derive(Debug, Clone)]
pub struct DriveInfo {
    /// Mount point path, e.g. "C:\".
    pub path: PathBuf,
    /// Drive letter, e.g. "C:".
    pub letter: String,
    pub drive_type: DriveType,
    /// Volume label (e.g. "Windows", "Data").
    pub label: String,
    /// Filesystem name (e.g. "NTFS", "FAT32").
    pub filesystem: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub used_bytes: u64,
    /// Usage percentage (0.0–100.0).
    pub usage_percent: f32,
    pub total_display: String,
    pub free_display: String,
    pub used_display: String,
}

impl DriveInfo {
    fn new(
        path: PathBuf,
        letter: String,
        drive_type: DriveType,
        label: String,
        filesystem: String,
        total_bytes: u64,
        free_bytes: u64,
    ) -> Self {
        let used_bytes = total_bytes.saturating_sub(free_bytes);
        let usage_percent = if total_bytes > 0 {
            (used_bytes as f64 / total_bytes as f64 * 100.0) as f32
        } else {
            0.0
        };
        Self {
            path,
            letter,
            drive_type,
            label,
            filesystem,
            total_bytes,
            free_bytes,
            used_bytes,
            usage_percent,
            total_display: size::format_size(total_bytes),
            free_display: size::format_size(free_bytes),
            used_display: size::format_size(used_bytes),
        }
    }

    /// Combo-box text: `C: (Windows) 120.50 GB`.
    pub fn display_name(&self) -> String {
        if self.label.is_empty() {
            format!("{} {}", self.letter, self.total_display)
        } else {
            format!("{} ({}) {}", self.letter, self.label, self.total_display)
        }
    }
}

/// Drive type classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveType {
    Fixed,
    Removable,
    Network,
    CdRom,
    Unknown,
}

impl DriveType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Removable => "Removable",
            Self::Network => "Network",
            Self::CdRom => "CD-ROM",
            Self::Unknown => "Unknown",
        }
    }
}

/// List the drives attached to the host.
///
/// Never fails: if the OS query fails the error is logged and an empty list
/// is returned.
pub fn enumerate_drives() -> Vec<DriveInfo> {
    imp::enumerate_drives()
}

/// Total capacity in bytes of the volume holding `path`.
pub fn volume_capacity(path: &Path) -> Option<u64> {
    imp::volume_capacity(path).map(|(total, _free)| total)
}

#[cfg(windows)]
mod imp {
    use super::{DriveInfo, DriveType};
    use std::ffi::OsString;
    use std::os::windows::ffi::OsStringExt;
    use std::path::{Path, PathBuf};
    use windows::core::{HSTRING, PCWSTR};
    use windows::Win32::Storage::FileSystem::{
        GetDiskFreeSpaceExW, GetDriveTypeW, GetLogicalDriveStringsW, GetVolumeInformationW,
    };

    // Drive type constants from the Windows API.
    const DRIVE_REMOVABLE_VAL: u32 = 2;
    const DRIVE_FIXED_VAL: u32 = 3;
    const DRIVE_REMOTE_VAL: u32 = 4;
    const DRIVE_CDROM_VAL: u32 = 5;

    pub(super) fn enumerate_drives() -> Vec<DriveInfo> {
        let mut drives = Vec::new();

        // Null-separated list of drive roots ("C:\\\0D:\\\0\0").
        let mut buffer = [0u16; 256];
        let len = unsafe { GetLogicalDriveStringsW(Some(&mut buffer)) };
        if len == 0 || len as usize > buffer.len() {
            tracing::warn!("GetLogicalDriveStringsW failed (returned {len})");
            return drives;
        }

        let all = OsString::from_wide(&buffer[..len as usize]);
        for root in all.to_string_lossy().split('\0').filter(|s| !s.is_empty()) {
            let root_w = HSTRING::from(root);
            let root_pcwstr = PCWSTR(root_w.as_ptr());

            let drive_type = match unsafe { GetDriveTypeW(root_pcwstr) } {
                DRIVE_FIXED_VAL => DriveType::Fixed,
                DRIVE_REMOVABLE_VAL => DriveType::Removable,
                DRIVE_REMOTE_VAL => DriveType::Network,
                DRIVE_CDROM_VAL => DriveType::CdRom,
                _ => DriveType::Unknown,
            };

            let mut label_buf = [0u16; 256];
            let mut fs_buf = [0u16; 256];
            let has_volume_info = unsafe {
                GetVolumeInformationW(
                    root_pcwstr,
                    Some(&mut label_buf),
                    None,
                    None,
                    None,
                    Some(&mut fs_buf),
                )
                .is_ok()
            };
            let (label, filesystem) = if has_volume_info {
                (wide_to_string(&label_buf), wide_to_string(&fs_buf))
            } else {
                (String::new(), String::new())
            };

            let (total, free) = volume_capacity(Path::new(root)).unwrap_or((0, 0));

            drives.push(DriveInfo::new(
                PathBuf::from(root),
                root.trim_end_matches('\\').to_string(),
                drive_type,
                label,
                filesystem,
                total,
                free,
            ));
        }

        drives
    }

    pub(super) fn volume_capacity(path: &Path) -> Option<(u64, u64)> {
        let path_w = HSTRING::from(path.as_os_str());
        let mut free_caller: u64 = 0;
        let mut total: u64 = 0;
        let mut free_total: u64 = 0;
        let ok = unsafe {
            GetDiskFreeSpaceExW(
                PCWSTR(path_w.as_ptr()),
                Some(&mut free_caller as *mut u64),
                Some(&mut total as *mut u64),
                Some(&mut free_total as *mut u64),
            )
            .is_ok()
        };
        ok.then_some((total, free_caller))
    }

    fn wide_to_string(buf: &[u16]) -> String {
        let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        String::from_utf16_lossy(&buf[..end])
    }
}

#[cfg(unix)]
mod imp {
    use super::{DriveInfo, DriveType};
    use std::path::{Path, PathBuf};

    pub(super) fn enumerate_drives() -> Vec<DriveInfo> {
        let root = Path::new("/");
        match volume_capacity(root) {
            Some((total, free)) => vec![DriveInfo::new(
                PathBuf::from(root),
                "/".to_string(),
                DriveType::Fixed,
                String::new(),
                String::new(),
                total,
                free,
            )],
            None => {
                tracing::warn!("statvfs on / failed");
                Vec::new()
            }
        }
    }

    pub(super) fn volume_capacity(path: &Path) -> Option<(u64, u64)> {
        let stat = rustix::fs::statvfs(path).ok()?;
        let total = stat.f_blocks.saturating_mul(stat.f_frsize);
        let free = stat.f_bavail.saturating_mul(stat.f_frsize);
        Some((total, free))
    }
}

#[cfg(not(any(windows, unix)))]
mod imp {
    use super::DriveInfo;
    use std::path::Path;

    pub(super) fn enumerate_drives() -> Vec<DriveInfo> {
        Vec::new()
    }

    pub(super) fn volume_capacity(_path: &Path) -> Option<(u64, u64)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_drives_does_not_panic() {
        for drive in enumerate_drives() {
            assert!(drive.used_bytes <= drive.total_bytes);
            assert!((0.0..=100.0).contains(&drive.usage_percent));
        }
    }

    #[test]
    fn capacity_of_temp_dir_is_known() {
        let tmp = std::env::temp_dir();
        let total = volume_capacity(&tmp).expect("temp dir capacity");
        assert!(total > 0);
    }

    #[test]
    fn display_name_includes_label_when_present() {
        let drive = DriveInfo::new(
            PathBuf::from("D:\\"),
            "D:".into(),
            DriveType::Fixed,
            "Data".into(),
            "NTFS".into(),
            1_073_741_824,
            0,
        );
        assert_eq!(drive.display_name(), "D: (Data) 1.00 GB");
        assert_eq!(drive.usage_percent, 100.0);
    }
}
