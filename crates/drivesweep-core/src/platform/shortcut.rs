/// Desktop shortcut creation.
///
/// Writes a `.lnk` on the current user's desktop pointing at the running
/// executable. Failures are returned to the caller for display; they never
/// affect the scan/delete workflow.
use crate::error::{DriveSweepError, Result};
use std::path::{Path, PathBuf};

/// Name of the shortcut file, without extension.
pub const SHORTCUT_NAME: &str = "DriveSweep";

/// `<USERPROFILE>\Desktop`, if the profile directory is known.
pub fn desktop_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(|home| PathBuf::from(home).join("Desktop"))
}

/// Full path of the shortcut file inside `desktop`.
pub fn shortcut_path(desktop: &Path, name: &str) -> PathBuf {
    desktop.join(format!("{name}.lnk"))
}

/// Create a desktop shortcut to the running executable.
pub fn create_for_current_exe() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| DriveSweepError::io("current executable", e))?;
    let args: Vec<String> = std::env::args().skip(1).collect();
    create_desktop_shortcut(&exe, &args.join(" "), SHORTCUT_NAME)
}

/// Create `<Desktop>\<name>.lnk` launching `target` with `args`.
///
/// The working directory is the target's parent and the icon is taken from
/// the target itself.
pub fn create_desktop_shortcut(target: &Path, args: &str, name: &str) -> Result<PathBuf> {
    let desktop = desktop_dir()
        .ok_or_else(|| DriveSweepError::Shortcut("user profile directory is not set".into()))?;
    let link = shortcut_path(&desktop, name);
    imp::write_link(target, args, &link)?;
    tracing::info!("Created shortcut {}", link.display());
    Ok(link)
}

#[cfg(windows)]
mod imp {
    use crate::error::{DriveSweepError, Result};
    use std::path::Path;
    use windows::core::{Interface, HSTRING};
    use windows::Win32::System::Com::{
        CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
        COINIT_APARTMENTTHREADED,
    };
    use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

    pub(super) fn write_link(target: &Path, args: &str, link: &Path) -> Result<()> {
        let working_dir = target.parent().unwrap_or(target);
        let shortcut_err = |e: windows::core::Error| DriveSweepError::Shortcut(e.message());

        unsafe {
            // The UI thread may already be in an apartment (winit initialises
            // OLE); S_FALSE still has to be balanced.
            let init = CoInitializeEx(None, COINIT_APARTMENTTHREADED);

            let result = (|| -> windows::core::Result<()> {
                let shell_link: IShellLinkW =
                    CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)?;
                shell_link.SetPath(&HSTRING::from(target.as_os_str()))?;
                shell_link.SetArguments(&HSTRING::from(args))?;
                shell_link.SetWorkingDirectory(&HSTRING::from(working_dir.as_os_str()))?;
                shell_link.SetIconLocation(&HSTRING::from(target.as_os_str()), 0)?;

                let file: IPersistFile = shell_link.cast()?;
                file.Save(&HSTRING::from(link.as_os_str()), true)
            })();

            if init.is_ok() {
                CoUninitialize();
            }
            result.map_err(shortcut_err)
        }
    }
}

#[cfg(not(windows))]
mod imp {
    use crate::error::{DriveSweepError, Result};
    use std::path::Path;

    pub(super) fn write_link(_target: &Path, _args: &str, _link: &Path) -> Result<()> {
        Err(DriveSweepError::Unsupported("desktop shortcut creation"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_path_appends_lnk() {
        let path = shortcut_path(Path::new("desk"), SHORTCUT_NAME);
        assert_eq!(path, Path::new("desk").join("DriveSweep.lnk"));
    }

    #[cfg(not(windows))]
    #[test]
    fn unsupported_off_windows() {
        let err = create_desktop_shortcut(Path::new("/bin/true"), "", "x");
        assert!(err.is_err());
    }
}
