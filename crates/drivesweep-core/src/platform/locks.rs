/// Lock-holder discovery: which processes have a file open.
///
/// Windows answers this through the Restart Manager, which reports every
/// process holding a handle to a registered file. Hosts without an
/// equivalent use [`NoLockProbe`], which never finds anyone; deletion then
/// reports the plain removal error.
use crate::model::LockingProcess;
use std::path::Path;

/// Finds processes holding a path open.
pub trait LockProbe: Send + Sync {
    /// Holders of `path`, in the order the OS reports them. Empty when
    /// nothing holds the path or the query failed.
    fn holders(&self, path: &Path) -> Vec<LockingProcess>;
}

/// Fallback probe for platforms without lock introspection.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLockProbe;

impl LockProbe for NoLockProbe {
    fn holders(&self, _path: &Path) -> Vec<LockingProcess> {
        Vec::new()
    }
}

/// Restart Manager backed probe.
#[cfg(windows)]
#[derive(Debug, Default, Clone, Copy)]
pub struct RestartManagerProbe;

#[cfg(windows)]
impl LockProbe for RestartManagerProbe {
    fn holders(&self, path: &Path) -> Vec<LockingProcess> {
        match restart_manager::holders(path) {
            Ok(holders) => holders,
            Err(e) => {
                tracing::warn!("Restart Manager query for {} failed: {e}", path.display());
                Vec::new()
            }
        }
    }
}

/// The best probe available on this host.
pub fn system_lock_probe() -> Box<dyn LockProbe> {
    #[cfg(windows)]
    {
        Box::new(RestartManagerProbe)
    }
    #[cfg(not(windows))]
    {
        Box::new(NoLockProbe)
    }
}

#[cfg(windows)]
mod restart_manager {
    use crate::model::LockingProcess;
    use std::path::Path;
    use windows::core::{HSTRING, PCWSTR, PWSTR};
    use windows::Win32::Foundation::{CloseHandle, ERROR_MORE_DATA, ERROR_SUCCESS, WIN32_ERROR};
    use windows::Win32::System::RestartManager::{
        RmEndSession, RmGetList, RmRegisterResources, RmStartSession, CCH_RM_SESSION_KEY,
        RM_PROCESS_INFO,
    };
    use windows::Win32::System::Threading::{
        OpenProcess, QueryFullProcessImageNameW, PROCESS_NAME_WIN32,
        PROCESS_QUERY_LIMITED_INFORMATION,
    };

    /// Upper bound on RmGetList retries when the holder list grows between
    /// the sizing call and the fetch.
    const MAX_ATTEMPTS: usize = 4;

    /// Ends the Restart Manager session on drop.
    struct Session(u32);

    impl Drop for Session {
        fn drop(&mut self) {
            unsafe {
                let _ = RmEndSession(self.0);
            }
        }
    }

    fn check(code: WIN32_ERROR, call: &str) -> std::io::Result<()> {
        if code == ERROR_SUCCESS {
            Ok(())
        } else {
            Err(std::io::Error::other(format!("{call} failed: {}", code.0)))
        }
    }

    pub(super) fn holders(path: &Path) -> std::io::Result<Vec<LockingProcess>> {
        let mut handle = 0u32;
        let mut key = [0u16; CCH_RM_SESSION_KEY as usize + 1];
        check(
            unsafe { RmStartSession(&mut handle, 0, PWSTR(key.as_mut_ptr())) },
            "RmStartSession",
        )?;
        let session = Session(handle);

        let path_w = HSTRING::from(path.as_os_str());
        let files = [PCWSTR(path_w.as_ptr())];
        check(
            unsafe { RmRegisterResources(session.0, Some(&files), None, None) },
            "RmRegisterResources",
        )?;

        let mut infos: Vec<RM_PROCESS_INFO> = Vec::new();
        for _ in 0..MAX_ATTEMPTS {
            let mut needed = 0u32;
            let mut count = infos.len() as u32;
            let mut reasons = 0u32;
            let code = unsafe {
                RmGetList(
                    session.0,
                    &mut needed,
                    &mut count,
                    if infos.is_empty() {
                        None
                    } else {
                        Some(infos.as_mut_ptr())
                    },
                    &mut reasons,
                )
            };
            if code == ERROR_MORE_DATA {
                infos = vec![RM_PROCESS_INFO::default(); needed as usize];
                continue;
            }
            check(code, "RmGetList")?;
            infos.truncate(count as usize);
            return Ok(infos.iter().map(to_locking_process).collect());
        }

        Err(std::io::Error::other("RmGetList kept growing"))
    }

    fn to_locking_process(info: &RM_PROCESS_INFO) -> LockingProcess {
        let pid = info.Process.dwProcessId;
        let name = image_name(pid).unwrap_or_else(|| {
            let end = info
                .strAppName
                .iter()
                .position(|&c| c == 0)
                .unwrap_or(info.strAppName.len());
            String::from_utf16_lossy(&info.strAppName[..end])
        });
        LockingProcess::new(pid, name)
    }

    /// Executable file name of `pid`, e.g. "WINWORD.EXE".
    fn image_name(pid: u32) -> Option<String> {
        unsafe {
            let process = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid).ok()?;
            let mut buf = [0u16; 1024];
            let mut len = buf.len() as u32;
            let result = QueryFullProcessImageNameW(
                process,
                PROCESS_NAME_WIN32,
                PWSTR(buf.as_mut_ptr()),
                &mut len,
            );
            let _ = CloseHandle(process);
            result.ok()?;

            let full = String::from_utf16_lossy(&buf[..len as usize]);
            full.rsplit('\\').next().map(str::to_string)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_lock_probe_finds_nobody() {
        assert!(NoLockProbe.holders(Path::new("anything")).is_empty());
    }

    #[test]
    fn system_probe_on_unheld_file_is_empty() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        drop(file);
        assert!(system_lock_probe().holders(&path).is_empty());
    }
}
