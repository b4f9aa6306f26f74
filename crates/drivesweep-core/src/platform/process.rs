/// Forced termination of lock-holding processes.
///
/// Only ever invoked after the user has confirmed the termination for a
/// specific file. Each call is independent; a failure for one process does
/// not affect the others.

/// Terminates a process by id.
pub trait ProcessTerminator: Send + Sync {
    fn terminate(&self, pid: u32) -> std::io::Result<()>;
}

/// Terminates real OS processes.
///
/// Windows: `TerminateProcess` with exit code 1. Unix: `SIGTERM`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTerminator;

impl ProcessTerminator for SystemTerminator {
    #[cfg(windows)]
    fn terminate(&self, pid: u32) -> std::io::Result<()> {
        use windows::Win32::Foundation::CloseHandle;
        use windows::Win32::System::Threading::{OpenProcess, TerminateProcess, PROCESS_TERMINATE};

        unsafe {
            let handle = OpenProcess(PROCESS_TERMINATE, false, pid)?;
            let result = TerminateProcess(handle, 1);
            let _ = CloseHandle(handle);
            result?;
        }
        tracing::info!("Terminated process {pid}");
        Ok(())
    }

    #[cfg(unix)]
    fn terminate(&self, pid: u32) -> std::io::Result<()> {
        use rustix::process::{kill_process, Pid, Signal};

        let raw = i32::try_from(pid).map_err(|_| invalid_pid(pid))?;
        let pid_t = Pid::from_raw(raw).ok_or_else(|| invalid_pid(pid))?;
        kill_process(pid_t, Signal::TERM)?;
        tracing::info!("Sent SIGTERM to process {pid}");
        Ok(())
    }

    #[cfg(not(any(windows, unix)))]
    fn terminate(&self, _pid: u32) -> std::io::Result<()> {
        Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "process termination is not supported on this platform",
        ))
    }
}

#[cfg(unix)]
fn invalid_pid(pid: u32) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("invalid pid {pid}"))
}
