use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::Pid;

#[cfg(target_os = "macos")]
const PID_FILE_PATH: &str = "/tmp/mouseset.pid";

/// Single-instance guard. Removed again when dropped.
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    #[cfg(target_os = "macos")]
    pub fn acquire_default() -> Result<Self> {
        Self::acquire(PID_FILE_PATH)
    }

    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let own_pid = std::process::id() as i32;

        if let Some(pid) = read_pid(&path) {
            if pid != own_pid && is_process_alive(pid) {
                bail!("mouseset is already running (pid {})", pid);
            }
            tracing::debug!("Replacing stale pid file for pid {}", pid);
        }

        fs::write(&path, format!("{}\n", own_pid))
            .with_context(|| format!("Failed to write pid file {:?}", path))?;
        Ok(Self { path })
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn read_pid(path: &Path) -> Option<i32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn is_process_alive(pid: i32) -> bool {
    if pid <= 0 {
        return false;
    }
    match kill(Pid::from_raw(pid), None) {
        Ok(()) => true,
        // Exists, but owned by someone else
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}
