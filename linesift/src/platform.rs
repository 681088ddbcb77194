//! Privilege probing and the default scan root.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Checks for elevated privileges by running the platform's elevation
/// helper (`su -c id` on Unix, `net session` on Windows) and inspecting
/// its exit status.
///
/// A zero exit status proves only that the helper itself could run
/// elevated, not that the *calling* process holds elevated rights. Any
/// failure, including failure to spawn the helper at all, is treated as
/// "not elevated" and never surfaced as an error.
pub fn is_elevated() -> bool {
    let status = elevation_probe()
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) => status.success(),
        Err(e) => {
            debug!("Elevation helper could not be spawned: {}", e);
            false
        }
    }
}

#[cfg(unix)]
fn elevation_probe() -> Command {
    let mut cmd = Command::new("su");
    cmd.args(["-c", "id"]);
    cmd
}

#[cfg(windows)]
fn elevation_probe() -> Command {
    let mut cmd = Command::new("net");
    cmd.arg("session");
    cmd
}

/// Default scan root: the filesystem root for elevated processes, the
/// current working directory otherwise.
pub fn default_scan_root() -> PathBuf {
    if is_elevated() {
        PathBuf::from(std::path::MAIN_SEPARATOR_STR)
    } else {
        PathBuf::from(".")
    }
}
