use anyhow::{anyhow, Result};

#[cfg(target_os = "linux")]
use std::process::{Command, Stdio};

#[cfg(not(target_os = "linux"))]
use copypasta::{ClipboardContext, ClipboardProvider};

pub trait Clipboard {
    fn copy(&self, value: &str) -> Result<()>;
}

pub struct SystemClipboard {}

impl SystemClipboard {
    pub fn new() -> Self {
        SystemClipboard {}
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, value: &str) -> Result<()> {
        copy_to_clipboard(value)
    }
}

/// Linux: wl-copy on Wayland, xclip on X11.
#[cfg(target_os = "linux")]
pub fn copy_to_clipboard(value: &str) -> Result<()> {
    let has_wayland = std::env::var("WAYLAND_DISPLAY").is_ok();
    let has_x11 = std::env::var("DISPLAY").is_ok();

    if !has_wayland && !has_x11 {
        return Err(anyhow!(
            "no graphical clipboard detected (neither DISPLAY nor WAYLAND_DISPLAY is set)"
        ));
    }

    if has_wayland && try_pipe_to("wl-copy", &[], value).is_ok() {
        return Ok(());
    }

    if has_x11 && try_pipe_to("xclip", &["-selection", "clipboard"], value).is_ok() {
        return Ok(());
    }

    Err(anyhow!(
        "wl-copy/xclip not available or failed; install `wl-clipboard` or `xclip`"
    ))
}

#[cfg(target_os = "linux")]
fn try_pipe_to(cmd: &str, args: &[&str], value: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| anyhow!("failed to spawn {}: {e}", cmd))?;

    {
        use std::io::Write;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(value.as_bytes())?;
        }
    }

    let status = child.wait()?;
    if !status.success() {
        return Err(anyhow!("{} exited with status {}", cmd, status));
    }

    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn copy_to_clipboard(value: &str) -> Result<()> {
    let mut ctx =
        ClipboardContext::new().map_err(|e| anyhow!("failed to initialize clipboard: {e}"))?;

    ctx.set_contents(value.to_string())
        .map_err(|e| anyhow!("failed to copy to clipboard: {e}"))?;

    Ok(())
}
