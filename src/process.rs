// src/process.rs

//! Running external helper tools

use crate::error::{Error, Result};
use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Default time an external helper may run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Run `command` to completion, killing it after `timeout`
///
/// Standard input is closed; output is captured and logged. A non-zero exit
/// status, a timeout, or a missing executable is an error.
pub fn run_tool(mut command: Command, timeout: Duration) -> Result<()> {
    let program = command.get_program().to_string_lossy().to_string();
    debug!("Running {:?}", command);

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ToolNotFound(program.clone()),
            _ => Error::CommandFailed(format!("Failed to spawn {program}: {e}")),
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let Some(status) = child.wait_timeout(timeout)? else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(Error::CommandFailed(format!(
            "{} timed out after {} seconds",
            program,
            timeout.as_secs()
        )));
    };

    for line in stdout.join().unwrap_or_default().lines() {
        debug!("[{}] {}", program, line);
    }
    for line in stderr.join().unwrap_or_default().lines() {
        warn!("[{}] {}", program, line);
    }

    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed(format!(
            "{} failed with exit code {}",
            program,
            status.code().unwrap_or(-1)
        )))
    }
}

/// Read a child pipe to the end on its own thread so the child never blocks on a full pipe
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut output = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut output);
        }
        output
    })
}
