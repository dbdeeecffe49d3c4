//! Pipe capture for child processes
//!
//! Each pipe is drained on its own thread so a child that fills one pipe while we wait
//! on the other can't deadlock.

use std::io::Read;
use std::thread::{self, JoinHandle};
use tracing::debug;

pub(super) type PipeReader = JoinHandle<std::io::Result<String>>;

/// Spawn a thread that reads `pipe` to EOF and returns it as lossy UTF-8.
pub(super) fn spawn_pipe_reader<R>(pipe: Option<R>, name: &'static str) -> Option<PipeReader>
where
    R: Read + Send + 'static,
{
    let mut pipe = pipe?;
    let handle = thread::Builder::new()
        .name(format!("pipe-{}", name))
        .spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            debug!(pipe = name, bytes = buf.len(), "Pipe closed");
            Ok(String::from_utf8_lossy(&buf).into_owned())
        });
    match handle {
        Ok(handle) => Some(handle),
        Err(e) => {
            debug!(pipe = name, error = %e, "Failed to spawn pipe reader");
            None
        }
    }
}

/// Wait for a reader and return what it captured. A missing reader yields an empty string.
pub(super) fn collect(reader: Option<PipeReader>) -> std::io::Result<String> {
    match reader {
        None => Ok(String::new()),
        Some(handle) => handle
            .join()
            .map_err(|_| std::io::Error::other("pipe reader thread panicked"))?,
    }
}
