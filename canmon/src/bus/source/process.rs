//! Dump process source.
//!
//! Spawns the dump utility (`candump <iface>` by default) and reads its
//! stdout as the frame stream. The child handle stays with the `Source`
//! as a guard: dropping it kills and reaps the process, which also ends
//! any read blocked on the pipe, so no dump process outlives the console.

use super::{RawSource, SourceError};
use std::io::{self, Read};
use std::process::{Child, ChildStdout, Command, Stdio};

/// Guard over the spawned dump utility.
pub struct DumpProcess {
    child: Child,
}

impl DumpProcess {
    /// Spawns `command interface` with a piped stdout, returning the
    /// guard and the pipe to read from. Failure to start the process is
    /// `SourceError::Unavailable`.
    pub fn spawn(
        command: &str,
        interface: &str,
    ) -> Result<(DumpProcess, ChildStdout), SourceError> {
        let mut child = Command::new(command)
            .arg(interface)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .spawn()
            .map_err(SourceError::Unavailable)?;
        let stdout = match child.stdout.take() {
            Some(out) => out,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(SourceError::MissingStdout);
            }
        };
        Ok((DumpProcess { child }, stdout))
    }
}

impl RawSource for ChildStdout {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf)
    }
}

impl Drop for DumpProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
