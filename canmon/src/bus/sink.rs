//! Frame sink.
//!
//! Outbound frames go through a `FrameSink`. The shipped implementation
//! shells out to the send utility (`cansend <iface> <id>#<hexpayload>`);
//! transmit failures are reported back but are never fatal, the console
//! keeps ticking regardless.

use std::io;
use std::process::{Command, Stdio};

/// Possible errors when sending a frame.
#[derive(Debug)]
pub enum SendError {
    /// The send utility could not be invoked.
    Spawn(io::Error),
    /// The send utility ran and reported failure.
    Failed(Option<i32>),
}

/// Write side of the bus.
pub trait FrameSink {
    /// Transmits one frame with the given identifier and hex-encoded
    /// payload (no separators, lowercase).
    fn send_frame(&mut self, frame_id: u32, hex_payload: &str) -> Result<(), SendError>;
}

/// FrameSink invoking the send utility once per frame.
pub struct SendProcess {
    command: String,
    interface: String,
}

impl SendProcess {
    pub fn new(command: &str, interface: &str) -> SendProcess {
        SendProcess {
            command: command.to_string(),
            interface: interface.to_string(),
        }
    }
}

impl FrameSink for SendProcess {
    fn send_frame(&mut self, frame_id: u32, hex_payload: &str) -> Result<(), SendError> {
        let status = Command::new(&self.command)
            .arg(&self.interface)
            .arg(format!("{:03X}#{}", frame_id, hex_payload))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(SendError::Spawn)?;
        if status.success() {
            Ok(())
        } else {
            Err(SendError::Failed(status.code()))
        }
    }
}
