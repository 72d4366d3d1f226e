//! Monitor configuration.
//!
//! Deployments of this console differ only in a handful of constants
//! (bus interface, speed scale, tick rate). `Config` collects all of
//! those knobs in one place so a single build serves every variant.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    /// Dump utility invoked to read the bus (`candump`-compatible:
    /// one text line per received frame on stdout).
    pub dump_command: String,
    /// Send utility invoked to transmit (`cansend`-compatible:
    /// `<iface> <id>#<hexpayload>`).
    pub send_command: String,
    /// Bus interface the dump utility reads from.
    pub source_interface: String,
    /// Bus interface the send utility writes to.
    pub sink_interface: String,
    /// Identifier patterns whose presence in bus traffic marks a node
    /// online.
    pub monitored_ids: Vec<String>,
    /// Number of recent frame records kept for display.
    pub ring_capacity: usize,
    /// Full-scale speed value; the target ratio maps onto [0, max_speed].
    /// Deployed controllers use 0x0aff, 0x08ff, 0x0fff or 0xff.
    pub max_speed: u16,
    /// Bitmask of the speed channels written on each transmit.
    pub channel_mask: u8,
    /// CAN identifier of the outbound speed frame.
    pub frame_id: u32,
    /// Interval between transmit/render ticks.
    pub tick_interval: Duration,
    /// Bytes taken as one frame record when scanning a chunk.
    pub frame_window: usize,
    /// Maximum bytes consumed from the dump stream per read.
    pub chunk_size: usize,
    /// Byte marking the start of a frame record in the dump text.
    pub frame_marker: u8,
    /// Consecutive read failures tolerated before the source is
    /// declared disconnected.
    pub read_retries: u32,
    /// Base delay between read retries (scaled by the failure count).
    pub retry_backoff: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            dump_command: "candump".to_string(),
            send_command: "cansend".to_string(),
            source_interface: "can0".to_string(),
            sink_interface: "can0".to_string(),
            monitored_ids: vec![
                "201".to_string(),
                "202".to_string(),
                "203".to_string(),
                "204".to_string(),
            ],
            ring_capacity: 5,
            max_speed: 0x0fff,
            channel_mask: 0b0101,
            frame_id: 0x200,
            tick_interval: Duration::from_millis(200),
            frame_window: 42,
            chunk_size: 100,
            frame_marker: b'c',
            read_retries: 3,
            retry_backoff: Duration::from_millis(250),
        }
    }
}
