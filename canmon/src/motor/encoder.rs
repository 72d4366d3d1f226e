//! Speed payload encoding.
//!
//! The outbound speed frame carries one big-endian 16-bit value per
//! channel, four channels in eight bytes. The encoder holds the payload
//! across calls: a transmit only rewrites the channels selected by the
//! mask, everything else keeps whatever the previous cycle put there.

use std::fmt::{Display, Formatter};

/// Number of speed channels in the outbound frame.
pub const CHANNELS: usize = 4;
/// Outbound payload size in bytes, two per channel.
pub const PAYLOAD_LEN: usize = 2 * CHANNELS;

/// Maps a target ratio onto per-channel speed words.
pub struct SpeedEncoder {
    payload: [u8; PAYLOAD_LEN],
    max_speed: u16,
}

impl SpeedEncoder {
    pub fn new(max_speed: u16) -> SpeedEncoder {
        SpeedEncoder {
            payload: [0; PAYLOAD_LEN],
            max_speed,
        }
    }

    pub fn max_speed(&self) -> u16 {
        self.max_speed
    }

    /// Encodes `ratio` (clamped to [0, 1]) into the channels selected by
    /// `mask`, bit i selecting channel i. Unselected channels retain
    /// their bytes from the prior call. Never fails.
    pub fn encode(&mut self, ratio: f64, mask: u8) -> SpeedFrame {
        let ratio = ratio.clamp(0.0, 1.0);
        let speed = (ratio * self.max_speed as f64).round() as u16;
        for i in 0..CHANNELS {
            if mask & (1 << i) != 0 {
                self.payload[2 * i] = (speed >> 8) as u8;
                self.payload[2 * i + 1] = (speed & 0xff) as u8;
            }
        }
        SpeedFrame {
            speed,
            payload: self.payload,
        }
    }
}

/// One encoded transmit: the computed speed word and the full payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedFrame {
    pub speed: u16,
    pub payload: [u8; PAYLOAD_LEN],
}

impl SpeedFrame {
    /// Payload as a 16-character lowercase hex string, no separators.
    pub fn hex(&self) -> String {
        let mut out = String::with_capacity(2 * PAYLOAD_LEN);
        for byte in &self.payload {
            out.push_str(&format!("{:02x}", byte));
        }
        out
    }
}

impl Display for SpeedFrame {
    /// Space-separated payload bytes, as shown in the console debug line.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, byte) in self.payload.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode16(frame: &SpeedFrame, channel: usize) -> u16 {
        u16::from_be_bytes([frame.payload[2 * channel], frame.payload[2 * channel + 1]])
    }

    #[test]
    fn encode_is_idempotent() {
        let mut enc = SpeedEncoder::new(0x0aff);
        let first = enc.encode(0.37, 0b1111);
        let second = enc.encode(0.37, 0b1111);
        assert_eq!(first, second);
    }

    #[test]
    fn selected_channels_carry_rounded_speed() {
        let mut enc = SpeedEncoder::new(0x0fff);
        for ratio in [0.0, 0.1, 0.25, 0.5, 0.75, 0.999, 1.0] {
            let frame = enc.encode(ratio, 0b1111);
            let expected = (ratio * 4095.0).round() as u16;
            assert_eq!(frame.speed, expected);
            for ch in 0..CHANNELS {
                assert_eq!(decode16(&frame, ch), expected);
            }
        }
    }

    #[test]
    fn unselected_channels_keep_prior_bytes() {
        let mut enc = SpeedEncoder::new(0x0fff);
        enc.encode(1.0, 0b1111);
        let frame = enc.encode(0.5, 0b0101);
        assert_eq!(frame.speed, 2048);
        assert_eq!(frame.payload[0..2], [0x08, 0x00]);
        assert_eq!(frame.payload[4..6], [0x08, 0x00]);
        assert_eq!(frame.payload[2..4], [0x0f, 0xff]);
        assert_eq!(frame.payload[6..8], [0x0f, 0xff]);
        assert_eq!(frame.hex(), "08000fff08000fff");
    }

    #[test]
    fn ratio_is_clamped() {
        let mut enc = SpeedEncoder::new(0x0fff);
        assert_eq!(enc.encode(1.7, 0b0001).speed, 0x0fff);
        assert_eq!(enc.encode(-0.3, 0b0001).speed, 0);
    }
}
