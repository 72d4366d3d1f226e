//! Transmit dispatch.
//!
//! On every tick the current target ratio is encoded and handed to the
//! frame sink. Transmission is best effort: a failed send is reported in
//! the outcome for the caller to log, and the next tick proceeds as if
//! nothing happened.

use crate::bus::sink::{FrameSink, SendError};
use crate::config::Config;
use crate::motor::encoder::{SpeedEncoder, SpeedFrame};

/// Result of one dispatch cycle. `error` is set when the sink refused
/// the frame; the encoded frame is available either way.
pub struct TickOutcome {
    pub frame: SpeedFrame,
    pub error: Option<SendError>,
}

pub struct Dispatcher<S: FrameSink> {
    encoder: SpeedEncoder,
    sink: S,
    mask: u8,
    frame_id: u32,
}

impl<S: FrameSink> Dispatcher<S> {
    pub fn new(sink: S, config: &Config) -> Dispatcher<S> {
        Dispatcher {
            encoder: SpeedEncoder::new(config.max_speed),
            sink,
            mask: config.channel_mask,
            frame_id: config.frame_id,
        }
    }

    /// Encodes `ratio` and transmits the resulting command.
    pub fn tick(&mut self, ratio: f64) -> TickOutcome {
        let frame = self.encoder.encode(ratio, self.mask);
        let error = self.sink.send_frame(self.frame_id, &frame.hex()).err();
        TickOutcome { frame, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingSink {
        sent: Vec<(u32, String)>,
        fail: bool,
    }

    impl FrameSink for RecordingSink {
        fn send_frame(&mut self, frame_id: u32, hex_payload: &str) -> Result<(), SendError> {
            self.sent.push((frame_id, hex_payload.to_string()));
            if self.fail {
                Err(SendError::Failed(Some(1)))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn tick_sends_encoded_payload() {
        let mut config = Config::default();
        config.channel_mask = 0b1111;
        let sink = RecordingSink {
            sent: vec![],
            fail: false,
        };
        let mut dispatcher = Dispatcher::new(sink, &config);
        let outcome = dispatcher.tick(1.0);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.frame.speed, 0x0fff);
        assert_eq!(
            dispatcher.sink.sent,
            vec![(0x200, "0fff0fff0fff0fff".to_string())],
        );
    }

    #[test]
    fn failed_send_is_reported_not_fatal() {
        let config = Config::default();
        let sink = RecordingSink {
            sent: vec![],
            fail: true,
        };
        let mut dispatcher = Dispatcher::new(sink, &config);
        let first = dispatcher.tick(0.5);
        assert!(first.error.is_some());
        // The next tick still goes out, with accumulated payload state.
        let second = dispatcher.tick(0.5);
        assert_eq!(first.frame, second.frame);
        assert_eq!(dispatcher.sink.sent.len(), 2);
    }
}
