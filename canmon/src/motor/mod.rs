mod dispatch;
mod encoder;

pub use dispatch::{Dispatcher, TickOutcome};
pub use encoder::{SpeedEncoder, SpeedFrame, CHANNELS, PAYLOAD_LEN};
