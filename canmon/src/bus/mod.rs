pub mod frame;
pub mod sink;
pub mod source;

pub use frame::{FrameRecord, RawChunk};
pub use sink::{FrameSink, SendError};
pub use source::{RecvError, Source, SourceError};
