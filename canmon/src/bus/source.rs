//! Frame source.
//!
//! The `Source` object provides a few things:
//! - Abstracting across the specific `RawSource`s. The only raw source
//!   shipped here runs the dump utility as a subprocess, but anything
//!   producing the dump text stream can stand in (tests script one).
//! - Decoupling bus reads from the consumer: a dedicated thread blocks
//!   on the raw source and forwards chunks over a bounded crossbeam
//!   channel, so the console never stalls on the bus.
//! - Bounded retry with backoff on transient read errors before the
//!   source is declared disconnected.
//!
//! Note: `Source` sets up a dedicated thread to perform the above.

mod process;
pub use process::DumpProcess;

use super::frame::RawChunk;
use crate::config::Config;
use std::io;
use std::thread;
use std::time::Duration;

/// Possible errors when opening a frame source.
#[derive(Debug)]
pub enum SourceError {
    /// The dump utility could not be started. Fatal: without it there
    /// is no frame stream to attach to.
    Unavailable(io::Error),
    /// The spawned process exposed no stdout pipe.
    MissingStdout,
}

/// Possible errors when receiving from a `Source`.
#[derive(Debug)]
pub enum RecvError {
    /// No chunks available at this time.
    NotReady,
    /// A read on the established stream failed; the reader thread will
    /// retry. Last-known state remains valid.
    ReadFailed(io::Error),
    /// The source is gone (stream ended, retries exhausted, or the
    /// reader thread terminated).
    Disconnected,
}

/// Generic interface for the low level part of a frame source.
///
/// `read_chunk` blocks until some bytes are available and returns how
/// many were written into `buf`. `Ok(0)` signals end of stream.
pub trait RawSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Size of the chunk channel between the reader thread and the consumer.
static DEFAULT_RX_CHANNEL_SIZE: usize = 64;

/// Opaque frame source, encapsulating I/O with an underlying `RawSource`
/// behind a reader thread and a channel.
pub struct Source {
    rx: crossbeam::channel::Receiver<Result<RawChunk, RecvError>>,
    /// Keeps the dump process alive for as long as the source exists;
    /// dropping it terminates the child and unblocks the reader thread.
    _guard: Option<DumpProcess>,
}

impl Source {
    /// Opens the dump utility configured in `config` and starts reading
    /// from it.
    pub fn open(config: &Config) -> Result<Source, SourceError> {
        let (guard, stdout) = DumpProcess::spawn(&config.dump_command, &config.source_interface)?;
        let mut source = Source::from_raw(
            stdout,
            config.chunk_size,
            config.read_retries,
            config.retry_backoff,
        );
        source._guard = Some(guard);
        Ok(source)
    }

    /// Creates a `Source` from any `RawSource`. Chunks of up to
    /// `chunk_size` bytes are read on a dedicated thread; transient read
    /// errors are retried up to `retries` times with a backoff scaled by
    /// the consecutive failure count.
    pub fn from_raw<R: RawSource + Send + 'static>(
        raw: R,
        chunk_size: usize,
        retries: u32,
        backoff: Duration,
    ) -> Source {
        let (tx, rx) = crossbeam::channel::bounded(DEFAULT_RX_CHANNEL_SIZE);
        thread::spawn(move || {
            Source::reader_thread(raw, tx, chunk_size, retries, backoff);
        });
        Source { rx, _guard: None }
    }

    /// Method running the `Source` reader thread. Blocks on the raw
    /// source and forwards results; when the channel is full the chunk
    /// is dropped, keeping the most recently delivered data close to
    /// live.
    fn reader_thread<R: RawSource>(
        mut raw: R,
        tx: crossbeam::channel::Sender<Result<RawChunk, RecvError>>,
        chunk_size: usize,
        retries: u32,
        backoff: Duration,
    ) {
        use crossbeam::channel::TrySendError;
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut failures = 0u32;
        loop {
            match raw.read_chunk(&mut buf) {
                Ok(0) => {
                    let _ = tx.send(Err(RecvError::Disconnected));
                    return;
                }
                Ok(n) => {
                    failures = 0;
                    let chunk = RawChunk::new(buf[..n].to_vec());
                    match tx.try_send(Ok(chunk)) {
                        Ok(()) | Err(TrySendError::Full(_)) => {}
                        Err(TrySendError::Disconnected(_)) => return,
                    }
                }
                Err(e) => {
                    failures += 1;
                    if failures > retries {
                        let _ = tx.send(Err(RecvError::Disconnected));
                        return;
                    }
                    let _ = tx.try_send(Err(RecvError::ReadFailed(e)));
                    thread::sleep(backoff * failures);
                }
            }
        }
    }

    /// Returns the next queued chunk without blocking.
    pub fn try_recv(&self) -> Result<RawChunk, RecvError> {
        use crossbeam::channel::TryRecvError;
        match self.rx.try_recv() {
            Ok(res) => res,
            Err(TryRecvError::Empty) => Err(RecvError::NotReady),
            Err(TryRecvError::Disconnected) => Err(RecvError::Disconnected),
        }
    }

    /// Blocks up to `timeout` for the next chunk.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<RawChunk, RecvError> {
        use crossbeam::channel::RecvTimeoutError;
        match self.rx.recv_timeout(timeout) {
            Ok(res) => res,
            Err(RecvTimeoutError::Timeout) => Err(RecvError::NotReady),
            Err(RecvTimeoutError::Disconnected) => Err(RecvError::Disconnected),
        }
    }
}
