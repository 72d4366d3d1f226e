//! Monitor core state.
//!
//! `Monitor` owns everything the read path derives from bus traffic: the
//! frame source, the history ring and the node tracker. All of it lives
//! in one struct owned by a single task; `poll()` drains whatever the
//! reader thread has queued since the last tick, and rendering only
//! formats already-computed state.

use crate::bus::frame::{self, FrameRecord, RawChunk};
use crate::bus::source::{RecvError, Source};
use crate::config::Config;
use crate::monitor::history::HistoryRing;
use crate::monitor::presence::{NodeStatus, NodeTracker};
use crate::monitor::report;

pub struct Monitor {
    source: Source,
    history: HistoryRing,
    tracker: NodeTracker,
    frame_marker: u8,
    frame_window: usize,
    last_error: Option<RecvError>,
    disconnected: bool,
}

impl Monitor {
    pub fn new(source: Source, config: &Config) -> Monitor {
        Monitor {
            source,
            history: HistoryRing::new(config.ring_capacity),
            tracker: NodeTracker::new(&config.monitored_ids),
            frame_marker: config.frame_marker,
            frame_window: config.frame_window,
            last_error: None,
            disconnected: false,
        }
    }

    /// Drains every chunk queued by the reader thread and ingests them
    /// in arrival order, so the presence display ends up reflecting the
    /// latest delivered chunk. On a read error the ring and presence
    /// keep their last-known state; the error is retained for display.
    /// Returns the number of chunks processed.
    pub fn poll(&mut self) -> usize {
        let mut processed = 0;
        loop {
            match self.source.try_recv() {
                Ok(chunk) => {
                    self.ingest(&chunk);
                    processed += 1;
                }
                Err(RecvError::NotReady) => break,
                Err(RecvError::Disconnected) => {
                    if !self.disconnected {
                        self.last_error = Some(RecvError::Disconnected);
                        self.disconnected = true;
                    }
                    break;
                }
                Err(e) => {
                    self.last_error = Some(e);
                }
            }
        }
        processed
    }

    /// Ingests a single chunk: scanned records go into the history ring
    /// and node presence is recomputed from the chunk text.
    pub fn ingest(&mut self, chunk: &RawChunk) {
        for record in frame::scan_chunk(chunk, self.frame_marker, self.frame_window) {
            self.history.push(record);
        }
        self.tracker.rescan(&chunk.text());
    }

    pub fn nodes(&self) -> &[NodeStatus] {
        self.tracker.statuses()
    }

    pub fn history(&self) -> Vec<FrameRecord> {
        self.history.snapshot()
    }

    /// Whether the source has gone away for good. The derived state
    /// remains readable (stale but valid).
    pub fn disconnected(&self) -> bool {
        self.disconnected
    }

    /// Most recent read problem, if any, for surfacing in the display.
    pub fn last_error(&self) -> Option<&RecvError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        if !self.disconnected {
            self.last_error = None;
        }
    }

    /// Current status block: node presence labels followed by the
    /// retained frame lines.
    pub fn status_text(&self) -> String {
        report::status_text(self.tracker.statuses(), &self.history.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::presence::Presence;

    struct EmptySource;

    impl crate::bus::source::RawSource for EmptySource {
        fn read_chunk(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Ok(0)
        }
    }

    fn test_monitor() -> Monitor {
        let config = Config::default();
        // A source whose reader sees an immediate end of stream; these
        // tests drive ingestion directly.
        let source = Source::from_raw(
            EmptySource,
            config.chunk_size,
            0,
            std::time::Duration::from_millis(1),
        );
        Monitor::new(source, &config)
    }

    fn line_chunk(id: &str) -> RawChunk {
        let line = format!("can0  {}   [8]  01 bb 11 70 01 bb ee 90   \n", id);
        RawChunk::new(line.into_bytes())
    }

    #[test]
    fn ingest_fills_ring_and_presence() {
        let mut monitor = test_monitor();
        monitor.ingest(&line_chunk("201"));
        assert_eq!(monitor.history().len(), 1);
        assert_eq!(monitor.nodes()[0].presence, Presence::Online);
        assert_eq!(monitor.nodes()[1].presence, Presence::Offline);
    }

    #[test]
    fn presence_follows_latest_chunk_only() {
        let mut monitor = test_monitor();
        monitor.ingest(&line_chunk("201"));
        monitor.ingest(&line_chunk("204"));
        // History accumulates, presence does not.
        assert_eq!(monitor.history().len(), 2);
        assert_eq!(monitor.nodes()[0].presence, Presence::Offline);
        assert_eq!(monitor.nodes()[3].presence, Presence::Online);
    }
}
