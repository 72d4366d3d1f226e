//! Frame records.
//!
//! The dump utility emits one text line per received frame. Reads off its
//! stdout hand back arbitrary byte chunks, so records are recovered by
//! scanning each chunk for the marker byte that starts a line (the first
//! byte of the interface token) and taking a fixed window from there.
//! A marker closer than one window to the end of the chunk yields nothing:
//! partial records are discarded rather than buffered across reads, which
//! can drop a frame that straddles a chunk boundary.

use std::borrow::Cow;

/// One chunk of raw bytes from a single read of the frame source.
#[derive(Debug, Clone)]
pub struct RawChunk {
    data: Vec<u8>,
}

impl RawChunk {
    pub fn new(data: Vec<u8>) -> RawChunk {
        RawChunk { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lossy text rendering of the chunk, used for presence matching
    /// and record extraction.
    pub fn text(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// A single frame line extracted from a chunk. `id` holds the CAN
/// identifier when the line matched the dump grammar, `None` when it
/// did not (the raw text is kept either way for display).
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    pub text: String,
    pub id: Option<u32>,
}

impl FrameRecord {
    pub fn from_window(window: &[u8]) -> FrameRecord {
        let text = String::from_utf8_lossy(window).to_string();
        let id = parse_frame_id(&text);
        FrameRecord { text, id }
    }
}

/// Extracts every frame record from `chunk`: each occurrence of `marker`
/// with more than `window` bytes remaining yields one record. Zero
/// matches is a valid outcome, not an error.
pub fn scan_chunk(chunk: &RawChunk, marker: u8, window: usize) -> Vec<FrameRecord> {
    let data = chunk.data();
    let mut records = Vec::new();
    for i in 0..data.len() {
        if data[i] == marker && i + window < data.len() {
            records.push(FrameRecord::from_window(&data[i..i + window]));
        }
    }
    records
}

/// Parses the dump line grammar `<iface> <id> [<len>] <hex-bytes...>`
/// and returns the identifier field. Malformed lines return `None` and
/// are otherwise ignored.
fn parse_frame_id(line: &str) -> Option<u32> {
    let mut tokens = line.split_whitespace();
    let _iface = tokens.next()?;
    let id = tokens.next()?;
    if id.is_empty() || id.len() > 8 || !id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(id, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(s: &str) -> RawChunk {
        RawChunk::new(s.as_bytes().to_vec())
    }

    #[test]
    fn short_chunk_yields_no_records() {
        let c = chunk("can0  201   [8]  01 BB");
        assert!(scan_chunk(&c, b'c', 42).is_empty());
    }

    #[test]
    fn marker_near_end_is_discarded() {
        // Two markers; only the first has a full window after it.
        let line = "can0  201   [8]  01 BB 11 70 01 BB EE 90   ";
        assert_eq!(line.len(), 43);
        let mut data = line.as_bytes().to_vec();
        data.extend(b"can0  202");
        let records = scan_chunk(&RawChunk::new(data), b'c', 42);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(0x201));
    }

    #[test]
    fn grammar_extracts_identifier() {
        let line = "can1  204   [8]  00 00 00 00 00 00 00 00";
        let rec = FrameRecord::from_window(line.as_bytes());
        assert_eq!(rec.id, Some(0x204));
        assert_eq!(rec.text, line);
    }

    #[test]
    fn malformed_window_keeps_text_without_id() {
        let rec = FrameRecord::from_window(b"can0: bus-off recovery, restarting device.");
        assert_eq!(rec.id, None);
        assert!(!rec.text.is_empty());
    }
}
