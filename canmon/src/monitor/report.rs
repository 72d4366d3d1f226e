//! Status report formatting.
//!
//! Pure text assembly: given the node statuses and a history snapshot,
//! produce the block the console (or any other consumer) displays.
//! Deterministic, no side effects.

use crate::bus::frame::FrameRecord;
use crate::monitor::presence::NodeStatus;

/// Formats each monitored node with its presence label, followed by the
/// retained frame lines in insertion order.
pub fn status_text(nodes: &[NodeStatus], history: &[FrameRecord]) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&format!("Node {} : {}\n", node.id, node.presence));
    }
    out.push('\n');
    for record in history {
        out.push_str(record.text.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::presence::{NodeTracker, Presence};

    #[test]
    fn report_lists_nodes_then_frames() {
        let mut tracker = NodeTracker::new(&["201".to_string(), "202".to_string()]);
        tracker.rescan("can0  202   [8]  01 02");
        let history = vec![FrameRecord {
            text: "can0  202   [8]  01 02 03 04 05 06 07 08  ".to_string(),
            id: Some(0x202),
        }];
        let text = status_text(tracker.statuses(), &history);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], format!("Node 201 : {}", Presence::Offline));
        assert_eq!(lines[1], format!("Node 202 : {}", Presence::Online));
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "can0  202   [8]  01 02 03 04 05 06 07 08");
    }
}
