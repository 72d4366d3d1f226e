//! Node presence tracking.
//!
//! Presence is recomputed in full from the text of the chunk being
//! ingested, not from the history ring: a node is online exactly when
//! its identifier pattern occurs in the most recent traffic. This favors
//! freshness over smoothing and makes the display jumpy on a quiet bus;
//! deriving presence from the ring instead would smooth it at the cost
//! of staleness.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

impl Display for Presence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Presence::Online => write!(f, "ONLINE"),
            Presence::Offline => write!(f, "OFFLINE"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeStatus {
    /// Identifier pattern this node is matched by (e.g. "201").
    pub id: String,
    pub presence: Presence,
}

/// Tracks the online/offline status of the monitored nodes.
pub struct NodeTracker {
    nodes: Vec<NodeStatus>,
}

impl NodeTracker {
    /// All nodes start out offline until traffic shows up.
    pub fn new(ids: &[String]) -> NodeTracker {
        NodeTracker {
            nodes: ids
                .iter()
                .map(|id| NodeStatus {
                    id: id.clone(),
                    presence: Presence::Offline,
                })
                .collect(),
        }
    }

    /// Recomputes every node's presence from `text`. The whole set is
    /// rebuilt and swapped in at once; observers never see a partial
    /// update.
    pub fn rescan(&mut self, text: &str) {
        let fresh = self
            .nodes
            .iter()
            .map(|node| NodeStatus {
                id: node.id.clone(),
                presence: if text.contains(&node.id) {
                    Presence::Online
                } else {
                    Presence::Offline
                },
            })
            .collect();
        self.nodes = fresh;
    }

    pub fn statuses(&self) -> &[NodeStatus] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_ids() -> Vec<String> {
        vec!["201".into(), "202".into(), "203".into(), "204".into()]
    }

    #[test]
    fn matching_pattern_marks_node_online() {
        let mut tracker = NodeTracker::new(&default_ids());
        tracker.rescan("can0  203   [8]  00 11 22 33 44 55 66 77");
        let statuses = tracker.statuses();
        assert_eq!(statuses[2].presence, Presence::Online);
        assert_eq!(statuses[0].presence, Presence::Offline);
        assert_eq!(statuses[1].presence, Presence::Offline);
        assert_eq!(statuses[3].presence, Presence::Offline);
    }

    #[test]
    fn no_patterns_means_all_offline() {
        let mut tracker = NodeTracker::new(&default_ids());
        tracker.rescan("can0  203   [8]  00");
        tracker.rescan("can0  1f5   [4]  de ad be ef");
        assert!(tracker
            .statuses()
            .iter()
            .all(|n| n.presence == Presence::Offline));
    }
}
