mod history;
mod monitor;
mod presence;
pub mod report;

pub use history::HistoryRing;
pub use monitor::Monitor;
pub use presence::{NodeStatus, NodeTracker, Presence};
