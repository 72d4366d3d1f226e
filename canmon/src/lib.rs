pub mod bus;
pub mod config;
pub mod monitor;
pub mod motor;

pub use config::Config;
pub use monitor::Monitor;
