use canmon::Config;
use getopts::Options;
use serde::Deserialize;
use std::time::Duration;

/// Common options shared by the tools: a settings file plus quick
/// overrides for the bus interfaces.
pub fn bus_opts() -> Options {
    let mut opts = Options::new();
    opts.optopt("c", "config", "YAML settings file", "path");
    opts.optopt("i", "", "bus interface to read (default can0)", "iface");
    opts.optopt(
        "o",
        "",
        "bus interface to write (default: same as -i)",
        "iface",
    );
    opts
}

pub fn bus_parseopts(opts: &Options, args: &[String]) -> (getopts::Matches, Config) {
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(f) => {
            panic!("{}", f.to_string())
        }
    };
    let mut config = if let Some(path) = matches.opt_str("c") {
        match Settings::load(&path) {
            Ok(settings) => settings.into_config(),
            Err(e) => {
                eprintln!("Failed to load settings from {}: {:?}", path, e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };
    if let Some(iface) = matches.opt_str("i") {
        config.source_interface = iface.clone();
        config.sink_interface = iface;
    }
    if let Some(iface) = matches.opt_str("o") {
        config.sink_interface = iface;
    }
    (matches, config)
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
}

/// Settings file contents. Every field is optional; missing ones fall
/// back to the built-in defaults, so a file only needs the knobs a
/// deployment actually changes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dump_command: String,
    pub send_command: String,
    pub interface: String,
    pub tx_interface: Option<String>,
    pub node_ids: Vec<String>,
    pub ring_capacity: usize,
    pub max_speed: u16,
    pub channel_mask: u8,
    pub frame_id: u32,
    pub tick_ms: u64,
    pub frame_window: usize,
    pub chunk_size: usize,
    pub frame_marker: char,
    pub read_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Settings {
        let config = Config::default();
        Settings {
            dump_command: config.dump_command,
            send_command: config.send_command,
            interface: config.source_interface,
            tx_interface: None,
            node_ids: config.monitored_ids,
            ring_capacity: config.ring_capacity,
            max_speed: config.max_speed,
            channel_mask: config.channel_mask,
            frame_id: config.frame_id,
            tick_ms: config.tick_interval.as_millis() as u64,
            frame_window: config.frame_window,
            chunk_size: config.chunk_size,
            frame_marker: config.frame_marker as char,
            read_retries: config.read_retries,
            retry_backoff_ms: config.retry_backoff.as_millis() as u64,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> Result<Settings, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        serde_yaml::from_str(&text).map_err(SettingsError::Parse)
    }

    pub fn into_config(self) -> Config {
        let sink_interface = self
            .tx_interface
            .unwrap_or_else(|| self.interface.clone());
        Config {
            dump_command: self.dump_command,
            send_command: self.send_command,
            source_interface: self.interface,
            sink_interface,
            monitored_ids: self.node_ids,
            ring_capacity: self.ring_capacity,
            max_speed: self.max_speed,
            channel_mask: self.channel_mask,
            frame_id: self.frame_id,
            tick_interval: Duration::from_millis(self.tick_ms),
            frame_window: self.frame_window,
            chunk_size: self.chunk_size,
            frame_marker: self.frame_marker as u8,
            read_retries: self.read_retries,
            retry_backoff: Duration::from_millis(self.retry_backoff_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fall_back_to_defaults() {
        let settings: Settings =
            serde_yaml::from_str("interface: can1\nmax_speed: 2815\n").unwrap();
        let config = settings.into_config();
        assert_eq!(config.source_interface, "can1");
        assert_eq!(config.sink_interface, "can1");
        assert_eq!(config.max_speed, 0x0aff);
        assert_eq!(config.ring_capacity, 5);
        assert_eq!(config.monitored_ids.len(), 4);
    }
}
