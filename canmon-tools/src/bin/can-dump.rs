//! can-dump
//!
//! Streams parsed frame records from the bus to stdout with timestamps.
//! Useful for checking what the console would ingest without bringing
//! up the full TUI.

use canmon::bus::frame;
use canmon::bus::source::{RecvError, Source};
use canmon_tools::{bus_opts, bus_parseopts};

use std::env;
use std::process::ExitCode;
use std::time::Duration;

macro_rules! log{
    ($tf:expr, $msg:expr)=>{
    {
        println!("{}{}", chrono::Local::now().format(&$tf), $msg);
    }
    };
    ($tf:expr, $f:expr,$($a:tt)*)=>{
    {
        log!($tf, format!($f, $($a)*));
    }
    };
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut opts = bus_opts();
    opts.optopt("t", "", "Timestamp format (default '%T%.3f ')", "fmt");
    opts.optflag("r", "", "Print raw chunks instead of parsed records");
    let (matches, config) = bus_parseopts(&opts, &args);

    let tf = if let Some(fmt) = matches.opt_str("t") {
        fmt
    } else {
        "%T%.3f ".to_string()
    };
    let raw = matches.opt_present("r");

    let source = match Source::open(&config) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to open frame source: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    loop {
        match source.recv_timeout(Duration::from_secs(1)) {
            Ok(chunk) => {
                if raw {
                    log!(tf, "{}", chunk.text().trim_end());
                } else {
                    for record in
                        frame::scan_chunk(&chunk, config.frame_marker, config.frame_window)
                    {
                        match record.id {
                            Some(id) => log!(tf, "{:03X}  {}", id, record.text.trim()),
                            None => log!(tf, "???  {}", record.text.trim()),
                        }
                    }
                }
            }
            Err(RecvError::NotReady) => {}
            Err(RecvError::ReadFailed(e)) => {
                log!(tf, "read failed: {:?}", e);
            }
            Err(RecvError::Disconnected) => {
                log!(tf, "source disconnected");
                return ExitCode::FAILURE;
            }
        }
    }
}
