//! can-speed
//!
//! One-shot speed transmit: encodes a target ratio and sends the
//! resulting frame once. Channels outside the mask are sent as zero
//! since there is no prior cycle to accumulate from.

use canmon::bus::sink::{FrameSink, SendProcess};
use canmon::motor::SpeedEncoder;
use canmon_tools::{bus_opts, bus_parseopts};

use std::env;
use std::process::ExitCode;

fn usage(opts: &getopts::Options, program: &str) -> ! {
    let brief = format!(
        "Usage: {} [options] <ratio>\n\nTransmits one speed command; <ratio> is 0.0 to 1.0.",
        program
    );
    eprintln!("{}", opts.usage(&brief));
    std::process::exit(2)
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut opts = bus_opts();
    opts.optopt("m", "", "channel mask override (e.g. 0b0101 as 5)", "mask");
    opts.optflag("n", "", "dry run: print the command without sending");
    let (matches, config) = bus_parseopts(&opts, &args);

    let ratio: f64 = match matches.free.first().map(|s| s.parse()) {
        Some(Ok(r)) => r,
        _ => usage(&opts, &args[0]),
    };
    let mask = match matches.opt_str("m") {
        Some(m) => match m.parse::<u8>() {
            Ok(mask) => mask,
            Err(_) => usage(&opts, &args[0]),
        },
        None => config.channel_mask,
    };

    let mut encoder = SpeedEncoder::new(config.max_speed);
    let frame = encoder.encode(ratio, mask);
    let command = format!("{:03X}#{}", config.frame_id, frame.hex());

    if matches.opt_present("n") {
        println!("{} {} (speed {})", config.sink_interface, command, frame.speed);
        return ExitCode::SUCCESS;
    }

    let mut sink = SendProcess::new(&config.send_command, &config.sink_interface);
    match sink.send_frame(config.frame_id, &frame.hex()) {
        Ok(()) => {
            println!("sent {} {} (speed {})", config.sink_interface, command, frame.speed);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("transmit failed: {:?}", e);
            ExitCode::FAILURE
        }
    }
}
