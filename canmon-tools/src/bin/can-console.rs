//! can-console
//!
//! Interactive bus console: per-node online/offline table, a scrolling
//! log of recent frames, and a ramped speed bar whose value is encoded
//! and transmitted on every tick.
//!
//! Quit: q / Esc / Ctrl-C. PgUp/PgDown move the speed target in 5%
//! steps, Tab switches the focused pane.

use canmon::bus::sink::SendProcess;
use canmon::bus::source::Source;
use canmon::monitor::Presence;
use canmon::motor::{Dispatcher, SpeedFrame};
use canmon::Monitor;
use canmon_tools::{bus_opts, bus_parseopts};

use std::env;
use std::io::{self, Write};

use futures::{future::FutureExt, select, StreamExt};
use futures_timer::Delay;

use chrono::Local;
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyModifiers},
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
    ExecutableCommand, QueueableCommand,
};

/// Target ratio change per PgUp/PgDown press.
const RATIO_STEP: f64 = 0.05;
/// Fraction of the remaining distance to the target covered per tick.
const RAMP_FACTOR: f64 = 0.2;
/// The speed bar never grows wider than this, regardless of terminal size.
const MAX_BAR_WIDTH: usize = 80;

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

#[derive(PartialEq, Clone, Copy)]
enum Pane {
    Motor,
    Bus,
}

struct Console {
    monitor: Monitor,
    dispatcher: Dispatcher<SendProcess>,
    header: String,
    target: f64,
    shown: f64,
    width: usize,
    focus: Pane,
    spin: usize,
    last_frame: Option<SpeedFrame>,
    last_warning: Option<String>,
}

impl Console {
    fn on_tick(&mut self) {
        self.monitor.poll();
        self.spin = (self.spin + 1) % SPINNER.len();

        self.shown += (self.target - self.shown) * RAMP_FACTOR;
        if (self.target - self.shown).abs() < 0.001 {
            self.shown = self.target;
        }

        let outcome = self.dispatcher.tick(self.shown);
        if let Some(err) = outcome.error {
            self.last_warning = Some(format!(
                "[{}] transmit failed: {:?}",
                Local::now().format("%H:%M:%S%.3f"),
                err
            ));
        }
        self.last_frame = Some(outcome.frame);

        if let Some(err) = self.monitor.last_error() {
            self.last_warning = Some(format!(
                "[{}] bus read: {:?}",
                Local::now().format("%H:%M:%S%.3f"),
                err
            ));
            self.monitor.clear_error();
        }
    }
}

fn pane_title(out: &mut io::Stdout, title: &str, focused: bool) -> io::Result<()> {
    out.queue(SetAttribute(Attribute::Bold))?;
    if focused {
        out.queue(SetAttribute(Attribute::Reverse))?;
    }
    out.queue(crossterm::style::Print(format!(" {} ", title)))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(cursor::MoveToNextLine(2))?;
    Ok(())
}

fn draw(out: &mut io::Stdout, console: &Console) -> io::Result<()> {
    use crossterm::style::Print;

    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(Clear(ClearType::All))?;

    out.queue(SetAttribute(Attribute::Bold))?;
    out.queue(Print(&console.header))?;
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(cursor::MoveToNextLine(2))?;

    // Speed pane: target, ramped value, bar, payload preview.
    pane_title(out, "Speed control", console.focus == Pane::Motor)?;
    let speed = console.last_frame.map(|f| f.speed).unwrap_or(0);
    out.queue(Print(format!(
        "target {:>3.0}%   current {:>3.0}%   set speed : {}",
        console.target * 100.0,
        console.shown * 100.0,
        speed
    )))?;
    out.queue(cursor::MoveToNextLine(1))?;

    let bar_width = console.width.saturating_sub(4).min(MAX_BAR_WIDTH).max(10);
    let filled = ((bar_width as f64) * console.shown).round() as usize;
    let filled = filled.min(bar_width);
    out.queue(Print(format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(bar_width - filled)
    )))?;
    out.queue(cursor::MoveToNextLine(1))?;
    if let Some(frame) = &console.last_frame {
        out.queue(Print(format!("payload : {}", frame)))?;
    }
    out.queue(cursor::MoveToNextLine(2))?;

    // Motor status pane.
    pane_title(out, "Motor status", console.focus == Pane::Motor)?;
    for (i, node) in console.monitor.nodes().iter().enumerate() {
        out.queue(Print(format!("Motor {} (id {}) : ", i, node.id)))?;
        match node.presence {
            Presence::Online => {
                out.queue(SetForegroundColor(Color::Green))?;
                out.queue(Print(" ONLINE"))?;
            }
            Presence::Offline => {
                out.queue(SetForegroundColor(Color::Red))?;
                out.queue(Print("OFFLINE"))?;
            }
        }
        out.queue(ResetColor)?;
        out.queue(cursor::MoveToNextLine(1))?;
    }
    out.queue(cursor::MoveToNextLine(1))?;

    // Bus traffic pane.
    pane_title(
        out,
        &format!("Bus traffic {}", SPINNER[console.spin]),
        console.focus == Pane::Bus,
    )?;
    let history = console.monitor.history();
    if history.is_empty() {
        out.queue(SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("(no frames yet)"))?;
        out.queue(ResetColor)?;
        out.queue(cursor::MoveToNextLine(1))?;
    }
    for record in &history {
        out.queue(Print(record.text.trim_end()))?;
        out.queue(cursor::MoveToNextLine(1))?;
    }
    out.queue(cursor::MoveToNextLine(1))?;

    if let Some(warning) = &console.last_warning {
        out.queue(SetForegroundColor(Color::Yellow))?;
        out.queue(Print(warning))?;
        out.queue(ResetColor)?;
        out.queue(cursor::MoveToNextLine(1))?;
    }
    if console.monitor.disconnected() {
        out.queue(SetForegroundColor(Color::Red))?;
        out.queue(Print("bus source disconnected, showing last known state"))?;
        out.queue(ResetColor)?;
        out.queue(cursor::MoveToNextLine(1))?;
    }

    out.queue(SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(
        "tab: focus next   pgup/pgdn: speed target   q: exit",
    ))?;
    out.queue(ResetColor)?;

    out.flush()
}

async fn run_console(mut console: Console, tick: std::time::Duration) {
    let mut reader = EventStream::new();
    let mut stdout = io::stdout();

    'drawing: loop {
        let mut delay = Delay::new(tick).fuse();
        let mut event = reader.next().fuse();

        select! {
            _ = delay => {
                console.on_tick();
                if draw(&mut stdout, &console).is_err() {
                    break 'drawing;
                }
            },
            some_event = event => {
                match some_event {
                    Some(Ok(Event::Key(key))) => {
                        match key.code {
                            KeyCode::PageUp => {
                                console.target = (console.target + RATIO_STEP).clamp(0.0, 1.0);
                            }
                            KeyCode::PageDown => {
                                console.target = (console.target - RATIO_STEP).clamp(0.0, 1.0);
                            }
                            KeyCode::Tab => {
                                console.focus = match console.focus {
                                    Pane::Motor => Pane::Bus,
                                    Pane::Bus => Pane::Motor,
                                };
                            }
                            KeyCode::Char('q') | KeyCode::Esc => break 'drawing,
                            KeyCode::Char('c')
                                if key.modifiers == KeyModifiers::CONTROL =>
                            {
                                break 'drawing
                            }
                            _ => {}
                        }
                    }
                    Some(Ok(Event::Resize(w, _))) => {
                        console.width = w as usize;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) => break 'drawing,
                    None => break 'drawing,
                }
            }
        }
    }
}

struct Tui;

impl Tui {
    fn setup() -> io::Result<Tui> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        stdout.execute(terminal::EnterAlternateScreen)?;
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(cursor::Hide)?;
        Ok(Tui)
    }

    fn teardown(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(cursor::Show);
        let _ = stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let opts = bus_opts();
    let (_matches, config) = bus_parseopts(&opts, &args);

    // The frame source must attach before any terminal state changes,
    // so a missing dump utility fails with a plain message.
    let source = match Source::open(&config) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Failed to open frame source: {:?}", e);
            std::process::exit(1);
        }
    };

    let sink = SendProcess::new(&config.send_command, &config.sink_interface);
    let console = Console {
        monitor: Monitor::new(source, &config),
        dispatcher: Dispatcher::new(sink, &config),
        header: format!(
            "can-console — rx {}  tx {}  max_speed 0x{:04x}  mask 0b{:04b}",
            config.source_interface, config.sink_interface, config.max_speed, config.channel_mask
        ),
        target: 0.0,
        shown: 0.0,
        width: terminal::size().map(|(w, _)| w as usize).unwrap_or(80),
        focus: Pane::Motor,
        spin: 0,
        last_frame: None,
        last_warning: None,
    };

    let mut tui = Tui::setup()?;
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        Tui.teardown();
        original_hook(panic_info);
    }));

    async_std::task::block_on(run_console(console, config.tick_interval));

    tui.teardown();
    Ok(())
}
