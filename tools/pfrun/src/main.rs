mod demos;
mod screenshot;
mod stats;

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use picoframe::fault::show_fault;
use picoframe::{Button, Console, SCREEN_HEIGHT, SCREEN_WIDTH};
use pfsim::{panic_message, SimConfig, SimPlatform, Vsync};
use tracing::{error, info, Level};
use tracing_subscriber::util::SubscriberInitExt;

use crate::demos::Demo;
use crate::stats::Measured;

#[derive(Parser, Debug)]
#[command(name = "pfrun")]
#[command(version, about = "Run a picoframe demo on the desktop simulator", long_about = None)]
struct Args {
    /// Which demo to run
    #[arg(short, long, value_enum, default_value_t = Demo::Bars)]
    demo: Demo,

    /// Stop after this many frames (runs until killed otherwise)
    #[arg(short, long)]
    frames: Option<u32>,

    /// Display refresh rate
    #[arg(long, default_value_t = Vsync::DEFAULT_HZ)]
    refresh_hz: f64,

    /// Don't wait for vsync at all
    #[arg(long)]
    immediate: bool,

    #[arg(long, default_value_t = SCREEN_WIDTH)]
    width: i32,

    #[arg(long, default_value_t = SCREEN_HEIGHT)]
    height: i32,

    /// Buttons held down for the whole run, e.g. `--hold a,left`
    #[arg(long, value_delimiter = ',', value_parser = parse_button)]
    hold: Vec<Button>,

    /// Save the last presented frame as a PNG
    #[arg(long)]
    screenshot: Option<PathBuf>,

    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl Args {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            vsync: if self.immediate {
                Vsync::Immediate
            } else {
                Vsync::Timed { hz: self.refresh_hz }
            },
            core1_max_priority: true,
        }
    }
}

fn parse_button(name: &str) -> Result<Button, String> {
    Button::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Button::ALL.iter().map(|b| b.name()).collect();
        format!("unknown button `{}` (expected one of: {})", name, known.join(", "))
    })
}

fn setup_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .finish()
        .init();
}

/// Run `app`, catching a panic on either core. On a panic the fault screen is
/// presented and its message returned.
fn run_app(
    console: &mut Console,
    app: &mut Measured,
    frames: Option<u32>,
    sim: &SimPlatform,
) -> Option<String> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| console.run(app, frames)));
    // core 1 may have died after the last frame looked
    let fault = match outcome {
        Err(payload) => Some(panic_message(&*payload)),
        Ok(()) => sim.core1_fault().map(|msg| format!("core 1 panicked: {}", msg)),
    };
    if let Some(msg) = &fault {
        show_fault(&mut console.screen, msg);
    }
    fault
}

fn run(args: Args) -> Result<()> {
    if args.width <= 0 || args.height <= 0 {
        bail!("screen must be at least 1x1, got {}x{}", args.width, args.height);
    }
    if !args.immediate && args.sim_config().vsync.period().is_none() {
        bail!("refresh rate must be a positive number, got {}", args.refresh_hz);
    }

    let sim = SimPlatform::install(args.sim_config());
    for button in &args.hold {
        sim.press(*button);
    }

    let mut console = Console::init(args.width, args.height);
    let mut app = Measured::new(args.demo.build());
    info!("running {:?}", args.demo);

    let fault = run_app(&mut console, &mut app, args.frames, sim);
    info!("{}", app.stats);

    if let Some(path) = &args.screenshot {
        screenshot::save_png(&sim.presented(), path)?;
        info!("wrote {}", path.display());
    }

    match fault {
        Some(msg) => Err(anyhow!("application panicked: {}", msg)),
        None => Ok(()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.log_level);
    info!("stdout logger started");

    panic::set_hook(Box::new(|info| error!("{}", info)));

    run(args)
}
