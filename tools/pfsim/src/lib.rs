//! # pfsim
//!
//! A [`picoframe::Platform`] that runs on a desktop OS.
//!
//! - vsync is a fixed-rate ticker, or nothing at all in [`Vsync::Immediate`] mode
//! - presented frames are copied into memory, see [`SimPlatform::presented`]
//! - the button register is an atomic the host sets with [`SimPlatform::press`]
//! - core 1 is an OS thread named `core1`; a panic there is kept for the host to
//!   pick up with [`SimPlatform::core1_fault`]
//! - the thread that installs the simulator is core 0, every other host thread gets
//!   a core number of its own (2 and up)
//!
//! ```ignore
//! let sim = pfsim::SimPlatform::install(SimConfig::default());
//! let mut console = Console::init(240, 240);
//! console.run(&mut app, Some(600));
//! sim.presented();
//! ```

mod config;
mod display;

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crossbeam_channel::Receiver;
use log::{debug, error, info, trace, warn};
use once_cell::sync::OnceCell;
use picoframe::{BufferRef, Button, ButtonState, Never, Platform};

pub use config::{SimConfig, Vsync};
pub use display::Presented;

const CORE0: u8 = 0;
const CORE1: u8 = 1;

static NEXT_HOST_CORE: AtomicU8 = AtomicU8::new(2);

thread_local! {
    static CORE_NUM: Cell<Option<u8>> = const { Cell::new(None) };
}

/// Core number of the calling thread, handing out a fresh one on first use.
///
/// Numbers repeat after 254 host threads.
fn current_core() -> u8 {
    CORE_NUM.with(|n| match n.get() {
        Some(id) => id,
        None => {
            let id = loop {
                let id = NEXT_HOST_CORE.fetch_add(1, Ordering::Relaxed);
                if id > CORE1 {
                    break id;
                }
            };
            n.set(Some(id));
            id
        }
    })
}

/// Text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        String::from(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}

static SIM: OnceCell<SimPlatform> = OnceCell::new();

pub struct SimPlatform {
    config: SimConfig,
    boot: Instant,
    vsync: Option<Receiver<Instant>>,
    buttons: AtomicU32,
    front: Mutex<Presented>,
    presented: AtomicU64,
    vsyncs: AtomicU64,
    core1_launched: AtomicBool,
    core1_fault: Arc<Mutex<Option<String>>>,
}

impl SimPlatform {
    fn new(config: SimConfig) -> Self {
        let vsync = config.vsync.period().map(crossbeam_channel::tick);
        match config.vsync.period() {
            Some(period) => info!("sim vsync every {:?}", period),
            None => info!("sim vsync disabled, frames run unthrottled"),
        }
        SimPlatform {
            config,
            boot: Instant::now(),
            vsync,
            buttons: AtomicU32::new(0),
            front: Mutex::new(Presented::default()),
            presented: AtomicU64::new(0),
            vsyncs: AtomicU64::new(0),
            core1_launched: AtomicBool::new(false),
            core1_fault: Arc::new(Mutex::new(None)),
        }
    }

    /// Build the process-wide simulator and install it as the platform.
    ///
    /// Only the first call's `config` is used; later calls return the same instance.
    pub fn install(config: SimConfig) -> &'static SimPlatform {
        let sim = SIM.get_or_init(|| {
            CORE_NUM.with(|n| n.set(Some(CORE0)));
            SimPlatform::new(config)
        });
        if sim.config != config {
            warn!("simulator already running with {:?}; ignoring {:?}", sim.config, config);
        }
        if !picoframe::platform::install(sim) && !sim.is_installed() {
            error!("a different platform is installed; the simulator will not see any calls");
        }
        sim
    }

    /// The simulator, if [`install`](Self::install) has run.
    pub fn get() -> Option<&'static SimPlatform> {
        SIM.get()
    }

    fn is_installed(&self) -> bool {
        picoframe::platform::try_get().is_some_and(|p| {
            std::ptr::addr_eq(p as *const dyn Platform, self as *const SimPlatform)
        })
    }

    pub fn config(&self) -> SimConfig {
        self.config
    }

    pub fn press(&self, button: Button) {
        self.buttons.fetch_or(button.mask().bits(), Ordering::Relaxed);
    }

    pub fn release(&self, button: Button) {
        self.buttons.fetch_and(!button.mask().bits(), Ordering::Relaxed);
    }

    pub fn set_buttons(&self, state: ButtonState) {
        self.buttons.store(state.bits(), Ordering::Relaxed);
    }

    /// Snapshot of the frame on the display.
    pub fn presented(&self) -> Presented {
        self.front().clone()
    }

    /// Frames handed to the display so far.
    pub fn frames_presented(&self) -> u64 {
        self.presented.load(Ordering::Relaxed)
    }

    pub fn vsync_count(&self) -> u64 {
        self.vsyncs.load(Ordering::Relaxed)
    }

    /// The panic message core 1 died with, if it did.
    pub fn core1_fault(&self) -> Option<String> {
        lock(&self.core1_fault).clone()
    }

    fn front(&self) -> MutexGuard<'_, Presented> {
        lock(&self.front)
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Platform for SimPlatform {
    fn wait_vsync(&self) {
        if let Some(ticks) = &self.vsync {
            // a tick that fired while we were drawing is already stale
            while ticks.try_recv().is_ok() {}
            if ticks.recv().is_err() {
                warn!("vsync ticker stopped");
            }
        }
        self.vsyncs.fetch_add(1, Ordering::Relaxed);
    }

    fn present(&self, frame: BufferRef<'_>) {
        let n = self.presented.fetch_add(1, Ordering::Relaxed) + 1;
        self.front().capture(frame, n);
        trace!("presented frame {} ({}x{})", n, frame.w, frame.h);
    }

    fn buttons(&self) -> ButtonState {
        ButtonState::from_bits_truncate(self.buttons.load(Ordering::Relaxed))
    }

    fn now_us(&self) -> u64 {
        self.boot.elapsed().as_micros() as u64
    }

    fn core_num(&self) -> u8 {
        current_core()
    }

    fn launch_core1(&self, entry: Box<dyn FnOnce() -> Never + Send + 'static>) {
        if self.core1_launched.swap(true, Ordering::AcqRel) {
            error!("core 1 is already running");
            return;
        }

        let max_priority = self.config.core1_max_priority;
        let fault = Arc::clone(&self.core1_fault);
        let spawned = std::thread::Builder::new()
            .name("core1".into())
            .spawn(move || {
                CORE_NUM.with(|n| n.set(Some(CORE1)));
                if max_priority {
                    raise_priority();
                }
                debug!("core 1 entered");
                match panic::catch_unwind(AssertUnwindSafe(entry)) {
                    Ok(never) => match never {},
                    Err(payload) => {
                        let msg = panic_message(&*payload);
                        error!("core 1 panicked: {}", msg);
                        *lock(&fault) = Some(msg);
                    }
                }
            });
        if let Err(e) = spawned {
            error!("could not start core 1: {}", e);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn raise_priority() {
    use thread_priority::*;
    // if it didn't work, oh well
    if set_current_thread_priority(ThreadPriority::Max).is_err() {
        debug!("core 1 stays at normal priority");
    }
}

#[cfg(target_arch = "wasm32")]
fn raise_priority() {}
