//! # Platform
//!
//! Everything that needs the real device goes through one installed [`Platform`]:
//! the vsync signal, handing a finished frame to the display, the button register,
//! the microsecond timer, and the second core.
//!
//! Install it once at boot, before [`Console::init`](crate::console::Console::init):
//!
//! ```ignore
//! static BOARD: MyBoard = MyBoard::new();
//! picoframe::platform::install(&BOARD);
//! ```

use alloc::boxed::Box;

use log::{info, warn};
use spin::Once;

use crate::input::ButtonState;
use crate::multicore::Never;
use crate::screen::BufferRef;

pub trait Platform: Sync {
    /// Block the calling core until the next vertical refresh.
    fn wait_vsync(&self);

    /// Hand a finished frame to the display.
    fn present(&self, frame: BufferRef<'_>);

    /// Live state of every button, read at call time.
    fn buttons(&self) -> ButtonState;

    /// Microseconds since boot. Never decreases.
    fn now_us(&self) -> u64;

    /// Number of the core the caller runs on: 0 for the primary, 1 for the second.
    fn core_num(&self) -> u8;

    /// Start core 1 running `entry`. Called at most once per boot.
    fn launch_core1(&self, entry: Box<dyn FnOnce() -> Never + Send + 'static>);
}

static PLATFORM: Once<&'static dyn Platform> = Once::new();

/// Install the process-wide platform.
///
/// Only the first call has an effect; returns whether this call installed `platform`.
pub fn install(platform: &'static dyn Platform) -> bool {
    let mut installed = false;
    PLATFORM.call_once(|| {
        installed = true;
        platform
    });
    if installed {
        info!("platform installed");
    } else {
        warn!("platform already installed; ignoring");
    }
    installed
}

/// The installed platform.
///
/// # Panics
///
/// If nothing has been installed yet. There is no device to talk to at that point.
#[inline]
pub fn get() -> &'static dyn Platform {
    match PLATFORM.get() {
        Some(platform) => *platform,
        None => panic!("picoframe: no platform installed"),
    }
}

#[inline]
pub fn try_get() -> Option<&'static dyn Platform> {
    PLATFORM.get().copied()
}
