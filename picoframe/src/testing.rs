//! Headless platform for unit tests: vsync never blocks, frames go nowhere,
//! every test thread counts as its own core.

use std::boxed::Box;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use crate::input::ButtonState;
use crate::multicore::Never;
use crate::platform::{self, Platform};
use crate::screen::BufferRef;

struct Headless {
    boot: Instant,
}

static NEXT_CORE: AtomicU8 = AtomicU8::new(0);

std::thread_local! {
    static CORE: u8 = NEXT_CORE.fetch_add(1, Ordering::Relaxed);
}

impl Platform for Headless {
    fn wait_vsync(&self) {}

    fn present(&self, _frame: BufferRef<'_>) {}

    fn buttons(&self) -> ButtonState {
        ButtonState::empty()
    }

    fn now_us(&self) -> u64 {
        self.boot.elapsed().as_micros() as u64
    }

    fn core_num(&self) -> u8 {
        CORE.with(|c| *c)
    }

    fn launch_core1(&self, entry: Box<dyn FnOnce() -> Never + Send + 'static>) {
        std::thread::spawn(move || match entry() {});
    }
}

pub(crate) fn headless() {
    static PLATFORM: std::sync::OnceLock<Headless> = std::sync::OnceLock::new();
    let p = PLATFORM.get_or_init(|| Headless {
        boot: Instant::now(),
    });
    platform::install(p);
}
