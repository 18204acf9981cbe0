//! # picoframe
//!
//! Frame buffer rendering and dual-core coordination for a small handheld with a
//! 240×240 color display, eight face buttons and two physical cores.
//!
//! The hardware itself sits behind the [`platform::Platform`] trait. Install one
//! implementation at boot, build a [`console::Console`], and drive an [`app::App`]:
//!
//! ```ignore
//! picoframe::platform::install(&MY_PLATFORM);
//! let mut console = Console::init(240, 240);
//! console.run(&mut my_game, None);
//! ```
//!
//! Drawing always goes through an explicit [`canvas::Canvas`] borrowed from the
//! [`screen::Screen`], so there is no hidden "current buffer" or "current pen".
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod app;
pub mod canvas;
pub mod clock;
pub mod color;
pub mod console;
pub mod fault;
pub mod input;
pub mod multicore;
pub mod platform;
pub mod screen;

pub use crate::app::App;
pub use crate::canvas::Canvas;
pub use crate::clock::{now_us, Instant, Timestamp};
pub use crate::color::{BlendMode, Color, PenState};
pub use crate::console::Console;
pub use crate::input::{button, Button, ButtonState};
pub use crate::multicore::{launch_core1, Core1, Mutex, MutexGuard, MutexToken, Never};
pub use crate::platform::Platform;
pub use crate::screen::{BufferRef, FrameBuffer, Screen};

/// Native display width of the device.
pub const SCREEN_WIDTH: i32 = 240;
/// Native display height of the device.
pub const SCREEN_HEIGHT: i32 = 240;

#[cfg(test)]
pub(crate) mod testing;
