//! Last-resort output when something goes wrong: the message goes to the display,
//! then the core stops.

use core::hint::spin_loop;
use core::sync::atomic::{compiler_fence, Ordering};

use log::error;

use crate::color::Color;
use crate::screen::Screen;

pub const FAULT_BACKGROUND: Color = Color::rgb(219, 58, 4);

const MARGIN: i32 = 3;

/// Paint `msg` in white on orange and present it.
pub fn show_fault(screen: &mut Screen, msg: &str) {
    error!("fault: {}", msg);
    let mut canvas = screen.canvas();
    canvas.blend_copy();
    canvas.pen(FAULT_BACKGROUND);
    canvas.clear();
    canvas.pen(Color::WHITE);
    let wrap = canvas.width() - 2 * MARGIN;
    canvas.text_wrapped(msg, MARGIN, MARGIN, wrap);

    screen.wait_vsync();
    screen.flip();
}

/// Park the calling core for good.
pub fn halt() -> ! {
    loop {
        compiler_fence(Ordering::SeqCst);
        spin_loop();
    }
}
