use log::{debug, info};

use crate::app::App;
use crate::multicore::Core1;
use crate::screen::Screen;

pub struct Console {
    pub screen: Screen,
}

impl Console {
    /// Allocate the screen. The platform must be installed first.
    pub fn init(w: i32, h: i32) -> Console {
        info!("console init, {}x{}", w, h);
        Console {
            screen: Screen::new(w, h),
        }
    }

    /// The core 1 launch right, if nobody has used it yet.
    pub fn core1(&mut self) -> Option<Core1> {
        Core1::take()
    }

    /// One frame: update, draw into the target, wait for vsync, flip.
    pub fn frame<A: App + ?Sized>(&mut self, app: &mut A, tick: u32) {
        app.update(tick);
        {
            let mut canvas = self.screen.canvas();
            app.draw(tick, &mut canvas);
        }
        self.screen.wait_vsync();
        self.screen.flip();
    }

    /// Call `app.init` and then run `frames` frames, or forever with `None`.
    pub fn run<A: App + ?Sized>(&mut self, app: &mut A, frames: Option<u32>) {
        app.init(self);
        debug!("running {:?} frames", frames);

        let mut tick: u32 = 0;
        let mut remaining = frames;
        loop {
            match remaining {
                Some(0) => break,
                Some(ref mut n) => *n -= 1,
                None => {}
            }
            self.frame(app, tick);
            tick = tick.wrapping_add(1);
        }
    }
}
