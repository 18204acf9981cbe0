use std::fmt;

use picoframe::{App, Canvas, Color, Console, Instant};
use pfsim::SimPlatform;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameStats {
    frames: u64,
    total_us: u64,
    worst_us: u64,
    last: Option<Instant>,
}

impl FrameStats {
    /// Mark the start of a frame. The first call only sets the reference point.
    pub fn record(&mut self, now: Instant) {
        if let Some(last) = self.last {
            let us = now.duration_since(last).as_micros() as u64;
            self.frames += 1;
            self.total_us += us;
            self.worst_us = self.worst_us.max(us);
        }
        self.last = Some(now);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn average_us(&self) -> u64 {
        self.total_us.checked_div(self.frames).unwrap_or(0)
    }

    pub fn worst_us(&self) -> u64 {
        self.worst_us
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} frames, avg {}us, worst {}us",
            self.frames,
            self.average_us(),
            self.worst_us
        )
    }
}

/// Wraps a demo, timing every frame and drawing the numbers along the bottom edge.
///
/// A panic on core 1 is raised again on core 0 at the start of the next frame.
pub struct Measured {
    inner: Box<dyn App>,
    pub stats: FrameStats,
}

const BAR_HEIGHT: i32 = 12;

impl Measured {
    pub fn new(inner: Box<dyn App>) -> Self {
        Measured {
            inner,
            stats: FrameStats::default(),
        }
    }
}

impl App for Measured {
    fn init(&mut self, console: &mut Console) {
        self.inner.init(console);
    }

    fn update(&mut self, tick: u32) {
        if let Some(msg) = SimPlatform::get().and_then(SimPlatform::core1_fault) {
            panic!("core 1 panicked: {}", msg);
        }
        self.stats.record(Instant::now());
        self.inner.update(tick);
    }

    fn draw(&mut self, tick: u32, canvas: &mut Canvas<'_>) {
        self.inner.draw(tick, canvas);

        let y = canvas.height() - BAR_HEIGHT;
        canvas.blend_copy();
        canvas.pen(Color::BLACK);
        canvas.frect(0, y, canvas.width(), BAR_HEIGHT);
        canvas.pen(Color::WHITE);
        canvas.text(&self.stats.to_string(), 3, y + 1);
    }
}
