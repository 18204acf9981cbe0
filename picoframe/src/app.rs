use crate::canvas::Canvas;
use crate::console::Console;

/// A program driven by [`Console::run`].
///
/// Each frame calls [`update`](App::update) and then [`draw`](App::draw) with the
/// same tick. The tick starts at 0 and wraps.
pub trait App {
    /// Runs once before the first frame. Launch core 1 from here if you need it.
    fn init(&mut self, _console: &mut Console) {}

    fn update(&mut self, _tick: u32) {}

    /// Draw the whole frame. The canvas holds what was drawn two frames ago.
    fn draw(&mut self, tick: u32, canvas: &mut Canvas<'_>);
}
