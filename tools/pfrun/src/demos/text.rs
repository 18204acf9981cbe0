use picoframe::{now_us, Canvas, Color};

const MARGIN: i32 = 6;

const BODY: &str = "Everything on this screen is drawn into the back buffer, \
then handed to the display at vsync while the other buffer takes its place. \
Lines wrap at word boundaries; words too long for a line, like \
supercalifragilisticexpialidocious, are cut.";

#[derive(Debug, Default)]
pub struct TextDemo {
    uptime_us: u64,
}

impl picoframe::App for TextDemo {
    fn update(&mut self, _tick: u32) {
        self.uptime_us = now_us();
    }

    fn draw(&mut self, tick: u32, canvas: &mut Canvas<'_>) {
        let (w, h) = (canvas.width(), canvas.height());

        canvas.blend_copy();
        canvas.pen((20, 30, 60));
        canvas.clear();

        // translucent box sliding under the text
        let span = (w - 60).max(1);
        let x = (tick as i32 % (2 * span) - span).abs();
        canvas.blend_alpha();
        canvas.pen(Color::rgba(255, 160, 0, 96));
        canvas.frect(x, MARGIN, 60, h / 2);

        canvas.pen(Color::WHITE);
        canvas.text_wrapped(BODY, MARGIN, MARGIN, w - 2 * MARGIN);

        let secs = self.uptime_us / 1_000_000;
        let millis = (self.uptime_us / 1_000) % 1_000;
        canvas.pen((160, 255, 160));
        canvas.text(&format!("uptime {}.{:03}s", secs, millis), MARGIN, h - 28);
    }
}
