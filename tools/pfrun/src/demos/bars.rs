use picoframe::{Button, Canvas, Color};

const PALETTE: [Color; 8] = [
    Color::rgb(255, 255, 255),
    Color::rgb(255, 255, 0),
    Color::rgb(0, 255, 255),
    Color::rgb(0, 255, 0),
    Color::rgb(255, 0, 255),
    Color::rgb(255, 0, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(0, 0, 0),
];

#[derive(Debug, Default)]
pub struct Bars {
    offset: i32,
    held: Vec<Button>,
}

impl picoframe::App for Bars {
    fn update(&mut self, _tick: u32) {
        self.held = Button::ALL.into_iter().filter(|b| b.pressed()).collect();
        let step = match (Button::Left.pressed(), Button::Right.pressed()) {
            (true, false) => -2,
            (false, true) => 2,
            _ => 1,
        };
        self.offset = self.offset.wrapping_add(step);
    }

    fn draw(&mut self, _tick: u32, canvas: &mut Canvas<'_>) {
        let (w, h) = (canvas.width(), canvas.height());
        let bar = (w / PALETTE.len() as i32).max(1);
        let shift = self.offset.rem_euclid(bar * PALETTE.len() as i32);

        canvas.blend_copy();
        for (i, color) in PALETTE.iter().enumerate() {
            canvas.pen(*color);
            // each bar is drawn twice so the wrap-around is seamless
            let x = i as i32 * bar - shift;
            canvas.frect(x, 0, bar, h);
            canvas.frect(x + bar * PALETTE.len() as i32, 0, bar, h);
        }

        canvas.blend_alpha();
        canvas.pen(Color::rgba(0, 0, 0, 160));
        canvas.frect(0, 0, w, 14);
        canvas.pen(Color::WHITE);
        let names: Vec<&str> = self.held.iter().map(|b| b.name()).collect();
        canvas.text(&format!("held: {}", names.join(" ")), 3, 2);
    }
}
