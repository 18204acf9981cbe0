use std::mem;

use picoframe::{Canvas, Color, Console, Mutex};
use tracing::{info, warn};

pub const PICTURE_WIDTH: i32 = 160;
pub const PICTURE_HEIGHT: i32 = 144;
const PICTURE_LEN: usize = (PICTURE_WIDTH * PICTURE_HEIGHT) as usize;

struct Picture {
    pixels: Vec<Color>,
    number: u64,
}

/// The latest finished picture. Core 1 swaps its work buffer in here; core 0 copies out.
static BACK: Mutex<Picture> = Mutex::new(Picture {
    pixels: Vec::new(),
    number: 0,
});

fn render(pixels: &mut [Color], n: u64) {
    let phase = n as u32;
    for (i, px) in pixels.iter_mut().enumerate() {
        let x = (i % PICTURE_WIDTH as usize) as u32;
        let y = (i / PICTURE_WIDTH as usize) as u32;
        *px = Color::rgb(
            x.wrapping_add(phase) as u8,
            (y * 2) as u8,
            ((x ^ y).wrapping_add(phase * 3)) as u8,
        );
    }
}

fn core1_main() -> ! {
    let mut writing = vec![Color::BLACK; PICTURE_LEN];
    let mut n: u64 = 0;
    loop {
        render(&mut writing, n);
        {
            let mut back = BACK.lock();
            mem::swap(&mut back.pixels, &mut writing);
            back.number = n;
        }
        // the very first swap hands back the empty placeholder
        writing.resize(PICTURE_LEN, Color::BLACK);
        n = n.wrapping_add(1);
    }
}

#[derive(Debug, Default)]
pub struct DualCore {
    last_seen: Option<u64>,
}

impl picoframe::App for DualCore {
    fn init(&mut self, console: &mut Console) {
        match console.core1() {
            Some(core1) => {
                info!("starting the renderer on core 1");
                core1.launch(|| core1_main());
            }
            None => warn!("core 1 is taken; the picture will stay blank"),
        }
    }

    fn draw(&mut self, _tick: u32, canvas: &mut Canvas<'_>) {
        canvas.blend_copy();
        canvas.pen(Color::BLACK);
        canvas.clear();

        let x = (canvas.width() - PICTURE_WIDTH) / 2;
        {
            let back = BACK.lock();
            if back.pixels.len() == PICTURE_LEN {
                canvas.blit(&back.pixels, PICTURE_WIDTH, PICTURE_HEIGHT, x, 0);
                self.last_seen = Some(back.number);
            }
        }

        canvas.pen((255, 0, 0));
        let status = match self.last_seen {
            Some(n) => format!("core 1 picture #{}", n),
            None => String::from("waiting for core 1"),
        };
        canvas.text(&status, 3, PICTURE_HEIGHT + 6);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_fills_every_pixel_opaque() {
        let mut pixels = vec![Color::TRANSPARENT; PICTURE_LEN];
        render(&mut pixels, 7);
        assert!(pixels.iter().all(|p| p.a == 255));
        assert_eq!(pixels[0], Color::rgb(7, 0, 21));
    }
}
