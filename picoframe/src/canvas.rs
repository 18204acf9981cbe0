//! # Canvas
//!
//! A [`Canvas`] is the rendering context for one frame: the draw-target buffer
//! plus the pen, borrowed together from the [`Screen`](crate::screen::Screen).
//!
//! ```ignore
//! let mut canvas = screen.canvas();
//! canvas.pen((255, 0, 0));
//! canvas.frect(10, 10, 32, 32);
//! canvas.text("hello", 10, 50);
//! ```
//!
//! Every primitive clips to the buffer. Coordinates outside it are never an error,
//! they just don't touch anything.

use alloc::string::String;
use alloc::vec::Vec;
use core::convert::Infallible;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::color::{BlendMode, Color, PenState};
use crate::screen::{BufferRef, FrameBuffer};

/// Glyphs used by [`Canvas::text`].
pub const FONT: &MonoFont<'static> = &FONT_6X10;

pub struct Canvas<'a> {
    fb: &'a mut FrameBuffer,
    pen: &'a mut PenState,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(fb: &'a mut FrameBuffer, pen: &'a mut PenState) -> Self {
        Self { fb, pen }
    }

    /// Set the pen color. The blend mode is left alone.
    #[inline(always)]
    pub fn pen(&mut self, color: impl Into<Color>) {
        self.pen.color = color.into();
    }

    #[inline(always)]
    pub fn blend(&mut self, mode: BlendMode) {
        self.pen.blend = mode;
    }

    #[inline(always)]
    pub fn blend_copy(&mut self) {
        self.blend(BlendMode::Copy);
    }

    #[inline(always)]
    pub fn blend_alpha(&mut self) {
        self.blend(BlendMode::Alpha);
    }

    #[inline(always)]
    pub fn pen_state(&self) -> PenState {
        *self.pen
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.fb.width()
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.fb.height()
    }

    /// Set every pixel to the pen color. Always overwrites, whatever the blend mode.
    pub fn clear(&mut self) {
        let color = self.pen.color;
        self.fb.pixels_mut().fill(color);
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.fb.index(x, y).map(|i| self.fb.pixels()[i])
    }

    #[inline]
    pub fn pixel(&mut self, x: i32, y: i32) {
        if let Some(i) = self.fb.index(x, y) {
            let px = &mut self.fb.pixels_mut()[i];
            *px = self.pen.apply(*px);
        }
    }

    pub fn hline(&mut self, x: i32, y: i32, len: i32) {
        self.frect(x, y, len, 1);
    }

    pub fn vline(&mut self, x: i32, y: i32, len: i32) {
        self.frect(x, y, 1, len);
    }

    /// Filled rectangle covering `[x, x + w) × [y, y + h)`.
    pub fn frect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let Some((x0, x1)) = clip_span(x, w, self.fb.width()) else {
            return;
        };
        let Some((y0, y1)) = clip_span(y, h, self.fb.height()) else {
            return;
        };

        let stride = self.fb.width() as usize;
        let pen = *self.pen;
        let pixels = self.fb.pixels_mut();
        for row in y0..y1 {
            let span = &mut pixels[row * stride + x0..row * stride + x1];
            if pen.is_store() {
                span.fill(pen.color);
            } else {
                for px in span {
                    *px = pen.apply(*px);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at `(x, y)`, without wrapping.
    pub fn text(&mut self, text: &str, x: i32, y: i32) {
        self.draw_lines(layout(text, None), x, y);
    }

    /// Draw `text` at `(x, y)`, breaking lines so they fit in `wrap` pixels.
    ///
    /// A `wrap` narrower than one glyph still gets one glyph per line, which then
    /// reaches past `x + wrap`.
    pub fn text_wrapped(&mut self, text: &str, x: i32, y: i32, wrap: i32) {
        self.draw_lines(layout(text, Some(wrap)), x, y);
    }

    fn draw_lines(&mut self, lines: Vec<String>, x: i32, y: i32) {
        let style = MonoTextStyle::new(FONT, self.pen.color);
        let line_height = FONT.character_size.height as i32;
        for (n, line) in lines.iter().enumerate() {
            let origin = Point::new(x, y.saturating_add(n as i32 * line_height));
            let _ = Text::with_baseline(line, origin, style, Baseline::Top).draw(self);
        }
    }

    /// Copy a row-major block of `src_w × src_h` colors to `(x, y)`.
    ///
    /// Pixels are stored as-is, without blending. A short `src` copies only the
    /// rows it fully contains.
    pub fn blit(&mut self, src: &[Color], src_w: i32, src_h: i32, x: i32, y: i32) {
        if src_w <= 0 || src_h <= 0 {
            return;
        }
        let src_h = src_h.min((src.len() / src_w as usize) as i32);
        let Some((x0, x1)) = clip_span(x, src_w, self.fb.width()) else {
            return;
        };
        let Some((y0, y1)) = clip_span(y, src_h, self.fb.height()) else {
            return;
        };

        let stride = self.fb.width() as usize;
        let sx = (x0 as i64 - x as i64) as usize;
        let pixels = self.fb.pixels_mut();
        for row in y0..y1 {
            let sy = (row as i64 - y as i64) as usize;
            let from = sy * src_w as usize + sx;
            pixels[row * stride + x0..row * stride + x1]
                .copy_from_slice(&src[from..from + (x1 - x0)]);
        }
    }

    /// Descriptor of the buffer this canvas draws to.
    pub fn target_buffer(&self) -> BufferRef<'_> {
        self.fb.descriptor()
    }
}

impl OriginDimensions for Canvas<'_> {
    fn size(&self) -> Size {
        Size::new(self.fb.width() as u32, self.fb.height() as u32)
    }
}

// Lets any embedded-graphics drawable render through the pen's blend mode.
impl DrawTarget for Canvas<'_> {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let blend = self.pen.blend;
        for Pixel(Point { x, y }, color) in pixels {
            if let Some(i) = self.fb.index(x, y) {
                let px = &mut self.fb.pixels_mut()[i];
                *px = PenState { color, blend }.apply(*px);
            }
        }
        Ok(())
    }
}

/// Clip the span `[start, start + len)` to `[0, limit)`, as `usize` bounds.
fn clip_span(start: i32, len: i32, limit: i32) -> Option<(usize, usize)> {
    if len <= 0 {
        return None;
    }
    let lo = (start as i64).max(0);
    let hi = (start as i64 + len as i64).min(limit as i64);
    if lo >= hi {
        return None;
    }
    Some((lo as usize, hi as usize))
}

/// Pixel size of `text` when drawn by [`Canvas::text`] or [`Canvas::text_wrapped`].
pub fn measure_text(text: &str, wrap: Option<i32>) -> (i32, i32) {
    let lines = layout(text, wrap);
    let glyph = FONT.character_size;
    let advance = glyph.width + FONT.character_spacing;
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let width = if widest == 0 {
        0
    } else {
        widest * advance as i32 - FONT.character_spacing as i32
    };
    (width, lines.len() as i32 * glyph.height as i32)
}

/// Split `text` into the lines that will be drawn.
///
/// `\n` always breaks. With a wrap width, words are packed greedily and a word
/// longer than a whole line is cut. Lines hold at least one glyph.
fn layout(text: &str, wrap: Option<i32>) -> Vec<String> {
    let advance = (FONT.character_size.width + FONT.character_spacing) as i32;
    let columns = wrap.map(|w| (w / advance).max(1) as usize);

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let Some(columns) = columns else {
            lines.push(String::from(paragraph));
            continue;
        };

        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split(' ') {
            let mut word = word;
            let mut word_len = word.chars().count();

            let needed = if line_len == 0 { word_len } else { line_len + 1 + word_len };
            if needed <= columns {
                if line_len > 0 {
                    line.push(' ');
                    line_len += 1;
                }
                line.push_str(word);
                line_len += word_len;
                continue;
            }

            if line_len > 0 {
                lines.push(core::mem::take(&mut line));
                line_len = 0;
            }
            while word_len > columns {
                let cut = word.char_indices().nth(columns).map_or(word.len(), |(i, _)| i);
                lines.push(String::from(&word[..cut]));
                word = &word[cut..];
                word_len -= columns;
            }
            line.push_str(word);
            line_len = word_len;
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Screen;

    const BG: Color = Color::rgb(1, 2, 3);

    fn screen(w: i32, h: i32) -> Screen {
        let mut screen = Screen::new(w, h);
        let mut canvas = screen.canvas();
        canvas.pen(BG);
        canvas.clear();
        screen
    }

    fn changed(screen: &Screen) -> Vec<(i32, i32)> {
        let buf = screen.target_buffer();
        let mut out = Vec::new();
        for y in 0..buf.h {
            for x in 0..buf.w {
                if buf.get(x, y) != Some(BG) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn clear_then_pixel_reads_back_pen() {
        let mut screen = Screen::new(16, 16);
        let mut canvas = screen.canvas();
        canvas.pen((255, 0, 0, 255));
        canvas.clear();
        canvas.pixel(0, 0);
        assert_eq!(canvas.get_pixel(0, 0), Some(Color::rgba(255, 0, 0, 255)));
    }

    #[test]
    fn clear_fills_everything_and_is_idempotent() {
        let mut screen = screen(7, 5);
        let mut canvas = screen.canvas();
        canvas.pen(Color::rgba(9, 8, 7, 60));
        canvas.clear();
        let once: Vec<Color> = canvas.target_buffer().pixels().to_vec();
        canvas.clear();
        assert_eq!(canvas.target_buffer().pixels(), &once[..]);
        assert!(once.iter().all(|p| *p == Color::rgba(9, 8, 7, 60)));
    }

    #[test]
    fn frect_covers_exactly_its_square() {
        let mut screen = screen(6, 6);
        let mut canvas = screen.canvas();
        canvas.pen((0, 255, 0, 255));
        canvas.frect(0, 0, 2, 2);
        assert_eq!(changed(&screen), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(screen.target_buffer().get(1, 1), Some(Color::rgba(0, 255, 0, 255)));
    }

    #[test]
    fn copy_blend_writes_pen_exactly() {
        let mut screen = screen(4, 4);
        let mut canvas = screen.canvas();
        canvas.blend_copy();
        canvas.pen(Color::rgba(50, 60, 70, 10));
        canvas.pixel(2, 2);
        canvas.hline(0, 0, 4);
        canvas.vline(3, 0, 4);
        assert_eq!(canvas.get_pixel(2, 2), Some(Color::rgba(50, 60, 70, 10)));
        assert_eq!(canvas.get_pixel(1, 0), Some(Color::rgba(50, 60, 70, 10)));
        assert_eq!(canvas.get_pixel(3, 3), Some(Color::rgba(50, 60, 70, 10)));
    }

    #[test]
    fn alpha_blend_composites_with_prior_pixel() {
        let mut screen = Screen::new(2, 1);
        let mut canvas = screen.canvas();
        canvas.blend_copy();
        canvas.pen((0, 0, 255));
        canvas.clear();
        canvas.blend_alpha();
        let pen = Color::rgba(255, 0, 0, 128);
        canvas.pen(pen);
        canvas.frect(0, 0, 1, 1);
        canvas.pixel(1, 0);
        let expected = pen.over(Color::rgb(0, 0, 255));
        assert_eq!(canvas.get_pixel(0, 0), Some(expected));
        assert_eq!(canvas.get_pixel(1, 0), Some(expected));
    }

    #[test]
    fn out_of_bounds_is_clipped_silently() {
        let mut screen = screen(4, 4);
        let mut canvas = screen.canvas();
        canvas.pen((200, 0, 0));
        canvas.pixel(-1, 0);
        canvas.pixel(4, 4);
        canvas.hline(-10, 1, 14);
        canvas.vline(2, -3, 4);
        canvas.frect(3, 3, i32::MAX, i32::MAX);
        canvas.frect(i32::MIN, i32::MIN, 1, 1);
        canvas.frect(0, 0, -2, 3);

        let mut expected: Vec<(i32, i32)> = vec![(2, 0), (0, 1), (1, 1), (2, 1), (3, 1), (3, 3)];
        expected.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(changed(&screen), expected);
    }

    #[test]
    fn text_only_touches_glyph_box() {
        let mut screen = screen(40, 20);
        let mut canvas = screen.canvas();
        canvas.pen((255, 255, 255));
        canvas.text("Hi", 0, 0);

        let (w, h) = measure_text("Hi", None);
        assert_eq!((w, h), (12, 10));
        let touched = changed(&screen);
        assert!(!touched.is_empty());
        assert!(touched.iter().all(|&(x, y)| x < w && y < h));
    }

    #[test]
    fn text_may_overflow_and_clip() {
        let mut screen = screen(8, 8);
        let mut canvas = screen.canvas();
        canvas.pen(Color::WHITE);
        canvas.text("overflowing", -3, 2);
        assert!(!changed(&screen).is_empty());
    }

    #[test]
    fn wrapped_text_stays_within_width() {
        let mut screen = screen(60, 60);
        let mut canvas = screen.canvas();
        canvas.pen(Color::WHITE);
        canvas.text_wrapped("one two three four", 0, 0, 30);
        let touched = changed(&screen);
        assert!(touched.iter().all(|&(x, _)| x < 30));
        assert!(touched.iter().any(|&(_, y)| y >= 30));
    }

    #[test]
    fn layout_wraps_words_and_cuts_long_ones() {
        assert_eq!(layout("one two three", Some(42)), vec!["one two", "three"]);
        assert_eq!(layout("abcdefghij", Some(24)), vec!["abcd", "efgh", "ij"]);
        assert_eq!(layout("a\nb", None), vec!["a", "b"]);
        assert_eq!(layout("", Some(10)), vec![""]);
    }

    #[test]
    fn wrap_narrower_than_a_glyph_stacks_single_glyphs() {
        assert_eq!(layout("abc", Some(3)), vec!["a", "b", "c"]);
        assert_eq!(layout("ab", Some(0)), vec!["a", "b"]);
        assert_eq!(measure_text("abc", Some(3)), (6, 30));

        let mut screen = screen(20, 40);
        let mut canvas = screen.canvas();
        canvas.pen(Color::WHITE);
        canvas.text_wrapped("abc", 0, 0, 3);
        let touched = changed(&screen);
        assert!(touched.iter().any(|&(x, _)| x >= 3));
        assert!(touched.iter().all(|&(x, _)| x < 6));
        assert!(touched.iter().any(|&(_, y)| y >= 20));
    }

    #[test]
    fn measure_counts_lines() {
        assert_eq!(measure_text("ab\nabcd", None), (24, 20));
        assert_eq!(measure_text("", None), (0, 10));
    }

    #[test]
    fn blit_copies_and_clips() {
        let mut screen = screen(4, 4);
        let mut canvas = screen.canvas();
        let src: Vec<Color> = (0..9).map(|i| Color::rgb(i, i, i)).collect();
        canvas.blit(&src, 3, 3, 2, -1);
        assert_eq!(canvas.get_pixel(2, 0), Some(Color::rgb(3, 3, 3)));
        assert_eq!(canvas.get_pixel(3, 1), Some(Color::rgb(7, 7, 7)));
        assert_eq!(canvas.get_pixel(1, 0), Some(BG));
        assert_eq!(canvas.get_pixel(2, 2), Some(BG));
    }

    #[test]
    fn embedded_graphics_primitives_draw_through_pen() {
        use embedded_graphics::primitives::{Line, Primitive, PrimitiveStyle};

        let mut screen = screen(5, 5);
        let mut canvas = screen.canvas();
        let _ = Line::new(Point::new(0, 0), Point::new(4, 4))
            .into_styled(PrimitiveStyle::with_stroke(Color::WHITE, 1))
            .draw(&mut canvas);
        assert_eq!(canvas.get_pixel(3, 3), Some(Color::WHITE));
        assert_eq!(canvas.get_pixel(3, 2), Some(BG));
    }
}
