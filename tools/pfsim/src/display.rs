use picoframe::{BufferRef, Color};

/// A copy of the last frame handed to the display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Presented {
    pub width: i32,
    pub height: i32,
    pub pixels: Vec<Color>,
    /// How many frames had been presented when this one arrived, counting it. 0 means none yet.
    pub frame: u64,
}

impl Presented {
    pub(crate) fn capture(&mut self, buffer: BufferRef<'_>, frame: u64) {
        self.width = buffer.w;
        self.height = buffer.h;
        self.pixels.clear();
        self.pixels.extend_from_slice(buffer.pixels());
        self.frame = frame;
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
