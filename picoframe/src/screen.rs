//! # Double-buffered presentation
//!
//! The [`Screen`] owns two [`FrameBuffer`]s. While one is on the display, the
//! other is the draw target:
//!
//! ```ignore
//! loop {
//!     let mut canvas = screen.canvas();
//!     canvas.pen((0, 0, 0));
//!     canvas.clear();
//!     // ...draw the frame...
//!
//!     screen.wait_vsync();
//!     // the buffer we drew to goes to the display,
//!     // and the previously displayed one becomes the draw target
//!     screen.flip();
//! }
//! ```
//!
//! The two roles only ever swap inside [`Screen::flip`]. The new draw target keeps
//! whatever it held two frames ago; clear it if the frame does not cover every pixel.

use alloc::vec;
use alloc::boxed::Box;
use core::marker::PhantomData;
use core::ptr::NonNull;
use core::slice;

use log::{debug, trace};

use crate::canvas::Canvas;
use crate::color::{Color, PenState};
use crate::platform;

/// Pixel memory for one buffer: row-major, `w * h` colors.
pub struct FrameBuffer {
    w: i32,
    h: i32,
    pixels: Box<[Color]>,
}

impl FrameBuffer {
    /// Negative dimensions are treated as zero.
    pub fn new(w: i32, h: i32, fill: Color) -> Self {
        let (w, h) = (w.max(0), h.max(0));
        Self {
            w,
            h,
            pixels: vec![fill; w as usize * h as usize].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.w
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.h
    }

    #[inline(always)]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline(always)]
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Index of `(x, y)` in [`pixels`](Self::pixels), or `None` when out of bounds.
    #[inline(always)]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.w || y >= self.h {
            return None;
        }
        Some(y as usize * self.w as usize + x as usize)
    }

    pub fn descriptor(&self) -> BufferRef<'_> {
        BufferRef {
            w: self.w,
            h: self.h,
            data: NonNull::from(&*self.pixels).cast(),
            _pixels: PhantomData,
        }
    }
}

/// Read-only descriptor of a frame buffer.
///
/// The layout is the device's `struct buffer { int32 w; int32 h; void *data; }`,
/// so a `*const BufferRef` can be handed across the C boundary as-is.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct BufferRef<'a> {
    pub w: i32,
    pub h: i32,
    data: NonNull<Color>,
    _pixels: PhantomData<&'a [Color]>,
}

impl<'a> BufferRef<'a> {
    /// Raw handle to the pixel storage. Two descriptors refer to the same buffer
    /// exactly when their handles are equal.
    #[inline(always)]
    pub fn data(&self) -> *const Color {
        self.data.as_ptr()
    }

    pub fn pixels(&self) -> &'a [Color] {
        // SAFETY: built from a live `&[Color]` of exactly `w * h` elements, borrowed for 'a
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.w as usize * self.h as usize) }
    }

    /// The pixels as `r, g, b, a` bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.pixels())
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.w || y >= self.h {
            return None;
        }
        self.pixels().get(y as usize * self.w as usize + x as usize).copied()
    }
}

impl core::fmt::Debug for BufferRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferRef")
            .field("w", &self.w)
            .field("h", &self.h)
            .field("data", &self.data)
            .finish()
    }
}

/// The presentation pipeline: two buffers, the index of the draw target, and the pen.
pub struct Screen {
    buffers: [FrameBuffer; 2],
    target: usize,
    pen: PenState,
}

impl Screen {
    pub fn new(w: i32, h: i32) -> Self {
        debug!("allocating two {}x{} frame buffers", w, h);
        Self {
            buffers: [
                FrameBuffer::new(w, h, Color::BLACK),
                FrameBuffer::new(w, h, Color::BLACK),
            ],
            target: 0,
            pen: PenState::default(),
        }
    }

    #[inline(always)]
    pub fn width(&self) -> i32 {
        self.buffers[0].width()
    }

    #[inline(always)]
    pub fn height(&self) -> i32 {
        self.buffers[0].height()
    }

    /// Borrow the draw target together with the pen.
    #[inline(always)]
    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(&mut self.buffers[self.target], &mut self.pen)
    }

    #[inline(always)]
    pub fn pen_state(&self) -> PenState {
        self.pen
    }

    /// Which of the two buffers (0 or 1) is the draw target.
    #[inline(always)]
    pub fn target_index(&self) -> usize {
        self.target
    }

    pub fn target_buffer(&self) -> BufferRef<'_> {
        self.buffers[self.target].descriptor()
    }

    /// The buffer most recently handed to the display.
    pub fn front_buffer(&self) -> BufferRef<'_> {
        self.buffers[self.target ^ 1].descriptor()
    }

    /// Block until the next vertical refresh. No timeout.
    #[inline]
    pub fn wait_vsync(&self) {
        platform::get().wait_vsync();
    }

    /// Publish the draw target and exchange the two roles.
    ///
    /// Call after the frame is fully drawn, and after [`wait_vsync`](Self::wait_vsync)
    /// for tear-free output.
    pub fn flip(&mut self) {
        platform::get().present(self.buffers[self.target].descriptor());
        self.target ^= 1;
        trace!("flipped; drawing to buffer {}", self.target);
    }
}
