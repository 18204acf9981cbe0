//! # Colors and the pen
//!
//! Pixels are stored as four 8-bit channels, exactly as given; there is no
//! color-space conversion. The [`PenState`] pairs the active color with a
//! [`BlendMode`] that decides how it lands on existing pixels.
//!
//! | Mode    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `Copy`  | Overwrite the destination pixel                     |
//! | `Alpha` | Source-over composite using the pen's alpha channel |

use bytemuck::{Pod, Zeroable};
use embedded_graphics::pixelcolor::PixelColor;

/// An RGBA pixel, laid out `r, g, b, a` in memory.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque color from three channels.
    #[inline(always)]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline(always)]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Composite `self` over `dst`.
    #[inline]
    pub fn over(self, dst: Color) -> Color {
        match self.a {
            255 => self,
            0 => dst,
            a => {
                let a = a as u32;
                let inv = 255 - a;
                let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
                Color {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (a + (dst.a as u32 * inv + 127) / 255) as u8,
                }
            }
        }
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Color::rgba(r, g, b, a)
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Color::rgba(r, g, b, a)
    }
}

// Glyphs are rasterized straight into `Color`, no raw pixel encoding involved.
impl PixelColor for Color {
    type Raw = ();
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    Copy,
    #[default]
    Alpha,
}

/// The active color and blend mode of a screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PenState {
    pub color: Color,
    pub blend: BlendMode,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            blend: BlendMode::default(),
        }
    }
}

impl PenState {
    /// The value a pixel holding `dst` takes after this pen touches it.
    #[inline(always)]
    pub fn apply(&self, dst: Color) -> Color {
        match self.blend {
            BlendMode::Copy => self.color,
            BlendMode::Alpha => self.color.over(dst),
        }
    }

    /// Whether drawing with this pen is a plain store, independent of the destination.
    #[inline(always)]
    pub(crate) fn is_store(&self) -> bool {
        self.blend == BlendMode::Copy || self.color.a == 255
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_over_replaces() {
        let c = Color::rgb(10, 20, 30);
        assert_eq!(c.over(Color::rgba(200, 200, 200, 17)), c);
    }

    #[test]
    fn transparent_over_keeps_destination() {
        let dst = Color::rgba(1, 2, 3, 4);
        assert_eq!(Color::rgba(255, 0, 0, 0).over(dst), dst);
    }

    #[test]
    fn half_alpha_mixes_channels() {
        let out = Color::rgba(255, 0, 0, 128).over(Color::rgb(0, 0, 255));
        assert_eq!(out, Color::rgba(128, 0, 127, 255));
    }

    #[test]
    fn alpha_accumulates_over_transparent() {
        let out = Color::rgba(0, 0, 0, 100).over(Color::TRANSPARENT);
        assert_eq!(out.a, 100);
    }

    #[test]
    fn copy_pen_ignores_destination() {
        let pen = PenState {
            color: Color::rgba(9, 9, 9, 0),
            blend: BlendMode::Copy,
        };
        assert_eq!(pen.apply(Color::WHITE), Color::rgba(9, 9, 9, 0));
    }

    #[test]
    fn default_pen_composites() {
        assert_eq!(PenState::default().blend, BlendMode::Alpha);
    }
}
