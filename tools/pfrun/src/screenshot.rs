use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{ImageFormat, RgbaImage};
use pfsim::Presented;

/// Write the frame as a PNG, whatever the extension of `path`.
pub fn save_png(frame: &Presented, path: &Path) -> Result<()> {
    if frame.frame == 0 {
        bail!("nothing has been presented yet");
    }
    let image = RgbaImage::from_raw(
        frame.width as u32,
        frame.height as u32,
        frame.as_bytes().to_vec(),
    )
    .context("frame size does not match its pixel data")?;
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("writing screenshot to {}", path.display()))?;
    Ok(())
}
