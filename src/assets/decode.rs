use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::foundation::{
    core::Canvas,
    error::{AdError, AdResult},
};

/// Decode encoded image bytes (PNG/JPEG) into a straight-alpha canvas.
///
/// RGB inputs come back fully opaque.
pub fn decode_image(bytes: &[u8]) -> AdResult<Canvas> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Canvas::from_image(dyn_img.to_rgba8())
}

/// Read and decode an image file. A missing file is [`AdError::ResourceMissing`].
pub fn open_image(path: &Path) -> AdResult<Canvas> {
    if !path.is_file() {
        return Err(AdError::resource_missing(format!(
            "input image '{}' does not exist",
            path.display()
        )));
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("read image bytes from '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Encode a canvas as PNG bytes.
pub fn encode_png(canvas: &Canvas) -> AdResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(canvas.to_image())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Encode a canvas as PNG and write it to `path`, creating parent directories.
pub fn save_png(canvas: &Canvas, path: &Path) -> AdResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let bytes = encode_png(canvas)?;
    std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
