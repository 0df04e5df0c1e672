use image::imageops::FilterType;

use crate::foundation::{
    core::{Canvas, Size},
    error::AdResult,
    math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
};

/// Lanczos3 resize in premultiplied space, so transparent pixels do not bleed color into
/// their neighbors. Returns the input unchanged when the size already matches.
pub fn resize_lanczos(src: Canvas, target: Size) -> AdResult<Canvas> {
    let target = Size::new(target.width, target.height)?;
    if src.size() == target {
        return Ok(src);
    }

    let (w, h) = (src.width(), src.height());
    let mut premul = src.into_raw();
    premultiply_rgba8_in_place(&mut premul);
    let img = image::RgbaImage::from_raw(w, h, premul)
        .ok_or_else(|| anyhow::anyhow!("canvas buffer does not fit {w}x{h}"))?;

    let resized = image::imageops::resize(&img, target.width, target.height, FilterType::Lanczos3);
    let mut out = resized.into_raw();
    unpremultiply_rgba8_in_place(&mut out);
    Canvas::from_rgba8(target.width, target.height, out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/resample.rs"]
mod tests;
