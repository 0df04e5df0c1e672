use crate::foundation::{
    core::{Canvas, Mask, Rgb8},
    error::{AdError, AdResult},
    math::{mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Source-over of two equal-length premultiplied buffers, in place on `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> AdResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(AdError::invalid_input(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a straight-alpha `layer` over `dst` with its top-left corner at `(x, y)`.
///
/// Parts of the layer falling outside `dst` are clipped.
pub fn paste_over(dst: Canvas, layer: &Canvas, x: i64, y: i64) -> AdResult<Canvas> {
    let mut src = layer.data().to_vec();
    premultiply_rgba8_in_place(&mut src);
    blit_premul(dst, &src, layer.width(), layer.height(), x, y)
}

/// Composite a solid `color` through `alpha` over `dst` at `(x, y)`.
pub fn paste_tinted_mask(dst: Canvas, alpha: &Mask, color: Rgb8, x: i64, y: i64) -> AdResult<Canvas> {
    let mut src = Vec::with_capacity(alpha.data().len() * 4);
    for &a in alpha.data() {
        src.extend_from_slice(&[color.r, color.g, color.b, a]);
    }
    premultiply_rgba8_in_place(&mut src);
    blit_premul(dst, &src, alpha.width(), alpha.height(), x, y)
}

fn blit_premul(
    dst: Canvas,
    src_premul: &[u8],
    src_w: u32,
    src_h: u32,
    x: i64,
    y: i64,
) -> AdResult<Canvas> {
    let (dst_w, dst_h) = (i64::from(dst.width()), i64::from(dst.height()));
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src_w)).min(dst_w);
    let y1 = (y + i64::from(src_h)).min(dst_h);
    if x0 >= x1 || y0 >= y1 {
        return Ok(dst);
    }

    let (width, height) = (dst.width(), dst.height());
    let mut out = dst.into_raw();
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let d_start = ((dy * dst_w + x0) * 4) as usize;
        let d_end = ((dy * dst_w + x1) * 4) as usize;
        let s_start = (sy * src_w as usize + (x0 - x) as usize) * 4;
        let s_end = s_start + (d_end - d_start);

        let row = &mut out[d_start..d_end];
        premultiply_rgba8_in_place(row);
        over_in_place(row, &src_premul[s_start..s_end], 1.0)?;
        unpremultiply_rgba8_in_place(row);
    }
    Canvas::from_rgba8(width, height, out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
