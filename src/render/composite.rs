use image::RgbaImage;

use crate::foundation::{
    error::{GongjuError, GongjuResult},
    math::{mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
};

pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels, with an extra global opacity on `src`.
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

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> GongjuResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(GongjuError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite a premultiplied layer of the same size over a straight-alpha image.
pub fn overlay_premul_layer(
    base: &mut RgbaImage,
    layer_premul: &[u8],
    opacity: f32,
) -> GongjuResult<()> {
    let buf: &mut [u8] = base;
    premultiply_rgba8_in_place(buf);
    over_in_place(buf, layer_premul, opacity)?;
    unpremultiply_rgba8_in_place(buf);
    Ok(())
}

/// Turn a premultiplied buffer into a straight-alpha image.
pub fn image_from_premul(width: u32, height: u32, mut premul: Vec<u8>) -> GongjuResult<RgbaImage> {
    unpremultiply_rgba8_in_place(&mut premul);
    RgbaImage::from_raw(width, height, premul)
        .ok_or_else(|| GongjuError::render("pixel buffer does not match dimensions"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
