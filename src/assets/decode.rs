use std::{io::Cursor, path::Path};

use anyhow::Context;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::foundation::error::{GongjuError, GongjuResult};

pub fn decode_image(bytes: &[u8]) -> GongjuResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(dyn_img.to_rgba8())
}

pub fn load_image(path: &Path) -> GongjuResult<RgbaImage> {
    let dyn_img = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        width = dyn_img.width(),
        height = dyn_img.height(),
        "loaded image"
    );
    Ok(dyn_img.to_rgba8())
}

/// Write `img` with the format implied by the file extension.
///
/// JPEG has no alpha channel, so images are flattened to RGB for `.jpg`/`.jpeg`.
pub fn save_image(img: &RgbaImage, path: &Path) -> GongjuResult<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| GongjuError::validation(format!(
            "cannot infer image format from '{}'",
            path.display()
        )))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let result = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .save_with_format(path, format)
    } else {
        img.save_with_format(path, format)
    };
    result.with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

pub fn encode_png(img: &RgbaImage) -> GongjuResult<Vec<u8>> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
