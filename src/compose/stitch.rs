use image::{RgbaImage, imageops};

use crate::{
    compose::{Compose, ComposeContext, Composed},
    foundation::{
        color::Rgba8,
        core::{Canvas, MAX_DIM},
        error::{GongjuError, GongjuResult},
        math::to_px_dim,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StitchDirection {
    /// Top to bottom, every image scaled to a shared width.
    #[default]
    Vertical,
    /// Left to right, every image scaled to a shared height.
    Horizontal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StitchOptions {
    pub direction: StitchDirection,
    /// Shared width (vertical) or height (horizontal). Defaults to the first image's.
    pub extent: Option<u32>,
    /// Only visible where inputs are transparent.
    pub background: Option<Rgba8>,
}

/// Size of each image after scaling along the shared axis, in stacking order.
pub fn stitch_sizes(dims: &[(u32, u32)], opts: &StitchOptions) -> GongjuResult<Vec<(u32, u32)>> {
    let Some(&(first_w, first_h)) = dims.first() else {
        return Err(GongjuError::validation("stitch needs at least one image"));
    };
    if dims.iter().any(|&(w, h)| w == 0 || h == 0) {
        return Err(GongjuError::validation("stitch inputs must be non-empty images"));
    }
    if let Some(extent) = opts.extent
        && (extent == 0 || extent > MAX_DIM)
    {
        return Err(GongjuError::validation(format!(
            "stitch extent must be within 1..={MAX_DIM}, got {extent}"
        )));
    }

    Ok(match opts.direction {
        StitchDirection::Vertical => {
            let target = opts.extent.unwrap_or(first_w);
            dims.iter()
                .map(|&(w, h)| {
                    (
                        target,
                        to_px_dim(f64::from(h) * f64::from(target) / f64::from(w)),
                    )
                })
                .collect()
        }
        StitchDirection::Horizontal => {
            let target = opts.extent.unwrap_or(first_h);
            dims.iter()
                .map(|&(w, h)| {
                    (
                        to_px_dim(f64::from(w) * f64::from(target) / f64::from(h)),
                        target,
                    )
                })
                .collect()
        }
    })
}

/// Length of the strip along the stacking axis.
fn stacked_len(lens: impl Iterator<Item = u32>) -> GongjuResult<u32> {
    let total = lens
        .map(u64::from)
        .try_fold(0u64, u64::checked_add)
        .and_then(|t| u32::try_from(t).ok())
        .filter(|&t| t <= MAX_DIM);
    total.ok_or_else(|| {
        GongjuError::validation(format!("stitched image would exceed {MAX_DIM}px"))
    })
}

#[tracing::instrument(skip(images), fields(count = images.len()))]
pub fn stitch(images: &[RgbaImage], opts: &StitchOptions) -> GongjuResult<RgbaImage> {
    let dims: Vec<_> = images.iter().map(RgbaImage::dimensions).collect();
    let sizes = stitch_sizes(&dims, opts)?;

    let (total_w, total_h) = match opts.direction {
        StitchDirection::Vertical => (sizes[0].0, stacked_len(sizes.iter().map(|s| s.1))?),
        StitchDirection::Horizontal => (stacked_len(sizes.iter().map(|s| s.0))?, sizes[0].1),
    };
    let canvas = Canvas::new(total_w, total_h)?;
    tracing::debug!(width = canvas.width, height = canvas.height, "stitch canvas");

    let bg = opts.background.unwrap_or(Rgba8::TRANSPARENT);
    let mut out = RgbaImage::from_pixel(canvas.width, canvas.height, bg.to_image());
    let mut offset = 0i64;
    for (img, &(w, h)) in images.iter().zip(&sizes) {
        let scaled = if img.dimensions() == (w, h) {
            img.clone()
        } else {
            imageops::resize(img, w, h, imageops::FilterType::Lanczos3)
        };
        match opts.direction {
            StitchDirection::Vertical => {
                imageops::overlay(&mut out, &scaled, 0, offset);
                offset += i64::from(h);
            }
            StitchDirection::Horizontal => {
                imageops::overlay(&mut out, &scaled, offset, 0);
                offset += i64::from(w);
            }
        }
    }
    Ok(out)
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct StitchSpec {
    pub images: Vec<String>,
    #[serde(default)]
    pub options: StitchOptions,
}

impl Compose for StitchSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        let images = self
            .images
            .iter()
            .map(|src| ctx.load_input(src))
            .collect::<GongjuResult<Vec<_>>>()?;
        Ok(Composed::Image(stitch(&images, &self.options)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/stitch.rs"]
mod tests;
