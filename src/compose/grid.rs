use image::{RgbaImage, imageops};

use crate::{
    compose::{Compose, ComposeContext, Composed},
    foundation::{
        color::Rgba8,
        core::Canvas,
        error::{GongjuError, GongjuResult},
    },
};

/// Cells per side of the collage.
pub const GRID_SIDE: u32 = 3;
pub const GRID_CELLS: usize = (GRID_SIDE * GRID_SIDE) as usize;

/// Canvas side the gap presets are expressed in.
const DESIGN_WIDTH: f64 = 680.0;

/// Gap between cells.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridGap {
    /// Gap in pixels of a 680px canvas, scaled with the side. The picker offers 0, 2, 6, 10, 15
    /// and 20.
    Design(f64),
    /// Gap in output pixels.
    Pixels(u32),
}

impl Default for GridGap {
    fn default() -> Self {
        Self::Design(10.0)
    }
}

impl GridGap {
    fn to_px(self, side: u32) -> f64 {
        match self {
            Self::Design(units) => units * f64::from(side) / DESIGN_WIDTH,
            Self::Pixels(px) => f64::from(px),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridOptions {
    pub side: u32,
    pub gap: GridGap,
    pub background: Rgba8,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            side: 680,
            gap: GridGap::default(),
            background: Rgba8::WHITE,
        }
    }
}

/// Cell placement derived from the options, in output pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub cell: f64,
    pub gap: f64,
}

impl GridLayout {
    pub fn new(opts: &GridOptions) -> GongjuResult<Self> {
        Canvas::square(opts.side)?;
        let gap = opts.gap.to_px(opts.side);
        if !gap.is_finite() || gap < 0.0 {
            return Err(GongjuError::validation("grid gap must be >= 0"));
        }
        let cell = (f64::from(opts.side) - 2.0 * gap) / f64::from(GRID_SIDE);
        if cell < 1.0 {
            return Err(GongjuError::validation(format!(
                "grid gap {gap:.1}px leaves no room for cells on a {}px canvas",
                opts.side
            )));
        }
        Ok(Self { cell, gap })
    }

    /// Top-left corner of cell `index` (row-major).
    pub fn origin(&self, index: usize) -> (f64, f64) {
        let col = (index % GRID_SIDE as usize) as f64;
        let row = (index / GRID_SIDE as usize) as f64;
        let step = self.cell + self.gap;
        (col * step, row * step)
    }
}

/// Largest centred square of `img`.
pub fn center_square(img: &RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == h {
        return img.clone();
    }
    let side = w.min(h);
    let x = (w - side) / 2;
    let y = (h - side) / 2;
    imageops::crop_imm(img, x, y, side, side).to_image()
}

/// Compose up to nine images into a 3x3 collage. `None` slots stay as background.
#[tracing::instrument(skip(cells), fields(filled = cells.iter().filter(|c| c.is_some()).count()))]
pub fn compose_grid(cells: &[Option<RgbaImage>], opts: &GridOptions) -> GongjuResult<RgbaImage> {
    if cells.len() > GRID_CELLS {
        return Err(GongjuError::validation(format!(
            "grid takes at most {GRID_CELLS} images, got {}",
            cells.len()
        )));
    }
    let layout = GridLayout::new(opts)?;
    let cell_px = layout.cell.round().max(1.0) as u32;
    tracing::debug!(cell = layout.cell, gap = layout.gap, "grid layout");

    let mut out = RgbaImage::from_pixel(opts.side, opts.side, opts.background.to_image());
    for (i, img) in cells.iter().enumerate() {
        let Some(img) = img else {
            continue;
        };
        let square = center_square(img);
        let scaled = imageops::resize(&square, cell_px, cell_px, imageops::FilterType::Triangle);
        let (x, y) = layout.origin(i);
        imageops::overlay(&mut out, &scaled, x.round() as i64, y.round() as i64);
    }
    Ok(out)
}

/// Job form of [`compose_grid`]. Empty strings mark empty slots.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct GridSpec {
    pub images: Vec<String>,
    #[serde(default)]
    pub options: GridOptions,
}

impl Compose for GridSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        let cells = self
            .images
            .iter()
            .map(|src| {
                if src.trim().is_empty() {
                    Ok(None)
                } else {
                    ctx.load_input(src).map(Some)
                }
            })
            .collect::<GongjuResult<Vec<_>>>()?;
        Ok(Composed::Image(compose_grid(&cells, &self.options)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/grid.rs"]
mod tests;
