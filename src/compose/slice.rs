use image::{RgbaImage, imageops};

use crate::{
    compose::{Compose, ComposeContext, Composed, Tile},
    foundation::error::{GongjuError, GongjuResult},
};

pub const DEFAULT_SLICE_SIDE: u32 = 3;

/// Cut `img` into an `n x n` grid of tiles, row-major.
///
/// Tile edges are placed at `k * len / n`, so when the size is not divisible the remainder is
/// spread across tiles instead of being dropped.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn slice_grid(img: &RgbaImage, n: u32) -> GongjuResult<Vec<Tile>> {
    let (w, h) = img.dimensions();
    if n == 0 {
        return Err(GongjuError::validation("slice count must be > 0"));
    }
    if w < n || h < n {
        return Err(GongjuError::validation(format!(
            "image {w}x{h} is too small to cut into {n}x{n} tiles"
        )));
    }

    let edge = |k: u32, len: u32| (u64::from(k) * u64::from(len) / u64::from(n)) as u32;
    let mut tiles = Vec::with_capacity((n * n) as usize);
    for row in 0..n {
        let (y0, y1) = (edge(row, h), edge(row + 1, h));
        for col in 0..n {
            let (x0, x1) = (edge(col, w), edge(col + 1, w));
            tiles.push(Tile {
                name: format!("tile_{row}_{col}"),
                image: imageops::crop_imm(img, x0, y0, x1 - x0, y1 - y0).to_image(),
            });
        }
    }
    Ok(tiles)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SliceSpec {
    pub image: String,
    #[serde(default = "default_slice_side")]
    pub n: u32,
}

fn default_slice_side() -> u32 {
    DEFAULT_SLICE_SIDE
}

impl Compose for SliceSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        let img = ctx.load_input(&self.image)?;
        Ok(Composed::Tiles(slice_grid(&img, self.n)?))
    }
}
