use image::RgbaImage;

use crate::{
    assets::fonts::FontLibrary,
    compose::{Compose, ComposeContext, Composed},
    foundation::{
        color::Rgba8,
        core::{Affine, Canvas, Point},
        error::{GongjuError, GongjuResult},
    },
    render::{
        composite::overlay_premul_layer,
        svg::{SvgCanvas, TextRun},
    },
};

/// Canvas width the tile metrics below were tuned for; they scale with the photo width.
const REFERENCE_WIDTH: f64 = 375.0;
const BASE_FONT_PX: f64 = 18.0;
const BASE_ROW_STEP: f64 = 80.0;
/// Upper bound on drawn copies; very thin photos would otherwise need millions.
const MAX_COPIES: usize = 50_000;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WatermarkOptions {
    pub text: String,
    pub color: Rgba8,
    /// Global opacity of the text layer, 0..=1.
    pub alpha: f32,
    /// Clockwise tilt of the tile rows.
    pub angle_deg: f64,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Rgba8::rgb(0x80, 0x80, 0x80),
            alpha: 0.5,
            angle_deg: 30.0,
        }
    }
}

impl WatermarkOptions {
    pub fn validate(&self) -> GongjuResult<()> {
        if self.text.trim().is_empty() {
            return Err(GongjuError::validation("watermark text must be non-empty"));
        }
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(GongjuError::validation("watermark alpha must be within 0..=1"));
        }
        if !self.angle_deg.is_finite() {
            return Err(GongjuError::validation("watermark angle must be finite"));
        }
        Ok(())
    }
}

/// Where every copy of the text goes, in the rotated text frame.
#[derive(Clone, Debug)]
pub struct WatermarkLayout {
    pub font_px: f64,
    pub col_step: f64,
    pub row_step: f64,
    pub rotation: Affine,
    pub anchors: Vec<Point>,
}

impl WatermarkLayout {
    pub fn new(opts: &WatermarkOptions, width: u32, height: u32) -> GongjuResult<Self> {
        opts.validate()?;
        Canvas::new(width, height)?;

        let scale = f64::from(width) / REFERENCE_WIDTH;
        let chars = opts.text.chars().count() as f64;
        let per_char = if chars > 5.0 { 20.0 } else { 30.0 };
        let font_px = BASE_FONT_PX * scale;
        let col_step = chars * per_char * scale;
        let row_step = BASE_ROW_STEP * scale;
        let rotation = Affine::rotate(opts.angle_deg.to_radians());

        // The photo outline seen from the rotated frame. Each row only gets the columns whose
        // text can overlap that outline, plus one on each side for partially visible copies.
        let inv = rotation.inverse();
        let (w, h) = (f64::from(width), f64::from(height));
        let outline = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)].map(|(x, y)| inv * Point::new(x, y));
        let min_y = outline.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = outline.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

        let mut anchors = Vec::new();
        let first_row = (min_y / row_step).floor() as i64;
        let last_row = (max_y / row_step).ceil() as i64 + 1;
        for row in first_row..=last_row {
            let y = row as f64 * row_step;
            // Glyphs sit on the baseline and mostly rise above it.
            let Some((lo, hi)) = span_in_band(&outline, y - font_px, y + font_px / 2.0) else {
                continue;
            };
            let cols = (lo / col_step).floor() as i64 - 1..=(hi / col_step).ceil() as i64;
            for col in cols {
                anchors.push(Point::new(col as f64 * col_step, y));
            }
            if anchors.len() > MAX_COPIES {
                return Err(GongjuError::validation(format!(
                    "watermark needs over {MAX_COPIES} copies of the text at {width}x{height}"
                )));
            }
        }
        tracing::debug!(font_px, col_step, row_step, copies = anchors.len(), "watermark layout");

        Ok(Self {
            font_px,
            col_step,
            row_step,
            rotation,
            anchors,
        })
    }
}

/// Horizontal extent of the convex `outline` inside the band `y0..=y1`.
fn span_in_band(outline: &[Point], y0: f64, y1: f64) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for (i, a) in outline.iter().enumerate() {
        let b = outline[(i + 1) % outline.len()];
        if (y0..=y1).contains(&a.y) {
            lo = lo.min(a.x);
            hi = hi.max(a.x);
        }
        for y in [y0, y1] {
            if (a.y - y) * (b.y - y) < 0.0 {
                let x = a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x);
                lo = lo.min(x);
                hi = hi.max(x);
            }
        }
    }
    (lo <= hi).then_some((lo, hi))
}

/// Tile `opts.text` over `photo` at its native resolution.
#[tracing::instrument(skip(photo, fonts), fields(width = photo.width(), height = photo.height()))]
pub fn apply_watermark(
    photo: &RgbaImage,
    opts: &WatermarkOptions,
    fonts: &FontLibrary,
) -> GongjuResult<RgbaImage> {
    let (width, height) = photo.dimensions();
    let layout = WatermarkLayout::new(opts, width, height)?;

    let ink = Rgba8 { a: 0xff, ..opts.color };
    let mut svg = SvgCanvas::new(Canvas::new(width, height)?);
    for at in &layout.anchors {
        let mut run = TextRun::new(&opts.text, *at, layout.font_px, ink);
        run.transform = Some(layout.rotation);
        svg.text(&run);
    }
    let layer = svg.rasterize_premul(fonts)?;

    let mut out = photo.clone();
    overlay_premul_layer(&mut out, &layer, opts.alpha * opts.color.opacity())?;
    Ok(out)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct WatermarkSpec {
    pub image: String,
    #[serde(flatten)]
    pub options: WatermarkOptions,
}

impl Compose for WatermarkSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        self.options.validate()?;
        let photo = ctx.load_input(&self.image)?;
        Ok(Composed::Image(apply_watermark(
            &photo,
            &self.options,
            &ctx.fonts,
        )?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/watermark.rs"]
mod tests;
