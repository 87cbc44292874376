use image::RgbaImage;

use crate::{
    assets::fonts::FontLibrary,
    compose::{Compose, ComposeContext, Composed},
    foundation::{
        color::Rgba8,
        core::{Canvas, Point},
        error::{GongjuError, GongjuResult},
    },
    render::svg::{SvgCanvas, TextBaseline, TextRun},
};

/// Canvas width the glyph metrics below are expressed in.
const REFERENCE_WIDTH: f64 = 525.0;
const EQUAL_FONT_PX: f64 = 37.0;

/// How character sizes evolve along the line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerMode {
    /// Every character is one step larger than the one before it, like a rising shout.
    #[default]
    Gradually,
    /// Every character has the same size.
    Equal,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BannerOptions {
    pub mode: BannerMode,
    pub width: u32,
    pub height: u32,
    pub color: Rgba8,
    pub background: Rgba8,
}

impl Default for BannerOptions {
    fn default() -> Self {
        Self {
            mode: BannerMode::default(),
            width: 525,
            height: 290,
            color: Rgba8::BLACK,
            background: Rgba8::WHITE,
        }
    }
}

/// One character drawn on the banner, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BannerGlyph {
    pub ch: char,
    pub at: Point,
    pub size_px: f64,
}

/// Place every character of `text`, dropping those that start past the right edge.
pub fn banner_layout(text: &str, opts: &BannerOptions) -> GongjuResult<Vec<BannerGlyph>> {
    if text.trim().is_empty() {
        return Err(GongjuError::validation("banner text must be non-empty"));
    }
    let canvas = Canvas::new(opts.width, opts.height)?;
    let scale = f64::from(canvas.width) / REFERENCE_WIDTH;

    let glyphs: Vec<_> = text
        .chars()
        .filter(|c| !c.is_control())
        .enumerate()
        .map(|(i, ch)| {
            let n = i as f64;
            let (x, y, size) = match opts.mode {
                BannerMode::Gradually => (n * (2.0 * n + 18.0), 29.5, 4.0 * n + 18.0),
                BannerMode::Equal => (EQUAL_FONT_PX * n, 45.0, EQUAL_FONT_PX),
            };
            BannerGlyph {
                ch,
                at: Point::new(x * scale, y * scale),
                size_px: size * scale,
            }
        })
        .take_while(|g| g.at.x < f64::from(canvas.width))
        .collect();
    Ok(glyphs)
}

#[tracing::instrument(skip(text, fonts), fields(chars = text.chars().count(), mode = ?opts.mode))]
pub fn render_banner(
    text: &str,
    opts: &BannerOptions,
    fonts: &FontLibrary,
) -> GongjuResult<RgbaImage> {
    let glyphs = banner_layout(text, opts)?;
    tracing::debug!(drawn = glyphs.len(), "banner layout");

    let canvas = Canvas::new(opts.width, opts.height)?;
    let mut svg = SvgCanvas::new(canvas);
    svg.fill_rect(
        0.0,
        0.0,
        f64::from(canvas.width),
        f64::from(canvas.height),
        opts.background,
    );
    let scale = f64::from(canvas.width) / REFERENCE_WIDTH;
    let mut buf = [0u8; 4];
    for g in &glyphs {
        let s = g.ch.encode_utf8(&mut buf);
        let mut run = TextRun::new(s, g.at, g.size_px, opts.color);
        run.baseline = TextBaseline::Top;
        svg.text(&run);
        if opts.mode == BannerMode::Gradually {
            // Second pass half a unit left and down thickens the strokes.
            run.at = Point::new(g.at.x - 0.5 * scale, g.at.y + 0.5 * scale);
            svg.text(&run);
        }
    }
    svg.render(fonts)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BannerSpec {
    pub text: String,
    #[serde(default)]
    pub options: BannerOptions,
}

impl Compose for BannerSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        Ok(Composed::Image(render_banner(
            &self.text,
            &self.options,
            &ctx.fonts,
        )?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/banner.rs"]
mod tests;
