use crate::{
    assets::fonts::FontLibrary,
    compose::{Compose, ComposeContext, Composed, Tile},
    foundation::{
        color::Rgba8,
        core::Canvas,
        error::{GongjuError, GongjuResult},
    },
    render::svg::{SvgCanvas, TextAnchor, TextBaseline, TextRun},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GlyphTileOptions {
    pub side: u32,
    pub font_px: f64,
    pub color: Rgba8,
    pub background: Rgba8,
}

impl Default for GlyphTileOptions {
    fn default() -> Self {
        Self {
            side: 220,
            font_px: 120.0,
            color: Rgba8::BLACK,
            background: Rgba8::WHITE,
        }
    }
}

/// One square tile per visible character of `text`, named `glyph_00`, `glyph_01`, ...
#[tracing::instrument(skip(fonts))]
pub fn render_glyph_tiles(
    text: &str,
    opts: &GlyphTileOptions,
    fonts: &FontLibrary,
) -> GongjuResult<Vec<Tile>> {
    if !opts.font_px.is_finite() || opts.font_px <= 0.0 {
        return Err(GongjuError::validation(
            "glyph font_px must be finite and > 0",
        ));
    }
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(GongjuError::validation(
            "glyph text must contain a visible character",
        ));
    }
    let canvas = Canvas::square(opts.side)?;
    let center = canvas.center();

    let mut tiles = Vec::with_capacity(chars.len());
    let mut buf = [0u8; 4];
    for (i, c) in chars.iter().enumerate() {
        let glyph = c.encode_utf8(&mut buf);
        let mut svg = SvgCanvas::new(canvas);
        svg.fill_rect(
            0.0,
            0.0,
            f64::from(canvas.width),
            f64::from(canvas.height),
            opts.background,
        );
        let mut run = TextRun::new(glyph, center, opts.font_px, opts.color);
        run.anchor = TextAnchor::Middle;
        run.baseline = TextBaseline::Middle;
        run.bold = true;
        svg.text(&run);
        tiles.push(Tile {
            name: format!("glyph_{i:02}"),
            image: svg.render(fonts)?,
        });
    }
    Ok(tiles)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlyphTilesSpec {
    pub text: String,
    #[serde(default)]
    pub options: GlyphTileOptions,
}

impl Compose for GlyphTilesSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        Ok(Composed::Tiles(render_glyph_tiles(
            &self.text,
            &self.options,
            &ctx.fonts,
        )?))
    }
}
