use image::RgbaImage;
use unicode_width::UnicodeWidthChar;

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

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardOptions {
    pub width: u32,
    pub padding: u32,
    pub font_px: f64,
    pub line_height: u32,
    pub color: Rgba8,
    pub background: Rgba8,
    pub bold: bool,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            width: 320,
            padding: 30,
            font_px: 15.0,
            line_height: 30,
            color: Rgba8::BLACK,
            background: Rgba8::WHITE,
            bold: false,
        }
    }
}

impl CardOptions {
    fn text_width(&self) -> GongjuResult<f64> {
        if !self.font_px.is_finite() || self.font_px <= 0.0 {
            return Err(GongjuError::validation("card font_px must be finite and > 0"));
        }
        if self.line_height == 0 {
            return Err(GongjuError::validation("card line_height must be > 0"));
        }
        let inner = f64::from(self.width) - 2.0 * f64::from(self.padding);
        if inner < self.font_px {
            return Err(GongjuError::validation(
                "card width leaves no room for text after padding",
            ));
        }
        Ok(inner)
    }
}

/// Estimated advance of `s` in pixels: wide (CJK) cells count one em, narrow cells half an em.
pub fn estimate_advance(s: &str, font_px: f64) -> f64 {
    let cells: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    cells as f64 * font_px / 2.0
}

/// Break `text` into lines no wider than `max_width`.
///
/// Hard newlines always break. Within a paragraph, characters are added one at a time and a
/// line is closed as soon as the next character would overflow, except that a line always
/// takes at least one character.
pub fn wrap_lines(text: &str, max_width: f64, font_px: f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut line = String::new();
        for c in paragraph.chars() {
            let mut candidate = line.clone();
            candidate.push(c);
            if !line.is_empty() && estimate_advance(&candidate, font_px) > max_width {
                lines.push(std::mem::take(&mut line));
                line.push(c);
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}

/// Card height for `line_count` lines.
pub fn card_height(line_count: usize, opts: &CardOptions) -> u32 {
    let lines = line_count.max(1) as u32;
    2 * opts.padding + lines * opts.line_height
}

#[tracing::instrument(skip(text, fonts), fields(chars = text.chars().count()))]
pub fn render_card(text: &str, opts: &CardOptions, fonts: &FontLibrary) -> GongjuResult<RgbaImage> {
    if text.trim().is_empty() {
        return Err(GongjuError::validation("card text must be non-empty"));
    }
    let max_width = opts.text_width()?;
    let lines = wrap_lines(text, max_width, opts.font_px);
    let height = card_height(lines.len(), opts);
    let canvas = Canvas::new(opts.width, height)?;
    tracing::debug!(lines = lines.len(), height, "card layout");

    let mut svg = SvgCanvas::new(canvas);
    svg.fill_rect(
        0.0,
        0.0,
        f64::from(canvas.width),
        f64::from(canvas.height),
        opts.background,
    );
    let x = f64::from(opts.padding);
    for (i, line) in lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let y = f64::from(opts.padding) + i as f64 * f64::from(opts.line_height);
        let mut run = TextRun::new(line, Point::new(x, y), opts.font_px, opts.color);
        run.baseline = TextBaseline::Top;
        run.bold = opts.bold;
        svg.text(&run);
    }
    svg.render(fonts)
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CardSpec {
    pub text: String,
    #[serde(default)]
    pub options: CardOptions,
}

impl Compose for CardSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        Ok(Composed::Image(render_card(
            &self.text,
            &self.options,
            &ctx.fonts,
        )?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/card.rs"]
mod tests;
