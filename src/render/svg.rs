use std::fmt::Write as _;

use anyhow::Context;
use image::RgbaImage;

use crate::{
    assets::fonts::{DEFAULT_FONT_FAMILY, FontLibrary},
    foundation::{
        color::Rgba8,
        core::{Affine, Canvas, Point},
        error::{GongjuError, GongjuResult},
    },
    render::composite::image_from_premul,
};

/// Horizontal anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// Vertical anchoring of a text run relative to its position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Middle,
    Top,
}

/// One line of text to draw.
#[derive(Clone, Debug)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub at: Point,
    pub size_px: f64,
    pub color: Rgba8,
    pub anchor: TextAnchor,
    pub baseline: TextBaseline,
    pub bold: bool,
    /// Applied to the whole run, before `at` is interpreted.
    pub transform: Option<Affine>,
}

impl<'a> TextRun<'a> {
    pub fn new(text: &'a str, at: Point, size_px: f64, color: Rgba8) -> Self {
        Self {
            text,
            at,
            size_px,
            color,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
            bold: false,
            transform: None,
        }
    }
}

/// Retained vector drawing that rasterizes through `resvg`.
///
/// Shapes are pushed in paint order, then [`SvgCanvas::render`] produces pixels.
#[derive(Clone, Debug)]
pub struct SvgCanvas {
    canvas: Canvas,
    body: String,
}

impl SvgCanvas {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            body: String::new(),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba8) {
        let _ = writeln!(
            self.body,
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" {}/>"#,
            paint_attrs("fill", color)
        );
    }

    pub fn fill_circle(&mut self, center: Point, r: f64, color: Rgba8) {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{r}" {}/>"#,
            center.x,
            center.y,
            paint_attrs("fill", color)
        );
    }

    pub fn stroke_circle(&mut self, center: Point, r: f64, color: Rgba8, width: f64) {
        let _ = writeln!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{r}" fill="none" stroke-width="{width}" {}/>"#,
            center.x,
            center.y,
            paint_attrs("stroke", color)
        );
    }

    pub fn stroke_line(&mut self, a: Point, b: Point, color: Rgba8, width: f64) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke-width="{width}" stroke-linecap="round" {}/>"#,
            a.x,
            a.y,
            b.x,
            b.y,
            paint_attrs("stroke", color)
        );
    }

    pub fn text(&mut self, run: &TextRun<'_>) {
        let anchor = match run.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let baseline = match run.baseline {
            TextBaseline::Alphabetic => "auto",
            TextBaseline::Middle => "central",
            TextBaseline::Top => "hanging",
        };
        let weight = if run.bold { "bold" } else { "normal" };
        let transform = run
            .transform
            .map(|a| {
                let [a, b, c, d, e, f] = a.as_coeffs();
                format!(r#" transform="matrix({a} {b} {c} {d} {e} {f})""#)
            })
            .unwrap_or_default();

        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{weight}" text-anchor="{anchor}" dominant-baseline="{baseline}" xml:space="preserve" {}{transform}>{}</text>"#,
            run.at.x,
            run.at.y,
            escape_xml(DEFAULT_FONT_FAMILY),
            run.size_px,
            paint_attrs("fill", run.color),
            escape_xml(run.text)
        );
    }

    pub fn to_svg(&self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n{}</svg>\n",
            self.body,
            w = self.canvas.width,
            h = self.canvas.height,
        )
    }

    /// Rasterize to premultiplied RGBA8 at the canvas size.
    pub fn rasterize_premul(&self, fonts: &FontLibrary) -> GongjuResult<Vec<u8>> {
        let opts = fonts.svg_options();
        let tree = usvg::Tree::from_str(&self.to_svg(), &opts).context("parse generated svg")?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.canvas.width, self.canvas.height)
            .ok_or_else(|| GongjuError::render("failed to allocate pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.take())
    }

    /// Rasterize to a straight-alpha image.
    pub fn render(&self, fonts: &FontLibrary) -> GongjuResult<RgbaImage> {
        let premul = self.rasterize_premul(fonts)?;
        image_from_premul(self.canvas.width, self.canvas.height, premul)
    }
}

fn paint_attrs(kind: &str, color: Rgba8) -> String {
    if color.a == 0xff {
        format!(r#"{kind}="{}""#, color.svg_rgb())
    } else {
        format!(
            r#"{kind}="{}" {kind}-opacity="{}""#,
            color.svg_rgb(),
            color.opacity()
        )
    }
}

pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
