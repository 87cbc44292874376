use image::{RgbaImage, imageops};
use qrcode::{Color, EcLevel, QrCode};

use crate::{
    compose::{Compose, ComposeContext, Composed},
    foundation::{
        color::Rgba8,
        core::Canvas,
        error::{GongjuError, GongjuResult},
    },
};

/// The logo may cover at most this fraction of the code's side.
const LOGO_MAX_FRACTION: f64 = 0.2;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QrEcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<QrEcLevel> for EcLevel {
    fn from(level: QrEcLevel) -> Self {
        match level {
            QrEcLevel::L => EcLevel::L,
            QrEcLevel::M => EcLevel::M,
            QrEcLevel::Q => EcLevel::Q,
            QrEcLevel::H => EcLevel::H,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Edge length of one module in pixels.
    pub module_px: u32,
    /// Light border around the symbol, in modules.
    pub quiet_zone: u32,
    pub foreground: Rgba8,
    pub background: Rgba8,
    pub ec_level: QrEcLevel,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            module_px: 8,
            quiet_zone: 4,
            foreground: Rgba8::BLACK,
            background: Rgba8::WHITE,
            ec_level: QrEcLevel::M,
        }
    }
}

/// Encoded symbol as a square grid of dark/light modules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrMatrix {
    pub width: usize,
    pub dark: Vec<bool>,
}

impl QrMatrix {
    pub fn encode(text: &str, level: QrEcLevel) -> GongjuResult<Self> {
        if text.is_empty() {
            return Err(GongjuError::validation("qr text must be non-empty"));
        }
        let code = QrCode::with_error_correction_level(text.as_bytes(), level.into())
            .map_err(|e| GongjuError::validation(format!("cannot encode qr code: {e}")))?;
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == Color::Dark)
            .collect();
        Ok(Self {
            width: code.width(),
            dark,
        })
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.dark[y * self.width + x]
    }
}

/// Render `text` as a QR code, optionally with `logo` centred on top.
///
/// A logo hides modules, so the error-correction level is raised to at least Q when one is given.
#[tracing::instrument(skip(logo), fields(has_logo = logo.is_some()))]
pub fn render_qr(
    text: &str,
    opts: &QrOptions,
    logo: Option<&RgbaImage>,
) -> GongjuResult<RgbaImage> {
    if opts.module_px == 0 {
        return Err(GongjuError::validation("qr module_px must be > 0"));
    }
    let level = if logo.is_some() {
        opts.ec_level.max(QrEcLevel::Q)
    } else {
        opts.ec_level
    };
    let matrix = QrMatrix::encode(text, level)?;

    let modules = u32::try_from(matrix.width)
        .ok()
        .and_then(|w| w.checked_add(opts.quiet_zone.checked_mul(2)?))
        .ok_or_else(|| GongjuError::validation("qr quiet zone too large"))?;
    let side = modules
        .checked_mul(opts.module_px)
        .ok_or_else(|| GongjuError::validation("qr image too large"))?;
    let canvas = Canvas::square(side)?;
    tracing::debug!(modules = matrix.width, ?level, side, "qr symbol");

    let fg = opts.foreground.to_image();
    let mut out = RgbaImage::from_pixel(canvas.width, canvas.height, opts.background.to_image());
    let m = opts.module_px;
    for y in 0..matrix.width {
        for x in 0..matrix.width {
            if !matrix.is_dark(x, y) {
                continue;
            }
            let px = (x as u32 + opts.quiet_zone) * m;
            let py = (y as u32 + opts.quiet_zone) * m;
            for dy in 0..m {
                for dx in 0..m {
                    out.put_pixel(px + dx, py + dy, fg);
                }
            }
        }
    }

    if let Some(logo) = logo {
        place_logo(&mut out, logo, matrix.width as u32 * m, opts)?;
    }
    Ok(out)
}

fn place_logo(
    out: &mut RgbaImage,
    logo: &RgbaImage,
    symbol_px: u32,
    opts: &QrOptions,
) -> GongjuResult<()> {
    let (lw, lh) = logo.dimensions();
    if lw == 0 || lh == 0 {
        return Err(GongjuError::validation("qr logo must be non-empty"));
    }
    let max = f64::from(symbol_px) * LOGO_MAX_FRACTION;
    let scale = (max / f64::from(lw.max(lh))).min(1.0);
    // Round down so the logo never exceeds its share of the symbol.
    let fit = |len: u32| ((f64::from(len) * scale).floor() as u32).max(1);
    let (w, h) = (fit(lw), fit(lh));
    let scaled = imageops::resize(logo, w, h, imageops::FilterType::Lanczos3);

    // Plate in the background colour so the logo does not sit directly on modules.
    let pad = opts.module_px;
    let plate = RgbaImage::from_pixel(w + 2 * pad, h + 2 * pad, opts.background.to_image());
    let cx = i64::from(out.width()) / 2;
    let cy = i64::from(out.height()) / 2;
    imageops::overlay(
        out,
        &plate,
        cx - i64::from(plate.width()) / 2,
        cy - i64::from(plate.height()) / 2,
    );
    imageops::overlay(out, &scaled, cx - i64::from(w) / 2, cy - i64::from(h) / 2);
    Ok(())
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct QrSpec {
    pub text: String,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub options: QrOptions,
}

impl Compose for QrSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        let logo = self
            .logo
            .as_deref()
            .map(|src| ctx.load_input(src))
            .transpose()?;
        Ok(Composed::Image(render_qr(
            &self.text,
            &self.options,
            logo.as_ref(),
        )?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/qr.rs"]
mod tests;
