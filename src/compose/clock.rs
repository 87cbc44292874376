use std::f64::consts::PI;

use image::RgbaImage;
use time::macros::format_description;

use crate::{
    assets::fonts::FontLibrary,
    compose::{Compose, ComposeContext, Composed},
    foundation::{
        color::Rgba8,
        core::{Canvas, Point, dial_affine},
        error::{GongjuError, GongjuResult},
    },
    render::svg::{SvgCanvas, TextAnchor, TextBaseline, TextRun},
};

pub const MIN_CLOCK_SIDE: u32 = 120;

/// Wall-clock time shown on the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8, second: u8) -> GongjuResult<Self> {
        let t = Self {
            hour,
            minute,
            second,
        };
        t.validate()?;
        Ok(t)
    }

    pub fn validate(self) -> GongjuResult<()> {
        if self.hour >= 24 || self.minute >= 60 || self.second >= 60 {
            return Err(GongjuError::validation(format!(
                "invalid clock time {:02}:{:02}:{:02}",
                self.hour, self.minute, self.second
            )));
        }
        Ok(())
    }

    /// Parse `HH:MM:SS` or `HH:MM`.
    pub fn parse(s: &str) -> GongjuResult<Self> {
        let with_secs = format_description!("[hour]:[minute]:[second]");
        let without_secs = format_description!("[hour]:[minute]");
        let t = time::Time::parse(s.trim(), &with_secs)
            .or_else(|_| time::Time::parse(s.trim(), &without_secs))
            .map_err(|e| GongjuError::validation(format!("invalid clock time '{s}': {e}")))?;
        Ok(Self::from(t))
    }
}

impl From<time::Time> for ClockTime {
    fn from(t: time::Time) -> Self {
        Self {
            hour: t.hour(),
            minute: t.minute(),
            second: t.second(),
        }
    }
}

/// Colours and size of the clock face.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClockStyle {
    pub side: u32,
    pub background: Rgba8,
    pub ink: Rgba8,
    pub second_hand: Rgba8,
    pub numerals: bool,
}

impl Default for ClockStyle {
    fn default() -> Self {
        Self {
            side: 375,
            background: Rgba8::WHITE,
            ink: Rgba8::BLACK,
            second_hand: Rgba8::BLACK,
            numerals: true,
        }
    }
}

/// A straight stroke of the face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub from: Point,
    pub to: Point,
    pub width: f64,
}

/// Everything needed to draw a face, in canvas pixels.
#[derive(Clone, Debug)]
pub struct ClockGeometry {
    pub center: Point,
    pub rim_radius: f64,
    pub hub_radius: f64,
    pub numerals: Vec<(u8, Point)>,
    pub minute_ticks: Vec<Stroke>,
    pub hour_ticks: Vec<Stroke>,
    pub hour_hand: Stroke,
    pub minute_hand: Stroke,
    pub second_hand: Stroke,
}

/// Hands start this far behind the centre.
const HAND_TAIL: f64 = 20.0;

impl ClockGeometry {
    pub fn new(time: ClockTime, side: u32) -> GongjuResult<Self> {
        time.validate()?;
        if side < MIN_CLOCK_SIDE {
            return Err(GongjuError::validation(format!(
                "clock side must be >= {MIN_CLOCK_SIDE}"
            )));
        }
        let canvas = Canvas::square(side)?;
        let w = f64::from(side);
        let center = canvas.center();
        let rim_radius = w / 2.0 - 30.0;
        let numeral_radius = w / 2.0 - 55.0;

        let radial = |angle: f64, r0: f64, r1: f64, width: f64| {
            let a = dial_affine(center, angle);
            Stroke {
                from: a * Point::new(r0, 0.0),
                to: a * Point::new(r1, 0.0),
                width,
            }
        };

        let numerals = (1..=12u8)
            .map(|n| {
                let a = dial_affine(center, f64::from(n) * PI / 6.0);
                (n, a * Point::new(numeral_radius, 0.0))
            })
            .collect();
        let minute_ticks = (0..60)
            .map(|k| radial(f64::from(k) * PI / 30.0, rim_radius, w / 2.0 - 40.0, 1.0))
            .collect();
        let hour_ticks = (0..12)
            .map(|k| radial(f64::from(k) * PI / 6.0, rim_radius, w / 2.0 - 45.0, 5.0))
            .collect();

        let h = f64::from(time.hour % 12);
        let m = f64::from(time.minute);
        let s = f64::from(time.second);
        let hour_angle = PI / 6.0 * (h + m / 60.0 + s / 3600.0);
        let minute_angle = PI / 30.0 * (m + s / 60.0);
        let second_angle = PI / 30.0 * s;

        let geometry = Self {
            center,
            rim_radius,
            hub_radius: 8.0,
            numerals,
            minute_ticks,
            hour_ticks,
            hour_hand: radial(hour_angle, -HAND_TAIL, w / 4.5 - HAND_TAIL, 7.0),
            minute_hand: radial(minute_angle, -HAND_TAIL, w / 3.5 - HAND_TAIL, 5.0),
            second_hand: radial(second_angle, -HAND_TAIL, w / 3.0 - HAND_TAIL, 2.0),
        };
        tracing::debug!(
            hour_angle,
            minute_angle,
            second_angle,
            rim_radius,
            "clock geometry"
        );
        Ok(geometry)
    }
}

#[tracing::instrument(skip(fonts))]
pub fn render_clock(
    time: ClockTime,
    style: &ClockStyle,
    fonts: &FontLibrary,
) -> GongjuResult<RgbaImage> {
    let g = ClockGeometry::new(time, style.side)?;
    let canvas = Canvas::square(style.side)?;
    let w = f64::from(style.side);

    let mut svg = SvgCanvas::new(canvas);
    svg.fill_rect(0.0, 0.0, w, w, style.background);
    svg.stroke_circle(g.center, g.rim_radius, style.ink, 2.0);
    svg.stroke_circle(g.center, g.hub_radius, style.ink, 2.0);

    if style.numerals {
        for (n, at) in &g.numerals {
            let label = n.to_string();
            let mut run = TextRun::new(&label, *at, 20.0, style.ink);
            run.anchor = TextAnchor::Middle;
            run.baseline = TextBaseline::Middle;
            svg.text(&run);
        }
    }

    for t in g.minute_ticks.iter().chain(&g.hour_ticks) {
        svg.stroke_line(t.from, t.to, style.ink, t.width);
    }
    for hand in [g.hour_hand, g.minute_hand] {
        svg.stroke_line(hand.from, hand.to, style.ink, hand.width);
    }
    svg.stroke_line(
        g.second_hand.from,
        g.second_hand.to,
        style.second_hand,
        g.second_hand.width,
    );

    svg.render(fonts)
}

/// Job form of [`render_clock`]. A missing `time` means "now" in local time.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ClockSpec {
    #[serde(default)]
    pub time: Option<ClockTime>,
    #[serde(default)]
    pub style: ClockStyle,
}

impl Compose for ClockSpec {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        let time = self
            .time
            .unwrap_or_else(|| ClockTime::from(crate::progress::local_now().time()));
        Ok(Composed::Image(render_clock(time, &self.style, &ctx.fonts)?))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/clock.rs"]
mod tests;
