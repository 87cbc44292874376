use crate::foundation::error::{GongjuError, GongjuResult};

pub use kurbo::{Affine, Point, Vec2};

/// Largest raster edge any composition may allocate.
pub const MAX_DIM: u32 = 16_384;

/// Pixel dimensions of an output raster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> GongjuResult<Self> {
        if width == 0 || height == 0 {
            return Err(GongjuError::validation("canvas width/height must be > 0"));
        }
        if width > MAX_DIM || height > MAX_DIM {
            return Err(GongjuError::validation(format!(
                "canvas size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn square(side: u32) -> GongjuResult<Self> {
        Self::new(side, side)
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Rotation about `center` by `angle` radians measured clockwise from 12 o'clock, in y-down
/// raster space. The local +x axis then points along the rotated direction.
pub fn dial_affine(center: Point, angle: f64) -> Affine {
    Affine::translate(center.to_vec2()) * Affine::rotate(angle - std::f64::consts::FRAC_PI_2)
}
