//! Gongju is a small toolbox of everyday converters and image compositions.
//!
//! - Spell out amounts as Chinese currency text ([`to_currency_text`], [`AmountKeypad`])
//! - Render images: clock faces, QR codes, watermarks, 3x3 collages, slices, stitched strips,
//!   text cards, glyph tiles and growing-text banners (see [`Compose`])
//! - Run batches of those compositions from a JSON [`JobFile`]
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod render;

pub(crate) mod compose;
pub(crate) mod job;
pub(crate) mod numeral;
pub(crate) mod progress;

pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, Canvas, MAX_DIM, Point, Vec2};
pub use crate::foundation::error::{GongjuError, GongjuResult};

pub use crate::assets::decode::{decode_image, encode_png, load_image, save_image};
pub use crate::assets::fonts::{DEFAULT_FONT_FAMILY, FontLibrary, ResolvedFace};
pub use crate::assets::paths::{normalize_rel_path, resolve_under};
pub use crate::render::svg::{SvgCanvas, TextAnchor, TextBaseline, TextRun};

pub use crate::compose::banner::{
    BannerGlyph, BannerMode, BannerOptions, BannerSpec, banner_layout, render_banner,
};
pub use crate::compose::card::{CardOptions, CardSpec, render_card, wrap_lines};
pub use crate::compose::clock::{ClockSpec, ClockStyle, ClockTime, MIN_CLOCK_SIDE, render_clock};
pub use crate::compose::glyphs::{GlyphTileOptions, GlyphTilesSpec, render_glyph_tiles};
pub use crate::compose::grid::{GRID_CELLS, GridGap, GridOptions, GridSpec, compose_grid};
pub use crate::compose::qr::{QrEcLevel, QrMatrix, QrOptions, QrSpec, render_qr};
pub use crate::compose::slice::{DEFAULT_SLICE_SIDE, SliceSpec, slice_grid};
pub use crate::compose::stitch::{StitchDirection, StitchOptions, StitchSpec, stitch};
pub use crate::compose::watermark::{WatermarkOptions, WatermarkSpec, apply_watermark};
pub use crate::compose::{Compose, ComposeContext, Composed, Tile};

pub use crate::job::{
    JOB_FILE_VERSION, Job, JobFile, JobKind, JobReport, RunOptions, run_jobs, write_composed,
};
pub use crate::numeral::{
    Amount, AmountKeypad, KEYPAD_MAX_LEN, KeypadKey, NumeralError, NumeralStyle,
    to_currency_text, to_numeral,
};
pub use crate::progress::{DayProgress, local_now};
