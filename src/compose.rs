//! Image compositions: each one is a plain-data job struct plus a pure function producing pixels.

pub(crate) mod banner;
pub(crate) mod card;
pub(crate) mod clock;
pub(crate) mod glyphs;
pub(crate) mod grid;
pub(crate) mod qr;
pub(crate) mod slice;
pub(crate) mod stitch;
pub(crate) mod watermark;

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::{
    assets::{decode::load_image, fonts::FontLibrary, paths::resolve_under},
    foundation::error::GongjuResult,
};

/// Shared inputs for every composition.
#[derive(Clone, Debug)]
pub struct ComposeContext {
    pub fonts: FontLibrary,
    /// When set, image inputs must be relative and are resolved under this directory.
    pub asset_root: Option<PathBuf>,
}

impl ComposeContext {
    pub fn new(fonts: FontLibrary) -> Self {
        Self {
            fonts,
            asset_root: None,
        }
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(root.into());
        self
    }

    pub fn resolve_input(&self, source: &str) -> GongjuResult<PathBuf> {
        match &self.asset_root {
            Some(root) => resolve_under(root, source),
            None => Ok(Path::new(source).to_path_buf()),
        }
    }

    pub fn load_input(&self, source: &str) -> GongjuResult<RgbaImage> {
        load_image(&self.resolve_input(source)?)
    }
}

/// A named output image belonging to a multi-image result.
#[derive(Clone, Debug)]
pub struct Tile {
    pub name: String,
    pub image: RgbaImage,
}

/// Output of a composition.
#[derive(Clone, Debug)]
pub enum Composed {
    Image(RgbaImage),
    Tiles(Vec<Tile>),
}

impl Composed {
    pub fn image_count(&self) -> usize {
        match self {
            Self::Image(_) => 1,
            Self::Tiles(t) => t.len(),
        }
    }
}

/// Something that can be turned into pixels given fonts and an input root.
pub trait Compose {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed>;
}
