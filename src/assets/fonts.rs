use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use usvg::fontdb::{Database, Family, Query, Stretch, Style, Weight};

/// Family list used for every piece of text gongju draws. CJK faces come first so that
/// currency text and watermarks resolve to a face with Han coverage.
pub const DEFAULT_FONT_FAMILY: &str =
    "'Noto Sans CJK SC', 'Source Han Sans SC', 'PingFang SC', 'Microsoft YaHei', sans-serif";

/// Han-capable families tried after whatever the text asked for.
const CJK_FAMILIES: [&str; 4] = [
    "Noto Sans CJK SC",
    "Source Han Sans SC",
    "PingFang SC",
    "Microsoft YaHei",
];

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Font database shared by every text-drawing composition.
///
/// Loading system fonts is slow, so build one library up front and share it (it is cheap to
/// clone) rather than constructing one per image.
#[derive(Clone, Debug)]
pub struct FontLibrary {
    db: Arc<Database>,
}

/// A face picked by [`FontLibrary::resolve_family`].
#[derive(Clone, Debug)]
pub struct ResolvedFace {
    pub family: String,
    pub bytes: Vec<u8>,
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::system()
    }
}

impl FontLibrary {
    /// No fonts at all. Text renders as nothing; shapes still render.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(Database::new()),
        }
    }

    pub fn system() -> Self {
        Self::with_dirs::<&Path>(&[])
    }

    /// System fonts plus every `.ttf`/`.otf`/`.ttc` directly inside each of `dirs`.
    pub fn with_dirs<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        for path in dirs.iter().flat_map(|dir| font_files(dir.as_ref())) {
            if let Err(err) = db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), %err, "skipping font");
            }
        }
        tracing::debug!(faces = db.len(), "font database ready");
        Self { db: Arc::new(db) }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Resolve `family` the same way text drawing does, falling back to any sans face.
    pub fn resolve_family(&self, family: &str) -> Option<ResolvedFace> {
        let families = [Family::Name(family), Family::SansSerif];
        let id = self.db.query(&upright_query(&families, Weight::NORMAL))?;
        let face = self.db.face(id)?;
        let family = face
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| face.post_script_name.clone());
        let bytes = self.db.with_face_data(id, |data, _| data.to_vec())?;
        Some(ResolvedFace { family, bytes })
    }

    pub(crate) fn svg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: Arc::clone(&self.db),
            font_resolver: make_font_resolver(),
            ..Default::default()
        }
    }
}

/// Font files directly inside `dir`; an unreadable directory yields none.
fn font_files(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_font_extension(path))
            .collect(),
        Err(err) => {
            tracing::warn!(dir = %dir.display(), %err, "font directory not readable");
            Vec::new()
        }
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FONT_EXTENSIONS.iter().any(|f| ext.eq_ignore_ascii_case(f)))
}

// Drawing never asks for slanted or condensed faces.
fn upright_query<'a>(families: &'a [Family<'a>], weight: Weight) -> Query<'a> {
    Query {
        families,
        weight,
        stretch: Stretch::Normal,
        style: Style::Normal,
    }
}

fn generic_family(family: &usvg::FontFamily) -> Family<'_> {
    match family {
        usvg::FontFamily::Serif => Family::Serif,
        usvg::FontFamily::SansSerif => Family::SansSerif,
        usvg::FontFamily::Cursive => Family::Cursive,
        usvg::FontFamily::Fantasy => Family::Fantasy,
        usvg::FontFamily::Monospace => Family::Monospace,
        usvg::FontFamily::Named(name) => Family::Name(name),
    }
}

/// Requested families, then the CJK list, then any sans face, then the first face loaded.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, db| {
            let families: Vec<_> = font
                .families()
                .iter()
                .map(generic_family)
                .chain(CJK_FAMILIES.map(Family::Name))
                .chain([Family::SansSerif])
                .collect();
            db.query(&upright_query(&families, Weight(font.weight())))
                .or_else(|| db.faces().next().map(|face| face.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}
