//! JSON job files: batches of compositions rendered to disk.

use std::{
    collections::BTreeSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::{
    assets::{decode::save_image, paths::normalize_rel_path, paths::resolve_under},
    compose::{
        Compose, ComposeContext, Composed, banner::BannerSpec, card::CardSpec, clock::ClockSpec,
        glyphs::GlyphTilesSpec, grid::GridSpec, qr::QrSpec, slice::SliceSpec,
        stitch::StitchSpec, watermark::WatermarkSpec,
    },
    foundation::error::{GongjuError, GongjuResult},
};

pub const JOB_FILE_VERSION: &str = "1";

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct JobFile {
    pub version: String,
    pub jobs: Vec<Job>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub id: String,
    /// Output file, or output directory when the job yields tiles.
    pub out: String,
    pub kind: JobKind,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Clock(ClockSpec),
    Qr(QrSpec),
    Watermark(WatermarkSpec),
    Grid(GridSpec),
    Slice(SliceSpec),
    Stitch(StitchSpec),
    Card(CardSpec),
    GlyphTiles(GlyphTilesSpec),
    Banner(BannerSpec),
}

impl JobKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clock(_) => "clock",
            Self::Qr(_) => "qr",
            Self::Watermark(_) => "watermark",
            Self::Grid(_) => "grid",
            Self::Slice(_) => "slice",
            Self::Stitch(_) => "stitch",
            Self::Card(_) => "card",
            Self::GlyphTiles(_) => "glyph_tiles",
            Self::Banner(_) => "banner",
        }
    }

    /// Image inputs referenced by this job, excluding empty grid slots.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Self::Qr(s) => s.logo.as_deref().into_iter().collect(),
            Self::Watermark(s) => vec![s.image.as_str()],
            Self::Grid(s) => s
                .images
                .iter()
                .map(String::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect(),
            Self::Slice(s) => vec![s.image.as_str()],
            Self::Stitch(s) => s.images.iter().map(String::as_str).collect(),
            Self::Clock(_) | Self::Card(_) | Self::GlyphTiles(_) | Self::Banner(_) => Vec::new(),
        }
    }

    fn as_compose(&self) -> &(dyn Compose + Sync) {
        match self {
            Self::Clock(s) => s,
            Self::Qr(s) => s,
            Self::Watermark(s) => s,
            Self::Grid(s) => s,
            Self::Slice(s) => s,
            Self::Stitch(s) => s,
            Self::Card(s) => s,
            Self::GlyphTiles(s) => s,
            Self::Banner(s) => s,
        }
    }
}

impl Compose for JobKind {
    fn compose(&self, ctx: &ComposeContext) -> GongjuResult<Composed> {
        self.as_compose().compose(ctx)
    }
}

impl JobFile {
    pub fn from_json_str(s: &str) -> GongjuResult<Self> {
        serde_json::from_str(s).map_err(|e| GongjuError::serde(format!("parse job file: {e}")))
    }

    pub fn from_path(path: &Path) -> GongjuResult<Self> {
        let f = File::open(path).with_context(|| format!("open job file '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            GongjuError::serde(format!("parse job file '{}': {e}", path.display()))
        })
    }

    pub fn validate(&self) -> GongjuResult<()> {
        if self.version != JOB_FILE_VERSION {
            return Err(GongjuError::validation(format!(
                "unsupported job file version '{}' (expected '{JOB_FILE_VERSION}')",
                self.version
            )));
        }

        let mut seen = BTreeSet::new();
        for job in &self.jobs {
            if job.id.trim().is_empty() {
                return Err(GongjuError::validation("job id must be non-empty"));
            }
            if !seen.insert(job.id.as_str()) {
                return Err(GongjuError::validation(format!(
                    "duplicate job id '{}'",
                    job.id
                )));
            }
            if job.out.trim().is_empty() {
                return Err(GongjuError::validation(format!(
                    "job '{}' has an empty output path",
                    job.id
                )));
            }
            normalize_rel_path(&job.out).map_err(|e| {
                GongjuError::validation(format!("job '{}' output: {e}", job.id))
            })?;
            for input in job.kind.inputs() {
                normalize_rel_path(input).map_err(|e| {
                    GongjuError::validation(format!("job '{}' input '{input}': {e}", job.id))
                })?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Directory job outputs are written under.
    pub out_root: PathBuf,
    /// Worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

/// Outcome of one job; `result` holds the written files on success.
#[derive(Debug)]
pub struct JobReport {
    pub id: String,
    pub kind: &'static str,
    pub result: GongjuResult<Vec<PathBuf>>,
}

impl JobReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Validate `file` and run its jobs in parallel.
///
/// Reports come back in job order. A failing job is reported and does not stop the others.
#[tracing::instrument(skip_all, fields(jobs = file.jobs.len()))]
pub fn run_jobs(
    file: &JobFile,
    ctx: &ComposeContext,
    opts: &RunOptions,
) -> GongjuResult<Vec<JobReport>> {
    file.validate()?;
    let pool = build_thread_pool(opts.threads)?;

    let reports = pool.install(|| {
        file.jobs
            .par_iter()
            .map(|job| {
                let result = run_job(job, ctx, &opts.out_root);
                if let Err(e) = &result {
                    tracing::warn!(id = %job.id, error = %e, "job failed");
                }
                JobReport {
                    id: job.id.clone(),
                    kind: job.kind.name(),
                    result,
                }
            })
            .collect::<Vec<_>>()
    });

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(total = reports.len(), failed, "jobs finished");
    Ok(reports)
}

fn run_job(job: &Job, ctx: &ComposeContext, out_root: &Path) -> GongjuResult<Vec<PathBuf>> {
    let out = resolve_under(out_root, &job.out)?;
    let composed = job.kind.compose(ctx)?;
    tracing::debug!(id = %job.id, images = composed.image_count(), "composed");
    write_composed(&composed, &out)
}

/// Write a single image to `out`, or tiles as `<out>/<name>.png`.
pub fn write_composed(composed: &Composed, out: &Path) -> GongjuResult<Vec<PathBuf>> {
    match composed {
        Composed::Image(img) => {
            save_image(img, out)?;
            Ok(vec![out.to_path_buf()])
        }
        Composed::Tiles(tiles) => {
            std::fs::create_dir_all(out)
                .with_context(|| format!("create tile dir '{}'", out.display()))?;
            tiles
                .iter()
                .map(|t| {
                    let path = out.join(format!("{}.png", t.name));
                    save_image(&t.image, &path)?;
                    Ok(path)
                })
                .collect()
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> GongjuResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(GongjuError::validation("threads must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| GongjuError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/job.rs"]
mod tests;
