use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

use gongju::{
    BannerMode, BannerOptions, CardOptions, ClockStyle, ClockTime, ComposeContext, FontLibrary,
    GlyphTileOptions, GridGap, GridOptions, QrEcLevel, QrOptions, Rgba8, StitchDirection,
    StitchOptions, WatermarkOptions,
};

#[derive(Parser, Debug)]
#[command(name = "gongju", version)]
struct Cli {
    /// Extra directories to load `.ttf`/`.otf`/`.ttc` fonts from.
    #[arg(long = "font-dir", global = true)]
    font_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Spell out an amount as Chinese currency text.
    Currency(CurrencyArgs),
    /// Print how far through the year, month and day we are.
    Progress,
    /// Draw an analog clock face.
    Clock(ClockArgs),
    /// Render text as a QR code.
    Qr(QrArgs),
    /// Tile a tilted text watermark over a photo.
    Watermark(WatermarkArgs),
    /// Arrange up to nine images on a 3x3 grid.
    Grid(GridArgs),
    /// Cut an image into an n x n grid of tiles.
    Slice(SliceArgs),
    /// Join images into one long strip.
    Stitch(StitchArgs),
    /// Render text onto a plain card.
    Card(CardArgs),
    /// Render each character as its own square tile.
    Glyphs(GlyphsArgs),
    /// Draw a line of text whose characters grow one after another.
    Banner(BannerArgs),
    /// Run every job in a JSON job file.
    Batch(BatchArgs),
    /// Print font database diagnostics.
    Fonts(FontsArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleChoice {
    Financial,
    Plain,
}

#[derive(Parser, Debug)]
struct CurrencyArgs {
    /// Decimal amount, e.g. `1001.5`.
    #[arg(allow_hyphen_values = true)]
    amount: String,

    #[arg(long, value_enum, default_value_t = StyleChoice::Financial)]
    style: StyleChoice,
}

#[derive(Parser, Debug)]
struct ClockArgs {
    /// `HH:MM` or `HH:MM:SS`; defaults to the local time.
    #[arg(long)]
    time: Option<String>,

    #[arg(long, default_value_t = 375)]
    side: u32,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EcChoice {
    L,
    M,
    Q,
    H,
}

#[derive(Parser, Debug)]
struct QrArgs {
    text: String,

    /// Image drawn in the centre of the code.
    #[arg(long)]
    logo: Option<PathBuf>,

    #[arg(long, default_value_t = 8)]
    module_px: u32,

    #[arg(long, value_enum, default_value_t = EcChoice::M)]
    ec: EcChoice,

    #[arg(long, default_value = "#000000")]
    foreground: Rgba8,

    #[arg(long, default_value = "#ffffff")]
    background: Rgba8,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct WatermarkArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    text: String,

    /// Palette name (gray, red, ...) or `#rrggbb`.
    #[arg(long, default_value = "gray")]
    color: Rgba8,

    #[arg(long, default_value_t = 0.5)]
    alpha: f32,

    #[arg(long, default_value_t = 30.0)]
    angle: f64,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct GridArgs {
    /// Images in reading order; `-` leaves a slot empty.
    #[arg(required = true, num_args = 1..=9)]
    images: Vec<String>,

    #[arg(long, default_value_t = 680)]
    side: u32,

    /// Gap in design units (presets: 0, 2, 6, 10, 15, 20).
    #[arg(long, default_value_t = 10.0, conflicts_with = "gap_px")]
    gap: f64,

    /// Gap in output pixels.
    #[arg(long)]
    gap_px: Option<u32>,

    #[arg(long, default_value = "white")]
    background: Rgba8,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SliceArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value_t = 3)]
    n: u32,

    /// Output directory for `tile_<row>_<col>.png`.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Vertical,
    Horizontal,
}

#[derive(Parser, Debug)]
struct StitchArgs {
    #[arg(required = true)]
    images: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = DirectionChoice::Vertical)]
    direction: DirectionChoice,

    /// Shared width (vertical) or height (horizontal).
    #[arg(long)]
    extent: Option<u32>,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CardArgs {
    text: String,

    #[arg(long, default_value_t = 320)]
    width: u32,

    #[arg(long, default_value_t = 15.0)]
    font_px: f64,

    #[arg(long, default_value = "#000000")]
    color: Rgba8,

    #[arg(long, default_value = "#ffffff")]
    background: Rgba8,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct GlyphsArgs {
    text: String,

    #[arg(long, default_value = "#000000")]
    color: Rgba8,

    #[arg(long, default_value = "#ffffff")]
    background: Rgba8,

    /// Output directory for `glyph_<nn>.png`.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BannerModeChoice {
    Gradually,
    Equal,
}

#[derive(Parser, Debug)]
struct BannerArgs {
    text: String,

    #[arg(long, value_enum, default_value_t = BannerModeChoice::Gradually)]
    mode: BannerModeChoice,

    #[arg(long, default_value_t = 525)]
    width: u32,

    #[arg(long, default_value_t = 290)]
    height: u32,

    #[arg(long, default_value = "black")]
    color: Rgba8,

    #[arg(long, default_value = "white")]
    background: Rgba8,

    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input job file JSON. Relative paths inside it resolve against its directory.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FontsArgs {
    /// Families to resolve; defaults to the CJK family list used for drawing.
    #[arg(long = "family")]
    families: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let fonts = || FontLibrary::with_dirs(cli.font_dirs.as_slice());
    match cli.cmd {
        Command::Currency(args) => cmd_currency(args),
        Command::Progress => cmd_progress(),
        Command::Clock(args) => cmd_clock(args, &fonts()),
        Command::Qr(args) => cmd_qr(args),
        Command::Watermark(args) => cmd_watermark(args, &fonts()),
        Command::Grid(args) => cmd_grid(args),
        Command::Slice(args) => cmd_slice(args),
        Command::Stitch(args) => cmd_stitch(args),
        Command::Card(args) => cmd_card(args, &fonts()),
        Command::Glyphs(args) => cmd_glyphs(args, &fonts()),
        Command::Banner(args) => cmd_banner(args, &fonts()),
        Command::Batch(args) => cmd_batch(args, fonts()),
        Command::Fonts(args) => cmd_fonts(args, &fonts()),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GONGJU_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_currency(args: CurrencyArgs) -> anyhow::Result<()> {
    let style = match args.style {
        StyleChoice::Financial => gongju::NumeralStyle::Financial,
        StyleChoice::Plain => gongju::NumeralStyle::Plain,
    };
    let text = gongju::to_currency_text(&args.amount, style)
        .with_context(|| format!("convert amount '{}'", args.amount))?;
    println!("{text}");
    Ok(())
}

fn cmd_progress() -> anyhow::Result<()> {
    let p = gongju::DayProgress::at(gongju::local_now());
    println!("{:04}-{:02}-{:02}", p.year, p.month, p.day);
    println!("year:  {:>3}%", p.year_pct);
    println!("month: {:>3}%", p.month_pct);
    println!("day:   {:>3}%", p.day_pct);
    Ok(())
}

fn cmd_clock(args: ClockArgs, fonts: &FontLibrary) -> anyhow::Result<()> {
    let time = match args.time.as_deref() {
        Some(s) => ClockTime::parse(s)?,
        None => ClockTime::from(gongju::local_now().time()),
    };
    let style = ClockStyle {
        side: args.side,
        ..ClockStyle::default()
    };
    let img = gongju::render_clock(time, &style, fonts)?;
    write_image(&img, &args.out)
}

fn cmd_qr(args: QrArgs) -> anyhow::Result<()> {
    let logo = args
        .logo
        .as_deref()
        .map(gongju::load_image)
        .transpose()?;
    let opts = QrOptions {
        module_px: args.module_px,
        foreground: args.foreground,
        background: args.background,
        ec_level: match args.ec {
            EcChoice::L => QrEcLevel::L,
            EcChoice::M => QrEcLevel::M,
            EcChoice::Q => QrEcLevel::Q,
            EcChoice::H => QrEcLevel::H,
        },
        ..QrOptions::default()
    };
    let img = gongju::render_qr(&args.text, &opts, logo.as_ref())?;
    write_image(&img, &args.out)
}

fn cmd_watermark(args: WatermarkArgs, fonts: &FontLibrary) -> anyhow::Result<()> {
    let opts = WatermarkOptions {
        text: args.text,
        color: args.color,
        alpha: args.alpha,
        angle_deg: args.angle,
    };
    opts.validate()?;
    let photo = gongju::load_image(&args.in_path)?;
    let img = gongju::apply_watermark(&photo, &opts, fonts)?;
    write_image(&img, &args.out)
}

fn cmd_grid(args: GridArgs) -> anyhow::Result<()> {
    let cells = args
        .images
        .iter()
        .map(|src| {
            if src == "-" {
                Ok(None)
            } else {
                gongju::load_image(Path::new(src)).map(Some)
            }
        })
        .collect::<gongju::GongjuResult<Vec<_>>>()?;
    let opts = GridOptions {
        side: args.side,
        gap: match args.gap_px {
            Some(px) => GridGap::Pixels(px),
            None => GridGap::Design(args.gap),
        },
        background: args.background,
    };
    let img = gongju::compose_grid(&cells, &opts)?;
    write_image(&img, &args.out)
}

fn cmd_slice(args: SliceArgs) -> anyhow::Result<()> {
    let img = gongju::load_image(&args.in_path)?;
    let tiles = gongju::slice_grid(&img, args.n)?;
    write_composed(&gongju::Composed::Tiles(tiles), &args.out)
}

fn cmd_stitch(args: StitchArgs) -> anyhow::Result<()> {
    let images = args
        .images
        .iter()
        .map(|p| gongju::load_image(p))
        .collect::<gongju::GongjuResult<Vec<_>>>()?;
    let opts = StitchOptions {
        direction: match args.direction {
            DirectionChoice::Vertical => StitchDirection::Vertical,
            DirectionChoice::Horizontal => StitchDirection::Horizontal,
        },
        extent: args.extent,
        background: None,
    };
    let img = gongju::stitch(&images, &opts)?;
    write_image(&img, &args.out)
}

fn cmd_card(args: CardArgs, fonts: &FontLibrary) -> anyhow::Result<()> {
    // Shells hand over a literal backslash-n; treat it as a line break.
    let text = args.text.replace("\\n", "\n");
    let opts = CardOptions {
        width: args.width,
        font_px: args.font_px,
        color: args.color,
        background: args.background,
        ..CardOptions::default()
    };
    let img = gongju::render_card(&text, &opts, fonts)?;
    write_image(&img, &args.out)
}

fn cmd_glyphs(args: GlyphsArgs, fonts: &FontLibrary) -> anyhow::Result<()> {
    let opts = GlyphTileOptions {
        color: args.color,
        background: args.background,
        ..GlyphTileOptions::default()
    };
    let tiles = gongju::render_glyph_tiles(&args.text, &opts, fonts)?;
    write_composed(&gongju::Composed::Tiles(tiles), &args.out)
}

fn cmd_banner(args: BannerArgs, fonts: &FontLibrary) -> anyhow::Result<()> {
    let opts = BannerOptions {
        mode: match args.mode {
            BannerModeChoice::Gradually => BannerMode::Gradually,
            BannerModeChoice::Equal => BannerMode::Equal,
        },
        width: args.width,
        height: args.height,
        color: args.color,
        background: args.background,
    };
    let img = gongju::render_banner(&args.text, &opts, fonts)?;
    write_image(&img, &args.out)
}

fn cmd_batch(args: BatchArgs, fonts: FontLibrary) -> anyhow::Result<()> {
    let file = gongju::JobFile::from_path(&args.in_path)?;
    let root = args
        .in_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let ctx = ComposeContext::new(fonts).with_asset_root(&root);
    let opts = gongju::RunOptions {
        out_root: root,
        threads: args.threads,
    };
    let reports = gongju::run_jobs(&file, &ctx, &opts)?;

    let mut failed = 0usize;
    for r in &reports {
        match &r.result {
            Ok(paths) => {
                for p in paths {
                    eprintln!("{} ({}): wrote {}", r.id, r.kind, p.display());
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} ({}): error: {e}", r.id, r.kind);
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} jobs failed", reports.len());
    }
    Ok(())
}

fn cmd_fonts(args: FontsArgs, fonts: &FontLibrary) -> anyhow::Result<()> {
    let families: Vec<String> = if args.families.is_empty() {
        gongju::DEFAULT_FONT_FAMILY
            .split(',')
            .map(|f| f.trim().trim_matches('\'').to_string())
            .filter(|f| !f.is_empty())
            .collect()
    } else {
        args.families
    };

    println!("font_faces: {}", fonts.face_count());
    for family in &families {
        println!("  {family}:");
        match fonts.resolve_family(family) {
            Some(face) => {
                println!("    family: {}", face.family);
                println!("    sha256: {}", sha256_hex(&face.bytes));
            }
            None => println!("    unresolved"),
        }
    }
    Ok(())
}

fn write_image(img: &image::RgbaImage, out: &Path) -> anyhow::Result<()> {
    gongju::save_image(img, out)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn write_composed(composed: &gongju::Composed, out: &Path) -> anyhow::Result<()> {
    for p in gongju::write_composed(composed, out)? {
        eprintln!("wrote {}", p.display());
    }
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
