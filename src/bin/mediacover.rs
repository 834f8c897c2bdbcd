use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "mediacover", version)]
struct Cli {
    /// More log output (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single-image cover (JPEG).
    Single(SingleArgs),
    /// Render a poster-wall cover from `1.jpg`..`9.jpg` (PNG).
    Multi(MultiArgs),
    /// Fill `1.jpg`..`9.jpg` in a directory from the images found there.
    Prepare(PrepareArgs),
}

#[derive(Args, Debug)]
struct CoverArgs {
    /// Library name, used to look up titles and as the fallback heading.
    #[arg(long)]
    library: String,

    /// JSON file mapping library names to `[localized, latin]` titles.
    #[arg(long)]
    titles: Option<PathBuf>,

    /// Font for the localized title.
    #[arg(long)]
    localized_font: PathBuf,

    /// Font for the Latin title.
    #[arg(long)]
    latin_font: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Seed for every random choice the style makes.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Skip the film-grain pass.
    #[arg(long)]
    no_grain: bool,
}

#[derive(Args, Debug)]
struct SingleArgs {
    /// Backdrop image.
    #[arg(long)]
    image: PathBuf,

    /// `single_1` (card stack) or `single_2` (diagonal).
    #[arg(long, value_enum, default_value_t = mediacover::Style::Single1)]
    style: mediacover::Style,

    #[command(flatten)]
    cover: CoverArgs,
}

#[derive(Args, Debug)]
struct MultiArgs {
    /// Directory holding `1.jpg`..`9.jpg`.
    #[arg(long)]
    dir: PathBuf,

    /// Blurred backdrop instead of the flat gradient.
    #[arg(long)]
    blur: bool,

    #[command(flatten)]
    cover: CoverArgs,
}

#[derive(Args, Debug)]
struct PrepareArgs {
    /// Directory with source images.
    #[arg(long)]
    dir: PathBuf,

    /// Seed for the random repeats when fewer than nine sources exist.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

// Base size only; every style rescales the font to its own layout.
const FONT_BASE_PX: f32 = 48.0;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Single(args) => cmd_single(args),
        Command::Multi(args) => cmd_multi(args),
        Command::Prepare(args) => cmd_prepare(args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_title_map(path: &Path) -> anyhow::Result<mediacover::TitleMap> {
    let f = File::open(path).with_context(|| format!("open titles '{}'", path.display()))?;
    let r = BufReader::new(f);
    let map: mediacover::TitleMap = serde_json::from_reader(r)
        .with_context(|| format!("parse titles JSON '{}'", path.display()))?;
    Ok(map)
}

fn read_fonts(args: &CoverArgs) -> anyhow::Result<mediacover::CoverFonts> {
    let localized = mediacover::FontAsset::load(&args.localized_font, FONT_BASE_PX)
        .with_context(|| format!("load font '{}'", args.localized_font.display()))?;
    let latin = mediacover::FontAsset::load(&args.latin_font, FONT_BASE_PX)
        .with_context(|| format!("load font '{}'", args.latin_font.display()))?;
    Ok(mediacover::CoverFonts { localized, latin })
}

fn read_bytes(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))
}

fn build_request(
    style: mediacover::Style,
    sources: mediacover::CoverSources,
    args: &CoverArgs,
    blur: bool,
) -> anyhow::Result<mediacover::CoverRequest> {
    let title = match &args.titles {
        Some(path) => read_title_map(path)?.resolve(&args.library),
        None => mediacover::Title::default(),
    };
    Ok(mediacover::CoverRequest {
        style,
        library_name: args.library.clone(),
        title,
        fonts: read_fonts(args)?,
        sources,
        options: mediacover::StyleOptions {
            blur,
            grain: !args.no_grain,
            seed: args.seed,
        },
    })
}

fn write_cover(cover: &mediacover::EncodedCover, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &cover.bytes)
        .with_context(|| format!("write {} '{}'", cover.format.extension(), out.display()))?;
    eprintln!("wrote {} ({}x{})", out.display(), cover.width, cover.height);
    Ok(())
}

fn cmd_single(args: SingleArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.style.is_single(), "style '{}' needs the multi subcommand", args.style);
    let sources = mediacover::CoverSources::Single(read_bytes(&args.image)?);
    let request = build_request(args.style, sources, &args.cover, false)?;
    let cover = mediacover::generate_cover(&request)?;
    write_cover(&cover, &args.cover.out)
}

fn cmd_multi(args: MultiArgs) -> anyhow::Result<()> {
    let posters = (1..=mediacover::POSTER_SLOTS)
        .map(|slot| read_bytes(&args.dir.join(format!("{slot}.jpg"))))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let sources = mediacover::CoverSources::Posters(posters);
    let request = build_request(mediacover::Style::Multi1, sources, &args.cover, args.blur)?;
    let cover = mediacover::generate_cover(&request)?;
    write_cover(&cover, &args.cover.out)
}

fn list_dir(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("read dir '{}'", dir.display()))? {
        let entry = entry.with_context(|| format!("read dir '{}'", dir.display()))?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_owned());
        }
    }
    Ok(names)
}

fn cmd_prepare(args: PrepareArgs) -> anyhow::Result<()> {
    let names = list_dir(&args.dir)?;
    let filled = (1..=mediacover::POSTER_SLOTS)
        .all(|slot| names.iter().any(|n| *n == format!("{slot}.jpg")));
    if filled {
        eprintln!("slots already present in {}", args.dir.display());
        return Ok(());
    }

    let sources: Vec<String> = names
        .iter()
        .filter(|n| mediacover::is_source_image_name(n))
        .cloned()
        .collect();
    let mut rng = StdRng::seed_from_u64(args.seed);
    let picks = mediacover::prepare_poster_slots(&sources, &mut rng)
        .with_context(|| format!("prepare slots in '{}'", args.dir.display()))?;

    // Decode everything before touching existing slots.
    let images = picks
        .iter()
        .map(|name| {
            let path = args.dir.join(name);
            image::open(&path)
                .with_context(|| format!("decode image '{}'", path.display()))
                .map(|img| img.to_rgb8())
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    for name in names.iter().filter(|n| mediacover::is_slot_file_name(n)) {
        let path = args.dir.join(name);
        std::fs::remove_file(&path).with_context(|| format!("remove '{}'", path.display()))?;
    }
    for (slot, img) in images.iter().enumerate() {
        let path = args.dir.join(format!("{}.jpg", slot + 1));
        let mut out = std::io::BufWriter::new(
            File::create(&path).with_context(|| format!("create '{}'", path.display()))?,
        );
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, mediacover::JPEG_QUALITY)
            .encode_image(img)
            .with_context(|| format!("write jpeg '{}'", path.display()))?;
    }
    eprintln!("wrote {} slots in {}", mediacover::POSTER_SLOTS, args.dir.display());
    Ok(())
}
