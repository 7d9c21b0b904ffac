use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use image::RgbaImage;
use serde::Serialize;
use texmip_core::{Image, Rgba8, mip_level_index};
use texmip_pyr::{MipLevel, MipPyramid, SubresourceFootprint, UploadLayout, full_chain_len};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "texmip_gallery")]
#[command(about = "Build RGBA8 mip chains from image files")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write every level of the chain as PNG plus meta.json
    #[command(name = "pyramid")]
    Pyramid(PyramidArgs),
    /// Write a single level as PNG
    #[command(name = "level")]
    Level(LevelArgs),
    /// Write a pitched upload buffer and its footprints
    #[command(name = "upload")]
    Upload(UploadArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Source bitmap (PNG or BMP)
    #[arg(long, required = true)]
    input: PathBuf,
    #[arg(long, default_value = "out/mips")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct PyramidArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Maximum number of levels, base included (default: full chain)
    #[arg(long)]
    levels: Option<usize>,
}

#[derive(Args, Debug, Clone)]
struct LevelArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, allow_negative_numbers = true)]
    level: i64,
}

#[derive(Args, Debug, Clone)]
struct UploadArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long)]
    levels: Option<usize>,
    #[arg(long, default_value_t = texmip_pyr::TEXTURE_DATA_PITCH_ALIGNMENT)]
    row_pitch_alignment: usize,
    #[arg(long, default_value_t = texmip_pyr::TEXTURE_DATA_PLACEMENT_ALIGNMENT)]
    placement_alignment: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaPyramid {
    input: String,
    requested_levels: Option<usize>,
    built_levels: usize,
    level_sizes: Vec<[usize; 2]>,
    policy: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct FootprintDto {
    level: usize,
    width: usize,
    height: usize,
    row_pitch: usize,
    slice_pitch: usize,
    offset: usize,
}

#[derive(Debug, Clone, Serialize)]
struct MetaUpload {
    row_pitch_alignment: usize,
    placement_alignment: usize,
    total_size: usize,
    format: &'static str,
    footprints: Vec<FootprintDto>,
}

const POLICY: &str = "2x2 truncating mean per RGBA channel, drop-odd dimensions";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Pyramid(args) => run_pyramid(args),
        Command::Level(args) => run_level(args),
        Command::Upload(args) => run_upload(args),
    }
}

fn run_pyramid(args: PyramidArgs) -> Result<()> {
    let out_dir = prepare_out_dir(&args.common)?;
    let mut pyr = MipPyramid::new(load_input_rgba8(&args.common.input)?);

    let built = pyr.build_chain(args.levels.unwrap_or(usize::MAX));
    info!(built, input = %args.common.input.display(), "built mip chain");

    let mut sizes = Vec::with_capacity(built);
    for level in pyr.levels() {
        sizes.push([level.width(), level.height()]);
        save_level(out_dir.join(format!("level_{}.png", level.level())), level)?;
    }

    write_json(
        out_dir.join("meta.json"),
        &MetaPyramid {
            input: args.common.input.display().to_string(),
            requested_levels: args.levels,
            built_levels: built,
            level_sizes: sizes,
            policy: POLICY,
        },
    )?;

    Ok(())
}

fn run_level(args: LevelArgs) -> Result<()> {
    let level_idx = mip_level_index(args.level)
        .with_context(|| format!("validating --level {}", args.level))?;

    let out_dir = prepare_out_dir(&args.common)?;
    let mut pyr = MipPyramid::new(load_input_rgba8(&args.common.input)?);
    let level = pyr.get_level(level_idx).with_context(|| {
        format!(
            "deriving mip level {level_idx} from {}",
            args.common.input.display()
        )
    })?;

    info!(
        level = level.level(),
        width = level.width(),
        height = level.height(),
        "derived mip level"
    );
    save_level(out_dir.join(format!("level_{level_idx}.png")), level)
}

fn run_upload(args: UploadArgs) -> Result<()> {
    let layout = UploadLayout::new(args.row_pitch_alignment, args.placement_alignment)
        .context("validating upload alignments")?;

    let out_dir = prepare_out_dir(&args.common)?;
    let mut pyr = MipPyramid::new(load_input_rgba8(&args.common.input)?);
    pyr.build_chain(args.levels.unwrap_or(usize::MAX));

    let mut buf = Vec::new();
    let footprints = layout.write(pyr.levels(), &mut buf);
    info!(
        levels = footprints.len(),
        bytes = buf.len(),
        "wrote pitched upload buffer"
    );

    let bin_path = out_dir.join("upload.bin");
    fs::write(&bin_path, &buf).with_context(|| format!("writing {}", bin_path.display()))?;

    write_json(
        out_dir.join("footprints.json"),
        &MetaUpload {
            row_pitch_alignment: layout.row_pitch_alignment(),
            placement_alignment: layout.placement_alignment(),
            total_size: buf.len(),
            format: "R8G8B8A8_UNORM",
            footprints: footprints.iter().map(footprint_dto).collect(),
        },
    )?;

    Ok(())
}

fn prepare_out_dir(common: &CommonArgs) -> Result<PathBuf> {
    ensure_file_exists(&common.input, "input")?;

    fs::create_dir_all(&common.out)
        .with_context(|| format!("creating output directory {}", common.out.display()))?;

    Ok(common.out.clone())
}

fn load_input_rgba8(path: &Path) -> Result<Image<Rgba8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgba = dyn_img.to_rgba8();
    let (w, h) = rgba.dimensions();
    let bytes = rgba.into_raw();

    let img = Image::from_rgba8_bytes(w as usize, h as usize, &bytes)
        .with_context(|| format!("constructing texmip image from {}", path.display()))?;
    info!(
        width = w,
        height = h,
        chain = full_chain_len(img.width(), img.height()),
        "loaded base level"
    );
    Ok(img)
}

fn save_level(path: PathBuf, level: &MipLevel) -> Result<()> {
    let rgba = RgbaImage::from_raw(
        level.width() as u32,
        level.height() as u32,
        level.to_rgba8_bytes(),
    )
    .context("constructing RgbaImage from level bytes")?;
    rgba.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn footprint_dto(fp: &SubresourceFootprint) -> FootprintDto {
    FootprintDto {
        level: fp.level,
        width: fp.width,
        height: fp.height,
        row_pitch: fp.row_pitch,
        slice_pitch: fp.slice_pitch,
        offset: fp.offset,
    }
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
