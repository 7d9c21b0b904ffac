//! Example: build a full RGBA8 mip chain from a bitmap.
//!
//! Decodes the input (PNG or BMP), then requests each level in turn from a
//! lazily built `MipPyramid`, timing every derivation. A per-level summary
//! (size, average color, byte count) is written to a JSON file next to the
//! input image.
//!
//! Run from the workspace root:
//!   cargo run -p texmip --example mipchain -- --help
//!   cargo run -p texmip --example mipchain -- --input data/dodecahedron.bmp

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use serde::Serialize;
use texmip::{Image, MipLevel, MipPyramid, Rgba8, full_chain_len};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Build a box-filtered mip chain from a bitmap")]
struct Args {
    /// Path to the source bitmap
    #[arg(long, default_value = "data/dodecahedron.bmp")]
    input: String,

    /// Stop after this many levels (base included)
    #[arg(long)]
    levels: Option<usize>,

    /// Output JSON path (default: <input stem>_mips.json next to input)
    #[arg(long)]
    out: Option<String>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LevelDto {
    level: usize,
    width: usize,
    height: usize,
    bytes: usize,
    /// Per-channel mean over the level, as floats for readability.
    mean_rgba: [f64; 4],
    /// Wall-clock time to derive this level, in milliseconds.
    elapsed_ms: f64,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn mean_rgba(level: &MipLevel) -> [f64; 4] {
    let n = level.pixels().len();
    if n == 0 {
        return [0.0; 4];
    }

    let mut sum = [0u64; 4];
    for px in level.pixels() {
        for (acc, ch) in sum.iter_mut().zip(px.to_array()) {
            *acc += ch as u64;
        }
    }
    sum.map(|s| s as f64 / n as f64)
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let img_path = &args.input;
    let out_path = args.out.unwrap_or_else(|| {
        let p = std::path::Path::new(img_path);
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        let dir = p.parent().unwrap_or(std::path::Path::new("."));
        dir.join(format!("{stem}_mips.json"))
            .to_string_lossy()
            .into_owned()
    });

    let rgba = ImageReader::open(img_path)
        .with_context(|| format!("opening {img_path}"))?
        .decode()
        .with_context(|| format!("decoding {img_path}"))?
        .into_rgba8();

    let (w, h) = (rgba.width() as usize, rgba.height() as usize);
    let base: Image<Rgba8> =
        Image::from_rgba8_bytes(w, h, rgba.as_raw()).context("building base level")?;

    let chain = full_chain_len(w, h).min(args.levels.unwrap_or(usize::MAX));
    println!("loaded {img_path}: {w}x{h}, building {chain} levels");

    let mut pyr = MipPyramid::new(base);
    let mut results: Vec<LevelDto> = Vec::with_capacity(chain);
    let total_start = Instant::now();

    for k in 0..chain {
        let t0 = Instant::now();
        let level = pyr
            .get_level(k)
            .with_context(|| format!("deriving level {k}"))?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

        println!(
            "  level {k}: {}x{}  ({elapsed_ms:.3} ms)",
            level.width(),
            level.height()
        );

        results.push(LevelDto {
            level: k,
            width: level.width(),
            height: level.height(),
            bytes: level.pixels().len() * Rgba8::BYTES,
            mean_rgba: mean_rgba(level),
            elapsed_ms,
        });
    }

    let total_ms = total_start.elapsed().as_secs_f64() * 1e3;
    println!(
        "total: {total_ms:.2} ms, {} downsample passes",
        pyr.downsample_count()
    );

    let out_file =
        std::fs::File::create(&out_path).with_context(|| format!("creating {out_path}"))?;
    serde_json::to_writer_pretty(out_file, &results)
        .with_context(|| format!("writing JSON to {out_path}"))?;

    println!("results written to {out_path}");
    Ok(())
}
