use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use super::{load_terrain, save_terrain};
use crate::Format;

pub fn run(inputs: Vec<PathBuf>, out_dir: PathBuf, format: Format, big_endian: bool) -> Result<()> {
    fs::create_dir_all(&out_dir).context("Failed to create output directory")?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut failed = 0usize;
    for input in &inputs {
        if let Err(e) = convert_one(input, &out_dir, format, big_endian) {
            failed += 1;
            tracing::warn!(input = %input.display(), error = %e, "conversion failed");
            pb.println(format!("{}: {:#}", input.display(), e));
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    println!(
        "Converted {} of {} files into {}",
        inputs.len() - failed,
        inputs.len(),
        out_dir.display()
    );
    if failed > 0 {
        bail!("{} of {} files failed to convert", failed, inputs.len());
    }
    Ok(())
}

fn convert_one(input: &Path, out_dir: &Path, format: Format, big_endian: bool) -> Result<()> {
    let stem = input
        .file_stem()
        .with_context(|| format!("No file name in {}", input.display()))?;
    let output = out_dir.join(stem).with_extension(format.extension());

    let (header, alts, _) = load_terrain(input, false)?;
    save_terrain(&output, &header, &alts, format, big_endian, false)
}
