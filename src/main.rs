use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use quadpress::pipeline::compress_file;

/// Compresses an image by quadtree decomposition, replacing regions of
/// near-uniform color with flat blocks.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
	/// Path to the input image, in any format the `image` crate can decode
	input: PathBuf,

	/// Path to the output image; defaults to the input path with a
	/// `_compressed` suffix, keeping the input's extension
	output: Option<PathBuf>,

	/// Mean-squared-error ceiling below which a region is merged into one
	/// flat block; 0 keeps every pixel, larger values merge more
	#[arg(short, long)]
	threshold: f64,
}

/// Derives `<stem>_compressed.<extension>` next to the input.
fn default_output(input: &Path) -> PathBuf {
	let stem = input.file_stem().unwrap_or_default().to_string_lossy();
	let name = match input.extension() {
		Some(ext) => format!("{}_compressed.{}", stem, ext.to_string_lossy()),
		None => format!("{}_compressed.png", stem),
	};
	input.with_file_name(name)
}

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let cli = Cli::parse();

	let output = cli.output.unwrap_or_else(|| default_output(&cli.input));
	let stats = compress_file(&cli.input, &output, cli.threshold)
		.with_context(|| format!("could not compress {}", cli.input.display()))?;

	println!(
		"{}x{} pixels -> {} leaves in {:.2?}",
		stats.width, stats.height, stats.leaf_count, stats.elapsed
	);
	println!(
		"{} bytes -> {} bytes ({:.2}% reduction)",
		stats.input_bytes,
		stats.output_bytes,
		stats.ratio()
	);
	println!("saved {}", output.display());
	Ok(())
}
