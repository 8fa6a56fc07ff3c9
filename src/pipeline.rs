use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::PipelineError;
use crate::quadtree::decompose;
use crate::render::reconstruct;

/// Figures reported by a completed compression run.
#[derive(Clone, Debug)]
pub struct CompressionStats {
	pub threshold: f64,
	pub width: u32,
	pub height: u32,
	pub leaf_count: usize,
	pub elapsed: Duration,
	pub input_bytes: u64,
	pub output_bytes: u64,
}

impl CompressionStats {
	/// Size reduction as a percentage of the input file size.
	///
	/// Negative when the re-encoded output is larger than the input, which
	/// happens at low thresholds on small or already dense files.
	pub fn ratio(&self) -> f64 {
		if self.input_bytes == 0 {
			return 0.;
		}
		(1. - self.output_bytes as f64 / self.input_bytes as f64) * 100.
	}
}

/// Compresses the image at `input` and writes the result to `output`.
///
/// The input may be anything the `image` crate can decode; it is
/// flattened to 8-bit RGB before decomposition. The output format is
/// picked from the extension of `output`.
pub fn compress_file(
	input: &Path,
	output: &Path,
	threshold: f64,
) -> Result<CompressionStats, PipelineError> {
	info!("compressing {} with threshold {}", input.display(), threshold);
	let source = image::open(input)?.to_rgb8();
	let (width, height) = source.dimensions();
	debug!("decoded {}x{} pixels", width, height);

	let start = Instant::now();
	let decomposition = decompose(&source, threshold)?;
	let canvas = reconstruct(width, height, &decomposition.leaves)?;
	let elapsed = start.elapsed();
	info!("{} leaves in {:.2?}", decomposition.leaf_count(), elapsed);

	canvas.save(output)?;

	let stats = CompressionStats {
		threshold,
		width,
		height,
		leaf_count: decomposition.leaf_count(),
		elapsed,
		input_bytes: fs::metadata(input)?.len(),
		output_bytes: fs::metadata(output)?.len(),
	};
	info!(
		"{} -> {} bytes ({:.2}% reduction)",
		stats.input_bytes,
		stats.output_bytes,
		stats.ratio()
	);
	Ok(stats)
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::{Rgb, RgbImage};

	#[test]
	fn flat_image_roundtrips_through_files() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("flat.png");
		let output = dir.path().join("flat_compressed.png");
		RgbImage::from_pixel(16, 16, Rgb([40, 90, 200])).save(&input).unwrap();

		let stats = compress_file(&input, &output, 5.).unwrap();
		assert_eq!((stats.width, stats.height), (16, 16));
		assert_eq!(stats.leaf_count, 1);
		assert!(stats.input_bytes > 0);
		assert!(stats.output_bytes > 0);

		let restored = image::open(&output).unwrap().to_rgb8();
		assert_eq!(restored.dimensions(), (16, 16));
		assert!(restored.pixels().all(|p| *p == Rgb([40, 90, 200])));
	}

	#[test]
	fn missing_input_surfaces_as_image_error() {
		let dir = tempfile::tempdir().unwrap();
		let result = compress_file(
			&dir.path().join("missing.png"),
			&dir.path().join("out.png"),
			1.,
		);
		assert!(matches!(result, Err(PipelineError::Image(_))));
	}

	#[test]
	fn bad_threshold_surfaces_as_invalid_input() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("any.png");
		RgbImage::from_pixel(2, 2, Rgb([5, 5, 5])).save(&input).unwrap();
		let result = compress_file(&input, &dir.path().join("out.png"), -3.);
		assert!(matches!(result, Err(PipelineError::Input(_))));
	}

	#[test]
	fn ratio_handles_growth_and_empty_inputs() {
		let grew = CompressionStats {
			threshold: 0.,
			width: 1,
			height: 1,
			leaf_count: 1,
			elapsed: Duration::ZERO,
			input_bytes: 100,
			output_bytes: 150,
		};
		assert!(grew.ratio() < 0.);
		let empty = CompressionStats { input_bytes: 0, ..grew };
		assert_eq!(empty.ratio(), 0.);
	}
}
