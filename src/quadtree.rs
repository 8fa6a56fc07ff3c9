use image::{Rgb, RgbImage};

use crate::error::InvalidInput;

/// A rectangular window into an image's coordinate space.
///
/// Regions are produced and consumed during a single decomposition run;
/// every region visited satisfies `x + width <= image width` and
/// `y + height <= image height`, with both dimensions at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
	pub x: u32,
	pub y: u32,
	pub width: u32,
	pub height: u32,
}

impl Region {
	/// Splits the region into its four quadrants, in top-left, top-right,
	/// bottom-left, bottom-right order.
	///
	/// The split is asymmetric: the right and bottom quadrants absorb the
	/// remainder on odd dimensions, so siblings may differ in size by one
	/// pixel per axis. Must only be called with `width >= 2` and
	/// `height >= 2`, which keeps all four quadrants non-empty.
	fn quadrants(&self) -> [Region; 4] {
		let w2 = self.width / 2;
		let h2 = self.height / 2;
		[
			Region { x: self.x, y: self.y, width: w2, height: h2 },
			Region { x: self.x + w2, y: self.y, width: self.width - w2, height: h2 },
			Region { x: self.x, y: self.y + h2, width: w2, height: self.height - h2 },
			Region {
				x: self.x + w2,
				y: self.y + h2,
				width: self.width - w2,
				height: self.height - h2,
			},
		]
	}
}

/// A terminal region of the decomposition and its representative color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Leaf {
	pub region: Region,
	pub color: Rgb<u8>,
}

/// The complete result of one decomposition run.
///
/// The leaf regions are disjoint and tile the source rectangle exactly,
/// whatever the image dimensions. Their order follows the depth-first
/// top-left, top-right, bottom-left, bottom-right traversal, which makes
/// repeated runs over the same input bit-for-bit comparable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decomposition {
	pub leaves: Vec<Leaf>,
}

impl Decomposition {
	/// Number of leaves emitted by the run.
	pub fn leaf_count(&self) -> usize {
		self.leaves.len()
	}
}

/// Per-channel mean and the homogeneity metric of one region.
struct RegionStats {
	mean: [f64; 3],
	mse: f64,
}

impl RegionStats {
	/// Measures `region` in one pass of integer accumulators.
	///
	/// The metric is the population mean of squared deviations from the
	/// region's mean color, taken over every pixel and all three channels.
	/// It is evaluated as `E[x^2] - E[x]^2`, which agrees exactly with the
	/// deviation form; the sums fit `f64`'s integer range for 8-bit
	/// channels at any realistic image size.
	// TODO: Precompute integral images of the channel sums and squared sums
	// so repeated region measurements become O(1) instead of O(area).
	fn measure(image: &RgbImage, region: &Region) -> RegionStats {
		let mut sum = [0u64; 3];
		let mut sum_sq = [0u64; 3];
		for y in region.y..region.y + region.height {
			for x in region.x..region.x + region.width {
				let pixel = image.get_pixel(x, y);
				for channel in 0..3 {
					let v = pixel.0[channel] as u64;
					sum[channel] += v;
					sum_sq[channel] += v * v;
				}
			}
		}
		let n = region.width as f64 * region.height as f64;
		let mut mean = [0f64; 3];
		let mut deviation = 0f64;
		for channel in 0..3 {
			mean[channel] = sum[channel] as f64 / n;
			deviation += sum_sq[channel] as f64 / n - mean[channel] * mean[channel];
		}
		RegionStats { mean, mse: deviation / 3. }
	}

	/// Quantizes the mean color by truncating each channel toward zero.
	///
	/// Truncation, not round-to-nearest, is the fixed policy; changing it
	/// would shift the emitted color of every region whose mean is
	/// fractional.
	fn flat_color(&self) -> Rgb<u8> {
		Rgb([self.mean[0] as u8, self.mean[1] as u8, self.mean[2] as u8])
	}
}

/// Decomposes `image` into an ordered sequence of flat-color leaves.
///
/// A region becomes a leaf once its homogeneity metric falls below
/// `threshold`, or once it is a single pixel wide or tall; otherwise it
/// splits into four quadrants which are visited depth-first in top-left,
/// top-right, bottom-left, bottom-right order. A threshold of 0 forces
/// the split test to fail everywhere and decomposes down to single
/// pixels; a very large threshold yields one leaf for the whole image.
///
/// A region one pixel wide or tall is emitted whole, colored by its mean,
/// no matter how much it varies along the long axis. Splitting such
/// strips further would change the output of every odd-sized input.
///
/// The traversal runs on an explicit work stack rather than native
/// recursion: an elongated image halves along one axis only, and the
/// resulting linear descent would otherwise grow the call stack with the
/// image dimension. Quadrants are pushed in reverse so the popped order
/// reproduces the recursive formulation leaf for leaf.
pub fn decompose(image: &RgbImage, threshold: f64) -> Result<Decomposition, InvalidInput> {
	if image.width() == 0 || image.height() == 0 {
		return Err(InvalidInput::EmptyImage {
			width: image.width(),
			height: image.height(),
		});
	}
	// The negated comparison also rejects NaN.
	if !(threshold >= 0.) {
		return Err(InvalidInput::InvalidThreshold(threshold));
	}

	let mut leaves = Vec::new();
	let mut pending = vec![Region {
		x: 0,
		y: 0,
		width: image.width(),
		height: image.height(),
	}];
	while let Some(region) = pending.pop() {
		let stats = RegionStats::measure(image, &region);
		if stats.mse < threshold || region.width <= 1 || region.height <= 1 {
			leaves.push(Leaf { region, color: stats.flat_color() });
		} else {
			let [tl, tr, bl, br] = region.quadrants();
			pending.push(br);
			pending.push(bl);
			pending.push(tr);
			pending.push(tl);
		}
	}
	Ok(Decomposition { leaves })
}
