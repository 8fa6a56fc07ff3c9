use image::RgbImage;

use crate::error::InvalidInput;
use crate::quadtree::Leaf;

/// Paints a leaf sequence into a freshly allocated image of the given
/// dimensions.
///
/// Painting order does not matter: leaves from a decomposition run are
/// disjoint and tile the full rectangle, so every pixel is written
/// exactly once. Rectangles are still clipped to the buffer bounds, so a
/// stray out-of-range leaf can never write outside the allocation.
pub fn reconstruct(width: u32, height: u32, leaves: &[Leaf]) -> Result<RgbImage, InvalidInput> {
	if width == 0 || height == 0 {
		return Err(InvalidInput::EmptyImage { width, height });
	}
	let mut canvas = RgbImage::new(width, height);
	for leaf in leaves {
		let x_end = leaf.region.x.saturating_add(leaf.region.width).min(width);
		let y_end = leaf.region.y.saturating_add(leaf.region.height).min(height);
		for y in leaf.region.y..y_end {
			for x in leaf.region.x..x_end {
				canvas.put_pixel(x, y, leaf.color);
			}
		}
	}
	Ok(canvas)
}
