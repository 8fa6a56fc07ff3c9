use thiserror::Error;

/// Reason why a decomposition or reconstruction call was rejected
/// before any pixels were touched.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidInput {
	/// The pixel buffer has no area; both dimensions must be at least 1.
	#[error("image dimensions {width}x{height} are empty")]
	EmptyImage {
		width: u32,
		height: u32,
	},
	/// The threshold is negative or NaN and cannot gate the split test.
	#[error("threshold {0} is not a non-negative number")]
	InvalidThreshold(f64),
}

/// Reason why a file-to-file compression run failed.
#[derive(Debug, Error)]
pub enum PipelineError {
	/// The input could not be decoded, or the output could not be encoded.
	#[error("image codec error: {0}")]
	Image(#[from] image::ImageError),
	/// File metadata could not be read.
	#[error("file I/O error: {0}")]
	Io(#[from] std::io::Error),
	/// The decoded buffer or the threshold was rejected by the core.
	#[error(transparent)]
	Input(#[from] InvalidInput),
}
