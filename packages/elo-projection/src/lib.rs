//! Two-dimensional projection of embedding matrices.

pub mod tsne;

mod error;

pub use error::{Error, Result};
pub use tsne::{Tsne, TsneParams};

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point2 {
	pub x: f64,
	pub y: f64,
}

/// Reduces a stack of equal-length embeddings to one point per row, preserving order.
pub trait Projector
where
	Self: Send + Sync,
{
	fn project(&self, embeddings: &[&[f64]]) -> Result<Vec<Point2>>;
}

/// Checks the stack is non-empty, rectangular and finite. Returns the shared dimensionality.
pub fn validate_embeddings(embeddings: &[&[f64]]) -> Result<usize> {
	let first = embeddings.first().ok_or(Error::Empty)?;
	let expected = first.len();

	if expected == 0 {
		return Err(Error::EmptyEmbedding);
	}

	for (row, embedding) in embeddings.iter().enumerate() {
		if embedding.len() != expected {
			return Err(Error::DimensionMismatch { row, expected, found: embedding.len() });
		}
		if embedding.iter().any(|value| !value.is_finite()) {
			return Err(Error::NonFinite { row });
		}
	}

	Ok(expected)
}
