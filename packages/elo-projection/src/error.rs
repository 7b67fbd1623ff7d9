pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Cannot project an empty dataset.")]
	Empty,
	#[error("Embeddings have zero dimensions.")]
	EmptyEmbedding,
	#[error("Embedding at row {row} has {found} dimensions; expected {expected}.")]
	DimensionMismatch { row: usize, expected: usize, found: usize },
	#[error("Embedding at row {row} contains a non-finite value.")]
	NonFinite { row: usize },
}
