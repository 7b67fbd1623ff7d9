pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Row {row}: invalid embedding literal: {message}")]
	ParseEmbedding { row: usize, message: String },
	#[error("Row {row}: cluster value {value:?} is not a non-negative integer.")]
	InvalidCluster { row: usize, value: String },
	#[error("Row {row}: {column} value {value:?} is not a finite number.")]
	InvalidNumber { row: usize, column: String, value: String },
	#[error("Missing expected column: {column}.")]
	MissingColumn { column: String },
	#[error("Unknown score field: {name}.")]
	UnknownField { name: String },
}
