use elo_domain::ClusterId;
use uuid::Uuid;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid dataset: {message}")]
	InvalidDataset { message: String },
	#[error("Missing expected column: {column}.")]
	MissingColumn { column: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Projection failed: {message}")]
	Projection { message: String },
	#[error("Session {session_id} was not found.")]
	SessionNotFound { session_id: Uuid },
	#[error("Cluster {cluster} was not found.")]
	ClusterNotFound { cluster: ClusterId },
	#[error("No dataset has been uploaded in this session.")]
	UploadRequired,
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<elo_domain::Error> for Error {
	fn from(err: elo_domain::Error) -> Self {
		match err {
			elo_domain::Error::MissingColumn { column } => Self::MissingColumn { column },
			elo_domain::Error::UnknownField { name } =>
				Self::InvalidRequest { message: format!("Unknown score field: {name}.") },
			other => Self::InvalidDataset { message: other.to_string() },
		}
	}
}

impl From<elo_storage::Error> for Error {
	fn from(err: elo_storage::Error) -> Self {
		match err {
			elo_storage::Error::Domain(inner) => inner.into(),
			elo_storage::Error::Csv(inner) => Self::InvalidDataset { message: inner.to_string() },
			elo_storage::Error::ReadDataset { path, source } =>
				Self::Storage { message: format!("Failed to read {}: {source}", path.display()) },
			elo_storage::Error::Io(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}

impl From<elo_projection::Error> for Error {
	fn from(err: elo_projection::Error) -> Self {
		Self::Projection { message: err.to_string() }
	}
}
