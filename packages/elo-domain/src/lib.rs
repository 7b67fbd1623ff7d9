//! Feedback records, per-cluster aggregation and sampling.

pub mod aggregate;
pub mod cluster;
pub mod embedding;
pub mod parse;
pub mod record;
pub mod sample;

mod error;

pub use error::{Error, Result};
pub use record::{ClusterId, Dataset, Record};

pub const COLUMN_QUERY: &str = "query";
pub const COLUMN_ANSWER: &str = "answer";
pub const COLUMN_EMBEDDING: &str = "embedding";
pub const COLUMN_CLUSTER: &str = "cluster";
pub const COLUMN_CLUSTER_ELO: &str = "cluster_elo";
pub const COLUMN_ELO_OLD: &str = "elo_old";
pub const COLUMN_ELO_NEW: &str = "elo_new";
pub const COLUMN_THEME: &str = "theme_of_cluster";
pub const COLUMN_REASON: &str = "reason";
pub const COLUMN_REASON_DETAIL: &str = "reason_detail";

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 5] =
	[COLUMN_QUERY, COLUMN_ANSWER, COLUMN_EMBEDDING, COLUMN_CLUSTER, COLUMN_CLUSTER_ELO];

/// Columns with a typed slot on [`Record`]. Anything else is kept as an extra cell.
pub const KNOWN_COLUMNS: [&str; 10] = [
	COLUMN_QUERY,
	COLUMN_ANSWER,
	COLUMN_EMBEDDING,
	COLUMN_CLUSTER,
	COLUMN_CLUSTER_ELO,
	COLUMN_ELO_OLD,
	COLUMN_ELO_NEW,
	COLUMN_THEME,
	COLUMN_REASON,
	COLUMN_REASON_DETAIL,
];
