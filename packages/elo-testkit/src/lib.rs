//! Fixtures shared by the workspace's tests.

mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

pub const BASE_COLUMNS: [&str; 6] =
	["query", "answer", "embedding", "cluster", "cluster_elo", "theme_of_cluster"];
pub const UPLOAD_COLUMNS: [&str; 10] = [
	"query",
	"answer",
	"embedding",
	"cluster",
	"cluster_elo",
	"elo_old",
	"elo_new",
	"theme_of_cluster",
	"reason",
	"reason_detail",
];

/// One CSV row described by column name.
#[derive(Clone, Debug, Default)]
pub struct FixtureRow {
	cells: Vec<(String, String)>,
}
impl FixtureRow {
	pub fn new(query: &str, answer: &str, embedding: &[f64], cluster: u32, cluster_elo: f64) -> Self {
		let embedding = format!(
			"[{}]",
			embedding.iter().map(|value| value.to_string()).collect::<Vec<_>>().join(", ")
		);

		Self::default()
			.with("query", query)
			.with("answer", answer)
			.with("embedding", &embedding)
			.with("cluster", &cluster.to_string())
			.with("cluster_elo", &cluster_elo.to_string())
	}

	pub fn with(mut self, column: &str, value: &str) -> Self {
		self.cells.retain(|(name, _)| name != column);
		self.cells.push((column.to_string(), value.to_string()));

		self
	}

	pub fn theme(self, theme: &str) -> Self {
		self.with("theme_of_cluster", theme)
	}

	pub fn elo_old(self, value: f64) -> Self {
		self.with("elo_old", &value.to_string())
	}

	pub fn elo_new(self, value: f64) -> Self {
		self.with("elo_new", &value.to_string())
	}

	pub fn reason(self, reason: &str, detail: &str) -> Self {
		self.with("reason", reason).with("reason_detail", detail)
	}

	fn get(&self, column: &str) -> &str {
		self.cells.iter().find(|(name, _)| name == column).map(|(_, value)| value.as_str()).unwrap_or("")
	}
}

/// Renders rows as CSV text with the given header, quoting every cell.
pub fn csv_text(columns: &[&str], rows: &[FixtureRow]) -> String {
	let mut out = String::new();

	out.push_str(&columns.join(","));
	out.push('\n');

	for row in rows {
		let cells: Vec<String> =
			columns.iter().map(|column| format!("\"{}\"", row.get(column).replace('"', "\"\""))).collect();

		out.push_str(&cells.join(","));
		out.push('\n');
	}

	out
}

/// Three clusters with well-separated 4-dimensional embeddings.
pub fn base_rows() -> Vec<FixtureRow> {
	let mut rows = Vec::new();
	let themes = [(1_u32, "Billing"), (2, "Shipping"), (3, "Account access")];

	for (cluster, theme) in themes {
		for i in 0..4 {
			let center = cluster as f64 * 5.0;
			let jitter = i as f64 * 0.1;

			rows.push(
				FixtureRow::new(
					&format!("cluster {cluster} question {i}"),
					&format!("cluster {cluster} answer {i}"),
					&[center + jitter, center - jitter, jitter, -center],
					cluster,
					1_500.0 + cluster as f64 * 10.0 + i as f64,
				)
				.theme(theme),
			);
		}
	}

	rows
}

/// An upload where cluster 1 regresses and cluster 2 improves.
pub fn upload_rows() -> Vec<FixtureRow> {
	vec![
		FixtureRow::new("late billing q", "late billing a", &[5.2, 4.8, 0.2, -5.0], 1, 1_498.0)
			.elo_old(1_512.0)
			.elo_new(1_498.0)
			.theme("Billing")
			.reason("wrong_fact", "Quoted an outdated refund window."),
		FixtureRow::new("late billing q2", "late billing a2", &[5.3, 4.7, 0.3, -5.0], 1, 1_505.0)
			.elo_old(1_512.0)
			.elo_new(1_505.0)
			.theme("Billing")
			.reason("tone", "Too curt."),
		FixtureRow::new("late shipping q", "late shipping a", &[10.2, 9.8, 0.2, -10.0], 2, 1_530.0)
			.elo_old(1_521.0)
			.elo_new(1_530.0)
			.theme("Shipping"),
	]
}

pub fn base_csv() -> String {
	csv_text(&BASE_COLUMNS, &base_rows())
}

pub fn upload_csv() -> String {
	csv_text(&UPLOAD_COLUMNS, &upload_rows())
}

/// A file under the temp directory that is removed on drop.
#[derive(Debug)]
pub struct TempFile {
	path: PathBuf,
}
impl TempFile {
	pub fn with_contents(prefix: &str, extension: &str, contents: &str) -> Result<Self> {
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|err| Error::Message(format!("System time must be valid: {err}.")))?
			.as_nanos();
		let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
		let pid = std::process::id();
		let mut path = env::temp_dir();

		path.push(format!("{prefix}_{nanos}_{pid}_{ordinal}.{extension}"));

		fs::write(&path, contents)?;

		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}
impl Drop for TempFile {
	fn drop(&mut self) {
		if let Err(err) = fs::remove_file(&self.path) {
			eprintln!("Temp file cleanup failed for {:?}: {err}.", self.path);
		}
	}
}
