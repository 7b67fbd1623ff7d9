use rand::{Rng, seq::index};
use serde::Serialize;

use crate::{ClusterId, Dataset};

/// Text shown in place of samples when a cluster has no records.
pub const NO_DATA_PLACEHOLDER: &str = "(no data)";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleRow {
	/// Row index inside the sampled dataset.
	pub row: usize,
	pub query: String,
	pub answer: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sample {
	Rows { rows: Vec<SampleRow> },
	NoData { placeholder: &'static str },
}
impl Sample {
	pub fn no_data() -> Self {
		Self::NoData { placeholder: NO_DATA_PLACEHOLDER }
	}

	pub fn rows(&self) -> &[SampleRow] {
		match self {
			Self::Rows { rows } => rows,
			Self::NoData { .. } => &[],
		}
	}

	pub fn is_placeholder(&self) -> bool {
		matches!(self, Self::NoData { .. })
	}
}

/// Draws `min(max, available)` records of `cluster` uniformly without replacement.
///
/// Every call is an independent draw from `rng`.
pub fn sample_cluster<R>(dataset: &Dataset, cluster: ClusterId, max: usize, rng: &mut R) -> Sample
where
	R: Rng + ?Sized,
{
	let members: Vec<usize> = dataset.in_cluster(cluster).map(|(row, _)| row).collect();

	if members.is_empty() {
		return Sample::no_data();
	}

	let amount = max.min(members.len());
	let records = dataset.records();
	let rows = index::sample(rng, members.len(), amount)
		.into_iter()
		.map(|position| {
			let row = members[position];
			let record = &records[row];

			SampleRow { row, query: record.query.clone(), answer: record.answer.clone() }
		})
		.collect();

	Sample::Rows { rows }
}
