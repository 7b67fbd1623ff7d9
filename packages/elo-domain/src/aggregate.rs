use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
	COLUMN_CLUSTER_ELO, COLUMN_ELO_NEW, COLUMN_ELO_OLD, ClusterId, Dataset, Error, Record, Result,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
	ClusterElo,
	EloOld,
	EloNew,
}
impl ScoreField {
	pub const ALL: [Self; 3] = [Self::ClusterElo, Self::EloOld, Self::EloNew];

	pub fn column(self) -> &'static str {
		match self {
			Self::ClusterElo => COLUMN_CLUSTER_ELO,
			Self::EloOld => COLUMN_ELO_OLD,
			Self::EloNew => COLUMN_ELO_NEW,
		}
	}

	pub fn value(self, record: &Record) -> Option<f64> {
		match self {
			Self::ClusterElo => Some(record.cluster_elo),
			Self::EloOld => record.elo_old,
			Self::EloNew => record.elo_new,
		}
	}
}
impl FromStr for ScoreField {
	type Err = Error;

	fn from_str(name: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|field| field.column() == name.trim())
			.ok_or_else(|| Error::UnknownField { name: name.to_string() })
	}
}
impl fmt::Display for ScoreField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.column())
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterMean {
	pub cluster: ClusterId,
	pub mean: f64,
	/// Records that carried a value for the field.
	pub count: usize,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
	Decreased,
	Increased,
	Unchanged,
}
impl ChangeDirection {
	pub fn classify(delta: f64) -> Self {
		if delta < 0.0 {
			Self::Decreased
		} else if delta > 0.0 {
			Self::Increased
		} else {
			Self::Unchanged
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterDelta {
	pub cluster: ClusterId,
	pub prior_mean: Option<f64>,
	pub current_mean: Option<f64>,
	/// Mean of `current - prior` over records carrying both values.
	pub delta_mean: f64,
	pub count: usize,
	pub direction: ChangeDirection,
}

#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
	sum: f64,
	count: usize,
}
impl Accumulator {
	fn push(&mut self, value: f64) {
		self.sum += value;
		self.count += 1;
	}

	fn mean(self) -> Option<f64> {
		if self.count == 0 { None } else { Some(self.sum / self.count as f64) }
	}
}

/// Arithmetic mean of `field` per cluster, ordered by cluster id.
///
/// Records without a value are skipped; a cluster with no contributing record is omitted.
pub fn cluster_means(dataset: &Dataset, field: ScoreField) -> Result<Vec<ClusterMean>> {
	dataset.require_column(field.column())?;

	let mut groups: BTreeMap<ClusterId, Accumulator> = BTreeMap::new();

	for record in dataset.records() {
		if let Some(value) = field.value(record) {
			groups.entry(record.cluster).or_default().push(value);
		}
	}

	Ok(groups
		.into_iter()
		.filter_map(|(cluster, acc)| {
			acc.mean().map(|mean| ClusterMean { cluster, mean, count: acc.count })
		})
		.collect())
}

/// Per-cluster mean of `current - prior`, ordered by cluster id.
pub fn cluster_deltas(
	dataset: &Dataset,
	prior: ScoreField,
	current: ScoreField,
) -> Result<Vec<ClusterDelta>> {
	dataset.require_column(prior.column())?;
	dataset.require_column(current.column())?;

	#[derive(Default)]
	struct Group {
		prior: Accumulator,
		current: Accumulator,
		delta: Accumulator,
	}

	let mut groups: BTreeMap<ClusterId, Group> = BTreeMap::new();

	for record in dataset.records() {
		let group = groups.entry(record.cluster).or_default();
		let prior_value = prior.value(record);
		let current_value = current.value(record);

		if let Some(value) = prior_value {
			group.prior.push(value);
		}
		if let Some(value) = current_value {
			group.current.push(value);
		}
		if let (Some(before), Some(after)) = (prior_value, current_value) {
			group.delta.push(after - before);
		}
	}

	Ok(groups
		.into_iter()
		.filter_map(|(cluster, group)| {
			let delta_mean = group.delta.mean()?;

			Some(ClusterDelta {
				cluster,
				prior_mean: group.prior.mean(),
				current_mean: group.current.mean(),
				delta_mean,
				count: group.delta.count,
				direction: ChangeDirection::classify(delta_mean),
			})
		})
		.collect())
}

pub fn clusters_with_direction(deltas: &[ClusterDelta], direction: ChangeDirection) -> Vec<ClusterId> {
	deltas.iter().filter(|delta| delta.direction == direction).map(|delta| delta.cluster).collect()
}

#[cfg(test)]
mod tests {
	use crate::{
		Dataset, Record,
		aggregate::{ChangeDirection, ScoreField, cluster_deltas, cluster_means},
	};

	fn columns(names: &[&str]) -> Vec<String> {
		names.iter().map(|name| name.to_string()).collect()
	}

	fn record(cluster: u32, elo: f64) -> Record {
		Record::new("q", "a", vec![0.0], cluster, elo)
	}

	#[test]
	fn field_names_parse() {
		assert_eq!("cluster_elo".parse::<ScoreField>().unwrap(), ScoreField::ClusterElo);
		assert_eq!("elo_new".parse::<ScoreField>().unwrap(), ScoreField::EloNew);
		assert!("elo".parse::<ScoreField>().is_err());
	}

	#[test]
	fn means_skip_absent_values() {
		let mut with_old = record(1, 10.0);

		with_old.elo_old = Some(4.0);

		let dataset = Dataset::new(
			columns(&["cluster", "cluster_elo", "elo_old"]),
			vec![with_old, record(1, 20.0), record(2, 5.0)],
		);
		let means = cluster_means(&dataset, ScoreField::EloOld).unwrap();

		assert_eq!(means.len(), 1);
		assert_eq!(means[0].cluster, 1);
		assert_eq!(means[0].mean, 4.0);
		assert_eq!(means[0].count, 1);
	}

	#[test]
	fn zero_delta_is_unchanged() {
		assert_eq!(ChangeDirection::classify(0.0), ChangeDirection::Unchanged);
		assert_eq!(ChangeDirection::classify(-0.01), ChangeDirection::Decreased);
		assert_eq!(ChangeDirection::classify(0.01), ChangeDirection::Increased);
	}

	#[test]
	fn deltas_require_both_columns() {
		let dataset = Dataset::new(columns(&["cluster", "cluster_elo"]), vec![record(1, 10.0)]);
		let err = cluster_deltas(&dataset, ScoreField::EloOld, ScoreField::ClusterElo)
			.expect_err("Expected missing column.");

		assert_eq!(err.to_string(), "Missing expected column: elo_old.");
	}
}
