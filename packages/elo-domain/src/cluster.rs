use std::collections::BTreeSet;

use serde::Serialize;

use crate::{ClusterId, Dataset};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterSummary {
	pub cluster: ClusterId,
	pub theme: Option<String>,
	pub count: usize,
	pub mean_elo: f64,
}

/// Sorted unique cluster ids.
pub fn cluster_ids(dataset: &Dataset) -> Vec<ClusterId> {
	dataset.records().iter().map(|record| record.cluster).collect::<BTreeSet<_>>().into_iter().collect()
}

/// Theme of the first record observed in `cluster`.
pub fn cluster_theme(dataset: &Dataset, cluster: ClusterId) -> Option<&str> {
	dataset.in_cluster(cluster).next().and_then(|(_, record)| record.theme_of_cluster.as_deref())
}

pub fn summarize_cluster(dataset: &Dataset, cluster: ClusterId) -> Option<ClusterSummary> {
	let mut count = 0_usize;
	let mut sum = 0.0;

	for (_, record) in dataset.in_cluster(cluster) {
		count += 1;
		sum += record.cluster_elo;
	}

	if count == 0 {
		return None;
	}

	Some(ClusterSummary {
		cluster,
		theme: cluster_theme(dataset, cluster).map(str::to_string),
		count,
		mean_elo: sum / count as f64,
	})
}

#[cfg(test)]
mod tests {
	use crate::{
		Dataset, Record,
		cluster::{cluster_ids, cluster_theme, summarize_cluster},
	};

	#[test]
	fn theme_comes_from_first_record() {
		let mut first = Record::new("q1", "a1", vec![0.0], 4, 10.0);
		let mut second = Record::new("q2", "a2", vec![0.0], 4, 30.0);

		first.theme_of_cluster = Some("Billing".to_string());
		second.theme_of_cluster = Some("Refunds".to_string());

		let dataset = Dataset::new(Vec::new(), vec![Record::new("q0", "a0", vec![0.0], 9, 1.0), first, second]);

		assert_eq!(cluster_ids(&dataset), vec![4, 9]);
		assert_eq!(cluster_theme(&dataset, 4), Some("Billing"));

		let summary = summarize_cluster(&dataset, 4).unwrap();

		assert_eq!(summary.count, 2);
		assert_eq!(summary.mean_elo, 20.0);
		assert!(summarize_cluster(&dataset, 1).is_none());
	}
}
