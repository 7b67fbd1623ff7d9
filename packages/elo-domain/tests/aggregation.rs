use rand::{SeedableRng, rngs::StdRng};

use elo_domain::{
	Dataset, Record,
	aggregate::{
		ChangeDirection, ScoreField, cluster_deltas, cluster_means, clusters_with_direction,
	},
	sample::sample_cluster,
};

fn columns(names: &[&str]) -> Vec<String> {
	names.iter().map(|name| name.to_string()).collect()
}

fn scored(cluster: u32, elo: f64, elo_old: Option<f64>) -> Record {
	let mut record = Record::new(format!("q-{cluster}-{elo}"), "answer", vec![0.0, 1.0], cluster, elo);

	record.elo_old = elo_old;

	record
}

#[test]
fn two_cluster_means() {
	let dataset = Dataset::new(
		columns(&["query", "answer", "embedding", "cluster", "cluster_elo"]),
		vec![scored(1, 10.0, None), scored(1, 20.0, None), scored(2, 5.0, None)],
	);
	let means = cluster_means(&dataset, ScoreField::ClusterElo).expect("Failed to aggregate.");
	let pairs: Vec<(u32, f64)> = means.iter().map(|mean| (mean.cluster, mean.mean)).collect();

	assert_eq!(pairs, vec![(1, 15.0), (2, 5.0)]);
}

#[test]
fn weighted_means_reconstruct_the_total() {
	let values = [1_512.5, 1_480.0, 1_499.25, 1_530.0, 1_470.75, 1_505.0, 1_488.0];
	let records = values
		.iter()
		.enumerate()
		.map(|(i, value)| scored((i % 3) as u32 * 7, *value, None))
		.collect();
	let dataset = Dataset::new(columns(&["cluster", "cluster_elo"]), records);
	let means = cluster_means(&dataset, ScoreField::ClusterElo).expect("Failed to aggregate.");
	let reconstructed: f64 = means.iter().map(|mean| mean.mean * mean.count as f64).sum();
	let total: f64 = values.iter().sum();

	assert!((reconstructed - total).abs() < 1e-9, "{reconstructed} != {total}");
	assert_eq!(means.iter().map(|mean| mean.count).sum::<usize>(), values.len());
}

#[test]
fn negative_mean_delta_is_decreased() {
	let dataset = Dataset::new(
		columns(&["cluster", "cluster_elo", "elo_old"]),
		vec![scored(1, 8.0, Some(10.0)), scored(1, 9.0, Some(10.0)), scored(2, 12.0, Some(10.0))],
	);
	let deltas = cluster_deltas(&dataset, ScoreField::EloOld, ScoreField::ClusterElo)
		.expect("Failed to compute deltas.");

	assert_eq!(deltas.len(), 2);
	assert_eq!(deltas[0].cluster, 1);
	assert_eq!(deltas[0].delta_mean, -1.5);
	assert_eq!(deltas[0].direction, ChangeDirection::Decreased);
	assert_eq!(deltas[0].prior_mean, Some(10.0));
	assert_eq!(deltas[0].current_mean, Some(8.5));
	assert_eq!(deltas[1].direction, ChangeDirection::Increased);
	assert_eq!(clusters_with_direction(&deltas, ChangeDirection::Decreased), vec![1]);
	assert_eq!(clusters_with_direction(&deltas, ChangeDirection::Increased), vec![2]);
}

#[test]
fn clusters_without_paired_values_are_omitted_from_deltas() {
	let dataset = Dataset::new(
		columns(&["cluster", "cluster_elo", "elo_old"]),
		vec![scored(1, 8.0, Some(10.0)), scored(3, 9.0, None)],
	);
	let deltas = cluster_deltas(&dataset, ScoreField::EloOld, ScoreField::ClusterElo)
		.expect("Failed to compute deltas.");

	assert_eq!(deltas.iter().map(|delta| delta.cluster).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn sample_size_is_bounded_by_max_and_availability() {
	let mut records = Vec::new();

	for cluster in 1..=5_u32 {
		for _ in 0..cluster {
			records.push(scored(cluster, 1_500.0, None));
		}
	}

	let dataset = Dataset::new(columns(&["query", "answer", "cluster"]), records);
	let mut rng = StdRng::seed_from_u64(2_024);

	for cluster in 0..=6_u32 {
		let available = dataset.in_cluster(cluster).count();
		let sample = sample_cluster(&dataset, cluster, 3, &mut rng);

		assert!(sample.rows().len() <= 3);
		assert!(sample.rows().len() <= available);
		assert_eq!(sample.is_placeholder(), available == 0, "cluster {cluster}");

		if available > 0 {
			assert_eq!(sample.rows().len(), available.min(3));
		}
	}
}
