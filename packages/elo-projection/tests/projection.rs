use elo_projection::{Error, Point2, Projector, Tsne, TsneParams};

fn quick_params() -> TsneParams {
	TsneParams { max_iter: 300, exaggeration_iter: 100, ..TsneParams::default() }
}

fn blobs() -> Vec<Vec<f64>> {
	let mut rows = Vec::new();

	for i in 0..10 {
		let jitter = i as f64 * 0.01;

		rows.push(vec![0.0 + jitter, 0.0, 0.1 - jitter]);
		rows.push(vec![10.0 + jitter, 10.0, 9.9 - jitter]);
	}

	rows
}

fn as_slices(rows: &[Vec<f64>]) -> Vec<&[f64]> {
	rows.iter().map(Vec::as_slice).collect()
}

fn dist(a: Point2, b: Point2) -> f64 {
	((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[test]
fn output_length_matches_input_for_any_non_empty_stack() {
	let tsne = Tsne::new(quick_params());

	for n in [1_usize, 2, 3, 7] {
		let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i * i) as f64]).collect();
		let points = tsne.project(&as_slices(&rows)).expect("Projection must succeed.");

		assert_eq!(points.len(), n);
		assert!(points.iter().all(|point| point.x.is_finite() && point.y.is_finite()));
	}
}

#[test]
fn fixed_seed_is_deterministic() {
	let rows = blobs();
	let tsne = Tsne::new(quick_params());
	let first = tsne.project(&as_slices(&rows)).expect("Projection must succeed.");
	let second = tsne.project(&as_slices(&rows)).expect("Projection must succeed.");

	assert_eq!(first, second);
}

#[test]
fn separated_groups_stay_separated() {
	let rows = blobs();
	let params = TsneParams { perplexity: 5.0, ..TsneParams::default() };
	let points = Tsne::new(params).project(&as_slices(&rows)).expect("Projection must succeed.");
	let mut within = 0.0_f64;
	let mut between = f64::INFINITY;

	for i in 0..points.len() {
		for j in (i + 1)..points.len() {
			let d = dist(points[i], points[j]);

			if i % 2 == j % 2 {
				within = within.max(d);
			} else {
				between = between.min(d);
			}
		}
	}

	assert!(between > within, "between = {between}, within = {within}");
}

#[test]
fn mismatched_dimensions_fail() {
	let rows = vec![vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0], vec![4.0, 5.0]];
	let err = Tsne::default().project(&as_slices(&rows)).expect_err("Expected mismatch.");

	assert!(
		matches!(err, Error::DimensionMismatch { row: 2, expected: 3, found: 2 }),
		"Unexpected error: {err:?}"
	);
}

#[test]
fn empty_input_fails() {
	let err = Tsne::default().project(&[]).expect_err("Expected empty error.");

	assert!(matches!(err, Error::Empty));
}
