//! Exact t-SNE with a fixed seed.
//!
//! The optimizer follows the usual schedule: an early-exaggeration phase with momentum 0.5,
//! then plain gradient descent with momentum 0.8, both with per-coordinate adaptive gains.

use std::time::Instant;

use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};

use crate::{Point2, Projector, Result, validate_embeddings};

const MACHINE_EPSILON: f64 = f64::EPSILON;
const MIN_SUM_P: f64 = 1e-8;
const ENTROPY_TOLERANCE: f64 = 1e-5;
const MAX_BINARY_SEARCH_STEPS: usize = 100;
const INITIAL_SCALE: f64 = 1e-4;
const MIN_GAIN: f64 = 0.01;
const EXPLORATION_MOMENTUM: f64 = 0.5;
const FINAL_MOMENTUM: f64 = 0.8;

#[derive(Clone, Debug, PartialEq)]
pub struct TsneParams {
	pub perplexity: f64,
	pub seed: u64,
	pub max_iter: usize,
	pub early_exaggeration: f64,
	pub exaggeration_iter: usize,
	/// Derived as `max(n / early_exaggeration / 4, 50)` when absent.
	pub learning_rate: Option<f64>,
}
impl Default for TsneParams {
	fn default() -> Self {
		Self::from(&elo_config::Projection::default())
	}
}
impl From<&elo_config::Projection> for TsneParams {
	fn from(cfg: &elo_config::Projection) -> Self {
		Self {
			perplexity: cfg.perplexity,
			seed: cfg.seed,
			max_iter: cfg.max_iter,
			early_exaggeration: cfg.early_exaggeration,
			exaggeration_iter: cfg.exaggeration_iter,
			learning_rate: cfg.learning_rate,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct Tsne {
	params: TsneParams,
}
impl Tsne {
	pub fn new(params: TsneParams) -> Self {
		Self { params }
	}

	pub fn params(&self) -> &TsneParams {
		&self.params
	}

	fn learning_rate(&self, n: usize) -> f64 {
		self.params
			.learning_rate
			.unwrap_or_else(|| (n as f64 / self.params.early_exaggeration / 4.0).max(50.0))
	}

	fn optimize(&self, p: &[f64], n: usize) -> Vec<[f64; 2]> {
		let mut rng = StdRng::seed_from_u64(self.params.seed);
		let mut y: Vec<[f64; 2]> = (0..n)
			.map(|_| {
				let x: f64 = StandardNormal.sample(&mut rng);
				let y: f64 = StandardNormal.sample(&mut rng);

				[x * INITIAL_SCALE, y * INITIAL_SCALE]
			})
			.collect();
		let mut update = vec![[0.0_f64; 2]; n];
		let mut gains = vec![[1.0_f64; 2]; n];
		let mut num = vec![0.0_f64; n * n];
		let mut grad = vec![[0.0_f64; 2]; n];
		let learning_rate = self.learning_rate(n);

		for iter in 0..self.params.max_iter {
			let exploring = iter < self.params.exaggeration_iter;
			let exaggeration = if exploring { self.params.early_exaggeration } else { 1.0 };
			let momentum = if exploring { EXPLORATION_MOMENTUM } else { FINAL_MOMENTUM };
			let mut sum_num = 0.0;

			for i in 0..n {
				num[i * n + i] = 0.0;

				for j in (i + 1)..n {
					let dx = y[i][0] - y[j][0];
					let dy = y[i][1] - y[j][1];
					let value = 1.0 / (1.0 + dx * dx + dy * dy);

					num[i * n + j] = value;
					num[j * n + i] = value;
					sum_num += 2.0 * value;
				}
			}

			let sum_num = sum_num.max(MACHINE_EPSILON);

			for i in 0..n {
				let mut gx = 0.0;
				let mut gy = 0.0;

				for j in 0..n {
					if i == j {
						continue;
					}

					let q = (num[i * n + j] / sum_num).max(MACHINE_EPSILON);
					let weight = (exaggeration * p[i * n + j] - q) * num[i * n + j];

					gx += weight * (y[i][0] - y[j][0]);
					gy += weight * (y[i][1] - y[j][1]);
				}

				grad[i] = [4.0 * gx, 4.0 * gy];
			}

			for i in 0..n {
				for d in 0..2 {
					let g = grad[i][d];
					let gain = if update[i][d] * g < 0.0 {
						gains[i][d] + 0.2
					} else {
						gains[i][d] * 0.8
					};

					gains[i][d] = gain.max(MIN_GAIN);
					update[i][d] = momentum * update[i][d] - learning_rate * gains[i][d] * g;
					y[i][d] += update[i][d];
				}
			}
		}

		y
	}
}
impl Projector for Tsne {
	fn project(&self, embeddings: &[&[f64]]) -> Result<Vec<Point2>> {
		let dims = validate_embeddings(embeddings)?;
		let n = embeddings.len();

		if n == 1 {
			return Ok(vec![Point2 { x: 0.0, y: 0.0 }]);
		}

		let started = Instant::now();
		let perplexity = self.params.perplexity.min((n - 1) as f64);
		let distances = squared_distances(embeddings);
		let p = joint_probabilities(&distances, n, perplexity);
		let points = self
			.optimize(&p, n)
			.into_iter()
			.map(|[x, y]| Point2 { x, y })
			.collect::<Vec<_>>();

		tracing::info!(
			n_points = n,
			dims,
			perplexity,
			elapsed_ms = started.elapsed().as_millis() as u64,
			"t-SNE projection complete."
		);

		Ok(points)
	}
}

fn squared_distances(embeddings: &[&[f64]]) -> Vec<f64> {
	let n = embeddings.len();
	let mut out = vec![0.0; n * n];

	for i in 0..n {
		for j in (i + 1)..n {
			let d: f64 =
				embeddings[i].iter().zip(embeddings[j].iter()).map(|(a, b)| (a - b) * (a - b)).sum();

			out[i * n + j] = d;
			out[j * n + i] = d;
		}
	}

	out
}

/// Symmetric joint probabilities `P = (P_j|i + P_i|j) / sum`, each conditional row calibrated
/// by binary search on the Gaussian precision to hit the target perplexity.
fn joint_probabilities(distances: &[f64], n: usize, perplexity: f64) -> Vec<f64> {
	let target_entropy = perplexity.ln();
	let mut conditional = vec![0.0; n * n];
	let mut row = vec![0.0; n];

	for i in 0..n {
		let offset = (0..n)
			.filter(|&j| j != i)
			.map(|j| distances[i * n + j])
			.fold(f64::INFINITY, f64::min);
		let mut beta = 1.0;
		let mut beta_min = f64::NEG_INFINITY;
		let mut beta_max = f64::INFINITY;

		for _ in 0..MAX_BINARY_SEARCH_STEPS {
			let mut sum_p = 0.0;
			let mut sum_dp = 0.0;

			for j in 0..n {
				if j == i {
					row[j] = 0.0;

					continue;
				}

				let shifted = distances[i * n + j] - offset;
				let value = (-shifted * beta).exp();

				row[j] = value;
				sum_p += value;
				sum_dp += shifted * value;
			}

			let sum_p = sum_p.max(MIN_SUM_P);

			for value in row.iter_mut() {
				*value /= sum_p;
			}

			let entropy = sum_p.ln() + beta * sum_dp / sum_p;
			let diff = entropy - target_entropy;

			if diff.abs() <= ENTROPY_TOLERANCE {
				break;
			}

			if diff > 0.0 {
				beta_min = beta;
				beta = if beta_max.is_infinite() { beta * 2.0 } else { (beta + beta_max) / 2.0 };
			} else {
				beta_max = beta;
				beta = if beta_min.is_infinite() { beta / 2.0 } else { (beta + beta_min) / 2.0 };
			}
		}

		conditional[i * n..(i + 1) * n].copy_from_slice(&row);
	}

	let mut joint = vec![0.0; n * n];
	let mut total = 0.0;

	for i in 0..n {
		for j in 0..n {
			let value = conditional[i * n + j] + conditional[j * n + i];

			joint[i * n + j] = value;
			total += value;
		}
	}

	let total = total.max(MACHINE_EPSILON);

	for (index, value) in joint.iter_mut().enumerate() {
		*value = if index / n == index % n { 0.0 } else { (*value / total).max(MACHINE_EPSILON) };
	}

	joint
}

#[cfg(test)]
mod tests {
	use crate::tsne::joint_probabilities;

	#[test]
	fn joint_probabilities_are_symmetric_and_normalized() {
		let n = 4;
		let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 2.0], [3.0, 3.0]];
		let mut distances = vec![0.0; n * n];

		for i in 0..n {
			for j in 0..n {
				let dx: f64 = points[i][0] - points[j][0];
				let dy: f64 = points[i][1] - points[j][1];

				distances[i * n + j] = dx * dx + dy * dy;
			}
		}

		let p = joint_probabilities(&distances, n, 2.0);
		let total: f64 = p.iter().sum();

		assert!((total - 1.0).abs() < 1e-9, "total = {total}");

		for i in 0..n {
			assert_eq!(p[i * n + i], 0.0);

			for j in 0..n {
				assert!((p[i * n + j] - p[j * n + i]).abs() < 1e-12);
			}
		}
	}
}
