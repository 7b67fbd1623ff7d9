use serde::Serialize;
use uuid::Uuid;

use elo_domain::{
	ClusterId,
	cluster::{self, ClusterSummary},
	sample::{self, Sample},
};

use crate::{DashboardService, Error, Result, session::SessionContext};

/// Info card and representative samples for the selected cluster.
#[derive(Clone, Debug, Serialize)]
pub struct ClusterSelection {
	pub session_id: Uuid,
	#[serde(flatten)]
	pub summary: ClusterSummary,
	pub sample: Sample,
	/// False when the stored sample was reused because the selection did not change.
	pub resampled: bool,
}

impl DashboardService {
	/// Selects `cluster` for the session. Samples are redrawn only when the selection changes.
	pub fn select_cluster(&self, session_id: Uuid, cluster: ClusterId) -> Result<ClusterSelection> {
		self.explore(session_id, cluster, false)
	}

	/// Draws a fresh sample for `cluster` and makes it the selection.
	pub fn reroll(&self, session_id: Uuid, cluster: ClusterId) -> Result<ClusterSelection> {
		self.explore(session_id, cluster, true)
	}

	fn explore(&self, session_id: Uuid, cluster: ClusterId, force: bool) -> Result<ClusterSelection> {
		let base = self.base()?;
		let summary =
			cluster::summarize_cluster(&base, cluster).ok_or(Error::ClusterNotFound { cluster })?;
		let max_samples = self.cfg.sampling.max_samples;

		self.sessions().with_session(session_id, |context: &mut SessionContext| {
			let stale = context.last_selected_cluster != Some(cluster) || context.sample.is_none();
			let resampled = force || stale;

			if resampled {
				let drawn = sample::sample_cluster(&base, cluster, max_samples, &mut context.rng);

				context.sample = Some(drawn);
				context.last_selected_cluster = Some(cluster);

				tracing::debug!(session_id = %session_id, cluster, "Cluster sample drawn.");
			}

			let sample = context.sample.clone().unwrap_or_else(Sample::no_data);

			Ok(ClusterSelection { session_id, summary, sample, resampled })
		})
	}
}
