use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use elo_domain::{
	COLUMN_ANSWER, COLUMN_QUERY, COLUMN_REASON, COLUMN_REASON_DETAIL, ClusterId, Dataset,
	aggregate::{self, ChangeDirection, ClusterDelta, ScoreField},
	cluster,
};
use elo_storage::{Schema, SourceKey};

use crate::{
	DashboardService, Error, Result,
	session::UploadState,
	views::{self, ComparisonChart, ScatterPlot, TableView},
};

#[derive(Clone, Debug, Serialize)]
pub struct ClusterChange {
	pub cluster: ClusterId,
	pub theme: Option<String>,
	pub delta: f64,
	pub message: String,
}

/// Clusters whose uploaded `cluster_elo` moved away from `elo_old`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ChangeSummary {
	pub decreased: Vec<ClusterChange>,
	pub increased: Vec<ClusterChange>,
}

#[derive(Clone, Debug, Serialize)]
pub struct UploadReport {
	pub session_id: Uuid,
	pub uploaded_rows: usize,
	pub combined_rows: usize,
	pub scatter: ScatterPlot,
	pub comparison: ComparisonChart,
	pub summary: ChangeSummary,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegressionList {
	pub session_id: Uuid,
	pub clusters: Vec<ClusterId>,
}

#[derive(Clone, Debug)]
pub struct Download {
	pub file_name: String,
	pub bytes: Vec<u8>,
}

impl DashboardService {
	/// Parses an uploaded CSV, projects it together with the base dataset and stores both on the
	/// session. A failed upload leaves the session's previous upload in place.
	pub fn upload(&self, session_id: Uuid, bytes: &[u8]) -> Result<UploadReport> {
		// Reject unknown sessions before doing any parsing or projection.
		self.sessions().with_session(session_id, |_| Ok(()))?;

		let source = SourceKey::for_bytes(bytes);
		// Uploads live on their session only; the shared cache holds the base dataset.
		let upload = Arc::new(elo_storage::load_bytes(bytes, Schema::Upload)?);
		let base = self.base()?;
		let combined = Arc::new(base.concat(&upload));
		let points = crate::project(self.projector(), &combined)?;
		let deltas = aggregate::cluster_deltas(&upload, ScoreField::EloOld, ScoreField::ClusterElo)?;
		let report = UploadReport {
			session_id,
			uploaded_rows: upload.len(),
			combined_rows: combined.len(),
			scatter: views::scatter_plot(
				&combined,
				&points,
				"t-SNE map of base and uploaded feedback".to_string(),
			),
			comparison: views::comparison_chart(&deltas, "Cluster Elo before and after".to_string()),
			summary: change_summary(&upload, &deltas),
		};

		self.sessions().with_session(session_id, |context| {
			context.upload = Some(UploadState { source: source.clone(), upload, combined });

			Ok(())
		})?;

		tracing::info!(
			session_id = %session_id,
			source = %source,
			uploaded_rows = report.uploaded_rows,
			combined_rows = report.combined_rows,
			decreased = report.summary.decreased.len(),
			increased = report.summary.increased.len(),
			"Upload accepted."
		);

		Ok(report)
	}

	/// Every column of the combined dataset's rows in `cluster`.
	pub fn combined_cluster_rows(&self, session_id: Uuid, cluster: ClusterId) -> Result<TableView> {
		let combined = self.combined(session_id)?;

		if combined.in_cluster(cluster).next().is_none() {
			return Err(Error::ClusterNotFound { cluster });
		}

		Ok(views::cluster_table(&combined, cluster, combined.columns()))
	}

	/// Clusters whose mean `elo_new - elo_old` over the combined dataset is negative, sorted.
	pub fn regressions(&self, session_id: Uuid) -> Result<RegressionList> {
		let combined = self.combined(session_id)?;
		let deltas = regression_deltas(&combined)?;

		Ok(RegressionList {
			session_id,
			clusters: aggregate::clusters_with_direction(&deltas, ChangeDirection::Decreased),
		})
	}

	/// Query, answer and reason rows of a regressed cluster.
	pub fn regression_rows(&self, session_id: Uuid, cluster: ClusterId) -> Result<TableView> {
		let combined = self.combined(session_id)?;
		let deltas = regression_deltas(&combined)?;
		let regressed = deltas
			.iter()
			.any(|delta| delta.cluster == cluster && delta.direction == ChangeDirection::Decreased);

		if !regressed {
			if combined.in_cluster(cluster).next().is_none() {
				return Err(Error::ClusterNotFound { cluster });
			}

			return Err(Error::InvalidRequest {
				message: format!("Cluster {cluster} did not regress."),
			});
		}

		let columns = [COLUMN_QUERY, COLUMN_ANSWER, COLUMN_REASON, COLUMN_REASON_DETAIL]
			.map(String::from);

		Ok(views::cluster_table(&combined, cluster, &columns))
	}

	/// The combined dataset as a UTF-8 CSV with a byte order mark.
	pub fn download(&self, session_id: Uuid) -> Result<Download> {
		let combined = self.combined(session_id)?;
		let bytes = elo_storage::write_csv_bytes(&combined)?;

		tracing::info!(session_id = %session_id, bytes = bytes.len(), "Combined dataset exported.");

		Ok(Download { file_name: self.cfg.upload.download_file_name.clone(), bytes })
	}

	fn combined(&self, session_id: Uuid) -> Result<Arc<Dataset>> {
		self.sessions().with_session(session_id, |context| Ok(context.upload()?.combined.clone()))
	}
}

fn regression_deltas(combined: &Dataset) -> Result<Vec<ClusterDelta>> {
	Ok(aggregate::cluster_deltas(combined, ScoreField::EloOld, ScoreField::EloNew)?)
}

fn change_summary(upload: &Dataset, deltas: &[ClusterDelta]) -> ChangeSummary {
	let mut summary = ChangeSummary::default();

	for delta in deltas {
		let theme = cluster::cluster_theme(upload, delta.cluster).map(str::to_string);
		let label = theme.as_deref().unwrap_or("untitled");
		let (bucket, verb) = match delta.direction {
			ChangeDirection::Decreased => (&mut summary.decreased, "decreased"),
			ChangeDirection::Increased => (&mut summary.increased, "increased"),
			ChangeDirection::Unchanged => continue,
		};

		let message =
			format!("Cluster {} ({label}): {:.2} {verb}", delta.cluster, delta.delta_mean);

		bucket.push(ClusterChange {
			cluster: delta.cluster,
			theme,
			delta: delta.delta_mean,
			message,
		});
	}

	summary
}
