use serde::Serialize;

use elo_domain::{
	ClusterId,
	aggregate::{self, ClusterMean, ScoreField},
	cluster,
};

use crate::{
	DashboardService, Result,
	views::{self, EloBarChart, ScatterPlot},
};

#[derive(Clone, Debug, Serialize)]
pub struct DashboardOverview {
	pub rows: usize,
	pub scatter: ScatterPlot,
	pub elo_bars: EloBarChart,
	pub cluster_options: Vec<ClusterId>,
	pub max_samples: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScoreMeans {
	pub field: ScoreField,
	pub means: Vec<ClusterMean>,
}

impl DashboardService {
	pub fn overview(&self) -> Result<DashboardOverview> {
		let base = self.base()?;
		let means = aggregate::cluster_means(&base, ScoreField::ClusterElo)?;

		Ok(DashboardOverview {
			rows: base.len(),
			scatter: views::scatter_plot(
				&base,
				self.base_points(),
				"t-SNE map of feedback clusters".to_string(),
			),
			elo_bars: views::elo_bar_chart(&means, "Mean Elo by cluster".to_string()),
			cluster_options: cluster::cluster_ids(&base),
			max_samples: self.cfg.sampling.max_samples,
		})
	}

	/// Per-cluster means of the named score column over the base dataset.
	pub fn score_means(&self, field: &str) -> Result<ScoreMeans> {
		let field = field.parse::<ScoreField>()?;
		let base = self.base()?;

		Ok(ScoreMeans { field, means: aggregate::cluster_means(&base, field)? })
	}
}
