//! Chart-ready view models handed to the front end. Nothing here renders.

use std::collections::BTreeMap;

use serde::Serialize;

use elo_domain::{
	ClusterId, Dataset,
	aggregate::{ClusterDelta, ClusterMean},
	cluster,
};
use elo_projection::Point2;

/// Qualitative palette with one discrete color per cluster, cycled when clusters outnumber it.
pub const CLUSTER_PALETTE: [&str; 11] = [
	"#88CCEE", "#CC6677", "#DDCC77", "#117733", "#332288", "#AA4499", "#44AA99", "#999933",
	"#882255", "#661100", "#888888",
];
pub const PRIOR_SERIES_COLOR: &str = "#D8BFD8";
pub const CURRENT_SERIES_COLOR: &str = "#6A0DAD";

#[derive(Clone, Debug, Serialize)]
pub struct LegendEntry {
	pub cluster: ClusterId,
	pub color: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScatterPoint {
	pub row: usize,
	pub cluster: ClusterId,
	pub x: f64,
	pub y: f64,
	pub theme: Option<String>,
	pub color: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScatterPlot {
	pub title: String,
	pub legend: Vec<LegendEntry>,
	pub points: Vec<ScatterPoint>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EloBar {
	pub cluster: ClusterId,
	pub mean_elo: f64,
	pub count: usize,
	/// Min-max scaled mean in `[0, 1]` for a sequential color scale.
	pub intensity: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct EloBarChart {
	pub title: String,
	pub bars: Vec<EloBar>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComparisonRow {
	pub cluster: ClusterId,
	pub prior: Option<f64>,
	pub current: Option<f64>,
	pub delta: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ComparisonChart {
	pub title: String,
	pub prior_label: &'static str,
	pub current_label: &'static str,
	pub prior_color: &'static str,
	pub current_color: &'static str,
	pub rows: Vec<ComparisonRow>,
}

/// A column-ordered slice of a dataset.
#[derive(Clone, Debug, Serialize)]
pub struct TableView {
	pub columns: Vec<String>,
	pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, Serialize)]
pub struct TableRow {
	pub row: usize,
	pub cells: Vec<Option<String>>,
}

pub fn cluster_colors(dataset: &Dataset) -> BTreeMap<ClusterId, &'static str> {
	cluster::cluster_ids(dataset)
		.into_iter()
		.enumerate()
		.map(|(i, cluster)| (cluster, CLUSTER_PALETTE[i % CLUSTER_PALETTE.len()]))
		.collect()
}

/// Pairs each record with its projected point. `points` must be in record order.
pub fn scatter_plot(dataset: &Dataset, points: &[Point2], title: String) -> ScatterPlot {
	let colors = cluster_colors(dataset);
	let legend =
		colors.iter().map(|(cluster, color)| LegendEntry { cluster: *cluster, color }).collect();
	let points = dataset
		.records()
		.iter()
		.zip(points)
		.enumerate()
		.map(|(row, (record, point))| ScatterPoint {
			row,
			cluster: record.cluster,
			x: point.x,
			y: point.y,
			theme: record.theme_of_cluster.clone(),
			color: colors.get(&record.cluster).copied().unwrap_or(CLUSTER_PALETTE[0]),
		})
		.collect();

	ScatterPlot { title, legend, points }
}

pub fn elo_bar_chart(means: &[ClusterMean], title: String) -> EloBarChart {
	let min = means.iter().map(|mean| mean.mean).fold(f64::INFINITY, f64::min);
	let max = means.iter().map(|mean| mean.mean).fold(f64::NEG_INFINITY, f64::max);
	let span = max - min;
	let bars = means
		.iter()
		.map(|mean| EloBar {
			cluster: mean.cluster,
			mean_elo: mean.mean,
			count: mean.count,
			intensity: if span > 0.0 { (mean.mean - min) / span } else { 1.0 },
		})
		.collect();

	EloBarChart { title, bars }
}

pub fn comparison_chart(deltas: &[ClusterDelta], title: String) -> ComparisonChart {
	ComparisonChart {
		title,
		prior_label: "Previous cluster Elo",
		current_label: "Updated cluster Elo",
		prior_color: PRIOR_SERIES_COLOR,
		current_color: CURRENT_SERIES_COLOR,
		rows: deltas
			.iter()
			.map(|delta| ComparisonRow {
				cluster: delta.cluster,
				prior: delta.prior_mean,
				current: delta.current_mean,
				delta: delta.delta_mean,
			})
			.collect(),
	}
}

/// Rows of `cluster` restricted to `columns`, in dataset order.
pub fn cluster_table(dataset: &Dataset, cluster: ClusterId, columns: &[String]) -> TableView {
	let rows = dataset
		.in_cluster(cluster)
		.map(|(row, record)| TableRow {
			row,
			cells: columns.iter().map(|column| record.cell(column)).collect(),
		})
		.collect();

	TableView { columns: columns.to_vec(), rows }
}
