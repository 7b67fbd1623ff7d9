use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
	COLUMN_ANSWER, COLUMN_CLUSTER, COLUMN_CLUSTER_ELO, COLUMN_ELO_NEW, COLUMN_ELO_OLD,
	COLUMN_EMBEDDING, COLUMN_QUERY, COLUMN_REASON, COLUMN_REASON_DETAIL, COLUMN_THEME, Error,
	Result, embedding,
};

pub type ClusterId = u32;

/// One feedback item. Its identifier is the row index inside the owning [`Dataset`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
	pub query: String,
	pub answer: String,
	pub embedding: Vec<f64>,
	pub cluster: ClusterId,
	pub cluster_elo: f64,
	pub elo_old: Option<f64>,
	pub elo_new: Option<f64>,
	pub theme_of_cluster: Option<String>,
	pub reason: Option<String>,
	pub reason_detail: Option<String>,
	/// Source columns without a typed slot, kept verbatim for export.
	pub extra: BTreeMap<String, String>,
}
impl Record {
	pub fn new(
		query: impl Into<String>,
		answer: impl Into<String>,
		embedding: Vec<f64>,
		cluster: ClusterId,
		cluster_elo: f64,
	) -> Self {
		Self {
			query: query.into(),
			answer: answer.into(),
			embedding,
			cluster,
			cluster_elo,
			elo_old: None,
			elo_new: None,
			theme_of_cluster: None,
			reason: None,
			reason_detail: None,
			extra: BTreeMap::new(),
		}
	}

	/// Renders the cell stored under `column` the way the CSV export writes it.
	pub fn cell(&self, column: &str) -> Option<String> {
		match column {
			COLUMN_QUERY => Some(self.query.clone()),
			COLUMN_ANSWER => Some(self.answer.clone()),
			COLUMN_EMBEDDING => Some(embedding::render_embedding(&self.embedding)),
			COLUMN_CLUSTER => Some(self.cluster.to_string()),
			COLUMN_CLUSTER_ELO => Some(self.cluster_elo.to_string()),
			COLUMN_ELO_OLD => self.elo_old.map(|value| value.to_string()),
			COLUMN_ELO_NEW => self.elo_new.map(|value| value.to_string()),
			COLUMN_THEME => self.theme_of_cluster.clone(),
			COLUMN_REASON => self.reason.clone(),
			COLUMN_REASON_DETAIL => self.reason_detail.clone(),
			other => self.extra.get(other).cloned(),
		}
	}
}

/// Ordered records plus the column names their source carried.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
	columns: Vec<String>,
	records: Vec<Record>,
}
impl Dataset {
	pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
		Self { columns, records }
	}

	pub fn columns(&self) -> &[String] {
		&self.columns
	}

	pub fn records(&self) -> &[Record] {
		&self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn has_column(&self, column: &str) -> bool {
		self.columns.iter().any(|name| name == column)
	}

	pub fn require_column(&self, column: &str) -> Result<()> {
		if self.has_column(column) {
			Ok(())
		} else {
			Err(Error::MissingColumn { column: column.to_string() })
		}
	}

	pub fn in_cluster(&self, cluster: ClusterId) -> impl Iterator<Item = (usize, &Record)> {
		self.records.iter().enumerate().filter(move |(_, record)| record.cluster == cluster)
	}

	pub fn embeddings(&self) -> Vec<&[f64]> {
		self.records.iter().map(|record| record.embedding.as_slice()).collect()
	}

	/// Appends `other` after `self`. Columns are unioned in first-seen order and row indices of
	/// `other` shift by `self.len()`.
	pub fn concat(&self, other: &Dataset) -> Dataset {
		let mut columns = self.columns.clone();

		for column in &other.columns {
			if !columns.contains(column) {
				columns.push(column.clone());
			}
		}

		let mut records = Vec::with_capacity(self.records.len() + other.records.len());

		records.extend(self.records.iter().cloned());
		records.extend(other.records.iter().cloned());

		Dataset { columns, records }
	}
}
