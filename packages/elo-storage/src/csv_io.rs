use std::{
	collections::{BTreeMap, HashMap},
	fs::File,
	io::{Read, Write},
	path::Path,
};

use elo_domain::{
	COLUMN_ANSWER, COLUMN_CLUSTER, COLUMN_CLUSTER_ELO, COLUMN_ELO_NEW, COLUMN_ELO_OLD,
	COLUMN_EMBEDDING, COLUMN_QUERY, COLUMN_REASON, COLUMN_REASON_DETAIL, COLUMN_THEME,
	Dataset, KNOWN_COLUMNS, REQUIRED_COLUMNS, Record,
	embedding::parse_embedding,
	parse::{parse_cluster, parse_optional_score, parse_optional_text, parse_score},
};

use crate::{Error, Result};

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Which columns a source must carry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Schema {
	/// The dashboard's base file.
	Base,
	/// A user upload, which also needs the prior score for delta analysis.
	Upload,
}
impl Schema {
	pub fn required_columns(self) -> &'static [&'static str] {
		const UPLOAD: [&str; 6] = [
			COLUMN_QUERY,
			COLUMN_ANSWER,
			COLUMN_EMBEDDING,
			COLUMN_CLUSTER,
			COLUMN_CLUSTER_ELO,
			COLUMN_ELO_OLD,
		];

		match self {
			Self::Base => &REQUIRED_COLUMNS,
			Self::Upload => &UPLOAD,
		}
	}

	pub fn check(self, dataset: &Dataset) -> Result<()> {
		for column in self.required_columns() {
			dataset.require_column(column)?;
		}

		Ok(())
	}
}

pub fn load_path(path: &Path, schema: Schema) -> Result<Dataset> {
	let file = File::open(path)
		.map_err(|err| Error::ReadDataset { path: path.to_path_buf(), source: err })?;
	let dataset = load_reader(file, schema)?;

	tracing::info!(path = %path.display(), rows = dataset.len(), "Dataset loaded.");

	Ok(dataset)
}

pub fn load_bytes(bytes: &[u8], schema: Schema) -> Result<Dataset> {
	load_reader(bytes, schema)
}

/// Parses a whole CSV source. Any malformed row fails the load; no partial dataset is returned.
pub fn load_reader<R>(reader: R, schema: Schema) -> Result<Dataset>
where
	R: Read,
{
	let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
	let columns: Vec<String> = reader
		.headers()?
		.iter()
		.enumerate()
		.map(|(i, name)| {
			let name = if i == 0 { name.trim_start_matches('\u{feff}') } else { name };

			name.to_string()
		})
		.collect();
	let index: HashMap<&str, usize> =
		columns.iter().enumerate().map(|(i, name)| (name.as_str(), i)).collect();

	for column in schema.required_columns() {
		if !index.contains_key(column) {
			return Err(elo_domain::Error::MissingColumn { column: column.to_string() }.into());
		}
	}

	let extra_columns: Vec<(&str, usize)> = columns
		.iter()
		.enumerate()
		.filter(|(_, name)| !KNOWN_COLUMNS.contains(&name.as_str()))
		.map(|(i, name)| (name.as_str(), i))
		.collect();
	let mut records = Vec::new();

	for (offset, row) in reader.records().enumerate() {
		let row = row?;
		let line = offset + 1;
		let required = |column: &str| cell(&row, &index, column).unwrap_or_default().to_string();
		let mut record = Record::new(
			required(COLUMN_QUERY),
			required(COLUMN_ANSWER),
			parse_embedding(&required(COLUMN_EMBEDDING), line)?,
			parse_cluster(&required(COLUMN_CLUSTER), line)?,
			parse_score(&required(COLUMN_CLUSTER_ELO), line, COLUMN_CLUSTER_ELO)?,
		);

		if let Some(raw) = cell(&row, &index, COLUMN_ELO_OLD) {
			record.elo_old = parse_optional_score(raw, line, COLUMN_ELO_OLD)?;
		}
		if let Some(raw) = cell(&row, &index, COLUMN_ELO_NEW) {
			record.elo_new = parse_optional_score(raw, line, COLUMN_ELO_NEW)?;
		}

		record.theme_of_cluster = cell(&row, &index, COLUMN_THEME).and_then(parse_optional_text);
		record.reason = cell(&row, &index, COLUMN_REASON).and_then(parse_optional_text);
		record.reason_detail =
			cell(&row, &index, COLUMN_REASON_DETAIL).and_then(parse_optional_text);
		record.extra = extra_columns
			.iter()
			.filter_map(|(name, i)| row.get(*i).map(|value| (name.to_string(), value.to_string())))
			.collect::<BTreeMap<_, _>>();

		records.push(record);
	}

	Ok(Dataset::new(columns, records))
}

fn cell<'a>(row: &'a csv::StringRecord, index: &HashMap<&str, usize>, column: &str) -> Option<&'a str> {
	index.get(column).and_then(|i| row.get(*i))
}

/// Writes `dataset` as CSV prefixed with a UTF-8 byte-order marker.
pub fn write_csv<W>(dataset: &Dataset, mut writer: W) -> Result<W>
where
	W: Write,
{
	writer.write_all(UTF8_BOM)?;

	let mut csv_writer = csv::Writer::from_writer(writer);

	csv_writer.write_record(dataset.columns())?;

	for record in dataset.records() {
		csv_writer.write_record(
			dataset.columns().iter().map(|column| record.cell(column).unwrap_or_default()),
		)?;
	}

	csv_writer.flush()?;

	csv_writer.into_inner().map_err(|err| Error::Io(err.into_error()))
}

pub fn write_csv_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
	write_csv(dataset, Vec::new())
}

#[cfg(test)]
mod tests {
	use crate::{
		Error,
		csv_io::{Schema, load_bytes},
	};

	#[test]
	fn bom_prefixed_header_is_recognized() {
		let raw = "\u{feff}query,answer,embedding,cluster,cluster_elo\nq,a,\"[1, 2]\",3,1500\n";
		let dataset = load_bytes(raw.as_bytes(), Schema::Base).expect("Failed to load.");

		assert_eq!(dataset.columns()[0], "query");
		assert_eq!(dataset.records()[0].embedding, vec![1.0, 2.0]);
	}

	#[test]
	fn upload_schema_requires_prior_score() {
		let raw = "query,answer,embedding,cluster,cluster_elo\nq,a,\"[1, 2]\",3,1500\n";
		let err = load_bytes(raw.as_bytes(), Schema::Upload).expect_err("Expected missing column.");

		assert!(
			matches!(&err, Error::Domain(elo_domain::Error::MissingColumn { column }) if column == "elo_old"),
			"Unexpected error: {err:?}"
		);
	}
}
