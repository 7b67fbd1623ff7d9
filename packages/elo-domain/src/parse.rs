use crate::{ClusterId, Error, Result};

/// Casts a cluster cell to an integer id. Float text is truncated toward zero.
pub fn parse_cluster(raw: &str, row: usize) -> Result<ClusterId> {
	let trimmed = raw.trim();
	let invalid = || Error::InvalidCluster { row, value: raw.to_string() };

	if let Ok(value) = trimmed.parse::<i64>() {
		return ClusterId::try_from(value).map_err(|_| invalid());
	}

	let value: f64 = trimmed.parse().map_err(|_| invalid())?;

	if !value.is_finite() {
		return Err(invalid());
	}

	let truncated = value.trunc();

	if truncated < 0.0 || truncated > f64::from(ClusterId::MAX) {
		return Err(invalid());
	}

	Ok(truncated as ClusterId)
}

pub fn parse_score(raw: &str, row: usize, column: &str) -> Result<f64> {
	let value: f64 = raw.trim().parse().map_err(|_| Error::InvalidNumber {
		row,
		column: column.to_string(),
		value: raw.to_string(),
	})?;

	if !value.is_finite() {
		return Err(Error::InvalidNumber { row, column: column.to_string(), value: raw.to_string() });
	}

	Ok(value)
}

/// Empty cells are absent values, anything else must be a finite number.
pub fn parse_optional_score(raw: &str, row: usize, column: &str) -> Result<Option<f64>> {
	if raw.trim().is_empty() {
		return Ok(None);
	}

	parse_score(raw, row, column).map(Some)
}

pub fn parse_optional_text(raw: &str) -> Option<String> {
	if raw.is_empty() { None } else { Some(raw.to_string()) }
}
