//! Textual embedding literals such as `[0.12, -3.4e-2, 5]`.

use crate::{Error, Result};

/// Parses one embedding cell. `row` is the 1-based data row used in error messages.
///
/// Accepts a flat list or tuple of finite numeric literals with optional surrounding whitespace
/// and an optional trailing comma. Nested sequences, bare values and empty items are rejected.
pub fn parse_embedding(raw: &str, row: usize) -> Result<Vec<f64>> {
	let fail = |message: String| Error::ParseEmbedding { row, message };
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return Err(fail("value is empty".to_string()));
	}

	let inner = match (trimmed.chars().next(), trimmed.chars().last()) {
		(Some('['), Some(']')) | (Some('('), Some(')')) if trimmed.len() >= 2 =>
			&trimmed[1..trimmed.len() - 1],
		_ => return Err(fail(format!("expected a bracketed list, got {:?}", preview(trimmed)))),
	};

	if inner.trim().is_empty() {
		return Ok(Vec::new());
	}

	let mut items: Vec<&str> = inner.split(',').collect();

	if items.len() > 1 && items.last().map(|item| item.trim().is_empty()).unwrap_or(false) {
		items.pop();
	}

	let mut values = Vec::with_capacity(items.len());

	for (index, item) in items.iter().enumerate() {
		let token = item.trim();

		if token.is_empty() {
			return Err(fail(format!("item {index} is empty")));
		}
		if token.contains(['[', ']', '(', ')']) {
			return Err(fail(format!("item {index} is a nested sequence")));
		}

		let value: f64 = token
			.parse()
			.map_err(|_| fail(format!("item {index} ({:?}) is not a number", preview(token))))?;

		if !value.is_finite() {
			return Err(fail(format!("item {index} ({token}) is not finite")));
		}

		values.push(value);
	}

	Ok(values)
}

/// Renders an embedding back into the literal form [`parse_embedding`] accepts.
pub fn render_embedding(values: &[f64]) -> String {
	let mut out = String::with_capacity(values.len() * 12 + 2);

	out.push('[');

	for (i, value) in values.iter().enumerate() {
		if i > 0 {
			out.push_str(", ");
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

fn preview(text: &str) -> String {
	const MAX_CHARS: usize = 32;

	if text.chars().count() <= MAX_CHARS {
		text.to_string()
	} else {
		let head: String = text.chars().take(MAX_CHARS).collect();

		format!("{head}...")
	}
}

#[cfg(test)]
mod tests {
	use crate::{
		Error,
		embedding::{parse_embedding, render_embedding},
	};

	#[test]
	fn parses_list_and_tuple_literals() {
		assert_eq!(parse_embedding("[0.1, -2, 3e-2]", 1).unwrap(), vec![0.1, -2.0, 0.03]);
		assert_eq!(parse_embedding(" (1.5,2.5,) ", 1).unwrap(), vec![1.5, 2.5]);
		assert_eq!(parse_embedding("[]", 1).unwrap(), Vec::<f64>::new());
	}

	#[test]
	fn rejects_malformed_literals() {
		for raw in ["", "0.1, 0.2", "[0.1, , 0.2]", "[[0.1], [0.2]]", "[0.1, abc]", "[nan]", "[1"] {
			let err = parse_embedding(raw, 7).expect_err("Expected parse failure.");

			assert!(
				matches!(err, Error::ParseEmbedding { row: 7, .. }),
				"Unexpected error for {raw:?}: {err:?}"
			);
		}
	}

	#[test]
	fn rendered_literal_parses_back() {
		let values = vec![0.25, -1.0, 1e-7];

		assert_eq!(parse_embedding(&render_embedding(&values), 1).unwrap(), values);
	}
}
