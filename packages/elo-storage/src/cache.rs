use std::{
	collections::HashMap,
	fmt,
	path::{Path, PathBuf},
	sync::{Arc, Mutex},
};

use elo_domain::Dataset;

use crate::Result;

/// Identity of a dataset source.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum SourceKey {
	Path(PathBuf),
	/// BLAKE3 digest of uploaded bytes.
	Content(String),
}
impl SourceKey {
	/// Canonicalizes when possible so different spellings of one file share an entry.
	pub fn for_path(path: &Path) -> Self {
		Self::Path(path.canonicalize().unwrap_or_else(|_| path.to_path_buf()))
	}

	pub fn for_bytes(bytes: &[u8]) -> Self {
		Self::Content(blake3::hash(bytes).to_hex().to_string())
	}
}
impl fmt::Display for SourceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Path(path) => write!(f, "path:{}", path.display()),
			Self::Content(digest) => write!(f, "content:{}", &digest[..digest.len().min(12)]),
		}
	}
}

/// Cache-aside store of parsed datasets. Sources are assumed immutable; call
/// [`DatasetCache::invalidate`] when one changes.
#[derive(Debug, Default)]
pub struct DatasetCache {
	entries: Mutex<HashMap<SourceKey, Arc<Dataset>>>,
}
impl DatasetCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &SourceKey) -> Option<Arc<Dataset>> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).get(key).cloned()
	}

	/// Returns the cached dataset for `key`, running `load` on a miss. Failed loads are not
	/// cached.
	pub fn get_or_load<F>(&self, key: SourceKey, load: F) -> Result<Arc<Dataset>>
	where
		F: FnOnce() -> Result<Dataset>,
	{
		if let Some(dataset) = self.get(&key) {
			tracing::debug!(source = %key, hit = true, "Dataset cache lookup.");

			return Ok(dataset);
		}

		tracing::debug!(source = %key, hit = false, "Dataset cache lookup.");

		let dataset = Arc::new(load()?);
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		Ok(entries.entry(key).or_insert(dataset).clone())
	}

	pub fn invalidate(&self, key: &SourceKey) -> bool {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).remove(key).is_some()
	}

	pub fn clear(&self) {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).clear();
	}

	pub fn len(&self) -> usize {
		self.entries.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
