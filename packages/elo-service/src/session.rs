use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use rand::{SeedableRng, rngs::StdRng};
use uuid::Uuid;

use elo_domain::{ClusterId, Dataset, sample::Sample};
use elo_storage::SourceKey;

use crate::{Error, Result};

/// The dataset a session uploaded and its concatenation with the base dataset.
#[derive(Clone, Debug)]
pub struct UploadState {
	pub source: SourceKey,
	pub upload: Arc<Dataset>,
	pub combined: Arc<Dataset>,
}

/// Per-session state. Only the handler of a request for this session mutates it.
#[derive(Debug)]
pub struct SessionContext {
	pub id: Uuid,
	pub rng: StdRng,
	pub last_selected_cluster: Option<ClusterId>,
	pub sample: Option<Sample>,
	pub upload: Option<UploadState>,
}
impl SessionContext {
	pub fn new(id: Uuid, rng: StdRng) -> Self {
		Self { id, rng, last_selected_cluster: None, sample: None, upload: None }
	}

	pub fn upload(&self) -> Result<&UploadState> {
		self.upload.as_ref().ok_or(Error::UploadRequired)
	}
}

/// Owns every live session. The map lock is held only to look up or insert a session; work on
/// one session locks that session alone.
#[derive(Debug)]
pub struct SessionStore {
	seed: Option<u64>,
	sessions: Mutex<HashMap<Uuid, Arc<Mutex<SessionContext>>>>,
}
impl SessionStore {
	/// With `seed`, every session starts from the same generator state.
	pub fn new(seed: Option<u64>) -> Self {
		Self { seed, sessions: Mutex::new(HashMap::new()) }
	}

	pub fn create(&self) -> Uuid {
		let id = Uuid::new_v4();
		let rng = match self.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_entropy(),
		};
		let context = Arc::new(Mutex::new(SessionContext::new(id, rng)));

		self.sessions.lock().unwrap_or_else(|err| err.into_inner()).insert(id, context);

		tracing::info!(session_id = %id, "Session created.");

		id
	}

	pub fn remove(&self, id: Uuid) -> Result<()> {
		let removed =
			self.sessions.lock().unwrap_or_else(|err| err.into_inner()).remove(&id).is_some();

		if !removed {
			return Err(Error::SessionNotFound { session_id: id });
		}

		tracing::info!(session_id = %id, "Session removed.");

		Ok(())
	}

	pub fn len(&self) -> usize {
		self.sessions.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Runs `f` with exclusive access to the session's context.
	pub fn with_session<T, F>(&self, id: Uuid, f: F) -> Result<T>
	where
		F: FnOnce(&mut SessionContext) -> Result<T>,
	{
		let context = self
			.sessions
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.get(&id)
			.cloned()
			.ok_or(Error::SessionNotFound { session_id: id })?;
		let mut guard = context.lock().unwrap_or_else(|err| err.into_inner());

		f(&mut guard)
	}
}

#[cfg(test)]
mod tests {
	use uuid::Uuid;

	use crate::{Error, session::SessionStore};

	#[test]
	fn unknown_session_is_reported() {
		let store = SessionStore::new(Some(1));
		let id = Uuid::new_v4();
		let err = store.with_session(id, |_| Ok(())).expect_err("Expected missing session.");

		assert!(matches!(err, Error::SessionNotFound { session_id } if session_id == id));
		assert!(matches!(store.remove(id), Err(Error::SessionNotFound { .. })));
	}

	#[test]
	fn sessions_are_independent() {
		let store = SessionStore::new(Some(1));
		let first = store.create();
		let second = store.create();

		store
			.with_session(first, |context| {
				context.last_selected_cluster = Some(4);

				Ok(())
			})
			.unwrap();

		let second_selection =
			store.with_session(second, |context| Ok(context.last_selected_cluster)).unwrap();

		assert_eq!(second_selection, None);
		assert_eq!(store.len(), 2);

		store.remove(first).unwrap();

		assert_eq!(store.len(), 1);
	}
}
