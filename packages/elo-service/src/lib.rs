pub mod explore;
pub mod overview;
pub mod session;
pub mod upload;
pub mod views;

mod error;

pub use error::{Error, Result};
pub use explore::ClusterSelection;
pub use overview::{DashboardOverview, ScoreMeans};
pub use session::{SessionContext, SessionStore, UploadState};
pub use upload::{ChangeSummary, ClusterChange, Download, RegressionList, UploadReport};

use std::{sync::Arc, time::Instant};

use uuid::Uuid;

use elo_config::Config;
use elo_domain::Dataset;
use elo_projection::{Point2, Projector, Tsne, TsneParams};
use elo_storage::{DatasetCache, Schema, SourceKey};

/// Dashboard state shared by every request: the memoized base dataset, its projection, and
/// the per-session contexts.
pub struct DashboardService {
	pub cfg: Config,
	cache: DatasetCache,
	base_key: SourceKey,
	base_points: Vec<Point2>,
	projector: Arc<dyn Projector>,
	sessions: SessionStore,
}
impl DashboardService {
	pub fn new(cfg: Config) -> Result<Self> {
		let projector = Arc::new(Tsne::new(TsneParams::from(&cfg.projection)));

		Self::with_projector(cfg, projector)
	}

	/// Loads and projects the base dataset. Any failure here is fatal to startup.
	pub fn with_projector(cfg: Config, projector: Arc<dyn Projector>) -> Result<Self> {
		let cache = DatasetCache::new();
		let base_key = SourceKey::for_path(&cfg.dataset.base_path);
		let base = cache.get_or_load(base_key.clone(), || {
			elo_storage::load_path(&cfg.dataset.base_path, Schema::Base)
		})?;
		let base_points = project(projector.as_ref(), &base)?;
		let sessions = SessionStore::new(cfg.sampling.seed);

		Ok(Self { cfg, cache, base_key, base_points, projector, sessions })
	}

	pub fn base(&self) -> Result<Arc<Dataset>> {
		let base = self.cache.get_or_load(self.base_key.clone(), || {
			elo_storage::load_path(&self.cfg.dataset.base_path, Schema::Base)
		})?;

		Ok(base)
	}

	pub fn base_points(&self) -> &[Point2] {
		&self.base_points
	}

	pub fn create_session(&self) -> Uuid {
		self.sessions.create()
	}

	pub fn remove_session(&self, session_id: Uuid) -> Result<()> {
		self.sessions.remove(session_id)
	}

	pub fn sessions(&self) -> &SessionStore {
		&self.sessions
	}

	pub(crate) fn projector(&self) -> &dyn Projector {
		self.projector.as_ref()
	}
}

pub(crate) fn project(projector: &dyn Projector, dataset: &Dataset) -> Result<Vec<Point2>> {
	let started = Instant::now();
	let points = projector.project(&dataset.embeddings())?;

	tracing::info!(
		rows = dataset.len(),
		elapsed_ms = started.elapsed().as_millis() as u64,
		"Projection computed."
	);

	Ok(points)
}
