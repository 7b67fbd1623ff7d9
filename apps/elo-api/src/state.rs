use std::sync::Arc;

use elo_service::DashboardService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<DashboardService>,
}
impl AppState {
	pub fn new(config: elo_config::Config) -> color_eyre::Result<Self> {
		let service = DashboardService::new(config)?;

		tracing::info!(
			rows = service.base_points().len(),
			base_path = %service.cfg.dataset.base_path.display(),
			"Base dataset ready."
		);

		Ok(Self { service: Arc::new(service) })
	}
}
