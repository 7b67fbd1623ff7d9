use axum::{
	Json, Router,
	body::Bytes,
	extract::{DefaultBodyLimit, FromRequestParts, Path, Query, State},
	http::{StatusCode, header, request::Parts},
	response::{IntoResponse, Response},
	routing::{delete, get, post},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::state::AppState;
use elo_domain::ClusterId;
use elo_service::{
	ClusterSelection, DashboardOverview, DashboardService, Error, RegressionList, ScoreMeans,
	UploadReport, views::TableView,
};

#[derive(Debug, Deserialize)]
struct MeansQuery {
	field: String,
}

#[derive(Debug, Serialize)]
struct SessionCreated {
	session_id: Uuid,
}

/// `Path` whose rejection is reported as an [`ApiError`].
pub struct ApiPath<T>(pub T);
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
	S: Send + Sync,
	T: DeserializeOwned + Send,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Path(value) = Path::<T>::from_request_parts(parts, state)
			.await
			.map_err(|err| json_error(err.status(), "INVALID_REQUEST", err.body_text(), None))?;

		Ok(Self(value))
	}
}

/// `Query` whose rejection is reported as an [`ApiError`].
pub struct ApiQuery<T>(pub T);
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
	S: Send + Sync,
	T: DeserializeOwned + Send,
{
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
		let Query(value) = Query::<T>::from_request_parts(parts, state)
			.await
			.map_err(|err| json_error(err.status(), "INVALID_REQUEST", err.body_text(), None))?;

		Ok(Self(value))
	}
}

pub fn router(state: AppState) -> Router {
	let max_upload_bytes = state.service.cfg.upload.max_bytes;

	Router::new()
		.route("/health", get(health))
		.route("/v1/dashboard", get(dashboard))
		.route("/v1/dashboard/means", get(score_means))
		.route("/v1/sessions", post(create_session))
		.route("/v1/sessions/{session_id}", delete(delete_session))
		.route("/v1/sessions/{session_id}/clusters/{cluster}", get(select_cluster))
		.route("/v1/sessions/{session_id}/clusters/{cluster}/reroll", post(reroll))
		.route(
			"/v1/sessions/{session_id}/upload",
			post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
		)
		.route("/v1/sessions/{session_id}/combined/clusters/{cluster}", get(combined_cluster))
		.route("/v1/sessions/{session_id}/regressions", get(regressions))
		.route("/v1/sessions/{session_id}/regressions/{cluster}", get(regression_rows))
		.route("/v1/sessions/{session_id}/download", get(download))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardOverview>, ApiError> {
	Ok(Json(state.service.overview()?))
}

async fn score_means(
	State(state): State<AppState>,
	ApiQuery(query): ApiQuery<MeansQuery>,
) -> Result<Json<ScoreMeans>, ApiError> {
	Ok(Json(state.service.score_means(&query.field)?))
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
	let session_id = state.service.create_session();

	(StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn delete_session(
	State(state): State<AppState>,
	ApiPath(session_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
	state.service.remove_session(session_id)?;

	Ok(StatusCode::NO_CONTENT)
}

async fn select_cluster(
	State(state): State<AppState>,
	ApiPath((session_id, cluster)): ApiPath<(Uuid, ClusterId)>,
) -> Result<Json<ClusterSelection>, ApiError> {
	Ok(Json(state.service.select_cluster(session_id, cluster)?))
}

async fn reroll(
	State(state): State<AppState>,
	ApiPath((session_id, cluster)): ApiPath<(Uuid, ClusterId)>,
) -> Result<Json<ClusterSelection>, ApiError> {
	Ok(Json(state.service.reroll(session_id, cluster)?))
}

async fn upload(
	State(state): State<AppState>,
	ApiPath(session_id): ApiPath<Uuid>,
	body: Bytes,
) -> Result<Json<UploadReport>, ApiError> {
	let report = blocking(&state, move |service| service.upload(session_id, &body)).await?;

	Ok(Json(report))
}

async fn combined_cluster(
	State(state): State<AppState>,
	ApiPath((session_id, cluster)): ApiPath<(Uuid, ClusterId)>,
) -> Result<Json<TableView>, ApiError> {
	Ok(Json(state.service.combined_cluster_rows(session_id, cluster)?))
}

async fn regressions(
	State(state): State<AppState>,
	ApiPath(session_id): ApiPath<Uuid>,
) -> Result<Json<RegressionList>, ApiError> {
	Ok(Json(state.service.regressions(session_id)?))
}

async fn regression_rows(
	State(state): State<AppState>,
	ApiPath((session_id, cluster)): ApiPath<(Uuid, ClusterId)>,
) -> Result<Json<TableView>, ApiError> {
	Ok(Json(state.service.regression_rows(session_id, cluster)?))
}

async fn download(
	State(state): State<AppState>,
	ApiPath(session_id): ApiPath<Uuid>,
) -> Result<Response, ApiError> {
	let download = blocking(&state, move |service| service.download(session_id)).await?;
	let disposition = format!("attachment; filename=\"{}\"", download.file_name);

	Ok((
		[
			(header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
			(header::CONTENT_DISPOSITION, disposition),
		],
		download.bytes,
	)
		.into_response())
}

/// Runs a CPU-bound service call on the blocking pool.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
	T: Send + 'static,
	F: FnOnce(&DashboardService) -> elo_service::Result<T> + Send + 'static,
{
	let service = state.service.clone();
	let result = tokio::task::spawn_blocking(move || f(&service)).await.map_err(|err| {
		tracing::error!(error = %err, "Blocking task failed.");

		json_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal error.", None)
	})?;

	Ok(result?)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let message = err.to_string();

		match err {
			Error::InvalidDataset { .. } =>
				json_error(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_DATASET", message, None),
			Error::MissingColumn { column } => json_error(
				StatusCode::UNPROCESSABLE_ENTITY,
				"MISSING_COLUMN",
				message,
				Some(vec![column]),
			),
			Error::InvalidRequest { .. } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			Error::Projection { .. } =>
				json_error(StatusCode::UNPROCESSABLE_ENTITY, "PROJECTION_FAILED", message, None),
			Error::SessionNotFound { .. } =>
				json_error(StatusCode::NOT_FOUND, "SESSION_NOT_FOUND", message, None),
			Error::ClusterNotFound { .. } =>
				json_error(StatusCode::NOT_FOUND, "CLUSTER_NOT_FOUND", message, None),
			Error::UploadRequired => json_error(StatusCode::CONFLICT, "UPLOAD_REQUIRED", message, None),
			Error::Storage { .. } => {
				tracing::error!(error = %message, "Storage failure.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"STORAGE_ERROR",
					"Failed to read or write a dataset.",
					None,
				)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
