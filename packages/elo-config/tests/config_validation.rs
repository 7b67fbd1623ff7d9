use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use elo_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with(section: &str, key: &str, replacement: Value) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");
	let table = root
		.get_mut(section)
		.and_then(Value::as_table_mut)
		.expect("Template config must include the requested section.");

	table.insert(key.to_string(), replacement);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("elo_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> elo_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = elo_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(payload: String, expected: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");
	let message = err.to_string();

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error: {err:?}");
	assert!(message.starts_with("Invalid dashboard config: "), "Unexpected error message: {message}");
	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn template_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TEMPLATE_TOML.to_string())
		.expect("Template config must be valid.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8501");
	assert_eq!(cfg.sampling.max_samples, 3);
	assert_eq!(cfg.sampling.seed, None);
	assert_eq!(cfg.projection.perplexity, 25.0);
	assert_eq!(cfg.projection.seed, 45);
	assert_eq!(cfg.upload.download_file_name, "combined_elo_data.csv");
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let payload = r#"
[service]
http_bind = "127.0.0.1:8501"

[dataset]
base_path = "base.csv"
"#;
	let cfg = load_payload(payload.to_string()).expect("Minimal config must be valid.");

	assert_eq!(cfg.service.log_level, "info");
	assert_eq!(cfg.sampling.max_samples, 3);
	assert_eq!(cfg.projection.max_iter, 1_000);
	assert_eq!(cfg.projection.exaggeration_iter, 250);
	assert_eq!(cfg.projection.learning_rate, None);
	assert!(cfg.security.bind_localhost_only);
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("elo_config_test_does_not_exist.toml");

	let err = elo_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = load_payload("[service\nhttp_bind = ".to_string()).expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err:?}");
	assert!(err.to_string().starts_with("Dashboard config "), "Unexpected message: {err}");
}

#[test]
fn max_samples_must_be_positive() {
	expect_validation(
		sample_toml_with("sampling", "max_samples", Value::Integer(0)),
		"sampling.max_samples must be greater than zero.",
	);
}

#[test]
fn perplexity_must_be_positive() {
	expect_validation(
		sample_toml_with("projection", "perplexity", Value::Float(0.0)),
		"projection.perplexity must be greater than zero.",
	);
}

#[test]
fn max_iter_must_exceed_exaggeration_phase() {
	expect_validation(
		sample_toml_with("projection", "max_iter", Value::Integer(200)),
		"projection.max_iter must be greater than projection.exaggeration_iter.",
	);
}

#[test]
fn learning_rate_must_be_positive_when_set() {
	expect_validation(
		sample_toml_with("projection", "learning_rate", Value::Float(-1.0)),
		"projection.learning_rate must be a finite number greater than zero.",
	);
}

#[test]
fn non_loopback_bind_rejected_when_localhost_only() {
	expect_validation(
		sample_toml_with("service", "http_bind", Value::String("0.0.0.0:8501".to_string())),
		"service.http_bind must be a loopback address",
	);
}

#[test]
fn non_loopback_bind_allowed_when_localhost_only_disabled() {
	let payload = sample_toml_with("security", "bind_localhost_only", Value::Boolean(false));
	let mut value: Value = toml::from_str(&payload).expect("Failed to parse rendered config.");

	value
		.as_table_mut()
		.and_then(|root| root.get_mut("service"))
		.and_then(Value::as_table_mut)
		.expect("Rendered config must include [service].")
		.insert("http_bind".to_string(), Value::String("0.0.0.0:8501".to_string()));

	let payload = toml::to_string(&value).expect("Failed to render config.");
	let cfg = load_payload(payload).expect("Config must be valid.");

	assert_eq!(cfg.service.http_bind, "0.0.0.0:8501");
}

#[test]
fn download_name_must_be_csv() {
	expect_validation(
		sample_toml_with("upload", "download_file_name", Value::String("combined.xlsx".to_string())),
		"upload.download_file_name must be a plain file name ending in .csv.",
	);
}
