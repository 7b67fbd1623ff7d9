use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub dataset: Dataset,
	#[serde(default)]
	pub sampling: Sampling,
	#[serde(default)]
	pub projection: Projection,
	#[serde(default)]
	pub upload: Upload,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
	/// CSV file holding the base feedback records. Relative paths resolve against the working
	/// directory of the process.
	pub base_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Sampling {
	pub max_samples: usize,
	/// Optional. When set, every new session draws from a generator seeded with this value.
	pub seed: Option<u64>,
}
impl Default for Sampling {
	fn default() -> Self {
		Self { max_samples: 3, seed: None }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Projection {
	pub perplexity: f64,
	pub seed: u64,
	pub max_iter: usize,
	pub early_exaggeration: f64,
	pub exaggeration_iter: usize,
	/// Optional. Derived from the sample count when absent.
	pub learning_rate: Option<f64>,
}
impl Default for Projection {
	fn default() -> Self {
		Self {
			perplexity: 25.0,
			seed: 45,
			max_iter: 1_000,
			early_exaggeration: 12.0,
			exaggeration_iter: 250,
			learning_rate: None,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Upload {
	pub max_bytes: usize,
	pub download_file_name: String,
}
impl Default for Upload {
	fn default() -> Self {
		Self { max_bytes: 16 * 1_024 * 1_024, download_file_name: "combined_elo_data.csv".to_string() }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Security {
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}
