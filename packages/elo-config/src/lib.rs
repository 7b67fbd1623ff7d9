mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Dataset, Projection, Sampling, Security, Service, Upload};

use std::{fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let http_addr: SocketAddr = cfg.service.http_bind.parse().map_err(|_| Error::Validation {
		message: "service.http_bind must be a socket address such as 127.0.0.1:8501.".to_string(),
	})?;

	if cfg.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(Error::Validation {
			message: "service.http_bind must be a loopback address when security.bind_localhost_only is true."
				.to_string(),
		});
	}
	if cfg.dataset.base_path.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "dataset.base_path must be non-empty.".to_string(),
		});
	}
	if cfg.sampling.max_samples == 0 {
		return Err(Error::Validation {
			message: "sampling.max_samples must be greater than zero.".to_string(),
		});
	}
	if !cfg.projection.perplexity.is_finite() {
		return Err(Error::Validation {
			message: "projection.perplexity must be a finite number.".to_string(),
		});
	}
	if cfg.projection.perplexity <= 0.0 {
		return Err(Error::Validation {
			message: "projection.perplexity must be greater than zero.".to_string(),
		});
	}
	if !cfg.projection.early_exaggeration.is_finite() || cfg.projection.early_exaggeration < 1.0 {
		return Err(Error::Validation {
			message: "projection.early_exaggeration must be a finite number of at least 1.0."
				.to_string(),
		});
	}
	if cfg.projection.max_iter <= cfg.projection.exaggeration_iter {
		return Err(Error::Validation {
			message: "projection.max_iter must be greater than projection.exaggeration_iter."
				.to_string(),
		});
	}

	if let Some(rate) = cfg.projection.learning_rate
		&& (!rate.is_finite() || rate <= 0.0)
	{
		return Err(Error::Validation {
			message: "projection.learning_rate must be a finite number greater than zero."
				.to_string(),
		});
	}

	if cfg.upload.max_bytes == 0 {
		return Err(Error::Validation {
			message: "upload.max_bytes must be greater than zero.".to_string(),
		});
	}
	if !cfg.upload.download_file_name.ends_with(".csv")
		|| cfg.upload.download_file_name.contains(['/', '\\', '"'])
	{
		return Err(Error::Validation {
			message: "upload.download_file_name must be a plain file name ending in .csv."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
	cfg.upload.download_file_name = cfg.upload.download_file_name.trim().to_string();

	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
