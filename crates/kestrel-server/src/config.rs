// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Server configuration.
//!
//! Environment-first (`KESTREL_SERVER_*`), with built-in defaults
//! underneath. Projects the receivers accept tokens for are seeded from a
//! TOML file so a deployment needs no project-management surface.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use kestrel_catcher_core::{Project, ProjectId};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid value for {var}: {value}")]
	InvalidValue { var: &'static str, value: String },

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid projects file: {0}")]
	InvalidProjectsFile(#[from] toml::de::Error),
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub fetch: FetchConfig,
	/// TOML file the project store is seeded from.
	pub projects_file: Option<PathBuf>,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
}

/// Source-artifact fetch settings.
#[derive(Debug, Clone)]
pub struct FetchConfig {
	/// Upper bound on one source-map fetch.
	pub timeout_secs: u64,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			http: HttpConfig {
				host: "0.0.0.0".to_string(),
				port: 3000,
			},
			fetch: FetchConfig { timeout_secs: 10 },
			projects_file: None,
		}
	}
}

impl ServerConfig {
	/// Socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}

	/// Load configuration from the environment over the defaults.
	pub fn load_from_env() -> Result<Self, ConfigError> {
		let mut config = Self::default();

		if let Ok(host) = std::env::var("KESTREL_SERVER_HOST") {
			config.http.host = host;
		}
		if let Ok(port) = std::env::var("KESTREL_SERVER_PORT") {
			config.http.port = port.parse().map_err(|_| ConfigError::InvalidValue {
				var: "KESTREL_SERVER_PORT",
				value: port,
			})?;
		}
		if let Ok(timeout) = std::env::var("KESTREL_SERVER_FETCH_TIMEOUT_SECS") {
			config.fetch.timeout_secs =
				timeout.parse().map_err(|_| ConfigError::InvalidValue {
					var: "KESTREL_SERVER_FETCH_TIMEOUT_SECS",
					value: timeout,
				})?;
		}
		if let Ok(path) = std::env::var("KESTREL_SERVER_PROJECTS_FILE") {
			config.projects_file = Some(PathBuf::from(path));
		}

		Ok(config)
	}
}

#[derive(Debug, Deserialize)]
struct ProjectsFile {
	#[serde(default)]
	projects: Vec<ProjectEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectEntry {
	/// Stable project id; generated when omitted.
	#[serde(default)]
	id: Option<ProjectId>,
	token: String,
}

/// Load the seeded project list from a TOML file.
///
/// ```toml
/// [[projects]]
/// id = "01912345-6789-7abc-def0-123456789abc"
/// token = "T1"
///
/// [[projects]]
/// token = "T2"
/// ```
pub fn load_projects(path: &Path) -> Result<Vec<Project>, ConfigError> {
	let body = std::fs::read_to_string(path)?;
	let file: ProjectsFile = toml::from_str(&body)?;

	Ok(file
		.projects
		.into_iter()
		.map(|entry| Project::new(entry.id.unwrap_or_default(), entry.token))
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn defaults_are_sane() {
		let config = ServerConfig::default();
		assert_eq!(config.socket_addr(), "0.0.0.0:3000");
		assert_eq!(config.fetch.timeout_secs, 10);
		assert!(config.projects_file.is_none());
	}

	#[test]
	fn loads_projects_from_toml() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[[projects]]
id = "01912345-6789-7abc-def0-123456789abc"
token = "T1"

[[projects]]
token = "T2"
"#
		)
		.unwrap();

		let projects = load_projects(file.path()).unwrap();
		assert_eq!(projects.len(), 2);
		assert_eq!(projects[0].token, "T1");
		assert_eq!(
			projects[0].id.to_string(),
			"01912345-6789-7abc-def0-123456789abc"
		);
		assert_eq!(projects[1].token, "T2");
	}

	#[test]
	fn empty_projects_file_is_legal() {
		let file = tempfile::NamedTempFile::new().unwrap();
		let projects = load_projects(file.path()).unwrap();
		assert!(projects.is_empty());
	}

	#[test]
	fn malformed_projects_file_is_an_error() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "projects = 3").unwrap();
		assert!(matches!(
			load_projects(file.path()),
			Err(ConfigError::InvalidProjectsFile(_))
		));
	}
}
