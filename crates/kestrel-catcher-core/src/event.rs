// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The canonical, persisted error event.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::context::ClientInfo;
use crate::error::CatcherError;
use crate::report::{ErrorLocation, PageLocation};
use crate::EventId;

/// Client-runtime family an event originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeFamily {
	BrowserScript,
	ServerProcess,
}

impl fmt::Display for RuntimeFamily {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RuntimeFamily::BrowserScript => write!(f, "browser-script"),
			RuntimeFamily::ServerProcess => write!(f, "server-process"),
		}
	}
}

impl FromStr for RuntimeFamily {
	type Err = CatcherError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"browser-script" => Ok(RuntimeFamily::BrowserScript),
			"server-process" => Ok(RuntimeFamily::ServerProcess),
			other => Err(CatcherError::InvalidRuntimeFamily(other.to_string())),
		}
	}
}

/// Severity tag attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Error,
	Fatal,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Severity::Error => write!(f, "error"),
			Severity::Fatal => write!(f, "fatal"),
		}
	}
}

impl FromStr for Severity {
	type Err = CatcherError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"error" => Ok(Severity::Error),
			"fatal" => Ok(Severity::Fatal),
			other => Err(CatcherError::InvalidSeverity(other.to_string())),
		}
	}
}

/// One entry of a normalized stack trace.
///
/// Frames are ordered outer call site first; the order is input order and is
/// preserved through resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackFrame {
	pub func: Option<String>,
	pub file: Option<String>,
	pub line: Option<u32>,
	pub col: Option<u32>,
}

/// The canonical record persisted for one accepted report.
///
/// Created once per report and immutable thereafter; ownership passes to the
/// event store on persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEvent {
	pub id: EventId,
	pub family: RuntimeFamily,
	pub severity: Severity,
	pub message: String,
	/// Resolved error location (raw minified coordinates when enrichment
	/// was unavailable).
	pub error_location: ErrorLocation,
	/// Page location, browser-script events only.
	pub location: Option<PageLocation>,
	/// Grouping fingerprint, see [`crate::group`].
	pub group_hash: String,
	pub stack: Vec<StackFrame>,
	/// Client facts, browser-script events only.
	pub client: Option<ClientInfo>,
	/// Event time, epoch seconds.
	pub time: i64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn runtime_family_roundtrip() {
		for family in [RuntimeFamily::BrowserScript, RuntimeFamily::ServerProcess] {
			let parsed: RuntimeFamily = family.to_string().parse().unwrap();
			assert_eq!(parsed, family);
		}
	}

	#[test]
	fn runtime_family_rejects_unknown() {
		assert!("python".parse::<RuntimeFamily>().is_err());
	}

	#[test]
	fn severity_roundtrip() {
		for severity in [Severity::Error, Severity::Fatal] {
			let parsed: Severity = severity.to_string().parse().unwrap();
			assert_eq!(parsed, severity);
		}
	}

	#[test]
	fn event_serializes_family_as_kebab_case() {
		let event = ErrorEvent {
			id: EventId::new(),
			family: RuntimeFamily::BrowserScript,
			severity: Severity::Error,
			message: "boom".to_string(),
			error_location: ErrorLocation {
				file: "app.js".to_string(),
				line: 1,
				col: 2,
				func: None,
				revision: None,
			},
			location: None,
			group_hash: "00".to_string(),
			stack: Vec::new(),
			client: None,
			time: 0,
		};

		let value = serde_json::to_value(&event).unwrap();
		assert_eq!(value["family"], "browser-script");
		assert_eq!(value["severity"], "error");
	}
}
