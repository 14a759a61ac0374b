// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Incoming report payloads as supplied by client runtimes.
//!
//! A report is ephemeral: it exists for the duration of one pipeline run and
//! is consumed when the canonical [`crate::ErrorEvent`] is assembled. The two
//! report families differ in transport and in enrichment capability, so they
//! are modeled as a tagged variant rather than a single struct with holes.

use serde::{Deserialize, Serialize};

/// One raw error occurrence submitted by a client runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "kebab-case")]
pub enum Report {
	/// Browser-script report: eligible for source-map enrichment.
	Browser(BrowserReport),
	/// Server-process report: direct location only.
	Server(ServerReport),
}

impl Report {
	/// The project ingest token carried by the report.
	pub fn token(&self) -> &str {
		match self {
			Report::Browser(r) => &r.token,
			Report::Server(r) => &r.token,
		}
	}

	/// The main error text.
	pub fn message(&self) -> &str {
		match self {
			Report::Browser(r) => &r.message,
			Report::Server(r) => &r.message,
		}
	}
}

/// Error report from a browser script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserReport {
	/// Project ingest token.
	pub token: String,
	/// Main error text.
	pub message: String,
	/// Where the error was thrown, in minified coordinates.
	pub error_location: ErrorLocation,
	/// Page the error occurred on.
	pub location: PageLocation,
	/// Raw runtime-supplied stack.
	#[serde(default)]
	pub stack: RawStack,
	/// Client timestamp, epoch milliseconds.
	pub time: i64,
	/// Navigator facts, when the client supplied them.
	#[serde(default)]
	pub navigator: Option<NavigatorInfo>,
}

/// Error report from a server-side process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerReport {
	/// Project ingest token.
	pub token: String,
	/// Main error text.
	pub message: String,
	/// Where the error was thrown.
	pub error_location: ErrorLocation,
	/// Raw runtime-supplied stack.
	#[serde(default)]
	pub stack: RawStack,
	/// Host the process reports under.
	#[serde(default)]
	pub domain: Option<String>,
	/// Client timestamp, epoch seconds.
	pub time: i64,
}

/// Primary error location as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
	/// File reference (a bundle URL for browser reports).
	pub file: String,
	pub line: u32,
	pub col: u32,
	/// Function name. For browser reports this is filled during enrichment.
	#[serde(default)]
	pub func: Option<String>,
	/// Build revision of the bundle, keys the source-map artifact.
	#[serde(default)]
	pub revision: Option<String>,
}

/// Page or request location the error originated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub origin: Option<String>,
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub path: Option<String>,
	#[serde(default)]
	pub port: Option<String>,
}

impl PageLocation {
	/// Host for log lines, falling back to the full URL.
	pub fn display_host(&self) -> &str {
		self.host
			.as_deref()
			.or(self.url.as_deref())
			.unwrap_or("unknown")
	}
}

/// Navigator facts shipped with browser reports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigatorInfo {
	/// Raw user-agent string.
	#[serde(default)]
	pub ua: Option<String>,
	/// Viewport dimensions.
	#[serde(default)]
	pub frame: Option<ViewportFrame>,
}

/// Viewport dimensions at error time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportFrame {
	pub width: u32,
	pub height: u32,
}

/// Raw stack as supplied by the runtime.
///
/// Different client runtimes ship structurally different stacks: some send a
/// pre-structured frame array, some send the raw `Error.stack` text. The
/// normalizer ([`crate::stack::normalize_stack`]) absorbs this variance;
/// nothing downstream ever looks at a `RawStack` again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStack {
	/// Pre-structured frame array.
	Entries(Vec<RawStackEntry>),
	/// Raw `Error.stack` text blob.
	Text(String),
	/// No stack supplied.
	#[default]
	Absent,
}

/// One entry of a structured raw stack. Key spellings vary by runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStackEntry {
	#[serde(default, alias = "function")]
	pub func: Option<String>,
	#[serde(default, alias = "filename")]
	pub file: Option<String>,
	#[serde(default, alias = "lineno")]
	pub line: Option<u32>,
	#[serde(default, alias = "column", alias = "colno")]
	pub col: Option<u32>,
}
