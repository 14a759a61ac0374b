// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client context attached to browser-script events.

use serde::{Deserialize, Serialize};

/// Classified client facts for one browser-script report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
	pub browser: BrowserFacts,
	pub device: DeviceFacts,
	/// Raw user-agent string the facts were derived from.
	pub user_agent: String,
}

/// Browser facts derived from the user-agent string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserFacts {
	/// "Chrome", "Firefox", "Safari"
	pub name: Option<String>,
	pub version: Option<String>,
	/// "Blink", "Webkit", "Gecko", "MS IE", "MS Edge"
	pub engine: Option<String>,
	pub capability: Capability,
}

/// Device facts derived from the user-agent string, plus viewport
/// dimensions when the report supplied them separately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFacts {
	/// "Windows", "MacOS", "Linux"
	pub os: Option<String>,
	pub os_version: Option<String>,
	#[serde(rename = "type")]
	pub class: DeviceClass,
	pub width: Option<u32>,
	pub height: Option<u32>,
}

/// Coarse capability tier of the reporting browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
	/// Modern evergreen browser.
	Full,
	/// Known browser on a legacy engine.
	Degraded,
	/// Recognized browser, version unknown.
	Minimal,
	/// User-agent did not match any signature.
	#[default]
	Unknown,
}

/// Coarse device class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
	#[default]
	Desktop,
	Mobile,
	Tablet,
}
