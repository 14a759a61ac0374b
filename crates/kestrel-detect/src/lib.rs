// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User-agent classification for the Kestrel error catcher.
//!
//! [`detect`] derives browser, rendering engine, OS, device class and a
//! coarse capability tier from signature matching against the raw
//! user-agent string. Unmatched facts come back as `None` / unknown markers;
//! detection itself never fails. Viewport dimensions, when a report carries
//! them separately, are merged into the result by the event composer.

use std::sync::LazyLock;

use regex::Regex;

use kestrel_catcher_core::{BrowserFacts, Capability, ClientInfo, DeviceClass, DeviceFacts};

/// One browser signature: name, detection/version pattern, engine.
struct BrowserSignature {
	name: &'static str,
	pattern: &'static LazyLock<Regex>,
	engine: &'static str,
}

static EDGE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"Edg(?:e|A|iOS)?/([0-9][0-9.]*)").unwrap());
static OPERA: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?:OPR|Opera)[/ ]([0-9][0-9.]*)").unwrap());
static MSIE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?:MSIE |Trident/.*rv:)([0-9][0-9.]*)").unwrap());
static FIREFOX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?:Firefox|FxiOS)/([0-9][0-9.]*)").unwrap());
static CHROME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?:Chrome|CriOS)/([0-9][0-9.]*)").unwrap());
static SAFARI: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"Version/([0-9][0-9.]*).*Safari").unwrap());

/// Ordered signature table. Order matters: Chromium derivatives carry a
/// `Chrome/` token and Safari's `Version/` token, so the more specific
/// signatures come first.
static BROWSERS: &[BrowserSignature] = &[
	BrowserSignature {
		name: "Edge",
		pattern: &EDGE,
		engine: "MS Edge",
	},
	BrowserSignature {
		name: "Opera",
		pattern: &OPERA,
		engine: "Blink",
	},
	BrowserSignature {
		name: "Internet Explorer",
		pattern: &MSIE,
		engine: "MS IE",
	},
	BrowserSignature {
		name: "Firefox",
		pattern: &FIREFOX,
		engine: "Gecko",
	},
	BrowserSignature {
		name: "Chrome",
		pattern: &CHROME,
		engine: "Blink",
	},
	BrowserSignature {
		name: "Safari",
		pattern: &SAFARI,
		engine: "Webkit",
	},
];

static WINDOWS_NT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"Windows NT ([0-9.]+)").unwrap());
static WINDOWS_PHONE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"Windows Phone(?: OS)? ([0-9.]+)").unwrap());
static MAC_OS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Mac OS X ([0-9_.]+)").unwrap());
static IOS: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?:iPhone )?OS ([0-9_]+) like Mac OS X").unwrap());
static ANDROID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Android ([0-9.]+)").unwrap());

/// Classify a user-agent string into client facts.
///
/// Pure and total: unmatched facts become unknown markers.
pub fn detect(user_agent: &str) -> ClientInfo {
	let browser = detect_browser(user_agent);
	let device = detect_device(user_agent);

	ClientInfo {
		browser,
		device,
		user_agent: user_agent.to_string(),
	}
}

fn detect_browser(ua: &str) -> BrowserFacts {
	let matched = BROWSERS
		.iter()
		.find_map(|sig| sig.pattern.captures(ua).map(|caps| (sig, caps)));

	let Some((sig, caps)) = matched else {
		return BrowserFacts {
			name: None,
			version: None,
			engine: fallback_engine(ua),
			capability: Capability::Unknown,
		};
	};

	let version = caps.get(1).map(|m| m.as_str().to_string());
	let capability = match sig.engine {
		// Legacy Microsoft engines render a degraded experience.
		"MS IE" | "MS Edge" => Capability::Degraded,
		_ if version.is_some() => Capability::Full,
		_ => Capability::Minimal,
	};

	BrowserFacts {
		name: Some(sig.name.to_string()),
		version,
		engine: Some(sig.engine.to_string()),
		capability,
	}
}

/// Engine hints for user agents with no recognized browser token.
fn fallback_engine(ua: &str) -> Option<String> {
	if ua.contains("AppleWebKit") {
		Some("Webkit".to_string())
	} else if ua.contains("Gecko/") {
		Some("Gecko".to_string())
	} else {
		None
	}
}

fn detect_device(ua: &str) -> DeviceFacts {
	let (os, os_version) = detect_os(ua);

	DeviceFacts {
		os,
		os_version,
		class: detect_class(ua),
		width: None,
		height: None,
	}
}

fn detect_os(ua: &str) -> (Option<String>, Option<String>) {
	// Windows Phone UAs also contain "Windows"; iOS UAs contain
	// "like Mac OS X"; Android UAs contain "Linux". Most specific first.
	if let Some(caps) = WINDOWS_PHONE.captures(ua) {
		return (
			Some("Windows Phone".to_string()),
			Some(caps[1].to_string()),
		);
	}
	if let Some(caps) = WINDOWS_NT.captures(ua) {
		return (Some("Windows".to_string()), windows_release(&caps[1]));
	}
	if ua.contains("iPhone") || ua.contains("iPad") || ua.contains("iPod") {
		let version = IOS
			.captures(ua)
			.map(|caps| caps[1].replace('_', "."));
		return (Some("iOS".to_string()), version);
	}
	if let Some(caps) = ANDROID.captures(ua) {
		return (Some("Android".to_string()), Some(caps[1].to_string()));
	}
	if let Some(caps) = MAC_OS.captures(ua) {
		return (Some("MacOS".to_string()), Some(caps[1].replace('_', ".")));
	}
	if ua.contains("CrOS") {
		return (Some("ChromeOS".to_string()), None);
	}
	if ua.contains("Linux") || ua.contains("X11") {
		return (Some("Linux".to_string()), None);
	}

	(None, None)
}

/// Map a Windows NT kernel version to its marketing release.
fn windows_release(nt: &str) -> Option<String> {
	let release = match nt {
		"10.0" => "10",
		"6.3" => "8.1",
		"6.2" => "8",
		"6.1" => "7",
		"6.0" => "Vista",
		"5.1" | "5.2" => "XP",
		other => other,
	};
	Some(release.to_string())
}

fn detect_class(ua: &str) -> DeviceClass {
	let android = ua.contains("Android");
	let mobile_token = ua.contains("Mobi");

	if ua.contains("iPad") || ua.contains("Tablet") || (android && !mobile_token) {
		DeviceClass::Tablet
	} else if ua.contains("iPhone")
		|| ua.contains("iPod")
		|| ua.contains("Windows Phone")
		|| mobile_token
	{
		DeviceClass::Mobile
	} else {
		DeviceClass::Desktop
	}
}
