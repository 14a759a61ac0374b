// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event composition: raw report in, canonical event out.

use std::sync::Arc;

use tracing::debug;

use kestrel_catcher_core::{
	group_hash_for_location, group_hash_for_message, normalize_stack, BrowserReport, ClientInfo,
	ErrorEvent, EventId, PageLocation, Project, Report, RuntimeFamily, ServerReport, Severity,
};
use kestrel_detect::detect;

use crate::resolve::{merge_into_frame, merge_into_location, SourceResolver};

/// Assembles the canonical [`ErrorEvent`] for one report.
///
/// Composition never fails: every enrichment step degrades to the raw
/// values it was meant to improve.
pub struct EventComposer {
	resolver: Arc<SourceResolver>,
}

impl EventComposer {
	pub fn new(resolver: Arc<SourceResolver>) -> Self {
		Self { resolver }
	}

	pub async fn compose(&self, project: &Project, report: Report) -> ErrorEvent {
		match report {
			Report::Browser(report) => self.compose_browser(project, report).await,
			Report::Server(report) => compose_server(report),
		}
	}

	/// Browser-script path: normalize, remap, hash, detect, assemble.
	async fn compose_browser(&self, project: &Project, report: BrowserReport) -> ErrorEvent {
		let mut frames = normalize_stack(&report.stack);
		let mut error_location = report.error_location;

		if let Some(revision) = error_location.revision.clone() {
			let artifact = self
				.resolver
				.resolve_artifact(project.id, &error_location.file, &revision)
				.await;

			if artifact.is_available() {
				let resolved = artifact.remap(error_location.line, error_location.col);
				merge_into_location(&mut error_location, &resolved);

				for frame in &mut frames {
					if let (Some(line), Some(col)) = (frame.line, frame.col) {
						let resolved = artifact.remap(line, col);
						merge_into_frame(frame, &resolved);
					}
				}
			} else {
				debug!(
					project_id = %project.id,
					file = %error_location.file,
					"source artifact unavailable, keeping minified coordinates"
				);
			}
		}

		let client = report.navigator.as_ref().map(|navigator| {
			let mut info = navigator
				.ua
				.as_deref()
				.map(detect)
				.unwrap_or_else(ClientInfo::default);
			if let Some(frame) = navigator.frame {
				info.device.width = Some(frame.width);
				info.device.height = Some(frame.height);
			}
			info
		});

		ErrorEvent {
			id: EventId::new(),
			family: RuntimeFamily::BrowserScript,
			severity: Severity::Error,
			group_hash: group_hash_for_message(&report.message),
			message: report.message,
			error_location,
			location: Some(report.location),
			stack: frames,
			client,
			// Browser clients report epoch milliseconds; events store
			// whole seconds.
			time: report.time / 1000,
		}
	}
}

/// Server-process path: no enrichment capability, location-based grouping.
fn compose_server(report: ServerReport) -> ErrorEvent {
	let frames = normalize_stack(&report.stack);
	let group_hash =
		group_hash_for_location(&report.error_location.file, report.error_location.line);

	ErrorEvent {
		id: EventId::new(),
		family: RuntimeFamily::ServerProcess,
		severity: Severity::Fatal,
		group_hash,
		message: report.message,
		error_location: report.error_location,
		location: report.domain.map(|domain| PageLocation {
			host: Some(domain),
			..PageLocation::default()
		}),
		stack: frames,
		client: None,
		time: report.time,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use kestrel_catcher_core::{
		ErrorLocation, NavigatorInfo, ProjectId, RawStack, RawStackEntry, ViewportFrame,
	};

	use crate::error::Result;
	use crate::fetch::SourceArtifactFetcher;

	/// Maps generated (line 18, col 7658) to src/a.js:129:40, name "f".
	const REMAP_FIXTURE: &str = r#"{
		"version": 3,
		"sources": ["src/a.js"],
		"names": ["f"],
		"mappings": ";;;;;;;;;;;;;;;;;0+OAgIwCA"
	}"#;

	struct StaticFetcher(Option<&'static str>);

	#[async_trait]
	impl SourceArtifactFetcher for StaticFetcher {
		async fn fetch(
			&self,
			_project_id: ProjectId,
			_file_url: &str,
			_revision: &str,
		) -> Result<Option<String>> {
			Ok(self.0.map(str::to_string))
		}
	}

	fn composer(map: Option<&'static str>) -> EventComposer {
		EventComposer::new(Arc::new(SourceResolver::new(Arc::new(StaticFetcher(map)))))
	}

	fn project() -> Project {
		Project::new(ProjectId::new(), "T1")
	}

	fn browser_report() -> BrowserReport {
		BrowserReport {
			token: "T1".to_string(),
			message: "TypeError: boom".to_string(),
			error_location: ErrorLocation {
				file: "https://a.example/static/app.min.js?1528101883".to_string(),
				line: 18,
				col: 7658,
				func: None,
				revision: Some("1528101883".to_string()),
			},
			location: PageLocation {
				url: Some("https://a.example/page".to_string()),
				host: Some("a.example".to_string()),
				..PageLocation::default()
			},
			stack: RawStack::Absent,
			time: 1_528_101_883_123,
			navigator: None,
		}
	}

	#[tokio::test]
	async fn no_revision_keeps_location_and_hashes_message() {
		let composer = composer(Some(REMAP_FIXTURE));
		let mut report = browser_report();
		report.error_location.revision = None;

		let event = composer
			.compose(&project(), Report::Browser(report.clone()))
			.await;

		assert_eq!(event.error_location, report.error_location);
		assert_eq!(event.group_hash, group_hash_for_message("TypeError: boom"));
		assert_eq!(event.family, RuntimeFamily::BrowserScript);
		assert_eq!(event.severity, Severity::Error);
	}

	#[tokio::test]
	async fn available_artifact_remaps_primary_location() {
		let composer = composer(Some(REMAP_FIXTURE));

		let event = composer
			.compose(&project(), Report::Browser(browser_report()))
			.await;

		assert_eq!(event.error_location.file, "src/a.js");
		assert_eq!(event.error_location.line, 129);
		assert_eq!(event.error_location.col, 40);
		assert_eq!(event.error_location.func.as_deref(), Some("f"));
	}

	#[tokio::test]
	async fn unavailable_artifact_keeps_minified_coordinates() {
		let composer = composer(None);
		let report = browser_report();
		let raw = report.error_location.clone();

		let event = composer.compose(&project(), Report::Browser(report)).await;

		assert_eq!(event.error_location, raw);
	}

	#[tokio::test]
	async fn frames_remap_with_their_own_coordinates_and_keep_order() {
		let composer = composer(Some(REMAP_FIXTURE));
		let mut report = browser_report();
		report.stack = RawStack::Entries(vec![
			// Covered by the fixture mapping.
			RawStackEntry {
				func: Some("minified".to_string()),
				file: Some("app.min.js".to_string()),
				line: Some(18),
				col: Some(7700),
			},
			// No mapping at this position: raw values must survive.
			RawStackEntry {
				func: Some("untouched".to_string()),
				file: Some("app.min.js".to_string()),
				line: Some(2),
				col: Some(5),
			},
			// No coordinates at all: skipped entirely.
			RawStackEntry {
				func: Some("bare".to_string()),
				file: None,
				line: None,
				col: None,
			},
		]);

		let event = composer.compose(&project(), Report::Browser(report)).await;

		assert_eq!(event.stack.len(), 3);
		assert_eq!(event.stack[0].func.as_deref(), Some("f"));
		assert_eq!(event.stack[0].file.as_deref(), Some("src/a.js"));
		assert_eq!(event.stack[0].line, Some(129));
		assert_eq!(event.stack[1].func.as_deref(), Some("untouched"));
		assert_eq!(event.stack[1].file.as_deref(), Some("app.min.js"));
		assert_eq!(event.stack[1].line, Some(2));
		assert_eq!(event.stack[1].col, Some(5));
		assert_eq!(event.stack[2].func.as_deref(), Some("bare"));
	}

	#[tokio::test]
	async fn browser_time_is_truncated_to_seconds() {
		let composer = composer(None);
		let mut report = browser_report();
		report.error_location.revision = None;

		let event = composer.compose(&project(), Report::Browser(report)).await;
		assert_eq!(event.time, 1_528_101_883);
	}

	#[tokio::test]
	async fn navigator_facts_and_viewport_are_merged() {
		let composer = composer(None);
		let mut report = browser_report();
		report.error_location.revision = None;
		report.navigator = Some(NavigatorInfo {
			ua: Some(
				"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
					.to_string(),
			),
			frame: Some(ViewportFrame {
				width: 1920,
				height: 1080,
			}),
		});

		let event = composer.compose(&project(), Report::Browser(report)).await;

		let client = event.client.expect("client info");
		assert_eq!(client.browser.name.as_deref(), Some("Chrome"));
		assert_eq!(client.device.width, Some(1920));
		assert_eq!(client.device.height, Some(1080));
	}

	#[tokio::test]
	async fn server_report_groups_by_location_not_message() {
		let composer = composer(None);
		let report = ServerReport {
			token: "T1".to_string(),
			message: "Traceback (most recent call last)".to_string(),
			error_location: ErrorLocation {
				file: "worker/app.py".to_string(),
				line: 42,
				col: 0,
				func: None,
				revision: None,
			},
			stack: RawStack::Absent,
			domain: Some("api.example".to_string()),
			time: 1_528_101_883,
		};

		let event = composer
			.compose(&project(), Report::Server(report))
			.await;

		assert_eq!(event.family, RuntimeFamily::ServerProcess);
		assert_eq!(event.severity, Severity::Fatal);
		assert_eq!(
			event.group_hash,
			group_hash_for_location("worker/app.py", 42)
		);
		assert_eq!(
			event.location.as_ref().and_then(|l| l.host.as_deref()),
			Some("api.example")
		);
		assert!(event.client.is_none());
		assert_eq!(event.time, 1_528_101_883);
	}

	#[tokio::test]
	async fn identical_messages_share_group_hash_across_origins() {
		let composer = composer(None);

		let mut first = browser_report();
		first.error_location.revision = None;
		first.error_location.file = "https://one.example/a.js".to_string();

		let mut second = browser_report();
		second.error_location.revision = None;
		second.error_location.file = "https://two.example/b.js".to_string();
		second.error_location.line = 999;

		let project = project();
		let first = composer.compose(&project, Report::Browser(first)).await;
		let second = composer.compose(&project, Report::Browser(second)).await;

		assert_eq!(first.group_hash, second.group_hash);
	}
}
