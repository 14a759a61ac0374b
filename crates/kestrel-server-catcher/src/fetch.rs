// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source-artifact retrieval.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use kestrel_catcher_core::ProjectId;

use crate::error::Result;

/// Retrieval of raw source-map bodies for a built file at one revision.
///
/// Retrieval lives outside the pipeline core; implementations may hit the
/// network, a blob store or a local directory. Returning `None` means the
/// artifact is unavailable — never an error, since enrichment is
/// best-effort.
#[async_trait]
pub trait SourceArtifactFetcher: Send + Sync {
	async fn fetch(
		&self,
		project_id: ProjectId,
		file_url: &str,
		revision: &str,
	) -> Result<Option<String>>;
}

/// Fetches source maps over HTTP from the deployed bundle's location.
///
/// The map URL is derived from the bundle URL by dropping any query or
/// fragment and appending `.map`, the convention bundlers emit in
/// `sourceMappingURL` comments.
pub struct HttpArtifactFetcher {
	client: reqwest::Client,
}

impl HttpArtifactFetcher {
	/// Build a fetcher whose requests are bounded by `timeout`.
	pub fn new(timeout: Duration) -> Self {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.expect("failed to build HTTP client");
		Self { client }
	}

	/// Derive the map URL for a bundle URL.
	pub fn map_url(file_url: &str) -> String {
		let base = file_url
			.split(['?', '#'])
			.next()
			.unwrap_or(file_url);
		format!("{base}.map")
	}
}

#[async_trait]
impl SourceArtifactFetcher for HttpArtifactFetcher {
	async fn fetch(
		&self,
		project_id: ProjectId,
		file_url: &str,
		revision: &str,
	) -> Result<Option<String>> {
		let url = Self::map_url(file_url);
		debug!(project_id = %project_id, url = %url, revision = %revision, "fetching source map");

		let response = match self.client.get(&url).send().await {
			Ok(r) => r,
			Err(e) => {
				warn!(url = %url, error = %e, "source map fetch failed");
				return Ok(None);
			}
		};

		if !response.status().is_success() {
			debug!(url = %url, status = %response.status(), "no source map at URL");
			return Ok(None);
		}

		match response.text().await {
			Ok(body) => Ok(Some(body)),
			Err(e) => {
				warn!(url = %url, error = %e, "source map body read failed");
				Ok(None)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn map_url_appends_map_extension() {
		assert_eq!(
			HttpArtifactFetcher::map_url("https://a.example/static/app.min.js"),
			"https://a.example/static/app.min.js.map"
		);
	}

	#[test]
	fn map_url_strips_query_and_fragment() {
		assert_eq!(
			HttpArtifactFetcher::map_url("https://a.example/app.min.js?1528101883"),
			"https://a.example/app.min.js.map"
		);
		assert_eq!(
			HttpArtifactFetcher::map_url("https://a.example/app.min.js#frag"),
			"https://a.example/app.min.js.map"
		);
	}

	#[tokio::test]
	async fn unreachable_host_degrades_to_unavailable() {
		let fetcher = HttpArtifactFetcher::new(Duration::from_millis(200));
		let fetched = fetcher
			.fetch(
				ProjectId::new(),
				"http://127.0.0.1:1/app.js",
				"r1",
			)
			.await
			.unwrap();
		assert_eq!(fetched, None);
	}
}
