// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source resolution: artifact caching and coordinate remapping.
//!
//! The resolver turns a minified file reference plus build revision into a
//! [`SourceArtifact`] and answers remap queries against it. Everything here
//! degrades instead of failing: a missing map, a failed fetch or an
//! unparsable body all produce an artifact without a map, and remapping
//! against it yields an empty location so callers keep raw coordinates.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use kestrel_catcher_core::{ErrorLocation, ProjectId, StackFrame};
use kestrel_sourcemap::{ResolvedLocation, SourceMap};

use crate::fetch::SourceArtifactFetcher;

/// Cache key for one source artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactKey {
	pub project_id: ProjectId,
	pub file_url: String,
	pub revision: String,
}

/// The original-source artifact for one built file at one revision.
///
/// `map` is absent when no source map exists or retrieval failed; the
/// artifact is still a valid (negative) cache entry so repeat reports do
/// not re-fetch.
#[derive(Debug)]
pub struct SourceArtifact {
	pub key: ArtifactKey,
	pub map: Option<SourceMap>,
}

impl SourceArtifact {
	pub fn is_available(&self) -> bool {
		self.map.is_some()
	}

	/// Remap one minified coordinate against this artifact.
	///
	/// Returns partial results gracefully: fields the map does not cover
	/// stay unset, and an unavailable artifact resolves nothing.
	pub fn remap(&self, line: u32, column: u32) -> ResolvedLocation {
		match &self.map {
			Some(map) => map.original_position_for(line, column),
			None => ResolvedLocation::empty(),
		}
	}
}

/// Resolves and caches source artifacts across reports.
///
/// The cache is keyed by (project, file, revision) and safe for concurrent
/// use; it is a performance optimization, not a correctness requirement.
pub struct SourceResolver {
	fetcher: Arc<dyn SourceArtifactFetcher>,
	cache: RwLock<HashMap<ArtifactKey, Arc<SourceArtifact>>>,
}

impl SourceResolver {
	pub fn new(fetcher: Arc<dyn SourceArtifactFetcher>) -> Self {
		Self {
			fetcher,
			cache: RwLock::new(HashMap::new()),
		}
	}

	/// Obtain the artifact for a minified file reference and revision.
	///
	/// Never fails: fetch or parse problems yield an unavailable artifact.
	pub async fn resolve_artifact(
		&self,
		project_id: ProjectId,
		file_url: &str,
		revision: &str,
	) -> Arc<SourceArtifact> {
		let key = ArtifactKey {
			project_id,
			file_url: file_url.to_string(),
			revision: revision.to_string(),
		};

		if let Some(artifact) = self.cache.read().await.get(&key) {
			return Arc::clone(artifact);
		}

		let map = self.fetch_and_parse(&key).await;
		let artifact = Arc::new(SourceArtifact {
			key: key.clone(),
			map,
		});

		// Two tasks may have raced the fetch; first insert wins so every
		// caller sees the same artifact.
		let mut cache = self.cache.write().await;
		Arc::clone(cache.entry(key).or_insert(artifact))
	}

	async fn fetch_and_parse(&self, key: &ArtifactKey) -> Option<SourceMap> {
		let body = match self
			.fetcher
			.fetch(key.project_id, &key.file_url, &key.revision)
			.await
		{
			Ok(Some(body)) => body,
			Ok(None) => {
				debug!(file = %key.file_url, revision = %key.revision, "no source map available");
				return None;
			}
			Err(e) => {
				warn!(file = %key.file_url, error = %e, "source map fetch failed");
				return None;
			}
		};

		match SourceMap::parse(&body) {
			Ok(map) => Some(map),
			Err(e) => {
				warn!(file = %key.file_url, error = %e, "source map parse failed");
				None
			}
		}
	}

	/// Number of cached artifacts, available or negative.
	pub async fn cached_artifacts(&self) -> usize {
		self.cache.read().await.len()
	}
}

/// Merge a resolved location into the primary error location.
///
/// Each field is overwritten only when the resolved value is present and
/// truthy; otherwise the raw minified value is kept. A resolved line or
/// column of 0 therefore never wins over the raw value.
pub fn merge_into_location(location: &mut ErrorLocation, resolved: &ResolvedLocation) {
	if let Some(file) = nonempty(&resolved.file) {
		location.file = file.to_string();
	}
	if let Some(line) = nonzero(resolved.line) {
		location.line = line;
	}
	if let Some(col) = nonzero(resolved.column) {
		location.col = col;
	}
	if let Some(symbol) = nonempty(&resolved.symbol) {
		location.func = Some(symbol.to_string());
	}
}

/// Merge a resolved location into one stack frame, same policy as
/// [`merge_into_location`].
pub fn merge_into_frame(frame: &mut StackFrame, resolved: &ResolvedLocation) {
	if let Some(symbol) = nonempty(&resolved.symbol) {
		frame.func = Some(symbol.to_string());
	}
	if let Some(file) = nonempty(&resolved.file) {
		frame.file = Some(file.to_string());
	}
	if let Some(line) = nonzero(resolved.line) {
		frame.line = Some(line);
	}
	if let Some(col) = nonzero(resolved.column) {
		frame.col = Some(col);
	}
}

fn nonempty(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|s| !s.is_empty())
}

fn nonzero(value: Option<u32>) -> Option<u32> {
	value.filter(|&n| n != 0)
}
