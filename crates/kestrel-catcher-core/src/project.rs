// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project identity as seen by the ingestion pipeline.

use serde::{Deserialize, Serialize};

use crate::ProjectId;

/// The slice of a project the catcher consumes.
///
/// Projects are owned by an external store; only the id and the ingest token
/// ever reach this pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
	pub id: ProjectId,
	/// Ingest token presented by client runtimes.
	pub token: String,
}

impl Project {
	pub fn new(id: ProjectId, token: impl Into<String>) -> Self {
		Self {
			id,
			token: token.into(),
		}
	}
}
